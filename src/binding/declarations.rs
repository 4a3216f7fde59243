use crate::{
    key::{ContributionId, Key},
    scope::Scope,
    ty::{FrameworkType, Path},
};

use super::{ContributionType, DependencyRequest};

/// A `@Multibinds` declaration: the set or map may be empty, but exists.
///
/// Map declarations are stored under the framework map key
/// `Map<K, Provider<V>>`, the same key map contributions use.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MultibindingDeclaration {
    pub key: Key,
    pub contribution_type: ContributionType,
    pub module: Path,
    pub element: String,
}

impl MultibindingDeclaration {
    pub fn new<S: Into<String>>(key: Key, module: Path, element: S) -> MultibindingDeclaration {
        let (key, contribution_type) = if key.is_map() {
            let key = key.wrap_map_value(FrameworkType::Provider).unwrap_or(key);
            (key, ContributionType::Map)
        } else {
            (key, ContributionType::Set)
        };
        MultibindingDeclaration {
            key,
            contribution_type,
            module,
            element: element.into(),
        }
    }
}

/// A `@Binds`-style alias from one key to another.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DelegateDeclaration {
    /// The bound key. Map contributions are keyed by `Map<K, V>` plus a
    /// contribution id; set contributions by `Set<T>` plus a contribution id.
    pub key: Key,
    pub contribution_type: ContributionType,
    /// The request for the key this declaration aliases.
    pub request: DependencyRequest,
    pub module: Path,
    pub element: String,
    pub scope: Option<Scope>,
    pub map_key: Option<String>,
}

impl DelegateDeclaration {
    pub fn new<S: Into<String>>(
        key: Key,
        contribution_type: ContributionType,
        target: Key,
        module: Path,
        element: S,
    ) -> DelegateDeclaration {
        let element = element.into();
        let key = if contribution_type.is_multibinding() {
            key.with_contribution(ContributionId::new(module.clone(), element.clone()))
        } else {
            key
        };
        DelegateDeclaration {
            key,
            contribution_type,
            request: DependencyRequest::instance(target).with_element(element.clone()),
            module,
            element,
            scope: None,
            map_key: None,
        }
    }

    pub fn with_scope(mut self, scope: Option<Scope>) -> DelegateDeclaration {
        self.scope = scope;
        self
    }

    pub fn with_map_key(mut self, map_key: Option<String>) -> DelegateDeclaration {
        self.map_key = map_key;
        self
    }
}
