use std::fmt;

use crate::{key::Key, scope::Scope, ty::Path, utils::join};

mod builder;
mod declarations;
mod registry;
mod request;

pub use builder::BindingBuilder;
pub use declarations::{DelegateDeclaration, MultibindingDeclaration};
pub use registry::{InjectBindingMap, InjectBindingRegistry};
pub use request::{DependencyRequest, RequestKind};

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BindingType {
    Provision,
    Production,
    MembersInjection,
}

/// How a binding contributes to its key.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ContributionType {
    /// The only binding for the key.
    Unique,
    /// One element of a set multibinding.
    Set,
    /// A collection of elements of a set multibinding.
    SetValues,
    /// One entry of a map multibinding.
    Map,
}

impl ContributionType {
    pub fn is_multibinding(&self) -> bool {
        *self != ContributionType::Unique
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BindingKind {
    /// A class with an injectable constructor.
    Injection,
    MembersInjection,
    /// A module method producing a value synchronously.
    Provision,
    /// A module method producing a value asynchronously.
    Production,
    /// The component instance itself.
    Component,
    /// An instance of a component dependency.
    ComponentDependency,
    ComponentProvision,
    ComponentProduction,
    /// A builder or factory for a subcomponent.
    SubcomponentCreator,
    /// An alias of another key.
    Delegate,
    MultiboundSet,
    MultiboundMap,
    /// A `Map<K, V>` backed by the framework map `Map<K, Provider<V>>`.
    MapOfValues,
}

impl BindingKind {
    pub fn is_synthetic_multibinding(&self) -> bool {
        matches!(self, BindingKind::MultiboundSet | BindingKind::MultiboundMap)
    }

    pub fn is_synthetic(&self) -> bool {
        self.is_synthetic_multibinding() || *self == BindingKind::MapOfValues
    }
}

impl fmt::Display for BindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                BindingKind::Injection => "injection",
                BindingKind::MembersInjection => "members injection",
                BindingKind::Provision => "provision",
                BindingKind::Production => "production",
                BindingKind::Component => "component",
                BindingKind::ComponentDependency => "component dependency",
                BindingKind::ComponentProvision => "component provision",
                BindingKind::ComponentProduction => "component production",
                BindingKind::SubcomponentCreator => "subcomponent creator",
                BindingKind::Delegate => "delegate",
                BindingKind::MultiboundSet => "multibound set",
                BindingKind::MultiboundMap => "multibound map",
                BindingKind::MapOfValues => "map of values",
            }
        )
    }
}

/// An immutable rule for producing a value of a key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Binding {
    pub kind: BindingKind,
    pub binding_type: BindingType,
    pub contribution_type: ContributionType,
    pub key: Key,
    pub dependencies: Vec<DependencyRequest>,
    pub scope: Option<Scope>,
    /// The module or component type that declares this binding.
    pub contributing_module: Option<Path>,
    /// The method, constructor or declaration that defines this binding.
    pub element: Option<String>,
    /// True for module methods that need an instance of their module.
    pub requires_module_instance: bool,
    /// The map key annotation of a map contribution.
    pub map_key: Option<String>,
}

impl Binding {
    pub fn is_production(&self) -> bool {
        self.binding_type == BindingType::Production
    }

    pub fn is_members_injection(&self) -> bool {
        self.binding_type == BindingType::MembersInjection
    }

    pub fn is_synthetic_multibinding(&self) -> bool {
        self.kind.is_synthetic_multibinding()
    }

    pub fn is_multibinding_contribution(&self) -> bool {
        self.contribution_type.is_multibinding()
    }

    pub fn is_reusable(&self) -> bool {
        self.scope.as_ref().map_or(false, Scope::is_reusable)
    }

    /// Short description used in diagnostics and the text output.
    pub fn describe(&self) -> String {
        let mut s = format!("{} {}", self.kind, self.key);
        if let Some(scope) = &self.scope {
            s = format!("{} {}", scope, s);
        }
        match (&self.contributing_module, &self.element) {
            (Some(m), Some(e)) => s.push_str(&format!(" [{}.{}]", m, e)),
            (Some(m), None) => s.push_str(&format!(" [{}]", m)),
            (None, Some(e)) => s.push_str(&format!(" [{}]", e)),
            (None, None) => (),
        }
        s
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.describe())?;
        if !self.dependencies.is_empty() {
            write!(f, " <- ({})", join(&self.dependencies, ", "))?;
        }
        Ok(())
    }
}
