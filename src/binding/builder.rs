use crate::{
    key::{ContributionId, Key},
    scope::Scope,
    ty::{FrameworkType, MapType, Path, Ty},
};

use super::{
    Binding, BindingKind, BindingType, ContributionType, DelegateDeclaration, DependencyRequest,
    RequestKind,
};

/// Assembles a [`Binding`]. Multibinding contributions get their
/// contribution id attached on `build` from the module and element.
pub struct BindingBuilder {
    binding: Binding,
}

impl BindingBuilder {
    pub fn new(kind: BindingKind, key: Key) -> BindingBuilder {
        let binding_type = match kind {
            BindingKind::Production | BindingKind::ComponentProduction => BindingType::Production,
            BindingKind::MembersInjection => BindingType::MembersInjection,
            _ => BindingType::Provision,
        };
        BindingBuilder {
            binding: Binding {
                kind,
                binding_type,
                contribution_type: ContributionType::Unique,
                key,
                dependencies: vec![],
                scope: None,
                contributing_module: None,
                element: None,
                requires_module_instance: false,
                map_key: None,
            },
        }
    }

    pub fn binding_type(mut self, binding_type: BindingType) -> Self {
        self.binding.binding_type = binding_type;
        self
    }

    pub fn contribution_type(mut self, contribution_type: ContributionType) -> Self {
        self.binding.contribution_type = contribution_type;
        self
    }

    pub fn dependencies(mut self, dependencies: Vec<DependencyRequest>) -> Self {
        self.binding.dependencies = dependencies;
        self
    }

    pub fn scope(mut self, scope: Option<Scope>) -> Self {
        self.binding.scope = scope;
        self
    }

    pub fn module<P: Into<Path>>(mut self, module: P) -> Self {
        self.binding.contributing_module = Some(module.into());
        self
    }

    pub fn element<S: Into<String>>(mut self, element: S) -> Self {
        self.binding.element = Some(element.into());
        self
    }

    pub fn requires_module_instance(mut self, requires: bool) -> Self {
        self.binding.requires_module_instance = requires;
        self
    }

    pub fn map_key(mut self, map_key: Option<String>) -> Self {
        self.binding.map_key = map_key;
        self
    }

    pub fn build(mut self) -> Binding {
        let b = &mut self.binding;
        if b.contribution_type.is_multibinding() && !b.key.is_contribution() {
            let module = b.contributing_module.clone().unwrap_or_default();
            let element = b.element.clone().unwrap_or_default();
            b.key = b.key.with_contribution(ContributionId::new(module, element));
        }
        self.binding
    }
}

impl Binding {
    /// A class with an injectable constructor, plus any injected members.
    pub fn injection(key: Key, dependencies: Vec<DependencyRequest>, scope: Option<Scope>) -> Binding {
        BindingBuilder::new(BindingKind::Injection, key)
            .dependencies(dependencies)
            .scope(scope)
            .build()
    }

    pub fn members_injection(key: Key, dependencies: Vec<DependencyRequest>) -> Binding {
        BindingBuilder::new(BindingKind::MembersInjection, key)
            .dependencies(dependencies)
            .build()
    }

    /// A module method. Map contributions are keyed by the framework map
    /// `Map<K, Provider<V>>` (or `Producer<V>` for productions); `key` is
    /// the declared `Map<K, V>`.
    pub fn module_method(
        production: bool,
        key: Key,
        contribution_type: ContributionType,
        module: Path,
        element: &str,
    ) -> BindingBuilder {
        let (kind, fw) = if production {
            (BindingKind::Production, FrameworkType::Producer)
        } else {
            (BindingKind::Provision, FrameworkType::Provider)
        };
        let key = match contribution_type {
            ContributionType::Map => key.wrap_map_value(fw).unwrap_or(key),
            _ => key,
        };
        BindingBuilder::new(kind, key)
            .contribution_type(contribution_type)
            .module(module)
            .element(element)
    }

    pub fn for_component(ty: Ty) -> Binding {
        let module = ty.path().cloned();
        let mut b = BindingBuilder::new(BindingKind::Component, Key::new(ty));
        if let Some(m) = module {
            b = b.module(m);
        }
        b.build()
    }

    pub fn for_component_dependency(ty: Ty) -> Binding {
        let module = ty.path().cloned();
        let mut b = BindingBuilder::new(BindingKind::ComponentDependency, Key::new(ty));
        if let Some(m) = module {
            b = b.module(m);
        }
        b.build()
    }

    /// A method of a component dependency. `declared_in` is the supertype
    /// of the dependency that declares the method.
    pub fn for_component_method(key: Key, production: bool, declared_in: Path, method: &str) -> Binding {
        let kind = if production {
            BindingKind::ComponentProduction
        } else {
            BindingKind::ComponentProvision
        };
        BindingBuilder::new(kind, key)
            .module(declared_in)
            .element(method)
            .build()
    }

    pub fn for_subcomponent_creator(creator: Ty, parent: Path, method: &str) -> Binding {
        BindingBuilder::new(BindingKind::SubcomponentCreator, Key::new(creator))
            .module(parent)
            .element(method)
            .build()
    }

    /// Wraps a binding found for a delegate's target. The delegate takes the
    /// target's binding type; map delegates are keyed like other map
    /// contributions of that type.
    pub fn delegate(decl: &DelegateDeclaration, target: &Binding) -> Binding {
        let production = target.is_production();
        let key = match decl.contribution_type {
            ContributionType::Map => {
                let fw = if production {
                    FrameworkType::Producer
                } else {
                    FrameworkType::Provider
                };
                decl.key.wrap_map_value(fw).unwrap_or_else(|| decl.key.clone())
            }
            _ => decl.key.clone(),
        };
        let binding_type = if production {
            BindingType::Production
        } else {
            BindingType::Provision
        };
        Binding::delegate_with_type(decl, key, binding_type)
    }

    /// A delegate whose target has no bindings at all. It is kept so the
    /// missing target is reported against the delegate's dependency.
    pub fn unresolved_delegate(decl: &DelegateDeclaration) -> Binding {
        let key = match decl.contribution_type {
            ContributionType::Map => decl
                .key
                .wrap_map_value(FrameworkType::Provider)
                .unwrap_or_else(|| decl.key.clone()),
            _ => decl.key.clone(),
        };
        Binding::delegate_with_type(decl, key, BindingType::Provision)
    }

    fn delegate_with_type(decl: &DelegateDeclaration, key: Key, binding_type: BindingType) -> Binding {
        BindingBuilder::new(BindingKind::Delegate, key)
            .binding_type(binding_type)
            .contribution_type(decl.contribution_type)
            .dependencies(vec![decl.request.clone()])
            .scope(decl.scope.clone())
            .module(decl.module.clone())
            .element(decl.element.clone())
            .map_key(decl.map_key.clone())
            .build()
    }

    /// The aggregate of a set or map multibinding. Each contribution becomes
    /// one dependency: set elements are requested as instances, map values
    /// as providers, and production contributions as producers.
    pub fn multibound(key: Key, production: bool, contributions: &[&Binding]) -> Binding {
        let kind = if key.is_map() {
            BindingKind::MultiboundMap
        } else {
            BindingKind::MultiboundSet
        };
        let dependencies = contributions
            .iter()
            .map(|c| {
                let kind = if c.is_production() {
                    RequestKind::Producer
                } else if kind == BindingKind::MultiboundMap {
                    RequestKind::Provider
                } else {
                    RequestKind::Instance
                };
                DependencyRequest::new(kind, c.key.clone())
            })
            .collect();
        let binding_type = if production {
            BindingType::Production
        } else {
            BindingType::Provision
        };
        BindingBuilder::new(kind, key)
            .binding_type(binding_type)
            .dependencies(dependencies)
            .build()
    }

    /// `Map<K, V>` (or `Map<K, Produced<V>>`) built from the framework map of
    /// the same key and value types.
    pub fn map_of_values(key: Key, production: bool) -> Binding {
        let (fw, kind, binding_type) = if production {
            (FrameworkType::Producer, RequestKind::Producer, BindingType::Production)
        } else {
            (FrameworkType::Provider, RequestKind::Provider, BindingType::Provision)
        };
        let framework_key = key
            .implicit_framework_map_keys()
            .into_iter()
            .find(|k| MapType::from(k.ty()).map_or(false, |m| m.values_are(fw)));
        let dependencies = framework_key
            .map(|k| vec![DependencyRequest::new(kind, k)])
            .unwrap_or_default();
        BindingBuilder::new(BindingKind::MapOfValues, key)
            .binding_type(binding_type)
            .dependencies(dependencies)
            .build()
    }
}
