use std::{fmt, rc::Rc};

use serde::Deserialize;

use crate::{
    binding::DependencyRequest,
    key::Key,
    scope::Scope,
    ty::{Path, Ty},
};

mod module;
mod path;

pub use module::ModuleDescriptor;
pub use path::ComponentPath;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    Component,
    Subcomponent,
    ProductionComponent,
    ProductionSubcomponent,
}

impl ComponentKind {
    pub fn is_production(&self) -> bool {
        matches!(self, ComponentKind::ProductionComponent | ComponentKind::ProductionSubcomponent)
    }

    pub fn is_subcomponent(&self) -> bool {
        matches!(self, ComponentKind::Subcomponent | ComponentKind::ProductionSubcomponent)
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ComponentKind::Component => "component",
                ComponentKind::Subcomponent => "subcomponent",
                ComponentKind::ProductionComponent => "production component",
                ComponentKind::ProductionSubcomponent => "production subcomponent",
            }
        )
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ComponentMethodKind {
    Provision,
    Production,
    MembersInjection,
    /// Returns a subcomponent instance directly.
    SubcomponentFactory,
    /// Returns a builder or factory for a subcomponent.
    SubcomponentCreator,
}

/// An abstract method of a component.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ComponentMethod {
    pub name: String,
    pub kind: ComponentMethodKind,
    /// The request made by entry points. Absent for subcomponent methods.
    pub request: Option<DependencyRequest>,
    /// The creator type returned by a subcomponent creator method.
    pub creator: Option<Ty>,
}

impl ComponentMethod {
    pub fn entry_point<S: Into<String>>(name: S, request: DependencyRequest) -> ComponentMethod {
        let name = name.into();
        let kind = if request.binding_key().is_contribution() {
            if request.kind.is_production() {
                ComponentMethodKind::Production
            } else {
                ComponentMethodKind::Provision
            }
        } else {
            ComponentMethodKind::MembersInjection
        };
        ComponentMethod {
            request: Some(request.with_element(name.clone())),
            name,
            kind,
            creator: None,
        }
    }

    pub fn subcomponent_factory<S: Into<String>>(name: S) -> ComponentMethod {
        ComponentMethod {
            name: name.into(),
            kind: ComponentMethodKind::SubcomponentFactory,
            request: None,
            creator: None,
        }
    }

    pub fn subcomponent_creator<S: Into<String>>(name: S, creator: Ty) -> ComponentMethod {
        ComponentMethod {
            name: name.into(),
            kind: ComponentMethodKind::SubcomponentCreator,
            request: None,
            creator: Some(creator),
        }
    }
}

/// A method on a component dependency type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DependencyMethod {
    pub name: String,
    pub key: Key,
    pub production: bool,
    /// The supertype of the dependency declaring this method.
    pub declared_in: Path,
}

/// A type whose methods supply bindings to a component.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ComponentDependency {
    pub ty: Ty,
    pub methods: Vec<DependencyMethod>,
}

/// A component or subcomponent declaration.
#[derive(Clone, Debug)]
pub struct ComponentDescriptor {
    pub kind: ComponentKind,
    pub ty: Ty,
    pub scopes: Vec<Scope>,
    pub modules: Vec<Rc<ModuleDescriptor>>,
    pub dependencies: Vec<ComponentDependency>,
    pub methods: Vec<ComponentMethod>,
    pub subcomponents: Vec<(ComponentMethod, Rc<ComponentDescriptor>)>,
}

impl ComponentDescriptor {
    pub fn new(kind: ComponentKind, ty: Ty) -> ComponentDescriptor {
        ComponentDescriptor {
            kind,
            ty,
            scopes: vec![],
            modules: vec![],
            dependencies: vec![],
            methods: vec![],
            subcomponents: vec![],
        }
    }

    /// Every module installed by this component, including those included
    /// by other modules, without repeats.
    pub fn transitive_modules(&self) -> Vec<Rc<ModuleDescriptor>> {
        let mut out = vec![];
        for m in self.modules.iter() {
            module::collect_transitive(m, &mut out);
        }
        out
    }

    /// Requests made by this component's entry point methods.
    pub fn entry_points(&self) -> impl Iterator<Item = &DependencyRequest> {
        self.methods.iter().filter_map(|m| m.request.as_ref())
    }

    pub fn path(&self) -> Option<&Path> {
        self.ty.path()
    }

    pub fn has_scope(&self, scope: &Scope) -> bool {
        self.scopes.contains(scope)
    }

    pub fn is_unscoped(&self) -> bool {
        self.scopes.is_empty()
    }
}

impl PartialEq for ComponentDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.ty == other.ty
    }
}

impl Eq for ComponentDescriptor {}
