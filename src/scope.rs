use std::fmt;

use crate::ty::Annotation;

pub const SINGLETON: &str = "Singleton";
pub const REUSABLE: &str = "Reusable";
pub const PRODUCTION_SCOPE: &str = "ProductionScope";

/// A scope annotation. Bindings with a scope are cached by the component
/// declaring that scope; `@Reusable` bindings may be cached by any component.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Scope(pub Annotation);

impl Scope {
    pub fn new(name: &str) -> Scope {
        Scope(Annotation::new(name))
    }

    pub fn singleton() -> Scope {
        Scope::new(SINGLETON)
    }

    pub fn reusable() -> Scope {
        Scope::new(REUSABLE)
    }

    pub fn production_scope() -> Scope {
        Scope::new(PRODUCTION_SCOPE)
    }

    pub fn name(&self) -> &str {
        self.0.name()
    }

    /// Scopes are identified by their simple name, regardless of package.
    pub fn is(&self, name: &str) -> bool {
        self.name() == name
    }

    pub fn is_reusable(&self) -> bool {
        self.is(REUSABLE)
    }

    pub fn is_production_scope(&self) -> bool {
        self.is(PRODUCTION_SCOPE)
    }
}

/// Returns true for bindings that are unscoped or `@Reusable`, i.e. those
/// that any component may instantiate.
pub fn is_unscoped_or_reusable(scope: Option<&Scope>) -> bool {
    scope.map_or(true, Scope::is_reusable)
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
