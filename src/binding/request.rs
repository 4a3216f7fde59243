use std::fmt;

use crate::{
    key::{BindingKey, Key},
    ty::{Annotation, FrameworkType, Ty},
};

/// How a dependency is delivered to the requesting site.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RequestKind {
    Instance,
    Provider,
    Lazy,
    ProviderOfLazy,
    Producer,
    Produced,
    Future,
    MembersInjector,
}

impl RequestKind {
    /// Deferred requests do not need the value at construction time, so a
    /// cycle passing through one of them can be broken at runtime.
    pub fn is_deferred(&self) -> bool {
        matches!(
            self,
            RequestKind::Provider | RequestKind::Lazy | RequestKind::ProviderOfLazy | RequestKind::Producer
        )
    }

    pub fn is_production(&self) -> bool {
        matches!(self, RequestKind::Producer | RequestKind::Produced | RequestKind::Future)
    }

    /// Splits a requested type into its request kind and the type actually
    /// being asked for, e.g. `Provider<Lazy<Foo>>` is a provider-of-lazy
    /// request for `Foo`.
    pub fn from_ty(ty: &Ty) -> (RequestKind, Ty) {
        let fw = unless!(FrameworkType::of(ty), else return (RequestKind::Instance, ty.clone()));
        let inner = &ty.args()[0];
        let kind = match fw {
            FrameworkType::Provider => {
                if let Some(lazy) = FrameworkType::Lazy.unwrap(inner) {
                    return (RequestKind::ProviderOfLazy, lazy.clone());
                }
                RequestKind::Provider
            }
            FrameworkType::Lazy => RequestKind::Lazy,
            FrameworkType::Producer => RequestKind::Producer,
            FrameworkType::Produced => RequestKind::Produced,
            FrameworkType::Future => RequestKind::Future,
            FrameworkType::MembersInjector => RequestKind::MembersInjector,
        };
        (kind, inner.clone())
    }

    /// The inverse of [`RequestKind::from_ty`].
    pub fn wrap(&self, ty: Ty) -> Ty {
        match self {
            RequestKind::Instance => ty,
            RequestKind::Provider => FrameworkType::Provider.wrap(ty),
            RequestKind::Lazy => FrameworkType::Lazy.wrap(ty),
            RequestKind::ProviderOfLazy => FrameworkType::Provider.wrap(FrameworkType::Lazy.wrap(ty)),
            RequestKind::Producer => FrameworkType::Producer.wrap(ty),
            RequestKind::Produced => FrameworkType::Produced.wrap(ty),
            RequestKind::Future => FrameworkType::Future.wrap(ty),
            RequestKind::MembersInjector => FrameworkType::MembersInjector.wrap(ty),
        }
    }
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                RequestKind::Instance => "instance",
                RequestKind::Provider => "provider",
                RequestKind::Lazy => "lazy",
                RequestKind::ProviderOfLazy => "provider of lazy",
                RequestKind::Producer => "producer",
                RequestKind::Produced => "produced",
                RequestKind::Future => "future",
                RequestKind::MembersInjector => "members injector",
            }
        )
    }
}

/// A request for a key, made by a binding, an entry point or a delegate.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DependencyRequest {
    pub kind: RequestKind,
    pub key: Key,
    /// The parameter, field or method making the request.
    pub element: Option<String>,
}

impl DependencyRequest {
    pub fn new(kind: RequestKind, key: Key) -> DependencyRequest {
        DependencyRequest {
            kind,
            key,
            element: None,
        }
    }

    pub fn instance(key: Key) -> DependencyRequest {
        DependencyRequest::new(RequestKind::Instance, key)
    }

    /// Builds a request from the type written at the requesting site.
    pub fn for_ty(qualifier: Option<Annotation>, ty: &Ty) -> DependencyRequest {
        let (kind, ty) = RequestKind::from_ty(ty);
        DependencyRequest::new(kind, Key::qualified(qualifier, ty))
    }

    pub fn members_injection(key: Key) -> DependencyRequest {
        DependencyRequest::new(RequestKind::MembersInjector, key)
    }

    pub fn with_element<S: Into<String>>(mut self, element: S) -> DependencyRequest {
        self.element = Some(element.into());
        self
    }

    pub fn binding_key(&self) -> BindingKey {
        match self.kind {
            RequestKind::MembersInjector => BindingKey::members_injection(self.key.clone()),
            _ => BindingKey::contribution(self.key.clone()),
        }
    }

    pub fn is_deferred(&self) -> bool {
        self.kind.is_deferred()
    }
}

impl fmt::Display for DependencyRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(q) = &self.key.qualifier {
            write!(f, "{} ", q)?;
        }
        write!(f, "{}", self.kind.wrap(self.key.ty().clone()))?;
        if let Some(element) = &self.element {
            write!(f, " ({})", element)?;
        }
        Ok(())
    }
}
