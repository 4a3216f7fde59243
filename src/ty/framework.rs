use std::collections::HashMap;

use super::{Ty, MAP, SET};

/// The wrapper types that change how a dependency is delivered without
/// changing what is being asked for.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FrameworkType {
    Provider,
    Lazy,
    Producer,
    Produced,
    Future,
    MembersInjector,
}

lazy_static! {
    static ref FRAMEWORK_NAMES: HashMap<&'static str, FrameworkType> = {
        let mut m = HashMap::new();
        m.insert("Provider", FrameworkType::Provider);
        m.insert("Lazy", FrameworkType::Lazy);
        m.insert("Producer", FrameworkType::Producer);
        m.insert("Produced", FrameworkType::Produced);
        m.insert("ListenableFuture", FrameworkType::Future);
        m.insert("MembersInjector", FrameworkType::MembersInjector);
        m
    };
}

impl FrameworkType {
    pub fn from_name(name: &str) -> Option<FrameworkType> {
        FRAMEWORK_NAMES.get(name).copied()
    }

    pub fn name(&self) -> &'static str {
        match self {
            FrameworkType::Provider => "Provider",
            FrameworkType::Lazy => "Lazy",
            FrameworkType::Producer => "Producer",
            FrameworkType::Produced => "Produced",
            FrameworkType::Future => "ListenableFuture",
            FrameworkType::MembersInjector => "MembersInjector",
        }
    }

    /// Returns the framework type `ty` is a single-argument instance of.
    pub fn of(ty: &Ty) -> Option<FrameworkType> {
        let name = ty.path()?.name()?;
        if ty.args().len() != 1 {
            return None;
        }
        FrameworkType::from_name(name)
    }

    pub fn is(&self, ty: &Ty) -> bool {
        FrameworkType::of(ty) == Some(*self)
    }

    pub fn wrap(&self, ty: Ty) -> Ty {
        Ty::declared(self.name(), vec![ty])
    }

    /// Returns the argument of `ty` if it is an instance of this wrapper.
    pub fn unwrap<'a>(&self, ty: &'a Ty) -> Option<&'a Ty> {
        if self.is(ty) {
            ty.args().first()
        } else {
            None
        }
    }
}

/// A view of a `Set<T>` type.
#[derive(Debug, Clone, Copy)]
pub struct SetType<'a> {
    ty: &'a Ty,
}

impl<'a> SetType<'a> {
    pub fn is_set(ty: &Ty) -> bool {
        ty.is_named(SET) && ty.args().len() == 1
    }

    pub fn from(ty: &'a Ty) -> Option<SetType<'a>> {
        if SetType::is_set(ty) {
            Some(SetType { ty })
        } else {
            None
        }
    }

    pub fn element_type(&self) -> &'a Ty {
        &self.ty.args()[0]
    }

    pub fn elements_are(&self, fw: FrameworkType) -> bool {
        fw.is(self.element_type())
    }

    /// The element type with `fw` stripped off.
    ///
    /// Panics if the elements are not `fw` instances.
    pub fn unwrapped_element(&self, fw: FrameworkType) -> &'a Ty {
        match fw.unwrap(self.element_type()) {
            Some(t) => t,
            None => panic!("{} does not have {} elements", self.ty, fw.name()),
        }
    }
}

/// A view of a `Map<K, V>` type.
#[derive(Debug, Clone, Copy)]
pub struct MapType<'a> {
    ty: &'a Ty,
}

impl<'a> MapType<'a> {
    pub fn is_map(ty: &Ty) -> bool {
        ty.is_named(MAP) && ty.args().len() == 2
    }

    pub fn from(ty: &'a Ty) -> Option<MapType<'a>> {
        if MapType::is_map(ty) {
            Some(MapType { ty })
        } else {
            None
        }
    }

    pub fn key_type(&self) -> &'a Ty {
        &self.ty.args()[0]
    }

    pub fn value_type(&self) -> &'a Ty {
        &self.ty.args()[1]
    }

    pub fn values_are(&self, fw: FrameworkType) -> bool {
        fw.is(self.value_type())
    }

    /// Returns the framework type wrapping the values, if any.
    pub fn values_framework_type(&self) -> Option<FrameworkType> {
        FrameworkType::of(self.value_type())
    }

    pub fn values_are_framework_type(&self) -> bool {
        self.values_framework_type().is_some()
    }

    /// Panics if the values are not `fw` instances.
    pub fn unwrapped_value(&self, fw: FrameworkType) -> &'a Ty {
        match fw.unwrap(self.value_type()) {
            Some(t) => t,
            None => panic!("{} does not have {} values", self.ty, fw.name()),
        }
    }

    /// `Map<K, V>` where `V` is the value type stripped of any framework wrapper.
    pub fn with_unwrapped_values(&self) -> Ty {
        let value = match self.values_framework_type() {
            Some(fw) => self.unwrapped_value(fw).clone(),
            None => self.value_type().clone(),
        };
        Ty::map_of(self.key_type().clone(), value)
    }
}
