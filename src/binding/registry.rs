use std::rc::Rc;

use fnv::FnvHashMap;

use crate::key::Key;

use super::Binding;

/// Supplies bindings for classes with injectable constructors or members,
/// which are found on demand rather than declared in a module.
pub trait InjectBindingRegistry {
    fn get_or_find_provision_binding(&self, key: &Key) -> Option<Rc<Binding>>;

    fn get_or_find_members_injection_binding(&self, key: &Key) -> Option<Rc<Binding>>;
}

/// A registry backed by bindings registered up front.
#[derive(Debug, Default)]
pub struct InjectBindingMap {
    provisions: FnvHashMap<Key, Rc<Binding>>,
    members: FnvHashMap<Key, Rc<Binding>>,
}

impl InjectBindingMap {
    pub fn new() -> InjectBindingMap {
        InjectBindingMap::default()
    }

    pub fn add_provision(&mut self, binding: Binding) {
        self.provisions.insert(binding.key.clone(), Rc::new(binding));
    }

    pub fn add_members_injection(&mut self, binding: Binding) {
        self.members.insert(binding.key.clone(), Rc::new(binding));
    }

    pub fn len(&self) -> usize {
        self.provisions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.provisions.is_empty() && self.members.is_empty()
    }
}

impl InjectBindingRegistry for InjectBindingMap {
    fn get_or_find_provision_binding(&self, key: &Key) -> Option<Rc<Binding>> {
        // constructors cannot satisfy qualified keys
        if key.qualifier.is_some() {
            return None;
        }
        self.provisions.get(key).cloned()
    }

    fn get_or_find_members_injection_binding(&self, key: &Key) -> Option<Rc<Binding>> {
        self.members.get(key).cloned()
    }
}
