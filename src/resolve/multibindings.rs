use std::rc::Rc;

use fnv::FnvHashSet;

use crate::{binding::Binding, key::BindingKey, scope::is_unscoped_or_reusable, utils::extend_unique};

use super::{
    lookup::keys_matching_request,
    resolved::ResolvedBindings,
    resolver::{ResolverId, Resolvers},
};

/// Keys and bindings already visited by one dependency walk.
#[derive(Clone, PartialEq, Eq, Hash)]
enum Checked {
    Key(BindingKey),
    Binding(Rc<Binding>),
}

impl<'r> Resolvers<'r> {
    /// Returns true if the entry previously resolved for `key` is a
    /// multibinding with contributions declared in `id`'s own modules, or if
    /// any of its unscoped dependencies depend on one.
    ///
    /// Panics if `key` has not been resolved in `id` or an ancestor.
    pub(super) fn depends_on_local_multibindings(&mut self, id: ResolverId, key: &BindingKey) -> bool {
        assert!(
            self.previously_resolved(id, key).is_some(),
            "no previously resolved bindings in {} for {}",
            self[id].path,
            key
        );
        self.key_depends(id, key, &mut FnvHashSet::default())
    }

    /// Returns true if `id`'s own modules contribute to or declare the
    /// multibinding `key`, under any key a lookup for it would match.
    pub(super) fn declares_local_multibindings(&self, id: ResolverId, key: &BindingKey) -> bool {
        if !key.is_contribution() {
            return false;
        }
        let mut keys = keys_matching_request(&key.key);
        extend_unique(&mut keys, key.key.implicit_framework_map_keys());
        keys.iter().any(|k| self[id].index.has_multibindings(k))
    }

    /// Returns true if `binding` is unscoped (or `@Reusable`) and one of its
    /// dependencies depends on multibindings with contributions declared in
    /// `id`'s own modules. Scoped bindings never see contributions from a
    /// subcomponent.
    pub(super) fn binding_depends_on_local_multibindings(&mut self, id: ResolverId, binding: &Rc<Binding>) -> bool {
        self.binding_depends(id, binding, &mut FnvHashSet::default())
    }

    fn key_depends(&mut self, id: ResolverId, key: &BindingKey, checked: &mut FnvHashSet<Checked>) -> bool {
        // valid cycles would otherwise recurse forever
        if !checked.insert(Checked::Key(key.clone())) {
            return false;
        }
        if let Some(&cached) = self[id].key_depends_cache.get(key) {
            return cached;
        }

        let prev = unless!(self.previously_resolved(id, key), else return false);
        let depends = self.is_multibinding_with_local_contributions(id, &prev)
            || prev.bindings().any(|b| self.binding_depends(id, b, checked));

        self[id].key_depends_cache.insert(key.clone(), depends);
        depends
    }

    fn binding_depends(&mut self, id: ResolverId, binding: &Rc<Binding>, checked: &mut FnvHashSet<Checked>) -> bool {
        if !checked.insert(Checked::Binding(Rc::clone(binding))) {
            return false;
        }
        if let Some(&cached) = self[id].binding_depends_cache.get(binding) {
            return cached;
        }

        // TODO: production subcomponents may still see local contributions
        // through a production binding; they are treated as scoped for now.
        let depends = is_unscoped_or_reusable(binding.scope.as_ref())
            && !binding.is_production()
            && binding
                .dependencies
                .iter()
                .any(|d| self.key_depends(id, &d.binding_key(), checked));

        self[id].binding_depends_cache.insert(Rc::clone(binding), depends);
        depends
    }

    fn is_multibinding_with_local_contributions(&self, id: ResolverId, rb: &ResolvedBindings) -> bool {
        if !rb.contribution_bindings().any(|b| b.is_synthetic_multibinding()) {
            return false;
        }
        match self[id].parent {
            Some(parent) => self.explicit_multibindings(id, rb.key()) != self.explicit_multibindings(parent, rb.key()),
            None => false,
        }
    }
}
