use std::rc::Rc;

use fnv::FnvHashSet;

use crate::{
    binding::{Binding, DelegateDeclaration, MultibindingDeclaration},
    collections::SetMultimap,
    component::{ComponentDescriptor, ComponentMethodKind},
    key::Key,
    ty::Path,
};

/// The declarations visible in one component, indexed by key. Built once
/// per component node and never modified.
#[derive(Debug, Default)]
pub struct DeclarationIndex {
    /// Keyed by the full binding key, contribution id included.
    explicit_bindings: SetMultimap<Key, Rc<Binding>>,
    explicit_binding_set: FnvHashSet<Rc<Binding>>,
    /// Multibinding contributions keyed by the set or map they contribute to.
    explicit_multibindings: SetMultimap<Key, Rc<Binding>>,
    multibinding_declarations: SetMultimap<Key, MultibindingDeclaration>,
    delegates: SetMultimap<Key, DelegateDeclaration>,
    /// Multibinding delegates keyed by the set or map they contribute to.
    delegate_multibindings: SetMultimap<Key, DelegateDeclaration>,
}

impl DeclarationIndex {
    pub fn for_component(component: &ComponentDescriptor) -> DeclarationIndex {
        let mut index = DeclarationIndex::default();

        index.add_binding(Rc::new(Binding::for_component(component.ty.clone())));

        for dependency in component.dependencies.iter() {
            index.add_binding(Rc::new(Binding::for_component_dependency(dependency.ty.clone())));

            // a key reached through a second supertype of the dependency is
            // the same method seen twice
            let mut declared_in = SetMultimap::<Key, Path>::new();
            for method in dependency.methods.iter() {
                let previous = declared_in.get(&method.key);
                if !previous.is_empty() && !previous.contains(&method.declared_in) {
                    log::debug!(
                        "skipping {}.{}: {} is already provided by {:?}",
                        method.declared_in,
                        method.name,
                        method.key,
                        previous
                    );
                    continue;
                }
                declared_in.put(method.key.clone(), method.declared_in.clone());

                let production = component.kind.is_production() && method.production;
                index.add_binding(Rc::new(Binding::for_component_method(
                    method.key.clone(),
                    production,
                    method.declared_in.clone(),
                    &method.name,
                )));
            }
        }

        let component_path = component.path().cloned().unwrap_or_default();
        for (method, _) in component.subcomponents.iter() {
            if method.kind != ComponentMethodKind::SubcomponentCreator {
                continue;
            }
            if let Some(creator) = &method.creator {
                index.add_binding(Rc::new(Binding::for_subcomponent_creator(
                    creator.clone(),
                    component_path.clone(),
                    &method.name,
                )));
            }
        }

        for module in component.transitive_modules() {
            for binding in module.bindings.iter() {
                index.add_binding(Rc::clone(binding));
            }
            for decl in module.multibinding_declarations.iter() {
                index.multibinding_declarations.put(decl.key.clone(), decl.clone());
            }
            for decl in module.delegate_declarations.iter() {
                index.add_delegate(decl.clone());
            }
        }

        index
    }

    fn add_binding(&mut self, binding: Rc<Binding>) {
        if binding.key.is_contribution() {
            self.explicit_multibindings
                .put(binding.key.without_contribution(), Rc::clone(&binding));
        }
        self.explicit_bindings.put(binding.key.clone(), Rc::clone(&binding));
        self.explicit_binding_set.insert(binding);
    }

    fn add_delegate(&mut self, decl: DelegateDeclaration) {
        if decl.key.is_contribution() {
            self.delegate_multibindings
                .put(decl.key.without_contribution(), decl.clone());
        }
        self.delegates.put(decl.key.clone(), decl);
    }

    pub fn explicit_bindings(&self, key: &Key) -> &[Rc<Binding>] {
        self.explicit_bindings.get(key)
    }

    pub fn explicit_multibindings(&self, key: &Key) -> &[Rc<Binding>] {
        self.explicit_multibindings.get(key)
    }

    pub fn multibinding_declarations(&self, key: &Key) -> &[MultibindingDeclaration] {
        self.multibinding_declarations.get(key)
    }

    pub fn delegates(&self, key: &Key) -> &[DelegateDeclaration] {
        self.delegates.get(key)
    }

    pub fn delegate_multibindings(&self, key: &Key) -> &[DelegateDeclaration] {
        self.delegate_multibindings.get(key)
    }

    /// Returns true if `binding` was declared in this component.
    pub fn declares(&self, binding: &Binding) -> bool {
        self.explicit_binding_set.contains(binding)
    }

    /// Returns true if this component contributes to, or declares, the set
    /// or map `key`.
    pub fn has_multibindings(&self, key: &Key) -> bool {
        !self.explicit_multibindings(key).is_empty()
            || !self.delegate_multibindings(&key.to_delegate_key()).is_empty()
            || !self.multibinding_declarations(key).is_empty()
    }

    /// Returns true if this component declares a binding or a delegate for
    /// exactly `key`.
    pub fn has_explicit_binding(&self, key: &Key) -> bool {
        !self.explicit_bindings(key).is_empty() || !self.delegates(&key.to_delegate_key()).is_empty()
    }
}
