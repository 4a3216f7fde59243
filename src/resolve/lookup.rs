use std::rc::Rc;

use crate::{
    binding::{Binding, DelegateDeclaration, DependencyRequest, MultibindingDeclaration, RequestKind},
    component::ComponentPath,
    key::{BindingKey, BindingKeyKind, Key},
    ty::{FrameworkType, MapType, SetType},
    utils::{extend_unique, push_unique},
};

use super::{
    resolved::ResolvedBindings,
    resolver::{ResolverId, Resolvers},
};

impl<'r> Resolvers<'r> {
    /// Finds the bindings for `request` visible from `id` and decides which
    /// component owns each of them.
    pub(super) fn look_up_bindings(&mut self, id: ResolverId, request: &DependencyRequest) -> ResolvedBindings {
        let binding_key = request.binding_key();
        let path = self[id].path.clone();
        match binding_key.kind {
            BindingKeyKind::Contribution => {
                let (bindings, declarations) = self.find_contributions(id, request);
                let mut contributions = vec![];
                for binding in bindings {
                    let owner = self.owning_component(id, request, &binding);
                    contributions.push((owner, binding));
                }
                ResolvedBindings::for_contributions(binding_key, path, contributions, declarations)
            }
            BindingKeyKind::MembersInjection => {
                match self.registry.get_or_find_members_injection_binding(&binding_key.key) {
                    Some(binding) => ResolvedBindings::for_members_injection(binding_key, path, binding),
                    None => ResolvedBindings::no_bindings(binding_key, path),
                }
            }
        }
    }

    /// The contribution bindings for `request` from `id` and its ancestors:
    ///
    /// * explicit bindings for the requested key, for `Set<T>` when
    ///   `Set<Produced<T>>` is requested, and for the `Provider`/`Producer`
    ///   form of a framework map,
    /// * a synthetic map-of-values binding for a `Map<K, V>` request backed
    ///   by framework map contributions,
    /// * a synthetic multibinding when any contributions or declarations
    ///   apply,
    /// * failing all of those, an injection binding from the registry.
    ///
    /// Also returns the multibinding declarations that apply.
    pub(super) fn find_contributions(
        &self,
        id: ResolverId,
        request: &DependencyRequest,
    ) -> (Vec<Rc<Binding>>, Vec<MultibindingDeclaration>) {
        let mut bindings = vec![];
        let mut multibindings = vec![];
        let mut declarations = vec![];

        for key in keys_matching_request(&request.key) {
            extend_unique(&mut bindings, self.explicit_bindings(id, &key));
            extend_unique(&mut multibindings, self.explicit_multibindings(id, &key));
            extend_unique(&mut declarations, self.multibinding_declarations(id, &key));
        }

        if let Some(b) = self.synthetic_map_of_values_binding(id, request) {
            push_unique(&mut bindings, b);
        }
        if let Some(b) = synthetic_multibinding(request, &multibindings, &declarations) {
            push_unique(&mut bindings, b);
        }

        if bindings.is_empty() {
            if let Some(b) = self.registry.get_or_find_provision_binding(&request.key) {
                bindings.push(b);
            }
        }

        (bindings, declarations)
    }

    fn synthetic_map_of_values_binding(&self, id: ResolverId, request: &DependencyRequest) -> Option<Rc<Binding>> {
        let framework_keys = request.key.implicit_framework_map_keys();
        if framework_keys.is_empty() {
            return None;
        }

        let mut contributions = vec![];
        let mut declarations = vec![];
        for key in framework_keys.iter() {
            extend_unique(&mut contributions, self.explicit_multibindings(id, key));
            extend_unique(&mut declarations, self.multibinding_declarations(id, key));
        }

        let synthetic = synthetic_multibinding(request, &contributions, &declarations)?;
        Some(Rc::new(Binding::map_of_values(
            request.key.clone(),
            synthetic.is_production(),
        )))
    }

    /// Explicit bindings and delegates for exactly `key`, root first.
    pub(super) fn explicit_bindings(&self, id: ResolverId, key: &Key) -> Vec<Rc<Binding>> {
        let delegate_key = key.to_delegate_key();
        let mut bindings = vec![];
        for r in self.lineage(id) {
            extend_unique(&mut bindings, self[r].index.explicit_bindings(key).iter().cloned());
            let delegates = self.create_delegate_bindings(id, self[r].index.delegates(&delegate_key));
            extend_unique(&mut bindings, delegates);
        }
        bindings
    }

    /// Contributions to the set or map `key`, root first.
    pub(super) fn explicit_multibindings(&self, id: ResolverId, key: &Key) -> Vec<Rc<Binding>> {
        let delegate_key = key.to_delegate_key();
        // map delegates only contribute to framework maps
        let with_delegates = MapType::from(key.ty()).map_or(true, |m| m.values_are_framework_type());
        let mut bindings = vec![];
        for r in self.lineage(id) {
            extend_unique(&mut bindings, self[r].index.explicit_multibindings(key).iter().cloned());
            if with_delegates {
                let delegates = self.create_delegate_bindings(id, self[r].index.delegate_multibindings(&delegate_key));
                extend_unique(&mut bindings, delegates);
            }
        }
        bindings
    }

    pub(super) fn multibinding_declarations(&self, id: ResolverId, key: &Key) -> Vec<MultibindingDeclaration> {
        let mut declarations = vec![];
        for r in self.lineage(id) {
            extend_unique(
                &mut declarations,
                self[r].index.multibinding_declarations(key).iter().cloned(),
            );
        }
        declarations
    }

    /// Wraps every binding of each delegate's target. The target is looked
    /// up, not resolved; resolving the delegate's dependency resolves it.
    fn create_delegate_bindings(&self, id: ResolverId, delegates: &[DelegateDeclaration]) -> Vec<Rc<Binding>> {
        let mut bindings = vec![];
        for decl in delegates.iter() {
            let target = &decl.request.key;
            if self.delegate_stack.borrow().contains(target) {
                log::trace!("[resolve] delegate cycle through {}", target);
                push_unique(&mut bindings, Rc::new(Binding::unresolved_delegate(decl)));
                continue;
            }

            self.delegate_stack.borrow_mut().push(target.clone());
            let (targets, _) = self.find_contributions(id, &decl.request);
            self.delegate_stack.borrow_mut().pop();

            if targets.is_empty() {
                push_unique(&mut bindings, Rc::new(Binding::unresolved_delegate(decl)));
            }
            for t in targets.iter() {
                push_unique(&mut bindings, Rc::new(Binding::delegate(decl, t)));
            }
        }
        bindings
    }

    /// The component that caches `binding`. A binding already owned by an
    /// ancestor stays there unless it depends on multibindings with
    /// contributions from this component.
    fn owning_component(&mut self, id: ResolverId, request: &DependencyRequest, binding: &Rc<Binding>) -> ComponentPath {
        if self.is_resolved_in_parent(id, request, binding) {
            if self.binding_depends_on_local_multibindings(id, binding) {
                log::debug!(
                    "[resolve] {}: {} depends on local multibindings, owning it here",
                    self[id].path,
                    binding.describe()
                );
            } else if let Some(parent) = self[id].parent {
                let owner = self[parent]
                    .resolved
                    .get(&request.binding_key())
                    .and_then(|rb| rb.owning_component_of(binding).cloned());
                if let Some(owner) = owner {
                    return owner;
                }
            }
        }
        self[id].path.clone()
    }

    /// Returns true if an ancestor owns `binding`, resolving `request` in the
    /// parent when it does. The parent is used rather than the owner itself
    /// in case the binding depends on multibindings of components between
    /// the two.
    fn is_resolved_in_parent(&mut self, id: ResolverId, request: &DependencyRequest, binding: &Binding) -> bool {
        match (self.owning_resolver(id, binding), self[id].parent) {
            (Some(owner), Some(parent)) if owner != id => {
                self.resolve(parent, request);
                true
            }
            _ => false,
        }
    }

    /// The resolver that would own `binding` ignoring multibinding
    /// dependencies:
    ///
    /// * `@Reusable` bindings belong to the outermost resolver that already
    ///   resolved their key,
    /// * declared bindings belong to the innermost resolver declaring them,
    /// * scoped bindings belong to the innermost resolver with their scope.
    fn owning_resolver(&self, id: ResolverId, binding: &Binding) -> Option<ResolverId> {
        let lineage = self.lineage(id);
        let key = BindingKey::contribution(binding.key.clone());

        if binding.is_reusable() {
            return lineage.into_iter().find(|&r| self[r].resolved.contains_key(&key));
        }

        if let Some(&r) = lineage.iter().rev().find(|&&r| self[r].index.declares(binding)) {
            return Some(r);
        }

        let scope = binding.scope.as_ref()?;
        lineage.into_iter().rev().find(|&r| self[r].component.has_scope(scope))
    }
}

pub(super) fn keys_matching_request(key: &Key) -> Vec<Key> {
    let mut keys = vec![key.clone()];
    let rewritten = vec![
        key.unwrap_set_key(FrameworkType::Produced),
        key.rewrap_map_key(FrameworkType::Producer, FrameworkType::Provider),
        key.rewrap_map_key(FrameworkType::Provider, FrameworkType::Producer),
    ];
    extend_unique(&mut keys, rewritten.into_iter().flatten());
    keys
}

/// The aggregate binding over `contributions`, or nothing if there are no
/// contributions or declarations for the set or map.
fn synthetic_multibinding(
    request: &DependencyRequest,
    contributions: &[Rc<Binding>],
    declarations: &[MultibindingDeclaration],
) -> Option<Rc<Binding>> {
    if contributions.is_empty() && declarations.is_empty() {
        return None;
    }
    let production = multibindings_require_production(contributions, request);
    let contributions = contributions.iter().map(|c| c.as_ref()).collect::<Vec<_>>();
    Some(Rc::new(Binding::multibound(request.key.clone(), production, &contributions)))
}

/// A multibinding is a production binding if it is requested as one, if its
/// values are producers or produced values, or if any contribution is a
/// production binding.
fn multibindings_require_production(contributions: &[Rc<Binding>], request: &DependencyRequest) -> bool {
    match request.kind {
        RequestKind::Producer | RequestKind::Produced | RequestKind::Future => true,
        RequestKind::Instance | RequestKind::Lazy | RequestKind::Provider | RequestKind::ProviderOfLazy => {
            let ty = request.key.ty();
            if let Some(map) = MapType::from(ty) {
                if map.values_are(FrameworkType::Producer) || map.values_are(FrameworkType::Produced) {
                    return true;
                }
            } else if let Some(set) = SetType::from(ty) {
                if set.elements_are(FrameworkType::Produced) {
                    return true;
                }
            }
            contributions.iter().any(|c| c.is_production())
        }
        RequestKind::MembersInjector => {
            panic!("multibinding requested for members injection: {}", request)
        }
    }
}
