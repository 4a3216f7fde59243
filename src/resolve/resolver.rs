use std::{
    cell::RefCell,
    ops::{Index, IndexMut},
    rc::Rc,
};

use fnv::FnvHashMap;

use crate::{
    binding::{Binding, DependencyRequest, InjectBindingRegistry},
    collections::OrderedMap,
    component::{ComponentDescriptor, ComponentPath, ModuleDescriptor},
    key::{BindingKey, Key},
};

use super::{index::DeclarationIndex, resolved::ResolvedBindings};

pub type ResolverId = usize;

/// The resolution state of one component node.
pub struct Resolver {
    pub parent: Option<ResolverId>,
    pub component: Rc<ComponentDescriptor>,
    pub path: ComponentPath,
    pub index: DeclarationIndex,
    pub(super) resolved: OrderedMap<BindingKey, Rc<ResolvedBindings>>,
    pub(super) cycle_stack: Vec<BindingKey>,
    pub(super) key_depends_cache: FnvHashMap<BindingKey, bool>,
    pub(super) binding_depends_cache: FnvHashMap<Rc<Binding>, bool>,
    frozen: bool,
}

/// Every resolver of one component tree. Resolvers refer to their parent
/// by id, so the lineage of a node is a walk up the arena.
pub struct Resolvers<'r> {
    resolvers: Vec<Resolver>,
    pub(super) registry: &'r dyn InjectBindingRegistry,
    /// Delegate targets being looked up, to stop at aliases of aliases that
    /// loop back.
    pub(super) delegate_stack: RefCell<Vec<Key>>,
}

impl<'r> Index<ResolverId> for Resolvers<'r> {
    type Output = Resolver;

    fn index(&self, id: ResolverId) -> &Resolver {
        &self.resolvers[id]
    }
}

impl<'r> IndexMut<ResolverId> for Resolvers<'r> {
    fn index_mut(&mut self, id: ResolverId) -> &mut Resolver {
        &mut self.resolvers[id]
    }
}

impl<'r> Resolvers<'r> {
    pub fn new(registry: &'r dyn InjectBindingRegistry) -> Resolvers<'r> {
        Resolvers {
            resolvers: vec![],
            registry,
            delegate_stack: RefCell::new(vec![]),
        }
    }

    pub fn add(&mut self, parent: Option<ResolverId>, component: Rc<ComponentDescriptor>) -> ResolverId {
        let path = match parent {
            Some(p) => self[p].path.child(component.ty.clone()),
            None => ComponentPath::root(component.ty.clone()),
        };
        log::debug!("[resolve] new resolver for {}", path);
        let index = DeclarationIndex::for_component(&component);
        let id = self.resolvers.len();
        self.resolvers.push(Resolver {
            parent,
            component,
            path,
            index,
            resolved: OrderedMap::new(),
            cycle_stack: vec![],
            key_depends_cache: FnvHashMap::default(),
            binding_depends_cache: FnvHashMap::default(),
            frozen: false,
        });
        id
    }

    pub fn len(&self) -> usize {
        self.resolvers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }

    /// The resolvers from the root down to `id`.
    pub fn lineage(&self, id: ResolverId) -> Vec<ResolverId> {
        let mut lineage = vec![];
        let mut curr = Some(id);
        while let Some(r) = curr {
            lineage.push(r);
            curr = self[r].parent;
        }
        lineage.reverse();
        lineage
    }

    /// The entry for `key` in `id` or in the nearest ancestor that has one.
    pub fn previously_resolved(&self, id: ResolverId, key: &BindingKey) -> Option<Rc<ResolvedBindings>> {
        let mut curr = Some(id);
        while let Some(r) = curr {
            if let Some(rb) = self[r].resolved.get(key) {
                return Some(Rc::clone(rb));
            }
            curr = self[r].parent;
        }
        None
    }

    /// Ensures an entry satisfying `request` exists in `id` or an ancestor,
    /// resolving the dependencies of every binding admitted along the way.
    pub fn resolve(&mut self, id: ResolverId, request: &DependencyRequest) {
        assert!(
            !self[id].frozen,
            "resolve({}) called on frozen resolver for {}",
            request,
            self[id].path
        );

        let binding_key = request.binding_key();

        // A cycle. The request lower on the stack will finish the entry.
        if self[id].cycle_stack.contains(&binding_key) {
            log::trace!("[resolve] {}: cycle at {}", self[id].path, binding_key);
            return;
        }

        if self[id].resolved.contains_key(&binding_key) {
            return;
        }

        if let Some(parent) = self[id].parent {
            if self.previously_resolved(parent, &binding_key).is_some() {
                // Resolve in the parent first, in case a component between
                // here and the earlier resolution adds contributions or
                // conflicting bindings.
                self.resolve(parent, request);

                if !self[id].index.has_explicit_binding(&binding_key.key)
                    && !self.declares_local_multibindings(id, &binding_key)
                    && !self.depends_on_local_multibindings(id, &binding_key)
                {
                    if let Some(prev) = self.previously_resolved(parent, &binding_key) {
                        log::trace!("[resolve] {}: inheriting {}", self[id].path, binding_key);
                        let inherited = prev.as_inherited_in(&self[id].path);
                        self[id].resolved.insert(binding_key, Rc::new(inherited));
                        return;
                    }
                }
            }
        }

        log::trace!("[resolve] {}: resolving {}", self[id].path, binding_key);
        self[id].cycle_stack.push(binding_key.clone());
        let bindings = self.look_up_bindings(id, request);
        let dependencies = bindings
            .owned_bindings()
            .into_iter()
            .flat_map(|b| b.dependencies.iter().cloned())
            .collect::<Vec<_>>();
        for dependency in dependencies.iter() {
            self.resolve(id, dependency);
        }
        self[id].resolved.insert(binding_key, Rc::new(bindings));
        self[id].cycle_stack.pop();
    }

    /// This resolver's entries plus, projected into this component, every
    /// entry only an ancestor has.
    pub fn resolved_bindings(&self, id: ResolverId) -> OrderedMap<BindingKey, Rc<ResolvedBindings>> {
        let mut snapshot = self[id].resolved.clone();
        if let Some(parent) = self[id].parent {
            for (key, rb) in self.resolved_bindings(parent) {
                if !snapshot.contains_key(&key) {
                    snapshot.insert(key, Rc::new(rb.as_inherited_in(&self[id].path)));
                }
            }
        }
        snapshot
    }

    /// Modules installed by this component and not by any ancestor.
    pub fn owned_modules(&self, id: ResolverId) -> Vec<Rc<ModuleDescriptor>> {
        let mut inherited = vec![];
        let mut curr = self[id].parent;
        while let Some(r) = curr {
            inherited.extend(self[r].component.transitive_modules());
            curr = self[r].parent;
        }
        self[id]
            .component
            .transitive_modules()
            .into_iter()
            .filter(|m| !inherited.contains(m))
            .collect()
    }

    pub fn freeze(&mut self) {
        for r in self.resolvers.iter_mut() {
            r.frozen = true;
        }
    }
}
