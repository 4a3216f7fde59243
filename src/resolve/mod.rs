use std::rc::Rc;

use crate::{
    binding::InjectBindingRegistry,
    collections::OrderedMap,
    component::ComponentDescriptor,
    graph::BindingGraph,
};

mod index;
mod lookup;
mod multibindings;
mod resolved;
mod resolver;

pub use index::DeclarationIndex;
pub use resolved::ResolvedBindings;
pub use resolver::{Resolver, ResolverId, Resolvers};

/// Builds the binding graph of a component tree.
pub struct BindingGraphFactory<'r> {
    registry: &'r dyn InjectBindingRegistry,
}

impl<'r> BindingGraphFactory<'r> {
    pub fn new(registry: &'r dyn InjectBindingRegistry) -> BindingGraphFactory<'r> {
        BindingGraphFactory { registry }
    }

    pub fn create(&self, root: Rc<ComponentDescriptor>) -> BindingGraph {
        log::info!("resolving {}", root.ty);
        let mut resolvers = Resolvers::new(self.registry);
        let graph = create_graph(&mut resolvers, None, root);
        resolvers.freeze();
        graph
    }
}

fn create_graph(
    resolvers: &mut Resolvers<'_>,
    parent: Option<ResolverId>,
    component: Rc<ComponentDescriptor>,
) -> BindingGraph {
    let id = resolvers.add(parent, Rc::clone(&component));
    for request in component.entry_points() {
        resolvers.resolve(id, request);
    }

    let mut subgraphs = OrderedMap::new();
    for (method, subcomponent) in component.subcomponents.iter() {
        let subgraph = create_graph(resolvers, Some(id), Rc::clone(subcomponent));
        subgraphs.insert(method.clone(), subgraph);
    }

    let path = resolvers[id].path.clone();
    let resolved_bindings = resolvers.resolved_bindings(id);
    for rb in resolved_bindings.values() {
        assert!(
            rb.component == path,
            "{} is not owned by {}",
            rb.binding_key,
            path
        );
    }
    log::debug!(
        "[resolve] {}: {} keys, {} subcomponents",
        path,
        resolved_bindings.len(),
        subgraphs.len()
    );

    let owned_modules = resolvers.owned_modules(id);
    BindingGraph::new(component, path, resolved_bindings, subgraphs, owned_modules)
}
