use std::rc::Rc;

use fnv::FnvHashMap;
use petgraph::{
    algo::{tarjan_scc, toposort},
    graph::{DiGraph, NodeIndex},
};

use crate::{
    binding::{Binding, DependencyRequest},
    key::BindingKey,
};

use super::BindingGraph;

/// The request that links a binding to one of its dependencies.
#[derive(Clone, Debug)]
pub struct DependencyEdge {
    pub binding: Rc<Binding>,
    pub request: DependencyRequest,
}

impl DependencyEdge {
    pub fn is_deferred(&self) -> bool {
        self.request.is_deferred()
    }
}

/// Edges from each key owned by a component to the keys its bindings
/// request. Every dependency of an owned binding is owned by the same
/// component or an ancestor, so a cycle never crosses components.
#[derive(Debug, Default)]
pub struct DependencyGraph {
    graph: DiGraph<BindingKey, DependencyEdge>,
    nodes: FnvHashMap<BindingKey, NodeIndex>,
}

impl DependencyGraph {
    pub fn new() -> DependencyGraph {
        DependencyGraph::default()
    }

    pub fn for_graph(g: &BindingGraph) -> DependencyGraph {
        let mut deps = DependencyGraph::new();
        for rb in g.owned_entries() {
            deps.add_node(&rb.binding_key);
            for binding in rb.owned_bindings() {
                for request in binding.dependencies.iter() {
                    deps.add_edge(
                        rb.binding_key.clone(),
                        request.binding_key(),
                        DependencyEdge {
                            binding: Rc::clone(binding),
                            request: request.clone(),
                        },
                    );
                }
            }
        }
        deps
    }

    fn add_node(&mut self, key: &BindingKey) -> NodeIndex {
        if let Some(&idx) = self.nodes.get(key) {
            return idx;
        }
        let idx = self.graph.add_node(key.clone());
        self.nodes.insert(key.clone(), idx);
        idx
    }

    pub fn add_edge<P, S>(&mut self, prec: P, succ: S, value: DependencyEdge)
    where
        P: Into<BindingKey>,
        S: Into<BindingKey>,
    {
        let prec = self.add_node(&prec.into());
        let succ = self.add_node(&succ.into());
        self.graph.add_edge(prec, succ, value);
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// A copy of the graph without deferred edges.
    fn eager(&self) -> DiGraph<BindingKey, DependencyEdge> {
        self.graph.filter_map(
            |_, key| Some(key.clone()),
            |_, edge| if edge.is_deferred() { None } else { Some(edge.clone()) },
        )
    }

    /// Cycles that no deferred request breaks: every strongly connected
    /// component of the eager graph with more than one key, or with a key
    /// that depends on itself.
    pub fn eager_cycles(&self) -> Vec<Vec<BindingKey>> {
        let eager = self.eager();
        tarjan_scc(&eager)
            .into_iter()
            .filter(|scc| scc.len() > 1 || eager.contains_edge(scc[0], scc[0]))
            .map(|scc| {
                let mut keys = scc.into_iter().map(|n| eager[n].clone()).collect::<Vec<_>>();
                keys.sort();
                keys
            })
            .collect()
    }

    /// Keys ordered so that eager dependencies come before their dependents.
    /// Keys on an eager cycle are kept together in an arbitrary order.
    pub fn initialization_order(&self) -> Vec<BindingKey> {
        let eager = self.eager();
        match toposort(&eager, None) {
            Ok(order) => order.into_iter().rev().map(|n| eager[n].clone()).collect(),
            Err(_) => tarjan_scc(&eager)
                .into_iter()
                .flatten()
                .map(|n| eager[n].clone())
                .collect(),
        }
    }
}
