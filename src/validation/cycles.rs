use crate::{
    errors::{Diagnostic, DiagnosticKind, Report},
    graph::BindingGraph,
    utils::join,
};

/// Dependency cycles with no deferred request anywhere along them.
pub fn check(graph: &BindingGraph, report: &mut Report) {
    for cycle in graph.dependency_graph().eager_cycles() {
        let msg = if cycle.len() == 1 {
            format!("{} depends on itself", cycle[0])
        } else {
            format!(
                "found a dependency cycle without a Provider or Lazy request: {}",
                join(&cycle, " -> ")
            )
        };
        report.push(Diagnostic::error(
            DiagnosticKind::InvalidCycle,
            graph.path(),
            cycle.first(),
            msg,
        ));
    }
}
