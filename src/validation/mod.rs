use serde::Deserialize;

use crate::{
    component::ComponentDescriptor,
    errors::Report,
    graph::BindingGraph,
};

mod cycles;
mod duplicates;
mod missing;
mod scopes;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidationOptions {
    /// Subcomponents are generated ahead of time, without their ancestors;
    /// missing bindings there become abstract accessors, not errors.
    pub ahead_of_time_subcomponents: bool,
}

/// Checks a finished graph and every subgraph, collecting all problems.
pub fn validate(graph: &BindingGraph, options: ValidationOptions) -> Report {
    let mut report = Report::new();
    validate_tree(graph, &[], options, &mut report);
    log::debug!(
        "[validate] {}: {} diagnostics, {} errors",
        graph.path(),
        report.diagnostics().len(),
        report.error_count()
    );
    report
}

fn validate_tree(
    graph: &BindingGraph,
    ancestors: &[&ComponentDescriptor],
    options: ValidationOptions,
    report: &mut Report,
) {
    duplicates::check(graph, report);
    missing::check(graph, options, report);
    cycles::check(graph, report);
    scopes::check(graph, ancestors, report);

    let mut lineage = ancestors.to_vec();
    lineage.push(graph.component());
    for sub in graph.subgraphs().values() {
        validate_tree(sub, &lineage, options, report);
    }
}
