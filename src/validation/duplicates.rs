use crate::{
    errors::{Diagnostic, DiagnosticKind, Report},
    graph::BindingGraph,
    utils::map_join,
};

/// A key resolved to more than one binding. All bindings owned by one
/// component means the key is bound multiple times; owners that differ
/// means ownership cannot be decided.
pub fn check(graph: &BindingGraph, report: &mut Report) {
    for rb in graph.owned_entries() {
        if rb.contributions().len() < 2 {
            continue;
        }

        let owners = rb.owners();
        let (kind, headline) = if owners.len() == 1 {
            (DiagnosticKind::DuplicateBinding, str!("bound multiple times"))
        } else {
            (
                DiagnosticKind::ConflictingOwnership,
                format!("bound in {} components", owners.len()),
            )
        };
        let bindings = map_join(rb.contributions(), "\n", |(owner, b)| {
            format!("{} (in {})", b.describe(), owner)
        });
        report.push(Diagnostic::error(
            kind,
            graph.path(),
            Some(&rb.binding_key),
            format!("{}:\n{}", headline, bindings),
        ));
    }
}
