use crate::{
    errors::{Diagnostic, DiagnosticKind, Report},
    graph::BindingGraph,
    key::BindingKey,
    utils::join,
};

use super::ValidationOptions;

/// Keys that resolved to nothing. Entries inherited from an ancestor were
/// reported there.
pub fn check(graph: &BindingGraph, options: ValidationOptions, report: &mut Report) {
    let partial = options.ahead_of_time_subcomponents && graph.component().kind.is_subcomponent();
    for rb in graph.owned_entries() {
        if !rb.is_empty() {
            continue;
        }

        let key = &rb.binding_key;
        let requested_by = requesters(graph, key);
        if partial {
            report.push(Diagnostic::note(
                DiagnosticKind::MissingBinding,
                graph.path(),
                Some(key),
                format!("left as an abstract accessor, requested by {}", join(&requested_by, ", ")),
            ));
            continue;
        }

        let reason = if key.is_contribution() {
            "cannot be provided without an injectable constructor or a binding declaration"
        } else {
            "has no injectable members or constructor"
        };
        report.push(Diagnostic::error(
            DiagnosticKind::MissingBinding,
            graph.path(),
            Some(key),
            format!("{}; requested by {}", reason, join(&requested_by, ", ")),
        ));
    }
}

/// Entry points and owned bindings of `graph` that request `key`.
fn requesters(graph: &BindingGraph, key: &BindingKey) -> Vec<String> {
    let mut out = vec![];
    for m in graph.component().methods.iter() {
        if m.request.as_ref().map_or(false, |r| r.binding_key() == *key) {
            out.push(format!("{}.{}()", graph.component().ty, m.name));
        }
    }
    for rb in graph.owned_entries() {
        for b in rb.owned_bindings() {
            if b.dependencies.iter().any(|d| d.binding_key() == *key) {
                out.push(b.describe());
            }
        }
    }
    if out.is_empty() {
        out.push(str!("nothing"));
    }
    out
}
