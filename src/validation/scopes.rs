use crate::{
    component::ComponentDescriptor,
    errors::{Diagnostic, DiagnosticKind, Report},
    graph::BindingGraph,
    scope::Scope,
    utils::join,
};

pub fn check(graph: &BindingGraph, ancestors: &[&ComponentDescriptor], report: &mut Report) {
    let component = graph.component();

    for scope in component.scopes.iter() {
        if let Some(ancestor) = ancestors.iter().find(|a| a.has_scope(scope)) {
            report.push(Diagnostic::error(
                DiagnosticKind::RepeatedScope,
                graph.path(),
                None,
                format!("{} has the same scope as its ancestor {}: {}", component.ty, ancestor.ty, scope),
            ));
        }
    }

    let mut scopes = component.scopes.clone();
    if component.kind.is_production() {
        scopes.push(Scope::production_scope());
    }

    for rb in graph.owned_entries() {
        for b in rb.owned_bindings() {
            let scope = unless!(&b.scope, else continue);
            if scope.is_reusable() || scopes.contains(scope) {
                continue;
            }
            let diagnostic = if component.is_unscoped() {
                Diagnostic::error(
                    DiagnosticKind::UnscopedComponentScopedBinding,
                    graph.path(),
                    Some(&rb.binding_key),
                    format!("unscoped {} may not reference scoped binding {}", component.kind, b.describe()),
                )
            } else {
                Diagnostic::error(
                    DiagnosticKind::IncompatiblyScopedBinding,
                    graph.path(),
                    Some(&rb.binding_key),
                    format!(
                        "{} scoped with {} may not reference {}",
                        component.ty,
                        join(&component.scopes, " "),
                        b.describe()
                    ),
                )
            };
            report.push(diagnostic);
        }
    }
}
