use serde::Serialize;

use crate::{binding::Binding, resolve::ResolvedBindings};

use super::BindingGraph;

/// A serializable view of a binding graph, for the `--json` output.
#[derive(Debug, Serialize)]
pub struct GraphSummary {
    pub component: String,
    pub path: String,
    pub kind: String,
    pub scopes: Vec<String>,
    pub owned_modules: Vec<String>,
    pub component_requirements: Vec<String>,
    pub bindings: Vec<EntrySummary>,
    pub initialization_order: Vec<String>,
    pub subcomponents: Vec<SubgraphSummary>,
}

#[derive(Debug, Serialize)]
pub struct SubgraphSummary {
    pub method: String,
    pub graph: GraphSummary,
}

#[derive(Debug, Serialize)]
pub struct EntrySummary {
    pub key: String,
    pub inherited: bool,
    pub multibinding: bool,
    pub contributions: Vec<BindingSummary>,
}

#[derive(Debug, Serialize)]
pub struct BindingSummary {
    pub kind: String,
    pub owner: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub declared_by: Option<String>,
    pub dependencies: Vec<String>,
}

impl BindingSummary {
    fn new(owner: String, b: &Binding) -> BindingSummary {
        let declared_by = match (&b.contributing_module, &b.element) {
            (Some(m), Some(e)) => Some(format!("{}.{}", m, e)),
            (Some(m), None) => Some(m.to_string()),
            (None, e) => e.clone(),
        };
        BindingSummary {
            kind: b.kind.to_string(),
            owner,
            scope: b.scope.as_ref().map(|s| s.to_string()),
            declared_by,
            dependencies: b.dependencies.iter().map(|d| d.to_string()).collect(),
        }
    }
}

impl From<&ResolvedBindings> for EntrySummary {
    fn from(rb: &ResolvedBindings) -> EntrySummary {
        let mut contributions = rb
            .contributions()
            .iter()
            .map(|(owner, b)| BindingSummary::new(owner.to_string(), b))
            .collect::<Vec<_>>();
        if let Some(b) = rb.members_injection_binding() {
            contributions.push(BindingSummary::new(rb.component.to_string(), b));
        }
        EntrySummary {
            key: rb.binding_key.to_string(),
            inherited: rb.is_inherited(),
            multibinding: rb.is_multibinding(),
            contributions,
        }
    }
}

impl From<&BindingGraph> for GraphSummary {
    fn from(g: &BindingGraph) -> GraphSummary {
        let c = g.component();
        GraphSummary {
            component: c.ty.to_string(),
            path: g.path().to_string(),
            kind: c.kind.to_string(),
            scopes: c.scopes.iter().map(|s| s.to_string()).collect(),
            owned_modules: g.owned_modules().iter().map(|m| m.ty.to_string()).collect(),
            component_requirements: g.component_requirements().iter().map(|t| t.to_string()).collect(),
            bindings: g.resolved_bindings().values().map(|rb| EntrySummary::from(rb.as_ref())).collect(),
            initialization_order: g
                .dependency_graph()
                .initialization_order()
                .iter()
                .map(|k| k.to_string())
                .collect(),
            subcomponents: g
                .subgraphs()
                .iter()
                .map(|(m, sub)| SubgraphSummary {
                    method: m.name.clone(),
                    graph: GraphSummary::from(sub),
                })
                .collect(),
        }
    }
}
