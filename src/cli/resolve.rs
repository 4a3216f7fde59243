use std::time::Instant;

use anyhow::Context;

use crate::{
    driver::{Driver, ResolveOptions},
    graph::{summary::GraphSummary, BindingGraph},
    utils::{indent, join},
};

pub(super) fn action(driver: &mut Driver, options: ResolveOptions) -> anyhow::Result<()> {
    let start_time = Instant::now();
    log::info!("Resolving {}...", options.manifest.display());
    let graphs = match driver.resolve_manifest(&options) {
        Ok(graphs) => graphs,
        Err(errs) => {
            driver.emit_errors(errs);
            log::error!("{} errors emitted", driver.errors_emitted);
            return Ok(());
        }
    };

    if options.json {
        let summaries = graphs.iter().map(GraphSummary::from).collect::<Vec<_>>();
        let json = serde_json::to_string_pretty(&summaries).context("could not serialize the graph summary")?;
        println!("{}", json);
    } else {
        for graph in graphs.iter() {
            println!("{}", render(graph));
        }
    }

    log::info!("Resolved in {:?}", start_time.elapsed());
    Ok(())
}

/// A tree of the keys each component owns, with their bindings.
pub(super) fn render(graph: &BindingGraph) -> String {
    let component = graph.component();
    let mut out = if component.is_unscoped() {
        format!("{} {}", component.kind, component.ty)
    } else {
        format!("{} {} {}", component.kind, component.ty, join(&component.scopes, " "))
    };

    for rb in graph.owned_entries() {
        out.push('\n');
        if rb.is_empty() {
            out.push_str(&format!("  {} => <missing>", rb.binding_key));
            continue;
        }
        let bindings = rb
            .bindings()
            .map(|b| match rb.owning_component_of(b) {
                Some(owner) if owner != graph.path() => format!("{} (from {})", b.describe(), owner),
                _ => b.describe(),
            })
            .collect::<Vec<_>>();
        out.push_str(&format!("  {} => {}", rb.binding_key, join(&bindings, ", ")));
    }

    for (method, sub) in graph.subgraphs().iter() {
        out.push_str(&format!("\n  {}():\n", method.name));
        out.push_str(&indent(render(sub), 2));
    }
    out
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::{binding::InjectBindingRegistry, manifest, resolve::BindingGraphFactory};

    #[test]
    fn render_nests_subcomponents() {
        let decls = manifest::from_str(
            r#"{
                "injectables": [{ "type": "Foo", "scope": "@Singleton" }],
                "components": [
                    {
                        "type": "App",
                        "scopes": ["@Singleton"],
                        "subcomponents": [{ "method": "child", "component": "Child" }]
                    },
                    { "type": "Child", "kind": "subcomponent", "entry_points": [{ "name": "foo", "type": "Foo" }] }
                ]
            }"#,
        )
        .unwrap();
        let registry: &dyn InjectBindingRegistry = &decls.registry;
        let graph = BindingGraphFactory::new(registry).create(Rc::clone(&decls.components[0]));

        let out = render(&graph);
        let lines = out.lines().collect::<Vec<_>>();
        assert_eq!(lines[0], "component App @Singleton");
        assert_eq!(lines[1], "  Foo => @Singleton injection Foo");
        assert_eq!(lines[2], "  child():");
        assert_eq!(lines[3], "    subcomponent Child");
        assert_eq!(lines[4], "      Foo => @Singleton injection Foo (from App)");
    }
}
