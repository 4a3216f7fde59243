#![cfg(test)]

use stiletto::{
    driver::Driver,
    errors::Report,
    graph::BindingGraph,
    key::{BindingKey, Key},
    manifest::{self, Declarations},
    resolve::ResolvedBindings,
    ty::{parse::parse_annotated, Ty},
    validation::{self, ValidationOptions},
};

#[allow(dead_code)]
pub fn enable_debug_logs() {
    fern::Dispatch::new()
        .level(log::LevelFilter::Debug)
        .chain(std::io::stderr())
        .apply()
        .unwrap();
}

#[allow(dead_code)]
pub fn ty(src: &str) -> Ty {
    Ty::parse(src).unwrap_or_else(|e| panic!("bad type `{}`: {}", src, e))
}

pub fn key(src: &str) -> Key {
    let (qualifier, ty) = parse_annotated(src, None).unwrap_or_else(|e| panic!("bad key `{}`: {}", src, e));
    Key::qualified(qualifier, ty)
}

#[allow(dead_code)]
pub fn contribution(src: &str) -> BindingKey {
    BindingKey::contribution(key(src))
}

pub fn load_src(src: &str) -> Declarations {
    manifest::from_str(src).unwrap_or_else(|e| panic!("manifest should load: {}", e))
}

/// Resolves every top-level component of the manifest.
pub fn resolve_src(src: &str) -> Vec<BindingGraph> {
    let decls = load_src(src);
    Driver::new()
        .resolve(&decls, None)
        .unwrap_or_else(|errs| panic!("resolution failed: {:?}", errs))
}

/// Resolves a manifest with exactly one top-level component.
#[allow(dead_code)]
pub fn resolve_one(src: &str) -> BindingGraph {
    let mut graphs = resolve_src(src);
    assert_eq!(graphs.len(), 1, "expected a single top-level component");
    graphs.remove(0)
}

#[allow(dead_code)]
pub fn check_src(src: &str, options: ValidationOptions) -> Report {
    let mut report = Report::new();
    for graph in resolve_src(src).iter() {
        report.extend(validation::validate(graph, options).diagnostics().iter().cloned());
    }
    report
}

#[allow(dead_code)]
pub fn entry<'g>(graph: &'g BindingGraph, src: &str) -> &'g ResolvedBindings {
    graph
        .contribution(&key(src))
        .unwrap_or_else(|| panic!("{} has no entry for {}", graph.path(), src))
}
