#![cfg(test)]

mod utils;

use stiletto::{
    errors::{DiagnosticKind, Severity},
    validation::ValidationOptions,
};
use utils::*;

fn kinds(src: &str, options: ValidationOptions) -> Vec<DiagnosticKind> {
    check_src(src, options)
        .diagnostics()
        .iter()
        .filter(|d| d.is_error())
        .map(|d| d.kind)
        .collect()
}

#[test]
fn test_coffee_shop_is_valid() {
    let report = check_src(include_str!("fixtures/coffee.json"), ValidationOptions::default());
    assert!(report.is_empty(), "unexpected diagnostics: {:?}", report.diagnostics());
}

#[test]
fn test_missing_binding() {
    let report = check_src(
        r#"{
            "injectables": [{ "type": "Foo", "deps": ["String"] }],
            "components": [{ "type": "R", "entry_points": [{ "name": "foo", "type": "Foo" }] }]
        }"#,
        ValidationOptions::default(),
    );
    let missing = report.of_kind(DiagnosticKind::MissingBinding).collect::<Vec<_>>();
    assert_eq!(missing.len(), 1);
    assert_eq!(missing[0].key, Some(contribution("String")));
    assert!(missing[0].msg.contains("Foo"), "{}", missing[0].msg);
}

const PARTIAL_SUBCOMPONENT: &str = r#"{
    "injectables": [{ "type": "Foo", "deps": ["String"] }],
    "components": [
        { "type": "P", "subcomponents": [{ "method": "c", "component": "C" }] },
        { "type": "C", "kind": "subcomponent", "entry_points": [{ "name": "foo", "type": "Foo" }] }
    ]
}"#;

#[test]
fn test_missing_binding_in_subcomponent() {
    assert_eq!(
        kinds(PARTIAL_SUBCOMPONENT, ValidationOptions::default()),
        vec![DiagnosticKind::MissingBinding]
    );
}

#[test]
fn test_ahead_of_time_subcomponents_get_abstract_accessors() {
    let options = ValidationOptions {
        ahead_of_time_subcomponents: true,
    };
    let report = check_src(PARTIAL_SUBCOMPONENT, options);
    assert!(!report.has_errors());
    let notes = report.of_kind(DiagnosticKind::MissingBinding).collect::<Vec<_>>();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].severity, Severity::Note);
}

#[test]
fn test_duplicate_bindings() {
    let src = r#"{
        "modules": [{
            "type": "M",
            "provides": [
                { "name": "a", "type": "Foo" },
                { "name": "b", "type": "Foo" }
            ]
        }],
        "components": [{ "type": "R", "modules": ["M"], "entry_points": [{ "name": "foo", "type": "Foo" }] }]
    }"#;
    assert_eq!(kinds(src, ValidationOptions::default()), vec![DiagnosticKind::DuplicateBinding]);
}

#[test]
fn test_conflicting_ownership() {
    let src = r#"{
        "modules": [
            { "type": "PModule", "provides": [{ "name": "foo", "type": "Foo" }] },
            { "type": "CModule", "provides": [{ "name": "foo", "type": "Foo" }] }
        ],
        "components": [
            { "type": "P", "modules": ["PModule"], "subcomponents": [{ "method": "c", "component": "C" }] },
            {
                "type": "C",
                "kind": "subcomponent",
                "modules": ["CModule"],
                "entry_points": [{ "name": "foo", "type": "Foo" }]
            }
        ]
    }"#;
    let report = check_src(src, ValidationOptions::default());
    let conflicts = report.of_kind(DiagnosticKind::ConflictingOwnership).collect::<Vec<_>>();
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].key, Some(contribution("Foo")));
}

#[test]
fn test_multibindings_are_not_duplicates() {
    let src = r#"{
        "modules": [{
            "type": "M",
            "provides": [
                { "name": "a", "type": "Foo", "into": "set" },
                { "name": "b", "type": "Foo", "into": "set" }
            ]
        }],
        "components": [{ "type": "R", "modules": ["M"], "entry_points": [{ "name": "foos", "type": "Set<Foo>" }] }]
    }"#;
    assert!(kinds(src, ValidationOptions::default()).is_empty());
}

#[test]
fn test_invalid_cycle() {
    let src = r#"{
        "injectables": [
            { "type": "A", "deps": ["B"] },
            { "type": "B", "deps": ["A"] }
        ],
        "components": [{ "type": "R", "entry_points": [{ "name": "a", "type": "A" }] }]
    }"#;
    let report = check_src(src, ValidationOptions::default());
    let cycles = report.of_kind(DiagnosticKind::InvalidCycle).collect::<Vec<_>>();
    assert_eq!(cycles.len(), 1);
    assert!(cycles[0].msg.contains("A") && cycles[0].msg.contains("B"));
}

#[test]
fn test_lazy_cycle_is_valid() {
    let src = r#"{
        "injectables": [
            { "type": "A", "deps": ["B"] },
            { "type": "B", "deps": ["Lazy<A>"] }
        ],
        "components": [{ "type": "R", "entry_points": [{ "name": "a", "type": "A" }] }]
    }"#;
    assert!(kinds(src, ValidationOptions::default()).is_empty());
}

#[test]
fn test_unscoped_component_with_scoped_binding() {
    let src = r#"{
        "injectables": [{ "type": "Db", "scope": "@Singleton" }],
        "components": [{ "type": "R", "entry_points": [{ "name": "db", "type": "Db" }] }]
    }"#;
    assert_eq!(
        kinds(src, ValidationOptions::default()),
        vec![DiagnosticKind::UnscopedComponentScopedBinding]
    );
}

#[test]
fn test_incompatibly_scoped_binding() {
    let src = r#"{
        "injectables": [{ "type": "Session", "scope": "@RequestScope" }],
        "components": [{
            "type": "R",
            "scopes": ["@Singleton"],
            "entry_points": [{ "name": "session", "type": "Session" }]
        }]
    }"#;
    assert_eq!(
        kinds(src, ValidationOptions::default()),
        vec![DiagnosticKind::IncompatiblyScopedBinding]
    );
}

#[test]
fn test_scoped_binding_owned_by_scoped_ancestor() {
    let src = r#"{
        "injectables": [{ "type": "Db", "scope": "@Singleton" }],
        "components": [
            { "type": "P", "scopes": ["@Singleton"], "subcomponents": [{ "method": "c", "component": "C" }] },
            { "type": "C", "kind": "subcomponent", "entry_points": [{ "name": "db", "type": "Db" }] }
        ]
    }"#;
    assert!(kinds(src, ValidationOptions::default()).is_empty());

    let graph = resolve_one(src);
    let db = entry(graph.subgraph("c").unwrap(), "Db");
    assert_eq!(db.owners(), vec![graph.path()]);
}

#[test]
fn test_repeated_scope() {
    let src = r#"{
        "components": [
            { "type": "P", "scopes": ["@Singleton"], "subcomponents": [{ "method": "c", "component": "C" }] },
            { "type": "C", "kind": "subcomponent", "scopes": ["@Singleton"] }
        ]
    }"#;
    assert_eq!(kinds(src, ValidationOptions::default()), vec![DiagnosticKind::RepeatedScope]);
}

#[test]
fn test_reports_every_problem() {
    let src = r#"{
        "injectables": [
            { "type": "A", "deps": ["B", "Missing"] },
            { "type": "B", "deps": ["A"] },
            { "type": "Db", "scope": "@Singleton" }
        ],
        "components": [{
            "type": "R",
            "entry_points": [{ "name": "a", "type": "A" }, { "name": "db", "type": "Db" }]
        }]
    }"#;
    let mut found = kinds(src, ValidationOptions::default());
    found.sort();
    assert_eq!(
        found,
        vec![
            DiagnosticKind::MissingBinding,
            DiagnosticKind::InvalidCycle,
            DiagnosticKind::UnscopedComponentScopedBinding,
        ]
    );
}

#[test]
fn test_missing_delegate_target_is_reported_once() {
    let src = r#"{
        "modules": [{
            "type": "HeaterModule",
            "abstract": true,
            "binds": [{ "name": "bindHeater", "type": "Heater", "target": "ElectricHeater" }]
        }],
        "components": [{
            "type": "R",
            "modules": ["HeaterModule"],
            "entry_points": [{ "name": "heater", "type": "Heater" }]
        }]
    }"#;
    let report = check_src(src, ValidationOptions::default());
    let missing = report.of_kind(DiagnosticKind::MissingBinding).collect::<Vec<_>>();
    assert_eq!(missing.len(), 1);
    assert_eq!(missing[0].key, Some(contribution("ElectricHeater")));
    assert!(missing[0].msg.contains("Heater"), "{}", missing[0].msg);
}

const LATE_CONTRIBUTION: &str = r#"{
    "modules": [{ "type": "CModule", "provides": [{ "name": "c", "type": "Foo", "into": "set" }] }],
    "components": [
        { "type": "R", "subcomponents": [{ "method": "p", "component": "P" }] },
        {
            "type": "P",
            "kind": "subcomponent",
            "entry_points": [{ "name": "foos", "type": "Set<Foo>" }],
            "subcomponents": [{ "method": "c", "component": "C" }]
        },
        {
            "type": "C",
            "kind": "subcomponent",
            "modules": ["CModule"],
            "entry_points": [{ "name": "foos", "type": "Set<Foo>" }]
        }
    ]
}"#;

#[test]
fn test_ahead_of_time_keeps_nested_contributions() {
    let options = ValidationOptions {
        ahead_of_time_subcomponents: true,
    };
    let report = check_src(LATE_CONTRIBUTION, options);
    assert!(!report.has_errors());
    let notes = report.of_kind(DiagnosticKind::MissingBinding).collect::<Vec<_>>();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].component.depth(), 1);

    let graph = resolve_one(LATE_CONTRIBUTION);
    let c = graph.subgraph("p").unwrap().subgraph("c").unwrap();
    let set = entry(c, "Set<Foo>").contribution_binding().unwrap();
    assert_eq!(set.dependencies.len(), 1);
}
