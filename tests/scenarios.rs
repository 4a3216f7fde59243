#![cfg(test)]

mod utils;

use std::rc::Rc;

use stiletto::{
    binding::{BindingKind, BindingType, ContributionType, DependencyRequest, RequestKind},
    component::ComponentPath,
    resolve::Resolvers,
};
use utils::*;

#[test]
fn test_missing_dependency_of_injected_class() {
    let graph = resolve_one(
        r#"{
            "injectables": [{ "type": "Foo", "deps": ["String"] }],
            "components": [{ "type": "R", "entry_points": [{ "name": "foo", "type": "Foo" }] }]
        }"#,
    );

    let string = entry(&graph, "String");
    assert!(string.is_empty());
    assert!(!string.is_inherited());

    let foo = entry(&graph, "Foo");
    let binding = foo.contribution_binding().expect("one binding for Foo");
    assert_eq!(binding.kind, BindingKind::Injection);
    assert_eq!(binding.dependencies.len(), 1);
    assert_eq!(binding.dependencies[0].key, key("String"));
    assert_eq!(foo.owners(), vec![graph.path()]);
}

#[test]
fn test_set_contributions_aggregate() {
    let graph = resolve_one(
        r#"{
            "modules": [{
                "type": "M",
                "provides": [
                    { "name": "a", "type": "String", "into": "set", "static": true },
                    { "name": "b", "type": "String", "into": "set", "static": true }
                ]
            }],
            "components": [{
                "type": "R",
                "modules": ["M"],
                "entry_points": [{ "name": "strings", "type": "Set<String>" }]
            }]
        }"#,
    );

    let strings = entry(&graph, "Set<String>");
    assert_eq!(strings.contributions().len(), 1);
    let set = strings.contribution_binding().unwrap();
    assert_eq!(set.kind, BindingKind::MultiboundSet);
    assert_eq!(set.dependencies.len(), 2);
    for dep in set.dependencies.iter() {
        assert_eq!(dep.kind, RequestKind::Instance);
        assert!(dep.key.is_contribution());
        assert_eq!(dep.key.without_contribution(), key("Set<String>"));
    }
    assert_ne!(set.dependencies[0].key, set.dependencies[1].key);

    // each contribution was resolved too
    for dep in set.dependencies.iter() {
        let rb = graph.contribution(&dep.key).unwrap();
        assert_eq!(rb.contribution_binding().unwrap().kind, BindingKind::Provision);
    }
}

#[test]
fn test_subcomponent_binding_resolves_locally() {
    let graph = resolve_one(
        r#"{
            "modules": [{ "type": "CModule", "provides": [{ "name": "foo", "type": "Foo" }] }],
            "components": [
                { "type": "P", "subcomponents": [{ "method": "c", "component": "C" }] },
                {
                    "type": "C",
                    "kind": "subcomponent",
                    "modules": ["CModule"],
                    "entry_points": [{ "name": "foo", "type": "Foo" }]
                }
            ]
        }"#,
    );

    assert!(graph.contribution(&key("Foo")).is_none());

    let child = graph.subgraph("c").unwrap();
    let c_path = ComponentPath::root(ty("P")).child(ty("C"));
    assert_eq!(child.path(), &c_path);

    let foo = entry(child, "Foo");
    assert!(!foo.is_inherited());
    assert_eq!(foo.owners(), vec![&c_path]);
    let binding = foo.contribution_binding().unwrap();
    assert_eq!(binding.contributing_module.as_ref().map(|m| m.to_string()), Some("CModule".to_string()));
    assert!(child.owned_modules().iter().any(|m| m.ty == ty("CModule")));
}

const NESTED_SET: &str = r#"{
    "modules": [
        { "type": "PModule", "provides": [{ "name": "p", "type": "Foo", "into": "set" }] },
        { "type": "CModule", "provides": [{ "name": "c", "type": "Foo", "into": "set" }] }
    ],
    "components": [
        {
            "type": "P",
            "modules": ["PModule"],
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
fn test_local_set_contribution_in_subcomponent() {
    let graph = resolve_one(NESTED_SET);
    let p_path = ComponentPath::root(ty("P"));
    let c_path = p_path.child(ty("C"));

    let parent_set = entry(&graph, "Set<Foo>").contribution_binding().unwrap().clone();
    assert_eq!(parent_set.dependencies.len(), 1);

    let child = graph.subgraph("c").unwrap();
    let foos = entry(child, "Set<Foo>");
    assert!(!foos.is_inherited());
    assert_eq!(foos.owners(), vec![&c_path]);
    let child_set = foos.contribution_binding().unwrap();
    assert_eq!(child_set.kind, BindingKind::MultiboundSet);
    assert_eq!(child_set.dependencies.len(), 2);

    // the parent's own contribution stays with the parent
    let from_parent = child
        .resolved(&child_set.dependencies[0].binding_key())
        .expect("parent contribution visible in child");
    assert!(from_parent.is_inherited());
    assert_eq!(from_parent.owners(), vec![&p_path]);

    let local = child.resolved(&child_set.dependencies[1].binding_key()).unwrap();
    assert!(!local.is_inherited());
    assert_eq!(local.owners(), vec![&c_path]);
}

#[test]
fn test_provider_breaks_constructor_cycle() {
    let graph = resolve_one(
        r#"{
            "injectables": [
                { "type": "A", "deps": ["B"] },
                { "type": "B", "deps": ["Provider<A>"] }
            ],
            "components": [{ "type": "R", "entry_points": [{ "name": "a", "type": "A" }] }]
        }"#,
    );

    let a = entry(&graph, "A").contribution_binding().unwrap();
    assert_eq!(a.dependencies[0].key, key("B"));

    let b = entry(&graph, "B").contribution_binding().unwrap();
    assert_eq!(b.dependencies.len(), 1);
    assert_eq!(b.dependencies[0].kind, RequestKind::Provider);
    assert_eq!(b.dependencies[0].key, key("A"));
    assert!(b.dependencies[0].is_deferred());

    assert!(graph.dependency_graph().eager_cycles().is_empty());
}

#[test]
fn test_resolve_is_idempotent() {
    let decls = load_src(
        r#"{
            "injectables": [
                { "type": "A", "deps": ["B", "Lazy<C>"] },
                { "type": "B", "deps": ["C"] },
                { "type": "C" }
            ],
            "components": [{ "type": "R" }]
        }"#,
    );
    let root = Rc::clone(&decls.components[0]);
    let mut resolvers = Resolvers::new(&decls.registry);
    let id = resolvers.add(None, root);

    let request = DependencyRequest::instance(key("A"));
    resolvers.resolve(id, &request);
    let first = resolvers.resolved_bindings(id);
    assert_eq!(first.len(), 3);

    resolvers.resolve(id, &request);
    resolvers.resolve(id, &DependencyRequest::new(RequestKind::Provider, key("A")));
    assert_eq!(resolvers.resolved_bindings(id), first);
}

#[test]
#[should_panic]
fn test_frozen_resolvers_reject_requests() {
    let decls = load_src(r#"{ "components": [{ "type": "R" }] }"#);
    let mut resolvers = Resolvers::new(&decls.registry);
    let id = resolvers.add(None, Rc::clone(&decls.components[0]));
    resolvers.freeze();
    resolvers.resolve(id, &DependencyRequest::instance(key("A")));
}

#[test]
fn test_owners_are_ancestors() {
    let graph = resolve_one(include_str!("fixtures/coffee.json"));
    let mut checked = 0;
    for g in graph.preorder() {
        for rb in g.resolved_bindings().values() {
            assert_eq!(&rb.component, g.path());
            for owner in rb.owners() {
                assert!(
                    owner.is_ancestor_or_self_of(g.path()),
                    "{} owned by {} is requested in {}",
                    rb.binding_key,
                    owner,
                    g.path()
                );
                checked += 1;
            }
        }
    }
    assert!(checked > 0);
}

#[test]
fn test_child_inherits_parent_resolution() {
    let graph = resolve_one(
        r#"{
            "injectables": [
                { "type": "Foo", "deps": ["Bar"] },
                { "type": "Bar" }
            ],
            "components": [
                {
                    "type": "P",
                    "entry_points": [{ "name": "foo", "type": "Foo" }],
                    "subcomponents": [{ "method": "c", "component": "C" }]
                },
                { "type": "C", "kind": "subcomponent", "entry_points": [{ "name": "foo", "type": "Foo" }] }
            ]
        }"#,
    );

    let parent = entry(&graph, "Foo");
    let child_graph = graph.subgraph("c").unwrap();
    let child = entry(child_graph, "Foo");
    assert!(child.is_inherited());
    assert_eq!(child.contributions(), parent.contributions());
    assert_eq!(&child.component, child_graph.path());

    // nothing in the child is owned there
    assert_eq!(child_graph.owned_entries().count(), 0);
}

#[test]
fn test_cycles_terminate() {
    let graph = resolve_one(
        r#"{
            "injectables": [
                { "type": "A", "deps": ["Provider<B>"] },
                { "type": "B", "deps": ["C"] },
                { "type": "C", "deps": ["A", "Lazy<C>"] },
                { "type": "D", "deps": ["D"] }
            ],
            "components": [{
                "type": "R",
                "entry_points": [{ "name": "a", "type": "A" }, { "name": "d", "type": "D" }]
            }]
        }"#,
    );

    for name in ["A", "B", "C", "D"].iter() {
        let rb = entry(&graph, name);
        assert_eq!(rb.contributions().len(), 1, "{} should have one binding", name);
    }
    assert_eq!(graph.dependency_graph().eager_cycles(), vec![vec![contribution("D")]]);
}

fn set_dependencies(modules: &str) -> Vec<String> {
    let src = format!(
        r#"{{
            "modules": [
                {{ "type": "A", "provides": [{{ "name": "a", "type": "Foo", "into": "set" }}] }},
                {{ "type": "B", "provides": [{{ "name": "b", "type": "Foo", "into": "set" }}] }}
            ],
            "components": [{{
                "type": "R",
                "modules": {},
                "entry_points": [{{ "name": "foos", "type": "Set<Foo>" }}]
            }}]
        }}"#,
        modules
    );
    let graph = resolve_one(&src);
    let set = entry(&graph, "Set<Foo>").contribution_binding().unwrap().clone();
    let mut deps = set.dependencies.iter().map(|d| d.key.to_string()).collect::<Vec<_>>();
    deps.sort();
    deps
}

#[test]
fn test_set_aggregation_ignores_module_order() {
    let forward = set_dependencies(r#"["A", "B"]"#);
    let backward = set_dependencies(r#"["B", "A"]"#);
    assert_eq!(forward.len(), 2);
    assert_eq!(forward, backward);
}

#[test]
fn test_map_aggregation_is_repeatable() {
    let src = r#"{
        "modules": [{
            "type": "M",
            "provides": [
                { "name": "espresso", "type": "Coffee", "into": "map", "map_key": { "type": "String", "value": "\"espresso\"" } },
                { "name": "latte", "type": "Coffee", "into": "map", "map_key": { "type": "String", "value": "\"latte\"" } }
            ]
        }],
        "components": [{
            "type": "R",
            "modules": ["M"],
            "entry_points": [{ "name": "menu", "type": "Map<String, Coffee>" }]
        }]
    }"#;

    let order = |graph: &stiletto::graph::BindingGraph| {
        let providers = entry(graph, "Map<String, Provider<Coffee>>");
        providers.contribution_binding().unwrap().dependencies.clone()
    };
    let first = resolve_one(src);
    let second = resolve_one(src);
    assert_eq!(order(&first), order(&second));
    assert_eq!(order(&first).len(), 2);
    assert!(order(&first).iter().all(|d| d.kind == RequestKind::Provider));

    let values = entry(&first, "Map<String, Coffee>").contribution_binding().unwrap();
    assert_eq!(values.kind, BindingKind::MapOfValues);
    assert_eq!(values.dependencies[0].key, key("Map<String, Provider<Coffee>>"));
}

const REUSABLE_PLUGINS: &str = r#"{
    "injectables": [{ "type": "Registry", "scope": "@Reusable", "deps": ["Set<Plugin>"] }],
    "modules": [
        { "type": "PModule", "provides": [{ "name": "core", "type": "Plugin", "into": "set" }] },
        { "type": "CModule", "provides": [{ "name": "extra", "type": "Plugin", "into": "set" }] }
    ],
    "components": [
        {
            "type": "P",
            "modules": ["PModule"],
            "entry_points": [{ "name": "registry", "type": "Registry" }],
            "subcomponents": [
                { "method": "plain", "component": "Plain" },
                { "method": "extended", "component": "Extended" }
            ]
        },
        { "type": "Plain", "kind": "subcomponent", "entry_points": [{ "name": "registry", "type": "Registry" }] },
        {
            "type": "Extended",
            "kind": "subcomponent",
            "modules": ["CModule"],
            "entry_points": [{ "name": "registry", "type": "Registry" }]
        }
    ]
}"#;

#[test]
fn test_reusable_binding_stays_in_outermost_component() {
    let graph = resolve_one(REUSABLE_PLUGINS);
    let plain = graph.subgraph("plain").unwrap();
    let registry = entry(plain, "Registry");
    assert!(registry.is_inherited());
    assert_eq!(registry.owners(), vec![graph.path()]);
}

#[test]
fn test_local_multibindings_win_over_reusable_ownership() {
    let graph = resolve_one(REUSABLE_PLUGINS);
    let extended = graph.subgraph("extended").unwrap();
    let registry = entry(extended, "Registry");
    assert!(!registry.is_inherited());
    assert_eq!(registry.owners(), vec![extended.path()]);

    let plugins = entry(extended, "Set<Plugin>");
    assert_eq!(plugins.contribution_binding().unwrap().dependencies.len(), 2);
    assert_eq!(entry(&graph, "Set<Plugin>").contribution_binding().unwrap().dependencies.len(), 1);
}

#[test]
fn test_delegates_wrap_their_targets() {
    let graph = resolve_one(
        r#"{
            "injectables": [{ "type": "ElectricHeater" }],
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
        }"#,
    );

    let heater = entry(&graph, "Heater").contribution_binding().unwrap();
    assert_eq!(heater.kind, BindingKind::Delegate);
    assert_eq!(heater.dependencies[0].key, key("ElectricHeater"));
    assert_eq!(
        entry(&graph, "ElectricHeater").contribution_binding().unwrap().kind,
        BindingKind::Injection
    );
}

#[test]
fn test_child_contributes_to_set_missing_in_parent() {
    let graph = resolve_one(
        r#"{
            "modules": [{ "type": "CModule", "provides": [{ "name": "c", "type": "Foo", "into": "set" }] }],
            "components": [
                {
                    "type": "P",
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
        }"#,
    );
    assert!(entry(&graph, "Set<Foo>").is_empty());

    let child = graph.subgraph("c").unwrap();
    let foos = entry(child, "Set<Foo>");
    assert!(!foos.is_inherited());
    assert_eq!(foos.owners(), vec![child.path()]);
    let set = foos.contribution_binding().unwrap();
    assert_eq!(set.kind, BindingKind::MultiboundSet);
    assert_eq!(set.dependencies.len(), 1);
    assert_eq!(set.dependencies[0].key.without_contribution(), key("Set<Foo>"));
}

#[test]
fn test_child_contributes_to_map_missing_in_parent() {
    let graph = resolve_one(
        r#"{
            "modules": [{
                "type": "CModule",
                "provides": [
                    { "name": "mocha", "type": "Coffee", "into": "map", "map_key": { "type": "String", "value": "\"mocha\"" } }
                ]
            }],
            "components": [
                {
                    "type": "P",
                    "entry_points": [{ "name": "menu", "type": "Map<String, Coffee>" }],
                    "subcomponents": [{ "method": "c", "component": "C" }]
                },
                {
                    "type": "C",
                    "kind": "subcomponent",
                    "modules": ["CModule"],
                    "entry_points": [{ "name": "menu", "type": "Map<String, Coffee>" }]
                }
            ]
        }"#,
    );
    assert!(entry(&graph, "Map<String, Coffee>").is_empty());

    let child = graph.subgraph("c").unwrap();
    let menu = entry(child, "Map<String, Coffee>");
    assert!(!menu.is_inherited());
    let values = menu.contribution_binding().unwrap();
    assert_eq!(values.kind, BindingKind::MapOfValues);
    assert_eq!(values.dependencies[0].key, key("Map<String, Provider<Coffee>>"));

    let providers = entry(child, "Map<String, Provider<Coffee>>");
    assert_eq!(providers.owners(), vec![child.path()]);
    assert_eq!(providers.contribution_binding().unwrap().dependencies.len(), 1);
}

#[test]
fn test_producer_map_request_sees_provider_contributions() {
    let graph = resolve_one(
        r#"{
            "modules": [{
                "type": "M",
                "provides": [
                    { "name": "espresso", "type": "Coffee", "into": "map", "map_key": { "type": "String", "value": "\"espresso\"" } }
                ]
            }],
            "components": [{
                "type": "R",
                "modules": ["M"],
                "entry_points": [{ "name": "menu", "type": "Map<String, Producer<Coffee>>" }]
            }]
        }"#,
    );

    let map = entry(&graph, "Map<String, Producer<Coffee>>").contribution_binding().unwrap();
    assert_eq!(map.kind, BindingKind::MultiboundMap);
    assert_eq!(map.binding_type, BindingType::Production);
    assert_eq!(map.dependencies.len(), 1);
    let dep = &map.dependencies[0];
    assert_eq!(dep.kind, RequestKind::Provider);
    assert_eq!(dep.key.without_contribution(), key("Map<String, Provider<Coffee>>"));
    assert_eq!(
        graph.contribution(&dep.key).unwrap().contribution_binding().unwrap().kind,
        BindingKind::Provision
    );
}

#[test]
fn test_produced_set_request_aggregates_plain_contributions() {
    let graph = resolve_one(
        r#"{
            "modules": [{
                "type": "M",
                "provides": [
                    { "name": "a", "type": "Foo", "into": "set" },
                    { "name": "b", "type": "Foo", "into": "set" }
                ]
            }],
            "components": [{
                "type": "R",
                "modules": ["M"],
                "entry_points": [{ "name": "foos", "type": "Set<Produced<Foo>>" }]
            }]
        }"#,
    );

    let set = entry(&graph, "Set<Produced<Foo>>").contribution_binding().unwrap();
    assert_eq!(set.kind, BindingKind::MultiboundSet);
    assert_eq!(set.binding_type, BindingType::Production);
    assert_eq!(set.dependencies.len(), 2);
    for dep in set.dependencies.iter() {
        assert_eq!(dep.kind, RequestKind::Instance);
        assert_eq!(dep.key.without_contribution(), key("Set<Foo>"));
    }
}

#[test]
fn test_map_delegates_contribute_to_framework_maps() {
    let graph = resolve_one(
        r#"{
            "injectables": [{ "type": "FooImpl" }],
            "modules": [{
                "type": "M",
                "abstract": true,
                "binds": [{
                    "name": "bindFoo",
                    "type": "Foo",
                    "target": "FooImpl",
                    "into": "map",
                    "map_key": { "type": "String", "value": "\"foo\"" }
                }]
            }],
            "components": [{
                "type": "R",
                "modules": ["M"],
                "entry_points": [{ "name": "foos", "type": "Map<String, Provider<Foo>>" }]
            }]
        }"#,
    );

    let map = entry(&graph, "Map<String, Provider<Foo>>").contribution_binding().unwrap();
    assert_eq!(map.kind, BindingKind::MultiboundMap);
    assert_eq!(map.binding_type, BindingType::Provision);
    assert_eq!(map.dependencies.len(), 1);
    let dep = &map.dependencies[0];
    assert_eq!(dep.kind, RequestKind::Provider);
    assert_eq!(dep.key.without_contribution(), key("Map<String, Provider<Foo>>"));

    let delegate = graph.contribution(&dep.key).unwrap().contribution_binding().unwrap();
    assert_eq!(delegate.kind, BindingKind::Delegate);
    assert_eq!(delegate.contribution_type, ContributionType::Map);
    assert_eq!(delegate.map_key.as_deref(), Some("\"foo\""));
    assert_eq!(delegate.dependencies[0].key, key("FooImpl"));
    assert_eq!(
        entry(&graph, "FooImpl").contribution_binding().unwrap().kind,
        BindingKind::Injection
    );
}

#[test]
fn test_delegate_to_missing_target() {
    let graph = resolve_one(
        r#"{
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
        }"#,
    );

    let heater = entry(&graph, "Heater").contribution_binding().unwrap();
    assert_eq!(heater.kind, BindingKind::Delegate);
    assert_eq!(heater.binding_type, BindingType::Provision);
    assert_eq!(heater.dependencies.len(), 1);
    assert_eq!(heater.dependencies[0].key, key("ElectricHeater"));
    assert!(entry(&graph, "ElectricHeater").is_empty());
}

#[test]
fn test_delegate_loop_terminates() {
    let graph = resolve_one(
        r#"{
            "modules": [{
                "type": "M",
                "abstract": true,
                "binds": [
                    { "name": "a", "type": "A", "target": "B" },
                    { "name": "b", "type": "B", "target": "A" }
                ]
            }],
            "components": [{ "type": "R", "modules": ["M"], "entry_points": [{ "name": "a", "type": "A" }] }]
        }"#,
    );

    for (name, target) in [("A", "B"), ("B", "A")].iter() {
        let binding = entry(&graph, name)
            .contribution_binding()
            .unwrap_or_else(|| panic!("{} should have one binding", name));
        assert_eq!(binding.kind, BindingKind::Delegate);
        assert_eq!(binding.dependencies[0].key, key(target));
    }

    let cycles = graph.dependency_graph().eager_cycles();
    assert_eq!(cycles.len(), 1);
    assert!(cycles[0].contains(&contribution("A")) && cycles[0].contains(&contribution("B")));
}
