use std::rc::Rc;

use crate::{
    collections::OrderedMap,
    component::{ComponentDescriptor, ComponentMethod, ComponentPath, ModuleDescriptor},
    key::{BindingKey, Key},
    resolve::ResolvedBindings,
    ty::Ty,
    utils::push_unique,
};

pub mod deps;
pub mod summary;

pub use deps::DependencyGraph;

/// The resolved bindings of one component and, recursively, of its
/// subcomponents. Immutable once built.
pub struct BindingGraph {
    component: Rc<ComponentDescriptor>,
    path: ComponentPath,
    resolved_bindings: OrderedMap<BindingKey, Rc<ResolvedBindings>>,
    subgraphs: OrderedMap<ComponentMethod, BindingGraph>,
    owned_modules: Vec<Rc<ModuleDescriptor>>,
}

impl BindingGraph {
    pub fn new(
        component: Rc<ComponentDescriptor>,
        path: ComponentPath,
        resolved_bindings: OrderedMap<BindingKey, Rc<ResolvedBindings>>,
        subgraphs: OrderedMap<ComponentMethod, BindingGraph>,
        owned_modules: Vec<Rc<ModuleDescriptor>>,
    ) -> BindingGraph {
        BindingGraph {
            component,
            path,
            resolved_bindings,
            subgraphs,
            owned_modules,
        }
    }

    pub fn component(&self) -> &ComponentDescriptor {
        &self.component
    }

    pub fn path(&self) -> &ComponentPath {
        &self.path
    }

    pub fn resolved_bindings(&self) -> &OrderedMap<BindingKey, Rc<ResolvedBindings>> {
        &self.resolved_bindings
    }

    pub fn resolved(&self, key: &BindingKey) -> Option<&ResolvedBindings> {
        self.resolved_bindings.get(key).map(Rc::as_ref)
    }

    /// Shorthand for the contribution entry of `key`.
    pub fn contribution(&self, key: &Key) -> Option<&ResolvedBindings> {
        self.resolved(&BindingKey::contribution(key.clone()))
    }

    pub fn subgraphs(&self) -> &OrderedMap<ComponentMethod, BindingGraph> {
        &self.subgraphs
    }

    /// The subgraph created by the component method named `method`.
    pub fn subgraph(&self, method: &str) -> Option<&BindingGraph> {
        self.subgraphs
            .iter()
            .find(|(m, _)| m.name == method)
            .map(|(_, g)| g)
    }

    pub fn owned_modules(&self) -> &[Rc<ModuleDescriptor>] {
        &self.owned_modules
    }

    /// This graph followed by every subgraph, parents before children.
    pub fn preorder(&self) -> Vec<&BindingGraph> {
        let mut out = vec![self];
        for g in self.subgraphs.values() {
            out.extend(g.preorder());
        }
        out
    }

    pub fn component_descriptors(&self) -> Vec<&ComponentDescriptor> {
        self.preorder().into_iter().map(|g| g.component()).collect()
    }

    /// The instances a generated component needs to be given: its component
    /// dependencies, plus every owned module with a binding, used anywhere in
    /// this subtree, that needs a module instance.
    pub fn component_requirements(&self) -> Vec<Ty> {
        let owned = self.owned_modules.iter().map(|m| &m.ty).collect::<Vec<_>>();
        let mut requirements = vec![];
        for g in self.preorder() {
            for rb in g.resolved_bindings.values() {
                for b in rb.contribution_bindings() {
                    if !b.requires_module_instance {
                        continue;
                    }
                    let module = unless!(&b.contributing_module, else continue);
                    if let Some(ty) = owned.iter().find(|ty| ty.path() == Some(module)) {
                        push_unique(&mut requirements, (*ty).clone());
                    }
                }
            }
        }
        for dependency in self.component.dependencies.iter() {
            push_unique(&mut requirements, dependency.ty.clone());
        }
        requirements
    }

    /// Types that may be passed to the component: non-abstract modules and
    /// component dependencies.
    pub fn available_dependencies(&self) -> Vec<Ty> {
        let mut available = vec![];
        for m in self.component.transitive_modules() {
            if !m.is_abstract {
                push_unique(&mut available, m.ty.clone());
            }
        }
        for dependency in self.component.dependencies.iter() {
            push_unique(&mut available, dependency.ty.clone());
        }
        available
    }

    /// Entries of this component whose bindings are owned here.
    pub fn owned_entries(&self) -> impl Iterator<Item = &ResolvedBindings> {
        self.resolved_bindings
            .values()
            .map(Rc::as_ref)
            .filter(|rb| !rb.is_inherited())
    }

    pub fn dependency_graph(&self) -> DependencyGraph {
        DependencyGraph::for_graph(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{binding::InjectBindingRegistry, manifest, resolve::BindingGraphFactory};

    fn resolve(src: &str) -> BindingGraph {
        let decls = manifest::from_str(src).unwrap();
        let registry: &dyn InjectBindingRegistry = &decls.registry;
        BindingGraphFactory::new(registry).create(Rc::clone(&decls.components[0]))
    }

    const APP: &str = r#"{
        "modules": [
            { "type": "InstanceModule", "provides": [{ "name": "foo", "type": "Foo" }] },
            { "type": "StaticModule", "provides": [{ "name": "bar", "type": "Bar", "static": true }] },
            { "type": "UnusedModule", "provides": [{ "name": "qux", "type": "Qux" }] },
            { "type": "AbstractModule", "abstract": true, "binds": [{ "name": "baz", "type": "Baz", "target": "Bar" }] }
        ],
        "components": [
            {
                "type": "App",
                "modules": ["InstanceModule", "StaticModule", "UnusedModule", "AbstractModule"],
                "dependencies": [{ "type": "Config" }],
                "entry_points": [{ "name": "baz", "type": "Baz" }],
                "subcomponents": [{ "method": "child", "component": "Child" }]
            },
            { "type": "Child", "kind": "subcomponent", "entry_points": [{ "name": "foo", "type": "Foo" }] }
        ]
    }"#;

    #[test]
    fn requirements_cover_the_subtree() {
        let graph = resolve(APP);
        // Foo is only requested by the child, but cached by the parent
        assert_eq!(graph.component_requirements(), vec![ty!("InstanceModule"), ty!("Config")]);
        assert_eq!(
            graph.available_dependencies(),
            vec![ty!("InstanceModule"), ty!("StaticModule"), ty!("UnusedModule"), ty!("Config")]
        );
    }

    #[test]
    fn subcomponents_own_no_inherited_modules() {
        let graph = resolve(APP);
        assert_eq!(graph.owned_modules().len(), 4);
        let child = graph.subgraph("child").unwrap();
        assert!(child.owned_modules().is_empty());
        assert_eq!(graph.preorder().len(), 2);
        assert_eq!(
            graph.component_descriptors().iter().map(|c| c.ty.to_string()).collect::<Vec<_>>(),
            vec!["App", "Child"]
        );
    }
}
