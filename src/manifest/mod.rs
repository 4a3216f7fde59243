use std::{fs, path::Path as FsPath, rc::Rc};

use serde::Deserialize;

use crate::{
    binding::InjectBindingMap,
    component::{ComponentDescriptor, ComponentKind},
    errors::{StilettoError, StilettoResult},
    validation::ValidationOptions,
};

mod load;

/// The declarative input of the resolver: what a front end would have read
/// from annotated sources, already normalized. Type fields hold type
/// expressions such as `@Named("db") Provider<Connection>`.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Named type aliases, resolved in order. Later aliases may use earlier ones.
    #[serde(default)]
    pub aliases: Vec<AliasDecl>,
    #[serde(default)]
    pub options: ValidationOptions,
    #[serde(default)]
    pub injectables: Vec<InjectableDecl>,
    #[serde(default)]
    pub modules: Vec<ModuleDecl>,
    #[serde(default)]
    pub components: Vec<ComponentDecl>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AliasDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
}

/// A class with an injectable constructor and/or injectable members.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InjectableDecl {
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default = "yes")]
    pub constructor: bool,
    #[serde(default)]
    pub deps: Vec<String>,
    #[serde(default)]
    pub members: Vec<String>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModuleDecl {
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,
    #[serde(default)]
    pub includes: Vec<String>,
    #[serde(default)]
    pub provides: Vec<ProvidesDecl>,
    #[serde(default)]
    pub binds: Vec<BindsDecl>,
    #[serde(default)]
    pub multibinds: Vec<MultibindsDecl>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntoDecl {
    Set,
    SetValues,
    Map,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MapKeyDecl {
    #[serde(rename = "type")]
    pub ty: String,
    pub value: String,
}

/// A provision or production method of a module. For set and map
/// contributions `type` is the element or value type.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProvidesDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default)]
    pub production: bool,
    #[serde(default, rename = "static")]
    pub is_static: bool,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub into: Option<IntoDecl>,
    #[serde(default)]
    pub map_key: Option<MapKeyDecl>,
    #[serde(default)]
    pub deps: Vec<String>,
}

/// An abstract method aliasing `type` to `target`.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BindsDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    pub target: String,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub into: Option<IntoDecl>,
    #[serde(default)]
    pub map_key: Option<MapKeyDecl>,
}

/// Declares a possibly-empty `Set<T>` or `Map<K, V>`.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MultibindsDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComponentDecl {
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default = "component_kind")]
    pub kind: ComponentKind,
    #[serde(default)]
    pub scopes: Vec<String>,
    #[serde(default)]
    pub modules: Vec<String>,
    #[serde(default)]
    pub dependencies: Vec<DependencyDecl>,
    #[serde(default)]
    pub entry_points: Vec<EntryPointDecl>,
    #[serde(default)]
    pub subcomponents: Vec<SubcomponentDecl>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DependencyDecl {
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default)]
    pub methods: Vec<DependencyMethodDecl>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DependencyMethodDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default)]
    pub production: bool,
    /// The supertype declaring the method, when it is not the dependency itself.
    #[serde(default)]
    pub declared_in: Option<String>,
}

/// A provision, production or members-injection method of a component.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntryPointDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default)]
    pub members: bool,
}

/// A component method returning a subcomponent, or its builder when
/// `creator` is given.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubcomponentDecl {
    pub method: String,
    pub component: String,
    #[serde(default)]
    pub creator: Option<String>,
}

fn yes() -> bool {
    true
}

fn component_kind() -> ComponentKind {
    ComponentKind::Component
}

/// Everything needed to resolve the components of a manifest.
pub struct Declarations {
    /// Top-level components in declaration order. Subcomponents hang off
    /// their parents.
    pub components: Vec<Rc<ComponentDescriptor>>,
    pub registry: InjectBindingMap,
    pub options: ValidationOptions,
}

impl Declarations {
    pub fn component(&self, name: &str) -> Option<&Rc<ComponentDescriptor>> {
        self.components
            .iter()
            .find(|c| c.ty.to_string() == name || c.path().and_then(|p| p.name()) == Some(name))
    }
}

impl Manifest {
    pub fn from_str(src: &str) -> StilettoResult<Manifest> {
        Ok(serde_json::from_str(src)?)
    }

    pub fn into_declarations(self) -> StilettoResult<Declarations> {
        load::Loader::new(&self)?.load()
    }
}

/// Reads and loads the manifest at `path`.
pub fn load<P: AsRef<FsPath>>(path: P) -> StilettoResult<Declarations> {
    let path = path.as_ref();
    let name = path.display().to_string();
    log::debug!("reading manifest {}", name);
    let src = fs::read_to_string(path).map_err(|e| StilettoError::from(e).with_src(name.clone()))?;
    from_str(&src).map_err(|e| match e.src {
        Some(_) => e,
        None => e.with_src(name),
    })
}

pub fn from_str(src: &str) -> StilettoResult<Declarations> {
    Manifest::from_str(src)?.into_declarations()
}
