use std::rc::Rc;

use fnv::FnvHashMap;

use crate::{
    binding::{
        Binding, ContributionType, DelegateDeclaration, DependencyRequest, InjectBindingMap,
        MultibindingDeclaration,
    },
    component::{
        ComponentDependency, ComponentDescriptor, ComponentMethod, DependencyMethod, ModuleDescriptor,
    },
    errors::{StilettoError, StilettoResult},
    key::Key,
    scope::Scope,
    ty::{
        parse::{parse_annotated, parse_annotation, parse_ty},
        Aliases, MapType, Path, SetType, Ty,
    },
};

use super::{
    BindsDecl, ComponentDecl, Declarations, EntryPointDecl, IntoDecl, InjectableDecl, MapKeyDecl,
    Manifest, ModuleDecl, ProvidesDecl,
};

pub struct Loader<'m> {
    manifest: &'m Manifest,
    aliases: Aliases,
    module_decls: FnvHashMap<Ty, &'m ModuleDecl>,
    component_decls: FnvHashMap<Ty, &'m ComponentDecl>,
    modules: FnvHashMap<Ty, Rc<ModuleDescriptor>>,
    components: FnvHashMap<Ty, Rc<ComponentDescriptor>>,
    /// Modules or components currently being built, for cycle detection.
    building: Vec<Ty>,
}

impl<'m> Loader<'m> {
    pub fn new(manifest: &'m Manifest) -> StilettoResult<Loader<'m>> {
        let mut aliases = Aliases::default();
        for alias in manifest.aliases.iter() {
            let ty = parse_ty(&alias.ty, Some(&aliases))?;
            if aliases.insert(alias.name.clone(), ty).is_some() {
                return Err(StilettoError::manifest(format!("alias `{}` is declared twice", alias.name)));
            }
        }

        let mut loader = Loader {
            manifest,
            aliases,
            module_decls: FnvHashMap::default(),
            component_decls: FnvHashMap::default(),
            modules: FnvHashMap::default(),
            components: FnvHashMap::default(),
            building: vec![],
        };

        for decl in manifest.modules.iter() {
            let ty = loader.ty(&decl.ty)?;
            if loader.module_decls.insert(ty, decl).is_some() {
                return Err(StilettoError::manifest(format!("module `{}` is declared twice", decl.ty)));
            }
        }
        for decl in manifest.components.iter() {
            let ty = loader.ty(&decl.ty)?;
            if loader.component_decls.insert(ty, decl).is_some() {
                return Err(StilettoError::manifest(format!(
                    "component `{}` is declared twice",
                    decl.ty
                )));
            }
        }
        Ok(loader)
    }

    pub fn load(mut self) -> StilettoResult<Declarations> {
        let mut registry = InjectBindingMap::new();
        for decl in self.manifest.injectables.iter() {
            self.injectable(decl, &mut registry)
                .map_err(|e| e.with_src(format!("injectable {}", decl.ty)))?;
        }

        let mut components = vec![];
        for decl in self.manifest.components.iter() {
            if decl.kind.is_subcomponent() {
                continue;
            }
            let ty = self.ty(&decl.ty)?;
            components.push(self.component(&ty)?);
        }

        for decl in self.manifest.components.iter() {
            if decl.kind.is_subcomponent() && !self.components.contains_key(&self.ty(&decl.ty)?) {
                log::warn!("subcomponent {} is not installed in any component", decl.ty);
            }
        }

        log::info!(
            "loaded {} components, {} modules and {} injectable types",
            components.len(),
            self.modules.len(),
            registry.len()
        );
        Ok(Declarations {
            components,
            registry,
            options: self.manifest.options,
        })
    }

    fn ty(&self, src: &str) -> StilettoResult<Ty> {
        parse_ty(src, Some(&self.aliases))
    }

    fn key(&self, src: &str) -> StilettoResult<Key> {
        let (qualifier, ty) = parse_annotated(src, Some(&self.aliases))?;
        Ok(Key::qualified(qualifier, ty))
    }

    fn request(&self, src: &str) -> StilettoResult<DependencyRequest> {
        let (qualifier, ty) = parse_annotated(src, Some(&self.aliases))?;
        Ok(DependencyRequest::for_ty(qualifier, &ty))
    }

    fn requests(&self, srcs: &[String]) -> StilettoResult<Vec<DependencyRequest>> {
        srcs.iter().map(|s| self.request(s)).collect()
    }

    fn scope(&self, src: &Option<String>) -> StilettoResult<Option<Scope>> {
        let src = unless!(src, else return Ok(None));
        let annotation = if src.trim_start().starts_with('@') {
            parse_annotation(src)?
        } else {
            parse_annotation(&format!("@{}", src.trim()))?
        };
        Ok(Some(Scope(annotation)))
    }

    fn path_of(ty: &Ty) -> StilettoResult<Path> {
        ty.path()
            .cloned()
            .ok_or_else(|| StilettoError::manifest(format!("`{}` is not a declared type", ty)))
    }

    fn injectable(&self, decl: &InjectableDecl, registry: &mut InjectBindingMap) -> StilettoResult {
        let (qualifier, ty) = parse_annotated(&decl.ty, Some(&self.aliases))?;
        if qualifier.is_some() {
            return Err(StilettoError::manifest("injectable types cannot be qualified"));
        }
        let key = Key::new(ty);
        let mut deps = self.requests(&decl.deps)?;

        if !decl.members.is_empty() {
            let members = self.requests(&decl.members)?;
            registry.add_members_injection(Binding::members_injection(key.clone(), members));
            deps.push(DependencyRequest::members_injection(key.clone()));
        }

        if decl.constructor {
            registry.add_provision(Binding::injection(key, deps, self.scope(&decl.scope)?));
        } else if decl.scope.is_some() {
            return Err(StilettoError::manifest("a scope needs an injectable constructor"));
        }
        Ok(())
    }

    /// The key a contribution is made to: `Set<T>` for set elements,
    /// `Map<K, V>` for map entries.
    fn contribution_key(
        &self,
        src: &str,
        into: Option<IntoDecl>,
        map_key: &Option<MapKeyDecl>,
    ) -> StilettoResult<(Key, ContributionType, Option<String>)> {
        let (qualifier, ty) = parse_annotated(src, Some(&self.aliases))?;
        if map_key.is_some() && into != Some(IntoDecl::Map) {
            return Err(StilettoError::manifest("a map key is only allowed on map contributions"));
        }
        let (ty, contribution_type, map_key) = match into {
            None => (ty, ContributionType::Unique, None),
            Some(IntoDecl::Set) => (Ty::set_of(ty), ContributionType::Set, None),
            Some(IntoDecl::SetValues) => {
                if !SetType::is_set(&ty) {
                    return Err(StilettoError::manifest(format!(
                        "set_values contributions must have a Set type, found {}",
                        ty
                    )));
                }
                (ty, ContributionType::SetValues, None)
            }
            Some(IntoDecl::Map) => {
                let map_key = map_key
                    .as_ref()
                    .ok_or_else(|| StilettoError::manifest("map contributions need a map_key"))?;
                let key_ty = self.ty(&map_key.ty)?;
                (Ty::map_of(key_ty, ty), ContributionType::Map, Some(map_key.value.clone()))
            }
        };
        Ok((Key::qualified(qualifier, ty), contribution_type, map_key))
    }

    fn provides(&self, decl: &ProvidesDecl, module: &Path, is_abstract: bool) -> StilettoResult<Binding> {
        let (key, contribution_type, map_key) = self.contribution_key(&decl.ty, decl.into, &decl.map_key)?;
        if is_abstract && !decl.is_static {
            return Err(StilettoError::manifest(format!(
                "{} in abstract module {} must be static",
                decl.name, module
            )));
        }
        Ok(
            Binding::module_method(decl.production, key, contribution_type, module.clone(), &decl.name)
                .dependencies(self.requests(&decl.deps)?)
                .scope(self.scope(&decl.scope)?)
                .requires_module_instance(!decl.is_static)
                .map_key(map_key)
                .build(),
        )
    }

    fn binds(&self, decl: &BindsDecl, module: &Path) -> StilettoResult<DelegateDeclaration> {
        let (key, contribution_type, map_key) = self.contribution_key(&decl.ty, decl.into, &decl.map_key)?;
        let target = self.key(&decl.target)?;
        Ok(
            DelegateDeclaration::new(key, contribution_type, target, module.clone(), decl.name.as_str())
                .with_scope(self.scope(&decl.scope)?)
                .with_map_key(map_key),
        )
    }

    fn multibinds(&self, name: &str, src: &str, module: &Path) -> StilettoResult<MultibindingDeclaration> {
        let key = self.key(src)?;
        if !SetType::is_set(key.ty()) && !MapType::is_map(key.ty()) {
            return Err(StilettoError::manifest(format!(
                "multibinds {} must declare a Set or a Map, found {}",
                name,
                key.ty()
            )));
        }
        Ok(MultibindingDeclaration::new(key, module.clone(), name))
    }

    fn enter(&mut self, ty: &Ty, what: &str) -> StilettoResult {
        if self.building.contains(ty) {
            let cycle = self
                .building
                .iter()
                .skip_while(|t| *t != ty)
                .map(|t| t.to_string())
                .collect::<Vec<_>>()
                .join(" -> ");
            return Err(StilettoError::manifest(format!("{} cycle: {} -> {}", what, cycle, ty)));
        }
        self.building.push(ty.clone());
        Ok(())
    }

    fn module(&mut self, ty: &Ty) -> StilettoResult<Rc<ModuleDescriptor>> {
        if let Some(m) = self.modules.get(ty) {
            return Ok(Rc::clone(m));
        }
        let decl: &'m ModuleDecl = match self.module_decls.get(ty) {
            Some(d) => *d,
            None => return Err(StilettoError::manifest(format!("module `{}` is not declared", ty))),
        };

        self.enter(ty, "module include")?;
        let path = Loader::path_of(ty)?;
        let mut module = ModuleDescriptor::new(ty.clone());
        module.is_abstract = decl.is_abstract;

        for include in decl.includes.iter() {
            let included = self.ty(include)?;
            module.includes.push(self.module(&included)?);
        }

        let src = || format!("module {}", decl.ty);
        for p in decl.provides.iter() {
            let b = self
                .provides(p, &path, decl.is_abstract)
                .map_err(|e| e.with_src(format!("{}.{}", src(), p.name)))?;
            module.bindings.push(Rc::new(b));
        }
        for b in decl.binds.iter() {
            let d = self
                .binds(b, &path)
                .map_err(|e| e.with_src(format!("{}.{}", src(), b.name)))?;
            module.delegate_declarations.push(d);
        }
        for m in decl.multibinds.iter() {
            let d = self
                .multibinds(&m.name, &m.ty, &path)
                .map_err(|e| e.with_src(format!("{}.{}", src(), m.name)))?;
            module.multibinding_declarations.push(d);
        }

        self.building.pop();
        let module = Rc::new(module);
        self.modules.insert(ty.clone(), Rc::clone(&module));
        Ok(module)
    }

    fn entry_point(&self, decl: &EntryPointDecl) -> StilettoResult<ComponentMethod> {
        let request = if decl.members {
            DependencyRequest::members_injection(self.key(&decl.ty)?)
        } else {
            self.request(&decl.ty)?
        };
        Ok(ComponentMethod::entry_point(decl.name.as_str(), request))
    }

    fn component(&mut self, ty: &Ty) -> StilettoResult<Rc<ComponentDescriptor>> {
        if let Some(c) = self.components.get(ty) {
            return Ok(Rc::clone(c));
        }
        let decl: &'m ComponentDecl = match self.component_decls.get(ty) {
            Some(d) => *d,
            None => return Err(StilettoError::manifest(format!("component `{}` is not declared", ty))),
        };

        self.enter(ty, "subcomponent")?;
        let src = format!("component {}", decl.ty);
        let component = self.component_body(ty, decl).map_err(|e| match e.src {
            Some(_) => e,
            None => e.with_src(src),
        })?;
        self.building.pop();

        let component = Rc::new(component);
        self.components.insert(ty.clone(), Rc::clone(&component));
        Ok(component)
    }

    fn component_body(&mut self, ty: &Ty, decl: &'m ComponentDecl) -> StilettoResult<ComponentDescriptor> {
        let mut component = ComponentDescriptor::new(decl.kind, ty.clone());

        for s in decl.scopes.iter() {
            if let Some(scope) = self.scope(&Some(s.clone()))? {
                component.scopes.push(scope);
            }
        }

        for m in decl.modules.iter() {
            let m = self.ty(m)?;
            component.modules.push(self.module(&m)?);
        }

        for d in decl.dependencies.iter() {
            let dep_ty = self.ty(&d.ty)?;
            let dep_path = Loader::path_of(&dep_ty)?;
            let mut dependency = ComponentDependency {
                ty: dep_ty,
                methods: vec![],
            };
            for m in d.methods.iter() {
                let declared_in = match &m.declared_in {
                    Some(s) => Loader::path_of(&self.ty(s)?)?,
                    None => dep_path.clone(),
                };
                dependency.methods.push(DependencyMethod {
                    name: m.name.clone(),
                    key: self.key(&m.ty)?,
                    production: m.production,
                    declared_in,
                });
            }
            component.dependencies.push(dependency);
        }

        for e in decl.entry_points.iter() {
            component.methods.push(self.entry_point(e)?);
        }

        for s in decl.subcomponents.iter() {
            let sub_ty = self.ty(&s.component)?;
            let is_subcomponent = self
                .component_decls
                .get(&sub_ty)
                .map_or(false, |d| d.kind.is_subcomponent());
            if !is_subcomponent {
                return Err(StilettoError::manifest(format!(
                    "{} installs `{}`, which is not a declared subcomponent",
                    decl.ty, s.component
                )));
            }
            let method = match &s.creator {
                Some(creator) => ComponentMethod::subcomponent_creator(s.method.as_str(), self.ty(creator)?),
                None => ComponentMethod::subcomponent_factory(s.method.as_str()),
            };
            let sub = self.component(&sub_ty)?;
            component.subcomponents.push((method, sub));
        }

        Ok(component)
    }
}
