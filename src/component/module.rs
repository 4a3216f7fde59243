use std::{
    fmt,
    hash::{Hash, Hasher},
    rc::Rc,
};

use crate::{
    binding::{Binding, DelegateDeclaration, MultibindingDeclaration},
    ty::Ty,
};

/// The declarations of one module. Modules are identified by their type.
#[derive(Clone)]
pub struct ModuleDescriptor {
    pub ty: Ty,
    pub bindings: Vec<Rc<Binding>>,
    pub multibinding_declarations: Vec<MultibindingDeclaration>,
    pub delegate_declarations: Vec<DelegateDeclaration>,
    pub includes: Vec<Rc<ModuleDescriptor>>,
    /// Abstract modules never need an instance.
    pub is_abstract: bool,
}

impl ModuleDescriptor {
    pub fn new(ty: Ty) -> ModuleDescriptor {
        ModuleDescriptor {
            ty,
            bindings: vec![],
            multibinding_declarations: vec![],
            delegate_declarations: vec![],
            includes: vec![],
            is_abstract: false,
        }
    }

    /// This module followed by everything it includes, depth first, without
    /// repeats.
    pub fn transitive(self: &Rc<Self>) -> Vec<Rc<ModuleDescriptor>> {
        let mut out = vec![];
        collect_transitive(self, &mut out);
        out
    }
}

pub(crate) fn collect_transitive(module: &Rc<ModuleDescriptor>, out: &mut Vec<Rc<ModuleDescriptor>>) {
    if out.iter().any(|m| m.ty == module.ty) {
        return;
    }
    out.push(Rc::clone(module));
    for included in module.includes.iter() {
        collect_transitive(included, out);
    }
}

impl PartialEq for ModuleDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.ty == other.ty
    }
}

impl Eq for ModuleDescriptor {}

impl Hash for ModuleDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ty.hash(state)
    }
}

impl fmt::Debug for ModuleDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "module {}", self.ty)
    }
}
