use std::fmt;

use crate::{ty::Ty, utils::join};

/// The chain of component types from the root component down to a
/// (sub)component. Identifies a node of the component tree.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ComponentPath(Vec<Ty>);

impl ComponentPath {
    pub fn root(ty: Ty) -> ComponentPath {
        ComponentPath(vec![ty])
    }

    pub fn child(&self, ty: Ty) -> ComponentPath {
        let mut v = self.0.clone();
        v.push(ty);
        ComponentPath(v)
    }

    pub fn parent(&self) -> Option<ComponentPath> {
        if self.0.len() > 1 {
            Some(ComponentPath(self.0[..self.0.len() - 1].to_vec()))
        } else {
            None
        }
    }

    pub fn current(&self) -> &Ty {
        &self.0[self.0.len() - 1]
    }

    pub fn root_ty(&self) -> &Ty {
        &self.0[0]
    }

    pub fn is_root(&self) -> bool {
        self.0.len() == 1
    }

    pub fn depth(&self) -> usize {
        self.0.len() - 1
    }

    pub fn components(&self) -> &[Ty] {
        &self.0
    }

    pub fn is_ancestor_or_self_of(&self, other: &ComponentPath) -> bool {
        other.0.len() >= self.0.len() && other.0[..self.0.len()] == self.0[..]
    }
}

impl fmt::Debug for ComponentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl fmt::Display for ComponentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", join(&self.0, " > "))
    }
}
