use std::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
};

use fnv::FnvHashMap;

use crate::{errors::StilettoResult, utils::join};

mod annotation;
mod framework;
pub mod parse;
mod path;

pub use annotation::Annotation;
pub use framework::{FrameworkType, MapType, SetType};
pub use path::Path;

pub const SET: &str = "Set";
pub const MAP: &str = "Map";
const OBJECT: &str = "Object";

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Primitive {
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
}

impl Primitive {
    pub fn from_name(s: &str) -> Option<Primitive> {
        Some(match s {
            "boolean" => Primitive::Boolean,
            "byte" => Primitive::Byte,
            "char" => Primitive::Char,
            "short" => Primitive::Short,
            "int" => Primitive::Int,
            "long" => Primitive::Long,
            "float" => Primitive::Float,
            "double" => Primitive::Double,
            _ => return None,
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Primitive::Boolean => "boolean",
            Primitive::Byte => "byte",
            Primitive::Char => "char",
            Primitive::Short => "short",
            Primitive::Int => "int",
            Primitive::Long => "long",
            Primitive::Float => "float",
            Primitive::Double => "double",
        }
    }

    pub fn boxed_name(&self) -> &'static str {
        match self {
            Primitive::Boolean => "Boolean",
            Primitive::Byte => "Byte",
            Primitive::Char => "Character",
            Primitive::Short => "Short",
            Primitive::Int => "Integer",
            Primitive::Long => "Long",
            Primitive::Float => "Float",
            Primitive::Double => "Double",
        }
    }
}

/// The type part of a key, as written by the declaring source.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Ty {
    Primitive(Primitive),
    Declared(Path, Vec<Ty>),
    Array(Box<Ty>),
    /// `?` or `? extends T`.
    Wildcard(Option<Box<Ty>>),
    /// A named alias together with the type it stands for.
    Alias(Path, Box<Ty>),
}

pub type Aliases = FnvHashMap<String, Ty>;

impl Ty {
    pub fn parse(s: &str) -> StilettoResult<Ty> {
        parse::parse_ty(s, None)
    }

    pub fn simple<P: Into<Path>>(name: P) -> Ty {
        Ty::Declared(name.into(), vec![])
    }

    pub fn declared<P: Into<Path>>(name: P, args: Vec<Ty>) -> Ty {
        Ty::Declared(name.into(), args)
    }

    pub fn set_of(element: Ty) -> Ty {
        Ty::declared(SET, vec![element])
    }

    pub fn map_of(key: Ty, value: Ty) -> Ty {
        Ty::declared(MAP, vec![key, value])
    }

    /// Strips any aliases wrapping this type.
    pub fn expanded(&self) -> &Ty {
        let mut ty = self;
        while let Ty::Alias(_, inner) = ty {
            ty = inner;
        }
        ty
    }

    /// The declared path of this type after alias expansion.
    pub fn path(&self) -> Option<&Path> {
        match self.expanded() {
            Ty::Declared(p, _) => Some(p),
            _ => None,
        }
    }

    pub fn args(&self) -> &[Ty] {
        match self.expanded() {
            Ty::Declared(_, args) => args,
            _ => &[],
        }
    }

    /// Returns true if this is a declared type whose simple name is `name`.
    pub fn is_named(&self, name: &str) -> bool {
        self.path().and_then(Path::name) == Some(name)
    }

    /// Rewrites the type into its canonical representative: aliases expanded,
    /// primitives boxed (except as array components) and `? extends Object`
    /// collapsed to `?`.
    pub fn normalize(&self) -> Ty {
        match self {
            Ty::Primitive(p) => Ty::simple(p.boxed_name()),
            Ty::Declared(p, args) => Ty::Declared(p.clone(), args.iter().map(Ty::normalize).collect()),
            Ty::Array(elem) => Ty::Array(Box::new(match elem.expanded() {
                Ty::Primitive(p) => Ty::Primitive(*p),
                other => other.normalize(),
            })),
            Ty::Wildcard(None) => Ty::Wildcard(None),
            Ty::Wildcard(Some(bound)) => {
                let bound = bound.normalize();
                if bound.is_named(OBJECT) && bound.args().is_empty() {
                    Ty::Wildcard(None)
                } else {
                    Ty::Wildcard(Some(Box::new(bound)))
                }
            }
            Ty::Alias(_, inner) => inner.normalize(),
        }
    }

    pub fn is_equivalent(&self, other: &Ty) -> bool {
        self.normalize() == other.normalize()
    }
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ty::Primitive(p) => write!(f, "{}", p.name()),
            Ty::Declared(p, args) if args.is_empty() => write!(f, "{}", p),
            Ty::Declared(p, args) => write!(f, "{}<{}>", p, join(args, ", ")),
            Ty::Array(elem) => write!(f, "{}[]", elem),
            Ty::Wildcard(None) => write!(f, "?"),
            Ty::Wildcard(Some(bound)) => write!(f, "? extends {}", bound),
            Ty::Alias(p, _) => write!(f, "{}", p),
        }
    }
}

/// A type compared by structural equivalence rather than by how it was
/// written. Keeps the original spelling for display.
#[derive(Clone)]
pub struct EquivTy {
    ty: Ty,
    normal: Ty,
}

impl EquivTy {
    pub fn new(ty: Ty) -> EquivTy {
        let normal = ty.normalize();
        EquivTy { ty, normal }
    }

    pub fn ty(&self) -> &Ty {
        &self.ty
    }

    pub fn normal(&self) -> &Ty {
        &self.normal
    }
}

impl From<Ty> for EquivTy {
    fn from(ty: Ty) -> EquivTy {
        EquivTy::new(ty)
    }
}

impl PartialEq for EquivTy {
    fn eq(&self, other: &Self) -> bool {
        self.normal == other.normal
    }
}

impl Eq for EquivTy {}

impl Hash for EquivTy {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.normal.hash(state)
    }
}

impl PartialOrd for EquivTy {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EquivTy {
    fn cmp(&self, other: &Self) -> Ordering {
        self.normal.cmp(&other.normal)
    }
}

impl fmt::Debug for EquivTy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ty)
    }
}

impl fmt::Display for EquivTy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ty)
    }
}
