use std::fmt;

use crate::ty::{Annotation, EquivTy, FrameworkType, MapType, Path, SetType, Ty};

/// Identifies one contribution to a set or map multibinding: the module that
/// declares it and the declaring element within that module.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContributionId {
    pub module: Path,
    pub element: String,
}

impl ContributionId {
    pub fn new<P: Into<Path>, S: Into<String>>(module: P, element: S) -> ContributionId {
        ContributionId {
            module: module.into(),
            element: element.into(),
        }
    }
}

impl fmt::Display for ContributionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.module, self.element)
    }
}

/// A qualifier and type identifying an injectable value.
///
/// Types are compared by equivalence, so `Set<int>` and `Set<Integer>` name
/// the same key.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Key {
    pub qualifier: Option<Annotation>,
    pub ty: EquivTy,
    pub contribution: Option<ContributionId>,
}

impl Key {
    pub fn new(ty: Ty) -> Key {
        Key {
            qualifier: None,
            ty: EquivTy::new(ty),
            contribution: None,
        }
    }

    pub fn qualified(qualifier: Option<Annotation>, ty: Ty) -> Key {
        Key {
            qualifier,
            ty: EquivTy::new(ty),
            contribution: None,
        }
    }

    pub fn ty(&self) -> &Ty {
        self.ty.ty()
    }

    /// Returns a key with the same qualifier and contribution id but a different type.
    pub fn with_ty(&self, ty: Ty) -> Key {
        Key {
            qualifier: self.qualifier.clone(),
            ty: EquivTy::new(ty),
            contribution: self.contribution.clone(),
        }
    }

    pub fn with_contribution(&self, id: ContributionId) -> Key {
        Key {
            contribution: Some(id),
            ..self.clone()
        }
    }

    pub fn without_contribution(&self) -> Key {
        Key {
            contribution: None,
            ..self.clone()
        }
    }

    pub fn is_contribution(&self) -> bool {
        self.contribution.is_some()
    }

    pub fn is_set(&self) -> bool {
        SetType::is_set(self.ty())
    }

    pub fn is_map(&self) -> bool {
        MapType::is_map(self.ty())
    }

    /// `Set<T>` for a key of `Set<fw<T>>`.
    pub fn unwrap_set_key(&self, fw: FrameworkType) -> Option<Key> {
        let set = SetType::from(self.ty())?;
        if !set.elements_are(fw) {
            return None;
        }
        Some(self.with_ty(Ty::set_of(set.unwrapped_element(fw).clone())))
    }

    /// `Map<K, to<V>>` for a key of `Map<K, from<V>>`.
    pub fn rewrap_map_key(&self, from: FrameworkType, to: FrameworkType) -> Option<Key> {
        let map = MapType::from(self.ty())?;
        if !map.values_are(from) {
            return None;
        }
        let value = map.unwrapped_value(from).clone();
        Some(self.with_ty(Ty::map_of(map.key_type().clone(), to.wrap(value))))
    }

    /// `Map<K, fw<V>>` for a key of `Map<K, V>`.
    pub fn wrap_map_value(&self, fw: FrameworkType) -> Option<Key> {
        let map = MapType::from(self.ty())?;
        if map.values_are(fw) {
            return None;
        }
        Some(self.with_ty(Ty::map_of(map.key_type().clone(), fw.wrap(map.value_type().clone()))))
    }

    /// For a `Map<K, V>` or `Map<K, Produced<V>>` key, the framework map keys
    /// whose contributions also make up that map: `Map<K, Provider<V>>` and
    /// `Map<K, Producer<V>>`.
    pub fn implicit_framework_map_keys(&self) -> Vec<Key> {
        let map = unless!(MapType::from(self.ty()), else return vec![]);
        let value = match map.values_framework_type() {
            None => map.value_type().clone(),
            Some(FrameworkType::Produced) => map.unwrapped_value(FrameworkType::Produced).clone(),
            Some(_) => return vec![],
        };
        [FrameworkType::Provider, FrameworkType::Producer]
            .iter()
            .map(|fw| self.with_ty(Ty::map_of(map.key_type().clone(), fw.wrap(value.clone()))))
            .collect()
    }

    /// Delegate declarations for maps are keyed by `Map<K, V>`; this converts a
    /// `Map<K, Provider<V>>` or `Map<K, Producer<V>>` request to that form.
    pub fn to_delegate_key(&self) -> Key {
        self.rewrap_map_key_to_values(FrameworkType::Provider)
            .or_else(|| self.rewrap_map_key_to_values(FrameworkType::Producer))
            .unwrap_or_else(|| self.clone())
    }

    fn rewrap_map_key_to_values(&self, from: FrameworkType) -> Option<Key> {
        let map = MapType::from(self.ty())?;
        if !map.values_are(from) {
            return None;
        }
        Some(self.with_ty(map.with_unwrapped_values()))
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(q) = &self.qualifier {
            write!(f, "{} ", q)?;
        }
        write!(f, "{}", self.ty)?;
        if let Some(c) = &self.contribution {
            write!(f, " ({})", c)?;
        }
        Ok(())
    }
}

impl From<Ty> for Key {
    fn from(ty: Ty) -> Key {
        Key::new(ty)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BindingKeyKind {
    Contribution,
    MembersInjection,
}

/// A key plus whether the request is for the value itself or for injecting
/// the members of an existing instance.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BindingKey {
    pub kind: BindingKeyKind,
    pub key: Key,
}

impl BindingKey {
    pub fn contribution(key: Key) -> BindingKey {
        BindingKey {
            kind: BindingKeyKind::Contribution,
            key,
        }
    }

    pub fn members_injection(key: Key) -> BindingKey {
        BindingKey {
            kind: BindingKeyKind::MembersInjection,
            key,
        }
    }

    pub fn is_contribution(&self) -> bool {
        self.kind == BindingKeyKind::Contribution
    }
}

impl fmt::Debug for BindingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl fmt::Display for BindingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            BindingKeyKind::Contribution => write!(f, "{}", self.key),
            BindingKeyKind::MembersInjection => write!(f, "members of {}", self.key),
        }
    }
}
