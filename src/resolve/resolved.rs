use std::rc::Rc;

use crate::{
    binding::{Binding, MultibindingDeclaration},
    component::ComponentPath,
    key::{BindingKey, Key},
};

/// The bindings that satisfy one binding key in one component, each labeled
/// with the component that owns it.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedBindings {
    pub binding_key: BindingKey,
    /// The component whose table holds this entry.
    pub component: ComponentPath,
    contributions: Vec<(ComponentPath, Rc<Binding>)>,
    members_injection: Option<Rc<Binding>>,
    multibinding_declarations: Vec<MultibindingDeclaration>,
    inherited: bool,
}

impl ResolvedBindings {
    pub fn for_contributions(
        binding_key: BindingKey,
        component: ComponentPath,
        contributions: Vec<(ComponentPath, Rc<Binding>)>,
        multibinding_declarations: Vec<MultibindingDeclaration>,
    ) -> ResolvedBindings {
        ResolvedBindings {
            binding_key,
            component,
            contributions,
            members_injection: None,
            multibinding_declarations,
            inherited: false,
        }
    }

    pub fn for_members_injection(
        binding_key: BindingKey,
        component: ComponentPath,
        binding: Rc<Binding>,
    ) -> ResolvedBindings {
        ResolvedBindings {
            members_injection: Some(binding),
            ..ResolvedBindings::no_bindings(binding_key, component)
        }
    }

    pub fn no_bindings(binding_key: BindingKey, component: ComponentPath) -> ResolvedBindings {
        ResolvedBindings {
            binding_key,
            component,
            contributions: vec![],
            members_injection: None,
            multibinding_declarations: vec![],
            inherited: false,
        }
    }

    pub fn key(&self) -> &Key {
        &self.binding_key.key
    }

    /// The same bindings, with the same owners, as seen from a descendant
    /// component.
    pub fn as_inherited_in(&self, component: &ComponentPath) -> ResolvedBindings {
        ResolvedBindings {
            component: component.clone(),
            inherited: true,
            ..self.clone()
        }
    }

    /// True if this entry was copied from an ancestor rather than resolved
    /// in its component.
    pub fn is_inherited(&self) -> bool {
        self.inherited
    }

    pub fn contributions(&self) -> &[(ComponentPath, Rc<Binding>)] {
        &self.contributions
    }

    pub fn contribution_bindings(&self) -> impl Iterator<Item = &Rc<Binding>> {
        self.contributions.iter().map(|(_, b)| b)
    }

    pub fn members_injection_binding(&self) -> Option<&Rc<Binding>> {
        self.members_injection.as_ref()
    }

    /// Every binding, owned here or by an ancestor.
    pub fn bindings(&self) -> impl Iterator<Item = &Rc<Binding>> {
        self.contribution_bindings().chain(self.members_injection.iter())
    }

    /// The bindings owned by the component holding this entry.
    pub fn owned_bindings(&self) -> Vec<&Rc<Binding>> {
        let mut owned = self
            .contributions
            .iter()
            .filter(|(owner, _)| *owner == self.component)
            .map(|(_, b)| b)
            .collect::<Vec<_>>();
        if !self.inherited {
            owned.extend(self.members_injection.iter());
        }
        owned
    }

    pub fn owning_component_of(&self, binding: &Binding) -> Option<&ComponentPath> {
        self.contributions
            .iter()
            .find(|(_, b)| **b == *binding)
            .map(|(owner, _)| owner)
    }

    /// The distinct owners of the contributions, in first-seen order.
    pub fn owners(&self) -> Vec<&ComponentPath> {
        let mut owners = vec![];
        for (owner, _) in self.contributions.iter() {
            if !owners.contains(&owner) {
                owners.push(owner);
            }
        }
        owners
    }

    pub fn multibinding_declarations(&self) -> &[MultibindingDeclaration] {
        &self.multibinding_declarations
    }

    pub fn is_empty(&self) -> bool {
        self.contributions.is_empty() && self.members_injection.is_none()
    }

    /// True if the key is satisfied by a set or map multibinding.
    pub fn is_multibinding(&self) -> bool {
        !self.multibinding_declarations.is_empty()
            || self.contribution_bindings().any(|b| b.is_synthetic_multibinding())
    }

    /// The single contribution binding, if there is exactly one.
    pub fn contribution_binding(&self) -> Option<&Rc<Binding>> {
        match self.contributions.as_slice() {
            [(_, b)] => Some(b),
            _ => None,
        }
    }
}
