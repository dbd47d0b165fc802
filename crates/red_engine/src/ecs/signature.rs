//! Component signatures
//!
//! A signature is a fixed-width bitset where bit `i` means "component type `i`
//! is present". Systems declare a required signature and match every entity
//! whose enabled signature contains it.

use std::fmt;
use std::ops::{BitAnd, BitOr};

/// Maximum number of distinct component types per process
pub const MAX_COMPONENT_TYPES: u32 = 32;

/// Index assigned to a component type at registration
pub type ComponentType = u32;

/// Bitset of component types
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ComponentSignature(u32);

impl ComponentSignature {
    /// Signature with no bits set
    pub const EMPTY: Self = Self(0);

    /// Build a signature from a list of component types
    pub fn from_types(types: &[ComponentType]) -> Self {
        types.iter().fold(Self::EMPTY, |signature, &ty| signature.with(ty))
    }

    /// Copy of this signature with `component_type` set
    #[must_use]
    pub fn with(mut self, component_type: ComponentType) -> Self {
        self.set(component_type, true);
        self
    }

    /// Set or clear the bit for `component_type`
    pub fn set(&mut self, component_type: ComponentType, value: bool) {
        assert!(
            component_type < MAX_COMPONENT_TYPES,
            "Component type {component_type} exceeds the signature width!"
        );
        if value {
            self.0 |= 1 << component_type;
        } else {
            self.0 &= !(1 << component_type);
        }
    }

    /// Whether the bit for `component_type` is set
    pub fn contains(&self, component_type: ComponentType) -> bool {
        component_type < MAX_COMPONENT_TYPES && self.0 & (1 << component_type) != 0
    }

    /// `(self & required) == required`
    pub fn matches(&self, required: Self) -> bool {
        *self & required == required
    }

    /// Every bit of `self` is also set in `other`
    pub fn is_subset_of(&self, other: Self) -> bool {
        other.matches(*self)
    }

    /// No bits set
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Number of bits set
    pub fn len(&self) -> u32 {
        self.0.count_ones()
    }

    /// Raw bits
    pub fn bits(&self) -> u32 {
        self.0
    }
}

impl BitAnd for ComponentSignature {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl BitOr for ComponentSignature {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl fmt::Debug for ComponentSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComponentSignature({:032b})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_clear_bits() {
        let mut signature = ComponentSignature::EMPTY;
        signature.set(3, true);
        signature.set(31, true);
        assert!(signature.contains(3));
        assert!(signature.contains(31));
        assert_eq!(signature.len(), 2);

        signature.set(3, false);
        assert!(!signature.contains(3));
        assert!(!signature.contains(40));
    }

    #[test]
    fn test_matching() {
        let entity = ComponentSignature::from_types(&[0, 1, 4]);
        let system = ComponentSignature::from_types(&[0, 4]);

        assert!(entity.matches(system));
        assert!(!system.matches(entity));
        assert!(system.is_subset_of(entity));
        // Every entity matches the empty signature
        assert!(ComponentSignature::EMPTY.matches(ComponentSignature::EMPTY));
    }

    #[test]
    #[should_panic(expected = "exceeds the signature width")]
    fn test_out_of_range_type_panics() {
        let _ = ComponentSignature::EMPTY.with(MAX_COMPONENT_TYPES);
    }
}
