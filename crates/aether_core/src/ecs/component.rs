//! # Component Types and Signatures
//!
//! Components are pure data containers with no behavior. The core never
//! inspects their contents; it only tracks identity, presence, and
//! membership.
//!
//! Each registered component type gets a small integer [`ComponentTypeId`],
//! and every entity carries a [`Signature`]: one bit per registered type,
//! set while the entity holds a value of that type.

use std::fmt;

/// Maximum number of distinct component types across the whole process.
///
/// Fixed by the signature word width. Exceeding it is a hard failure
/// ([`crate::EcsError::ComponentLimitReached`]), never a resize.
pub const MAX_COMPONENTS: usize = 64;

/// Marker trait for ECS components.
///
/// Components are opaque payloads to this core: any owned, thread-safe
/// value qualifies. Values move into their store on insert and move back
/// out on remove.
pub trait Component: Send + Sync + 'static {}

impl<T: Send + Sync + 'static> Component for T {}

/// Identifier of a registered component type.
///
/// Assigned once per distinct type, in registration order, starting at 0.
/// Stable for the process lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct ComponentTypeId(u8);

impl ComponentTypeId {
    /// Creates a type id from its raw index.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not below [`MAX_COMPONENTS`].
    #[inline]
    #[must_use]
    pub(crate) fn new(index: u8) -> Self {
        assert!((index as usize) < MAX_COMPONENTS, "component type id out of range");
        Self(index)
    }

    /// Returns the raw index of this type id.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Per-entity bit vector recording which component types are attached.
///
/// Bit `k` is set iff the entity currently holds a value in the component
/// store with type id `k`.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Signature(u64);

impl Signature {
    /// The signature with no bits set.
    pub const EMPTY: Self = Self(0);

    /// Returns a copy of this signature with the given type's bit set.
    #[inline]
    #[must_use]
    pub const fn with(self, type_id: ComponentTypeId) -> Self {
        Self(self.0 | (1 << type_id.0))
    }

    /// Returns a copy of this signature with the given type's bit cleared.
    #[inline]
    #[must_use]
    pub const fn without(self, type_id: ComponentTypeId) -> Self {
        Self(self.0 & !(1 << type_id.0))
    }

    /// Sets the given type's bit in place.
    #[inline]
    pub fn insert(&mut self, type_id: ComponentTypeId) {
        self.0 |= 1 << type_id.0;
    }

    /// Clears the given type's bit in place.
    #[inline]
    pub fn remove(&mut self, type_id: ComponentTypeId) {
        self.0 &= !(1 << type_id.0);
    }

    /// Checks whether the given type's bit is set.
    #[inline]
    #[must_use]
    pub const fn contains(self, type_id: ComponentTypeId) -> bool {
        (self.0 & (1 << type_id.0)) != 0
    }

    /// Checks whether this signature has every bit of `required` set.
    ///
    /// This is the membership test: an entity belongs to a system iff its
    /// signature is a superset of the system's required signature.
    #[inline]
    #[must_use]
    pub const fn is_superset_of(self, required: Self) -> bool {
        (self.0 & required.0) == required.0
    }

    /// Checks whether no bit is set.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({:#066b})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_set_clear() {
        let id = ComponentTypeId::new(5);
        let mut sig = Signature::EMPTY;
        assert!(!sig.contains(id));

        sig.insert(id);
        assert!(sig.contains(id));

        sig.remove(id);
        assert!(!sig.contains(id));
        assert!(sig.is_empty());
    }

    #[test]
    fn test_signature_superset() {
        let a = ComponentTypeId::new(0);
        let b = ComponentTypeId::new(1);
        let c = ComponentTypeId::new(2);

        let required = Signature::EMPTY.with(a).with(b);
        let full = required.with(c);
        let partial = Signature::EMPTY.with(a);

        assert!(full.is_superset_of(required));
        assert!(required.is_superset_of(required));
        assert!(!partial.is_superset_of(required));
        // Everything is a superset of the empty signature.
        assert!(Signature::EMPTY.is_superset_of(Signature::EMPTY));
    }

    #[test]
    fn test_signature_highest_bit() {
        let top = ComponentTypeId::new((MAX_COMPONENTS - 1) as u8);
        let sig = Signature::EMPTY.with(top);
        assert!(sig.contains(top));
        assert!(!sig.without(top).contains(top));
    }

    #[test]
    #[should_panic(expected = "component type id out of range")]
    fn test_type_id_out_of_range() {
        let _ = ComponentTypeId::new(MAX_COMPONENTS as u8);
    }
}
