//! # Component Storage
//!
//! One densely packed store per registered component type.
//!
//! The store keeps three structures in lock step:
//! - `dense`: the component values, contiguous, no gaps
//! - `entities`: slot index → owning entity (parallel to `dense`)
//! - `sparse`: entity index → slot index, pre-allocated, sentinel for absent
//!
//! Removal compacts by moving the last element into the freed slot
//! (swap-remove), so iteration over "all entities having `C`" stays linear
//! and cache-friendly with no tombstones.

use super::component::{Component, ComponentTypeId};
use super::entity::Entity;
use crate::error::{EcsError, EcsResult};

/// Sentinel in the sparse array marking "entity has no slot".
const EMPTY_SLOT: u32 = u32::MAX;

/// Densely packed storage for a single component type.
///
/// All index structures are pre-allocated at creation; insert and remove
/// are allocation-free and O(1).
///
/// # Invariants
///
/// - `dense.len() == entities.len()`, and slot `i` of `entities` owns slot
///   `i` of `dense`.
/// - `sparse` and `entities` are exact inverses for every occupied slot.
/// - `dense` has no unused slots; its length equals the number of entities
///   whose signature bit for this type is set.
pub struct ComponentStore<C: Component> {
    /// The packed component values.
    dense: Vec<C>,
    /// Slot index → owning entity.
    entities: Vec<Entity>,
    /// Entity index → slot index, or [`EMPTY_SLOT`].
    sparse: Box<[u32]>,
    /// The type id this store was registered under.
    type_id: ComponentTypeId,
}

impl<C: Component> ComponentStore<C> {
    /// Creates an empty store for up to `capacity` entities.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn new(capacity: usize, type_id: ComponentTypeId) -> Self {
        assert!(capacity > 0, "Capacity must be greater than zero");

        Self {
            dense: Vec::with_capacity(capacity),
            entities: Vec::with_capacity(capacity),
            sparse: vec![EMPTY_SLOT; capacity].into_boxed_slice(),
            type_id,
        }
    }

    /// Returns the type id this store was registered under.
    #[inline]
    #[must_use]
    pub const fn type_id(&self) -> ComponentTypeId {
        self.type_id
    }

    /// Returns the number of entities currently holding this component.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.dense.len()
    }

    /// Checks whether no entity holds this component.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }

    /// Checks whether `e` holds this component.
    #[inline]
    #[must_use]
    pub fn contains(&self, e: Entity) -> bool {
        self.slot(e).is_some()
    }

    /// Attaches `value` to `e`.
    ///
    /// Appends to the dense array and records both directions of the
    /// entity/slot mapping.
    ///
    /// # Errors
    ///
    /// [`EcsError::DuplicateComponent`] if `e` already has a slot. Inserts
    /// never overwrite an existing value.
    pub fn insert(&mut self, e: Entity, value: C) -> EcsResult<()> {
        if self.slot(e).is_some() {
            return Err(EcsError::DuplicateComponent {
                entity: e,
                type_id: self.type_id,
            });
        }

        let slot = self.dense.len() as u32;
        self.dense.push(value);
        self.entities.push(e);
        self.sparse[e.index()] = slot;
        Ok(())
    }

    /// Detaches `e`'s component and returns it.
    ///
    /// Swap-remove: the last element moves into the freed slot and both
    /// directions of the mapping are rewritten before the dense array
    /// shrinks, so no observer ever sees an inconsistent mapping.
    ///
    /// # Errors
    ///
    /// [`EcsError::MissingComponent`] if `e` has no slot.
    pub fn remove(&mut self, e: Entity) -> EcsResult<C> {
        let Some(slot) = self.slot(e) else {
            return Err(EcsError::MissingComponent {
                entity: e,
                type_id: self.type_id,
            });
        };

        let value = self.dense.swap_remove(slot);
        self.entities.swap_remove(slot);
        // The former last element (if any) now lives at `slot`; repoint its
        // sparse entry.
        if slot < self.entities.len() {
            let moved = self.entities[slot];
            self.sparse[moved.index()] = slot as u32;
        }
        self.sparse[e.index()] = EMPTY_SLOT;

        Ok(value)
    }

    /// Returns a reference to `e`'s component.
    ///
    /// The reference is tied to a shared borrow of the store, so it cannot
    /// outlive the next insert or remove - the borrow checker rejects any
    /// attempt to retain it across a mutation that could relocate elements.
    ///
    /// # Errors
    ///
    /// [`EcsError::MissingComponent`] if `e` has no slot.
    #[inline]
    pub fn get(&self, e: Entity) -> EcsResult<&C> {
        match self.slot(e) {
            Some(slot) => Ok(&self.dense[slot]),
            None => Err(EcsError::MissingComponent {
                entity: e,
                type_id: self.type_id,
            }),
        }
    }

    /// Returns a mutable reference to `e`'s component.
    ///
    /// # Errors
    ///
    /// [`EcsError::MissingComponent`] if `e` has no slot.
    #[inline]
    pub fn get_mut(&mut self, e: Entity) -> EcsResult<&mut C> {
        match self.slot(e) {
            Some(slot) => Ok(&mut self.dense[slot]),
            None => Err(EcsError::MissingComponent {
                entity: e,
                type_id: self.type_id,
            }),
        }
    }

    /// Removes `e`'s component if present; silently does nothing otherwise.
    ///
    /// Destruction cleanup must tolerate entities that never had this
    /// component type, so absence is not an error here.
    pub fn entity_destroyed(&mut self, e: Entity) {
        if self.contains(e) {
            // Presence was just checked.
            let _ = self.remove(e);
        }
    }

    /// Iterates over `(entity, component)` pairs in packed order.
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &C)> {
        self.entities.iter().copied().zip(self.dense.iter())
    }

    /// Iterates mutably over `(entity, component)` pairs in packed order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut C)> {
        self.entities.iter().copied().zip(self.dense.iter_mut())
    }

    /// Returns the packed component values as a slice.
    ///
    /// Useful for batch processing; slot order matches [`Self::entities`].
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[C] {
        &self.dense
    }

    /// Returns the owning entity of every packed slot, in slot order.
    #[inline]
    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    #[inline]
    fn slot(&self, e: Entity) -> Option<usize> {
        match self.sparse.get(e.index()) {
            Some(&slot) if slot != EMPTY_SLOT => Some(slot as usize),
            _ => None,
        }
    }
}
