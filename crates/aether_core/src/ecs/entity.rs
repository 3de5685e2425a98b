//! # Entity Registry
//!
//! Entities are plain indices with no payload and no behavior. The registry
//! allocates and recycles them and stores one [`Signature`] per live entity.
//!
//! Identifier recycling is FIFO: a destroyed identifier goes to the back of
//! the free queue, so a very recently destroyed id is not the next one
//! issued unless the pool is nearly exhausted.

use std::collections::VecDeque;

use super::component::Signature;
use crate::error::{EcsError, EcsResult};

/// Default upper bound on simultaneously live entities.
///
/// [`crate::World::default`] uses this capacity; `World::new` accepts any
/// explicit capacity. Exceeding the capacity at run time is a hard failure
/// ([`EcsError::CapacityExceeded`]), never a resize.
pub const MAX_ENTITIES: usize = 5_000;

/// Unique identifier for an entity.
///
/// An entity is an opaque index in `[0, capacity)`. It carries no data;
/// component values live in their stores and systems never hold entities
/// beyond membership bookkeeping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Entity(u32);

impl Entity {
    #[inline]
    pub(crate) const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw index of this entity.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Allocator and signature table for entities.
///
/// All memory is pre-allocated at creation: entity slots, signatures, and
/// the free queue. Create and destroy are allocation-free.
pub struct EntityRegistry {
    /// FIFO queue of free entity indices.
    free: VecDeque<u32>,
    /// Per-slot signature; meaningful only while the slot is live.
    signatures: Box<[Signature]>,
    /// Per-slot liveness flag.
    live: Box<[bool]>,
    /// Number of currently live entities.
    live_count: usize,
    /// Maximum capacity.
    capacity: usize,
}

impl EntityRegistry {
    /// Creates a registry with the given fixed capacity.
    ///
    /// The free queue initially holds `0..capacity` in order.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero or exceeds `u32::MAX`.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Capacity must be greater than zero");
        assert!(
            capacity <= u32::MAX as usize,
            "Capacity cannot exceed u32::MAX"
        );

        Self {
            free: (0..capacity as u32).collect(),
            signatures: vec![Signature::EMPTY; capacity].into_boxed_slice(),
            live: vec![false; capacity].into_boxed_slice(),
            live_count: 0,
            capacity,
        }
    }

    /// Returns the fixed capacity of this registry.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of currently live entities.
    #[inline]
    #[must_use]
    pub const fn live_count(&self) -> usize {
        self.live_count
    }

    /// Allocates a new entity with an empty signature.
    ///
    /// Pops the front of the free queue. No components are attached
    /// implicitly.
    ///
    /// # Errors
    ///
    /// [`EcsError::CapacityExceeded`] when `capacity` entities are already
    /// live. No identifier is consumed on failure.
    pub fn create(&mut self) -> EcsResult<Entity> {
        let Some(index) = self.free.pop_front() else {
            return Err(EcsError::CapacityExceeded {
                capacity: self.capacity,
            });
        };

        let idx = index as usize;
        self.signatures[idx] = Signature::EMPTY;
        self.live[idx] = true;
        self.live_count += 1;

        Ok(Entity::new(index))
    }

    /// Destroys an entity, returning its identifier to the back of the
    /// free queue.
    ///
    /// Clears the signature only. Component stores and system member sets
    /// are deliberately untouched here; the [`crate::World`] facade
    /// sequences that cleanup so alternate facades can reorder it.
    ///
    /// # Errors
    ///
    /// [`EcsError::InvalidEntity`] if `e` is out of range or not live.
    pub fn destroy(&mut self, e: Entity) -> EcsResult<()> {
        self.check_live(e)?;

        let idx = e.index();
        self.signatures[idx] = Signature::EMPTY;
        self.live[idx] = false;
        self.live_count -= 1;
        self.free.push_back(e.index() as u32);

        Ok(())
    }

    /// Returns the entity's current signature.
    ///
    /// # Errors
    ///
    /// [`EcsError::InvalidEntity`] if `e` is out of range or not live.
    #[inline]
    pub fn signature(&self, e: Entity) -> EcsResult<Signature> {
        self.check_live(e)?;
        Ok(self.signatures[e.index()])
    }

    /// Overwrites the entity's signature.
    ///
    /// No consistency with store contents is enforced here; callers keep
    /// the bits in step with the stores they mutate.
    ///
    /// # Errors
    ///
    /// [`EcsError::InvalidEntity`] if `e` is out of range or not live.
    #[inline]
    pub fn set_signature(&mut self, e: Entity, sig: Signature) -> EcsResult<()> {
        self.check_live(e)?;
        self.signatures[e.index()] = sig;
        Ok(())
    }

    /// Iterates over all live entities with their signatures.
    pub fn iter_live(&self) -> impl Iterator<Item = (Entity, Signature)> + '_ {
        self.live
            .iter()
            .enumerate()
            .filter(|(_, live)| **live)
            .map(|(idx, _)| (Entity::new(idx as u32), self.signatures[idx]))
    }

    #[inline]
    fn check_live(&self, e: Entity) -> EcsResult<()> {
        if e.index() < self.capacity && self.live[e.index()] {
            Ok(())
        } else {
            Err(EcsError::InvalidEntity(e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::component::ComponentTypeId;

    #[test]
    fn test_create_destroy() {
        let mut registry = EntityRegistry::new(100);

        let a = registry.create().unwrap();
        assert_eq!(registry.live_count(), 1);
        assert!(registry.signature(a).unwrap().is_empty());

        registry.destroy(a).unwrap();
        assert_eq!(registry.live_count(), 0);
        assert_eq!(registry.signature(a), Err(EcsError::InvalidEntity(a)));
    }

    #[test]
    fn test_fifo_reuse() {
        let mut registry = EntityRegistry::new(100);

        let ids: Vec<_> = (0..3).map(|_| registry.create().unwrap()).collect();
        for &e in &ids {
            registry.destroy(e).unwrap();
        }

        // The freed ids come back in destruction order, after the 97 ids
        // that were never issued.
        for _ in 0..97 {
            registry.create().unwrap();
        }
        for &e in &ids {
            assert_eq!(registry.create().unwrap(), e);
        }
    }

    #[test]
    fn test_capacity_exceeded() {
        let mut registry = EntityRegistry::new(2);
        registry.create().unwrap();
        registry.create().unwrap();

        assert_eq!(
            registry.create(),
            Err(EcsError::CapacityExceeded { capacity: 2 })
        );
        // Failure consumed nothing: freeing one makes create succeed again.
        assert_eq!(registry.live_count(), 2);
    }

    #[test]
    fn test_double_destroy_rejected() {
        let mut registry = EntityRegistry::new(10);
        let e = registry.create().unwrap();

        registry.destroy(e).unwrap();
        assert_eq!(registry.destroy(e), Err(EcsError::InvalidEntity(e)));
        // The free queue holds each id exactly once.
        let issued: Vec<_> = (0..10).map(|_| registry.create().unwrap()).collect();
        assert!(registry.create().is_err());
        let mut indices: Vec<_> = issued.iter().map(|e| e.index()).collect();
        indices.sort_unstable();
        indices.dedup();
        assert_eq!(indices.len(), 10);
    }

    #[test]
    fn test_signature_reset_on_reuse() {
        let mut registry = EntityRegistry::new(1);
        let e = registry.create().unwrap();
        registry
            .set_signature(e, Signature::EMPTY.with(ComponentTypeId::new(3)))
            .unwrap();

        registry.destroy(e).unwrap();
        let e2 = registry.create().unwrap();
        assert_eq!(e2, e);
        assert!(registry.signature(e2).unwrap().is_empty());
    }
}
