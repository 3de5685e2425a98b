//! # System Interest Tracker
//!
//! Systems are external consumers identified by a tag type. Each registered
//! system declares a required [`Signature`]; the tracker maintains the set
//! of entities whose signature is a superset of it, updated incrementally
//! on every signature change.
//!
//! Entities never know about systems: the facade pushes signature-change
//! notifications here and the tracker does the rest.

use std::any::{type_name, Any, TypeId};
use std::collections::{BTreeMap, BTreeSet};

use super::component::Signature;
use super::entity::Entity;
use crate::error::{EcsError, EcsResult};

/// Marker trait for system tag types.
///
/// A system tag is a zero-knowledge handle: the tracker only uses its type
/// identity. Any `'static` type qualifies.
pub trait System: Any {}

impl<T: Any> System for T {}

/// One registered system: its required signature and current members.
struct SystemEntry {
    /// Bits an entity must all have to be a member.
    required: Signature,
    /// Entities currently matching `required`. Ordered for deterministic
    /// iteration by consumers.
    members: BTreeSet<Entity>,
}

/// Tracker of per-system membership sets.
///
/// All updates are O(number of registered systems); membership reads are
/// borrow-only.
#[derive(Default)]
pub struct SystemTracker {
    /// Registered systems keyed by tag type. `BTreeMap` keeps the
    /// re-evaluation order deterministic within a run.
    systems: BTreeMap<TypeId, SystemEntry>,
}

impl SystemTracker {
    /// Creates an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of registered systems.
    #[inline]
    #[must_use]
    pub fn system_count(&self) -> usize {
        self.systems.len()
    }

    /// Registers system tag `S` with an empty required signature and an
    /// empty member set.
    ///
    /// # Errors
    ///
    /// [`EcsError::AlreadyRegistered`] on duplicate registration.
    pub fn register<S: System>(&mut self) -> EcsResult<()> {
        let key = TypeId::of::<S>();
        if self.systems.contains_key(&key) {
            return Err(EcsError::AlreadyRegistered {
                type_name: type_name::<S>(),
            });
        }

        self.systems.insert(
            key,
            SystemEntry {
                required: Signature::EMPTY,
                members: BTreeSet::new(),
            },
        );
        Ok(())
    }

    /// Stores the required signature for `S`.
    ///
    /// This performs no retroactive scan: membership only changes through
    /// [`Self::entity_signature_changed`]. The facade layers a retroactive
    /// re-evaluation on top, so integrators normally never observe that.
    ///
    /// # Errors
    ///
    /// [`EcsError::UnregisteredSystem`] if `S` was never registered.
    pub fn set_signature<S: System>(&mut self, sig: Signature) -> EcsResult<()> {
        let entry = self.entry_mut::<S>()?;
        entry.required = sig;
        Ok(())
    }

    /// Returns the required signature of `S`.
    ///
    /// # Errors
    ///
    /// [`EcsError::UnregisteredSystem`] if `S` was never registered.
    pub fn required<S: System>(&self) -> EcsResult<Signature> {
        self.entry::<S>().map(|entry| entry.required)
    }

    /// Returns the current member set of `S`, in entity order.
    ///
    /// # Errors
    ///
    /// [`EcsError::UnregisteredSystem`] if `S` was never registered.
    pub fn members<S: System>(&self) -> EcsResult<&BTreeSet<Entity>> {
        self.entry::<S>().map(|entry| &entry.members)
    }

    /// Re-evaluates `e` against every registered system.
    ///
    /// Inserts `e` where `new_sig` covers the system's requirement, removes
    /// it where it no longer does. Idempotent in both directions.
    pub fn entity_signature_changed(&mut self, e: Entity, new_sig: Signature) {
        for entry in self.systems.values_mut() {
            if new_sig.is_superset_of(entry.required) {
                entry.members.insert(e);
            } else {
                entry.members.remove(&e);
            }
        }
    }

    /// Removes `e` from every member set unconditionally.
    pub fn entity_destroyed(&mut self, e: Entity) {
        for entry in self.systems.values_mut() {
            entry.members.remove(&e);
        }
    }

    fn entry<S: System>(&self) -> EcsResult<&SystemEntry> {
        self.systems
            .get(&TypeId::of::<S>())
            .ok_or(EcsError::UnregisteredSystem {
                type_name: type_name::<S>(),
            })
    }

    fn entry_mut<S: System>(&mut self) -> EcsResult<&mut SystemEntry> {
        self.systems
            .get_mut(&TypeId::of::<S>())
            .ok_or(EcsError::UnregisteredSystem {
                type_name: type_name::<S>(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::component::ComponentTypeId;

    struct Movement;
    struct Rendering;

    fn sig(bits: &[u8]) -> Signature {
        bits.iter()
            .fold(Signature::EMPTY, |s, &b| s.with(ComponentTypeId::new(b)))
    }

    #[test]
    fn test_register_and_duplicate() {
        let mut tracker = SystemTracker::new();
        tracker.register::<Movement>().unwrap();

        assert!(matches!(
            tracker.register::<Movement>(),
            Err(EcsError::AlreadyRegistered { .. })
        ));
        assert_eq!(tracker.system_count(), 1);
    }

    #[test]
    fn test_unregistered_rejected() {
        let tracker = SystemTracker::new();
        assert!(matches!(
            tracker.members::<Movement>(),
            Err(EcsError::UnregisteredSystem { .. })
        ));
    }

    #[test]
    fn test_membership_follows_signature() {
        let mut tracker = SystemTracker::new();
        tracker.register::<Movement>().unwrap();
        tracker.set_signature::<Movement>(sig(&[0, 1])).unwrap();

        let e = Entity::new(7);

        // Partial match: not a member.
        tracker.entity_signature_changed(e, sig(&[0]));
        assert!(!tracker.members::<Movement>().unwrap().contains(&e));

        // Superset: member. Repeating the notification is idempotent.
        tracker.entity_signature_changed(e, sig(&[0, 1, 2]));
        tracker.entity_signature_changed(e, sig(&[0, 1, 2]));
        assert_eq!(tracker.members::<Movement>().unwrap().len(), 1);

        // Losing a required bit evicts.
        tracker.entity_signature_changed(e, sig(&[1, 2]));
        assert!(tracker.members::<Movement>().unwrap().is_empty());
    }

    #[test]
    fn test_each_system_tracks_independently() {
        let mut tracker = SystemTracker::new();
        tracker.register::<Movement>().unwrap();
        tracker.register::<Rendering>().unwrap();
        tracker.set_signature::<Movement>(sig(&[0, 1])).unwrap();
        tracker.set_signature::<Rendering>(sig(&[2])).unwrap();

        let e = Entity::new(0);
        tracker.entity_signature_changed(e, sig(&[0, 1]));
        assert!(tracker.members::<Movement>().unwrap().contains(&e));
        assert!(!tracker.members::<Rendering>().unwrap().contains(&e));
    }

    #[test]
    fn test_entity_destroyed_drains_all() {
        let mut tracker = SystemTracker::new();
        tracker.register::<Movement>().unwrap();
        tracker.register::<Rendering>().unwrap();
        // Empty requirement matches everything.
        let e = Entity::new(1);
        tracker.entity_signature_changed(e, Signature::EMPTY);
        assert!(tracker.members::<Movement>().unwrap().contains(&e));

        tracker.entity_destroyed(e);
        assert!(tracker.members::<Movement>().unwrap().is_empty());
        assert!(tracker.members::<Rendering>().unwrap().is_empty());
    }

    #[test]
    fn test_set_signature_alone_does_not_scan() {
        let mut tracker = SystemTracker::new();
        tracker.register::<Movement>().unwrap();

        let e = Entity::new(0);
        tracker.entity_signature_changed(e, sig(&[0]));
        assert!(tracker.members::<Movement>().unwrap().contains(&e));

        // Tightening the requirement does not re-check existing members;
        // only the next notification does.
        tracker.set_signature::<Movement>(sig(&[0, 1])).unwrap();
        assert!(tracker.members::<Movement>().unwrap().contains(&e));
        tracker.entity_signature_changed(e, sig(&[0]));
        assert!(!tracker.members::<Movement>().unwrap().contains(&e));
    }
}
