//! # ECS World
//!
//! The facade over the entity registry, component registry, and system
//! tracker. External collaborators call only this type; it sequences the
//! three parts so no caller ever observes an inconsistent intermediate
//! state.
//!
//! Every operation validates before it mutates: after the first mutation of
//! a multi-step operation succeeds, the remaining steps cannot fail, so an
//! error never leaves the world in a partial state.

use tracing::{debug, trace};

use super::component::{Component, ComponentTypeId, Signature};
use super::entity::{Entity, EntityRegistry, MAX_ENTITIES};
use super::registry::ComponentRegistry;
use super::system::{System, SystemTracker};
use crate::error::EcsResult;

/// The ECS world: entity identity, component presence, and system
/// membership under one roof.
///
/// Single-threaded by contract: mutation requires `&mut World`, and the
/// core takes no locks. A simulation tick owns the world exclusively;
/// external orchestration serializes access or shards entities across
/// disjoint worlds.
///
/// # Example
///
/// ```
/// use aether_core::{Signature, World};
///
/// struct Position(f32, f32);
/// struct Velocity(f32, f32);
/// struct Movement;
///
/// let mut world = World::new(1024);
/// let position = world.register_component::<Position>()?;
/// let velocity = world.register_component::<Velocity>()?;
/// world.register_system::<Movement>()?;
/// world.set_system_signature::<Movement>(
///     Signature::EMPTY.with(position).with(velocity),
/// )?;
///
/// let e = world.create_entity()?;
/// world.add_component(e, Position(0.0, 0.0))?;
/// world.add_component(e, Velocity(1.0, 0.0))?;
/// assert!(world.system_members::<Movement>()?.contains(&e));
/// # Ok::<(), aether_core::EcsError>(())
/// ```
pub struct World {
    /// Identifier allocation and per-entity signatures.
    entities: EntityRegistry,
    /// Type ids and one packed store per registered component type.
    components: ComponentRegistry,
    /// Required signatures and member sets per registered system.
    systems: SystemTracker,
}

impl World {
    /// Creates a world with the given fixed entity capacity.
    ///
    /// All entity-indexed memory is allocated here; no operation grows it
    /// later.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero or exceeds `u32::MAX`.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            entities: EntityRegistry::new(capacity),
            components: ComponentRegistry::new(capacity),
            systems: SystemTracker::new(),
        }
    }

    /// Returns the fixed entity capacity.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.entities.capacity()
    }

    /// Returns the number of currently live entities.
    #[inline]
    #[must_use]
    pub const fn live_count(&self) -> usize {
        self.entities.live_count()
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Registers component type `C` and returns its assigned type id.
    ///
    /// Must precede any `add`/`remove`/`get` involving `C`.
    ///
    /// # Errors
    ///
    /// [`crate::EcsError::AlreadyRegistered`] on duplicate registration;
    /// [`crate::EcsError::ComponentLimitReached`] when all type ids are in
    /// use.
    pub fn register_component<C: Component>(&mut self) -> EcsResult<ComponentTypeId> {
        let id = self.components.register::<C>()?;
        debug!(
            component = std::any::type_name::<C>(),
            type_id = id.index(),
            "registered component type"
        );
        Ok(id)
    }

    /// Returns the type id assigned to `C`, for building signatures.
    ///
    /// # Errors
    ///
    /// [`crate::EcsError::UnregisteredComponent`] if `C` was never
    /// registered.
    #[inline]
    pub fn component_id<C: Component>(&self) -> EcsResult<ComponentTypeId> {
        self.components.type_id::<C>()
    }

    /// Registers system tag `S` with an empty requirement and no members.
    ///
    /// # Errors
    ///
    /// [`crate::EcsError::AlreadyRegistered`] on duplicate registration.
    pub fn register_system<S: System>(&mut self) -> EcsResult<()> {
        self.systems.register::<S>()?;
        debug!(system = std::any::type_name::<S>(), "registered system");
        Ok(())
    }

    /// Sets the required signature of system `S` and re-evaluates every
    /// live entity against it.
    ///
    /// The retroactive scan means registration order does not matter:
    /// systems registered after entities already exist still see a correct
    /// member set. Cost is O(live entities), which in practice happens at
    /// startup.
    ///
    /// # Errors
    ///
    /// [`crate::EcsError::UnregisteredSystem`] if `S` was never registered.
    pub fn set_system_signature<S: System>(&mut self, sig: Signature) -> EcsResult<()> {
        self.systems.set_signature::<S>(sig)?;
        for (e, entity_sig) in self.entities.iter_live() {
            self.systems.entity_signature_changed(e, entity_sig);
        }
        debug!(
            system = std::any::type_name::<S>(),
            signature = ?sig,
            "system signature set"
        );
        Ok(())
    }

    /// Returns the current member set of system `S`, ordered by entity.
    ///
    /// # Errors
    ///
    /// [`crate::EcsError::UnregisteredSystem`] if `S` was never registered.
    #[inline]
    pub fn system_members<S: System>(&self) -> EcsResult<&std::collections::BTreeSet<Entity>> {
        self.systems.members::<S>()
    }

    // =========================================================================
    // Entity lifecycle
    // =========================================================================

    /// Creates a new entity with no components.
    ///
    /// # Errors
    ///
    /// [`crate::EcsError::CapacityExceeded`] when the pool is exhausted;
    /// no identifier is consumed on failure.
    pub fn create_entity(&mut self) -> EcsResult<Entity> {
        let e = self.entities.create()?;
        trace!(entity = e.index(), "created entity");
        Ok(e)
    }

    /// Destroys an entity: signature reset, every store drained, every
    /// member set drained, identifier recycled (FIFO).
    ///
    /// # Errors
    ///
    /// [`crate::EcsError::InvalidEntity`] if `e` is out of range or not
    /// live. Nothing is mutated on failure.
    pub fn destroy_entity(&mut self, e: Entity) -> EcsResult<()> {
        self.entities.destroy(e)?;
        self.components.entity_destroyed(e);
        self.systems.entity_destroyed(e);
        trace!(entity = e.index(), "destroyed entity");
        Ok(())
    }

    /// Returns the entity's current signature.
    ///
    /// # Errors
    ///
    /// [`crate::EcsError::InvalidEntity`] if `e` is out of range or not
    /// live.
    #[inline]
    pub fn signature(&self, e: Entity) -> EcsResult<Signature> {
        self.entities.signature(e)
    }

    // =========================================================================
    // Component attachment
    // =========================================================================

    /// Attaches `value` to `e`: store insert, then signature bit set, then
    /// system membership re-evaluation.
    ///
    /// All checks run before the first mutation, so a failed call leaves
    /// the store, the signature, and every member set untouched.
    ///
    /// # Errors
    ///
    /// [`crate::EcsError::InvalidEntity`] for a dead or out-of-range `e`;
    /// [`crate::EcsError::UnregisteredComponent`] if `C` was never
    /// registered; [`crate::EcsError::DuplicateComponent`] if `e` already
    /// has a `C` (inserts never overwrite).
    pub fn add_component<C: Component>(&mut self, e: Entity, value: C) -> EcsResult<()> {
        let sig = self.entities.signature(e)?;
        let id = self.components.type_id::<C>()?;
        self.components.store_mut::<C>()?.insert(e, value)?;

        // Infallible from here: entity and registration were just checked.
        let new_sig = sig.with(id);
        self.entities.set_signature(e, new_sig)?;
        self.systems.entity_signature_changed(e, new_sig);
        trace!(entity = e.index(), type_id = id.index(), "added component");
        Ok(())
    }

    /// Detaches `e`'s `C` and returns it: store remove, then signature bit
    /// clear, then system membership re-evaluation.
    ///
    /// # Errors
    ///
    /// [`crate::EcsError::InvalidEntity`] for a dead or out-of-range `e`;
    /// [`crate::EcsError::UnregisteredComponent`] if `C` was never
    /// registered; [`crate::EcsError::MissingComponent`] if `e` has no `C`.
    pub fn remove_component<C: Component>(&mut self, e: Entity) -> EcsResult<C> {
        let sig = self.entities.signature(e)?;
        let id = self.components.type_id::<C>()?;
        let value = self.components.store_mut::<C>()?.remove(e)?;

        let new_sig = sig.without(id);
        self.entities.set_signature(e, new_sig)?;
        self.systems.entity_signature_changed(e, new_sig);
        trace!(entity = e.index(), type_id = id.index(), "removed component");
        Ok(value)
    }

    /// Returns a reference to `e`'s `C`.
    ///
    /// The borrow checker ties the reference to a shared borrow of the
    /// world, so it cannot be retained across any mutating call that could
    /// relocate store elements.
    ///
    /// # Errors
    ///
    /// [`crate::EcsError::InvalidEntity`],
    /// [`crate::EcsError::UnregisteredComponent`], or
    /// [`crate::EcsError::MissingComponent`], as for
    /// [`Self::remove_component`].
    pub fn get_component<C: Component>(&self, e: Entity) -> EcsResult<&C> {
        self.entities.signature(e)?;
        self.components.store::<C>()?.get(e)
    }

    /// Returns a mutable reference to `e`'s `C`.
    ///
    /// # Errors
    ///
    /// As for [`Self::get_component`].
    pub fn get_component_mut<C: Component>(&mut self, e: Entity) -> EcsResult<&mut C> {
        self.entities.signature(e)?;
        self.components.store_mut::<C>()?.get_mut(e)
    }

    /// Checks whether `e` currently has a `C`.
    ///
    /// # Errors
    ///
    /// [`crate::EcsError::InvalidEntity`] or
    /// [`crate::EcsError::UnregisteredComponent`].
    pub fn has_component<C: Component>(&self, e: Entity) -> EcsResult<bool> {
        let sig = self.entities.signature(e)?;
        let id = self.components.type_id::<C>()?;
        Ok(sig.contains(id))
    }

    /// Returns the packed store for `C`, for linear iteration over every
    /// entity holding it.
    ///
    /// # Errors
    ///
    /// [`crate::EcsError::UnregisteredComponent`] if `C` was never
    /// registered.
    #[inline]
    pub fn store<C: Component>(&self) -> EcsResult<&super::storage::ComponentStore<C>> {
        self.components.store::<C>()
    }
}

impl Default for World {
    /// A world at the default capacity, [`MAX_ENTITIES`].
    fn default() -> Self {
        Self::new(MAX_ENTITIES)
    }
}
