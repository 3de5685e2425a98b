//! # Component Registry
//!
//! Assigns a [`ComponentTypeId`] to each component type on first
//! registration and owns one [`ComponentStore`] per registered type.
//!
//! Stores are held behind a minimal erased interface: the only operation
//! the registry needs without knowing the concrete type is the destruction
//! fan-out. Typed access goes through safe `Any` downcasts keyed by the
//! registration map - no unsafe casting.

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;

use super::component::{Component, ComponentTypeId, MAX_COMPONENTS};
use super::entity::Entity;
use super::storage::ComponentStore;
use crate::error::{EcsError, EcsResult};

/// The two operations every store supports without its concrete type.
trait ErasedStore: Send + Sync {
    /// Drops the entity's value if the store holds one.
    fn entity_destroyed(&mut self, e: Entity);

    /// Upcasts for typed downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast for typed downcasting.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<C: Component> ErasedStore for ComponentStore<C> {
    fn entity_destroyed(&mut self, e: Entity) {
        ComponentStore::entity_destroyed(self, e);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Owner of all component stores, keyed by registration order.
///
/// Registration assigns ids from a monotonic counter starting at 0; the
/// store for type id `k` sits at index `k` of the store list.
pub struct ComponentRegistry {
    /// Rust type → assigned type id.
    type_ids: HashMap<TypeId, ComponentTypeId>,
    /// Stores in registration order, indexed by type id.
    stores: Vec<Box<dyn ErasedStore>>,
    /// Entity capacity handed to each new store.
    capacity: usize,
}

impl ComponentRegistry {
    /// Creates an empty registry whose stores will hold up to `capacity`
    /// entities each.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            type_ids: HashMap::new(),
            stores: Vec::new(),
            capacity,
        }
    }

    /// Returns the number of component types registered so far.
    #[inline]
    #[must_use]
    pub fn type_count(&self) -> usize {
        self.stores.len()
    }

    /// Registers component type `C`, creating its empty store.
    ///
    /// Must be called before any insert/remove/get involving `C`.
    ///
    /// # Errors
    ///
    /// [`EcsError::AlreadyRegistered`] if `C` was registered before;
    /// [`EcsError::ComponentLimitReached`] once [`MAX_COMPONENTS`] types
    /// exist.
    pub fn register<C: Component>(&mut self) -> EcsResult<ComponentTypeId> {
        if self.type_ids.contains_key(&TypeId::of::<C>()) {
            return Err(EcsError::AlreadyRegistered {
                type_name: type_name::<C>(),
            });
        }
        if self.stores.len() >= MAX_COMPONENTS {
            return Err(EcsError::ComponentLimitReached {
                max: MAX_COMPONENTS,
            });
        }

        let id = ComponentTypeId::new(self.stores.len() as u8);
        self.type_ids.insert(TypeId::of::<C>(), id);
        self.stores
            .push(Box::new(ComponentStore::<C>::new(self.capacity, id)));
        Ok(id)
    }

    /// Returns the type id assigned to `C`.
    ///
    /// # Errors
    ///
    /// [`EcsError::UnregisteredComponent`] if `C` was never registered.
    #[inline]
    pub fn type_id<C: Component>(&self) -> EcsResult<ComponentTypeId> {
        self.type_ids
            .get(&TypeId::of::<C>())
            .copied()
            .ok_or(EcsError::UnregisteredComponent {
                type_name: type_name::<C>(),
            })
    }

    /// Returns the store for `C`.
    ///
    /// # Errors
    ///
    /// [`EcsError::UnregisteredComponent`] if `C` was never registered.
    pub fn store<C: Component>(&self) -> EcsResult<&ComponentStore<C>> {
        let id = self.type_id::<C>()?;
        // The map and the store list are only ever grown together, so the
        // downcast cannot fail for a mapped id.
        Ok(self.stores[id.index()]
            .as_any()
            .downcast_ref::<ComponentStore<C>>()
            .unwrap_or_else(|| unreachable!("store list out of step with type map")))
    }

    /// Returns the mutable store for `C`.
    ///
    /// # Errors
    ///
    /// [`EcsError::UnregisteredComponent`] if `C` was never registered.
    pub fn store_mut<C: Component>(&mut self) -> EcsResult<&mut ComponentStore<C>> {
        let id = Self::type_id::<C>(self)?;
        Ok(self.stores[id.index()]
            .as_any_mut()
            .downcast_mut::<ComponentStore<C>>()
            .unwrap_or_else(|| unreachable!("store list out of step with type map")))
    }

    /// Fans "entity destroyed" out to every registered store.
    ///
    /// O(number of component types ever registered), independent of how
    /// many entities are live.
    pub fn entity_destroyed(&mut self, e: Entity) {
        for store in &mut self.stores {
            store.entity_destroyed(e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Health(u32);
    #[derive(Debug, PartialEq)]
    struct Armor(u32);

    #[test]
    fn test_ids_assigned_in_registration_order() {
        let mut registry = ComponentRegistry::new(8);

        let health = registry.register::<Health>().unwrap();
        let armor = registry.register::<Armor>().unwrap();
        assert_eq!(health.index(), 0);
        assert_eq!(armor.index(), 1);
        assert_eq!(registry.type_count(), 2);

        assert_eq!(registry.type_id::<Health>().unwrap(), health);
        assert_eq!(registry.type_id::<Armor>().unwrap(), armor);
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut registry = ComponentRegistry::new(8);
        registry.register::<Health>().unwrap();

        assert!(matches!(
            registry.register::<Health>(),
            Err(EcsError::AlreadyRegistered { .. })
        ));
        assert_eq!(registry.type_count(), 1);
    }

    #[test]
    fn test_unregistered_access_rejected() {
        let registry = ComponentRegistry::new(8);
        assert!(matches!(
            registry.type_id::<Health>(),
            Err(EcsError::UnregisteredComponent { .. })
        ));
        assert!(registry.store::<Health>().is_err());
    }

    #[test]
    fn test_typed_access_round_trip() {
        let mut registry = ComponentRegistry::new(8);
        registry.register::<Health>().unwrap();
        registry.register::<Armor>().unwrap();

        let e = Entity::new(3);
        registry.store_mut::<Health>().unwrap().insert(e, Health(50)).unwrap();
        registry.store_mut::<Armor>().unwrap().insert(e, Armor(10)).unwrap();

        assert_eq!(registry.store::<Health>().unwrap().get(e).unwrap().0, 50);
        assert_eq!(registry.store::<Armor>().unwrap().get(e).unwrap().0, 10);
    }

    #[test]
    fn test_destruction_fan_out() {
        let mut registry = ComponentRegistry::new(8);
        registry.register::<Health>().unwrap();
        registry.register::<Armor>().unwrap();

        let e = Entity::new(0);
        registry.store_mut::<Health>().unwrap().insert(e, Health(1)).unwrap();
        // `e` never had Armor; the fan-out must tolerate that.
        registry.entity_destroyed(e);

        assert!(registry.store::<Health>().unwrap().is_empty());
        assert!(registry.store::<Armor>().unwrap().is_empty());
    }
}
