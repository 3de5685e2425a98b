//! # Runtime Error Types
//!
//! All errors that can occur in the entity/component runtime.
//!
//! Every error is a local, synchronous, caller-visible failure. The core
//! never retries and never terminates the process; callers decide whether a
//! given failure is recoverable (reject the spawn) or a configuration bug
//! (raise the capacity and rebuild).

use thiserror::Error;

/// Errors that can occur in the entity/component runtime.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EcsError {
    /// The entity pool is exhausted; no free identifier remains.
    #[error("entity capacity exceeded: {capacity} entities already live")]
    CapacityExceeded {
        /// The fixed entity capacity of the world.
        capacity: usize,
    },

    /// The entity identifier is out of range or not currently live.
    #[error("invalid entity: {0:?}")]
    InvalidEntity(crate::ecs::Entity),

    /// The entity already has a component of this type.
    ///
    /// Inserts never overwrite; remove the existing value first.
    #[error("entity {entity:?} already has component type {type_id:?}")]
    DuplicateComponent {
        /// The entity that already owns a value.
        entity: crate::ecs::Entity,
        /// The offending component type.
        type_id: crate::ecs::ComponentTypeId,
    },

    /// The entity has no component of this type.
    #[error("entity {entity:?} has no component of type {type_id:?}")]
    MissingComponent {
        /// The entity that lacks the value.
        entity: crate::ecs::Entity,
        /// The component type that was requested.
        type_id: crate::ecs::ComponentTypeId,
    },

    /// The component type or system was registered before.
    #[error("type already registered: {type_name}")]
    AlreadyRegistered {
        /// Name of the duplicate type, for diagnostics.
        type_name: &'static str,
    },

    /// The component type was never registered.
    #[error("component type not registered: {type_name}")]
    UnregisteredComponent {
        /// Name of the missing component type, for diagnostics.
        type_name: &'static str,
    },

    /// The system tag was never registered.
    #[error("system not registered: {type_name}")]
    UnregisteredSystem {
        /// Name of the missing system tag, for diagnostics.
        type_name: &'static str,
    },

    /// All component type identifiers are in use.
    #[error("component type limit reached: {max} types already registered")]
    ComponentLimitReached {
        /// The fixed component type limit.
        max: usize,
    },
}

/// Result type for runtime operations.
pub type EcsResult<T> = Result<T, EcsError>;
