//! # AETHER Core
//!
//! Data-oriented entity/component runtime:
//! - Entities are recycled indices with a per-entity signature bit vector
//! - Components are opaque payloads in densely packed per-type stores
//! - Systems declare a required signature and receive an always-current
//!   member set, without entities ever knowing about them
//!
//! ## Architecture Rules
//!
//! 1. **No heap allocations in the per-tick path** - entity-indexed memory
//!    is pre-allocated at world creation
//! 2. **Data-oriented design** - component stores stay contiguous through
//!    swap-remove compaction
//! 3. **Single-threaded mutation** - a simulation tick owns the world
//!    exclusively; the core takes no locks
//!
//! ## Example
//!
//! ```rust,ignore
//! use aether_core::{Signature, World};
//!
//! let mut world = World::new(100_000);
//! // Register component types and systems, then spawn away.
//! ```

pub mod ecs;
mod error;

pub use ecs::{
    Component, ComponentRegistry, ComponentStore, ComponentTypeId, Entity, EntityRegistry,
    Signature, System, SystemTracker, World, MAX_COMPONENTS, MAX_ENTITIES,
};
pub use error::{EcsError, EcsResult};
