//! # Entity Component System
//!
//! A fixed-capacity entity/component runtime.
//!
//! ## Design
//!
//! - Entity-indexed memory is pre-allocated at world creation
//! - Component values live in densely packed per-type stores
//! - Each entity carries a signature bit vector of its attached types
//! - System membership is maintained incrementally from signature changes

mod component;
mod entity;
mod registry;
mod storage;
mod system;
mod world;

pub use component::{Component, ComponentTypeId, Signature, MAX_COMPONENTS};
pub use entity::{Entity, EntityRegistry, MAX_ENTITIES};
pub use registry::ComponentRegistry;
pub use storage::ComponentStore;
pub use system::{System, SystemTracker};
pub use world::World;
