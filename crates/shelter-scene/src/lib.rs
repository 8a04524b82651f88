//! Shelter Configurator Scene Graph Adapter
//!
//! Owns the lifecycle of loaded shelter models and provides mutation
//! primitives over them:
//! - SceneGraph / SceneNode: the in-memory model representation
//! - BoundingBox / BoundingSphere: framing volumes
//! - PartRole / PartBindings: semantic part resolution by naming convention
//! - load_glb_slice: binary glTF parsing into a SceneGraph
//! - SceneAdapter / SceneHandle: exclusive ownership and mutation ops

pub mod adapter;
pub mod bounds;
pub mod gltf_import;
pub mod graph;
pub mod loader;
pub mod parts;

pub use adapter::*;
pub use bounds::*;
pub use gltf_import::*;
pub use graph::*;
pub use loader::*;
pub use parts::*;
