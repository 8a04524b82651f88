//! Shelter Configurator Core Data Structures
//!
//! This crate contains the renderer-independent core of the configurator:
//! - ColorValue: customization color with hex parsing
//! - EnvironmentPreset / LightingConfig: scene presentation presets
//! - ShelterConfiguration / ConfigState: canonical session state and its
//!   transition rules
//! - ConfiguratorEvent / EventBus: typed feedback events for the UI shell
//! - ModelDescriptor / ModelCatalog: the loadable shelter models

pub mod catalog;
pub mod color;
pub mod config;
pub mod events;
pub mod presets;

pub use catalog::*;
pub use color::*;
pub use config::*;
pub use events::*;
pub use presets::*;
