//! Shelter Configurator Session Layer
//!
//! Ties the core together for a UI shell:
//! - AssetResolver / AssetStore: logical paths to fetchable URLs with
//!   local fallback
//! - ViewSynchronizer: configuration diffs driving the scene adapter,
//!   with last-request-wins model swaps
//! - ConfiguratorSession: the command/event surface a control panel binds

pub mod resolver;
pub mod session;
pub mod sync;

pub use resolver::*;
pub use session::*;
pub use sync::*;
