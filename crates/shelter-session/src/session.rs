//! Configurator session facade
//!
//! One session per shelter/model route. Composes the configuration state
//! machine, the view synchronizer, the asset resolver, and the model
//! catalog behind the command surface a control panel binds to. Commands
//! flow one way (panel → state machine → synchronizer → scene); feedback
//! flows back only as typed events.

use shelter_core::{
    ColorValue, ConfigState, ConfiguratorEvent, EnvironmentPreset, EventBus, LightingConfig,
    ModelCatalog, ShelterConfiguration, TransitionRejection,
};
use shelter_scene::{AssetLoadError, BoundingSphere, ModelSource, SceneGraph, load_glb_slice};
use thiserror::Error;

use crate::resolver::AssetResolver;
use crate::sync::{LoadOutcome, LoadTicket, ViewSynchronizer};

/// Errors from session commands
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Slug not present in the model catalog; the UI shows a not-found
    /// state rather than crashing
    #[error("Unknown model: {0}")]
    UnknownModel(String),
}

/// One configurator session: canonical state plus everything that keeps
/// the scene in sync with it
pub struct ConfiguratorSession {
    state: ConfigState,
    sync: ViewSynchronizer,
    resolver: AssetResolver,
    catalog: ModelCatalog,
    bus: EventBus,
}

impl ConfiguratorSession {
    pub fn new(catalog: ModelCatalog, resolver: AssetResolver) -> Self {
        Self {
            state: ConfigState::new(),
            sync: ViewSynchronizer::new(),
            resolver,
            catalog,
            bus: EventBus::new(),
        }
    }

    /// Session over the built-in product catalog with local-only asset
    /// resolution
    pub fn with_builtin_catalog() -> Self {
        Self::new(ModelCatalog::builtin(), AssetResolver::new())
    }

    /// Register an event handler for the feedback surface
    pub fn subscribe(&mut self, handler: impl FnMut(&ConfiguratorEvent) + 'static) {
        self.bus.subscribe(handler);
    }

    /// The canonical configuration
    pub fn configuration(&self) -> &ShelterConfiguration {
        self.state.config()
    }

    /// Bounding sphere of the active model for camera framing
    pub fn bounds(&self) -> Option<BoundingSphere> {
        self.sync.bounds()
    }

    pub fn catalog(&self) -> &ModelCatalog {
        &self.catalog
    }

    /// The view synchronizer, for hosts rendering the scene graph
    pub fn synchronizer(&self) -> &ViewSynchronizer {
        &self.sync
    }

    // --- Model loading ---------------------------------------------------

    /// Begin switching to a catalog model. Resolves the asset and returns
    /// the load ticket the host fetch pipeline completes via
    /// [`finish_load`](Self::finish_load) or
    /// [`load_model_bytes`](Self::load_model_bytes). The current model
    /// stays interactive until the new one commits.
    pub fn select_model(&mut self, slug: &str) -> Result<LoadTicket, SessionError> {
        let descriptor = self
            .catalog
            .get(slug)
            .cloned()
            .ok_or_else(|| SessionError::UnknownModel(slug.to_string()))?;
        let url = self.resolver.resolve(&descriptor.asset_path);
        Ok(self.sync.begin_swap(&descriptor, url))
    }

    /// Deliver a load result for a ticket
    pub fn finish_load(
        &mut self,
        request_id: u64,
        result: Result<SceneGraph, AssetLoadError>,
    ) -> LoadOutcome {
        let config = self.state.config().clone();
        self.sync.finish_load(request_id, result, &config, &mut self.bus)
    }

    /// Parse GLB bytes and deliver them for a ticket
    pub fn load_model_bytes(&mut self, request_id: u64, bytes: &[u8]) -> LoadOutcome {
        self.finish_load(request_id, load_glb_slice(bytes))
    }

    /// Fetch a ticket's asset through a [`ModelSource`] and deliver it
    pub fn fetch_and_load(
        &mut self,
        ticket: &LoadTicket,
        source: &mut dyn ModelSource,
    ) -> LoadOutcome {
        match source.fetch(&ticket.url) {
            Ok(bytes) => self.load_model_bytes(ticket.request_id, &bytes),
            Err(e) => self.finish_load(ticket.request_id, Err(e)),
        }
    }

    // --- Configuration commands ------------------------------------------

    pub fn set_color(&mut self, color: ColorValue) {
        self.state.set_color(color);
        self.sync_scene();
    }

    /// Drop the color selection. Already-painted surfaces keep their
    /// paint; the cleared selection only means the next model load (or
    /// model swap) comes up in its factory finish.
    pub fn clear_color(&mut self) {
        self.state.clear_color();
        self.sync_scene();
    }

    pub fn set_deployed(&mut self, deployed: bool) {
        self.state.set_deployed(deployed);
        self.sync_scene();
    }

    pub fn toggle_deployed(&mut self) {
        self.state.toggle_deployed();
        self.sync_scene();
    }

    pub fn set_interior_view(&mut self, interior: bool) {
        self.state.set_interior_view(interior);
        self.sync_scene();
    }

    pub fn toggle_interior_view(&mut self) {
        self.state.toggle_interior_view();
        self.sync_scene();
    }

    /// Enter or leave the inside-camera view. Rejections emit
    /// `TransitionRejected` and leave state untouched; they never panic.
    pub fn set_inside_view(&mut self, inside: bool) -> Result<(), TransitionRejection> {
        match self.state.set_inside_view(inside) {
            Ok(()) => {
                self.sync_scene();
                Ok(())
            }
            Err(reason) => {
                self.bus
                    .emit(ConfiguratorEvent::TransitionRejected { reason });
                Err(reason)
            }
        }
    }

    pub fn toggle_inside_view(&mut self) -> Result<(), TransitionRejection> {
        let next = !self.state.config().is_inside_view;
        self.set_inside_view(next)
    }

    /// Switch the environment backdrop. Lighting is a separate axis and is
    /// left untouched; hosts wanting preset lighting call
    /// [`set_lighting`](Self::set_lighting) with
    /// [`LightingConfig::for_environment`] themselves.
    pub fn set_environment(&mut self, preset: EnvironmentPreset) {
        self.state.set_environment(preset);
        self.sync_scene();
    }

    pub fn set_lighting(&mut self, lighting: LightingConfig) {
        self.state.set_lighting(lighting);
        self.sync_scene();
    }

    pub fn set_show_scale_figure(&mut self, show: bool) {
        self.state.set_show_scale_figure(show);
        self.sync_scene();
    }

    /// Push the current configuration through the synchronizer. A scene
    /// error here means an operation raced a disposal, which the
    /// single-threaded model rules out; it is logged as a defect rather
    /// than crashing the interaction loop.
    fn sync_scene(&mut self) {
        let config = self.state.config().clone();
        if let Err(e) = self.sync.apply(&config, &mut self.bus) {
            tracing::error!("Scene synchronization failed: {}", e);
        }
    }
}

impl std::fmt::Debug for ConfiguratorSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfiguratorSession")
            .field("configuration", self.state.config())
            .field("load_in_flight", &self.sync.load_in_flight())
            .finish()
    }
}
