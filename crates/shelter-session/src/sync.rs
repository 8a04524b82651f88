//! View synchronizer: drives the scene adapter from configuration state
//!
//! This is the only component that both reads the configuration state and
//! writes the scene. Every pass applies mutations in a fixed order —
//! visibility before color before bounds recomputation — because painting
//! hidden geometry is still valid work, but bounds must reflect the final
//! visible set.
//!
//! Model swaps follow the protocol: load, locate parts, re-apply the full
//! current configuration to the new handle, commit, and only then dispose
//! the previous handle. The previous model stays interactive for the whole
//! flight, so the user never sees an empty scene.
//!
//! Loads are guarded by a monotonically increasing request id. When the
//! user switches models faster than loads complete, only the newest
//! request may commit; older results are discarded when they eventually
//! arrive (last-request-wins, no hard cancellation).

use shelter_core::{ConfiguratorEvent, EventBus, ModelDescriptor, ShelterConfiguration};
use shelter_scene::{
    AssetLoadError, BoundingSphere, NamingConvention, PartBindings, PartRole, SceneAdapter,
    SceneError, SceneGraph, SceneHandle,
};

/// An in-flight model load, handed to the host's fetch pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct LoadTicket {
    /// Monotonic request id; only the newest id may commit
    pub request_id: u64,
    /// Resolved URL to fetch
    pub url: String,
    /// Slug of the model being loaded
    pub slug: String,
}

/// Result of delivering a load result to the synchronizer
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// The new model is active with the full configuration applied
    Committed(BoundingSphere),
    /// The result belonged to a superseded request and was discarded
    Stale,
    /// The load failed; the previous model stays interactive
    Failed,
}

/// Subscribes to configuration changes and drives the scene adapter
#[derive(Debug, Default)]
pub struct ViewSynchronizer {
    adapter: SceneAdapter,
    convention: NamingConvention,
    bindings: Option<PartBindings>,
    /// Configuration as last applied to the active scene, for diffing
    applied: Option<ShelterConfiguration>,
    bounds: Option<BoundingSphere>,
    next_request: u64,
    current_request: Option<u64>,
}

impl ViewSynchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The scene adapter (exclusive scene owner); read access for hosts
    /// rendering the graph and for tests asserting handle lifecycles
    pub fn adapter(&self) -> &SceneAdapter {
        &self.adapter
    }

    /// Bounding sphere of the active model's visible geometry, for camera
    /// framing
    pub fn bounds(&self) -> Option<BoundingSphere> {
        self.bounds
    }

    /// True while a load request is awaiting its result
    pub fn load_in_flight(&self) -> bool {
        self.current_request.is_some()
    }

    /// Register a new model load. A newer ticket supersedes any older
    /// in-flight request; the active model stays live and interactive
    /// until the new one commits.
    pub fn begin_swap(&mut self, descriptor: &ModelDescriptor, url: String) -> LoadTicket {
        self.next_request += 1;
        let request_id = self.next_request;
        if let Some(superseded) = self.current_request.replace(request_id) {
            tracing::debug!(
                "Load request {} supersedes in-flight request {}",
                request_id,
                superseded
            );
        }
        tracing::info!(
            "Loading model '{}' from {} (request {})",
            descriptor.slug,
            url,
            request_id
        );
        LoadTicket {
            request_id,
            url,
            slug: descriptor.slug.clone(),
        }
    }

    /// Deliver the result of a load request.
    ///
    /// Stale results are discarded without touching the scene. On success
    /// the swap protocol runs to completion before the previous handle is
    /// disposed.
    pub fn finish_load(
        &mut self,
        request_id: u64,
        result: Result<SceneGraph, AssetLoadError>,
        config: &ShelterConfiguration,
        bus: &mut EventBus,
    ) -> LoadOutcome {
        if self.current_request != Some(request_id) {
            tracing::debug!("Discarding stale load result for request {}", request_id);
            return LoadOutcome::Stale;
        }
        self.current_request = None;

        let graph = match result {
            Ok(graph) => graph,
            Err(e) => {
                tracing::warn!("Model load failed for request {}: {}", request_id, e);
                bus.emit(ConfiguratorEvent::LoadFailed {
                    message: e.to_string(),
                });
                return LoadOutcome::Failed;
            }
        };

        let previous = self.adapter.active();
        let handle = self.adapter.insert(graph);
        let bindings = match self.adapter.graph(handle) {
            Ok(graph) => PartBindings::resolve(graph, &self.convention),
            Err(e) => return self.fail_swap(handle, e, bus),
        };

        let sphere = match self.apply_full(handle, &bindings, config) {
            Ok(sphere) => sphere,
            Err(e) => return self.fail_swap(handle, e, bus),
        };

        if let Err(e) = self.adapter.commit(handle) {
            return self.fail_swap(handle, e, bus);
        }

        // Old handle goes away only after the new one is fully applied
        if let Some(old) = previous
            && let Err(e) = self.adapter.dispose(old)
        {
            tracing::error!("Failed to dispose previous scene handle: {}", e);
        }

        self.bindings = Some(bindings);
        self.applied = Some(config.clone());
        self.bounds = Some(sphere);

        tracing::info!(
            "Model ready (request {}): center {:?}, radius {:.3}",
            request_id,
            sphere.center,
            sphere.radius
        );
        bus.emit(ConfiguratorEvent::ModelReady {
            center: sphere.center,
            radius: sphere.radius,
        });
        LoadOutcome::Committed(sphere)
    }

    fn fail_swap(
        &mut self,
        handle: SceneHandle,
        error: SceneError,
        bus: &mut EventBus,
    ) -> LoadOutcome {
        tracing::error!("Model swap failed: {}", error);
        let _ = self.adapter.dispose(handle);
        bus.emit(ConfiguratorEvent::LoadFailed {
            message: error.to_string(),
        });
        LoadOutcome::Failed
    }

    /// Apply a configuration change to the active scene.
    ///
    /// Computes the minimal set of mutations against the last-applied
    /// configuration and applies them in the fixed order. Emits
    /// `ColorApplied` only when paint actually changed a surface; repeated
    /// identical updates produce no duplicate events.
    pub fn apply(
        &mut self,
        config: &ShelterConfiguration,
        bus: &mut EventBus,
    ) -> Result<(), SceneError> {
        let Some(handle) = self.adapter.active() else {
            // No model yet; the full configuration is applied on commit
            return Ok(());
        };
        let Some(bindings) = self.bindings.clone() else {
            return Ok(());
        };
        let previous = self.applied.clone();

        let mut visibility_changed = false;

        // Visibility first: deploy/stow
        if previous.as_ref().map(|p| p.is_deployed) != Some(config.is_deployed) {
            visibility_changed |= self.set_role_visibility(
                handle,
                &bindings,
                PartRole::DeployablePanel,
                config.is_deployed,
            )?;
            visibility_changed |= self.set_role_visibility(
                handle,
                &bindings,
                PartRole::StowedCover,
                !config.is_deployed,
            )?;
        }

        // Interior/exterior groups
        if previous.as_ref().map(|p| p.is_interior_view) != Some(config.is_interior_view) {
            visibility_changed |= self.set_role_visibility(
                handle,
                &bindings,
                PartRole::InteriorGroup,
                config.is_interior_view,
            )?;
            visibility_changed |= self.set_role_visibility(
                handle,
                &bindings,
                PartRole::ExteriorGroup,
                !config.is_interior_view,
            )?;
        }

        // Scale-reference figure
        if previous.as_ref().map(|p| p.show_scale_figure) != Some(config.show_scale_figure) {
            visibility_changed |= self.set_role_visibility(
                handle,
                &bindings,
                PartRole::ScaleFigure,
                config.show_scale_figure,
            )?;
        }

        // Color after visibility
        if let Some(color) = config.selected_color
            && previous.as_ref().and_then(|p| p.selected_color) != Some(color)
        {
            let painted = self.adapter.apply_color(handle, &bindings, color)?;
            if painted > 0 {
                tracing::debug!("Applied color {} to {} surfaces", color.to_hex(), painted);
                bus.emit(ConfiguratorEvent::ColorApplied);
            }
        }

        // Bounds last, so framing reflects the final visible set
        if visibility_changed {
            self.bounds = Some(self.adapter.compute_bounds(handle)?);
        }

        self.applied = Some(config.clone());
        Ok(())
    }

    fn set_role_visibility(
        &mut self,
        handle: SceneHandle,
        bindings: &PartBindings,
        role: PartRole,
        visible: bool,
    ) -> Result<bool, SceneError> {
        let nodes = bindings.nodes(role).to_vec();
        self.adapter.set_visibility(handle, &nodes, visible)
    }

    /// Full (non-incremental) application of a configuration to a fresh
    /// handle, in the same fixed order as the diff pass
    fn apply_full(
        &mut self,
        handle: SceneHandle,
        bindings: &PartBindings,
        config: &ShelterConfiguration,
    ) -> Result<BoundingSphere, SceneError> {
        self.set_role_visibility(handle, bindings, PartRole::DeployablePanel, config.is_deployed)?;
        self.set_role_visibility(handle, bindings, PartRole::StowedCover, !config.is_deployed)?;
        self.set_role_visibility(
            handle,
            bindings,
            PartRole::InteriorGroup,
            config.is_interior_view,
        )?;
        self.set_role_visibility(
            handle,
            bindings,
            PartRole::ExteriorGroup,
            !config.is_interior_view,
        )?;
        self.set_role_visibility(
            handle,
            bindings,
            PartRole::ScaleFigure,
            config.show_scale_figure,
        )?;

        if let Some(color) = config.selected_color {
            self.adapter.apply_color(handle, bindings, color)?;
        }

        self.adapter.compute_bounds(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use shelter_core::{ColorValue, ConfigState};
    use shelter_scene::{BoundingBox, SceneNode};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn unit_box() -> BoundingBox {
        BoundingBox::new(Vec3::ZERO, Vec3::ONE)
    }

    /// Shelter with a paintable shell, deployable panels, and a stowed
    /// cover; `tag` offsets geometry so models are distinguishable.
    fn shelter_graph(offset: f32) -> SceneGraph {
        let mut graph = SceneGraph::new();
        let root = graph.add_node(
            None,
            SceneNode::new("Shelter_Root")
                .with_transform(glam::Mat4::from_translation(Vec3::new(offset, 0.0, 0.0))),
        );
        graph.add_node(
            Some(root),
            SceneNode::new("Body_Shell").with_mesh_bounds(unit_box()),
        );
        graph.add_node(
            Some(root),
            SceneNode::new("Deploy_Panel_01").with_mesh_bounds(BoundingBox::new(
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(3.0, 1.0, 1.0),
            )),
        );
        graph.add_node(
            Some(root),
            SceneNode::new("Stow_Cover").with_mesh_bounds(unit_box()),
        );
        graph
    }

    fn descriptor(slug: &str) -> ModelDescriptor {
        ModelDescriptor::new(slug, slug.to_uppercase(), format!("{slug}.glb"))
    }

    fn collect_events(bus: &mut EventBus) -> Rc<RefCell<Vec<ConfiguratorEvent>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        bus.subscribe(move |event| sink.borrow_mut().push(event.clone()));
        events
    }

    #[test]
    fn test_commit_applies_full_configuration() {
        let mut sync = ViewSynchronizer::new();
        let mut bus = EventBus::new();
        let events = collect_events(&mut bus);

        let mut state = ConfigState::new();
        state.set_deployed(true);
        state.set_color(ColorValue::from_hex("#3B5323").unwrap());

        let ticket = sync.begin_swap(&descriptor("trecc"), "/models/trecc.glb".into());
        let outcome = sync.finish_load(
            ticket.request_id,
            Ok(shelter_graph(0.0)),
            state.config(),
            &mut bus,
        );

        let LoadOutcome::Committed(sphere) = outcome else {
            panic!("expected committed outcome, got {outcome:?}");
        };
        // Deployed: panels visible, bounds span shell + panel
        assert!(sphere.radius > 1.0);

        let handle = sync.adapter().active().unwrap();
        let graph = sync.adapter().graph(handle).unwrap();
        let mut cover_visible = None;
        let mut shell_color = None;
        graph.walk(|node| match node.name.as_str() {
            "Stow_Cover" => cover_visible = Some(node.visible),
            "Body_Shell" => shell_color = Some(node.base_color),
            _ => {}
        });
        assert_eq!(cover_visible, Some(false));
        assert_eq!(
            shell_color,
            Some(ColorValue::from_hex("#3B5323").unwrap().rgba())
        );

        let events = events.borrow();
        assert!(matches!(
            events.last(),
            Some(ConfiguratorEvent::ModelReady { .. })
        ));
    }

    #[test]
    fn test_last_load_wins_out_of_order_completion() {
        let mut sync = ViewSynchronizer::new();
        let mut bus = EventBus::new();
        let state = ConfigState::new();

        let ticket_a = sync.begin_swap(&descriptor("trecc"), "/models/trecc.glb".into());
        let ticket_b = sync.begin_swap(
            &descriptor("field-hospital"),
            "/models/field-hospital.glb".into(),
        );

        // B completes first and commits
        let outcome_b = sync.finish_load(
            ticket_b.request_id,
            Ok(shelter_graph(50.0)),
            state.config(),
            &mut bus,
        );
        assert!(matches!(outcome_b, LoadOutcome::Committed(_)));
        let active_after_b = sync.adapter().active().unwrap();

        // A's result arrives late and must be discarded
        let outcome_a = sync.finish_load(
            ticket_a.request_id,
            Ok(shelter_graph(0.0)),
            state.config(),
            &mut bus,
        );
        assert_eq!(outcome_a, LoadOutcome::Stale);
        assert_eq!(sync.adapter().active(), Some(active_after_b));

        // The committed scene is model B's geometry
        let sphere = sync.bounds().unwrap();
        assert!(sphere.center.x > 25.0);
    }

    #[test]
    fn test_stale_result_when_newer_request_in_flight() {
        let mut sync = ViewSynchronizer::new();
        let mut bus = EventBus::new();
        let state = ConfigState::new();

        let ticket_a = sync.begin_swap(&descriptor("trecc"), "/models/trecc.glb".into());
        let _ticket_b = sync.begin_swap(
            &descriptor("command-posting"),
            "/models/command-posting.glb".into(),
        );

        // A completes while B is still in flight: discard, keep waiting
        let outcome = sync.finish_load(
            ticket_a.request_id,
            Ok(shelter_graph(0.0)),
            state.config(),
            &mut bus,
        );
        assert_eq!(outcome, LoadOutcome::Stale);
        assert_eq!(sync.adapter().active(), None);
        assert!(sync.load_in_flight());
    }

    #[test]
    fn test_previous_model_interactive_during_flight_and_disposed_after() {
        let mut sync = ViewSynchronizer::new();
        let mut bus = EventBus::new();
        let mut state = ConfigState::new();

        let ticket = sync.begin_swap(&descriptor("trecc"), "/models/trecc.glb".into());
        sync.finish_load(
            ticket.request_id,
            Ok(shelter_graph(0.0)),
            state.config(),
            &mut bus,
        );
        let old_handle = sync.adapter().active().unwrap();

        // New load in flight: old model must remain live and mutable
        let ticket = sync.begin_swap(
            &descriptor("field-hospital"),
            "/models/field-hospital.glb".into(),
        );
        assert!(sync.adapter().is_live(old_handle));
        state.set_deployed(true);
        sync.apply(state.config(), &mut bus).unwrap();
        assert_eq!(sync.adapter().active(), Some(old_handle));

        // Commit of the new model disposes the old handle, not before
        let outcome = sync.finish_load(
            ticket.request_id,
            Ok(shelter_graph(10.0)),
            state.config(),
            &mut bus,
        );
        assert!(matches!(outcome, LoadOutcome::Committed(_)));
        assert!(!sync.adapter().is_live(old_handle));

        // The deploy issued mid-flight was re-applied in full to the new
        // handle: deployable panel visible on the committed model
        let handle = sync.adapter().active().unwrap();
        let graph = sync.adapter().graph(handle).unwrap();
        let mut panel_visible = None;
        graph.walk(|node| {
            if node.name == "Deploy_Panel_01" {
                panel_visible = Some(node.visible);
            }
        });
        assert_eq!(panel_visible, Some(true));
    }

    #[test]
    fn test_load_failure_keeps_previous_model() {
        let mut sync = ViewSynchronizer::new();
        let mut bus = EventBus::new();
        let events = collect_events(&mut bus);
        let state = ConfigState::new();

        let ticket = sync.begin_swap(&descriptor("trecc"), "/models/trecc.glb".into());
        sync.finish_load(
            ticket.request_id,
            Ok(shelter_graph(0.0)),
            state.config(),
            &mut bus,
        );
        let old_handle = sync.adapter().active().unwrap();

        let ticket = sync.begin_swap(&descriptor("broken"), "/models/broken.glb".into());
        let outcome = sync.finish_load(
            ticket.request_id,
            Err(AssetLoadError::Malformed("bad chunk".into())),
            state.config(),
            &mut bus,
        );
        assert_eq!(outcome, LoadOutcome::Failed);
        assert_eq!(sync.adapter().active(), Some(old_handle));
        assert!(sync.adapter().is_live(old_handle));
        assert!(matches!(
            events.borrow().last(),
            Some(ConfiguratorEvent::LoadFailed { .. })
        ));
    }

    #[test]
    fn test_idempotent_apply_emits_no_duplicate_events() {
        let mut sync = ViewSynchronizer::new();
        let mut bus = EventBus::new();
        let events = collect_events(&mut bus);
        let mut state = ConfigState::new();

        let ticket = sync.begin_swap(&descriptor("trecc"), "/models/trecc.glb".into());
        sync.finish_load(
            ticket.request_id,
            Ok(shelter_graph(0.0)),
            state.config(),
            &mut bus,
        );

        state.set_color(ColorValue::from_hex("#3B5323").unwrap());
        sync.apply(state.config(), &mut bus).unwrap();
        let count_after_first = events.borrow().len();

        // Re-applying the identical configuration changes nothing
        sync.apply(state.config(), &mut bus).unwrap();
        sync.apply(state.config(), &mut bus).unwrap();
        assert_eq!(events.borrow().len(), count_after_first);
    }

    #[test]
    fn test_bounds_recomputed_after_deploy() {
        let mut sync = ViewSynchronizer::new();
        let mut bus = EventBus::new();
        let mut state = ConfigState::new();

        let ticket = sync.begin_swap(&descriptor("trecc"), "/models/trecc.glb".into());
        sync.finish_load(
            ticket.request_id,
            Ok(shelter_graph(0.0)),
            state.config(),
            &mut bus,
        );
        let stowed = sync.bounds().unwrap();

        state.set_deployed(true);
        sync.apply(state.config(), &mut bus).unwrap();
        let deployed = sync.bounds().unwrap();

        assert!(deployed.radius > stowed.radius);
    }
}
