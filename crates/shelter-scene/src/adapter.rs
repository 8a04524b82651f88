//! Scene adapter: exclusive ownership of loaded models
//!
//! All loaded scene graphs live here. Other components hold copyable
//! [`SceneHandle`] values and go through the adapter for every read or
//! mutation, so lifetime and disposal stay traceable. Operations on a
//! disposed handle fail loudly instead of silently no-op-ing; that is a
//! programming error worth surfacing during development.

use std::collections::HashMap;

use shelter_core::ColorValue;
use thiserror::Error;
use uuid::Uuid;

use crate::bounds::BoundingSphere;
use crate::graph::SceneGraph;
use crate::parts::{PartBindings, PartRole};

/// Errors from scene adapter operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SceneError {
    #[error("Operation on disposed or unknown scene handle {0:?}")]
    DisposedHandle(SceneHandle),
}

/// Handle to a scene graph owned by the [`SceneAdapter`].
///
/// Handles are lightweight and can be copied freely; the graph itself
/// stays inside the adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SceneHandle(u64);

impl SceneHandle {
    /// Returns the raw handle value
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Owns every loaded scene graph and provides the mutation primitives
/// the view synchronizer drives.
#[derive(Debug, Default)]
pub struct SceneAdapter {
    graphs: HashMap<u64, SceneGraph>,
    active: Option<SceneHandle>,
    next_handle: u64,
}

impl SceneAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of a loaded graph; the graph is not active until
    /// [`commit`](Self::commit) is called, so a previous model stays
    /// interactive while a new one is prepared.
    pub fn insert(&mut self, graph: SceneGraph) -> SceneHandle {
        self.next_handle += 1;
        let handle = SceneHandle(self.next_handle);
        self.graphs.insert(handle.0, graph);
        handle
    }

    /// The currently active handle, if a model is committed
    pub fn active(&self) -> Option<SceneHandle> {
        self.active
    }

    /// True while the handle refers to a live (not disposed) graph
    pub fn is_live(&self, handle: SceneHandle) -> bool {
        self.graphs.contains_key(&handle.0)
    }

    /// Make a handle the active model
    pub fn commit(&mut self, handle: SceneHandle) -> Result<(), SceneError> {
        if !self.is_live(handle) {
            return Err(SceneError::DisposedHandle(handle));
        }
        self.active = Some(handle);
        Ok(())
    }

    /// Release a graph. Subsequent operations on the handle fail with
    /// [`SceneError::DisposedHandle`].
    pub fn dispose(&mut self, handle: SceneHandle) -> Result<(), SceneError> {
        if self.graphs.remove(&handle.0).is_none() {
            return Err(SceneError::DisposedHandle(handle));
        }
        if self.active == Some(handle) {
            self.active = None;
        }
        tracing::debug!("Disposed scene handle {}", handle.raw());
        Ok(())
    }

    /// Borrow a graph for reading
    pub fn graph(&self, handle: SceneHandle) -> Result<&SceneGraph, SceneError> {
        self.graphs
            .get(&handle.0)
            .ok_or(SceneError::DisposedHandle(handle))
    }

    /// Borrow a graph for mutation
    pub fn graph_mut(&mut self, handle: SceneHandle) -> Result<&mut SceneGraph, SceneError> {
        self.graphs
            .get_mut(&handle.0)
            .ok_or(SceneError::DisposedHandle(handle))
    }

    /// Paint every node bound to the paintable role; returns how many
    /// nodes changed. Empty bindings are a no-op, not an error, and nodes
    /// bound to other roles are never touched.
    pub fn apply_color(
        &mut self,
        handle: SceneHandle,
        bindings: &PartBindings,
        color: ColorValue,
    ) -> Result<usize, SceneError> {
        let graph = self.graph_mut(handle)?;
        let rgba = color.rgba();
        let mut painted = 0;
        for id in bindings.nodes(PartRole::PaintableShell) {
            if let Some(node) = graph.node_mut(*id)
                && node.base_color != rgba
            {
                node.base_color = rgba;
                painted += 1;
            }
        }
        Ok(painted)
    }

    /// Set visibility on a set of nodes; returns whether anything actually
    /// changed, so callers can suppress duplicate feedback events.
    pub fn set_visibility(
        &mut self,
        handle: SceneHandle,
        nodes: &[Uuid],
        visible: bool,
    ) -> Result<bool, SceneError> {
        let graph = self.graph_mut(handle)?;
        let mut changed = false;
        for id in nodes {
            if let Some(node) = graph.node_mut(*id)
                && node.visible != visible
            {
                node.visible = visible;
                changed = true;
            }
        }
        Ok(changed)
    }

    /// Bounding sphere of the currently visible geometry. Recomputed on
    /// every call so it reflects deploy/view state, not load-time state.
    pub fn compute_bounds(&self, handle: SceneHandle) -> Result<BoundingSphere, SceneError> {
        let graph = self.graph(handle)?;
        Ok(BoundingSphere::from_box(&graph.visible_bounds()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds::BoundingBox;
    use crate::graph::SceneNode;
    use crate::parts::NamingConvention;
    use glam::Vec3;

    fn test_graph() -> SceneGraph {
        let mut graph = SceneGraph::new();
        let root = graph.add_node(None, SceneNode::new("root"));
        graph.add_node(
            Some(root),
            SceneNode::new("Body_Shell")
                .with_mesh_bounds(BoundingBox::new(Vec3::ZERO, Vec3::ONE)),
        );
        graph.add_node(
            Some(root),
            SceneNode::new("Window_Glass")
                .with_mesh_bounds(BoundingBox::new(Vec3::ZERO, Vec3::ONE)),
        );
        graph.add_node(
            Some(root),
            SceneNode::new("Deploy_Panel_01")
                .with_mesh_bounds(BoundingBox::new(Vec3::ONE, Vec3::splat(2.0))),
        );
        graph
    }

    fn bindings_for(adapter: &SceneAdapter, handle: SceneHandle) -> PartBindings {
        PartBindings::resolve(adapter.graph(handle).unwrap(), &NamingConvention::v1())
    }

    #[test]
    fn test_insert_does_not_activate() {
        let mut adapter = SceneAdapter::new();
        let handle = adapter.insert(test_graph());
        assert_eq!(adapter.active(), None);
        adapter.commit(handle).unwrap();
        assert_eq!(adapter.active(), Some(handle));
    }

    #[test]
    fn test_apply_color_paints_only_paintable() {
        let mut adapter = SceneAdapter::new();
        let handle = adapter.insert(test_graph());
        let bindings = bindings_for(&adapter, handle);
        let olive = ColorValue::from_hex("#3B5323").unwrap();

        let painted = adapter.apply_color(handle, &bindings, olive).unwrap();
        assert_eq!(painted, 1);

        let graph = adapter.graph(handle).unwrap();
        let mut shell_color = None;
        let mut window_color = None;
        graph.walk(|node| match node.name.as_str() {
            "Body_Shell" => shell_color = Some(node.base_color),
            "Window_Glass" => window_color = Some(node.base_color),
            _ => {}
        });
        assert_eq!(shell_color.unwrap(), olive.rgba());
        // Non-paintable geometry keeps its material
        assert_eq!(window_color.unwrap(), [0.7, 0.7, 0.7, 1.0]);
    }

    #[test]
    fn test_apply_color_empty_binding_is_noop() {
        let mut adapter = SceneAdapter::new();
        let mut graph = SceneGraph::new();
        graph.add_node(None, SceneNode::new("Unbound"));
        let handle = adapter.insert(graph);
        let bindings = bindings_for(&adapter, handle);

        let painted = adapter
            .apply_color(handle, &bindings, ColorValue::new(1.0, 0.0, 0.0))
            .unwrap();
        assert_eq!(painted, 0);
    }

    #[test]
    fn test_set_visibility_idempotent() {
        let mut adapter = SceneAdapter::new();
        let handle = adapter.insert(test_graph());
        let bindings = bindings_for(&adapter, handle);
        let panels: Vec<Uuid> = bindings.nodes(PartRole::DeployablePanel).to_vec();

        let first = adapter.set_visibility(handle, &panels, false).unwrap();
        assert!(first);
        // Second identical call changes nothing
        let second = adapter.set_visibility(handle, &panels, false).unwrap();
        assert!(!second);
    }

    #[test]
    fn test_bounds_reflect_visibility() {
        let mut adapter = SceneAdapter::new();
        let handle = adapter.insert(test_graph());
        let bindings = bindings_for(&adapter, handle);

        let full = adapter.compute_bounds(handle).unwrap();
        let panels: Vec<Uuid> = bindings.nodes(PartRole::DeployablePanel).to_vec();
        adapter.set_visibility(handle, &panels, false).unwrap();
        let stowed = adapter.compute_bounds(handle).unwrap();

        assert!(stowed.radius < full.radius);
    }

    #[test]
    fn test_disposed_handle_errors() {
        let mut adapter = SceneAdapter::new();
        let handle = adapter.insert(test_graph());
        let bindings = bindings_for(&adapter, handle);
        adapter.dispose(handle).unwrap();

        assert_eq!(
            adapter.compute_bounds(handle),
            Err(SceneError::DisposedHandle(handle))
        );
        assert_eq!(
            adapter.set_visibility(handle, &[], true),
            Err(SceneError::DisposedHandle(handle))
        );
        assert_eq!(
            adapter.apply_color(handle, &bindings, ColorValue::new(0.0, 0.0, 0.0)),
            Err(SceneError::DisposedHandle(handle))
        );
        assert_eq!(adapter.dispose(handle), Err(SceneError::DisposedHandle(handle)));
    }

    #[test]
    fn test_dispose_active_clears_active() {
        let mut adapter = SceneAdapter::new();
        let handle = adapter.insert(test_graph());
        adapter.commit(handle).unwrap();
        adapter.dispose(handle).unwrap();
        assert_eq!(adapter.active(), None);
    }
}
