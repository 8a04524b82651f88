//! In-memory scene graph for one loaded shelter model
//!
//! The graph is a tree of named nodes with local transforms, visibility
//! flags, and optional mesh bounds. It is deliberately renderer-free: the
//! configurator core mutates it and a rendering shell reads it.

use std::collections::HashMap;

use glam::Mat4;
use uuid::Uuid;

use crate::bounds::BoundingBox;

/// One node in the scene graph
#[derive(Debug, Clone)]
pub struct SceneNode {
    pub id: Uuid,
    /// Authored node name; semantic part resolution matches against this
    pub name: String,
    /// Transform relative to the parent node
    pub transform: Mat4,
    /// Hidden nodes (and their subtrees) are excluded from bounds
    pub visible: bool,
    /// Material base color (RGBA)
    pub base_color: [f32; 4],
    /// Local-space bounds of the node's mesh, if it carries one
    pub mesh_bounds: Option<BoundingBox>,
}

impl SceneNode {
    /// Create a new node with identity transform and default material
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            transform: Mat4::IDENTITY,
            visible: true,
            base_color: [0.7, 0.7, 0.7, 1.0],
            mesh_bounds: None,
        }
    }

    pub fn with_transform(mut self, transform: Mat4) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_mesh_bounds(mut self, bounds: BoundingBox) -> Self {
        self.mesh_bounds = Some(bounds);
        self
    }

    pub fn with_color(mut self, color: [f32; 4]) -> Self {
        self.base_color = color;
        self
    }
}

/// Scene graph: node store plus parent/children index maps.
///
/// Nodes are stored flat and linked through the index maps, so removal
/// and traversal never recurse.
#[derive(Debug, Clone, Default)]
pub struct SceneGraph {
    nodes: HashMap<Uuid, SceneNode>,
    children: HashMap<Uuid, Vec<Uuid>>,
    parent: HashMap<Uuid, Uuid>,
    roots: Vec<Uuid>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node under `parent` (or as a root when `None`); returns its id
    pub fn add_node(&mut self, parent: Option<Uuid>, node: SceneNode) -> Uuid {
        let id = node.id;
        self.nodes.insert(id, node);
        match parent {
            Some(parent_id) => {
                self.children.entry(parent_id).or_default().push(id);
                self.parent.insert(id, parent_id);
            }
            None => self.roots.push(id),
        }
        id
    }

    pub fn node(&self, id: Uuid) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    pub fn node_mut(&mut self, id: Uuid) -> Option<&mut SceneNode> {
        self.nodes.get_mut(&id)
    }

    pub fn roots(&self) -> &[Uuid] {
        &self.roots
    }

    pub fn children_of(&self, id: Uuid) -> &[Uuid] {
        self.children.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Pre-order traversal over all nodes, hidden ones included
    pub fn walk(&self, mut visit: impl FnMut(&SceneNode)) {
        let mut stack: Vec<Uuid> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            if let Some(node) = self.nodes.get(&id) {
                visit(node);
            }
            if let Some(children) = self.children.get(&id) {
                for child in children.iter().rev() {
                    stack.push(*child);
                }
            }
        }
    }

    /// World transform of a node (product of ancestor transforms)
    pub fn world_transform(&self, id: Uuid) -> Option<Mat4> {
        let mut chain = vec![id];
        let mut current = id;
        while let Some(parent_id) = self.parent.get(&current) {
            chain.push(*parent_id);
            current = *parent_id;
        }
        let mut transform = Mat4::IDENTITY;
        for node_id in chain.iter().rev() {
            transform *= self.nodes.get(node_id)?.transform;
        }
        Some(transform)
    }

    /// World-space bounds of the currently visible geometry.
    ///
    /// Hidden nodes prune their whole subtree, so the result reflects the
    /// deploy/view state at call time.
    pub fn visible_bounds(&self) -> BoundingBox {
        let mut bounds = BoundingBox::empty();
        let mut stack: Vec<(Uuid, Mat4)> = self
            .roots
            .iter()
            .map(|id| (*id, Mat4::IDENTITY))
            .collect();

        while let Some((id, parent_transform)) = stack.pop() {
            let Some(node) = self.nodes.get(&id) else {
                continue;
            };
            if !node.visible {
                continue;
            }
            let world = parent_transform * node.transform;
            if let Some(mesh_bounds) = &node.mesh_bounds {
                bounds = bounds.union(&mesh_bounds.transformed(world));
            }
            if let Some(children) = self.children.get(&id) {
                for child in children {
                    stack.push((*child, world));
                }
            }
        }
        bounds
    }
}
