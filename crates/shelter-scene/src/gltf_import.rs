//! Binary glTF import
//!
//! Converts a GLB payload into the internal [`SceneGraph`]: node
//! hierarchy, names, local transforms, per-primitive bounding boxes, and
//! PBR base-color factors. Mesh vertex data is left in the document; the
//! configurator only needs structure, bounds, and materials.

use glam::Mat4;
use uuid::Uuid;

use crate::bounds::BoundingBox;
use crate::graph::{SceneGraph, SceneNode};
use crate::loader::AssetLoadError;

/// Parse a binary glTF slice into a scene graph
pub fn load_glb_slice(bytes: &[u8]) -> Result<SceneGraph, AssetLoadError> {
    let (document, _buffers, _images) =
        gltf::import_slice(bytes).map_err(|e| AssetLoadError::Malformed(e.to_string()))?;

    let scene = document
        .default_scene()
        .or_else(|| document.scenes().next())
        .ok_or(AssetLoadError::Empty)?;

    let mut graph = SceneGraph::new();
    let mut stack: Vec<(gltf::Node, Option<Uuid>)> =
        scene.nodes().map(|n| (n, None)).collect();

    while let Some((gltf_node, parent)) = stack.pop() {
        let id = graph.add_node(parent, convert_node(&gltf_node));
        for child in gltf_node.children() {
            stack.push((child, Some(id)));
        }
    }

    if graph.is_empty() {
        return Err(AssetLoadError::Empty);
    }

    tracing::info!("Imported GLB with {} nodes", graph.len());
    Ok(graph)
}

fn convert_node(gltf_node: &gltf::Node) -> SceneNode {
    let name = gltf_node
        .name()
        .map(str::to_string)
        .unwrap_or_else(|| format!("node-{}", gltf_node.index()));

    let mut node = SceneNode::new(name)
        .with_transform(Mat4::from_cols_array_2d(&gltf_node.transform().matrix()));

    if let Some(mesh) = gltf_node.mesh() {
        let mut bounds = BoundingBox::empty();
        let mut color = None;
        for primitive in mesh.primitives() {
            let bb = primitive.bounding_box();
            bounds = bounds.union(&BoundingBox::new(bb.min.into(), bb.max.into()));
            if color.is_none() {
                color = Some(
                    primitive
                        .material()
                        .pbr_metallic_roughness()
                        .base_color_factor(),
                );
            }
        }
        if !bounds.is_empty() {
            node = node.with_mesh_bounds(bounds);
        }
        if let Some(color) = color {
            node = node.with_color(color);
        }
    }

    node
}
