//! Semantic part resolution by naming convention
//!
//! Shelter models tag customizable parts through node names. Resolution
//! runs exactly one traversal per call, normalizes names into segments
//! (no raw substring matching), and records absent roles as empty
//! bindings: not every model has every part, and absence is a valid,
//! queryable state.

use std::collections::HashMap;

use uuid::Uuid;

use crate::graph::SceneGraph;

/// Semantic capability a node can be bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartRole {
    /// Surfaces the color customization applies to
    PaintableShell,
    /// Geometry visible only in the deployed configuration
    DeployablePanel,
    /// Geometry visible only in the stowed configuration
    StowedCover,
    /// The internal compartment group
    InteriorGroup,
    /// The outer shell group
    ExteriorGroup,
    /// Human scale-reference figure
    ScaleFigure,
}

impl PartRole {
    pub fn name(&self) -> &'static str {
        match self {
            PartRole::PaintableShell => "paintable-shell",
            PartRole::DeployablePanel => "deployable-panel",
            PartRole::StowedCover => "stowed-cover",
            PartRole::InteriorGroup => "interior-group",
            PartRole::ExteriorGroup => "exterior-group",
            PartRole::ScaleFigure => "scale-figure",
        }
    }

    /// All roles, in resolution priority order
    pub fn all() -> [PartRole; 6] {
        [
            PartRole::DeployablePanel,
            PartRole::StowedCover,
            PartRole::InteriorGroup,
            PartRole::ExteriorGroup,
            PartRole::ScaleFigure,
            PartRole::PaintableShell,
        ]
    }
}

/// Versioned node-naming convention.
///
/// v1 rules: node names are split into lowercase segments on `_`, `-`,
/// `.`, and spaces. A role matches when one of its keyword segments is
/// present. Nodes carrying an exclusion segment (windows, glass, trim,
/// frames, decals) are never paintable regardless of other segments. Each
/// node is bound to at most one role, decided in priority order
/// (deploy/stow before view groups before paintable).
#[derive(Debug, Clone)]
pub struct NamingConvention {
    version: u32,
    rules: Vec<(PartRole, Vec<&'static str>)>,
    non_paintable: Vec<&'static str>,
}

impl Default for NamingConvention {
    fn default() -> Self {
        Self::v1()
    }
}

impl NamingConvention {
    /// The v1 convention used by all shipped shelter models
    pub fn v1() -> Self {
        Self {
            version: 1,
            rules: vec![
                (
                    PartRole::DeployablePanel,
                    vec!["deploy", "deployed", "deployable"],
                ),
                (PartRole::StowedCover, vec!["stow", "stowed", "packed"]),
                (PartRole::InteriorGroup, vec!["interior", "cabin"]),
                (PartRole::ExteriorGroup, vec!["exterior"]),
                (PartRole::ScaleFigure, vec!["worker", "figure", "person"]),
                (
                    PartRole::PaintableShell,
                    vec!["paintable", "body", "shell", "hull"],
                ),
            ],
            non_paintable: vec!["window", "glass", "trim", "frame", "decal"],
        }
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    /// Classify a node name; `None` when no role matches
    pub fn classify(&self, name: &str) -> Option<PartRole> {
        let segments = Self::segments(name);
        for (role, keywords) in &self.rules {
            if *role == PartRole::PaintableShell
                && segments.iter().any(|s| self.non_paintable.contains(&s.as_str()))
            {
                continue;
            }
            if segments
                .iter()
                .any(|s| keywords.contains(&s.as_str()))
            {
                return Some(*role);
            }
        }
        None
    }

    fn segments(name: &str) -> Vec<String> {
        name.to_lowercase()
            .split(['_', '-', '.', ' '])
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Resolved mapping from semantic role to scene-graph nodes.
///
/// Resolution is a pure function of the graph: re-running it against the
/// same graph yields the same bindings, so callers may resolve freely
/// without accumulating duplicates.
#[derive(Debug, Clone, Default)]
pub struct PartBindings {
    by_role: HashMap<PartRole, Vec<Uuid>>,
}

impl PartBindings {
    /// Resolve bindings with a single pre-order traversal of the graph
    pub fn resolve(graph: &SceneGraph, convention: &NamingConvention) -> Self {
        let mut by_role: HashMap<PartRole, Vec<Uuid>> = HashMap::new();
        graph.walk(|node| {
            if let Some(role) = convention.classify(&node.name) {
                by_role.entry(role).or_default().push(node.id);
            }
        });

        let bound: usize = by_role.values().map(Vec::len).sum();
        tracing::debug!(
            "Resolved {} part bindings across {} nodes (convention v{})",
            bound,
            graph.len(),
            convention.version()
        );

        Self { by_role }
    }

    /// Nodes bound to a role; empty slice when the model has none
    pub fn nodes(&self, role: PartRole) -> &[Uuid] {
        self.by_role.get(&role).map(Vec::as_slice).unwrap_or(&[])
    }

    /// True when the model has no nodes for the role
    pub fn is_empty(&self, role: PartRole) -> bool {
        self.nodes(role).is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::SceneNode;

    fn sample_graph() -> SceneGraph {
        let mut graph = SceneGraph::new();
        let root = graph.add_node(None, SceneNode::new("Shelter_Root"));
        graph.add_node(Some(root), SceneNode::new("Body_Shell"));
        graph.add_node(Some(root), SceneNode::new("Deploy_Panel_01"));
        graph.add_node(Some(root), SceneNode::new("Deploy_Panel_02"));
        graph.add_node(Some(root), SceneNode::new("Stowed_Cover"));
        graph.add_node(Some(root), SceneNode::new("Interior_Group"));
        graph.add_node(Some(root), SceneNode::new("Window_Glass_Body"));
        graph
    }

    #[test]
    fn test_classify_normalizes_separators_and_case() {
        let convention = NamingConvention::v1();
        assert_eq!(
            convention.classify("BODY-shell"),
            Some(PartRole::PaintableShell)
        );
        assert_eq!(
            convention.classify("deploy panel 3"),
            Some(PartRole::DeployablePanel)
        );
        assert_eq!(
            convention.classify("mesh.interior.floor"),
            Some(PartRole::InteriorGroup)
        );
    }

    #[test]
    fn test_non_paintable_exclusion() {
        let convention = NamingConvention::v1();
        // "Body" alone is paintable, but a window segment blocks it
        assert_eq!(convention.classify("Window_Glass_Body"), None);
        assert_eq!(convention.classify("Trim_Shell"), None);
    }

    #[test]
    fn test_no_substring_matches() {
        let convention = NamingConvention::v1();
        // "deployment" is a single segment and not a keyword; segment
        // matching must not fall back to substring containment
        assert_eq!(convention.classify("redeployment"), None);
        assert_eq!(convention.classify("embodiment"), None);
    }

    #[test]
    fn test_resolve_finds_all_roles() {
        let graph = sample_graph();
        let bindings = PartBindings::resolve(&graph, &NamingConvention::v1());

        assert_eq!(bindings.nodes(PartRole::PaintableShell).len(), 1);
        assert_eq!(bindings.nodes(PartRole::DeployablePanel).len(), 2);
        assert_eq!(bindings.nodes(PartRole::StowedCover).len(), 1);
        assert_eq!(bindings.nodes(PartRole::InteriorGroup).len(), 1);
        assert!(bindings.is_empty(PartRole::ScaleFigure));
        assert!(bindings.is_empty(PartRole::ExteriorGroup));
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let graph = sample_graph();
        let convention = NamingConvention::v1();
        let first = PartBindings::resolve(&graph, &convention);
        let second = PartBindings::resolve(&graph, &convention);

        for role in PartRole::all() {
            assert_eq!(first.nodes(role), second.nodes(role));
        }
    }
}
