//! Headless configurator walkthrough
//!
//! Builds a session over the built-in catalog, loads a procedurally built
//! shelter model through the swap protocol, and drives the command
//! surface the way a control panel would. Run with
//! `RUST_LOG=debug cargo run --example headless` for the full trace.

use std::sync::Arc;

use glam::{Mat4, Vec3};
use parking_lot::Mutex;

use shelter_core::{ColorValue, ConfiguratorEvent, EnvironmentPreset};
use shelter_scene::{BoundingBox, SceneGraph, SceneNode};
use shelter_session::{ConfiguratorSession, LoadOutcome};

fn demo_shelter() -> SceneGraph {
    let mut graph = SceneGraph::new();
    let root = graph.add_node(None, SceneNode::new("TRECC_Root"));
    graph.add_node(
        Some(root),
        SceneNode::new("Body_Shell")
            .with_mesh_bounds(BoundingBox::new(Vec3::ZERO, Vec3::new(6.1, 2.6, 2.4))),
    );
    graph.add_node(
        Some(root),
        SceneNode::new("Window_Glass")
            .with_mesh_bounds(BoundingBox::new(Vec3::new(1.0, 1.0, 0.0), Vec3::new(2.0, 2.0, 0.1))),
    );
    for i in 0..2 {
        graph.add_node(
            Some(root),
            SceneNode::new(format!("Deploy_Panel_{i:02}"))
                .with_transform(Mat4::from_translation(Vec3::new(6.1 + 2.4 * i as f32, 0.0, 0.0)))
                .with_mesh_bounds(BoundingBox::new(Vec3::ZERO, Vec3::new(2.4, 2.6, 2.4))),
        );
    }
    graph.add_node(
        Some(root),
        SceneNode::new("Stow_Cover")
            .with_mesh_bounds(BoundingBox::new(Vec3::ZERO, Vec3::new(6.1, 2.7, 2.4))),
    );
    graph.add_node(
        Some(root),
        SceneNode::new("Interior_Group")
            .with_mesh_bounds(BoundingBox::new(Vec3::new(0.2, 0.2, 0.2), Vec3::new(5.9, 2.4, 2.2))),
    );
    graph.add_node(
        Some(root),
        SceneNode::new("Worker_Figure")
            .with_mesh_bounds(BoundingBox::new(Vec3::ZERO, Vec3::new(0.5, 1.8, 0.5))),
    );
    graph
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let events = Arc::new(Mutex::new(Vec::new()));

    let mut session = ConfiguratorSession::with_builtin_catalog();
    {
        let events = Arc::clone(&events);
        session.subscribe(move |event| {
            events.lock().push(event.clone());
        });
    }

    // Model swap protocol: select, then deliver the load result
    let ticket = session.select_model("trecc").expect("trecc is builtin");
    println!("Resolved '{}' to {}", ticket.slug, ticket.url);

    let outcome = session.finish_load(ticket.request_id, Ok(demo_shelter()));
    let LoadOutcome::Committed(sphere) = outcome else {
        panic!("demo model failed to load: {outcome:?}");
    };
    println!(
        "Model ready: center {:?}, radius {:.2}",
        sphere.center, sphere.radius
    );

    // Drive the command surface
    session.set_deployed(true);
    println!(
        "Deployed; framing radius now {:.2}",
        session.bounds().expect("model loaded").radius
    );

    session.set_color(ColorValue::from_hex("#3B5323").expect("valid hex"));
    session.set_environment(EnvironmentPreset::Desert);
    session.set_show_scale_figure(true);

    // Inside view without interior view is rejected, not fatal
    if session.set_inside_view(true).is_err() {
        println!("Inside view rejected while exterior is shown (expected)");
    }
    session.set_interior_view(true);
    session.set_inside_view(true).expect("interior view active");

    println!("Final configuration: {:#?}", session.configuration());
    println!("Events received:");
    for event in events.lock().iter() {
        println!("  {event:?}");
    }
}
