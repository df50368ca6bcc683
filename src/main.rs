use anyhow::{Context, Result, ensure};
use nalgebra::{UnitQuaternion, Vector3};
use tracing::info;

use rust_posetree::geometry::SE3;
use rust_posetree::{Pose, PoseOriginList};

/// Replays a session in which the robot is delocalized several times and then
/// relocalizes to each older frame in turn, logging the origin tree.
fn main() -> Result<()> {
    tracing_subscriber::fmt().init();

    let num_delocalizations: usize = std::env::args()
        .nth(1)
        .map(|arg| arg.parse())
        .transpose()
        .context("number of delocalizations must be a non-negative integer")?
        .unwrap_or(2);

    let mut origins = PoseOriginList::new();
    let first = origins.add_new_origin();

    // Something seen in every frame, 100mm ahead and a little to the left.
    let mut landmarks = vec![Pose::with_name(
        UnitQuaternion::identity(),
        Vector3::new(100.0, 20.0, 0.0),
        Some(origins.current_origin()),
        format!("Landmark{}", first.0),
    )];

    for _ in 0..num_delocalizations {
        let id = origins.add_new_origin();
        landmarks.push(Pose::with_name(
            UnitQuaternion::from_axis_angle(&Vector3::z_axis(), 0.25),
            Vector3::new(100.0, 20.0, 0.0),
            Some(origins.current_origin()),
            format!("Landmark{}", id.0),
        ));
    }
    info!("Robot went through {} frames", origins.len());

    // Relocalize to the previous frame, one step at a time, back to the first.
    while origins.current_origin_id() != first {
        let current = origins.current_origin_id();
        let previous = origins
            .iter()
            .map(|(id, _)| id)
            .filter(|id| *id < current && origins.get_origin_by_id(*id).is_root())
            .max()
            .context("no older root frame to relocalize to")?;

        let current_wrt_previous = SE3 {
            rotation: UnitQuaternion::from_axis_angle(&Vector3::z_axis(), -0.25),
            translation: Vector3::new(5.0, -3.0, 0.0),
        };
        origins.rejigger(previous, &current_wrt_previous)?;
        let moved = origins.flatten(previous)?;
        info!("Relocalized {} -> {} ({} origins flattened)", current, previous, moved);
    }

    ensure!(origins.sanity_check_ownership(), "origin list failed its sanity check");

    for (id, origin) in origins.iter() {
        let parent = origin.parent().map(|p| p.name()).unwrap_or_else(|| "-".to_string());
        info!("Origin {} ({}) parent={}", id, origin.name(), parent);
    }
    for landmark in &landmarks {
        let t = landmark.transform_wrt_root().translation;
        info!(
            "{} w.r.t. {}: [{:.1}, {:.1}, {:.1}]",
            landmark.name(),
            landmark.find_root().name(),
            t.x,
            t.y,
            t.z
        );
    }

    Ok(())
}
