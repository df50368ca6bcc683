//! End-to-end checks of the pose tree and origin registry through the
//! public API.

use approx::assert_relative_eq;
use nalgebra::{Matrix3, UnitQuaternion, Vector3};

use rust_posetree::geometry::{Rotation, RotationVector};
use rust_posetree::{Pose, PoseId, PoseOriginList};

fn pose_named(name: &str, id: u32, parent: Option<&Pose>) -> Pose {
    let mut pose = Pose::with_name(
        Rotation::identity(),
        Vector3::new(id as f64, 0.0, 0.0),
        parent,
        name,
    );
    pose.set_id(PoseId::new(id));
    pose
}

#[test]
fn copies_stay_in_place_but_are_new_individuals() {
    let mut origins = PoseOriginList::new();
    origins.add_new_origin();

    let base = pose_named("Base", 10, Some(origins.current_origin()));
    let leaf = pose_named("Leaf", 11, Some(&base));

    for pose in [&base, &leaf] {
        let copy = pose.clone();
        assert_ne!(copy.id(), pose.id());
        assert!(copy.has_same_root_as(pose));
        assert_eq!(copy.name(), format!("{}_COPY", pose.name()));
    }
}

#[test]
fn moves_carry_identity() {
    let mut origins = PoseOriginList::new();
    let origin_id = origins.add_new_origin();

    let mut source = pose_named("Source", 20, Some(origins.current_origin()));
    let id_before = source.id();

    let mut target = pose_named("Target", 21, None);
    assert_eq!(target.id(), PoseId::new(21));
    target = source.take();

    assert_eq!(target.id(), id_before);
    assert_eq!(target.name(), "Source");
    assert_eq!(target.root_id(), origin_id);
    assert!(target.has_same_root_as(origins.current_origin()));
}

#[test]
fn grandchild_shares_root_but_is_not_child() {
    let a = pose_named("A", 1, None);
    let mut b = pose_named("B", 2, None);
    let mut c = pose_named("C", 3, None);

    b.set_parent(&a);
    c.set_parent(&b);

    assert!(!c.is_child_of(&a));
    assert!(c.has_same_root_as(&a));
    assert_eq!(c.root_id(), a.id());
}

#[test]
fn descendants_survive_overwritten_intermediate_parent() {
    let root = pose_named("Root", 1, None);
    let mut intermediate = pose_named("Intermediate", 2, Some(&root));
    let child = pose_named("Child", 3, Some(&intermediate));

    // Overwrite the intermediate parent's variable entirely.
    intermediate = pose_named("Unrelated", 99, None);
    assert!(intermediate.is_root());

    assert!(child.has_same_root_as(&root));
    assert_eq!(child.root_id(), root.id());
    let parent = child.parent().expect("child keeps its parent");
    assert_eq!(parent.name(), "Intermediate");
    assert_eq!(parent.id(), PoseId::new(2));
}

#[test]
fn rotate_by_matrix_vector_and_quaternion_agree() {
    let axis = Vector3::new(0.3, -0.4, 0.866).normalize();
    let angle = 1.1;
    let quat = UnitQuaternion::from_axis_angle(&nalgebra::Unit::new_normalize(axis), angle);
    let r1: Matrix3<f64> = quat.to_rotation_matrix().into_inner();

    for i in 0..3 {
        let start = Vector3::ith(i, 1.0);
        let mut poses = [
            Pose::new(Rotation::identity(), start),
            Pose::new(Rotation::identity(), start),
            Pose::new(Rotation::identity(), start),
        ];
        poses[0].rotate_by(r1);
        poses[1].rotate_by(RotationVector::new(axis * angle));
        poses[2].rotate_by(quat);

        let column: Vector3<f64> = r1.column(i).into_owned();
        for pose in &poses {
            assert_relative_eq!(pose.rotation_matrix(), r1, epsilon = 1e-6);
            assert_relative_eq!(pose.translation(), column, epsilon = 1e-6);
        }
    }
}

#[test]
fn origin_list_scenario() {
    let mut origins = PoseOriginList::new();

    let id1 = origins.add_new_origin();
    let id2 = origins.add_new_origin();
    assert_ne!(id1, id2);
    assert_eq!(origins.current_origin_id(), id2);

    assert!(origins.add_origin_with_id(PoseId::new(id2.0 + 1)));
    assert!(origins.contains_origin_id(id1));
    assert!(origins.contains_origin_id(id2));
    assert!(!origins.contains_origin_id(PoseId::new(101)));
    assert_eq!(origins.current_origin_id(), id2);
}

#[test]
fn relocalization_round_trip() {
    let mut origins = PoseOriginList::new();
    let a = origins.add_new_origin();
    let b = origins.add_new_origin();
    let c = origins.add_new_origin();

    let some_pose = Pose::with_parent(
        RotationVector::from_angle_axis(std::f64::consts::FRAC_PI_4, &Vector3::z()),
        Vector3::new(100.0, 200.0, 300.0),
        origins.current_origin(),
    );

    origins
        .rejigger(b, &rust_posetree::geometry::SE3::identity())
        .unwrap();
    assert!(origins.get_origin_by_id(c).is_child_of(origins.get_origin_by_id(b)));

    origins
        .rejigger(a, &rust_posetree::geometry::SE3::identity())
        .unwrap();
    origins.flatten(a).unwrap();

    assert!(origins.get_origin_by_id(c).is_child_of(origins.get_origin_by_id(a)));
    assert!(origins.get_origin_by_id(b).is_child_of(origins.get_origin_by_id(a)));
    assert!(origins.sanity_check_ownership());

    assert_eq!(some_pose.parent().map(|p| p.id()), Some(c));
    assert_eq!(some_pose.root_id(), a);
    assert_eq!(some_pose.to_pose_struct(&origins).origin_id, a);
}
