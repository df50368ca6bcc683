//! Pose origins: the independent coordinate frames the robot has used.

pub mod origin_list;

pub use origin_list::PoseOriginList;
