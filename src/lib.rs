pub mod config;
pub mod error;
pub mod geometry;
pub mod origins;
pub mod pose;
pub mod verify;

pub use error::{PoseGraphError, Result};
pub use origins::PoseOriginList;
pub use pose::{Pose, PoseId, PoseOriginId, PoseStruct, PoseView};
