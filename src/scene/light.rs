use crate::{geometry::WorldPoint, util::Rgba};

/// Point light. Its contribution falls off with the squared distance.
#[derive(Clone, Debug, PartialEq)]
pub struct PointLight {
    pub position: WorldPoint,
    pub color: Rgba,
}
