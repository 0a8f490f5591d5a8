pub mod collision;

pub use collision::{ccw, collides, point_in_polygon, segments_intersect};
