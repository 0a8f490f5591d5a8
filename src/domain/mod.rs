pub mod point;
pub mod polygon;

pub use point::Point;
pub use polygon::{Edge, ParsePolygonError, Polygon};
