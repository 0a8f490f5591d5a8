use super::Point;
use geo::{Area, LineString};
use serde::Deserialize;
use std::str::FromStr;
use thiserror::Error;

/// One boundary segment of a polygon
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub start: Point,
    pub end: Point,
}

/// Ordered vertex loop; the edge from the last vertex back to the first is implicit.
///
/// Simple (non self-intersecting) polygons with at least 3 vertices are
/// assumed but never validated. See [`Polygon::is_degenerate`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Polygon {
    points: Vec<Point>,
}

impl Polygon {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Boundary segments, closing edge last. Computed on every call.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| Edge {
            start: self.points[i],
            end: self.points[(i + 1) % n],
        })
    }

    /// Fewer than 3 vertices or zero enclosed area
    pub fn is_degenerate(&self) -> bool {
        if self.points.len() < 3 {
            return true;
        }
        let ring: LineString<f64> = self.points.iter().map(|&p| geo::Coord::from(p)).collect();
        let area = geo::Polygon::new(ring, vec![]).unsigned_area();
        area <= f64::EPSILON
    }
}

impl From<Vec<(f64, f64)>> for Polygon {
    fn from(points: Vec<(f64, f64)>) -> Self {
        Self::new(points.into_iter().map(Point::from).collect())
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ParsePolygonError {
    #[error("vertex {index} ({text:?}) is not an \"x,y\" pair")]
    MalformedPair { index: usize, text: String },
    #[error("vertex {index} has a non-numeric coordinate {text:?}")]
    InvalidCoordinate { index: usize, text: String },
}

impl FromStr for Polygon {
    type Err = ParsePolygonError;

    /// Parse `"x,y x,y x,y"`; pairs may also be separated by `;`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut points = Vec::new();

        for (index, pair) in s
            .split(|c: char| c.is_whitespace() || c == ';')
            .filter(|p| !p.is_empty())
            .enumerate()
        {
            let (x, y) = pair
                .split_once(',')
                .ok_or_else(|| ParsePolygonError::MalformedPair {
                    index,
                    text: pair.to_string(),
                })?;
            let parse = |text: &str| {
                text.trim()
                    .parse::<f64>()
                    .map_err(|_| ParsePolygonError::InvalidCoordinate {
                        index,
                        text: text.to_string(),
                    })
            };
            points.push(Point::new(parse(x)?, parse(y)?));
        }

        Ok(Self::new(points))
    }
}
