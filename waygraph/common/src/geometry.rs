use std::fmt;
use std::ops::Index;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub lat: f64,
    pub lon: f64,
}

impl Point {
    #[inline]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.lat, self.lon)
    }
}

/// Ordered shape points of an edge.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PointList(Vec<Point>);

impl PointList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self(Vec::with_capacity(capacity))
    }

    pub fn push(&mut self, point: Point) {
        self.0.push(point);
    }

    pub fn extend_from(&mut self, other: &PointList) {
        self.0.extend_from_slice(&other.0);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> Option<&Point> {
        self.0.first()
    }

    pub fn last(&self) -> Option<&Point> {
        self.0.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Point> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Point] {
        &self.0
    }

    /// Returns a copy of the points in opposite order.
    pub fn reversed(&self) -> Self {
        Self(self.0.iter().rev().copied().collect())
    }
}

impl From<Vec<Point>> for PointList {
    fn from(points: Vec<Point>) -> Self {
        Self(points)
    }
}

impl FromIterator<Point> for PointList {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Index<usize> for PointList {
    type Output = Point;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl<'a> IntoIterator for &'a PointList {
    type Item = &'a Point;
    type IntoIter = std::slice::Iter<'a, Point>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for PointList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.iter().join(", "))
    }
}

/// Which points of an edge geometry to fetch.
///
/// Tower nodes are the two endpoints of the edge (base and adjacent node), pillar nodes are the
/// shape points in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchMode {
    TowerOnly,
    PillarOnly,
    BaseAndPillar,
    PillarAndAdj,
    All,
}

impl FetchMode {
    #[inline]
    pub fn includes_base(&self) -> bool {
        matches!(self, Self::TowerOnly | Self::BaseAndPillar | Self::All)
    }

    #[inline]
    pub fn includes_pillars(&self) -> bool {
        !matches!(self, Self::TowerOnly)
    }

    #[inline]
    pub fn includes_adj(&self) -> bool {
        matches!(self, Self::TowerOnly | Self::PillarAndAdj | Self::All)
    }

    /// Assembles the geometry for this mode from the tower points and the pillar points, all in
    /// traversal direction.
    pub fn assemble(&self, base: Point, pillars: &[Point], adj: Point) -> PointList {
        let mut points = PointList::with_capacity(pillars.len() + 2);
        if self.includes_base() {
            points.push(base);
        }
        if self.includes_pillars() {
            points.0.extend_from_slice(pillars);
        }
        if self.includes_adj() {
            points.push(adj);
        }
        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pillars() -> Vec<Point> {
        vec![Point::new(1.0, 1.0), Point::new(2.0, 2.0)]
    }

    #[test]
    fn test_fetch_mode_assemble() {
        let base = Point::new(0.0, 0.0);
        let adj = Point::new(3.0, 3.0);
        let pillars = pillars();

        assert_eq!(
            FetchMode::TowerOnly.assemble(base, &pillars, adj),
            PointList::from(vec![base, adj])
        );
        assert_eq!(
            FetchMode::PillarOnly.assemble(base, &pillars, adj),
            PointList::from(pillars.clone())
        );
        assert_eq!(FetchMode::BaseAndPillar.assemble(base, &pillars, adj).len(), 3);
        assert_eq!(FetchMode::PillarAndAdj.assemble(base, &pillars, adj)[0], pillars[0]);
        assert_eq!(FetchMode::All.assemble(base, &pillars, adj).len(), 4);
    }

    #[test]
    fn test_point_list_reversed() {
        let list = PointList::from(pillars());
        let reversed = list.reversed();
        assert_eq!(reversed.first(), list.last());
        assert_eq!(reversed.to_string(), "[(2,2), (1,1)]");
    }
}
