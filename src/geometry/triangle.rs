use std::ops::Index;

use nalgebra::{ClosedAddAssign, ClosedDivAssign, OPoint, OVector, Scalar, Const};
use num_traits::Zero;

use super::{WorldBox, WorldPoint, WorldVector};

#[derive(Clone, Debug, PartialEq)]
pub struct Triangle<Point>([Point; 3]);

impl<Point> Triangle<Point> {
    #[cfg(test)]
    pub fn new(a: Point, b: Point, c: Point) -> Triangle<Point> {
        Triangle([a, b, c])
    }

    pub fn map<Point2, F: FnMut(&Point) -> Point2>(&self, mut f: F) -> Triangle<Point2> {
        Triangle([f(&self[0]), f(&self[1]), f(&self[2])])
    }
}

impl<Point> Index<usize> for Triangle<Point> {
    type Output = Point;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl<Point> From<[Point; 3]> for Triangle<Point> {
    fn from(value: [Point; 3]) -> Self {
        Triangle(value)
    }
}

impl<T> Triangle<OPoint<T, Const<3>>>
where
    T: Scalar + ClosedAddAssign + ClosedDivAssign + Zero + From<u16>,
{
    pub fn centroid(&self) -> OPoint<T, Const<3>> {
        OPoint {
            coords: self.0.iter().map(|p| &p.coords).sum::<OVector<T, Const<3>>>()
                / T::from(self.0.len() as u16),
        }
    }
}

impl Triangle<WorldPoint> {
    /// Returns edge vectors, coming from self[0]
    pub fn edges(&self) -> [WorldVector; 2] {
        [self.0[1] - self.0[0], self.0[2] - self.0[0]]
    }

    /// Returns a normal vector of the triangle, not normalized.
    pub fn normal(&self) -> WorldVector {
        let [e1, e2] = self.edges();
        e1.cross(&e2)
    }

    pub fn bounding_box(&self) -> WorldBox {
        let b = WorldBox::new(self.0[0], self.0[0]);
        b.extended(&self.0[1]).extended(&self.0[2])
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct BarycentricCoordinates<T> {
    pub u: T,
    pub v: T,
}

/// Point in the triangle corresponding to the coordinates.
#[cfg(test)]
impl BarycentricCoordinates<super::FloatType> {
    pub fn interpolate_triangle(&self, triangle: &Triangle<WorldPoint>) -> WorldPoint {
        let w = 1.0 - self.u - self.v;
        WorldPoint::from(
            triangle[0].coords * w + triangle[1].coords * self.u + triangle[2].coords * self.v,
        )
    }
}
