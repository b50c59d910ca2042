use std::ops::Sub;

use nalgebra::{Point2, Scalar};

use super::{WorldBox, WorldPoint};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AABB<Point> {
    pub min: Point,
    pub max: Point,
}

impl<Point> AABB<Point> {
    pub fn new(min: Point, max: Point) -> AABB<Point> {
        AABB { min, max }
    }
}

impl<Point: Sub + Copy> AABB<Point> {
    pub fn size(&self) -> Point::Output {
        self.max - self.min
    }
}

impl<T: Scalar + Copy + Sub> AABB<Point2<T>> {
    pub fn width(&self) -> T::Output {
        self.max[0] - self.min[0]
    }

    pub fn height(&self) -> T::Output {
        self.max[1] - self.min[1]
    }
}

impl AABB<Point2<u32>> {
    pub fn from_size(size: super::ScreenSize) -> Self {
        AABB::new(Point2::origin(), Point2::from(size))
    }

    pub fn is_empty(&self) -> bool {
        self.max.x <= self.min.x || self.max.y <= self.min.y
    }

    pub fn area(&self) -> u32 {
        if self.is_empty() {
            0
        } else {
            self.width() * self.height()
        }
    }

    #[cfg(test)]
    pub fn contains(&self, p: &Point2<u32>) -> bool {
        p.x >= self.min.x && p.x < self.max.x && p.y >= self.min.y && p.y < self.max.y
    }
}

impl WorldBox {
    /// Smallest box containing all the points, None if the iterator is empty.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a WorldPoint>) -> Option<WorldBox> {
        let mut points = points.into_iter();
        let first = points.next()?;
        Some(points.fold(AABB::new(*first, *first), |b, p| b.extended(p)))
    }

    /// Returns a box grown to contain the point.
    pub fn extended(&self, p: &WorldPoint) -> WorldBox {
        AABB {
            min: self.min.inf(p),
            max: self.max.sup(p),
        }
    }

    /// Smallest box containing both boxes.
    pub fn union(&self, other: &WorldBox) -> WorldBox {
        AABB {
            min: self.min.inf(&other.min),
            max: self.max.sup(&other.max),
        }
    }

    #[cfg(test)]
    pub fn contains_box(&self, other: &WorldBox) -> bool {
        (0..3).all(|axis| self.min[axis] <= other.min[axis] && other.max[axis] <= self.max[axis])
    }

    /// Index of the axis along which the box is the widest.
    pub fn longest_axis(&self) -> usize {
        self.size().iamax()
    }
}
