//! 2D value types used by the quadtree.
//!
//! All types are `Copy` and every operation is pure. Distance tests compare squared lengths so
//! no square root is taken on the hot paths.
use std::cmp::Ordering;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Componentwise minimum
    pub fn min(self, rhs: Self) -> Self {
        Self::new(self.x.min(rhs.x), self.y.min(rhs.y))
    }

    /// Componentwise maximum
    pub fn max(self, rhs: Self) -> Self {
        Self::new(self.x.max(rhs.x), self.y.max(rhs.y))
    }

    /// True if `self` is strictly less than `rhs` on both axes.
    pub fn lt_all(&self, rhs: &Self) -> bool {
        self.x < rhs.x && self.y < rhs.y
    }

    /// True if `self` is strictly greater than `rhs` on both axes.
    pub fn gt_all(&self, rhs: &Self) -> bool {
        self.x > rhs.x && self.y > rhs.y
    }

    /// Squared distance between two points.
    pub fn dist_squared(&self, rhs: &Self) -> f32 {
        Vector::between(*rhs, *self).magnitude_squared()
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, p: Self) {
        self.x += p.x;
        self.y += p.y;
    }
}

impl SubAssign for Point {
    fn sub_assign(&mut self, p: Self) {
        self.x -= p.x;
        self.y -= p.y;
    }
}

impl Add for Point {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self += rhs;
        self
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(mut self, rhs: Self) -> Self {
        self -= rhs;
        self
    }
}

impl Add<Vector> for Point {
    type Output = Self;

    fn add(self, rhs: Vector) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub<Vector> for Point {
    type Output = Self;

    fn sub(self, rhs: Vector) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Add<f32> for Point {
    type Output = Self;

    fn add(self, rhs: f32) -> Self {
        Self::new(self.x + rhs, self.y + rhs)
    }
}

impl Sub<f32> for Point {
    type Output = Self;

    fn sub(self, rhs: f32) -> Self {
        Self::new(self.x - rhs, self.y - rhs)
    }
}

impl Mul<f32> for Point {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f32> for Point {
    type Output = Self;

    fn div(self, rhs: f32) -> Self {
        Self::new(self.x / rhs, self.y / rhs)
    }
}

// componentwise
impl Mul for Point {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self::new(self.x * rhs.x, self.y * rhs.y)
    }
}

impl Div for Point {
    type Output = Self;

    fn div(self, rhs: Self) -> Self {
        Self::new(self.x / rhs.x, self.y / rhs.y)
    }
}

/// A displacement in the plane.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vector {
    pub x: f32,
    pub y: f32,
}

impl Vector {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// The displacement that takes `from` to `to`.
    pub fn between(from: Point, to: Point) -> Self {
        Self::from(to - from)
    }

    pub fn dot(&self, rhs: &Self) -> f32 {
        self.x * rhs.x + self.y * rhs.y
    }

    pub fn magnitude(&self) -> f32 {
        self.magnitude_squared().sqrt()
    }

    pub fn magnitude_squared(&self) -> f32 {
        self.dot(self)
    }
}

impl From<Point> for Vector {
    fn from(p: Point) -> Self {
        Self::new(p.x, p.y)
    }
}

impl Add for Vector {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vector {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Vector {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl Mul<f32> for Vector {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f32> for Vector {
    type Output = Self;

    fn div(self, rhs: f32) -> Self {
        Self::new(self.x / rhs, self.y / rhs)
    }
}

/// Directed segment from `start` to `end`.
///
/// Comparison operators look at the length only: two segments with different endpoints compare
/// equal when they are equally long.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LineSegment {
    pub start: Point,
    pub end: Point,
}

impl Default for LineSegment {
    fn default() -> Self {
        Self::new(Point::new(0.0, 0.0), Point::new(0.0, 1.0))
    }
}

impl LineSegment {
    pub const fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    pub fn displacement(&self) -> Vector {
        Vector::between(self.start, self.end)
    }

    pub fn length(&self) -> f32 {
        self.displacement().magnitude()
    }

    pub fn length_squared(&self) -> f32 {
        self.displacement().magnitude_squared()
    }
}

impl PartialEq for LineSegment {
    fn eq(&self, other: &Self) -> bool {
        self.length() == other.length()
    }
}

impl PartialOrd for LineSegment {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.length().partial_cmp(&other.length())
    }
}

/// Axis aligned rectangle given by its center and half of its size along each axis.
///
/// The half extent is expected to be non-negative but this is not enforced; the bounds are
/// always computed so that `lower_bound() <= upper_bound()` holds componentwise.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rectangle {
    pub center: Point,
    pub half_extent: Vector,
}

impl Default for Rectangle {
    fn default() -> Self {
        Self::new(Point::new(0.0, 0.0), Vector::new(1.0, 1.0))
    }
}

impl Rectangle {
    pub const fn new(center: Point, half_extent: Vector) -> Self {
        Self {
            center,
            half_extent,
        }
    }

    pub fn from_corners(min: Point, max: Point) -> Self {
        let center = (min + max) / 2.0;
        Self::new(center, Vector::between(center, max))
    }

    pub fn lower_bound(&self) -> Point {
        self.center.min(self.center - self.half_extent)
    }

    pub fn upper_bound(&self) -> Point {
        self.center.max(self.center + self.half_extent)
    }

    /// Return [min, max] of the rectangle
    pub fn bounds(&self) -> (Point, Point) {
        (self.lower_bound(), self.upper_bound())
    }

    /// Closed on both ends: points on the edges are contained.
    pub fn contains_point(&self, p: &Point) -> bool {
        let (min, max) = self.bounds();
        min.x <= p.x && p.x <= max.x && min.y <= p.y && p.y <= max.y
    }

    /// The point of the rectangle closest to `p`, `p` itself if it is contained.
    pub fn closest_point(&self, p: &Point) -> Point {
        let (min, max) = self.bounds();
        Point::new(clamp(p.x, min.x, max.x), clamp(p.y, min.y, max.y))
    }

    /// Zero for contained points.
    pub fn distance_squared(&self, p: &Point) -> f32 {
        LineSegment::new(*p, self.closest_point(p)).length_squared()
    }

    /// The four quadrants of this rectangle, ordered NE, NW, SE, SW.
    pub fn quadrants(&self) -> [Rectangle; 4] {
        let Point { x, y } = self.center;
        let half = self.half_extent * 0.5;

        [
            Self::new(Point::new(x + half.x, y + half.y), half),
            Self::new(Point::new(x - half.x, y + half.y), half),
            Self::new(Point::new(x + half.x, y - half.y), half),
            Self::new(Point::new(x - half.x, y - half.y), half),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Circle {
    pub center: Point,
    pub radius: f32,
}

/// Circles stored in a [`Quadtree`](crate::Quadtree).
pub type Particle = Circle;

impl Default for Circle {
    fn default() -> Self {
        Self::new(Point::new(0.0, 0.0), 1.0)
    }
}

impl Circle {
    pub const fn new(center: Point, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Touching circles intersect.
    pub fn intersects_circle(&self, other: &Circle) -> bool {
        let radii = self.radius + other.radius;
        LineSegment::new(self.center, other.center).length_squared() <= radii * radii
    }

    pub fn intersects_rectangle(&self, rect: &Rectangle) -> bool {
        rect.distance_squared(&self.center) <= self.radius * self.radius
    }

    /// Only the center is tested, the circle itself may extend past the rectangle.
    pub fn center_in(&self, rect: &Rectangle) -> bool {
        rect.contains_point(&self.center)
    }
}

// unlike f32::clamp this does not panic on NaN bounds
fn clamp(v: f32, min: f32, max: f32) -> f32 {
    if v < min {
        min
    } else if v > max {
        max
    } else {
        v
    }
}
