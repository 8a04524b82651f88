//! Bounding volumes for camera framing

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::empty()
    }
}

impl BoundingBox {
    /// An empty box; unions with it leave the other operand unchanged
    pub fn empty() -> Self {
        Self {
            min: Vec3::splat(f32::MAX),
            max: Vec3::splat(f32::MIN),
        }
    }

    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Smallest box containing all points; empty for an empty slice
    pub fn from_points(points: &[Vec3]) -> Self {
        let mut bounds = Self::empty();
        for p in points {
            bounds.min = bounds.min.min(*p);
            bounds.max = bounds.max.max(*p);
        }
        bounds
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Union of two boxes
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        BoundingBox {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// The box enclosing this box transformed by `transform`.
    ///
    /// Transforms all eight corners; the result stays axis-aligned.
    pub fn transformed(&self, transform: Mat4) -> BoundingBox {
        if self.is_empty() {
            return *self;
        }
        let corners = [
            Vec3::new(self.min.x, self.min.y, self.min.z),
            Vec3::new(self.max.x, self.min.y, self.min.z),
            Vec3::new(self.min.x, self.max.y, self.min.z),
            Vec3::new(self.max.x, self.max.y, self.min.z),
            Vec3::new(self.min.x, self.min.y, self.max.z),
            Vec3::new(self.max.x, self.min.y, self.max.z),
            Vec3::new(self.min.x, self.max.y, self.max.z),
            Vec3::new(self.max.x, self.max.y, self.max.z),
        ];
        let transformed: Vec<Vec3> = corners
            .iter()
            .map(|c| transform.transform_point3(*c))
            .collect();
        BoundingBox::from_points(&transformed)
    }

    pub fn center(&self) -> Vec3 {
        if self.is_empty() {
            return Vec3::ZERO;
        }
        (self.min + self.max) / 2.0
    }

    pub fn size(&self) -> Vec3 {
        if self.is_empty() {
            return Vec3::ZERO;
        }
        self.max - self.min
    }
}

/// Minimal sphere used to frame the camera on the visible geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingSphere {
    pub center: Vec3,
    pub radius: f32,
}

impl BoundingSphere {
    /// Sphere enclosing a bounding box; zero-radius at origin for an
    /// empty box
    pub fn from_box(bounds: &BoundingBox) -> Self {
        if bounds.is_empty() {
            return Self {
                center: Vec3::ZERO,
                radius: 0.0,
            };
        }
        Self {
            center: bounds.center(),
            radius: bounds.size().length() / 2.0,
        }
    }

    /// Smallest sphere containing both spheres
    pub fn union(&self, other: &BoundingSphere) -> BoundingSphere {
        if self.radius == 0.0 {
            return *other;
        }
        if other.radius == 0.0 {
            return *self;
        }
        let offset = other.center - self.center;
        let distance = offset.length();

        // One sphere fully inside the other
        if distance + other.radius <= self.radius {
            return *self;
        }
        if distance + self.radius <= other.radius {
            return *other;
        }

        let radius = (distance + self.radius + other.radius) / 2.0;
        let center = if distance > f32::EPSILON {
            self.center + offset * ((radius - self.radius) / distance)
        } else {
            self.center
        };
        BoundingSphere { center, radius }
    }
}
