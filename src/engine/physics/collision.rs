use glam::Vec2;

/// Inward nudge applied to collider edges before converting them to tile
/// indices, so a box resting exactly on a tile boundary does not probe itself.
pub const COLLISION_EPSILON: f32 = 0.001;

/// Axis-aligned box in world space (y grows upward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub left: f32,
    pub bottom: f32,
    pub right: f32,
    pub top: f32,
}

impl Aabb {
    /// Create a box from its bottom-left corner and size
    pub fn from_min_size(min: Vec2, size: Vec2) -> Self {
        let size = size.max(Vec2::ZERO);
        Self {
            left: min.x,
            bottom: min.y,
            right: min.x + size.x,
            top: min.y + size.y,
        }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.top - self.bottom
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(
            (self.left + self.right) * 0.5,
            (self.bottom + self.top) * 0.5,
        )
    }

    /// Shrink every edge towards the centre by `amount`
    pub fn shrink(&self, amount: f32) -> Self {
        Self {
            left: self.left + amount,
            bottom: self.bottom + amount,
            right: self.right - amount,
            top: self.top - amount,
        }
    }

    /// Area shared with another box (zero when disjoint)
    pub fn overlap_area(&self, other: &Aabb) -> f32 {
        let w = (self.right.min(other.right) - self.left.max(other.left)).max(0.0);
        let h = (self.top.min(other.top) - self.bottom.max(other.bottom)).max(0.0);
        w * h
    }
}

/// Collider dimensions relative to an entity's origin.
///
/// The origin is the entity's `position`; the box spans
/// `[position + offset, position + offset + size]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColliderShape {
    width: f32,
    height: f32,
    offset_x: f32,
    offset_y: f32,
}

impl ColliderShape {
    /// Create a collider; negative sizes are clamped to zero
    pub fn new(width: f32, height: f32, offset_x: f32, offset_y: f32) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
            offset_x,
            offset_y,
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn offset(&self) -> Vec2 {
        Vec2::new(self.offset_x, self.offset_y)
    }

    /// World-space box for an entity at `position`
    pub fn aabb_at(&self, position: Vec2) -> Aabb {
        Aabb::from_min_size(position + self.offset(), Vec2::new(self.width, self.height))
    }

    /// Origin x that places the collider's left edge at `left`
    pub fn origin_x_for_left(&self, left: f32) -> f32 {
        left - self.offset_x
    }

    /// Origin y that places the collider's bottom edge at `bottom`
    pub fn origin_y_for_bottom(&self, bottom: f32) -> f32 {
        bottom - self.offset_y
    }
}

impl Default for ColliderShape {
    fn default() -> Self {
        Self::new(48.0, 80.0, 2.0, 0.0)
    }
}
