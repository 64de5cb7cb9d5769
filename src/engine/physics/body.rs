use glam::Vec2;

use super::collision::{Aabb, ColliderShape, COLLISION_EPSILON};
use super::grid::CollisionGrid;

/// Default downward acceleration in world units per second squared
pub const DEFAULT_GRAVITY: f32 = -1500.0;

/// Horizontal speeds below this are treated as stationary
const HORIZONTAL_REST_SPEED: f32 = 0.01;

/// Kinematic body: integrates gravity and velocity, then resolves its
/// axis-aligned collider against a `CollisionGrid`.
///
/// Integration is axis-separated (X then Y) to avoid corner tunneling. When no
/// grid is supplied the body falls back to clamping against a flat ground
/// plane at `ground_y`.
#[derive(Debug, Clone)]
pub struct KinematicBody {
    position: Vec2,
    velocity: Vec2,
    gravity: f32,
    ground_y: f32,
    collider: ColliderShape,
    grounded: bool,
    touching_wall_left: bool,
    touching_wall_right: bool,
    in_water: bool,
}

impl Default for KinematicBody {
    fn default() -> Self {
        BodyBuilder::new().build()
    }
}

impl KinematicBody {
    /// Teleport the body and clear its motion state
    pub fn place(&mut self, x: f32, y: f32) {
        self.position = Vec2::new(x, y);
        self.velocity = Vec2::ZERO;
        self.grounded = false;
        self.touching_wall_left = false;
        self.touching_wall_right = false;
        self.in_water = false;
        log::debug!("Body placed at ({}, {})", x, y);
    }

    pub fn set_gravity(&mut self, gravity: f32) {
        self.gravity = gravity;
    }

    pub fn set_ground_y(&mut self, ground_y: f32) {
        self.ground_y = ground_y;
    }

    pub fn set_collider(&mut self, collider: ColliderShape) {
        self.collider = collider;
    }

    pub fn add_impulse(&mut self, impulse: Vec2) {
        self.velocity += impulse;
        if impulse.y > 0.0 {
            self.grounded = false;
        }
    }

    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
        if velocity.y > 0.0 {
            self.grounded = false;
        }
    }

    pub fn set_horizontal_speed(&mut self, speed: f32) {
        self.velocity.x = speed;
    }

    pub fn stop_horizontal(&mut self) {
        self.velocity.x = 0.0;
    }

    pub fn set_vertical_velocity(&mut self, speed: f32) {
        self.velocity.y = speed;
        if speed > 0.0 {
            self.grounded = false;
        }
    }

    /// Advance one frame
    pub fn update(&mut self, dt: f32, grid: Option<&CollisionGrid>) {
        self.velocity.y += self.gravity * dt;
        match grid {
            Some(grid) => self.integrate_with_collisions(dt, grid),
            None => self.integrate_ground_plane(dt),
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn gravity(&self) -> f32 {
        self.gravity
    }

    pub fn collider(&self) -> &ColliderShape {
        &self.collider
    }

    /// Collider box at the current position
    pub fn aabb(&self) -> Aabb {
        self.collider.aabb_at(self.position)
    }

    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    pub fn is_touching_wall_left(&self) -> bool {
        self.touching_wall_left
    }

    pub fn is_touching_wall_right(&self) -> bool {
        self.touching_wall_right
    }

    pub fn is_touching_wall(&self) -> bool {
        self.touching_wall_left || self.touching_wall_right
    }

    pub fn is_in_water(&self) -> bool {
        self.in_water
    }

    fn integrate_ground_plane(&mut self, dt: f32) {
        self.touching_wall_left = false;
        self.touching_wall_right = false;
        self.in_water = false;
        self.position += self.velocity * dt;

        if self.position.y < self.ground_y {
            self.position.y = self.ground_y;
            if !self.grounded {
                log::debug!("Body grounded on plane y={}", self.ground_y);
            }
            self.grounded = true;
            if self.velocity.y < 0.0 {
                self.velocity.y = 0.0;
            }
        } else {
            self.grounded = false;
        }
    }

    fn integrate_with_collisions(&mut self, dt: f32, grid: &CollisionGrid) {
        self.touching_wall_left = false;
        self.touching_wall_right = false;

        self.position.x += self.velocity.x * dt;
        self.resolve_horizontal(grid);

        self.position.y += self.velocity.y * dt;
        self.resolve_vertical(grid);

        self.refresh_wall_contacts(grid);
        self.refresh_water(grid);
    }

    fn resolve_horizontal(&mut self, grid: &CollisionGrid) {
        if self.velocity.x.abs() < HORIZONTAL_REST_SPEED {
            return;
        }

        let aabb = self.aabb();
        let (row_start, row_end) =
            grid.row_span(aabb.bottom + COLLISION_EPSILON, aabb.top - COLLISION_EPSILON);

        if self.velocity.x > 0.0 {
            let col = grid.world_to_col(aabb.right - COLLISION_EPSILON);
            if (row_start..=row_end).any(|row| grid.is_solid(row, col)) {
                let new_left = grid.col_left(col) - self.collider.width();
                self.position.x = self.collider.origin_x_for_left(new_left);
                self.velocity.x = 0.0;
                self.touching_wall_right = true;
            }
        } else {
            let col = grid.world_to_col(aabb.left + COLLISION_EPSILON);
            if (row_start..=row_end).any(|row| grid.is_solid(row, col)) {
                self.position.x = self.collider.origin_x_for_left(grid.col_right(col));
                self.velocity.x = 0.0;
                self.touching_wall_left = true;
            }
        }
    }

    fn resolve_vertical(&mut self, grid: &CollisionGrid) {
        let aabb = self.aabb();
        let (col_start, col_end) =
            grid.col_span(aabb.left + COLLISION_EPSILON, aabb.right - COLLISION_EPSILON);

        if self.velocity.y <= 0.0 {
            let row = grid.world_to_row(aabb.bottom - COLLISION_EPSILON);
            if (col_start..=col_end).any(|col| grid.is_solid(row, col)) {
                self.position.y = self.collider.origin_y_for_bottom(grid.row_top(row));
                self.velocity.y = 0.0;
                self.grounded = true;
            } else {
                self.grounded = false;
            }
        } else {
            let row = grid.world_to_row(aabb.top + COLLISION_EPSILON);
            if (col_start..=col_end).any(|col| grid.is_solid(row, col)) {
                let new_bottom = grid.row_bottom(row) - self.collider.height();
                self.position.y = self.collider.origin_y_for_bottom(new_bottom);
                self.velocity.y = 0.0;
            }
            self.grounded = false;
        }
    }

    fn refresh_wall_contacts(&mut self, grid: &CollisionGrid) {
        let aabb = self.aabb();
        let (row_start, row_end) =
            grid.row_span(aabb.bottom + COLLISION_EPSILON, aabb.top - COLLISION_EPSILON);

        let col_left = grid.world_to_col(aabb.left - COLLISION_EPSILON);
        let col_right = grid.world_to_col(aabb.right + COLLISION_EPSILON);

        self.touching_wall_left = (row_start..=row_end).any(|row| grid.is_solid(row, col_left));
        self.touching_wall_right = (row_start..=row_end).any(|row| grid.is_solid(row, col_right));
    }

    fn refresh_water(&mut self, grid: &CollisionGrid) {
        self.in_water = grid.overlaps_water(&self.aabb().shrink(COLLISION_EPSILON));
    }
}

/// Builder for kinematic bodies with common configurations
pub struct BodyBuilder {
    position: Vec2,
    velocity: Vec2,
    gravity: f32,
    ground_y: f32,
    collider: ColliderShape,
}

impl Default for BodyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BodyBuilder {
    pub fn new() -> Self {
        Self {
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            gravity: DEFAULT_GRAVITY,
            ground_y: 0.0,
            collider: ColliderShape::default(),
        }
    }

    /// Set the initial position of the body
    pub fn position(mut self, x: f32, y: f32) -> Self {
        self.position = Vec2::new(x, y);
        self
    }

    /// Set the initial velocity
    pub fn velocity(mut self, x: f32, y: f32) -> Self {
        self.velocity = Vec2::new(x, y);
        self
    }

    /// Set gravity (negative pulls down)
    pub fn gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    /// Ground plane used when no collision grid is attached
    pub fn ground_y(mut self, ground_y: f32) -> Self {
        self.ground_y = ground_y;
        self
    }

    pub fn collider(mut self, collider: ColliderShape) -> Self {
        self.collider = collider;
        self
    }

    pub fn build(self) -> KinematicBody {
        KinematicBody {
            position: self.position,
            velocity: self.velocity,
            gravity: self.gravity,
            ground_y: self.ground_y,
            collider: self.collider,
            grounded: false,
            touching_wall_left: false,
            touching_wall_right: false,
            in_water: false,
        }
    }
}
