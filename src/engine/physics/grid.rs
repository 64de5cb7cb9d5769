// Tile collision grid
//
// Row 0 is the TOP row of the level while world Y grows upward, so
// `world_to_row` flips the axis. Level data, spawns and bodies all use this
// convention.

use super::collision::Aabb;

/// Fallback edge length for a tile when a non-positive size is supplied
pub const DEFAULT_TILE_SIZE: f32 = 32.0;

/// Largest row or column count a grid accepts
pub const MAX_GRID_DIMENSION: usize = 4096;

/// Collision flags for a single tile
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TileFlags {
    pub solid: bool,
    pub water: bool,
}

/// Per-tile solid/water masks plus world <-> tile mapping
#[derive(Debug, Clone)]
pub struct CollisionGrid {
    rows: i32,
    cols: i32,
    tile_size: f32,
    tiles: Vec<TileFlags>,
}

impl CollisionGrid {
    /// Create an empty grid (no solid or water tiles)
    pub fn new(rows: usize, cols: usize, tile_size: f32) -> Self {
        let tile_size = if tile_size > 0.0 {
            tile_size
        } else {
            log::warn!(
                "Invalid tile size {}; falling back to {}",
                tile_size,
                DEFAULT_TILE_SIZE
            );
            DEFAULT_TILE_SIZE
        };

        if rows > MAX_GRID_DIMENSION || cols > MAX_GRID_DIMENSION {
            log::warn!(
                "Grid {}x{} exceeds {} tiles per side; clamping",
                rows,
                cols,
                MAX_GRID_DIMENSION
            );
        }
        let rows = rows.min(MAX_GRID_DIMENSION);
        let cols = cols.min(MAX_GRID_DIMENSION);

        Self {
            rows: rows as i32,
            cols: cols as i32,
            tile_size,
            tiles: vec![TileFlags::default(); rows * cols],
        }
    }

    /// Build a grid from `(row, col)` solid and water lists.
    /// Entries outside the grid are ignored.
    pub fn from_masks(
        rows: usize,
        cols: usize,
        tile_size: f32,
        solid: &[(i32, i32)],
        water: &[(i32, i32)],
    ) -> Self {
        let mut grid = Self::new(rows, cols, tile_size);
        for &(row, col) in solid {
            if let Some(tile) = grid.tile_mut(row, col) {
                tile.solid = true;
            } else {
                log::debug!("Ignoring out-of-range solid tile ({}, {})", row, col);
            }
        }
        for &(row, col) in water {
            if let Some(tile) = grid.tile_mut(row, col) {
                tile.water = true;
            } else {
                log::debug!("Ignoring out-of-range water tile ({}, {})", row, col);
            }
        }
        log::info!(
            "Collision grid {}x{} built ({} solid, {} water)",
            rows,
            cols,
            grid.tiles.iter().filter(|t| t.solid).count(),
            grid.tiles.iter().filter(|t| t.water).count()
        );
        grid
    }

    pub fn rows(&self) -> i32 {
        self.rows
    }

    pub fn cols(&self) -> i32 {
        self.cols
    }

    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// World-space extent of the whole grid
    pub fn world_width(&self) -> f32 {
        self.cols as f32 * self.tile_size
    }

    pub fn world_height(&self) -> f32 {
        self.rows as f32 * self.tile_size
    }

    fn index(&self, row: i32, col: i32) -> Option<usize> {
        if row < 0 || row >= self.rows || col < 0 || col >= self.cols {
            return None;
        }
        Some((row * self.cols + col) as usize)
    }

    fn tile_mut(&mut self, row: i32, col: i32) -> Option<&mut TileFlags> {
        let index = self.index(row, col)?;
        self.tiles.get_mut(index)
    }

    /// Whether a tile blocks movement. Anything outside the grid is solid.
    pub fn is_solid(&self, row: i32, col: i32) -> bool {
        match self.index(row, col) {
            Some(index) => self.tiles[index].solid,
            None => true,
        }
    }

    /// Whether a tile is water. Anything outside the grid is dry.
    pub fn is_water(&self, row: i32, col: i32) -> bool {
        match self.index(row, col) {
            Some(index) => self.tiles[index].water,
            None => false,
        }
    }

    pub fn world_to_col(&self, world_x: f32) -> i32 {
        (world_x / self.tile_size).floor() as i32
    }

    pub fn world_to_row(&self, world_y: f32) -> i32 {
        let row_from_bottom = (world_y / self.tile_size).floor() as i32;
        self.rows - row_from_bottom - 1
    }

    pub fn col_left(&self, col: i32) -> f32 {
        col as f32 * self.tile_size
    }

    pub fn col_right(&self, col: i32) -> f32 {
        self.col_left(col) + self.tile_size
    }

    pub fn row_bottom(&self, row: i32) -> f32 {
        (self.rows - row - 1) as f32 * self.tile_size
    }

    pub fn row_top(&self, row: i32) -> f32 {
        self.row_bottom(row) + self.tile_size
    }

    /// World-space box covered by a tile
    pub fn tile_aabb(&self, row: i32, col: i32) -> Aabb {
        Aabb {
            left: self.col_left(col),
            bottom: self.row_bottom(row),
            right: self.col_right(col),
            top: self.row_top(row),
        }
    }

    /// Inclusive (start, end) row range spanned by two world Y values
    pub fn row_span(&self, y_a: f32, y_b: f32) -> (i32, i32) {
        let a = self.world_to_row(y_a);
        let b = self.world_to_row(y_b);
        (a.min(b), a.max(b))
    }

    /// Inclusive (start, end) column range spanned by two world X values
    pub fn col_span(&self, x_a: f32, x_b: f32) -> (i32, i32) {
        let a = self.world_to_col(x_a);
        let b = self.world_to_col(x_b);
        (a.min(b), a.max(b))
    }

    /// True if any tile covered by `aabb` is water
    pub fn overlaps_water(&self, aabb: &Aabb) -> bool {
        let (row_start, row_end) = self.row_span(aabb.bottom, aabb.top);
        let (col_start, col_end) = self.col_span(aabb.left, aabb.right);
        (row_start..=row_end)
            .any(|row| (col_start..=col_end).any(|col| self.is_water(row, col)))
    }

    /// Iterate over every in-bounds solid tile as `(row, col)`
    pub fn solid_tiles(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        let cols = self.cols;
        self.tiles
            .iter()
            .enumerate()
            .filter(|(_, tile)| tile.solid)
            .map(move |(index, _)| (index as i32 / cols, index as i32 % cols))
    }
}
