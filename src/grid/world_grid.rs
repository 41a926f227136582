//! The 2-D world grid

use crate::core::types::GridPos;
use crate::grid::cell::{Cell, Terrain};
use serde::{Deserialize, Serialize};

/// Row-major grid of cells
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldGrid {
    width: i32,
    height: i32,
    cells: Vec<Cell>,
}

impl WorldGrid {
    /// Create a grid of open land
    pub fn new(width: i32, height: i32) -> Self {
        let count = (width.max(0) * height.max(0)) as usize;
        Self {
            width,
            height,
            cells: vec![Cell::default(); count],
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn in_bounds(&self, pos: GridPos) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height
    }

    fn index(&self, pos: GridPos) -> usize {
        (pos.y * self.width + pos.x) as usize
    }

    pub fn get(&self, pos: GridPos) -> Option<&Cell> {
        if self.in_bounds(pos) {
            Some(&self.cells[self.index(pos)])
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, pos: GridPos) -> Option<&mut Cell> {
        if self.in_bounds(pos) {
            let idx = self.index(pos);
            Some(&mut self.cells[idx])
        } else {
            None
        }
    }

    pub fn set_terrain(&mut self, pos: GridPos, terrain: Terrain) {
        if let Some(cell) = self.get_mut(pos) {
            cell.terrain = terrain;
        }
    }

    /// All positions in row-major order (the stable iteration order used
    /// by growth and diffusion)
    pub fn positions(&self) -> impl Iterator<Item = GridPos> + '_ {
        let width = self.width;
        (0..self.height).flat_map(move |y| (0..width).map(move |x| GridPos::new(x, y)))
    }

    /// In-bounds orthogonal neighbours of a position
    pub fn neighbors4(&self, pos: GridPos) -> impl Iterator<Item = GridPos> + '_ {
        pos.neighbors4().into_iter().filter(|p| self.in_bounds(*p))
    }

    /// In-bounds positions within Euclidean distance `radius` of `center`,
    /// including the center itself
    pub fn positions_within(&self, center: GridPos, radius: f32) -> Vec<GridPos> {
        let r = radius.ceil() as i32;
        let mut result = Vec::new();
        for dy in -r..=r {
            for dx in -r..=r {
                let p = GridPos::new(center.x + dx, center.y + dy);
                if self.in_bounds(p) && center.distance(&p) <= radius {
                    result.push(p);
                }
            }
        }
        result
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Raw pollution values in row-major order (diffusion buffer source)
    pub fn pollution_levels(&self) -> Vec<f32> {
        self.cells.iter().map(|c| c.pollution).collect()
    }

    /// Overwrite pollution from a row-major buffer of the same size
    pub fn apply_pollution(&mut self, buffer: &[f32]) {
        for (cell, &p) in self.cells.iter_mut().zip(buffer.iter()) {
            cell.pollution = p.max(0.0);
        }
    }
}
