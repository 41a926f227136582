//! Core identifier and coordinate types shared across the simulation

use serde::{Deserialize, Serialize};

/// Simulation tick counter type
pub type Tick = u64;

/// Unique building identifier
///
/// Allocated sequentially by the registry so a given seed always produces
/// the same ids; random ids would leak nondeterminism into saves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BuildingId(pub u64);

/// Integer grid coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another position
    pub fn distance(&self, other: &GridPos) -> f32 {
        let dx = (self.x - other.x) as f32;
        let dy = (self.y - other.y) as f32;
        (dx * dx + dy * dy).sqrt()
    }

    /// The four orthogonal neighbours (may be out of grid bounds)
    pub fn neighbors4(&self) -> [GridPos; 4] {
        [
            GridPos::new(self.x, self.y - 1),
            GridPos::new(self.x - 1, self.y),
            GridPos::new(self.x + 1, self.y),
            GridPos::new(self.x, self.y + 1),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_pos_distance() {
        let a = GridPos::new(0, 0);
        let b = GridPos::new(3, 4);
        assert!((a.distance(&b) - 5.0).abs() < 0.001);
    }

    #[test]
    fn test_grid_pos_neighbors() {
        let p = GridPos::new(2, 2);
        let n = p.neighbors4();
        assert!(n.contains(&GridPos::new(2, 1)));
        assert!(n.contains(&GridPos::new(1, 2)));
        assert!(n.contains(&GridPos::new(3, 2)));
        assert!(n.contains(&GridPos::new(2, 3)));
    }
}
