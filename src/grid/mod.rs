pub mod cell;
pub mod world_grid;

pub use cell::{Cell, Terrain, ZoneKind};
pub use world_grid::WorldGrid;
