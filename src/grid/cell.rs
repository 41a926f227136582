//! Cell state: terrain, infrastructure, and building occupancy

use crate::core::types::BuildingId;
use serde::{Deserialize, Serialize};

/// Terrain kind of a grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Terrain {
    OpenLand,
    Water,
    Rail,
    Forest,
    Crater,
    Irradiated,
    Mountain,
    Marsh,
    Path,
}

impl Terrain {
    /// Whether a building may stand on this terrain
    pub fn is_buildable(&self) -> bool {
        matches!(self, Terrain::OpenLand)
    }

    /// Whether zoning may be designated on this terrain
    pub fn is_zonable(&self) -> bool {
        matches!(self, Terrain::OpenLand | Terrain::Marsh)
    }
}

/// Player-designated growth category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZoneKind {
    Residential,
    Industrial,
    Agricultural,
}

/// One grid square's terrain + infrastructure + occupancy state
///
/// `watered` is fully derived: the water resolver recomputes it every tick
/// and nothing else may write it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cell {
    pub terrain: Terrain,
    /// Occupying building, if any (at most one per cell)
    pub building: Option<BuildingId>,
    pub zone: Option<ZoneKind>,
    /// Elevation tier
    pub elevation: i8,
    /// Pollution level, non-negative, unbounded in principle
    pub pollution: f32,
    /// Fire intensity counter; 0 means not burning
    pub fire: u8,
    /// Whether a pipe runs under this cell
    pub pipe: bool,
    /// Derived water-service flag
    pub watered: bool,
    /// True where a rail or road crosses water on a permanent span
    pub bridge: bool,
}

impl Cell {
    pub fn new(terrain: Terrain) -> Self {
        Self {
            terrain,
            building: None,
            zone: None,
            elevation: 0,
            pollution: 0.0,
            fire: 0,
            pipe: false,
            watered: false,
            bridge: false,
        }
    }

    pub fn is_burning(&self) -> bool {
        self.fire > 0
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::new(Terrain::OpenLand)
    }
}
