//! Top-level simulation state
//!
//! Everything a tick mutates lives here, and everything here serializes,
//! so a save file is just this struct as JSON.

use crate::city::ledger::ResourceLedger;
use crate::city::materials::{Material, MaterialPool};
use crate::city::registry::BuildingRegistry;
use crate::core::calendar::{Calendar, Season, Weather};
use crate::core::config::SimulationConfig;
use crate::grid::WorldGrid;
use crate::simulation::directives::{DirectiveTracker, Quota, QuotaResource};
use crate::simulation::hazards::FallingObject;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CityWorld {
    pub config: SimulationConfig,
    pub calendar: Calendar,
    pub season: Season,
    pub weather: Weather,
    pub grid: WorldGrid,
    pub buildings: BuildingRegistry,
    pub ledger: ResourceLedger,
    pub materials: MaterialPool,
    pub directives: DirectiveTracker,
    pub quota: Quota,
    pub falling_objects: Vec<FallingObject>,
    pub rocket_launched: bool,
}

impl CityWorld {
    pub fn new(width: i32, height: i32, config: SimulationConfig) -> Self {
        let calendar = Calendar::new(config.ticks_per_month);
        let mut materials = MaterialPool::new();
        // Opening allotment from the ministry
        materials.add(Material::Timber, 120);
        materials.add(Material::Steel, 60);
        materials.add(Material::Cement, 60);
        materials.add(Material::Prefab, 10);

        Self {
            config,
            calendar,
            season: Season::Winter,
            weather: Weather::Snow,
            grid: WorldGrid::new(width, height),
            buildings: BuildingRegistry::new(),
            ledger: ResourceLedger::new(),
            materials,
            directives: DirectiveTracker::standard_plan(),
            quota: Quota::new(QuotaResource::Food, 20.0, 2),
            falling_objects: Vec::new(),
            rocket_launched: false,
        }
    }

    /// Read-only views for rendering and UI layers
    pub fn grid(&self) -> &WorldGrid {
        &self.grid
    }

    pub fn buildings(&self) -> &BuildingRegistry {
        &self.buildings
    }

    pub fn ledger(&self) -> &ResourceLedger {
        &self.ledger
    }

    pub fn directives(&self) -> &DirectiveTracker {
        &self.directives
    }

    pub fn quota(&self) -> &Quota {
        &self.quota
    }

    pub fn materials(&self) -> &MaterialPool {
        &self.materials
    }

    /// Summed capacity of powered, complete housing
    pub fn housing_capacity(&self) -> u32 {
        self.buildings
            .iter()
            .filter(|b| b.is_operational() && b.powered)
            .map(|b| b.building_type.housing_capacity(b.tier))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_world_starts_in_winter() {
        let world = CityWorld::new(32, 32, SimulationConfig::default());
        assert_eq!(world.season, Season::Winter);
        assert_eq!(world.calendar.current_tick(), 0);
        assert_eq!(world.ledger.population, 0);
        assert!(!world.rocket_launched);
    }

    #[test]
    fn test_world_round_trips_through_json() {
        let world = CityWorld::new(16, 16, SimulationConfig::default());
        let json = serde_json::to_string(&world).unwrap();
        let restored: CityWorld = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.grid.width(), 16);
        assert_eq!(restored.directives.index(), world.directives.index());
    }
}
