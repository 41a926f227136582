//! Pollution diffusion cellular automaton
//!
//! One synchronous pass per tick: the old grid is read, a fresh buffer is
//! written, and the orchestrator swaps the buffer in after per-building
//! emissions are injected. Values are never negative and never clamped
//! from above.

use crate::city::registry::BuildingRegistry;
use crate::core::config::SimulationConfig;
use crate::core::calendar::Weather;
use crate::grid::cell::Terrain;
use crate::grid::WorldGrid;

/// Compute the next pollution field without touching the grid
///
/// Each cell emits `p * spread` to each 4-neighbour and retains
/// `p * decay`; precipitation decays harder. Irradiated terrain adds a
/// constant floor each tick. Emission to off-grid neighbours is lost.
pub fn diffuse(grid: &WorldGrid, weather: Weather, config: &SimulationConfig) -> Vec<f32> {
    let old = grid.pollution_levels();
    let decay = if weather.is_precipitation() {
        config.pollution_decay_precipitation
    } else {
        config.pollution_decay_clear
    };
    let spread = config.pollution_spread_fraction;
    let width = grid.width();

    let mut buffer = vec![0.0f32; old.len()];
    for (i, pos) in grid.positions().enumerate() {
        let p = old[i];
        buffer[i] += p * decay;
        if p > 0.0 {
            for n in grid.neighbors4(pos) {
                let j = (n.y * width + n.x) as usize;
                buffer[j] += p * spread;
            }
        }
        let irradiated = grid
            .get(pos)
            .map(|c| c.terrain == Terrain::Irradiated)
            .unwrap_or(false);
        if irradiated {
            buffer[i] += config.irradiated_pollution_floor;
        }
    }
    buffer
}

/// Inject per-building emissions into the freshly diffused buffer
///
/// Only complete, powered, non-burning buildings emit: an idle plant
/// produces nothing and smokes nothing.
pub fn inject_emissions(buffer: &mut [f32], grid: &WorldGrid, registry: &BuildingRegistry) {
    let width = grid.width();
    for building in registry.iter() {
        if !building.is_operational() || !building.powered {
            continue;
        }
        let emission = building.building_type.pollution_emission();
        if emission <= 0.0 {
            continue;
        }
        let burning = grid
            .get(building.position)
            .map(|c| c.is_burning())
            .unwrap_or(true);
        if burning {
            continue;
        }
        let idx = (building.position.y * width + building.position.x) as usize;
        if idx < buffer.len() {
            buffer[idx] += emission;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::GridPos;
    use proptest::prelude::*;

    fn cfg() -> SimulationConfig {
        SimulationConfig::default()
    }

    fn mass(buffer: &[f32]) -> f32 {
        buffer.iter().sum()
    }

    #[test]
    fn test_diffusion_spreads_to_neighbors() {
        let mut grid = WorldGrid::new(5, 5);
        grid.get_mut(GridPos::new(2, 2)).unwrap().pollution = 100.0;

        let buffer = diffuse(&grid, Weather::Clear, &cfg());
        grid.apply_pollution(&buffer);

        let center = grid.get(GridPos::new(2, 2)).unwrap().pollution;
        let north = grid.get(GridPos::new(2, 1)).unwrap().pollution;
        assert!((center - 80.0).abs() < 0.001);
        assert!((north - 4.0).abs() < 0.001);
        // Diagonals receive nothing in a single pass
        assert_eq!(grid.get(GridPos::new(1, 1)).unwrap().pollution, 0.0);
    }

    #[test]
    fn test_precipitation_decays_harder() {
        let mut grid = WorldGrid::new(5, 5);
        grid.get_mut(GridPos::new(2, 2)).unwrap().pollution = 100.0;

        let dry = diffuse(&grid, Weather::Clear, &cfg());
        let wet = diffuse(&grid, Weather::Rain, &cfg());
        assert!(mass(&wet) < mass(&dry));
    }

    #[test]
    fn test_irradiated_floor_accumulates() {
        let mut grid = WorldGrid::new(3, 3);
        grid.set_terrain(GridPos::new(1, 1), Terrain::Irradiated);

        for _ in 0..10 {
            let buffer = diffuse(&grid, Weather::Clear, &cfg());
            grid.apply_pollution(&buffer);
        }
        assert!(grid.get(GridPos::new(1, 1)).unwrap().pollution > 0.0);
    }

    #[test]
    fn test_edge_emission_is_lost_not_wrapped() {
        let mut grid = WorldGrid::new(3, 3);
        grid.get_mut(GridPos::new(0, 0)).unwrap().pollution = 100.0;

        let buffer = diffuse(&grid, Weather::Clear, &cfg());
        // Corner has two neighbours; two shares of spread leave the grid
        let expected = 100.0 * (cfg().pollution_decay_clear + 2.0 * cfg().pollution_spread_fraction);
        assert!((mass(&buffer) - expected).abs() < 0.01);
    }

    #[test]
    fn test_only_powered_emitters_smoke() {
        use crate::city::building::{BuildingType, ConstructionPhase};

        let grid = WorldGrid::new(5, 5);
        let mut reg = crate::city::registry::BuildingRegistry::new();
        let pos = GridPos::new(2, 2);
        let id = reg.spawn(BuildingType::CoalPlant, pos).unwrap();
        reg.get_mut(id).unwrap().phase = ConstructionPhase::Complete;

        // Idle (unpowered) plant emits nothing
        let mut buffer = vec![0.0f32; grid.cell_count()];
        inject_emissions(&mut buffer, &grid, &reg);
        assert!(buffer.iter().all(|&p| p == 0.0));

        reg.get_mut(id).unwrap().powered = true;
        inject_emissions(&mut buffer, &grid, &reg);
        let idx = (pos.y * grid.width() + pos.x) as usize;
        assert!((buffer[idx] - BuildingType::CoalPlant.pollution_emission()).abs() < 0.001);
    }

    proptest! {
        /// Total mass is non-increasing away from emitters and the
        /// irradiated floor, and values never go negative.
        #[test]
        fn prop_mass_non_increasing(levels in proptest::collection::vec(0.0f32..50.0, 16)) {
            let mut grid = WorldGrid::new(4, 4);
            grid.apply_pollution(&levels);
            let before = mass(&grid.pollution_levels());

            for _ in 0..5 {
                let buffer = diffuse(&grid, Weather::Clear, &cfg());
                let after = mass(&buffer);
                prop_assert!(after <= before + 0.01);
                prop_assert!(buffer.iter().all(|&p| p >= 0.0));
                grid.apply_pollution(&buffer);
            }
        }
    }
}
