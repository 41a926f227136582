//! Zone growth engine - spawns and upgrades buildings on serviced zones
//!
//! Runs only at month boundaries. Cells are visited in row-major order so
//! a given seed always produces the same city.

use crate::city::building::BuildingType;
use crate::city::registry::BuildingRegistry;
use crate::core::config::SimulationConfig;
use crate::core::types::GridPos;
use crate::grid::WorldGrid;
use rand::Rng;

/// What one growth pass changed
#[derive(Debug, Default)]
pub struct GrowthOutcome {
    pub spawned: Vec<(GridPos, BuildingType)>,
    pub upgraded: Vec<(GridPos, u8)>,
}

/// One monthly growth pass over every zoned cell
pub fn run_zone_growth<R: Rng>(
    grid: &mut WorldGrid,
    registry: &mut BuildingRegistry,
    config: &SimulationConfig,
    rng: &mut R,
) -> GrowthOutcome {
    let mut outcome = GrowthOutcome::default();

    // Powered aura buildings gate the tier 1 -> 2 upgrade
    let aura_positions = registry.positions_where(|b| {
        b.is_operational()
            && b.powered
            && (b.building_type.has_morale_aura() || b.building_type.has_order_aura())
    });

    let positions: Vec<GridPos> = grid.positions().collect();
    for pos in positions {
        let Some(cell) = grid.get(pos) else { continue };
        let Some(zone) = cell.zone else { continue };
        if !cell.watered {
            continue;
        }
        let pollution = cell.pollution;

        match cell.building {
            None => {
                if !rng.gen_bool(config.zone_spawn_chance) {
                    continue;
                }
                let industrial_alt = rng.gen_bool(0.5);
                let building_type = BuildingType::for_zone(zone, industrial_alt);
                if let Some(id) = registry.spawn(building_type, pos) {
                    if let Some(cell) = grid.get_mut(pos) {
                        cell.building = Some(id);
                    }
                    outcome.spawned.push((pos, building_type));
                }
            }
            Some(id) => {
                let Some(building) = registry.get(id) else { continue };
                if !building.is_operational()
                    || !building.powered
                    || building.tier >= building.building_type.max_tier()
                {
                    continue;
                }
                if !rng.gen_bool(config.tier_upgrade_chance) {
                    continue;
                }
                // Tier 2 additionally needs a nearby powered aura and
                // breathable air; failing a gate skips silently.
                if building.tier == 1 {
                    let near_aura = aura_positions
                        .iter()
                        .any(|a| a.distance(&pos) <= config.aura_radius);
                    if !near_aura || pollution >= config.upgrade_pollution_ceiling {
                        continue;
                    }
                }
                if let Some(building) = registry.get_mut(id) {
                    building.tier += 1;
                    outcome.upgraded.push((pos, building.tier));
                }
            }
        }
    }

    outcome
}
