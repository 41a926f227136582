//! Resource ledger and the power/water service pass
//!
//! Service is first-come-first-served by registration order: when supply
//! runs short, exactly the buildings scanned after supply is exhausted
//! lose power. This is a defined tie-break, not a fairness guarantee.

use crate::city::registry::BuildingRegistry;
use crate::grid::WorldGrid;
use serde::{Deserialize, Serialize};

/// City-wide scalar counters
///
/// Money may go negative transiently inside an external transaction but
/// the core itself only ever credits it. Population is clamped at zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceLedger {
    pub money: i64,
    pub food: f32,
    pub vodka: f32,
    pub population: u32,
    pub power_generated: f32,
    pub power_demanded: f32,
    pub water_generated: f32,
    pub water_demanded: f32,
    /// Set while food is exhausted; feeds the riot model
    pub starving: bool,
    /// Set while vodka is exhausted; feeds the riot model
    pub vodka_dry: bool,
}

impl ResourceLedger {
    pub fn new() -> Self {
        Self {
            money: 0,
            food: 0.0,
            vodka: 0.0,
            population: 0,
            power_generated: 0.0,
            power_demanded: 0.0,
            water_generated: 0.0,
            water_demanded: 0.0,
            starving: false,
            vodka_dry: false,
        }
    }
}

impl Default for ResourceLedger {
    fn default() -> Self {
        Self::new()
    }
}

/// Recompute production totals and every building's `powered` flag
///
/// First scan sums output from complete, non-burning generators and pumps.
/// Second scan walks the registry in registration order, accumulating
/// demand; a building goes unpowered the instant the running total exceeds
/// supply, or when it needs water and its cell is dry. Burning buildings
/// are forced unpowered.
pub fn rebuild_service_flags(
    registry: &mut BuildingRegistry,
    grid: &WorldGrid,
    ledger: &mut ResourceLedger,
) {
    let mut power_generated = 0.0f32;
    let mut water_generated = 0.0f32;
    for building in registry.iter() {
        if !building.is_operational() {
            continue;
        }
        let burning = grid
            .get(building.position)
            .map(|c| c.is_burning())
            .unwrap_or(false);
        if burning {
            continue;
        }
        power_generated += building.building_type.power_output();
        water_generated += building.building_type.water_output();
    }

    ledger.power_generated = power_generated;
    ledger.water_generated = water_generated;
    ledger.power_demanded = 0.0;
    ledger.water_demanded = 0.0;

    let mut running_power = 0.0f32;
    let mut running_water = 0.0f32;

    for building in registry.iter_mut() {
        if !building.is_operational() {
            building.powered = false;
            continue;
        }

        let cell = grid.get(building.position);
        let burning = cell.map(|c| c.is_burning()).unwrap_or(false);
        if burning {
            building.powered = false;
            continue;
        }

        let power_need = building.power_requirement();
        let water_need = building.water_requirement();
        running_power += power_need;
        running_water += water_need;
        ledger.power_demanded += power_need;
        ledger.water_demanded += water_need;

        let watered_ok =
            !building.building_type.needs_water() || cell.map(|c| c.watered).unwrap_or(false);

        building.powered =
            running_power <= power_generated && running_water <= water_generated && watered_ok;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::city::building::{BuildingType, ConstructionPhase};
    use crate::core::types::GridPos;

    fn complete_all(registry: &mut BuildingRegistry) {
        for b in registry.iter_mut() {
            b.phase = ConstructionPhase::Complete;
        }
    }

    fn water_all(grid: &mut WorldGrid) {
        for pos in grid.positions().collect::<Vec<_>>() {
            if let Some(c) = grid.get_mut(pos) {
                c.watered = true;
            }
        }
    }

    #[test]
    fn test_everyone_powered_when_supply_suffices() {
        let mut grid = WorldGrid::new(8, 8);
        water_all(&mut grid);
        let mut reg = BuildingRegistry::new();
        reg.spawn(BuildingType::CoalPlant, GridPos::new(0, 0)).unwrap();
        reg.spawn(BuildingType::Housing, GridPos::new(1, 0)).unwrap();
        reg.spawn(BuildingType::Factory, GridPos::new(2, 0)).unwrap();
        complete_all(&mut reg);

        let mut ledger = ResourceLedger::new();
        // No pump: factory and housing need water via the watered flag only
        rebuild_service_flags(&mut reg, &grid, &mut ledger);

        // Water demand exceeds zero pumped supply, so nothing with water
        // needs is powered
        assert!(reg.iter().all(|b| b.building_type.is_generator() || !b.powered));

        reg.spawn(BuildingType::WaterPump, GridPos::new(3, 0)).unwrap();
        complete_all(&mut reg);
        rebuild_service_flags(&mut reg, &grid, &mut ledger);
        assert!(reg.iter().all(|b| b.powered));
        assert!(ledger.power_generated >= ledger.power_demanded);
    }

    #[test]
    fn test_shortage_cuts_later_registrations_first() {
        let mut grid = WorldGrid::new(8, 8);
        water_all(&mut grid);
        let mut reg = BuildingRegistry::new();
        // Coal plant supplies 30; rocket sites need 10 each and no water
        reg.spawn(BuildingType::CoalPlant, GridPos::new(0, 0)).unwrap();
        let first = reg.spawn(BuildingType::RocketSite, GridPos::new(1, 0)).unwrap();
        let second = reg.spawn(BuildingType::RocketSite, GridPos::new(2, 0)).unwrap();
        let third = reg.spawn(BuildingType::RocketSite, GridPos::new(3, 0)).unwrap();
        let fourth = reg.spawn(BuildingType::RocketSite, GridPos::new(4, 0)).unwrap();
        complete_all(&mut reg);

        let mut ledger = ResourceLedger::new();
        rebuild_service_flags(&mut reg, &grid, &mut ledger);

        assert!(reg.get(first).unwrap().powered);
        assert!(reg.get(second).unwrap().powered);
        assert!(reg.get(third).unwrap().powered);
        assert!(!reg.get(fourth).unwrap().powered);
        assert!(ledger.power_demanded > ledger.power_generated);
    }

    #[test]
    fn test_burning_building_forced_unpowered_and_off_grid() {
        let mut grid = WorldGrid::new(8, 8);
        water_all(&mut grid);
        let mut reg = BuildingRegistry::new();
        let plant = reg.spawn(BuildingType::CoalPlant, GridPos::new(0, 0)).unwrap();
        let post = reg.spawn(BuildingType::MilitiaPost, GridPos::new(1, 0)).unwrap();
        complete_all(&mut reg);

        let mut ledger = ResourceLedger::new();
        rebuild_service_flags(&mut reg, &grid, &mut ledger);
        assert!(reg.get(post).unwrap().powered);

        // Set the plant on fire: its output disappears from the pool
        grid.get_mut(GridPos::new(0, 0)).unwrap().fire = 1;
        rebuild_service_flags(&mut reg, &grid, &mut ledger);
        assert_eq!(ledger.power_generated, 0.0);
        assert!(!reg.get(plant).unwrap().powered);
        assert!(!reg.get(post).unwrap().powered);
    }

    #[test]
    fn test_dry_cell_unpowers_water_user() {
        let mut grid = WorldGrid::new(8, 8);
        let mut reg = BuildingRegistry::new();
        reg.spawn(BuildingType::CoalPlant, GridPos::new(0, 0)).unwrap();
        reg.spawn(BuildingType::WaterPump, GridPos::new(1, 0)).unwrap();
        let house = reg.spawn(BuildingType::Housing, GridPos::new(2, 0)).unwrap();
        complete_all(&mut reg);

        let mut ledger = ResourceLedger::new();
        // Plenty of supply, but the housing cell is not watered
        rebuild_service_flags(&mut reg, &grid, &mut ledger);
        assert!(!reg.get(house).unwrap().powered);

        grid.get_mut(GridPos::new(2, 0)).unwrap().watered = true;
        rebuild_service_flags(&mut reg, &grid, &mut ledger);
        assert!(reg.get(house).unwrap().powered);
    }
}
