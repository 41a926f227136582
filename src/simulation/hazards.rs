//! Ambient hazards: lightning, falling objects, riots, fire and meltdown
//!
//! Fire is the shared mechanic. `Cell::fire` is an intensity counter that
//! ticks up once per month while a building burns, spreads to adjacent
//! flammable buildings, and destroys the building once it passes the
//! configured threshold. Reactors melt down at a lower threshold.

use crate::city::building::BuildingType;
use crate::city::registry::BuildingRegistry;
use crate::city::ledger::ResourceLedger;
use crate::core::config::SimulationConfig;
use crate::core::calendar::Weather;
use crate::core::types::{BuildingId, GridPos};
use crate::grid::cell::Terrain;
use crate::grid::WorldGrid;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// An object inbound from the sky, resolved on arrival
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallingObject {
    pub target: GridPos,
    pub ticks_remaining: u32,
}

/// Hazard occurrences the orchestrator turns into notifications
#[derive(Debug, Clone, PartialEq)]
pub enum HazardEvent {
    LightningStrike { pos: GridPos },
    ForestCleared { pos: GridPos },
    ObjectSighted { target: GridPos },
    ObjectImpact { pos: GridPos },
    Riot { pos: GridPos },
}

/// What the monthly fire pass resolved
#[derive(Debug, Default)]
pub struct FireOutcome {
    pub destroyed: Vec<(BuildingId, GridPos)>,
    pub meltdowns: Vec<GridPos>,
    pub spread_to: Vec<GridPos>,
}

/// Set a cell's building alight, if there is one and it can burn
pub fn ignite(grid: &mut WorldGrid, registry: &BuildingRegistry, pos: GridPos) -> bool {
    let flammable = registry
        .at(pos)
        .map(|b| b.building_type.is_flammable())
        .unwrap_or(false);
    if !flammable {
        return false;
    }
    match grid.get_mut(pos) {
        Some(cell) if !cell.is_burning() => {
            cell.fire = 1;
            true
        }
        _ => false,
    }
}

/// True when a powered order-aura building stands within `radius`
pub fn pacified(registry: &BuildingRegistry, pos: GridPos, radius: f32) -> bool {
    registry.iter().any(|b| {
        b.building_type.has_order_aura()
            && b.is_operational()
            && b.powered
            && b.position.distance(&pos) <= radius
    })
}

/// Roll the per-tick ambient hazards
#[allow(clippy::too_many_arguments)]
pub fn run_ambient_hazards<R: Rng>(
    grid: &mut WorldGrid,
    registry: &mut BuildingRegistry,
    ledger: &ResourceLedger,
    falling_objects: &mut Vec<FallingObject>,
    weather: Weather,
    year: u64,
    config: &SimulationConfig,
    rng: &mut R,
) -> Vec<HazardEvent> {
    let mut events = Vec::new();

    // (a) lightning, only under storm skies
    if weather == Weather::Storm && rng.gen_bool(config.lightning_chance) {
        let pos = GridPos::new(rng.gen_range(0..grid.width()), rng.gen_range(0..grid.height()));
        let terrain = grid.get(pos).map(|c| c.terrain);
        if terrain == Some(Terrain::Forest) {
            grid.set_terrain(pos, Terrain::OpenLand);
            events.push(HazardEvent::ForestCleared { pos });
        } else if !pacified(registry, pos, config.pacify_radius)
            && ignite(grid, registry, pos)
        {
            events.push(HazardEvent::LightningStrike { pos });
        }
    }

    // (b) falling objects: spawn, then march every live one
    if year >= config.falling_object_min_year && rng.gen_bool(config.falling_object_chance) {
        let target =
            GridPos::new(rng.gen_range(0..grid.width()), rng.gen_range(0..grid.height()));
        falling_objects.push(FallingObject {
            target,
            ticks_remaining: config.falling_object_travel_ticks,
        });
        events.push(HazardEvent::ObjectSighted { target });
    }
    let mut impacts = Vec::new();
    falling_objects.retain_mut(|obj| {
        if obj.ticks_remaining > 0 {
            obj.ticks_remaining -= 1;
            true
        } else {
            impacts.push(obj.target);
            false
        }
    });
    for target in impacts {
        resolve_impact(grid, registry, target, config);
        events.push(HazardEvent::ObjectImpact { pos: target });
    }

    // (c) riots scale with hunger, thirst and smog
    let positions = registry.positions_where(|b| b.is_operational());
    for pos in positions {
        let pollution = grid.get(pos).map(|c| c.pollution).unwrap_or(0.0);
        let mut chance = config.riot_base_chance
            * (1.0
                + if ledger.starving { 2.0 } else { 0.0 }
                + if ledger.vodka_dry { 1.0 } else { 0.0 }
                + pollution as f64 / 50.0);
        chance = chance.clamp(0.0, 1.0);
        if rng.gen_bool(chance)
            && !pacified(registry, pos, config.pacify_radius)
            && ignite(grid, registry, pos)
        {
            events.push(HazardEvent::Riot { pos });
        }
    }

    events
}

/// Crater the impact point, irradiate the blast radius, torch the rim
fn resolve_impact(
    grid: &mut WorldGrid,
    registry: &mut BuildingRegistry,
    target: GridPos,
    config: &SimulationConfig,
) {
    let radius = config.falling_object_radius;
    for pos in grid.positions_within(target, radius) {
        if let Some(building) = registry.at(pos).map(|b| b.id) {
            registry.remove(building);
        }
        if let Some(cell) = grid.get_mut(pos) {
            cell.building = None;
            cell.zone = None;
            cell.pipe = false;
            cell.fire = 0;
            cell.terrain = if pos.distance(&target) <= 1.0 {
                Terrain::Crater
            } else {
                Terrain::Irradiated
            };
        }
    }
    let rim: Vec<GridPos> = grid
        .positions_within(target, radius + 1.5)
        .into_iter()
        .filter(|p| p.distance(&target) > radius)
        .collect();
    for pos in rim {
        ignite(grid, registry, pos);
    }
}

/// Monthly fire bookkeeping plus per-tick destruction checks
///
/// Intensity only climbs at month boundaries; destruction and meltdown
/// are checked every call so a loaded save resolves immediately.
pub fn advance_fires<R: Rng>(
    grid: &mut WorldGrid,
    registry: &mut BuildingRegistry,
    config: &SimulationConfig,
    rng: &mut R,
    month_boundary: bool,
) -> FireOutcome {
    let mut outcome = FireOutcome::default();

    let burning: Vec<GridPos> = registry.positions_where(|b| {
        grid.get(b.position).map(|c| c.is_burning()).unwrap_or(false)
    });

    if month_boundary {
        for pos in &burning {
            if let Some(cell) = grid.get_mut(*pos) {
                cell.fire = cell.fire.saturating_add(1);
            }
            let spread_targets: Vec<GridPos> = grid
                .neighbors4(*pos)
                .filter(|n| {
                    registry
                        .at(*n)
                        .map(|b| b.building_type.is_flammable())
                        .unwrap_or(false)
                })
                .collect();
            for next in spread_targets {
                if rng.gen_bool(config.fire_spread_chance) && ignite(grid, registry, next) {
                    outcome.spread_to.push(next);
                }
            }
        }
    }

    // Meltdown first: a reactor that melts down takes its radius with it
    // before the plain destruction rule would quietly remove it.
    let melting: Vec<GridPos> = registry.positions_where(|b| {
        b.building_type == BuildingType::Reactor
            && grid
                .get(b.position)
                .map(|c| c.fire > config.meltdown_fire_threshold)
                .unwrap_or(false)
    });
    for pos in melting {
        for cleared in grid.positions_within(pos, config.meltdown_radius) {
            if let Some(id) = registry.at(cleared).map(|b| b.id) {
                registry.remove(id);
            }
            if let Some(cell) = grid.get_mut(cleared) {
                cell.building = None;
                cell.zone = None;
                cell.fire = 0;
                cell.terrain = Terrain::Irradiated;
            }
        }
        outcome.meltdowns.push(pos);
    }

    let doomed: Vec<(BuildingId, GridPos)> = registry
        .iter()
        .filter(|b| {
            grid.get(b.position)
                .map(|c| c.fire > config.fire_destroy_threshold)
                .unwrap_or(false)
        })
        .map(|b| (b.id, b.position))
        .collect();
    for (id, pos) in doomed {
        registry.remove(id);
        if let Some(cell) = grid.get_mut(pos) {
            cell.building = None;
            cell.fire = 0;
        }
        outcome.destroyed.push((id, pos));
    }

    outcome
}
