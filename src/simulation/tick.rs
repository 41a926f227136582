//! Tick orchestrator - the single entry point that sequences every
//! subsystem once per simulated interval
//!
//! Stage order is an invariant: later stages read flags (`watered`,
//! `powered`) that only earlier stages in the same tick may write.
//! Construction and zone growth run only when the tick crosses a month
//! boundary; tax, season and weather transitions and ice-road thaw run
//! only at year boundaries.

use crate::city::building::BuildingType;
use crate::city::construction::{advance_construction, BuildModifiers};
use crate::city::ledger::rebuild_service_flags;
use crate::city::materials::Material;
use crate::core::calendar::Weather;
use crate::core::types::GridPos;
use crate::grid::cell::Terrain;
use crate::grid::WorldGrid;
use crate::simulation::consumption::apply_consumption;
use crate::simulation::growth::run_zone_growth;
use crate::simulation::hazards::{advance_fires, run_ambient_hazards, HazardEvent};
use crate::simulation::pollution::{diffuse, inject_emissions};
use crate::simulation::water::resolve_water_network;
use crate::world::CityWorld;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

/// Notifications surfaced to the UI layer
///
/// Each variant carries enough data to render without re-deriving
/// simulation internals.
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationEvent {
    Toast {
        text: String,
    },
    Advisor {
        text: String,
        source: Option<String>,
    },
    FloatingText {
        text: String,
        pos: GridPos,
        color: [u8; 3],
    },
}

const GOLD: [u8; 3] = [220, 180, 60];
const RED: [u8; 3] = [200, 60, 40];

/// Run one simulation tick, mutating the world in place
pub fn run_simulation_tick(world: &mut CityWorld, rng: &mut ChaCha8Rng) -> Vec<SimulationEvent> {
    let mut events = Vec::new();

    world.calendar.advance();
    let month_boundary = world.calendar.month_boundary();
    let year_boundary = world.calendar.year_boundary();
    let year = world.calendar.current_year();

    // Directive ladder: at most one advance per tick
    if let Some(directive) = world.directives.current() {
        let met = directive.goal.is_met(
            &world.grid,
            &world.buildings,
            &world.ledger,
            world.rocket_launched,
        );
        if met {
            let title = directive.title.clone();
            let reward = directive.reward;
            world.ledger.money += reward;
            world.directives.advance();
            debug!(directive = %title, reward, "directive fulfilled");
            events.push(SimulationEvent::Advisor {
                text: format!("Directive fulfilled: {}. {} rubles granted.", title, reward),
                source: Some("The Ministry".into()),
            });
        }
    }

    for hazard in run_ambient_hazards(
        &mut world.grid,
        &mut world.buildings,
        &world.ledger,
        &mut world.falling_objects,
        world.weather,
        year,
        &world.config,
        rng,
    ) {
        events.push(hazard_notification(hazard));
    }

    if month_boundary {
        let era = if year < world.config.early_era_year_limit {
            world.config.early_era_construction_multiplier
        } else {
            1.0
        };
        let modifiers = BuildModifiers::new(
            era,
            world.weather.construction_multiplier(),
            world.season.construction_multiplier(),
        );
        let morale_auras = world.buildings.positions_where(|b| {
            b.building_type.has_morale_aura() && b.is_operational() && b.powered
        });
        let outcome = advance_construction(
            &mut world.buildings,
            &mut world.materials,
            &modifiers,
            &morale_auras,
            world.config.aura_radius,
            world.config.labor_bonus_ticks,
        );
        for id in &outcome.completed {
            if let Some(b) = world.buildings.get(*id) {
                debug!(building = ?b.building_type, pos = ?b.position, "construction complete");
                events.push(SimulationEvent::FloatingText {
                    text: "Complete".into(),
                    pos: b.position,
                    color: GOLD,
                });
            }
        }
        if outcome.paused > 0 {
            events.push(SimulationEvent::Advisor {
                text: format!("{} construction sites idle: materials exhausted.", outcome.paused),
                source: Some("Chief Engineer".into()),
            });
        }

        let growth = run_zone_growth(&mut world.grid, &mut world.buildings, &world.config, rng);
        for (pos, building_type) in &growth.spawned {
            debug!(building = ?building_type, pos = ?pos, "zone spawned building");
        }
    }

    if year_boundary {
        events.extend(run_year_rollover(world, rng));
    }

    resolve_water_network(
        &mut world.grid,
        &world.buildings,
        world.config.water_dilation_radius,
    );
    rebuild_service_flags(&mut world.buildings, &world.grid, &mut world.ledger);

    let mut pollution_buffer = diffuse(&world.grid, world.weather, &world.config);

    events.extend(run_operational_effects(world, &mut pollution_buffer, rng));

    world.grid.apply_pollution(&pollution_buffer);

    let housing_capacity = world.housing_capacity();
    apply_consumption(&mut world.ledger, housing_capacity, &world.config, rng);

    world.quota.update_progress(&world.ledger);
    if year_boundary {
        use crate::simulation::directives::QuotaVerdict;
        match world.quota.evaluate(year) {
            Some(QuotaVerdict::Met) => events.push(SimulationEvent::Advisor {
                text: "Quota fulfilled. The plan hardens.".into(),
                source: Some("The Ministry".into()),
            }),
            Some(QuotaVerdict::Missed) => events.push(SimulationEvent::Advisor {
                text: "Quota missed. The deadline is extended; do not disappoint again.".into(),
                source: Some("The Ministry".into()),
            }),
            None => {}
        }
    }

    events
}

fn hazard_notification(hazard: HazardEvent) -> SimulationEvent {
    match hazard {
        HazardEvent::LightningStrike { pos } => SimulationEvent::FloatingText {
            text: "Lightning strike!".into(),
            pos,
            color: RED,
        },
        HazardEvent::ForestCleared { pos } => SimulationEvent::FloatingText {
            text: "Forest burned clear".into(),
            pos,
            color: RED,
        },
        HazardEvent::ObjectSighted { target } => SimulationEvent::Advisor {
            text: format!("Object sighted on trajectory for ({}, {}).", target.x, target.y),
            source: Some("Air Defense".into()),
        },
        HazardEvent::ObjectImpact { pos } => SimulationEvent::Toast {
            text: format!("Impact at ({}, {}). The ground is poisoned.", pos.x, pos.y),
        },
        HazardEvent::Riot { pos } => SimulationEvent::FloatingText {
            text: "Riot!".into(),
            pos,
            color: RED,
        },
    }
}

/// Production, rocket progress, emissions and fire resolution
fn run_operational_effects(
    world: &mut CityWorld,
    pollution_buffer: &mut [f32],
    rng: &mut ChaCha8Rng,
) -> Vec<SimulationEvent> {
    let mut events = Vec::new();
    let tick = world.calendar.current_tick();
    let factory_tick = tick % world.config.factory_output_interval == 0;

    let mut food = 0.0f32;
    let mut vodka = 0.0f32;
    let mut factory_batches = 0u32;
    let mut launched_at: Option<GridPos> = None;

    for building in world.buildings.iter_mut() {
        if !building.is_operational() || !building.powered {
            continue;
        }
        let scale = (building.tier + 1) as f32;
        match building.building_type {
            BuildingType::Farm => food += world.config.farm_food_yield * scale,
            BuildingType::Distillery => vodka += world.config.distillery_vodka_yield * scale,
            BuildingType::Factory => {
                if factory_tick {
                    factory_batches += building.tier as u32 + 1;
                }
            }
            BuildingType::RocketSite => {
                if let Some(progress) = building.launch_progress.as_mut() {
                    if !world.rocket_launched && *progress < 1.0 {
                        *progress += world.config.rocket_launch_rate;
                        if *progress >= 1.0 {
                            launched_at = Some(building.position);
                        }
                    }
                }
            }
            _ => {}
        }
    }

    world.ledger.food += food;
    world.ledger.vodka += vodka;
    if factory_batches > 0 {
        // Factories feed the construction stockpile
        world.materials.add(Material::Timber, 2 * factory_batches);
        world.materials.add(Material::Steel, factory_batches);
        world.materials.add(Material::Cement, factory_batches);
    }
    if let Some(pos) = launched_at {
        world.rocket_launched = true;
        debug!(?pos, "rocket launched");
        events.push(SimulationEvent::Toast {
            text: "The rocket has launched. The cosmos is ours.".into(),
        });
        events.push(SimulationEvent::FloatingText {
            text: "Liftoff!".into(),
            pos,
            color: GOLD,
        });
    }

    inject_emissions(pollution_buffer, &world.grid, &world.buildings);

    let month_boundary = world.calendar.month_boundary();
    let fires = advance_fires(
        &mut world.grid,
        &mut world.buildings,
        &world.config,
        rng,
        month_boundary,
    );
    for pos in &fires.meltdowns {
        debug!(?pos, "reactor meltdown");
        events.push(SimulationEvent::Toast {
            text: "Reactor meltdown. The zone is lost.".into(),
        });
    }
    for (_, pos) in &fires.destroyed {
        events.push(SimulationEvent::FloatingText {
            text: "Burned down".into(),
            pos: *pos,
            color: RED,
        });
    }

    events
}

/// Tax, season and weather transition, ice-road thaw
fn run_year_rollover(world: &mut CityWorld, rng: &mut ChaCha8Rng) -> Vec<SimulationEvent> {
    let mut events = Vec::new();

    let tax = world.ledger.population as i64 * world.config.tax_per_capita;
    if tax > 0 {
        world.ledger.money += tax;
        events.push(SimulationEvent::Toast {
            text: format!("Annual levy collected: {} rubles.", tax),
        });
    }

    world.season = world.season.next();
    world.weather = Weather::sample_for_season(world.season, rng);
    debug!(season = ?world.season, weather = ?world.weather, "year rollover");

    events.extend(thaw_ice_roads(&mut world.grid, &mut world.buildings));

    events
}

/// Paths laid over open water without a bridge melt away each spring-side
/// rollover, taking their pipes and buildings with them
fn thaw_ice_roads(
    grid: &mut WorldGrid,
    registry: &mut crate::city::registry::BuildingRegistry,
) -> Vec<SimulationEvent> {
    let mut events = Vec::new();
    let thawing: Vec<GridPos> = grid
        .positions()
        .filter(|pos| {
            let Some(cell) = grid.get(*pos) else {
                return false;
            };
            if cell.terrain != Terrain::Path || cell.bridge {
                return false;
            }
            let water_neighbors = grid
                .neighbors4(*pos)
                .filter(|n| {
                    grid.get(*n)
                        .map(|c| c.terrain == Terrain::Water)
                        .unwrap_or(false)
                })
                .count();
            water_neighbors >= 2
        })
        .collect();

    for pos in thawing {
        if let Some(id) = registry.at(pos).map(|b| b.id) {
            registry.remove(id);
        }
        if let Some(cell) = grid.get_mut(pos) {
            cell.terrain = Terrain::Water;
            cell.pipe = false;
            cell.building = None;
            cell.zone = None;
        }
        events.push(SimulationEvent::FloatingText {
            text: "Ice road thawed".into(),
            pos,
            color: RED,
        });
    }
    events
}
