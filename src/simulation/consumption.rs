//! Food, vodka and population dynamics
//!
//! Runs last in the tick so it sees the day's production. Shortage flags
//! persist until the next tick with stock in hand; the riot model reads
//! them.

use crate::city::ledger::ResourceLedger;
use crate::core::config::SimulationConfig;
use rand::Rng;

/// What one consumption pass did to the population
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ConsumptionOutcome {
    pub deaths: u32,
    pub births: u32,
}

/// Draw per-capita food and vodka, then resolve losses and growth
///
/// `housing_capacity` is the summed capacity of powered housing; growth
/// stops hard at that ceiling.
pub fn apply_consumption<R: Rng>(
    ledger: &mut ResourceLedger,
    housing_capacity: u32,
    config: &SimulationConfig,
    rng: &mut R,
) -> ConsumptionOutcome {
    let mut outcome = ConsumptionOutcome::default();
    let population = ledger.population as f32;

    let food_draw = population * config.food_per_capita;
    if ledger.food >= food_draw {
        ledger.food -= food_draw;
        ledger.starving = false;
    } else {
        ledger.food = 0.0;
        ledger.starving = true;
        if ledger.population > 0 && rng.gen_bool(config.starvation_loss_chance) {
            ledger.population -= 1;
            outcome.deaths += 1;
        }
    }

    let vodka_draw = population * config.vodka_per_capita;
    if ledger.vodka >= vodka_draw {
        ledger.vodka -= vodka_draw;
        ledger.vodka_dry = false;
    } else {
        ledger.vodka = 0.0;
        ledger.vodka_dry = true;
    }

    let fed = !ledger.starving && ledger.food >= config.growth_food_reserve;
    if fed && ledger.population < housing_capacity && rng.gen_bool(config.population_growth_chance)
    {
        ledger.population += 1;
        outcome.births += 1;
    }

    outcome
}
