//! Simulation configuration with documented constants
//!
//! All tuned numbers are collected here with explanations of their purpose
//! and how they interact. These values set the game's pacing; treat them
//! as data, not as derived quantities.

use crate::core::error::Result;
use serde::{Deserialize, Serialize};

/// Configuration for the simulation systems
///
/// Changing these values affects gameplay pacing and hazard frequency.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    // === CALENDAR ===
    /// Ticks in one simulated month
    ///
    /// Construction and zone growth step once per month; twelve months
    /// make a year. Smaller values make the whole economy run faster.
    pub ticks_per_month: u64,

    // === WATER NETWORK ===
    /// Euclidean radius of above-ground seepage around BFS-watered cells
    ///
    /// This is why an isolated pump without pipes still irrigates a small
    /// disc around itself.
    pub water_dilation_radius: f32,

    // === POLLUTION ===
    /// Fraction of a cell's pollution emitted to EACH of its 4 neighbours
    /// per tick
    pub pollution_spread_fraction: f32,

    /// Fraction of a cell's pollution retained under clear/dry weather
    ///
    /// Together with the spread fraction this must keep total mass
    /// non-increasing: decay + 4 * spread <= 1.
    pub pollution_decay_clear: f32,

    /// Fraction retained during precipitation (rain washes pollution out,
    /// so this is lower than the clear-weather value)
    pub pollution_decay_precipitation: f32,

    /// Constant pollution added to irradiated terrain every tick
    pub irradiated_pollution_floor: f32,

    // === ZONE GROWTH ===
    /// Chance per month that a serviced, empty zoned cell spawns a tier-0
    /// building
    pub zone_spawn_chance: f64,

    /// Chance per month that a serviced, occupied zoned cell attempts a
    /// tier upgrade
    pub tier_upgrade_chance: f64,

    /// Cell pollution above this blocks the tier 1 -> 2 upgrade
    pub upgrade_pollution_ceiling: f32,

    /// Radius of the morale/order aura required for tier 2
    pub aura_radius: f32,

    // === HAZARDS ===
    /// Chance per tick of a lightning strike while a storm is active
    pub lightning_chance: f64,

    /// Radius inside which a powered militia post pacifies strikes/riots
    pub pacify_radius: f32,

    /// Chance per tick that a falling object spawns (once the calendar
    /// gate is open)
    pub falling_object_chance: f64,

    /// First year in which falling objects may appear
    pub falling_object_min_year: u64,

    /// Ticks a falling object spends in flight before impact
    pub falling_object_travel_ticks: u32,

    /// Blast radius converted to crater/irradiated terrain on impact
    pub falling_object_radius: f32,

    /// Base per-building riot chance per tick, before deprivation scaling
    pub riot_base_chance: f64,

    /// Chance per month that fire jumps to an adjacent flammable building
    pub fire_spread_chance: f64,

    /// Fire intensity above which a burning building is destroyed
    pub fire_destroy_threshold: u8,

    /// Fire intensity above which a burning reactor melts down
    ///
    /// Kept below the destroy threshold so the meltdown fires before the
    /// reactor burns away on its own.
    pub meltdown_fire_threshold: u8,

    /// Radius irradiated and cleared by a reactor meltdown
    pub meltdown_radius: f32,

    // === CONSTRUCTION ===
    /// Extra scheduler ticks granted per month to sites inside a powered
    /// propaganda aura (capped at the remaining ticks)
    pub labor_bonus_ticks: u32,

    /// Construction slowdown applied during the early era
    pub early_era_construction_multiplier: f32,

    /// Years counted as the early era
    pub early_era_year_limit: u64,

    // === PRODUCTION ===
    /// Food produced per tick by a tier-0 farm (scales with tier + 1)
    pub farm_food_yield: f32,

    /// Vodka produced per tick by a tier-0 distillery (scales with tier + 1)
    pub distillery_vodka_yield: f32,

    /// A powered factory deposits materials every this many ticks
    pub factory_output_interval: u64,

    /// Launch progress gained per tick by a powered rocket site
    pub rocket_launch_rate: f32,

    // === POPULATION ===
    /// Food consumed per citizen per tick
    pub food_per_capita: f32,

    /// Vodka consumed per citizen per tick
    pub vodka_per_capita: f32,

    /// Chance per tick of losing one citizen while food is exhausted
    pub starvation_loss_chance: f64,

    /// Chance per tick of gaining one citizen when fed and housed
    pub population_growth_chance: f64,

    /// Food surplus required before the population grows
    pub growth_food_reserve: f32,

    // === ECONOMY ===
    /// Money collected per citizen at each year rollover
    pub tax_per_capita: i64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            ticks_per_month: 25,

            water_dilation_radius: 3.0,

            pollution_spread_fraction: 0.04,
            pollution_decay_clear: 0.8,
            pollution_decay_precipitation: 0.6,
            irradiated_pollution_floor: 0.5,

            zone_spawn_chance: 0.2,
            tier_upgrade_chance: 0.1,
            upgrade_pollution_ceiling: 30.0,
            aura_radius: 6.0,

            lightning_chance: 0.02,
            pacify_radius: 6.0,
            falling_object_chance: 0.002,
            falling_object_min_year: 3,
            falling_object_travel_ticks: 8,
            falling_object_radius: 2.0,
            riot_base_chance: 0.0005,
            fire_spread_chance: 0.3,
            fire_destroy_threshold: 3,
            meltdown_fire_threshold: 2,
            meltdown_radius: 4.0,

            labor_bonus_ticks: 1,
            early_era_construction_multiplier: 1.25,
            early_era_year_limit: 5,

            farm_food_yield: 0.3,
            distillery_vodka_yield: 0.15,
            factory_output_interval: 10,
            rocket_launch_rate: 0.002,

            food_per_capita: 0.02,
            vodka_per_capita: 0.008,
            starvation_loss_chance: 0.1,
            population_growth_chance: 0.05,
            growth_food_reserve: 5.0,

            tax_per_capita: 3,
        }
    }
}

impl SimulationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a config from TOML text; missing fields fall back to defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        use crate::core::error::SimError;

        if self.ticks_per_month == 0 {
            return Err(SimError::InvalidConfig(
                "ticks_per_month must be at least 1".into(),
            ));
        }

        // The tick loop takes `tick % factory_output_interval`
        if self.factory_output_interval == 0 {
            return Err(SimError::InvalidConfig(
                "factory_output_interval must be at least 1".into(),
            ));
        }

        // Diffusion must not create pollution mass
        let outflow = self.pollution_decay_clear + 4.0 * self.pollution_spread_fraction;
        if outflow > 1.0 {
            return Err(SimError::InvalidConfig(format!(
                "pollution_decay_clear + 4 * pollution_spread_fraction ({outflow}) must be <= 1"
            )));
        }

        if self.pollution_decay_precipitation > self.pollution_decay_clear {
            return Err(SimError::InvalidConfig(
                "precipitation must decay pollution at least as fast as clear weather".into(),
            ));
        }

        for (name, chance) in [
            ("zone_spawn_chance", self.zone_spawn_chance),
            ("tier_upgrade_chance", self.tier_upgrade_chance),
            ("lightning_chance", self.lightning_chance),
            ("falling_object_chance", self.falling_object_chance),
            ("riot_base_chance", self.riot_base_chance),
            ("fire_spread_chance", self.fire_spread_chance),
            ("starvation_loss_chance", self.starvation_loss_chance),
            ("population_growth_chance", self.population_growth_chance),
        ] {
            if !(0.0..=1.0).contains(&chance) {
                return Err(SimError::InvalidConfig(format!(
                    "{name} ({chance}) must be a probability in [0, 1]"
                )));
            }
        }

        if self.meltdown_fire_threshold > self.fire_destroy_threshold {
            return Err(SimError::InvalidConfig(
                "meltdown_fire_threshold must not exceed fire_destroy_threshold".into(),
            ));
        }

        if self.water_dilation_radius < 0.0 || self.aura_radius < 0.0 || self.pacify_radius < 0.0 {
            return Err(SimError::InvalidConfig("radii must be non-negative".into()));
        }

        Ok(())
    }
}
