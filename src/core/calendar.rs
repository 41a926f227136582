//! Calendar system for month/year rollover tracking
//!
//! Months gate construction and zone growth; years gate tax collection,
//! season/weather transitions, and quota evaluation.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Season of the simulated year
///
/// Seasons advance at year rollover together with the weather redraw,
/// so a full seasonal cycle spans four simulated years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Autumn,
}

impl Season {
    pub fn next(&self) -> Season {
        match self {
            Season::Winter => Season::Spring,
            Season::Spring => Season::Summer,
            Season::Summer => Season::Autumn,
            Season::Autumn => Season::Winter,
        }
    }

    /// Construction slowdown for the season (>= 1.0 means slower)
    pub fn construction_multiplier(&self) -> f32 {
        match self {
            Season::Winter => 1.5,
            Season::Spring => 1.1,
            Season::Summer => 1.0,
            Season::Autumn => 1.2,
        }
    }
}

/// Current weather state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Weather {
    Clear,
    Overcast,
    Rain,
    Storm,
    Snow,
}

impl Weather {
    /// Precipitation accelerates pollution decay
    pub fn is_precipitation(&self) -> bool {
        matches!(self, Weather::Rain | Weather::Storm | Weather::Snow)
    }

    /// Construction slowdown for the weather (>= 1.0 means slower)
    pub fn construction_multiplier(&self) -> f32 {
        match self {
            Weather::Clear => 1.0,
            Weather::Overcast => 1.0,
            Weather::Rain => 1.15,
            Weather::Storm => 1.4,
            Weather::Snow => 1.3,
        }
    }

    /// Draw a weather state appropriate for the season
    pub fn sample_for_season<R: Rng>(season: Season, rng: &mut R) -> Weather {
        let roll: f32 = rng.gen();
        match season {
            Season::Winter => {
                if roll < 0.5 {
                    Weather::Snow
                } else if roll < 0.8 {
                    Weather::Overcast
                } else {
                    Weather::Clear
                }
            }
            Season::Spring => {
                if roll < 0.35 {
                    Weather::Rain
                } else if roll < 0.5 {
                    Weather::Storm
                } else {
                    Weather::Clear
                }
            }
            Season::Summer => {
                if roll < 0.15 {
                    Weather::Storm
                } else if roll < 0.25 {
                    Weather::Rain
                } else {
                    Weather::Clear
                }
            }
            Season::Autumn => {
                if roll < 0.45 {
                    Weather::Rain
                } else if roll < 0.7 {
                    Weather::Overcast
                } else {
                    Weather::Clear
                }
            }
        }
    }
}

/// Calendar tracks simulation time with month/year granularity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Calendar {
    tick: u64,
    ticks_per_month: u64,
    months_per_year: u64,
}

impl Calendar {
    pub fn new(ticks_per_month: u64) -> Self {
        Self {
            tick: 0,
            ticks_per_month,
            months_per_year: 12,
        }
    }

    pub fn advance(&mut self) {
        self.tick += 1;
    }

    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    pub fn current_month(&self) -> u64 {
        self.tick / self.ticks_per_month
    }

    pub fn current_year(&self) -> u64 {
        self.current_month() / self.months_per_year
    }

    /// True on the tick that crossed into a new month
    pub fn month_boundary(&self) -> bool {
        self.tick > 0 && self.tick % self.ticks_per_month == 0
    }

    /// True on the tick that crossed into a new year
    pub fn year_boundary(&self) -> bool {
        self.tick > 0 && self.tick % (self.ticks_per_month * self.months_per_year) == 0
    }

    pub fn ticks_per_month(&self) -> u64 {
        self.ticks_per_month
    }
}

impl Default for Calendar {
    fn default() -> Self {
        Self::new(25)
    }
}
