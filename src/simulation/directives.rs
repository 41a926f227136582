//! Directives and production quotas
//!
//! Directives are a scripted one-time goal ladder: a pure predicate per
//! entry, evaluated each tick, with a money reward on success. Quotas are
//! recurring targets judged only at year rollover.

use crate::city::building::BuildingType;
use crate::city::ledger::ResourceLedger;
use crate::city::registry::BuildingRegistry;
use crate::grid::WorldGrid;
use serde::{Deserialize, Serialize};

/// Success condition for a single directive
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DirectiveGoal {
    /// At least `count` complete, working buildings of `building_type`
    OperationalCount {
        building_type: BuildingType,
        count: usize,
    },
    PopulationAtLeast(u32),
    FoodReserve(f32),
    VodkaReserve(f32),
    /// Generation strictly exceeds demand
    PowerSurplus,
    RocketLaunched,
    /// Terminal entry; the ladder never advances past it
    Unattainable,
}

impl DirectiveGoal {
    pub fn is_met(
        &self,
        _grid: &WorldGrid,
        registry: &BuildingRegistry,
        ledger: &ResourceLedger,
        rocket_launched: bool,
    ) -> bool {
        match self {
            Self::OperationalCount {
                building_type,
                count,
            } => registry.count_of(*building_type) >= *count,
            Self::PopulationAtLeast(n) => ledger.population >= *n,
            Self::FoodReserve(n) => ledger.food >= *n,
            Self::VodkaReserve(n) => ledger.vodka >= *n,
            Self::PowerSurplus => ledger.power_generated > ledger.power_demanded,
            Self::RocketLaunched => rocket_launched,
            Self::Unattainable => false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Directive {
    pub title: String,
    pub goal: DirectiveGoal,
    pub reward: i64,
}

/// Ordered goal ladder with a monotonically increasing cursor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectiveTracker {
    directives: Vec<Directive>,
    index: usize,
}

impl DirectiveTracker {
    pub fn new(directives: Vec<Directive>) -> Self {
        Self {
            directives,
            index: 0,
        }
    }

    /// The default campaign ladder
    pub fn standard_plan() -> Self {
        let plan = vec![
            Directive {
                title: "Pump the marshes".into(),
                goal: DirectiveGoal::OperationalCount {
                    building_type: BuildingType::WaterPump,
                    count: 1,
                },
                reward: 150,
            },
            Directive {
                title: "Electrify the settlement".into(),
                goal: DirectiveGoal::OperationalCount {
                    building_type: BuildingType::CoalPlant,
                    count: 1,
                },
                reward: 250,
            },
            Directive {
                title: "House the workers".into(),
                goal: DirectiveGoal::PopulationAtLeast(20),
                reward: 300,
            },
            Directive {
                title: "Feed the workers".into(),
                goal: DirectiveGoal::FoodReserve(25.0),
                reward: 300,
            },
            Directive {
                title: "Comfort the workers".into(),
                goal: DirectiveGoal::VodkaReserve(10.0),
                reward: 350,
            },
            Directive {
                title: "Surplus for the grid".into(),
                goal: DirectiveGoal::PowerSurplus,
                reward: 400,
            },
            Directive {
                title: "A city of hundreds".into(),
                goal: DirectiveGoal::PopulationAtLeast(100),
                reward: 600,
            },
            Directive {
                title: "Reach the cosmos".into(),
                goal: DirectiveGoal::RocketLaunched,
                reward: 2000,
            },
            Directive {
                title: "Await further instructions".into(),
                goal: DirectiveGoal::Unattainable,
                reward: 0,
            },
        ];
        Self::new(plan)
    }

    pub fn current(&self) -> Option<&Directive> {
        self.directives.get(self.index)
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Move the cursor forward by exactly one
    pub fn advance(&mut self) {
        if self.index < self.directives.len() {
            self.index += 1;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuotaResource {
    Food,
    Vodka,
}

/// What a year-end quota review decided
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaVerdict {
    Met,
    Missed,
}

/// Recurring resource target judged at year rollover
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quota {
    pub resource: QuotaResource,
    pub target: f32,
    pub current: f32,
    pub deadline_year: u64,
}

impl Quota {
    pub fn new(resource: QuotaResource, target: f32, deadline_year: u64) -> Self {
        Self {
            resource,
            target,
            current: 0.0,
            deadline_year,
        }
    }

    /// Mirror the tracked stockpile; called every tick
    pub fn update_progress(&mut self, ledger: &ResourceLedger) {
        self.current = match self.resource {
            QuotaResource::Food => ledger.food,
            QuotaResource::Vodka => ledger.vodka,
        };
    }

    /// Year-rollover review. Success hardens the quota; failure extends
    /// the deadline by one year and carries the same target forward.
    pub fn evaluate(&mut self, year: u64) -> Option<QuotaVerdict> {
        if year < self.deadline_year {
            return None;
        }
        if self.current >= self.target {
            self.target *= 1.5;
            self.deadline_year = year + 3;
            Some(QuotaVerdict::Met)
        } else {
            self.deadline_year = year + 1;
            Some(QuotaVerdict::Missed)
        }
    }
}
