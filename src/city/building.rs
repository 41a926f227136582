//! Building types and their static data tables

use crate::core::types::{BuildingId, GridPos};
use crate::grid::cell::ZoneKind;
use crate::city::materials::MaterialCost;
use serde::{Deserialize, Serialize};

/// Closed set of building kinds
///
/// Save files and scenario scripts address buildings by string tag;
/// `from_tag` keeps that surface for external callers while the enum
/// rules out silent unknown-id holes internally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildingType {
    Housing,
    Farm,
    Factory,
    Distillery,
    CoalPlant,
    Reactor,
    WaterPump,
    PropagandaCenter,
    MilitiaPost,
    RocketSite,
}

impl BuildingType {
    /// Fallible lookup from an external string tag
    pub fn from_tag(tag: &str) -> Option<BuildingType> {
        match tag {
            "housing" => Some(BuildingType::Housing),
            "farm" => Some(BuildingType::Farm),
            "factory" => Some(BuildingType::Factory),
            "distillery" => Some(BuildingType::Distillery),
            "coal_plant" => Some(BuildingType::CoalPlant),
            "reactor" => Some(BuildingType::Reactor),
            "water_pump" => Some(BuildingType::WaterPump),
            "propaganda_center" => Some(BuildingType::PropagandaCenter),
            "militia_post" => Some(BuildingType::MilitiaPost),
            "rocket_site" => Some(BuildingType::RocketSite),
            _ => None,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            BuildingType::Housing => "housing",
            BuildingType::Farm => "farm",
            BuildingType::Factory => "factory",
            BuildingType::Distillery => "distillery",
            BuildingType::CoalPlant => "coal_plant",
            BuildingType::Reactor => "reactor",
            BuildingType::WaterPump => "water_pump",
            BuildingType::PropagandaCenter => "propaganda_center",
            BuildingType::MilitiaPost => "militia_post",
            BuildingType::RocketSite => "rocket_site",
        }
    }

    /// Base scheduler ticks to construct; 0 means instantly complete
    pub fn base_build_ticks(&self) -> u32 {
        match self {
            BuildingType::Housing => 10,
            BuildingType::Farm => 8,
            BuildingType::Factory => 15,
            BuildingType::Distillery => 12,
            BuildingType::CoalPlant => 20,
            BuildingType::Reactor => 40,
            BuildingType::WaterPump => 6,
            BuildingType::PropagandaCenter => 10,
            BuildingType::MilitiaPost => 0,
            BuildingType::RocketSite => 60,
        }
    }

    pub fn is_instant(&self) -> bool {
        self.base_build_ticks() == 0
    }

    /// Materials drawn from the shared pool over the whole construction
    pub fn material_cost(&self) -> MaterialCost {
        match self {
            BuildingType::Housing => MaterialCost::new(20, 0, 10, 0),
            BuildingType::Farm => MaterialCost::new(15, 0, 0, 0),
            BuildingType::Factory => MaterialCost::new(10, 20, 10, 0),
            BuildingType::Distillery => MaterialCost::new(15, 10, 0, 0),
            BuildingType::CoalPlant => MaterialCost::new(0, 25, 20, 0),
            BuildingType::Reactor => MaterialCost::new(0, 60, 50, 20),
            BuildingType::WaterPump => MaterialCost::new(0, 10, 5, 0),
            BuildingType::PropagandaCenter => MaterialCost::new(10, 0, 10, 5),
            BuildingType::MilitiaPost => MaterialCost::new(10, 5, 0, 0),
            BuildingType::RocketSite => MaterialCost::new(0, 80, 60, 40),
        }
    }

    /// Power generated when complete and not burning
    pub fn power_output(&self) -> f32 {
        match self {
            BuildingType::CoalPlant => 30.0,
            BuildingType::Reactor => 120.0,
            _ => 0.0,
        }
    }

    /// Water pumped into the network when complete and not burning
    pub fn water_output(&self) -> f32 {
        match self {
            BuildingType::WaterPump => 40.0,
            _ => 0.0,
        }
    }

    /// Power required at tier 0; demand scales with tier + 1
    pub fn power_demand(&self) -> f32 {
        match self {
            BuildingType::Housing => 1.0,
            BuildingType::Farm => 0.5,
            BuildingType::Factory => 4.0,
            BuildingType::Distillery => 2.0,
            BuildingType::WaterPump => 1.0,
            BuildingType::PropagandaCenter => 1.0,
            BuildingType::MilitiaPost => 1.0,
            BuildingType::RocketSite => 10.0,
            BuildingType::CoalPlant | BuildingType::Reactor => 0.0,
        }
    }

    /// Water required at tier 0; demand scales with tier + 1
    pub fn water_demand(&self) -> f32 {
        match self {
            BuildingType::Housing => 1.0,
            BuildingType::Farm => 2.0,
            BuildingType::Factory => 1.5,
            BuildingType::Distillery => 2.5,
            _ => 0.0,
        }
    }

    /// Whether this building must sit on a watered cell to be powered
    pub fn needs_water(&self) -> bool {
        self.water_demand() > 0.0
    }

    /// Pollution injected at the building's own cell per tick
    pub fn pollution_emission(&self) -> f32 {
        match self {
            BuildingType::Factory => 1.2,
            BuildingType::Distillery => 0.6,
            BuildingType::CoalPlant => 2.5,
            BuildingType::Reactor => 0.2,
            _ => 0.0,
        }
    }

    pub fn is_flammable(&self) -> bool {
        // Rocket sites are concrete pads; everything else burns
        !matches!(self, BuildingType::RocketSite)
    }

    pub fn is_generator(&self) -> bool {
        self.power_output() > 0.0
    }

    pub fn is_pump(&self) -> bool {
        self.water_output() > 0.0
    }

    /// Morale aura that unlocks tier 2 and speeds nearby construction
    pub fn has_morale_aura(&self) -> bool {
        matches!(self, BuildingType::PropagandaCenter)
    }

    /// Order aura that pacifies strikes and riots
    pub fn has_order_aura(&self) -> bool {
        matches!(self, BuildingType::MilitiaPost)
    }

    pub fn max_tier(&self) -> u8 {
        match self {
            BuildingType::Housing
            | BuildingType::Farm
            | BuildingType::Factory
            | BuildingType::Distillery => 2,
            _ => 0,
        }
    }

    /// Citizens housed at the given tier
    pub fn housing_capacity(&self, tier: u8) -> u32 {
        match self {
            BuildingType::Housing => match tier {
                0 => 5,
                1 => 12,
                _ => 30,
            },
            _ => 0,
        }
    }

    /// Tier-0 building grown on a zoned cell of the given kind
    ///
    /// Industrial zones split between two sub-types; the caller picks one.
    pub fn for_zone(zone: ZoneKind, industrial_alt: bool) -> BuildingType {
        match zone {
            ZoneKind::Residential => BuildingType::Housing,
            ZoneKind::Agricultural => BuildingType::Farm,
            ZoneKind::Industrial => {
                if industrial_alt {
                    BuildingType::Distillery
                } else {
                    BuildingType::Factory
                }
            }
        }
    }
}

/// Construction lifecycle; `Complete` is terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConstructionPhase {
    Foundation,
    Building,
    Complete,
}

/// A placed building instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Building {
    pub id: BuildingId,
    pub position: GridPos,
    pub building_type: BuildingType,
    /// Upgrade tier, 0..=max_tier for the type
    pub tier: u8,
    /// Derived each tick from production/demand and water service
    pub powered: bool,
    pub phase: ConstructionPhase,
    /// Scheduler ticks of construction work done so far
    pub ticks_done: u32,
    /// One-shot launch progress for culmination buildings
    pub launch_progress: Option<f32>,
}

impl Building {
    pub fn new(id: BuildingId, building_type: BuildingType, position: GridPos) -> Self {
        let phase = if building_type.is_instant() {
            ConstructionPhase::Complete
        } else {
            ConstructionPhase::Foundation
        };
        let launch_progress = matches!(building_type, BuildingType::RocketSite).then_some(0.0);
        Self {
            id,
            position,
            building_type,
            tier: 0,
            powered: false,
            phase,
            ticks_done: 0,
            launch_progress,
        }
    }

    /// Complete and eligible for operational processing
    pub fn is_operational(&self) -> bool {
        self.phase == ConstructionPhase::Complete
    }

    /// Power requirement at the current tier
    pub fn power_requirement(&self) -> f32 {
        self.building_type.power_demand() * (self.tier as f32 + 1.0)
    }

    /// Water requirement at the current tier
    pub fn water_requirement(&self) -> f32 {
        self.building_type.water_demand() * (self.tier as f32 + 1.0)
    }
}
