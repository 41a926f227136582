//! Player command surface
//!
//! These are collaborators of the tick, not part of it. Affordability is
//! validated by the caller before invoking them; here only structural
//! legality is checked. Every command either fully applies or returns
//! `false` without mutating anything.

use crate::city::building::BuildingType;
use crate::core::types::GridPos;
use crate::grid::cell::ZoneKind;
use crate::world::CityWorld;
use tracing::debug;

/// Open a construction site
///
/// Materials are not debited here: the scheduler draws them tick by tick
/// while the site is active. Affordability in money terms is the caller's
/// concern.
pub fn place_building(world: &mut CityWorld, pos: GridPos, building_type: BuildingType) -> bool {
    let buildable = world
        .grid
        .get(pos)
        .map(|c| c.terrain.is_buildable() && c.building.is_none())
        .unwrap_or(false);
    if !buildable {
        return false;
    }
    let Some(id) = world.buildings.spawn(building_type, pos) else {
        return false;
    };
    if let Some(cell) = world.grid.get_mut(pos) {
        cell.building = Some(id);
    }
    debug!(?building_type, ?pos, "building placed");
    true
}

/// Clear a cell: building first, then pipe, then zoning
pub fn bulldoze(world: &mut CityWorld, pos: GridPos) -> bool {
    if !world.grid.in_bounds(pos) {
        return false;
    }
    if let Some(id) = world.buildings.at(pos).map(|b| b.id) {
        world.buildings.remove(id);
        if let Some(cell) = world.grid.get_mut(pos) {
            cell.building = None;
            cell.fire = 0;
        }
        debug!(?pos, "building bulldozed");
        return true;
    }
    if let Some(cell) = world.grid.get_mut(pos) {
        if cell.pipe {
            cell.pipe = false;
            return true;
        }
        if cell.zone.is_some() {
            cell.zone = None;
            return true;
        }
    }
    false
}

/// Mark an empty, zonable cell for growth
pub fn designate_zone(world: &mut CityWorld, pos: GridPos, kind: ZoneKind) -> bool {
    match world.grid.get_mut(pos) {
        Some(cell) if cell.terrain.is_zonable() && cell.building.is_none() => {
            cell.zone = Some(kind);
            true
        }
        _ => false,
    }
}

/// Lay pipe under any land cell
pub fn lay_pipe(world: &mut CityWorld, pos: GridPos) -> bool {
    match world.grid.get_mut(pos) {
        Some(cell) if cell.terrain.is_buildable() || cell.terrain.is_zonable() => {
            if cell.pipe {
                return false;
            }
            cell.pipe = true;
            true
        }
        _ => false,
    }
}
