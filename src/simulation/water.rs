//! Water network resolver
//!
//! Recomputes every cell's `watered` flag from scratch each tick: a BFS
//! through pipe cells seeded at working pumps, followed by a dilation pass
//! that models above-ground seepage around the reached network. No
//! incremental state survives between calls.

use crate::city::registry::BuildingRegistry;
use crate::core::types::GridPos;
use crate::grid::WorldGrid;
use ahash::AHashSet;
use std::collections::VecDeque;

/// Recompute water service for the whole grid
pub fn resolve_water_network(
    grid: &mut WorldGrid,
    registry: &BuildingRegistry,
    dilation_radius: f32,
) {
    let positions: Vec<GridPos> = grid.positions().collect();
    for pos in &positions {
        if let Some(cell) = grid.get_mut(*pos) {
            cell.watered = false;
        }
    }

    // Seed at every complete pump that is not on fire
    let mut queue: VecDeque<GridPos> = VecDeque::new();
    let mut visited: AHashSet<GridPos> = AHashSet::new();
    for building in registry.iter() {
        if !building.building_type.is_pump() || !building.is_operational() {
            continue;
        }
        let burning = grid
            .get(building.position)
            .map(|c| c.is_burning())
            .unwrap_or(true);
        if burning {
            continue;
        }
        if visited.insert(building.position) {
            queue.push_back(building.position);
        }
    }

    // Frontier expands only through piped cells
    let mut reached: Vec<GridPos> = Vec::new();
    while let Some(pos) = queue.pop_front() {
        reached.push(pos);
        let neighbors: Vec<GridPos> = grid.neighbors4(pos).collect();
        for next in neighbors {
            if visited.contains(&next) {
                continue;
            }
            let piped = grid.get(next).map(|c| c.pipe).unwrap_or(false);
            if piped {
                visited.insert(next);
                queue.push_back(next);
            }
        }
    }

    // Dilation: each reached cell services a small disc around itself
    for pos in reached {
        for serviced in grid.positions_within(pos, dilation_radius) {
            if let Some(cell) = grid.get_mut(serviced) {
                cell.watered = true;
            }
        }
    }
}
