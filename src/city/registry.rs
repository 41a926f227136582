//! Building registry - every placed building instance, in registration order
//!
//! Iteration order is the documented tie-break for resource gating: when
//! supply runs short, buildings registered earlier keep their service.

use crate::city::building::{Building, BuildingType};
use crate::core::types::{BuildingId, GridPos};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "RegistrySnapshot")]
pub struct BuildingRegistry {
    buildings: Vec<Building>,
    /// Derived index; rebuilt from `buildings` on deserialize (JSON maps
    /// cannot have struct keys)
    #[serde(skip)]
    by_position: AHashMap<GridPos, BuildingId>,
    /// Next id to hand out; sequential so seeded runs reproduce exactly
    next_id: u64,
}

/// Serialized shape of the registry: just the authoritative fields
#[derive(Deserialize)]
struct RegistrySnapshot {
    buildings: Vec<Building>,
    next_id: u64,
}

impl From<RegistrySnapshot> for BuildingRegistry {
    fn from(snapshot: RegistrySnapshot) -> Self {
        let by_position = snapshot
            .buildings
            .iter()
            .map(|b| (b.position, b.id))
            .collect();
        Self {
            buildings: snapshot.buildings,
            by_position,
            next_id: snapshot.next_id,
        }
    }
}

impl BuildingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.buildings.len()
    }

    /// Register a new building; fails (None) if the cell is already taken
    pub fn spawn(&mut self, building_type: BuildingType, position: GridPos) -> Option<BuildingId> {
        if self.by_position.contains_key(&position) {
            return None;
        }
        let id = BuildingId(self.next_id);
        self.next_id += 1;
        self.buildings.push(Building::new(id, building_type, position));
        self.by_position.insert(position, id);
        Some(id)
    }

    pub fn get(&self, id: BuildingId) -> Option<&Building> {
        self.buildings.iter().find(|b| b.id == id)
    }

    pub fn get_mut(&mut self, id: BuildingId) -> Option<&mut Building> {
        self.buildings.iter_mut().find(|b| b.id == id)
    }

    pub fn at(&self, position: GridPos) -> Option<&Building> {
        self.by_position.get(&position).and_then(|&id| self.get(id))
    }

    pub fn at_mut(&mut self, position: GridPos) -> Option<&mut Building> {
        let id = *self.by_position.get(&position)?;
        self.get_mut(id)
    }

    /// Remove a building, preserving the registration order of the rest
    pub fn remove(&mut self, id: BuildingId) -> Option<Building> {
        let idx = self.buildings.iter().position(|b| b.id == id)?;
        let building = self.buildings.remove(idx);
        self.by_position.remove(&building.position);
        Some(building)
    }

    /// Registration-order iteration
    pub fn iter(&self) -> impl Iterator<Item = &Building> {
        self.buildings.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Building> {
        self.buildings.iter_mut()
    }

    /// Ids in registration order (for passes that mutate while scanning)
    pub fn ids(&self) -> Vec<BuildingId> {
        self.buildings.iter().map(|b| b.id).collect()
    }

    /// Positions of operational buildings matching a predicate
    pub fn positions_where(&self, pred: impl Fn(&Building) -> bool) -> Vec<GridPos> {
        self.buildings
            .iter()
            .filter(|b| pred(b))
            .map(|b| b.position)
            .collect()
    }

    /// Count operational buildings of a type
    pub fn count_of(&self, building_type: BuildingType) -> usize {
        self.buildings
            .iter()
            .filter(|b| b.building_type == building_type && b.is_operational())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_rejects_occupied_cell() {
        let mut reg = BuildingRegistry::new();
        let pos = GridPos::new(3, 3);
        assert!(reg.spawn(BuildingType::Farm, pos).is_some());
        assert!(reg.spawn(BuildingType::Housing, pos).is_none());
        assert_eq!(reg.count(), 1);
    }

    #[test]
    fn test_position_index_tracks_removal() {
        let mut reg = BuildingRegistry::new();
        let pos = GridPos::new(1, 2);
        let id = reg.spawn(BuildingType::Farm, pos).unwrap();
        assert!(reg.at(pos).is_some());

        let removed = reg.remove(id).unwrap();
        assert_eq!(removed.position, pos);
        assert!(reg.at(pos).is_none());
        // Cell is free again
        assert!(reg.spawn(BuildingType::Housing, pos).is_some());
    }

    #[test]
    fn test_iteration_preserves_registration_order() {
        let mut reg = BuildingRegistry::new();
        let a = reg.spawn(BuildingType::Farm, GridPos::new(0, 0)).unwrap();
        let b = reg.spawn(BuildingType::Housing, GridPos::new(1, 0)).unwrap();
        let c = reg.spawn(BuildingType::Factory, GridPos::new(2, 0)).unwrap();

        reg.remove(b);
        let ids: Vec<_> = reg.iter().map(|bld| bld.id).collect();
        assert_eq!(ids, vec![a, c]);
    }

    #[test]
    fn test_count_of_ignores_construction_sites() {
        let mut reg = BuildingRegistry::new();
        reg.spawn(BuildingType::Farm, GridPos::new(0, 0)).unwrap();
        // Farms start in Foundation phase
        assert_eq!(reg.count_of(BuildingType::Farm), 0);

        // Militia posts are instant
        reg.spawn(BuildingType::MilitiaPost, GridPos::new(1, 0)).unwrap();
        assert_eq!(reg.count_of(BuildingType::MilitiaPost), 1);
    }
}
