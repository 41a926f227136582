//! Construction materials and the shared material pool

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// Construction material kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Material {
    Timber,
    Steel,
    Cement,
    Prefab,
}

impl Material {
    pub const ALL: [Material; 4] = [
        Material::Timber,
        Material::Steel,
        Material::Cement,
        Material::Prefab,
    ];
}

/// Total materials a building draws over its whole construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MaterialCost {
    pub timber: u32,
    pub steel: u32,
    pub cement: u32,
    pub prefab: u32,
}

impl MaterialCost {
    pub fn new(timber: u32, steel: u32, cement: u32, prefab: u32) -> Self {
        Self {
            timber,
            steel,
            cement,
            prefab,
        }
    }

    pub fn get(&self, material: Material) -> u32 {
        match material {
            Material::Timber => self.timber,
            Material::Steel => self.steel,
            Material::Cement => self.cement,
            Material::Prefab => self.prefab,
        }
    }

    pub fn as_pairs(&self) -> [(Material, u32); 4] {
        [
            (Material::Timber, self.timber),
            (Material::Steel, self.steel),
            (Material::Cement, self.cement),
            (Material::Prefab, self.prefab),
        ]
    }

    pub fn total(&self) -> u32 {
        self.timber + self.steel + self.cement + self.prefab
    }
}

/// The city-wide material pool shared by every construction site
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MaterialPool {
    /// Serialized in `Material::ALL` order so identical pools produce
    /// byte-identical JSON (hash-map iteration order is randomized)
    #[serde(serialize_with = "serialize_amounts")]
    amounts: AHashMap<Material, u32>,
}

fn serialize_amounts<S>(amounts: &AHashMap<Material, u32>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    use serde::ser::SerializeMap;
    let mut map = serializer.serialize_map(Some(amounts.len()))?;
    for material in Material::ALL {
        if let Some(amount) = amounts.get(&material) {
            map.serialize_entry(&material, amount)?;
        }
    }
    map.end()
}

impl MaterialPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, material: Material) -> u32 {
        self.amounts.get(&material).copied().unwrap_or(0)
    }

    pub fn add(&mut self, material: Material, amount: u32) {
        *self.amounts.entry(material).or_insert(0) += amount;
    }

    /// Remove up to `amount`, returns what was actually removed
    pub fn remove(&mut self, material: Material, amount: u32) -> u32 {
        if let Some(entry) = self.amounts.get_mut(&material) {
            let removed = amount.min(*entry);
            *entry -= removed;
            removed
        } else {
            0
        }
    }

    /// Check the pool can cover every draw in the list
    pub fn can_supply(&self, draws: &[(Material, u32)]) -> bool {
        draws.iter().all(|(m, amount)| self.get(*m) >= *amount)
    }

    /// Debit all draws; returns false (and debits nothing) on shortfall
    pub fn consume(&mut self, draws: &[(Material, u32)]) -> bool {
        if !self.can_supply(draws) {
            return false;
        }
        for (m, amount) in draws {
            self.remove(*m, *amount);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_add_remove() {
        let mut pool = MaterialPool::new();
        pool.add(Material::Timber, 30);
        assert_eq!(pool.get(Material::Timber), 30);
        assert_eq!(pool.remove(Material::Timber, 20), 20);
        assert_eq!(pool.remove(Material::Timber, 20), 10);
        assert_eq!(pool.get(Material::Timber), 0);
    }

    #[test]
    fn test_consume_is_all_or_nothing() {
        let mut pool = MaterialPool::new();
        pool.add(Material::Timber, 10);
        pool.add(Material::Steel, 2);

        let draws = [(Material::Timber, 5), (Material::Steel, 5)];
        assert!(!pool.consume(&draws));
        // Nothing consumed on failure
        assert_eq!(pool.get(Material::Timber), 10);
        assert_eq!(pool.get(Material::Steel), 2);

        pool.add(Material::Steel, 3);
        assert!(pool.consume(&draws));
        assert_eq!(pool.get(Material::Timber), 5);
        assert_eq!(pool.get(Material::Steel), 0);
    }

    #[test]
    fn test_material_cost_pairs() {
        let cost = MaterialCost::new(1, 2, 3, 4);
        assert_eq!(cost.get(Material::Cement), 3);
        assert_eq!(cost.total(), 10);
        assert_eq!(cost.as_pairs()[3], (Material::Prefab, 4));
    }
}
