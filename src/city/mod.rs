pub mod building;
pub mod construction;
pub mod ledger;
pub mod materials;
pub mod registry;
