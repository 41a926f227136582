//! Sovgrad - Planned-Economy City Simulation Core

pub mod city;
pub mod command;
pub mod core;
pub mod grid;
pub mod simulation;
pub mod world;
