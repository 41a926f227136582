pub mod consumption;
pub mod directives;
pub mod growth;
pub mod hazards;
pub mod pollution;
pub mod tick;
pub mod water;
