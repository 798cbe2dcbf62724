pub mod export;
pub mod insights;
pub mod interventions;
pub mod movements;
pub mod registry;
