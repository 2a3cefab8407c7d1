//! Infrastructure layer: concrete adapters for the outbound ports

pub mod delivery;
pub mod persistence;
