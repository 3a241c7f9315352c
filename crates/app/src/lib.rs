//! Persistence, services and configuration for the rebate promotion engine.

pub mod config;
pub mod context;
pub mod database;
pub mod domain;
pub mod logging;

#[cfg(test)]
mod test;

mod uuids;

pub use uuids::TypedUuid;
