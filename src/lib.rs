//! Field lines of a solenoid drawn by particles flowing through a dipole
//! field, shown either as image billboards or as a point cloud.

pub mod app;
pub mod config;
pub mod error;
pub mod picking;
pub mod rendering;
pub mod simulation;
pub mod utils;

pub use config::SimulationConfig;
pub use simulation::manager::SimulationManager;
pub use simulation::types::{AssetId, ParticleMode};
