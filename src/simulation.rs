pub mod billboard;
pub mod field;
pub mod integrator;
pub mod manager;
pub mod point_cloud;
pub mod reset;
pub mod state;
pub mod trait_def;
pub mod types;
