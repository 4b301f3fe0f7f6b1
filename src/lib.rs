pub mod animation;
pub mod bodies;
pub mod config;
pub mod constants;
pub mod horizons;
pub mod kepler;
pub mod loader;
pub mod orrery_errors;
pub mod planets;
pub mod time;
