pub mod fixture_model;
pub mod loader;
