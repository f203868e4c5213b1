pub mod context;
pub mod orchestrator;
pub mod result;
pub mod step;
