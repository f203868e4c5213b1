pub mod candidate;
pub mod resolver;
