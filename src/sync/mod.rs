pub mod policy;
pub mod wait;
