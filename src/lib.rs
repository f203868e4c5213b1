pub mod browser;
pub mod cli;
pub mod error;
pub mod fixture;
pub mod flow;
pub mod page;
pub mod report;
pub mod selector;
pub mod sync;
