//! Dehops - multi-hop swap execution engine
//! Built with Domain-Driven Design principles

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod report;
pub mod shared;

// Re-export main types for convenience
pub use application::EngineService;
pub use domain::execution::{ChainExecutor, ChainRequest};
pub use domain::venue::VenueRegistry;
pub use report::RunReport;
