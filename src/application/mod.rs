//! Application layer - caller-facing services

mod services;

pub use services::EngineService;
