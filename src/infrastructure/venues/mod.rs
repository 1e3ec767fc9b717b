//! Simulated venue adapters

mod clmm;
mod cpmm;

pub use clmm::ClmmVenue;
pub use cpmm::CpmmVenue;
