//! Journey classification — maps CRM deal/contact pairs onto a three-stage
//! relationship journey and scores relationship health.

pub mod engine;
pub mod types;

pub use engine::JourneyEngine;
pub use types::{ClientJourney, JourneyPosition, NextAction, Priority, RiskFactor, Stage, SubStage};
