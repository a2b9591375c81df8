//! Engine crate for the movie advisor.
//!
//! This crate contains the facade that coordinates the store, the decade
//! filter, both recommenders and the feedback recorder.

pub mod feedback;
pub mod orchestrator;

pub use feedback::FeedbackRecorder;
pub use orchestrator::{EngineConfig, RecommendationEngine, Session, Strategy};
