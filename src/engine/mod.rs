//! Event-processing pipeline.

pub mod assistant;

pub use assistant::DraftAssistant;
