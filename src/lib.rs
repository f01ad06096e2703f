//! DRAFTSIGNAL: win-rate driven pick ranking for limited drafts
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod config;
pub mod types;
pub mod cards;
pub mod stats;
pub mod storage;
pub mod ranking;
pub mod draft;
pub mod events;
pub mod engine;
pub mod report;
