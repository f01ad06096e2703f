//! Integration tests for DRAFTSIGNAL.
//!
//! Exercise the full pipeline (cache, ranking index, event handling,
//! report rendering) against an in-memory ratings source.

mod draft_flow;
mod mock_source;
