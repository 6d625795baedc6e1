//! Port implementations.
//!
//! `live` talks to the real systems, `recording` wraps live adapters and
//! captures cassettes, `replaying` serves cassettes back.

pub mod live;
pub mod recording;
pub mod replaying;
