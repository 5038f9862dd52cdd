//! # Divide Module
//!
//! The track-iteration engine behind the divide page. A source collection is
//! fetched in full, every item is classified as track or non-track, and a
//! cursor walks the tracks while the user moves, copies or removes them.
//!
//! ```text
//! fetcher ──▶ classify ──▶ navigator ◀──▶ dispatcher
//!                              │
//!                          workflow ──▶ view
//! ```
//!
//! - [`fetcher`] - Follows Spotify's continuation URLs into one ordered list
//! - [`classify`] - Skip flags for episodes, local files and unavailable items
//! - [`navigator`] - The [`Cursor`] state machine with wrap-around stepping
//! - [`dispatcher`] - Issues add/remove calls and keeps sequence and cursor
//!   consistent with them
//! - [`workflow`] - `begin_divide`, `advance`, `commit` and `recover` over a
//!   [`SessionState`](crate::types::SessionState)
//! - [`view`] - The track metadata shown for the current entry
//!
//! Requests for one session are assumed to arrive one at a time; two tabs
//! submitting concurrently can act on stale state.

pub mod classify;
pub mod dispatcher;
pub mod fetcher;
pub mod navigator;
pub mod view;
pub mod workflow;

pub use navigator::Cursor;
pub use workflow::{Progress, advance, begin_divide, commit, recover};
