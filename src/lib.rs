//! BlockBeats Watch - poll the BlockBeats news API and report new items.

pub mod api;
pub mod config;
pub mod display;
pub mod watch;
