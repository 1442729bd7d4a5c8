//! Client side of the repertoire trainer: storage API, play assist and drills.

pub mod api;
pub mod assist;
pub mod config;
pub mod drill_session;
pub mod error;
