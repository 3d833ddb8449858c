//! # Octagon Elo
//!
//! Explore MMA fighters' Elo rating histories and project hypothetical
//! matchups between any two fighters at any point in their careers.
//!
//! ## Architecture
//!
//! - **models**: Fighters, fight cards, bouts and rating snapshots
//! - **reconcile**: Matchmaker core: chart-series merging and winner projection
//! - **calculate**: Derived fighter views (bout history, eras, upcoming bout)
//! - **format**: Display formatting for dates, ratings and measurements
//! - **pagination**: Page envelopes and URLs of the upstream list endpoints
//! - **storage**: Local JSONL snapshot of the statistics API
//! - **ingest**: Import of saved API list pages into the snapshot
//! - **config**: Configuration loading and validation

pub mod calculate;
pub mod config;
pub mod format;
pub mod ingest;
pub mod models;
pub mod pagination;
pub mod reconcile;
pub mod storage;

pub use models::*;
