//! Core data models for fighters, fight cards and rating history.

mod bout;
mod event;
mod fighter;
mod ids;
mod matchup;
mod rating;

pub use bout::*;
pub use event::*;
pub use fighter::*;
pub use ids::*;
pub use matchup::*;
pub use rating::*;
