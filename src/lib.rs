//! Transfer Match - exchange-matching engine for police officers
//!
//! Finds officers who want the requester's post, direct two-way swaps and
//! triangular three-way swaps, over a desire graph built once per query.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{DesireGraph, LocationIndex, MatchError, Matcher};
pub use models::{Intention, IntentionTarget, MatchLimits, MatchReport, Officer, OfficerId, ScopeMode};
pub use services::MatchSnapshot;
