//! Scoring and derivation helpers for the channel summary.
//!
//! Keyword salience, the monetization heuristic, and the recommendation
//! playbook all live here; `stats` composes them into the final summary.

pub mod keywords;
pub mod monetize;
pub mod recommend;
pub mod utility;
