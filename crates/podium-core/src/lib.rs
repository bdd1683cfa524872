//! # podium-core
//!
//! Core types, ID prefixes, and error types for Podium.
//!
//! This crate provides the foundational types shared across all Podium crates:
//! - Entity structs for projects, timeline entries, and evaluations
//! - Status enums with state machine transitions
//! - The fixed scoring rubric (dimensions, ranges, weights)
//! - Store-independent input validation
//! - Response shapes returned to callers (leaderboard rows, entry views)
//! - Cross-cutting error types

pub mod entities;
pub mod enums;
pub mod errors;
pub mod ids;
pub mod responses;
pub mod rubric;
pub mod validation;
