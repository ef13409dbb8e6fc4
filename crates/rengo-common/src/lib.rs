//! Common types for the rengo rename engine.
//!
//! This crate provides the foundational source-location types used across
//! all rengo crates:
//! - Byte-offset positions and spans (`Pos`, `Span`, `Spanned`)
//! - Line/column conversion for user-facing positions (`LineMap`, `Position`)

pub mod position;
pub mod span;

pub use position::{LineMap, Position};
pub use span::{Pos, Span, Spanned};
