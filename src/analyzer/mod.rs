//! Analyzer module - title and abstract feedback engine

pub mod engine;
pub mod rules;
pub mod text;

pub use engine::{AggregateStats, FeedbackEngine};
pub use text::{word_count, TextStats};
