//! CLI utilities for Milkee tools
//!
//! Provides shared CLI functionality:
//! - Terminal output formatting
//! - Configuration and validation reports
//! - Progress indicators

#![warn(missing_docs)]

pub mod output;
pub mod progress;
pub mod report;
