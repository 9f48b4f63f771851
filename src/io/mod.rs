//! Command-line interface, configuration defaults, errors, and progress

/// Command-line parsing and the pipeline runner
pub mod cli;
/// Pipeline constants and runtime defaults
pub mod configuration;
/// Error types and result alias
pub mod error;
/// Phase progress display
pub mod progress;
