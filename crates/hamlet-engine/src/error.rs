//! Error types for the engine binary.
//!
//! [`EngineError`] is the top-level error type that wraps every failure
//! mode during startup and the hour loop.

/// Top-level error for the engine binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: hamlet_core::ConfigError,
    },

    /// Building the village failed.
    #[error("village error: {source}")]
    Village {
        /// The underlying village error.
        #[from]
        source: hamlet_core::VillageError,
    },

    /// The hour loop failed.
    #[error("runner error: {source}")]
    Runner {
        /// The underlying runner error.
        #[from]
        source: hamlet_core::RunnerError,
    },

    /// The log filter could not be parsed.
    #[error("invalid log filter: {message}")]
    Logging {
        /// Description of the filter failure.
        message: String,
    },
}
