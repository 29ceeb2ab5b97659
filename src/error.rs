//! Error types for the session cost-allocation engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur during cost computation and
//! settlement reconciliation.

use thiserror::Error;

/// The main error type for the cost-allocation engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use session_billing_engine::error::EngineError;
///
/// let error = EngineError::NotEnded {
///     session_id: "session_042".to_string(),
/// };
/// assert_eq!(error.to_string(), "Session 'session_042' has no end time yet");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// A membership row carried malformed timing data.
    ///
    /// The session cannot be finalized until the row is corrected at the
    /// source; the engine never repairs input data.
    #[error("Invalid interval on membership '{membership_id}' in session '{session_id}': {message}")]
    InvalidInterval {
        /// The session being computed.
        session_id: String,
        /// The membership row with the malformed interval.
        membership_id: String,
        /// A description of what made the interval invalid.
        message: String,
    },

    /// The rate table does not cover an observed occupancy count, or is
    /// itself malformed (gaps, overlaps, negative rates).
    #[error("Rate table configuration error for location '{location_id}': {message}")]
    Configuration {
        /// The location whose rate table is at fault.
        location_id: String,
        /// A description of the configuration gap.
        message: String,
    },

    /// An operation that requires a finalized session was invoked while the
    /// session is still open.
    #[error("Session '{session_id}' has no end time yet")]
    NotEnded {
        /// The session that is still open.
        session_id: String,
    },

    /// A recomputation was attempted on a session whose settlement record is
    /// already marked final. Pass an explicit override to recompute anyway.
    #[error("Session '{session_id}' is already settled; recomputation requires an explicit override")]
    AlreadySettled {
        /// The settled session.
        session_id: String,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParse {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
