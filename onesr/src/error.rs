use thiserror::Error;

/// The error type for `OneSR-Burn` operations.
///
/// This enum encapsulates all possible errors that can occur within the OneSR-Burn library,
/// from invalid loss configuration to inconsistent sampler parameters.
#[derive(Error, Debug)]
pub enum OneSrError {
    /// Error for when an unsupported reduction mode is specified.
    #[error("{reduction} is not a valid value for reduction")]
    InvalidReduction {
        /// The rejected reduction string.
        reduction: String,
    },

    /// Error for when sampler or dataset parameters are logically inconsistent.
    #[error("Invalid configuration: {reason}")]
    InvalidConfiguration {
        /// The reason why the configuration is invalid.
        reason: String,
    },
}

/// A specialized `Result` type for `OneSR-Burn` operations.
pub type OneSrResult<T> = Result<T, OneSrError>;
