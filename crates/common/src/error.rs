//! Error types for network configuration resolution.
//!
//! Fallible operations return [`error_stack::Report`] wrapping a
//! [`NetworkConfigError`]. Missing configuration is never an error: a format
//! with no override simply resolves to `None`.

use derive_more::Display;

/// Errors raised while configuring or resolving a network.
#[derive(Debug, Display)]
pub enum NetworkConfigError {
    /// Settings could not be loaded, parsed or validated.
    #[display("Configuration error: {message}")]
    Configuration { message: String },

    /// A caller broke an argument contract (e.g. an empty parameter key).
    #[display("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// The provider could not construct its network adapter.
    #[display("Adapter creation error: {message}")]
    AdapterCreation { message: String },

    /// The adapter rejected an operation after it was created.
    #[display("Adapter error: {message}")]
    Adapter { message: String },
}

impl core::error::Error for NetworkConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            NetworkConfigError::Configuration {
                message: "bad".to_string()
            }
            .to_string(),
            "Configuration error: bad"
        );
        assert_eq!(
            NetworkConfigError::InvalidArgument {
                message: "empty key".to_string()
            }
            .to_string(),
            "Invalid argument: empty key"
        );
        assert_eq!(
            NetworkConfigError::AdapterCreation {
                message: "sdk missing".to_string()
            }
            .to_string(),
            "Adapter creation error: sdk missing"
        );
    }
}
