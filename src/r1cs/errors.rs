use thiserror::Error;

/// Failures surfaced while building or witnessing a circuit.
///
/// Configuration errors come from gadget constructors and are raised before any
/// constraint is registered. Arithmetic errors come from witness generation.
/// Consistency errors are raised by the protoboard when a caller reads a value
/// that has not been produced yet or overwrites one with something different.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum R1csError {
    #[error("Configuration error in {gadget}: {details}")]
    Configuration { gadget: String, details: String },
    #[error("Arithmetic error in {gadget}: {details}")]
    Arithmetic { gadget: String, details: String },
    #[error("Consistency error on variable {index}: {details}")]
    Consistency { index: usize, details: String },
    #[error("Serialization error: {details}")]
    Serialization { details: String },
}

impl R1csError {
    pub fn configuration(gadget: &str, details: impl Into<String>) -> Self {
        R1csError::Configuration {
            gadget: gadget.to_string(),
            details: details.into(),
        }
    }

    pub fn arithmetic(gadget: &str, details: impl Into<String>) -> Self {
        R1csError::Arithmetic {
            gadget: gadget.to_string(),
            details: details.into(),
        }
    }

    pub fn consistency(index: usize, details: impl Into<String>) -> Self {
        R1csError::Consistency {
            index,
            details: details.into(),
        }
    }

    pub fn serialization(details: impl Into<String>) -> Self {
        R1csError::Serialization {
            details: details.into(),
        }
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, R1csError::Configuration { .. })
    }
}

/// Result type alias for convenience
pub type R1csResult<T> = Result<T, R1csError>;

impl From<bincode::Error> for R1csError {
    fn from(err: bincode::Error) -> Self {
        R1csError::serialization(err.to_string())
    }
}
