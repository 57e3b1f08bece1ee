use std::fmt;

/// Failure taxonomy shared by the terrain synthesizer and the effect
/// pipeline. Multi-pass transforms are all-or-nothing: on any failure the
/// caller-visible buffer is left exactly as it was.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    Input {
        field: &'static str,
        message: String,
    },
    SurfaceUnavailable(String),
    PassFailed {
        effect: &'static str,
        pass: usize,
    },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input { field, message } => write!(f, "invalid input for {field}: {message}"),
            Self::SurfaceUnavailable(msg) => write!(f, "no drawing surface available: {msg}"),
            Self::PassFailed { effect, pass } => {
                write!(f, "effect '{effect}' aborted at pass {pass}; surface restored")
            }
        }
    }
}

impl std::error::Error for EngineError {}

pub(crate) fn input_error(field: &'static str, message: impl Into<String>) -> EngineError {
    EngineError::Input {
        field,
        message: message.into(),
    }
}

pub(crate) fn require_finite(field: &'static str, value: f64) -> Result<f64, EngineError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(input_error(field, "must be finite"))
    }
}
