/// Errors raised while building or rendering a pipeline.
///
/// Coercion never fails. Everything here surfaces either when a declared but
/// unimplemented capability is invoked, or when a tree is rendered.
#[derive(Debug, Clone, PartialEq)]
pub enum MqlError {
    /// A type-coalescing capability the value does not provide
    NotSupported(&'static str),

    /// A host value the dispatcher left unchanged has no wire form
    Unrenderable(&'static str),

    /// A date string that is not valid RFC 3339
    InvalidDate(String),
}

impl std::fmt::Display for MqlError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MqlError::NotSupported(capability) => {
                write!(f, "Not supported: {} is not implemented for this value", capability)
            }
            MqlError::Unrenderable(kind) => {
                write!(f, "Render error: {} value has no wire representation", kind)
            }
            MqlError::InvalidDate(input) => write!(f, "Invalid date: '{}'", input),
        }
    }
}

impl std::error::Error for MqlError {}
