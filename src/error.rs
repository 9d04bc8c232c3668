/*!
Error types used across this crate: malformed-JSON errors raised while parsing the policy model
(`IamFormatError`), and the engine's own failure taxonomy (`EngineError`).
*/

use thiserror::Error;

// ------------------------------------------------------------------------------------------------
// Public Types
// ------------------------------------------------------------------------------------------------

/// Errors raised while parsing or serializing the JSON policy model.
#[derive(Debug, Error)]
pub enum IamFormatError {
    #[error("A required property `{name}` was not found")]
    MissingProperty { name: String },

    #[error("Unexpected properties found for type `{type_name}`")]
    UnexpectedProperties { type_name: String },

    #[error("An unexpected value `{value}` for property named `{name}` was found")]
    UnexpectedValue { name: String, value: String },

    #[error("An unexpected value `{value}` for type `{type_name}` was found")]
    UnexpectedTypeValue { type_name: String, value: String },

    #[error("Invalid type for property `{name}`; expecting a `{expecting}` but found a `{found}`")]
    TypeMismatch {
        name: String,
        expecting: String,
        found: String,
    },

    #[error("The vector property `{name}` was found to be empty, it is required to have at least one value")]
    EmptyVector { name: String },

    #[error("Could not serialize a value to JSON")]
    CouldNotSerialize,

    #[error("Could not expand a variable in the value `{value}`")]
    InvalidVariable { value: String },
}

/// The engine's own failure taxonomy.
///
/// `UpstreamFailure` wraps errors surfaced by a caller's `DataStore`, `PolicyLoader`, or
/// `ActionExpander` implementation; everything else originates inside this crate.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The caller supplied an argument the engine cannot act on (e.g. an empty principal ARN, or
    /// one of a type the configured `DataStore` does not support).
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    /// An atom or set was constructed in a way that violates an invariant this crate relies on
    /// internally (e.g. both `resource` and `notResource` present on one `Permission`, or two
    /// `PermissionSet`s of differing effect composed together). This indicates a bug in this
    /// crate, not in caller input; it is not expected to occur.
    #[error("construction violation: {reason}")]
    ConstructionViolation { reason: String },

    /// A condition operator outside the recognized algebra table was required for an operation
    /// where no conservative fallback was possible (currently only inversion, which a `Deny`
    /// subtraction requires; merge and intersection degrade silently instead of erroring).
    #[error("unsupported condition operator `{operator}` for {context}")]
    UnsupportedOperator { operator: String, context: String },

    #[error(transparent)]
    UpstreamFailure(#[from] UpstreamError),
}

/// Wraps a failure from one of the engine's external collaborators.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("policy format error: {0}")]
    Format(#[from] IamFormatError),

    #[error("data store error: {0}")]
    DataStore(String),

    #[error("action expansion error: {0}")]
    ActionExpansion(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ------------------------------------------------------------------------------------------------
// Public Functions
// ------------------------------------------------------------------------------------------------

pub fn missing_property<S>(name: S) -> IamFormatError
where
    S: Into<String>,
{
    IamFormatError::MissingProperty { name: name.into() }
}

pub fn unexpected_properties<S>(type_name: S) -> IamFormatError
where
    S: Into<String>,
{
    IamFormatError::UnexpectedProperties {
        type_name: type_name.into(),
    }
}

pub fn unexpected_value_for_property<S1, S2>(name: S1, value: S2) -> IamFormatError
where
    S1: Into<String>,
    S2: Into<String>,
{
    IamFormatError::UnexpectedValue {
        name: name.into(),
        value: value.into(),
    }
}

pub fn unexpected_value_for_type<S1, S2>(type_name: S1, value: S2) -> IamFormatError
where
    S1: Into<String>,
    S2: Into<String>,
{
    IamFormatError::UnexpectedTypeValue {
        type_name: type_name.into(),
        value: value.into(),
    }
}

pub fn type_mismatch<S1, S2, S3>(name: S1, expecting: S2, found: S3) -> IamFormatError
where
    S1: Into<String>,
    S2: Into<String>,
    S3: Into<String>,
{
    IamFormatError::TypeMismatch {
        name: name.into(),
        expecting: expecting.into(),
        found: found.into(),
    }
}

pub fn empty_vector_property<S>(name: S) -> IamFormatError
where
    S: Into<String>,
{
    IamFormatError::EmptyVector { name: name.into() }
}

pub fn construction_violation<S>(reason: S) -> EngineError
where
    S: Into<String>,
{
    EngineError::ConstructionViolation {
        reason: reason.into(),
    }
}

pub fn invalid_input<S>(reason: S) -> EngineError
where
    S: Into<String>,
{
    EngineError::InvalidInput {
        reason: reason.into(),
    }
}

pub fn unsupported_operator<S1, S2>(operator: S1, context: S2) -> EngineError
where
    S1: Into<String>,
    S2: Into<String>,
{
    EngineError::UnsupportedOperator {
        operator: operator.into(),
        context: context.into(),
    }
}

// ------------------------------------------------------------------------------------------------
// Implementations
// ------------------------------------------------------------------------------------------------

impl<T> From<IamFormatError> for Result<T, IamFormatError> {
    fn from(e: IamFormatError) -> Self {
        Err(e)
    }
}

impl<T> From<IamFormatError> for Result<T, EngineError> {
    fn from(e: IamFormatError) -> Self {
        Err(EngineError::UpstreamFailure(UpstreamError::Format(e)))
    }
}

impl From<IamFormatError> for EngineError {
    fn from(e: IamFormatError) -> Self {
        EngineError::UpstreamFailure(UpstreamError::Format(e))
    }
}
