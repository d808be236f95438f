use thiserror::Error;

/// Failures produced by registration, grammar compilation, parsing and rule
/// validation.
///
/// Every variant carries the name of the parameter (or the grammar fragment)
/// that caused it, so callers can report a precise message without having to
/// re-derive context from the token stream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A short or long name, or an alias reference, did not resolve to any
    /// registered definition.
    #[error("no such parameter: {name}")]
    NotFound { name: String },

    /// A grammar spec string contained a bracket group that could not be
    /// compiled.
    #[error("malformed grammar near '{fragment}'")]
    MalformedGrammar { fragment: String },

    /// An option-like token did not resolve to a registered parameter, or
    /// appeared inside the trailing argument run.
    #[error("unknown parameter: {token}")]
    UnknownParameter { token: String },

    /// A raw value failed type coercion, or a value was attached to a
    /// parameter that takes none.
    #[error("invalid value '{value}' for parameter {name}")]
    TypeViolation { name: String, value: String },

    /// A second value arrived for a single-valued parameter.
    #[error("parameter {name} accepts only one value")]
    TooManyValues { name: String },

    /// A value-taking parameter was submitted without a value and declares no
    /// default.
    #[error("parameter {name} requires a value")]
    MissingValue { name: String },

    /// A submitted parameter requires another one that was not submitted.
    #[error("parameter {name} requires {dependency}")]
    DependencyNotMet { name: String, dependency: String },

    /// Two mutually exclusive parameters were both submitted.
    #[error("parameter {name} may not be combined with {excluded}")]
    ExclusionViolated { name: String, excluded: String },

    /// A parameter that forbids trailing arguments was submitted together
    /// with positional arguments.
    #[error("parameter {name} does not allow trailing arguments")]
    ArgumentsNotAllowed { name: String },
}

/// Convenient result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
