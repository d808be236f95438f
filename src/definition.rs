use std::collections::BTreeSet;

/// Value type a parameter expects on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParameterType {
    /// A bare flag; the parameter consumes no value and records `true`.
    #[default]
    None,
    /// An unsigned decimal integer value.
    Int,
    /// A free-form string value; one layer of matching quotes is stripped.
    String,
}

/// Configuration of a single parameter.
///
/// The defaults describe the plainest possible parameter: a bare flag with
/// no default value, single-valued, without dependency or exclusion rules,
/// permitting trailing positional arguments, and with empty help texts.
/// Builder-style methods adjust individual fields:
///
/// ```
/// use cmdopts::{ParameterOptions, ParameterType};
///
/// let options = ParameterOptions::new()
///     .typed(ParameterType::Int)
///     .default_value("80")
///     .requires("host");
/// assert!(options.depends_on.contains("host"));
/// ```
#[derive(Debug, Clone)]
pub struct ParameterOptions {
    /// Value type consumed from the token stream.
    pub parameter_type: ParameterType,
    /// Raw default recorded when the parameter is submitted without a value.
    /// Validated against `parameter_type` at registration time.
    pub default: Option<String>,
    /// When true, every occurrence appends to an ordered list of values.
    pub multiple: bool,
    /// Short names of parameters that must also be submitted.
    pub depends_on: BTreeSet<String>,
    /// Short names of parameters that may not be submitted alongside.
    pub excludes: BTreeSet<String>,
    /// When false, the parameter rejects any trailing positional arguments.
    pub allows_arguments: bool,
    /// One-line help text.
    pub help_short: String,
    /// Detailed help text.
    pub help_long: String,
}

impl Default for ParameterOptions {
    fn default() -> Self {
        Self {
            parameter_type: ParameterType::None,
            default: None,
            multiple: false,
            depends_on: BTreeSet::new(),
            excludes: BTreeSet::new(),
            allows_arguments: true,
            help_short: String::new(),
            help_long: String::new(),
        }
    }
}

impl ParameterOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the value type.
    pub fn typed(mut self, parameter_type: ParameterType) -> Self {
        self.parameter_type = parameter_type;
        self
    }

    /// Declare a default recorded when no value token is present.
    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Allow the parameter to be submitted several times, collecting every
    /// value into an ordered list.
    pub fn multiple(mut self) -> Self {
        self.multiple = true;
        self
    }

    /// Require another parameter (by short name) to be submitted as well.
    pub fn requires(mut self, short: impl Into<String>) -> Self {
        self.depends_on.insert(short.into());
        self
    }

    /// Forbid another parameter (by short name) from being submitted
    /// alongside this one.
    pub fn conflicts_with(mut self, short: impl Into<String>) -> Self {
        self.excludes.insert(short.into());
        self
    }

    /// Reject trailing positional arguments whenever this parameter is
    /// submitted.
    pub fn forbid_arguments(mut self) -> Self {
        self.allows_arguments = false;
        self
    }

    /// Attach help texts: a one-liner and a detailed description.
    pub fn help(mut self, brief: impl Into<String>, detailed: impl Into<String>) -> Self {
        self.help_short = brief.into();
        self.help_long = detailed.into();
        self
    }
}

/// A registered parameter: its canonical names plus configuration.
#[derive(Debug, Clone)]
pub struct ParameterDefinition {
    /// Canonical short name, matched by `-<short>` tokens.
    pub short: String,
    /// Canonical long name, matched by `--<long>` tokens.
    pub long: String,
    /// Behavior of the parameter during parsing and validation.
    pub options: ParameterOptions,
}

impl ParameterDefinition {
    /// Display label used in help listings.
    pub fn label(&self) -> String {
        format!("-{} / --{}", self.short, self.long)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_describe_a_bare_flag() {
        let options = ParameterOptions::new();
        assert_eq!(options.parameter_type, ParameterType::None);
        assert_eq!(options.default, None);
        assert!(!options.multiple);
        assert!(options.depends_on.is_empty());
        assert!(options.excludes.is_empty());
        assert!(options.allows_arguments);
    }

    #[test]
    fn test_builder_methods_adjust_single_fields() {
        let options = ParameterOptions::new()
            .typed(ParameterType::Int)
            .default_value("8080")
            .multiple()
            .requires("host")
            .conflicts_with("socket")
            .forbid_arguments();
        assert_eq!(options.parameter_type, ParameterType::Int);
        assert_eq!(options.default.as_deref(), Some("8080"));
        assert!(options.multiple);
        assert!(options.depends_on.contains("host"));
        assert!(options.excludes.contains("socket"));
        assert!(!options.allows_arguments);
    }

    #[test]
    fn test_label_format() {
        let definition = ParameterDefinition {
            short: "s".to_string(),
            long: "size".to_string(),
            options: ParameterOptions::new(),
        };
        assert_eq!(definition.label(), "-s / --size");
    }
}
