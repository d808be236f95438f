//! The public facade tying registry, parser and validator together.

use crate::definition::ParameterOptions;
use crate::error::Result;
use crate::grammar;
use crate::parser;
use crate::registry::{ParameterId, ParameterRegistry};
use crate::rules;
use crate::value::{RecordedValues, Value};

/// A configured command line: parameter definitions plus the values and
/// positional arguments recorded by parsing.
///
/// Definitions are registered up front, either directly or by compiling a
/// grammar string; `parse` then walks a token stream and records what it
/// finds. The recorded state is kept across `parse` calls on purpose; use
/// [`CommandLine::clear`] or a fresh instance for an unrelated parse.
///
/// Example
/// ```
/// use cmdopts::{CommandLine, ParameterOptions};
///
/// let mut cli = CommandLine::new();
/// cli.compile_grammar("[s:|size:]").unwrap();
/// cli.register_parameter("v", "verbose", ParameterOptions::new()).unwrap();
///
/// cli.parse(["-s", "10", "-v", "input.txt"]).unwrap();
/// assert_eq!(cli.value("size").and_then(|v| v.as_str()), Some("10"));
/// assert_eq!(cli.value("v").and_then(|v| v.as_bool()), Some(true));
/// assert_eq!(cli.arguments(), ["input.txt".to_string()]);
/// ```
#[derive(Debug, Default)]
pub struct CommandLine {
    registry: ParameterRegistry,
    values: RecordedValues,
    arguments: Vec<String>,
}

impl CommandLine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a parameter under a short and a long name.
    ///
    /// Re-using either name silently replaces the prior definition; see
    /// [`ParameterRegistry::register`].
    pub fn register_parameter(
        &mut self,
        short: &str,
        long: &str,
        options: ParameterOptions,
    ) -> Result<ParameterId> {
        self.registry.register(short, long, options)
    }

    /// Bind an extra short/long name pair to the parameter registered under
    /// the short name `reference`.
    pub fn register_alias(&mut self, short: &str, long: &str, reference: &str) -> Result<()> {
        self.registry.register_alias(short, long, reference)
    }

    /// Remove a parameter by short name. With `cascade`, parameters whose
    /// dependencies named it are removed transitively as well.
    pub fn unregister_parameter(&mut self, short: &str, cascade: bool) -> Result<()> {
        self.registry.unregister(short, cascade)
    }

    /// Compile a bracket grammar string into registrations; see the
    /// [`grammar`](crate::grammar) module documentation for the format.
    pub fn compile_grammar(&mut self, spec: &str) -> Result<()> {
        grammar::compile(spec, &mut self.registry)
    }

    /// Parse a token stream against the registered parameters, then check
    /// the dependency, exclusion and argument rules over everything recorded
    /// so far.
    ///
    /// On failure the error names the offending parameter; values recorded
    /// before the failure stay recorded.
    pub fn parse<I, S>(&mut self, tokens: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tokens: Vec<String> = tokens.into_iter().map(Into::into).collect();
        parser::scan(&self.registry, &mut self.values, &mut self.arguments, tokens)?;
        rules::validate(&self.registry, &self.values, &self.arguments)
    }

    /// Recorded value of the parameter resolved by `name` (short or long),
    /// or `None` when the parameter was not submitted.
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.registry
            .lookup(name)
            .and_then(|id| self.values.get(id))
    }

    /// Every recorded value, keyed by the owning parameter's short name, in
    /// the order of first recording.
    pub fn values(&self) -> Vec<(&str, &Value)> {
        self.values
            .iter()
            .filter_map(|(id, value)| {
                self.registry
                    .definition(id)
                    .map(|definition| (definition.short.as_str(), value))
            })
            .collect()
    }

    /// Leftover positional arguments, in stream order.
    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    /// Help listing in registration order; see
    /// [`ParameterRegistry::help_entries`].
    pub fn help(&self, use_long_text: bool, name_filter: Option<&str>) -> Vec<(String, String)> {
        self.registry.help_entries(use_long_text, name_filter)
    }

    /// Forget every recorded value and argument, keeping the registered
    /// parameters.
    pub fn clear(&mut self) {
        self.values.clear();
        self.arguments.clear();
    }
}
