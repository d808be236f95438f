//! The token-consuming state machine.

use tracing::{debug, trace};

use crate::definition::ParameterType;
use crate::error::{Error, Result};
use crate::registry::{ParameterId, ParameterRegistry};
use crate::value::{RecordedValues, Value, coerce};

/// Parsing state. Once the scanner leaves `Scanning` it never returns: the
/// argument run is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    /// Tokens are matched against registered parameters.
    Scanning,
    /// Every remaining token is a positional argument.
    ConsumingArguments,
}

/// Consumes one token stream against a registry.
///
/// The scanner borrows the registry read-only and records into the caller's
/// value store and argument list, so everything committed before a failure
/// stays visible afterwards.
struct TokenScanner<'a> {
    registry: &'a ParameterRegistry,
    values: &'a mut RecordedValues,
    arguments: &'a mut Vec<String>,
    tokens: Vec<String>,
    pos: usize,
    state: ScanState,
    /// Index of a value token produced by splitting `--name=value`, if the
    /// split just happened. A flag parameter must reject such a value.
    attached: Option<usize>,
}

/// Run the parse: walk `tokens` against `registry`, recording parameter
/// values and collecting leftover positional arguments.
pub fn scan(
    registry: &ParameterRegistry,
    values: &mut RecordedValues,
    arguments: &mut Vec<String>,
    tokens: Vec<String>,
) -> Result<()> {
    TokenScanner {
        registry,
        values,
        arguments,
        tokens,
        pos: 0,
        state: ScanState::Scanning,
        attached: None,
    }
    .run()
}

impl<'a> TokenScanner<'a> {
    fn run(mut self) -> Result<()> {
        while self.pos < self.tokens.len() {
            match self.state {
                ScanState::Scanning => self.scan_token()?,
                ScanState::ConsumingArguments => self.consume_argument()?,
            }
        }
        Ok(())
    }

    fn scan_token(&mut self) -> Result<()> {
        self.split_attached_value();
        let token = self.tokens[self.pos].clone();
        trace!(%token, "scanning token");

        match self.resolve_token(&token)? {
            Some(id) => {
                self.pos += 1;
                self.consume_value(id, &token)
            }
            None => {
                // First token that is neither a parameter nor option-like:
                // from here on everything is a positional argument.
                debug!(%token, "switching to argument consumption");
                self.state = ScanState::ConsumingArguments;
                Ok(())
            }
        }
    }

    fn consume_argument(&mut self) -> Result<()> {
        let token = &self.tokens[self.pos];
        if token.starts_with('-') {
            return Err(Error::UnknownParameter {
                token: token.clone(),
            });
        }
        self.arguments.push(token.clone());
        self.pos += 1;
        Ok(())
    }

    /// Rewrite `--name=value` at the cursor into two tokens, remembering
    /// where the value landed.
    fn split_attached_value(&mut self) {
        let token = &self.tokens[self.pos];
        let Some(stripped) = token.strip_prefix("--") else {
            return;
        };
        let Some(equals) = stripped.find('=') else {
            return;
        };
        let name = format!("--{}", &stripped[..equals]);
        let value = stripped[equals + 1..].to_string();
        self.tokens[self.pos] = name;
        self.tokens.insert(self.pos + 1, value);
        self.attached = Some(self.pos + 1);
    }

    /// Map a token to a parameter identity.
    ///
    /// `--` forces a long-name lookup and `-` a short-name lookup; either
    /// failing is an error. A bare token tries short then long, and failing
    /// to resolve just means the token is not a parameter.
    fn resolve_token(&self, token: &str) -> Result<Option<ParameterId>> {
        if let Some(name) = token.strip_prefix("--") {
            self.registry
                .lookup_long(name)
                .map(Some)
                .ok_or_else(|| Error::UnknownParameter {
                    token: token.to_string(),
                })
        } else if let Some(name) = token.strip_prefix('-') {
            self.registry
                .lookup_short(name)
                .map(Some)
                .ok_or_else(|| Error::UnknownParameter {
                    token: token.to_string(),
                })
        } else {
            Ok(self.registry.lookup(token))
        }
    }

    /// Same resolution, but a miss is just a miss.
    fn try_resolve(&self, token: &str) -> Option<ParameterId> {
        if let Some(name) = token.strip_prefix("--") {
            self.registry.lookup_long(name)
        } else if let Some(name) = token.strip_prefix('-') {
            self.registry.lookup_short(name)
        } else {
            self.registry.lookup(token)
        }
    }

    /// Record the resolved parameter, consuming its value token if the type
    /// asks for one.
    fn consume_value(&mut self, id: ParameterId, submitted: &str) -> Result<()> {
        let name = submitted.trim_start_matches('-').to_string();
        let definition = self
            .registry
            .definition(id)
            .ok_or_else(|| Error::NotFound { name: name.clone() })?;
        let parameter_type = definition.options.parameter_type;
        let multiple = definition.options.multiple;
        let default = definition.options.default.clone();

        if parameter_type == ParameterType::None {
            // A value attached with '=' cannot belong to a flag. A free
            // standing next token is left alone; it will start the argument
            // run or resolve as a parameter of its own.
            if self.attached == Some(self.pos) {
                let next = &self.tokens[self.pos];
                if self.try_resolve(next).is_none() {
                    return Err(Error::TypeViolation {
                        name,
                        value: next.clone(),
                    });
                }
            }
            self.values.record(id, Value::Bool(true));
            return Ok(());
        }

        let raw = match self.tokens.get(self.pos) {
            Some(next) if !next.starts_with('-') => {
                let raw = next.clone();
                self.pos += 1;
                Some(raw)
            }
            _ => None,
        };

        let value = match raw {
            Some(raw) => coerce(parameter_type, &name, &raw)?,
            None => match default {
                // Validated at registration, so this coercion cannot fail.
                Some(default) => coerce(parameter_type, &name, &default)?,
                None => return Err(Error::MissingValue { name }),
            },
        };

        if multiple {
            self.values.append(id, value);
        } else if self.values.contains(id) {
            return Err(Error::TooManyValues { name });
        } else {
            self.values.record(id, value);
        }
        Ok(())
    }
}
