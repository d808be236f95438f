//! Compiler for the compact bracket grammar.
//!
//! A spec string is a run of bracket groups with no required separators:
//!
//! ```text
//! [shortname[:|?|*|+][defaultLiteral]|longname[:|?|*|+]]
//! ```
//!
//! Names match `[a-z0-9-]+`. Each group compiles into exactly one
//! registration, in textual order. The modifiers mean:
//!
//! * absent or `:` marks a single required string value (the base grammar
//!   registration),
//! * `?` marks an optional string value defaulting to the empty string,
//! * `*` marks zero or more values across occurrences,
//! * `+` marks one or more string values across occurrences,
//!
//! and a literal between the short-side modifier and the `|` becomes the
//! default value. Bare flags cannot be declared through the grammar; they
//! are registered programmatically.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::definition::{ParameterOptions, ParameterType};
use crate::error::{Error, Result};
use crate::registry::ParameterRegistry;

static GROUP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\[([a-z0-9-]+)([:?*+])?([^|\[\]]*)\|([a-z0-9-]+)([:?*+])?\]")
        .expect("hard-coded pattern")
});

/// Compile a grammar spec string into registrations on `registry`.
///
/// Compilation stops at the first group that does not match the format;
/// groups compiled before it stay registered.
pub fn compile(spec: &str, registry: &mut ParameterRegistry) -> Result<()> {
    let mut rest = spec.trim_start();
    let mut groups = 0usize;
    while !rest.is_empty() {
        let captures = GROUP.captures(rest).ok_or_else(|| Error::MalformedGrammar {
            fragment: snippet(rest),
        })?;

        let short = &captures[1];
        let long = &captures[4];
        let mut options = ParameterOptions::new().typed(ParameterType::String);
        for modifier in [captures.get(2), captures.get(5)].into_iter().flatten() {
            options = apply_modifier(options, modifier.as_str());
        }
        if let Some(literal) = captures.get(3).filter(|m| !m.as_str().is_empty()) {
            options = options.default_value(literal.as_str());
        }
        registry.register(short, long, options)?;
        groups += 1;

        rest = rest[captures[0].len()..].trim_start();
    }
    debug!(groups, "compiled grammar");
    Ok(())
}

fn apply_modifier(options: ParameterOptions, modifier: &str) -> ParameterOptions {
    match modifier {
        // The colon only marks a value-taking parameter, which the base
        // registration already is.
        ":" => options,
        "?" => options.default_value(""),
        "*" => options.multiple(),
        "+" => options.typed(ParameterType::String).multiple(),
        _ => options,
    }
}

/// A short prefix of the unparsed remainder, for the error message.
fn snippet(rest: &str) -> String {
    const LIMIT: usize = 24;
    if rest.chars().count() <= LIMIT {
        rest.to_string()
    } else {
        rest.chars().take(LIMIT).collect()
    }
}
