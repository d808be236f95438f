//! Post-parse validation of dependency, exclusion and argument rules.

use tracing::debug;

use crate::error::{Error, Result};
use crate::registry::ParameterRegistry;
use crate::value::RecordedValues;

/// Check every recorded value against the rules of its definition.
///
/// Entries are visited in the order they were recorded. Rule names are
/// resolved against the registry here, not at registration time, so rules
/// may reference parameters registered later (or aliases). The first failing
/// rule aborts the validation.
pub fn validate(
    registry: &ParameterRegistry,
    values: &RecordedValues,
    arguments: &[String],
) -> Result<()> {
    for (id, _) in values.iter() {
        // A parameter unregistered since the parse has no rules left.
        let Some(definition) = registry.definition(id) else {
            continue;
        };

        for dependency in &definition.options.depends_on {
            let met = registry
                .lookup_short(dependency)
                .is_some_and(|required| values.contains(required));
            if !met {
                debug!(
                    parameter = %definition.short,
                    %dependency,
                    "dependency not met"
                );
                return Err(Error::DependencyNotMet {
                    name: definition.short.clone(),
                    dependency: dependency.clone(),
                });
            }
        }

        for excluded in &definition.options.excludes {
            let submitted = registry
                .lookup_short(excluded)
                .is_some_and(|other| values.contains(other));
            if submitted {
                debug!(parameter = %definition.short, %excluded, "exclusion violated");
                return Err(Error::ExclusionViolated {
                    name: definition.short.clone(),
                    excluded: excluded.clone(),
                });
            }
        }

        if !definition.options.allows_arguments && !arguments.is_empty() {
            return Err(Error::ArgumentsNotAllowed {
                name: definition.short.clone(),
            });
        }
    }
    Ok(())
}
