//! The definition table and the name maps resolving short and long forms.

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use crate::definition::{ParameterDefinition, ParameterOptions};
use crate::error::{Error, Result};
use crate::value::coerce;

/// Opaque identity of a registered parameter.
///
/// Identities are assigned monotonically and never reused, so iterating the
/// definition table by identity follows registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ParameterId(u64);

impl ParameterId {
    #[cfg(test)]
    pub(crate) fn for_tests(raw: u64) -> Self {
        Self(raw)
    }
}

/// Holds parameter definitions together with the short/long name maps.
///
/// The name maps double as the alias table: an alias is nothing but an extra
/// map entry pointing at an existing identity, so identity uniqueness is a
/// property of the definition table alone.
#[derive(Debug, Default)]
pub struct ParameterRegistry {
    definitions: BTreeMap<ParameterId, ParameterDefinition>,
    short_names: HashMap<String, ParameterId>,
    long_names: HashMap<String, ParameterId>,
    next_id: u64,
}

impl ParameterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a definition bound to both names.
    ///
    /// If either name is already in use, the prior definition is silently
    /// and entirely replaced, aliases included. This overwrite is the
    /// documented contract, not an error.
    ///
    /// A declared default is validated against the declared type here, so a
    /// bad default surfaces at registration instead of in the middle of a
    /// parse.
    pub fn register(
        &mut self,
        short: &str,
        long: &str,
        options: ParameterOptions,
    ) -> Result<ParameterId> {
        if let Some(default) = &options.default {
            coerce(options.parameter_type, short, default)?;
        }

        if let Some(&displaced) = self.short_names.get(short) {
            self.remove_definition(displaced);
        }
        if let Some(&displaced) = self.long_names.get(long) {
            self.remove_definition(displaced);
        }

        let id = ParameterId(self.next_id);
        self.next_id += 1;
        self.short_names.insert(short.to_string(), id);
        self.long_names.insert(long.to_string(), id);
        self.definitions.insert(
            id,
            ParameterDefinition {
                short: short.to_string(),
                long: long.to_string(),
                options,
            },
        );
        debug!(short, long, "registered parameter");
        Ok(id)
    }

    /// Bind an additional short/long name pair to an existing definition.
    ///
    /// The reference is a short name. No new definition is created; the new
    /// names resolve to the referenced identity from now on.
    pub fn register_alias(&mut self, short: &str, long: &str, reference: &str) -> Result<()> {
        let id = self
            .short_names
            .get(reference)
            .copied()
            .ok_or_else(|| Error::NotFound {
                name: reference.to_string(),
            })?;
        self.short_names.insert(short.to_string(), id);
        self.long_names.insert(long.to_string(), id);
        debug!(short, long, reference, "registered alias");
        Ok(())
    }

    /// Remove the definition resolved by `short` along with every name bound
    /// to its identity.
    ///
    /// With `cascade`, every remaining definition whose `depends_on` set
    /// names a removed parameter is removed as well, repeatedly, until no
    /// more removals occur.
    pub fn unregister(&mut self, short: &str, cascade: bool) -> Result<()> {
        let id = self
            .short_names
            .get(short)
            .copied()
            .ok_or_else(|| Error::NotFound {
                name: short.to_string(),
            })?;

        // Names bound to the removed identity, aliases included; the cascade
        // matches depends_on entries against these.
        let mut removed_names = self.short_names_of(id);
        self.remove_definition(id);

        if !cascade {
            return Ok(());
        }

        loop {
            let dependents: Vec<ParameterId> = self
                .definitions
                .iter()
                .filter(|(_, definition)| {
                    definition
                        .options
                        .depends_on
                        .iter()
                        .any(|name| removed_names.contains(name))
                })
                .map(|(&dependent, _)| dependent)
                .collect();
            if dependents.is_empty() {
                break;
            }
            for dependent in dependents {
                debug!(?dependent, "cascade removes dependent parameter");
                removed_names.extend(self.short_names_of(dependent));
                self.remove_definition(dependent);
            }
        }
        Ok(())
    }

    /// Map a short or long name to its definition, trying short first.
    pub fn resolve(&self, name: &str) -> Result<&ParameterDefinition> {
        self.lookup(name)
            .and_then(|id| self.definition(id))
            .ok_or_else(|| Error::NotFound {
                name: name.to_string(),
            })
    }

    pub fn lookup_short(&self, name: &str) -> Option<ParameterId> {
        self.short_names.get(name).copied()
    }

    pub fn lookup_long(&self, name: &str) -> Option<ParameterId> {
        self.long_names.get(name).copied()
    }

    /// Bare-name lookup: short map first, then long.
    pub fn lookup(&self, name: &str) -> Option<ParameterId> {
        self.lookup_short(name).or_else(|| self.lookup_long(name))
    }

    pub fn definition(&self, id: ParameterId) -> Option<&ParameterDefinition> {
        self.definitions.get(&id)
    }

    /// Help listing in registration order.
    ///
    /// Each entry pairs the `-<short> / --<long>` label with the short or
    /// long help text. A filter selects the single definition whose short or
    /// long name equals it.
    pub fn help_entries(
        &self,
        use_long_text: bool,
        name_filter: Option<&str>,
    ) -> Vec<(String, String)> {
        self.definitions
            .values()
            .filter(|definition| {
                name_filter
                    .map(|name| definition.short == name || definition.long == name)
                    .unwrap_or(true)
            })
            .map(|definition| {
                let text = if use_long_text {
                    definition.options.help_long.clone()
                } else {
                    definition.options.help_short.clone()
                };
                (definition.label(), text)
            })
            .collect()
    }

    /// All short names currently bound to an identity, canonical and alias.
    fn short_names_of(&self, id: ParameterId) -> Vec<String> {
        self.short_names
            .iter()
            .filter(|&(_, &bound)| bound == id)
            .map(|(name, _)| name.clone())
            .collect()
    }

    fn remove_definition(&mut self, id: ParameterId) {
        self.definitions.remove(&id);
        self.short_names.retain(|_, bound| *bound != id);
        self.long_names.retain(|_, bound| *bound != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::ParameterType;

    fn flag() -> ParameterOptions {
        ParameterOptions::new()
    }

    #[test]
    fn test_short_and_long_resolve_to_the_same_identity() {
        let mut registry = ParameterRegistry::new();
        registry.register("s", "size", flag()).unwrap();

        let by_short = registry.lookup("s").unwrap();
        let by_long = registry.lookup("size").unwrap();
        assert_eq!(by_short, by_long);
    }

    #[test]
    fn test_resolve_unknown_name_fails() {
        let registry = ParameterRegistry::new();
        assert_eq!(
            registry.resolve("missing").unwrap_err(),
            Error::NotFound {
                name: "missing".to_string(),
            }
        );
    }

    #[test]
    fn test_alias_binds_to_the_referenced_identity() {
        let mut registry = ParameterRegistry::new();
        let id = registry.register("s", "size", flag()).unwrap();
        registry.register_alias("z", "zize", "s").unwrap();

        assert_eq!(registry.lookup("z"), Some(id));
        assert_eq!(registry.lookup("zize"), Some(id));
        // No second definition was created.
        assert_eq!(registry.help_entries(false, None).len(), 1);
    }

    #[test]
    fn test_alias_to_unknown_reference_fails() {
        let mut registry = ParameterRegistry::new();
        let err = registry.register_alias("z", "zize", "nope").unwrap_err();
        assert_eq!(
            err,
            Error::NotFound {
                name: "nope".to_string(),
            }
        );
    }

    #[test]
    fn test_reregistration_silently_replaces() {
        let mut registry = ParameterRegistry::new();
        let first = registry
            .register("s", "size", flag().typed(ParameterType::Int))
            .unwrap();
        let second = registry
            .register("s", "size", flag().typed(ParameterType::String))
            .unwrap();

        assert_ne!(first, second);
        assert_eq!(registry.lookup("s"), Some(second));
        assert_eq!(registry.lookup("size"), Some(second));
        assert_eq!(
            registry.resolve("s").unwrap().options.parameter_type,
            ParameterType::String
        );
        assert_eq!(registry.help_entries(false, None).len(), 1);
    }

    #[test]
    fn test_reregistration_drops_aliases_of_the_displaced_definition() {
        let mut registry = ParameterRegistry::new();
        registry.register("s", "size", flag()).unwrap();
        registry.register_alias("z", "zize", "s").unwrap();
        registry.register("s", "size", flag()).unwrap();

        assert_eq!(registry.lookup("z"), None);
        assert_eq!(registry.lookup("zize"), None);
    }

    #[test]
    fn test_unregister_unknown_name_fails() {
        let mut registry = ParameterRegistry::new();
        assert!(registry.unregister("ghost", false).is_err());
    }

    #[test]
    fn test_unregister_removes_all_name_bindings() {
        let mut registry = ParameterRegistry::new();
        registry.register("s", "size", flag()).unwrap();
        registry.register_alias("z", "zize", "s").unwrap();
        registry.unregister("s", false).unwrap();

        assert_eq!(registry.lookup("s"), None);
        assert_eq!(registry.lookup("size"), None);
        assert_eq!(registry.lookup("z"), None);
        assert_eq!(registry.lookup("zize"), None);
    }

    #[test]
    fn test_cascade_removes_transitive_dependents() {
        let mut registry = ParameterRegistry::new();
        registry.register("a", "alpha", flag()).unwrap();
        registry.register("b", "beta", flag().requires("a")).unwrap();
        registry.register("c", "gamma", flag().requires("b")).unwrap();
        registry.register("d", "delta", flag()).unwrap();

        registry.unregister("a", true).unwrap();

        assert_eq!(registry.lookup("b"), None);
        assert_eq!(registry.lookup("c"), None);
        assert!(registry.lookup("d").is_some());
    }

    #[test]
    fn test_unregister_without_cascade_keeps_dependents() {
        let mut registry = ParameterRegistry::new();
        registry.register("a", "alpha", flag()).unwrap();
        registry.register("b", "beta", flag().requires("a")).unwrap();

        registry.unregister("a", false).unwrap();
        assert!(registry.lookup("b").is_some());
    }

    #[test]
    fn test_cascade_follows_alias_names() {
        let mut registry = ParameterRegistry::new();
        registry.register("a", "alpha", flag()).unwrap();
        registry.register_alias("x", "ex", "a").unwrap();
        // Depends on the alias, not the canonical short name.
        registry.register("b", "beta", flag().requires("x")).unwrap();

        registry.unregister("a", true).unwrap();
        assert_eq!(registry.lookup("b"), None);
    }

    #[test]
    fn test_default_is_validated_at_registration() {
        let mut registry = ParameterRegistry::new();
        let err = registry
            .register(
                "p",
                "port",
                flag().typed(ParameterType::Int).default_value("abc"),
            )
            .unwrap_err();
        assert!(matches!(err, Error::TypeViolation { .. }));
        // The failed registration left nothing behind.
        assert_eq!(registry.lookup("p"), None);
    }

    #[test]
    fn test_help_entries_follow_registration_order() {
        let mut registry = ParameterRegistry::new();
        registry
            .register("s", "size", flag().help("the size", "detailed size text"))
            .unwrap();
        registry
            .register("f", "file", flag().help("a file", "detailed file text"))
            .unwrap();

        let entries = registry.help_entries(false, None);
        assert_eq!(
            entries,
            vec![
                ("-s / --size".to_string(), "the size".to_string()),
                ("-f / --file".to_string(), "a file".to_string()),
            ]
        );

        let detailed = registry.help_entries(true, Some("file"));
        assert_eq!(
            detailed,
            vec![("-f / --file".to_string(), "detailed file text".to_string())]
        );
    }
}
