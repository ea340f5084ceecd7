//! The built-in rule registry.

use coreguard_core::{Registry, RuleEntry};

use crate::{no_parallel_cache, prefer_unified_id, prefer_unified_time};

/// Registry entries of every built-in rule, in code order.
#[must_use]
pub fn builtin_entries() -> Vec<RuleEntry> {
    vec![
        no_parallel_cache::ENTRY,
        prefer_unified_time::ENTRY,
        prefer_unified_id::ENTRY,
    ]
}

/// Returns a registry holding every built-in rule.
#[must_use]
pub fn builtin_registry() -> Registry {
    Registry::new(builtin_entries())
}

/// Returns the entries marked as recommended.
#[must_use]
pub fn recommended_entries() -> Vec<RuleEntry> {
    builtin_entries()
        .into_iter()
        .filter(|e| e.descriptor.docs.recommended)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use coreguard_core::{Config, ConfigError};

    #[test]
    fn test_codes_are_unique_and_ordered() {
        let codes: Vec<_> = builtin_entries().iter().map(|e| e.descriptor.code).collect();
        assert_eq!(codes, vec!["CG001", "CG002", "CG003"]);
    }

    #[test]
    fn test_every_rule_accepts_allow_files_pattern() {
        for entry in builtin_entries() {
            assert!(
                entry.descriptor.option("allowFilesPattern").is_some(),
                "{} lacks allowFilesPattern",
                entry.descriptor.id
            );
        }
    }

    #[test]
    fn test_default_config_instantiates_all() {
        let rules = builtin_registry()
            .instantiate_enabled(&Config::default(), None)
            .unwrap();
        assert_eq!(rules.len(), 3);
    }

    #[test]
    fn test_find_by_code() {
        let registry = builtin_registry();
        assert_eq!(
            registry.find("CG002").map(|e| e.descriptor.id),
            Some("prefer-unified-time")
        );
    }

    #[test]
    fn test_invalid_regex_fails_at_activation() {
        let config = Config::parse("[rules.prefer-unified-id]\nallowFilesPattern = \"(\"\n").unwrap();
        let err = builtin_registry()
            .instantiate_enabled(&config, None)
            .err()
            .unwrap();
        assert!(matches!(
            err,
            ConfigError::InvalidPattern { ref rule, .. } if rule == "prefer-unified-id"
        ));
    }

    #[test]
    fn test_allow_local_is_cache_only() {
        let config = Config::parse("[rules.prefer-unified-time]\nallowLocal = true\n").unwrap();
        let err = builtin_registry()
            .instantiate_enabled(&config, None)
            .err()
            .unwrap();
        assert!(matches!(err, ConfigError::UnknownOption { .. }));
    }

    #[test]
    fn test_wrong_option_type() {
        let config = Config::parse("[rules.no-parallel-cache]\nallowLocal = \"yes\"\n").unwrap();
        let err = builtin_registry()
            .instantiate_enabled(&config, None)
            .err()
            .unwrap();
        assert!(matches!(err, ConfigError::InvalidOption { .. }));
    }

    #[test]
    fn test_recommended_entries() {
        assert_eq!(recommended_entries().len(), builtin_entries().len());
    }
}
