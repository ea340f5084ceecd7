//! Explicit rule registry.
//!
//! Rules are registered as a typed list of (descriptor, factory) pairs.
//! Instantiation resolves each rule's options from [`Config`] against its
//! schema, so configuration errors surface once per rule, before any file is
//! read.

use tracing::debug;

use crate::config::{Config, ConfigError};
use crate::options::RuleOptions;
use crate::rule::{RuleBox, RuleDescriptor};

/// Builds a rule instance from resolved options.
pub type RuleFactory = fn(&RuleOptions) -> Result<RuleBox, ConfigError>;

/// One registered rule.
#[derive(Clone, Copy)]
pub struct RuleEntry {
    /// Rule metadata.
    pub descriptor: &'static RuleDescriptor,
    /// Rule constructor.
    pub factory: RuleFactory,
}

impl RuleEntry {
    /// Pairs a descriptor with its factory.
    #[must_use]
    pub const fn new(descriptor: &'static RuleDescriptor, factory: RuleFactory) -> Self {
        Self {
            descriptor,
            factory,
        }
    }

    /// Instantiates the rule with options taken from `config`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the configured options do not match the
    /// rule's schema.
    pub fn instantiate(&self, config: &Config) -> Result<RuleBox, ConfigError> {
        let d = self.descriptor;
        let options = RuleOptions::resolve(d.id, d.schema, config.rule_options(d.id))?;
        (self.factory)(&options)
    }
}

impl std::fmt::Debug for RuleEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleEntry")
            .field("id", &self.descriptor.id)
            .field("code", &self.descriptor.code)
            .finish_non_exhaustive()
    }
}

/// The set of rules available to a run.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: Vec<RuleEntry>,
}

impl Registry {
    /// Creates a registry from entries, in the given order.
    #[must_use]
    pub fn new(entries: Vec<RuleEntry>) -> Self {
        Self { entries }
    }

    /// All registered entries.
    #[must_use]
    pub fn entries(&self) -> &[RuleEntry] {
        &self.entries
    }

    /// Finds an entry by rule id or code.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&RuleEntry> {
        self.entries
            .iter()
            .find(|e| e.descriptor.id == name || e.descriptor.code == name)
    }

    /// Instantiates every rule that is enabled in `config`.
    ///
    /// When `only` is given, only the named rules (ids or codes) are
    /// considered.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownRule`] for unknown names in `only` or in
    /// the config's `[rules.*]` tables, and any option error of an enabled
    /// rule.
    pub fn instantiate_enabled(
        &self,
        config: &Config,
        only: Option<&[String]>,
    ) -> Result<Vec<RuleBox>, ConfigError> {
        let mut configured: Vec<&String> = config.rules.keys().collect();
        configured.sort();
        if let Some(unknown) = configured
            .into_iter()
            .find(|name| !self.entries.iter().any(|e| e.descriptor.id == name.as_str()))
        {
            return Err(ConfigError::UnknownRule {
                name: unknown.clone(),
            });
        }

        let selected: Vec<&RuleEntry> = match only {
            Some(names) => names
                .iter()
                .map(|n| {
                    self.find(n).ok_or_else(|| ConfigError::UnknownRule { name: n.clone() })
                })
                .collect::<Result<_, _>>()?,
            None => self.entries.iter().collect(),
        };

        let mut rules = Vec::new();
        for entry in selected {
            let id = entry.descriptor.id;
            if !config.is_rule_enabled(id) {
                debug!("Skipping disabled rule: {}", id);
                continue;
            }
            if rules.iter().any(|r: &RuleBox| r.name() == id) {
                continue;
            }
            rules.push(entry.instantiate(config)?);
        }
        Ok(rules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::RuleContext;
    use crate::options::{OptionDefault, OptionKind, OptionSpec};
    use crate::rule::{Rule, RuleCategory, RuleDocs, VisitorTable};

    static FLAG: RuleDescriptor = RuleDescriptor {
        id: "flag-rule",
        code: "T001",
        category: RuleCategory::Problem,
        docs: RuleDocs {
            description: "",
            recommended: true,
        },
        messages: &[],
        schema: &[OptionSpec {
            name: "strict",
            kind: OptionKind::Boolean,
            default: OptionDefault::Bool(false),
            description: "",
        }],
    };

    static PLAIN: RuleDescriptor = RuleDescriptor {
        id: "plain-rule",
        code: "T002",
        category: RuleCategory::Suggestion,
        docs: RuleDocs {
            description: "",
            recommended: true,
        },
        messages: &[],
        schema: &[],
    };

    struct Stub(&'static RuleDescriptor);

    impl Rule for Stub {
        fn descriptor(&self) -> &'static RuleDescriptor {
            self.0
        }

        fn create<'r>(&'r self, _ctx: &RuleContext<'_>) -> VisitorTable<'r> {
            VisitorTable::new()
        }
    }

    fn flag_factory(options: &RuleOptions) -> Result<RuleBox, ConfigError> {
        options.bool("strict")?;
        Ok(Box::new(Stub(&FLAG)))
    }

    fn plain_factory(_: &RuleOptions) -> Result<RuleBox, ConfigError> {
        Ok(Box::new(Stub(&PLAIN)))
    }

    fn registry() -> Registry {
        Registry::new(vec![
            RuleEntry::new(&FLAG, flag_factory),
            RuleEntry::new(&PLAIN, plain_factory),
        ])
    }

    fn names(rules: &[RuleBox]) -> Vec<&'static str> {
        rules.iter().map(|r| r.name()).collect()
    }

    #[test]
    fn instantiates_all_by_default() {
        let rules = registry()
            .instantiate_enabled(&Config::default(), None)
            .unwrap();
        assert_eq!(names(&rules), vec!["flag-rule", "plain-rule"]);
    }

    #[test]
    fn filter_accepts_ids_and_codes() {
        let only = vec!["T002".to_string(), "plain-rule".to_string()];
        let rules = registry()
            .instantiate_enabled(&Config::default(), Some(&only))
            .unwrap();
        assert_eq!(names(&rules), vec!["plain-rule"]);
    }

    #[test]
    fn disabled_rules_are_skipped() {
        let config = Config::parse("[rules.flag-rule]\nenabled = false\n").unwrap();
        let rules = registry().instantiate_enabled(&config, None).unwrap();
        assert_eq!(names(&rules), vec!["plain-rule"]);
    }

    #[test]
    fn unknown_rule_in_config_is_an_error() {
        let config = Config::parse("[rules.no-such-rule]\nenabled = true\n").unwrap();
        let err = registry().instantiate_enabled(&config, None).err().unwrap();
        assert!(matches!(err, ConfigError::UnknownRule { ref name } if name == "no-such-rule"));
    }

    #[test]
    fn unknown_rule_in_filter_is_an_error() {
        let only = vec!["CG999".to_string()];
        let err = registry()
            .instantiate_enabled(&Config::default(), Some(&only))
            .err().unwrap();
        assert!(matches!(err, ConfigError::UnknownRule { .. }));
    }

    #[test]
    fn bad_option_fails_once_at_activation() {
        let config = Config::parse("[rules.flag-rule]\nstrict = 3\n").unwrap();
        let err = registry().instantiate_enabled(&config, None).err().unwrap();
        assert!(matches!(err, ConfigError::InvalidOption { .. }));
    }
}
