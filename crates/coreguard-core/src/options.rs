//! Rule option schemas and their resolved values.

use regex::Regex;
use std::collections::{BTreeMap, HashMap};

use crate::classifier::AllowListPattern;
use crate::config::ConfigError;

/// Type of an option value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    /// `true` / `false`.
    Boolean,
    /// String that must compile as a regular expression.
    Regex,
}

impl std::fmt::Display for OptionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Boolean => write!(f, "boolean"),
            Self::Regex => write!(f, "regex"),
        }
    }
}

/// Default value of an option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionDefault {
    /// Boolean default.
    Bool(bool),
    /// Regex source default.
    Str(&'static str),
}

impl std::fmt::Display for OptionDefault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Str(s) => write!(f, "\"{s}\""),
        }
    }
}

/// One entry of a rule's option schema.
#[derive(Debug, Clone, Copy)]
pub struct OptionSpec {
    /// Option key as written in config (e.g. `allowLocal`).
    pub name: &'static str,
    /// Value type.
    pub kind: OptionKind,
    /// Value used when the key is absent.
    pub default: OptionDefault,
    /// One-line description.
    pub description: &'static str,
}

/// A resolved option value.
#[derive(Debug, Clone)]
pub enum OptionValue {
    /// Boolean value.
    Bool(bool),
    /// Compiled regular expression.
    Regex(Regex),
}

/// Parsed-and-defaulted option values of one rule instance.
#[derive(Debug, Clone)]
pub struct RuleOptions {
    rule: &'static str,
    values: BTreeMap<&'static str, OptionValue>,
}

impl RuleOptions {
    /// Validates `raw` against `schema` and fills in defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownOption`] for keys absent from the schema,
    /// [`ConfigError::InvalidOption`] for values of the wrong type, and
    /// [`ConfigError::InvalidPattern`] for regex options that do not compile.
    pub fn resolve(
        rule: &'static str,
        schema: &'static [OptionSpec],
        raw: Option<&HashMap<String, toml::Value>>,
    ) -> Result<Self, ConfigError> {
        if let Some(raw) = raw {
            let mut keys: Vec<&String> = raw.keys().collect();
            keys.sort();
            if let Some(unknown) = keys
                .into_iter()
                .find(|k| !schema.iter().any(|s| s.name == k.as_str()))
            {
                return Err(ConfigError::UnknownOption {
                    rule: rule.to_string(),
                    option: unknown.clone(),
                });
            }
        }

        let mut values = BTreeMap::new();
        for opt in schema {
            let value = match raw.and_then(|r| r.get(opt.name)) {
                Some(v) => Self::convert(rule, opt, v)?,
                None => Self::default_value(rule, opt)?,
            };
            values.insert(opt.name, value);
        }

        Ok(Self { rule, values })
    }

    /// Resolves the schema defaults alone.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPattern`] if a default regex is invalid.
    pub fn defaults(rule: &'static str, schema: &'static [OptionSpec]) -> Result<Self, ConfigError> {
        Self::resolve(rule, schema, None)
    }

    fn convert(
        rule: &'static str,
        opt: &OptionSpec,
        value: &toml::Value,
    ) -> Result<OptionValue, ConfigError> {
        let invalid = || ConfigError::InvalidOption {
            rule: rule.to_string(),
            option: opt.name.to_string(),
            expected: opt.kind,
            found: value.type_str().to_string(),
        };
        match opt.kind {
            OptionKind::Boolean => value.as_bool().map(OptionValue::Bool).ok_or_else(invalid),
            OptionKind::Regex => {
                let pattern = value.as_str().ok_or_else(invalid)?;
                Self::compile(rule, opt, pattern)
            }
        }
    }

    fn default_value(rule: &'static str, opt: &OptionSpec) -> Result<OptionValue, ConfigError> {
        match (opt.kind, opt.default) {
            (OptionKind::Regex, OptionDefault::Str(pattern)) => Self::compile(rule, opt, pattern),
            (OptionKind::Boolean, OptionDefault::Bool(b)) => Ok(OptionValue::Bool(b)),
            (expected, default) => Err(ConfigError::InvalidOption {
                rule: rule.to_string(),
                option: opt.name.to_string(),
                expected,
                found: format!("default {default}"),
            }),
        }
    }

    fn compile(
        rule: &'static str,
        opt: &OptionSpec,
        pattern: &str,
    ) -> Result<OptionValue, ConfigError> {
        Regex::new(pattern)
            .map(OptionValue::Regex)
            .map_err(|source| ConfigError::InvalidPattern {
                rule: rule.to_string(),
                option: opt.name.to_string(),
                source,
            })
    }

    /// Rule these options belong to.
    #[must_use]
    pub fn rule(&self) -> &'static str {
        self.rule
    }

    /// Gets a resolved value.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.values.get(name)
    }

    /// Gets a boolean option.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingOption`] if the schema has no boolean
    /// option of that name.
    pub fn bool(&self, name: &str) -> Result<bool, ConfigError> {
        match self.get(name) {
            Some(OptionValue::Bool(b)) => Ok(*b),
            _ => Err(self.missing(name)),
        }
    }

    /// Gets a regex option as an exemption pattern.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingOption`] if the schema has no regex
    /// option of that name.
    pub fn allow_list(&self, name: &str) -> Result<AllowListPattern, ConfigError> {
        match self.get(name) {
            Some(OptionValue::Regex(re)) => Ok(AllowListPattern::from(re.clone())),
            _ => Err(self.missing(name)),
        }
    }

    fn missing(&self, name: &str) -> ConfigError {
        ConfigError::MissingOption {
            rule: self.rule.to_string(),
            option: name.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    static SCHEMA: &[OptionSpec] = &[
        OptionSpec {
            name: "allowLocal",
            kind: OptionKind::Boolean,
            default: OptionDefault::Bool(true),
            description: "",
        },
        OptionSpec {
            name: "allowFilesPattern",
            kind: OptionKind::Regex,
            default: OptionDefault::Str("(tests|scripts|ui)/"),
            description: "",
        },
    ];

    fn raw(toml_src: &str) -> HashMap<String, toml::Value> {
        toml::from_str(toml_src).unwrap()
    }

    #[test]
    fn defaults_fill_every_option() {
        let opts = RuleOptions::defaults("r", SCHEMA).unwrap();
        assert!(opts.bool("allowLocal").unwrap());
        let allow = opts.allow_list("allowFilesPattern").unwrap();
        assert!(allow.matches(Path::new("tests/a.ts")));
    }

    #[test]
    fn overrides_replace_defaults() {
        let raw = raw("allowLocal = false\nallowFilesPattern = \"^gen/\"");
        let opts = RuleOptions::resolve("r", SCHEMA, Some(&raw)).unwrap();
        assert!(!opts.bool("allowLocal").unwrap());
        let allow = opts.allow_list("allowFilesPattern").unwrap();
        assert!(allow.matches(Path::new("gen/a.ts")));
        assert!(!allow.matches(Path::new("tests/a.ts")));
    }

    #[test]
    fn wrong_type_is_rejected() {
        let raw = raw("allowLocal = \"yes\"");
        let err = RuleOptions::resolve("r", SCHEMA, Some(&raw)).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidOption { ref option, expected: OptionKind::Boolean, .. }
                if option == "allowLocal"
        ));
    }

    #[test]
    fn invalid_regex_is_rejected() {
        let raw = raw("allowFilesPattern = \"(tests\"");
        let err = RuleOptions::resolve("r", SCHEMA, Some(&raw)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPattern { .. }));
    }

    #[test]
    fn unknown_option_is_rejected() {
        let raw = raw("allowGlobal = true");
        let err = RuleOptions::resolve("r", SCHEMA, Some(&raw)).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownOption { ref option, .. } if option == "allowGlobal"));
    }

    #[test]
    fn mismatched_default_is_rejected() {
        static BROKEN: &[OptionSpec] = &[OptionSpec {
            name: "allowLocal",
            kind: OptionKind::Boolean,
            default: OptionDefault::Str("yes"),
            description: "",
        }];
        let err = RuleOptions::defaults("r", BROKEN).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidOption { expected: OptionKind::Boolean, ref found, .. }
                if found == "default \"yes\""
        ));
    }

    #[test]
    fn missing_accessor_type_is_an_error() {
        let opts = RuleOptions::defaults("r", SCHEMA).unwrap();
        assert!(opts.allow_list("allowLocal").is_err());
        assert!(opts.bool("nope").is_err());
    }
}
