//! Path-based exemption zones.

use regex::Regex;
use std::path::Path;

use crate::utils::paths::to_slash;

/// Default exemption pattern: test, script, and UI code may keep ad-hoc
/// caches, read the clock, and roll random ids.
pub const DEFAULT_ALLOW_FILES_PATTERN: &str = "(tests|scripts|ui)/";

/// Regular expression deciding whether a rule applies to a file.
///
/// The pattern is unanchored and matched against the file path relative to
/// the analysis root, rendered with `/` separators.
#[derive(Debug, Clone)]
pub struct AllowListPattern {
    regex: Regex,
}

impl AllowListPattern {
    /// Compiles a pattern.
    ///
    /// # Errors
    ///
    /// Returns the regex error if `pattern` is not a valid expression.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Regex::new(pattern).map(|regex| Self { regex })
    }

    /// Returns the source pattern.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Returns true if `path` lies in an exemption zone.
    #[must_use]
    pub fn matches(&self, path: &Path) -> bool {
        self.regex.is_match(&to_slash(path))
    }
}

impl From<Regex> for AllowListPattern {
    fn from(regex: Regex) -> Self {
        Self { regex }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_pattern() -> AllowListPattern {
        AllowListPattern::new(DEFAULT_ALLOW_FILES_PATTERN).unwrap()
    }

    #[test]
    fn default_exempts_tests_scripts_ui() {
        let p = default_pattern();
        assert!(p.matches(Path::new("tests/foo.ts")));
        assert!(p.matches(Path::new("scripts/clock.ts")));
        assert!(p.matches(Path::new("packages/web/ui/panel.tsx")));
        assert!(!p.matches(Path::new("coreagent/foo.ts")));
    }

    #[test]
    fn default_requires_directory_separator() {
        let p = default_pattern();
        assert!(!p.matches(Path::new("coreagent/tests.ts")));
        assert!(!p.matches(Path::new("ui.ts")));
    }

    #[test]
    fn custom_pattern_overrides_default() {
        let p = AllowListPattern::new("^bench/").unwrap();
        assert!(p.matches(Path::new("bench/a.ts")));
        assert!(!p.matches(Path::new("tests/a.ts")));
        assert_eq!(p.as_str(), "^bench/");
    }

    #[test]
    fn invalid_pattern_is_rejected() {
        assert!(AllowListPattern::new("(tests").is_err());
    }
}
