//! Pieces shared by the built-in rules.

use coreguard_core::{OptionDefault, OptionKind, OptionSpec, DEFAULT_ALLOW_FILES_PATTERN};

/// Option key of the exemption pattern.
pub const ALLOW_FILES_PATTERN: &str = "allowFilesPattern";

/// Schema entry for [`ALLOW_FILES_PATTERN`], accepted by every built-in rule.
pub const ALLOW_FILES_OPTION: OptionSpec = OptionSpec {
    name: ALLOW_FILES_PATTERN,
    kind: OptionKind::Regex,
    default: OptionDefault::Str(DEFAULT_ALLOW_FILES_PATTERN),
    description: "Path regex of files the rule does not apply to",
};
