//! Rule to route wall-clock reads through the unified time source.
//!
//! # Detected Patterns
//!
//! - `Date.now()`, anywhere in the file, including function bodies
//!
//! # Allowed Patterns
//!
//! - `new Date()`, `Date.parse(...)`, `performance.now()`
//! - Computed access such as `Date["now"]()`
//! - Any file matching `allowFilesPattern`
//!
//! # Configuration
//!
//! - `allowFilesPattern`: exemption regex (default: `(tests|scripts|ui)/`)

use coreguard_core::utils::member_call;
use coreguard_core::{
    AllowListPattern, ConfigError, NodeKind, Rule, RuleBox, RuleCategory, RuleContext,
    RuleDescriptor, RuleDocs, RuleEntry, RuleOptions, Suggestion, VisitorTable,
};

use crate::common::{ALLOW_FILES_OPTION, ALLOW_FILES_PATTERN};

/// Rule code for prefer-unified-time.
pub const CODE: &str = "CG002";

/// Rule name for prefer-unified-time.
pub const NAME: &str = "prefer-unified-time";

const MESSAGE_ID: &str = "preferUnifiedTime";

/// Metadata of prefer-unified-time.
pub static DESCRIPTOR: RuleDescriptor = RuleDescriptor {
    id: NAME,
    code: CODE,
    category: RuleCategory::Suggestion,
    docs: RuleDocs {
        description: "Requires the unified time source instead of Date.now()",
        recommended: true,
    },
    messages: &[(
        MESSAGE_ID,
        "Use the unified time source instead of Date.now()",
    )],
    schema: &[ALLOW_FILES_OPTION],
};

/// Registry entry for prefer-unified-time.
pub static ENTRY: RuleEntry = RuleEntry::new(&DESCRIPTOR, factory);

fn factory(options: &RuleOptions) -> Result<RuleBox, ConfigError> {
    Ok(Box::new(PreferUnifiedTime::from_options(options)?))
}

/// Flags direct `Date.now()` calls.
#[derive(Debug, Clone)]
pub struct PreferUnifiedTime {
    /// Files this rule does not apply to.
    pub allow_files: AllowListPattern,
}

impl PreferUnifiedTime {
    /// Builds the rule from resolved options.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingOption`] if `options` were not resolved
    /// against this rule's schema.
    pub fn from_options(options: &RuleOptions) -> Result<Self, ConfigError> {
        Ok(Self {
            allow_files: options.allow_list(ALLOW_FILES_PATTERN)?,
        })
    }

    /// Builds the rule with default options.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the default pattern does not compile.
    pub fn with_defaults() -> Result<Self, ConfigError> {
        Self::from_options(&RuleOptions::defaults(NAME, DESCRIPTOR.schema)?)
    }
}

impl Rule for PreferUnifiedTime {
    fn descriptor(&self) -> &'static RuleDescriptor {
        &DESCRIPTOR
    }

    fn create<'r>(&'r self, ctx: &RuleContext<'_>) -> VisitorTable<'r> {
        if self.allow_files.matches(ctx.relative_path()) {
            return VisitorTable::new();
        }
        VisitorTable::new().on(NodeKind::CallExpression, |ctx, node| {
            if member_call(node)? != Some(("Date", "now")) {
                return Ok(());
            }
            ctx.report_with(node, MESSAGE_ID, |v| {
                v.with_suggestion(Suggestion::new("Read the time from the shared clock module"))
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::testing::{run, run_configured};

    fn rule() -> PreferUnifiedTime {
        PreferUnifiedTime::with_defaults().unwrap()
    }

    #[test]
    fn detects_date_now() {
        let src = "export function stamp() {\n  return Date.now();\n}\n";
        let violations = run(rule(), "coreagent/clock.ts", src);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].rule, "prefer-unified-time");
        assert_eq!(
            (violations[0].location.line, violations[0].location.column),
            (2, 10)
        );
    }

    #[test]
    fn allows_scripts_dir() {
        let src = "console.log(Date.now());\n";
        assert!(run(rule(), "scripts/clock.ts", src).is_empty());
    }

    #[test]
    fn allows_nested_exempt_dir() {
        let src = "const t = Date.now();\n";
        assert!(run(rule(), "packages/web/ui/clock.ts", src).is_empty());
    }

    #[test]
    fn reports_every_call() {
        let src = "const a = Date.now();\nconst b = () => Date.now() - a;\n";
        assert_eq!(run(rule(), "coreagent/clock.ts", src).len(), 2);
    }

    #[test]
    fn ignores_other_time_apis() {
        let src = "\
const a = new Date();
const b = Date.parse('2024-01-01');
const c = performance.now();
const d = clock.Date.now();
const e = Date['now']();
";
        assert!(run(rule(), "coreagent/clock.ts", src).is_empty());
    }

    #[test]
    fn custom_pattern() {
        let config = "[rules.prefer-unified-time]\nallowFilesPattern = \"clock\\\\.ts$\"\n";
        let src = "const t = Date.now();\n";
        assert!(run_configured(ENTRY, config, "coreagent/clock.ts", src).is_empty());
        assert_eq!(
            run_configured(ENTRY, config, "scripts/tick.ts", src).len(),
            1
        );
    }

    #[test]
    fn message_snapshot() {
        let violations = run(rule(), "coreagent/clock.ts", "const t = Date.now();\n");
        insta::assert_snapshot!(
            violations[0].to_string(),
            @"coreagent/clock.ts:1:11: warning [CG002] Use the unified time source instead of Date.now()"
        );
    }
}
