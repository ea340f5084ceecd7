//! Rule to route identifier generation through the unified id generator.
//!
//! # Detected Patterns
//!
//! - `Math.random()` in a file whose text mentions an identifier keyword
//!   (`id`, `Id`, `ID`, `messageId`, `sessionId`, `requestId`, `error_`)
//!
//! The keyword gate is file-wide: a single `sessionId` anywhere in the file
//! makes every `Math.random()` call in it reportable, and a file without any
//! keyword is never reported.
//!
//! # Configuration
//!
//! - `allowFilesPattern`: exemption regex (default: `(tests|scripts|ui)/`)

use coreguard_core::utils::member_call;
use coreguard_core::{
    AllowListPattern, ConfigError, NodeKind, Rule, RuleBox, RuleCategory, RuleContext,
    RuleDescriptor, RuleDocs, RuleEntry, RuleOptions, Suggestion, VisitorTable,
};
use regex::Regex;
use tracing::trace;

use crate::common::{ALLOW_FILES_OPTION, ALLOW_FILES_PATTERN};

/// Rule code for prefer-unified-id.
pub const CODE: &str = "CG003";

/// Rule name for prefer-unified-id.
pub const NAME: &str = "prefer-unified-id";

/// File content that marks a file as generating identifiers.
pub const ID_KEYWORDS: &str = "id|Id|ID|messageId|sessionId|requestId|error_";

const MESSAGE_ID: &str = "preferUnifiedId";

/// Metadata of prefer-unified-id.
pub static DESCRIPTOR: RuleDescriptor = RuleDescriptor {
    id: NAME,
    code: CODE,
    category: RuleCategory::Suggestion,
    docs: RuleDocs {
        description: "Requires the unified id generator instead of Math.random()",
        recommended: true,
    },
    messages: &[(
        MESSAGE_ID,
        "Use the unified id generator instead of Math.random()",
    )],
    schema: &[ALLOW_FILES_OPTION],
};

/// Registry entry for prefer-unified-id.
pub static ENTRY: RuleEntry = RuleEntry::new(&DESCRIPTOR, factory);

fn factory(options: &RuleOptions) -> Result<RuleBox, ConfigError> {
    Ok(Box::new(PreferUnifiedId::from_options(options)?))
}

/// Flags `Math.random()` in files that deal with identifiers.
#[derive(Debug, Clone)]
pub struct PreferUnifiedId {
    /// Files this rule does not apply to.
    pub allow_files: AllowListPattern,
    keywords: Regex,
}

impl PreferUnifiedId {
    /// Builds the rule from resolved options.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingOption`] if `options` were not resolved
    /// against this rule's schema.
    pub fn from_options(options: &RuleOptions) -> Result<Self, ConfigError> {
        let keywords = Regex::new(ID_KEYWORDS).map_err(|source| ConfigError::InvalidPattern {
            rule: NAME.to_string(),
            option: "keywords".to_string(),
            source,
        })?;
        Ok(Self {
            allow_files: options.allow_list(ALLOW_FILES_PATTERN)?,
            keywords,
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

impl Rule for PreferUnifiedId {
    fn descriptor(&self) -> &'static RuleDescriptor {
        &DESCRIPTOR
    }

    fn create<'r>(&'r self, ctx: &RuleContext<'_>) -> VisitorTable<'r> {
        if self.allow_files.matches(ctx.relative_path()) {
            return VisitorTable::new();
        }
        if !self.keywords.is_match(ctx.content()) {
            trace!("{}: no id keywords", ctx.relative_path().display());
            return VisitorTable::new();
        }
        VisitorTable::new().on(NodeKind::CallExpression, |ctx, node| {
            if member_call(node)? != Some(("Math", "random")) {
                return Ok(());
            }
            ctx.report_with(node, MESSAGE_ID, |v| {
                v.with_suggestion(Suggestion::new(
                    "Generate identifiers with the shared id module",
                ))
            })
        })
    }
}
