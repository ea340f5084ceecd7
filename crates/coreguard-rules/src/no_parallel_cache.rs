//! Rule to forbid long-lived `Map` caches.
//!
//! # Rationale
//!
//! A `Map` held by a module-level binding or a class field lives as long as
//! the process or the instance. Such caches grow without bound and sit
//! outside the shared cache layer, which owns eviction.
//!
//! # Detected Patterns
//!
//! - `class Foo { cache = new Map(); }`
//! - `const cache = new Map<string, Session>();` at module level
//! - `new Map();` as a bare top-level statement
//!
//! # Allowed Patterns
//!
//! - `new Map()` inside a function, arrow function, or method (unless
//!   `allowLocal = false`)
//! - Any file matching `allowFilesPattern`
//!
//! # Configuration
//!
//! - `allowLocal`: exempt function-local construction (default: `true`)
//! - `allowFilesPattern`: exemption regex (default: `(tests|scripts|ui)/`)

use coreguard_core::utils::new_callee_name;
use coreguard_core::{
    classify, retaining_holder, AllowListPattern, ConfigError, Label, NodeKind, NodeRef,
    OptionDefault, OptionKind, OptionSpec, Rule, RuleBox, RuleCategory, RuleContext,
    RuleDescriptor, RuleDocs, RuleEntry, RuleOptions, ScopeClassification, Suggestion,
    VisitFault, VisitorTable,
};

use crate::common::{ALLOW_FILES_OPTION, ALLOW_FILES_PATTERN};

/// Rule code for no-parallel-cache.
pub const CODE: &str = "CG001";

/// Rule name for no-parallel-cache.
pub const NAME: &str = "no-parallel-cache";

const MESSAGE_ID: &str = "noParallelCache";

const ALLOW_LOCAL: &str = "allowLocal";

/// Metadata of no-parallel-cache.
pub static DESCRIPTOR: RuleDescriptor = RuleDescriptor {
    id: NAME,
    code: CODE,
    category: RuleCategory::Problem,
    docs: RuleDocs {
        description: "Forbids module- and instance-scoped Map caches",
        recommended: true,
    },
    messages: &[(
        MESSAGE_ID,
        "Long-lived Map cache outside the shared cache layer",
    )],
    schema: &[
        OptionSpec {
            name: ALLOW_LOCAL,
            kind: OptionKind::Boolean,
            default: OptionDefault::Bool(true),
            description: "Allow Map construction inside function bodies",
        },
        ALLOW_FILES_OPTION,
    ],
};

/// Registry entry for no-parallel-cache.
pub static ENTRY: RuleEntry = RuleEntry::new(&DESCRIPTOR, factory);

fn factory(options: &RuleOptions) -> Result<RuleBox, ConfigError> {
    Ok(Box::new(NoParallelCache::from_options(options)?))
}

/// Forbids `new Map()` whose result outlives a single call.
#[derive(Debug, Clone)]
pub struct NoParallelCache {
    /// Whether function-local construction is allowed.
    pub allow_local: bool,
    /// Files this rule does not apply to.
    pub allow_files: AllowListPattern,
}

impl NoParallelCache {
    /// Builds the rule from resolved options.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingOption`] if `options` were not resolved
    /// against this rule's schema.
    pub fn from_options(options: &RuleOptions) -> Result<Self, ConfigError> {
        Ok(Self {
            allow_local: options.bool(ALLOW_LOCAL)?,
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

    /// Sets whether function-local construction is allowed.
    #[must_use]
    pub fn allow_local(mut self, allow: bool) -> Self {
        self.allow_local = allow;
        self
    }

    fn check(&self, ctx: &mut RuleContext<'_>, node: NodeRef<'_>) -> Result<(), VisitFault> {
        if new_callee_name(node)? != Some("Map") {
            return Ok(());
        }
        if self.allow_local && classify(node) == ScopeClassification::Local {
            return Ok(());
        }

        let label = retaining_holder(node).map(|holder| {
            let what = match holder.kind() {
                NodeKind::ClassField => "retained by this class field",
                _ => "retained by this module-level binding",
            };
            Label::new(ctx.location(holder), what)
        });

        ctx.report_with(node, MESSAGE_ID, |v| {
            let v = v.with_suggestion(Suggestion::new(
                "Obtain the cache from the shared cache manager",
            ));
            match label {
                Some(label) => v.with_label(label),
                None => v,
            }
        })
    }
}

impl Rule for NoParallelCache {
    fn descriptor(&self) -> &'static RuleDescriptor {
        &DESCRIPTOR
    }

    fn create<'r>(&'r self, ctx: &RuleContext<'_>) -> VisitorTable<'r> {
        if self.allow_files.matches(ctx.relative_path()) {
            return VisitorTable::new();
        }
        VisitorTable::new().on(NodeKind::NewExpression, move |ctx, node| self.check(ctx, node))
    }
}
