//! Rule contract: descriptors, visitor tables, and the [`Rule`] trait.

use serde::{Deserialize, Serialize};

use crate::context::RuleContext;
use crate::options::OptionSpec;
use crate::syntax::{NodeKind, NodeRef};
use crate::types::Severity;

/// What kind of finding a rule produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleCategory {
    /// Code that breaks an architectural invariant.
    Problem,
    /// Code that should move to a centralized facility.
    Suggestion,
}

impl RuleCategory {
    /// Severity used when the configuration does not override it.
    #[must_use]
    pub fn default_severity(self) -> Severity {
        match self {
            Self::Problem => Severity::Error,
            Self::Suggestion => Severity::Warning,
        }
    }
}

impl std::fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Problem => write!(f, "problem"),
            Self::Suggestion => write!(f, "suggestion"),
        }
    }
}

/// Documentation metadata of a rule.
#[derive(Debug, Clone, Copy)]
pub struct RuleDocs {
    /// One-line description.
    pub description: &'static str,
    /// Whether the rule belongs to the recommended preset.
    pub recommended: bool,
}

/// Immutable metadata of a rule.
#[derive(Debug)]
pub struct RuleDescriptor {
    /// Kebab-case rule id (e.g. `no-parallel-cache`).
    pub id: &'static str,
    /// Short rule code (e.g. `CG001`).
    pub code: &'static str,
    /// Finding category.
    pub category: RuleCategory,
    /// Documentation.
    pub docs: RuleDocs,
    /// Message templates keyed by message id.
    pub messages: &'static [(&'static str, &'static str)],
    /// Accepted options.
    pub schema: &'static [OptionSpec],
}

impl RuleDescriptor {
    /// Looks up a message template.
    #[must_use]
    pub fn message(&self, message_id: &str) -> Option<&'static str> {
        self.messages
            .iter()
            .find(|(id, _)| *id == message_id)
            .map(|(_, template)| *template)
    }

    /// Looks up an option definition.
    #[must_use]
    pub fn option(&self, name: &str) -> Option<&'static OptionSpec> {
        self.schema.iter().find(|o| o.name == name)
    }
}

/// A handler failure confined to a single node visit.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VisitFault {
    /// The handler reported a message id its descriptor does not declare.
    #[error("rule `{rule}` has no message `{message_id}`")]
    UnknownMessage {
        /// Rule id.
        rule: &'static str,
        /// The undeclared message id.
        message_id: String,
    },

    /// The node does not have the shape the handler expects.
    #[error("unexpected {grammar_kind} at line {line}: {detail}")]
    UnexpectedShape {
        /// Engine-level kind.
        kind: NodeKind,
        /// Grammar kind.
        grammar_kind: &'static str,
        /// Line of the node.
        line: usize,
        /// What was missing.
        detail: String,
    },
}

impl VisitFault {
    /// Builds an [`VisitFault::UnexpectedShape`] for `node`.
    #[must_use]
    pub fn shape(node: NodeRef<'_>, detail: impl Into<String>) -> Self {
        Self::UnexpectedShape {
            kind: node.kind(),
            grammar_kind: node.grammar_kind(),
            line: node.span().line,
            detail: detail.into(),
        }
    }
}

/// A node handler registered in a [`VisitorTable`].
pub type Handler<'r> =
    Box<dyn Fn(&mut RuleContext<'_>, NodeRef<'_>) -> Result<(), VisitFault> + 'r>;

/// Node-kind to handler dispatch table returned by [`Rule::create`].
#[derive(Default)]
pub struct VisitorTable<'r> {
    entries: Vec<(NodeKind, Handler<'r>)>,
}

impl<'r> VisitorTable<'r> {
    /// Creates an empty table. A rule returns an empty table to opt out of a
    /// file entirely.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Registers `handler` for nodes of `kind`.
    #[must_use]
    pub fn on<F>(mut self, kind: NodeKind, handler: F) -> Self
    where
        F: Fn(&mut RuleContext<'_>, NodeRef<'_>) -> Result<(), VisitFault> + 'r,
    {
        self.entries.push((kind, Box::new(handler)));
        self
    }

    /// Handlers registered for `kind`, in registration order.
    pub fn handlers(&self, kind: NodeKind) -> impl Iterator<Item = &Handler<'r>> {
        self.entries
            .iter()
            .filter(move |(k, _)| *k == kind)
            .map(|(_, h)| h)
    }

    /// Kinds this table listens to.
    pub fn kinds(&self) -> impl Iterator<Item = NodeKind> + '_ {
        self.entries.iter().map(|(k, _)| *k)
    }

    /// Returns true if no handler is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for VisitorTable<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.kinds()).finish()
    }
}

/// A per-file lint rule driven by node visits.
///
/// Implement this trait to create rules that analyze individual source files.
/// The analyzer calls [`Rule::create`] once per file and dispatches each node
/// of the file's tree to the returned table.
///
/// # Example
///
/// ```ignore
/// use coreguard_core::{NodeKind, Rule, RuleContext, RuleDescriptor, VisitorTable};
///
/// pub struct NoEval;
///
/// impl Rule for NoEval {
///     fn descriptor(&self) -> &'static RuleDescriptor { &DESCRIPTOR }
///
///     fn create<'r>(&'r self, _ctx: &RuleContext<'_>) -> VisitorTable<'r> {
///         VisitorTable::new().on(NodeKind::CallExpression, |ctx, node| {
///             ctx.report(node, "noEval")
///         })
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Returns the rule metadata.
    fn descriptor(&self) -> &'static RuleDescriptor;

    /// Returns the kebab-case id of this rule (e.g., "no-parallel-cache").
    fn name(&self) -> &'static str {
        self.descriptor().id
    }

    /// Returns the rule code (e.g., "CG001").
    fn code(&self) -> &'static str {
        self.descriptor().code
    }

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        self.descriptor().docs.description
    }

    /// Returns the default severity for violations from this rule.
    fn default_severity(&self) -> Severity {
        self.descriptor().category.default_severity()
    }

    /// Builds the visitor table for one file.
    fn create<'r>(&'r self, ctx: &RuleContext<'_>) -> VisitorTable<'r>;
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;
