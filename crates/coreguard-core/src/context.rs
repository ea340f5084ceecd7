//! Context types for rule execution.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::rule::{RuleDescriptor, VisitFault};
use crate::syntax::{NodeId, NodeRef, SyntaxTree};
use crate::types::{Location, Severity, Violation};
use crate::utils::paths::relative_to;

/// Context describing the file under analysis.
#[derive(Debug, Clone)]
pub struct FileContext<'a> {
    /// Path to the file as discovered.
    pub path: &'a Path,
    /// File contents as a string.
    pub content: &'a str,
    /// Path relative to the project root, or the full normalized path for
    /// files outside it. Never empty.
    pub relative_path: PathBuf,
}

impl<'a> FileContext<'a> {
    /// Creates a new file context. `project_root` is the directory
    /// exemption patterns and reported locations are relative to; it is
    /// independent of where the walk started.
    #[must_use]
    pub fn new(path: &'a Path, content: &'a str, project_root: &Path) -> Self {
        Self {
            path,
            content,
            relative_path: relative_to(path, project_root),
        }
    }
}

/// Per-file, per-rule context handed to [`Rule::create`] and every handler.
///
/// Collects the rule's violations for one file. A node is reported at most
/// once per rule no matter how many handlers fire on it.
///
/// [`Rule::create`]: crate::Rule::create
#[derive(Debug)]
pub struct RuleContext<'a> {
    file: &'a FileContext<'a>,
    tree: &'a SyntaxTree,
    descriptor: &'static RuleDescriptor,
    severity: Severity,
    violations: Vec<Violation>,
    reported: HashSet<NodeId>,
}

impl<'a> RuleContext<'a> {
    /// Creates a context for one rule over one file.
    #[must_use]
    pub fn new(
        file: &'a FileContext<'a>,
        tree: &'a SyntaxTree,
        descriptor: &'static RuleDescriptor,
        severity: Severity,
    ) -> Self {
        Self {
            file,
            tree,
            descriptor,
            severity,
            violations: Vec::new(),
            reported: HashSet::new(),
        }
    }

    /// Path of the file as discovered.
    #[must_use]
    pub fn filename(&self) -> &Path {
        self.file.path
    }

    /// Path relative to the project root. Exemption patterns match this.
    #[must_use]
    pub fn relative_path(&self) -> &Path {
        &self.file.relative_path
    }

    /// Full source text.
    #[must_use]
    pub fn content(&self) -> &str {
        self.file.content
    }

    /// The file's syntax tree.
    #[must_use]
    pub fn tree(&self) -> &'a SyntaxTree {
        self.tree
    }

    /// Descriptor of the rule this context serves.
    #[must_use]
    pub fn descriptor(&self) -> &'static RuleDescriptor {
        self.descriptor
    }

    /// Reports `node` using the template registered under `message_id`.
    ///
    /// # Errors
    ///
    /// Returns [`VisitFault::UnknownMessage`] if the descriptor has no such
    /// message.
    pub fn report(&mut self, node: NodeRef<'_>, message_id: &str) -> Result<(), VisitFault> {
        self.report_with(node, message_id, |v| v)
    }

    /// Reports `node`, letting `decorate` attach labels or suggestions.
    ///
    /// # Errors
    ///
    /// Returns [`VisitFault::UnknownMessage`] if the descriptor has no such
    /// message.
    pub fn report_with(
        &mut self,
        node: NodeRef<'_>,
        message_id: &str,
        decorate: impl FnOnce(Violation) -> Violation,
    ) -> Result<(), VisitFault> {
        let template =
            self.descriptor
                .message(message_id)
                .ok_or_else(|| VisitFault::UnknownMessage {
                    rule: self.descriptor.id,
                    message_id: message_id.to_string(),
                })?;

        if !self.reported.insert(node.id()) {
            return Ok(());
        }

        let violation = Violation::new(
            self.descriptor.code,
            self.descriptor.id,
            message_id,
            self.severity,
            self.location(node),
            template,
        );
        self.violations.push(decorate(violation));
        Ok(())
    }

    /// Location of `node` in this file.
    #[must_use]
    pub fn location(&self, node: NodeRef<'_>) -> Location {
        Location::from_span(self.file.relative_path.clone(), node.span())
    }

    /// Violations reported so far.
    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Consumes the context, returning its violations.
    #[must_use]
    pub fn into_violations(self) -> Vec<Violation> {
        self.violations
    }
}
