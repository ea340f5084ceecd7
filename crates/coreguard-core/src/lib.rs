//! # coreguard-core
//!
//! Core framework for enforcing architectural invariants over a syntax tree.
//!
//! This crate provides the foundational types for building coreguard rules.
//! It includes:
//!
//! - [`SyntaxTree`], an index-addressed arena of [`NodeKind`]-tagged nodes
//! - [`classify`], the lexical scope resolver
//! - [`AllowListPattern`] for path-based exemption zones
//! - [`Rule`], [`RuleDescriptor`] and [`VisitorTable`] for defining rules
//! - [`Registry`] for assembling rules from configuration
//! - [`Analyzer`] for orchestrating lint execution
//!
//! ## Example
//!
//! ```ignore
//! use coreguard_core::{Analyzer, Config};
//!
//! let config = Config::default();
//! let rules = registry.instantiate_enabled(&config, None)?;
//! let analyzer = Analyzer::builder()
//!     .project_root(".")
//!     .root("./src")
//!     .parser(TypeScriptParser::new())
//!     .rules(rules)
//!     .config(config)
//!     .build()?;
//!
//! let result = analyzer.analyze()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
mod classifier;
mod config;
mod context;
mod options;
mod parser;
mod registry;
mod rule;
mod scope;
mod syntax;
mod types;

/// Utility modules for rule implementations.
pub mod utils;

pub use analyzer::{Analyzer, AnalyzerBuilder, AnalyzerError, FileReport};
pub use classifier::{AllowListPattern, DEFAULT_ALLOW_FILES_PATTERN};
pub use config::{AnalyzerConfig, Config, ConfigError, RuleConfig};
pub use context::{FileContext, RuleContext};
pub use options::{OptionDefault, OptionKind, OptionSpec, OptionValue, RuleOptions};
pub use parser::{ParseError, SourceParser};
pub use registry::{Registry, RuleEntry, RuleFactory};
pub use rule::{
    Handler, Rule, RuleBox, RuleCategory, RuleDescriptor, RuleDocs, VisitFault, VisitorTable,
};
pub use scope::{classify, retaining_holder, ScopeClassification};
pub use syntax::{Ancestors, NodeId, NodeKind, NodeRef, Span, SyntaxNode, SyntaxTree, SyntaxTreeBuilder};
pub use types::{
    FaultRecord, Label, LintResult, Location, Severity, Suggestion, Violation, ViolationDiagnostic,
};
