//! Core analyzer for orchestrating lint execution.

use crate::config::{Config, ConfigError};
use crate::context::{FileContext, RuleContext};
use crate::parser::{ParseError, SourceParser};
use crate::rule::{Rule, RuleBox};
use crate::syntax::SyntaxTree;
use crate::types::{FaultRecord, LintResult, Violation};
use crate::utils::paths::{normalize, relative_to, to_slash};

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur during analysis.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// IO error reading files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing a source file.
    #[error("Parse error in {path}: {message}")]
    Parse {
        /// Path to the file that failed to parse.
        path: PathBuf,
        /// Parse error message.
        message: String,
    },

    /// Glob pattern error.
    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),

    /// Directory walk error.
    #[error("Failed to walk directory: {0}")]
    Walk(#[from] ignore::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The builder was given no parser.
    #[error("No source parser configured")]
    NoParser,
}

/// Builder for configuring an [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    root: Option<PathBuf>,
    project_root: Option<PathBuf>,
    rules: Vec<RuleBox>,
    parser: Option<Box<dyn SourceParser>>,
    exclude_patterns: Vec<String>,
    config: Option<Config>,
    fail_on_parse_error: bool,
}

impl AnalyzerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the directory or single file to analyze.
    ///
    /// Defaults to `[analyzer] root` resolved against the project root.
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Sets the project root (default: the current directory).
    ///
    /// Exemption patterns, exclude globs and reported locations use paths
    /// relative to this directory, wherever the walk starts.
    #[must_use]
    pub fn project_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.project_root = Some(path.into());
        self
    }

    /// Adds a rule to the analyzer.
    #[must_use]
    pub fn rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Adds a boxed rule to the analyzer.
    #[must_use]
    pub fn rule_box(mut self, rule: RuleBox) -> Self {
        self.rules.push(rule);
        self
    }

    /// Adds boxed rules, typically from [`Registry::instantiate_enabled`].
    ///
    /// [`Registry::instantiate_enabled`]: crate::Registry::instantiate_enabled
    #[must_use]
    pub fn rules(mut self, rules: impl IntoIterator<Item = RuleBox>) -> Self {
        self.rules.extend(rules);
        self
    }

    /// Sets the parser that turns source files into syntax trees.
    #[must_use]
    pub fn parser(mut self, parser: impl SourceParser + 'static) -> Self {
        self.parser = Some(Box::new(parser));
        self
    }

    /// Adds an exclude glob pattern.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Adds multiple exclude glob patterns.
    #[must_use]
    pub fn excludes<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_patterns
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets whether to fail on parse errors (default: false).
    #[must_use]
    pub fn fail_on_parse_error(mut self, fail: bool) -> Self {
        self.fail_on_parse_error = fail;
        self
    }

    /// Builds the analyzer.
    ///
    /// # Errors
    ///
    /// Returns an error if no parser was set, an exclude pattern is not a
    /// valid glob, or the current directory cannot be resolved.
    pub fn build(self) -> Result<Analyzer, AnalyzerError> {
        let parser = self.parser.ok_or(AnalyzerError::NoParser)?;

        let config = self.config.unwrap_or_default();

        let cwd = std::env::current_dir()?;
        let project_root = normalize(&cwd.join(self.project_root.unwrap_or_default()));
        let root = match self.root {
            Some(root) => normalize(&cwd.join(root)),
            None => normalize(&project_root.join(&config.analyzer.root)),
        };

        let mut exclude_patterns = self.exclude_patterns;
        exclude_patterns.extend(config.analyzer.exclude.iter().cloned());
        let excludes = exclude_patterns
            .iter()
            .map(|p| glob::Pattern::new(p).map(|g| (p.clone(), g)))
            .collect::<Result<Vec<_>, _>>()?;

        let extensions = if config.analyzer.extensions.is_empty() {
            parser.extensions().iter().map(ToString::to_string).collect()
        } else {
            config
                .analyzer
                .extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_string())
                .collect()
        };

        Ok(Analyzer {
            root,
            project_root,
            rules: self.rules,
            parser,
            excludes,
            extensions,
            config,
            fail_on_parse_error: self.fail_on_parse_error,
        })
    }
}

/// Violations and isolated faults collected for one file.
#[derive(Debug, Default)]
pub struct FileReport {
    /// Violations from every active rule, in rule order.
    pub violations: Vec<Violation>,
    /// Handler failures that were skipped.
    pub faults: Vec<FaultRecord>,
}

/// The main analyzer that orchestrates lint execution.
///
/// Use [`Analyzer::builder()`] to construct an instance.
pub struct Analyzer {
    root: PathBuf,
    project_root: PathBuf,
    rules: Vec<RuleBox>,
    parser: Box<dyn SourceParser>,
    excludes: Vec<(String, glob::Pattern)>,
    extensions: Vec<String>,
    config: Config,
    fail_on_parse_error: bool,
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Returns the directory or file being analyzed.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the directory reported paths are relative to.
    #[must_use]
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Returns the number of registered rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Analyzes all files under the root and returns the results.
    ///
    /// # Errors
    ///
    /// Returns an error if file discovery fails, a file cannot be read, or a
    /// file fails to parse while `fail_on_parse_error` is set.
    pub fn analyze(&self) -> Result<LintResult, AnalyzerError> {
        info!("Starting analysis at {:?}", self.root);

        let files = self.discover_files()?;
        info!("Found {} files to analyze", files.len());

        self.analyze_files(&files)
    }

    /// Analyzes an explicit list of files.
    ///
    /// # Errors
    ///
    /// Same as [`Analyzer::analyze`].
    pub fn analyze_files(&self, files: &[PathBuf]) -> Result<LintResult, AnalyzerError> {
        let mut result = LintResult::new();

        for path in files {
            debug!("Analyzing: {}", path.display());
            let content = std::fs::read_to_string(path)?;
            match self.check_source(path, &content) {
                Ok(report) => {
                    result.violations.extend(report.violations);
                    result.faults.extend(report.faults);
                    result.files_checked += 1;
                }
                Err(AnalyzerError::Parse { path, message }) => {
                    warn!("Failed to parse {}: {}", path.display(), message);
                    if self.fail_on_parse_error {
                        return Err(AnalyzerError::Parse { path, message });
                    }
                }
                Err(e) => return Err(e),
            }
        }

        result.sort();

        info!(
            "Analysis complete: {} violations in {} files",
            result.violations.len(),
            result.files_checked
        );
        if !result.faults.is_empty() {
            warn!("{} handler faults were skipped", result.faults.len());
        }

        Ok(result)
    }

    /// Parses and checks one in-memory source file.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzerError::Parse`] if the parser rejects the file.
    pub fn check_source(&self, path: &Path, content: &str) -> Result<FileReport, AnalyzerError> {
        let tree = self.parser.parse(path, content).map_err(|e: ParseError| {
            AnalyzerError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
        })?;
        let file = FileContext::new(path, content, &self.project_root);
        Ok(self.check_tree(&file, &tree))
    }

    /// Runs every rule over an already-built tree.
    ///
    /// Each rule gets a fresh [`RuleContext`] and a visitor table from
    /// [`Rule::create`]. The tree is walked in pre-order and every handler
    /// registered for a node's kind is invoked. A handler that returns an
    /// error is recorded as a [`FaultRecord`] and the walk continues with the
    /// next handler and node.
    #[must_use]
    pub fn check_tree(&self, file: &FileContext<'_>, tree: &SyntaxTree) -> FileReport {
        let mut report = FileReport::default();

        for rule in &self.rules {
            let severity = self
                .config
                .rule_severity(rule.name())
                .unwrap_or_else(|| rule.default_severity());
            let mut ctx = RuleContext::new(file, tree, rule.descriptor(), severity);

            let table = rule.create(&ctx);
            if table.is_empty() {
                debug!(
                    "Rule {} is inactive for {}",
                    rule.name(),
                    file.relative_path.display()
                );
                continue;
            }

            for node in tree.iter() {
                for handler in table.handlers(node.kind()) {
                    if let Err(fault) = handler(&mut ctx, node) {
                        warn!(
                            "Rule {} failed on {} at {}:{}: {}",
                            rule.name(),
                            node.grammar_kind(),
                            file.relative_path.display(),
                            node.span().line,
                            fault
                        );
                        report.faults.push(FaultRecord {
                            file: file.relative_path.clone(),
                            rule: rule.name().to_string(),
                            node_kind: node.grammar_kind().to_string(),
                            line: node.span().line,
                            message: fault.to_string(),
                        });
                    }
                }
            }

            report.violations.extend(ctx.into_violations());
        }

        report
    }

    /// Discovers all source files the parser handles.
    fn discover_files(&self) -> Result<Vec<PathBuf>, AnalyzerError> {
        let mut builder = ignore::WalkBuilder::new(&self.root);
        builder
            .hidden(false)
            .git_ignore(self.config.analyzer.respect_gitignore)
            .require_git(false);

        let mut files = Vec::new();
        for entry in builder.build() {
            let entry = entry?;
            let path = entry.path();

            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }

            let handled = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|ext| self.extensions.iter().any(|e| e == ext));
            if !handled {
                continue;
            }

            if self.should_exclude(path) {
                debug!("Excluding: {}", path.display());
                continue;
            }

            files.push(path.to_path_buf());
        }

        files.sort();
        Ok(files)
    }

    /// Checks if a path should be excluded.
    ///
    /// Globs see the project-relative path, so directories above the project
    /// root never match.
    fn should_exclude(&self, path: &Path) -> bool {
        let rel = to_slash(&relative_to(path, &self.project_root));
        let anchored = if rel.starts_with('/') {
            rel.clone()
        } else {
            format!("/{rel}")
        };

        self.excludes.iter().any(|(raw, pattern)| {
            if pattern.matches(&rel) {
                return true;
            }
            // Also check as substring for patterns like "**/dist/**"
            let needle = raw.replace("**", "");
            !needle.is_empty() && anchored.contains(&needle)
        })
    }
}
