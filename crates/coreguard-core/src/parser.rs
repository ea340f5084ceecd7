//! Syntax tree provider contract.

use std::path::{Path, PathBuf};

use crate::syntax::SyntaxTree;

/// Errors a parser can report for one file.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The grammar could not be loaded.
    #[error("language error: {0}")]
    Language(String),
    /// The parser gave up without producing a tree.
    #[error("parse aborted")]
    Aborted,
    /// No grammar handles this file.
    #[error("unsupported file type: {}", .0.display())]
    Unsupported(PathBuf),
}

/// Turns source text into a [`SyntaxTree`].
///
/// Implement this to plug a language into the [`Analyzer`](crate::Analyzer).
pub trait SourceParser: Send + Sync {
    /// Language identifier (e.g., `"typescript"`).
    fn language_id(&self) -> &'static str;

    /// File extensions this parser handles, without the dot.
    fn extensions(&self) -> &'static [&'static str];

    /// Parses one file.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] if no tree can be produced.
    fn parse(&self, path: &Path, source: &str) -> Result<SyntaxTree, ParseError>;

    /// Returns true if this parser handles `path`.
    fn handles(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions().contains(&ext))
    }
}
