//! # coreguard-ts
//!
//! Tree-sitter powered TypeScript and JavaScript front end for coreguard.
//!
//! [`TypeScriptParser`] implements [`coreguard_core::SourceParser`]: it parses
//! a file with the TypeScript (or TSX) grammar and lowers the named nodes of
//! the concrete tree into a [`coreguard_core::SyntaxTree`], mapping the
//! grammar kinds the rules care about onto [`coreguard_core::NodeKind`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod typescript;

pub use typescript::{lower_kind, TypeScriptParser};
