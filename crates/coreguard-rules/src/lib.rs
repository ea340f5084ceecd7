//! # coreguard-rules
//!
//! Built-in lint rules for coreguard.
//!
//! Each rule keeps one architectural invariant: long-lived state, time, and
//! identifiers go through their central facility instead of ad-hoc local
//! replacements.
//!
//! ## Available Rules
//!
//! | Code | Name | Description |
//! |------|------|-------------|
//! | CG001 | `no-parallel-cache` | Forbids module- and instance-scoped `Map` caches |
//! | CG002 | `prefer-unified-time` | Requires the unified time source instead of `Date.now()` |
//! | CG003 | `prefer-unified-id` | Requires the unified id generator instead of `Math.random()` |
//!
//! Every rule accepts `allowFilesPattern` (default `(tests|scripts|ui)/`).
//!
//! ## Usage
//!
//! ```ignore
//! use coreguard_core::{Analyzer, Config};
//! use coreguard_rules::builtin_registry;
//! use coreguard_ts::TypeScriptParser;
//!
//! let config = Config::from_file("coreguard.toml".as_ref())?;
//! let analyzer = Analyzer::builder()
//!     .parser(TypeScriptParser::new())
//!     .rules(builtin_registry().instantiate_enabled(&config, None)?)
//!     .config(config)
//!     .build()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod common;
pub mod no_parallel_cache;
pub mod prefer_unified_id;
pub mod prefer_unified_time;
mod registry;

pub use common::{ALLOW_FILES_OPTION, ALLOW_FILES_PATTERN};
pub use no_parallel_cache::NoParallelCache;
pub use prefer_unified_id::PreferUnifiedId;
pub use prefer_unified_time::PreferUnifiedTime;
pub use registry::{builtin_entries, builtin_registry, recommended_entries};

/// Re-export core types for convenience.
pub use coreguard_core::{Rule, Severity, Violation};
