//! Utility functions for rule implementations.

pub mod members;
pub mod paths;

// Re-export commonly used utilities for rule implementations
#[doc(inline)]
pub use members::{member_call, new_callee_name};
#[doc(inline)]
pub use paths::{normalize, relative_to, to_slash};
