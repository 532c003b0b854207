//! Utility functions for code generation and URL validation.
//!
//! - [`code_generator`] - Short code derivation (SHA-256 + base 62)
//! - [`url_validator`] - Syntactic URL checks

pub mod code_generator;
pub mod url_validator;
