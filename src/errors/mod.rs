//! Error types and error handling for the compiler.
//!
//! This module defines the error types used throughout the compilation
//! process. It includes:
//!
//! - The error structure with source span information
//! - Specific error variants for each compilation phase
//! - The mapping from variants onto the diagnostic taxonomy names

pub mod errors;

#[cfg(test)]
mod tests;
