//! # coursecraft-error
//!
//! Unified error handling for coursecraft.
//!
//! ## Design
//!
//! - **ErrorKind**: what went wrong (e.g., MissingColumn, CredentialMissing)
//! - **ErrorStatus**: whether trying again could help (Permanent, Temporary)
//! - **Error Context**: key-value pairs that locate the cause (row, column, model)
//! - **Error Source**: the wrapped underlying error, kept out of the public type
//!
//! ## Usage
//!
//! ```rust
//! use coursecraft_error::{Error, ErrorKind};
//!
//! fn example() -> Result<(), Error> {
//!     Err(Error::new(ErrorKind::MissingColumn, "column 'GPA' not found")
//!         .with_operation("roster::parse")
//!         .with_context("column", "GPA"))
//! }
//! ```
//!
//! ## Principles
//!
//! - All fallible functions return `Result<T, coursecraft_error::Error>`
//! - External errors are wrapped with `set_source(err)`
//! - An error is handled once; callers further up only append context
//! - No blanket `From<OtherError>` impls, so raw errors don't leak

mod error;
mod kind;
mod status;

pub use error::Error;
pub use kind::ErrorKind;
pub use status::ErrorStatus;

/// Result type alias using the coursecraft Error
pub type Result<T> = std::result::Result<T, Error>;
