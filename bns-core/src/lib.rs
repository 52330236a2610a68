//! # BNS Core
//!
//! Core types, errors, and traits shared by the BNS deploy toolkit.
//!
//! - **Status**: the uniform success/error/info value returned by every client operation
//! - **Errors**: internal error hierarchy propagated with `?`
//! - **Types**: fact sets, export targets, network profiles, domain prices, contracts
//! - **Traits**: the contract deployer seam used by the orchestrator
//! - **Utils**: unit conversion and formatting helpers
//!
//! ## Example
//!
//! ```rust
//! use bns_core::Status;
//!
//! let status: Status<u64> = Status::success("", 42);
//! assert!(status.is_success());
//! assert_eq!(status.data(), Some(&42));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod constants;
pub mod error;
pub mod status;
pub mod traits;
pub mod types;
pub mod utils;

pub use constants::*;
pub use error::{BnsError, Result};
pub use status::{Status, StatusKind};
pub use traits::*;
pub use types::*;
