//! PubChem Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared types, logging and error handling for the PubChem import workspace.
//!
//! # Overview
//!
//! - **Types**: [`CompoundId`] and the normalized [`ParsedCompound`] record
//! - **Error Handling**: [`CommonError`] and the crate [`Result`] alias
//! - **Logging**: `tracing` subscriber setup shared by every binary
//!
//! # Example
//!
//! ```
//! use pubchem_common::CompoundId;
//!
//! let cid = CompoundId::new(2244).unwrap();
//! assert_eq!(cid.get(), 2244);
//! assert!(CompoundId::new(0).is_err());
//! ```

pub mod error;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use error::{CommonError, Result};
pub use types::{CompoundId, ParsedCompound};
