//! # Contracts
//!
//! Shared data model and seams of the OMR pipeline.
//! Every component crate depends on this crate only, never on each other's internals.
//!
//! ## Seams
//! - [`CommandRunner`]: runs one external command to completion
//! - [`ArtifactLocator`]: finds the output an external tool left on disk

mod artifact;
mod error;
mod job;
mod process;
mod tool;

pub use artifact::*;
pub use error::*;
pub use job::*;
pub use process::*;
pub use tool::*;
