//! Command implementations.

mod convert;
mod run;
mod validate;

pub use convert::run_convert;
pub use run::run_pipeline;
pub use validate::run_validate;
