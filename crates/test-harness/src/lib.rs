//! Test harness for configurator development.
//!
//! Provides programmatic tools for scripting multi-step configurator
//! sessions, verifying the structure at every step, and generating
//! diagnostic output.
//!
//! # Key Components
//!
//! - [`ConfiguratorBuilder`]: Fluent API over the bridge dispatch path
//! - [`oracle`]: Verification functions returning pass/fail verdicts
//! - [`report`]: Structured text structure descriptions
//! - [`helpers`]: Row and key constructors
//! - [`assertions`]: Rich assertion helpers with diagnostics

pub mod assertions;
pub mod helpers;
pub mod oracle;
pub mod report;
pub mod workflow;

pub use helpers::HarnessError;
pub use oracle::OracleVerdict;
pub use report::StructureReport;
pub use workflow::ConfiguratorBuilder;
