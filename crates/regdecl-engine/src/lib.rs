//! Regdecl Engine Hand-off
//!
//! This crate hands rendered registry documents to an external provisioning
//! engine and reads back the registry outputs.
//!
//! # Overview
//!
//! - **[`ProvisioningEngine`]**: the reconciliation interface
//! - **[`CommandEngine`]**: an engine backed by an external program
//! - **[`Provisioner`]**: check, render and apply in one step
//!
//! Engine diagnostics are surfaced unchanged. Nothing here retries.
//!
//! # Example
//!
//! ```rust,no_run
//! use regdecl_core::RegistryConfig;
//! use regdecl_engine::{CommandEngine, Provisioner};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provisioner = Provisioner::new(CommandEngine::new("./apply-registry.sh"));
//!     let applied = provisioner.apply(&RegistryConfig::new("my-repo")).await?;
//!
//!     println!("{}", applied.handle.url);
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

pub mod engine;
pub mod error;
pub mod provisioner;

pub use engine::{CommandEngine, ProvisioningEngine};
pub use error::{EngineError, ProvisionError, Result};
pub use provisioner::{Applied, Plan, Provisioner};
