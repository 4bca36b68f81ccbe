//! puppetfile-check - Puppetfile consistency checker library
//!
//! This library checks that the modules pinned in a Puppetfile match what
//! the Puppet Forge publishes:
//! - Pinned tags are compared with each module's current release
//! - Forge dependency constraints are evaluated against the Puppetfile
//! - Results are assembled into a report with a pass/fail verdict

pub mod cli;
pub mod constraint;
pub mod domain;
pub mod error;
pub mod gate;
pub mod logging;
pub mod manifest;
pub mod output;
pub mod progress;
pub mod reconcile;
pub mod registry;
pub mod report;
