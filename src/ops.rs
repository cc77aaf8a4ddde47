//! Integration layer for the external version control tool.
//!
//! - [`git`]: the operations the sync pipeline runs (status, stage, commit,
//!   pull with rebase, push)
//!
//! The trait-based abstraction has a real implementation backed by the git
//! CLI and a mock implementation for tests.

pub mod git;
