//! Correlate container runtime state with launched workloads.
//!
//! `cidtrack` answers two questions for software that launches containers
//! indirectly (through a shell command, a scheduler, or `docker run
//! --cidfile`): which containers appeared since a checkpoint, and which live
//! container an ID file refers to. Every answer is checked against the
//! runtime's current container list.
//!
//! # Modules
//!
//! - [`config`]: Configuration system with layered precedence (CLI > env > file > defaults)
//! - [`container`]: Runtime-neutral container and stats values
//! - [`engine`]: Container engine connection and the runtime capability trait
//! - [`error`]: Semantic error types for the application
//! - [`operator`]: Checkpointing, diffing and ID-file resolution

pub mod config;
pub mod container;
pub mod engine;
pub mod error;
pub mod operator;
