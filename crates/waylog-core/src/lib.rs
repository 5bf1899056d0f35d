//! waylog-core - Core library for Waylog
//!
//! This crate contains the shared models, local store, remote record codec,
//! and sync logic used by all Waylog interfaces.

pub mod codec;
pub mod db;
pub mod error;
pub mod models;
pub mod remote;
pub mod state;
pub mod sync;
pub mod util;

pub use error::{Error, Result};
pub use models::{Entry, EntryId};
