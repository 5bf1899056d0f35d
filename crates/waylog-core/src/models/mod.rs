//! Data models for Waylog

mod entry;

pub use entry::{Entry, EntryId};
