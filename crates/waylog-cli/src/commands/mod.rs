pub mod add;
pub mod archive;
pub mod common;
pub mod completions;
pub mod config;
pub mod delete;
pub mod edit;
pub mod list;
pub mod publish;
pub mod show;
pub mod sync;
