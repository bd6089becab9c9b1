//! CLI commands

pub mod apply;
pub mod list;
pub mod serve;
pub mod show;
pub mod status;
pub mod sync;
pub mod utils;
