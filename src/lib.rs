//! cursor-rules library
//!
//! Rule model, sync policy and the editor protocol behind the cursor-rules
//! CLI. The sync policy mirrors what the Cursor Rules editor extension does:
//! a bundled rule list, a remote list cached for 24 hours, and a local
//! fallback whenever the network is unavailable.

pub mod config;
pub mod protocol;
pub mod rules;
