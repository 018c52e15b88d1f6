//! Calendar feed parsing.
//!
//! Import is read-only: opsched never writes ICS back out, so this module
//! only covers the parsing half of RFC 5545.

mod parse;

pub use parse::parse_feed;
