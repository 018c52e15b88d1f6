//! Shared constants for the import pipeline.

/// How far past an event's start an unbounded recurrence rule is expanded
/// (3 years). A safety bound against runaway expansion; rules with an
/// earlier UNTIL/COUNT stop sooner.
pub const DEFAULT_EXPANSION_DAYS: i64 = 365 * 3;

/// Hard ceiling on occurrences generated for a single recurring event,
/// regardless of the date horizon.
pub const MAX_OCCURRENCES: u16 = 1000;

/// Upload size ceiling for calendar feed files (5 MiB). Enforced by the
/// caller before any text reaches the parser.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;
