//! Core import pipeline for opsched.
//!
//! This crate turns a third-party iCalendar export into normalized surgery
//! appointment rows and decides, against the patient store, which of them
//! already exist:
//! - `ics` parses feed text into `CalendarEvent` values
//! - `expand` turns each event (recurring or not) into dated `ImportRow`s
//! - `matcher` flags rows already present in the store
//! - `import` drives the two-phase preview/commit flow
//!
//! The patient store itself is an external collaborator behind the
//! `PatientStore` trait; this crate never touches storage directly.

pub mod constants;
pub mod description;
pub mod error;
pub mod event;
pub mod expand;
pub mod ics;
pub mod import;
pub mod matcher;
pub mod normalize;
pub mod row;
pub mod store;

pub use error::{ImportError, ImportResult};
pub use event::{CalendarEvent, EventStatus, EventTime};
pub use import::{CommitTotals, ImportPreview, ImportSummary, ParsedFeed, PreviewTotals};
pub use row::{ImportRow, PreviewRow};
pub use store::{ExistingPatient, NewPatient, PatientStore};
