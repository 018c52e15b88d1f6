//! Feed parsing using the icalendar crate's parser.

use icalendar::{
    DatePerhapsTime,
    parser::{Component, Property, read_calendar, unfold},
};

use crate::error::{ImportError, ImportResult};
use crate::event::{CalendarEvent, EventStatus, EventTime};

/// Parse raw feed text into calendar events.
///
/// Non-VEVENT components (VTIMEZONE, VTODO, ...) are ignored. A top-level
/// grammar failure aborts the whole feed with `FeedParse`; a VEVENT with an
/// unparsable DTSTART comes back with `start: None` and is dropped later by
/// the expander rather than poisoning its siblings.
pub fn parse_feed(content: &str) -> ImportResult<Vec<CalendarEvent>> {
    let unfolded = unfold(content);
    let calendar =
        read_calendar(&unfolded).map_err(|e| ImportError::FeedParse(e.to_string()))?;

    Ok(calendar
        .components
        .iter()
        .filter(|c| c.name == "VEVENT")
        .map(parse_event)
        .collect())
}

fn parse_event(vevent: &Component) -> CalendarEvent {
    let uid = vevent.find_prop("UID").map(|p| p.val.to_string());
    let summary = vevent.find_prop("SUMMARY").map(|p| p.val.to_string());
    let description = vevent.find_prop("DESCRIPTION").map(|p| p.val.to_string());

    let start = vevent
        .find_prop("DTSTART")
        .and_then(|p| DatePerhapsTime::try_from(p).ok())
        .map(to_event_time);

    let status = vevent
        .find_prop("STATUS")
        .and_then(|p| EventStatus::from_ics_str(p.val.as_ref()));

    let rrule = vevent.find_prop("RRULE").map(|p| p.val.to_string());
    let exdates: Vec<EventTime> = vevent
        .properties
        .iter()
        .filter(|p| p.name == "EXDATE")
        .flat_map(parse_exdate_property)
        .collect();

    CalendarEvent {
        uid,
        start,
        rrule,
        exdates,
        summary,
        description,
        status,
    }
}

/// Convert icalendar's DatePerhapsTime to our EventTime.
///
/// Floating and zoned date-times are taken at face value as UTC; timezone
/// database resolution is out of scope for the importer.
fn to_event_time(dpt: DatePerhapsTime) -> EventTime {
    match dpt {
        DatePerhapsTime::Date(d) => EventTime::Date(d),
        DatePerhapsTime::DateTime(cal_dt) => match cal_dt {
            icalendar::CalendarDateTime::Utc(dt) => EventTime::DateTime(dt),
            icalendar::CalendarDateTime::Floating(naive) => EventTime::DateTime(naive.and_utc()),
            icalendar::CalendarDateTime::WithTimezone { date_time, .. } => {
                EventTime::DateTime(date_time.and_utc())
            }
        },
    }
}

/// Parse an EXDATE property into a list of EventTime values.
///
/// Handles:
/// - VALUE=DATE: `EXDATE;VALUE=DATE:20240108`
/// - UTC: `EXDATE:20240108T100000Z`
/// - Floating or TZID-qualified: `EXDATE;TZID=...:20240108T100000`
/// - Comma-separated values: `EXDATE:20240108T100000Z,20240115T100000Z`
fn parse_exdate_property(prop: &Property) -> Vec<EventTime> {
    let is_date = prop
        .params
        .iter()
        .any(|p| p.key == "VALUE" && p.val.as_ref().map(|v| v.as_ref()) == Some("DATE"));

    prop.val
        .as_ref()
        .split(',')
        .filter_map(|s| {
            let s = s.trim();
            if s.is_empty() {
                return None;
            }
            if is_date {
                chrono::NaiveDate::parse_from_str(s, "%Y%m%d")
                    .ok()
                    .map(EventTime::Date)
            } else {
                let s = s.trim_end_matches('Z');
                chrono::NaiveDateTime::parse_from_str(s, "%Y%m%dT%H%M%S")
                    .ok()
                    .map(|dt| EventTime::DateTime(dt.and_utc()))
            }
        })
        .collect()
}
