//! Expansion of calendar events into dated appointment rows.
//!
//! A recurring master is expanded here, not left to the caller: duplicate
//! matching and preview totals are computed per concrete date, so the
//! pipeline needs one row per occurrence.

use chrono::Duration;
use log::warn;
use rrule::RRuleSet;

use crate::constants::{DEFAULT_EXPANSION_DAYS, MAX_OCCURRENCES};
use crate::description::split_description;
use crate::event::{CalendarEvent, EventStatus, EventTime};
use crate::row::ImportRow;

/// Expand one event into zero or more import rows.
///
/// Events without a start, without a usable summary, or marked CANCELLED
/// produce nothing. Occurrences whose date key matches an EXDATE entry are
/// dropped, but keep consuming occurrence indices, so the source keys of
/// the surviving rows stay stable when an exclusion is added to the feed.
pub fn expand_event(event: &CalendarEvent) -> Vec<ImportRow> {
    let start = match &event.start {
        Some(s) => s,
        None => return Vec::new(),
    };
    let full_name = match event.summary.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => return Vec::new(),
    };
    if event.status == Some(EventStatus::Cancelled) {
        return Vec::new();
    }

    let (phone, notes) = split_description(event.description.as_deref());
    let key_base = event.uid.clone().unwrap_or_else(|| full_name.clone());

    let excluded_keys: Vec<String> = event.exdates.iter().map(EventTime::date_key).collect();

    let mut rows = Vec::new();
    for (index, date_key) in occurrence_date_keys(event, start).into_iter().enumerate() {
        if excluded_keys.contains(&date_key) {
            continue;
        }
        rows.push(ImportRow {
            source_key: format!("{key_base}-{date_key}-{index}"),
            full_name: full_name.clone(),
            surgery_date: date_key,
            phone: phone.clone(),
            notes: notes.clone(),
        });
    }
    rows
}

/// Date keys of all occurrences of the event, start first.
///
/// Without a recurrence rule this is exactly the start date. With one, the
/// rule is expanded from the start to its own explicit UNTIL when it has
/// one, otherwise to the default horizon. A rule the rrule crate cannot
/// parse degrades to the single start occurrence instead of aborting the
/// feed.
fn occurrence_date_keys(event: &CalendarEvent, start: &EventTime) -> Vec<String> {
    let rule = match event.rrule.as_deref() {
        Some(r) => r,
        None => return vec![start.date_key()],
    };

    let rrule_string = build_rrule_string(start, rule);
    let rrule_set: RRuleSet = match rrule_string.parse() {
        Ok(set) => set,
        Err(e) => {
            warn!(
                "Unparseable RRULE '{}' on event '{}': {}; using start date only",
                rule,
                event.uid.as_deref().unwrap_or("?"),
                e
            );
            return vec![start.date_key()];
        }
    };

    let start_utc = start.to_utc();
    let horizon = start_utc + Duration::days(DEFAULT_EXPANSION_DAYS);

    // after/before are exclusive, so pad by a second to include both the
    // start itself and an occurrence landing exactly on the horizon.
    let tz = rrule::Tz::UTC;
    let after = (start_utc - Duration::seconds(1)).with_timezone(&tz);
    let before = (horizon + Duration::seconds(1)).with_timezone(&tz);

    // The horizon is the default for rules with no end of their own; an
    // explicit UNTIL is honored even when it lies years past it.
    let has_explicit_until = rule.to_ascii_uppercase().contains("UNTIL=");
    let mut bounded = rrule_set.after(after);
    if !has_explicit_until {
        bounded = bounded.before(before);
    }

    let result = bounded.all(MAX_OCCURRENCES);
    if result.limited {
        warn!(
            "Recurrence expansion for event '{}' truncated at {} occurrences",
            event.uid.as_deref().unwrap_or("?"),
            MAX_OCCURRENCES
        );
    }

    if result.dates.is_empty() {
        return vec![start.date_key()];
    }

    result
        .dates
        .iter()
        .map(|dt| match start {
            // Date-only masters produced midnight-UTC occurrences; take the
            // literal date back out so nothing shifts across a zone boundary.
            EventTime::Date(_) => dt.date_naive().format("%Y-%m-%d").to_string(),
            EventTime::DateTime(_) => EventTime::DateTime(dt.with_timezone(&chrono::Utc)).date_key(),
        })
        .collect()
}

/// Assemble an iCalendar-format string for the rrule crate parser.
fn build_rrule_string(start: &EventTime, rule: &str) -> String {
    let dtstart = match start {
        EventTime::Date(d) => format!("DTSTART:{}T000000Z", d.format("%Y%m%d")),
        EventTime::DateTime(dt) => format!("DTSTART:{}", dt.format("%Y%m%dT%H%M%SZ")),
    };
    format!("{}\nRRULE:{}", dtstart, sanitize_rule(rule))
}

/// Strip a stray `RRULE:` prefix and upgrade a date-only UNTIL to an
/// end-of-day UTC instant. The rrule crate requires UNTIL to match the
/// DTSTART value type, and our DTSTART is always a UTC date-time.
fn sanitize_rule(rule: &str) -> String {
    let clean = rule.trim();
    let mut rule_part = clean
        .strip_prefix("RRULE:")
        .or_else(|| clean.strip_prefix("rrule:"))
        .unwrap_or(clean)
        .to_string();

    if let Some(idx) = rule_part.find("UNTIL=") {
        let value_start = idx + 6;
        let value_end = rule_part[value_start..]
            .find(';')
            .map(|i| value_start + i)
            .unwrap_or(rule_part.len());
        let value = &rule_part[value_start..value_end];
        if value.len() == 8 && !value.contains('T') {
            let upgraded = format!("{value}T235959Z");
            rule_part.replace_range(value_start..value_end, &upgraded);
        }
    }

    rule_part
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn plain_event() -> CalendarEvent {
        CalendarEvent {
            uid: Some("ev-1".into()),
            start: Some(EventTime::Date(
                NaiveDate::from_ymd_opt(2026, 3, 10).unwrap(),
            )),
            rrule: None,
            exdates: vec![],
            summary: Some("Jane Doe".into()),
            description: None,
            status: None,
        }
    }

    #[test]
    fn date_only_event_yields_one_row_with_literal_date() {
        let rows = expand_event(&plain_event());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].surgery_date, "2026-03-10");
        assert_eq!(rows[0].full_name, "Jane Doe");
        assert_eq!(rows[0].source_key, "ev-1-2026-03-10-0");
    }

    #[test]
    fn datetime_event_projects_to_utc_calendar_date() {
        let mut event = plain_event();
        event.start = Some(EventTime::DateTime(
            Utc.with_ymd_and_hms(2026, 3, 10, 23, 30, 0).unwrap(),
        ));
        let rows = expand_event(&event);
        assert_eq!(rows[0].surgery_date, "2026-03-10");
    }

    #[test]
    fn cancelled_event_yields_nothing() {
        let mut event = plain_event();
        event.status = Some(EventStatus::Cancelled);
        assert!(expand_event(&event).is_empty());
    }

    #[test]
    fn missing_start_or_blank_summary_yields_nothing() {
        let mut no_start = plain_event();
        no_start.start = None;
        assert!(expand_event(&no_start).is_empty());

        let mut blank_summary = plain_event();
        blank_summary.summary = Some("   ".into());
        assert!(expand_event(&blank_summary).is_empty());

        let mut no_summary = plain_event();
        no_summary.summary = None;
        assert!(expand_event(&no_summary).is_empty());
    }

    #[test]
    fn summary_is_trimmed_into_full_name() {
        let mut event = plain_event();
        event.summary = Some("  Jane Doe \n".into());
        assert_eq!(expand_event(&event)[0].full_name, "Jane Doe");
    }

    #[test]
    fn missing_uid_falls_back_to_name_in_source_key() {
        let mut event = plain_event();
        event.uid = None;
        assert_eq!(expand_event(&event)[0].source_key, "Jane Doe-2026-03-10-0");
    }

    #[test]
    fn weekly_rule_with_count_expands_to_each_occurrence() {
        let mut event = plain_event();
        event.start = Some(EventTime::DateTime(
            Utc.with_ymd_and_hms(2026, 3, 2, 10, 0, 0).unwrap(),
        ));
        event.rrule = Some("FREQ=WEEKLY;COUNT=4".into());

        let rows = expand_event(&event);
        let dates: Vec<&str> = rows.iter().map(|r| r.surgery_date.as_str()).collect();
        assert_eq!(
            dates,
            vec!["2026-03-02", "2026-03-09", "2026-03-16", "2026-03-23"]
        );
        assert_eq!(rows[3].source_key, "ev-1-2026-03-23-3");
    }

    #[test]
    fn exdate_drops_the_occurrence_but_keeps_indices() {
        let mut event = plain_event();
        event.start = Some(EventTime::DateTime(
            Utc.with_ymd_and_hms(2026, 3, 2, 10, 0, 0).unwrap(),
        ));
        event.rrule = Some("FREQ=WEEKLY;COUNT=3".into());
        event.exdates = vec![EventTime::DateTime(
            Utc.with_ymd_and_hms(2026, 3, 9, 10, 0, 0).unwrap(),
        )];

        let rows = expand_event(&event);
        let keys: Vec<&str> = rows.iter().map(|r| r.source_key.as_str()).collect();
        assert_eq!(keys, vec!["ev-1-2026-03-02-0", "ev-1-2026-03-16-2"]);
    }

    #[test]
    fn exdate_matches_at_date_granularity_not_instant() {
        let mut event = plain_event();
        event.start = Some(EventTime::DateTime(
            Utc.with_ymd_and_hms(2026, 3, 2, 10, 0, 0).unwrap(),
        ));
        event.rrule = Some("FREQ=WEEKLY;COUNT=2".into());
        // Different time of day, same calendar date as the second occurrence
        event.exdates = vec![EventTime::DateTime(
            Utc.with_ymd_and_hms(2026, 3, 9, 17, 45, 0).unwrap(),
        )];

        let rows = expand_event(&event);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].surgery_date, "2026-03-02");
    }

    #[test]
    fn unbounded_rule_is_capped_at_the_default_horizon() {
        let mut event = plain_event();
        event.rrule = Some("FREQ=MONTHLY".into());

        let rows = expand_event(&event);
        // Start inclusive, then monthly until the 1095-day horizon, which
        // falls on 2029-03-09 (a leap year sits inside the window)
        assert_eq!(rows.len(), 36);
        assert_eq!(rows.first().unwrap().surgery_date, "2026-03-10");
        assert_eq!(rows.last().unwrap().surgery_date, "2029-02-10");
    }

    #[test]
    fn until_bound_stops_before_the_horizon() {
        let mut event = plain_event();
        event.rrule = Some("FREQ=DAILY;UNTIL=20260313".into());

        let rows = expand_event(&event);
        let dates: Vec<&str> = rows.iter().map(|r| r.surgery_date.as_str()).collect();
        assert_eq!(
            dates,
            vec!["2026-03-10", "2026-03-11", "2026-03-12", "2026-03-13"]
        );
    }

    #[test]
    fn until_bound_past_the_horizon_is_honored() {
        let mut event = plain_event();
        event.rrule = Some("FREQ=YEARLY;UNTIL=20360310T235959Z".into());

        let rows = expand_event(&event);
        assert_eq!(rows.len(), 11);
        assert_eq!(rows[0].surgery_date, "2026-03-10");
        assert_eq!(rows[10].surgery_date, "2036-03-10");
    }

    #[test]
    fn unparseable_rule_falls_back_to_start_date() {
        let mut event = plain_event();
        event.rrule = Some("FREQ=SOMETIMES".into());

        let rows = expand_event(&event);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].surgery_date, "2026-03-10");
    }

    #[test]
    fn description_split_is_shared_across_occurrences() {
        let mut event = plain_event();
        event.rrule = Some("FREQ=WEEKLY;COUNT=2".into());
        event.description = Some("0532 123 45 67 post-op check".into());

        let rows = expand_event(&event);
        assert_eq!(rows.len(), 2);
        for row in rows {
            assert_eq!(row.phone.as_deref(), Some("+905321234567"));
            assert_eq!(row.notes.as_deref(), Some("post-op check"));
        }
    }
}
