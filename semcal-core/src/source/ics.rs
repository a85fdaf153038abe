//! iCalendar import using the icalendar crate's parser.

use std::path::PathBuf;

use chrono::{Duration, Local, NaiveDateTime, NaiveTime, TimeZone};
use icalendar::{
    CalendarDateTime, DatePerhapsTime,
    parser::{Component, Property, read_calendar, unfold},
};
use tracing::{debug, warn};

use super::{Agenda, EventSource};
use crate::error::{CalError, CalResult};
use crate::event::{Event, EventType};

/// A `.ics` file, or a directory whose `.ics` files are all read.
pub struct IcsSource {
    path: PathBuf,
}

impl IcsSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        IcsSource { path: path.into() }
    }

    fn files(&self) -> CalResult<Vec<PathBuf>> {
        if !self.path.is_dir() {
            return Ok(vec![self.path.clone()]);
        }

        let mut files: Vec<PathBuf> = std::fs::read_dir(&self.path)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file()
                    && path
                        .extension()
                        .and_then(|e| e.to_str())
                        .is_some_and(|e| e.eq_ignore_ascii_case("ics"))
            })
            .collect();

        files.sort();
        Ok(files)
    }
}

impl EventSource for IcsSource {
    fn fetch(&self) -> CalResult<Agenda> {
        let mut events = Vec::new();

        for file in self.files()? {
            let content = std::fs::read_to_string(&file)?;
            let parsed = parse_events(&content).map_err(|e| match e {
                CalError::Parse(msg) => CalError::Parse(format!("{}: {msg}", file.display())),
                other => other,
            })?;
            events.extend(parsed);
        }

        let agenda = Agenda {
            events,
            cycles: Vec::new(),
        };
        agenda.validate()?;

        debug!(path = %self.path.display(), events = agenda.events.len(), "loaded iCalendar events");
        Ok(agenda)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Parse every VEVENT in an iCalendar document.
///
/// VEVENTs without a UID or DTSTART are skipped with a warning.
pub fn parse_events(content: &str) -> CalResult<Vec<Event>> {
    let unfolded = unfold(content);
    let calendar = read_calendar(&unfolded).map_err(|e| CalError::Parse(e.to_string()))?;

    Ok(calendar
        .components
        .iter()
        .filter(|c| c.name == "VEVENT")
        .filter_map(parse_vevent)
        .collect())
}

fn parse_vevent(vevent: &Component) -> Option<Event> {
    let Some(uid) = vevent.find_prop("UID").map(|p| p.val.to_string()) else {
        warn!("skipping VEVENT without UID");
        return None;
    };

    let Some(start) = vevent
        .find_prop("DTSTART")
        .and_then(|p| DatePerhapsTime::try_from(p).ok())
    else {
        warn!(uid = %uid, "skipping VEVENT without a readable DTSTART");
        return None;
    };
    let start = to_local(start);

    let end = vevent
        .find_prop("DTEND")
        .and_then(|p| DatePerhapsTime::try_from(p).ok())
        .map(|end| match end {
            // All-day DTEND is exclusive: an event on Mar 5 ends on Mar 6
            DatePerhapsTime::Date(d) => (d - Duration::days(1)).and_time(NaiveTime::MIN).max(start),
            other => to_local(other),
        })
        .unwrap_or(start);

    let title = vevent
        .find_prop("SUMMARY")
        .map(|p| p.val.to_string())
        .unwrap_or_default();

    let event_type = vevent
        .find_prop("CATEGORIES")
        .and_then(|p| p.val.as_ref().split(',').next().map(str::trim).map(str::to_string))
        .filter(|c| !c.is_empty())
        .map(EventType::from)
        .unwrap_or_else(|| EventType::Other("other".to_string()));

    let attendee_ids = vevent
        .properties
        .iter()
        .filter(|p| p.name == "ATTENDEE")
        .map(attendee_id)
        .collect();

    Some(Event {
        id: uid,
        title,
        event_type,
        start,
        end,
        location: vevent.find_prop("LOCATION").map(|p| p.val.to_string()),
        description: vevent.find_prop("DESCRIPTION").map(|p| p.val.to_string()),
        attendee_ids,
    })
}

/// Convert icalendar's DatePerhapsTime to local wall-clock time.
fn to_local(dpt: DatePerhapsTime) -> NaiveDateTime {
    match dpt {
        DatePerhapsTime::Date(d) => d.and_time(NaiveTime::MIN),
        DatePerhapsTime::DateTime(cal_dt) => match cal_dt {
            CalendarDateTime::Utc(dt) => dt.with_timezone(&Local).naive_local(),
            CalendarDateTime::Floating(naive) => naive,
            CalendarDateTime::WithTimezone { date_time, tzid } => {
                match tzid.parse::<chrono_tz::Tz>() {
                    Ok(tz) => tz
                        .from_local_datetime(&date_time)
                        .earliest()
                        .map(|dt| dt.with_timezone(&Local).naive_local())
                        .unwrap_or(date_time),
                    // Unknown zone: keep the wall-clock time as written
                    Err(_) => date_time,
                }
            }
        },
    }
}

/// Attendee email without the `mailto:` prefix.
fn attendee_id(prop: &Property) -> String {
    let val = prop.val.as_ref();
    val.strip_prefix("mailto:")
        .or_else(|| val.strip_prefix("MAILTO:"))
        .unwrap_or(val)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    const CALENDAR: &str = "BEGIN:VCALENDAR\r
VERSION:2.0\r
PRODID:-//Semisto//Admin//EN\r
BEGIN:VEVENT\r
UID:standup-1\r
SUMMARY:Standup\r
CATEGORIES:MEETING,INTERNAL\r
DTSTART:20240305T100000\r
DTEND:20240305T110000\r
ATTENDEE;CN=Alice:mailto:alice@example.com\r
ATTENDEE:mailto:bob@example.com\r
END:VEVENT\r
BEGIN:VEVENT\r
UID:fair-1\r
SUMMARY:Spring plant fair\r
CATEGORIES:market\r
DTSTART;VALUE=DATE:20240304\r
DTEND;VALUE=DATE:20240309\r
LOCATION:Nursery\r
END:VEVENT\r
BEGIN:VEVENT\r
UID:allday-1\r
SUMMARY:Inventory day\r
DTSTART;VALUE=DATE:20240312\r
DTEND;VALUE=DATE:20240313\r
END:VEVENT\r
BEGIN:VEVENT\r
SUMMARY:No uid\r
DTSTART:20240305T100000\r
END:VEVENT\r
END:VCALENDAR\r
";

    #[test]
    fn test_parse_timed_event() {
        let events = parse_events(CALENDAR).unwrap();
        let standup = events.iter().find(|e| e.id == "standup-1").unwrap();

        assert_eq!(standup.title, "Standup");
        assert_eq!(standup.event_type, EventType::Meeting);
        assert_eq!(standup.start, at(2024, 3, 5, 10, 0));
        assert_eq!(standup.end, at(2024, 3, 5, 11, 0));
        assert_eq!(standup.attendee_ids, vec!["alice@example.com", "bob@example.com"]);
        assert!(standup.is_single_day());
    }

    #[test]
    fn test_all_day_end_is_exclusive() {
        let events = parse_events(CALENDAR).unwrap();

        let fair = events.iter().find(|e| e.id == "fair-1").unwrap();
        assert_eq!(fair.event_type, EventType::Market);
        assert_eq!(fair.start, at(2024, 3, 4, 0, 0));
        assert_eq!(fair.end, at(2024, 3, 8, 0, 0));
        assert_eq!(fair.location.as_deref(), Some("Nursery"));

        let inventory = events.iter().find(|e| e.id == "allday-1").unwrap();
        assert!(inventory.is_single_day());
        assert_eq!(inventory.event_type, EventType::Other("other".into()));
    }

    #[test]
    fn test_vevent_without_uid_is_skipped() {
        let events = parse_events(CALENDAR).unwrap();
        assert_eq!(events.len(), 3);
    }

    #[test]
    fn test_fetch_reads_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.ics"), CALENDAR).unwrap();
        std::fs::write(dir.path().join("notes.txt"), "not a calendar").unwrap();

        let agenda = IcsSource::new(dir.path()).fetch().unwrap();
        assert_eq!(agenda.events.len(), 3);
        assert!(agenda.cycles.is_empty());
    }
}
