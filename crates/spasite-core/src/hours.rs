//! Business hours and the closure/early-closing notice shown on the site.

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegularHours {
    pub day: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close: Option<String>,
    #[serde(default)]
    pub closed: bool,
}

/// A dated exception to the regular schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialHours {
    /// `YYYY-MM-DD`.
    pub date: String,
    #[serde(default)]
    pub closed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessHoursRecord {
    #[serde(default)]
    pub regular_hours: Vec<RegularHours>,
    #[serde(default)]
    pub special_hours: Vec<SpecialHours>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HolidayNotice {
    pub has_holiday: bool,
    pub is_today: bool,
    pub title: String,
    pub message: String,
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub holiday_name: Option<String>,
}

/// Decides whether a notice should be shown for `reference` or the day
/// after.
///
/// Today's exception takes priority and suppresses the tomorrow lookup.
#[must_use]
pub fn resolve_holiday_notice(
    hours: &BusinessHoursRecord,
    labels: &BTreeMap<String, String>,
    reference: NaiveDate,
) -> Option<HolidayNotice> {
    let today = reference.format("%Y-%m-%d").to_string();
    if let Some(special) = find_special(hours, &today) {
        return Some(build_notice(special, labels, true));
    }

    let tomorrow = reference
        .checked_add_days(Days::new(1))?
        .format("%Y-%m-%d")
        .to_string();
    find_special(hours, &tomorrow).map(|special| build_notice(special, labels, false))
}

fn find_special<'a>(hours: &'a BusinessHoursRecord, date: &str) -> Option<&'a SpecialHours> {
    hours.special_hours.iter().find(|s| s.date.trim() == date)
}

fn build_notice(
    special: &SpecialHours,
    labels: &BTreeMap<String, String>,
    is_today: bool,
) -> HolidayNotice {
    let when = if is_today { "today" } else { "tomorrow" };
    let holiday_name = labels
        .get(special.date.trim())
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty());
    let suffix = holiday_name
        .as_deref()
        .map(|name| format!(" for {name}"))
        .unwrap_or_default();

    let (title, message, time) = if special.closed {
        (
            format!("Closed {}", capitalize_when(when)),
            format!("We are closed {when}{suffix}."),
            None,
        )
    } else {
        let time = special.close.as_deref().map(format_time_12h);
        let message = match &time {
            Some(t) => format!("We close early at {t} {when}{suffix}."),
            None => format!("We close early {when}{suffix}."),
        };
        (
            format!("Early Closing {}", capitalize_when(when)),
            message,
            time,
        )
    };

    HolidayNotice {
        has_holiday: true,
        is_today,
        title,
        message,
        date: special.date.trim().to_string(),
        time,
        holiday_name,
    }
}

fn capitalize_when(when: &str) -> &'static str {
    if when == "today" {
        "Today"
    } else {
        "Tomorrow"
    }
}

/// `"15:30"` becomes `"3:30 PM"`, `"15:00"` becomes `"3 PM"`. Input that is
/// not `HH:MM` is returned unchanged.
#[must_use]
pub fn format_time_12h(raw: &str) -> String {
    let Ok(time) = NaiveTime::parse_from_str(raw.trim(), "%H:%M") else {
        return raw.to_string();
    };
    let (is_pm, hour) = time.hour12();
    let meridiem = if is_pm { "PM" } else { "AM" };
    if time.minute() == 0 {
        format!("{hour} {meridiem}")
    } else {
        format!("{hour}:{:02} {meridiem}", time.minute())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn special(date: &str, closed: bool, close: Option<&str>) -> SpecialHours {
        SpecialHours {
            date: date.into(),
            closed,
            open: None,
            close: close.map(str::to_string),
        }
    }

    fn hours(specials: Vec<SpecialHours>) -> BusinessHoursRecord {
        BusinessHoursRecord {
            regular_hours: Vec::new(),
            special_hours: specials,
            updated_at: None,
        }
    }

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn today_takes_priority_over_tomorrow() {
        let record = hours(vec![
            special("2026-12-25", true, None),
            special("2026-12-24", false, Some("15:00")),
        ]);
        let notice = resolve_holiday_notice(&record, &BTreeMap::new(), day("2026-12-24")).unwrap();
        assert!(notice.is_today);
        assert_eq!(notice.title, "Early Closing Today");
        assert_eq!(notice.time.as_deref(), Some("3 PM"));

        let record = hours(vec![
            special("2026-12-24", true, None),
            special("2026-12-25", false, Some("14:00")),
        ]);
        let notice = resolve_holiday_notice(&record, &BTreeMap::new(), day("2026-12-24")).unwrap();
        assert!(notice.is_today);
        assert_eq!(notice.title, "Closed Today");
    }

    #[test]
    fn tomorrow_notice_when_today_is_regular() {
        let record = hours(vec![special("2027-01-01", true, None)]);
        let mut labels = BTreeMap::new();
        labels.insert("2027-01-01".to_string(), "New Year's Day".to_string());

        let notice = resolve_holiday_notice(&record, &labels, day("2026-12-31")).unwrap();
        assert!(!notice.is_today);
        assert_eq!(notice.title, "Closed Tomorrow");
        assert_eq!(notice.message, "We are closed tomorrow for New Year's Day.");
        assert_eq!(notice.holiday_name.as_deref(), Some("New Year's Day"));
    }

    #[test]
    fn no_notice_without_matching_exception() {
        let record = hours(vec![special("2026-07-04", true, None)]);
        assert!(resolve_holiday_notice(&record, &BTreeMap::new(), day("2026-07-01")).is_none());
    }

    #[test]
    fn early_close_without_time_still_produces_notice() {
        let record = hours(vec![special("2026-11-26", false, None)]);
        let notice = resolve_holiday_notice(&record, &BTreeMap::new(), day("2026-11-26")).unwrap();
        assert_eq!(notice.message, "We close early today.");
        assert!(notice.time.is_none());
    }

    #[test]
    fn time_formatting() {
        assert_eq!(format_time_12h("15:30"), "3:30 PM");
        assert_eq!(format_time_12h("00:00"), "12 AM");
        assert_eq!(format_time_12h("12:05"), "12:05 PM");
        assert_eq!(format_time_12h("noon"), "noon");
    }

    #[test]
    fn hours_payload_parses_camel_case() {
        let json = r#"{"regularHours":[{"day":"Monday","open":"10:00","close":"20:00"}],
            "specialHours":[{"date":"2026-12-25","closed":true}],
            "updatedAt":"2026-10-01T00:00:00Z"}"#;
        let record: BusinessHoursRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.regular_hours.len(), 1);
        assert!(record.special_hours[0].closed);
    }
}
