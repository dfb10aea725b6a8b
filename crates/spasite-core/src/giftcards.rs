//! Seasonal gift-card campaigns keyed by month-day windows.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::CoreError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GiftCard {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub enabled: bool,
    /// `MM-DD`, inclusive.
    pub start: String,
    /// `MM-DD`, inclusive. A window with `start > end` wraps over New Year.
    pub end: String,
}

impl GiftCard {
    #[must_use]
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        if !self.enabled {
            return false;
        }
        let (Some(start), Some(end)) = (parse_month_day(&self.start), parse_month_day(&self.end))
        else {
            return false;
        };
        let today = (date.month(), date.day());
        if start <= end {
            start <= today && today <= end
        } else {
            today >= start || today <= end
        }
    }

    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] when the id is empty or either
    /// bound is not a valid `MM-DD`.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.id.trim().is_empty() {
            return Err(CoreError::Validation("gift card id must be non-empty".into()));
        }
        for bound in [&self.start, &self.end] {
            if parse_month_day(bound).is_none() {
                return Err(CoreError::Validation(format!(
                    "gift card '{}' has invalid MM-DD bound '{bound}'",
                    self.id
                )));
            }
        }
        Ok(())
    }
}

fn parse_month_day(raw: &str) -> Option<(u32, u32)> {
    let (month, day) = raw.trim().split_once('-')?;
    let month: u32 = month.parse().ok()?;
    let day: u32 = day.parse().ok()?;
    // 2024 is a leap year, so 02-29 is accepted.
    NaiveDate::from_ymd_opt(2024, month, day).map(|_| (month, day))
}

/// Ids of the gift-card campaigns running on `date`, in input order.
#[must_use]
pub fn active_gift_card_ids(cards: &[GiftCard], date: NaiveDate) -> Vec<String> {
    cards
        .iter()
        .filter(|c| c.is_active_on(date))
        .map(|c| c.id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(start: &str, end: &str) -> GiftCard {
        GiftCard {
            id: "card".into(),
            label: "Card".into(),
            enabled: true,
            start: start.into(),
            end: end.into(),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn plain_window_is_inclusive() {
        let c = card("05-01", "05-14");
        assert!(c.is_active_on(date(2026, 5, 1)));
        assert!(c.is_active_on(date(2026, 5, 14)));
        assert!(!c.is_active_on(date(2026, 5, 15)));
        assert!(!c.is_active_on(date(2026, 4, 30)));
    }

    #[test]
    fn window_wraps_over_new_year() {
        let c = card("11-15", "01-05");
        assert!(c.is_active_on(date(2026, 12, 25)));
        assert!(c.is_active_on(date(2027, 1, 5)));
        assert!(!c.is_active_on(date(2027, 1, 6)));
        assert!(!c.is_active_on(date(2026, 11, 14)));
    }

    #[test]
    fn disabled_or_malformed_cards_are_inactive() {
        let mut c = card("01-01", "12-31");
        c.enabled = false;
        assert!(!c.is_active_on(date(2026, 6, 1)));
        assert!(!card("13-01", "12-31").is_active_on(date(2026, 6, 1)));
        assert!(card("13-01", "12-31").validate().is_err());
        assert!(card("02-29", "03-01").validate().is_ok());
    }

    #[test]
    fn active_ids_keep_order() {
        let mut a = card("01-01", "12-31");
        a.id = "a".into();
        let mut b = card("06-01", "06-30");
        b.id = "b".into();
        let mut c = card("01-01", "12-31");
        c.id = "c".into();
        assert_eq!(
            active_gift_card_ids(&[a, b, c], date(2026, 3, 1)),
            vec!["a".to_string(), "c".to_string()]
        );
    }
}
