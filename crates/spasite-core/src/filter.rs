//! First-match-wins review filter.
//!
//! Each review gets exactly one [`FilterReason`] or none (approved). The
//! checks run in a fixed order and the first hit short-circuits the rest,
//! so a 3-star review with non-ASCII text is always `LowRating`.

use crate::reviews::{Blocklists, ClassifiedReview, FilterReason, RawReview};
use crate::text::{
    collapse_newlines, format_date_label, format_short_name, has_special_characters_in_name,
    has_unicode_characters, normalize_smart_punctuation,
};

/// Maximum review length, counted in UTF-16 code units.
pub const MAX_TEXT_LEN: usize = 250;

pub const MIN_RATING: u8 = 4;

const TRANSLATION_MARKER: &str = "(Translated by Google)";

/// Classifies one review against the current blocklists.
///
/// Never fails: absent text is treated as empty and an absent rating fails
/// the rating check.
#[must_use]
pub fn classify(raw: &RawReview, blocklists: &Blocklists) -> ClassifiedReview {
    let text = collapse_newlines(&normalize_smart_punctuation(&raw.text));
    let filter_reason = rejection_reason(raw, &text, blocklists);

    let author_name_formatted =
        format_short_name(&raw.author_name).unwrap_or_else(|| raw.author_name.clone());

    ClassifiedReview {
        author_name: raw.author_name.clone(),
        rating: raw.rating,
        relative_time_description: raw.relative_time_description.clone(),
        text,
        author_name_formatted,
        date_label: format_date_label(&raw.relative_time_description),
        filter_reason,
    }
}

/// Classifies every review, preserving input order.
#[must_use]
pub fn classify_all(raws: &[RawReview], blocklists: &Blocklists) -> Vec<ClassifiedReview> {
    raws.iter().map(|raw| classify(raw, blocklists)).collect()
}

fn rejection_reason(raw: &RawReview, text: &str, blocklists: &Blocklists) -> Option<FilterReason> {
    if text.trim().is_empty() {
        return Some(FilterReason::EmptyText);
    }

    if raw.rating.is_none_or(|rating| rating < MIN_RATING) {
        return Some(FilterReason::LowRating);
    }

    if text.encode_utf16().count() > MAX_TEXT_LEN {
        return Some(FilterReason::TooLong);
    }

    if text.contains(TRANSLATION_MARKER) {
        return Some(FilterReason::Translated);
    }

    if has_unicode_characters(text) {
        return Some(FilterReason::UnicodeText);
    }

    let folded = text.to_lowercase();
    if let Some(word) = blocklists
        .words
        .iter()
        .find(|word| !word.is_empty() && folded.contains(&word.to_lowercase()))
    {
        return Some(FilterReason::BlocklistedWord(word.clone()));
    }

    if blocklists
        .timestamps
        .contains(&raw.relative_time_description)
    {
        return Some(FilterReason::BlocklistedTimestamp);
    }

    if has_special_characters_in_name(&raw.author_name) {
        return Some(FilterReason::SpecialCharsName);
    }

    if raw.author_name.split_whitespace().count() > 2 {
        return Some(FilterReason::TooManyNameParts);
    }

    // Unreachable while the check above enforces the same two-token limit.
    if format_short_name(&raw.author_name).is_none() {
        return Some(FilterReason::InvalidNameFormat);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review(author: &str, rating: Option<u8>, ts: &str, text: &str) -> RawReview {
        RawReview {
            author_name: author.to_string(),
            rating,
            relative_time_description: ts.to_string(),
            text: text.to_string(),
        }
    }

    fn good(text: &str) -> RawReview {
        review("Jane Doe", Some(5), "2024-01-01T00:00:00Z", text)
    }

    fn reason(raw: &RawReview) -> Option<FilterReason> {
        classify(raw, &Blocklists::default()).filter_reason
    }

    #[test]
    fn approves_a_clean_review() {
        let c = classify(&good("Great!"), &Blocklists::default());
        assert!(c.is_approved());
        assert_eq!(c.author_name_formatted, "Jane D.");
    }

    #[test]
    fn empty_and_whitespace_text_rejected_first() {
        assert_eq!(
            reason(&review("x!", Some(1), "", "  \n ")),
            Some(FilterReason::EmptyText)
        );
    }

    #[test]
    fn missing_rating_counts_as_low() {
        assert_eq!(
            reason(&review("Jane Doe", None, "", "Nice")),
            Some(FilterReason::LowRating)
        );
    }

    #[test]
    fn low_rating_wins_over_unicode_and_length() {
        let long_unicode = "é".repeat(400);
        for rating in 1..=3 {
            assert_eq!(
                reason(&review("Jane Doe", Some(rating), "", &long_unicode)),
                Some(FilterReason::LowRating)
            );
        }
    }

    #[test]
    fn length_is_counted_in_utf16_units() {
        assert_eq!(reason(&good(&"a".repeat(250))), None);
        assert_eq!(reason(&good(&"a".repeat(251))), Some(FilterReason::TooLong));
    }

    #[test]
    fn translated_reviews_rejected_before_unicode() {
        assert_eq!(
            reason(&good("Très bien (Translated by Google) Very good")),
            Some(FilterReason::Translated)
        );
    }

    #[test]
    fn unicode_text_rejected_but_smart_punctuation_is_not() {
        assert_eq!(reason(&good("ดีมาก")), Some(FilterReason::UnicodeText));
        assert_eq!(reason(&good("It\u{2019}s \u{201C}perfect\u{201D}\u{2026}")), None);
    }

    #[test]
    fn blocklisted_word_reports_first_in_list_order() {
        let lists = Blocklists::new(Vec::new(), vec!["bomb".into(), "atom".into()]);
        let c = classify(&good("An ATOM bomb of relaxation"), &lists);
        assert_eq!(
            c.filter_reason,
            Some(FilterReason::BlocklistedWord("bomb".into()))
        );
    }

    #[test]
    fn blocklisted_timestamp_is_exact_match() {
        let lists = Blocklists::new(vec!["2024-01-01T00:00:00Z".to_string()], Vec::new());
        assert_eq!(
            classify(&good("Great!"), &lists).filter_reason,
            Some(FilterReason::BlocklistedTimestamp)
        );

        let other = review("Jane Doe", Some(5), "2024-01-01T00:00:01Z", "Great!");
        assert!(classify(&other, &lists).is_approved());
    }

    #[test]
    fn name_checks_run_in_order() {
        assert_eq!(
            reason(&review("J. Doe", Some(5), "", "Great")),
            Some(FilterReason::SpecialCharsName)
        );
        assert_eq!(
            reason(&review("Anne Marie Smith", Some(5), "", "Great")),
            Some(FilterReason::TooManyNameParts)
        );
    }

    #[test]
    fn rejected_reviews_still_get_display_fields() {
        let c = classify(
            &review("Anne Marie Smith", Some(5), "2024-03-15T12:00:00Z", "Great"),
            &Blocklists::default(),
        );
        assert_eq!(c.author_name_formatted, "Anne Marie Smith");
        assert_ne!(c.date_label, "Recent");
    }

    #[test]
    fn newlines_are_collapsed_regardless_of_outcome() {
        let c = classify(
            &review("Jane Doe", Some(2), "", "Bad\n\nservice"),
            &Blocklists::default(),
        );
        assert_eq!(c.text, "Bad service");
        assert_eq!(c.filter_reason, Some(FilterReason::LowRating));
    }

    #[test]
    fn classify_all_preserves_order() {
        let raws = vec![good("One"), review("Bob Lee", Some(1), "", "Two")];
        let out = classify_all(&raws, &Blocklists::default());
        assert_eq!(out[0].text, "One");
        assert_eq!(out[1].filter_reason, Some(FilterReason::LowRating));
    }
}
