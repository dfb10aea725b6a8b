//! Picks the bounded, shuffled set of reviews shown on the public site.

use std::collections::HashSet;

use chrono::{DateTime, Months, Utc};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::reviews::{ClassifiedReview, PublicReview};
use crate::text::parse_review_instant;

/// Accessors the sampler needs from a review record.
pub trait DisplayReview {
    fn timestamp(&self) -> &str;
    fn text(&self) -> &str;
}

impl DisplayReview for PublicReview {
    fn timestamp(&self) -> &str {
        &self.relative_time_description
    }

    fn text(&self) -> &str {
        &self.text
    }
}

impl DisplayReview for ClassifiedReview {
    fn timestamp(&self) -> &str {
        &self.relative_time_description
    }

    fn text(&self) -> &str {
        &self.text
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplePolicy {
    pub target_count: usize,
    /// Trailing window, in months, that counts as "recent".
    pub recent_months: u32,
    /// Slots reserved for recent reviews.
    pub recent_quota: usize,
}

impl Default for SamplePolicy {
    fn default() -> Self {
        Self {
            target_count: 12,
            recent_months: 12,
            recent_quota: 6,
        }
    }
}

/// [`select_display_subset_with_rng`] using the thread-local RNG.
#[must_use]
pub fn select_display_subset<T>(pool: &[T], policy: &SamplePolicy, now: DateTime<Utc>) -> Vec<T>
where
    T: DisplayReview + Clone,
{
    select_display_subset_with_rng(pool, policy, now, &mut rand::rng())
}

/// Selects up to `policy.target_count` distinct reviews, biased toward the
/// recent window.
///
/// Pools no larger than the target are returned whole in random order.
/// Otherwise up to `recent_quota` recent reviews are drawn first, the rest
/// of the slots are filled from everything not yet chosen, and the result
/// is shuffled once more. Reviews are told apart by timestamp, or by text
/// when the timestamp is blank.
pub fn select_display_subset_with_rng<T, R>(
    pool: &[T],
    policy: &SamplePolicy,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Vec<T>
where
    T: DisplayReview + Clone,
    R: Rng + ?Sized,
{
    if pool.len() <= policy.target_count {
        let mut all = pool.to_vec();
        all.shuffle(rng);
        return all;
    }

    let cutoff = now
        .checked_sub_months(Months::new(policy.recent_months))
        .unwrap_or(DateTime::<Utc>::MIN_UTC);

    let mut recent: Vec<&T> = pool
        .iter()
        .filter(|r| parse_review_instant(r.timestamp()).is_some_and(|at| at >= cutoff))
        .collect();
    recent.shuffle(rng);
    recent.truncate(policy.recent_quota.min(policy.target_count));

    let chosen: HashSet<&str> = recent.iter().map(|r| dedup_key(*r)).collect();
    let mut remaining: Vec<&T> = pool
        .iter()
        .filter(|r| !chosen.contains(dedup_key(*r)))
        .collect();
    remaining.shuffle(rng);

    let needed = policy.target_count.saturating_sub(recent.len());
    let mut combined: Vec<T> = recent
        .into_iter()
        .chain(remaining.into_iter().take(needed))
        .cloned()
        .collect();
    combined.shuffle(rng);
    combined
}

fn dedup_key<T: DisplayReview>(review: &T) -> &str {
    let ts = review.timestamp();
    if ts.trim().is_empty() {
        review.text()
    } else {
        ts
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap()
    }

    fn review(ts: &str, text: &str) -> PublicReview {
        PublicReview {
            author_name_formatted: "Kai".into(),
            rating: Some(5),
            relative_time_description: ts.into(),
            text: text.into(),
            date_label: "Recent".into(),
        }
    }

    /// `recent` reviews dated in 2026, `old` reviews dated in 2020.
    fn pool(recent: usize, old: usize) -> Vec<PublicReview> {
        let mut out = Vec::new();
        for i in 0..recent {
            out.push(review(&format!("2026-03-{:02}T00:00:00Z", i + 1), &format!("new {i}")));
        }
        for i in 0..old {
            out.push(review(&format!("2020-03-{:02}T00:00:00Z", i + 1), &format!("old {i}")));
        }
        out
    }

    #[test]
    fn large_pool_yields_exactly_target_distinct_reviews() {
        let reviews = pool(9, 14);
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let picked =
                select_display_subset_with_rng(&reviews, &SamplePolicy::default(), now(), &mut rng);
            assert_eq!(picked.len(), 12);
            let keys: HashSet<&str> = picked.iter().map(|r| r.text.as_str()).collect();
            assert_eq!(keys.len(), 12, "duplicate review selected with seed {seed}");
        }
    }

    #[test]
    fn small_pool_is_a_permutation() {
        let reviews = pool(4, 8);
        let mut rng = StdRng::seed_from_u64(7);
        let picked =
            select_display_subset_with_rng(&reviews, &SamplePolicy::default(), now(), &mut rng);

        let mut expected: Vec<&str> = reviews.iter().map(|r| r.text.as_str()).collect();
        let mut got: Vec<&str> = picked.iter().map(|r| r.text.as_str()).collect();
        expected.sort_unstable();
        got.sort_unstable();
        assert_eq!(expected, got);
    }

    #[test]
    fn recent_quota_is_honoured() {
        let reviews = pool(10, 20);
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let picked =
                select_display_subset_with_rng(&reviews, &SamplePolicy::default(), now(), &mut rng);
            let recent = picked.iter().filter(|r| r.text.starts_with("new")).count();
            assert!(recent >= 6, "only {recent} recent reviews with seed {seed}");
        }
    }

    #[test]
    fn every_recent_review_is_kept_when_under_quota() {
        let reviews = pool(3, 20);
        let mut rng = StdRng::seed_from_u64(3);
        let picked =
            select_display_subset_with_rng(&reviews, &SamplePolicy::default(), now(), &mut rng);
        assert_eq!(picked.iter().filter(|r| r.text.starts_with("new")).count(), 3);
        assert_eq!(picked.len(), 12);
    }

    #[test]
    fn blank_timestamps_fall_back_to_text_identity() {
        let mut reviews = pool(0, 10);
        for i in 0..6 {
            reviews.push(review("", &format!("undated {i}")));
        }
        let mut rng = StdRng::seed_from_u64(11);
        let picked =
            select_display_subset_with_rng(&reviews, &SamplePolicy::default(), now(), &mut rng);
        let keys: HashSet<&str> = picked.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(keys.len(), 12);
    }

    #[test]
    fn empty_pool_returns_empty() {
        let picked: Vec<PublicReview> =
            select_display_subset(&[], &SamplePolicy::default(), now());
        assert!(picked.is_empty());
    }
}
