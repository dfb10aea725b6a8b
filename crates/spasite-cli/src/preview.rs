//! Read-only previews of what the public endpoints would return.
//!
//! These use the same resolution functions as the server, so an operator
//! can check a promotion window or a holiday notice before it goes live.

use std::fmt::Write as _;

use chrono::{DateTime, Local, NaiveDate, Utc};
use spasite_core::catalog::parse_instant;
use spasite_core::{resolve_holiday_notice, resolve_service_pricing, EnrichedService};
use spasite_db::DocumentStore;

/// Resolve `--at`, falling back to `now` when absent.
pub(crate) fn parse_at(raw: Option<&str>, now: DateTime<Utc>) -> anyhow::Result<DateTime<Utc>> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => {
            parse_instant(raw).ok_or_else(|| anyhow::anyhow!("cannot parse --at '{raw}'"))
        }
        None => Ok(now),
    }
}

/// Resolve `--date`, falling back to `today` when absent.
pub(crate) fn parse_date(raw: Option<&str>, today: NaiveDate) -> anyhow::Result<NaiveDate> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_err(|_| anyhow::anyhow!("--date must be YYYY-MM-DD, got '{raw}'")),
        None => Ok(today),
    }
}

/// One line per price; discounted prices show `was -> now`.
pub(crate) fn render_pricing(services: &[EnrichedService]) -> String {
    let mut out = String::new();
    for service in services {
        let promo = service
            .promo_label
            .as_deref()
            .map(|label| format!("  [{label}]"))
            .unwrap_or_default();
        let _ = writeln!(out, "{} ({}){promo}", service.name, service.id);
        for price in &service.prices {
            match price.promo_price {
                Some(promo_price) => {
                    let _ = writeln!(
                        out,
                        "  {:>4} min  {} -> {}",
                        price.duration, price.price, promo_price
                    );
                }
                None => {
                    let _ = writeln!(out, "  {:>4} min  {}", price.duration, price.price);
                }
            }
        }
    }
    out
}

pub(crate) async fn run_preview_pricing(
    store: &dyn DocumentStore,
    at: Option<&str>,
) -> anyhow::Result<()> {
    let at = parse_at(at, Utc::now())?;
    let services = spasite_db::list_services(store).await?;
    let promotions = spasite_db::list_promotions(store).await?;

    let enriched = resolve_service_pricing(&services, &promotions, at);
    if enriched.is_empty() {
        println!("no services in the catalog");
        return Ok(());
    }

    println!("pricing at {}", at.to_rfc3339());
    print!("{}", render_pricing(&enriched));
    Ok(())
}

pub(crate) async fn run_preview_holiday(
    store: &dyn DocumentStore,
    date: Option<&str>,
) -> anyhow::Result<()> {
    let reference = parse_date(date, Local::now().date_naive())?;
    let Some(hours) = spasite_db::load_business_hours(store).await? else {
        println!("no business hours stored yet; run `spasite-cli sync hours`");
        return Ok(());
    };
    let labels = spasite_db::load_holiday_labels(store).await?;

    match resolve_holiday_notice(&hours, &labels, reference) {
        Some(notice) => println!("{}", serde_json::to_string_pretty(&notice)?),
        None => println!("no holiday notice for {reference} or the day after"),
    }
    Ok(())
}
