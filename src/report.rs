//! City impact report page.
//!
//! Composes an already-aggregated [`ImpactReport`] into a
//! [`DocumentRequest`]. Aggregating donations into the report belongs to the
//! ledger; this module only lays out the numbers it is given.

use crate::receipt::format_cad;
use crate::writer::DocumentRequest;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reporting window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportPeriod {
    /// Window start
    pub start: DateTime<Utc>,
    /// Window end
    pub end: DateTime<Utc>,
}

impl ReportPeriod {
    fn label(&self) -> String {
        format!(
            "{} - {}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}

/// Period-wide totals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportTotals {
    /// Sum of donations in cents
    pub donations_cents: i64,
    /// Sum of tips in cents
    #[serde(default)]
    pub tips_cents: i64,
    /// Distinct participants who received a donation
    pub active_participants: u64,
}

/// Donation totals per spending category, in cents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
#[allow(missing_docs)]
pub struct CategoryTotals {
    pub food: i64,
    pub hygiene: i64,
    pub transport: i64,
    pub clothing: i64,
    pub flexible: i64,
}

impl CategoryTotals {
    /// Categories in display order.
    pub fn entries(&self) -> [(&'static str, i64); 5] {
        [
            ("Food", self.food),
            ("Hygiene", self.hygiene),
            ("Transport", self.transport),
            ("Clothing", self.clothing),
            ("Flexible", self.flexible),
        ]
    }
}

/// Participation figures for one borough.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoroughRow {
    /// Borough (or shelter) name
    pub borough: String,
    /// Active share of registered participants, 0.0 to 1.0
    pub participation_rate: f64,
    /// Average donation per active participant, in cents
    pub avg_donation_per_participant: f64,
}

/// Community pool movements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityPool {
    /// Allocated to the pool during the period
    pub total_allocated_cents: i64,
    /// Current pool balance
    pub balance_cents: i64,
    /// Redeemed from the pool during the period
    pub total_redemptions_cents: i64,
}

/// Aggregated impact figures handed over by the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactReport {
    /// Reporting window
    pub period: ReportPeriod,
    /// Period totals
    pub totals: ReportTotals,
    /// Per-category donation totals
    #[serde(default)]
    pub category_totals: CategoryTotals,
    /// Tips divided by donations
    pub tip_ratio: f64,
    /// Per-borough rows, in display order
    #[serde(default)]
    pub boroughs: Vec<BoroughRow>,
    /// Community pool figures
    #[serde(default)]
    pub community_pool: CommunityPool,
}

/// Single-page city impact report.
pub fn report_document(report: &ImpactReport) -> DocumentRequest {
    let period = report.period.label();

    let mut lines = vec![
        format!("Reporting period: {}", period),
        format!("Total donations: {}", format_cad(report.totals.donations_cents)),
        format!("Active participants: {}", report.totals.active_participants),
        format!("Tip sustainability ratio: {:.1}%", report.tip_ratio * 100.0),
        "Category totals:".to_string(),
    ];
    for (category, cents) in report.category_totals.entries() {
        lines.push(format!("  {}: {}", category, format_cad(cents)));
    }

    lines.push("Borough participation:".to_string());
    for row in &report.boroughs {
        lines.push(format!(
            "  {}: {:.0}% participation, avg {}",
            row.borough,
            row.participation_rate * 100.0,
            format_cad(row.avg_donation_per_participant.round() as i64)
        ));
    }

    let pool = &report.community_pool;
    lines.push("Community pool:".to_string());
    lines.push(format!(
        "  Allocated: {} (balance {})",
        format_cad(pool.total_allocated_cents),
        format_cad(pool.balance_cents)
    ));
    lines.push(format!("  Redemptions: {}", format_cad(pool.total_redemptions_cents)));

    DocumentRequest::new("DigniPay — City Impact Report")
        .with_subtitle(format!("Period: {}", period))
        .lines(lines)
        .with_footer("All data is anonymized and aggregated for public accountability.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_entries_order() {
        let totals = CategoryTotals {
            food: 1,
            clothing: 4,
            ..Default::default()
        };
        let names: Vec<_> = totals.entries().iter().map(|(name, _)| *name).collect();
        assert_eq!(names, ["Food", "Hygiene", "Transport", "Clothing", "Flexible"]);
        assert_eq!(totals.entries()[3].1, 4);
    }

    #[test]
    fn test_missing_categories_default_to_zero() {
        let totals: CategoryTotals = serde_json::from_str(r#"{"Food": 1200}"#).unwrap();
        assert_eq!(totals.food, 1200);
        assert_eq!(totals.flexible, 0);
    }
}
