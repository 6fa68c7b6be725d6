use std::fmt::Write;

use chrono::{DateTime, Utc};

use crate::charts::{number, percent};
use crate::models::{AnalyticsPayload, RiskDistribution};

#[derive(Debug, Clone, PartialEq)]
pub struct RiskBand {
    pub label: &'static str,
    pub count: u64,
    pub share: f64,
}

pub fn summarize_distribution(distribution: &RiskDistribution) -> Vec<RiskBand> {
    let total = distribution
        .high
        .saturating_add(distribution.medium)
        .saturating_add(distribution.low);
    let mut bands: Vec<RiskBand> = [
        ("High", distribution.high),
        ("Medium", distribution.medium),
        ("Low", distribution.low),
    ]
    .into_iter()
    .map(|(label, count)| RiskBand {
        label,
        count,
        share: if total == 0 {
            0.0
        } else {
            count as f64 / total as f64
        },
    })
    .collect();

    bands.sort_by(|a, b| b.count.cmp(&a.count));
    bands
}

pub fn build_report(payload: &AnalyticsPayload, generated_at: DateTime<Utc>) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Readmission Analytics Report");
    let _ = writeln!(
        output,
        "Generated {}",
        generated_at.format("%Y-%m-%d %H:%M UTC")
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Headline Metrics");
    let _ = writeln!(
        output,
        "- Readmission rate: {}%",
        number(payload.readmission_rate)
    );
    let _ = writeln!(
        output,
        "- Average risk score: {}%",
        number(payload.avg_risk_score)
    );
    let _ = writeln!(output, "- Average stay: {} days", number(payload.avg_stay));
    let _ = writeln!(output, "- Patients assessed: {}", payload.total_assessed);

    let _ = writeln!(output);
    let _ = writeln!(output, "## Risk Distribution");
    let bands = summarize_distribution(&payload.risk_distribution);
    if bands.iter().all(|band| band.count == 0) {
        let _ = writeln!(output, "No patients have been scored yet.");
    } else {
        for band in &bands {
            let _ = writeln!(
                output,
                "- {} risk: {} patients ({})",
                band.label,
                band.count,
                percent(band.share)
            );
        }
    }

    let metrics = &payload.model_metrics;
    let _ = writeln!(output);
    let _ = writeln!(output, "## Model Performance");
    let _ = writeln!(output, "- Accuracy: {}", percent(metrics.accuracy));
    let _ = writeln!(output, "- Precision: {}", percent(metrics.precision));
    let _ = writeln!(output, "- Recall: {}", percent(metrics.recall));
    let _ = writeln!(output, "- F1 score: {}", percent(metrics.f1_score));

    let _ = writeln!(output);
    let _ = writeln!(output, "## Quick Stats");
    let _ = writeln!(
        output,
        "- Average prediction time: {}s",
        number(payload.quick_stats.avg_prediction_time)
    );
    let _ = writeln!(
        output,
        "- Success rate: {}%",
        number(payload.quick_stats.success_rate)
    );

    output
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::fetcher::decode_section;
    use crate::models::{SectionKind, SectionPayload};
    use crate::test_support;

    fn analytics() -> AnalyticsPayload {
        match decode_section(SectionKind::Analytics, test_support::ANALYTICS_BODY.as_bytes()) {
            Ok(SectionPayload::Analytics(payload)) => payload,
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    #[test]
    fn bands_are_sorted_by_count_with_shares() {
        let bands = summarize_distribution(&RiskDistribution {
            high: 1,
            medium: 6,
            low: 3,
        });

        assert_eq!(bands[0].label, "Medium");
        assert!((bands[0].share - 0.6).abs() < 1e-9);
        assert_eq!(bands[2].label, "High");
    }

    #[test]
    fn empty_distribution_has_zero_shares() {
        let bands = summarize_distribution(&RiskDistribution {
            high: 0,
            medium: 0,
            low: 0,
        });
        assert!(bands.iter().all(|band| band.share == 0.0));
    }

    #[test]
    fn huge_counts_do_not_overflow() {
        let bands = summarize_distribution(&RiskDistribution {
            high: u64::MAX,
            medium: 1,
            low: 0,
        });
        assert_eq!(bands[0].label, "High");
        assert!((bands[0].share - 1.0).abs() < 1e-9);
    }

    #[test]
    fn report_lists_every_section() {
        let generated_at = Utc.with_ymd_and_hms(2026, 3, 4, 9, 30, 0).unwrap();
        let report = build_report(&analytics(), generated_at);

        assert!(report.starts_with("# Readmission Analytics Report\nGenerated 2026-03-04 09:30 UTC\n"));
        assert!(report.contains("- Readmission rate: 12.5%"));
        assert!(report.contains("- Average stay: 5 days"));
        assert!(report.contains("- High risk: 10 patients (83.3%)"));
        assert!(report.contains("- Accuracy: 87.3%"));
        assert!(report.contains("- Success rate: 95.7%"));
    }
}
