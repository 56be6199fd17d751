//! Package health scoring
//!
//! Combines registry signals gathered elsewhere (downloads, publish date,
//! known vulnerabilities, deprecation) into a single 0-100 score.
//!
//! | Component       | Weight |
//! |-----------------|--------|
//! | Downloads       | 30%    |
//! | Freshness       | 30%    |
//! | Vulnerabilities | 25%    |
//! | Deprecation     | 15%    |

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::facts::PackageMetrics;

/// Overall verdict for a health score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HealthStatus {
    Healthy,
    Warning,
    Critical,
}

impl HealthStatus {
    fn from_score(score: u32) -> Self {
        match score {
            80.. => HealthStatus::Healthy,
            60..=79 => HealthStatus::Warning,
            _ => HealthStatus::Critical,
        }
    }
}

/// Composite health score for a package
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthScore {
    /// Overall score 0-100
    pub score: u32,
    pub downloads_score: u32,
    pub freshness_score: u32,
    pub vulnerability_score: u32,
    pub deprecation_score: u32,
    pub vulnerability_count: u32,
    pub is_deprecated: bool,
    pub status: HealthStatus,
}

impl HealthScore {
    /// Compute a score as of now
    pub fn compute(
        total_downloads: u64,
        last_published: Option<DateTime<Utc>>,
        vulnerability_count: u32,
        is_deprecated: bool,
    ) -> Self {
        Self::compute_at(
            total_downloads,
            last_published,
            vulnerability_count,
            is_deprecated,
            Utc::now(),
        )
    }

    /// Compute a score relative to `now`
    pub fn compute_at(
        total_downloads: u64,
        last_published: Option<DateTime<Utc>>,
        vulnerability_count: u32,
        is_deprecated: bool,
        now: DateTime<Utc>,
    ) -> Self {
        let downloads_score = downloads_score(total_downloads);
        let freshness_score =
            last_published.map_or(50, |published| freshness_score(now - published));
        let vulnerability_score = 100u32.saturating_sub(vulnerability_count.saturating_mul(25));
        let deprecation_score = if is_deprecated { 0 } else { 100 };

        let weighted = downloads_score * 30
            + freshness_score * 30
            + vulnerability_score * 25
            + deprecation_score * 15;
        let score = round_half_even(weighted, 100);

        Self {
            score,
            downloads_score,
            freshness_score,
            vulnerability_score,
            deprecation_score,
            vulnerability_count,
            is_deprecated,
            status: HealthStatus::from_score(score),
        }
    }

    /// Compute a score from collected metrics
    pub fn from_metrics(metrics: &PackageMetrics, now: DateTime<Utc>) -> Self {
        Self::compute_at(
            metrics.total_downloads,
            metrics.last_published,
            metrics.vulnerability_count,
            metrics.is_deprecated,
            now,
        )
    }
}

fn downloads_score(total: u64) -> u32 {
    match total {
        10_000_000.. => 100,
        1_000_000.. => 80,
        100_000.. => 60,
        10_000.. => 40,
        1_000.. => 20,
        _ => 5,
    }
}

/// Score the time since the last publish; partial days count toward the next band
fn freshness_score(age: Duration) -> u32 {
    const BANDS: [(i64, u32); 5] = [(30, 100), (90, 85), (180, 70), (365, 50), (730, 30)];

    BANDS
        .iter()
        .find(|(days, _)| age <= Duration::days(*days))
        .map_or(10, |&(_, score)| score)
}

/// `numerator / denominator` rounded to nearest, ties to even
fn round_half_even(numerator: u32, denominator: u32) -> u32 {
    let quotient = numerator / denominator;
    let twice_remainder = (numerator % denominator) * 2;
    if twice_remainder > denominator || (twice_remainder == denominator && quotient % 2 == 1) {
        quotient + 1
    } else {
        quotient
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_popular_fresh_package_is_healthy() {
        let score = HealthScore::compute_at(50_000_000, Some(now() - Duration::days(10)), 0, false, now());
        assert_eq!(score.score, 100);
        assert_eq!(score.status, HealthStatus::Healthy);
    }

    #[test]
    fn test_unknown_publish_date_is_neutral() {
        let score = HealthScore::compute_at(0, None, 0, false, now());
        assert_eq!(score.freshness_score, 50);
        assert_eq!(score.downloads_score, 5);
        // 5*0.30 + 50*0.30 + 100*0.25 + 100*0.15 = 56.5 -> 56
        assert_eq!(score.score, 56);
        assert_eq!(score.status, HealthStatus::Critical);
    }

    #[test]
    fn test_vulnerabilities_cost_25_points_each() {
        let score = HealthScore::compute_at(1_000, None, 2, false, now());
        assert_eq!(score.vulnerability_score, 50);
        let score = HealthScore::compute_at(1_000, None, 9, false, now());
        assert_eq!(score.vulnerability_score, 0);
    }

    #[test]
    fn test_deprecated_package() {
        let score = HealthScore::compute_at(2_000_000, Some(now() - Duration::days(100)), 0, true, now());
        assert_eq!(score.deprecation_score, 0);
        assert_eq!(score.freshness_score, 70);
        // 80*0.30 + 70*0.30 + 100*0.25 + 0 = 70
        assert_eq!(score.score, 70);
        assert_eq!(score.status, HealthStatus::Warning);
    }

    #[test]
    fn test_freshness_thresholds() {
        assert_eq!(freshness_score(Duration::days(30)), 100);
        assert_eq!(freshness_score(Duration::days(31)), 85);
        assert_eq!(freshness_score(Duration::days(365)), 50);
        assert_eq!(freshness_score(Duration::days(730)), 30);
        assert_eq!(freshness_score(Duration::days(731)), 10);
        assert_eq!(freshness_score(Duration::days(-3)), 100);
    }

    #[test]
    fn test_partial_day_past_threshold_drops_a_band() {
        assert_eq!(freshness_score(Duration::days(30) + Duration::hours(12)), 85);
        assert_eq!(freshness_score(Duration::days(365) + Duration::seconds(1)), 30);

        let published = now() - Duration::days(30) - Duration::hours(12);
        let score = HealthScore::compute_at(0, Some(published), 0, false, now());
        assert_eq!(score.freshness_score, 85);
    }

    #[test]
    fn test_downloads_thresholds() {
        assert_eq!(downloads_score(999), 5);
        assert_eq!(downloads_score(1_000), 20);
        assert_eq!(downloads_score(99_999), 40);
        assert_eq!(downloads_score(10_000_000), 100);
    }

    #[test]
    fn test_round_half_even() {
        assert_eq!(round_half_even(5650, 100), 56);
        assert_eq!(round_half_even(5750, 100), 58);
        assert_eq!(round_half_even(5651, 100), 57);
        assert_eq!(round_half_even(5649, 100), 56);
    }

    #[test]
    fn test_from_metrics() {
        let metrics = PackageMetrics {
            total_downloads: 150_000,
            last_published: Some(now() - Duration::days(400)),
            vulnerability_count: 1,
            is_deprecated: false,
        };
        let score = HealthScore::from_metrics(&metrics, now());
        // 60*0.30 + 30*0.30 + 75*0.25 + 100*0.15 = 60.75 -> 61
        assert_eq!(score.score, 61);
        assert_eq!(score.status, HealthStatus::Warning);
    }
}
