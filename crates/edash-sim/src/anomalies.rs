//! ---
//! ems_section: "11-simulation"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Randomized anomaly sampling for the dashboard table."
//! ems_version: "v0.1.0"
//! ems_owner: "tbd"
//! ---
use chrono::{DateTime, Duration, Utc};
use edash_common::Period;
use rand::Rng;

use crate::errors::{span_start, Result};
use crate::model::{Anomaly, AnomalyKind, Location, Severity};

/// Number of anomalies sampled per fetch, independent of the period.
pub const ANOMALY_BATCH_SIZE: usize = 5;

const CONSUMPTION_RANGE: (f64, f64) = (150.0, 250.0);

/// Sample [`ANOMALY_BATCH_SIZE`] flagged readings within the period's span.
///
/// Severity, kind and the whole-hour offset are drawn independently. The
/// location named in the description cycles through [`Location::ALL`] by
/// index rather than being drawn at random.
pub fn sample_anomalies<R: Rng>(
    rng: &mut R,
    period: Period,
    reference: DateTime<Utc>,
) -> Result<Vec<Anomaly>> {
    let max_hours_back = period.max_hours_back();
    span_start(reference, max_hours_back)?;
    let anomalies = (0..ANOMALY_BATCH_SIZE)
        .map(|i| {
            let hours_back = rng.gen_range(0..max_hours_back);
            let severity = Severity::ALL[rng.gen_range(0..Severity::ALL.len())];
            let kind = AnomalyKind::ALL[rng.gen_range(0..AnomalyKind::ALL.len())];
            let location = Location::ALL[i % Location::ALL.len()];
            Anomaly {
                id: format!("anomaly-{i}"),
                timestamp: reference - Duration::hours(hours_back),
                severity,
                kind,
                description: format!("Detected abnormal energy consumption in {location}"),
                consumption: rng.gen_range(CONSUMPTION_RANGE.0..CONSUMPTION_RANGE.1),
            }
        })
        .collect();
    Ok(anomalies)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn reference() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 15, 23, 59, 59).unwrap()
    }

    #[test]
    fn batch_size_is_fixed_for_every_period() {
        let mut rng = StdRng::seed_from_u64(10);
        for period in Period::ALL {
            assert_eq!(
                sample_anomalies(&mut rng, period, reference()).unwrap().len(),
                ANOMALY_BATCH_SIZE
            );
        }
    }

    #[test]
    fn offsets_stay_inside_period_span() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..100 {
            for period in Period::ALL {
                let earliest = reference() - Duration::hours(period.max_hours_back());
                for anomaly in sample_anomalies(&mut rng, period, reference()).unwrap() {
                    assert!(anomaly.timestamp <= reference());
                    assert!(anomaly.timestamp > earliest);
                    let offset = reference() - anomaly.timestamp;
                    assert_eq!(offset.num_seconds() % 3600, 0);
                }
            }
        }
    }

    #[test]
    fn consumption_within_flagged_range() {
        let mut rng = StdRng::seed_from_u64(12);
        for _ in 0..100 {
            for anomaly in sample_anomalies(&mut rng, Period::Daily, reference()).unwrap() {
                assert!(anomaly.consumption >= 150.0 && anomaly.consumption < 250.0);
            }
        }
    }

    #[test]
    fn descriptions_cycle_through_locations() {
        let mut rng = StdRng::seed_from_u64(13);
        let anomalies = sample_anomalies(&mut rng, Period::Weekly, reference()).unwrap();
        let expected = [
            "Building A",
            "Building B",
            "Building C",
            "Residential Area",
            "Building A",
        ];
        for (anomaly, location) in anomalies.iter().zip(expected) {
            assert_eq!(
                anomaly.description,
                format!("Detected abnormal energy consumption in {location}")
            );
        }
    }

    #[test]
    fn severity_and_kind_vary_across_samples() {
        let mut rng = StdRng::seed_from_u64(14);
        let mut severities = HashSet::new();
        let mut kinds = HashSet::new();
        for _ in 0..50 {
            for anomaly in sample_anomalies(&mut rng, Period::Monthly, reference()).unwrap() {
                severities.insert(anomaly.severity);
                kinds.insert(anomaly.kind);
            }
        }
        assert_eq!(severities.len(), Severity::ALL.len());
        assert_eq!(kinds.len(), AnomalyKind::ALL.len());
    }
}
