//! ---
//! ems_section: "11-simulation"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Synthetic consumption series generation."
//! ems_version: "v0.1.0"
//! ems_owner: "tbd"
//! ---
use std::f64::consts::PI;

use chrono::{DateTime, Duration, Utc};
use edash_common::{BaseLevel, Period};
use rand::prelude::*;
use tracing::trace;

use crate::anomalies::sample_anomalies;
use crate::errors::{span_start, Result};
use crate::model::{Anomaly, DeviceType, Location, Reading, Suggestion};
use crate::suggestions::suggestion_catalog;

/// Amplitude of the cyclical component relative to the base level.
const CYCLE_AMPLITUDE: f64 = 0.3;
/// Half-width of the uniform jitter relative to the base level.
const NOISE_SPAN: f64 = 0.1;
/// Forecast error range relative to consumption, skewed upwards.
const PREDICTION_ERROR: (f64, f64) = (-0.3, 0.7);
const PREDICTION_SCALE: f64 = 0.1;

/// Generate one reading per period point, oldest first.
///
/// The last reading sits `hours_per_point` before `reference`, the first
/// `points * hours_per_point` before it. Fails when that span reaches past
/// the earliest representable instant.
pub fn generate_readings<R: Rng>(
    rng: &mut R,
    period: Period,
    reference: DateTime<Utc>,
) -> Result<Vec<Reading>> {
    let shape = period.shape();
    let points = shape.points;
    span_start(reference, points as i64 * shape.hours_per_point)?;
    let readings = (0..points)
        .map(|i| {
            let base = draw_base(rng, shape.base);
            let phase = 2.0 * PI * i as f64 / points as f64;
            let cyclical = phase.sin() * CYCLE_AMPLITUDE * base;
            let noise = rng.gen_range(-NOISE_SPAN..NOISE_SPAN) * base;
            let consumption = (base + cyclical + noise).max(0.0);
            let error = rng.gen_range(PREDICTION_ERROR.0..PREDICTION_ERROR.1);
            let prediction = consumption + error * PREDICTION_SCALE * consumption;
            let hours_back = (points - i) as i64 * shape.hours_per_point;
            Reading {
                id: format!("energy-{i}"),
                timestamp: reference - Duration::hours(hours_back),
                consumption,
                prediction,
                device_type: DeviceType::ALL[rng.gen_range(0..DeviceType::ALL.len())],
                location: Location::ALL[rng.gen_range(0..Location::ALL.len())],
            }
        })
        .collect();
    Ok(readings)
}

fn draw_base<R: Rng>(rng: &mut R, base: BaseLevel) -> f64 {
    match base {
        BaseLevel::Fixed(level) => level,
        BaseLevel::Uniform { low, high } => rng.gen_range(low..high),
    }
}

/// Owns the random source shared by all dashboard producers.
///
/// Seeded engines replay identical batches, which the tests and the
/// `--seed` flags rely on.
#[derive(Debug)]
pub struct SimulationEngine {
    rng: StdRng,
    seed: Option<u64>,
}

impl SimulationEngine {
    /// Build an engine from an optional seed; `None` seeds from entropy.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng, seed }
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(Some(seed))
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn readings(&mut self, period: Period, reference: DateTime<Utc>) -> Result<Vec<Reading>> {
        let readings = generate_readings(&mut self.rng, period, reference)?;
        trace!(%period, count = readings.len(), "generated readings");
        Ok(readings)
    }

    pub fn anomalies(&mut self, period: Period, reference: DateTime<Utc>) -> Result<Vec<Anomaly>> {
        let anomalies = sample_anomalies(&mut self.rng, period, reference)?;
        trace!(%period, count = anomalies.len(), "sampled anomalies");
        Ok(anomalies)
    }

    pub fn suggestions(&self) -> Vec<Suggestion> {
        suggestion_catalog()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SimError;
    use chrono::TimeZone;

    fn reference() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 30, 23, 59, 59).unwrap()
    }

    #[test]
    fn count_matches_period_points() {
        let mut rng = StdRng::seed_from_u64(1);
        for period in Period::ALL {
            let readings = generate_readings(&mut rng, period, reference()).unwrap();
            assert_eq!(readings.len(), period.points(), "{period}");
        }
    }

    #[test]
    fn consumption_is_never_negative() {
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..50 {
            for period in Period::ALL {
                for reading in generate_readings(&mut rng, period, reference()).unwrap() {
                    assert!(reading.consumption >= 0.0);
                    assert!(reading.consumption.is_finite());
                }
            }
        }
    }

    #[test]
    fn timestamps_step_back_from_reference() {
        let mut rng = StdRng::seed_from_u64(3);
        for period in Period::ALL {
            let readings = generate_readings(&mut rng, period, reference()).unwrap();
            let step = Duration::hours(period.hours_per_point());
            let last = readings.last().unwrap();
            assert_eq!(last.timestamp, reference() - step);
            let first = readings.first().unwrap();
            assert_eq!(
                first.timestamp,
                reference() - step * period.points() as i32
            );
            for pair in readings.windows(2) {
                assert_eq!(pair[1].timestamp - pair[0].timestamp, step);
            }
        }
    }

    #[test]
    fn ids_are_unique_within_batch() {
        let mut rng = StdRng::seed_from_u64(4);
        let readings = generate_readings(&mut rng, Period::Monthly, reference()).unwrap();
        let mut ids: Vec<_> = readings.iter().map(|r| r.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), readings.len());
        assert_eq!(readings[0].id, "energy-0");
    }

    #[test]
    fn values_stay_within_model_envelope() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..20 {
            for reading in generate_readings(&mut rng, Period::Daily, reference()).unwrap() {
                // base in [50,150), cycle ±30%, noise ±10%
                assert!(reading.consumption >= 50.0 * 0.6);
                assert!(reading.consumption <= 150.0 * 1.4);
                let low = reading.consumption * (1.0 + PREDICTION_ERROR.0 * PREDICTION_SCALE);
                let high = reading.consumption * (1.0 + PREDICTION_ERROR.1 * PREDICTION_SCALE);
                assert!(reading.prediction >= low - 1e-9);
                assert!(reading.prediction <= high + 1e-9);
            }
            for reading in generate_readings(&mut rng, Period::Yearly, reference()).unwrap() {
                assert!(reading.consumption >= 3000.0 * 0.6);
                assert!(reading.consumption <= 3000.0 * 1.4);
            }
        }
    }

    #[test]
    fn cyclical_shape_is_visible_for_fixed_base() {
        let mut rng = StdRng::seed_from_u64(6);
        let readings = generate_readings(&mut rng, Period::Monthly, reference()).unwrap();
        // quarter of the cycle peaks near +30%, three quarters dips near -30%
        let peak = readings[7].consumption.max(readings[8].consumption);
        let trough = readings[22].consumption.min(readings[23].consumption);
        assert!(peak > 1500.0 * 1.1, "peak {peak}");
        assert!(trough < 1500.0 * 0.9, "trough {trough}");
    }

    #[test]
    fn seeded_engines_are_reproducible() {
        let mut a = SimulationEngine::seeded(99);
        let mut b = SimulationEngine::seeded(99);
        assert_eq!(
            a.readings(Period::Weekly, reference()).unwrap(),
            b.readings(Period::Weekly, reference()).unwrap()
        );
        assert_eq!(
            a.anomalies(Period::Weekly, reference()).unwrap(),
            b.anomalies(Period::Weekly, reference()).unwrap()
        );
        assert_eq!(a.seed(), Some(99));
    }

    #[test]
    fn reference_too_close_to_min_is_rejected() {
        let mut rng = StdRng::seed_from_u64(7);
        let floor = edash_common::reference_instant(Some(chrono::NaiveDate::MIN));
        let err = generate_readings(&mut rng, Period::Yearly, floor).unwrap_err();
        assert!(matches!(err, SimError::SpanOutOfRange { hours: 8640, .. }));

        let mut engine = SimulationEngine::seeded(7);
        assert!(engine.readings(Period::Daily, floor).is_err());
        assert!(engine.anomalies(Period::Weekly, floor).is_err());

        let roomy = floor + Duration::days(400);
        assert_eq!(engine.readings(Period::Yearly, roomy).unwrap().len(), 12);
    }

    #[test]
    fn consecutive_batches_differ() {
        let mut engine = SimulationEngine::new(None);
        let first = engine.readings(Period::Daily, reference()).unwrap();
        let second = engine.readings(Period::Daily, reference()).unwrap();
        assert_eq!(first.len(), second.len());
        assert_ne!(first, second);
    }
}
