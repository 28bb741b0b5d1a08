//! ---
//! ems_section: "01-core-functionality"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Reporting period lookup table shared by all producers."
//! ems_version: "v0.1.0"
//! ems_owner: "tbd"
//! ---
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};
use thiserror::Error;

/// Level around which synthetic consumption oscillates for a period.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BaseLevel {
    /// Every point uses the same base level.
    Fixed(f64),
    /// Every point draws its base level uniformly from `[low, high)`.
    Uniform { low: f64, high: f64 },
}

/// Shape of a generated series for a period.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodShape {
    /// Number of readings generated for the period.
    pub points: usize,
    /// Spacing between consecutive readings.
    pub hours_per_point: i64,
    /// Upper bound (exclusive) of the anomaly offset in hours.
    pub max_hours_back: i64,
    pub base: BaseLevel,
    /// Unit an average reading covers, used for labels ("per hour").
    pub average_unit: &'static str,
}

const DAILY: PeriodShape = PeriodShape {
    points: 24,
    hours_per_point: 1,
    max_hours_back: 24,
    base: BaseLevel::Uniform {
        low: 50.0,
        high: 150.0,
    },
    average_unit: "hour",
};

const WEEKLY: PeriodShape = PeriodShape {
    points: 7,
    hours_per_point: 24,
    max_hours_back: 24 * 7,
    base: BaseLevel::Uniform {
        low: 50.0,
        high: 150.0,
    },
    average_unit: "day",
};

const MONTHLY: PeriodShape = PeriodShape {
    points: 30,
    hours_per_point: 24,
    max_hours_back: 24 * 30,
    base: BaseLevel::Fixed(1500.0),
    average_unit: "day",
};

const YEARLY: PeriodShape = PeriodShape {
    points: 12,
    hours_per_point: 24 * 30,
    max_hours_back: 24 * 365,
    base: BaseLevel::Fixed(3000.0),
    average_unit: "month",
};

/// Reporting granularity selected on the dashboard.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default, Display, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Period {
    #[default]
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Period {
    pub const ALL: [Period; 4] = [
        Period::Daily,
        Period::Weekly,
        Period::Monthly,
        Period::Yearly,
    ];

    /// Look up the generation shape for this period.
    pub fn shape(self) -> &'static PeriodShape {
        match self {
            Period::Daily => &DAILY,
            Period::Weekly => &WEEKLY,
            Period::Monthly => &MONTHLY,
            Period::Yearly => &YEARLY,
        }
    }

    pub fn points(self) -> usize {
        self.shape().points
    }

    pub fn hours_per_point(self) -> i64 {
        self.shape().hours_per_point
    }

    pub fn max_hours_back(self) -> i64 {
        self.shape().max_hours_back
    }

    pub fn average_unit(self) -> &'static str {
        self.shape().average_unit
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown period: {0} (expected daily, weekly, monthly or yearly)")]
pub struct ParsePeriodError(pub String);

impl std::str::FromStr for Period {
    type Err = ParsePeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(Period::Daily),
            "weekly" => Ok(Period::Weekly),
            "monthly" => Ok(Period::Monthly),
            "yearly" => Ok(Period::Yearly),
            other => Err(ParsePeriodError(other.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn shape_table_matches_dashboard_granularity() {
        let expected = [
            (Period::Daily, 24, 1, 24),
            (Period::Weekly, 7, 24, 168),
            (Period::Monthly, 30, 24, 720),
            (Period::Yearly, 12, 720, 8760),
        ];
        for (period, points, hours, max_back) in expected {
            assert_eq!(period.points(), points, "{period}");
            assert_eq!(period.hours_per_point(), hours, "{period}");
            assert_eq!(period.max_hours_back(), max_back, "{period}");
        }
    }

    #[test]
    fn sub_monthly_periods_use_random_base() {
        assert!(matches!(Period::Daily.shape().base, BaseLevel::Uniform { .. }));
        assert!(matches!(Period::Weekly.shape().base, BaseLevel::Uniform { .. }));
        assert_eq!(Period::Monthly.shape().base, BaseLevel::Fixed(1500.0));
        assert_eq!(Period::Yearly.shape().base, BaseLevel::Fixed(3000.0));
    }

    #[test]
    fn parses_and_displays_lowercase() {
        for period in Period::iter() {
            let parsed: Period = period.to_string().parse().unwrap();
            assert_eq!(parsed, period);
        }
        assert_eq!("Weekly".parse::<Period>().unwrap(), Period::Weekly);
        assert!("hourly".parse::<Period>().is_err());
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let json = serde_json::to_string(&Period::Monthly).unwrap();
        assert_eq!(json, "\"monthly\"");
        let back: Period = serde_json::from_str("\"yearly\"").unwrap();
        assert_eq!(back, Period::Yearly);
    }

    #[test]
    fn default_is_daily() {
        assert_eq!(Period::default(), Period::Daily);
        assert_eq!(Period::Daily.average_unit(), "hour");
        assert_eq!(Period::Yearly.average_unit(), "month");
    }
}
