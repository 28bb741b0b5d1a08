//! ---
//! ems_section: "11-simulation"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Records produced by the dashboard data simulators."
//! ems_version: "v0.1.0"
//! ems_owner: "tbd"
//! ---
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Device category a reading is attributed to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum DeviceType {
    #[serde(rename = "HVAC")]
    #[strum(serialize = "HVAC")]
    Hvac,
    Lighting,
    Appliances,
    Computing,
    Other,
}

impl DeviceType {
    pub const ALL: [DeviceType; 5] = [
        DeviceType::Hvac,
        DeviceType::Lighting,
        DeviceType::Appliances,
        DeviceType::Computing,
        DeviceType::Other,
    ];
}

/// Site a reading or anomaly is attributed to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum Location {
    #[serde(rename = "Building A")]
    #[strum(serialize = "Building A")]
    BuildingA,
    #[serde(rename = "Building B")]
    #[strum(serialize = "Building B")]
    BuildingB,
    #[serde(rename = "Building C")]
    #[strum(serialize = "Building C")]
    BuildingC,
    #[serde(rename = "Residential Area")]
    #[strum(serialize = "Residential Area")]
    ResidentialArea,
}

impl Location {
    pub const ALL: [Location; 4] = [
        Location::BuildingA,
        Location::BuildingB,
        Location::BuildingC,
        Location::ResidentialArea,
    ];
}

/// One synthetic consumption measurement with its forecast counterpart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Reading {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    /// kWh, never negative.
    pub consumption: f64,
    pub prediction: f64,
    pub device_type: DeviceType,
    pub location: Location,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Display, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    pub const ALL: [Severity; 3] = [Severity::High, Severity::Medium, Severity::Low];
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum AnomalyKind {
    #[serde(rename = "Sudden Spike")]
    #[strum(serialize = "Sudden Spike")]
    SuddenSpike,
    #[serde(rename = "Unusual Pattern")]
    #[strum(serialize = "Unusual Pattern")]
    UnusualPattern,
    #[serde(rename = "Device Malfunction")]
    #[strum(serialize = "Device Malfunction")]
    DeviceMalfunction,
    #[serde(rename = "After Hours Usage")]
    #[strum(serialize = "After Hours Usage")]
    AfterHoursUsage,
}

impl AnomalyKind {
    pub const ALL: [AnomalyKind; 4] = [
        AnomalyKind::SuddenSpike,
        AnomalyKind::UnusualPattern,
        AnomalyKind::DeviceMalfunction,
        AnomalyKind::AfterHoursUsage,
    ];
}

/// A reading flagged as an outlier. Sampled independently of the main series.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Anomaly {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub severity: Severity,
    #[serde(rename = "type")]
    pub kind: AnomalyKind,
    pub description: String,
    pub consumption: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SuggestionKind {
    Warning,
    Tip,
    Alert,
}

/// Recommendation shown next to the consumption charts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: SuggestionKind,
    pub title: String,
    pub description: String,
    /// Estimated saving in percent.
    #[serde(default)]
    pub potential_savings: Option<f64>,
}
