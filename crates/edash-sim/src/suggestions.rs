//! ---
//! ems_section: "11-simulation"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Static recommendation catalog."
//! ems_version: "v0.1.0"
//! ems_owner: "tbd"
//! ---
use crate::model::{Suggestion, SuggestionKind};

struct CatalogEntry {
    id: &'static str,
    kind: SuggestionKind,
    title: &'static str,
    description: &'static str,
    potential_savings: Option<f64>,
}

const CATALOG: [CatalogEntry; 5] = [
    CatalogEntry {
        id: "sug-1",
        kind: SuggestionKind::Warning,
        title: "High Peak Usage Detected",
        description: "Your energy consumption peaks between 2-4 PM. Consider load shifting to off-peak hours.",
        potential_savings: Some(23.5),
    },
    CatalogEntry {
        id: "sug-2",
        kind: SuggestionKind::Tip,
        title: "HVAC Optimization",
        description: "HVAC systems are running at high capacity. Adjusting temperature by 2 degrees could save energy.",
        potential_savings: Some(15.2),
    },
    CatalogEntry {
        id: "sug-3",
        kind: SuggestionKind::Alert,
        title: "Unusual After-Hours Activity",
        description: "Significant energy usage detected after 10 PM in Building B. Investigate potential wastage.",
        potential_savings: Some(8.7),
    },
    CatalogEntry {
        id: "sug-4",
        kind: SuggestionKind::Tip,
        title: "Lighting Efficiency",
        description: "Switch to LED lighting in common areas for up to 30% energy savings.",
        potential_savings: Some(12.4),
    },
    CatalogEntry {
        id: "sug-5",
        kind: SuggestionKind::Warning,
        title: "Predictive Maintenance Required",
        description: "Equipment in Building A showing inefficient patterns. Schedule maintenance to prevent increased consumption.",
        potential_savings: Some(18.9),
    },
];

/// Return the recommendation catalog. Input independent and deterministic.
pub fn suggestion_catalog() -> Vec<Suggestion> {
    CATALOG
        .iter()
        .map(|entry| Suggestion {
            id: entry.id.to_owned(),
            kind: entry.kind,
            title: entry.title.to_owned(),
            description: entry.description.to_owned(),
            potential_savings: entry.potential_savings,
        })
        .collect()
}
