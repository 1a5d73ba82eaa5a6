use crate::pipeline::domain::{Product, Stage, Vertical};
use std::collections::HashMap;
use std::sync::OnceLock;

pub(crate) fn normalize_label(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.to_ascii_lowercase()
}

static STAGE_NAME_MAP: OnceLock<HashMap<String, Stage>> = OnceLock::new();

pub(crate) fn stage_for_normalized(normalized: &str) -> Option<Stage> {
    stage_name_map().get(normalized).copied()
}

fn stage_name_map() -> &'static HashMap<String, Stage> {
    STAGE_NAME_MAP.get_or_init(|| {
        const NAME_TO_STAGE: &[(&str, Stage)] = &[
            // HubSpot default sales pipeline
            ("appointmentscheduled", Stage::Prospecting),
            ("Appointment Scheduled", Stage::Prospecting),
            ("qualifiedtobuy", Stage::Pitch),
            ("Qualified To Buy", Stage::Pitch),
            ("presentationscheduled", Stage::Pitch),
            ("Presentation Scheduled", Stage::Pitch),
            ("decisionmakerboughtin", Stage::Objection),
            ("Decision Maker Bought-In", Stage::Objection),
            ("contractsent", Stage::BusinessAgreementShared),
            ("Contract Sent", Stage::BusinessAgreementShared),
            ("closedwon", Stage::Signed),
            ("Closed Won", Stage::Signed),
            ("closedlost", Stage::Lost),
            ("Closed Lost", Stage::Lost),
            // Portal-native labels, for round-tripped exports
            ("Prospecting", Stage::Prospecting),
            ("Pitch", Stage::Pitch),
            ("Objection", Stage::Objection),
            ("Business Agreement Shared", Stage::BusinessAgreementShared),
            ("Signed", Stage::Signed),
            ("Go Live", Stage::GoLive),
            ("Lost", Stage::Lost),
        ];

        NAME_TO_STAGE
            .iter()
            .map(|(name, stage)| (normalize_label(name), *stage))
            .collect()
    })
}

/// Missing or unrecognized products fall back to the full suite.
pub(crate) fn product_for(raw: Option<&str>) -> Product {
    match raw.map(normalize_label).as_deref() {
        Some("checkout") => Product::Checkout,
        Some("returns") | Some("returns management") => Product::ReturnsManagement,
        Some("engagement") => Product::Engagement,
        _ => Product::AllProducts,
    }
}

/// Missing or unrecognized industries land in the catch-all vertical.
pub(crate) fn vertical_for(raw: Option<&str>) -> Vertical {
    match raw.map(normalize_label).as_deref() {
        Some("fashion") | Some("apparel") => Vertical::Fashion,
        Some("electronics") | Some("consumer electronics") => Vertical::Electronics,
        Some("beauty") | Some("cosmetics") => Vertical::Beauty,
        Some("home") | Some("home & garden") | Some("furniture") => Vertical::Home,
        Some("food") | Some("food & beverage") | Some("grocery") => Vertical::Food,
        _ => Vertical::Other,
    }
}

#[cfg(test)]
pub(crate) fn stage_lookup_for_tests(raw: &str) -> Option<Stage> {
    stage_for_normalized(&normalize_label(raw))
}
