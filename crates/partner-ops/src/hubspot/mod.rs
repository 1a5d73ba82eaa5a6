//! Importer for HubSpot deal exports so partners can migrate an existing
//! book of business into the pipeline.

mod mapping;
mod parser;

use crate::pipeline::domain::{PartnerKind, Stage};
use crate::pipeline::intake::LeadSubmission;
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

#[derive(Debug)]
pub enum HubSpotImportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for HubSpotImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HubSpotImportError::Io(err) => write!(f, "failed to read HubSpot export: {}", err),
            HubSpotImportError::Csv(err) => write!(f, "invalid HubSpot CSV data: {}", err),
        }
    }
}

impl std::error::Error for HubSpotImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HubSpotImportError::Io(err) => Some(err),
            HubSpotImportError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for HubSpotImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for HubSpotImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// A row of the export mapped into portal terms: the lead submission plus
/// the pipeline stage the deal already occupies.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedLead {
    pub submission: LeadSubmission,
    pub stage: Stage,
}

pub struct HubSpotDealImporter;

impl HubSpotDealImporter {
    pub fn from_path<P: AsRef<Path>>(
        path: P,
        partner_kind: PartnerKind,
    ) -> Result<Vec<ImportedLead>, HubSpotImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, partner_kind)
    }

    /// Parse an export, keeping the first row per deal name and skipping
    /// rows whose stage label is not recognized. GMV validation is left to
    /// the intake boundary.
    pub fn from_reader<R: Read>(
        reader: R,
        partner_kind: PartnerKind,
    ) -> Result<Vec<ImportedLead>, HubSpotImportError> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut leads = Vec::new();

        for record in parser::parse_records(reader)? {
            let Some(stage) = mapping::stage_for_normalized(&record.normalized_stage) else {
                continue;
            };

            let brand = record.deal_name.trim();
            if brand.is_empty() {
                continue;
            }

            if !seen.insert(mapping::normalize_label(brand)) {
                continue;
            }

            leads.push(ImportedLead {
                submission: LeadSubmission {
                    brand_name: brand.to_string(),
                    partner_kind,
                    monthly_gmv: record.monthly_gmv,
                    product: mapping::product_for(record.product.as_deref()),
                    vertical: mapping::vertical_for(record.industry.as_deref()),
                    notes: format!("Imported from HubSpot export (stage: {})", record.stage_raw),
                },
                stage,
            });
        }

        Ok(leads)
    }
}
