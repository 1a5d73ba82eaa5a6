use super::mapping::normalize_label;
use serde::{Deserialize, Deserializer};
use std::io::Read;

#[derive(Debug)]
pub(crate) struct HubSpotRecord {
    pub(crate) deal_name: String,
    pub(crate) normalized_stage: String,
    pub(crate) stage_raw: String,
    pub(crate) monthly_gmv: i64,
    pub(crate) product: Option<String>,
    pub(crate) industry: Option<String>,
}

pub(crate) fn parse_records<R: Read>(reader: R) -> Result<Vec<HubSpotRecord>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for record in csv_reader.deserialize::<HubSpotRow>() {
        let row = record?;
        let stage_raw = row.stage.clone().unwrap_or_default();
        let normalized_stage = normalize_label(&stage_raw);
        let monthly_gmv = row.monthly_gmv();

        records.push(HubSpotRecord {
            deal_name: row.deal_name,
            normalized_stage,
            stage_raw,
            monthly_gmv,
            product: row.product,
            industry: row.industry,
        });
    }

    Ok(records)
}

#[derive(Debug, Deserialize)]
struct HubSpotRow {
    #[serde(rename = "Deal Name", alias = "Deal name", alias = "deal_name")]
    deal_name: String,
    #[serde(
        rename = "Amount",
        alias = "amount",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    amount: Option<String>,
    #[serde(
        rename = "Deal Stage",
        alias = "Deal stage",
        alias = "deal_stage",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    stage: Option<String>,
    #[serde(
        rename = "Product",
        alias = "product",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    product: Option<String>,
    #[serde(
        rename = "Industry",
        alias = "industry",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    industry: Option<String>,
}

impl HubSpotRow {
    /// Monthly GMV from the export's Amount column. Currency decoration is
    /// tolerated; anything unparseable degrades to zero rather than failing
    /// the whole import.
    fn monthly_gmv(&self) -> i64 {
        self.amount
            .as_deref()
            .and_then(parse_amount)
            .unwrap_or(0)
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn parse_amount(value: &str) -> Option<i64> {
    let cleaned: String = value
        .trim()
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | ' '))
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    cleaned.parse::<f64>().ok().map(|amount| amount as i64)
}

#[cfg(test)]
pub(crate) fn parse_amount_for_tests(value: &str) -> Option<i64> {
    parse_amount(value)
}
