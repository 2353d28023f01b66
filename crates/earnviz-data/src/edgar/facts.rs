//! XBRL company facts from the SEC JSON API.
//!
//! The SEC publishes every fact a company has filed at
//! `https://data.sec.gov/api/xbrl/companyfacts/CIK{cik_padded}.json`, organized
//! by taxonomy, concept and unit. Only US-dollar facts are kept.

use crate::error::{DataError, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashMap;

/// Shortest period, in days, accepted as a fiscal quarter.
const MIN_QUARTER_DAYS: i64 = 80;
/// Longest period, in days, accepted as a fiscal quarter.
const MAX_QUARTER_DAYS: i64 = 100;
/// Day range accepted as three fiscal quarters.
const NINE_MONTH_DAYS: (i64, i64) = (260, 290);
/// Day range accepted as a fiscal year (52/53-week years included).
const YEAR_DAYS: (i64, i64) = (350, 380);

/// A single reported value.
#[derive(Debug, Clone, PartialEq)]
pub struct Fact {
    /// Start of the reporting period (None for instant facts)
    pub start: Option<NaiveDate>,
    /// End of the reporting period
    pub end: NaiveDate,
    /// Reported value
    pub value: f64,
    /// Form the value was filed in (e.g. "10-Q")
    pub form: Option<String>,
    /// Filing date
    pub filed: Option<NaiveDate>,
}

impl Fact {
    /// Length of the period in days, for duration facts.
    pub fn duration_days(&self) -> Option<i64> {
        self.start
            .map(|start| self.end.signed_duration_since(start).num_days())
    }

    /// True if the fact covers roughly one fiscal quarter.
    pub fn is_quarter(&self) -> bool {
        self.duration_days()
            .is_some_and(|d| (MIN_QUARTER_DAYS..=MAX_QUARTER_DAYS).contains(&d))
    }

    /// True if the fact covers the first three quarters of a fiscal year.
    pub fn is_nine_months(&self) -> bool {
        self.duration_days()
            .is_some_and(|d| (NINE_MONTH_DAYS.0..=NINE_MONTH_DAYS.1).contains(&d))
    }

    /// True if the fact covers a full fiscal year.
    pub fn is_annual(&self) -> bool {
        self.duration_days()
            .is_some_and(|d| (YEAR_DAYS.0..=YEAR_DAYS.1).contains(&d))
    }
}

/// All US-dollar facts of one company.
#[derive(Debug, Clone, Default)]
pub struct CompanyFacts {
    /// Company name
    pub entity_name: String,
    /// Facts keyed by concept name without taxonomy prefix (e.g. "Revenues")
    pub concepts: HashMap<String, Vec<Fact>>,
}

impl CompanyFacts {
    /// Parse the SEC company facts JSON document.
    pub fn parse_json(json: &str) -> Result<Self> {
        let response: SecApiResponse = serde_json::from_str(json)
            .map_err(|e| DataError::Parse(format!("Failed to parse SEC JSON: {}", e)))?;

        let mut concepts: HashMap<String, Vec<Fact>> = HashMap::new();
        for taxonomy_facts in response.facts.into_values() {
            for (concept, data) in taxonomy_facts {
                let Some(usd) = data.units.get("USD") else {
                    continue;
                };
                let facts = usd
                    .iter()
                    .map(FactData::to_fact)
                    .collect::<Result<Vec<_>>>()?;
                concepts.entry(concept).or_default().extend(facts);
            }
        }

        Ok(Self {
            entity_name: response.entity_name,
            concepts,
        })
    }

    /// Quarter-length facts for a concept.
    pub fn quarterly(&self, concept: &str) -> impl Iterator<Item = &Fact> {
        self.facts(concept).filter(|f| f.is_quarter())
    }

    /// Full-year facts for a concept.
    pub fn annual(&self, concept: &str) -> impl Iterator<Item = &Fact> {
        self.facts(concept).filter(|f| f.is_annual())
    }

    /// Nine-month year-to-date facts for a concept.
    pub fn nine_months(&self, concept: &str) -> impl Iterator<Item = &Fact> {
        self.facts(concept).filter(|f| f.is_nine_months())
    }

    fn facts(&self, concept: &str) -> impl Iterator<Item = &Fact> {
        self.concepts.get(concept).into_iter().flatten()
    }

    /// Value of a concept for an exact period, preferring the latest filing.
    pub fn value_for_period(
        &self,
        concept: &str,
        start: Option<NaiveDate>,
        end: NaiveDate,
    ) -> Option<f64> {
        self.concepts
            .get(concept)?
            .iter()
            .filter(|f| f.start == start && f.end == end)
            .max_by_key(|f| f.filed)
            .map(|f| f.value)
    }
}

fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| DataError::Parse(format!("Invalid date {}: {}", value, e)))
}

// SEC API JSON structure
// Based on: https://www.sec.gov/edgar/sec-api-documentation

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SecApiResponse {
    entity_name: String,
    facts: HashMap<String, HashMap<String, ConceptData>>,
}

#[derive(Debug, Deserialize)]
struct ConceptData {
    #[serde(default)]
    units: HashMap<String, Vec<FactData>>,
}

#[derive(Debug, Deserialize)]
struct FactData {
    end: String,
    val: f64,
    #[serde(default)]
    start: Option<String>,
    #[serde(default)]
    form: Option<String>,
    #[serde(default)]
    filed: Option<String>,
}

impl FactData {
    fn to_fact(&self) -> Result<Fact> {
        Ok(Fact {
            start: self.start.as_deref().map(parse_date).transpose()?,
            end: parse_date(&self.end)?,
            value: self.val,
            form: self.form.clone(),
            filed: self.filed.as_deref().map(parse_date).transpose()?,
        })
    }
}
