use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::gazetteer::GazetteerIndex;
use crate::recognize::{EntitySpan, RecognizeResult, Recognizer, SpanLabel};

/// Per-document extraction output: three equal-length lists of countries,
/// nationalities, and cities, padded with empty strings.
///
/// The positional alignment across the three lists is an artifact of the
/// tabular output format, not a semantic relationship: countries and
/// nationalities are extracted as unordered sets, so index `i` of one list
/// says nothing about index `i` of another. Consumers must not assume
/// row-wise correspondence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub countries: Vec<String>,
    pub nationalities: Vec<String>,
    pub cities: Vec<String>,
}

impl ExtractionResult {
    /// Pad the three lists to `max` length with empty markers.
    #[must_use]
    pub fn padded(
        countries: Vec<String>,
        nationalities: Vec<String>,
        cities: Vec<String>,
    ) -> Self {
        let mut result = Self {
            countries,
            nationalities,
            cities,
        };
        let len = result.len();
        for list in [
            &mut result.countries,
            &mut result.nationalities,
            &mut result.cities,
        ] {
            list.resize(len, String::new());
        }
        result
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.countries
            .len()
            .max(self.nationalities.len())
            .max(self.cities.len())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Explode into one output row per index position.
    ///
    /// A document with no extractions still yields a single all-empty row so
    /// its text survives into the output table. Nationality and city cells
    /// are capitalized for display, and any literal `USA` country cell is
    /// rewritten to `United States` as a final alias pass.
    #[must_use]
    pub fn rows(&self, text: &str) -> Vec<MentionRow> {
        if self.is_empty() {
            return vec![MentionRow::empty(text)];
        }

        let cell = |list: &[String], i: usize| list.get(i).map_or("", String::as_str).to_string();

        (0..self.len())
            .map(|i| MentionRow {
                text: text.to_string(),
                country: rewrite_usa(&cell(&self.countries, i)),
                nationality: capitalize(&cell(&self.nationalities, i)),
                city: capitalize(&cell(&self.cities, i)),
            })
            .collect()
    }
}

/// One exploded row of the intermediate output table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentionRow {
    pub text: String,
    #[serde(rename = "countries")]
    pub country: String,
    #[serde(rename = "nationalities")]
    pub nationality: String,
    #[serde(rename = "cities")]
    pub city: String,
}

impl MentionRow {
    #[must_use]
    pub fn empty(text: &str) -> Self {
        Self {
            text: text.to_string(),
            country: String::new(),
            nationality: String::new(),
            city: String::new(),
        }
    }
}

/// First letter uppercased, the rest lowercased. Empty stays empty.
#[must_use]
pub fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
    })
}

fn rewrite_usa(country: &str) -> String {
    if country == "USA" {
        "United States".to_string()
    } else {
        country.to_string()
    }
}

/// Turns recognizer spans into canonical countries, nationalities, and
/// cities using the shared gazetteer.
pub struct Normalizer<'g> {
    gazetteer: &'g GazetteerIndex,
    recognizer: Box<dyn Recognizer>,
}

impl<'g> Normalizer<'g> {
    #[must_use]
    pub fn new(gazetteer: &'g GazetteerIndex, recognizer: Box<dyn Recognizer>) -> Self {
        Self {
            gazetteer,
            recognizer,
        }
    }

    /// Deduplicated canonical country names for geopolitical spans;
    /// candidates the gazetteer cannot confirm are silently dropped.
    pub fn extract_countries(&self, text: &str) -> RecognizeResult<BTreeSet<String>> {
        Ok(self.countries_from(&self.recognizer.recognize(text)?))
    }

    /// Deduplicated lower-cased group spans. No gazetteer validation: there
    /// is no authoritative nationality list, so recognizer output is
    /// trusted as-is.
    pub fn extract_nationalities(&self, text: &str) -> RecognizeResult<BTreeSet<String>> {
        Ok(self.nationalities_from(&self.recognizer.recognize(text)?))
    }

    /// Lower-cased city mentions in span order. Duplicates are preserved;
    /// downstream frequency counts depend on repetition.
    pub fn extract_cities(&self, text: &str) -> RecognizeResult<Vec<String>> {
        Ok(self.cities_from(&self.recognizer.recognize(text)?))
    }

    /// Run the recognizer once over a document and derive all three lists,
    /// padded to equal length.
    pub fn normalize(&self, document: &Document) -> RecognizeResult<ExtractionResult> {
        let spans = self.recognizer.recognize(&document.text())?;

        Ok(ExtractionResult::padded(
            self.countries_from(&spans).into_iter().collect(),
            self.nationalities_from(&spans).into_iter().collect(),
            self.cities_from(&spans),
        ))
    }

    fn countries_from(&self, spans: &[EntitySpan]) -> BTreeSet<String> {
        spans
            .iter()
            .filter(|span| span.label == SpanLabel::Geopolitical)
            .filter_map(|span| self.gazetteer.resolve_country(&span.text))
            .map(str::to_string)
            .collect()
    }

    fn nationalities_from(&self, spans: &[EntitySpan]) -> BTreeSet<String> {
        spans
            .iter()
            .filter(|span| span.label == SpanLabel::Group)
            .map(|span| span.text.trim().to_lowercase())
            .collect()
    }

    fn cities_from(&self, spans: &[EntitySpan]) -> Vec<String> {
        spans
            .iter()
            .map(|span| span.text.trim().to_lowercase())
            .filter(|candidate| self.gazetteer.is_city(candidate))
            .collect()
    }
}
