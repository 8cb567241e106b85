//! Aggregations consumed by the dashboard layer.
//!
//! Each function is a pure transform of already-normalized rows plus a
//! user-selected filter value: filter, count, optionally join against the
//! gazetteer for codes or coordinates. Rendering lives elsewhere.

use std::collections::HashMap;

use serde::Serialize;

use crate::dataset::PredictionRow;
use crate::gazetteer::GazetteerIndex;
use crate::normalize::MentionRow;

/// Outcome of a filtered aggregation. Missing gazetteer matches and empty
/// filter results are explicit empty states for the dashboard to message,
/// never errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection<T> {
    Data(T),
    /// The selected country has no gazetteer record.
    CountryUnknown,
    /// No rows matched the selection.
    NoMentions,
}

impl<T> Selection<T> {
    pub fn data(self) -> Option<T> {
        match self {
            Self::Data(data) => Some(data),
            Self::CountryUnknown | Self::NoMentions => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountryCoverage {
    pub country: String,
    pub iso3: Option<String>,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityMention {
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
    pub population: u64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PairCount {
    pub nationality: String,
    pub city: String,
    pub count: usize,
}

/// Mention counts per country with ISO3 codes for the choropleth. Countries
/// the gazetteer cannot code are kept with `iso3: None`.
#[must_use]
pub fn country_coverage(rows: &[MentionRow], gazetteer: &GazetteerIndex) -> Vec<CountryCoverage> {
    let counts = count_values(rows.iter().map(|row| row.country.as_str()));

    let mut coverage: Vec<CountryCoverage> = counts
        .into_iter()
        .map(|(country, count)| CountryCoverage {
            iso3: gazetteer.country_code(&country).map(str::to_string),
            country,
            count,
        })
        .collect();

    coverage.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.country.cmp(&b.country)));
    coverage
}

/// City mention counts for a selected country, joined to coordinates and
/// scoped to that country's gazetteer records.
#[must_use]
pub fn cities_in_country(
    rows: &[MentionRow],
    gazetteer: &GazetteerIndex,
    country: &str,
) -> Selection<Vec<CityMention>> {
    let Some(iso2) = gazetteer.country_iso2(country) else {
        return Selection::CountryUnknown;
    };
    city_mentions(rows, gazetteer, country, Some(iso2))
}

/// City mention counts for a selected country, joined against the whole
/// gazetteer (cities mentioned alongside the country, wherever they are).
#[must_use]
pub fn cities_with_country(
    rows: &[MentionRow],
    gazetteer: &GazetteerIndex,
    country: &str,
) -> Selection<Vec<CityMention>> {
    if gazetteer.country(country).is_none() {
        return Selection::CountryUnknown;
    }
    city_mentions(rows, gazetteer, country, None)
}

fn city_mentions(
    rows: &[MentionRow],
    gazetteer: &GazetteerIndex,
    country: &str,
    iso2: Option<&str>,
) -> Selection<Vec<CityMention>> {
    let counts = count_values(
        rows.iter()
            .filter(|row| row.country.eq_ignore_ascii_case(country))
            .map(|row| city_value(&row.city)),
    );

    let mut mentions: Vec<CityMention> = counts
        .into_iter()
        .filter_map(|(city, count)| {
            gazetteer
                .best_city_match(&city, iso2)
                .map(|record| CityMention {
                    city: record.name.clone(),
                    latitude: record.latitude,
                    longitude: record.longitude,
                    population: record.population,
                    count,
                })
        })
        .collect();

    if mentions.is_empty() {
        return Selection::NoMentions;
    }

    mentions.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.city.cmp(&b.city)));
    Selection::Data(mentions)
}

/// Top identities (nationalities/ideologies) mentioned with a country.
#[must_use]
pub fn nationalities_for_country(
    rows: &[MentionRow],
    country: &str,
    limit: usize,
) -> Vec<ValueCount> {
    let mut counts = sorted_counts(
        rows.iter()
            .filter(|row| row.country.eq_ignore_ascii_case(country))
            .map(|row| identity_value(&row.nationality)),
    );
    counts.truncate(limit);
    counts
}

/// (nationality, city) co-occurrence counts within a country's rows,
/// sorted by frequency. Derived from the exploded table, so it inherits the
/// table's positional pairing.
#[must_use]
pub fn nationality_city_pairs(rows: &[MentionRow], country: &str) -> Vec<PairCount> {
    let mut counts: HashMap<(String, String), usize> = HashMap::new();

    for row in rows {
        if !row.country.eq_ignore_ascii_case(country)
            || row.nationality.is_empty()
            || row.city.is_empty()
        {
            continue;
        }
        *counts
            .entry((identity_value(&row.nationality).to_string(), city_value(&row.city)))
            .or_default() += 1;
    }

    let mut pairs: Vec<PairCount> = counts
        .into_iter()
        .map(|((nationality, city), count)| PairCount {
            nationality,
            city,
            count,
        })
        .collect();

    pairs.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.nationality.cmp(&b.nationality))
            .then_with(|| a.city.cmp(&b.city))
    });
    pairs
}

/// Overall count distribution of predicted labels, most frequent first.
#[must_use]
pub fn label_distribution(predictions: &[PredictionRow]) -> Vec<ValueCount> {
    sorted_counts(predictions.iter().map(|row| row.predicted_label.as_str()))
}

/// Country prevalence of one predicted label, coded for the choropleth.
#[must_use]
pub fn label_country_counts(
    predictions: &[PredictionRow],
    gazetteer: &GazetteerIndex,
    label: &str,
) -> Selection<Vec<CountryCoverage>> {
    let counts = count_values(
        predictions
            .iter()
            .filter(|row| row.predicted_label.eq_ignore_ascii_case(label))
            .map(|row| row.country.as_str()),
    );

    if counts.is_empty() {
        return Selection::NoMentions;
    }

    let mut coverage: Vec<CountryCoverage> = counts
        .into_iter()
        .map(|(country, count)| CountryCoverage {
            iso3: gazetteer.country_code(&country).map(str::to_string),
            country,
            count,
        })
        .collect();

    coverage.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.country.cmp(&b.country)));
    Selection::Data(coverage)
}

/// Label distribution for rows matching one filter field value.
#[must_use]
pub fn labels_for_country(predictions: &[PredictionRow], country: &str) -> Vec<ValueCount> {
    labels_where(predictions, |row| row.country.eq_ignore_ascii_case(country))
}

#[must_use]
pub fn labels_for_city(predictions: &[PredictionRow], city: &str) -> Vec<ValueCount> {
    labels_where(predictions, |row| row.city.eq_ignore_ascii_case(city))
}

#[must_use]
pub fn labels_for_nationality(
    predictions: &[PredictionRow],
    nationality: &str,
) -> Vec<ValueCount> {
    labels_where(predictions, |row| {
        row.nationality.eq_ignore_ascii_case(nationality)
    })
}

fn labels_where<F>(predictions: &[PredictionRow], filter: F) -> Vec<ValueCount>
where
    F: Fn(&PredictionRow) -> bool,
{
    sorted_counts(
        predictions
            .iter()
            .filter(|row| filter(row))
            .map(|row| row.predicted_label.as_str()),
    )
}

/// Sorted distinct non-empty values, for populating filter selectors.
pub fn distinct_values<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut distinct: Vec<String> = values
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect();
    distinct.sort();
    distinct.dedup();
    distinct
}

// Display fixups the original corpus needs before counting: plural identity
// forms collapse to the singular, and the capitalized `Un` token is the
// United Nations acronym, not a city.
fn identity_value(value: &str) -> &str {
    value.trim_end_matches('s')
}

fn city_value(value: &str) -> String {
    value.replace("Un", "UN")
}

fn count_values<S: AsRef<str>>(values: impl Iterator<Item = S>) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for value in values {
        let value = value.as_ref();
        if value.is_empty() {
            continue;
        }
        *counts.entry(value.to_string()).or_default() += 1;
    }
    counts
}

fn sorted_counts<S: AsRef<str>>(values: impl Iterator<Item = S>) -> Vec<ValueCount> {
    let mut counts: Vec<ValueCount> = count_values(values)
        .into_iter()
        .map(|(value, count)| ValueCount { value, count })
        .collect();
    counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(country: &str, nationality: &str, city: &str) -> MentionRow {
        MentionRow {
            text: "t".into(),
            country: country.into(),
            nationality: nationality.into(),
            city: city.into(),
        }
    }

    fn pred(country: &str, nationality: &str, city: &str, label: &str) -> PredictionRow {
        PredictionRow {
            text: "t".into(),
            country: country.into(),
            nationality: nationality.into(),
            city: city.into(),
            predicted_label: label.into(),
        }
    }

    #[test]
    fn test_country_coverage_counts_and_codes() {
        let gazetteer = GazetteerIndex::builtin().unwrap();
        let rows = vec![
            row("France", "", ""),
            row("France", "", ""),
            row("Kosovo", "", ""),
            row("", "", "Paris"),
        ];

        let coverage = country_coverage(&rows, &gazetteer);
        assert_eq!(coverage.len(), 2);
        assert_eq!(coverage[0].country, "France");
        assert_eq!(coverage[0].count, 2);
        assert_eq!(coverage[0].iso3.as_deref(), Some("FRA"));
        assert_eq!(coverage[1].iso3.as_deref(), Some("XKX"));
    }

    #[test]
    fn test_cities_in_country_scopes_to_iso2() {
        let gazetteer = GazetteerIndex::builtin().unwrap();
        let rows = vec![
            row("Guyana", "", "Georgetown"),
            row("Guyana", "", "Georgetown"),
            // A UK row mentioning Georgetown must not leak into the Guyana
            // selection.
            row("United Kingdom", "", "Georgetown"),
        ];

        let Selection::Data(mentions) = cities_in_country(&rows, &gazetteer, "Guyana") else {
            panic!("expected data");
        };
        assert_eq!(mentions.len(), 1);
        assert_eq!(mentions[0].count, 2);
        assert_eq!(mentions[0].population, 235_017);
    }

    #[test]
    fn test_cities_with_country_is_global() {
        let gazetteer = GazetteerIndex::builtin().unwrap();
        let rows = vec![row("France", "", "Kyiv")];

        let Selection::Data(mentions) = cities_with_country(&rows, &gazetteer, "France") else {
            panic!("expected data");
        };
        assert_eq!(mentions[0].city, "Kyiv");
    }

    #[test]
    fn test_unknown_country_is_empty_state() {
        let gazetteer = GazetteerIndex::builtin().unwrap();
        let rows = vec![row("Gotham", "", "Paris")];

        assert_eq!(
            cities_in_country(&rows, &gazetteer, "Gotham"),
            Selection::CountryUnknown
        );
        assert_eq!(
            cities_in_country(&rows, &gazetteer, "France"),
            Selection::NoMentions
        );
    }

    #[test]
    fn test_nationalities_for_country() {
        let rows = vec![
            row("France", "French", ""),
            row("France", "French", ""),
            row("France", "Basque", ""),
            row("Germany", "German", ""),
        ];

        let counts = nationalities_for_country(&rows, "France", 10);
        assert_eq!(counts.len(), 2);
        assert_eq!(counts[0].value, "French");
        assert_eq!(counts[0].count, 2);

        let limited = nationalities_for_country(&rows, "France", 1);
        assert_eq!(limited.len(), 1);
    }

    #[test]
    fn test_nationality_city_pairs() {
        let rows = vec![
            row("Ukraine", "Russian", "Kyiv"),
            row("Ukraine", "Russian", "Kyiv"),
            row("Ukraine", "Ukrainian", "Odesa"),
            row("Ukraine", "", "Kyiv"),
        ];

        let pairs = nationality_city_pairs(&rows, "Ukraine");
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].nationality, "Russian");
        assert_eq!(pairs[0].count, 2);
    }

    #[test]
    fn test_identity_plurals_collapse() {
        let rows = vec![
            row("Ukraine", "Russians", "Kyiv"),
            row("Ukraine", "Russian", "Kyiv"),
        ];

        let counts = nationalities_for_country(&rows, "Ukraine", 10);
        assert_eq!(counts.len(), 1);
        assert_eq!(counts[0].value, "Russian");
        assert_eq!(counts[0].count, 2);

        let pairs = nationality_city_pairs(&rows, "Ukraine");
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].nationality, "Russian");
        assert_eq!(pairs[0].count, 2);
    }

    #[test]
    fn test_un_city_is_the_acronym() {
        let rows = vec![row("United States", "American", "Un")];
        let pairs = nationality_city_pairs(&rows, "United States");
        assert_eq!(pairs[0].city, "UN");
    }

    #[test]
    fn test_label_distribution() {
        let predictions = vec![
            pred("France", "", "", "Politics"),
            pred("Germany", "", "", "Politics"),
            pred("Spain", "", "", "Sport"),
        ];

        let counts = label_distribution(&predictions);
        assert_eq!(counts.len(), 2);
        assert_eq!(counts[0].value, "Politics");
        assert_eq!(counts[0].count, 2);
        assert_eq!(counts[1].value, "Sport");
    }

    #[test]
    fn test_label_views() {
        let gazetteer = GazetteerIndex::builtin().unwrap();
        let predictions = vec![
            pred("France", "French", "Paris", "Politics"),
            pred("France", "", "", "Politics"),
            pred("Germany", "", "", "Sport"),
        ];

        let Selection::Data(coverage) =
            label_country_counts(&predictions, &gazetteer, "politics")
        else {
            panic!("expected data");
        };
        assert_eq!(coverage[0].country, "France");
        assert_eq!(coverage[0].count, 2);

        assert_eq!(
            label_country_counts(&predictions, &gazetteer, "finance"),
            Selection::NoMentions
        );

        let labels = labels_for_country(&predictions, "France");
        assert_eq!(labels[0].value, "Politics");
        assert_eq!(labels[0].count, 2);

        assert_eq!(labels_for_city(&predictions, "paris").len(), 1);
        assert_eq!(labels_for_nationality(&predictions, "French")[0].count, 1);
    }

    #[test]
    fn test_distinct_values() {
        let rows = vec![row("France", "", ""), row("", "", ""), row("France", "", "")];
        let distinct = distinct_values(rows.iter().map(|r| r.country.as_str()));
        assert_eq!(distinct, vec!["France".to_string()]);
    }
}
