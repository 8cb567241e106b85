use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GazetteerError {
    #[error("Reference data unavailable: {0}")]
    Unavailable(String),
    #[error("Malformed reference data: {0}")]
    Malformed(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type GazetteerResult<T> = Result<T, GazetteerError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryRecord {
    pub name: String,
    pub iso2: String,
    pub iso3: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityRecord {
    pub name: String,
    /// ISO2 code of the owning country, as in the upstream geonames data.
    pub country_code: String,
    pub latitude: f64,
    pub longitude: f64,
    pub population: u64,
}

const BUILTIN_COUNTRIES: &str = include_str!("../data/countries.csv");
const BUILTIN_CITIES: &str = include_str!("../data/cities.csv");

/// Curated alias table: lowercased surface form to canonical country name.
/// `None` keeps the surface text as-is (the alias is already the name the
/// dashboards should display).
///
/// The lowercase key `us` is deliberately absent; the bare token is too
/// ambiguous with the pronoun, so only the exact uppercase `US` resolves,
/// via a literal-case rule in [`GazetteerIndex::resolve_country`].
const COUNTRY_ALIASES: &[(&str, Option<&str>)] = &[
    ("usa", Some("United States")),
    ("uk", Some("United Kingdom")),
    ("uae", Some("United Arab Emirates")),
    ("drc", Some("Democratic Republic of the Congo")),
    ("dr congo", Some("Democratic Republic of the Congo")),
    ("congo", Some("Democratic Republic of the Congo")),
    ("zaire", Some("Democratic Republic of the Congo")),
    ("roc", Some("Taiwan")),
    ("taiwan", None),
    ("ivory coast", Some("Côte d'Ivoire")),
    ("holland", Some("Netherlands")),
    ("burma", Some("Myanmar")),
    ("palestine", Some("Palestine, State of")),
    ("kosovo", None),
    ("hong kong", None),
    ("macau", Some("Macao")),
    ("scotland", Some("United Kingdom")),
    ("wales", Some("United Kingdom")),
    ("england", Some("United Kingdom")),
    ("northern ireland", Some("United Kingdom")),
    ("china", None),
    ("russia", None),
    ("syria", None),
    ("s. korea", Some("South Korea")),
    ("south korea", None),
    ("n. korea", Some("North Korea")),
    ("north korea", None),
];

/// One-shot, read-only index over the geographic reference data.
///
/// Built exactly once per process (the load is the expensive part) and
/// shared by reference afterwards; nothing mutates it after construction.
#[derive(Debug)]
pub struct GazetteerIndex {
    countries: Vec<CountryRecord>,
    cities: Vec<CityRecord>,
    name_index: HashMap<String, usize>,
    aliases: HashMap<String, Option<String>>,
    city_names: HashSet<String>,
}

impl GazetteerIndex {
    /// Build the index from already-loaded records.
    #[must_use]
    pub fn from_records(countries: Vec<CountryRecord>, cities: Vec<CityRecord>) -> Self {
        let name_index = countries
            .iter()
            .enumerate()
            .map(|(idx, record)| (record.name.to_lowercase(), idx))
            .collect();

        let aliases = COUNTRY_ALIASES
            .iter()
            .map(|(alias, canonical)| ((*alias).to_string(), canonical.map(str::to_string)))
            .collect();

        let city_names = cities
            .iter()
            .map(|record| record.name.to_lowercase())
            .collect();

        Self {
            countries,
            cities,
            name_index,
            aliases,
            city_names,
        }
    }

    /// Build the index from the embedded reference tables.
    pub fn builtin() -> GazetteerResult<Self> {
        let countries = read_records(BUILTIN_COUNTRIES.as_bytes())?;
        let cities = read_records(BUILTIN_CITIES.as_bytes())?;
        Ok(Self::from_records(countries, cities))
    }

    /// Load the index from a directory holding `countries.csv` and
    /// `cities.csv`. Missing or malformed files are fatal: no partial
    /// index is ever produced.
    pub fn load_dir(dir: &Path) -> GazetteerResult<Self> {
        let countries_path = dir.join("countries.csv");
        let cities_path = dir.join("cities.csv");

        for path in [&countries_path, &cities_path] {
            if !path.exists() {
                return Err(GazetteerError::Unavailable(path.display().to_string()));
            }
        }

        let countries = read_records(std::fs::File::open(&countries_path)?)?;
        let cities = read_records(std::fs::File::open(&cities_path)?)?;

        tracing::info!(
            countries = countries.len(),
            cities = cities.len(),
            "loaded gazetteer from {}",
            dir.display()
        );

        Ok(Self::from_records(countries, cities))
    }

    /// Resolve a free-text country candidate to a displayable name.
    ///
    /// Lookup order: the exact literal token `US` (the lowercase form is a
    /// pronoun, not a country), then the authoritative name set (returning
    /// the surface text unmodified), then the curated alias table. Anything
    /// else is not a country we trust.
    #[must_use]
    pub fn resolve_country<'a>(&'a self, candidate: &'a str) -> Option<&'a str> {
        let candidate = candidate.trim();
        if candidate == "US" {
            return Some("United States");
        }

        let lower = candidate.to_lowercase();
        if self.name_index.contains_key(&lower) {
            return Some(candidate);
        }

        match self.aliases.get(&lower) {
            Some(Some(canonical)) => Some(canonical.as_str()),
            Some(None) => Some(candidate),
            None => None,
        }
    }

    /// Case-insensitive membership test against the known city names.
    #[must_use]
    pub fn is_city(&self, candidate: &str) -> bool {
        self.city_names.contains(&candidate.trim().to_lowercase())
    }

    /// ISO3 code for a country name (case-insensitive), for choropleth joins.
    #[must_use]
    pub fn country_code(&self, name: &str) -> Option<&str> {
        self.country(name).map(|record| record.iso3.as_str())
    }

    /// ISO2 code for a country name, the code space city records use.
    #[must_use]
    pub fn country_iso2(&self, name: &str) -> Option<&str> {
        self.country(name).map(|record| record.iso2.as_str())
    }

    #[must_use]
    pub fn country(&self, name: &str) -> Option<&CountryRecord> {
        self.name_index
            .get(&name.trim().to_lowercase())
            .map(|&idx| &self.countries[idx])
    }

    /// City records within one country, one per name; when several records
    /// share a name the largest population wins. Sorted by name.
    #[must_use]
    pub fn cities_for_country(&self, iso2: &str) -> Vec<&CityRecord> {
        self.dedup_cities(Some(iso2))
    }

    /// City records across the whole gazetteer, deduplicated the same way.
    #[must_use]
    pub fn cities_global(&self) -> Vec<&CityRecord> {
        self.dedup_cities(None)
    }

    /// The best record for a single city name, optionally scoped to a
    /// country: largest population among the candidates.
    #[must_use]
    pub fn best_city_match(&self, name: &str, iso2: Option<&str>) -> Option<&CityRecord> {
        let lower = name.trim().to_lowercase();
        self.cities
            .iter()
            .filter(|city| city.name.to_lowercase() == lower)
            .filter(|city| iso2.is_none_or(|code| city.country_code.eq_ignore_ascii_case(code)))
            .max_by_key(|city| city.population)
    }

    #[must_use]
    pub fn countries(&self) -> &[CountryRecord] {
        &self.countries
    }

    #[must_use]
    pub fn cities(&self) -> &[CityRecord] {
        &self.cities
    }

    /// Lowercased alias surface forms, for lexicon construction.
    pub fn alias_terms(&self) -> impl Iterator<Item = &str> {
        self.aliases.keys().map(String::as_str)
    }

    fn dedup_cities(&self, iso2: Option<&str>) -> Vec<&CityRecord> {
        let mut best: HashMap<String, &CityRecord> = HashMap::new();

        for city in &self.cities {
            if let Some(code) = iso2 {
                if !city.country_code.eq_ignore_ascii_case(code) {
                    continue;
                }
            }

            best.entry(city.name.to_lowercase())
                .and_modify(|current| {
                    if city.population > current.population {
                        *current = city;
                    }
                })
                .or_insert(city);
        }

        let mut records: Vec<&CityRecord> = best.into_values().collect();
        records.sort_by(|a, b| a.name.cmp(&b.name));
        records
    }
}

fn read_records<T, R>(reader: R) -> GazetteerResult<Vec<T>>
where
    T: for<'de> Deserialize<'de>,
    R: std::io::Read,
{
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut records = Vec::new();
    for record in csv_reader.deserialize() {
        records.push(record?);
    }
    Ok(records)
}
