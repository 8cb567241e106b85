use std::path::Path;

use anyhow::Result;
use serde::Serialize;

use newsatlas_core::dataset;
use newsatlas_core::report::{self, Selection};

use super::ReportCommands;

pub fn run(command: &ReportCommands, gazetteer_dir: Option<&Path>) -> Result<()> {
    let gazetteer = super::load_gazetteer(gazetteer_dir)?;

    match command {
        ReportCommands::Countries { mentions, json } => {
            let rows = dataset::read_mentions(mentions)?;
            let coverage = report::country_coverage(&rows, &gazetteer);
            if *json {
                print_json(&coverage)?;
            } else {
                for entry in &coverage {
                    println!(
                        "{:>6}  {:<4} {}",
                        entry.count,
                        entry.iso3.as_deref().unwrap_or("-"),
                        entry.country
                    );
                }
            }
            Ok(())
        }
        ReportCommands::Cities {
            mentions,
            country,
            global,
            json,
        } => {
            let rows = dataset::read_mentions(mentions)?;
            let selection = if *global {
                report::cities_with_country(&rows, &gazetteer, country)
            } else {
                report::cities_in_country(&rows, &gazetteer, country)
            };

            match selection {
                Selection::Data(cities) => {
                    if *json {
                        print_json(&cities)?;
                    } else {
                        for city in &cities {
                            println!(
                                "{:>6}  {:<24} {:>9.4} {:>9.4}",
                                city.count, city.city, city.latitude, city.longitude
                            );
                        }
                    }
                }
                Selection::CountryUnknown => {
                    println!("'{country}' not found in the gazetteer");
                }
                Selection::NoMentions => {
                    println!("No city mentions recorded for '{country}'");
                }
            }
            Ok(())
        }
        ReportCommands::Identities {
            mentions,
            country,
            limit,
            json,
        } => {
            let rows = dataset::read_mentions(mentions)?;
            let counts = report::nationalities_for_country(&rows, country, *limit);
            if counts.is_empty() {
                println!("No identities recorded for '{country}'");
            } else if *json {
                print_json(&counts)?;
            } else {
                print_value_counts(&counts);
            }
            Ok(())
        }
        ReportCommands::Pairs {
            mentions,
            country,
            json,
        } => {
            let rows = dataset::read_mentions(mentions)?;
            let pairs = report::nationality_city_pairs(&rows, country);
            if pairs.is_empty() {
                println!("No identity/city pairs recorded for '{country}'");
            } else if *json {
                print_json(&pairs)?;
            } else {
                for pair in &pairs {
                    println!("{:>6}  {:<20} {}", pair.count, pair.nationality, pair.city);
                }
            }
            Ok(())
        }
        ReportCommands::Labels {
            predictions,
            label,
            country,
            city,
            nationality,
            json,
        } => {
            let rows = dataset::read_predictions(predictions)?;
            run_labels(
                &rows,
                &gazetteer,
                label.as_deref(),
                country.as_deref(),
                city.as_deref(),
                nationality.as_deref(),
                *json,
            )
        }
    }
}

fn run_labels(
    rows: &[newsatlas_core::PredictionRow],
    gazetteer: &newsatlas_core::GazetteerIndex,
    label: Option<&str>,
    country: Option<&str>,
    city: Option<&str>,
    nationality: Option<&str>,
    json: bool,
) -> Result<()> {
    if let Some(label) = label {
        match report::label_country_counts(rows, gazetteer, label) {
            Selection::Data(coverage) => {
                if json {
                    print_json(&coverage)?;
                } else {
                    for entry in &coverage {
                        println!(
                            "{:>6}  {:<4} {}",
                            entry.count,
                            entry.iso3.as_deref().unwrap_or("-"),
                            entry.country
                        );
                    }
                }
            }
            Selection::CountryUnknown | Selection::NoMentions => {
                println!("No predictions recorded for label '{label}'");
            }
        }
        return Ok(());
    }

    let counts = if let Some(country) = country {
        report::labels_for_country(rows, country)
    } else if let Some(city) = city {
        report::labels_for_city(rows, city)
    } else if let Some(nationality) = nationality {
        report::labels_for_nationality(rows, nationality)
    } else {
        // No filter: the overall distribution of predicted labels.
        report::label_distribution(rows)
    };

    if counts.is_empty() {
        println!("No predictions matched the selection");
    } else if json {
        print_json(&counts)?;
    } else {
        print_value_counts(&counts);
    }
    Ok(())
}

fn print_value_counts(counts: &[newsatlas_core::ValueCount]) {
    for entry in counts {
        println!("{:>6}  {}", entry.count, entry.value);
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
