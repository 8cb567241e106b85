use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn natl() -> Command {
    let mut cmd: Command = cargo_bin_cmd!("natl").into();
    cmd.env("NO_COLOR", "1");
    cmd
}

/// Write an article corpus into the tempdir and return its path.
fn write_articles(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("articles.csv");
    fs::write(&path, content).unwrap();
    path
}

// --- Binary startup ---

#[test]
fn binary_runs() {
    natl()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("natl"));
}

// --- Lookup ---

#[test]
fn lookup_country_resolves_aliases() {
    natl()
        .args(["lookup", "country", "UK"])
        .assert()
        .success()
        .stdout(predicate::str::contains("United Kingdom"));

    natl()
        .args(["lookup", "country", "Ivory Coast"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Côte d'Ivoire"));
}

#[test]
fn lookup_country_us_is_case_sensitive() {
    natl()
        .args(["lookup", "country", "US"])
        .assert()
        .success()
        .stdout(predicate::str::contains("United States"));

    natl()
        .args(["lookup", "country", "us"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no country match"));
}

#[test]
fn lookup_city_is_membership_exact() {
    natl()
        .args(["lookup", "city", "Paris"])
        .assert()
        .success()
        .stdout(predicate::str::contains("paris"));

    natl()
        .args(["lookup", "city", "Parisian"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a known city"));
}

#[test]
fn missing_gazetteer_dir_is_fatal() {
    let tmp = TempDir::new().unwrap();
    natl()
        .args(["lookup", "country", "France"])
        .arg("--gazetteer")
        .arg(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Reference data unavailable"));
}

// --- Ingest ---

#[test]
fn ingest_writes_mention_table() {
    let tmp = TempDir::new().unwrap();
    let input = write_articles(
        tmp.path(),
        "title,description\n\
         UK and US discussed Syria,Londoners and Parisians were affected.\n",
    );
    let output = tmp.path().join("mentions.csv");

    natl()
        .args(["ingest", "--input"])
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .assert()
        .success()
        .stderr(predicate::str::contains("Normalized 1 documents"));

    let written = fs::read_to_string(&output).unwrap();
    assert!(written.starts_with("text,countries,nationalities,cities"));
    assert!(written.contains("United Kingdom"));
    assert!(written.contains("United States"));
    assert!(written.contains("Syria"));
    // "Londoners" is not "London": city matching is membership-exact.
    assert!(!written.contains("London,"));
}

#[test]
fn ingest_missing_input_fails() {
    let tmp = TempDir::new().unwrap();
    natl()
        .args(["ingest", "--input"])
        .arg(tmp.path().join("nope.csv"))
        .arg("--output")
        .arg(tmp.path().join("out.csv"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Dataset not found"));
}

// --- Report ---

fn mention_fixture(dir: &Path) -> PathBuf {
    let path = dir.join("mentions.csv");
    fs::write(
        &path,
        "text,countries,nationalities,cities\n\
         a,Ukraine,Russian,Kyiv\n\
         a,Ukraine,,Kyiv\n\
         b,France,,\n",
    )
    .unwrap();
    path
}

#[test]
fn report_countries_includes_iso3() {
    let tmp = TempDir::new().unwrap();
    let mentions = mention_fixture(tmp.path());

    natl()
        .args(["report", "countries", "--mentions"])
        .arg(&mentions)
        .assert()
        .success()
        .stdout(predicate::str::contains("UKR").and(predicate::str::contains("FRA")));
}

#[test]
fn report_cities_for_country() {
    let tmp = TempDir::new().unwrap();
    let mentions = mention_fixture(tmp.path());

    natl()
        .args(["report", "cities", "--country", "Ukraine", "--json", "--mentions"])
        .arg(&mentions)
        .assert()
        .success()
        .stdout(predicate::str::contains("Kyiv").and(predicate::str::contains("\"count\": 2")));
}

#[test]
fn report_cities_empty_states() {
    let tmp = TempDir::new().unwrap();
    let mentions = mention_fixture(tmp.path());

    natl()
        .args(["report", "cities", "--country", "Gotham", "--mentions"])
        .arg(&mentions)
        .assert()
        .success()
        .stdout(predicate::str::contains("not found in the gazetteer"));

    natl()
        .args(["report", "cities", "--country", "France", "--mentions"])
        .arg(&mentions)
        .assert()
        .success()
        .stdout(predicate::str::contains("No city mentions recorded"));
}

#[test]
fn report_identities_and_pairs() {
    let tmp = TempDir::new().unwrap();
    let mentions = mention_fixture(tmp.path());

    natl()
        .args(["report", "identities", "--country", "Ukraine", "--mentions"])
        .arg(&mentions)
        .assert()
        .success()
        .stdout(predicate::str::contains("Russian"));

    natl()
        .args(["report", "pairs", "--country", "Ukraine", "--mentions"])
        .arg(&mentions)
        .assert()
        .success()
        .stdout(predicate::str::contains("Russian").and(predicate::str::contains("Kyiv")));
}

#[test]
fn report_labels_views() {
    let tmp = TempDir::new().unwrap();
    let predictions = tmp.path().join("predictions.csv");
    fs::write(
        &predictions,
        "text,countries,nationalities,cities,predicted_label\n\
         a,France,French,Paris,politics\n\
         b,France,,,politics\n\
         c,Germany,,,sport\n",
    )
    .unwrap();

    natl()
        .args(["report", "labels", "--predictions"])
        .arg(&predictions)
        .assert()
        .success()
        .stdout(predicate::str::contains("2  politics").and(predicate::str::contains("1  sport")));

    natl()
        .args(["report", "labels", "--label", "politics", "--predictions"])
        .arg(&predictions)
        .assert()
        .success()
        .stdout(predicate::str::contains("France").and(predicate::str::contains("FRA")));

    natl()
        .args(["report", "labels", "--country", "Germany", "--predictions"])
        .arg(&predictions)
        .assert()
        .success()
        .stdout(predicate::str::contains("sport"));
}
