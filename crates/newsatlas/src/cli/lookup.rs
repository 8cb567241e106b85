use std::path::Path;

use anyhow::{bail, Result};

use super::LookupCommands;

pub fn run(command: &LookupCommands, gazetteer_dir: Option<&Path>) -> Result<()> {
    let gazetteer = super::load_gazetteer(gazetteer_dir)?;

    match command {
        LookupCommands::Country { name } => match gazetteer.resolve_country(name) {
            Some(canonical) => {
                println!("{canonical}");
                Ok(())
            }
            None => bail!("no country match for '{name}'"),
        },
        LookupCommands::City { name } => {
            if gazetteer.is_city(name) {
                println!("{}", name.trim().to_lowercase());
                Ok(())
            } else {
                bail!("'{name}' is not a known city")
            }
        }
    }
}
