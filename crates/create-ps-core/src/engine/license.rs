//! License selection and rendering

use super::context::{Materialized, RunContext};
use super::write_file;
use crate::collab::{Choice, Prompter, TemplateSource};
use crate::error::{Error, Result};
use chrono::Datelike;
use std::path::PathBuf;

const LICENSE_FILE: &str = "LICENSE";

/// Placeholders used by the choosealicense.com templates
const YEAR_PLACEHOLDERS: &[&str] = &["[year]", "[yyyy]", "<year>"];
const AUTHOR_PLACEHOLDERS: &[&str] = &[
    "[fullname]",
    "[name of copyright owner]",
    "<name of author>",
    "<copyright holders>",
];

/// Substitute the copyright year and holder into a license template
pub fn fill_placeholders(body: &str, year: i32, author: &str) -> String {
    let year = year.to_string();
    let mut text = body.to_string();
    for p in YEAR_PLACEHOLDERS {
        text = text.replace(p, &year);
    }
    if !author.is_empty() {
        for p in AUTHOR_PLACEHOLDERS {
            text = text.replace(p, author);
        }
    }
    text
}

/// Ask for a license, write LICENSE and record its name for the README
pub async fn materialize<P: Prompter, T: TemplateSource>(
    ctx: &mut RunContext,
    prompter: &mut P,
    templates: &T,
) -> Result<Materialized> {
    prompter.start_progress("Fetching licenses...");
    let catalog = templates.fetch_license_catalog().await;
    match &catalog {
        Ok(list) => prompter.stop_progress(&format!("{} licenses available", list.len())),
        Err(_) => prompter.stop_progress("Could not fetch licenses"),
    }
    let catalog = catalog?;
    if catalog.is_empty() {
        return Err(Error::Validation("The license catalog is empty".to_string()));
    }

    let options: Vec<Choice> = catalog
        .iter()
        .map(|l| Choice::new(&l.key, &l.name))
        .collect();
    let key = prompter.select("Select a license:", &options)?;

    let license = templates.fetch_license(&key).await?;
    if ctx.author.is_empty() {
        prompter.warn("No author name configured; the LICENSE copyright holder placeholder was left as-is");
    }
    let text = fill_placeholders(&license.body, ctx.today.year(), &ctx.author);

    let path = PathBuf::from(LICENSE_FILE);
    write_file(ctx.target(), &path, &text).await?;
    tracing::debug!(license = %license.key, "wrote license");

    ctx.license_name = Some(license.name);
    Ok(Materialized::paths(vec![path]))
}
