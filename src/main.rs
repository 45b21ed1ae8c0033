mod crawl;
mod dataset;
mod fetch;
mod parser;
mod quality;
mod query;
mod record;
mod settings;
mod spreadsheet;
mod stats;
mod terroir;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{debug, info};

use crawl::EmptyPagePolicy;
use dataset::{BuildMode, Dataset};
use quality::QualityReport;
use query::FindQuery;
use settings::Settings;

#[derive(Parser)]
#[command(name = "cigar_catalog", about = "Cigar catalogue scraper and filter")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape every category and brand page, then write the spreadsheet
    Scrape {
        /// Output spreadsheet (default: cigars_dataset.xlsx)
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// How to treat records with the wrong field count
        #[arg(long, value_enum)]
        mode: Option<BuildMode>,
        /// What to do with categories or brands that list nothing
        #[arg(long, value_enum)]
        on_empty: Option<EmptyPagePolicy>,
    },
    /// Filter a saved dataset; unset bounds default to the observed range
    Find {
        /// Spreadsheet to read (default: cigars_dataset.xlsx)
        #[arg(short, long)]
        input: Option<PathBuf>,
        #[arg(long)]
        price_min: Option<f64>,
        #[arg(long)]
        price_max: Option<f64>,
        #[arg(long)]
        diam_min: Option<f64>,
        #[arg(long)]
        diam_max: Option<f64>,
        #[arg(long)]
        len_min: Option<f64>,
        #[arg(long)]
        len_max: Option<f64>,
        /// Origin display name, repeatable (default: all four regions)
        #[arg(long = "origin")]
        origins: Vec<String>,
        /// Print matching rows as JSON
        #[arg(long)]
        json: bool,
    },
    /// Per-origin statistics and brand price ranking
    Stats {
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// How many brands to list at each end of the ranking
        #[arg(long, default_value = "5")]
        top: usize,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();
    let mut settings = Settings::load().context("Failed to load settings")?;

    let result = match cli.command {
        Commands::Scrape { out, mode, on_empty } => {
            if let Some(out) = out {
                settings.output = out;
            }
            if let Some(mode) = mode {
                settings.build_mode = mode;
            }
            if let Some(policy) = on_empty {
                settings.empty_page_policy = policy;
            }
            scrape(&settings)
        }
        Commands::Find {
            input,
            price_min,
            price_max,
            diam_min,
            diam_max,
            len_min,
            len_max,
            origins,
            json,
        } => {
            let q = FindQuery {
                price_min,
                price_max,
                diam_min,
                diam_max,
                len_min,
                len_max,
                origins: (!origins.is_empty()).then_some(origins),
            };
            find(&input.unwrap_or_else(|| settings.output.clone()), &q, json)
        }
        Commands::Stats { input, top } => {
            show_stats(&input.unwrap_or_else(|| settings.output.clone()), top)
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {:.1}s", elapsed.as_secs_f64());
    }

    result
}

fn scrape(settings: &Settings) -> anyhow::Result<()> {
    info!(?settings, "Starting scrape");
    let fetcher = fetch::HttpFetcher::new()?;
    let crawled = crawl::crawl(&fetcher, settings)?;

    let mut report = QualityReport::from_records(&crawled.records);
    report.empty_categories = crawled.empty_categories;
    report.empty_brands = crawled.empty_brands;
    report.print();

    let built = dataset::build(crawled.records, settings.build_mode)?;
    for r in &built.rejected {
        debug!(index = r.index, arity = r.arity, fields = ?r.fields, "Left out record");
    }
    if !built.rejected.is_empty() {
        println!(
            "Left out {} records with the wrong field count.",
            built.rejected.len()
        );
    }

    spreadsheet::save(&built.dataset, &settings.output)
        .with_context(|| format!("Failed to write {}", settings.output.display()))?;
    println!(
        "Saved {} rows to {}",
        built.dataset.len(),
        settings.output.display()
    );
    Ok(())
}

fn load(path: &Path) -> anyhow::Result<Dataset> {
    spreadsheet::load(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn find(path: &Path, q: &FindQuery, json: bool) -> anyhow::Result<()> {
    let dataset = load(path)?;
    let found = query::find(&dataset, q);
    if json {
        println!("{}", serde_json::to_string_pretty(&found.rows)?);
    } else {
        print_rows(&found);
    }
    Ok(())
}

fn show_stats(path: &Path, top: usize) -> anyhow::Result<()> {
    let dataset = load(path)?;
    if dataset.is_empty() {
        println!("Dataset is empty.");
    } else {
        stats::print(&dataset, top);
    }
    Ok(())
}

fn print_rows(dataset: &Dataset) {
    if dataset.is_empty() {
        println!("No cigars match.");
        return;
    }

    println!(
        "{:>3} | {:<20} | {:<14} | {:<28} | {:>7} | {:>8} | {:>4} | {:>5} | {:>5}",
        "#", "Brand", "Origin", "Name", "Unit", "Box", "Qty", "Diam", "Len"
    );
    println!("{}", "-".repeat(116));

    for (i, r) in dataset.rows.iter().enumerate() {
        println!(
            "{:>3} | {:<20} | {:<14} | {:<28} | {:>7} | {:>8} | {:>4} | {:>5} | {:>5}",
            i + 1,
            truncate(&r.brand, 20),
            truncate(&r.origin, 14),
            truncate(&r.name, 28),
            fmt_num(r.unit_price_eur),
            fmt_num(r.box_price_eur),
            r.cig_per_box.map(|n| n.to_string()).unwrap_or_else(|| "-".into()),
            fmt_num(r.diameter_cm),
            fmt_num(r.length_cm),
        );
    }

    println!("\n{} cigars | columns: {}", dataset.len(), dataset.columns().join(", "));
}

fn fmt_num(v: Option<f64>) -> String {
    v.map(|x| format!("{:.2}", x)).unwrap_or_else(|| "-".into())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max - 3).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_on_empty_dataset_is_ok() {
        let path = std::env::temp_dir().join(format!("cigar_catalog_empty_{}.xlsx", std::process::id()));
        spreadsheet::save(&Dataset::default(), &path).unwrap();
        assert!(show_stats(&path, 5).is_ok());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn missing_input_is_an_error() {
        let path = std::env::temp_dir().join("cigar_catalog_no_such_input.xlsx");
        let _ = std::fs::remove_file(&path);
        assert!(show_stats(&path, 5).is_err());
        assert!(find(&path, &FindQuery::default(), false).is_err());
    }

    #[test]
    fn truncate_long_names() {
        assert_eq!(truncate("Romeo y Julieta", 20), "Romeo y Julieta");
        assert_eq!(truncate("Romeo y Julieta", 10), "Romeo y...");
    }
}
