use anyhow::{Context, Result};
use clap::Parser;
use gwascat::gwas::{CatalogSummary, GwasCatalog, CHROMOSOMES, SUMMARY_MIN_ASSOCIATIONS};
use prettytable::{format, Cell, Row, Table};
use serde::Serialize;
use std::{io, path::PathBuf, time::Instant};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Summaries and position/effect-size extraction for the GWAS catalog"
)]
struct Args {
    /// Associations export (.tsv) or its .zip download
    catalog: PathBuf,
    #[arg(short, long, default_value = "Type 2 diabetes")]
    disease: String,
    #[arg(short, long, default_value = "6")]
    chromosome: String,
    /// CSV file for (position, effect size) pairs; stdout when absent
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Sort pairs by position instead of keeping catalog row order
    #[arg(long)]
    sort_by_position: bool,
    /// Print summaries as JSON instead of a table
    #[arg(long)]
    json: bool,
    /// Log every disease/chromosome with at least this many pairs
    #[arg(long)]
    scan_min: Option<usize>,
}

#[derive(Serialize)]
struct SubsetReport {
    subset: String,
    #[serde(flatten)]
    summary: CatalogSummary,
}

#[derive(Serialize)]
struct PairRow {
    position: u64,
    effect_size: f64,
}

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    // ─── 2) load the catalog ─────────────────────────────────────────
    let start = Instant::now();
    let catalog = GwasCatalog::open(&args.catalog)
        .with_context(|| format!("loading catalog {}", args.catalog.display()))?;
    info!(
        associations = catalog.size(),
        elapsed = ?start.elapsed(),
        "catalog loaded"
    );

    // ─── 3) disease → chromosome subsets ─────────────────────────────
    let disease = catalog
        .filter_by_disease(&args.disease)
        .with_context(|| format!("filtering by disease {:?}", args.disease))?;
    info!(
        disease = %args.disease,
        unique_rsids = disease.unique_rsids().len(),
        "disease subset"
    );

    let subset = disease
        .filter_by_chromosome(&args.chromosome)
        .with_context(|| format!("filtering by chromosome {:?}", args.chromosome))?;

    let reports = vec![
        SubsetReport {
            subset: "all".into(),
            summary: catalog.summary(),
        },
        SubsetReport {
            subset: args.disease.clone(),
            summary: disease.summary(),
        },
        SubsetReport {
            subset: format!("{} / chr{}", args.disease, args.chromosome),
            summary: subset.summary(),
        },
    ];
    print_reports(&reports, args.json)?;

    // ─── 4) position / effect size pairs ─────────────────────────────
    let mut pairs = subset.positions_and_effect_sizes();
    if args.sort_by_position {
        pairs.sort_by_key(|&(pos, _)| pos);
    }
    info!(pairs = pairs.len(), "extracted position/effect size pairs");

    match &args.output {
        Some(path) => {
            let wtr = csv::Writer::from_path(path)
                .with_context(|| format!("creating {}", path.display()))?;
            write_pairs(wtr, &pairs)?;
            info!(path = %path.display(), "wrote pairs");
        }
        None => write_pairs(csv::Writer::from_writer(io::stdout()), &pairs)?,
    }

    // ─── 5) optional scan over every disease and chromosome ──────────
    if let Some(min) = args.scan_min {
        scan(&catalog, min)?;
    }

    info!("all done");
    Ok(())
}

fn print_reports(reports: &[SubsetReport], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(reports)?);
        return Ok(());
    }

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BOX_CHARS);
    table.add_row(Row::new(vec![
        Cell::new("Subset").style_spec("bFg"),
        Cell::new("Associations").style_spec("bFg"),
        Cell::new("Diseases").style_spec("bFg"),
        Cell::new(&format!("Diseases > {}", SUMMARY_MIN_ASSOCIATIONS)).style_spec("bFg"),
    ]));
    for r in reports {
        table.add_row(Row::new(vec![
            Cell::new(&r.subset),
            Cell::new(&r.summary.associations.to_string()).style_spec("r"),
            Cell::new(&r.summary.diseases.to_string()).style_spec("r"),
            Cell::new(&r.summary.diseases_over_threshold.to_string()).style_spec("r"),
        ]));
    }
    table.printstd();
    Ok(())
}

fn write_pairs<W: io::Write>(mut wtr: csv::Writer<W>, pairs: &[(u64, f64)]) -> Result<()> {
    for &(position, effect_size) in pairs {
        wtr.serialize(PairRow {
            position,
            effect_size,
        })
        .context("writing pair")?;
    }
    wtr.flush().context("flushing pairs")?;
    Ok(())
}

fn scan(catalog: &GwasCatalog, min: usize) -> Result<()> {
    info!(min, "scanning diseases × chromosomes");
    let mut hits = 0usize;
    for disease_name in catalog.unique_diseases() {
        let disease = catalog.filter_by_disease(&disease_name)?;
        for chr in CHROMOSOMES {
            let n = disease
                .filter_by_chromosome(chr)?
                .positions_and_effect_sizes()
                .len();
            if n > 0 && n >= min {
                info!(disease = %disease_name, chr, pairs = n, "disease/chromosome");
                hits += 1;
            }
        }
    }
    info!(hits, "scan finished");
    Ok(())
}
