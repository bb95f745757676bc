use anyhow::{Result, bail};
use comfy_table::Table;
use tracing::info;

use dimclass_cli::run::{RunReport, RunRequest, execute, load_vocabulary};
use dimclass_core::{ParserRegistry, RunOptions, normalize};

use crate::cli::{DispatchArgs, RunArgs, UnitsArgs};
use crate::progress::ProgressReporter;
use crate::summary::apply_table_style;

pub fn run_classify(args: &RunArgs) -> Result<RunReport> {
    if !args.input.is_file() {
        bail!("input file not found: {}", args.input.display());
    }
    let request = RunRequest {
        input: args.input.clone(),
        output_dir: args.output_dir.clone(),
        format: args.format.into(),
        extra_units: args.units.clone(),
        dry_run: args.dry_run,
        options: RunOptions::default()
            .with_parallel(!args.no_parallel)
            .with_matrix(args.matrix.clone())
            .with_debug(args.debug),
    };
    let progress = ProgressReporter::for_stderr(!args.debug);
    let report = execute(&request, &progress)?;
    if let Some(committed) = &report.committed {
        info!(
            options = %committed.classified_options.display(),
            profiles = %committed.dataset_profiles.display(),
            manifest = %committed.manifest.display(),
            "outputs written"
        );
    }
    Ok(report)
}

pub fn run_units(args: &UnitsArgs) -> Result<()> {
    let vocabulary = load_vocabulary(&args.units)?;
    let mut table = Table::new();
    table.set_header(vec!["Label", "Unit type", "Scale", "Currency"]);
    apply_table_style(&mut table);
    for entry in vocabulary.units.iter() {
        table.add_row(vec![
            entry.label.clone(),
            entry.unit_type.as_str().to_string(),
            entry.scale.to_string(),
            entry.currency.clone().unwrap_or_else(|| "-".to_string()),
        ]);
    }
    println!("{table}");
    println!("{} unit labels", vocabulary.units.len());
    for source in vocabulary.sources() {
        println!("  {}  {}", source.sha256, source.name);
    }
    Ok(())
}

pub fn run_dispatch(args: &DispatchArgs) -> Result<()> {
    let vocabulary = load_vocabulary(&[])?;
    let registry = ParserRegistry::from_vocabulary(&vocabulary);
    let mut table = Table::new();
    table.set_header(vec!["Label", "Normalized", "Type", "Parser", "Fallback"]);
    apply_table_style(&mut table);
    for label in &args.labels {
        let dispatch = registry.dispatch_detailed(label);
        table.add_row(vec![
            label.clone(),
            normalize(label),
            dispatch.dim_type.as_str().to_string(),
            dispatch.parser.to_string(),
            if dispatch.fallback { "yes" } else { "no" }.to_string(),
        ]);
    }
    println!("{table}");
    Ok(())
}
