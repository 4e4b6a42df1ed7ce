//! CLI binary for ccss-graph: clean, convert, and export CCSS standards graphs.

mod config;

use anyhow::{Context, Result};
use ccss_core::diagnostics::{Diagnostic, sorted_messages};
use ccss_core::reference::ReferenceIndex;
use ccss_core::{sanitize, storage, table, validate};
use clap::{Parser, Subcommand};
use config::CcssConfig;
use serde_json::Value;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "ccss-graph", about = "CCSS standards graph toolkit")]
struct Cli {
    /// Project root directory (defaults to current directory)
    #[arg(short, long, global = true)]
    project: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a CSV file to a JSON document
    CsvToJson {
        /// Input CSV file
        csv_input: PathBuf,

        /// Output JSON file
        json_output: PathBuf,

        /// Root key holding the records (defaults to convert.root_key)
        #[arg(long)]
        key: Option<String>,
    },

    /// Convert a JSON document (list of objects under a root key) to CSV
    JsonToCsv {
        /// Input JSON file
        json_input: PathBuf,

        /// Output CSV file
        csv_output: PathBuf,

        /// Root key holding the records (defaults to convert.root_key)
        #[arg(long)]
        key: Option<String>,
    },

    /// Validate a relationship CSV and write a cleaned copy
    Validate {
        /// Relationship CSV (defaults to paths.dependencies_csv)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Cleaned CSV (defaults to paths.cleaned_csv)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Report rows whose source and target are the same
    CheckSelfRef {
        /// Relationship CSV (defaults to paths.dependencies_csv)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Canonicalize identifiers and relationship labels into a JSON document
    Sanitize {
        /// Relationship CSV (defaults to paths.dependencies_csv)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// K-8 standards used to resolve short identifiers (defaults to paths.k8_standards)
        #[arg(long)]
        k8: Option<PathBuf>,

        /// Sanitized JSON (defaults to paths.sanitized_json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Export standards and relationships as a node/link graph
    ExportGraph {
        /// K-8 standards (defaults to paths.k8_standards)
        #[arg(long)]
        k8: Option<PathBuf>,

        /// High school standards (defaults to paths.hs_standards)
        #[arg(long)]
        hs: Option<PathBuf>,

        /// Sanitized relationship document (defaults to paths.sanitized_json)
        #[arg(long)]
        deps: Option<PathBuf>,

        /// Graph output (defaults to paths.graph_output)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Validate, sanitize, and export in one pass using the configured paths
    Build,
}

fn get_project_root(cli: &Cli) -> Result<PathBuf> {
    match &cli.project {
        Some(p) => Ok(p.clone()),
        None => std::env::current_dir().context("failed to get current directory"),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let project_root = get_project_root(&cli)?;
    let config = CcssConfig::load(&project_root)?;

    match cli.command {
        Commands::CsvToJson {
            csv_input,
            json_output,
            key,
        } => cmd_csv_to_json(
            &csv_input,
            &json_output,
            key.as_deref().unwrap_or(&config.convert.root_key),
        ),
        Commands::JsonToCsv {
            json_input,
            csv_output,
            key,
        } => cmd_json_to_csv(
            &json_input,
            &csv_output,
            key.as_deref().unwrap_or(&config.convert.root_key),
        ),
        Commands::Validate { input, output } => cmd_validate(
            &input.unwrap_or(config.paths.dependencies_csv),
            &output.unwrap_or(config.paths.cleaned_csv),
        ),
        Commands::CheckSelfRef { input } => {
            cmd_check_self_ref(&input.unwrap_or(config.paths.dependencies_csv))
        }
        Commands::Sanitize { input, k8, output } => cmd_sanitize(
            &input.unwrap_or_else(|| config.paths.dependencies_csv.clone()),
            &k8.unwrap_or_else(|| config.paths.k8_standards.clone()),
            &output.unwrap_or_else(|| config.paths.sanitized_json.clone()),
            &config,
        ),
        Commands::ExportGraph { k8, hs, deps, output } => cmd_export_graph(
            &k8.unwrap_or_else(|| config.paths.k8_standards.clone()),
            &hs.unwrap_or_else(|| config.paths.hs_standards.clone()),
            &deps.unwrap_or_else(|| config.paths.sanitized_json.clone()),
            &output.unwrap_or_else(|| config.paths.graph_output.clone()),
            &config,
        ),
        Commands::Build => cmd_build(&config),
    }
}

fn cmd_csv_to_json(csv_input: &Path, json_output: &Path, key: &str) -> Result<()> {
    eprintln!("Reading data from '{}'...", csv_input.display());
    let table = storage::read_table(csv_input)?;
    let document = table::table_to_document(&table, key)
        .with_context(|| format!("cannot convert {}", csv_input.display()))?;

    storage::write_json(json_output, &document)?;
    eprintln!(
        "Converted {} records to '{}' (key: {})",
        table.rows.len(),
        json_output.display(),
        key
    );
    Ok(())
}

fn cmd_json_to_csv(json_input: &Path, csv_output: &Path, key: &str) -> Result<()> {
    eprintln!("Reading data from '{}'...", json_input.display());
    let document: Value = storage::read_json(json_input)?;
    let table = table::document_to_table(&document, key)
        .with_context(|| format!("cannot convert {}", json_input.display()))?;

    storage::write_table(csv_output, &table.headers, &table.rows)?;
    eprintln!(
        "Converted {} records to '{}'",
        table.rows.len(),
        csv_output.display()
    );
    Ok(())
}

fn cmd_validate(input: &Path, output: &Path) -> Result<()> {
    let table = storage::read_table(input)?;
    let rows = validate::ordered_rows(&table)
        .with_context(|| format!("cannot validate {}", input.display()))?;
    let report = validate::validate(rows);

    storage::write_table(output, &relationship_header(), &cleaned_rows(&report))?;

    print_diagnostics("Validation", &report.diagnostics);
    eprintln!(
        "\nSuccessfully wrote {} cleaned rows to '{}'.",
        report.written(),
        output.display()
    );
    Ok(())
}

fn cmd_check_self_ref(input: &Path) -> Result<()> {
    eprintln!(
        "--- Scanning '{}' for self-referencing dependencies ---",
        input.display()
    );
    let table = storage::read_table(input)?;
    let found = validate::scan_self_references(&table)?;

    for diagnostic in &found {
        println!("  [!] {}", diagnostic);
    }
    if found.is_empty() {
        eprintln!("--- Scan complete. No self-referencing dependencies found. ---");
    } else {
        eprintln!("--- Scan complete. {} issue(s) found. ---", found.len());
    }
    Ok(())
}

fn cmd_sanitize(input: &Path, k8: &Path, output: &Path, config: &CcssConfig) -> Result<()> {
    let mut diagnostics = Vec::new();
    let index = load_index(k8, &config.convert.root_key, &mut diagnostics)?;
    let table = storage::read_table(input)?;

    let document = sanitize::sanitize_dependencies(&table, &index, &mut diagnostics)
        .with_context(|| format!("cannot sanitize {}", input.display()))?;
    storage::write_list(
        output,
        &config.convert.dependencies_key,
        &document.dependencies,
    )?;

    print_diagnostics("Sanitizing", &diagnostics);
    eprintln!(
        "Successfully created sanitized JSON file at: {} ({} relationships)",
        output.display(),
        document.dependencies.len()
    );
    Ok(())
}

fn cmd_export_graph(
    k8: &Path,
    hs: &Path,
    deps: &Path,
    output: &Path,
    config: &CcssConfig,
) -> Result<()> {
    eprintln!("Starting graph data export...");
    let key = &config.convert.root_key;
    let mut standards = storage::load_standards(k8, key)?;
    standards.extend(storage::load_standards(hs, key)?);
    let dependencies = storage::load_dependencies(deps, &config.convert.dependencies_key)?;

    let graph = ccss_export::graph::assemble(&standards, &dependencies);
    warn_dangling(&graph);
    storage::write_json(output, &graph)?;

    eprintln!(
        "\nSuccessfully exported data for {} nodes and {} links to '{}'",
        graph.nodes.len(),
        graph.links.len(),
        output.display()
    );
    Ok(())
}

fn cmd_build(config: &CcssConfig) -> Result<()> {
    let paths = &config.paths;
    let key = &config.convert.root_key;
    let mut diagnostics = Vec::new();

    // Read every input before writing anything.
    let k8 = storage::load_standards(&paths.k8_standards, key)?;
    let hs = storage::load_standards(&paths.hs_standards, key)?;
    let table = storage::read_table(&paths.dependencies_csv)?;
    let rows = validate::ordered_rows(&table)
        .with_context(|| format!("cannot validate {}", paths.dependencies_csv.display()))?;

    let index = ReferenceIndex::build(k8.iter().cloned());
    report_overwritten(&index, &mut diagnostics);

    let rows = sanitize::canonicalize_rows(&rows, &index, &mut diagnostics);
    let report = validate::validate(rows);
    diagnostics.extend(report.diagnostics.iter().cloned());
    let dependencies = sanitize::edges_from_validated(&report.rows);

    let graph = ccss_export::graph::assemble(k8.iter().chain(&hs), &dependencies);
    warn_dangling(&graph);

    let mut outputs = storage::OutputBatch::new();
    outputs.table(&paths.cleaned_csv, &relationship_header(), &cleaned_rows(&report))?;
    outputs.list(
        &paths.sanitized_json,
        &config.convert.dependencies_key,
        &dependencies.dependencies,
    )?;
    outputs.json(&paths.graph_output, &graph)?;
    outputs.commit()?;

    print_diagnostics("Build", &diagnostics);
    eprintln!("\nBuild complete:");
    eprintln!("  Cleaned rows: {} -> {}", report.written(), paths.cleaned_csv.display());
    eprintln!(
        "  Relationships: {} -> {}",
        dependencies.dependencies.len(),
        paths.sanitized_json.display()
    );
    eprintln!(
        "  Nodes: {}, links: {} -> {}",
        graph.nodes.len(),
        graph.links.len(),
        paths.graph_output.display()
    );
    Ok(())
}

fn relationship_header() -> Vec<String> {
    validate::RELATIONSHIP_COLUMNS.map(str::to_string).to_vec()
}

fn cleaned_rows(report: &validate::ValidationReport) -> Vec<Vec<String>> {
    report.rows.iter().map(|r| r.fields.clone()).collect()
}

fn load_index(path: &Path, root_key: &str, diagnostics: &mut Vec<Diagnostic>) -> Result<ReferenceIndex> {
    let records = storage::load_standards(path, root_key)
        .with_context(|| format!("could not build the K-8 lookup from {}", path.display()))?;
    let index = ReferenceIndex::build(records);
    report_overwritten(&index, diagnostics);
    Ok(index)
}

fn report_overwritten(index: &ReferenceIndex, diagnostics: &mut Vec<Diagnostic>) {
    for key in index.overwritten() {
        tracing::warn!("reference key {} declared more than once", key);
        diagnostics.push(Diagnostic::DuplicateReferenceKey {
            key: key.to_string(),
        });
    }
}

fn warn_dangling(graph: &ccss_export::graph::GraphDocument) {
    for link in graph.dangling_links() {
        tracing::warn!(
            "link {} -> {} references an unknown standard",
            link.source,
            link.target
        );
    }
}

fn print_diagnostics(stage: &str, diagnostics: &[Diagnostic]) {
    if diagnostics.is_empty() {
        println!("{} complete. No errors found.", stage);
        return;
    }
    println!("{} found {} error(s):", stage, diagnostics.len());
    for message in sorted_messages(diagnostics) {
        println!("- {}", message);
    }
}
