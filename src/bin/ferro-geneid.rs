// Copyright (c) 2024-2025 Fulcrum Genomics LLC
// SPDX-License-Identifier: MIT

//! ferro-geneid CLI
//!
//! Command-line interface for offline gene identifier translation.

use clap::{Args, Parser, Subcommand};
use ferro_geneid::builder::{AddDbOptions, UnknownSymbolPolicy};
use ferro_geneid::cli::{output_error, output_info, output_translation, read_ids, OutputFormat};
use ferro_geneid::config::GeneIdConfig;
use ferro_geneid::{Builder, GeneIdError, MappingStore, Resolved, TranslateOptions, Translator};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;

#[derive(Parser)]
#[command(name = "ferro-geneid")]
#[command(author, version, about = "Offline gene identifier translator")]
#[command(
    long_about = "Translate between HGNC symbols, synonyms and external gene identifiers.

Examples:
  ferro-geneid build -i hgnc_complete_set.txt -o master.json.gz
  ferro-geneid to-symbol --db entrez 4609 7157
  ferro-geneid to-id --db uniprot --all MYC
  ferro-geneid cross --from ensembl_gene --to entrez -i ensembl_ids.txt
  ferro-geneid add-db -i toy_db.tsv --name toy --store master.json.gz"
)]
struct Cli {
    /// Log level or filter directive (e.g. info, ferro_geneid=debug)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Configuration file (default: .ferro-geneid.toml or ~/.config/ferro/geneid.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Input, store and output options shared by lookup commands.
#[derive(Args)]
struct QueryArgs {
    /// Identifiers to translate (reads stdin when neither IDs nor --input are given)
    ids: Vec<String>,

    /// Input file (one identifier per line)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Persisted store (default: config, FERRO_GENEID_STORE, bundled store)
    #[arg(long)]
    store: Option<PathBuf>,

    /// Value printed for identifiers that cannot be resolved
    #[arg(long)]
    null_id: Option<String>,

    /// Output format
    #[arg(short = 'f', long, default_value = "text", value_parser = ["text", "json"])]
    format: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a store from an HGNC-style reference file
    Build {
        /// Tab-separated reference file with a header line
        #[arg(short, long)]
        input: PathBuf,

        /// Output store (.json or .json.gz)
        #[arg(short, long)]
        output: PathBuf,

        /// External ID columns to index (default: config or ensembl_gene_id,entrez_id,hgnc_id)
        #[arg(long, value_delimiter = ',')]
        fields: Vec<String>,

        /// Hide the progress bar
        #[arg(long)]
        quiet: bool,
    },

    /// Register a custom symbol -> IDs database in a store
    AddDb {
        /// Two-column file: symbol, then separator-joined IDs
        #[arg(short, long)]
        input: PathBuf,

        /// Database name
        #[arg(long)]
        name: String,

        /// Store to extend (default: config, FERRO_GENEID_STORE, bundled store)
        #[arg(long)]
        store: Option<PathBuf>,

        /// Output store (default: overwrite the store read; required for the bundled store)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Input has no header line
        #[arg(long)]
        no_header: bool,

        /// Separator between IDs in the second column
        #[arg(long, default_value = ",")]
        id_separator: char,

        /// Skip rows with unknown symbols instead of failing
        #[arg(long)]
        skip_unknown: bool,
    },

    /// Show store metadata
    Info {
        /// Persisted store
        #[arg(long)]
        store: Option<PathBuf>,

        /// Output format
        #[arg(short = 'f', long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },

    /// Translate external IDs to official symbols
    ToSymbol {
        #[command(flatten)]
        query: QueryArgs,

        /// Source database (e.g. ensembl_gene, entrez, uniprot, hgnc)
        #[arg(long)]
        db: String,

        /// Return the official symbol followed by all synonyms
        #[arg(long)]
        all_synonyms: bool,

        /// Preferred symbols, used instead of the official symbol when present
        #[arg(long, value_delimiter = ',')]
        prefer: Vec<String>,
    },

    /// Translate symbols or synonyms to external IDs
    ToId {
        #[command(flatten)]
        query: QueryArgs,

        /// Target database
        #[arg(long)]
        db: String,

        /// Return every ID instead of the first
        #[arg(long)]
        all: bool,
    },

    /// Translate IDs of one database to another through the official symbol
    Cross {
        #[command(flatten)]
        query: QueryArgs,

        /// Source database
        #[arg(long)]
        from: String,

        /// Target database
        #[arg(long)]
        to: String,

        /// Return only the first target ID
        #[arg(long)]
        first: bool,
    },

    /// Resolve symbols or synonyms to official symbols
    Official {
        #[command(flatten)]
        query: QueryArgs,
    },

    /// List synonyms of official symbols
    Synonyms {
        #[command(flatten)]
        query: QueryArgs,
    },

    /// Sample official symbols uniformly
    Random {
        /// Number of symbols
        n: usize,

        /// Persisted store
        #[arg(long)]
        store: Option<PathBuf>,

        /// Seed for reproducible sampling
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level)?;

    let config = match &cli.config {
        Some(path) => GeneIdConfig::load_from_path(path)?,
        None => GeneIdConfig::load().unwrap_or_default(),
    };

    match cli.command {
        Commands::Build {
            input,
            output,
            fields,
            quiet,
        } => run_build(&config, &input, &output, fields, quiet),
        Commands::AddDb {
            input,
            name,
            store,
            output,
            no_header,
            id_separator,
            skip_unknown,
        } => {
            let policy = if skip_unknown {
                UnknownSymbolPolicy::Skip
            } else {
                UnknownSymbolPolicy::Fail
            };
            let options = AddDbOptions::default()
                .has_header(!no_header)
                .id_separator(id_separator)
                .on_unknown_symbol(policy);
            run_add_db(
                &config,
                &input,
                &name,
                store.as_deref(),
                output.as_deref(),
                &options,
            )
        }
        Commands::Info { store, format } => {
            let store = MappingStore::load_or_bundled(config.resolve_store_path(store.as_deref()))?;
            let mut stdout = io::stdout();
            output_info(&mut stdout, store.info(), OutputFormat::from_str(&format)?)?;
            Ok(())
        }
        Commands::ToSymbol {
            query,
            db,
            all_synonyms,
            prefer,
        } => {
            let options = TranslateOptions::new()
                .all_synonyms(all_synonyms)
                .preferred(prefer);
            run_query(&config, &query, |g, ids| g.id_to_symbol(ids, &db, &options))
        }
        Commands::ToId { query, db, all } => {
            let options = TranslateOptions::new().select_one(!all);
            run_query(&config, &query, |g, ids| g.symbol_to_id(ids, &db, &options))
        }
        Commands::Cross {
            query,
            from,
            to,
            first,
        } => {
            let options = TranslateOptions::new().select_one(first);
            run_query(&config, &query, |g, ids| g.cross_id(ids, &from, &to, &options))
        }
        Commands::Official { query } => run_query(&config, &query, |g, ids| g.official_symbol(ids)),
        Commands::Synonyms { query } => run_query(&config, &query, |g, ids| g.synonyms(ids)),
        Commands::Random { n, store, seed } => {
            let translator = Translator::new(MappingStore::load_or_bundled(
                config.resolve_store_path(store.as_deref()),
            )?);
            let symbols = match seed {
                Some(seed) => translator.random_symbols_with_rng(n, &mut StdRng::seed_from_u64(seed)),
                None => translator.random_symbols(n),
            };
            let mut stdout = io::stdout().lock();
            for symbol in symbols {
                writeln!(stdout, "{}", symbol)?;
            }
            Ok(())
        }
    }
}

fn init_tracing(level: &str) -> Result<(), Box<dyn std::error::Error>> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter =
        EnvFilter::try_new(level).map_err(|e| format!("Invalid log level '{}': {}", level, e))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr))
        .init();

    Ok(())
}

fn run_build(
    config: &GeneIdConfig,
    input: &Path,
    output: &Path,
    fields: Vec<String>,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut build_config = config.build.clone();
    if !fields.is_empty() {
        build_config = build_config.with_fields(fields);
    }

    let mut builder = Builder::new().with_progress(!quiet);
    let summary = builder.build(input, &build_config)?;
    builder.save(output)?;

    info!(
        "Built {} symbols ({} synonyms) from {} rows into {}",
        summary.symbols,
        summary.synonyms,
        summary.rows,
        output.display()
    );
    for (db, count) in &summary.ids_per_db {
        info!("  {}: {} IDs", db, count);
    }
    Ok(())
}

fn run_add_db(
    config: &GeneIdConfig,
    input: &Path,
    name: &str,
    store: Option<&Path>,
    output: Option<&Path>,
    options: &AddDbOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let output = config.resolve_add_db_output(store, output)?;
    let store = MappingStore::load_or_bundled(config.resolve_store_path(store))?;
    let mut builder = Builder::from_store(store);
    let summary = builder.add_db_with(input, name, options)?;
    builder.save(&output)?;

    info!(
        "Added {} with {} IDs from {} rows ({} skipped) into {}",
        name,
        summary.ids,
        summary.rows,
        summary.skipped,
        output.display()
    );
    Ok(())
}

/// Load the store, collect identifiers and write one result per identifier.
fn run_query<F>(
    config: &GeneIdConfig,
    query: &QueryArgs,
    lookup: F,
) -> Result<(), Box<dyn std::error::Error>>
where
    F: Fn(&Translator, &[String]) -> Result<Resolved, GeneIdError>,
{
    let format = OutputFormat::from_str(&query.format)?;
    let mut translator = Translator::new(MappingStore::load_or_bundled(
        config.resolve_store_path(query.store.as_deref()),
    )?);
    if let Some(null_id) = config.resolve_null_id(query.null_id.as_deref()) {
        translator.set_default_null_id(null_id);
    }

    let ids = if !query.ids.is_empty() {
        query.ids.clone()
    } else if let Some(path) = &query.input {
        read_ids(BufReader::new(File::open(path)?))?
    } else {
        read_ids(io::stdin().lock())?
    };
    if ids.is_empty() {
        return Ok(());
    }

    let resolved = match lookup(&translator, &ids) {
        Ok(resolved) => resolved,
        Err(e) => {
            output_error(&mut io::stderr(), &e, format)?;
            return Err(e.into());
        }
    };

    let mut writer = BufWriter::new(io::stdout().lock());
    for (input, output) in ids.iter().zip(resolved.iter()) {
        output_translation(&mut writer, input, output, format)?;
    }
    writer.flush()?;
    Ok(())
}
