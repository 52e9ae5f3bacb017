//! Mapping-store construction from tabular sources.
//!
//! Two procedures populate a [`MappingStore`]:
//! - [`Builder::build`] derives the symbol table and one translation table per
//!   external-ID column from a reference file (an HGNC complete-set export).
//! - [`Builder::add_db`] registers one user-supplied database keyed by symbol.
//!
//! Both procedures work on a scratch copy and only commit once the whole
//! input has been processed, so a failing input leaves the store untouched.
//!
//! # Example
//!
//! ```no_run
//! use ferro_geneid::builder::{BuildConfig, Builder};
//!
//! let mut builder = Builder::new();
//! builder.build("hgnc_complete_set.txt", &BuildConfig::default()).unwrap();
//! builder.add_db("toy_db.tsv", "toy").unwrap();
//! builder.save("master.json.gz").unwrap();
//! ```

pub mod tsv;

use crate::error::GeneIdError;
use crate::store::{
    MappingStore, StoreInfo, SymbolTable, TranslationTable, INFO_TABLE, STORE_VERSION,
    SYMBOL_TABLE,
};
use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::Path;

pub use tsv::{split_cell, TsvRow, TsvTable};

/// Separator for multi-valued cells in the reference file.
pub const REFERENCE_SEPARATOR: char = '|';

/// Default separator for ID lists in custom database files.
pub const CUSTOM_ID_SEPARATOR: char = ',';

/// Column layout of the reference file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Column holding the official symbol
    pub key_symbol: String,
    /// Column holding `|`-separated alias symbols
    pub alias_field: String,
    /// Column holding `|`-separated previous symbols
    pub prev_field: String,
    /// External-ID columns; each becomes a database named by [`safe_db_name`]
    pub fields: Vec<String>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            key_symbol: "symbol".to_string(),
            alias_field: "alias_symbol".to_string(),
            prev_field: "prev_symbol".to_string(),
            fields: vec![
                "ensembl_gene_id".to_string(),
                "entrez_id".to_string(),
                "hgnc_id".to_string(),
            ],
        }
    }
}

impl BuildConfig {
    /// Replace the external-ID columns.
    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }
}

/// What `add_db` does with a row whose symbol the store does not know.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownSymbolPolicy {
    /// Abort the whole addition
    #[default]
    Fail,
    /// Log a warning and skip the row
    Skip,
}

/// Options for [`Builder::add_db_with`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddDbOptions {
    /// First line is a header (default: true)
    pub has_header: bool,
    /// Separator between IDs in column 2 (default: `,`)
    pub id_separator: char,
    /// Unknown-symbol handling (default: fail)
    pub on_unknown_symbol: UnknownSymbolPolicy,
}

impl Default for AddDbOptions {
    fn default() -> Self {
        Self {
            has_header: true,
            id_separator: CUSTOM_ID_SEPARATOR,
            on_unknown_symbol: UnknownSymbolPolicy::Fail,
        }
    }
}

impl AddDbOptions {
    pub fn has_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    pub fn id_separator(mut self, sep: char) -> Self {
        self.id_separator = sep;
        self
    }

    pub fn on_unknown_symbol(mut self, policy: UnknownSymbolPolicy) -> Self {
        self.on_unknown_symbol = policy;
        self
    }
}

/// Counts reported by [`Builder::build`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildSummary {
    /// Data rows read
    pub rows: usize,
    /// Distinct official symbols
    pub symbols: usize,
    /// Synonyms resolving to an official symbol
    pub synonyms: usize,
    /// Rows skipped for an empty symbol
    pub skipped: usize,
    /// External IDs per database
    pub ids_per_db: BTreeMap<String, usize>,
}

/// Counts reported by [`Builder::add_db`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddDbSummary {
    /// Data rows read
    pub rows: usize,
    /// Distinct external IDs registered
    pub ids: usize,
    /// Rows skipped under [`UnknownSymbolPolicy::Skip`]
    pub skipped: usize,
}

/// Normalize an external column name into a database name.
///
/// Everything from the first `_id` on is dropped and whitespace trimmed:
/// `ensembl_gene_id` -> `ensembl_gene`, `uniprot_ids` -> `uniprot`.
pub fn safe_db_name(field: &str) -> String {
    let stem = match field.find("_id") {
        Some(pos) => &field[..pos],
        None => field,
    };
    stem.trim().to_string()
}

fn timestamp() -> String {
    chrono::Local::now().format("%c").to_string()
}

fn check_reserved(name: &str) -> Result<(), GeneIdError> {
    if name == SYMBOL_TABLE || name == INFO_TABLE || name.is_empty() {
        return Err(GeneIdError::ReservedName {
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Builds and extends a [`MappingStore`].
#[derive(Debug, Default)]
pub struct Builder {
    store: MappingStore,
    show_progress: bool,
}

impl Builder {
    /// Create a builder over an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder that extends an existing store.
    pub fn from_store(store: MappingStore) -> Self {
        Self {
            store,
            show_progress: false,
        }
    }

    /// Show a progress bar while building.
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// The store built so far.
    pub fn store(&self) -> &MappingStore {
        &self.store
    }

    /// Hand the store over, e.g. to a [`crate::translate::Translator`].
    pub fn into_store(self) -> MappingStore {
        self.store
    }

    /// Rebuild the store from a reference file.
    ///
    /// Replaces any previous content, including databases added with
    /// [`Builder::add_db`].
    pub fn build<P: AsRef<Path>>(
        &mut self,
        path: P,
        config: &BuildConfig,
    ) -> Result<BuildSummary, GeneIdError> {
        let path = path.as_ref();
        log::info!("Building mapping store from {}", path.display());
        let table = TsvTable::read(path, true)?;
        self.build_from_table(&table, config)
    }

    /// Rebuild the store from an already parsed reference table.
    pub fn build_from_table(
        &mut self,
        table: &TsvTable,
        config: &BuildConfig,
    ) -> Result<BuildSummary, GeneIdError> {
        let key_idx = table.column(&config.key_symbol)?;
        let alias_idx = table.column(&config.alias_field)?;
        let prev_idx = table.column(&config.prev_field)?;

        let mut field_idx = Vec::with_capacity(config.fields.len());
        for field in &config.fields {
            let name = safe_db_name(field);
            check_reserved(&name)?;
            field_idx.push((name, table.column(field)?));
        }

        // Synonyms never shadow a symbol that is official anywhere in the file.
        let canonical: HashSet<&str> = table
            .rows
            .iter()
            .map(|r| r.get(key_idx))
            .filter(|s| !s.is_empty())
            .collect();

        let mut symbol = SymbolTable::default();
        let mut databases: BTreeMap<String, TranslationTable> = field_idx
            .iter()
            .map(|(name, _)| (name.clone(), TranslationTable::default()))
            .collect();
        let mut summary = BuildSummary {
            rows: table.rows.len(),
            ..Default::default()
        };

        let pb = self.progress_bar(table.rows.len());
        for row in &table.rows {
            pb.inc(1);
            let official = row.get(key_idx);
            if official.is_empty() {
                log::warn!("{} line {}: empty symbol, row skipped", table.source, row.line);
                summary.skipped += 1;
                continue;
            }

            let synonyms: Vec<String> = split_cell(row.get(alias_idx), REFERENCE_SEPARATOR)
                .into_iter()
                .chain(split_cell(row.get(prev_idx), REFERENCE_SEPARATOR))
                .filter(|s| !s.is_empty())
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect();
            let registrable: Vec<&String> = synonyms
                .iter()
                .filter(|s| !canonical.contains(s.as_str()))
                .collect();

            for (name, idx) in &field_idx {
                let ids = split_cell(row.get(*idx), REFERENCE_SEPARATOR);
                if ids.is_empty() {
                    continue;
                }
                if let Some(db) = databases.get_mut(name) {
                    db.insert_record(official, &synonyms, registrable.iter().copied(), &ids);
                }
            }

            symbol
                .official
                .insert(official.to_string(), official.to_string());
            for s in &registrable {
                symbol.official.insert((*s).clone(), official.to_string());
            }
            symbol.synonyms.insert(official.to_string(), synonyms);
        }
        pb.finish_and_clear();

        summary.symbols = symbol.synonyms.len();
        summary.synonyms = symbol.official.len() - symbol.synonyms.len();
        summary.ids_per_db = databases
            .iter()
            .map(|(name, t)| (name.clone(), t.id_count()))
            .collect();

        let date = timestamp();
        let mut dbs = Vec::with_capacity(field_idx.len() + 1);
        dbs.push(config.key_symbol.clone());
        dbs.extend(field_idx.into_iter().map(|(name, _)| name));
        let info = StoreInfo {
            version: STORE_VERSION,
            log: vec![format!("Built from {} on {}", table.source, date)],
            date,
            dbs,
        };

        self.store = MappingStore::from_parts(info, symbol, databases);
        log::info!(
            "Built store: {} symbols, {} synonyms, {} databases",
            summary.symbols,
            summary.synonyms,
            summary.ids_per_db.len()
        );
        Ok(summary)
    }

    /// Add a custom database from a two-column file (symbol, comma-separated IDs).
    pub fn add_db<P: AsRef<Path>>(
        &mut self,
        path: P,
        name: &str,
    ) -> Result<AddDbSummary, GeneIdError> {
        self.add_db_with(path, name, &AddDbOptions::default())
    }

    /// Add a custom database with explicit options.
    pub fn add_db_with<P: AsRef<Path>>(
        &mut self,
        path: P,
        name: &str,
        options: &AddDbOptions,
    ) -> Result<AddDbSummary, GeneIdError> {
        let table = TsvTable::read(path, options.has_header)?;
        self.add_db_from_table(&table, name, options)
    }

    /// Add a custom database from an already parsed table.
    pub fn add_db_from_table(
        &mut self,
        table: &TsvTable,
        name: &str,
        options: &AddDbOptions,
    ) -> Result<AddDbSummary, GeneIdError> {
        check_reserved(name)?;
        let official_map = &self.store.symbol().official;
        let synonym_map = &self.store.symbol().synonyms;

        let mut db = TranslationTable::default();
        let mut summary = AddDbSummary {
            rows: table.rows.len(),
            ..Default::default()
        };

        for row in &table.rows {
            let symbol = row.get(0);
            let Some(official) = official_map.get(symbol) else {
                match options.on_unknown_symbol {
                    UnknownSymbolPolicy::Fail => {
                        return Err(GeneIdError::UnknownSymbol {
                            symbol: symbol.to_string(),
                            line: row.line,
                        });
                    }
                    UnknownSymbolPolicy::Skip => {
                        log::warn!(
                            "{} line {}: unknown symbol '{}', row skipped",
                            table.source,
                            row.line,
                            symbol
                        );
                        summary.skipped += 1;
                        continue;
                    }
                }
            };

            let ids: Vec<String> = split_cell(row.get(1), options.id_separator)
                .into_iter()
                .map(|id| id.trim().to_string())
                .filter(|id| !id.is_empty())
                .collect();
            if ids.is_empty() {
                continue;
            }

            let synonyms = synonym_map.get(official).map(Vec::as_slice).unwrap_or(&[]);
            let registrable = synonyms
                .iter()
                .filter(|s| official_map.get(s.as_str()) == Some(official));
            db.insert_record(official, synonyms, registrable, &ids);
        }
        summary.ids = db.id_count();

        let replaced = self.store.has_database(name);
        self.store.insert_database(name, db);
        let info = self.store.info_mut();
        let verb = if replaced { "Replaced" } else { "Added" };
        info.log.push(format!("{} {} on {}", verb, name, timestamp()));
        if !info.dbs.iter().any(|d| d == name) {
            info.dbs.push(name.to_string());
        }

        log::info!(
            "{} database '{}' ({} IDs, {} rows skipped)",
            verb,
            name,
            summary.ids,
            summary.skipped
        );
        Ok(summary)
    }

    /// Persist the store.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), GeneIdError> {
        self.store.save(path)
    }

    fn progress_bar(&self, len: usize) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new(len as u64);
        if let Ok(style) =
            ProgressStyle::default_bar().template("[{elapsed_precise}] {bar:40} {pos}/{len} rows")
        {
            pb.set_style(style);
        }
        pb
    }
}
