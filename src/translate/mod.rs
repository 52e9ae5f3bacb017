//! Gene identifier translation.
//!
//! [`Translator`] answers lookups between official symbols, synonyms and
//! external database IDs over a read-only [`MappingStore`].
//!
//! # Example
//!
//! ```
//! use ferro_geneid::builder::{BuildConfig, Builder, TsvTable};
//! use ferro_geneid::translate::{Resolved, TranslateOptions, Translation, Translator};
//!
//! let hgnc = "symbol\talias_symbol\tprev_symbol\tensembl_gene_id\tentrez_id\thgnc_id\n\
//!             MYC\tc-Myc\tbHLHe39\tENSG00000136997\t4609\tHGNC:7553\n";
//! let table = TsvTable::from_reader(hgnc.as_bytes(), "hgnc", true).unwrap();
//! let mut builder = Builder::new();
//! builder.build_from_table(&table, &BuildConfig::default()).unwrap();
//!
//! let g = Translator::new(builder.into_store());
//! assert_eq!(
//!     g.symbol_to_entrez("c-Myc").unwrap(),
//!     Resolved::Single(Translation::One("4609".into()))
//! );
//! assert_eq!(
//!     g.official_symbol(["bHLHe39", "NOPE"]).unwrap(),
//!     Resolved::Batch(vec![Translation::One("MYC".into()), Translation::Missing(None)])
//! );
//! ```
//!
//! # Concurrency
//!
//! Lookups take `&self` and never mutate the store, so a `Translator` can be
//! shared across threads. Changing the missing-value default needs `&mut self`;
//! use [`TranslateOptions::null_id`] for a per-call default instead.

pub mod query;

use crate::error::GeneIdError;
use crate::store::{
    default_store_path, Field, KnownDatabase, MappingStore, StoreInfo, Stored, Table,
};
use rand::Rng;
use std::collections::HashSet;
use std::path::Path;

pub use query::{Ids, Resolved, TranslateOptions, Translation};

/// Query engine over a [`MappingStore`].
#[derive(Debug, Clone, Default)]
pub struct Translator {
    store: MappingStore,
    default_null_id: Option<String>,
}

impl Translator {
    /// Create a translator over a store.
    pub fn new(store: MappingStore) -> Self {
        Self {
            store,
            default_null_id: None,
        }
    }

    /// Create a translator over an empty store.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load a persisted store.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, GeneIdError> {
        Ok(Self::new(MappingStore::load(path)?))
    }

    /// Load `$FERRO_GENEID_STORE` if set, otherwise the bundled store.
    pub fn open_default() -> Result<Self, GeneIdError> {
        Ok(Self::new(MappingStore::load_or_bundled(default_store_path())?))
    }

    /// Construct from optional store path and "start empty" flag.
    pub fn from_source<P: AsRef<Path>>(
        path: Option<P>,
        init_empty: bool,
    ) -> Result<Self, GeneIdError> {
        match (init_empty, path) {
            (true, _) => Ok(Self::empty()),
            (false, Some(p)) => Self::open(p),
            (false, None) => Self::open_default(),
        }
    }

    /// The underlying store.
    pub fn store(&self) -> &MappingStore {
        &self.store
    }

    /// Replace the store wholesale, e.g. after adding a database.
    pub fn set_store(&mut self, store: MappingStore) {
        self.store = store;
    }

    /// Take the store back, e.g. to extend it with a builder.
    pub fn into_store(self) -> MappingStore {
        self.store
    }

    /// Value returned for identifiers that cannot be resolved.
    pub fn default_null_id(&self) -> Option<&str> {
        self.default_null_id.as_deref()
    }

    /// Set the value returned for identifiers that cannot be resolved.
    pub fn set_default_null_id(&mut self, null_id: impl Into<String>) {
        self.default_null_id = Some(null_id.into());
    }

    /// Return misses as [`Translation::Missing(None)`](Translation::Missing) again.
    pub fn clear_default_null_id(&mut self) {
        self.default_null_id = None;
    }

    /// Store metadata.
    pub fn get_info(&self) -> &StoreInfo {
        self.store.info()
    }

    /// Resolve identifiers against any table.
    ///
    /// `options.select_one` defaults to `false`; `options.all_synonyms` is ignored.
    pub fn resolve(
        &self,
        ids: impl Into<Ids>,
        table: Table<'_>,
        options: &TranslateOptions,
    ) -> Result<Resolved, GeneIdError> {
        self.lookup(
            &ids.into(),
            table,
            options.select_one.unwrap_or(false),
            options,
        )
    }

    /// Translate external IDs of `db` to official symbols.
    ///
    /// With `all_synonyms` each result lists the official symbol followed by
    /// its synonyms. With preferred IDs, synonyms in the preferred list are
    /// returned instead of the official symbol where available.
    pub fn id_to_symbol(
        &self,
        ids: impl Into<Ids>,
        db: &str,
        options: &TranslateOptions,
    ) -> Result<Resolved, GeneIdError> {
        let ids = ids.into();
        if options.all_synonyms || !options.preferred_ids.is_empty() {
            self.lookup(
                &ids,
                Table::external(db, Field::IdToAllSymbols),
                !options.all_synonyms,
                options,
            )
        } else {
            self.lookup(&ids, Table::external(db, Field::IdToSymbol), true, options)
        }
    }

    /// Translate symbols or synonyms to IDs of `db`.
    ///
    /// `options.select_one` defaults to `true`.
    pub fn symbol_to_id(
        &self,
        ids: impl Into<Ids>,
        db: &str,
        options: &TranslateOptions,
    ) -> Result<Resolved, GeneIdError> {
        self.lookup(
            &ids.into(),
            Table::external(db, Field::SymbolToId),
            options.select_one.unwrap_or(true),
            options,
        )
    }

    /// Translate IDs of `db1` to IDs of `db2` through the official symbol.
    ///
    /// `options` apply to the second hop; `options.select_one` defaults to `false`.
    pub fn cross_id(
        &self,
        ids: impl Into<Ids>,
        db1: &str,
        db2: &str,
        options: &TranslateOptions,
    ) -> Result<Resolved, GeneIdError> {
        let symbols = self.id_to_symbol(ids, db1, &TranslateOptions::default())?;
        self.lookup(
            &Ids::from(&symbols),
            Table::external(db2, Field::SymbolToId),
            options.select_one.unwrap_or(false),
            options,
        )
    }

    /// Official symbol of each symbol or synonym.
    pub fn official_symbol(&self, ids: impl Into<Ids>) -> Result<Resolved, GeneIdError> {
        self.lookup(&ids.into(), Table::Official, true, &TranslateOptions::default())
    }

    /// Synonyms of each official symbol.
    pub fn synonyms(&self, ids: impl Into<Ids>) -> Result<Resolved, GeneIdError> {
        self.lookup(&ids.into(), Table::Synonyms, false, &TranslateOptions::default())
    }

    pub fn ensembl_gene_to_symbol(
        &self,
        ids: impl Into<Ids>,
        options: &TranslateOptions,
    ) -> Result<Resolved, GeneIdError> {
        self.id_to_symbol(ids, KnownDatabase::EnsemblGene.as_str(), options)
    }

    pub fn symbol_to_ensembl_gene(&self, ids: impl Into<Ids>) -> Result<Resolved, GeneIdError> {
        self.symbol_to_id(
            ids,
            KnownDatabase::EnsemblGene.as_str(),
            &TranslateOptions::default(),
        )
    }

    pub fn entrez_to_symbol(
        &self,
        ids: impl Into<Ids>,
        options: &TranslateOptions,
    ) -> Result<Resolved, GeneIdError> {
        self.id_to_symbol(ids, KnownDatabase::Entrez.as_str(), options)
    }

    pub fn symbol_to_entrez(&self, ids: impl Into<Ids>) -> Result<Resolved, GeneIdError> {
        self.symbol_to_id(
            ids,
            KnownDatabase::Entrez.as_str(),
            &TranslateOptions::default(),
        )
    }

    pub fn uniprot_to_symbol(
        &self,
        ids: impl Into<Ids>,
        options: &TranslateOptions,
    ) -> Result<Resolved, GeneIdError> {
        self.id_to_symbol(ids, KnownDatabase::Uniprot.as_str(), options)
    }

    /// Symbols to UniProt accessions; keeps every accession of a gene.
    pub fn symbol_to_uniprot(&self, ids: impl Into<Ids>) -> Result<Resolved, GeneIdError> {
        self.symbol_to_id(
            ids,
            KnownDatabase::Uniprot.as_str(),
            &TranslateOptions::default().select_one(false),
        )
    }

    pub fn hgnc_to_symbol(
        &self,
        ids: impl Into<Ids>,
        options: &TranslateOptions,
    ) -> Result<Resolved, GeneIdError> {
        self.id_to_symbol(ids, KnownDatabase::Hgnc.as_str(), options)
    }

    pub fn symbol_to_hgnc(&self, ids: impl Into<Ids>) -> Result<Resolved, GeneIdError> {
        self.symbol_to_id(ids, KnownDatabase::Hgnc.as_str(), &TranslateOptions::default())
    }

    /// `n` official symbols drawn uniformly with replacement.
    ///
    /// Each distinct official symbol is equally likely. Sampling over every
    /// synonym entry instead would weight genes by how many synonyms they have.
    pub fn random_symbols(&self, n: usize) -> Vec<String> {
        self.random_symbols_with_rng(n, &mut rand::thread_rng())
    }

    /// [`Translator::random_symbols`] with a caller-supplied RNG.
    pub fn random_symbols_with_rng<R: Rng>(&self, n: usize, rng: &mut R) -> Vec<String> {
        let symbols: Vec<&str> = self.store.official_symbols().collect();
        if symbols.is_empty() {
            return Vec::new();
        }
        (0..n)
            .map(|_| symbols[rng.gen_range(0..symbols.len())].to_string())
            .collect()
    }

    fn lookup(
        &self,
        ids: &Ids,
        table: Table<'_>,
        select_one: bool,
        options: &TranslateOptions,
    ) -> Result<Resolved, GeneIdError> {
        let table = self.store.table(table)?;
        let null_id = options.null_id.as_ref().or(self.default_null_id.as_ref()).cloned();
        let preferred: HashSet<&str> = options.preferred_ids.iter().map(String::as_str).collect();

        let results = ids
            .iter()
            .map(|id| {
                let found = id.and_then(|id| table.get(id));
                let t = match found {
                    None => Translation::Missing(null_id.clone()),
                    Some(stored) if preferred.is_empty() => stored.into(),
                    Some(Stored::Scalar(s)) => Translation::One(s.to_string()),
                    Some(Stored::List(values)) => prefer(values, &preferred, &null_id),
                };
                if select_one {
                    t.select_first(&null_id)
                } else {
                    t
                }
            })
            .collect();
        Ok(Resolved::from_results(results))
    }
}

/// Keep the preferred candidates, else fall back to the first stored one.
fn prefer(values: &[String], preferred: &HashSet<&str>, null_id: &Option<String>) -> Translation {
    let matches: Vec<String> = values
        .iter()
        .filter(|v| preferred.contains(v.as_str()))
        .cloned()
        .collect();
    if !matches.is_empty() {
        return Translation::Many(matches);
    }
    match values.first() {
        Some(first) => Translation::One(first.clone()),
        None => Translation::Missing(null_id.clone()),
    }
}

impl From<Stored<'_>> for Translation {
    fn from(stored: Stored<'_>) -> Self {
        match stored {
            Stored::Scalar(s) => Translation::One(s.to_string()),
            Stored::List(v) => Translation::Many(v.to_vec()),
        }
    }
}
