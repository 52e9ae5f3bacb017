//! Mapping store: the translation tables behind every lookup.
//!
//! A store holds three kinds of tables:
//! - `info`: metadata (schema version, build date, registered databases, event log)
//! - `symbol`: official-symbol resolution and the synonym list of each official symbol
//! - one [`TranslationTable`] per external database (e.g. `ensembl_gene`, `entrez`)
//!
//! Stores are written by [`crate::builder::Builder`] and read by
//! [`crate::translate::Translator`]. Tables are addressed with the typed
//! [`Table`] enum rather than free-form strings; a database name that is not
//! registered is a [`GeneIdError::UnknownDatabase`].

pub mod io;

use crate::error::GeneIdError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

pub use io::{default_store_path, STORE_PATH_ENV};

/// Name of the built-in symbol table.
pub const SYMBOL_TABLE: &str = "symbol";

/// Name of the built-in metadata record.
pub const INFO_TABLE: &str = "info";

/// Schema version written into newly built stores.
pub const STORE_VERSION: f64 = 0.1;

/// External databases with dedicated translator shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnownDatabase {
    /// Ensembl gene IDs (`ENSG...`)
    EnsemblGene,
    /// NCBI Entrez gene IDs
    Entrez,
    /// UniProt accessions
    Uniprot,
    /// HGNC IDs (`HGNC:...`)
    Hgnc,
}

impl KnownDatabase {
    /// Database name as registered by the builder.
    pub fn as_str(&self) -> &'static str {
        match self {
            KnownDatabase::EnsemblGene => "ensembl_gene",
            KnownDatabase::Entrez => "entrez",
            KnownDatabase::Uniprot => "uniprot",
            KnownDatabase::Hgnc => "hgnc",
        }
    }
}

impl fmt::Display for KnownDatabase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Store metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreInfo {
    /// Schema version
    pub version: f64,
    /// Creation timestamp (local time, `%c` format)
    pub date: String,
    /// Key-symbol column followed by every registered database, in registration order
    pub dbs: Vec<String>,
    /// Append-only log of build/add events
    pub log: Vec<String>,
}

impl Default for StoreInfo {
    fn default() -> Self {
        Self {
            version: STORE_VERSION,
            date: String::new(),
            dbs: Vec::new(),
            log: Vec::new(),
        }
    }
}

/// Canonical-symbol table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SymbolTable {
    /// Any known symbol or synonym -> official symbol (official symbols map to themselves)
    pub official: BTreeMap<String, String>,
    /// Official symbol -> sorted, deduplicated synonyms
    pub synonyms: BTreeMap<String, Vec<String>>,
}

/// Translation tables for one external database.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TranslationTable {
    /// External ID -> official symbol
    pub id_to_symbol: BTreeMap<String, String>,
    /// External ID -> official symbol followed by its synonyms
    pub id_to_all_symbols: BTreeMap<String, Vec<String>>,
    /// Symbol or synonym -> external IDs, in source order
    pub symbol_to_id: BTreeMap<String, Vec<String>>,
}

impl TranslationTable {
    /// Record `ids` for an official symbol and the synonyms that resolve to it.
    pub(crate) fn insert_record<'a>(
        &mut self,
        official: &str,
        synonyms: &[String],
        registrable: impl IntoIterator<Item = &'a String>,
        ids: &[String],
    ) {
        let mut all_symbols = Vec::with_capacity(synonyms.len() + 1);
        all_symbols.push(official.to_string());
        all_symbols.extend(synonyms.iter().cloned());

        for id in ids {
            self.id_to_symbol.insert(id.clone(), official.to_string());
            self.id_to_all_symbols
                .insert(id.clone(), all_symbols.clone());
        }
        self.symbol_to_id
            .insert(official.to_string(), ids.to_vec());
        for s in registrable {
            self.symbol_to_id.insert(s.clone(), ids.to_vec());
        }
    }

    /// Number of external IDs in this table.
    pub fn id_count(&self) -> usize {
        self.id_to_symbol.len()
    }
}

/// One of the three sub-mappings of a [`TranslationTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// External ID -> official symbol
    IdToSymbol,
    /// External ID -> official symbol and synonyms
    IdToAllSymbols,
    /// Symbol -> external IDs
    SymbolToId,
}

impl Field {
    /// Serialized name of this field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::IdToSymbol => "id_to_symbol",
            Field::IdToAllSymbols => "id_to_all_symbols",
            Field::SymbolToId => "symbol_to_id",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = GeneIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "id_to_symbol" => Ok(Field::IdToSymbol),
            "id_to_all_symbols" => Ok(Field::IdToAllSymbols),
            "symbol_to_id" => Ok(Field::SymbolToId),
            other => Err(GeneIdError::UnknownDatabase {
                name: other.to_string(),
            }),
        }
    }
}

/// Typed address of a lookup table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table<'a> {
    /// `symbol.official`
    Official,
    /// `symbol.synonyms`
    Synonyms,
    /// A sub-mapping of a registered external database
    External { db: &'a str, field: Field },
}

impl<'a> Table<'a> {
    /// Address a field of an external database.
    pub fn external(db: &'a str, field: Field) -> Self {
        Table::External { db, field }
    }

    /// Parse a `(table, field)` pair such as `("symbol", "official")` or
    /// `("entrez", "symbol_to_id")`.
    pub fn parse(db: &'a str, field: &str) -> Result<Self, GeneIdError> {
        match (db, field) {
            (SYMBOL_TABLE, "official") => Ok(Table::Official),
            (SYMBOL_TABLE, "synonyms") => Ok(Table::Synonyms),
            (SYMBOL_TABLE, other) => Err(GeneIdError::UnknownDatabase {
                name: format!("{}.{}", SYMBOL_TABLE, other),
            }),
            (db, field) => Ok(Table::External {
                db,
                field: field.parse()?,
            }),
        }
    }
}

/// A stored value borrowed from the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stored<'a> {
    /// Single value (`official`, `id_to_symbol`)
    Scalar(&'a str),
    /// Ordered values (`synonyms`, `id_to_all_symbols`, `symbol_to_id`)
    List(&'a [String]),
}

/// A resolved table, ready for repeated lookups.
#[derive(Debug, Clone, Copy)]
pub enum TableRef<'a> {
    /// Table of single values
    Scalar(&'a BTreeMap<String, String>),
    /// Table of ordered values
    List(&'a BTreeMap<String, Vec<String>>),
}

impl<'a> TableRef<'a> {
    /// Look up a key.
    pub fn get(&self, key: &str) -> Option<Stored<'a>> {
        match self {
            TableRef::Scalar(map) => map.get(key).map(|v| Stored::Scalar(v.as_str())),
            TableRef::List(map) => map.get(key).map(|v| Stored::List(v.as_slice())),
        }
    }

    /// Number of keys in the table.
    pub fn len(&self) -> usize {
        match self {
            TableRef::Scalar(map) => map.len(),
            TableRef::List(map) => map.len(),
        }
    }

    /// Whether the table has no keys.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The complete mapping database.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MappingStore {
    info: StoreInfo,
    symbol: SymbolTable,
    #[serde(default)]
    databases: BTreeMap<String, TranslationTable>,
}

impl MappingStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store metadata.
    pub fn info(&self) -> &StoreInfo {
        &self.info
    }

    /// The canonical-symbol table.
    pub fn symbol(&self) -> &SymbolTable {
        &self.symbol
    }

    /// Translation tables of a registered database.
    pub fn database(&self, name: &str) -> Result<&TranslationTable, GeneIdError> {
        self.databases
            .get(name)
            .ok_or_else(|| GeneIdError::UnknownDatabase {
                name: name.to_string(),
            })
    }

    /// Whether `name` is a registered database.
    pub fn has_database(&self, name: &str) -> bool {
        self.databases.contains_key(name)
    }

    /// Names of all databases that have translation tables, sorted.
    pub fn database_names(&self) -> impl Iterator<Item = &str> {
        self.databases.keys().map(String::as_str)
    }

    /// All official symbols, each listed once, sorted.
    pub fn official_symbols(&self) -> impl Iterator<Item = &str> {
        self.symbol.synonyms.keys().map(String::as_str)
    }

    /// Whether the store holds no symbols.
    pub fn is_empty(&self) -> bool {
        self.symbol.official.is_empty()
    }

    /// Resolve a typed table address.
    pub fn table<'a>(&'a self, table: Table<'_>) -> Result<TableRef<'a>, GeneIdError> {
        Ok(match table {
            Table::Official => TableRef::Scalar(&self.symbol.official),
            Table::Synonyms => TableRef::List(&self.symbol.synonyms),
            Table::External { db, field } => {
                let t = self.database(db)?;
                match field {
                    Field::IdToSymbol => TableRef::Scalar(&t.id_to_symbol),
                    Field::IdToAllSymbols => TableRef::List(&t.id_to_all_symbols),
                    Field::SymbolToId => TableRef::List(&t.symbol_to_id),
                }
            }
        })
    }

    /// Look up a single key in a table.
    pub fn get<'a>(&'a self, table: Table<'_>, key: &str) -> Result<Option<Stored<'a>>, GeneIdError> {
        Ok(self.table(table)?.get(key))
    }

    pub(crate) fn info_mut(&mut self) -> &mut StoreInfo {
        &mut self.info
    }

    pub(crate) fn insert_database(&mut self, name: impl Into<String>, table: TranslationTable) {
        self.databases.insert(name.into(), table);
    }

    pub(crate) fn from_parts(
        info: StoreInfo,
        symbol: SymbolTable,
        databases: BTreeMap<String, TranslationTable>,
    ) -> Self {
        Self {
            info,
            symbol,
            databases,
        }
    }
}
