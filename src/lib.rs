// Copyright (c) 2024-2025 Fulcrum Genomics LLC
// SPDX-License-Identifier: MIT

//! ferro-geneid: offline gene identifier translation
//!
//! Part of the ferro bioinformatics toolkit.
//!
//! A persisted [`MappingStore`] maps official HGNC symbols, their synonyms
//! and external identifiers (Ensembl gene, Entrez, UniProt, HGNC, or any
//! user-registered database) onto each other. [`Builder`] creates stores from
//! tab-separated reference files; [`Translator`] answers lookups.
//!
//! # Example
//!
//! ```
//! use ferro_geneid::{Builder, BuildConfig, TranslateOptions, Translation, Translator};
//! use ferro_geneid::builder::tsv::TsvTable;
//! use std::io::Cursor;
//!
//! let tsv = "symbol\talias_symbol\tprev_symbol\tentrez_id\n\
//!            MYC\tc-Myc|bHLHe39\t\t4609\n";
//! let table = TsvTable::from_reader(Cursor::new(tsv), "hgnc.tsv", true).unwrap();
//!
//! let config = BuildConfig::default().with_fields(["entrez_id"]);
//! let mut builder = Builder::new();
//! builder.build_from_table(&table, &config).unwrap();
//!
//! let translator = Translator::new(builder.into_store());
//! let symbol = translator.entrez_to_symbol("4609", &TranslateOptions::new()).unwrap();
//! assert_eq!(symbol.as_single(), Some(&Translation::One("MYC".to_string())));
//! ```

pub mod builder;
pub mod cli;
pub mod config;
pub mod error;
pub mod store;
pub mod translate;

// Re-export commonly used types
pub use builder::{BuildConfig, Builder};
pub use config::GeneIdConfig;
pub use error::GeneIdError;
pub use store::{MappingStore, StoreInfo};
pub use translate::{Ids, Resolved, TranslateOptions, Translation, Translator};

/// Result type alias for ferro-geneid operations
pub type Result<T> = std::result::Result<T, GeneIdError>;
