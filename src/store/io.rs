//! Persistence for [`MappingStore`].
//!
//! Stores are serialized as JSON. Paths ending in `.gz` are read and written
//! through gzip.

use super::MappingStore;
use crate::error::GeneIdError;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

/// Environment variable overriding the bundled store location.
pub const STORE_PATH_ENV: &str = "FERRO_GENEID_STORE";

/// Store compiled into the binary, built from `demos/hgnc_demo.tsv`.
const BUNDLED_STORE: &str = include_str!("../../resources/master.json");

/// `$FERRO_GENEID_STORE` if set; `None` selects the bundled store.
pub fn default_store_path() -> Option<PathBuf> {
    match std::env::var_os(STORE_PATH_ENV) {
        Some(p) if !p.is_empty() => Some(PathBuf::from(p)),
        _ => None,
    }
}

fn is_gzip(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "gz")
}

impl MappingStore {
    /// Load a store from a JSON (or `.json.gz`) file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, GeneIdError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| GeneIdError::Io {
            msg: format!("Failed to open store {}: {}", path.display(), e),
        })?;
        let reader = BufReader::new(file);
        let store = if is_gzip(path) {
            Self::from_reader(GzDecoder::new(reader))?
        } else {
            Self::from_reader(reader)?
        };
        log::debug!(
            "Loaded store {} ({} symbols, {} databases)",
            path.display(),
            store.symbol().official.len(),
            store.database_names().count()
        );
        Ok(store)
    }

    /// The store compiled into the binary.
    pub fn bundled() -> Result<Self, GeneIdError> {
        Self::from_reader(BUNDLED_STORE.as_bytes())
    }

    /// Load `path`, or the bundled store when no path is given.
    pub fn load_or_bundled<P: AsRef<Path>>(path: Option<P>) -> Result<Self, GeneIdError> {
        match path {
            Some(path) => Self::load(path),
            None => {
                log::info!("Using bundled store");
                Self::bundled()
            }
        }
    }

    /// Deserialize a store from any JSON reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, GeneIdError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Save the store to a JSON (or `.json.gz`) file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), GeneIdError> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| GeneIdError::Io {
            msg: format!("Failed to create store {}: {}", path.display(), e),
        })?;
        let writer = BufWriter::new(file);
        if is_gzip(path) {
            let mut encoder = GzEncoder::new(writer, Compression::default());
            self.to_writer(&mut encoder)?;
            encoder.finish()?.flush()?;
        } else {
            let mut writer = writer;
            self.to_writer(&mut writer)?;
            writer.flush()?;
        }
        log::debug!("Saved store to {}", path.display());
        Ok(())
    }

    /// Serialize the store to any writer.
    pub fn to_writer<W: Write>(&self, writer: W) -> Result<(), GeneIdError> {
        Ok(serde_json::to_writer(writer, self)?)
    }
}
