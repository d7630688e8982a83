use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::error::{NnError, Result};
use crate::network::params::Parameters;
use crate::persist::record::ModelRecord;

pub const DEFAULT_MODEL_PATH: &str = "models/model.json";

/// A single model record stored as pretty-printed JSON at a fixed path.
#[derive(Debug, Clone)]
pub struct ModelStore {
    path: PathBuf,
}

impl Default for ModelStore {
    fn default() -> Self {
        ModelStore::new(DEFAULT_MODEL_PATH)
    }
}

impl ModelStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        ModelStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Writes `record`, replacing whatever was stored before.
    ///
    /// The JSON goes to a sibling `.tmp` file first and is renamed into place,
    /// so readers never observe a half-written record.
    pub fn save(&self, record: &ModelRecord) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp = self.tmp_path();
        {
            let file = File::create(&tmp)?;
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, record)?;
            writer.flush()?;
        }
        fs::rename(&tmp, &self.path)?;

        log::info!("saved model record to {}", self.path.display());
        Ok(())
    }

    /// Reads the stored record. `Ok(None)` when nothing has been saved yet.
    pub fn load(&self) -> Result<Option<ModelRecord>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let reader = BufReader::new(file);

        match serde_json::from_reader(reader) {
            Ok(record) => Ok(Some(record)),
            Err(e) if e.is_io() => Err(e.into()),
            Err(e) => Err(self.corrupt(e.to_string())),
        }
    }

    pub fn save_parameters(&self, params: &Parameters) -> Result<()> {
        self.save(&ModelRecord::from(params))
    }

    /// Reads and validates the stored parameters. Nothing is returned unless
    /// the whole record is usable.
    pub fn load_parameters(&self) -> Result<Option<Parameters>> {
        match self.load()? {
            None => Ok(None),
            Some(record) => record
                .into_parameters()
                .map(Some)
                .map_err(|reason| self.corrupt(reason)),
        }
    }

    pub(crate) fn corrupt(&self, reason: impl Into<String>) -> NnError {
        NnError::PersistenceCorrupt {
            path: self.path.clone(),
            reason: reason.into(),
        }
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }
}
