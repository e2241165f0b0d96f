use std::{fmt, fs, io, path::Path};
use serde::{Serialize, de::DeserializeOwned};

pub mod grid_format;


// ----------------------------------------------
// SaveError
// ----------------------------------------------

#[derive(Debug)]
pub enum SaveError {
    Io(io::Error),
    Format(String),
}

pub type SaveResult<T> = Result<T, SaveError>;

impl fmt::Display for SaveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::Format(msg) => write!(f, "malformed document: {msg}"),
        }
    }
}

impl std::error::Error for SaveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Format(_) => None,
        }
    }
}

impl From<io::Error> for SaveError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

// ----------------------------------------------
// SaveState
// ----------------------------------------------

// Serde document codec. Implementors only supply `encode`/`decode`;
// the file helpers are shared.
pub trait SaveState {
    fn encode<T>(&self, instance: &T) -> Result<Vec<u8>, String>
        where T: Serialize;

    fn decode<T>(&self, bytes: &[u8]) -> Result<T, String>
        where T: DeserializeOwned;

    fn write_file<T>(&self, path: &Path, instance: &T) -> SaveResult<()>
        where T: Serialize
    {
        let bytes = self.encode(instance).map_err(SaveError::Format)?;
        fs::write(path, bytes)?;
        Ok(())
    }

    fn read_file<T>(&self, path: &Path) -> SaveResult<T>
        where T: DeserializeOwned
    {
        let bytes = fs::read(path)?;
        self.decode(&bytes).map_err(SaveError::Format)
    }
}

// ----------------------------------------------
// JsonSaveState
// ----------------------------------------------

#[derive(Copy, Clone, Debug, Default)]
pub struct JsonSaveState {
    pretty: bool,
}

impl JsonSaveState {
    // Single line output, for files nobody edits by hand.
    #[inline]
    pub const fn compact() -> Self {
        Self { pretty: false }
    }

    #[inline]
    pub const fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl SaveState for JsonSaveState {
    fn encode<T>(&self, instance: &T) -> Result<Vec<u8>, String>
        where T: Serialize
    {
        let result = if self.pretty {
            serde_json::to_vec_pretty(instance)
        } else {
            serde_json::to_vec(instance)
        };
        result.map_err(|err| err.to_string())
    }

    fn decode<T>(&self, bytes: &[u8]) -> Result<T, String>
        where T: DeserializeOwned
    {
        if bytes.is_empty() {
            return Err("empty document".into());
        }
        serde_json::from_slice(bytes).map_err(|err| err.to_string())
    }
}
