use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Directory holding the pipeline data files.
pub const DATA_DIR: &str = "data";

/// File name of the raw notice records, as downloaded.
pub const RAW_DATA_FILE: &str = "raw_tenders.json";

/// File name of the notice records after cleaning and tokenization.
pub const PROCESSED_DATA_FILE: &str = "processed_tenders.json";

/// Path of the raw notice file inside the data directory.
pub fn raw_data_path() -> PathBuf {
	Path::new(DATA_DIR).join(RAW_DATA_FILE)
}

/// Path of the processed notice file inside the data directory.
pub fn processed_data_path() -> PathBuf {
	Path::new(DATA_DIR).join(PROCESSED_DATA_FILE)
}

/// Reads a JSON array file and deserializes its records.
///
/// - Reads the entire file into memory
/// - Decoding errors are reported as `InvalidData`
pub fn load_records<T, P>(path: P) -> io::Result<Vec<T>>
where
	T: DeserializeOwned,
	P: AsRef<Path>,
{
	let mut contents = String::new();
	File::open(path)?.read_to_string(&mut contents)?;
	serde_json::from_str(&contents).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Serializes records to a pretty-printed JSON array.
///
/// Creates the parent directory if it does not exist yet.
pub fn save_records<T, P>(path: P, records: &[T]) -> io::Result<()>
where
	T: Serialize,
	P: AsRef<Path>,
{
	let path = path.as_ref();
	if let Some(parent) = path.parent() {
		fs::create_dir_all(parent)?;
	}
	let contents = serde_json::to_string_pretty(records)
		.map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
	fs::write(path, contents)
}
