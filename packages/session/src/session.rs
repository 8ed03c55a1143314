//! Per-channel dataset slot.

use std::path::Path;
use std::sync::Arc;

use crime_stats_incident_models::{Dataset, DatasetSource};
use crime_stats_normalizer::encoding::decode_text;
use crime_stats_normalizer::fixed_width::parse_fixed_width_text;
use crime_stats_normalizer::load_csv_bytes;
use strum_macros::{AsRefStr, Display};

use crate::{SessionConfig, SessionError};

/// Where the dataset behind a query came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
pub enum DataOrigin {
    /// A user upload.
    #[strum(serialize = "上傳的資料")]
    Uploaded,
    /// The local default file.
    #[strum(serialize = "預設資料")]
    Default,
}

/// The dataset a query should run against.
#[derive(Debug, Clone)]
pub struct ActiveDataset {
    /// Upload or default file.
    pub origin: DataOrigin,
    /// The records.
    pub dataset: Arc<Dataset>,
}

/// Holds the current upload, if any.
///
/// Uploaded datasets are immutable once stored; a new upload swaps the whole
/// [`Arc`], so readers holding the previous one are unaffected.
#[derive(Debug, Default)]
pub struct DatasetSession {
    config: SessionConfig,
    uploaded: Option<Arc<Dataset>>,
}

impl DatasetSession {
    /// Creates a session with no upload.
    #[must_use]
    pub const fn new(config: SessionConfig) -> Self {
        Self {
            config,
            uploaded: None,
        }
    }

    /// The session's configuration.
    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Loads the fixed-width default file from the first configured path
    /// that exists. If none exists the result is an empty dataset.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read, decoded, or
    /// yields no valid line.
    pub fn load_default(&self) -> Result<Dataset, SessionError> {
        let Some(path) = self
            .config
            .default_data_paths
            .iter()
            .find(|p| p.is_file())
        else {
            log::warn!(
                "No default data file found in {:?}; starting with an empty dataset",
                self.config.default_data_paths
            );
            return Ok(Dataset::empty());
        };

        load_fixed_width_file(path)
    }

    /// Normalizes an uploaded CSV and makes it the session's dataset.
    ///
    /// On failure the previous upload, if any, stays in place.
    ///
    /// # Errors
    ///
    /// * [`SessionError::UnsupportedFileType`] if the name has no allowed
    ///   extension.
    /// * [`SessionError::UploadTooLarge`] if the bytes exceed the limit.
    /// * [`SessionError::Normalize`] if the contents cannot be normalized.
    pub fn upload(&mut self, file_name: &str, bytes: &[u8]) -> Result<Arc<Dataset>, SessionError> {
        if !self.config.is_allowed_file(file_name) {
            return Err(SessionError::UnsupportedFileType {
                file_name: file_name.to_string(),
            });
        }

        let size = bytes.len() as u64;
        if size > self.config.max_upload_bytes() {
            return Err(SessionError::UploadTooLarge {
                size,
                max_mb: self.config.max_upload_mb,
            });
        }

        let loaded = load_csv_bytes(bytes)?;

        let dataset = Arc::new(Dataset {
            source: DatasetSource::Upload {
                file_name: file_name.to_string(),
                encoding: loaded.encoding.to_string(),
            },
            records: loaded.records,
            dropped_rows: loaded.dropped_rows,
        });

        log::info!(
            "Upload '{file_name}' replaced session dataset: {} records ({} dropped, {}, {})",
            dataset.len(),
            dataset.dropped_rows,
            loaded.encoding,
            loaded.date_strategy,
        );

        self.uploaded = Some(Arc::clone(&dataset));
        Ok(dataset)
    }

    /// Drops the upload. Returns `true` if there was one.
    pub fn clear(&mut self) -> bool {
        let had_upload = self.uploaded.take().is_some();
        if had_upload {
            log::info!("Cleared uploaded dataset");
        }
        had_upload
    }

    /// The current upload, if any.
    #[must_use]
    pub fn current(&self) -> Option<Arc<Dataset>> {
        self.uploaded.clone()
    }

    /// The upload if present, otherwise the default file.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no upload and the default file fails
    /// to load.
    pub fn active_or_default(&self) -> Result<ActiveDataset, SessionError> {
        if let Some(dataset) = self.current() {
            return Ok(ActiveDataset {
                origin: DataOrigin::Uploaded,
                dataset,
            });
        }

        Ok(ActiveDataset {
            origin: DataOrigin::Default,
            dataset: Arc::new(self.load_default()?),
        })
    }
}

/// Reads, decodes and parses a fixed-width incident file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or decoded, or has no valid
/// data line.
pub fn load_fixed_width_file(path: &Path) -> Result<Dataset, SessionError> {
    let bytes = std::fs::read(path)?;
    let decoded = decode_text(&bytes)?;
    log::info!(
        "Decoded default file {} as {}",
        path.display(),
        decoded.encoding
    );

    let load = parse_fixed_width_text(&decoded.text)?;

    Ok(Dataset {
        source: DatasetSource::DefaultFile {
            path: path.display().to_string(),
        },
        records: load.records,
        dropped_rows: load.dropped_rows,
    })
}

#[cfg(test)]
mod tests {
    use crime_stats_normalizer::NormalizeError;

    use super::*;

    const FIXED_WIDTH: &str = "編號 案類 日期 時段 地點\n\
        1 竊盜 1120101 0-6 台北市中山區民權東路一段100號\n\
        \n\
        2 竊盜 1120102 6-12 新北市板橋區 中山路二段200號\n\
        3 詐欺 bad 6-12 台北市信義區\n";

    const CSV: &str = "id,category,date,time_slot,location\n\
        1,竊盜,1120101,0-6,台北市中山區民權東路一段100號\n\
        2,竊盜,1120102,0-6,新北市板橋區中山路二段200號\n";

    fn session_in(dir: &Path) -> DatasetSession {
        DatasetSession::new(SessionConfig {
            default_data_paths: vec![dir.join("crime_data.txt"), dir.join("data/crime_data.txt")],
            ..SessionConfig::default()
        })
    }

    #[test]
    fn missing_default_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let session = session_in(dir.path());
        let dataset = session.load_default().unwrap();
        assert!(dataset.is_empty());
        assert_eq!(dataset.source, DatasetSource::Empty);
    }

    #[test]
    fn loads_default_from_later_path() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("data")).unwrap();
        std::fs::write(dir.path().join("data/crime_data.txt"), FIXED_WIDTH).unwrap();

        let dataset = session_in(dir.path()).load_default().unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.dropped_rows, 1);
        assert_eq!(dataset.records[1].location, "新北市板橋區 中山路二段200號");
        assert_eq!(dataset.records[0].year, 2023);
    }

    #[test]
    fn upload_replaces_and_clear_restores_default() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_in(dir.path());

        let active = session.active_or_default().unwrap();
        assert_eq!(active.origin, DataOrigin::Default);
        assert_eq!(active.origin.to_string(), "預設資料");

        let dataset = session.upload("crime.CSV", CSV.as_bytes()).unwrap();
        assert_eq!(dataset.len(), 2);

        let active = session.active_or_default().unwrap();
        assert_eq!(active.origin, DataOrigin::Uploaded);
        assert_eq!(active.origin.as_ref(), "上傳的資料");
        assert!(Arc::ptr_eq(&active.dataset, &dataset));

        assert!(session.clear());
        assert!(!session.clear());
        assert!(session.current().is_none());
    }

    #[test]
    fn failed_upload_keeps_previous() {
        let mut session = DatasetSession::default();
        session.upload("a.csv", CSV.as_bytes()).unwrap();

        let err = session
            .upload("b.csv", b"id,category,date,time_slot\n1,x,1120101,0-6\n")
            .unwrap_err();
        assert!(matches!(
            err,
            SessionError::Normalize(NormalizeError::MissingRequiredColumn(_))
        ));
        assert_eq!(session.current().map(|d| d.len()), Some(2));
    }

    #[test]
    fn upload_guards() {
        let mut session = DatasetSession::new(SessionConfig {
            max_upload_mb: 0,
            ..SessionConfig::default()
        });

        assert!(matches!(
            session.upload("crime.xlsx", CSV.as_bytes()),
            Err(SessionError::UnsupportedFileType { .. })
        ));
        assert!(matches!(
            session.upload("crime.csv", CSV.as_bytes()),
            Err(SessionError::UploadTooLarge { max_mb: 0, .. })
        ));
        assert!(session.current().is_none());
    }
}
