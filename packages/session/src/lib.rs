#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Which dataset a query runs against.
//!
//! A [`DatasetSession`] owns at most one uploaded dataset. Queries take the
//! upload when present and fall back to the local fixed-width default file
//! otherwise. Every failure a user can trigger maps to a short Traditional
//! Chinese message through [`SessionError::user_message`].

pub mod config;
pub mod session;

pub use config::SessionConfig;
pub use session::{ActiveDataset, DataOrigin, DatasetSession};

use crime_stats_analytics::AnalyticsError;
use crime_stats_district::ResolveError;
use crime_stats_normalizer::NormalizeError;

/// Errors surfaced to the bot layer.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The file could not be normalized.
    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    /// A query had nothing to aggregate.
    #[error(transparent)]
    Analytics(#[from] AnalyticsError),

    /// A selected area could not be turned into a matcher.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// I/O error (file read).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The upload exceeds the configured size limit.
    #[error("Upload is {size} bytes, limit is {max_mb} MB")]
    UploadTooLarge {
        /// Upload size in bytes.
        size: u64,
        /// Configured limit in megabytes.
        max_mb: u64,
    },

    /// The upload's file name has no allowed extension.
    #[error("Unsupported file type: {file_name}")]
    UnsupportedFileType {
        /// Name of the rejected file.
        file_name: String,
    },

    /// The configuration file or an override is invalid.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of what went wrong.
        message: String,
    },
}

impl SessionError {
    /// The message shown to the user in chat.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Normalize(NormalizeError::UnparsableFile) => "無法解析檔案".to_string(),
            Self::Normalize(NormalizeError::MissingRequiredColumn(field)) => {
                format!("找不到必要欄位：{}", field.header())
            }
            Self::Normalize(NormalizeError::UnparsableDateFormat) => "無法處理日期格式".to_string(),
            Self::Normalize(NormalizeError::NoValidRecords)
            | Self::Analytics(AnalyticsError::EmptyDataset { .. }) => {
                "沒有資料可以顯示".to_string()
            }
            Self::Resolve(_) => "無法辨識所選地區".to_string(),
            Self::Io(_) => "讀取檔案時發生錯誤".to_string(),
            Self::UploadTooLarge { max_mb, .. } => format!("檔案過大，最大允許 {max_mb}MB"),
            Self::UnsupportedFileType { .. } => "請上傳 CSV 檔案".to_string(),
            Self::Config { .. } => "設定錯誤".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crime_stats_incident_models::CanonicalField;

    use super::*;

    fn regex_error() -> regex::Error {
        regex::Regex::new("(").unwrap_err()
    }

    #[test]
    fn user_messages() {
        assert_eq!(
            SessionError::from(NormalizeError::MissingRequiredColumn(CanonicalField::Location))
                .user_message(),
            "找不到必要欄位：地點"
        );
        assert_eq!(
            SessionError::from(NormalizeError::UnparsableFile).user_message(),
            "無法解析檔案"
        );
        assert_eq!(
            SessionError::from(AnalyticsError::EmptyDataset {
                selection: "台北市".to_string(),
            })
            .user_message(),
            "沒有資料可以顯示"
        );
        let pattern = regex_error();
        assert_eq!(
            SessionError::from(ResolveError::Pattern {
                scope: "台北市".to_string(),
                source: pattern,
            })
            .user_message(),
            "無法辨識所選地區"
        );
        assert_eq!(
            SessionError::UploadTooLarge {
                size: 60 * 1024 * 1024,
                max_mb: 50,
            }
            .user_message(),
            "檔案過大，最大允許 50MB"
        );
    }
}
