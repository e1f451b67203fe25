//! Core configuration (data locations)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CoreConfig {
    /// Root directory for the document store, vector index and transcript cache
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// JSON list of videos used by `video populate`
    #[serde(default = "default_videos_file")]
    pub videos_file: PathBuf,
}

impl CoreConfig {
    pub fn store_path(&self) -> PathBuf {
        self.data_dir.join("store.db")
    }

    pub fn index_path(&self) -> PathBuf {
        self.data_dir.join("chunks.lance")
    }

    pub fn transcript_cache_dir(&self) -> PathBuf {
        self.data_dir.join("youtube_transcripts")
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            videos_file: default_videos_file(),
        }
    }
}

impl crate::validation::Validate for CoreConfig {
    fn validate(&self) -> crate::error::Result<()> {
        use crate::error::ConfigError;

        if self.data_dir.as_os_str().is_empty() {
            return Err(ConfigError::validation(
                "core.data_dir",
                "Data directory cannot be empty",
            ));
        }
        Ok(())
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_videos_file() -> PathBuf {
    PathBuf::from("youtube_videos.json")
}
