use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::repository::Document;

pub const YOUTUBE_VIDEO_URL_PREFIX: &str = "https://www.youtube.com/watch?v=";

/// A YouTube video, either from the catalog file or from the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    /// Store id, once the video has been processed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal_id: Option<u64>,
    /// The `v=` part of the watch URL.
    pub id: String,
    pub title: String,
    #[serde(default = "empty_meta")]
    pub meta: serde_json::Value,
}

fn empty_meta() -> serde_json::Value {
    serde_json::Value::Object(Default::default())
}

impl Video {
    pub fn new(id: impl Into<String>, title: impl Into<String>, meta: serde_json::Value) -> Self {
        Self {
            internal_id: None,
            id: id.into(),
            title: title.into(),
            meta,
        }
    }

    pub fn url(&self) -> String {
        format!("{}{}", YOUTUBE_VIDEO_URL_PREFIX, self.id)
    }

    pub fn from_document(document: &Document) -> Self {
        let id = document
            .url
            .rsplit('=')
            .next()
            .unwrap_or(&document.url)
            .to_string();
        Self {
            internal_id: Some(document.id),
            id,
            title: document.title.clone(),
            meta: document.meta.clone(),
        }
    }
}

/// Read a JSON list of videos.
pub fn load_videos(path: &Path) -> Result<Vec<Video>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading video catalog {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing video catalog {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_url() {
        let video = Video::new("dQw4w9WgXcQ", "t", json!({}));
        assert_eq!(video.url(), "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
    }

    #[test]
    fn test_from_document_recovers_video_id() {
        let doc = Document {
            id: 1,
            title: "Test Video".into(),
            url: "https://youtube.com/watch?v=video123".into(),
            created_at: 0,
            meta: json!({ "duration": "10:00" }),
        };
        let video = Video::from_document(&doc);
        assert_eq!(video.internal_id, Some(1));
        assert_eq!(video.id, "video123");
        assert_eq!(video.url(), "https://www.youtube.com/watch?v=video123");
        assert_eq!(video.meta, json!({ "duration": "10:00" }));
    }

    #[test]
    fn test_load_catalog_defaults_meta() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("videos.json");
        fs::write(
            &path,
            r#"[{"id": "a1", "title": "First"}, {"id": "b2", "title": "Second", "meta": {"tag": "x"}}]"#,
        )?;

        let videos = load_videos(&path)?;
        assert_eq!(videos.len(), 2);
        assert_eq!(videos[0].meta, json!({}));
        assert_eq!(videos[1].meta, json!({ "tag": "x" }));
        assert_eq!(videos[0].internal_id, None);
        Ok(())
    }

    #[test]
    fn test_export_shape_omits_missing_internal_id() -> Result<()> {
        let out = serde_json::to_value(Video::new("a1", "First", json!({})))?;
        assert_eq!(out, json!({ "id": "a1", "title": "First", "meta": {} }));
        Ok(())
    }
}
