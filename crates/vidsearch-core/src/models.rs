use crate::error::ChunkError;
use serde::{Deserialize, Serialize};

/// Time interval covered by a chunk, in seconds.
///
/// `start_time` is `None` for the empty accumulator a packing pass starts
/// from. A chunk that genuinely starts at `0.0` keeps `Some(0.0)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    start_time: Option<f64>,
    end_time: f64,
}

impl ChunkMetadata {
    /// Interval starting at `start_time` and lasting `duration` seconds.
    pub fn new(start_time: f64, duration: f64) -> Result<Self, ChunkError> {
        Self::from_bounds(start_time, start_time + duration)
    }

    pub fn from_bounds(start_time: f64, end_time: f64) -> Result<Self, ChunkError> {
        let valid = start_time.is_finite()
            && end_time.is_finite()
            && start_time >= 0.0
            && end_time >= start_time;
        if !valid {
            return Err(ChunkError::MalformedTiming {
                start: start_time,
                end: end_time,
            });
        }
        Ok(Self {
            start_time: Some(start_time),
            end_time,
        })
    }

    pub fn unset() -> Self {
        Self {
            start_time: None,
            end_time: 0.0,
        }
    }

    pub fn is_unset(&self) -> bool {
        self.start_time.is_none()
    }

    pub fn start_time(&self) -> Option<f64> {
        self.start_time
    }

    pub fn end_time(&self) -> f64 {
        self.end_time
    }

    pub fn duration(&self) -> f64 {
        self.start_time
            .map(|start| self.end_time - start)
            .unwrap_or(0.0)
    }

    /// Union of two consecutive intervals: earliest known start, `later`'s end.
    fn span(&self, later: &ChunkMetadata) -> ChunkMetadata {
        if later.is_unset() {
            return *self;
        }
        let start_time = self.start_time.or(later.start_time);
        let end_time = later.end_time;
        debug_assert!(start_time.map_or(true, |s| end_time >= s));
        ChunkMetadata {
            start_time,
            end_time,
        }
    }
}

impl Default for ChunkMetadata {
    fn default() -> Self {
        Self::unset()
    }
}

impl std::fmt::Display for ChunkMetadata {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.start_time {
            Some(start) => write!(
                f,
                "{:.2}s-{:.2}s ({:.2}s)",
                start,
                self.end_time,
                self.duration()
            ),
            None => write!(f, "unset"),
        }
    }
}

/// A span of transcript text and the time interval it was spoken in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub text: String,
    pub metadata: ChunkMetadata,
}

impl Chunk {
    pub fn new(text: impl Into<String>, metadata: ChunkMetadata) -> Self {
        Self {
            text: text.into(),
            metadata,
        }
    }

    /// Empty text with unset timing.
    pub fn empty() -> Self {
        Self::new(String::new(), ChunkMetadata::unset())
    }

    /// Concatenate `self` with the chunk that follows it in time.
    pub fn merge(&self, other: &Chunk) -> Chunk {
        self.merge_with(other, " ")
    }

    /// Like [`Chunk::merge`], joining the trimmed texts with `separator`.
    /// The separator is omitted when either side is empty.
    pub fn merge_with(&self, other: &Chunk, separator: &str) -> Chunk {
        let left = self.text.trim();
        let right = other.text.trim();
        let text = match (left.is_empty(), right.is_empty()) {
            (true, _) => right.to_string(),
            (false, true) => left.to_string(),
            (false, false) => format!("{}{}{}", left, separator, right),
        };
        Chunk {
            text,
            metadata: self.metadata.span(&other.metadata),
        }
    }

    /// New chunk with this chunk's timing and different text.
    pub fn with_text(&self, text: impl Into<String>) -> Chunk {
        Chunk::new(text, self.metadata)
    }
}

/// One timed unit of raw speech-to-text output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snippet {
    pub text: String,
    pub start: f64,
    pub duration: f64,
}

impl Snippet {
    pub fn new(text: impl Into<String>, start: f64, duration: f64) -> Self {
        Self {
            text: text.into(),
            start,
            duration,
        }
    }

    pub fn to_chunk(&self) -> Result<Chunk, ChunkError> {
        Ok(Chunk::new(
            self.text.clone(),
            ChunkMetadata::new(self.start, self.duration)?,
        ))
    }
}

/// Ordered snippets of one video's transcript.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    pub video_id: String,
    #[serde(default)]
    pub language: Option<String>,
    pub snippets: Vec<Snippet>,
}

impl Transcript {
    pub fn new(video_id: impl Into<String>, snippets: Vec<Snippet>) -> Self {
        Self {
            video_id: video_id.into(),
            language: None,
            snippets,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.snippets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(text: &str, start: f64, duration: f64) -> Chunk {
        Chunk::new(text, ChunkMetadata::new(start, duration).unwrap())
    }

    #[test]
    fn test_metadata_duration() {
        let meta = ChunkMetadata::new(1.5, 2.0).unwrap();
        assert_eq!(meta.start_time(), Some(1.5));
        assert_eq!(meta.end_time(), 3.5);
        assert_eq!(meta.duration(), 2.0);
    }

    #[test]
    fn test_negative_duration_is_rejected() {
        let err = ChunkMetadata::new(4.0, -1.0).unwrap_err();
        assert_eq!(err, ChunkError::MalformedTiming { start: 4.0, end: 3.0 });
        assert!(ChunkMetadata::from_bounds(-1.0, 2.0).is_err());
        assert!(ChunkMetadata::new(f64::NAN, 1.0).is_err());
    }

    #[test]
    fn test_merge_concatenates_trimmed_text() {
        let merged = chunk("  hello ", 1.0, 1.0).merge(&chunk(" world  ", 2.0, 1.0));
        assert_eq!(merged.text, "hello world");
        assert_eq!(merged.metadata.start_time(), Some(1.0));
        assert_eq!(merged.metadata.end_time(), 3.0);
    }

    #[test]
    fn test_merge_onto_empty_accumulator_takes_other_timing() {
        let merged = Chunk::empty().merge(&chunk("hello", 5.0, 2.0));
        assert_eq!(merged.text, "hello");
        assert_eq!(merged.metadata.start_time(), Some(5.0));
        assert_eq!(merged.metadata.end_time(), 7.0);
    }

    #[test]
    fn test_merge_keeps_genuine_zero_start() {
        // A chunk starting at 0.0 is a real start, not "unset".
        let merged = chunk("intro", 0.0, 2.0).merge(&chunk("continues", 2.0, 2.0));
        assert_eq!(merged.metadata.start_time(), Some(0.0));
        assert_eq!(merged.metadata.end_time(), 4.0);
    }

    #[test]
    fn test_merge_is_associative_for_timing() {
        let a = chunk("a", 1.0, 1.0);
        let b = chunk("b", 2.0, 1.0);
        let c = chunk("c", 3.0, 2.0);

        let left = a.merge(&b).merge(&c);
        let right = a.merge(&b.merge(&c));

        assert_eq!(left.metadata.end_time(), c.metadata.end_time());
        assert_eq!(right.metadata.start_time(), a.metadata.start_time());
        assert_eq!(left, right);
    }

    #[test]
    fn test_with_text_keeps_timing() {
        let original = chunk("old", 3.0, 4.0);
        let replaced = original.with_text("new");
        assert_eq!(replaced.text, "new");
        assert_eq!(replaced.metadata, original.metadata);
        assert_eq!(original.text, "old");
    }

    #[test]
    fn test_snippet_to_chunk() {
        let c = Snippet::new("hi there", 10.0, 2.5).to_chunk().unwrap();
        assert_eq!(c.text, "hi there");
        assert_eq!(c.metadata.end_time(), 12.5);
        assert!(Snippet::new("bad", 1.0, -0.5).to_chunk().is_err());
    }

    #[test]
    fn test_transcript_json_shape() {
        let transcript: Transcript = serde_json::from_str(
            r#"{"video_id": "abc", "snippets": [{"text": "hi", "start": 0.0, "duration": 1.2}]}"#,
        )
        .unwrap();
        assert_eq!(transcript.snippets.len(), 1);
        assert_eq!(transcript.language, None);
    }
}
