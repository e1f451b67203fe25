pub mod catalog;
pub mod crud;
pub mod defaults;
pub mod fetcher;
pub mod processing;
pub mod repository;
pub mod search;

pub use catalog::{load_videos, Video};
pub use crud::VideoCrud;
pub use defaults::Services;
pub use fetcher::{CachedTranscriptFetcher, TranscriptFetcher, YouTubeTranscriptFetcher};
pub use processing::{ProcessOutcome, VideoProcessingService};
pub use repository::{
    EmbeddedChunk, LocalRepository, ReadOnlyRepository, Repository, SearchResultChunk,
};
pub use search::VideoSearchService;
