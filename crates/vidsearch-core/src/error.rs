use thiserror::Error;

/// Errors raised by the chunk data model.
#[derive(Debug, Error, PartialEq)]
pub enum ChunkError {
    /// A snippet or interval whose end precedes its start.
    #[error("malformed timing: start {start}s, end {end}s")]
    MalformedTiming { start: f64, end: f64 },
}
