pub mod vector;

pub use vector::{ChunkVector, ChunkVectorIndex, VectorHit};
