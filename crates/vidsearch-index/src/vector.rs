use anyhow::{anyhow, bail, Result};
use arrow::array::{
    ArrayRef, FixedSizeListArray, Float32Array, RecordBatch, RecordBatchIterator, StringArray,
    UInt32Array, UInt64Array,
};
use arrow::datatypes::{DataType, Field, Schema};
use futures::stream::TryStreamExt;
use lance::dataset::{Dataset, WriteMode, WriteParams};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// One chunk embedding to index.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkVector {
    pub document_id: u64,
    pub chunk_index: u32,
    pub embedding: Vec<f32>,
}

impl ChunkVector {
    pub fn id(&self) -> String {
        format!("{}:{:08}", self.document_id, self.chunk_index)
    }
}

/// A nearest-neighbour match; smaller distance is closer.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorHit {
    pub distance: f32,
    pub id: String,
    pub document_id: u64,
    pub chunk_index: u32,
}

/// Chunk embeddings in a lance dataset.
pub struct ChunkVectorIndex {
    dataset: Option<Dataset>,
    index_path: PathBuf,
}

fn path_str(path: &Path) -> Result<&str> {
    path.to_str()
        .ok_or_else(|| anyhow!("index path is not valid UTF-8: {}", path.display()))
}

fn column<'a, T: 'static>(batch: &'a RecordBatch, name: &str) -> Result<&'a T> {
    batch
        .column_by_name(name)
        .ok_or_else(|| anyhow!("Missing {} column", name))?
        .as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| anyhow!("Failed to cast {} column", name))
}

impl ChunkVectorIndex {
    pub async fn new(index_path: &Path) -> Result<Self> {
        let dataset = if index_path.exists() {
            Dataset::open(path_str(index_path)?).await.ok()
        } else {
            None
        };

        Ok(Self {
            dataset,
            index_path: index_path.to_path_buf(),
        })
    }

    pub async fn count(&self) -> Result<usize> {
        match self.dataset.as_ref() {
            Some(ds) => Ok(ds.count_rows(None).await?),
            None => Ok(0),
        }
    }

    pub async fn add(&mut self, vectors: &[ChunkVector]) -> Result<()> {
        let Some(first) = vectors.first() else {
            return Ok(());
        };
        let embedding_dim = first.embedding.len();
        if embedding_dim == 0 {
            bail!("cannot index empty embeddings");
        }
        if let Some(bad) = vectors.iter().find(|v| v.embedding.len() != embedding_dim) {
            bail!(
                "embedding for {} has {} dimensions, expected {}",
                bad.id(),
                bad.embedding.len(),
                embedding_dim
            );
        }

        let item = Arc::new(Field::new("item", DataType::Float32, true));
        let schema = Arc::new(Schema::new(vec![
            Field::new("id", DataType::Utf8, false),
            Field::new("document_id", DataType::UInt64, false),
            Field::new("chunk_index", DataType::UInt32, false),
            Field::new(
                "embedding",
                DataType::FixedSizeList(item.clone(), embedding_dim as i32),
                false,
            ),
        ]));

        let ids: Vec<String> = vectors.iter().map(ChunkVector::id).collect();
        let document_ids: Vec<u64> = vectors.iter().map(|v| v.document_id).collect();
        let chunk_indices: Vec<u32> = vectors.iter().map(|v| v.chunk_index).collect();
        let embeddings: Vec<f32> = vectors
            .iter()
            .flat_map(|v| v.embedding.iter().copied())
            .collect();

        let embedding_array: ArrayRef = Arc::new(FixedSizeListArray::new(
            item,
            embedding_dim as i32,
            Arc::new(Float32Array::from(embeddings)),
            None,
        ));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(ids)),
                Arc::new(UInt64Array::from(document_ids)),
                Arc::new(UInt32Array::from(chunk_indices)),
                embedding_array,
            ],
        )?;

        let write_mode = if self.dataset.is_some() {
            WriteMode::Append
        } else {
            WriteMode::Create
        };

        let reader = RecordBatchIterator::new(vec![Ok(batch)].into_iter(), schema);
        let dataset = Dataset::write(
            reader,
            path_str(&self.index_path)?,
            Some(WriteParams {
                mode: write_mode,
                ..Default::default()
            }),
        )
        .await?;

        debug!(rows = vectors.len(), dim = embedding_dim, "indexed chunk vectors");
        self.dataset = Some(dataset);
        Ok(())
    }

    /// The `limit` nearest chunks to `query`, closest first.
    pub async fn search(&self, query: &[f32], limit: usize) -> Result<Vec<VectorHit>> {
        let dataset = match self.dataset.as_ref() {
            Some(ds) => ds,
            None => return Ok(Vec::new()),
        };
        if limit == 0 {
            return Ok(Vec::new());
        }

        let query_array = Float32Array::from(query.to_vec());
        let mut stream = dataset
            .scan()
            .nearest("embedding", &query_array, limit)?
            .try_into_stream()
            .await?;

        let mut hits = Vec::new();
        while let Some(batch) = stream.try_next().await? {
            let ids = column::<StringArray>(&batch, "id")?;
            let document_ids = column::<UInt64Array>(&batch, "document_id")?;
            let chunk_indices = column::<UInt32Array>(&batch, "chunk_index")?;
            let distances = column::<Float32Array>(&batch, "_distance")?;

            for i in 0..batch.num_rows() {
                hits.push(VectorHit {
                    distance: distances.value(i),
                    id: ids.value(i).to_string(),
                    document_id: document_ids.value(i),
                    chunk_index: chunk_indices.value(i),
                });
            }
        }

        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits.truncate(limit);
        Ok(hits)
    }

    /// Drop every indexed vector.
    pub async fn reset(&mut self) -> Result<()> {
        self.dataset = None;
        if self.index_path.exists() {
            tokio::fs::remove_dir_all(&self.index_path).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn vector(document_id: u64, chunk_index: u32, embedding: [f32; 3]) -> ChunkVector {
        ChunkVector {
            document_id,
            chunk_index,
            embedding: embedding.to_vec(),
        }
    }

    #[tokio::test]
    async fn test_search_orders_by_distance() -> Result<()> {
        let dir = tempdir()?;
        let mut index = ChunkVectorIndex::new(&dir.path().join("chunks.lance")).await?;

        index
            .add(&[
                vector(1, 0, [1.0, 0.0, 0.0]),
                vector(1, 1, [0.0, 1.0, 0.0]),
                vector(2, 0, [0.9, 0.1, 0.0]),
            ])
            .await?;

        let hits = index.search(&[1.0, 0.0, 0.0], 2).await?;
        assert_eq!(hits.len(), 2);
        assert_eq!((hits[0].document_id, hits[0].chunk_index), (1, 0));
        assert_eq!((hits[1].document_id, hits[1].chunk_index), (2, 0));
        assert!(hits[0].distance <= hits[1].distance);
        Ok(())
    }

    #[tokio::test]
    async fn test_append_reopen_and_reset() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("chunks.lance");
        {
            let mut index = ChunkVectorIndex::new(&path).await?;
            index.add(&[vector(1, 0, [0.0, 0.0, 1.0])]).await?;
            index.add(&[vector(1, 1, [0.0, 1.0, 1.0])]).await?;
        }

        let mut index = ChunkVectorIndex::new(&path).await?;
        assert_eq!(index.count().await?, 2);

        index.reset().await?;
        assert_eq!(index.count().await?, 0);
        assert!(index.search(&[0.0, 0.0, 1.0], 5).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_mismatched_dimensions_are_rejected() -> Result<()> {
        let dir = tempdir()?;
        let mut index = ChunkVectorIndex::new(&dir.path().join("chunks.lance")).await?;
        let bad = ChunkVector {
            document_id: 1,
            chunk_index: 1,
            embedding: vec![1.0],
        };
        assert!(index.add(&[vector(1, 0, [1.0, 0.0, 0.0]), bad]).await.is_err());
        Ok(())
    }
}
