use crate::storage::{Store, Tree};
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// A stored video (or any other source the chunks came from).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: u64,
    pub title: String,
    pub url: String,
    /// Unix seconds.
    pub created_at: u64,
    #[serde(default)]
    pub meta: serde_json::Value,
}

/// A document not yet assigned an id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDocument {
    pub title: String,
    pub url: String,
    pub meta: serde_json::Value,
}

impl NewDocument {
    pub fn new(title: impl Into<String>, url: impl Into<String>, meta: serde_json::Value) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            meta,
        }
    }
}

fn decode_id(bytes: &[u8]) -> Result<u64> {
    let raw: [u8; 8] = bytes
        .try_into()
        .map_err(|_| anyhow!("corrupt document id ({} bytes)", bytes.len()))?;
    Ok(u64::from_be_bytes(raw))
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

pub struct DocumentStore {
    documents_tree: Tree,
    url_to_id_tree: Tree,
    next_id: AtomicU64,
}

impl DocumentStore {
    pub fn new(store: &Store) -> Result<Self> {
        let documents_tree = store.open_tree("documents")?;
        let url_to_id_tree = store.open_tree("url_to_id")?;

        // ids are big-endian keys, so the last key is the largest
        let last_id = match documents_tree.last()? {
            Some((key, _)) => decode_id(&key)?,
            None => 0,
        };

        Ok(Self {
            documents_tree,
            url_to_id_tree,
            next_id: AtomicU64::new(last_id + 1),
        })
    }

    /// Store `doc` under a fresh id and return it.
    pub fn insert_document(&self, doc: NewDocument) -> Result<u64> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let stored = Document {
            id,
            title: doc.title,
            url: doc.url,
            created_at: now_secs(),
            meta: doc.meta,
        };
        self.documents_tree.insert_encoded(id.to_be_bytes(), &stored)?;
        self.url_to_id_tree
            .insert(stored.url.as_bytes(), id.to_be_bytes())?;
        Ok(id)
    }

    pub fn get_document(&self, id: u64) -> Result<Option<Document>> {
        self.documents_tree.get_decoded(id.to_be_bytes())
    }

    pub fn get_document_id_by_url(&self, url: &str) -> Result<Option<u64>> {
        match self.url_to_id_tree.get(url.as_bytes())? {
            Some(bytes) => Ok(Some(decode_id(&bytes)?)),
            None => Ok(None),
        }
    }

    pub fn document_exists(&self, url: &str) -> Result<bool> {
        self.url_to_id_tree.contains_key(url.as_bytes())
    }

    /// All documents in id order.
    pub fn list_documents(&self) -> Result<Vec<Document>> {
        let mut docs = Vec::new();
        for item in self.documents_tree.iter() {
            let (_, bytes) = item?;
            docs.push(serde_json::from_slice(&bytes)?);
        }
        Ok(docs)
    }

    /// One page of documents in id order, plus the total document count.
    pub fn list_documents_paginated(&self, limit: usize, offset: usize) -> Result<(Vec<Document>, usize)> {
        let total = self.documents_tree.len();
        let mut docs = Vec::with_capacity(limit.min(total));
        for item in self.documents_tree.iter().skip(offset).take(limit) {
            let (_, bytes) = item?;
            docs.push(serde_json::from_slice(&bytes)?);
        }
        Ok((docs, total))
    }

    pub fn count(&self) -> usize {
        self.documents_tree.len()
    }

    /// Remove every document. Ids keep increasing afterwards.
    pub fn clear(&self) -> Result<()> {
        self.documents_tree.clear()?;
        self.url_to_id_tree.clear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn doc(n: usize) -> NewDocument {
        NewDocument::new(
            format!("Video {}", n),
            format!("https://www.youtube.com/watch?v=vid{}", n),
            json!({ "n": n }),
        )
    }

    #[test]
    fn test_insert_and_get() -> Result<()> {
        let dir = tempdir()?;
        let store = Store::open(dir.path())?;
        let docs = DocumentStore::new(&store)?;

        let id = docs.insert_document(doc(1))?;
        let fetched = docs.get_document(id)?.expect("document stored");
        assert_eq!(fetched.title, "Video 1");
        assert_eq!(fetched.meta, json!({ "n": 1 }));
        assert!(docs.document_exists("https://www.youtube.com/watch?v=vid1")?);
        assert!(!docs.document_exists("https://www.youtube.com/watch?v=other")?);
        assert_eq!(docs.get_document_id_by_url(&fetched.url)?, Some(id));
        assert_eq!(docs.get_document(id + 100)?, None);
        Ok(())
    }

    #[test]
    fn test_pagination_reports_total() -> Result<()> {
        let dir = tempdir()?;
        let store = Store::open(dir.path())?;
        let docs = DocumentStore::new(&store)?;
        for n in 0..5 {
            docs.insert_document(doc(n))?;
        }

        let (page, total) = docs.list_documents_paginated(2, 1)?;
        assert_eq!(total, 5);
        let titles: Vec<&str> = page.iter().map(|d| d.title.as_str()).collect();
        assert_eq!(titles, vec!["Video 1", "Video 2"]);

        let (tail, _) = docs.list_documents_paginated(10, 4)?;
        assert_eq!(tail.len(), 1);
        Ok(())
    }

    #[test]
    fn test_ids_survive_reopen() -> Result<()> {
        let dir = tempdir()?;
        let first = {
            let store = Store::open(dir.path())?;
            let docs = DocumentStore::new(&store)?;
            let id = docs.insert_document(doc(1))?;
            store.flush()?;
            id
        };

        let store = Store::open(dir.path())?;
        let docs = DocumentStore::new(&store)?;
        let second = docs.insert_document(doc(2))?;
        assert!(second > first);
        assert_eq!(docs.list_documents()?.len(), 2);
        Ok(())
    }

    #[test]
    fn test_clear_removes_everything() -> Result<()> {
        let dir = tempdir()?;
        let store = Store::open(dir.path())?;
        let docs = DocumentStore::new(&store)?;
        docs.insert_document(doc(1))?;
        docs.clear()?;
        assert_eq!(docs.count(), 0);
        assert!(!docs.document_exists("https://www.youtube.com/watch?v=vid1")?);
        Ok(())
    }
}
