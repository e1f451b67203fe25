#[cfg(test)]
mod tests {
    use crate::Store;
    use anyhow::Result;
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize, PartialEq, Debug)]
    struct Entry {
        id: u32,
        name: String,
    }

    #[test]
    fn test_encoded_operations() -> Result<()> {
        let temp_dir = tempfile::tempdir()?;
        let store = Store::open(temp_dir.path())?;
        let tree = store.open_tree("test_tree")?;

        let val = Entry {
            id: 1,
            name: "test".to_string(),
        };

        tree.insert_encoded("key1", &val)?;

        let retrieved: Option<Entry> = tree.get_decoded("key1")?;
        assert_eq!(retrieved, Some(val));

        let missing: Option<Entry> = tree.get_decoded("key2")?;
        assert_eq!(missing, None);

        Ok(())
    }

    #[test]
    fn test_prefix_scan_and_clear() -> Result<()> {
        let temp_dir = tempfile::tempdir()?;
        let store = Store::open(temp_dir.path())?;
        let tree = store.open_tree("scan")?;

        tree.insert("a:1", b"x")?;
        tree.insert("a:2", b"y")?;
        tree.insert("b:1", b"z")?;

        let keys: Vec<Vec<u8>> = tree
            .scan_prefix("a:")
            .map(|item| item.map(|(k, _)| k))
            .collect::<Result<_>>()?;
        assert_eq!(keys, vec![b"a:1".to_vec(), b"a:2".to_vec()]);
        assert_eq!(tree.last()?.map(|(k, _)| k), Some(b"b:1".to_vec()));

        tree.clear()?;
        assert!(tree.is_empty());
        Ok(())
    }
}
