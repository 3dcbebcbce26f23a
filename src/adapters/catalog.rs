use crate::core::reconcile::Catalog;
use crate::core::Storage;
use crate::domain::model::CatalogEntry;
use crate::utils::error::Result;

/// 讀取打包的課程目錄 JSON
pub async fn load_catalog<S: Storage>(storage: &S, path: &str) -> Result<Catalog> {
    tracing::debug!("Loading catalog from {}", path);
    let data = storage.read_file(path).await?;
    let entries: Vec<CatalogEntry> = serde_json::from_slice(&data)?;
    let catalog = Catalog::new(entries)?;
    tracing::info!("📚 Loaded {} catalog courses", catalog.len());
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::CartError;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone, Default)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                CartError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_load_catalog() {
        let storage = MockStorage::default();
        let json = serde_json::json!([
            {"dept": "CIS", "number": 120, "title": "Programming Languages", "description": "OCaml and Java"},
            {"dept": "CIS", "number": 121, "title": "Data Structures", "description": "Trees", "prereqs": ["CIS-120"]}
        ]);
        storage
            .write_file("courses.json", json.to_string().as_bytes())
            .await
            .unwrap();

        let catalog = load_catalog(&storage, "courses.json").await.unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.ids()[1].to_string(), "CIS-121");
    }

    #[tokio::test]
    async fn test_load_catalog_errors() {
        let storage = MockStorage::default();
        assert!(matches!(
            load_catalog(&storage, "missing.json").await,
            Err(CartError::IoError(_))
        ));

        storage.write_file("bad.json", b"{not json").await.unwrap();
        assert!(matches!(
            load_catalog(&storage, "bad.json").await,
            Err(CartError::SerializationError(_))
        ));

        let dup = serde_json::json!([
            {"dept": "CIS", "number": 120, "title": "A", "description": ""},
            {"dept": "CIS", "number": 120, "title": "B", "description": ""}
        ]);
        storage
            .write_file("dup.json", dup.to_string().as_bytes())
            .await
            .unwrap();
        assert!(matches!(
            load_catalog(&storage, "dup.json").await,
            Err(CartError::CatalogError { .. })
        ));
    }
}
