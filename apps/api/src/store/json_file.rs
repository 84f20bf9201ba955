use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use super::{PageStore, StoreError};
use crate::models::page::{NewPage, PageRecord, VIDEOS_PER_PAGE};

/// Upper bound on id re-draws when a fresh id collides with a stored one.
const MAX_ID_ATTEMPTS: u32 = 16;

/// Page table backed by a single JSON array on disk.
///
/// Every mutation is a full load-modify-save of the file. Mutations are
/// serialized through `write_lock`, so concurrent requests in this process
/// cannot lose each other's updates. Another process writing the same file
/// is not coordinated with.
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the whole table. A missing (or blank) file is an empty table;
    /// a file that exists but cannot be read or parsed is an error.
    pub async fn load_all(&self) -> Result<Vec<PageRecord>, StoreError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        serde_json::from_slice(&bytes).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    /// Overwrites the table. The new content goes to a sibling temp file,
    /// is flushed to disk and then renamed into place, so readers see old or
    /// new, never half.
    pub async fn save_all(&self, records: &[PageRecord]) -> Result<(), StoreError> {
        let encoded = serde_json::to_vec_pretty(records)?;
        let tmp_path = self.tmp_path();
        let tmp_io = |source| StoreError::Io {
            path: tmp_path.clone(),
            source,
        };

        let mut file = tokio::fs::File::create(&tmp_path).await.map_err(tmp_io)?;
        file.write_all(&encoded).await.map_err(tmp_io)?;
        file.sync_all().await.map_err(tmp_io)?;
        drop(file);

        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|source| StoreError::Io {
                path: self.path.clone(),
                source,
            })
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl PageStore for JsonFileStore {
    async fn create(&self, page: NewPage) -> Result<PageRecord, StoreError> {
        if page.videos.len() != VIDEOS_PER_PAGE {
            return Err(StoreError::VideoCount {
                expected: VIDEOS_PER_PAGE,
                got: page.videos.len(),
            });
        }

        let _guard = self.write_lock.lock().await;

        let mut records = self.load_all().await?;
        let id = fresh_id(&records)?;

        let record = PageRecord {
            id,
            recruiter: page.recruiter,
            videos: page.videos,
            contact: page.contact,
            created_at: Utc::now(),
            views: 0,
            last_viewed: None,
        };

        records.push(record.clone());
        self.save_all(&records).await?;

        info!(
            "Created page {} for {} at {}",
            record.id, record.recruiter.name, record.recruiter.company
        );
        Ok(record)
    }

    async fn get(&self, id: &str) -> Result<Option<PageRecord>, StoreError> {
        Ok(self.load_all().await?.into_iter().find(|r| r.id == id))
    }

    async fn list(&self) -> Result<Vec<PageRecord>, StoreError> {
        self.load_all().await
    }

    async fn record_view(&self, id: &str) -> Result<Option<PageRecord>, StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut records = self.load_all().await?;
        let Some(record) = records.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };

        record.views += 1;
        record.last_viewed = Some(Utc::now());
        let updated = record.clone();

        self.save_all(&records).await?;

        debug!("Page {id} now has {} views", updated.views);
        Ok(Some(updated))
    }
}

/// 8 lowercase hex chars from 4 random bytes.
fn generate_page_id() -> String {
    Uuid::new_v4().as_bytes()[..4]
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

fn fresh_id(existing: &[PageRecord]) -> Result<String, StoreError> {
    for _ in 0..MAX_ID_ATTEMPTS {
        let id = generate_page_id();
        if !existing.iter().any(|r| r.id == id) {
            return Ok(id);
        }
    }
    Err(StoreError::IdSpaceExhausted {
        attempts: MAX_ID_ATTEMPTS,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    use crate::models::page::{Contact, Recruiter, VideoEntry};

    fn make_page(name: &str, company: &str) -> NewPage {
        NewPage {
            recruiter: Recruiter {
                name: name.to_string(),
                position: "Recruiter".to_string(),
                company: company.to_string(),
            },
            videos: (1..=3)
                .map(|i| VideoEntry {
                    title: format!("Project {i}"),
                    description: format!("Description {i}"),
                    loom_url: format!("https://www.loom.com/embed/video-{i}"),
                    tools: vec!["Terraform".to_string(), "AWS".to_string()],
                })
                .collect(),
            contact: Contact {
                email: "me@example.com".to_string(),
                linkedin: "https://linkedin.com/in/me".to_string(),
                resume_url: "/resume.pdf".to_string(),
            },
        }
    }

    fn temp_store() -> (tempfile::TempDir, JsonFileStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("recruiter-tracker.json"));
        (dir, store)
    }

    #[test]
    fn test_generated_id_is_eight_hex_chars() {
        let id = generate_page_id();
        assert_eq!(id.len(), 8);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_fresh_id_on_empty_table() {
        assert_eq!(fresh_id(&[]).unwrap().len(), 8);
    }

    #[tokio::test]
    async fn test_load_all_on_missing_file_is_empty() {
        let (_dir, store) = temp_store();
        assert!(store.load_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_load_all_on_blank_file_is_empty() {
        let (_dir, store) = temp_store();
        tokio::fs::write(store.path(), "\n").await.unwrap();
        assert!(store.load_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_load_all_surfaces_corrupt_file() {
        let (_dir, store) = temp_store();
        tokio::fs::write(store.path(), "{not json").await.unwrap();

        let err = store.load_all().await.unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }), "got {err:?}");
    }

    #[tokio::test]
    async fn test_create_initializes_counters() {
        let (_dir, store) = temp_store();
        let record = store.create(make_page("Sarah", "Acme")).await.unwrap();

        assert_eq!(record.views, 0);
        assert!(record.last_viewed.is_none());
        assert_eq!(record.videos.len(), 3);
        assert_eq!(record.recruiter.name, "Sarah");
    }

    #[tokio::test]
    async fn test_create_rejects_wrong_video_count() {
        let (_dir, store) = temp_store();
        for count in [0, 2, 4] {
            let mut page = make_page("Sarah", "Acme");
            page.videos.resize(count, page.videos[0].clone());

            let err = store.create(page).await.unwrap_err();
            assert!(
                matches!(err, StoreError::VideoCount { expected: 3, got } if got == count),
                "count {count}: {err:?}"
            );
        }
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_save_all_replaces_longer_table() {
        let (_dir, store) = temp_store();
        store.create(make_page("Sarah", "Acme")).await.unwrap();
        let kept = store.create(make_page("Tom", "Globex")).await.unwrap();

        store.save_all(std::slice::from_ref(&kept)).await.unwrap();

        assert_eq!(store.load_all().await.unwrap(), vec![kept]);
    }

    #[tokio::test]
    async fn test_get_after_create_returns_same_record() {
        let (_dir, store) = temp_store();
        let created = store.create(make_page("Sarah", "Acme")).await.unwrap();

        let fetched = store.get(&created.id).await.unwrap();
        assert_eq!(fetched, Some(created));
    }

    #[tokio::test]
    async fn test_get_unknown_id_is_none() {
        let (_dir, store) = temp_store();
        store.create(make_page("Sarah", "Acme")).await.unwrap();

        assert_eq!(store.get("doesnotexist").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_created_ids_are_unique() {
        let (_dir, store) = temp_store();
        let mut seen = HashSet::new();
        for i in 0..25 {
            let record = store
                .create(make_page(&format!("Recruiter {i}"), "Acme"))
                .await
                .unwrap();
            assert!(seen.insert(record.id), "duplicate id issued");
        }
        assert_eq!(store.list().await.unwrap().len(), 25);
    }

    #[tokio::test]
    async fn test_list_keeps_creation_order() {
        let (_dir, store) = temp_store();
        let first = store.create(make_page("Sarah", "Acme")).await.unwrap();
        let second = store.create(make_page("Tom", "Globex")).await.unwrap();

        let ids: Vec<_> = store.list().await.unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![first.id, second.id]);
    }

    #[tokio::test]
    async fn test_record_view_n_times_counts_n() {
        let (_dir, store) = temp_store();
        let created = store.create(make_page("Sarah", "Acme")).await.unwrap();

        let mut last = None;
        for _ in 0..5 {
            last = store.record_view(&created.id).await.unwrap();
        }
        let last = last.unwrap();
        assert_eq!(last.views, 5);

        let stored = store.get(&created.id).await.unwrap().unwrap();
        assert_eq!(stored.views, 5);
        assert_eq!(stored.last_viewed, last.last_viewed);
        assert!(stored.last_viewed.unwrap() >= created.created_at);
    }

    #[tokio::test]
    async fn test_record_view_leaves_immutable_fields_alone() {
        let (_dir, store) = temp_store();
        let created = store.create(make_page("Sarah", "Acme")).await.unwrap();

        let viewed = store.record_view(&created.id).await.unwrap().unwrap();
        assert_eq!(viewed.id, created.id);
        assert_eq!(viewed.recruiter, created.recruiter);
        assert_eq!(viewed.videos, created.videos);
        assert_eq!(viewed.contact, created.contact);
        assert_eq!(viewed.created_at, created.created_at);
    }

    #[tokio::test]
    async fn test_record_view_unknown_id_is_none_and_writes_nothing() {
        let (_dir, store) = temp_store();
        assert!(store.record_view("missing1").await.unwrap().is_none());
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_save_all_of_load_all_is_idempotent() {
        let (_dir, store) = temp_store();
        let created = store.create(make_page("Sarah", "Acme")).await.unwrap();
        store.record_view(&created.id).await.unwrap();
        store.create(make_page("Tom", "Globex")).await.unwrap();

        let before = tokio::fs::read(store.path()).await.unwrap();
        let records = store.load_all().await.unwrap();
        store.save_all(&records).await.unwrap();
        let after = tokio::fs::read(store.path()).await.unwrap();

        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_save_all_leaves_no_temp_file() {
        let (dir, store) = temp_store();
        store.create(make_page("Sarah", "Acme")).await.unwrap();

        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec!["recruiter-tracker.json".to_string()]);
    }

    #[tokio::test]
    async fn test_concurrent_creates_lose_nothing() {
        let (_dir, store) = temp_store();
        let store = Arc::new(store);

        let handles: Vec<_> = (0..20)
            .map(|i| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    store
                        .create(make_page(&format!("Recruiter {i}"), "Acme"))
                        .await
                        .unwrap()
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(store.list().await.unwrap().len(), 20);
    }

    #[tokio::test]
    async fn test_concurrent_views_all_counted() {
        let (_dir, store) = temp_store();
        let store = Arc::new(store);
        let id = store.create(make_page("Sarah", "Acme")).await.unwrap().id;

        let handles: Vec<_> = (0..10)
            .map(|_| {
                let store = Arc::clone(&store);
                let id = id.clone();
                tokio::spawn(async move { store.record_view(&id).await.unwrap() })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(store.get(&id).await.unwrap().unwrap().views, 10);
    }
}
