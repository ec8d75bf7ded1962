//! In-memory backends for exercising the upload flow without S3 or a database.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::DbErr;

use crate::config::AppState;
use crate::entities::upload;
use crate::middleware::rate_limiter::RateLimiter;
use crate::models::upload_model::NewUpload;
use crate::repositories::upload_repository::UploadRepository;
use crate::services::media_fetcher::MediaFetcher;
use crate::services::storage::{ObjectStore, StorageError};
use crate::services::upload_service::UploadPolicy;

pub struct MemoryObjectStore {
    base_url: String,
    objects: Mutex<HashMap<String, (Vec<u8>, String)>>,
    pub upload_calls: AtomicUsize,
    pub fail_uploads: AtomicBool,
}

impl MemoryObjectStore {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            objects: Mutex::new(HashMap::new()),
            upload_calls: AtomicUsize::new(0),
            fail_uploads: AtomicBool::new(false),
        }
    }

    pub fn calls(&self) -> usize {
        self.upload_calls.load(Ordering::SeqCst)
    }

    pub fn keys(&self) -> Vec<String> {
        self.objects.lock().unwrap().keys().cloned().collect()
    }

    pub fn object(&self, key: &str) -> Option<(Vec<u8>, String)> {
        self.objects.lock().unwrap().get(key).cloned()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn upload(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<(), StorageError> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(StorageError("The resource already exists".to_string()));
        }
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), (bytes, content_type.to_string()));
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/pov-uploads/{}", self.base_url, key)
    }
}

#[derive(Default)]
pub struct MemoryUploadRepository {
    rows: Mutex<Vec<upload::Model>>,
    next_id: AtomicI64,
    pub fail_inserts: AtomicBool,
}

impl MemoryUploadRepository {
    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn seed(&self, file_url: &str) -> upload::Model {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let row = upload::Model {
            id,
            created_at: Utc::now(),
            guest_name: Some("Anonymous".to_string()),
            message: None,
            file_url: file_url.to_string(),
        };
        self.rows.lock().unwrap().push(row.clone());
        row
    }
}

#[async_trait]
impl UploadRepository for MemoryUploadRepository {
    async fn insert(&self, new_upload: NewUpload) -> Result<upload::Model, DbErr> {
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(DbErr::Custom("new row violates row-level security policy".to_string()));
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let row = upload::Model {
            id,
            created_at: Utc::now(),
            guest_name: Some(new_upload.guest_name),
            message: new_upload.message,
            file_url: new_upload.file_url,
        };
        self.rows.lock().unwrap().push(row.clone());
        Ok(row)
    }

    async fn list_recent(&self) -> Result<Vec<upload::Model>, DbErr> {
        let mut rows = self.rows.lock().unwrap().clone();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(rows)
    }

    async fn find(&self, id: i64) -> Result<Option<upload::Model>, DbErr> {
        Ok(self.rows.lock().unwrap().iter().find(|r| r.id == id).cloned())
    }
}

pub struct TestBackends {
    pub storage: Arc<MemoryObjectStore>,
    pub uploads: Arc<MemoryUploadRepository>,
    pub state: AppState,
}

pub fn test_state(policy: UploadPolicy, media_base_url: &str) -> TestBackends {
    let storage = Arc::new(MemoryObjectStore::new(media_base_url));
    let uploads = Arc::new(MemoryUploadRepository::default());

    let state = AppState {
        storage: storage.clone(),
        uploads: uploads.clone(),
        media_fetcher: MediaFetcher::default(),
        policy,
        rate_limiter: Arc::new(RateLimiter::new(100, Duration::from_secs(60))),
    };

    TestBackends { storage, uploads, state }
}
