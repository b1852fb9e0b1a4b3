use async_trait::async_trait;
use aws_sdk_s3 as s3;
use s3::primitives::ByteStream;
use std::sync::{Arc, Mutex};

// 1. StorageService Contract
/// StorageService
///
/// The blob-store facade. A stored object is assigned a unique key which
/// doubles as its retrieval path (persisted on the application record as
/// `resume_url`); deletion takes that same path. The trait allows swapping
/// the real S3 client for the in-memory mock during testing.
#[async_trait]
pub trait StorageService: Send + Sync {
    /// Ensures the configured bucket exists. Used in development to
    /// automatically provision the bucket in MinIO. Idempotent.
    async fn ensure_bucket_exists(&self);

    /// Stores an object under `key` with the given content type, returning
    /// the retrieval path.
    async fn store_object(
        &self,
        key: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, String>;

    /// Deletes an object by the retrieval path previously returned from
    /// `store_object`. Deleting a missing object is not an error.
    async fn delete_object(&self, path: &str) -> Result<(), String>;
}

// 2. The Real Implementation (S3/MinIO)
/// S3StorageClient
///
/// Concrete implementation over the AWS SDK. Handles both the Dockerized
/// MinIO instance in development and any S3-compatible endpoint in
/// production. `force_path_style(true)` is required for MinIO-style
/// gateways.
#[derive(Clone)]
pub struct S3StorageClient {
    client: s3::Client,
    bucket_name: String,
}

impl S3StorageClient {
    /// Constructs the S3 client using credentials from AppConfig.
    pub async fn new(
        endpoint: &str,
        region: &str,
        access_key: &str,
        secret_key: &str,
        bucket: &str,
    ) -> Self {
        let credentials =
            s3::config::Credentials::new(access_key, secret_key, None, None, "static");

        let config = s3::Config::builder()
            .credentials_provider(credentials)
            .endpoint_url(endpoint)
            .region(s3::config::Region::new(region.to_string()))
            .behavior_version_latest()
            .force_path_style(true)
            .build();

        let client = s3::Client::from_conf(config);

        Self {
            client,
            bucket_name: bucket.to_string(),
        }
    }
}

#[async_trait]
impl StorageService for S3StorageClient {
    /// ensure_bucket_exists
    ///
    /// Calls the S3 CreateBucket API. Only creates the bucket if it does not
    /// already exist; safe to call at startup.
    async fn ensure_bucket_exists(&self) {
        let _ = self
            .client
            .create_bucket()
            .bucket(&self.bucket_name)
            .send()
            .await;
    }

    async fn store_object(
        &self,
        key: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, String> {
        let key = sanitize_key(key);
        self.client
            .put_object()
            .bucket(&self.bucket_name)
            .key(&key)
            .content_type(content_type)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| e.to_string())?;

        Ok(key)
    }

    async fn delete_object(&self, path: &str) -> Result<(), String> {
        self.client
            .delete_object()
            .bucket(&self.bucket_name)
            .key(path)
            .send()
            .await
            .map_err(|e| e.to_string())?;
        Ok(())
    }
}

/// sanitize_key
///
/// Prevents path traversal by removing directory navigation components
/// (`..`, `.`) from a user-influenced key segment.
fn sanitize_key(key: &str) -> String {
    key.split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".." && *segment != ".")
        .collect::<Vec<_>>()
        .join("/")
}

// 3. The Mock Implementation (For Unit Tests)
/// MockStorageService
///
/// In-memory implementation used by unit and handler tests. Records stored
/// and deleted keys so tests can assert the resume replacement behavior
/// (new blob written, old blob removed) without a network connection.
#[derive(Clone, Default)]
pub struct MockStorageService {
    /// When true, all operations return a simulated failure.
    pub should_fail: bool,
    pub stored: Arc<Mutex<Vec<String>>>,
    pub deleted: Arc<Mutex<Vec<String>>>,
}

impl MockStorageService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl StorageService for MockStorageService {
    async fn ensure_bucket_exists(&self) {
        // No-op in mock environment.
    }

    async fn store_object(
        &self,
        key: &str,
        _content_type: &str,
        _bytes: Vec<u8>,
    ) -> Result<String, String> {
        if self.should_fail {
            return Err("Mock Storage Error: Simulation requested".to_string());
        }
        let key = sanitize_key(key);
        self.stored.lock().unwrap().push(key.clone());
        Ok(key)
    }

    async fn delete_object(&self, path: &str) -> Result<(), String> {
        if self.should_fail {
            return Err("Mock Storage Error: Simulation requested".to_string());
        }
        self.deleted.lock().unwrap().push(path.to_string());
        Ok(())
    }
}

/// StorageState
///
/// The concrete type used to share the storage service across the
/// application state.
pub type StorageState = Arc<dyn StorageService>;
