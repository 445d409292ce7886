use anyhow::Context;
use async_trait::async_trait;
use aws_config::{defaults, BehaviorVersion};
use aws_credential_types::Credentials;
use aws_sdk_s3::{
    config::{Builder as S3ConfigBuilder, Region},
    Client,
};
use aws_smithy_types::byte_stream::ByteStream;
use bytes::Bytes;
use uuid::Uuid;

use crate::config::StorageConfig;

/// Where uploaded cat pictures go. Returns the filename recorded on the cat.
#[async_trait]
pub trait UploadStore: Send + Sync {
    async fn store(
        &self,
        original_name: &str,
        content_type: &str,
        body: Bytes,
    ) -> anyhow::Result<String>;
    async fn remove(&self, filename: &str) -> anyhow::Result<()>;
}

#[derive(Clone)]
pub struct S3UploadStore {
    client: Client,
    bucket: String,
}

impl S3UploadStore {
    pub async fn new(cfg: &StorageConfig, region: &str) -> anyhow::Result<Self> {
        let shared = defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .credentials_provider(Credentials::new(
                &cfg.access_key,
                &cfg.secret_key,
                None,
                None,
                "static",
            ))
            .endpoint_url(&cfg.endpoint)
            .load()
            .await;

        let conf = S3ConfigBuilder::from(&shared)
            .endpoint_url(&cfg.endpoint)
            .force_path_style(true)
            .build();

        Ok(Self {
            client: Client::from_conf(conf),
            bucket: cfg.bucket.clone(),
        })
    }
}

#[async_trait]
impl UploadStore for S3UploadStore {
    async fn store(
        &self,
        original_name: &str,
        content_type: &str,
        body: Bytes,
    ) -> anyhow::Result<String> {
        let key = object_key(original_name, content_type);
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await
            .with_context(|| format!("s3 put_object {}", key))?;
        Ok(key)
    }

    async fn remove(&self, filename: &str) -> anyhow::Result<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(filename)
            .send()
            .await
            .with_context(|| format!("s3 delete_object {}", filename))?;
        Ok(())
    }
}

/// Unique key that keeps a recognizable image extension.
fn object_key(original_name: &str, content_type: &str) -> String {
    let ext = ext_from_mime(content_type)
        .or_else(|| ext_from_name(original_name))
        .unwrap_or("bin");
    format!("{}.{}", Uuid::new_v4(), ext)
}

fn ext_from_mime(ct: &str) -> Option<&'static str> {
    match ct {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "image/gif" => Some("gif"),
        "image/heic" => Some("heic"),
        _ => None,
    }
}

fn ext_from_name(name: &str) -> Option<&'static str> {
    let (_, ext) = name.rsplit_once('.')?;
    match ext.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => Some("jpg"),
        "png" => Some("png"),
        "webp" => Some("webp"),
        "gif" => Some("gif"),
        "heic" => Some("heic"),
        _ => None,
    }
}
