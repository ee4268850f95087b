use anyhow::Context;
use aws_config::{defaults, BehaviorVersion};
use aws_credential_types::Credentials;
use aws_sdk_s3::{
    config::{Builder as S3ConfigBuilder, Region},
    Client,
};
use aws_smithy_types::byte_stream::ByteStream;
use axum::async_trait;
use bytes::Bytes;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::config::S3Config;
use crate::error::MealError;

/// Append-only binary store for meal images. `put` returns an opaque key
/// that `get` later resolves to exactly the bytes written.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn put(&self, body: Bytes, content_type: &str) -> Result<String, MealError>;
    async fn get(&self, key: &str) -> Result<Bytes, MealError>;
}

#[derive(Clone)]
pub struct S3BlobStore {
    client: Client,
    bucket: String,
}

impl S3BlobStore {
    pub async fn new(cfg: &S3Config) -> anyhow::Result<Self> {
        let shared = defaults(BehaviorVersion::latest())
            .region(Region::new(cfg.region.clone()))
            .credentials_provider(Credentials::new(
                cfg.access_key.clone(),
                cfg.secret_key.clone(),
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
impl BlobStore for S3BlobStore {
    async fn put(&self, body: Bytes, content_type: &str) -> Result<String, MealError> {
        let key = object_key(OffsetDateTime::now_utc(), content_type);
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| MealError::ImageStoreFailed(anyhow::Error::from(e)))?;
        Ok(key)
    }

    async fn get(&self, key: &str) -> Result<Bytes, MealError> {
        let resp = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await;
        match resp {
            Ok(out) => {
                let data = out
                    .body
                    .collect()
                    .await
                    .context("read s3 object body")
                    .map_err(MealError::ImageStoreFailed)?;
                Ok(data.into_bytes())
            }
            Err(e) => {
                let no_such_key = e
                    .as_service_error()
                    .map(|se| se.is_no_such_key())
                    .unwrap_or(false);
                if no_such_key {
                    Err(MealError::NotFound(key.to_string()))
                } else {
                    Err(MealError::ImageStoreFailed(anyhow::Error::from(e)))
                }
            }
        }
    }
}

/// The capture timestamp in the key is for operator readability when
/// browsing the bucket; it carries no identity, the uuid does.
fn object_key(now: OffsetDateTime, content_type: &str) -> String {
    let stamp = now
        .format(time::macros::format_description!(
            "[year][month][day]T[hour][minute][second]"
        ))
        .unwrap_or_else(|_| now.unix_timestamp().to_string());
    let ext = ext_from_mime(content_type).unwrap_or("bin");
    format!("meals/{}-{}.{}", stamp, Uuid::new_v4(), ext)
}

fn ext_from_mime(ct: &str) -> Option<&'static str> {
    match ct {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "image/heic" => Some("heic"),
        _ => None,
    }
}

pub fn mime_from_key(key: &str) -> &'static str {
    match key.rsplit('.').next() {
        Some("jpg") => "image/jpeg",
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("heic") => "image/heic",
        _ => "application/octet-stream",
    }
}
