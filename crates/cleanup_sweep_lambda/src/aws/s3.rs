use aws_sdk_s3::error::ProvideErrorMetadata;
use aws_sdk_s3::types::{Delete, ObjectIdentifier};
use aws_sdk_s3::Client;

use cleanup_sweep_core::report::ResourceRecord;
use cleanup_sweep_core::tags::Tag;
use serde_json::json;

use crate::adapters::resource::ResourceSweeper;
use crate::aws::block_on;
use crate::handlers::sweep::log_sweep_error;

/// DeleteObjects accepts at most this many identifiers per request.
const DELETE_BATCH_MAX: usize = 1000;

pub struct S3BucketSweeper {
    client: Client,
}

impl S3BucketSweeper {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl ResourceSweeper for S3BucketSweeper {
    fn kind(&self) -> &'static str {
        "s3_buckets"
    }

    /// Bucket listings cannot be filtered by tag, so every bucket's tag set
    /// is fetched individually. Buckets without one are not candidates.
    fn list_candidates(&self) -> Result<Vec<ResourceRecord>, String> {
        let client = self.client.clone();
        block_on(async move {
            let listed = client
                .list_buckets()
                .send()
                .await
                .map_err(|error| format!("failed to list buckets: {error}"))?;

            let mut records = Vec::new();
            for bucket in listed.buckets() {
                let Some(name) = bucket.name() else {
                    continue;
                };
                match client.get_bucket_tagging().bucket(name).send().await {
                    Ok(tagging) => {
                        let tags = tagging
                            .tag_set()
                            .iter()
                            .map(|tag| Tag::new(tag.key(), tag.value()))
                            .collect();
                        records.push(ResourceRecord::new(name, tags));
                    }
                    Err(error) if error.code() == Some("NoSuchTagSet") => continue,
                    Err(error) => {
                        log_sweep_error(
                            "bucket_tagging_failed",
                            json!({ "bucket": name, "error": error.to_string() }),
                        );
                    }
                }
            }
            Ok(records)
        })
    }

    /// A bucket cannot be deleted while it holds anything, so every object
    /// version and delete marker is removed first.
    fn delete(&self, record: &ResourceRecord) -> Result<(), String> {
        let client = self.client.clone();
        let bucket = record.id.clone();
        block_on(async move {
            empty_bucket(&client, &bucket).await?;
            client
                .delete_bucket()
                .bucket(&bucket)
                .send()
                .await
                .map(|_| ())
                .map_err(|error| format!("failed to delete bucket {bucket}: {error}"))
        })
    }
}

async fn empty_bucket(client: &Client, bucket: &str) -> Result<(), String> {
    let mut pending: Vec<ObjectIdentifier> = Vec::new();
    let mut pages = client
        .list_object_versions()
        .bucket(bucket)
        .into_paginator()
        .send();

    while let Some(page) = pages.next().await {
        let page = page
            .map_err(|error| format!("failed to list versions in bucket {bucket}: {error}"))?;
        for version in page.versions() {
            if let Some(key) = version.key() {
                pending.push(object_identifier(key, version.version_id())?);
            }
        }
        for marker in page.delete_markers() {
            if let Some(key) = marker.key() {
                pending.push(object_identifier(key, marker.version_id())?);
            }
        }
        while pending.len() >= DELETE_BATCH_MAX {
            let batch: Vec<ObjectIdentifier> = pending.drain(..DELETE_BATCH_MAX).collect();
            delete_batch(client, bucket, batch).await?;
        }
    }

    if !pending.is_empty() {
        delete_batch(client, bucket, pending).await?;
    }
    Ok(())
}

fn object_identifier(key: &str, version_id: Option<&str>) -> Result<ObjectIdentifier, String> {
    ObjectIdentifier::builder()
        .key(key)
        .set_version_id(version_id.map(str::to_string))
        .build()
        .map_err(|error| format!("invalid object identifier for key {key}: {error}"))
}

async fn delete_batch(
    client: &Client,
    bucket: &str,
    objects: Vec<ObjectIdentifier>,
) -> Result<(), String> {
    let delete = Delete::builder()
        .set_objects(Some(objects))
        .build()
        .map_err(|error| format!("invalid delete batch for bucket {bucket}: {error}"))?;
    client
        .delete_objects()
        .bucket(bucket)
        .delete(delete)
        .send()
        .await
        .map(|_| ())
        .map_err(|error| format!("failed to delete objects in bucket {bucket}: {error}"))
}
