// SPDX-FileCopyrightText: Muster Contributors
//
// SPDX-License-Identifier: EUPL-1.2

//! S3 compatible object storage for avatar blobs
//!
//! Only the blob lives here; the owning profile row stores the resulting
//! URL as an opaque reference.

use crate::settings::ObjectStorageSettings;
use anyhow::{Context, Result};
use aws_sdk_s3::config::Builder;
use aws_sdk_s3::types::ByteStream;
use aws_sdk_s3::Client;
use aws_sdk_s3::Credentials as AwsCred;
use aws_sdk_s3::Endpoint;
use bytes::Bytes;

pub struct ObjectStorage {
    /// The s3 client
    client: Client,
    /// The configured bucket
    bucket: String,
    /// Endpoint uri the stored objects are reachable under
    uri: String,
}

impl ObjectStorage {
    pub async fn new(settings: &ObjectStorageSettings) -> Result<Self> {
        let credentials = AwsCred::new(
            settings.access_key.clone(),
            settings.secret_key.clone(),
            None,
            None,
            "muster",
        );

        let conf = Builder::new()
            .endpoint_resolver(Endpoint::immutable(
                settings
                    .uri
                    .parse()
                    .context("Failed to parse object storage URI")?,
            ))
            .credentials_provider(credentials)
            .region(aws_sdk_s3::Region::new(""))
            .build();

        let client = Client::from_conf(conf);

        // check if the bucket exists
        client
            .head_bucket()
            .bucket(settings.bucket.clone())
            .send()
            .await
            .context("Cannot find configured object storage bucket")?;

        log::info!("Using S3 bucket: {}", settings.bucket);

        Ok(Self {
            client,
            bucket: settings.bucket.clone(),
            uri: settings.uri.trim_end_matches('/').to_owned(),
        })
    }

    /// Put an avatar blob into the storage
    ///
    /// Returns the URL the stored object is reachable under. Avatars are
    /// size-capped by the HTTP layer, well below the S3 multipart threshold,
    /// so a single `put_object` call is sufficient.
    pub async fn put_avatar(&self, key: &str, data: Bytes, content_type: &str) -> Result<String> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(data))
            .send()
            .await
            .context("Failed to upload avatar to object storage")?;

        Ok(format!("{}/{}/{}", self.uri, self.bucket, key))
    }
}
