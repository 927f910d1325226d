//! S3 client implementation
//!
//! Wraps aws-sdk-s3 and implements the ObjectStore trait from kot-core.

use async_trait::async_trait;
use aws_config::meta::region::RegionProviderChain;
use aws_config::Region;
use aws_sdk_s3::config::http::HttpResponse;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};

use kot_core::{Error, ListOptions, ListingPage, ObjectReader, ObjectStore, Profile, Result};

/// Region used when neither the profile nor the environment names one
const DEFAULT_REGION: &str = "us-east-1";

/// S3 client wrapper
pub struct S3Client {
    inner: aws_sdk_s3::Client,
}

impl S3Client {
    /// Create a new S3 client
    ///
    /// Without a profile, endpoint and credentials come from the SDK's
    /// default provider chain (environment, shared config files, IMDS).
    pub async fn new(profile: Option<&Profile>) -> Result<Self> {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());

        loader = match profile.and_then(|p| p.region.clone()) {
            Some(region) => loader.region(Region::new(region)),
            None => loader.region(RegionProviderChain::default_provider().or_else(DEFAULT_REGION)),
        };

        if let Some(profile) = profile {
            if let Some(creds) = &profile.credentials {
                let credentials = aws_credential_types::Credentials::new(
                    creds.access_key_id.clone(),
                    creds.secret_access_key.clone(),
                    creds.session_token.clone(),
                    None, // expiry
                    "kot-profile",
                );
                loader = loader.credentials_provider(credentials);
            }

            if let Some(endpoint) = &profile.endpoint_url {
                loader = loader.endpoint_url(endpoint);
            }

            tracing::debug!(profile = %profile.name, "using configured profile");
        }

        let config = loader.load().await;

        let s3_config = aws_sdk_s3::config::Builder::from(&config)
            .force_path_style(profile.is_some_and(Profile::force_path_style))
            .build();

        Ok(Self {
            inner: aws_sdk_s3::Client::from_conf(s3_config),
        })
    }

    /// Get the underlying aws-sdk-s3 client
    pub fn inner(&self) -> &aws_sdk_s3::Client {
        &self.inner
    }
}

#[async_trait]
impl ObjectStore for S3Client {
    async fn list_buckets(&self) -> Result<Vec<String>> {
        let response = self
            .inner
            .list_buckets()
            .send()
            .await
            .map_err(|e| classify(e, |_| false, String::new()))?;

        Ok(response
            .buckets()
            .iter()
            .filter_map(|b| b.name().map(str::to_string))
            .collect())
    }

    async fn list_objects(&self, bucket: &str, options: ListOptions) -> Result<ListingPage> {
        let mut request = self
            .inner
            .list_objects_v2()
            .bucket(bucket)
            .prefix(options.prefix);

        if let Some(delimiter) = options.delimiter {
            request = request.delimiter(delimiter);
        }

        if let Some(token) = options.continuation_token {
            request = request.continuation_token(token);
        }

        let response = request.send().await.map_err(|e| {
            classify(
                e,
                |se| se.is_no_such_bucket(),
                format!("Bucket not found: {bucket}"),
            )
        })?;

        Ok(ListingPage {
            common_prefixes: response
                .common_prefixes()
                .iter()
                .filter_map(|cp| cp.prefix().map(str::to_string))
                .collect(),
            contents: response
                .contents()
                .iter()
                .filter_map(|object| object.key().map(str::to_string))
                .collect(),
            truncated: response.is_truncated().unwrap_or(false),
            continuation_token: response.next_continuation_token().map(str::to_string),
        })
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<ObjectReader> {
        let response = self
            .inner
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                classify(
                    e,
                    |se| se.is_no_such_key() || se.code() == Some("NoSuchBucket"),
                    format!("s3://{bucket}/{key}"),
                )
            })?;

        Ok(Box::pin(response.body.into_async_read()) as ObjectReader)
    }
}

/// Map an SDK error to [`Error::NotFound`] when `is_missing` says so,
/// [`Error::Backend`] otherwise
fn classify<E>(
    err: SdkError<E, HttpResponse>,
    is_missing: impl Fn(&E) -> bool,
    what: String,
) -> Error
where
    E: std::error::Error + 'static,
{
    if err.as_service_error().is_some_and(is_missing) {
        return Error::NotFound(what);
    }
    Error::Backend(DisplayErrorContext(&err).to_string())
}
