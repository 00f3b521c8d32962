// Copyright (c) 2025-2026, Tom Ouellette
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// A copy of the License has been included in the root of the repository.

use std::future::Future;
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use reqwest::{Client, StatusCode, redirect::Policy};

use polymask_core::ut::track::progress_warn;

pub const DEFAULT_MAX_ATTEMPTS: usize = 10;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(500);

// Export format requested for job annotations
const ANNOTATION_FORMAT: &str = "CVAT%20for%20images%201.1";

/// Connection settings for the annotation service
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: String,
    pub username: String,
    pub password: String,
    pub max_attempts: usize,
    pub retry_delay: Duration,
}

impl ClientConfig {
    /// Initialize a config with the default retry policy
    pub fn new(api_url: &str, username: &str, password: &str) -> Self {
        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            username: username.to_string(),
            password: password.to_string(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }

    /// Url of the first image chunk of a job
    ///
    /// # Examples
    ///
    /// ```
    /// use polymask_data::request::ClientConfig;
    ///
    /// let config = ClientConfig::new("https://cvat.example.com/api/", "user", "pass");
    /// assert_eq!(
    ///     config.images_url(46939),
    ///     "https://cvat.example.com/api/jobs/46939/data?type=chunk&number=0"
    /// );
    /// ```
    pub fn images_url(&self, job: u64) -> String {
        format!("{}/jobs/{}/data?type=chunk&number=0", self.api_url, job)
    }

    /// Url of the annotation export of a job
    pub fn annotations_url(&self, job: u64) -> String {
        format!(
            "{}/jobs/{}/annotations?action=download&format={}",
            self.api_url, job, ANNOTATION_FORMAT
        )
    }
}

/// Raw zip archives of a single job
#[derive(Debug, Clone)]
pub struct JobPayload {
    pub images: Vec<u8>,
    pub annotations: Vec<u8>,
}

/// Fetch the image and annotation archives of a job
///
/// Both archives are requested together and the pair is retried as a
/// unit, with a fixed delay, until it succeeds or `max_attempts` is
/// reached.
///
/// # Arguments
///
/// * `config` - Service url, credentials and retry policy
/// * `job` - Job identifier
#[tokio::main]
pub async fn fetch_job(config: &ClientConfig, job: u64) -> Result<JobPayload> {
    let client = create_http_client()?;
    let client = &client;

    with_retry(config.max_attempts, config.retry_delay, move |attempt| {
        async move {
            fetch_job_once(client, config, job)
                .await
                .with_context(|| format!("Attempt {} for job {} failed", attempt, job))
        }
    })
    .await
}

/// Run an operation until it succeeds, up to `max_attempts` times
///
/// Failed attempts are logged. The error of the final attempt is returned
/// when every attempt fails.
pub async fn with_retry<T, F, Fut>(
    max_attempts: usize,
    delay: Duration,
    mut operation: F,
) -> Result<T>
where
    F: FnMut(usize) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let max_attempts = max_attempts.max(1);
    let mut last_error = anyhow!("No attempts were made");

    for attempt in 1..=max_attempts {
        match operation(attempt).await {
            Ok(value) => return Ok(value),
            Err(err) => {
                progress_warn(&format!("{:#} ({}/{})", err, attempt, max_attempts));
                last_error = err;
            }
        }

        if attempt < max_attempts && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    Err(last_error.context(format!("Giving up after {} attempts", max_attempts)))
}

fn create_http_client() -> Result<Client> {
    Client::builder()
        .user_agent(concat!("polymask/", env!("CARGO_PKG_VERSION")))
        .redirect(Policy::limited(10))
        .build()
        .context("Failed to create HTTP client")
}

async fn fetch_job_once(client: &Client, config: &ClientConfig, job: u64) -> Result<JobPayload> {
    let images = download_bytes(client, config, &config.images_url(job)).await?;
    let annotations = download_bytes(client, config, &config.annotations_url(job)).await?;

    Ok(JobPayload {
        images,
        annotations,
    })
}

async fn download_bytes(client: &Client, config: &ClientConfig, url: &str) -> Result<Vec<u8>> {
    let resp = client
        .get(url)
        .basic_auth(&config.username, Some(&config.password))
        .send()
        .await
        .with_context(|| format!("Failed to send request to {}", url))?;

    // The service answers 202 while an annotation export is still being prepared
    if resp.status() == StatusCode::ACCEPTED {
        bail!("Export at {} is not ready yet", url);
    }

    let resp = resp
        .error_for_status()
        .with_context(|| format!("Request to {} was rejected", url))?;

    let bytes = resp
        .bytes()
        .await
        .with_context(|| format!("Failed to read response body from {}", url))?;

    if bytes.is_empty() {
        bail!("Empty response from {}", url);
    }

    Ok(bytes.to_vec())
}
