use super::traits::{LogFileDescriptor, LogPortion, LogService, RemoteError};
use crate::config::types::RemoteConfig;
use async_trait::async_trait;
use serde::Deserialize;

pub type Result<T> = std::result::Result<T, RemoteError>;

#[derive(Debug, Deserialize)]
struct DescribeResponse {
    #[serde(default)]
    log_files: Vec<LogFileDescriptor>,
}

/// JSON client for a log gateway fronting the database service's
/// describe-log-files and download-log-portion calls.
#[derive(Debug)]
pub struct HttpLogService {
    base_url: String,
    token: Option<String>,
    client: reqwest::Client,
}

impl HttpLogService {
    pub fn new(config: &RemoteConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            base_url: config.endpoint.trim_end_matches('/').to_string(),
            token: config.token.clone(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        let request = self.client.get(url);
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        if !response.status().is_success() {
            return Err(RemoteError::Status {
                status: response.status().as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl LogService for HttpLogService {
    async fn describe_log_files(
        &self,
        instance_id: &str,
        filename_contains: &str,
    ) -> Result<Vec<LogFileDescriptor>> {
        let url = format!("{}/instances/{}/logfiles", self.base_url, instance_id);
        let response = self
            .get(&url)
            .query(&[("filename_contains", filename_contains)])
            .send()
            .await?;

        let body: DescribeResponse = Self::check(response).await?.json().await?;
        Ok(body.log_files)
    }

    async fn download_portion(
        &self,
        instance_id: &str,
        log_file_name: &str,
        marker: &str,
    ) -> Result<LogPortion> {
        let url = format!("{}/instances/{}/portion", self.base_url, instance_id);
        let response = self
            .get(&url)
            .query(&[("log_file_name", log_file_name), ("marker", marker)])
            .send()
            .await?;

        let portion = Self::check(response).await?.json().await?;
        Ok(portion)
    }
}
