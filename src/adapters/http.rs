use crate::config::toml_config::{AppConfig, FetchMode};
use crate::core::{ConfigProvider, RatingFetcher};
use crate::domain::model::{CourseId, RatingRecord};
use crate::utils::error::{CartError, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// 課程評價 API 用戶端
#[derive(Debug, Clone)]
pub struct HttpRatingFetcher {
    client: Client,
    endpoint: String,
    mode: FetchMode,
    concurrent_requests: usize,
    timeout: Duration,
    headers: HashMap<String, String>,
}

impl HttpRatingFetcher {
    pub fn new(endpoint: impl Into<String>, mode: FetchMode) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            mode,
            concurrent_requests: 5,
            timeout: Duration::from_secs(10),
            headers: HashMap::new(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        let mut fetcher = Self::new(config.ratings_endpoint(), config.fetch_mode());
        fetcher.concurrent_requests = config.concurrent_requests().max(1);
        fetcher.timeout = config.request_timeout();
        fetcher.headers = config.headers();
        fetcher
    }

    pub fn with_concurrency(mut self, concurrent_requests: usize) -> Self {
        self.concurrent_requests = concurrent_requests.max(1);
        self
    }

    fn request(&self, url: &str) -> RequestBuilder {
        let mut request = self.client.get(url).timeout(self.timeout);
        for (key, value) in &self.headers {
            request = request.header(key, value);
        }
        request
    }

    /// 查詢單一課程；404 表示本學期沒有這門課
    pub async fn fetch_course(&self, id: &CourseId) -> Result<Option<RatingRecord>> {
        let url = format!("{}/{}/", self.endpoint, id);
        tracing::debug!("Making API request to: {}", url);

        let response = self.request(&url).send().await?;
        tracing::debug!("API response status for {}: {}", id, response.status());

        if response.status() == StatusCode::NOT_FOUND {
            tracing::info!("{} not found", id);
            return Ok(None);
        }

        let mut body: serde_json::Value = response.error_for_status()?.json().await?;
        // 單筆回應可能不含 id 欄位
        if let serde_json::Value::Object(obj) = &mut body {
            obj.entry("id")
                .or_insert_with(|| serde_json::Value::String(id.to_string()));
        }

        let record: RatingRecord = serde_json::from_value(body)?;
        if &record.id != id {
            return Err(CartError::InvalidCourseId {
                value: record.id.to_string(),
                reason: format!("response does not match requested course {}", id),
            });
        }
        Ok(Some(record.rounded()))
    }

    /// 一次取得所有評分；格式錯誤的項目略過
    pub async fn fetch_bulk(&self) -> Result<Vec<RatingRecord>> {
        let url = format!("{}/", self.endpoint);
        tracing::debug!("Making bulk API request to: {}", url);

        let response = self.request(&url).send().await?.error_for_status()?;
        let json_data: serde_json::Value = response.json().await?;

        let serde_json::Value::Array(items) = json_data else {
            return Err(CartError::UnexpectedResponse {
                url,
                message: "bulk endpoint did not return a JSON array".to_string(),
            });
        };

        let mut records = Vec::with_capacity(items.len());
        for item in items {
            match serde_json::from_value::<RatingRecord>(item) {
                Ok(record) => records.push(record.rounded()),
                Err(e) => tracing::warn!("Skipping malformed rating record: {}", e),
            }
        }
        Ok(records)
    }

    async fn fetch_each(&self, ids: &[CourseId]) -> Vec<RatingRecord> {
        let semaphore = Arc::new(Semaphore::new(self.concurrent_requests));
        let mut tasks = JoinSet::new();

        for (index, id) in ids.iter().cloned().enumerate() {
            let fetcher = self.clone();
            let semaphore = Arc::clone(&semaphore);
            tasks.spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return (index, None);
                };
                match fetcher.fetch_course(&id).await {
                    Ok(record) => (index, record),
                    Err(e) => {
                        // 單一課程失敗不影響其他課程
                        tracing::warn!("Rating fetch for {} failed: {}", id, e);
                        (index, None)
                    }
                }
            });
        }

        let mut found = Vec::with_capacity(ids.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, Some(record))) => found.push((index, record)),
                Ok((_, None)) => {}
                Err(e) => tracing::error!("Rating fetch task failed: {}", e),
            }
        }

        // 保持請求順序
        found.sort_by_key(|(index, _)| *index);
        found.into_iter().map(|(_, record)| record).collect()
    }
}

#[async_trait]
impl RatingFetcher for HttpRatingFetcher {
    async fn fetch_ratings(&self, ids: &[CourseId]) -> Result<Vec<RatingRecord>> {
        match self.mode {
            FetchMode::Bulk => self.fetch_bulk().await,
            FetchMode::PerCourse => Ok(self.fetch_each(ids).await),
        }
    }
}
