use crate::domain::model::{CourseId, RatingRecord};
use crate::domain::ports::RatingFetcher;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// 抓取評分；傳輸失敗時降級為「沒有評分資料」，不往外拋出錯誤
pub async fn load_ratings(fetcher: &dyn RatingFetcher, ids: &[CourseId]) -> Vec<RatingRecord> {
    match fetcher.fetch_ratings(ids).await {
        Ok(ratings) => {
            tracing::info!("⭐ Loaded ratings for {} of {} courses", ratings.len(), ids.len());
            ratings
        }
        Err(e) => {
            tracing::warn!(
                "Rating fetch failed, continuing without ratings: {} ({})",
                e,
                e.recovery_suggestion()
            );
            Vec::new()
        }
    }
}

/// 背景評分抓取工作。取消或 drop 時中止，結果由擁有者套用到 session。
pub struct RatingLoad {
    handle: Option<JoinHandle<Vec<RatingRecord>>>,
}

impl RatingLoad {
    pub fn spawn(fetcher: Arc<dyn RatingFetcher>, ids: Vec<CourseId>) -> Self {
        tracing::debug!("Spawning rating load for {} courses", ids.len());
        let handle = tokio::spawn(async move { load_ratings(fetcher.as_ref(), &ids).await });
        Self {
            handle: Some(handle),
        }
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            tracing::debug!("Cancelling rating load");
            handle.abort();
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// 等待結果；已取消或已取得時回傳 None。可在 `select!` 中使用
    pub async fn wait(&mut self) -> Option<Vec<RatingRecord>> {
        let handle = self.handle.as_mut()?;
        let joined = handle.await;
        self.handle = None;
        match joined {
            Ok(ratings) => Some(ratings),
            Err(e) if e.is_cancelled() => None,
            Err(e) => {
                tracing::error!("Rating load task failed: {}", e);
                None
            }
        }
    }
}

impl Drop for RatingLoad {
    fn drop(&mut self) {
        self.cancel();
    }
}
