use crate::domain::model::{CourseId, RatingRecord};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn ratings_endpoint(&self) -> &str;
    fn catalog_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn concurrent_requests(&self) -> usize;
}

/// 評分來源。查無某門課的評分不是錯誤，該課程不會出現在回傳結果中
#[async_trait]
pub trait RatingFetcher: Send + Sync {
    async fn fetch_ratings(&self, ids: &[CourseId]) -> Result<Vec<RatingRecord>>;
}
