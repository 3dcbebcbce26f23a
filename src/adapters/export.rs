use crate::core::aggregate::{CheckoutSummary, MetricAverage};
use crate::core::cart_query;
use crate::core::Storage;
use crate::domain::model::CourseRecord;
use crate::utils::error::{CartError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

pub const CSV_FILENAME: &str = "selection.csv";
pub const JSON_FILENAME: &str = "selection.json";

#[derive(Debug, Serialize)]
struct SelectionRow<'a> {
    rank: usize,
    id: String,
    title: &'a str,
    course_quality: Option<f64>,
    difficulty: Option<f64>,
    work_required: Option<f64>,
    unavailable: bool,
}

#[derive(Debug, Serialize)]
struct AverageRow {
    metric: &'static str,
    value: f64,
    rated: usize,
    tier: Option<&'static str>,
}

impl From<&MetricAverage> for AverageRow {
    fn from(avg: &MetricAverage) -> Self {
        Self {
            metric: avg.metric.label(),
            value: avg.value,
            rated: avg.rated,
            tier: avg.tier().map(|t| t.as_str()),
        }
    }
}

#[derive(Debug, Serialize)]
struct SelectionDocument<'a> {
    confirmed_at: DateTime<Utc>,
    cart: String,
    courses: &'a [CourseRecord],
    averages: Vec<AverageRow>,
}

/// 將確認後的選課結果寫出為 csv / json
pub struct SelectionExporter<S: Storage> {
    storage: S,
    formats: Vec<String>,
}

impl<S: Storage> SelectionExporter<S> {
    pub fn new(storage: S, formats: Vec<String>) -> Self {
        Self { storage, formats }
    }

    /// 回傳寫出的檔名
    pub async fn export(
        &self,
        summary: &CheckoutSummary,
        confirmed_at: DateTime<Utc>,
    ) -> Result<Vec<String>> {
        let mut written = Vec::new();

        for format in &self.formats {
            let (filename, data) = match format.as_str() {
                "csv" => (CSV_FILENAME, Self::to_csv(summary)?),
                "json" => (JSON_FILENAME, Self::to_json(summary, confirmed_at)?),
                other => {
                    return Err(CartError::ExportError {
                        message: format!("unsupported export format: {}", other),
                    })
                }
            };

            tracing::debug!("Writing {} ({} bytes)", filename, data.len());
            self.storage.write_file(filename, &data).await?;
            written.push(filename.to_string());
        }

        tracing::info!("📁 Exported selection: {}", written.join(", "));
        Ok(written)
    }

    fn to_csv(summary: &CheckoutSummary) -> Result<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        for (index, course) in summary.entries.iter().enumerate() {
            writer.serialize(SelectionRow {
                rank: index + 1,
                id: course.id.to_string(),
                title: &course.title,
                course_quality: course.quality,
                difficulty: course.difficulty,
                work_required: course.workload,
                unavailable: course.unavailable,
            })?;
        }
        writer.into_inner().map_err(|e| CartError::ExportError {
            message: e.to_string(),
        })
    }

    fn to_json(summary: &CheckoutSummary, confirmed_at: DateTime<Utc>) -> Result<Vec<u8>> {
        let ids: Vec<_> = summary.entries.iter().map(|e| e.id.clone()).collect();
        let document = SelectionDocument {
            confirmed_at,
            cart: cart_query::to_query(&ids),
            courses: &summary.entries,
            averages: summary.averages.iter().map(AverageRow::from).collect(),
        };
        Ok(serde_json::to_vec_pretty(&document)?)
    }
}
