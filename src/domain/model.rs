use crate::utils::error::CartError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 課程代號，格式為 `<系所>-<編號>`，例如 `CIS-120`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CourseId {
    department: String,
    number: u32,
}

impl CourseId {
    pub fn new(department: impl Into<String>, number: u32) -> Self {
        Self {
            department: department.into(),
            number,
        }
    }

    pub fn department(&self) -> &str {
        &self.department
    }

    /// 編號部分，用於排序與課程等級篩選
    pub fn number(&self) -> u32 {
        self.number
    }
}

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.department, self.number)
    }
}

impl FromStr for CourseId {
    type Err = CartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| CartError::InvalidCourseId {
            value: s.to_string(),
            reason: reason.to_string(),
        };

        let (department, number) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| invalid("expected DEPT-NUMBER"))?;
        let department = department.trim();
        if department.is_empty() {
            return Err(invalid("department is empty"));
        }
        let number = number
            .trim()
            .parse::<u32>()
            .map_err(|_| invalid("course number is not numeric"))?;

        Ok(CourseId::new(department, number))
    }
}

impl TryFrom<String> for CourseId {
    type Error = CartError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CourseId> for String {
    fn from(id: CourseId) -> Self {
        id.to_string()
    }
}

/// 先修條件：資料檔中可能是一段文字，也可能是課程代號清單
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Prerequisites {
    FreeText(String),
    CourseList(Vec<String>),
}

/// 靜態課程目錄中的一筆資料（欄位名稱與 courses.json 一致）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub dept: String,
    pub number: u32,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prereqs: Option<Prerequisites>,
    #[serde(
        rename = "cross-listed",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub cross_listed: Option<Vec<String>>,
}

impl CatalogEntry {
    pub fn id(&self) -> CourseId {
        CourseId::new(self.dept.clone(), self.number)
    }
}

/// 課程評價 API 回傳的一筆評分資料
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingRecord {
    pub id: CourseId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub course_quality: Option<f64>,
    #[serde(default)]
    pub difficulty: Option<f64>,
    #[serde(default)]
    pub work_required: Option<f64>,
}

impl RatingRecord {
    /// 評分取到小數點後兩位
    pub fn rounded(mut self) -> Self {
        self.course_quality = self.course_quality.map(round2);
        self.difficulty = self.difficulty.map(round2);
        self.work_required = self.work_required.map(round2);
        self
    }

    pub fn has_title(&self) -> bool {
        self.title.as_deref().is_some_and(|t| !t.trim().is_empty())
    }
}

/// 合併後的課程資料，建立後不再變動
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseRecord {
    pub id: CourseId,
    pub title: String,
    pub description: String,
    pub prerequisites: Option<Prerequisites>,
    pub cross_listed: Option<Vec<String>>,
    pub quality: Option<f64>,
    pub difficulty: Option<f64>,
    pub workload: Option<f64>,
    pub unavailable: bool,
}

impl CourseRecord {
    pub fn from_catalog(entry: &CatalogEntry, unavailable: bool) -> Self {
        Self {
            id: entry.id(),
            title: entry.title.clone(),
            description: entry.description.clone(),
            prerequisites: entry.prereqs.clone(),
            cross_listed: entry.cross_listed.clone(),
            quality: None,
            difficulty: None,
            workload: None,
            unavailable,
        }
    }

    pub fn metric(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Quality => self.quality,
            Metric::Difficulty => self.difficulty,
            Metric::Workload => self.workload,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Quality,
    Difficulty,
    Workload,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Quality, Metric::Difficulty, Metric::Workload];

    /// 只有課程品質是越高越好
    pub fn high_is_good(self) -> bool {
        matches!(self, Metric::Quality)
    }

    pub fn label(self) -> &'static str {
        match self {
            Metric::Quality => "Course Quality",
            Metric::Difficulty => "Difficulty",
            Metric::Workload => "Work Required",
        }
    }
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_course_id_parse_and_display() {
        let id: CourseId = "CIS-120".parse().unwrap();
        assert_eq!(id.department(), "CIS");
        assert_eq!(id.number(), 120);
        assert_eq!(id.to_string(), "CIS-120");

        assert!("CIS120".parse::<CourseId>().is_err());
        assert!("-120".parse::<CourseId>().is_err());
        assert!("CIS-abc".parse::<CourseId>().is_err());
    }

    #[test]
    fn test_catalog_entry_with_both_prerequisite_forms() {
        let json = serde_json::json!([
            {
                "dept": "CIS", "number": 121, "title": "Data Structures",
                "description": "Trees and graphs",
                "prereqs": ["CIS-120", "CIS-160"],
                "cross-listed": ["NETS-121"]
            },
            {
                "dept": "CIS", "number": 380, "title": "Operating Systems",
                "description": "Kernels", "prereqs": "Junior standing"
            }
        ]);
        let entries: Vec<CatalogEntry> = serde_json::from_value(json).unwrap();

        assert_eq!(
            entries[0].prereqs,
            Some(Prerequisites::CourseList(vec![
                "CIS-120".to_string(),
                "CIS-160".to_string()
            ]))
        );
        assert_eq!(entries[0].cross_listed.as_ref().unwrap()[0], "NETS-121");
        assert_eq!(
            entries[1].prereqs,
            Some(Prerequisites::FreeText("Junior standing".to_string()))
        );
        assert_eq!(entries[1].id().to_string(), "CIS-380");
    }

    #[test]
    fn test_rating_record_rounding_and_title() {
        let record: RatingRecord = serde_json::from_value(serde_json::json!({
            "id": "CIS-120",
            "title": "  ",
            "course_quality": 2.876,
            "difficulty": null
        }))
        .unwrap();

        assert!(!record.has_title());
        let rounded = record.rounded();
        assert_eq!(rounded.course_quality, Some(2.88));
        assert_eq!(rounded.difficulty, None);
    }
}
