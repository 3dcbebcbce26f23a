use crate::core::aggregate::{band, Tier};
use crate::domain::model::{CourseRecord, Metric, Prerequisites};

pub const LOADING_PLACEHOLDER: &str = "Loading...";

/// 單一課程某項評分的顯示內容
#[derive(Debug, Clone, PartialEq)]
pub enum RatingDisplay {
    Loading,
    NoReports,
    Value { value: f64, tier: Option<Tier> },
}

pub fn rating_display(record: &CourseRecord, metric: Metric, loading: bool) -> RatingDisplay {
    if loading {
        return RatingDisplay::Loading;
    }
    match record.metric(metric) {
        Some(value) => RatingDisplay::Value {
            value,
            tier: band(value, metric.high_is_good()),
        },
        None => RatingDisplay::NoReports,
    }
}

pub fn prerequisites_text(prerequisites: &Prerequisites) -> String {
    match prerequisites {
        Prerequisites::FreeText(text) => text.clone(),
        Prerequisites::CourseList(ids) => ids.join(", "),
    }
}

pub fn cross_listed_text(record: &CourseRecord) -> Option<String> {
    record
        .cross_listed
        .as_ref()
        .filter(|ids| !ids.is_empty())
        .map(|ids| format!("Cross listed as: {}", ids.join(", ")))
}

/// 一行評分摘要，例如 `Course Quality: 3.10 [mid] | Difficulty: 2.00 [mid]`
pub fn ratings_line(record: &CourseRecord, loading: bool) -> String {
    if loading {
        return LOADING_PLACEHOLDER.to_string();
    }
    if record.unavailable {
        return "Unavailable this term".to_string();
    }

    let parts: Vec<String> = Metric::ALL
        .iter()
        .filter_map(|metric| match rating_display(record, *metric, false) {
            RatingDisplay::Value { value, tier } => Some(match tier {
                Some(tier) => format!("{}: {:.2} [{}]", metric.label(), value, tier.as_str()),
                None => format!("{}: {:.2}", metric.label(), value),
            }),
            _ => None,
        })
        .collect();

    if parts.is_empty() {
        "No reviews".to_string()
    } else {
        parts.join(" | ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::CourseId;

    fn record() -> CourseRecord {
        CourseRecord {
            id: CourseId::new("CIS", 121),
            title: "Data Structures".to_string(),
            description: String::new(),
            prerequisites: Some(Prerequisites::CourseList(vec![
                "CIS-120".to_string(),
                "CIS-160".to_string(),
            ])),
            cross_listed: Some(vec!["NETS-121".to_string()]),
            quality: Some(3.1),
            difficulty: Some(3.5),
            workload: None,
            unavailable: false,
        }
    }

    #[test]
    fn test_prerequisite_forms_render_distinctly() {
        assert_eq!(
            prerequisites_text(&record().prerequisites.unwrap()),
            "CIS-120, CIS-160"
        );
        assert_eq!(
            prerequisites_text(&Prerequisites::FreeText("CIS-120, or permission".to_string())),
            "CIS-120, or permission"
        );
    }

    #[test]
    fn test_ratings_line() {
        let course = record();
        assert_eq!(
            ratings_line(&course, false),
            "Course Quality: 3.10 [mid] | Difficulty: 3.50 [low]"
        );
        assert_eq!(ratings_line(&course, true), LOADING_PLACEHOLDER);
        assert_eq!(
            rating_display(&course, Metric::Workload, false),
            RatingDisplay::NoReports
        );
        assert_eq!(
            cross_listed_text(&course).as_deref(),
            Some("Cross listed as: NETS-121")
        );
    }
}
