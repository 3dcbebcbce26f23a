use crate::domain::model::{round2, CourseRecord, Metric};

const MID_THRESHOLD: f64 = 2.2;
const HIGH_THRESHOLD: f64 = 3.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Low,
    Mid,
    High,
}

impl Tier {
    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Low => "low",
            Tier::Mid => "mid",
            Tier::High => "high",
        }
    }
}

/// 評分的三段分級。`0` 代表沒有資料，不分級。
pub fn band(value: f64, high_is_good: bool) -> Option<Tier> {
    if value == 0.0 {
        return None;
    }
    let tier = if value < MID_THRESHOLD {
        if high_is_good {
            Tier::Low
        } else {
            Tier::High
        }
    } else if value < HIGH_THRESHOLD {
        Tier::Mid
    } else if high_is_good {
        Tier::High
    } else {
        Tier::Low
    };
    Some(tier)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricAverage {
    pub metric: Metric,
    /// 小數點後兩位；沒有任何評分時為 0
    pub value: f64,
    pub rated: usize,
}

impl MetricAverage {
    pub fn tier(&self) -> Option<Tier> {
        band(self.value, self.metric.high_is_good())
    }
}

/// 只對有該項評分的課程取平均，缺值不計入分子與分母
pub fn average(records: &[CourseRecord], metric: Metric) -> MetricAverage {
    let values: Vec<f64> = records.iter().filter_map(|r| r.metric(metric)).collect();
    let value = if values.is_empty() {
        0.0
    } else {
        round2(values.iter().sum::<f64>() / values.len() as f64)
    };

    MetricAverage {
        metric,
        value,
        rated: values.len(),
    }
}

pub fn averages(records: &[CourseRecord]) -> [MetricAverage; 3] {
    Metric::ALL.map(|metric| average(records, metric))
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutSummary {
    pub entries: Vec<CourseRecord>,
    pub averages: [MetricAverage; 3],
    pub has_unavailable: bool,
}

impl CheckoutSummary {
    pub fn new(entries: &[CourseRecord]) -> Self {
        Self {
            entries: entries.to_vec(),
            averages: averages(entries),
            has_unavailable: entries.iter().any(|e| e.unavailable),
        }
    }

    /// 依偏好順序編號，例如 `1. CIS 120: Programming Languages`
    pub fn numbered_titles(&self) -> Vec<String> {
        self.entries
            .iter()
            .enumerate()
            .map(|(index, e)| {
                format!(
                    "{}. {} {}: {}",
                    index + 1,
                    e.id.department(),
                    e.id.number(),
                    e.title
                )
            })
            .collect()
    }

    pub fn unavailable_ids(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|e| e.unavailable)
            .map(|e| e.id.to_string())
            .collect()
    }
}
