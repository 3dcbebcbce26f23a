use crate::domain::model::{CourseRecord, Metric};
use std::cmp::Ordering;

/// 缺少難度或工作量評分時的排序值，讓未評分課程排在最後
const MISSING_LOW_IS_GOOD: f64 = 5.0;
const MISSING_HIGH_IS_GOOD: f64 = 0.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    Number,
    Quality,
    Difficulty,
    Workload,
    #[default]
    None,
}

impl SortKey {
    /// 單選按鈕行為：再次選擇目前的排序鍵會取消排序
    pub fn toggle(self, selected: SortKey) -> SortKey {
        if self == selected {
            SortKey::None
        } else {
            selected
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "number" => Some(SortKey::Number),
            "quality" => Some(SortKey::Quality),
            "difficulty" => Some(SortKey::Difficulty),
            "workload" | "work" => Some(SortKey::Workload),
            "none" => Some(SortKey::None),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Catalog,
    CartOnly,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Catalog => ViewMode::CartOnly,
            ViewMode::CartOnly => ViewMode::Catalog,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelBucket {
    Intro,
    Regular,
    Upper,
}

impl LevelBucket {
    pub const ALL: [LevelBucket; 3] = [LevelBucket::Intro, LevelBucket::Regular, LevelBucket::Upper];

    pub fn index(self) -> usize {
        match self {
            LevelBucket::Intro => 0,
            LevelBucket::Regular => 1,
            LevelBucket::Upper => 2,
        }
    }

    pub fn of(number: u32) -> Self {
        match number {
            0..=199 => LevelBucket::Intro,
            200..=299 => LevelBucket::Regular,
            _ => LevelBucket::Upper,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LevelBucket::Intro => "Intro (100 - 199)",
            LevelBucket::Regular => "Regular (200-299)",
            LevelBucket::Upper => "Upper Level (300+)",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "intro" => Some(LevelBucket::Intro),
            "regular" => Some(LevelBucket::Regular),
            "upper" => Some(LevelBucket::Upper),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterState {
    pub search_text: String,
    pub level_buckets: [bool; 3],
    pub sort_key: SortKey,
    pub view_mode: ViewMode,
}

impl FilterState {
    pub fn toggle_bucket(&mut self, bucket: LevelBucket) {
        let slot = &mut self.level_buckets[bucket.index()];
        *slot = !*slot;
    }

    pub fn bucket_active(&self, bucket: LevelBucket) -> bool {
        self.level_buckets[bucket.index()]
    }

    fn matches_text(&self, record: &CourseRecord) -> bool {
        let needle = self.search_text.as_str();
        needle.is_empty()
            || record.title.contains(needle)
            || record.description.contains(needle)
            || record.id.to_string().contains(needle)
    }

    fn matches_bucket(&self, record: &CourseRecord) -> bool {
        // 沒有勾選任何等級時不篩選
        if !self.level_buckets.iter().any(|active| *active) {
            return true;
        }
        self.bucket_active(LevelBucket::of(record.id.number()))
    }
}

/// 依檢視模式選擇來源，排序後套用文字與等級篩選。不修改輸入。
pub fn visible_courses(
    catalog: &[CourseRecord],
    cart: &[CourseRecord],
    state: &FilterState,
) -> Vec<CourseRecord> {
    let source = match state.view_mode {
        ViewMode::Catalog => catalog,
        ViewMode::CartOnly => cart,
    };

    let mut ordered: Vec<&CourseRecord> = source.iter().collect();
    sort_records(&mut ordered, state.sort_key);

    ordered
        .into_iter()
        .filter(|record| state.matches_text(record))
        .filter(|record| state.matches_bucket(record))
        .cloned()
        .collect()
}

/// 穩定排序，`SortKey::None` 保留原順序
pub fn sort_records(records: &mut [&CourseRecord], key: SortKey) {
    match key {
        SortKey::None => {}
        SortKey::Number => records.sort_by_key(|r| r.id.number()),
        SortKey::Quality => records.sort_by(|a, b| descending(a, b, Metric::Quality)),
        SortKey::Difficulty => records.sort_by(|a, b| ascending(a, b, Metric::Difficulty)),
        SortKey::Workload => records.sort_by(|a, b| ascending(a, b, Metric::Workload)),
    }
}

fn ascending(a: &CourseRecord, b: &CourseRecord, metric: Metric) -> Ordering {
    let a = a.metric(metric).unwrap_or(MISSING_LOW_IS_GOOD);
    let b = b.metric(metric).unwrap_or(MISSING_LOW_IS_GOOD);
    a.total_cmp(&b)
}

fn descending(a: &CourseRecord, b: &CourseRecord, metric: Metric) -> Ordering {
    let a = a.metric(metric).unwrap_or(MISSING_HIGH_IS_GOOD);
    let b = b.metric(metric).unwrap_or(MISSING_HIGH_IS_GOOD);
    b.total_cmp(&a)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::CourseId;

    fn record(dept: &str, number: u32, title: &str) -> CourseRecord {
        CourseRecord {
            id: CourseId::new(dept, number),
            title: title.to_string(),
            description: format!("About {}", title.to_lowercase()),
            prerequisites: None,
            cross_listed: None,
            quality: None,
            difficulty: None,
            workload: None,
            unavailable: false,
        }
    }

    fn ids(records: &[CourseRecord]) -> Vec<String> {
        records.iter().map(|r| r.id.to_string()).collect()
    }

    fn sample() -> Vec<CourseRecord> {
        let mut a = record("CIS", 380, "Operating Systems");
        a.difficulty = Some(3.5);
        a.quality = Some(2.9);
        let b = record("CIS", 120, "Programming Languages");
        let mut c = record("CIS", 240, "Computer Organization");
        c.difficulty = Some(1.0);
        c.quality = Some(3.4);
        vec![a, b, c]
    }

    #[test]
    fn test_difficulty_sort_puts_unrated_last() {
        let state = FilterState {
            sort_key: SortKey::Difficulty,
            ..Default::default()
        };
        let visible = visible_courses(&sample(), &[], &state);
        assert_eq!(ids(&visible), vec!["CIS-240", "CIS-380", "CIS-120"]);
    }

    #[test]
    fn test_quality_sort_is_descending_with_missing_last() {
        let state = FilterState {
            sort_key: SortKey::Quality,
            ..Default::default()
        };
        let visible = visible_courses(&sample(), &[], &state);
        assert_eq!(ids(&visible), vec!["CIS-240", "CIS-380", "CIS-120"]);
    }

    #[test]
    fn test_number_sort_and_source_order() {
        let records = sample();
        let by_number = FilterState {
            sort_key: SortKey::Number,
            ..Default::default()
        };
        assert_eq!(
            ids(&visible_courses(&records, &[], &by_number)),
            vec!["CIS-120", "CIS-240", "CIS-380"]
        );
        assert_eq!(
            ids(&visible_courses(&records, &[], &FilterState::default())),
            vec!["CIS-380", "CIS-120", "CIS-240"]
        );
    }

    #[test]
    fn test_text_filter_is_case_sensitive_over_title_description_and_id() {
        let records = sample();
        let mut state = FilterState {
            search_text: "Systems".to_string(),
            ..Default::default()
        };
        assert_eq!(ids(&visible_courses(&records, &[], &state)), vec!["CIS-380"]);

        state.search_text = "systems".to_string();
        assert_eq!(ids(&visible_courses(&records, &[], &state)), vec!["CIS-380"]);

        state.search_text = "SYSTEMS".to_string();
        assert!(visible_courses(&records, &[], &state).is_empty());

        state.search_text = "CIS-24".to_string();
        assert_eq!(ids(&visible_courses(&records, &[], &state)), vec!["CIS-240"]);
    }

    #[test]
    fn test_level_buckets_are_inclusive_by_default() {
        let records = sample();
        let mut state = FilterState::default();
        assert_eq!(visible_courses(&records, &[], &state).len(), 3);

        state.toggle_bucket(LevelBucket::Intro);
        assert_eq!(ids(&visible_courses(&records, &[], &state)), vec!["CIS-120"]);

        state.toggle_bucket(LevelBucket::Upper);
        assert_eq!(
            ids(&visible_courses(&records, &[], &state)),
            vec!["CIS-380", "CIS-120"]
        );

        state.toggle_bucket(LevelBucket::Intro);
        state.toggle_bucket(LevelBucket::Upper);
        assert_eq!(visible_courses(&records, &[], &state).len(), 3);
    }

    #[test]
    fn test_cart_view_uses_cart_records() {
        let records = sample();
        let cart = vec![records[2].clone()];
        let state = FilterState {
            view_mode: ViewMode::CartOnly,
            ..Default::default()
        };
        assert_eq!(ids(&visible_courses(&records, &cart, &state)), vec!["CIS-240"]);
    }

    #[test]
    fn test_pipeline_is_idempotent() {
        let records = sample();
        let state = FilterState {
            search_text: "o".to_string(),
            level_buckets: [false, true, true],
            sort_key: SortKey::Quality,
            view_mode: ViewMode::Catalog,
        };
        let first = visible_courses(&records, &[], &state);
        let second = visible_courses(&records, &[], &state);
        assert_eq!(first, second);
        assert_eq!(records, sample());
    }

    #[test]
    fn test_sort_key_toggle() {
        assert_eq!(SortKey::None.toggle(SortKey::Quality), SortKey::Quality);
        assert_eq!(SortKey::Quality.toggle(SortKey::Quality), SortKey::None);
        assert_eq!(SortKey::Quality.toggle(SortKey::Number), SortKey::Number);
    }
}
