use crate::domain::model::{CatalogEntry, CourseId, CourseRecord, RatingRecord};
use crate::utils::error::{CartError, Result};
use std::collections::{HashMap, HashSet};

/// 已驗證的靜態課程目錄，載入後不可變
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// 拒絕重複的課程代號
    pub fn new(entries: Vec<CatalogEntry>) -> Result<Self> {
        let mut seen = HashSet::new();
        for entry in &entries {
            let id = entry.id();
            if !seen.insert(id.clone()) {
                return Err(CartError::CatalogError {
                    message: format!("duplicate catalog entry {}", id),
                });
            }
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn ids(&self) -> Vec<CourseId> {
        self.entries.iter().map(CatalogEntry::id).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 評分尚未載入時的課程清單：沒有評分欄位，可用性未知
pub fn records_from_catalog(catalog: &Catalog) -> Vec<CourseRecord> {
    catalog
        .entries()
        .iter()
        .map(|entry| CourseRecord::from_catalog(entry, false))
        .collect()
}

/// 合併目錄與評分資料。
///
/// 輸出依目錄順序；沒有評分的目錄課程標記為 `unavailable`。
/// 目錄中找不到的評分課程附加在最後，保持抓取順序。
/// 沒有標題的評分資料直接捨棄。
pub fn reconcile(catalog: &Catalog, ratings: Vec<RatingRecord>) -> Vec<CourseRecord> {
    let mut by_id: HashMap<CourseId, RatingRecord> = HashMap::with_capacity(ratings.len());
    let mut extra_order = Vec::new();
    let catalog_ids: HashSet<CourseId> = catalog.ids().into_iter().collect();

    for rating in ratings {
        if !rating.has_title() {
            tracing::warn!("Discarding rating record {} without a title", rating.id);
            continue;
        }
        if by_id.contains_key(&rating.id) {
            tracing::warn!("Ignoring duplicate rating record for {}", rating.id);
            continue;
        }
        if !catalog_ids.contains(&rating.id) {
            extra_order.push(rating.id.clone());
        }
        by_id.insert(rating.id.clone(), rating);
    }

    let mut merged = Vec::with_capacity(catalog.len() + extra_order.len());
    let mut unavailable = 0usize;

    for entry in catalog.entries() {
        match by_id.remove(&entry.id()) {
            Some(rating) => merged.push(merge(Some(entry), rating)),
            None => {
                unavailable += 1;
                merged.push(CourseRecord::from_catalog(entry, true));
            }
        }
    }

    for id in extra_order {
        if let Some(rating) = by_id.remove(&id) {
            merged.push(merge(None, rating));
        }
    }

    tracing::debug!(
        "Reconciled {} records ({} unavailable this term)",
        merged.len(),
        unavailable
    );

    merged
}

fn merge(entry: Option<&CatalogEntry>, rating: RatingRecord) -> CourseRecord {
    let description = entry
        .map(|e| e.description.clone())
        .or(rating.description)
        .unwrap_or_default();

    CourseRecord {
        id: rating.id,
        title: rating.title.unwrap_or_default(),
        description,
        prerequisites: entry.and_then(|e| e.prereqs.clone()),
        cross_listed: entry.and_then(|e| e.cross_listed.clone()),
        quality: rating.course_quality,
        difficulty: rating.difficulty,
        workload: rating.work_required,
        unavailable: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Prerequisites;

    fn entry(dept: &str, number: u32, title: &str) -> CatalogEntry {
        CatalogEntry {
            dept: dept.to_string(),
            number,
            title: title.to_string(),
            description: format!("{} description", title),
            prereqs: None,
            cross_listed: None,
        }
    }

    fn rating(id: &str, title: Option<&str>, quality: Option<f64>) -> RatingRecord {
        RatingRecord {
            id: id.parse().unwrap(),
            title: title.map(str::to_string),
            description: None,
            course_quality: quality,
            difficulty: Some(2.0),
            work_required: Some(3.0),
        }
    }

    #[test]
    fn test_catalog_rejects_duplicates() {
        let result = Catalog::new(vec![entry("CIS", 120, "A"), entry("CIS", 120, "B")]);
        assert!(matches!(result, Err(CartError::CatalogError { .. })));
    }

    #[test]
    fn test_every_catalog_entry_survives_reconciliation() {
        let mut with_prereqs = entry("CIS", 121, "Data Structures");
        with_prereqs.prereqs = Some(Prerequisites::CourseList(vec!["CIS-120".to_string()]));
        with_prereqs.cross_listed = Some(vec!["NETS-121".to_string()]);

        let catalog = Catalog::new(vec![
            entry("CIS", 120, "Programming Languages"),
            with_prereqs,
            entry("CIS", 380, "Operating Systems"),
        ])
        .unwrap();

        let merged = reconcile(
            &catalog,
            vec![
                rating("CIS-121", Some("Data Structures"), Some(3.1)),
                rating("CIS-380", None, Some(2.0)),
            ],
        );

        assert_eq!(merged.len(), catalog.len());
        for catalog_entry in catalog.entries() {
            let record = merged.iter().find(|r| r.id == catalog_entry.id()).unwrap();
            assert_eq!(record.unavailable, catalog_entry.number != 121);
        }

        let ds = &merged[1];
        assert_eq!(ds.quality, Some(3.1));
        assert_eq!(ds.cross_listed, Some(vec!["NETS-121".to_string()]));
        assert!(matches!(ds.prerequisites, Some(Prerequisites::CourseList(_))));

        // 沒有標題的評分被捨棄，課程視為本學期未開
        let os = &merged[2];
        assert!(os.unavailable);
        assert_eq!(os.quality, None);
    }

    #[test]
    fn test_unmatched_ratings_are_appended_once() {
        let catalog = Catalog::new(vec![entry("CIS", 120, "Programming Languages")]).unwrap();
        let merged = reconcile(
            &catalog,
            vec![
                rating("MATH-240", Some("Calculus III"), Some(2.5)),
                rating("MATH-240", Some("Calculus III again"), Some(1.0)),
            ],
        );

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].id.to_string(), "CIS-120");
        assert!(merged[0].unavailable);
        assert_eq!(merged[1].title, "Calculus III");
        assert_eq!(merged[1].quality, Some(2.5));
        assert!(!merged[1].unavailable);
    }

    #[test]
    fn test_catalog_records_before_ratings_load() {
        let catalog = Catalog::new(vec![entry("CIS", 120, "Programming Languages")]).unwrap();
        let records = records_from_catalog(&catalog);
        assert_eq!(records.len(), 1);
        assert!(!records[0].unavailable);
        assert_eq!(records[0].quality, None);
    }
}
