use crate::core::drag::{self, Bounds, ScrollDirection};
use crate::domain::model::{CourseId, CourseRecord};

pub const CART_CAPACITY: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    AlreadyInCart,
    LimitExceeded,
}

/// 一次指標移動事件的處理結果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DragUpdate {
    pub moved: bool,
    pub scroll: Option<ScrollDirection>,
}

/// 有上限、依使用者偏好排序的課程清單。
///
/// 排序操作只改變順序，不修改課程內容。
#[derive(Debug, Clone, Default)]
pub struct Cart {
    entries: Vec<CourseRecord>,
    dragging: Option<CourseId>,
    /// 拖曳開始前的順序，取消時還原
    drag_origin: Vec<CourseId>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// 依代號順序重建購物車；回傳找不到的代號
    pub fn from_ids(ids: &[CourseId], records: &[CourseRecord]) -> (Self, Vec<CourseId>) {
        let mut cart = Cart::new();
        let mut missing = Vec::new();

        for id in ids {
            match records.iter().find(|r| &r.id == id) {
                Some(record) => {
                    if cart.add(record.clone()) == AddOutcome::LimitExceeded {
                        tracing::warn!("Cart limit reached while restoring, skipping {}", id);
                    }
                }
                None => missing.push(id.clone()),
            }
        }

        (cart, missing)
    }

    pub fn entries(&self) -> &[CourseRecord] {
        &self.entries
    }

    pub fn ids(&self) -> Vec<CourseId> {
        self.entries.iter().map(|e| e.id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= CART_CAPACITY
    }

    pub fn contains(&self, id: &CourseId) -> bool {
        self.position(id).is_some()
    }

    pub fn position(&self, id: &CourseId) -> Option<usize> {
        self.entries.iter().position(|e| &e.id == id)
    }

    pub fn add(&mut self, record: CourseRecord) -> AddOutcome {
        if self.contains(&record.id) {
            return AddOutcome::AlreadyInCart;
        }
        if self.is_full() {
            return AddOutcome::LimitExceeded;
        }
        tracing::debug!("Adding {} to cart", record.id);
        self.entries.push(record);
        AddOutcome::Added
    }

    pub fn remove(&mut self, id: &CourseId) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };
        self.entries.remove(index);
        self.end_drag();
        true
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.end_drag();
    }

    /// 以新的評分資料替換購物車內容，順序不變
    pub(crate) fn refresh_records(&mut self, records: &[CourseRecord]) {
        for entry in &mut self.entries {
            if let Some(fresh) = records.iter().find(|r| r.id == entry.id) {
                *entry = fresh.clone();
            }
        }
    }

    pub fn dragging(&self) -> Option<&CourseId> {
        self.dragging.as_ref()
    }

    pub fn drag_start(&mut self, id: &CourseId) -> bool {
        if !self.contains(id) {
            return false;
        }
        self.dragging = Some(id.clone());
        self.drag_origin = self.ids();
        true
    }

    /// 處理拖曳中的指標移動事件。
    ///
    /// `target` 是指標下方的購物車項目，`target_bounds` 是它的畫面範圍，
    /// `viewport` 是列表可見區域。同一事件重複處理不會再次移動。
    pub fn drag_over(
        &mut self,
        target: &CourseId,
        pointer_y: f64,
        target_bounds: Bounds,
        viewport: Bounds,
    ) -> DragUpdate {
        let scroll = drag::autoscroll(pointer_y, viewport);

        let Some(dragged) = self.dragging.as_ref() else {
            return DragUpdate {
                moved: false,
                scroll: None,
            };
        };
        let (Some(dragged_index), Some(target_index)) =
            (self.position(dragged), self.position(target))
        else {
            return DragUpdate {
                moved: false,
                scroll,
            };
        };

        let moved = match drag::target_slot(dragged_index, target_index, pointer_y, target_bounds)
        {
            Some(slot) => {
                let entry = self.entries.remove(dragged_index);
                self.entries.insert(slot, entry);
                true
            }
            None => false,
        };

        DragUpdate { moved, scroll }
    }

    /// 放開時不再調整順序，移動已在拖曳過程中完成
    pub fn drop_dragged(&mut self) {
        self.end_drag();
    }

    /// 中止拖曳並還原拖曳前的順序
    pub fn cancel_drag(&mut self) {
        if self.dragging.is_none() {
            return;
        }
        let origin = std::mem::take(&mut self.drag_origin);
        self.entries.sort_by_key(|e| {
            origin
                .iter()
                .position(|id| id == &e.id)
                .unwrap_or(usize::MAX)
        });
        self.dragging = None;
    }

    fn end_drag(&mut self) {
        self.dragging = None;
        self.drag_origin.clear();
    }
}
