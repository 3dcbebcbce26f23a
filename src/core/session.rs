use crate::core::aggregate::CheckoutSummary;
use crate::core::cart::{AddOutcome, Cart, DragUpdate};
use crate::core::drag::Bounds;
use crate::core::filter::{visible_courses, FilterState, LevelBucket, SortKey};
use crate::core::notice::{
    Notifier, CART_LIMIT_DURATION, CART_LIMIT_MESSAGE, CONFIRMED_DURATION, CONFIRMED_MESSAGE,
};
use crate::core::reconcile::{reconcile, records_from_catalog, Catalog};
use crate::domain::model::{CourseId, CourseRecord, RatingRecord};
use crate::utils::error::{CartError, Result};
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingsState {
    Loading,
    Ready,
}

/// 結帳時購物車含有本學期未開課程，須由使用者確認
pub trait ConfirmPrompt {
    fn confirm_unavailable(&mut self, unavailable: &[String]) -> bool;
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfirmOutcome {
    Confirmed(CheckoutSummary),
    Declined,
    EmptyCart,
    /// 評分尚未載入，無法判斷哪些課程本學期未開
    RatingsLoading,
}

/// 使用者操作
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SetSearch(String),
    ToggleBucket(LevelBucket),
    SelectSort(SortKey),
    ToggleView,
    Add(CourseId),
    Remove(CourseId),
    DragStart(CourseId),
    DragOver {
        target: CourseId,
        pointer_y: f64,
        target_bounds: Bounds,
        viewport: Bounds,
    },
    Drop,
    CancelDrag,
    ClearCart,
    ConfirmCheckout,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    Updated,
    Added(AddOutcome),
    Removed(bool),
    Dragged(DragUpdate),
    Checkout(ConfirmOutcome),
}

/// 應用程式唯一的可變狀態；所有修改都經由具名操作。
pub struct Session {
    catalog: Catalog,
    records: Vec<CourseRecord>,
    ratings: RatingsState,
    cart: Cart,
    filter: FilterState,
    notifier: Notifier,
}

impl Session {
    pub fn new(catalog: Catalog) -> Self {
        let records = records_from_catalog(&catalog);
        Self {
            catalog,
            records,
            ratings: RatingsState::Loading,
            cart: Cart::new(),
            filter: FilterState::default(),
            notifier: Notifier::new(),
        }
    }

    /// 套用評分抓取結果，購物車中的課程一併更新
    pub fn apply_ratings(&mut self, ratings: Vec<RatingRecord>) {
        self.records = reconcile(&self.catalog, ratings);
        self.cart.refresh_records(&self.records);
        self.ratings = RatingsState::Ready;
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn records(&self) -> &[CourseRecord] {
        &self.records
    }

    pub fn record(&self, id: &CourseId) -> Option<&CourseRecord> {
        self.records.iter().find(|r| &r.id == id)
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn ratings_state(&self) -> RatingsState {
        self.ratings
    }

    pub fn is_loading(&self) -> bool {
        self.ratings == RatingsState::Loading
    }

    pub fn visible(&self) -> Vec<CourseRecord> {
        visible_courses(&self.records, self.cart.entries(), &self.filter)
    }

    pub fn notification(&self) -> Option<&str> {
        self.notifier.visible(Instant::now())
    }

    pub fn tick(&mut self) {
        self.notifier.tick(Instant::now());
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.filter.search_text = text.into();
    }

    pub fn toggle_bucket(&mut self, bucket: LevelBucket) {
        self.filter.toggle_bucket(bucket);
    }

    pub fn select_sort(&mut self, key: SortKey) {
        self.filter.sort_key = self.filter.sort_key.toggle(key);
    }

    pub fn toggle_view(&mut self) {
        self.filter.view_mode = self.filter.view_mode.toggled();
    }

    pub fn add(&mut self, id: &CourseId) -> Result<AddOutcome> {
        let record = self
            .record(id)
            .cloned()
            .ok_or_else(|| CartError::InvalidCourseId {
                value: id.to_string(),
                reason: "not in the catalog".to_string(),
            })?;

        let outcome = self.cart.add(record);
        if outcome == AddOutcome::LimitExceeded {
            tracing::info!("Cart is full, refusing {}", id);
            self.notifier
                .show(CART_LIMIT_MESSAGE, CART_LIMIT_DURATION, Instant::now());
        }
        Ok(outcome)
    }

    pub fn remove(&mut self, id: &CourseId) -> bool {
        self.cart.remove(id)
    }

    pub fn clear_cart(&mut self) {
        self.cart.clear();
    }

    /// 依代號清單還原購物車，回傳找不到的代號
    pub fn restore_cart(&mut self, ids: &[CourseId]) -> Vec<CourseId> {
        let (cart, missing) = Cart::from_ids(ids, &self.records);
        self.cart = cart;
        missing
    }

    pub fn drag_start(&mut self, id: &CourseId) -> bool {
        self.cart.drag_start(id)
    }

    pub fn drag_over(
        &mut self,
        target: &CourseId,
        pointer_y: f64,
        target_bounds: Bounds,
        viewport: Bounds,
    ) -> DragUpdate {
        self.cart
            .drag_over(target, pointer_y, target_bounds, viewport)
    }

    pub fn drop_dragged(&mut self) {
        self.cart.drop_dragged();
    }

    pub fn cancel_drag(&mut self) {
        self.cart.cancel_drag();
    }

    pub fn checkout_summary(&self) -> CheckoutSummary {
        CheckoutSummary::new(self.cart.entries())
    }

    /// 確認選課。含有未開課程時先詢問，拒絕則不改變任何狀態。
    /// 評分仍在載入時不確認。
    pub fn confirm_checkout(&mut self, prompt: &mut dyn ConfirmPrompt) -> ConfirmOutcome {
        if self.cart.is_empty() {
            return ConfirmOutcome::EmptyCart;
        }
        if self.is_loading() {
            tracing::info!("Checkout deferred until ratings are loaded");
            return ConfirmOutcome::RatingsLoading;
        }

        let summary = self.checkout_summary();
        if summary.has_unavailable && !prompt.confirm_unavailable(&summary.unavailable_ids()) {
            tracing::info!("Checkout declined by user");
            return ConfirmOutcome::Declined;
        }

        tracing::info!("✅ Course selection confirmed ({} courses)", summary.entries.len());
        self.notifier
            .show(CONFIRMED_MESSAGE, CONFIRMED_DURATION, Instant::now());
        ConfirmOutcome::Confirmed(summary)
    }

    pub fn dispatch(
        &mut self,
        action: Action,
        prompt: &mut dyn ConfirmPrompt,
    ) -> Result<ActionOutcome> {
        let outcome = match action {
            Action::SetSearch(text) => {
                self.set_search(text);
                ActionOutcome::Updated
            }
            Action::ToggleBucket(bucket) => {
                self.toggle_bucket(bucket);
                ActionOutcome::Updated
            }
            Action::SelectSort(key) => {
                self.select_sort(key);
                ActionOutcome::Updated
            }
            Action::ToggleView => {
                self.toggle_view();
                ActionOutcome::Updated
            }
            Action::Add(id) => ActionOutcome::Added(self.add(&id)?),
            Action::Remove(id) => ActionOutcome::Removed(self.remove(&id)),
            Action::DragStart(id) => {
                self.drag_start(&id);
                ActionOutcome::Updated
            }
            Action::DragOver {
                target,
                pointer_y,
                target_bounds,
                viewport,
            } => ActionOutcome::Dragged(self.drag_over(&target, pointer_y, target_bounds, viewport)),
            Action::Drop => {
                self.drop_dragged();
                ActionOutcome::Updated
            }
            Action::CancelDrag => {
                self.cancel_drag();
                ActionOutcome::Updated
            }
            Action::ClearCart => {
                self.clear_cart();
                ActionOutcome::Updated
            }
            Action::ConfirmCheckout => ActionOutcome::Checkout(self.confirm_checkout(prompt)),
        };
        Ok(outcome)
    }
}
