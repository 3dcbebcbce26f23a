//! 購物車拖曳排序的幾何計算。
//!
//! 座標皆為畫面上的垂直像素位置；列表內容可在固定高度的視窗中捲動。

/// 指標距離視窗上下緣多少像素內觸發自動捲動
pub const AUTOSCROLL_MARGIN: f64 = 60.0;
/// 每次指標移動事件的捲動量
pub const AUTOSCROLL_STEP: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub top: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn midpoint(&self) -> f64 {
        self.top + self.height / 2.0
    }

    pub fn contains(&self, y: f64) -> bool {
        y >= self.top && y < self.bottom()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Up,
    Down,
}

/// 判斷拖曳項目是否移到目標位置。
///
/// 以目標項目的垂直中線為門檻：往上拖必須越過中線上方，往下拖必須越過中線下方。
/// 只看是否落在目標範圍內的話，兩個相鄰項目會來回互換。
pub fn target_slot(
    dragged_index: usize,
    target_index: usize,
    pointer_y: f64,
    target: Bounds,
) -> Option<usize> {
    let midpoint = target.midpoint();
    let move_up = dragged_index > target_index && pointer_y < midpoint;
    let move_down = dragged_index < target_index && pointer_y > midpoint;

    if move_up || move_down {
        Some(target_index)
    } else {
        None
    }
}

/// 指標靠近視窗邊緣時的捲動方向，與是否移動項目無關
pub fn autoscroll(pointer_y: f64, viewport: Bounds) -> Option<ScrollDirection> {
    if pointer_y < viewport.top + AUTOSCROLL_MARGIN {
        Some(ScrollDirection::Up)
    } else if pointer_y > viewport.bottom() - AUTOSCROLL_MARGIN {
        Some(ScrollDirection::Down)
    } else {
        None
    }
}

/// 等高列表的版面：負責指標命中測試與捲動位置
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ListLayout {
    pub row_height: f64,
    pub viewport: Bounds,
    pub scroll_offset: f64,
}

impl ListLayout {
    pub fn new(row_height: f64, viewport: Bounds) -> Self {
        Self {
            row_height,
            viewport,
            scroll_offset: 0.0,
        }
    }

    pub fn row_bounds(&self, index: usize) -> Bounds {
        let top = self.viewport.top + index as f64 * self.row_height - self.scroll_offset;
        Bounds::new(top, self.row_height)
    }

    /// 指標所在的列與其範圍；視窗外或列表末端之後回傳 None
    pub fn hit_test(&self, pointer_y: f64, rows: usize) -> Option<(usize, Bounds)> {
        if !self.viewport.contains(pointer_y) || self.row_height <= 0.0 {
            return None;
        }
        let offset = pointer_y - self.viewport.top + self.scroll_offset;
        let index = (offset / self.row_height).floor() as usize;
        (index < rows).then(|| (index, self.row_bounds(index)))
    }

    pub fn max_scroll(&self, rows: usize) -> f64 {
        (rows as f64 * self.row_height - self.viewport.height).max(0.0)
    }

    pub fn scroll(&mut self, direction: ScrollDirection, rows: usize) {
        let next = match direction {
            ScrollDirection::Up => self.scroll_offset - AUTOSCROLL_STEP,
            ScrollDirection::Down => self.scroll_offset + AUTOSCROLL_STEP,
        };
        self.scroll_offset = next.clamp(0.0, self.max_scroll(rows));
    }
}
