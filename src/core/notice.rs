use std::time::{Duration, Instant};

pub const CART_LIMIT_MESSAGE: &str = "Cart limit exceeded";
pub const CART_LIMIT_DURATION: Duration = Duration::from_millis(4000);
pub const CONFIRMED_MESSAGE: &str = "Course Selection Confirmed!";
pub const CONFIRMED_DURATION: Duration = Duration::from_millis(3500);

/// 單一則會自動消失的通知。新通知直接取代舊通知並重新計時，不排隊。
#[derive(Debug, Clone, Default)]
pub struct Notifier {
    current: Option<(String, Instant)>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, message: impl Into<String>, duration: Duration, now: Instant) {
        let message = message.into();
        tracing::debug!("Notification: {}", message);
        self.current = Some((message, now + duration));
    }

    /// 在 `now` 時仍應顯示的通知文字
    pub fn visible(&self, now: Instant) -> Option<&str> {
        match &self.current {
            Some((message, expires_at)) if now < *expires_at => Some(message.as_str()),
            _ => None,
        }
    }

    /// 清掉已過期的通知
    pub fn tick(&mut self, now: Instant) {
        if self.visible(now).is_none() {
            self.current = None;
        }
    }
}
