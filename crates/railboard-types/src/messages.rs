use chrono::{DateTime, Duration, Utc};

/// A transient notification shown by the board's message surface.
/// Never persisted; lifecycle is owned by the [`MessageFeed`] that created it.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageItem {
    pub message: String,
    pub time: DateTime<Utc>,
    /// Sticky items are exempt from auto-dismissal.
    pub sticky: bool,
}

/// In-memory notification surface. Non-sticky items are dropped once they
/// age past the feed's time-to-live; sticky items stay until dismissed.
#[derive(Debug)]
pub struct MessageFeed {
    ttl: Duration,
    items: Vec<MessageItem>,
}

impl MessageFeed {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            items: Vec::new(),
        }
    }

    pub fn push(&mut self, message: impl Into<String>, sticky: bool, now: DateTime<Utc>) {
        self.items.push(MessageItem {
            message: message.into(),
            time: now,
            sticky,
        });
    }

    /// Drop non-sticky items older than the feed's TTL.
    pub fn prune(&mut self, now: DateTime<Utc>) {
        let ttl = self.ttl;
        self.items.retain(|item| item.sticky || now - item.time < ttl);
    }

    /// Dismiss everything, sticky items included.
    pub fn dismiss_all(&mut self) {
        self.items.clear();
    }

    pub fn items(&self) -> &[MessageItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
