use crate::sync::WaitStrategy;

/// Construction-time settings for a [`RingQueue`](crate::RingQueue).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueConfig {
    /// How lock waiters pass the time between attempts.
    pub wait: WaitStrategy,
    /// Name used in log lines, to tell queues apart.
    pub label: &'static str,
}

impl QueueConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_wait(mut self, wait: WaitStrategy) -> Self {
        self.wait = wait;
        self
    }

    pub fn with_label(mut self, label: &'static str) -> Self {
        self.label = label;
        self
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            wait: WaitStrategy::Spin,
            label: "ring_queue",
        }
    }
}
