use chrono::{DateTime, Utc};

/// Source of "now" for timestamps written to endpoint records.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Test clock that advances one second on every read.
#[cfg(test)]
pub(crate) struct StepClock {
    ticks: std::sync::atomic::AtomicI64,
    start: DateTime<Utc>,
}

#[cfg(test)]
impl StepClock {
    pub(crate) fn new() -> Self {
        Self {
            ticks: std::sync::atomic::AtomicI64::new(0),
            start: Utc::now(),
        }
    }
}

#[cfg(test)]
impl Clock for StepClock {
    fn now(&self) -> DateTime<Utc> {
        let tick = self
            .ticks
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        self.start + chrono::Duration::seconds(tick)
    }
}
