use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Time-derived subscriber ID generator.
///
/// IDs are milliseconds since the Unix epoch. Two requests landing in the same
/// millisecond are bumped past the last issued value, so IDs from one generator
/// are strictly increasing and never collide within a process run.
pub struct ClientIdGenerator {
    last: AtomicU64,
}

impl ClientIdGenerator {
    pub fn new() -> Self {
        Self {
            last: AtomicU64::new(0),
        }
    }

    pub fn generate(&self) -> u64 {
        let now_ms = current_ms();
        let mut last = self.last.load(Ordering::Acquire);
        loop {
            let next = now_ms.max(last + 1);
            match self
                .last
                .compare_exchange_weak(last, next, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => return next,
                Err(actual) => last = actual,
            }
        }
    }
}

impl Default for ClientIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn current_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
