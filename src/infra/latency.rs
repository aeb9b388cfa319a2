//! Optional simulated network latency for the listing store.
//!
//! The original demo delayed every data call by a small random interval to
//! make perceived load time visible. The delay is an injectable policy on the
//! store adapter so the domain layer stays synchronous; it is disabled by
//! default and in tests.

use std::time::Duration;

use rand::Rng;

use crate::config::{DelayBounds, LatencySettings};

/// Operation classes with distinct delay windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpClass {
    /// Filtered list queries.
    List,
    /// Single-record lookups.
    Detail,
    /// Id enumeration and stats.
    Summary,
}

#[derive(Debug, Clone)]
pub enum DelayPolicy {
    Disabled,
    Simulated {
        list: DelayBounds,
        detail: DelayBounds,
        summary: DelayBounds,
    },
}

impl DelayPolicy {
    pub fn from_settings(settings: &LatencySettings) -> Self {
        if settings.enabled {
            Self::Simulated {
                list: settings.list,
                detail: settings.detail,
                summary: settings.summary,
            }
        } else {
            Self::Disabled
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Simulated { .. })
    }

    /// Sample a delay for the operation class, or `None` when disabled.
    pub fn sample(&self, op: OpClass) -> Option<Duration> {
        let bounds = match self {
            Self::Disabled => return None,
            Self::Simulated {
                list,
                detail,
                summary,
            } => match op {
                OpClass::List => list,
                OpClass::Detail => detail,
                OpClass::Summary => summary,
            },
        };

        let min = bounds.min.as_millis() as u64;
        let max = bounds.max.as_millis() as u64;
        let millis = if min >= max {
            min
        } else {
            rand::thread_rng().gen_range(min..=max)
        };
        Some(Duration::from_millis(millis))
    }

    pub async fn apply(&self, op: OpClass) {
        if let Some(delay) = self.sample(op) {
            tokio::time::sleep(delay).await;
        }
    }
}
