//! Broadcast channel for congestion refreshes.
//!
//! Every successful refresh is published here; subscribers (the SSE stream)
//! each get their own receiver. Slow subscribers lose old events rather
//! than holding up publishers.

use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::map::{CongestionReport, PathCongestion};
use crate::algorithms::CongestionLevel;

pub const DEFAULT_FEED_CAPACITY: usize = 64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CongestionEvent {
    pub level: CongestionLevel,
    pub value: f64,
    pub paths: Vec<PathCongestion>,
    pub measured_at: DateTime<Utc>,
}

impl CongestionEvent {
    pub fn from_report(report: &CongestionReport) -> Self {
        Self {
            level: report.level,
            value: report.value,
            paths: report.paths.clone(),
            measured_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CongestionFeed {
    sender: broadcast::Sender<CongestionEvent>,
}

impl CongestionFeed {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CongestionEvent> {
        self.sender.subscribe()
    }

    /// Publish an event. Returns how many subscribers received it.
    pub fn publish(&self, event: CongestionEvent) -> usize {
        match self.sender.send(event) {
            Ok(receivers) => receivers,
            Err(_) => {
                debug!("Congestion event dropped: no subscribers");
                0
            }
        }
    }

    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for CongestionFeed {
    fn default() -> Self {
        Self::new(DEFAULT_FEED_CAPACITY)
    }
}
