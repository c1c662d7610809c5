//! Interstitial ad gate: decides when a "calculate" press should be followed
//! by an interstitial. Showing the ad itself is the caller's job.

use serde::{Deserialize, Serialize};

/// Presses between two interstitials.
pub const DEFAULT_CLICKS_BEFORE_AD: u32 = 2;

/// What the caller should do after a press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateDecision {
    /// Threshold not reached yet.
    Wait,
    /// Threshold reached and an ad is loaded: show it.
    Show,
    /// Threshold reached but no ad is loaded: request a new one.
    NotReady,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickProgress {
    pub current: u32,
    pub total: u32,
    pub remaining: u32,
}

/// In-memory press counter with an explicit threshold.
///
/// Owned by whoever drives the screens; nothing is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterstitialGate {
    clicks: u32,
    threshold: u32,
}

impl Default for InterstitialGate {
    fn default() -> Self {
        Self::new(DEFAULT_CLICKS_BEFORE_AD)
    }
}

impl InterstitialGate {
    /// A threshold of 0 is treated as 1 (an ad after every press).
    pub fn new(threshold: u32) -> Self {
        InterstitialGate {
            clicks: 0,
            threshold: threshold.max(1),
        }
    }

    /// Register one "calculate" press. The counter restarts from 0 whenever
    /// the threshold is reached, whether or not an ad could be shown.
    pub fn on_calculate(&mut self, ad_ready: bool) -> GateDecision {
        self.clicks += 1;
        tracing::debug!(clicks = self.clicks, threshold = self.threshold, "calculate pressed");

        if self.clicks < self.threshold {
            return GateDecision::Wait;
        }

        self.clicks = 0;
        if ad_ready {
            GateDecision::Show
        } else {
            tracing::info!("interstitial due but not loaded");
            GateDecision::NotReady
        }
    }

    pub fn progress(&self) -> ClickProgress {
        ClickProgress {
            current: self.clicks,
            total: self.threshold,
            remaining: self.threshold - self.clicks,
        }
    }

    pub fn reset(&mut self) {
        self.clicks = 0;
    }
}
