// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use glint_core::haptics::HapticKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Delay between pulses when a pattern does not specify one.
pub const DEFAULT_PATTERN_INTERVAL_MS: f64 = 50.0;

/// Longest accepted delay between pulses.
pub const MAX_PATTERN_INTERVAL_MS: f64 = 10_000.0;

/// A sequence of identical pulses.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HapticPattern {
    /// The pulse to play.
    pub kind: HapticKind,
    /// Number of pulses. `None` plays one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat: Option<u32>,
    /// Milliseconds between pulses. `None` uses [`DEFAULT_PATTERN_INTERVAL_MS`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval_ms: Option<f64>,
}

impl HapticPattern {
    /// A single pulse of `kind`.
    pub const fn single(kind: HapticKind) -> Self {
        Self {
            kind,
            repeat: None,
            interval_ms: None,
        }
    }

    /// `repeat` pulses of `kind`, `interval_ms` apart.
    pub const fn repeated(kind: HapticKind, repeat: u32, interval_ms: f64) -> Self {
        Self {
            kind,
            repeat: Some(repeat),
            interval_ms: Some(interval_ms),
        }
    }

    /// The number of pulses this pattern plays.
    pub fn pulses(&self) -> u32 {
        self.repeat.unwrap_or(1)
    }

    /// The delay between consecutive pulses, in `0..=MAX_PATTERN_INTERVAL_MS`.
    pub fn interval_ms(&self) -> f64 {
        match self.interval_ms {
            Some(ms) if ms > MAX_PATTERN_INTERVAL_MS => {
                log::warn!(
                    "Haptic pattern interval {ms}ms out of range, clamped to {MAX_PATTERN_INTERVAL_MS}ms"
                );
                MAX_PATTERN_INTERVAL_MS
            }
            Some(ms) if ms.is_finite() && ms > 0.0 => ms,
            Some(_) => 0.0,
            None => DEFAULT_PATTERN_INTERVAL_MS,
        }
    }
}

/// The chat interactions that carry tactile feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HapticContext {
    /// A message was sent.
    Send,
    /// A message arrived.
    Receive,
    /// A reaction was added to a message.
    Reaction,
    /// A message was deleted.
    Delete,
    /// A swipe gesture crossed the reply threshold.
    SwipeReply,
    /// A long press opened the context menu.
    LongPress,
    /// A media attachment was zoomed.
    MediaZoom,
    /// An operation completed.
    Success,
    /// An operation failed.
    Error,
    /// A celebratory moment (first message, milestone).
    Celebrate,
}

impl HapticContext {
    /// Every context, in declaration order.
    pub const ALL: [HapticContext; 10] = [
        HapticContext::Send,
        HapticContext::Receive,
        HapticContext::Reaction,
        HapticContext::Delete,
        HapticContext::SwipeReply,
        HapticContext::LongPress,
        HapticContext::MediaZoom,
        HapticContext::Success,
        HapticContext::Error,
        HapticContext::Celebrate,
    ];

    /// The predefined pattern for this context.
    pub const fn pattern(self) -> HapticPattern {
        match self {
            HapticContext::Send => HapticPattern::single(HapticKind::Light),
            HapticContext::Receive => HapticPattern::single(HapticKind::Selection),
            HapticContext::Reaction => HapticPattern::single(HapticKind::Medium),
            HapticContext::Delete => HapticPattern::single(HapticKind::Warning),
            HapticContext::SwipeReply => HapticPattern::single(HapticKind::Light),
            HapticContext::LongPress => HapticPattern::single(HapticKind::Medium),
            HapticContext::MediaZoom => HapticPattern::single(HapticKind::Selection),
            HapticContext::Success => HapticPattern::single(HapticKind::Success),
            HapticContext::Error => HapticPattern::single(HapticKind::Error),
            HapticContext::Celebrate => HapticPattern::repeated(HapticKind::Strong, 3, 80.0),
        }
    }
}

impl fmt::Display for HapticContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HapticContext::Send => "send",
            HapticContext::Receive => "receive",
            HapticContext::Reaction => "reaction",
            HapticContext::Delete => "delete",
            HapticContext::SwipeReply => "swipe_reply",
            HapticContext::LongPress => "long_press",
            HapticContext::MediaZoom => "media_zoom",
            HapticContext::Success => "success",
            HapticContext::Error => "error",
            HapticContext::Celebrate => "celebrate",
        };
        f.write_str(name)
    }
}
