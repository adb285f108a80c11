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

//! Events emitted over the lifetime of an effect.

use crate::telemetry::metadata::Metadata;
use serde::Serialize;

/// A telemetry event produced by the effect correlator.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EffectEvent {
    /// An effect session was opened.
    Started {
        /// The opaque session identifier.
        session_id: String,
        /// The effect name (e.g. `send_bubble_glow`).
        name: String,
        /// Clock timestamp at which the effect started.
        started_at_ms: f64,
        /// Metadata supplied at start.
        metadata: Metadata,
    },
    /// An effect session completed.
    Ended {
        /// The opaque session identifier.
        session_id: String,
        /// The effect name.
        name: String,
        /// Time between start and end.
        duration_ms: f64,
        /// Dropped frames reported by the hook, if any.
        dropped_frames: Option<u64>,
        /// All metadata merged over the session's lifetime.
        metadata: Metadata,
    },
    /// An effect session ended with an error.
    Failed {
        /// The opaque session identifier.
        session_id: String,
        /// The effect name.
        name: String,
        /// Time between start and failure.
        duration_ms: f64,
        /// The rendered error.
        error: String,
        /// All metadata merged over the session's lifetime.
        metadata: Metadata,
    },
    /// A session dropped more frames than the performance threshold allows.
    PerformanceIssue {
        /// The opaque session identifier.
        session_id: String,
        /// The effect name.
        name: String,
        /// Dropped frames reported for the session.
        dropped_frames: u64,
        /// Time between start and end.
        duration_ms: f64,
    },
    /// A run was abnormally slow compared to recent runs of the same effect.
    Regression {
        /// The effect name.
        name: String,
        /// Duration of the offending run.
        duration_ms: f64,
        /// Dropped frames of the offending run.
        dropped_frames: u64,
        /// Trailing average duration.
        baseline_duration_ms: f64,
        /// Trailing average dropped frames.
        baseline_dropped_frames: f64,
    },
}

impl EffectEvent {
    /// The effect name this event is about.
    pub fn name(&self) -> &str {
        match self {
            EffectEvent::Started { name, .. }
            | EffectEvent::Ended { name, .. }
            | EffectEvent::Failed { name, .. }
            | EffectEvent::PerformanceIssue { name, .. }
            | EffectEvent::Regression { name, .. } => name,
        }
    }

    /// A stable, short label for the event kind.
    pub fn kind(&self) -> &'static str {
        match self {
            EffectEvent::Started { .. } => "effect_start",
            EffectEvent::Ended { .. } => "effect_end",
            EffectEvent::Failed { .. } => "effect_error",
            EffectEvent::PerformanceIssue { .. } => "effect_performance_issue",
            EffectEvent::Regression { .. } => "effect_performance_regression",
        }
    }

    /// The session this event belongs to, if it is session-scoped.
    pub fn session_id(&self) -> Option<&str> {
        match self {
            EffectEvent::Started { session_id, .. }
            | EffectEvent::Ended { session_id, .. }
            | EffectEvent::Failed { session_id, .. }
            | EffectEvent::PerformanceIssue { session_id, .. } => Some(session_id),
            EffectEvent::Regression { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_a_type_tag() {
        let event = EffectEvent::PerformanceIssue {
            session_id: "glow-1-abc".into(),
            name: "glow".into(),
            dropped_frames: 3,
            duration_ms: 240.0,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "performance_issue");
        assert_eq!(json["dropped_frames"], 3);
        assert_eq!(event.kind(), "effect_performance_issue");
        assert_eq!(event.session_id(), Some("glow-1-abc"));
    }

    #[test]
    fn regression_is_not_session_scoped() {
        let event = EffectEvent::Regression {
            name: "ribbon".into(),
            duration_ms: 900.0,
            dropped_frames: 0,
            baseline_duration_ms: 300.0,
            baseline_dropped_frames: 0.0,
        };
        assert_eq!(event.name(), "ribbon");
        assert_eq!(event.session_id(), None);
    }
}
