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

//! Effect sessions and their identifiers.

use glint_control::PerformanceMetrics;
use glint_core::telemetry::Metadata;
use serde::Serialize;
use std::fmt;

/// Opaque identifier of one effect session, shaped `{name}-{timestamp}-{random}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub(crate) fn generate(effect_name: &str, now_ms: f64) -> Self {
        let random = uuid::Uuid::new_v4().simple().to_string();
        Self(format!("{}-{}-{}", effect_name, now_ms.max(0.0) as u64, &random[..8]))
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SessionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// The telemetry record of one effect, from start to end or error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EffectSession {
    /// Session identifier.
    pub session_id: SessionId,
    /// Name of the effect.
    pub effect_name: String,
    /// Clock timestamp of the start.
    pub started_at_ms: f64,
    /// Metadata merged over the session's lifetime.
    pub metadata: Metadata,
    /// Clock timestamp of the end, once closed.
    pub ended_at_ms: Option<f64>,
    /// Time between start and end, once closed.
    pub duration_ms: Option<f64>,
    /// Dropped frames reported in the metadata.
    pub dropped_frames: Option<u64>,
    /// `true` for a normal end, `false` for an error.
    pub success: Option<bool>,
    /// The error, for failed sessions.
    pub error: Option<String>,
    /// Frame metrics, when the hook reported total frames and refresh rate.
    pub frame_metrics: Option<PerformanceMetrics>,
}

impl EffectSession {
    pub(crate) fn open(session_id: SessionId, effect_name: &str, started_at_ms: f64, metadata: Metadata) -> Self {
        Self {
            session_id,
            effect_name: effect_name.to_string(),
            started_at_ms,
            metadata,
            ended_at_ms: None,
            duration_ms: None,
            dropped_frames: None,
            success: None,
            error: None,
            frame_metrics: None,
        }
    }

    /// Returns `true` once the session was ended or failed.
    pub fn is_closed(&self) -> bool {
        self.ended_at_ms.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_carry_name_and_timestamp() {
        let a = SessionId::generate("send_glow", 1234.9);
        let b = SessionId::generate("send_glow", 1234.9);

        assert!(a.as_str().starts_with("send_glow-1234-"));
        assert_eq!(a.as_str().len(), "send_glow-1234-".len() + 8);
        assert_ne!(a, b);
    }

    #[test]
    fn new_sessions_are_open() {
        let session = EffectSession::open("x-1-abc".into(), "x", 1.0, Metadata::new());
        assert!(!session.is_closed());
        assert_eq!(session.session_id.to_string(), "x-1-abc");
    }
}
