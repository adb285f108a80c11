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

//! Haptic providers available on every platform.

use async_trait::async_trait;
use glint_core::haptics::{HapticCapabilities, HapticError, HapticKind, HapticProvider};
use std::sync::atomic::{AtomicU64, Ordering};

/// Plays pulses into the log. Useful on desktop hosts and in tools.
#[derive(Debug, Default)]
pub struct LoggingHapticProvider {
    pulses: AtomicU64,
}

impl LoggingHapticProvider {
    /// Creates a provider with a zeroed pulse counter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pulses played so far.
    pub fn pulse_count(&self) -> u64 {
        self.pulses.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl HapticProvider for LoggingHapticProvider {
    fn name(&self) -> &str {
        "logging"
    }

    fn capabilities(&self) -> HapticCapabilities {
        HapticCapabilities::all()
    }

    async fn pulse(&self, kind: HapticKind) -> Result<(), HapticError> {
        let n = self.pulses.fetch_add(1, Ordering::Relaxed) + 1;
        log::info!(target: "glint::haptics", "pulse #{n}: {kind}");
        Ok(())
    }
}

/// The fallback used when no real backend is present. Plays nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullHapticProvider;

#[async_trait]
impl HapticProvider for NullHapticProvider {
    fn name(&self) -> &str {
        "null"
    }

    fn capabilities(&self) -> HapticCapabilities {
        HapticCapabilities::none()
    }

    fn is_available(&self) -> bool {
        false
    }

    async fn pulse(&self, _kind: HapticKind) -> Result<(), HapticError> {
        Err(HapticError::Unavailable {
            provider: self.name().to_string(),
        })
    }
}
