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

//! Contracts for tactile feedback hardware.
//!
//! A haptic provider wraps one platform backend (Taptic engine, Android
//! vibrator, a logging stub). Providers advertise a fixed capability set and
//! are selected once at startup by the coordinator's provider registry rather
//! than being re-probed on every call.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};

/// The discrete pulse types a provider can play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HapticKind {
    /// A very light tick used for picker and selection changes.
    Selection,
    /// A light impact.
    Light,
    /// A medium impact.
    Medium,
    /// A heavy impact.
    Strong,
    /// A success notification pattern.
    Success,
    /// A warning notification pattern.
    Warning,
    /// An error notification pattern.
    Error,
}

impl HapticKind {
    /// Every pulse type, in declaration order.
    pub const ALL: [HapticKind; 7] = [
        HapticKind::Selection,
        HapticKind::Light,
        HapticKind::Medium,
        HapticKind::Strong,
        HapticKind::Success,
        HapticKind::Warning,
        HapticKind::Error,
    ];

    /// Returns the capability class this pulse belongs to.
    pub fn class(self) -> HapticClass {
        match self {
            HapticKind::Selection => HapticClass::Selection,
            HapticKind::Light | HapticKind::Medium | HapticKind::Strong => HapticClass::Impact,
            HapticKind::Success | HapticKind::Warning | HapticKind::Error => {
                HapticClass::Notification
            }
        }
    }
}

impl fmt::Display for HapticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HapticKind::Selection => "selection",
            HapticKind::Light => "light",
            HapticKind::Medium => "medium",
            HapticKind::Strong => "strong",
            HapticKind::Success => "success",
            HapticKind::Warning => "warning",
            HapticKind::Error => "error",
        };
        f.write_str(name)
    }
}

/// The three families of feedback platforms usually expose separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HapticClass {
    /// Selection ticks.
    Selection,
    /// Physical impacts of varying strength.
    Impact,
    /// Semantic notification patterns.
    Notification,
}

/// The fixed set of pulse families a provider supports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HapticCapabilities {
    /// Supports [`HapticClass::Selection`].
    pub selection: bool,
    /// Supports [`HapticClass::Impact`].
    pub impact: bool,
    /// Supports [`HapticClass::Notification`].
    pub notification: bool,
}

impl HapticCapabilities {
    /// A provider that can play every pulse type.
    pub const fn all() -> Self {
        Self {
            selection: true,
            impact: true,
            notification: true,
        }
    }

    /// A provider that can play nothing.
    pub const fn none() -> Self {
        Self {
            selection: false,
            impact: false,
            notification: false,
        }
    }

    /// Returns `true` if `kind` can be played.
    pub fn supports(&self, kind: HapticKind) -> bool {
        match kind.class() {
            HapticClass::Selection => self.selection,
            HapticClass::Impact => self.impact,
            HapticClass::Notification => self.notification,
        }
    }

    /// Returns `true` if at least one pulse family is supported.
    pub fn any(&self) -> bool {
        self.selection || self.impact || self.notification
    }
}

/// An error raised by a haptic backend.
///
/// These never reach animation hooks; the coordinator logs and drops them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HapticError {
    /// The backend is not present on this device.
    #[error("Haptic provider '{provider}' is unavailable")]
    Unavailable {
        /// Name of the provider.
        provider: String,
    },
    /// The backend cannot play this pulse type.
    #[error("Haptic provider '{provider}' does not support '{kind}' pulses")]
    Unsupported {
        /// Name of the provider.
        provider: String,
        /// The rejected pulse type.
        kind: HapticKind,
    },
    /// The platform call itself failed.
    #[error("Haptic backend error: {0}")]
    Backend(String),
}

/// A platform backend able to play discrete haptic pulses.
#[async_trait]
pub trait HapticProvider: Send + Sync + Debug + 'static {
    /// A unique, human-readable name for registry lookups and logs.
    fn name(&self) -> &str;

    /// The pulse families this provider supports.
    fn capabilities(&self) -> HapticCapabilities;

    /// Whether the backend is usable on this device.
    fn is_available(&self) -> bool {
        true
    }

    /// Plays one pulse. Fire-and-forget from the caller's point of view.
    async fn pulse(&self, kind: HapticKind) -> Result<(), HapticError>;
}
