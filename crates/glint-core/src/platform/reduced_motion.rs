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

//! The accessibility "reduce motion" preference.

use std::fmt::{self, Debug};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

/// Callback invoked with the new value whenever the preference changes.
pub type ReducedMotionListener = Box<dyn Fn(bool) + Send + Sync>;

/// A synchronous snapshot of the preference plus change notifications.
pub trait ReducedMotionSource: Send + Sync + Debug + 'static {
    /// Returns the current value of the preference.
    fn is_reduced_motion(&self) -> bool;

    /// Registers a listener called on every subsequent change.
    fn subscribe(&self, listener: ReducedMotionListener);
}

/// An in-process preference store.
///
/// Platform observers push OS changes into it with [`set`](Self::set); the
/// runtime subscribes once and forwards changes to the haptic coordinator.
pub struct ReducedMotionPreference {
    enabled: AtomicBool,
    listeners: Mutex<Vec<ReducedMotionListener>>,
}

impl ReducedMotionPreference {
    /// Creates a preference with the given initial value.
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled: AtomicBool::new(enabled),
            listeners: Mutex::new(Vec::new()),
        }
    }

    /// Updates the preference, notifying listeners if the value changed.
    pub fn set(&self, enabled: bool) {
        let previous = self.enabled.swap(enabled, Ordering::SeqCst);
        if previous == enabled {
            return;
        }
        log::info!("Reduced motion preference changed to {enabled}");
        let listeners = self.listeners.lock().unwrap_or_else(PoisonError::into_inner);
        for listener in listeners.iter() {
            listener(enabled);
        }
    }
}

impl Default for ReducedMotionPreference {
    fn default() -> Self {
        Self::new(false)
    }
}

impl Debug for ReducedMotionPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let listener_count = self
            .listeners
            .lock()
            .map(|l| l.len())
            .unwrap_or_default();
        f.debug_struct("ReducedMotionPreference")
            .field("enabled", &self.enabled.load(Ordering::SeqCst))
            .field("listeners", &listener_count)
            .finish()
    }
}

impl ReducedMotionSource for ReducedMotionPreference {
    fn is_reduced_motion(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    fn subscribe(&self, listener: ReducedMotionListener) {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(listener);
    }
}
