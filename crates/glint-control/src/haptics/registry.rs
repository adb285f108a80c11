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

//! Haptic provider registry with priority-ordered selection.

use glint_core::haptics::HapticProvider;
use std::sync::Arc;

struct ProviderEntry {
    provider: Arc<dyn HapticProvider>,
    priority: f32,
}

/// Registry of the haptic backends compiled into the host.
///
/// Providers are kept sorted by priority (highest first). The coordinator
/// resolves one provider through [`select`](Self::select) at startup and
/// keeps it for its whole lifetime.
pub struct HapticProviderRegistry {
    entries: Vec<ProviderEntry>,
}

impl HapticProviderRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Registers a provider. Higher priorities are preferred.
    ///
    /// A provider registered under an existing name replaces it.
    pub fn register(&mut self, provider: Arc<dyn HapticProvider>, priority: f32) {
        let name = provider.name().to_string();
        if let Some(pos) = self.entries.iter().position(|e| e.provider.name() == name) {
            log::warn!("HapticProviderRegistry: replacing provider '{}'", name);
            self.entries.remove(pos);
        }
        log::info!(
            "HapticProviderRegistry: Registered '{}' (priority={:.2})",
            name,
            priority
        );

        self.entries.push(ProviderEntry { provider, priority });
        self.entries.sort_by(|a, b| {
            b.priority
                .partial_cmp(&a.priority)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
    }

    /// Returns the number of registered providers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no providers are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates providers in priority order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn HapticProvider>> {
        self.entries.iter().map(|e| &e.provider)
    }

    /// Looks a provider up by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn HapticProvider>> {
        self.iter().find(|p| p.name() == name).cloned()
    }

    /// The highest-priority provider that is available and can play something.
    pub fn select(&self) -> Option<Arc<dyn HapticProvider>> {
        let selected = self
            .iter()
            .find(|p| p.is_available() && p.capabilities().any())
            .cloned();
        match &selected {
            Some(p) => log::info!("Selected haptic provider '{}'", p.name()),
            None => log::warn!("No usable haptic provider among {} registered", self.len()),
        }
        selected
    }

    /// Like [`select`](Self::select), falling back to `fallback` when nothing is usable.
    pub fn select_or(&self, fallback: Arc<dyn HapticProvider>) -> Arc<dyn HapticProvider> {
        self.select().unwrap_or_else(|| {
            log::info!("Falling back to haptic provider '{}'", fallback.name());
            fallback
        })
    }
}

impl Default for HapticProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use glint_core::haptics::{HapticCapabilities, HapticError, HapticKind};

    #[derive(Debug)]
    struct FakeProvider {
        name: &'static str,
        available: bool,
        capabilities: HapticCapabilities,
    }

    impl FakeProvider {
        fn arc(name: &'static str, available: bool, capabilities: HapticCapabilities) -> Arc<dyn HapticProvider> {
            Arc::new(Self {
                name,
                available,
                capabilities,
            })
        }
    }

    #[async_trait]
    impl HapticProvider for FakeProvider {
        fn name(&self) -> &str {
            self.name
        }

        fn capabilities(&self) -> HapticCapabilities {
            self.capabilities
        }

        fn is_available(&self) -> bool {
            self.available
        }

        async fn pulse(&self, _kind: HapticKind) -> Result<(), HapticError> {
            Ok(())
        }
    }

    #[test]
    fn selects_highest_priority_usable_provider() {
        let mut registry = HapticProviderRegistry::new();
        registry.register(FakeProvider::arc("low", true, HapticCapabilities::all()), 1.0);
        registry.register(FakeProvider::arc("offline", false, HapticCapabilities::all()), 10.0);
        registry.register(FakeProvider::arc("mute", true, HapticCapabilities::none()), 5.0);
        registry.register(FakeProvider::arc("mid", true, HapticCapabilities::all()), 3.0);

        let names: Vec<_> = registry.iter().map(|p| p.name().to_string()).collect();
        assert_eq!(names, ["offline", "mute", "mid", "low"]);
        assert_eq!(registry.select().unwrap().name(), "mid");
    }

    #[test]
    fn falls_back_when_nothing_is_usable() {
        let mut registry = HapticProviderRegistry::default();
        assert!(registry.select().is_none());

        registry.register(FakeProvider::arc("offline", false, HapticCapabilities::all()), 1.0);
        let fallback = FakeProvider::arc("null", true, HapticCapabilities::none());
        assert_eq!(registry.select_or(fallback).name(), "null");
    }

    #[test]
    fn re_registering_a_name_replaces_it() {
        let mut registry = HapticProviderRegistry::new();
        registry.register(FakeProvider::arc("taptic", false, HapticCapabilities::all()), 1.0);
        registry.register(FakeProvider::arc("taptic", true, HapticCapabilities::all()), 2.0);
        assert_eq!(registry.len(), 1);
        assert!(registry.get("taptic").unwrap().is_available());
        assert!(registry.get("missing").is_none());
    }
}
