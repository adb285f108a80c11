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

use glint_core::surface::SurfaceError;
use std::sync::atomic::{AtomicU64, Ordering};

/// Tracks the bytes held by live surfaces against an optional ceiling.
#[derive(Debug, Default)]
pub struct SurfaceBudget {
    limit_bytes: Option<u64>,
    allocated_bytes: AtomicU64,
}

impl SurfaceBudget {
    /// A budget capped at `limit_bytes`, or unbounded for `None`.
    pub fn new(limit_bytes: Option<u64>) -> Self {
        Self {
            limit_bytes,
            allocated_bytes: AtomicU64::new(0),
        }
    }

    /// Reserves `bytes`, failing if that would exceed the ceiling.
    pub fn reserve(&self, bytes: u64) -> Result<(), SurfaceError> {
        let Some(limit) = self.limit_bytes else {
            self.allocated_bytes.fetch_add(bytes, Ordering::Relaxed);
            return Ok(());
        };
        self.allocated_bytes
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                current.checked_add(bytes).filter(|total| *total <= limit)
            })
            .map(|_| ())
            .map_err(|current| SurfaceError::BudgetExhausted {
                requested: bytes,
                available: limit.saturating_sub(current),
            })
    }

    /// Returns `bytes` to the budget.
    pub fn release(&self, bytes: u64) {
        let _ = self
            .allocated_bytes
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                Some(current.saturating_sub(bytes))
            });
    }

    /// Bytes currently held.
    pub fn allocated_bytes(&self) -> u64 {
        self.allocated_bytes.load(Ordering::Relaxed)
    }

    /// The ceiling, if any.
    pub fn limit_bytes(&self) -> Option<u64> {
        self.limit_bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refuses_reservations_past_the_limit() {
        let budget = SurfaceBudget::new(Some(100));
        budget.reserve(60).unwrap();
        assert_eq!(
            budget.reserve(50),
            Err(SurfaceError::BudgetExhausted {
                requested: 50,
                available: 40
            })
        );
        budget.release(60);
        budget.reserve(100).unwrap();
        assert_eq!(budget.allocated_bytes(), 100);
    }

    #[test]
    fn unbounded_budget_only_counts() {
        let budget = SurfaceBudget::default();
        budget.reserve(u64::MAX / 2).unwrap();
        budget.release(u64::MAX);
        assert_eq!(budget.allocated_bytes(), 0);
        assert_eq!(budget.limit_bytes(), None);
    }
}
