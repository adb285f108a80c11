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

//! Free-form metadata attached to effect sessions.

use serde_json::Value;

/// A JSON object carried alongside an effect session.
pub type Metadata = serde_json::Map<String, Value>;

/// Merges `overlay` into `base`; keys present in both take the overlay value.
pub fn merge(base: &mut Metadata, overlay: Metadata) {
    for (key, value) in overlay {
        base.insert(key, value);
    }
}

/// Reads a non-negative integer field, accepting integral floats.
pub fn get_u64(metadata: &Metadata, key: &str) -> Option<u64> {
    match metadata.get(key)? {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0)
                .map(|f| f as u64)
        }),
        _ => None,
    }
}

/// Reads a numeric field as `f64`.
pub fn get_f64(metadata: &Metadata, key: &str) -> Option<f64> {
    metadata.get(key)?.as_f64()
}
