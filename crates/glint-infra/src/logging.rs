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

//! Logger initialisation for hosts and tools.

use env_logger::{Builder, Env};

fn builder() -> Builder {
    let mut builder = Builder::from_env(Env::default().default_filter_or("info"));
    builder.filter_module("wgpu_hal", log::LevelFilter::Error);
    builder
}

/// Installs the global logger. `RUST_LOG` overrides the `info` default.
///
/// # Panics
///
/// Panics if a global logger was already installed.
pub fn init() {
    builder().init();
}

/// Like [`init`], but reports an already installed logger instead of panicking.
pub fn try_init() -> Result<(), log::SetLoggerError> {
    builder().try_init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_initialisation_is_reported() {
        let _ = try_init();
        assert!(try_init().is_err());
    }
}
