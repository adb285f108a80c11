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

use anyhow::Result;
use glint_core::utils::CancellationToken;
use glint_infra::LoggingHapticProvider;
use glint_sdk::prelude::*;
use glint_telemetry::sinks::{ChannelSink, FanoutSink, LogSink};
use std::sync::Arc;
use std::time::Duration;

fn load_config() -> Result<EffectsConfig> {
    match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading effects config from {path}");
            Ok(EffectsConfig::from_file(&path)?)
        }
        None => Ok(EffectsConfig::default()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    glint_infra::logging::init();

    let (channel, events) = ChannelSink::bounded(256);
    let sink = FanoutSink::new()
        .with(Arc::new(LogSink::new()))
        .with(Arc::new(channel));

    let runtime = EffectsRuntime::builder(glint_infra::HeadlessSurfaceAllocator::new())
        .config(load_config()?)
        .haptic_provider(Arc::new(LoggingHapticProvider::new()), 10.0)
        .telemetry_sink(Arc::new(sink))
        .tokio_handle(tokio::runtime::Handle::current())
        .build()?;

    // A send-bubble glow: surface, haptic, a few frames, then done.
    let glow = runtime.surfaces().get_surface("send_glow", 390, 120)?;
    log::info!("Glow surface ready ({} bytes)", glow.pixels.len());
    runtime.haptics().trigger_by_context(HapticContext::Send).await;

    let mut scope = runtime.scope("send_glow", Metadata::new());
    for _ in 0..12 {
        tokio::time::sleep(Duration::from_millis(16)).await;
        scope.record_frame();
    }
    scope.finish(Metadata::new());

    // A reaction burst whose pattern is cut short.
    let cancel = CancellationToken::new();
    let burst = HapticPattern::repeated(HapticKind::Medium, 5, 60.0);
    let cancel_later = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        cancel_later.cancel();
    });
    runtime.haptics().trigger_pattern(burst, true, &cancel).await;

    // A blur that fails to get its surface.
    let radius = clamp_blur_radius(72.0);
    let blur = runtime.scope("media_blur", Metadata::new());
    match runtime.surfaces().get_surface("media_blur", 0, 0) {
        Ok(_) => {
            blur.finish(Metadata::new());
        }
        Err(err) => {
            log::warn!("Skipping blur (radius {radius}): {err}");
            blur.fail(&err, Metadata::new());
        }
    }

    // The continuous monitor, as used by hosts without a vsync callback.
    let mut monitor = runtime.start_frame_monitor()?;
    tokio::time::sleep(Duration::from_millis(200)).await;
    monitor.stop();
    log::info!("Frame monitor metrics: {:?}", monitor.metrics());

    let stats = serde_json::to_string_pretty(&runtime.surfaces().stats())?;
    log::info!("Surface cache stats:\n{stats}");
    log::info!("{} telemetry events forwarded", events.try_iter().count());

    runtime.shutdown();
    Ok(())
}
