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

//! A background thread that runs a callback at a fixed interval.

use crossbeam_channel::{bounded, RecvTimeoutError, Sender};
use std::io;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Stop handle for a ticker thread.
///
/// Stopping cancels the next scheduled tick. It is idempotent and also runs
/// when the handle is dropped.
#[derive(Debug)]
pub struct TickerHandle {
    name: String,
    stop_tx: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl TickerHandle {
    /// Stops the ticker and waits for its thread to exit.
    pub fn stop(&mut self) {
        // Dropping the sender disconnects the channel and wakes the thread.
        if self.stop_tx.take().is_none() {
            return;
        }
        if let Some(handle) = self.handle.take() {
            // A tick callback stopping its own ticker must not join itself.
            if handle.thread().id() == thread::current().id() {
                return;
            }
            if handle.join().is_err() {
                log::error!("Ticker '{}' panicked before stopping", self.name);
            }
        }
        log::debug!("Ticker '{}' stopped.", self.name);
    }

    /// Returns `true` until [`stop`](Self::stop) has been called.
    pub fn is_running(&self) -> bool {
        self.stop_tx.is_some()
    }

    /// The thread name given at spawn time.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for TickerHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Spawns a named thread calling `tick` every `interval` until stopped.
pub fn spawn_ticker<F>(name: &str, interval: Duration, mut tick: F) -> io::Result<TickerHandle>
where
    F: FnMut() + Send + 'static,
{
    let (stop_tx, stop_rx) = bounded::<()>(1);
    let handle = thread::Builder::new()
        .name(name.to_string())
        .spawn(move || loop {
            match stop_rx.recv_timeout(interval) {
                Err(RecvTimeoutError::Timeout) => tick(),
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        })?;

    log::debug!("Ticker '{name}' started with a {interval:?} interval.");
    Ok(TickerHandle {
        name: name.to_string(),
        stop_tx: Some(stop_tx),
        handle: Some(handle),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn ticks_until_stopped() {
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = Arc::clone(&count);
        let mut ticker = spawn_ticker("test-ticker", Duration::from_millis(5), move || {
            count_clone.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();

        thread::sleep(Duration::from_millis(60));
        ticker.stop();
        let after_stop = count.load(Ordering::SeqCst);
        assert!(after_stop > 0, "ticker should have fired at least once");

        thread::sleep(Duration::from_millis(30));
        assert_eq!(count.load(Ordering::SeqCst), after_stop);
        assert!(!ticker.is_running());
    }

    #[test]
    fn stop_is_idempotent() {
        let mut ticker = spawn_ticker("idempotent", Duration::from_millis(50), || {}).unwrap();
        assert_eq!(ticker.name(), "idempotent");
        ticker.stop();
        ticker.stop();
        assert!(!ticker.is_running());
    }

    #[test]
    fn stop_does_not_wait_for_the_interval() {
        let mut ticker = spawn_ticker("slow", Duration::from_secs(30), || {}).unwrap();
        let started = std::time::Instant::now();
        ticker.stop();
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
