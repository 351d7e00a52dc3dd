//
// Copyright 2017-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//


//! Transport, emulator and event bus wired together

use crate::{ClientConfig, Event, EventBus, EventKind, ListenerId, Result, TelnetTransport};
use bbsterm_telnetcodec::naws::WindowSize;
use bbsterm_terminal::{ScreenSnapshot, TerminalEmulator};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::trace;

///
/// A BBS session: one [`TelnetTransport`] feeding one [`TerminalEmulator`].
///
/// Received text is fed into the emulator on the read loop as it arrives, and a fresh
/// [`ScreenSnapshot`] is published on a `watch` channel after every chunk, so a renderer
/// can redraw at its own pace and only ever sees the latest screen.
///
pub struct TerminalSession {
    bus: EventBus,
    transport: TelnetTransport,
    emulator: Arc<Mutex<TerminalEmulator>>,
    screen: Arc<watch::Sender<ScreenSnapshot>>,
    listener: ListenerId,
}

impl TerminalSession {
    pub fn new(config: ClientConfig) -> Self {
        let bus = EventBus::new();
        let emulator = Arc::new(Mutex::new(TerminalEmulator::new(config.emulator_config())));
        let (screen, _) = watch::channel(emulator.lock().snapshot());
        let screen = Arc::new(screen);

        let listener = {
            let emulator = emulator.clone();
            let screen = screen.clone();
            bus.subscribe(EventKind::DataReceived, move |event| {
                if let Event::DataReceived { text } = event {
                    let snapshot = {
                        let mut emulator = emulator.lock();
                        emulator.feed(text);
                        emulator.snapshot()
                    };
                    trace!("Publishing screen update");
                    screen.send_replace(snapshot);
                }
            })
        };

        let transport = TelnetTransport::new(config, bus.clone());
        Self {
            bus,
            transport,
            emulator,
            screen,
            listener,
        }
    }

    /// The bus this session publishes on. Subscribe here for connection events.
    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn transport(&self) -> &TelnetTransport {
        &self.transport
    }

    /// Receives the latest screen after every chunk of server output.
    pub fn screen_updates(&self) -> watch::Receiver<ScreenSnapshot> {
        self.screen.subscribe()
    }

    /// Current screen contents
    pub fn snapshot(&self) -> ScreenSnapshot {
        self.emulator.lock().snapshot()
    }

    /// Runs `f` with the emulator locked.
    pub fn with_emulator<R>(&self, f: impl FnOnce(&mut TerminalEmulator) -> R) -> R {
        f(&mut *self.emulator.lock())
    }

    /// Connects to the configured host.
    pub async fn connect(&self) -> bool {
        self.transport.connect_configured().await
    }

    pub async fn disconnect(&self) {
        self.transport.disconnect().await;
    }

    pub async fn send(&self, text: &str) -> Result<()> {
        self.transport.send(text).await
    }

    /// Resizes the screen and the size reported to the server from now on.
    pub fn resize(&self, cols: u16, rows: u16) {
        let window_size = WindowSize::new(cols.max(1), rows.max(1));
        self.transport.set_window_size(window_size);
        let snapshot = {
            let mut emulator = self.emulator.lock();
            emulator.resize(usize::from(window_size.cols), usize::from(window_size.rows));
            emulator.snapshot()
        };
        self.screen.send_replace(snapshot);
    }

    /// Blanks the screen and homes the cursor.
    pub fn clear_screen(&self) {
        let snapshot = {
            let mut emulator = self.emulator.lock();
            emulator.clear();
            emulator.snapshot()
        };
        self.screen.send_replace(snapshot);
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        self.bus.unsubscribe(EventKind::DataReceived, self.listener);
    }
}

impl std::fmt::Debug for TerminalSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalSession")
            .field("transport", &self.transport)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn publish(session: &TerminalSession, text: &str) {
        session.bus().publish(&Event::DataReceived {
            text: text.to_string(),
        });
    }

    #[test]
    fn test_received_text_reaches_screen() {
        let session = TerminalSession::new(ClientConfig::default());
        let updates = session.screen_updates();
        publish(&session, "Welcome\r\n\x1b[1;33mSysop");
        let screen = updates.borrow();
        assert_eq!(screen.lines()[0].trim_end(), "Welcome");
        assert_eq!(screen.lines()[1].trim_end(), "Sysop");
        assert_eq!(screen.cursor.col, 5);
    }

    #[test]
    fn test_resize() {
        let session = TerminalSession::new(ClientConfig::default());
        session.resize(40, 10);
        let snapshot = session.snapshot();
        assert_eq!(snapshot.size.cols, 40);
        assert_eq!(snapshot.size.rows, 10);
        assert_eq!(session.screen_updates().borrow().size.cols, 40);
    }

    #[test]
    fn test_clear_screen() {
        let session = TerminalSession::new(ClientConfig::default());
        publish(&session, "junk");
        session.clear_screen();
        assert!(session.snapshot().lines().iter().all(|line| line.trim().is_empty()));
    }

    #[test]
    fn test_drop_releases_listener() {
        let session = TerminalSession::new(ClientConfig::default());
        let bus = session.bus().clone();
        assert_eq!(bus.listener_count(EventKind::DataReceived), 1);
        drop(session);
        assert_eq!(bus.listener_count(EventKind::DataReceived), 0);
    }

    #[test]
    fn test_with_emulator() {
        let session = TerminalSession::new(ClientConfig::default().with_ice_colors(false));
        assert!(!session.with_emulator(|emulator| emulator.ice_colors()));
    }
}
