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


//! Telnet connection lifecycle and read loop

use crate::{ClientConfig, ClientError, Event, EventBus, ProbeScanner, Result};
use bbsterm_telnetcodec::naws::WindowSize;
use bbsterm_telnetcodec::{
    Codepage, NegotiationState, Negotiator, TelnetCodec, TelnetEvent, TelnetFrame,
};
use bytes::BytesMut;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::select;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_util::codec::{Decoder, Encoder};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace, warn};

/// Connection lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ConnectionState {
    /// No connection
    Disconnected = 0,
    /// A TCP connect is in flight
    Connecting = 1,
    /// The read loop is running
    Connected = 2,
    /// Teardown in progress
    Closing = 3,
}

impl ConnectionState {
    /// Convert from u8 (for atomic operations)
    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Connecting,
            2 => Self::Connected,
            3 => Self::Closing,
            _ => Self::Disconnected,
        }
    }

    /// Convert to u8 (for atomic operations)
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectionState::Disconnected => write!(f, "Disconnected"),
            ConnectionState::Connecting => write!(f, "Connecting"),
            ConnectionState::Connected => write!(f, "Connected"),
            ConnectionState::Closing => write!(f, "Closing"),
        }
    }
}

type BoxedWriter = Box<dyn AsyncWrite + Send + Unpin>;

/// State shared between the transport handle and its read loop.
struct Shared {
    state: AtomicU8,
    negotiator: Mutex<Negotiator>,
    probes: Mutex<ProbeScanner>,
    writer: tokio::sync::Mutex<Option<BoxedWriter>>,
    bus: EventBus,
    codepage: Codepage,
    buffer_size: usize,
}

impl Shared {
    fn state(&self) -> ConnectionState {
        ConnectionState::from_u8(self.state.load(Ordering::Acquire))
    }

    fn set_state(&self, state: ConnectionState) {
        self.state.store(state.as_u8(), Ordering::Release);
    }

    /// Claims the teardown. Only one caller per connection gets `true`.
    fn begin_teardown(&self) -> bool {
        self.state
            .compare_exchange(
                ConnectionState::Connected.as_u8(),
                ConnectionState::Closing.as_u8(),
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }

    async fn finish_teardown(&self, error: Option<String>) {
        if let Some(mut writer) = self.writer.lock().await.take() {
            if let Err(error) = writer.shutdown().await {
                debug!("Error shutting down writer: {}", error);
            }
        }
        self.negotiator.lock().reset();
        self.probes.lock().reset();
        self.set_state(ConnectionState::Disconnected);
        self.bus.publish(&Event::Disconnected { error });
    }

    /// Teardown initiated from the read loop.
    async fn close(&self, error: Option<String>) {
        if self.begin_teardown() {
            self.finish_teardown(error).await;
        }
    }

    async fn write(&self, bytes: &[u8]) -> Result<()> {
        let mut writer = self.writer.lock().await;
        let writer = writer.as_mut().ok_or(ClientError::NotConnected)?;
        writer.write_all(bytes).await?;
        writer.flush().await?;
        Ok(())
    }

    /// Decodes everything buffered, answers negotiation and probes, and publishes the
    /// display text of this chunk.
    async fn process(&self, codec: &mut TelnetCodec, buffer: &mut BytesMut) -> Result<()> {
        let mut data = Vec::new();
        let mut replies = BytesMut::new();
        while let Some(event) = codec.decode(buffer)? {
            match &event {
                TelnetEvent::Data(bytes) => data.extend_from_slice(bytes),
                TelnetEvent::Command(command) => debug!("Ignoring command {:?}", command),
                _ => {}
            }
            let frames: Vec<TelnetFrame> = self.negotiator.lock().respond(&event);
            for frame in frames {
                codec.encode(frame, &mut replies)?;
            }
        }
        let probe_replies = self.probes.lock().scan(&data);
        for reply in probe_replies {
            replies.extend_from_slice(&reply);
        }
        if !replies.is_empty() {
            trace!("Writing {} reply bytes", replies.len());
            self.write(&replies).await?;
        }
        if !data.is_empty() {
            let text = self.codepage.decode(&data);
            self.bus.publish(&Event::DataReceived { text });
        }
        Ok(())
    }
}

async fn read_loop<R>(shared: Arc<Shared>, mut reader: R, cancel: CancellationToken)
where
    R: AsyncRead + Unpin,
{
    let mut codec = TelnetCodec::new();
    let mut buffer = BytesMut::with_capacity(shared.buffer_size);
    let mut chunk = vec![0u8; shared.buffer_size];
    loop {
        let read = select! {
            () = cancel.cancelled() => {
                trace!("Read loop cancelled");
                return;
            }
            read = reader.read(&mut chunk) => read,
        };
        match read {
            Ok(0) => {
                info!("{}", ClientError::StreamClosed);
                shared.close(None).await;
                return;
            }
            Ok(count) => {
                trace!("Read {} bytes", count);
                buffer.extend_from_slice(&chunk[..count]);
                // Reply writes block while the peer is not reading; stay cancellable.
                let processed = select! {
                    () = cancel.cancelled() => {
                        trace!("Read loop cancelled while writing replies");
                        return;
                    }
                    processed = shared.process(&mut codec, &mut buffer) => processed,
                };
                if let Err(error) = processed {
                    error!("Failed to process inbound data: {}", error);
                    shared.close(Some(error.to_string())).await;
                    return;
                }
            }
            Err(error) => {
                error!("Read error: {}", error);
                shared.close(Some(error.to_string())).await;
                return;
            }
        }
    }
}

struct Connection {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

///
/// A telnet connection to a BBS.
///
/// The transport owns one background read loop per connection. The loop answers option
/// negotiation and terminal probes on its own and publishes everything else on the
/// [`EventBus`] as [`Event::DataReceived`], decoded with the configured code page.
///
/// Every connection ends with exactly one [`Event::Disconnected`]: with no error for a
/// local `disconnect()` or a clean close by the server, with the error text otherwise.
///
pub struct TelnetTransport {
    config: ClientConfig,
    shared: Arc<Shared>,
    connection: Mutex<Option<Connection>>,
}

impl TelnetTransport {
    pub fn new(config: ClientConfig, bus: EventBus) -> Self {
        let shared = Shared {
            state: AtomicU8::new(ConnectionState::Disconnected.as_u8()),
            negotiator: Mutex::new(Negotiator::new(
                config.terminal_type.clone(),
                config.window_size,
            )),
            probes: Mutex::new(ProbeScanner::new(config.window_size)),
            writer: tokio::sync::Mutex::new(None),
            bus,
            codepage: config.codepage,
            buffer_size: config.buffer_size.max(1),
        };
        Self {
            config,
            shared: Arc::new(shared),
            connection: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Current lifecycle state
    pub fn state(&self) -> ConnectionState {
        self.shared.state()
    }

    pub fn is_connected(&self) -> bool {
        self.state() == ConnectionState::Connected
    }

    /// Snapshot of the options negotiated on the current connection
    pub fn negotiation(&self) -> NegotiationState {
        self.shared.negotiator.lock().state().clone()
    }

    /// Changes the size reported to future NAWS and cursor position queries.
    pub fn set_window_size(&self, window_size: WindowSize) {
        self.shared.negotiator.lock().set_window_size(window_size);
        self.shared.probes.lock().set_window_size(window_size);
    }

    /// Connects to the host and port from the configuration.
    pub async fn connect_configured(&self) -> bool {
        let host = self.config.host.clone();
        self.connect(&host, self.config.port, self.config.connect_timeout)
            .await
    }

    ///
    /// Opens a TCP connection and starts the read loop.
    ///
    /// Returns `false` when the connection could not be made within `connect_timeout`; a
    /// [`Event::Disconnected`] carrying the reason has been published in that case. An
    /// existing connection is closed first.
    ///
    pub async fn connect(&self, host: &str, port: u16, connect_timeout: Duration) -> bool {
        self.disconnect().await;
        self.shared.set_state(ConnectionState::Connecting);
        info!("Connecting to {}:{}", host, port);

        let result = match timeout(connect_timeout, TcpStream::connect((host, port))).await {
            Ok(Ok(stream)) => Ok(stream),
            Ok(Err(error)) => Err(ClientError::Connection(error.to_string())),
            Err(_) => Err(ClientError::ConnectionTimeout),
        };
        match result {
            Ok(stream) => {
                if let Err(error) = stream.set_nodelay(true) {
                    warn!("Failed to set TCP_NODELAY: {}", error);
                }
                self.start(stream, host, port).await;
                true
            }
            Err(error) => {
                error!("Failed to connect to {}:{}: {}", host, port, error);
                self.shared.set_state(ConnectionState::Disconnected);
                self.shared.bus.publish(&Event::Disconnected {
                    error: Some(error.to_string()),
                });
                false
            }
        }
    }

    /// Runs the transport over an already open stream.
    pub async fn attach<S>(&self, stream: S, host: &str, port: u16)
    where
        S: AsyncRead + AsyncWrite + Send + 'static,
    {
        self.disconnect().await;
        self.start(stream, host, port).await;
    }

    async fn start<S>(&self, stream: S, host: &str, port: u16)
    where
        S: AsyncRead + AsyncWrite + Send + 'static,
    {
        let (reader, writer) = tokio::io::split(stream);
        *self.shared.writer.lock().await = Some(Box::new(writer));
        self.shared.negotiator.lock().reset();
        self.shared.probes.lock().reset();
        self.shared.set_state(ConnectionState::Connected);
        info!("Connected to {}:{}", host, port);
        self.shared.bus.publish(&Event::Connected {
            host: host.to_string(),
            port,
        });

        let cancel = CancellationToken::new();
        let task = tokio::spawn(read_loop(self.shared.clone(), reader, cancel.clone()));
        *self.connection.lock() = Some(Connection { cancel, task });
    }

    ///
    /// Closes the connection.
    ///
    /// Publishes `Disconnected` with no error when a connection was open; calling it again,
    /// or after the server already closed the stream, does nothing.
    ///
    pub async fn disconnect(&self) {
        let Some(connection) = self.connection.lock().take() else {
            return;
        };
        let owns_teardown = self.shared.begin_teardown();
        connection.cancel.cancel();
        if let Err(error) = connection.task.await {
            warn!("Read loop ended abnormally: {}", error);
        }
        if owns_teardown {
            info!("Disconnected");
            self.shared.finish_teardown(None).await;
        }
    }

    ///
    /// Sends text to the server.
    ///
    /// The text is encoded with the configured [`Charset`](crate::Charset) and literal
    /// 255 bytes are doubled. Publishes [`Event::DataSent`] once the bytes are flushed.
    ///
    pub async fn send(&self, text: &str) -> Result<()> {
        if !self.is_connected() {
            return Err(ClientError::NotConnected);
        }
        let encoded = self.config.charset.encode(text)?;
        let mut escaped = BytesMut::with_capacity(encoded.len());
        TelnetCodec::new().encode(encoded.as_slice(), &mut escaped)?;
        self.shared.write(&escaped).await.inspect_err(|error| {
            error!("Failed to send data: {}", error);
        })?;
        trace!("Sent {} bytes", escaped.len());
        self.shared.bus.publish(&Event::DataSent {
            text: text.to_string(),
        });
        Ok(())
    }
}

impl std::fmt::Debug for TelnetTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelnetTransport")
            .field("address", &self.config.address())
            .field("state", &self.state())
            .finish()
    }
}
