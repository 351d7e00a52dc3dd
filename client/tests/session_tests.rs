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


//! Tests for TerminalSession screen updates

use bbsterm_client::{ClientConfig, Color, EventKind, TerminalSession};
use tokio::io::{AsyncReadExt, AsyncWriteExt, duplex};
use tokio::time::{Duration, timeout};

#[tokio::test]
async fn test_server_output_reaches_screen_updates() {
    let session = TerminalSession::new(ClientConfig::default());
    let mut screen = session.screen_updates();
    let (client, mut server) = duplex(8192);
    session.transport().attach(client, "bbs.example.org", 23).await;

    server
        .write_all(b"\x1b[2J\x1b[1;1H\x1b[1;36mWelcome \xb0\xb1\xb2")
        .await
        .unwrap();

    let snapshot = timeout(Duration::from_secs(5), async {
        loop {
            screen.changed().await.unwrap();
            let snapshot = screen.borrow_and_update().clone();
            if snapshot.lines()[0].starts_with("Welcome ░▒▓") {
                return snapshot;
            }
        }
    })
    .await
    .expect("screen update timed out");

    let cell = snapshot.cell(0, 0).unwrap();
    assert!(cell.bold);
    assert_eq!(cell.effective_foreground(), Color::BRIGHT_CYAN);
    assert_eq!(snapshot.cursor.col, 11);
}

#[tokio::test]
async fn test_ice_colors_in_session() {
    let session = TerminalSession::new(ClientConfig::default());
    let mut screen = session.screen_updates();
    let (client, mut server) = duplex(8192);
    session.transport().attach(client, "bbs.example.org", 23).await;

    server.write_all(b"\x1b[5;44mX").await.unwrap();
    let snapshot = timeout(Duration::from_secs(5), async {
        loop {
            screen.changed().await.unwrap();
            let snapshot = screen.borrow_and_update().clone();
            if snapshot.cell(0, 0).is_some_and(|cell| cell.character == 'X') {
                return snapshot;
            }
        }
    })
    .await
    .expect("screen update timed out");
    assert_eq!(snapshot.cell(0, 0).unwrap().background, Color::BRIGHT_BLUE);
}

#[tokio::test]
async fn test_session_resize_reports_new_size() {
    let session = TerminalSession::new(ClientConfig::default());
    let (client, mut server) = duplex(8192);
    session.transport().attach(client, "bbs.example.org", 23).await;
    session.resize(100, 30);

    server.write_all(&[255, 253, 31]).await.unwrap();
    let mut reply = [0u8; 12];
    timeout(Duration::from_secs(5), server.read_exact(&mut reply))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reply, [255, 251, 31, 255, 250, 31, 0, 100, 0, 30, 255, 240]);

    server.write_all(b"\x1b[6n").await.unwrap();
    let mut report = [0u8; 9];
    timeout(Duration::from_secs(5), server.read_exact(&mut report))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(&report, b"\x1b[30;100R");
    assert_eq!(session.snapshot().size.cols, 100);
}

#[tokio::test]
async fn test_session_send_and_disconnect() {
    let session = TerminalSession::new(ClientConfig::default());
    let (client, mut server) = duplex(8192);
    session.transport().attach(client, "bbs.example.org", 23).await;
    session.send("G\r\n").await.unwrap();
    let mut input = [0u8; 3];
    server.read_exact(&mut input).await.unwrap();
    assert_eq!(&input, b"G\r\n");

    session.disconnect().await;
    assert!(!session.transport().is_connected());
    assert_eq!(session.bus().listener_count(EventKind::DataReceived), 1);
}
