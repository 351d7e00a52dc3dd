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


//! Minimal BBS client
//!
//! Connects to a BBS, redraws the emulated screen whenever it changes and forwards each
//! line typed on stdin.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --example bbs_client -- bbs.example.org 23
//! ```

use bbsterm_client::{ClientConfig, Event, EventKind, ScreenSnapshot, TerminalSession};
use std::io::{self, BufRead, Write};
use tokio::sync::mpsc;
use tracing::{error, info};

fn draw(snapshot: &ScreenSnapshot) {
    let mut stdout = io::stdout().lock();
    // Home the cursor and redraw every row.
    let _ = write!(stdout, "\x1b[H");
    for line in snapshot.lines() {
        let _ = writeln!(stdout, "{}", line.trim_end());
    }
    let _ = stdout.flush();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let host = args.get(1).map(String::as_str).unwrap_or("localhost");
    let port: u16 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(23);

    let session = TerminalSession::new(ClientConfig::new(host, port));
    let (closed_tx, mut closed_rx) = mpsc::unbounded_channel();
    session.bus().subscribe(EventKind::Disconnected, move |event| {
        if let Event::Disconnected { error } = event {
            let _ = closed_tx.send(error.clone());
        }
    });

    let mut screen = session.screen_updates();
    if !session.connect().await {
        let reason = closed_rx.recv().await.flatten();
        error!("Could not connect to {}:{}: {:?}", host, port, reason);
        return Ok(());
    }
    info!("Connected to {}:{}", host, port);

    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<String>();
    std::thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if input_tx.send(line).is_err() {
                break;
            }
        }
    });

    print!("\x1b[2J");
    loop {
        tokio::select! {
            changed = screen.changed() => {
                if changed.is_err() {
                    break;
                }
                draw(&screen.borrow_and_update());
            }
            Some(line) = input_rx.recv() => {
                if let Err(error) = session.send(&format!("{line}\r\n")).await {
                    error!("Send failed: {}", error);
                }
            }
            reason = closed_rx.recv() => {
                println!("\nDisconnected{}", reason.flatten().map(|r| format!(": {r}")).unwrap_or_default());
                break;
            }
        }
    }

    session.disconnect().await;
    Ok(())
}
