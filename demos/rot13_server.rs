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

//! ROT13 Server Example
//!
//! A telnet server that answers every line with its ROT13 form. It offers
//! ECHO and SUPPRESS-GO-AHEAD, asks for NAWS and TERMINAL-TYPE, and logs what
//! the client reports.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p telnetq-options --example rot13_server
//! telnet localhost 2323
//! ```

use bytes::Bytes;
use std::net::SocketAddr;
use telnetq_options::{echo, naws, suppress_ga, terminal_type};
use telnetq_session::{
    Connection, OptionState, Role, Session, SessionResult, StreamChannel,
};
use tokio::net::{TcpListener, TcpStream};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let listener = TcpListener::bind("127.0.0.1:2323").await?;
    info!("Listening on {}", listener.local_addr()?);

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                let (stream, peer) = accepted?;
                tokio::spawn(async move {
                    match serve(stream, peer).await {
                        Ok(()) => info!(%peer, "Client disconnected"),
                        Err(err) => warn!(%peer, %err, "Connection failed"),
                    }
                });
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down");
                return Ok(());
            }
        }
    }
}

fn session_for(peer: SocketAddr) -> SessionResult<Session> {
    let mut session = Session::new();
    session.install(echo::server())?;
    session.install(suppress_ga::server())?;

    let mut window = naws::client();
    window
        .handler_mut()
        .on_window_size_changed(move |size, _| info!(%peer, %size, "Window size"));
    session.install(window)?;

    let mut ttype = terminal_type::client();
    ttype.on_state_changed(|state, sink| {
        if state == OptionState::Active {
            sink.send_subnegotiation(terminal_type::OPTION, Bytes::from_static(&[terminal_type::SEND]));
        }
    });
    ttype.handler_mut().on_terminal_type(move |name, sink| {
        let name = String::from_utf8_lossy(&name).into_owned();
        info!(%peer, %name, "Terminal type");
        sink.send_data(format!("Hello, {name} user.\r\n"));
    });
    session.install(ttype)?;

    Ok(session)
}

async fn serve(stream: TcpStream, peer: SocketAddr) -> SessionResult<()> {
    info!(%peer, "Client connected");
    let mut connection = Connection::new(StreamChannel::new(stream), session_for(peer)?);

    connection.activate(Role::Server, echo::OPTION).await?;
    connection.activate(Role::Server, suppress_ga::OPTION).await?;
    connection.activate(Role::Client, naws::OPTION).await?;
    connection.activate(Role::Client, terminal_type::OPTION).await?;
    connection.write("Type something, it comes back in ROT13.\r\n").await?;

    connection
        .run(|data, sink| sink.send_data(rot13(&data)))
        .await?;
    connection.close().await
}

fn rot13(data: &[u8]) -> Vec<u8> {
    data.iter()
        .map(|&byte| match byte {
            b'a'..=b'z' => (byte - b'a' + 13) % 26 + b'a',
            b'A'..=b'Z' => (byte - b'A' + 13) % 26 + b'A',
            _ => byte,
        })
        .collect()
}
