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

//! Two connections negotiating with each other over an in-memory pipe.

use telnetq_session::{Connection, OptionState, Role, Session, StreamChannel, TelnetOption};
use telnetq_telnetcodec::Command;
use tokio::io::DuplexStream;

type Endpoint = Connection<StreamChannel<DuplexStream>>;

fn pair(server: Session, client: Session) -> (Endpoint, Endpoint) {
    let (near, far) = tokio::io::duplex(4096);
    (
        Connection::new(StreamChannel::new(near), server),
        Connection::new(StreamChannel::new(far), client),
    )
}

#[tokio::test]
async fn server_and_client_agree_on_echo() {
    let mut server_session = Session::new();
    server_session.install(TelnetOption::server(1, ())).unwrap();
    let mut client_session = Session::new();
    client_session.install(TelnetOption::client(1, ())).unwrap();
    let (mut server, mut client) = pair(server_session, client_session);

    server.activate(Role::Server, 1).await.unwrap();
    assert_eq!(
        server.session().state(Role::Server, 1),
        Some(OptionState::Activating)
    );

    client.read(|_, _| {}).await.unwrap();
    assert!(client.session().is_active(Role::Client, 1));

    server.read(|_, _| {}).await.unwrap();
    assert!(server.session().is_active(Role::Server, 1));
}

#[tokio::test]
async fn refusal_from_a_bare_peer() {
    let mut server_session = Session::new();
    server_session.install(TelnetOption::server(3, ())).unwrap();
    let (mut server, mut client) = pair(server_session, Session::new());

    server.activate(Role::Server, 3).await.unwrap();
    client.read(|_, _| {}).await.unwrap();
    server.read(|_, _| {}).await.unwrap();

    assert_eq!(
        server.session().state(Role::Server, 3),
        Some(OptionState::Inactive)
    );
}

#[tokio::test]
async fn data_and_commands_cross_the_pipe() {
    let mut server_session = Session::new();
    server_session.install_command(Command::AYT, |_, sink| sink.send_data("[yes]"));
    let (mut server, mut client) = pair(server_session, Session::new());

    client.write(&b"ping\xFF"[..]).await.unwrap();
    client.write(Command::AYT).await.unwrap();

    let mut received = Vec::new();
    server
        .read(|bytes, _| received.extend_from_slice(&bytes))
        .await
        .unwrap();
    assert_eq!(received, b"ping\xFF");

    let mut answer = Vec::new();
    client
        .read(|bytes, _| answer.extend_from_slice(&bytes))
        .await
        .unwrap();
    assert_eq!(answer, b"[yes]");
}

#[tokio::test]
async fn closing_ends_the_peer_loop() {
    let (mut server, mut client) = pair(Session::new(), Session::new());
    client.write("bye").await.unwrap();
    client.close().await.unwrap();

    let mut received = Vec::new();
    server
        .run(|bytes, _| received.extend_from_slice(&bytes))
        .await
        .unwrap();
    assert_eq!(received, b"bye");
    assert!(!server.is_alive());
}
