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

//! Options installed in a session, driven by raw wire bytes.

use bytes::Bytes;
use std::sync::{Arc, Mutex};
use telnetq_options::naws::{self, SetWindowSize, WindowSize};
use telnetq_options::terminal_type::{self, RequestTerminalType};
use telnetq_options::{echo, suppress_ga};
use telnetq_session::{Role, Session};

#[test]
fn typical_server_handshake() {
    let mut session = Session::new();
    session.install(echo::server()).unwrap();
    session.install(suppress_ga::server()).unwrap();
    session.install(naws::client()).unwrap();
    session.install(terminal_type::client()).unwrap();

    let mut offer = Vec::new();
    offer.extend_from_slice(&session.activate(Role::Server, echo::OPTION).unwrap());
    offer.extend_from_slice(&session.activate(Role::Server, suppress_ga::OPTION).unwrap());
    offer.extend_from_slice(&session.activate(Role::Client, naws::OPTION).unwrap());
    offer.extend_from_slice(&session.activate(Role::Client, terminal_type::OPTION).unwrap());
    assert_eq!(
        offer,
        b"\xFF\xFB\x01\xFF\xFB\x03\xFF\xFD\x1F\xFF\xFD\x18".to_vec()
    );

    let reply = session.receive(
        b"\xFF\xFD\x01\xFF\xFD\x03\xFF\xFB\x1F\xFF\xFB\x18\xFF\xFA\x1F\x00\x78\x00\x28\xFF\xF0",
        |_, _| {},
    );
    assert!(reply.is_empty());
    for (role, code) in [
        (Role::Server, echo::OPTION),
        (Role::Server, suppress_ga::OPTION),
        (Role::Client, naws::OPTION),
        (Role::Client, terminal_type::OPTION),
    ] {
        assert!(session.is_active(role, code), "{role} {code}");
    }
    let window = session
        .option::<naws::Client>(Role::Client, naws::OPTION)
        .and_then(|option| option.handler().window_size());
    assert_eq!(window, Some(WindowSize::new(120, 40)));

    let (sent, request) = session
        .with_option::<terminal_type::Client, _, _>(
            Role::Client,
            terminal_type::OPTION,
            |option, sink| option.request_terminal_type(sink),
        )
        .unwrap();
    assert!(sent);
    assert_eq!(&request[..], b"\xFF\xFA\x18\x01\xFF\xF0");

    session.receive(b"\xFF\xFA\x18\x00ANSI\xFF\xF0", |_, _| {});
    let name = session
        .option::<terminal_type::Client>(Role::Client, terminal_type::OPTION)
        .and_then(|option| option.handler().terminal_type().cloned());
    assert_eq!(name.as_deref(), Some(&b"ANSI"[..]));
}

#[test]
fn terminal_type_requested_from_activation_observer() {
    let mut option = terminal_type::client();
    option.on_state_changed(|state, sink| {
        if state == telnetq_session::OptionState::Active {
            sink.send_subnegotiation(terminal_type::OPTION, Bytes::from_static(&[terminal_type::SEND]));
        }
    });
    let mut session = Session::new();
    session.install(option).unwrap();

    let reply = session.receive(b"\xFF\xFB\x18", |_, _| {});
    assert_eq!(&reply[..], b"\xFF\xFD\x18\xFF\xFA\x18\x01\xFF\xF0");
}

#[test]
fn window_size_change_while_active() {
    let mut session = Session::new();
    session.install(naws::server()).unwrap();
    session.receive(b"\xFF\xFD\x1F", |_, _| {});

    let ((), report) = session
        .with_option::<naws::Server, _, _>(Role::Server, naws::OPTION, |option, sink| {
            option.set_window_size(WindowSize::new(80, 24), sink);
        })
        .unwrap();
    assert_eq!(&report[..], b"\xFF\xFA\x1F\x00\x50\x00\x18\xFF\xF0");
}

#[test]
fn window_size_observer_sees_every_report() {
    let sizes = Arc::new(Mutex::new(Vec::new()));
    let mut option = naws::client();
    let seen = Arc::clone(&sizes);
    option
        .handler_mut()
        .on_window_size_changed(move |size, _| seen.lock().unwrap().push(size));

    let mut session = Session::new();
    session.install(option).unwrap();
    session.receive(b"\xFF\xFB\x1F\xFF\xFA\x1F\x00\x50\x00\x18\xFF\xF0", |_, _| {});
    session.receive(b"\xFF\xFA\x1F\x00\x50\xFF\xFF\xFF\xF0", |_, _| {});
    session.receive(b"\xFF\xFA\x1F\x00\x50\x00\x19\xFF\xF0", |_, _| {});

    assert_eq!(
        *sizes.lock().unwrap(),
        vec![WindowSize::new(80, 24), WindowSize::new(80, 25)]
    );
}
