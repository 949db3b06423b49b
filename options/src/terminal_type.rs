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

//! TERMINAL-TYPE (RFC 1091).
//!
//! The [`Client`] asks with `SB TERMINAL-TYPE SEND`, the [`Server`] answers
//! with `SB TERMINAL-TYPE IS <name>`.

use bytes::{BufMut, Bytes, BytesMut};
use std::fmt;
use telnetq_session::{OptionHandler, Sink, TelnetOption};
use telnetq_telnetcodec::consts;
use tracing::{debug, trace};

/// Option code.
pub const OPTION: u8 = consts::option::TTYPE;
/// Subnegotiation prefix of an answer.
pub const IS: u8 = 0;
/// Subnegotiation prefix of a request.
pub const SEND: u8 = 1;

type TerminalTypeObserver = Box<dyn FnMut(Bytes, &mut dyn Sink) + Send>;

/// Asks for and records the peer's terminal type.
#[derive(Default)]
pub struct Client {
    terminal_type: Option<Bytes>,
    observers: Vec<TerminalTypeObserver>,
}

impl Client {
    /// Creates a handler with no terminal type known yet.
    pub fn new() -> Client {
        Client::default()
    }

    /// The last terminal type the peer announced.
    pub fn terminal_type(&self) -> Option<&Bytes> {
        self.terminal_type.as_ref()
    }

    /// Registers a callback run for every announcement received.
    pub fn on_terminal_type<F>(&mut self, observer: F)
    where
        F: FnMut(Bytes, &mut dyn Sink) + Send + 'static,
    {
        self.observers.push(Box::new(observer));
    }
}

impl OptionHandler for Client {
    fn handle_subnegotiation(&mut self, option: u8, content: Bytes, sink: &mut dyn Sink) {
        if content.first() != Some(&IS) {
            debug!(option, "Ignoring terminal type subnegotiation without IS");
            return;
        }
        let name = content.slice(1..);
        trace!(name = %String::from_utf8_lossy(&name), "Terminal type announced");
        self.terminal_type = Some(name.clone());
        for observer in &mut self.observers {
            observer(name.clone(), &mut *sink);
        }
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("terminal_type", &self.terminal_type)
            .field("observers", &self.observers.len())
            .finish()
    }
}

/// Requesting the terminal type through a TERMINAL-TYPE [`Client`] option.
pub trait RequestTerminalType {
    /// Sends `SEND` if the option is active.
    ///
    /// Returns false, sending nothing, otherwise.
    fn request_terminal_type(&mut self, sink: &mut dyn Sink) -> bool;
}

impl RequestTerminalType for TelnetOption<Client> {
    fn request_terminal_type(&mut self, sink: &mut dyn Sink) -> bool {
        if !self.is_active() {
            debug!(state = %self.state(), "Not requesting terminal type");
            return false;
        }
        sink.send_subnegotiation(OPTION, Bytes::from_static(&[SEND]));
        true
    }
}

/// Announces a fixed terminal type when asked.
#[derive(Clone, Debug)]
pub struct Server {
    terminal_type: Bytes,
}

impl Server {
    /// Creates a handler announcing `terminal_type`.
    pub fn new(terminal_type: impl Into<Bytes>) -> Server {
        Server {
            terminal_type: terminal_type.into(),
        }
    }

    /// The announced terminal type.
    pub fn terminal_type(&self) -> &Bytes {
        &self.terminal_type
    }
}

impl OptionHandler for Server {
    fn handle_subnegotiation(&mut self, option: u8, content: Bytes, sink: &mut dyn Sink) {
        if content[..] != [SEND] {
            debug!(option, "Ignoring terminal type subnegotiation without SEND");
            return;
        }
        let mut answer = BytesMut::with_capacity(1 + self.terminal_type.len());
        answer.put_u8(IS);
        answer.put_slice(&self.terminal_type);
        sink.send_subnegotiation(OPTION, answer.freeze());
    }
}

/// The side that asks for the terminal type.
pub fn client() -> TelnetOption<Client> {
    TelnetOption::client(OPTION, Client::new())
}

/// The side that announces `terminal_type`.
pub fn server(terminal_type: impl Into<Bytes>) -> TelnetOption<Server> {
    TelnetOption::server(OPTION, Server::new(terminal_type))
}
