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

//! Negotiate About Window Size (RFC 1073).
//!
//! The side holding the terminal offers `WILL NAWS` and, once active, reports
//! its size as a subnegotiation of two big-endian 16 bit values. In session
//! roles that is [`Server`]; the side that wants to know the size is
//! [`Client`].

use byteorder::{BigEndian, ByteOrder};
use bytes::Bytes;
use std::fmt;
use telnetq_session::{OptionHandler, OptionState, Sink, TelnetOption};
use telnetq_telnetcodec::consts;
use tracing::{debug, trace};

/// Option code.
pub const OPTION: u8 = consts::option::NAWS;

/// Terminal dimensions in character cells.
///
/// # Example
/// ```
/// use telnetq_options::naws::WindowSize;
///
/// let size = WindowSize::new(80, 24);
/// assert_eq!(size.encode(), [0x00, 0x50, 0x00, 0x18]);
/// assert_eq!(WindowSize::decode(&size.encode()), Some(size));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WindowSize {
    /// Columns.
    pub width: u16,
    /// Rows.
    pub height: u16,
}

impl WindowSize {
    /// Length of an encoded report.
    pub const ENCODED_LEN: usize = 4;

    /// Creates a window size.
    pub const fn new(width: u16, height: u16) -> WindowSize {
        WindowSize { width, height }
    }

    /// Encodes as `WIDTH-HIGH WIDTH-LOW HEIGHT-HIGH HEIGHT-LOW`.
    pub fn encode(&self) -> [u8; Self::ENCODED_LEN] {
        let mut buf = [0u8; Self::ENCODED_LEN];
        BigEndian::write_u16(&mut buf[0..2], self.width);
        BigEndian::write_u16(&mut buf[2..4], self.height);
        buf
    }

    /// Decodes a report. Anything but exactly four bytes is rejected.
    pub fn decode(content: &[u8]) -> Option<WindowSize> {
        if content.len() != Self::ENCODED_LEN {
            return None;
        }
        Some(WindowSize {
            width: BigEndian::read_u16(&content[0..2]),
            height: BigEndian::read_u16(&content[2..4]),
        })
    }
}

impl Default for WindowSize {
    /// The traditional 80x24 terminal.
    fn default() -> Self {
        WindowSize::new(80, 24)
    }
}

impl fmt::Display for WindowSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

type WindowSizeObserver = Box<dyn FnMut(WindowSize, &mut dyn Sink) + Send>;

/// Receives window size reports.
#[derive(Default)]
pub struct Client {
    window_size: Option<WindowSize>,
    observers: Vec<WindowSizeObserver>,
}

impl Client {
    /// Creates a handler with no size known yet.
    pub fn new() -> Client {
        Client::default()
    }

    /// The last size the peer reported.
    pub fn window_size(&self) -> Option<WindowSize> {
        self.window_size
    }

    /// Registers a callback run for every report received.
    pub fn on_window_size_changed<F>(&mut self, observer: F)
    where
        F: FnMut(WindowSize, &mut dyn Sink) + Send + 'static,
    {
        self.observers.push(Box::new(observer));
    }
}

impl OptionHandler for Client {
    fn handle_subnegotiation(&mut self, option: u8, content: Bytes, sink: &mut dyn Sink) {
        let Some(size) = WindowSize::decode(&content) else {
            debug!(option, len = content.len(), "Ignoring malformed window size report");
            return;
        };
        trace!(%size, "Window size reported");
        self.window_size = Some(size);
        for observer in &mut self.observers {
            observer(size, &mut *sink);
        }
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("window_size", &self.window_size)
            .field("observers", &self.observers.len())
            .finish()
    }
}

/// Reports the local window size.
#[derive(Clone, Copy, Debug, Default)]
pub struct Server {
    window_size: Option<WindowSize>,
}

impl Server {
    /// Creates a handler with no size to report yet.
    pub fn new() -> Server {
        Server::default()
    }

    /// Creates a handler that reports `size` once active.
    pub fn with_window_size(size: WindowSize) -> Server {
        Server {
            window_size: Some(size),
        }
    }

    /// The size that is, or will be, reported.
    pub fn window_size(&self) -> Option<WindowSize> {
        self.window_size
    }

    fn report(&self, sink: &mut dyn Sink) {
        if let Some(size) = self.window_size {
            sink.send_subnegotiation(OPTION, Bytes::copy_from_slice(&size.encode()));
        }
    }
}

impl OptionHandler for Server {
    fn state_changed(&mut self, _option: u8, state: OptionState, sink: &mut dyn Sink) {
        if state == OptionState::Active {
            self.report(sink);
        }
    }
}

/// Updating the size reported by a NAWS [`Server`] option.
pub trait SetWindowSize {
    /// Records a new size and reports it if the option is active.
    fn set_window_size(&mut self, size: WindowSize, sink: &mut dyn Sink);
}

impl SetWindowSize for TelnetOption<Server> {
    fn set_window_size(&mut self, size: WindowSize, sink: &mut dyn Sink) {
        self.handler_mut().window_size = Some(size);
        if self.is_active() {
            self.handler().report(sink);
        }
    }
}

/// The side that wants to learn the window size.
pub fn client() -> TelnetOption<Client> {
    TelnetOption::client(OPTION, Client::new())
}

/// The side that reports its window size.
pub fn server() -> TelnetOption<Server> {
    TelnetOption::server(OPTION, Server::new())
}
