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

//! TELNET session layer.
//!
//! Sits on top of `telnetq-telnetcodec` and turns decoded elements into
//! protocol behavior:
//!
//! - [`TelnetOption`] runs the Q method handshake (RFC 1143) for one option in
//!   one [`Role`], delegating subnegotiation to an [`OptionHandler`].
//! - [`Router`] maps commands, negotiations and subnegotiations to handlers,
//!   each with a fallback for anything unregistered.
//! - [`Session`] owns the options, the routers and the parser remainder, and
//!   turns received bytes into data callbacks plus the bytes to send back.
//! - [`Connection`] drives a session over an async [`Channel`].
//!
//! # Architecture
//!
//! ```text
//! Channel ─read─▶ Session::receive ─▶ Parser ─▶ Routers ─▶ TelnetOption / handlers
//!    ▲                                                          │
//!    └──────────────── write ◀── Generator ◀── Sink ◀───────────┘
//! ```
//!
//! Handlers never write to the transport directly. They send elements through
//! a [`Sink`], which generates them in order into the outgoing buffer.

#![warn(
    clippy::cargo,
    missing_docs,
    clippy::pedantic,
    future_incompatible,
    rust_2018_idioms
)]
#![allow(
    clippy::option_if_let_else,
    clippy::module_name_repetitions,
    clippy::missing_errors_doc
)]

mod channel;
mod config;
mod connection;
mod option;
mod registry;
mod result;
mod router;
mod session;
mod sink;

pub use self::channel::{Channel, StreamChannel};
pub use self::config::ConnectionConfig;
pub use self::connection::Connection;
pub use self::option::{Negotiable, OptionHandler, OptionState, Role, TelnetOption};
pub use self::registry::OptionRegistry;
pub use self::result::{SessionError, SessionResult};
pub use self::router::{
    CommandHandler, CommandRouter, NegotiationHandler, NegotiationRouter, Routable, Router,
    SubnegotiationHandler, SubnegotiationRouter,
};
pub use self::session::Session;
pub use self::sink::Sink;

pub use telnetq_telnetcodec as codec;
