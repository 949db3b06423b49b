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

//! Standard TELNET options.
//!
//! Each module provides the option specific [`OptionHandler`] for one option
//! and `client()`/`server()` constructors returning a ready to install
//! [`TelnetOption`]. The negotiation itself is handled by
//! `telnetq-session`; these handlers only deal with subnegotiation content
//! and state change side effects.
//!
//! | Option | Code | Module |
//! |---|---|---|
//! | ECHO | 1 | [`echo`] |
//! | SUPPRESS-GO-AHEAD | 3 | [`suppress_ga`] |
//! | TERMINAL-TYPE | 24 | [`terminal_type`] |
//! | NAWS | 31 | [`naws`] |
//!
//! # Example
//!
//! ```
//! use telnetq_options::naws;
//! use telnetq_session::{Role, Session};
//!
//! let mut session = Session::new();
//! session.install(naws::client()).unwrap();
//! session.receive(b"\xFF\xFB\x1F", |_, _| {});
//! session.receive(b"\xFF\xFA\x1F\x00\x50\x00\x18\xFF\xF0", |_, _| {});
//!
//! let option = session.option::<naws::Client>(Role::Client, naws::OPTION).unwrap();
//! assert_eq!(option.handler().window_size(), Some(naws::WindowSize::new(80, 24)));
//! ```
//!
//! [`OptionHandler`]: telnetq_session::OptionHandler
//! [`TelnetOption`]: telnetq_session::TelnetOption

#![warn(
    clippy::cargo,
    missing_docs,
    clippy::pedantic,
    future_incompatible,
    rust_2018_idioms
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]

pub mod echo;
pub mod naws;
pub mod suppress_ga;
pub mod terminal_type;
