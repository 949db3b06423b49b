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

//! # telnetq Telnet Protocol Codec
//!
//! The wire layer of the telnetq workspace: TELNET value types, an incremental
//! parser, its inverse generator and a `tokio_util` codec built from the two.
//!
//! ## Overview
//!
//! The Telnet protocol (RFC 854) interleaves plain data with in-band control
//! sequences introduced by the IAC (Interpret As Command, 0xFF) byte:
//!
//! - **Data**: any byte other than IAC; a literal 0xFF is sent as `IAC IAC`
//! - **Commands**: `IAC <code>`, e.g. `IAC AYT`
//! - **Negotiations**: `IAC <WILL|WONT|DO|DONT> <option>`
//! - **Subnegotiations**: `IAC SB <option> <content> IAC SE`, content escaped like data
//!
//! ## Core Components
//!
//! ### [`Element`]
//!
//! The unit exchanged with the rest of the system: a data span, a [`Command`],
//! a [`Negotiation`] or a [`Subnegotiation`]. All are plain values; data and
//! subnegotiation content are reference counted [`bytes::Bytes`].
//!
//! ### [`parse`] and [`Parser`]
//!
//! `parse(bytes, on_element)` emits every complete element and returns the
//! unconsumed suffix. [`Parser`] keeps that suffix between calls so input can
//! arrive in arbitrary fragments.
//!
//! ### [`generate`]
//!
//! The exact inverse of the parser, streaming escaped chunks to a callback.
//!
//! ### [`TelnetCodec`]
//!
//! `Decoder`/`Encoder` pair for use with `tokio_util::codec::Framed`.
//!
//! ## Usage Example
//!
//! ```rust
//! use telnetq_telnetcodec::{generate, parse, Command, Element};
//!
//! let mut wire = Vec::new();
//! for element in [Element::from(&b"ok\xFF"[..]), Command::AYT.into()] {
//!     generate(&element, |chunk| wire.extend_from_slice(chunk));
//! }
//! assert_eq!(wire, b"ok\xFF\xFF\xFF\xF6");
//!
//! let mut decoded = Vec::new();
//! let rest = parse(&wire, |element| decoded.push(element));
//! assert!(rest.is_empty());
//! assert_eq!(decoded.len(), 2);
//! ```
//!
//! ## Error Handling
//!
//! Parsing never fails. Incomplete tokens stay in the remainder. Inside a
//! subnegotiation, a byte after `IAC` other than `SE` or `IAC` is kept as
//! content and the subnegotiation runs on until `IAC SE`.
//! [`CodecError`] covers stream I/O and invalid verb or command bytes.
//!
//! ## Related RFCs
//!
//! - RFC 854: Telnet Protocol Specification
//! - RFC 855: Telnet Option Specifications

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

mod codec;
pub mod consts;
mod element;
mod generator;
mod parser;
mod result;

pub use self::codec::TelnetCodec;
pub use self::element::{Command, Element, Negotiation, Subnegotiation, Verb};
pub use self::generator::{encoded_len, generate, generate_all, generate_into};
pub use self::parser::{Parser, parse};
pub use self::result::{CodecError, CodecResult};
