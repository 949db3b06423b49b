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

//! Incremental TELNET parser.
//!
//! [`parse`] walks a byte slice through the TELNET framing state machine and
//! hands every complete [`Element`] to a callback. Whatever trails the last
//! complete token is returned untouched so the caller can prepend it to the
//! next read. [`Parser`] keeps the state machine itself between calls, so a
//! token split across reads is never scanned twice.

use crate::{Command, Element, Negotiation, Subnegotiation, Verb, consts};
use bytes::{BufMut, BytesMut};
use tracing::{trace, warn};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum State {
    #[default]
    Idle,
    SawIac,
    SawNegotiationVerb(Verb),
    SawSubnegotiationBegin,
    InSubnegotiationContent,
    InSubnegotiationContentSawIac,
}

/// State machine and scratch buffers.
#[derive(Debug, Default)]
struct Scan {
    state: State,
    data: BytesMut,
    option: u8,
    content: BytesMut,
}

impl Scan {
    /// Emits the pending data span, if any.
    fn flush_data<F: FnMut(Element)>(&mut self, on_element: &mut F) {
        if !self.data.is_empty() {
            on_element(Element::Data(self.data.split().freeze()));
        }
    }

    fn emit<F: FnMut(Element)>(&mut self, element: Element, on_element: &mut F) {
        self.flush_data(on_element);
        on_element(element);
    }

    fn step<F: FnMut(Element)>(&mut self, byte: u8, on_element: &mut F) {
        self.state = match (self.state, byte) {
            (State::Idle, consts::IAC) => State::SawIac,
            (State::Idle, _) => {
                self.data.put_u8(byte);
                State::Idle
            }
            (State::SawIac, consts::IAC) => {
                self.data.put_u8(consts::IAC);
                State::Idle
            }
            (State::SawIac, consts::SB) => State::SawSubnegotiationBegin,
            (State::SawIac, _) => match Verb::from_u8(byte) {
                Some(verb) => State::SawNegotiationVerb(verb),
                None => {
                    // Everything below SB is a plain command code.
                    self.emit(Element::Command(Command(byte)), on_element);
                    State::Idle
                }
            },
            (State::SawNegotiationVerb(verb), option) => {
                self.emit(
                    Element::Negotiation(Negotiation::new(verb, option)),
                    on_element,
                );
                State::Idle
            }
            (State::SawSubnegotiationBegin, option) => {
                self.option = option;
                self.content.clear();
                State::InSubnegotiationContent
            }
            (State::InSubnegotiationContent, consts::IAC) => State::InSubnegotiationContentSawIac,
            (State::InSubnegotiationContent, _) => {
                self.content.put_u8(byte);
                State::InSubnegotiationContent
            }
            (State::InSubnegotiationContentSawIac, consts::SE) => {
                let content = self.content.split().freeze();
                self.emit(
                    Element::Subnegotiation(Subnegotiation::new(self.option, content)),
                    on_element,
                );
                State::Idle
            }
            (State::InSubnegotiationContentSawIac, consts::IAC) => {
                self.content.put_u8(consts::IAC);
                State::InSubnegotiationContent
            }
            (State::InSubnegotiationContentSawIac, _) => {
                // Only SE or a second IAC may follow IAC here. Keep the byte
                // as content and wait for the real IAC SE.
                warn!(
                    option = self.option,
                    "Unexpected byte {:#04X} after IAC in subnegotiation", byte
                );
                self.content.put_u8(byte);
                State::InSubnegotiationContent
            }
        };
    }

    /// Runs `input` through the state machine.
    ///
    /// Returns the length of the longest prefix of `input` after which the
    /// machine was idle. The pending data span is flushed before returning.
    fn feed<F: FnMut(Element)>(&mut self, input: &[u8], on_element: &mut F) -> usize {
        let mut consumed = 0;
        let mut index = 0;

        while index < input.len() {
            // Copy plain runs in one go instead of byte by byte.
            let run_target = match self.state {
                State::Idle => Some(&mut self.data),
                State::InSubnegotiationContent => Some(&mut self.content),
                _ => None,
            };
            if let Some(target) = run_target {
                let rest = &input[index..];
                let run = rest
                    .iter()
                    .position(|&byte| byte == consts::IAC)
                    .unwrap_or(rest.len());
                if run > 0 {
                    target.extend_from_slice(&rest[..run]);
                    index += run;
                    if self.state == State::Idle {
                        consumed = index;
                    }
                    continue;
                }
            }

            self.step(input[index], on_element);
            index += 1;
            if self.state == State::Idle {
                consumed = index;
            }
        }

        self.flush_data(on_element);
        consumed
    }
}

/// Parses as many complete elements out of `input` as possible.
///
/// Each element is passed to `on_element` in wire order. Plain data is
/// coalesced into a single [`Element::Data`] span that is emitted before the
/// next non-data element or at the end of the input; an escaped `IAC IAC`
/// does not split a span.
///
/// # Returns
///
/// The unconsumed suffix of `input`. It is empty unless the input ends part
/// way through a command, negotiation or subnegotiation, in which case it
/// starts at the `IAC` introducing that token. Feeding the suffix followed by
/// further bytes to another call continues the parse.
///
/// # Example
/// ```
/// use telnetq_telnetcodec::{parse, Element, Negotiation, Verb};
///
/// let mut elements = Vec::new();
/// let rest = parse(b"hi\xFF\xFB\x01\xFF\xFA", |e| elements.push(e));
/// assert_eq!(
///     elements,
///     vec![Element::from("hi"), Negotiation::new(Verb::Will, 1).into()]
/// );
/// assert_eq!(rest, b"\xFF\xFA");
/// ```
pub fn parse<F>(input: &[u8], mut on_element: F) -> &[u8]
where
    F: FnMut(Element),
{
    let consumed = Scan::default().feed(input, &mut on_element);
    if consumed < input.len() {
        trace!(pending = input.len() - consumed, "Holding incomplete token");
    }
    &input[consumed..]
}

/// A resumable parser that carries an incomplete token between calls.
///
/// The state machine is kept rather than the raw bytes, so each input byte
/// is scanned once however the stream is fragmented.
///
/// ```
/// use telnetq_telnetcodec::{Element, Parser, Subnegotiation};
///
/// let mut parser = Parser::new();
/// let mut elements = Vec::new();
/// parser.parse(b"\xFF\xFA\x05A", |e| elements.push(e));
/// assert!(elements.is_empty());
/// assert_eq!(parser.remainder(), b"\xFF\xFA\x05A");
/// parser.parse(b"B\xFF\xF0", |e| elements.push(e));
/// assert_eq!(elements, vec![Element::from(Subnegotiation::new(5, &b"AB"[..]))]);
/// ```
#[derive(Debug, Default)]
pub struct Parser {
    scan: Scan,
    held: BytesMut,
}

impl Parser {
    /// Creates an idle parser.
    pub fn new() -> Parser {
        Parser::default()
    }

    /// Continues parsing with `input`.
    pub fn parse<F>(&mut self, input: &[u8], mut on_element: F)
    where
        F: FnMut(Element),
    {
        let consumed = self.scan.feed(input, &mut on_element);
        if consumed > 0 {
            self.held.clear();
        }
        self.held.extend_from_slice(&input[consumed..]);
    }

    /// Raw bytes of the incomplete token waiting for more input.
    pub fn remainder(&self) -> &[u8] {
        &self.held
    }

    /// Discards any incomplete token.
    pub fn reset(&mut self) {
        self.scan = Scan::default();
        self.held.clear();
    }
}
