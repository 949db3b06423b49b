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

//! Output sinks for generated elements.
//!
//! Options, routes and data callbacks never return what they want to send;
//! they push it into the [`Sink`] they were handed. The session passes a
//! sink that generates wire bytes immediately, so output lands in the order
//! it was produced.

use bytes::{Bytes, BytesMut};
use telnetq_telnetcodec::{Element, Negotiation, Subnegotiation, Verb, generate_into};

/// Receives outgoing elements.
pub trait Sink {
    /// Queues `element` for transmission.
    fn send(&mut self, element: Element);
}

impl dyn Sink + '_ {
    /// Sends a plain data span.
    pub fn send_data(&mut self, data: impl Into<Bytes>) {
        self.send(Element::Data(data.into()));
    }

    /// Sends `IAC <verb> <option>`.
    pub fn send_negotiation(&mut self, verb: Verb, option: u8) {
        self.send(Element::Negotiation(Negotiation::new(verb, option)));
    }

    /// Sends `IAC SB <option> <content> IAC SE`.
    pub fn send_subnegotiation(&mut self, option: u8, content: impl Into<Bytes>) {
        self.send(Element::Subnegotiation(Subnegotiation::new(option, content)));
    }
}

/// Collects elements as they are sent.
impl Sink for Vec<Element> {
    fn send(&mut self, element: Element) {
        self.push(element);
    }
}

/// Generates the wire form of each element straight into the buffer.
impl Sink for BytesMut {
    fn send(&mut self, element: Element) {
        generate_into(&element, self);
    }
}
