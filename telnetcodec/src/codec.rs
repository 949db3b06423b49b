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

use crate::{CodecError, Element, Parser, generator};
use bytes::BytesMut;
use std::collections::VecDeque;
use tokio_util::codec::{Decoder, Encoder};
use tracing::warn;

/// A `tokio_util` codec yielding TELNET [`Element`]s.
///
/// Decoding drains the read buffer into a [`Parser`], which holds any
/// incomplete token until the next read. Elements parsed in one pass are
/// queued so each `decode` call hands out one.
///
/// ```
/// use bytes::BytesMut;
/// use telnetq_telnetcodec::{Element, TelnetCodec};
/// use tokio_util::codec::Decoder;
///
/// let mut codec = TelnetCodec::new();
/// let mut src = BytesMut::from(&b"Hello\xFF\xFD\x01"[..]);
/// assert_eq!(codec.decode(&mut src).unwrap(), Some(Element::from("Hello")));
/// assert!(matches!(codec.decode(&mut src).unwrap(), Some(Element::Negotiation(_))));
/// assert_eq!(codec.decode(&mut src).unwrap(), None);
/// ```
#[derive(Debug, Default)]
pub struct TelnetCodec {
    parser: Parser,
    decoded: VecDeque<Element>,
}

impl TelnetCodec {
    /// Creates a new instance of `TelnetCodec`.
    pub fn new() -> TelnetCodec {
        TelnetCodec::default()
    }
}

impl Decoder for TelnetCodec {
    type Item = Element;
    type Error = CodecError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Element>, Self::Error> {
        if self.decoded.is_empty() && !src.is_empty() {
            let TelnetCodec { parser, decoded } = self;
            parser.parse(&src[..], |element| decoded.push_back(element));
            src.clear();
        }
        Ok(self.decoded.pop_front())
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Element>, Self::Error> {
        if let Some(element) = self.decode(src)? {
            return Ok(Some(element));
        }
        let pending = self.parser.remainder().len();
        if pending > 0 {
            warn!(pending, "Discarding incomplete token at end of stream");
            self.parser.reset();
        }
        Ok(None)
    }
}

impl Encoder<Element> for TelnetCodec {
    type Error = CodecError;

    fn encode(&mut self, item: Element, dst: &mut BytesMut) -> Result<(), Self::Error> {
        generator::generate_into(&item, dst);
        Ok(())
    }
}

impl Encoder<&[u8]> for TelnetCodec {
    type Error = CodecError;

    /// Encodes a slice as plain data, doubling any `IAC` bytes.
    fn encode(&mut self, item: &[u8], dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.reserve(item.len());
        generator::escape(item, &mut |chunk: &[u8]| dst.extend_from_slice(chunk));
        Ok(())
    }
}
