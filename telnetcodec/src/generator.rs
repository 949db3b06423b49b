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

//! TELNET generator, the inverse of [`parse`](crate::parse).
//!
//! Output is produced as a series of borrowed chunks so a large data span or
//! subnegotiation body can be streamed without being copied into an
//! intermediate buffer. [`generate_into`] is the buffered convenience used by
//! the codec and the session.

use crate::{Element, consts};
use bytes::{BufMut, BytesMut};

const IAC: &[u8] = &[consts::IAC];
const SE: &[u8] = &[consts::IAC, consts::SE];

/// Emits `bytes` with every `IAC` doubled.
pub(crate) fn escape<F: FnMut(&[u8])>(bytes: &[u8], on_chunk: &mut F) {
    for piece in bytes.split_inclusive(|&byte| byte == consts::IAC) {
        on_chunk(piece);
        if piece.last() == Some(&consts::IAC) {
            on_chunk(IAC);
        }
    }
}

/// Generates the wire form of a single element.
///
/// # Example
/// ```
/// use telnetq_telnetcodec::{generate, Element};
///
/// let mut wire = Vec::new();
/// generate(&Element::from(&b"a\xFFb"[..]), |chunk| wire.extend_from_slice(chunk));
/// assert_eq!(wire, b"a\xFF\xFFb");
/// ```
pub fn generate<F>(element: &Element, mut on_chunk: F)
where
    F: FnMut(&[u8]),
{
    match element {
        Element::Data(data) => escape(data, &mut on_chunk),
        Element::Command(command) => on_chunk(&[consts::IAC, command.code()]),
        Element::Negotiation(negotiation) => on_chunk(&[
            consts::IAC,
            negotiation.verb().to_u8(),
            negotiation.option(),
        ]),
        Element::Subnegotiation(subnegotiation) => {
            on_chunk(&[consts::IAC, consts::SB, subnegotiation.option()]);
            escape(subnegotiation.content(), &mut on_chunk);
            on_chunk(SE);
        }
    }
}

/// Generates a sequence of elements back to back.
pub fn generate_all<'a, I, F>(elements: I, mut on_chunk: F)
where
    I: IntoIterator<Item = &'a Element>,
    F: FnMut(&[u8]),
{
    for element in elements {
        generate(element, &mut on_chunk);
    }
}

/// Number of wire bytes `element` generates.
pub fn encoded_len(element: &Element) -> usize {
    fn escaped_len(bytes: &[u8]) -> usize {
        bytes.len() + bytes.iter().filter(|&&byte| byte == consts::IAC).count()
    }
    match element {
        Element::Data(data) => escaped_len(data),
        Element::Command(_) => 2,
        Element::Negotiation(_) => 3,
        Element::Subnegotiation(subnegotiation) => 5 + escaped_len(subnegotiation.content()),
    }
}

/// Appends the wire form of `element` to `dst`.
pub fn generate_into(element: &Element, dst: &mut BytesMut) {
    dst.reserve(encoded_len(element));
    generate(element, |chunk| dst.put_slice(chunk));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Command, Negotiation, Subnegotiation, Verb};

    fn wire(element: Element) -> Vec<u8> {
        let mut out = Vec::new();
        generate(&element, |chunk| out.extend_from_slice(chunk));
        out
    }

    // ============================================================================
    // Data
    // ============================================================================

    #[test]
    fn generate_plain_data() {
        assert_eq!(wire(Element::from("TEST")), b"TEST");
    }

    #[test]
    fn generate_data_iac_is_escaped() {
        assert_eq!(wire(Element::from(&b"TEST\xFF"[..])), b"TEST\xFF\xFF");
        assert_eq!(wire(Element::from(&b"\xFF\xFF"[..])), b"\xFF\xFF\xFF\xFF");
    }

    #[test]
    fn generate_data_streams_without_copying() {
        let element = Element::from(&b"ab\xFFcd"[..]);
        let mut chunks = Vec::new();
        generate(&element, |chunk| chunks.push(chunk.to_vec()));
        assert_eq!(chunks, vec![b"ab\xFF".to_vec(), vec![0xFF], b"cd".to_vec()]);
    }

    #[test]
    fn generate_empty_data_emits_nothing() {
        assert!(wire(Element::from("")).is_empty());
    }

    // ============================================================================
    // Commands, Negotiations, Subnegotiations
    // ============================================================================

    #[test]
    fn generate_command() {
        assert_eq!(wire(Command::AYT.into()), vec![consts::IAC, consts::AYT]);
    }

    #[test]
    fn generate_negotiation() {
        assert_eq!(
            wire(Negotiation::new(Verb::Dont, 0xAB).into()),
            vec![consts::IAC, consts::DONT, 0xAB]
        );
    }

    #[test]
    fn generate_subnegotiation_with_iac_in_content() {
        assert_eq!(
            wire(Subnegotiation::new(0x05, &b"A\xFFB"[..]).into()),
            vec![255, 250, 0x05, 0x41, 255, 255, 0x42, 255, 240]
        );
    }

    #[test]
    fn generate_empty_subnegotiation() {
        assert_eq!(
            wire(Subnegotiation::new(24, &b""[..]).into()),
            vec![255, 250, 24, 255, 240]
        );
    }

    #[test]
    fn generate_into_matches_encoded_len() {
        let elements = [
            Element::from(&b"x\xFFy"[..]),
            Command::NOP.into(),
            Negotiation::new(Verb::Will, 1).into(),
            Subnegotiation::new(31, &b"\x00\xFF\x00\x18"[..]).into(),
        ];
        for element in &elements {
            let mut dst = BytesMut::new();
            generate_into(element, &mut dst);
            assert_eq!(dst.len(), encoded_len(element));
            assert_eq!(dst.to_vec(), wire(element.clone()));
        }
    }

    #[test]
    fn generate_all_concatenates() {
        let elements = vec![Element::from("hi"), Command::GA.into()];
        let mut out = Vec::new();
        generate_all(&elements, |chunk| out.extend_from_slice(chunk));
        assert_eq!(out, b"hi\xFF\xF9");
    }
}
