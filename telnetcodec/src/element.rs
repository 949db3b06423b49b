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

//! Protocol value types exchanged between the parser, the generator and the session layer.

use crate::{CodecError, consts};
use bytes::Bytes;
use std::fmt;

/// One of the four negotiation verbs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Verb {
    /// `WILL` (251)
    Will,
    /// `WONT` (252)
    Wont,
    /// `DO` (253)
    Do,
    /// `DONT` (254)
    Dont,
}

impl Verb {
    /// Wire value of this verb.
    pub const fn to_u8(self) -> u8 {
        match self {
            Verb::Will => consts::WILL,
            Verb::Wont => consts::WONT,
            Verb::Do => consts::DO,
            Verb::Dont => consts::DONT,
        }
    }

    /// Maps a wire byte to a verb, returning `None` for anything outside 251..=254.
    pub const fn from_u8(byte: u8) -> Option<Verb> {
        match byte {
            consts::WILL => Some(Verb::Will),
            consts::WONT => Some(Verb::Wont),
            consts::DO => Some(Verb::Do),
            consts::DONT => Some(Verb::Dont),
            _ => None,
        }
    }

    /// True for `WILL` and `DO`.
    pub const fn is_positive(self) -> bool {
        matches!(self, Verb::Will | Verb::Do)
    }
}

impl TryFrom<u8> for Verb {
    type Error = CodecError;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        Verb::from_u8(byte).ok_or(CodecError::InvalidVerb(byte))
    }
}

impl From<Verb> for u8 {
    fn from(verb: Verb) -> u8 {
        verb.to_u8()
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Verb::Will => "WILL",
            Verb::Wont => "WONT",
            Verb::Do => "DO",
            Verb::Dont => "DONT",
        })
    }
}

/// A two byte `IAC <code>` command such as `AYT` or `BRK`.
///
/// The code can be any byte except `SB`, the four verbs and `IAC` itself; those
/// introduce other elements on the wire and are rejected by [`Command::try_from`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Command(pub(crate) u8);

impl Command {
    /// End of Record
    pub const EOR: Command = Command(consts::EOR);
    /// No Operation
    pub const NOP: Command = Command(consts::NOP);
    /// Data Mark
    pub const DM: Command = Command(consts::DM);
    /// Break
    pub const BRK: Command = Command(consts::BRK);
    /// Interrupt Process
    pub const IP: Command = Command(consts::IP);
    /// Abort Output
    pub const AO: Command = Command(consts::AO);
    /// Are You There
    pub const AYT: Command = Command(consts::AYT);
    /// Erase Character
    pub const EC: Command = Command(consts::EC);
    /// Erase Line
    pub const EL: Command = Command(consts::EL);
    /// Go Ahead
    pub const GA: Command = Command(consts::GA);

    /// The command byte.
    pub const fn code(self) -> u8 {
        self.0
    }

    /// True if `code` may follow `IAC` as a plain command.
    pub const fn is_command_code(code: u8) -> bool {
        code < consts::SB
    }
}

impl TryFrom<u8> for Command {
    type Error = CodecError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        if Command::is_command_code(code) {
            Ok(Command(code))
        } else {
            Err(CodecError::ReservedCommand(code))
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            consts::EOR => f.write_str("EOR"),
            consts::SE => f.write_str("SE"),
            consts::NOP => f.write_str("NOP"),
            consts::DM => f.write_str("DM"),
            consts::BRK => f.write_str("BRK"),
            consts::IP => f.write_str("IP"),
            consts::AO => f.write_str("AO"),
            consts::AYT => f.write_str("AYT"),
            consts::EC => f.write_str("EC"),
            consts::EL => f.write_str("EL"),
            consts::GA => f.write_str("GA"),
            code => write!(f, "CMD({code:#04X})"),
        }
    }
}

/// `IAC <verb> <option>`
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Negotiation {
    verb: Verb,
    option: u8,
}

impl Negotiation {
    /// Creates a negotiation of `verb` for `option`.
    pub const fn new(verb: Verb, option: u8) -> Negotiation {
        Negotiation { verb, option }
    }

    /// The negotiation verb.
    pub const fn verb(&self) -> Verb {
        self.verb
    }

    /// The option code being negotiated.
    pub const fn option(&self) -> u8 {
        self.option
    }
}

impl fmt::Display for Negotiation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.verb, self.option)
    }
}

/// `IAC SB <option> <content> IAC SE`
///
/// The content is held unescaped. Doubling of `IAC` bytes happens in the
/// generator and is undone by the parser.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Subnegotiation {
    option: u8,
    content: Bytes,
}

impl Subnegotiation {
    /// Creates a subnegotiation for `option` carrying `content`.
    pub fn new(option: u8, content: impl Into<Bytes>) -> Subnegotiation {
        Subnegotiation {
            option,
            content: content.into(),
        }
    }

    /// The option code this subnegotiation belongs to.
    pub const fn option(&self) -> u8 {
        self.option
    }

    /// The unescaped content.
    pub fn content(&self) -> &Bytes {
        &self.content
    }

    /// Consumes the subnegotiation, returning its content.
    pub fn into_content(self) -> Bytes {
        self.content
    }
}

/// A single unit of the TELNET stream.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Element {
    /// A run of plain data with any `IAC` escaping already removed.
    Data(Bytes),
    /// `IAC <command>`
    Command(Command),
    /// `IAC <verb> <option>`
    Negotiation(Negotiation),
    /// `IAC SB <option> ... IAC SE`
    Subnegotiation(Subnegotiation),
}

impl Element {
    /// Shorthand for [`Element::Data`].
    pub fn data(data: impl Into<Bytes>) -> Element {
        Element::Data(data.into())
    }
}

impl From<Bytes> for Element {
    fn from(data: Bytes) -> Self {
        Element::Data(data)
    }
}

impl From<&'static [u8]> for Element {
    fn from(data: &'static [u8]) -> Self {
        Element::Data(Bytes::from_static(data))
    }
}

impl From<&'static str> for Element {
    fn from(data: &'static str) -> Self {
        Element::Data(Bytes::from_static(data.as_bytes()))
    }
}

impl From<Command> for Element {
    fn from(command: Command) -> Self {
        Element::Command(command)
    }
}

impl From<Negotiation> for Element {
    fn from(negotiation: Negotiation) -> Self {
        Element::Negotiation(negotiation)
    }
}

impl From<Subnegotiation> for Element {
    fn from(subnegotiation: Subnegotiation) -> Self {
        Element::Subnegotiation(subnegotiation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verb_wire_values() {
        assert_eq!(Verb::Will.to_u8(), 251);
        assert_eq!(Verb::Wont.to_u8(), 252);
        assert_eq!(Verb::Do.to_u8(), 253);
        assert_eq!(Verb::Dont.to_u8(), 254);
        for verb in [Verb::Will, Verb::Wont, Verb::Do, Verb::Dont] {
            assert_eq!(Verb::try_from(verb.to_u8()).unwrap(), verb);
        }
    }

    #[test]
    fn verb_rejects_non_verb_bytes() {
        assert!(matches!(Verb::try_from(250), Err(CodecError::InvalidVerb(250))));
        assert!(matches!(Verb::try_from(255), Err(CodecError::InvalidVerb(255))));
        assert_eq!(Verb::from_u8(0), None);
    }

    #[test]
    fn command_rejects_reserved_codes() {
        for code in 250..=255u8 {
            assert!(matches!(
                Command::try_from(code),
                Err(CodecError::ReservedCommand(c)) if c == code
            ));
        }
        assert_eq!(Command::try_from(consts::AYT).unwrap(), Command::AYT);
        assert_eq!(Command::try_from(0).unwrap().code(), 0);
    }

    #[test]
    fn display_is_readable() {
        assert_eq!(Command::AYT.to_string(), "AYT");
        assert_eq!(Command::try_from(0x10).unwrap().to_string(), "CMD(0x10)");
        assert_eq!(Negotiation::new(Verb::Do, 31).to_string(), "DO 31");
    }

    #[test]
    fn elements_compare_by_value() {
        let a = Element::from(Subnegotiation::new(5, &b"A"[..]));
        let b = Element::from(Subnegotiation::new(5, Bytes::from_static(b"A")));
        assert_eq!(a, b);
        assert_ne!(Element::from("A"), Element::from(Command::NOP));
        assert!(Element::data("A") < Element::data("B"));
    }
}
