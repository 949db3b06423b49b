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

/// Result Type for Codec Operations
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors raised by the codec layer.
///
/// Parsing itself never fails; malformed wire data is absorbed by the parser.
/// These errors come from fallible conversions and from the stream transport.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// An I/O error occurred while reading from or writing to the underlying stream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The byte is not one of `WILL`, `WONT`, `DO` or `DONT`.
    #[error("Invalid negotiation verb {0:#04X}")]
    InvalidVerb(u8),

    /// The byte introduces another element and cannot be sent as a command.
    #[error("Reserved command code {0:#04X}")]
    ReservedCommand(u8),
}
