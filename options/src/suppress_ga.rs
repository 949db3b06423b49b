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

//! SUPPRESS-GO-AHEAD (RFC 858).

use telnetq_session::{OptionHandler, TelnetOption};
use telnetq_telnetcodec::consts;

/// Option code.
pub const OPTION: u8 = consts::option::SGA;

/// Handler for SUPPRESS-GO-AHEAD.
#[derive(Clone, Copy, Debug, Default)]
pub struct SuppressGoAhead;

impl OptionHandler for SuppressGoAhead {}

/// The side that asks the peer to stop sending GA.
pub fn client() -> TelnetOption<SuppressGoAhead> {
    TelnetOption::client(OPTION, SuppressGoAhead)
}

/// The side that stops sending GA.
pub fn server() -> TelnetOption<SuppressGoAhead> {
    TelnetOption::server(OPTION, SuppressGoAhead)
}
