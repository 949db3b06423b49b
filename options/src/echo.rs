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

//! ECHO (RFC 857).
//!
//! The server side echoes what it receives; the option carries no
//! subnegotiation.

use telnetq_session::{OptionHandler, TelnetOption};
use telnetq_telnetcodec::consts;

/// Option code.
pub const OPTION: u8 = consts::option::ECHO;

/// Handler for ECHO. Nothing beyond negotiation.
#[derive(Clone, Copy, Debug, Default)]
pub struct Echo;

impl OptionHandler for Echo {}

/// The side that asks the peer to echo.
pub fn client() -> TelnetOption<Echo> {
    TelnetOption::client(OPTION, Echo)
}

/// The side that echoes.
pub fn server() -> TelnetOption<Echo> {
    TelnetOption::server(OPTION, Echo)
}
