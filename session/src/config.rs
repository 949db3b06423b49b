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

//! Connection configuration
//!
//! ```
//! use telnetq_session::ConnectionConfig;
//!
//! let config = ConnectionConfig::default()
//!     .with_read_buffer_size(1024)
//!     .with_max_pending_bytes(Some(16 * 1024));
//! assert_eq!(config.read_buffer_size, 1024);
//! ```

/// Settings for a [`Connection`](crate::Connection).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// Bytes requested from the channel per read
    pub read_buffer_size: usize,

    /// Largest unfinished token (typically a subnegotiation) the peer may
    /// leave buffered before the connection fails. `None` disables the check.
    pub max_pending_bytes: Option<usize>,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            read_buffer_size: 4096,
            max_pending_bytes: Some(64 * 1024),
        }
    }
}

impl ConnectionConfig {
    /// Set the read buffer size
    pub fn with_read_buffer_size(mut self, size: usize) -> Self {
        self.read_buffer_size = size;
        self
    }

    /// Set the pending byte limit
    pub fn with_max_pending_bytes(mut self, limit: Option<usize>) -> Self {
        self.max_pending_bytes = limit;
        self
    }
}
