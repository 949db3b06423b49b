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

//! Error types for the session layer

use crate::Role;
use thiserror::Error;

/// Result type for session operations
pub type SessionResult<T> = std::result::Result<T, SessionError>;

/// Session error types
#[derive(Debug, Error)]
pub enum SessionError {
    /// I/O error from the underlying channel
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No option is installed for the role and code
    #[error("No {role} option {option} installed")]
    OptionNotInstalled {
        /// Role looked up
        role: Role,
        /// Option code looked up
        option: u8,
    },

    /// An option is installed but its handler has a different type
    #[error("The {role} option {option} has a different handler type")]
    OptionTypeMismatch {
        /// Role looked up
        role: Role,
        /// Option code looked up
        option: u8,
    },

    /// An option is already installed for the role and code
    #[error("A {role} option {option} is already installed")]
    OptionAlreadyInstalled {
        /// Role of the rejected option
        role: Role,
        /// Code of the rejected option
        option: u8,
    },

    /// The peer left more than `limit` bytes of an unfinished token buffered
    #[error("Pending input exceeded {limit} bytes")]
    BufferLimitExceeded {
        /// Configured limit
        limit: usize,
    },

    /// The channel has been closed
    #[error("Channel closed")]
    ChannelClosed,
}

impl SessionError {
    /// Check if the error is recoverable
    ///
    /// Registry errors leave the session untouched; everything else means the
    /// connection should be torn down.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            SessionError::OptionNotInstalled { .. }
                | SessionError::OptionTypeMismatch { .. }
                | SessionError::OptionAlreadyInstalled { .. }
        )
    }

    /// Check if the error is a connection error
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            SessionError::Io(_) | SessionError::ChannelClosed | SessionError::BufferLimitExceeded { .. }
        )
    }
}
