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

//! Drives a [`Session`] over a [`Channel`].

use crate::{
    Channel, ConnectionConfig, OptionHandler, Role, Session, SessionError, SessionResult, Sink,
    TelnetOption,
};
use bytes::{Bytes, BytesMut};
use metrics::counter;
use telnetq_telnetcodec::Element;
use tracing::{debug, instrument, trace, warn};

/// A session bound to a channel.
///
/// Every operation that produces protocol output writes it to the channel
/// before returning.
pub struct Connection<C> {
    channel: C,
    session: Session,
    config: ConnectionConfig,
    read_buffer: BytesMut,
}

impl<C: Channel> Connection<C> {
    /// Binds `session` to `channel` with the default configuration.
    pub fn new(channel: C, session: Session) -> Connection<C> {
        Connection::with_config(channel, session, ConnectionConfig::default())
    }

    /// Binds `session` to `channel`.
    pub fn with_config(channel: C, session: Session, config: ConnectionConfig) -> Connection<C> {
        Connection {
            channel,
            session,
            read_buffer: BytesMut::with_capacity(config.read_buffer_size),
            config,
        }
    }

    /// The protocol session.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Mutable access to the protocol session, e.g. to install options.
    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// The underlying channel.
    pub fn channel(&self) -> &C {
        &self.channel
    }

    /// True while the channel is open.
    pub fn is_alive(&self) -> bool {
        self.channel.is_alive()
    }

    /// Splits the connection back into its channel and session.
    pub fn into_parts(self) -> (C, Session) {
        (self.channel, self.session)
    }

    /// Performs one read from the channel and processes it.
    ///
    /// Data spans are passed to `on_data`; protocol replies and anything sent
    /// through the sink are written back before this returns.
    ///
    /// # Returns
    ///
    /// The number of bytes read. Zero means the peer closed the channel.
    #[instrument(skip_all)]
    pub async fn read<F>(&mut self, on_data: F) -> SessionResult<usize>
    where
        F: FnMut(Bytes, &mut dyn Sink),
    {
        if !self.channel.is_alive() {
            return Err(SessionError::ChannelClosed);
        }

        self.read_buffer.clear();
        self.read_buffer.reserve(self.config.read_buffer_size);
        let received = self.channel.read(&mut self.read_buffer).await?;
        if received == 0 {
            debug!("Channel reached end of stream");
            return Ok(0);
        }
        counter!("telnetq.bytes.received").increment(received as u64);
        trace!(received, "Read from channel");

        let reply = self.session.receive(&self.read_buffer, on_data);
        self.flush(reply).await?;

        if let Some(limit) = self.config.max_pending_bytes {
            let pending = self.session.pending_len();
            if pending > limit {
                warn!(pending, limit, "Peer exceeded the pending byte limit");
                counter!("telnetq.errors.buffer_limit").increment(1);
                return Err(SessionError::BufferLimitExceeded { limit });
            }
        }

        Ok(received)
    }

    /// Reads until the peer closes the channel.
    pub async fn run<F>(&mut self, mut on_data: F) -> SessionResult<()>
    where
        F: FnMut(Bytes, &mut dyn Sink),
    {
        while self.read(&mut on_data).await? > 0 {}
        Ok(())
    }

    /// Sends an element originated by the application.
    #[instrument(skip_all)]
    pub async fn write(&mut self, element: impl Into<Element>) -> SessionResult<()> {
        let bytes = self.session.send(element);
        counter!("telnetq.elements.sent").increment(1);
        self.flush(bytes).await
    }

    /// Asks the peer to activate an installed option.
    pub async fn activate(&mut self, role: Role, code: u8) -> SessionResult<()> {
        let bytes = self.session.activate(role, code)?;
        self.flush(bytes).await
    }

    /// Asks the peer to deactivate an installed option.
    pub async fn deactivate(&mut self, role: Role, code: u8) -> SessionResult<()> {
        let bytes = self.session.deactivate(role, code)?;
        self.flush(bytes).await
    }

    /// Runs `f` against an installed option and transmits what it sends.
    ///
    /// See [`Session::with_option`].
    pub async fn with_option<H, R, F>(&mut self, role: Role, code: u8, f: F) -> SessionResult<R>
    where
        H: OptionHandler,
        F: FnOnce(&mut TelnetOption<H>, &mut dyn Sink) -> R,
    {
        let (result, bytes) = self.session.with_option(role, code, f)?;
        self.flush(bytes).await?;
        Ok(result)
    }

    /// Closes the channel.
    pub async fn close(&mut self) -> SessionResult<()> {
        debug!("Closing channel");
        self.channel.close().await?;
        Ok(())
    }

    async fn flush(&mut self, bytes: Bytes) -> SessionResult<()> {
        if bytes.is_empty() {
            return Ok(());
        }
        if !self.channel.is_alive() {
            return Err(SessionError::ChannelClosed);
        }
        self.channel.write(&bytes).await?;
        counter!("telnetq.bytes.sent").increment(bytes.len() as u64);
        Ok(())
    }
}
