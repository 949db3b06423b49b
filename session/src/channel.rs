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

//! Transport abstraction.
//!
//! The session itself never performs I/O. A [`Channel`] is whatever carries
//! bytes to and from the peer; [`StreamChannel`] adapts any Tokio stream.

use async_trait::async_trait;
use bytes::BytesMut;
use std::io;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// A bidirectional byte channel to the peer.
#[async_trait]
pub trait Channel: Send {
    /// Reads available bytes into the spare capacity of `buf`.
    ///
    /// Returns the number of bytes read; zero means the peer closed the channel.
    async fn read(&mut self, buf: &mut BytesMut) -> io::Result<usize>;

    /// Writes all of `data` to the peer.
    async fn write(&mut self, data: &[u8]) -> io::Result<()>;

    /// Closes the channel.
    async fn close(&mut self) -> io::Result<()>;

    /// False once the channel has been closed from either end.
    fn is_alive(&self) -> bool;
}

/// A [`Channel`] over a Tokio stream such as a `TcpStream`.
#[derive(Debug)]
pub struct StreamChannel<S> {
    stream: S,
    alive: bool,
}

impl<S> StreamChannel<S> {
    /// Wraps `stream`.
    pub fn new(stream: S) -> StreamChannel<S> {
        StreamChannel {
            stream,
            alive: true,
        }
    }

    /// The wrapped stream.
    pub fn get_ref(&self) -> &S {
        &self.stream
    }

    /// Unwraps the stream.
    pub fn into_inner(self) -> S {
        self.stream
    }
}

#[async_trait]
impl<S> Channel for StreamChannel<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    async fn read(&mut self, buf: &mut BytesMut) -> io::Result<usize> {
        let read = self.stream.read_buf(buf).await?;
        if read == 0 {
            self.alive = false;
        }
        Ok(read)
    }

    async fn write(&mut self, data: &[u8]) -> io::Result<()> {
        self.stream.write_all(data).await?;
        self.stream.flush().await
    }

    async fn close(&mut self) -> io::Result<()> {
        self.alive = false;
        self.stream.shutdown().await
    }

    fn is_alive(&self) -> bool {
        self.alive
    }
}
