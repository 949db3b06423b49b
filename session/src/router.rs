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

//! Keyed dispatch tables.
//!
//! A [`Router`] maps the key of a message to a handler and falls back to an
//! "unregistered" handler when nothing matches. The session keeps three: one
//! for commands, one for negotiations keyed by `(verb, option)` and one for
//! subnegotiations keyed by option code.

use crate::{OptionRegistry, Sink};
use std::collections::HashMap;
use std::hash::Hash;
use telnetq_telnetcodec::{Command, Negotiation, Subnegotiation, Verb};

/// A message that can be dispatched by a [`Router`].
pub trait Routable {
    /// The lookup key.
    type Key: Eq + Hash;

    /// Extracts the lookup key.
    fn route_key(&self) -> Self::Key;
}

impl Routable for Command {
    type Key = u8;

    fn route_key(&self) -> u8 {
        self.code()
    }
}

impl Routable for Negotiation {
    type Key = (Verb, u8);

    fn route_key(&self) -> (Verb, u8) {
        (self.verb(), self.option())
    }
}

impl Routable for Subnegotiation {
    type Key = u8;

    fn route_key(&self) -> u8 {
        self.option()
    }
}

/// Keyed table of handlers with a fallback.
pub struct Router<M: Routable, H: ?Sized> {
    routes: HashMap<M::Key, Box<H>>,
    unregistered: Box<H>,
}

impl<M: Routable, H: ?Sized> Router<M, H> {
    /// Creates an empty router that sends everything to `unregistered`.
    pub fn new(unregistered: Box<H>) -> Self {
        Router {
            routes: HashMap::new(),
            unregistered,
        }
    }

    /// Registers `handler` for `key`, returning the handler it replaces.
    pub fn register_route(&mut self, key: M::Key, handler: Box<H>) -> Option<Box<H>> {
        self.routes.insert(key, handler)
    }

    /// Removes the handler for `key`.
    pub fn unregister_route(&mut self, key: &M::Key) -> Option<Box<H>> {
        self.routes.remove(key)
    }

    /// Replaces the fallback handler.
    pub fn set_unregistered_route(&mut self, handler: Box<H>) {
        self.unregistered = handler;
    }

    /// True if a handler is registered for `key`.
    pub fn has_route(&self, key: &M::Key) -> bool {
        self.routes.contains_key(key)
    }

    /// Number of registered routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// True when only the fallback is present.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// The handler `message` dispatches to.
    pub fn lookup(&mut self, message: &M) -> &mut H {
        match self.routes.get_mut(&message.route_key()) {
            Some(handler) => &mut **handler,
            None => &mut *self.unregistered,
        }
    }
}

impl<M: Routable> Router<M, dyn FnMut(M, &mut dyn Sink) + Send> {
    /// Invokes the handler for `message`.
    pub fn route(&mut self, message: M, sink: &mut dyn Sink) {
        (self.lookup(&message))(message, sink);
    }
}

impl<M: Routable, C: ?Sized> Router<M, dyn FnMut(M, &mut C, &mut dyn Sink) + Send> {
    /// Invokes the handler for `message` with a shared context.
    pub fn route(&mut self, message: M, context: &mut C, sink: &mut dyn Sink) {
        (self.lookup(&message))(message, context, sink);
    }
}

/// Handler for a received command.
pub type CommandHandler = dyn FnMut(Command, &mut dyn Sink) + Send;
/// Handler for a received negotiation.
pub type NegotiationHandler = dyn FnMut(Negotiation, &mut OptionRegistry, &mut dyn Sink) + Send;
/// Handler for a received subnegotiation.
pub type SubnegotiationHandler =
    dyn FnMut(Subnegotiation, &mut OptionRegistry, &mut dyn Sink) + Send;

/// Routes commands by code.
pub type CommandRouter = Router<Command, CommandHandler>;
/// Routes negotiations by `(verb, option)`.
pub type NegotiationRouter = Router<Negotiation, NegotiationHandler>;
/// Routes subnegotiations by option code.
pub type SubnegotiationRouter = Router<Subnegotiation, SubnegotiationHandler>;
