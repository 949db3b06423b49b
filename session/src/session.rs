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

//! The session façade.
//!
//! A [`Session`] turns received bytes into routed elements and routed
//! elements back into bytes. It owns the installed options, the command
//! handlers and the parser remainder; it knows nothing about the transport.
//!
//! ```
//! use telnetq_session::{Role, Session, TelnetOption};
//!
//! let mut session = Session::new();
//! session.install(TelnetOption::server(1, ())).unwrap();
//!
//! // IAC DO ECHO is accepted by the installed server option
//! let reply = session.receive(b"\xFF\xFD\x01", |_, _| {});
//! assert_eq!(&reply[..], b"\xFF\xFB\x01");
//! assert!(session.is_active(Role::Server, 1));
//!
//! // IAC WILL 42 has no option installed and is declined
//! let reply = session.receive(b"\xFF\xFB\x2A", |_, _| {});
//! assert_eq!(&reply[..], b"\xFF\xFE\x2A");
//! ```

use crate::{
    CommandRouter, Negotiable, NegotiationRouter, OptionHandler, OptionRegistry, OptionState, Role,
    SessionError, SessionResult, Sink, SubnegotiationRouter, TelnetOption,
};
use bytes::{Bytes, BytesMut};
use std::fmt;
use telnetq_telnetcodec::{Command, Element, Negotiation, Parser, Subnegotiation, Verb};
use tracing::{debug, trace};

fn ignore_command(command: Command, _sink: &mut dyn Sink) {
    trace!(%command, "Ignoring unregistered command");
}

/// Refuses negotiations nobody installed an option for.
fn decline_negotiation(negotiation: Negotiation, _options: &mut OptionRegistry, sink: &mut dyn Sink) {
    let reply = match negotiation.verb() {
        Verb::Will | Verb::Wont => Verb::Dont,
        Verb::Do | Verb::Dont => Verb::Wont,
    };
    debug!(%negotiation, %reply, "Declining unregistered option");
    sink.send_negotiation(reply, negotiation.option());
}

fn ignore_subnegotiation(subnegotiation: Subnegotiation, _options: &mut OptionRegistry, _sink: &mut dyn Sink) {
    debug!(
        option = subnegotiation.option(),
        len = subnegotiation.content().len(),
        "Ignoring subnegotiation for unregistered option"
    );
}

/// Protocol state for one connection.
pub struct Session {
    parser: Parser,
    options: OptionRegistry,
    commands: CommandRouter,
    negotiations: NegotiationRouter,
    subnegotiations: SubnegotiationRouter,
}

impl Default for Session {
    fn default() -> Self {
        Session::new()
    }
}

impl Session {
    /// Creates a session with no options or command handlers installed.
    pub fn new() -> Session {
        Session {
            parser: Parser::new(),
            options: OptionRegistry::new(),
            commands: CommandRouter::new(Box::new(ignore_command)),
            negotiations: NegotiationRouter::new(Box::new(decline_negotiation)),
            subnegotiations: SubnegotiationRouter::new(Box::new(ignore_subnegotiation)),
        }
    }

    /// Installs an option and routes its negotiations and subnegotiations to it.
    ///
    /// A client and a server option may share a code; a second option with
    /// the same role and code is rejected.
    pub fn install<O: Negotiable>(&mut self, option: O) -> SessionResult<()> {
        let (role, code) = (option.role(), option.code());
        if self.options.contains(role, code) {
            return Err(SessionError::OptionAlreadyInstalled { role, option: code });
        }
        self.options.insert(Box::new(option));

        let forward = move |negotiation: Negotiation, options: &mut OptionRegistry, sink: &mut dyn Sink| {
            if let Some(option) = options.get_mut(role, code) {
                option.negotiate(negotiation.verb(), sink);
            }
        };
        self.negotiations
            .register_route((role.remote_positive(), code), Box::new(forward));
        self.negotiations
            .register_route((role.remote_negative(), code), Box::new(forward));

        if !self.subnegotiations.has_route(&code) {
            self.subnegotiations.register_route(
                code,
                Box::new(
                    move |subnegotiation: Subnegotiation, options: &mut OptionRegistry, sink: &mut dyn Sink| {
                        for role in [Role::Client, Role::Server] {
                            if let Some(option) = options.get_mut(role, code) {
                                option.subnegotiate(subnegotiation.content().clone(), sink);
                            }
                        }
                    },
                ),
            );
        }

        debug!(option = code, %role, "Installed option");
        Ok(())
    }

    /// Removes an installed option; its negotiations go back to being declined.
    pub fn uninstall(&mut self, role: Role, code: u8) -> Option<Box<dyn Negotiable>> {
        let removed = self.options.remove(role, code)?;
        self.negotiations
            .unregister_route(&(role.remote_positive(), code));
        self.negotiations
            .unregister_route(&(role.remote_negative(), code));

        let other = match role {
            Role::Client => Role::Server,
            Role::Server => Role::Client,
        };
        if !self.options.contains(other, code) {
            self.subnegotiations.unregister_route(&code);
        }

        debug!(option = code, %role, "Uninstalled option");
        Some(removed)
    }

    /// Installs a handler for a received command, replacing any previous one.
    pub fn install_command<F>(&mut self, command: Command, handler: F)
    where
        F: FnMut(Command, &mut dyn Sink) + Send + 'static,
    {
        self.commands.register_route(command.code(), Box::new(handler));
    }

    /// Removes a command handler. Returns false if none was installed.
    pub fn uninstall_command(&mut self, command: Command) -> bool {
        self.commands.unregister_route(&command.code()).is_some()
    }

    /// Processes bytes received from the peer.
    ///
    /// Bytes left over from the previous call are parsed first. Data spans go
    /// to `on_data`; commands, negotiations and subnegotiations go to their
    /// handlers. Anything sent through the sink handed to `on_data` or to a
    /// handler is generated in the order it was sent.
    ///
    /// # Returns
    ///
    /// The bytes to transmit to the peer, possibly empty.
    pub fn receive<F>(&mut self, input: &[u8], mut on_data: F) -> Bytes
    where
        F: FnMut(Bytes, &mut dyn Sink),
    {
        let mut output = BytesMut::new();
        let sink: &mut dyn Sink = &mut output;
        let Session {
            parser,
            options,
            commands,
            negotiations,
            subnegotiations,
        } = self;

        parser.parse(input, |element| match element {
            Element::Data(data) => on_data(data, &mut *sink),
            Element::Command(command) => commands.route(command, &mut *sink),
            Element::Negotiation(negotiation) => {
                trace!(%negotiation, "Routing negotiation");
                negotiations.route(negotiation, &mut *options, &mut *sink);
            }
            Element::Subnegotiation(subnegotiation) => {
                subnegotiations.route(subnegotiation, &mut *options, &mut *sink);
            }
        });

        output.freeze()
    }

    /// Generates the bytes for an element originated by the application.
    pub fn send(&self, element: impl Into<Element>) -> Bytes {
        let mut output = BytesMut::new();
        Sink::send(&mut output, element.into());
        output.freeze()
    }

    /// Asks the peer to activate an installed option.
    pub fn activate(&mut self, role: Role, code: u8) -> SessionResult<Bytes> {
        self.drive(role, code, |option, sink| option.activate(sink))
    }

    /// Asks the peer to deactivate an installed option.
    pub fn deactivate(&mut self, role: Role, code: u8) -> SessionResult<Bytes> {
        self.drive(role, code, |option, sink| option.deactivate(sink))
    }

    fn drive<F>(&mut self, role: Role, code: u8, f: F) -> SessionResult<Bytes>
    where
        F: FnOnce(&mut dyn Negotiable, &mut dyn Sink),
    {
        let option: &mut dyn Negotiable = self
            .options
            .get_mut(role, code)
            .ok_or(SessionError::OptionNotInstalled { role, option: code })?;
        let mut output = BytesMut::new();
        let sink: &mut dyn Sink = &mut output;
        f(option, sink);
        Ok(output.freeze())
    }

    /// Runs `f` against an installed option with a concrete handler type.
    ///
    /// Elements `f` sends are generated and returned alongside its result.
    pub fn with_option<H, R, F>(&mut self, role: Role, code: u8, f: F) -> SessionResult<(R, Bytes)>
    where
        H: OptionHandler,
        F: FnOnce(&mut TelnetOption<H>, &mut dyn Sink) -> R,
    {
        if !self.options.contains(role, code) {
            return Err(SessionError::OptionNotInstalled { role, option: code });
        }
        let option = self
            .options
            .typed_mut::<H>(role, code)
            .ok_or(SessionError::OptionTypeMismatch { role, option: code })?;
        let mut output = BytesMut::new();
        let sink: &mut dyn Sink = &mut output;
        let result = f(option, sink);
        Ok((result, output.freeze()))
    }

    /// The installed option for `(role, code)` if its handler is `H`.
    pub fn option<H: OptionHandler>(&self, role: Role, code: u8) -> Option<&TelnetOption<H>> {
        self.options.typed(role, code)
    }

    /// Mutable typed access to an installed option.
    ///
    /// Use [`Session::with_option`] for anything that sends elements.
    pub fn option_mut<H: OptionHandler>(&mut self, role: Role, code: u8) -> Option<&mut TelnetOption<H>> {
        self.options.typed_mut(role, code)
    }

    /// State of the option installed for `(role, code)`.
    pub fn state(&self, role: Role, code: u8) -> Option<OptionState> {
        self.options.state(role, code)
    }

    /// True when the option for `(role, code)` is installed and active.
    pub fn is_active(&self, role: Role, code: u8) -> bool {
        self.state(role, code) == Some(OptionState::Active)
    }

    /// The installed options.
    pub fn options(&self) -> &OptionRegistry {
        &self.options
    }

    /// Bytes of an unfinished token held over from the last receive.
    pub fn pending_len(&self) -> usize {
        self.parser.remainder().len()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("options", &self.options)
            .field("commands", &self.commands.len())
            .field("pending", &self.pending_len())
            .finish_non_exhaustive()
    }
}
