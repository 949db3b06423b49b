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

//! The per-option negotiation state machine (the TELNET "Q method").
//!
//! Every option runs the same four-state handshake. The only differences are
//! which side performs the option, captured by [`Role`], and what the option
//! does with subnegotiation content once active, supplied by an
//! [`OptionHandler`]. [`TelnetOption`] composes the two.

use crate::Sink;
use bytes::Bytes;
use std::any::Any;
use std::fmt;
use telnetq_telnetcodec::{Negotiation, Verb};
use tracing::{debug, trace};

/// Which side of an option this end plays.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Role {
    /// Asks the peer to perform the option: sends `DO`/`DONT`, expects `WILL`/`WONT`.
    Client,
    /// Performs the option itself: sends `WILL`/`WONT`, expects `DO`/`DONT`.
    Server,
}

impl Role {
    /// Verb sent to request or confirm activation.
    pub const fn local_positive(self) -> Verb {
        match self {
            Role::Client => Verb::Do,
            Role::Server => Verb::Will,
        }
    }

    /// Verb sent to refuse or end activation.
    pub const fn local_negative(self) -> Verb {
        match self {
            Role::Client => Verb::Dont,
            Role::Server => Verb::Wont,
        }
    }

    /// Verb the peer sends to agree.
    pub const fn remote_positive(self) -> Verb {
        match self {
            Role::Client => Verb::Will,
            Role::Server => Verb::Do,
        }
    }

    /// Verb the peer sends to refuse.
    pub const fn remote_negative(self) -> Verb {
        match self {
            Role::Client => Verb::Wont,
            Role::Server => Verb::Dont,
        }
    }

    /// The local role a received verb is addressed to.
    ///
    /// `WILL`/`WONT` describe the sender performing an option, so they concern
    /// our client side; `DO`/`DONT` concern our server side.
    pub const fn receiving(verb: Verb) -> Role {
        match verb {
            Verb::Will | Verb::Wont => Role::Client,
            Verb::Do | Verb::Dont => Role::Server,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Role::Client => "client",
            Role::Server => "server",
        })
    }
}

/// Activation state of an option.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OptionState {
    /// Not in effect.
    #[default]
    Inactive,
    /// Local side asked for activation and awaits the reply.
    Activating,
    /// In effect.
    Active,
    /// Local side asked for deactivation and awaits the reply.
    Deactivating,
}

impl fmt::Display for OptionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OptionState::Inactive => "inactive",
            OptionState::Activating => "activating",
            OptionState::Active => "active",
            OptionState::Deactivating => "deactivating",
        })
    }
}

/// Option specific behaviour plugged into a [`TelnetOption`].
///
/// Both hooks default to doing nothing, which suits options without
/// subnegotiation such as ECHO or SUPPRESS-GO-AHEAD.
pub trait OptionHandler: Send + 'static {
    /// Handles subnegotiation content. Only called while the option is active.
    fn handle_subnegotiation(&mut self, option: u8, content: Bytes, sink: &mut dyn Sink) {
        let _ = sink;
        trace!(option, len = content.len(), "Ignoring subnegotiation");
    }

    /// Called whenever the option fires a state change notification.
    fn state_changed(&mut self, option: u8, state: OptionState, sink: &mut dyn Sink) {
        let _ = (option, state, sink);
    }
}

impl OptionHandler for () {}

type StateObserver = Box<dyn FnMut(OptionState, &mut dyn Sink) + Send>;

/// One negotiable option: code, role, Q-method state and handler.
///
/// All output is written to the sink passed into each operation, never
/// returned, so notifications can themselves send further elements.
///
/// # Example
/// ```
/// use telnetq_session::{OptionState, Role, TelnetOption};
/// use telnetq_telnetcodec::{Element, Negotiation, Verb};
///
/// let mut echo = TelnetOption::new(Role::Server, 1, ());
/// let mut out: Vec<Element> = Vec::new();
/// echo.activate(&mut out);
/// assert_eq!(echo.state(), OptionState::Activating);
/// echo.negotiate(Verb::Do, &mut out);
/// assert!(echo.is_active());
/// assert_eq!(out, vec![Negotiation::new(Verb::Will, 1).into()]);
/// ```
pub struct TelnetOption<H> {
    code: u8,
    role: Role,
    state: OptionState,
    handler: H,
    observers: Vec<StateObserver>,
}

impl<H: OptionHandler> TelnetOption<H> {
    /// Creates an inactive option.
    pub fn new(role: Role, code: u8, handler: H) -> TelnetOption<H> {
        TelnetOption {
            code,
            role,
            state: OptionState::Inactive,
            handler,
            observers: Vec::new(),
        }
    }

    /// Shorthand for a [`Role::Client`] option.
    pub fn client(code: u8, handler: H) -> TelnetOption<H> {
        TelnetOption::new(Role::Client, code, handler)
    }

    /// Shorthand for a [`Role::Server`] option.
    pub fn server(code: u8, handler: H) -> TelnetOption<H> {
        TelnetOption::new(Role::Server, code, handler)
    }

    /// The option code.
    pub fn code(&self) -> u8 {
        self.code
    }

    /// The role this option plays.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Current state.
    pub fn state(&self) -> OptionState {
        self.state
    }

    /// True when the option is in effect.
    pub fn is_active(&self) -> bool {
        self.state == OptionState::Active
    }

    /// The option specific handler.
    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Mutable access to the option specific handler.
    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    /// Registers an observer for state change notifications.
    ///
    /// Observers run in registration order after the handler's own
    /// [`OptionHandler::state_changed`] hook.
    pub fn on_state_changed<F>(&mut self, observer: F)
    where
        F: FnMut(OptionState, &mut dyn Sink) + Send + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    /// Requests activation.
    pub fn activate(&mut self, sink: &mut dyn Sink) {
        match self.state {
            OptionState::Inactive => {
                self.send(self.role.local_positive(), sink);
                self.set_state(OptionState::Activating);
            }
            OptionState::Active => self.notify(sink),
            OptionState::Activating | OptionState::Deactivating => {}
        }
    }

    /// Requests deactivation.
    pub fn deactivate(&mut self, sink: &mut dyn Sink) {
        match self.state {
            OptionState::Active => {
                self.send(self.role.local_negative(), sink);
                self.set_state(OptionState::Deactivating);
                self.notify(sink);
            }
            OptionState::Inactive => self.notify(sink),
            OptionState::Activating | OptionState::Deactivating => {}
        }
    }

    /// Applies a verb received from the peer.
    ///
    /// Anything other than the role's remote positive verb counts as a refusal.
    pub fn negotiate(&mut self, verb: Verb, sink: &mut dyn Sink) {
        let agreed = verb == self.role.remote_positive();
        match (self.state, agreed) {
            (OptionState::Inactive, true) => {
                self.send(self.role.local_positive(), sink);
                self.set_state(OptionState::Active);
                self.notify(sink);
            }
            (OptionState::Inactive, false) => {
                self.send(self.role.local_negative(), sink);
            }
            (OptionState::Active, true) => {
                self.send(self.role.local_positive(), sink);
            }
            (OptionState::Active, false) => {
                self.set_state(OptionState::Inactive);
                self.notify(sink);
                self.send(self.role.local_negative(), sink);
            }
            (OptionState::Activating | OptionState::Deactivating, true) => {
                self.set_state(OptionState::Active);
                self.notify(sink);
            }
            (OptionState::Activating | OptionState::Deactivating, false) => {
                self.set_state(OptionState::Inactive);
                self.notify(sink);
            }
        }
    }

    /// Forwards subnegotiation content to the handler while active.
    pub fn subnegotiate(&mut self, content: Bytes, sink: &mut dyn Sink) {
        if self.is_active() {
            self.handler.handle_subnegotiation(self.code, content, sink);
        } else {
            debug!(
                option = self.code,
                role = %self.role,
                state = %self.state,
                "Dropping subnegotiation for inactive option"
            );
        }
    }

    fn send(&self, verb: Verb, sink: &mut dyn Sink) {
        sink.send(Negotiation::new(verb, self.code).into());
    }

    fn set_state(&mut self, state: OptionState) {
        debug!(
            option = self.code,
            role = %self.role,
            from = %self.state,
            to = %state,
            "Option state changed"
        );
        self.state = state;
    }

    fn notify(&mut self, sink: &mut dyn Sink) {
        self.handler.state_changed(self.code, self.state, sink);
        for observer in &mut self.observers {
            observer(self.state, &mut *sink);
        }
    }
}

impl<H: fmt::Debug> fmt::Debug for TelnetOption<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelnetOption")
            .field("code", &self.code)
            .field("role", &self.role)
            .field("state", &self.state)
            .field("handler", &self.handler)
            .field("observers", &self.observers.len())
            .finish()
    }
}

/// Object safe view of a [`TelnetOption`], as stored by the session.
pub trait Negotiable: Any + Send {
    /// The option code.
    fn code(&self) -> u8;
    /// The role this option plays.
    fn role(&self) -> Role;
    /// Current state.
    fn state(&self) -> OptionState;
    /// See [`TelnetOption::activate`].
    fn activate(&mut self, sink: &mut dyn Sink);
    /// See [`TelnetOption::deactivate`].
    fn deactivate(&mut self, sink: &mut dyn Sink);
    /// See [`TelnetOption::negotiate`].
    fn negotiate(&mut self, verb: Verb, sink: &mut dyn Sink);
    /// See [`TelnetOption::subnegotiate`].
    fn subnegotiate(&mut self, content: Bytes, sink: &mut dyn Sink);
    /// Upcast for typed access.
    fn as_any(&self) -> &dyn Any;
    /// Upcast for typed mutable access.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<H: OptionHandler> Negotiable for TelnetOption<H> {
    fn code(&self) -> u8 {
        self.code
    }

    fn role(&self) -> Role {
        self.role
    }

    fn state(&self) -> OptionState {
        self.state
    }

    fn activate(&mut self, sink: &mut dyn Sink) {
        TelnetOption::activate(self, sink);
    }

    fn deactivate(&mut self, sink: &mut dyn Sink) {
        TelnetOption::deactivate(self, sink);
    }

    fn negotiate(&mut self, verb: Verb, sink: &mut dyn Sink) {
        TelnetOption::negotiate(self, verb, sink);
    }

    fn subnegotiate(&mut self, content: Bytes, sink: &mut dyn Sink) {
        TelnetOption::subnegotiate(self, content, sink);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use telnetq_telnetcodec::Element;
    use tracing_test::traced_test;

    // ============================================================================
    // Helper Functions
    // ============================================================================

    /// Records subnegotiation content it receives.
    #[derive(Default)]
    struct Recorder {
        received: Vec<Bytes>,
    }

    impl OptionHandler for Recorder {
        fn handle_subnegotiation(&mut self, _option: u8, content: Bytes, _sink: &mut dyn Sink) {
            self.received.push(content);
        }
    }

    /// An option whose notifications are counted.
    fn counted(role: Role, state: OptionState) -> (TelnetOption<Recorder>, Arc<Mutex<Vec<OptionState>>>) {
        let mut option = TelnetOption::new(role, 42, Recorder::default());
        option.state = state;
        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&seen);
        option.on_state_changed(move |state, _| log.lock().unwrap().push(state));
        (option, seen)
    }

    fn neg(verb: Verb) -> Element {
        Negotiation::new(verb, 42).into()
    }

    const ALL_STATES: [OptionState; 4] = [
        OptionState::Inactive,
        OptionState::Activating,
        OptionState::Active,
        OptionState::Deactivating,
    ];

    // ============================================================================
    // Role Verbs
    // ============================================================================

    #[test]
    fn client_role_verbs() {
        assert_eq!(Role::Client.local_positive(), Verb::Do);
        assert_eq!(Role::Client.local_negative(), Verb::Dont);
        assert_eq!(Role::Client.remote_positive(), Verb::Will);
        assert_eq!(Role::Client.remote_negative(), Verb::Wont);
    }

    #[test]
    fn server_role_verbs() {
        assert_eq!(Role::Server.local_positive(), Verb::Will);
        assert_eq!(Role::Server.local_negative(), Verb::Wont);
        assert_eq!(Role::Server.remote_positive(), Verb::Do);
        assert_eq!(Role::Server.remote_negative(), Verb::Dont);
    }

    #[test]
    fn received_verbs_map_to_roles() {
        assert_eq!(Role::receiving(Verb::Will), Role::Client);
        assert_eq!(Role::receiving(Verb::Wont), Role::Client);
        assert_eq!(Role::receiving(Verb::Do), Role::Server);
        assert_eq!(Role::receiving(Verb::Dont), Role::Server);
    }

    // ============================================================================
    // Activation
    // ============================================================================

    #[test]
    fn activate_from_inactive_sends_request() {
        let (mut option, seen) = counted(Role::Client, OptionState::Inactive);
        let mut out: Vec<Element> = Vec::new();
        option.activate(&mut out);
        assert_eq!(option.state(), OptionState::Activating);
        assert_eq!(out, vec![neg(Verb::Do)]);
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn activate_while_active_only_notifies() {
        let (mut option, seen) = counted(Role::Server, OptionState::Active);
        let mut out: Vec<Element> = Vec::new();
        option.activate(&mut out);
        assert!(out.is_empty());
        assert_eq!(option.state(), OptionState::Active);
        assert_eq!(*seen.lock().unwrap(), vec![OptionState::Active]);
    }

    #[test]
    fn activate_and_deactivate_in_flight_are_no_ops() {
        for state in [OptionState::Activating, OptionState::Deactivating] {
            let (mut option, seen) = counted(Role::Server, state);
            let mut out: Vec<Element> = Vec::new();
            option.activate(&mut out);
            option.deactivate(&mut out);
            assert!(out.is_empty());
            assert_eq!(option.state(), state);
            assert!(seen.lock().unwrap().is_empty());
        }
    }

    #[test]
    fn deactivate_from_active_sends_refusal_and_notifies() {
        let (mut option, seen) = counted(Role::Server, OptionState::Active);
        let mut out: Vec<Element> = Vec::new();
        option.deactivate(&mut out);
        assert_eq!(option.state(), OptionState::Deactivating);
        assert_eq!(out, vec![neg(Verb::Wont)]);
        assert_eq!(*seen.lock().unwrap(), vec![OptionState::Deactivating]);
    }

    #[test]
    fn deactivate_while_inactive_only_notifies() {
        let (mut option, seen) = counted(Role::Client, OptionState::Inactive);
        let mut out: Vec<Element> = Vec::new();
        option.deactivate(&mut out);
        assert!(out.is_empty());
        assert_eq!(*seen.lock().unwrap(), vec![OptionState::Inactive]);
    }

    // ============================================================================
    // Negotiation Table
    // ============================================================================

    #[test]
    fn inactive_accepts_peer_offer() {
        let (mut option, seen) = counted(Role::Client, OptionState::Inactive);
        let mut out: Vec<Element> = Vec::new();
        option.negotiate(Verb::Will, &mut out);
        assert_eq!(option.state(), OptionState::Active);
        assert_eq!(out, vec![neg(Verb::Do)]);
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn inactive_refuses_peer_refusal() {
        let (mut option, seen) = counted(Role::Server, OptionState::Inactive);
        let mut out: Vec<Element> = Vec::new();
        option.negotiate(Verb::Dont, &mut out);
        assert_eq!(option.state(), OptionState::Inactive);
        assert_eq!(out, vec![neg(Verb::Wont)]);
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn activating_completes_on_agreement() {
        let (mut option, seen) = counted(Role::Server, OptionState::Activating);
        let mut out: Vec<Element> = Vec::new();
        option.negotiate(Verb::Do, &mut out);
        assert_eq!(option.state(), OptionState::Active);
        assert!(out.is_empty());
        assert_eq!(*seen.lock().unwrap(), vec![OptionState::Active]);
    }

    #[test]
    fn activating_falls_back_on_refusal() {
        let (mut option, seen) = counted(Role::Client, OptionState::Activating);
        let mut out: Vec<Element> = Vec::new();
        option.negotiate(Verb::Wont, &mut out);
        assert_eq!(option.state(), OptionState::Inactive);
        assert!(out.is_empty());
        assert_eq!(*seen.lock().unwrap(), vec![OptionState::Inactive]);
    }

    #[test]
    fn active_reconfirms_repeated_agreement() {
        let (mut option, seen) = counted(Role::Client, OptionState::Active);
        let mut out: Vec<Element> = Vec::new();
        option.negotiate(Verb::Will, &mut out);
        assert_eq!(option.state(), OptionState::Active);
        assert_eq!(out, vec![neg(Verb::Do)]);
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn active_acknowledges_refusal_after_notifying() {
        let mut option = TelnetOption::new(Role::Client, 42, ());
        option.state = OptionState::Active;
        option.on_state_changed(|state, sink| {
            assert_eq!(state, OptionState::Inactive);
            sink.send_data("notified");
        });
        let mut out: Vec<Element> = Vec::new();
        option.negotiate(Verb::Wont, &mut out);
        assert_eq!(option.state(), OptionState::Inactive);
        assert_eq!(out, vec![Element::from("notified"), neg(Verb::Dont)]);
    }

    #[test]
    fn deactivating_accepts_countermand() {
        let (mut option, seen) = counted(Role::Server, OptionState::Deactivating);
        let mut out: Vec<Element> = Vec::new();
        option.negotiate(Verb::Do, &mut out);
        assert_eq!(option.state(), OptionState::Active);
        assert!(out.is_empty());
        assert_eq!(*seen.lock().unwrap(), vec![OptionState::Active]);
    }

    #[test]
    fn deactivating_completes_on_refusal() {
        let (mut option, seen) = counted(Role::Server, OptionState::Deactivating);
        let mut out: Vec<Element> = Vec::new();
        option.negotiate(Verb::Dont, &mut out);
        assert_eq!(option.state(), OptionState::Inactive);
        assert!(out.is_empty());
        assert_eq!(*seen.lock().unwrap(), vec![OptionState::Inactive]);
    }

    #[test]
    fn one_negotiation_always_settles() {
        for role in [Role::Client, Role::Server] {
            for state in ALL_STATES {
                for verb in [role.remote_positive(), role.remote_negative()] {
                    let (mut option, seen) = counted(role, state);
                    let mut out: Vec<Element> = Vec::new();
                    option.negotiate(verb, &mut out);
                    assert!(
                        matches!(option.state(), OptionState::Active | OptionState::Inactive),
                        "{role} {state} {verb} left {}",
                        option.state()
                    );
                    assert!(seen.lock().unwrap().len() <= 1);
                }
            }
        }
    }

    #[traced_test]
    #[test]
    fn transitions_are_logged() {
        let mut option = TelnetOption::new(Role::Server, 3, ());
        option.activate(&mut Vec::<Element>::new());
        assert!(logs_contain("Option state changed"));
    }

    // ============================================================================
    // Subnegotiation Gating
    // ============================================================================

    #[test]
    fn subnegotiation_reaches_handler_only_when_active() {
        for state in ALL_STATES {
            let (mut option, _) = counted(Role::Client, state);
            option.subnegotiate(Bytes::from_static(b"data"), &mut Vec::<Element>::new());
            let expected = usize::from(state == OptionState::Active);
            assert_eq!(option.handler().received.len(), expected, "state {state}");
        }
    }

    #[test]
    fn handler_hook_runs_before_observers() {
        struct Hook;
        impl OptionHandler for Hook {
            fn state_changed(&mut self, _option: u8, _state: OptionState, sink: &mut dyn Sink) {
                sink.send_data("hook");
            }
        }
        let mut option = TelnetOption::new(Role::Server, 1, Hook);
        option.on_state_changed(|_, sink| sink.send_data("observer"));
        let mut out: Vec<Element> = Vec::new();
        option.negotiate(Verb::Do, &mut out);
        assert_eq!(
            out,
            vec![neg_for(1, Verb::Will), Element::from("hook"), Element::from("observer")]
        );
    }

    fn neg_for(option: u8, verb: Verb) -> Element {
        Negotiation::new(verb, option).into()
    }

    #[test]
    fn negotiable_downcasts_to_concrete_type() {
        let boxed: Box<dyn Negotiable> = Box::new(TelnetOption::new(Role::Client, 24, Recorder::default()));
        assert_eq!(boxed.code(), 24);
        assert_eq!(boxed.role(), Role::Client);
        assert!(boxed.as_any().downcast_ref::<TelnetOption<Recorder>>().is_some());
        assert!(boxed.as_any().downcast_ref::<TelnetOption<()>>().is_none());
    }
}
