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

use crate::{Negotiable, OptionHandler, OptionState, Role, TelnetOption};
use std::collections::HashMap;

/// Installed options, at most one per `(role, code)`.
#[derive(Default)]
pub struct OptionRegistry {
    options: HashMap<(Role, u8), Box<dyn Negotiable>>,
}

impl OptionRegistry {
    /// Creates an empty registry.
    pub fn new() -> OptionRegistry {
        OptionRegistry::default()
    }

    /// Stores `option`, returning any option it displaced.
    pub fn insert(&mut self, option: Box<dyn Negotiable>) -> Option<Box<dyn Negotiable>> {
        self.options.insert((option.role(), option.code()), option)
    }

    /// Removes the option installed for `(role, code)`.
    pub fn remove(&mut self, role: Role, code: u8) -> Option<Box<dyn Negotiable>> {
        self.options.remove(&(role, code))
    }

    /// True if an option is installed for `(role, code)`.
    pub fn contains(&self, role: Role, code: u8) -> bool {
        self.options.contains_key(&(role, code))
    }

    /// The option installed for `(role, code)`.
    pub fn get(&self, role: Role, code: u8) -> Option<&dyn Negotiable> {
        self.options.get(&(role, code)).map(|option| &**option)
    }

    /// Mutable access to the option installed for `(role, code)`.
    pub fn get_mut(&mut self, role: Role, code: u8) -> Option<&mut (dyn Negotiable + 'static)> {
        self.options.get_mut(&(role, code)).map(|option| &mut **option)
    }

    /// The option installed for `(role, code)` if its handler is `H`.
    pub fn typed<H: OptionHandler>(&self, role: Role, code: u8) -> Option<&TelnetOption<H>> {
        self.get(role, code)?.as_any().downcast_ref()
    }

    /// Mutable typed access, see [`OptionRegistry::typed`].
    pub fn typed_mut<H: OptionHandler>(&mut self, role: Role, code: u8) -> Option<&mut TelnetOption<H>> {
        self.get_mut(role, code)?.as_any_mut().downcast_mut()
    }

    /// State of the option installed for `(role, code)`.
    pub fn state(&self, role: Role, code: u8) -> Option<OptionState> {
        self.get(role, code).map(|option| option.state())
    }

    /// Number of installed options.
    pub fn len(&self) -> usize {
        self.options.len()
    }

    /// True when nothing is installed.
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

impl std::fmt::Debug for OptionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(
                self.options
                    .iter()
                    .map(|((role, code), option)| (format!("{role} {code}"), option.state())),
            )
            .finish()
    }
}
