// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input commands that travel alongside layer updates.
//!
//! Unlike layer and display updates these are not flag-tagged: focus
//! requests are an ordered log and merge by appending.

use alloc::string::String;
use alloc::vec::Vec;

use crate::handle::{HandleSet, RemoteRef};
use crate::wire::{Reader, Wire, WireError, Writer, read_seq, write_seq};

/// A request to move input focus to a window.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FocusRequest {
    /// Window that should receive focus.
    pub token: Option<RemoteRef>,
    /// Debug name of that window.
    pub window_name: String,
    /// Window expected to hold focus when the request is applied, if any.
    pub focused_token: Option<RemoteRef>,
    /// Debug name of the expected focused window.
    pub focused_window_name: String,
    /// When the request was made, in nanoseconds.
    pub timestamp: i64,
    /// Display the request applies to.
    pub display_id: i32,
}

impl Wire for FocusRequest {
    fn write<W: Writer + ?Sized>(&self, out: &mut W) -> Result<(), WireError> {
        out.write_object(self.token.as_ref())?;
        out.write_str(&self.window_name)?;
        out.write_object(self.focused_token.as_ref())?;
        out.write_str(&self.focused_window_name)?;
        out.write_i64(self.timestamp)?;
        out.write_i32(self.display_id)
    }

    fn read<R: Reader + ?Sized>(input: &mut R) -> Result<Self, WireError> {
        Ok(Self {
            token: input.read_object()?,
            window_name: input.read_string()?,
            focused_token: input.read_object()?,
            focused_window_name: input.read_string()?,
            timestamp: input.read_i64()?,
            display_id: input.read_i32()?,
        })
    }
}

/// Focus requests plus listeners waiting for the next window-info report.
///
/// Focus requests keep their order; replaying them out of order would land
/// focus on the wrong window. Listeners form a set keyed by handle identity.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InputWindowCommands {
    focus_requests: Vec<FocusRequest>,
    reported_listeners: HandleSet,
}

impl InputWindowCommands {
    /// Creates an empty batch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queued focus requests, oldest first.
    #[must_use]
    pub fn focus_requests(&self) -> &[FocusRequest] {
        &self.focus_requests
    }

    /// Listeners to notify on the next window-info report.
    #[must_use]
    pub fn reported_listeners(&self) -> &[RemoteRef] {
        self.reported_listeners.as_slice()
    }

    /// Appends a focus request.
    pub fn add_focus_request(&mut self, request: FocusRequest) {
        self.focus_requests.push(request);
    }

    /// Adds a listener; returns `false` if it was already registered.
    pub fn add_reported_listener(&mut self, listener: RemoteRef) -> bool {
        self.reported_listeners.insert(listener)
    }

    /// Appends `other`'s focus requests after this batch's and unions the
    /// listeners. Returns whether `other` carried anything.
    pub fn merge(&mut self, other: Self) -> bool {
        let changed = !other.is_empty();
        self.focus_requests.extend(other.focus_requests);
        self.reported_listeners.extend(other.reported_listeners);
        changed
    }

    /// Returns whether the batch holds nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.focus_requests.is_empty() && self.reported_listeners.is_empty()
    }

    /// Drops every command.
    pub fn clear(&mut self) {
        self.focus_requests.clear();
        self.reported_listeners.clear();
    }
}

impl Wire for InputWindowCommands {
    fn write<W: Writer + ?Sized>(&self, out: &mut W) -> Result<(), WireError> {
        write_seq(&self.focus_requests, out)?;
        out.write_len(self.reported_listeners.len())?;
        for listener in &self.reported_listeners {
            out.write_object(Some(listener))?;
        }
        Ok(())
    }

    fn read<R: Reader + ?Sized>(input: &mut R) -> Result<Self, WireError> {
        let mut commands = Self {
            focus_requests: read_seq(input)?,
            reported_listeners: HandleSet::new(),
        };
        let len = input.read_len()?;
        for _ in 0..len {
            commands.add_reported_listener(input.read_required_object()?);
        }
        Ok(commands)
    }
}
