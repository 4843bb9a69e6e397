// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Listener callback registrations.

use alloc::vec::Vec;

use crate::attributes::wire_enum;
use crate::handle::RemoteRef;
use crate::wire::{Reader, Wire, WireError, Writer, read_seq, write_seq};

wire_enum! {
    /// When a registered callback fires.
    pub enum CallbackKind as u32 (write_u32, read_u32) {
        /// After the transaction is presented.
        #[default]
        OnComplete = 0,
        /// After the transaction is committed.
        OnCommit = 1,
    }
}

/// One registered callback.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CallbackId {
    /// Caller-chosen id.
    pub id: i64,
    /// When it fires.
    pub kind: CallbackKind,
}

impl Wire for CallbackId {
    fn write<W: Writer + ?Sized>(&self, out: &mut W) -> Result<(), WireError> {
        out.write_i64(self.id)?;
        self.kind.write(out)
    }

    fn read<R: Reader + ?Sized>(input: &mut R) -> Result<Self, WireError> {
        Ok(Self {
            id: input.read_i64()?,
            kind: CallbackKind::read(input)?,
        })
    }
}

/// The callbacks one listener registered on a layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListenerCallbacks {
    /// The listener to notify.
    pub listener: RemoteRef,
    /// Callbacks it registered.
    pub callback_ids: Vec<CallbackId>,
}

impl Wire for ListenerCallbacks {
    fn write<W: Writer + ?Sized>(&self, out: &mut W) -> Result<(), WireError> {
        out.write_object(Some(&self.listener))?;
        write_seq(&self.callback_ids, out)
    }

    fn read<R: Reader + ?Sized>(input: &mut R) -> Result<Self, WireError> {
        Ok(Self {
            listener: input.read_required_object()?,
            callback_ids: read_seq(input)?,
        })
    }
}
