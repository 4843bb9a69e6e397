// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Buffer attachment payload.

use crate::handle::RemoteRef;
use crate::wire::{Reader, Wire, WireError, Writer};

bitflags::bitflags! {
    /// Which parts of a [`BufferData`] the producer set.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct BufferDataChange: u32 {
        /// `acquire_fence` is meaningful.
        const FENCE_CHANGED = 0x01;
        /// `frame_number` is meaningful.
        const FRAME_NUMBER_CHANGED = 0x02;
        /// `cached_buffer` is meaningful.
        const CACHED_BUFFER_CHANGED = 0x04;
    }
}

/// Reference to a buffer the compositor already holds in its cache.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CachedBuffer {
    /// Owner of the cache entry.
    pub token: Option<RemoteRef>,
    /// Cache key.
    pub id: u64,
}

impl CachedBuffer {
    /// Returns whether this names a cache entry.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.token.is_some()
    }
}

/// Key the compositor uses to report a buffer release.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ReleaseCallbackId {
    /// The released buffer.
    pub buffer_id: u64,
    /// Frame the buffer was attached for.
    pub frame_number: u64,
}

/// A buffer attachment and its synchronization data.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BufferData {
    /// Which optional parts are meaningful.
    pub flags: BufferDataChange,
    /// The buffer itself, unless a cached buffer is used.
    pub buffer: Option<RemoteRef>,
    /// Fence the compositor waits on before reading the buffer.
    pub acquire_fence: Option<RemoteRef>,
    /// Producer frame number.
    pub frame_number: u64,
    /// Listener notified when the buffer is released.
    pub release_listener: Option<RemoteRef>,
    /// Endpoint the release is reported to.
    pub release_endpoint: Option<RemoteRef>,
    /// Cached buffer, when `buffer` is absent.
    pub cached_buffer: CachedBuffer,
    /// Whether `barrier_frame_number` must be presented first.
    pub has_barrier: bool,
    /// Frame that must be presented before this one.
    pub barrier_frame_number: u64,
    /// Producer that submitted the buffer.
    pub producer_id: u32,
}

impl BufferData {
    /// Returns whether a buffer is attached directly.
    #[must_use]
    pub fn has_buffer(&self) -> bool {
        self.buffer.is_some()
    }

    /// Returns whether the data names a buffer, directly or through the
    /// cache.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.has_buffer() || self.cached_buffer.is_valid()
    }

    /// Returns the key under which this buffer's release is reported.
    ///
    /// Uses the attached buffer's id, or the cache key when no buffer is
    /// attached.
    #[must_use]
    pub fn release_callback_id(&self) -> ReleaseCallbackId {
        let buffer_id = match &self.buffer {
            Some(buffer) => buffer.id().0,
            None => self.cached_buffer.id,
        };
        ReleaseCallbackId {
            buffer_id,
            frame_number: self.frame_number,
        }
    }
}

impl Wire for BufferData {
    fn write<W: Writer + ?Sized>(&self, out: &mut W) -> Result<(), WireError> {
        out.write_u32(self.flags.bits())?;
        out.write_object(self.buffer.as_ref())?;
        out.write_object(self.acquire_fence.as_ref())?;
        out.write_u64(self.frame_number)?;
        out.write_object(self.release_listener.as_ref())?;
        out.write_object(self.release_endpoint.as_ref())?;
        out.write_object(self.cached_buffer.token.as_ref())?;
        out.write_u64(self.cached_buffer.id)?;
        out.write_bool(self.has_barrier)?;
        out.write_u64(self.barrier_frame_number)?;
        out.write_u32(self.producer_id)
    }

    fn read<R: Reader + ?Sized>(input: &mut R) -> Result<Self, WireError> {
        Ok(Self {
            flags: BufferDataChange::from_bits_retain(input.read_u32()?),
            buffer: input.read_object()?,
            acquire_fence: input.read_object()?,
            frame_number: input.read_u64()?,
            release_listener: input.read_object()?,
            release_endpoint: input.read_object()?,
            cached_buffer: CachedBuffer {
                token: input.read_object()?,
                id: input.read_u64()?,
            },
            has_barrier: input.read_bool()?,
            barrier_frame_number: input.read_u64()?,
            producer_id: input.read_u32()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handle::ObjectId;

    #[test]
    fn release_id_prefers_attached_buffer() {
        let data = BufferData {
            buffer: Some(RemoteRef::new(ObjectId(11))),
            frame_number: 4,
            cached_buffer: CachedBuffer {
                token: None,
                id: 99,
            },
            ..BufferData::default()
        };
        assert_eq!(
            data.release_callback_id(),
            ReleaseCallbackId {
                buffer_id: 11,
                frame_number: 4
            }
        );
    }

    #[test]
    fn release_id_falls_back_to_cache_key() {
        let data = BufferData {
            cached_buffer: CachedBuffer {
                token: Some(RemoteRef::new(ObjectId(1))),
                id: 99,
            },
            ..BufferData::default()
        };
        assert_eq!(data.release_callback_id().buffer_id, 99);
        assert!(data.is_valid());
        assert!(!data.has_buffer());
    }

    #[test]
    fn empty_data_is_not_valid() {
        assert!(!BufferData::default().is_valid());
    }
}
