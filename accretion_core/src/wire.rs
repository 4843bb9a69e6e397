// Copyright 2026 the Accretion Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Transport contract and in-memory parcel.
//!
//! Updates cross the process boundary over an ordered byte channel that also
//! carries object references out of band. [`Writer`] and [`Reader`] describe
//! that channel; [`Wire`] is implemented by every record that travels over
//! it. [`Parcel`] is an in-memory channel that encodes primitives as
//! little-endian bytes and keeps object references in a side table.
//!
//! # Encoding rules
//!
//! - Every record writes its whole structure in one canonical order. The
//!   `what` mask does not decide which bytes are present.
//! - Explicitly optional payloads are preceded by a presence `bool`.
//! - Sequences are preceded by their length.
//! - Any read failure aborts the whole read; no partial record is returned.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::handle::RemoteRef;

/// Errors produced while encoding or decoding a record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WireError {
    /// The input ended before a value could be read.
    UnexpectedEnd {
        /// Bytes the value needed.
        needed: usize,
        /// Bytes left in the input.
        remaining: usize,
    },
    /// A sequence length was negative or larger than the remaining input.
    InvalidLength(i64),
    /// An enumerated value was out of range.
    InvalidDiscriminant {
        /// What was being decoded.
        kind: &'static str,
        /// The raw value found.
        value: i64,
    },
    /// A `what` mask carried bits with no known change kind.
    UnknownChangeBits(u64),
    /// An object reference index had no entry in the object table.
    MissingObject(i32),
    /// A string was not valid UTF-8.
    InvalidUtf8,
    /// Writing would grow the channel past its configured limit.
    CapacityExceeded {
        /// The configured limit in bytes.
        limit: usize,
    },
}

impl fmt::Display for WireError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedEnd { needed, remaining } => {
                write!(f, "unexpected end of input (needed {needed}, {remaining} left)")
            }
            Self::InvalidLength(len) => write!(f, "invalid sequence length {len}"),
            Self::InvalidDiscriminant { kind, value } => {
                write!(f, "invalid {kind} value {value}")
            }
            Self::UnknownChangeBits(bits) => write!(f, "unknown change bits {bits:#x}"),
            Self::MissingObject(index) => write!(f, "no object at index {index}"),
            Self::InvalidUtf8 => f.write_str("string is not valid UTF-8"),
            Self::CapacityExceeded { limit } => {
                write!(f, "parcel capacity of {limit} bytes exceeded")
            }
        }
    }
}

impl core::error::Error for WireError {}

/// The sending half of a transport channel.
pub trait Writer {
    /// Writes one byte.
    fn write_u8(&mut self, v: u8) -> Result<(), WireError>;

    /// Writes a 32-bit signed integer.
    fn write_i32(&mut self, v: i32) -> Result<(), WireError>;

    /// Writes a 32-bit unsigned integer.
    fn write_u32(&mut self, v: u32) -> Result<(), WireError>;

    /// Writes a 64-bit signed integer.
    fn write_i64(&mut self, v: i64) -> Result<(), WireError>;

    /// Writes a 64-bit unsigned integer.
    fn write_u64(&mut self, v: u64) -> Result<(), WireError>;

    /// Writes a 32-bit float.
    fn write_f32(&mut self, v: f32) -> Result<(), WireError>;

    /// Writes a length-prefixed byte blob.
    fn write_blob(&mut self, bytes: &[u8]) -> Result<(), WireError>;

    /// Writes a nullable object reference.
    fn write_object(&mut self, object: Option<&RemoteRef>) -> Result<(), WireError>;

    /// Writes a signed byte.
    fn write_i8(&mut self, v: i8) -> Result<(), WireError> {
        self.write_u8(v.to_le_bytes()[0])
    }

    /// Writes a boolean as a 32-bit word.
    fn write_bool(&mut self, v: bool) -> Result<(), WireError> {
        self.write_u32(u32::from(v))
    }

    /// Writes a sequence length.
    fn write_len(&mut self, len: usize) -> Result<(), WireError> {
        let len = u32::try_from(len).map_err(|_| WireError::InvalidLength(i64::MAX))?;
        self.write_u32(len)
    }

    /// Writes a length-prefixed UTF-8 string.
    fn write_str(&mut self, s: &str) -> Result<(), WireError> {
        self.write_blob(s.as_bytes())
    }
}

/// The receiving half of a transport channel.
pub trait Reader {
    /// Returns the number of unread bytes.
    fn remaining(&self) -> usize;

    /// Reads one byte.
    fn read_u8(&mut self) -> Result<u8, WireError>;

    /// Reads a 32-bit signed integer.
    fn read_i32(&mut self) -> Result<i32, WireError>;

    /// Reads a 32-bit unsigned integer.
    fn read_u32(&mut self) -> Result<u32, WireError>;

    /// Reads a 64-bit signed integer.
    fn read_i64(&mut self) -> Result<i64, WireError>;

    /// Reads a 64-bit unsigned integer.
    fn read_u64(&mut self) -> Result<u64, WireError>;

    /// Reads a 32-bit float.
    fn read_f32(&mut self) -> Result<f32, WireError>;

    /// Reads a length-prefixed byte blob.
    fn read_blob(&mut self) -> Result<Vec<u8>, WireError>;

    /// Reads a nullable object reference.
    fn read_object(&mut self) -> Result<Option<RemoteRef>, WireError>;

    /// Reads a signed byte.
    fn read_i8(&mut self) -> Result<i8, WireError> {
        Ok(i8::from_le_bytes([self.read_u8()?]))
    }

    /// Reads a boolean written by [`Writer::write_bool`].
    fn read_bool(&mut self) -> Result<bool, WireError> {
        match self.read_u32()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(WireError::InvalidDiscriminant {
                kind: "bool",
                value: i64::from(other),
            }),
        }
    }

    /// Reads a sequence length, rejecting lengths larger than the remaining
    /// input (every element occupies at least one byte).
    fn read_len(&mut self) -> Result<usize, WireError> {
        let len = self.read_u32()?;
        let len_usize = usize::try_from(len).map_err(|_| WireError::InvalidLength(len.into()))?;
        if len_usize > self.remaining() {
            return Err(WireError::InvalidLength(len.into()));
        }
        Ok(len_usize)
    }

    /// Reads a length-prefixed UTF-8 string.
    fn read_string(&mut self) -> Result<String, WireError> {
        String::from_utf8(self.read_blob()?).map_err(|_| WireError::InvalidUtf8)
    }

    /// Reads an object reference that must be present.
    fn read_required_object(&mut self) -> Result<RemoteRef, WireError> {
        self.read_object()?.ok_or(WireError::MissingObject(-1))
    }
}

/// A record that can travel over a transport channel.
pub trait Wire: Sized {
    /// Writes the full record in canonical order.
    fn write<W: Writer + ?Sized>(&self, out: &mut W) -> Result<(), WireError>;

    /// Reads a record written by [`write`](Self::write).
    fn read<R: Reader + ?Sized>(input: &mut R) -> Result<Self, WireError>;
}

/// Writes a length-prefixed sequence of records.
pub fn write_seq<T: Wire, W: Writer + ?Sized>(items: &[T], out: &mut W) -> Result<(), WireError> {
    out.write_len(items.len())?;
    for item in items {
        item.write(out)?;
    }
    Ok(())
}

/// Reads a length-prefixed sequence of records.
pub fn read_seq<T: Wire, R: Reader + ?Sized>(input: &mut R) -> Result<Vec<T>, WireError> {
    let len = input.read_len()?;
    let mut items = Vec::with_capacity(len);
    for _ in 0..len {
        items.push(T::read(input)?);
    }
    Ok(items)
}

/// Sentinel index written for an absent object reference.
const NULL_OBJECT: i32 = -1;

/// An in-memory transport channel.
///
/// Primitives are appended as little-endian bytes. Object references are
/// pushed onto a side table and their index is written inline, so reading a
/// parcel back yields handles identical to the ones written.
#[derive(Clone, Debug, Default)]
pub struct Parcel {
    data: Vec<u8>,
    objects: Vec<RemoteRef>,
    pos: usize,
    limit: Option<usize>,
}

impl Parcel {
    /// Creates an empty, unbounded parcel.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty parcel whose byte payload may not exceed `limit`.
    #[must_use]
    pub fn with_capacity_limit(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }

    /// Creates a parcel positioned at the start of existing bytes and objects.
    #[must_use]
    pub fn from_parts(data: Vec<u8>, objects: Vec<RemoteRef>) -> Self {
        Self {
            data,
            objects,
            pos: 0,
            limit: None,
        }
    }

    /// Returns the encoded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Returns the object side table.
    #[must_use]
    pub fn objects(&self) -> &[RemoteRef] {
        &self.objects
    }

    /// Returns the number of encoded bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns whether nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the read cursor.
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Moves the read cursor back to the start.
    pub fn rewind(&mut self) {
        self.pos = 0;
    }

    /// Discards everything that was written.
    pub fn clear(&mut self) {
        self.data.clear();
        self.objects.clear();
        self.pos = 0;
    }

    // -- encoding helpers --------------------------------------------------

    fn append(&mut self, bytes: &[u8]) -> Result<(), WireError> {
        if let Some(limit) = self.limit
            && self.data.len() + bytes.len() > limit
        {
            return Err(WireError::CapacityExceeded { limit });
        }
        self.data.extend_from_slice(bytes);
        Ok(())
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N], WireError> {
        let remaining = self.data.len() - self.pos;
        if remaining < N {
            return Err(WireError::UnexpectedEnd {
                needed: N,
                remaining,
            });
        }
        let mut out = [0_u8; N];
        out.copy_from_slice(&self.data[self.pos..self.pos + N]);
        self.pos += N;
        Ok(out)
    }
}

impl Writer for Parcel {
    fn write_u8(&mut self, v: u8) -> Result<(), WireError> {
        self.append(&[v])
    }

    fn write_i32(&mut self, v: i32) -> Result<(), WireError> {
        self.append(&v.to_le_bytes())
    }

    fn write_u32(&mut self, v: u32) -> Result<(), WireError> {
        self.append(&v.to_le_bytes())
    }

    fn write_i64(&mut self, v: i64) -> Result<(), WireError> {
        self.append(&v.to_le_bytes())
    }

    fn write_u64(&mut self, v: u64) -> Result<(), WireError> {
        self.append(&v.to_le_bytes())
    }

    fn write_f32(&mut self, v: f32) -> Result<(), WireError> {
        self.append(&v.to_le_bytes())
    }

    fn write_blob(&mut self, bytes: &[u8]) -> Result<(), WireError> {
        self.write_len(bytes.len())?;
        self.append(bytes)
    }

    fn write_object(&mut self, object: Option<&RemoteRef>) -> Result<(), WireError> {
        match object {
            Some(object) => {
                let index = i32::try_from(self.objects.len())
                    .map_err(|_| WireError::InvalidLength(i64::MAX))?;
                self.write_i32(index)?;
                self.objects.push(object.clone());
                Ok(())
            }
            None => self.write_i32(NULL_OBJECT),
        }
    }
}

impl Reader for Parcel {
    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn read_u8(&mut self) -> Result<u8, WireError> {
        Ok(self.take::<1>()?[0])
    }

    fn read_i32(&mut self) -> Result<i32, WireError> {
        Ok(i32::from_le_bytes(self.take()?))
    }

    fn read_u32(&mut self) -> Result<u32, WireError> {
        Ok(u32::from_le_bytes(self.take()?))
    }

    fn read_i64(&mut self) -> Result<i64, WireError> {
        Ok(i64::from_le_bytes(self.take()?))
    }

    fn read_u64(&mut self) -> Result<u64, WireError> {
        Ok(u64::from_le_bytes(self.take()?))
    }

    fn read_f32(&mut self) -> Result<f32, WireError> {
        Ok(f32::from_le_bytes(self.take()?))
    }

    fn read_blob(&mut self) -> Result<Vec<u8>, WireError> {
        let len = self.read_len()?;
        let bytes = self.data[self.pos..self.pos + len].to_vec();
        self.pos += len;
        Ok(bytes)
    }

    fn read_object(&mut self) -> Result<Option<RemoteRef>, WireError> {
        let index = self.read_i32()?;
        if index == NULL_OBJECT {
            return Ok(None);
        }
        usize::try_from(index)
            .ok()
            .and_then(|i| self.objects.get(i))
            .cloned()
            .map(Some)
            .ok_or(WireError::MissingObject(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handle::ObjectId;

    #[test]
    fn primitives_read_back_in_order() {
        let mut p = Parcel::new();
        p.write_u8(0xab).unwrap();
        p.write_i32(-5).unwrap();
        p.write_u64(u64::MAX).unwrap();
        p.write_f32(1.5).unwrap();
        p.write_bool(true).unwrap();
        p.write_i8(-3).unwrap();
        p.write_str("layer").unwrap();

        assert_eq!(p.read_u8().unwrap(), 0xab);
        assert_eq!(p.read_i32().unwrap(), -5);
        assert_eq!(p.read_u64().unwrap(), u64::MAX);
        assert_eq!(p.read_f32().unwrap(), 1.5);
        assert!(p.read_bool().unwrap());
        assert_eq!(p.read_i8().unwrap(), -3);
        assert_eq!(p.read_string().unwrap(), "layer");
        assert_eq!(p.remaining(), 0);
    }

    #[test]
    fn objects_keep_identity() {
        let obj = RemoteRef::new(ObjectId(9));
        let mut p = Parcel::new();
        p.write_object(Some(&obj)).unwrap();
        p.write_object(None).unwrap();

        assert_eq!(p.read_object().unwrap(), Some(obj));
        assert_eq!(p.read_object().unwrap(), None);
    }

    #[test]
    fn truncated_input_is_an_error() {
        let mut p = Parcel::from_parts(alloc::vec![1, 2], Vec::new());
        assert_eq!(
            p.read_u32(),
            Err(WireError::UnexpectedEnd {
                needed: 4,
                remaining: 2
            })
        );
    }

    #[test]
    fn oversized_length_is_rejected() {
        let mut p = Parcel::new();
        p.write_u32(1000).unwrap();
        p.write_u8(0).unwrap();
        assert_eq!(p.read_blob(), Err(WireError::InvalidLength(1000)));
    }

    #[test]
    fn bad_bool_is_rejected() {
        let mut p = Parcel::new();
        p.write_u32(2).unwrap();
        assert!(matches!(
            p.read_bool(),
            Err(WireError::InvalidDiscriminant { kind: "bool", .. })
        ));
    }

    #[test]
    fn dangling_object_index_is_rejected() {
        let mut p = Parcel::new();
        p.write_i32(3).unwrap();
        assert_eq!(p.read_object(), Err(WireError::MissingObject(3)));
    }

    #[test]
    fn capacity_limit_is_enforced() {
        let mut p = Parcel::with_capacity_limit(6);
        p.write_u32(1).unwrap();
        assert_eq!(
            p.write_u32(2),
            Err(WireError::CapacityExceeded { limit: 6 })
        );
        assert_eq!(p.len(), 4);
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        let mut p = Parcel::new();
        p.write_blob(&[0xff, 0xfe]).unwrap();
        assert_eq!(p.read_string(), Err(WireError::InvalidUtf8));
    }
}
