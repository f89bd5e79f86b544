//! # Effect Save Codec
//!
//! Little-endian binary layout, one block per frame:
//!
//! ```text
//! i32        live_count
//! live_count × {
//!     f64 × 3    position
//!     f64 × 3    velocity
//!     f32        age
//!     i32        kind      (1 = explosion, 2 = damage)
//! }
//! ```
//!
//! The explosion radius is not stored. Several frames can be written back to
//! back into one stream; the reader is a cursor that picks up where the
//! previous block ended.

use starfall_shared::Vec3d;

use crate::error::{SfxError, SfxResult};
use crate::slot::{EffectKind, EffectSlot, EffectState};

/// Bytes in the count header.
pub const COUNT_SIZE: usize = 4;

/// Bytes per effect record.
pub const RECORD_SIZE: usize = 3 * 8 + 3 * 8 + 4 + 4;

/// Growable save buffer.
#[derive(Clone, Debug, Default)]
pub struct SaveWriter {
    buffer: Vec<u8>,
}

impl SaveWriter {
    /// Creates an empty writer.
    #[must_use]
    pub const fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    /// Returns the number of bytes written.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Returns true if no bytes have been written.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Returns a slice of the written data.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }

    /// Consumes the writer, returning the bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }

    /// Writes an i32 in little-endian format.
    #[inline]
    pub fn write_i32(&mut self, value: i32) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    /// Writes a f32 in little-endian format.
    #[inline]
    pub fn write_f32(&mut self, value: f32) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    /// Writes a f64 in little-endian format.
    #[inline]
    pub fn write_f64(&mut self, value: f64) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    /// Writes three f64s.
    #[inline]
    pub fn write_vec3d(&mut self, value: Vec3d) {
        self.write_f64(value.x);
        self.write_f64(value.y);
        self.write_f64(value.z);
    }

    /// Writes one effect record. Empty slots are skipped and return `false`.
    pub fn write_effect(&mut self, slot: &EffectSlot) -> bool {
        let Some(state) = slot.state() else {
            return false;
        };
        self.write_vec3d(state.position);
        self.write_vec3d(state.velocity);
        self.write_f32(state.age);
        self.write_i32(slot.kind().to_i32());
        true
    }
}

/// Bounds-checked cursor over a save stream.
#[derive(Clone, Debug)]
pub struct SaveReader<'a> {
    buffer: &'a [u8],
    position: usize,
}

impl<'a> SaveReader<'a> {
    /// Creates a reader at the start of `buffer`.
    #[must_use]
    pub const fn new(buffer: &'a [u8]) -> Self {
        Self {
            buffer,
            position: 0,
        }
    }

    /// Current byte offset.
    #[inline]
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Returns the number of bytes remaining.
    #[inline]
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.position)
    }

    /// Fails unless at least `len` bytes remain.
    ///
    /// # Errors
    ///
    /// [`SfxError::CorruptState`] naming `what` was being read.
    pub fn ensure(&self, len: usize, what: &str) -> SfxResult<()> {
        if self.remaining() < len {
            return Err(SfxError::corrupt(
                self.position,
                format!(
                    "truncated {what}: need {len} bytes, {} left",
                    self.remaining()
                ),
            ));
        }
        Ok(())
    }

    fn take<const N: usize>(&mut self, what: &str) -> SfxResult<[u8; N]> {
        self.ensure(N, what)?;
        let mut bytes = [0u8; N];
        bytes.copy_from_slice(&self.buffer[self.position..self.position + N]);
        self.position += N;
        Ok(bytes)
    }

    /// Reads an i32 in little-endian format.
    ///
    /// # Errors
    ///
    /// [`SfxError::CorruptState`] at end of stream.
    pub fn read_i32(&mut self) -> SfxResult<i32> {
        self.take("i32").map(i32::from_le_bytes)
    }

    /// Reads a f32 in little-endian format.
    ///
    /// # Errors
    ///
    /// [`SfxError::CorruptState`] at end of stream.
    pub fn read_f32(&mut self) -> SfxResult<f32> {
        self.take("f32").map(f32::from_le_bytes)
    }

    /// Reads a f64 in little-endian format.
    ///
    /// # Errors
    ///
    /// [`SfxError::CorruptState`] at end of stream.
    pub fn read_f64(&mut self) -> SfxResult<f64> {
        self.take("f64").map(f64::from_le_bytes)
    }

    /// Reads three f64s.
    ///
    /// # Errors
    ///
    /// [`SfxError::CorruptState`] at end of stream.
    pub fn read_vec3d(&mut self) -> SfxResult<Vec3d> {
        Ok(Vec3d::new(self.read_f64()?, self.read_f64()?, self.read_f64()?))
    }

    /// Reads one effect record. Explosions get `restored_radius`.
    ///
    /// # Errors
    ///
    /// [`SfxError::CorruptState`] if the record is truncated, its kind is not
    /// a live effect kind, or its age is negative or not finite.
    pub fn read_effect(&mut self, restored_radius: f64) -> SfxResult<EffectSlot> {
        let start = self.position;
        self.ensure(RECORD_SIZE, "effect record")?;

        let position = self.read_vec3d()?;
        let velocity = self.read_vec3d()?;
        let age = self.read_f32()?;
        let raw_kind = self.read_i32()?;

        if !age.is_finite() || age < 0.0 {
            return Err(SfxError::corrupt(start, format!("invalid effect age {age}")));
        }
        let kind = EffectKind::from_i32(raw_kind)
            .ok_or_else(|| SfxError::corrupt(start, format!("unknown effect kind {raw_kind}")))?;
        let state = EffectState {
            position,
            velocity,
            age,
        };
        EffectSlot::from_parts(kind, state, restored_radius)
            .ok_or_else(|| SfxError::corrupt(start, "empty slot written as a live effect"))
    }
}
