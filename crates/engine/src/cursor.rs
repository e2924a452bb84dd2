use std::borrow::Cow;

use bytemuck::Pod;

use crate::{ResourceError, ResourceId, ResourceType, Result};

/// Bounds-checked little-endian reader over a borrowed record.
///
/// Every read either succeeds and advances by exactly the bytes it consumed,
/// or fails with `OutOfBounds` and leaves the offset where it was.
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        ByteCursor { data, offset: 0 }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    /// Borrow the next `n` bytes. The returned slice lives as long as the buffer, not the cursor.
    pub fn read_raw(&mut self, n: usize) -> Result<&'a [u8]> {
        if n > self.remaining() {
            return Err(ResourceError::OutOfBounds {
                offset: self.offset,
                requested: n,
                remaining: self.remaining(),
            });
        }
        let bytes = &self.data[self.offset..self.offset + n];
        self.offset += n;
        Ok(bytes)
    }

    /// Skip `n` padding bytes.
    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.read_raw(n).map(|_| ())
    }

    fn read_array_le<const N: usize>(&mut self) -> Result<[u8; N]> {
        let bytes = self.read_raw(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_array_le::<1>()?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        self.read_array_le().map(u16::from_le_bytes)
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        self.read_array_le().map(u32::from_le_bytes)
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        self.read_array_le().map(i32::from_le_bytes)
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        self.read_array_le().map(f32::from_le_bytes)
    }

    /// Length-prefixed string: `u16` byte count, Latin-1 bytes, then padding
    /// up to the next 4-byte boundary of the record.
    pub fn read_string(&mut self) -> Result<String> {
        let start = self.offset;
        let result = self.read_string_inner();
        if result.is_err() {
            self.offset = start;
        }
        result
    }

    fn read_string_inner(&mut self) -> Result<String> {
        let len = self.read_u16()? as usize;
        let bytes = self.read_raw(len)?;
        self.align(4)?;
        Ok(bytes.iter().map(|&b| b as char).collect())
    }

    /// Advance to the next multiple of `alignment` (relative to the start of the buffer).
    pub fn align(&mut self, alignment: usize) -> Result<()> {
        let misalignment = self.offset % alignment;
        if misalignment == 0 {
            return Ok(());
        }
        self.skip(alignment - misalignment)
    }

    /// Read an id that must carry `kind`'s tag. Cross-references go through here too.
    pub fn read_id(&mut self, kind: ResourceType, field: &'static str) -> Result<ResourceId> {
        let id = ResourceId(self.read_u32()?);
        id.expect_kind(kind, field, self.offset)
    }

    /// Read a plain-old-data header without any alignment requirement on the buffer.
    pub fn read_pod<T: Pod>(&mut self) -> Result<T> {
        let bytes = self.read_raw(std::mem::size_of::<T>())?;
        Ok(bytemuck::pod_read_unaligned(bytes))
    }

    /// Typed view over the next `count` elements.
    ///
    /// Borrows straight from the buffer when the offset is aligned for `T`,
    /// otherwise copies. Either way the view cannot outlive the buffer.
    /// Elements are reinterpreted in native byte order, so this only exists on
    /// little-endian hosts; portable decoders read element by element.
    #[cfg(target_endian = "little")]
    pub fn read_array<T: Pod>(&mut self, count: usize) -> Result<Cow<'a, [T]>> {
        let byte_len = count
            .checked_mul(std::mem::size_of::<T>())
            .ok_or(ResourceError::OutOfBounds {
                offset: self.offset,
                requested: usize::MAX,
                remaining: self.remaining(),
            })?;
        let bytes = self.read_raw(byte_len)?;
        Ok(match bytemuck::try_cast_slice(bytes) {
            Ok(view) => Cow::Borrowed(view),
            Err(_) => Cow::Owned(bytemuck::pod_collect_to_vec(bytes)),
        })
    }

    /// Whole-record integrity check: the grammar must have consumed every byte.
    pub fn assert_end(&self) -> Result<()> {
        match self.remaining() {
            0 => Ok(()),
            remaining => Err(ResourceError::TrailingData { remaining }),
        }
    }
}
