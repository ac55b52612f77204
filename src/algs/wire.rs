//! Fixed, versioned, little-endian wire records for the halo exchange
//! rounds.
//!
//! Header fields are pre-LE fixed-width integers in `#[repr(C)]`
//! `bytemuck::Pod` structs; bulk coordinate/field data is shipped as raw
//! `Pod` slices. Floats are carried as LE bit patterns.

use bytemuck::{Pod, Zeroable};
use std::mem::size_of;

use crate::error::GridHaloError;

/// Bump when the layout or semantics change in incompatible ways.
pub const WIRE_VERSION: u16 = 1;

/// Family codes carried in descriptor headers.
pub const FAMILY_UNIFORM: u16 = 1;
pub const FAMILY_RECTILINEAR: u16 = 2;
pub const FAMILY_CURVILINEAR: u16 = 3;

// ===== Round A: block descriptors ==========================================

/// Shared descriptor header; the family geometry payload follows in the
/// published enqueue order.
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct WireDescriptorHdr {
    pub version_le: u16,
    pub family_le: u16,
    pub scalar_le: u16,
    pub _pad: u16,
    pub gid_le: u32,
}

impl WireDescriptorHdr {
    pub fn new(family: u16, scalar: u16, gid: u32) -> Self {
        Self {
            version_le: WIRE_VERSION.to_le(),
            family_le: family.to_le(),
            scalar_le: scalar.to_le(),
            _pad: 0,
            gid_le: gid.to_le(),
        }
    }

    pub fn version(&self) -> u16 {
        u16::from_le(self.version_le)
    }
    pub fn family(&self) -> u16 {
        u16::from_le(self.family_le)
    }
    pub fn scalar(&self) -> u16 {
        u16::from_le(self.scalar_le)
    }
    pub fn gid(&self) -> u32 {
        u32::from_le(self.gid_le)
    }
}

/// Length prefix for a coordinate/point/field array on the wire.
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct WireArrayLen {
    pub n_le: u64,
}

impl WireArrayLen {
    pub fn new(n: usize) -> Self {
        Self {
            n_le: (n as u64).to_le(),
        }
    }
    pub fn get(&self) -> usize {
        u64::from_le(self.n_le) as usize
    }
}

/// Uniform-family geometry payload, in enqueue order: dim, origin, spacing,
/// quaternion, extent. Floats travel as LE bit patterns.
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct WireUniformGeom {
    pub dim_le: i32,
    pub _pad: u32,
    pub origin_bits_le: [u64; 3],
    pub spacing_bits_le: [u64; 3],
    pub quaternion_bits_le: [u64; 4],
    pub extent_le: [i32; 6],
}

impl WireUniformGeom {
    pub fn new(
        dim: i32,
        origin: [f64; 3],
        spacing: [f64; 3],
        quaternion: [f64; 4],
        extent: [i32; 6],
    ) -> Self {
        Self {
            dim_le: dim.to_le(),
            _pad: 0,
            origin_bits_le: origin.map(|v| v.to_bits().to_le()),
            spacing_bits_le: spacing.map(|v| v.to_bits().to_le()),
            quaternion_bits_le: quaternion.map(|v| v.to_bits().to_le()),
            extent_le: extent.map(i32::to_le),
        }
    }

    pub fn dim(&self) -> i32 {
        i32::from_le(self.dim_le)
    }
    pub fn origin(&self) -> [f64; 3] {
        self.origin_bits_le.map(|b| f64::from_bits(u64::from_le(b)))
    }
    pub fn spacing(&self) -> [f64; 3] {
        self.spacing_bits_le.map(|b| f64::from_bits(u64::from_le(b)))
    }
    pub fn quaternion(&self) -> [f64; 4] {
        self.quaternion_bits_le
            .map(|b| f64::from_bits(u64::from_le(b)))
    }
    pub fn extent(&self) -> [i32; 6] {
        self.extent_le.map(i32::from_le)
    }
}

/// Shared geometry prefix of the rectilinear and curvilinear payloads:
/// dim then extent, with the coordinate arrays following.
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct WireGridGeomHdr {
    pub dim_le: i32,
    pub extent_le: [i32; 6],
}

impl WireGridGeomHdr {
    pub fn new(dim: i32, extent: [i32; 6]) -> Self {
        Self {
            dim_le: dim.to_le(),
            extent_le: extent.map(i32::to_le),
        }
    }

    pub fn dim(&self) -> i32 {
        i32::from_le(self.dim_le)
    }
    pub fn extent(&self) -> [i32; 6] {
        self.extent_le.map(i32::from_le)
    }
}

// ===== Round B: field payloads =============================================

/// Header of one per-link payload message.
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct WirePayloadHdr {
    pub src_le: u32,
    pub dst_le: u32,
    pub cell_count_le: u64,
    pub point_count_le: u64,
    pub cell_fields_le: u32,
    pub point_fields_le: u32,
}

impl WirePayloadHdr {
    pub fn new(
        src: u32,
        dst: u32,
        cell_count: usize,
        point_count: usize,
        cell_fields: usize,
        point_fields: usize,
    ) -> Self {
        Self {
            src_le: src.to_le(),
            dst_le: dst.to_le(),
            cell_count_le: (cell_count as u64).to_le(),
            point_count_le: (point_count as u64).to_le(),
            cell_fields_le: (cell_fields as u32).to_le(),
            point_fields_le: (point_fields as u32).to_le(),
        }
    }

    pub fn src(&self) -> u32 {
        u32::from_le(self.src_le)
    }
    pub fn dst(&self) -> u32 {
        u32::from_le(self.dst_le)
    }
    pub fn cell_count(&self) -> usize {
        u64::from_le(self.cell_count_le) as usize
    }
    pub fn point_count(&self) -> usize {
        u64::from_le(self.point_count_le) as usize
    }
    pub fn cell_fields(&self) -> usize {
        u32::from_le(self.cell_fields_le) as usize
    }
    pub fn point_fields(&self) -> usize {
        u32::from_le(self.point_fields_le) as usize
    }
}

// ===== Encoding helpers ====================================================

/// Append one Pod record.
#[inline]
pub fn put_pod<T: Pod>(out: &mut Vec<u8>, v: &T) {
    out.extend_from_slice(bytemuck::bytes_of(v));
}

/// Append a raw Pod slice (no length prefix).
#[inline]
pub fn put_slice<T: Pod>(out: &mut Vec<u8>, s: &[T]) {
    out.extend_from_slice(bytemuck::cast_slice(s));
}

/// Append a length-prefixed Pod array.
#[inline]
pub fn put_array<T: Pod>(out: &mut Vec<u8>, s: &[T]) {
    put_pod(out, &WireArrayLen::new(s.len()));
    put_slice(out, s);
}

// ===== Decoding cursor =====================================================

/// Forward-only reader over a received byte buffer. Reads are unaligned;
/// array reads copy into owned buffers.
pub struct WireCursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> WireCursor<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pos == self.buf.len()
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], GridHaloError> {
        if self.remaining() < n {
            return Err(GridHaloError::Truncated {
                needed: n,
                available: self.remaining(),
            });
        }
        let s = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(s)
    }

    /// Read one Pod record.
    pub fn read<T: Pod>(&mut self) -> Result<T, GridHaloError> {
        let bytes = self.take(size_of::<T>())?;
        Ok(bytemuck::pod_read_unaligned(bytes))
    }

    /// Read `n` Pod elements into an owned buffer.
    pub fn read_vec<T: Pod>(&mut self, n: usize) -> Result<Vec<T>, GridHaloError> {
        let bytes = self.take(n * size_of::<T>())?;
        Ok(bytemuck::pod_collect_to_vec(bytes))
    }

    /// Read a length-prefixed Pod array.
    pub fn read_array<T: Pod>(&mut self) -> Result<Vec<T>, GridHaloError> {
        let len: WireArrayLen = self.read()?;
        self.read_vec(len.get())
    }

    /// Read `n` raw bytes.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], GridHaloError> {
        self.take(n)
    }
}

/// Validate the fixed part of a descriptor header against the receiving
/// family.
pub fn check_descriptor_hdr(
    hdr: &WireDescriptorHdr,
    family: u16,
    scalar: u16,
) -> Result<(), GridHaloError> {
    if hdr.version() != WIRE_VERSION {
        return Err(GridHaloError::VersionMismatch {
            got: hdr.version(),
            expected: WIRE_VERSION,
        });
    }
    if hdr.family() != family {
        return Err(GridHaloError::FamilyMismatch {
            got: hdr.family(),
            expected: family,
        });
    }
    if hdr.scalar() != scalar {
        return Err(GridHaloError::ScalarMismatch {
            got: hdr.scalar(),
            expected: scalar,
        });
    }
    Ok(())
}

// ===== Compile-time sanity checks ==========================================

const _: () = {
    assert!(size_of::<WireDescriptorHdr>() == 12);
    assert!(size_of::<WireArrayLen>() == 8);
    assert!(size_of::<WireUniformGeom>() == 112);
    assert!(size_of::<WireGridGeomHdr>() == 28);
    assert!(size_of::<WirePayloadHdr>() == 32);
};
