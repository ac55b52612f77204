//! Exchange orchestration: the two all-to-all rounds and the public entry
//! points.
//!
//! Round A broadcasts every block's peeled extent and family geometry so
//! each process can match against every remote block; round B ships field
//! slices (and curvilinear ghost points) along the discovered links. Each
//! round is a two-phase "sizes then data" exchange over the
//! [`Communicator`]; these two phases are the only blocking points of the
//! whole pipeline.

use std::collections::BTreeSet;

use crate::algs::communicator::{CommTag, Communicator, HaloCommTags, Wait};
use crate::algs::hidden::fill_hidden_ghosts;
use crate::algs::interface::{
    input_interface_cell_ids, input_interface_point_ids, output_interface_cell_ids,
    output_interface_point_ids,
};
use crate::algs::link::build_links_and_allocate;
use crate::algs::peel::peel_off_ghost_layers;
use crate::algs::wire::{
    check_descriptor_hdr, put_array, put_pod, WireCursor, WireDescriptorHdr, WirePayloadHdr,
};
use crate::block::{Block, BlockId, BlockInfo, BlockStructure, GridFamily};
use crate::error::GridHaloError;
use crate::grid::markers::{DUPLICATE_CELL, DUPLICATE_POINT};
use crate::grid::{CurvilinearGrid, RectilinearGrid, Scalar, UniformGrid};
use crate::topology::extent::Extent;

/// Base tag of the halo protocol; the five phases use consecutive offsets.
pub const HALO_BASE_TAG: CommTag = CommTag::new(0x4A00);

/// Rank-contiguous block id assignment: rank `r` owns the gids
/// `bases[r] .. bases[r] + counts[r]`, with bases the exclusive prefix sum
/// of the per-rank block counts.
#[derive(Clone, Debug)]
pub struct BlockAssigner {
    bases: Vec<u32>,
    total: u32,
}

impl BlockAssigner {
    pub fn from_counts(counts: &[u32]) -> Self {
        let mut bases = Vec::with_capacity(counts.len());
        let mut acc = 0u32;
        for &count in counts {
            bases.push(acc);
            acc += count;
        }
        Self { bases, total: acc }
    }

    /// Gid of the block with the given local index on `rank`.
    #[inline]
    pub fn gid(&self, rank: usize, local_index: usize) -> BlockId {
        BlockId(self.bases[rank] + local_index as u32)
    }

    /// Rank owning `gid`.
    #[inline]
    pub fn rank_of(&self, gid: BlockId) -> usize {
        self.bases.partition_point(|&base| base <= gid.get()) - 1
    }

    /// Local index of `gid` on its owning rank.
    #[inline]
    pub fn local_index(&self, gid: BlockId) -> usize {
        (gid.get() - self.bases[self.rank_of(gid)]) as usize
    }

    /// Total number of blocks across all ranks.
    #[inline]
    pub fn total_blocks(&self) -> usize {
        self.total as usize
    }
}

/// Per-block link sets discovered by the exchange, in local block order.
#[derive(Clone, Debug, Default)]
pub struct LinkSummary {
    pub links: Vec<(BlockId, BTreeSet<BlockId>)>,
}

impl LinkSummary {
    fn collect<G: GridFamily>(blocks: &[Block<G>]) -> Self {
        Self {
            links: blocks
                .iter()
                .map(|b| (b.gid, b.links.clone()))
                .collect(),
        }
    }

    /// Link set of the local block with gid `gid`, if it is local.
    pub fn links_of(&self, gid: BlockId) -> Option<&BTreeSet<BlockId>> {
        self.links
            .iter()
            .find(|(g, _)| *g == gid)
            .map(|(_, set)| set)
    }
}

fn wait_recv<H: Wait>(handle: H) -> Result<Vec<u8>, GridHaloError> {
    handle
        .wait()
        .ok_or_else(|| GridHaloError::TransportFailure("receive completed without data".into()))
}

/// Share per-rank block counts so every rank can derive the gid assignment.
fn exchange_counts<C: Communicator>(
    comm: &C,
    tags: &HaloCommTags,
    local_count: u32,
) -> Result<Vec<u32>, GridHaloError> {
    let me = comm.rank();
    let size = comm.size();
    let mut counts = vec![0u32; size];
    counts[me] = local_count;
    if size == 1 {
        return Ok(counts);
    }

    let mut receives = Vec::with_capacity(size - 1);
    for peer in (0..size).filter(|&p| p != me) {
        let mut buf = [0u8; 4];
        receives.push((peer, comm.irecv(peer, tags.counts.as_u16(), &mut buf)));
    }
    let mut sends = Vec::with_capacity(size - 1);
    for peer in (0..size).filter(|&p| p != me) {
        sends.push(comm.isend(peer, tags.counts.as_u16(), &local_count.to_le_bytes()));
    }
    for (peer, handle) in receives {
        let data = wait_recv(handle)?;
        let raw: [u8; 4] = data.as_slice().try_into().map_err(|_| {
            GridHaloError::TransportFailure(format!("count message from rank {peer} truncated"))
        })?;
        counts[peer] = u32::from_le_bytes(raw);
    }
    for handle in sends {
        let _ = handle.wait();
    }
    Ok(counts)
}

/// One full all-to-all: every rank hands one buffer per peer and gets one
/// buffer back from each. Sizes travel first so receive buffers are exact.
/// The own-rank slot loops back without touching the transport.
fn all_to_all<C: Communicator>(
    comm: &C,
    size_tag: CommTag,
    data_tag: CommTag,
    mut outgoing: Vec<Vec<u8>>,
) -> Result<Vec<Vec<u8>>, GridHaloError> {
    let me = comm.rank();
    let size = comm.size();
    debug_assert_eq!(outgoing.len(), size);

    let mut incoming = vec![Vec::new(); size];
    incoming[me] = std::mem::take(&mut outgoing[me]);
    if size == 1 {
        return Ok(incoming);
    }

    // Phase 1: sizes.
    let mut size_receives = Vec::with_capacity(size - 1);
    for peer in (0..size).filter(|&p| p != me) {
        let mut buf = [0u8; 8];
        size_receives.push((peer, comm.irecv(peer, size_tag.as_u16(), &mut buf)));
    }
    let mut sends = Vec::with_capacity(size - 1);
    for peer in (0..size).filter(|&p| p != me) {
        let bytes = (outgoing[peer].len() as u64).to_le_bytes();
        sends.push(comm.isend(peer, size_tag.as_u16(), &bytes));
    }
    let mut sizes_in = vec![0usize; size];
    for (peer, handle) in size_receives {
        let data = wait_recv(handle)?;
        let raw: [u8; 8] = data.as_slice().try_into().map_err(|_| {
            GridHaloError::TransportFailure(format!("size message from rank {peer} truncated"))
        })?;
        sizes_in[peer] = u64::from_le_bytes(raw) as usize;
    }
    for handle in sends {
        let _ = handle.wait();
    }

    // Phase 2: data.
    let mut data_receives = Vec::with_capacity(size - 1);
    for peer in (0..size).filter(|&p| p != me) {
        let mut buf = vec![0u8; sizes_in[peer]];
        data_receives.push((peer, comm.irecv(peer, data_tag.as_u16(), &mut buf)));
    }
    let mut sends = Vec::with_capacity(size - 1);
    for peer in (0..size).filter(|&p| p != me) {
        sends.push(comm.isend(peer, data_tag.as_u16(), &outgoing[peer]));
    }
    for (peer, handle) in data_receives {
        incoming[peer] = wait_recv(handle)?;
    }
    for handle in sends {
        let _ = handle.wait();
    }
    Ok(incoming)
}

/// Peel every local input and build its block state.
fn setup_blocks<G: GridFamily>(
    inputs: &[G],
    input_ghost_levels: i32,
    assigner: &BlockAssigner,
    rank: usize,
) -> Vec<Block<G>> {
    inputs
        .iter()
        .enumerate()
        .map(|(local_index, input)| {
            let gid = assigner.gid(rank, local_index);
            let extent = input.extent();
            let info = if extent.is_valid() {
                BlockInfo::new(peel_off_ghost_layers(
                    &extent,
                    input.cell_data().ghosts.as_deref(),
                    input_ghost_levels,
                ))
            } else {
                BlockInfo::new(extent)
            };
            let local = if info.extent.is_valid() {
                input.make_local(&info)
            } else {
                G::Descriptor::default()
            };
            let dim = input.data_dimension();
            Block::new(gid, info, local, dim)
        })
        .collect()
}

/// Round A: broadcast every local block's descriptor to every rank (the own
/// batch loops back so same-rank blocks discover each other), and parse the
/// full remote registry.
#[allow(clippy::type_complexity)]
fn exchange_descriptors<G: GridFamily, C: Communicator>(
    comm: &C,
    tags: &HaloCommTags,
    blocks: &[Block<G>],
) -> Result<Vec<(BlockId, i32, Extent, G::Descriptor)>, GridHaloError> {
    let mut batch = Vec::new();
    for block in blocks {
        if !block.info.extent.is_valid() {
            continue;
        }
        put_pod(
            &mut batch,
            &WireDescriptorHdr::new(G::FAMILY_CODE, G::SCALAR_CODE, block.gid.get()),
        );
        G::encode_descriptor(block.dim, block.info.extent, &block.local, &mut batch);
    }

    let outgoing = vec![batch; comm.size()];
    let incoming = all_to_all(comm, tags.descriptor_sizes, tags.descriptor_data, outgoing)?;

    let mut registry = Vec::new();
    for buffer in &incoming {
        let mut cur = WireCursor::new(buffer);
        while !cur.is_empty() {
            let hdr: WireDescriptorHdr = cur.read()?;
            check_descriptor_hdr(&hdr, G::FAMILY_CODE, G::SCALAR_CODE)?;
            let (dim, extent, descriptor) = G::decode_descriptor(&mut cur)?;
            registry.push((BlockId(hdr.gid()), dim, extent, descriptor));
        }
    }
    Ok(registry)
}

/// Instantiate a [`BlockStructure`] on every local block for every remote
/// descriptor. Non-adjacent entries are erased during matching.
fn populate_structures<G: GridFamily>(
    blocks: &mut [Block<G>],
    registry: &[(BlockId, i32, Extent, G::Descriptor)],
) {
    for block in blocks.iter_mut() {
        if !block.info.extent.is_valid() {
            continue;
        }
        for (gid, dim, extent, descriptor) in registry {
            if *gid == block.gid {
                continue;
            }
            block
                .structures
                .insert(*gid, BlockStructure::new(*extent, *dim, descriptor.clone()));
        }
    }
}

fn put_name(out: &mut Vec<u8>, name: &str) {
    put_array(out, name.as_bytes());
}

fn read_name(cur: &mut WireCursor<'_>) -> Result<String, GridHaloError> {
    let bytes: Vec<u8> = cur.read_array()?;
    String::from_utf8(bytes)
        .map_err(|_| GridHaloError::TransportFailure("field name is not valid UTF-8".into()))
}

fn gather(values: &[f64], ids: &[usize]) -> Vec<f64> {
    ids.iter().map(|&id| values[id]).collect()
}

/// Round B: ship field slices (and curvilinear ghost points) along every
/// link, then write what arrived through the output-side id lists and mark
/// the received cells/points as duplicates.
fn exchange_payloads<G: GridFamily, C: Communicator>(
    comm: &C,
    tags: &HaloCommTags,
    assigner: &BlockAssigner,
    blocks: &[Block<G>],
    inputs: &[G],
    outputs: &mut [G],
) -> Result<(), GridHaloError> {
    let me = comm.rank();
    let mut outgoing = vec![Vec::new(); comm.size()];

    for (block, input) in blocks.iter().zip(inputs) {
        if !block.info.extent.is_valid() {
            continue;
        }
        let input_extent = input.extent();
        for &neighbor in &block.links {
            let cell_ids = input_interface_cell_ids(block, neighbor, &input_extent);
            let point_ids = input_interface_point_ids(block, neighbor, &input_extent);
            let cell_fields = &input.cell_data().fields;
            let point_fields = &input.point_data().fields;

            let buffer = &mut outgoing[assigner.rank_of(neighbor)];
            put_pod(
                buffer,
                &WirePayloadHdr::new(
                    block.gid.get(),
                    neighbor.get(),
                    cell_ids.len(),
                    point_ids.len(),
                    cell_fields.len(),
                    point_fields.len(),
                ),
            );
            for field in cell_fields {
                put_name(buffer, &field.name);
                put_array(buffer, &gather(&field.values, &cell_ids));
            }
            for field in point_fields {
                put_name(buffer, &field.name);
                put_array(buffer, &gather(&field.values, &point_ids));
            }
            input.encode_point_payload(&point_ids, buffer);
        }
    }

    let incoming = all_to_all(comm, tags.payload_sizes, tags.payload_data, outgoing)?;

    for buffer in &incoming {
        let mut cur = WireCursor::new(buffer);
        while !cur.is_empty() {
            let hdr: WirePayloadHdr = cur.read()?;
            let src = BlockId(hdr.src());
            let dst = BlockId(hdr.dst());
            if (dst.get() as usize) >= assigner.total_blocks() || assigner.rank_of(dst) != me {
                return Err(GridHaloError::UnknownBlock(dst));
            }
            let local_index = assigner.local_index(dst);
            if local_index >= blocks.len() {
                return Err(GridHaloError::UnknownBlock(dst));
            }
            apply_payload(
                &blocks[local_index],
                src,
                &hdr,
                &mut cur,
                &mut outputs[local_index],
            )?;
        }
    }
    Ok(())
}

fn apply_payload<G: GridFamily>(
    block: &Block<G>,
    src: BlockId,
    hdr: &WirePayloadHdr,
    cur: &mut WireCursor<'_>,
    output: &mut G,
) -> Result<(), GridHaloError> {
    let output_extent = output.extent();
    let cell_ids = output_interface_cell_ids(block, src, &output_extent);
    let point_ids = output_interface_point_ids(block, src, &output_extent);

    // A sender clamped by its neighbor's depth can cover less than our
    // allocated halo; the uncovered layers keep their hidden marking.
    let counts_match =
        cell_ids.len() == hdr.cell_count() && point_ids.len() == hdr.point_count();
    if !counts_match {
        log::warn!(
            "block {}: payload from {src} covers {}/{} cells and {}/{} points; leaving the \
             remainder hidden",
            block.gid,
            hdr.cell_count(),
            cell_ids.len(),
            hdr.point_count(),
            point_ids.len(),
        );
    }

    for _ in 0..hdr.cell_fields() {
        let name = read_name(cur)?;
        let values: Vec<f64> = cur.read_array()?;
        if !counts_match {
            continue;
        }
        match output.cell_data_mut().field_mut(&name) {
            Some(field) => {
                for (&id, &value) in cell_ids.iter().zip(&values) {
                    field.values[id] = value;
                }
            }
            None => log::warn!(
                "block {}: no cell field named {name:?} to receive into",
                block.gid
            ),
        }
    }
    for _ in 0..hdr.point_fields() {
        let name = read_name(cur)?;
        let values: Vec<f64> = cur.read_array()?;
        if !counts_match {
            continue;
        }
        match output.point_data_mut().field_mut(&name) {
            Some(field) => {
                for (&id, &value) in point_ids.iter().zip(&values) {
                    field.values[id] = value;
                }
            }
            None => log::warn!(
                "block {}: no point field named {name:?} to receive into",
                block.gid
            ),
        }
    }

    if counts_match {
        if let Some(ghosts) = output.cell_data_mut().ghosts.as_mut() {
            for &id in &cell_ids {
                ghosts[id] = DUPLICATE_CELL;
            }
        }
        if let Some(ghosts) = output.point_data_mut().ghosts.as_mut() {
            for &id in &point_ids {
                ghosts[id] = DUPLICATE_POINT;
            }
        }
        G::apply_point_payload(output, &point_ids, cur)?;
    } else {
        G::skip_point_payload(cur)?;
    }
    Ok(())
}

/// Generic halo pipeline shared by the three entry points.
pub fn compute_ghosts<G: GridFamily, C: Communicator>(
    inputs: &[G],
    outputs: &mut [G],
    input_ghost_levels: i32,
    output_ghost_levels: i32,
    comm: &C,
) -> Result<LinkSummary, GridHaloError> {
    if inputs.len() != outputs.len() {
        return Err(GridHaloError::LengthMismatch {
            inputs: inputs.len(),
            outputs: outputs.len(),
        });
    }
    let tags = HaloCommTags::from_base(HALO_BASE_TAG);

    let counts = exchange_counts(comm, &tags, inputs.len() as u32)?;
    let assigner = BlockAssigner::from_counts(&counts);
    let mut blocks = setup_blocks(inputs, input_ghost_levels, &assigner, comm.rank());

    let registry = exchange_descriptors(comm, &tags, &blocks)?;
    populate_structures(&mut blocks, &registry);

    build_links_and_allocate(&mut blocks, inputs, outputs, output_ghost_levels);

    // Hidden marking runs before the receive pass so actually-filled regions
    // overwrite their markers.
    for (block, output) in blocks.iter().zip(outputs.iter_mut()) {
        if !block.info.extent.is_valid() {
            continue;
        }
        let out_extent = output.extent();
        let mut cells = output.cell_data_mut().ghosts.take().unwrap_or_default();
        let mut points = output.point_data_mut().ghosts.take().unwrap_or_default();
        cells.resize(out_extent.num_cells(), 0);
        points.resize(out_extent.num_points(), 0);
        fill_hidden_ghosts(&out_extent, &block.info.extent, &mut cells, &mut points);
        output.cell_data_mut().ghosts = Some(cells);
        output.point_data_mut().ghosts = Some(points);
    }

    exchange_payloads(comm, &tags, &assigner, &blocks, inputs, outputs)?;

    Ok(LinkSummary::collect(&blocks))
}

/// Generate ghost layers for uniform grids.
///
/// `inputs[i]` and `outputs[i]` correspond by local index;
/// `input_ghost_levels` is how many ghost layers the inputs already carry,
/// `output_ghost_levels` how many to generate.
pub fn compute_uniform_ghosts<C: Communicator>(
    inputs: &[UniformGrid],
    outputs: &mut [UniformGrid],
    input_ghost_levels: i32,
    output_ghost_levels: i32,
    comm: &C,
) -> Result<LinkSummary, GridHaloError> {
    compute_ghosts(inputs, outputs, input_ghost_levels, output_ghost_levels, comm)
}

/// Generate ghost layers for rectilinear grids.
pub fn compute_rectilinear_ghosts<S: Scalar, C: Communicator>(
    inputs: &[RectilinearGrid<S>],
    outputs: &mut [RectilinearGrid<S>],
    input_ghost_levels: i32,
    output_ghost_levels: i32,
    comm: &C,
) -> Result<LinkSummary, GridHaloError> {
    compute_ghosts(inputs, outputs, input_ghost_levels, output_ghost_levels, comm)
}

/// Generate ghost layers for curvilinear grids.
pub fn compute_curvilinear_ghosts<S: Scalar, C: Communicator>(
    inputs: &[CurvilinearGrid<S>],
    outputs: &mut [CurvilinearGrid<S>],
    input_ghost_levels: i32,
    output_ghost_levels: i32,
    comm: &C,
) -> Result<LinkSummary, GridHaloError> {
    compute_ghosts(inputs, outputs, input_ghost_levels, output_ghost_levels, comm)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assigner_maps_gids_to_ranks() {
        let assigner = BlockAssigner::from_counts(&[2, 0, 3]);
        assert_eq!(assigner.total_blocks(), 5);
        assert_eq!(assigner.gid(0, 1), BlockId(1));
        assert_eq!(assigner.gid(2, 0), BlockId(2));
        assert_eq!(assigner.rank_of(BlockId(0)), 0);
        assert_eq!(assigner.rank_of(BlockId(1)), 0);
        assert_eq!(assigner.rank_of(BlockId(2)), 2);
        assert_eq!(assigner.rank_of(BlockId(4)), 2);
        assert_eq!(assigner.local_index(BlockId(3)), 1);
    }

    #[test]
    fn length_mismatch_is_rejected_up_front() {
        use crate::algs::communicator::NoComm;
        let inputs = vec![UniformGrid::default()];
        let mut outputs: Vec<UniformGrid> = Vec::new();
        let err = compute_uniform_ghosts(&inputs, &mut outputs, 0, 1, &NoComm).unwrap_err();
        assert!(matches!(err, GridHaloError::LengthMismatch { .. }));
    }
}
