//! The boundary-tag arena: first-fit allocation, block splitting, and
//! immediate coalescing over one fixed byte buffer.
//!
//! Every block is bounded by two matching `i32` sentinels holding the
//! payload byte count, positive while free and negative while allocated.
//! Callers receive byte offsets into the arena, never references; the
//! live-offset set is the sole authority on which offsets may be freed.

use indexmap::IndexSet;
use smallvec::SmallVec;

use crate::block::{read_sentinel, write_sentinel, Blocks};
use crate::config::{ArenaConfig, SENTINEL_BYTES};
use crate::error::ArenaError;

/// A fixed-capacity allocator over a single owned byte buffer.
///
/// The arena is created once at a fixed capacity and never grows. All
/// operations are synchronous, run to completion on the caller's thread,
/// and cost O(1) or O(number of blocks). The buffer is mutated only
/// through [`Arena::allocate`] and [`Arena::deallocate`]; everything
/// else is read-only inspection.
///
/// Invariants, checked by [`Arena::audit`] after every mutation in debug
/// builds:
///
/// 1. Block spans sum to the capacity exactly — no gaps, no overlap.
/// 2. Head and tail sentinels match for every block.
/// 3. No two adjacent blocks are both free.
/// 4. The allocated blocks' payload offsets are exactly the live set.
#[derive(Debug)]
pub struct Arena {
    /// Backing storage. Allocated to full capacity at creation.
    bytes: Vec<u8>,
    /// Payload offsets of currently-live allocations, in allocation order.
    live: IndexSet<usize>,
    config: ArenaConfig,
}

impl Arena {
    /// Create an arena with a single free block spanning the whole buffer.
    ///
    /// Fails with [`ArenaError::OutOfMemory`] before any state is touched
    /// if `capacity` cannot hold one minimum-size block.
    pub fn new(config: ArenaConfig) -> Result<Self, ArenaError> {
        if config.capacity < config.min_block() {
            return Err(ArenaError::OutOfMemory {
                capacity: config.capacity,
                min_block: config.min_block(),
            });
        }

        let mut bytes = vec![0u8; config.capacity];
        let usable = config.usable() as i32;
        write_sentinel(&mut bytes, 0, usable);
        write_sentinel(&mut bytes, config.capacity - SENTINEL_BYTES, usable);

        let arena = Self {
            bytes,
            live: IndexSet::new(),
            config,
        };
        debug_assert!(arena.audit());
        Ok(arena)
    }

    /// Allocate payload space for `count` elements, first fit.
    ///
    /// Returns the payload byte offset of the served block, or `Ok(None)`
    /// when no free block is large enough — capacity exhaustion is an
    /// answer, not an error. A zero `count` fails with
    /// [`ArenaError::InvalidRequest`].
    ///
    /// When splitting the chosen block would leave a remainder smaller
    /// than the minimum block span, the whole block is served instead.
    pub fn allocate(&mut self, count: usize) -> Result<Option<usize>, ArenaError> {
        if count == 0 {
            return Err(ArenaError::InvalidRequest { count });
        }
        // A request that overflows the sentinel range can never fit.
        let requested = match count.checked_mul(self.config.elem_size) {
            Some(r) if r <= i32::MAX as usize => r,
            _ => return Ok(None),
        };

        let Some(head) = self.find_fit(requested) else {
            return Ok(None);
        };

        let free_size = read_sentinel(&self.bytes, head) as usize;
        if free_size - requested < self.config.min_block() {
            // Take the whole block: negate both sentinels, no resize.
            let tag = -(free_size as i32);
            write_sentinel(&mut self.bytes, head, tag);
            write_sentinel(&mut self.bytes, head + SENTINEL_BYTES + free_size, tag);
        } else {
            // Split: the front becomes the served block, the remainder a
            // new free block whose tail lands on the old tail slot.
            let tag = -(requested as i32);
            write_sentinel(&mut self.bytes, head, tag);
            write_sentinel(&mut self.bytes, head + SENTINEL_BYTES + requested, tag);

            let rest = (free_size - requested - 2 * SENTINEL_BYTES) as i32;
            write_sentinel(&mut self.bytes, head + requested + 2 * SENTINEL_BYTES, rest);
            write_sentinel(&mut self.bytes, head + SENTINEL_BYTES + free_size, rest);
        }

        let payload = head + SENTINEL_BYTES;
        self.live.insert(payload);
        debug_assert!(self.audit());
        Ok(Some(payload))
    }

    /// First-fit scan: head-sentinel offset of the first free block with
    /// at least `requested` payload bytes.
    fn find_fit(&self, requested: usize) -> Option<usize> {
        let last = self.config.capacity - SENTINEL_BYTES;
        let mut pos = 0;
        while pos < last {
            let tag = read_sentinel(&self.bytes, pos);
            if tag > 0 && tag as usize >= requested {
                return Some(pos);
            }
            pos += tag.unsigned_abs() as usize + 2 * SENTINEL_BYTES;
        }
        None
    }

    /// Free the allocation whose payload starts at `offset`, coalescing
    /// with free neighbours on both sides.
    ///
    /// Fails with [`ArenaError::InvalidArgument`] unless `offset` was
    /// returned by [`Arena::allocate`] and has not been freed since.
    pub fn deallocate(&mut self, offset: usize) -> Result<(), ArenaError> {
        if !self.live.swap_remove(&offset) {
            return Err(ArenaError::InvalidArgument { offset });
        }

        let mut front = offset - SENTINEL_BYTES;
        let mut size = read_sentinel(&self.bytes, front).unsigned_abs() as usize;
        let mut back = offset + size;

        // Merge leftward: the preceding block's tail sentinel sits just
        // before our head.
        if front != 0 {
            let left = read_sentinel(&self.bytes, front - SENTINEL_BYTES);
            if left > 0 {
                let merged = left as usize + 2 * SENTINEL_BYTES;
                front -= merged;
                size += merged;
            }
        }
        // Merge rightward: the following block's head sentinel sits just
        // after our tail.
        if back != self.config.capacity - SENTINEL_BYTES {
            let right = read_sentinel(&self.bytes, back + SENTINEL_BYTES);
            if right > 0 {
                let merged = right as usize + 2 * SENTINEL_BYTES;
                back += merged;
                size += merged;
            }
        }

        write_sentinel(&mut self.bytes, front, size as i32);
        write_sentinel(&mut self.bytes, back, size as i32);
        debug_assert!(self.audit());
        Ok(())
    }

    /// Read the raw `i32` at byte offset `index`.
    ///
    /// Diagnostic accessor for sentinel inspection; not part of the
    /// allocation protocol.
    ///
    /// # Panics
    ///
    /// Panics if `index + SENTINEL_BYTES` exceeds the capacity.
    pub fn peek(&self, index: usize) -> i32 {
        read_sentinel(&self.bytes, index)
    }

    /// Whether `offset` is the payload start of a live allocation.
    pub fn is_live(&self, offset: usize) -> bool {
        self.live.contains(&offset)
    }

    /// Iterate over the arena's blocks, left to right.
    pub fn blocks(&self) -> Blocks<'_> {
        Blocks::new(&self.bytes)
    }

    /// The head-sentinel walk: one signed tag per block, in arena order.
    pub fn sentinels(&self) -> SmallVec<[i32; 8]> {
        self.blocks().map(|b| b.tag()).collect()
    }

    /// Verify sentinel consistency across the whole arena.
    ///
    /// Read-only. A `false` result means the allocator's own bookkeeping
    /// is corrupt — an internal bug, not caller misuse — and every
    /// mutating operation asserts on it in debug builds.
    pub fn audit(&self) -> bool {
        let capacity = self.config.capacity;
        let mut pos = 0;
        let mut live_seen = 0;
        let mut prev_free = false;

        while pos < capacity {
            if pos + SENTINEL_BYTES > capacity {
                return false;
            }
            let head = read_sentinel(&self.bytes, pos);
            if head == 0 {
                return false;
            }
            let payload = head.unsigned_abs() as usize;
            let span = payload + 2 * SENTINEL_BYTES;
            if pos + span > capacity {
                return false;
            }
            let tail = read_sentinel(&self.bytes, pos + SENTINEL_BYTES + payload);
            if tail != head {
                return false;
            }

            let free = head > 0;
            if free && prev_free {
                return false;
            }
            if !free {
                if !self.live.contains(&(pos + SENTINEL_BYTES)) {
                    return false;
                }
                live_seen += 1;
            }

            prev_free = free;
            pos += span;
        }

        pos == capacity && live_seen == self.live.len()
    }

    /// Total arena capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.config.capacity
    }

    /// The configuration this arena was built from.
    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    /// Number of currently-live allocations.
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Number of blocks in the arena.
    pub fn block_count(&self) -> usize {
        self.blocks().count()
    }

    /// Sum of free payload bytes across all free blocks.
    pub fn free_bytes(&self) -> usize {
        self.blocks()
            .filter(|b| b.is_free())
            .map(|b| b.payload())
            .sum()
    }

    /// Payload size of the largest free block, or zero if none is free.
    pub fn largest_free(&self) -> usize {
        self.blocks()
            .filter(|b| b.is_free())
            .map(|b| b.payload())
            .max()
            .unwrap_or(0)
    }

    pub(crate) fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub(crate) fn bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }
}
