//! Fixed-capacity boundary-tag arena allocation.
//!
//! One contiguous byte buffer, fixed at construction, carved into
//! variable-size blocks bounded by signed `i32` sentinels at both ends.
//! The sentinel's sign encodes block state (positive = free, negative =
//! allocated), its magnitude the payload byte count. Allocation is
//! first-fit with splitting; deallocation coalesces with free
//! neighbours immediately. After construction the allocator never
//! touches the system heap.
//!
//! # Architecture
//!
//! ```text
//! TypedArena<T> (placement facade: construct / destroy / read)
//! └── Arena (first-fit allocate, coalescing deallocate, audit)
//!     ├── Vec<u8> byte buffer (sentinels in-band)
//!     └── IndexSet<usize> live payload offsets
//! ```
//!
//! Callers hold byte offsets into the arena, never pointers or
//! references. The live-offset set makes foreign and double frees
//! detectable instead of undefined.
//!
//! # Safety
//!
//! The allocator core is offset arithmetic over a `Vec<u8>` and contains
//! no `unsafe`. The only unsafe code in the crate is the unaligned
//! placement in [`typed`], kept behind a module-scoped allowance.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod arena;
pub mod block;
pub mod config;
pub mod error;
#[allow(unsafe_code)]
pub mod typed;

// Public re-exports for the primary API surface.
pub use arena::Arena;
pub use block::{Block, BlockState, Blocks};
pub use config::{ArenaConfig, SENTINEL_BYTES};
pub use error::ArenaError;
pub use typed::TypedArena;
