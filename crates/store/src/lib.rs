//! Fragment storage for Polymath — persistent, per-plugin JSON files.
//!
//! One file per fragment at `{root}/{plugin}/{fragment_id}.json`, with an
//! in-memory index mirroring what is on disk for fast enumeration. The
//! on-disk layout *is* the persisted state — there is no journal; a crash
//! mid-write can leave a truncated file, which reads back as "not found".
//!
//! Storage is advisory: every internal fault is caught, logged, and
//! surfaced as `false`/`None`/empty rather than raised.

pub mod fragment_store;

pub use fragment_store::FragmentStore;
