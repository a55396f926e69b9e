//! Layered account state: an in-memory snapshot of the base trie plus a
//! chain of copy-on-write overlays, one per call frame.

mod overlay;
mod snapshot;

pub use self::overlay::Overlay;
pub use self::snapshot::Snapshot;
