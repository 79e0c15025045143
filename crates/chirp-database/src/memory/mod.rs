//! Process-local store implementing every store trait.
//!
//! All state sits behind one Tokio mutex, so each trait call (including both
//! toggles) runs as a single critical section.

mod store;

pub use store::MemoryStore;
