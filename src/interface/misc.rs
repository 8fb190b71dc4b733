// Misc wrappers for the interface
// Shared pointers, locks, maps, atomics.

pub use dashmap::DashMap as RustHashMap;
pub use parking_lot::{Mutex as RustMutex, RwLock as RustLock};
pub use std::sync::atomic::{
    AtomicBool as RustAtomicBool, AtomicUsize as RustAtomicUsize,
    Ordering as RustAtomicOrdering,
};
pub use std::sync::Arc as RustRfc;
