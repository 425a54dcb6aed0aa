//! Background Tasks Module
//!
//! Contains background tasks that run alongside a cache backend.
//!
//! # Tasks
//! - TTL Sweep: Removes expired local cache entries at a fixed interval

mod sweep;

pub(crate) use sweep::spawn_sweep_task;
pub use sweep::SweepHandle;
