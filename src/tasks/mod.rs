//! Background Tasks Module
//!
//! # Tasks
//! - TTL Reaper: removes expired cache entries at a fixed interval

mod reaper;

pub use reaper::{Reaper, REAPER_THREAD_NAME};
