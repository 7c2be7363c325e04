//! Parallel execution building blocks
//!
//! This module knows about **system resources** and **work distribution**, not
//! about archives or verification.
//!
//! ## What This Module Does:
//! - **Resource Discovery**: Detects available CPU cores using `num_cpus::get()`
//! - **Resource Calculation**: Applies user configuration (thread percentage, max threads)
//! - **Work Distribution**: Splits a round into contiguous, fair chunks
//! - **Cancellation**: Provides the monotonic flag every worker polls
//!
//! ## What This Module Does NOT Do:
//! - **Domain Logic**: Does not know what a candidate is or how it is verified
//! - **Thread Management**: Spawning and joining workers belongs to the
//!   search coordinator, which owns one scoped pool per round
//!
//! ```text
//! ┌─────────────────┐    ┌──────────────────┐    ┌─────────────────┐
//! │   Driver        │    │   Parallel       │    │   System        │
//! │   (search)      │───▶│   Module         │───▶│   Resources     │
//! │                 │    │                  │    │                 │
//! │ • Rounds        │    │ • CPU cores      │    │ • Hardware      │
//! │ • Verification  │    │ • Chunk plans    │    │ • OS threads    │
//! │ • Statistics    │    │ • Cancellation   │    │                 │
//! └─────────────────┘    └──────────────────┘    └─────────────────┘
//! ```
//!
//! # Example Usage
//!
//! ```rust
//! use zipsweep::parallel::{partition, CancelToken, PoolConfig};
//!
//! let workers = PoolConfig::default().worker_count();
//! let chunks = partition(36u64.pow(5), workers);
//! assert_eq!(chunks.iter().map(|c| c.len()).sum::<u64>(), 36u64.pow(5));
//!
//! let cancel = CancelToken::new();
//! cancel.cancel();
//! assert!(cancel.is_cancelled());
//! ```

pub mod cancel;
pub mod partition;
pub mod pool;

// Re-export main types for easier access
pub use cancel::CancelToken;
pub use partition::{Chunk, partition};
pub use pool::PoolConfig;
