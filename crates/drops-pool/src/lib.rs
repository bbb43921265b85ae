//! # drops-pool: square-root weighted dividend pool.
//!
//! All calculations use integer arithmetic only for determinism.
//!
//! The pool backs a transferable token ("drops") with pooled cash:
//! - **Weighting**: an account's claim weight is the integer square root of
//!   its holding, so doubling a holding less than doubles its weight.
//! - **Membership**: only enrolled accounts count toward total weighted shares.
//! - **Token ledger**: mint and transfer report old/new weighted shares for
//!   every balance they touch.
//! - **Dividend engine**: live pro-rata claims on distributable cash, with a
//!   per-account debt basis that is settled and rebased on every share change.

pub mod cash;
pub mod config;
pub mod engine;
pub mod ledger;
pub mod math;
pub mod pool;
pub mod registry;
pub mod shared;
pub mod snapshot;
pub mod weighting;

pub use cash::MemoryCash;
pub use config::PoolConfig;
pub use engine::DividendEngine;
pub use pool::DropsPool;
pub use shared::SharedPool;
pub use snapshot::{AccountSnapshot, PoolSnapshot};
pub use weighting::{LinearWeighting, SqrtWeighting};
