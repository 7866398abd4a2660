//! Per-host crawl state
//!
//! The scheduler keeps one [`HostState`] per host to enforce the minimum
//! delay between requests and to back off hosts that answered HTTP 429.

mod host_state;

pub use host_state::{HostState, RATE_LIMIT_COOLDOWN};
