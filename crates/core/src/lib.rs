//! Domain primitives shared by the teleport client and the image proxy.
//!
//! Nothing in here touches the network: wire timestamp formatting and
//! the local time-of-day resolution used by the proxy are pure functions.

pub mod error;
pub mod time;
pub mod types;
