//! Saferouting CLI library.
//!
//! Route rendering shared by the `saferouting-cli` binary and its tests.

pub mod output;
