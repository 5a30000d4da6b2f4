//! Shared utilities (hex formatting and dumps).

pub mod hex;
