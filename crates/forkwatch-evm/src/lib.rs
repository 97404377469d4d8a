//! forkwatch-evm — EVM JSON-RPC header source for the ForkWatch monitor.

pub mod client;

pub use client::{header_from_json, parse_hex_u64, EvmEndpoint};
