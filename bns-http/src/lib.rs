//! HTTP and JSON-RPC client for the BNS deploy toolkit.
//!
//! Every operation returns a [`bns_core::Status`]; transport and non-2xx
//! failures are logged and collapse to `SYSTEM_BUSY`.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod http;

pub use http::{json_rpc_envelope, HttpClient, HttpConfig};
