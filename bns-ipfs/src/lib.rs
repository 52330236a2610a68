//! IPFS client for publishing and retrieving deployment artifacts.
//!
//! Adds and unpins go through an IPFS node's RPC API; reads go through a
//! configured HTTP gateway.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod ipfs;

pub use ipfs::{strip_ipfs_scheme, AddedContent, IpfsClient, IpfsConfig};
