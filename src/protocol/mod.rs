//! Wire formats
//!
//! JSON is the only encoding: node lists for `get-nodes`, identifiers passed
//! in from a host, and operations for an external transport.

pub mod serialize;

pub use serialize::{
    decode_identifier, decode_operation, decode_parent, encode_nodes, encode_operation,
    OperationMessage,
};
