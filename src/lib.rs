//! Converts an undirected edge list into fixed-width binary adjacency
//! records, one per node, without ever holding a per-node list.
//!
//! The pipeline is [`degree`] (pass one), [`csr`] (pass two plus per-node
//! sort), optionally [`relabel`], then [`encoder`]. [`convert::Converter`]
//! runs all of it.

pub mod convert;
pub mod csr;
pub mod decoder;
pub mod degree;
pub mod encoder;
pub mod error;
pub mod io;
pub mod progress;
pub mod relabel;

mod edge;

pub use convert::{Converter, Summary};
pub use edge::Edge;
pub use error::{Error, Result};

/// Node id and degree fields of every record.
pub const RECORD_HEADER_BYTES: usize = 2 * std::mem::size_of::<u32>();

/// Largest feature id the all-pairs reader is compiled for by default.
pub const DEFAULT_FEATURE_ID_CEILING: u32 = 600_000;

pub const KIBIBYTE: usize = 1024;

pub const MEBIBYTE: usize = 1024 * KIBIBYTE;
