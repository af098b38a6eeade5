//! Local vector infrastructure: chunking and the flat index

pub mod chunker;
pub mod flat_index;

pub use chunker::Chunker;
pub use flat_index::{l2_distance, FlatIndex};
