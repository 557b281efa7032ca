//! Product selection for side-by-side comparison

mod set;
pub mod store;

pub use set::SelectionSet;
pub use store::{BlobStore, FileBlobStore, MemoryBlobStore, SELECTION_KEY};
