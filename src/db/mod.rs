//! Persistence module split across logical submodules.

mod blobs;
mod connection;

pub use blobs::{
    BlobStore, MemoryBlobStore, SqliteBlobStore, AUTH_USER_KEY, CATALOG_KEY, THEME_KEY,
};
pub use connection::{ensure_schema, open_in_memory};
