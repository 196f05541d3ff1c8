mod client;
mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use client::PageClient;
pub use types::{
    CompareRequest, FileKind, FileStatus, TaskKind, UploadFile, UploadStatus, UploadSummary,
};
