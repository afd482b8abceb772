pub mod chat;
pub mod dataset;
pub mod identity;
mod wire_time;

pub use chat::{ChatMetadata, ChatStats, Message, Role};
pub use dataset::{
    Dataset, DatasetPage, DatasetStatus, Envelope, NewDataset, ScanResult, UploadedDocument,
};
pub use identity::{ChatId, DatasetId};
