pub mod document_status;

pub use document_status::DocumentStatus;
