pub mod classify_document;

pub use classify_document::{
    ClassifyDocumentError, ClassifyDocumentOptions, ClassifyDocumentUseCase,
};
