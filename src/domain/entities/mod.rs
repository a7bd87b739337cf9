pub mod document;
pub mod page;
pub mod section;

pub use document::Document;
pub use page::Page;
pub use section::Section;
