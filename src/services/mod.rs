pub mod markup_service;
pub mod metadata_codec;
pub mod name_service;
pub mod page_index;
pub mod page_store;
pub mod path_service;
pub mod wiki_service;

pub use markup_service::MarkupService;
pub use name_service::{sanitize_page_name, PageName};
pub use page_index::PageIndex;
pub use page_store::PageStore;
pub use path_service::PathMapper;
pub use wiki_service::WikiService;
