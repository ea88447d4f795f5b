pub mod documentation;
pub mod navigation;
pub mod repository;

pub use documentation::DocumentationDto;
pub use navigation::{DocumentationNavLink, concatenate_path};
pub use repository::{Embedded, Repository};
