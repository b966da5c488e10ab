//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async associated
//! functions. Single-statement functions accept any `PgExecutor` (the pool
//! or a transaction); multi-statement ones take `&mut PgConnection`.

pub mod artist_repo;
pub mod catalog_repo;
pub mod gallery_print_repo;
pub mod gallery_repo;
pub mod image_repo;
pub mod print_repo;
pub mod translation_repo;

pub use artist_repo::ArtistRepo;
pub use catalog_repo::CatalogRepo;
pub use gallery_print_repo::GalleryPrintRepo;
pub use gallery_repo::GalleryRepo;
pub use image_repo::ImageRepo;
pub use print_repo::PrintRepo;
pub use translation_repo::TranslationRepo;
