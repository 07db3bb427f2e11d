pub mod handle;
pub mod model;
pub mod repository;
pub mod repository_pg;
pub mod route;
pub mod schema;
pub mod service;

pub use repository::UploadRepository;
pub use repository_pg::UploadPgRepository;
pub use service::UploadService;
