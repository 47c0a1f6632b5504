pub mod error;
pub mod route;

pub use error::ApiError;
pub use route::create_router;
