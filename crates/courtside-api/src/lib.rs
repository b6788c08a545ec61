pub mod endpoints;
pub mod error;
pub mod gateway;
pub mod session;

pub use endpoints::{
    ApiClient, ApiResult, AuthApi, Backend, CatalogApi, GameApi, ReviewApi, SocialApi,
};
pub use error::ApiError;
pub use gateway::{Gateway, Upload};
pub use session::Session;
