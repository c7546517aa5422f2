pub mod api_key;
pub mod dtos;
pub mod handlers;
pub mod jwt;
pub mod middleware;

pub use middleware::AuthenticatedUser;
