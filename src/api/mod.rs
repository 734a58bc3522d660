pub mod middleware;
pub mod render;
pub mod routes;

// Re-export public types and functions
pub use middleware::log_request_errors;
pub use routes::{generate_link, ping, redeem_link};
