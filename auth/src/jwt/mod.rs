pub mod claims;
pub mod errors;
pub mod handler;

pub use claims::Claims;
pub use errors::JwtError;
pub use errors::TokenRejected;
pub use handler::IssuedToken;
pub use handler::JwtHandler;
