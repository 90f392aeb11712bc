pub mod audit;
pub mod codec;
pub mod comments;
pub mod refresh_tokens;
pub mod submissions;
pub mod tenants;
pub mod users;
