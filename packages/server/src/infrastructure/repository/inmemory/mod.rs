//! InMemory Repository 実装

mod presence;
mod user;

pub use presence::InMemoryPresenceRepository;
pub use user::InMemoryUserRepository;
