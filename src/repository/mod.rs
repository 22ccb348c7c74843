pub mod community_repository;
pub mod memory;
pub mod otp_repository;
pub mod user_repository;

pub use community_repository::{CommunityRepository, PgCommunityRepository};
pub use memory::{InMemoryCommunityRepository, InMemoryOtpStore, InMemoryUserRepository};
pub use otp_repository::{OtpStore, PgOtpStore};
pub use user_repository::{DuplicateEmail, PgUserRepository, UserRepository};
