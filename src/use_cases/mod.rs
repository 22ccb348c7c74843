pub mod community;
pub mod generate_otp;
pub mod user;
pub mod verify_otp;

pub use community::CommunityUseCase;
pub use generate_otp::GenerateOtpUseCase;
pub use user::{UserInteractor, UserUseCase};
pub use verify_otp::VerifyOtpUseCase;

/// How codes are issued and how many wrong guesses a code survives.
#[derive(Debug, Clone, Copy)]
pub struct OtpPolicy {
    pub ttl: chrono::Duration,
    pub max_attempts: i32,
    pub code_length: u32,
}

impl Default for OtpPolicy {
    fn default() -> Self {
        Self {
            ttl: chrono::Duration::minutes(5),
            max_attempts: 5,
            code_length: 6,
        }
    }
}
