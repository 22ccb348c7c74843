pub mod community;
pub mod email;
pub mod otp_codes;
pub mod user;

pub use community::{Community, NewCommunity};
pub use email::Email;
pub use otp_codes::OtpCode;
pub use user::{CourseProgress, FarmerStatus, NewUser, User, UserRole};
