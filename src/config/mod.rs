pub mod config;
pub mod crypto;
pub mod routes;

pub use self::config::Config;
pub use self::crypto::CryptoService;
pub use self::routes::routes;
