use std::fmt;

use validator::ValidateEmail;

/// A normalised (trimmed, lowercased) and syntactically valid email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Email(String);

impl Email {
    pub fn parse(raw: &str) -> eyre::Result<Self> {
        let email = raw.trim().to_lowercase();
        if email.is_empty() {
            return Err(eyre::eyre!("Email address is required"));
        }
        if !email.validate_email() {
            return Err(eyre::eyre!("Invalid email address: {email}"));
        }
        Ok(Self(email))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
