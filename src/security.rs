use crate::errors::ApiError;
use rand::RngCore;

/// Number of random bytes behind every generated key.
const KEY_BYTES: usize = 16;
const GROUP_LEN: usize = 8;

#[derive(Clone, Debug)]
pub struct ApiKeyGenerator {
    prefix: String,
}

impl ApiKeyGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    // Format: prefix-XXXXXXXX-XXXXXXXX-XXXXXXXX-XXXXXXXX (uppercase hex)
    pub fn generate(&self) -> String {
        let mut random_bytes = [0u8; KEY_BYTES];
        rand::thread_rng().fill_bytes(&mut random_bytes);
        let hex = hex::encode_upper(random_bytes);

        let groups: Vec<&str> = (0..hex.len())
            .step_by(GROUP_LEN)
            .map(|start| &hex[start..start + GROUP_LEN])
            .collect();
        format!("{}-{}", self.prefix, groups.join("-"))
    }
}

/// Salted adaptive hashing for admin passwords.
#[derive(Clone, Debug)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn hash(&self, password: &str) -> Result<String, ApiError> {
        Ok(bcrypt::hash(password, self.cost)?)
    }

    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, ApiError> {
        Ok(bcrypt::verify(password, hash)?)
    }
}
