use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordVerifier, Version,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};
use thiserror::Error;

pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_PASSWORD_LEN: usize = 512;

const MEMORY_KIB: u32 = 65536;
const ITERATIONS: u32 = 2;
const LANES: u32 = 1;

#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("password must be between {MIN_PASSWORD_LEN} and {MAX_PASSWORD_LEN} characters")]
    LengthOutOfBounds,

    #[error("invalid argon2 parameters: {0}")]
    InvalidParams(String),

    #[error("failed to hash password: {0}")]
    HashingFailed(String),

    #[error("failed to parse password hash: {0}")]
    InvalidHash(String),
}

pub type Result<T> = std::result::Result<T, PasswordError>;

/// Argon2id hashing with a fixed cost policy.
#[derive(Clone)]
pub struct Passwords {
    a2: Argon2<'static>,
}

impl Passwords {
    pub fn new(mem_kib: u32, iters: u32, lanes: u32) -> Result<Self> {
        let params = Params::new(mem_kib, iters, lanes, None)
            .map_err(|e| PasswordError::InvalidParams(e.to_string()))?;
        Ok(Self {
            a2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// The production policy (64 MiB, 2 passes, 1 lane).
    pub fn standard() -> Result<Self> {
        Self::new(MEMORY_KIB, ITERATIONS, LANES)
    }

    pub fn hash(&self, password: &str) -> Result<String> {
        guard_length(password)?;
        let salt = SaltString::generate(&mut OsRng);
        let phc = self
            .a2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))?;
        Ok(phc.to_string())
    }

    /// Returns `(matches, needs_rehash)`; a rehash is due when the stored hash
    /// was produced with a different algorithm or cost.
    pub fn verify(&self, password: &str, pw_hash: &str) -> Result<(bool, bool)> {
        let parsed =
            PasswordHash::new(pw_hash).map_err(|e| PasswordError::InvalidHash(e.to_string()))?;
        let ok = self
            .a2
            .verify_password(password.as_bytes(), &parsed)
            .is_ok();
        let needs_rehash = ok
            && !(parsed.algorithm == Algorithm::Argon2id.ident()
                && parsed.version == Some(Version::V0x13.into())
                && parsed.params.get_decimal("m") == Some(self.a2.params().m_cost())
                && parsed.params.get_decimal("t") == Some(self.a2.params().t_cost())
                && parsed.params.get_decimal("p") == Some(self.a2.params().p_cost()));
        Ok((ok, needs_rehash))
    }
}

fn guard_length(password: &str) -> Result<()> {
    let len = password.chars().count();
    if !(MIN_PASSWORD_LEN..=MAX_PASSWORD_LEN).contains(&len) {
        return Err(PasswordError::LengthOutOfBounds);
    }
    Ok(())
}
