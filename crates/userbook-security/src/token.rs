//! Random token generation.

use rand::{distributions::Alphanumeric, Rng};

/// Length of a freshly issued remember token.
pub const REMEMBER_TOKEN_LENGTH: usize = 10;

/// Generates a random alphanumeric string of `len` characters.
#[must_use]
pub fn random_alphanumeric(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Generates a remember token for a newly created user.
#[must_use]
pub fn remember_token() -> String {
    random_alphanumeric(REMEMBER_TOKEN_LENGTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remember_token_shape() {
        let token = remember_token();
        assert_eq!(token.len(), REMEMBER_TOKEN_LENGTH);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_tokens_differ() {
        assert_ne!(random_alphanumeric(32), random_alphanumeric(32));
    }
}
