//! User identity bootstrap.
//!
//! The id is display-only. Providers cannot fail, so identity never gates the
//! journey store or the explainer.

use async_trait::async_trait;

use crate::config::IdentityConfig;

const PLACEHOLDER_PREFIX: &str = "mock-user-id-";
const PLACEHOLDER_SUFFIX_LEN: usize = 7;
const BASE36_DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn resolve(&self) -> String;

    fn name(&self) -> &str;
}

/// Fixed id supplied through `[identity] user_id`.
#[derive(Debug, Clone)]
pub struct ConfiguredIdentity {
    user_id: String,
}

impl ConfiguredIdentity {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }
}

#[async_trait]
impl IdentityProvider for ConfiguredIdentity {
    async fn resolve(&self) -> String {
        self.user_id.clone()
    }

    fn name(&self) -> &str {
        "configured"
    }
}

/// Locally generated `mock-user-id-xxxxxxx` when no identity is configured.
#[derive(Debug, Clone, Default)]
pub struct PlaceholderIdentity;

#[async_trait]
impl IdentityProvider for PlaceholderIdentity {
    async fn resolve(&self) -> String {
        let suffix = base36_suffix(uuid::Uuid::new_v4().as_u128(), PLACEHOLDER_SUFFIX_LEN);
        format!("{}{}", PLACEHOLDER_PREFIX, suffix)
    }

    fn name(&self) -> &str {
        "placeholder"
    }
}

/// Low-order base36 digits of `n`, least significant first.
fn base36_suffix(mut n: u128, len: usize) -> String {
    (0..len)
        .map(|_| {
            let digit = BASE36_DIGITS[(n % 36) as usize] as char;
            n /= 36;
            digit
        })
        .collect()
}

pub fn bootstrap_identity(config: &IdentityConfig) -> Box<dyn IdentityProvider> {
    match config.user_id.as_deref().map(str::trim) {
        Some(id) if !id.is_empty() => Box::new(ConfiguredIdentity::new(id)),
        _ => {
            tracing::warn!("No identity configured. Running with a placeholder user id.");
            Box::new(PlaceholderIdentity)
        }
    }
}
