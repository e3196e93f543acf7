use async_trait::async_trait;

/// Shown for authors who never set a display name.
pub const ANONYMOUS: &str = "Anonymous";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Stable user id from the identity provider.
    pub uid: String,
    pub display_name: Option<String>,
}

/// Maps bearer tokens to users. Any error means "not authenticated";
/// callers do not distinguish causes.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> anyhow::Result<Identity>;

    async fn display_name(&self, uid: &str) -> anyhow::Result<Option<String>>;
}
