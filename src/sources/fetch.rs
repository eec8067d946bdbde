use crate::error::AuthError;

/// Anything able to hand out a currently valid bearer token.
///
/// The lead forwarder depends on this seam only; it never sees how the
/// token was obtained or cached.
pub trait AccessTokenSource: Send + Sync {
    fn acquire_token(
        &self,
    ) -> impl std::future::Future<Output = Result<String, AuthError>> + Send;
}
