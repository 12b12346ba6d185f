//! Bearer-token injection backed by [`CredentialProvider`].

use crate::error::BoxError;
use crate::http::HeaderInjector;
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use sync_rest_auth::CredentialProvider;

#[async_trait]
impl HeaderInjector for CredentialProvider {
    async fn inject(&self, headers: &mut HeaderMap) -> Result<(), BoxError> {
        let client = self.get_authenticated_client().await?;
        let mut value = HeaderValue::from_str(&client.authorization())?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
        Ok(())
    }
}
