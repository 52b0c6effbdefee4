use std::sync::Arc;

use tracing::{debug, info};

use crate::client::{AppInfo, ClientError, NetworkClient};

/// Explicitly passed handle over a network client.
///
/// The session is the one cross-cutting shared resource: created by the
/// caller, reused across operations, no teardown. All connect-or-reuse
/// logic lives behind [`Session::ensure_connected`]; nothing else in the
/// crate touches the auth flow.
#[derive(Debug, Clone)]
pub struct Session {
    client: Arc<dyn NetworkClient>,
    app: AppInfo,
}

impl Session {
    pub fn new(client: Arc<dyn NetworkClient>, app: AppInfo) -> Self {
        Self { client, app }
    }

    pub fn client(&self) -> &dyn NetworkClient {
        self.client.as_ref()
    }

    /// Connect and authorise lazily; reuse the live connection when the
    /// client still reports itself connected.
    pub async fn ensure_connected(&self) -> Result<(), ClientError> {
        if self.client.is_connected() {
            return Ok(());
        }

        debug!(app_id = %self.app.id, "connecting to the network");
        self.client.initialise(&self.app).await?;
        let req_uri = self.client.gen_auth_uri().await?;
        let auth_uri = self.client.authorise(&req_uri).await?;
        self.client.login_from_uri(&auth_uri).await?;
        info!(app_id = %self.app.id, "authorised with the network");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MemoryClient;

    #[tokio::test]
    async fn test_ensure_connected_runs_auth_flow_once() {
        let client = MemoryClient::new();
        assert!(!client.is_connected());

        let session = Session::new(Arc::new(client.clone()), AppInfo::default());
        session.ensure_connected().await.unwrap();
        assert!(client.is_connected());

        // Second call reuses the live connection
        session.ensure_connected().await.unwrap();
        assert!(client.is_connected());
    }

    #[tokio::test]
    async fn test_ensure_connected_surfaces_denied_auth() {
        let client = MemoryClient::new();
        client.deny_auth(true);

        let session = Session::new(Arc::new(client), AppInfo::default());
        let err = session.ensure_connected().await.unwrap_err();
        assert!(matches!(err, ClientError::AuthDenied(_)));
    }
}
