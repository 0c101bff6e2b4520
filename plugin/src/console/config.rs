use url::Url;

use crate::error::ConsoleError;

pub const DEFAULT_ENDPOINT: &str = "ws://localhost:3000/ws/connect";
pub const DEFAULT_ID_PARAM: &str = "id";

/// Configuration for the console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    /// WebSocket endpoint, without the client id.
    pub endpoint: String,
    /// Query parameter that carries the random client id.
    pub id_param: String,
    /// Open a connection as soon as the console starts.
    pub auto_connect: bool,
    /// `Origin` header sent with the handshake.
    pub origin: Option<String>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            id_param: DEFAULT_ID_PARAM.to_string(),
            auto_connect: true,
            origin: None,
        }
    }
}

impl ConsoleConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_id_param(mut self, id_param: impl Into<String>) -> Self {
        self.id_param = id_param.into();
        self
    }

    pub fn with_auto_connect(mut self, auto_connect: bool) -> Self {
        self.auto_connect = auto_connect;
        self
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    /// Parse the endpoint and check that the transport can reach it.
    pub fn validate(&self) -> Result<Url, ConsoleError> {
        let url = Url::parse(&self.endpoint).map_err(|source| ConsoleError::InvalidEndpoint {
            url: self.endpoint.clone(),
            source,
        })?;

        if url.scheme() != "ws" {
            return Err(ConsoleError::UnsupportedScheme(url.scheme().to_string()));
        }

        Ok(url)
    }

    /// The endpoint with `client_id` appended as a query parameter.
    pub fn client_url(&self, client_id: u32) -> Result<String, ConsoleError> {
        let mut url = self.validate()?;
        url.query_pairs_mut()
            .append_pair(&self.id_param, &client_id.to_string());
        Ok(url.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_endpoint() {
        let config = ConsoleConfig::default();
        assert_eq!(config.endpoint, "ws://localhost:3000/ws/connect");
        assert!(config.auto_connect);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_client_url_appends_id() {
        let config = ConsoleConfig::default();
        assert_eq!(
            config.client_url(42).unwrap(),
            "ws://localhost:3000/ws/connect?id=42"
        );
    }

    #[test]
    fn test_client_url_keeps_existing_query() {
        let config = ConsoleConfig::new()
            .with_endpoint("ws://127.0.0.1:9000/socket?room=lobby")
            .with_id_param("client");
        assert_eq!(
            config.client_url(7).unwrap(),
            "ws://127.0.0.1:9000/socket?room=lobby&client=7"
        );
    }

    #[test]
    fn test_invalid_endpoints_are_rejected() {
        let config = ConsoleConfig::new().with_endpoint("not a url");
        assert!(matches!(
            config.validate(),
            Err(ConsoleError::InvalidEndpoint { .. })
        ));

        let config = ConsoleConfig::new().with_endpoint("http://localhost:3000/ws/connect");
        assert!(matches!(
            config.client_url(1),
            Err(ConsoleError::UnsupportedScheme(scheme)) if scheme == "http"
        ));
    }
}
