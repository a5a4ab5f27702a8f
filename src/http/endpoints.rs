use url::Url;

use crate::config::ClientConfig;

use super::error::HttpError;

/// REST resources exposed by the peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource<'a> {
    /// `/chain/blocks/{n}`
    Block(u64),
    /// `/chain/`
    Chain,
    /// `/devops/deploy`
    Deploy,
    /// `/devops/invoke`
    Invoke,
    /// `/devops/query`
    Query,
    /// `/network/peers/`
    Peers,
    /// `/transactions/{uuid}`
    Transaction(&'a str),
    /// `/registrar`
    Registrar,
    /// `/registrar/{enrollment_id}`
    RegistrarUser(&'a str),
    /// `/registrar/{enrollment_id}/ecert`
    EnrollmentCertificate(&'a str),
}

impl Resource<'_> {
    fn segments(&self) -> Vec<String> {
        let segments: Vec<&str> = match self {
            Resource::Block(_) => vec!["chain", "blocks"],
            Resource::Chain => vec!["chain", ""],
            Resource::Deploy => vec!["devops", "deploy"],
            Resource::Invoke => vec!["devops", "invoke"],
            Resource::Query => vec!["devops", "query"],
            Resource::Peers => vec!["network", "peers", ""],
            Resource::Transaction(uuid) => vec!["transactions", *uuid],
            Resource::Registrar => vec!["registrar"],
            Resource::RegistrarUser(id) => vec!["registrar", *id],
            Resource::EnrollmentCertificate(id) => vec!["registrar", *id, "ecert"],
        };

        let mut segments: Vec<String> = segments.into_iter().map(str::to_string).collect();
        if let Resource::Block(number) = self {
            segments.push(number.to_string());
        }
        segments
    }

    /// Absolute URL of this resource on the configured peer.
    ///
    /// The scheme is `https` when TLS is enabled and `http` otherwise.
    /// Caller-supplied segments (uuids, enrollment ids) are percent-encoded.
    pub fn url(&self, config: &ClientConfig) -> Result<Url, HttpError> {
        let scheme = if config.tls { "https" } else { "http" };
        let mut url = Url::parse(&format!("{}://{}/", scheme, config.server()))?;

        url.path_segments_mut()
            .map_err(|_| HttpError::UrlError(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(self.segments());

        Ok(url)
    }
}
