use std::net::IpAddr;

use crate::types::internal::auth::Identity;

use super::{request_id::RequestId, request_source::RequestSource};

/// Request context that flows through all layers
///
/// Carries the caller's identity explicitly. There is no ambient "current user":
/// the gate and every protected operation receive this value as an argument.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestContext {
    /// IP address of the client making the request
    pub ip_address: Option<IpAddr>,

    /// Unique identifier for this request (for tracing across layers)
    pub request_id: RequestId,

    /// Source of the request (API or CLI)
    pub source: RequestSource,

    /// Target the caller originally asked for, used to resume after login
    pub requested_target: Option<String>,

    /// Authenticated identity, `None` for anonymous callers
    pub identity: Option<Identity>,
}

impl RequestContext {
    /// Create an anonymous RequestContext for an API request
    pub fn anonymous() -> Self {
        Self {
            ip_address: None,
            request_id: RequestId::generate(),
            source: RequestSource::API,
            requested_target: None,
            identity: None,
        }
    }

    /// Create a RequestContext for CLI operations
    pub fn for_cli(command_name: &str) -> Self {
        tracing::debug!("CLI context created for command {}", command_name);
        Self {
            ip_address: None,
            request_id: RequestId::generate(),
            source: RequestSource::CLI,
            requested_target: None,
            identity: None,
        }
    }

    /// Set the ip_address
    pub fn with_ip_address(mut self, ip_address: IpAddr) -> Self {
        self.ip_address = Some(ip_address);
        self
    }

    /// Attach an authenticated identity
    pub fn with_identity(mut self, identity: Identity) -> Self {
        self.identity = Some(identity);
        self
    }

    /// Remember the originally requested target
    pub fn with_requested_target(mut self, target: impl Into<String>) -> Self {
        self.requested_target = Some(target.into());
        self
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    /// User id of the caller, if authenticated
    pub fn user_id(&self) -> Option<&str> {
        self.identity.as_ref().map(|identity| identity.user_id.as_str())
    }

    /// Where the request came from, for log lines
    pub fn origin(&self) -> String {
        match (&self.source, self.ip_address) {
            (RequestSource::CLI, _) => "cli".to_string(),
            (RequestSource::API, Some(ip)) => ip.to_string(),
            (RequestSource::API, None) => "unknown".to_string(),
        }
    }

    /// Span tagging everything logged while serving this request
    pub fn span(&self) -> tracing::Span {
        tracing::info_span!("request", request_id = %self.request_id, origin = %self.origin())
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::anonymous()
    }
}
