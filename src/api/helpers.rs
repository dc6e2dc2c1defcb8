use std::net::IpAddr;

use poem::Request;

use crate::providers::SessionProvider;
use crate::types::internal::context::RequestContext;

/// Client address, preferring proxy headers over the socket peer
pub fn extract_ip_address(req: &Request) -> Option<IpAddr> {
    // Check X-Forwarded-For header (proxy/load balancer)
    if let Some(forwarded) = req.header("X-Forwarded-For") {
        if let Some(ip) = forwarded.split(',').next() {
            if let Ok(ip) = ip.trim().parse() {
                return Some(ip);
            }
        }
    }

    // Check X-Real-IP header (nginx)
    if let Some(real_ip) = req.header("X-Real-IP") {
        if let Ok(ip) = real_ip.trim().parse() {
            return Some(ip);
        }
    }

    // Fall back to remote address
    req.remote_addr().as_socket_addr().map(|addr| addr.ip())
}

/// Token from an `Authorization: Bearer <token>` header
pub fn bearer_token(req: &Request) -> Option<&str> {
    let header = req.header("Authorization")?;
    let (scheme, token) = header.split_once(' ')?;
    let token = token.trim();

    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token)
    } else {
        None
    }
}

/// Build the per-request context
///
/// An unusable token leaves the context anonymous; the gate then answers with a
/// login redirect instead of a token error.
pub async fn request_context(req: &Request, session_provider: &SessionProvider) -> RequestContext {
    let mut ctx = RequestContext::anonymous();

    if let Some(target) = req.uri().path_and_query() {
        ctx = ctx.with_requested_target(target.as_str());
    }
    if let Some(ip) = extract_ip_address(req) {
        ctx = ctx.with_ip_address(ip);
    }
    if let Some(token) = bearer_token(req) {
        if let Some(identity) = session_provider.resolve(token).await {
            ctx = ctx.with_identity(identity);
        }
    }

    ctx
}
