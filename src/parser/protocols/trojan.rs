//! Trojan link decoder
//!
//! Decodes Trojan (trojan://) share links.
//! Format: trojan://password@host:port?params#tag

use std::collections::HashMap;

use tracing::trace;
use url::Url;

use crate::node::{ProxyNode, TrojanNode};
use crate::parser::error::DecodeError;
use crate::parser::name::NameRegistry;

use super::{LinkDecoder, strip_fragment};

// ============================================================================
// Trojan Decoder
// ============================================================================

/// Decoder for Trojan (trojan://) links
pub struct TrojanDecoder;

impl LinkDecoder for TrojanDecoder {
    fn scheme(&self) -> &'static str {
        "trojan"
    }

    fn decode(&self, link: &str, names: &mut NameRegistry) -> Result<ProxyNode, DecodeError> {
        let link = link.trim();
        trace!("Decoding Trojan link");

        let body = strip_fragment(link.strip_prefix("trojan://").unwrap_or(link));

        let url = Url::parse(&format!("trojan://{}", body))
            .map_err(|e| DecodeError::MalformedAuthority(e.to_string()))?;

        let password = urlencoding::decode(url.username())
            .unwrap_or_else(|_| url.username().into())
            .into_owned();
        if password.is_empty() {
            return Err(DecodeError::MissingField("password"));
        }

        let server = match url.host_str() {
            Some(host) if !host.is_empty() => host.to_string(),
            _ => return Err(DecodeError::MissingField("server")),
        };
        let port = url.port().ok_or(DecodeError::MissingField("port"))?;

        let params: HashMap<String, String> = url.query_pairs().into_owned().collect();

        let sni = params.get("sni").cloned().unwrap_or_default();

        let alpn: Vec<String> = params
            .get("alpn")
            .map(|s| s.split(',').map(|p| p.trim().to_string()).collect())
            .unwrap_or_default();

        let skip_cert_verify = params
            .get("allowInsecure")
            .is_some_and(|v| v.eq_ignore_ascii_case("true"));

        let name = names.assign(link);

        Ok(ProxyNode::Trojan(TrojanNode {
            name,
            server,
            port,
            password,
            sni,
            alpn,
            skip_cert_verify,
        }))
    }
}
