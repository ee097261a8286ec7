//! Shadowsocks link decoder
//!
//! Decodes Shadowsocks (ss://) share links. Two body encodings circulate:
//! - Partial: ss://BASE64(method:password)@host:port?plugin=...#tag
//! - Full:    ss://BASE64(method:password@host:port)#tag

use tracing::trace;

use crate::node::{ProxyNode, ShadowsocksNode};
use crate::parser::base64::decode_lenient;
use crate::parser::error::DecodeError;
use crate::parser::name::NameRegistry;

use super::{LinkDecoder, parse_host_port, strip_fragment};

// ============================================================================
// Shadowsocks Decoder
// ============================================================================

/// Decoder for Shadowsocks (ss://) links
pub struct ShadowsocksDecoder;

impl LinkDecoder for ShadowsocksDecoder {
    fn scheme(&self) -> &'static str {
        "ss"
    }

    fn decode(&self, link: &str, names: &mut NameRegistry) -> Result<ProxyNode, DecodeError> {
        let link = link.trim();
        trace!("Decoding Shadowsocks link");

        let body = strip_fragment(link.strip_prefix("ss://").unwrap_or(link));

        // A literal @ in the body means only the userinfo is base64-encoded
        if let Some((userinfo, authority)) = body.split_once('@') {
            trace!("Decoding partial encoding (found @ separator)");
            return self.decode_partial(link, userinfo, authority, names);
        }

        trace!("Decoding full base64 encoding");
        self.decode_full(link, body, names)
    }
}

impl ShadowsocksDecoder {
    /// Partial encoding: BASE64(method:password)@host:port, plugin in the query
    fn decode_partial(
        &self,
        link: &str,
        userinfo: &str,
        authority: &str,
        names: &mut NameRegistry,
    ) -> Result<ProxyNode, DecodeError> {
        let info = decode_lenient(userinfo);
        if info.is_empty() {
            return Err(DecodeError::Base64DecodeFailure("userinfo".to_string()));
        }

        let (cipher, password) = info
            .split_once(':')
            .ok_or_else(|| DecodeError::MalformedAuthority("userinfo lacks ':'".to_string()))?;

        let (server, port) = parse_host_port(authority)?;

        if cipher.is_empty() {
            return Err(DecodeError::MissingField("cipher"));
        }
        if password.is_empty() {
            return Err(DecodeError::MissingField("password"));
        }

        let plugin = plugin_param(link);
        let name = names.assign(link);

        Ok(ProxyNode::Ss(ShadowsocksNode {
            name,
            server,
            port,
            cipher: cipher.to_string(),
            password: password.to_string(),
            plugin,
        }))
    }

    /// Full encoding: the entire body is BASE64(method:password@host:port)
    fn decode_full(
        &self,
        link: &str,
        body: &str,
        names: &mut NameRegistry,
    ) -> Result<ProxyNode, DecodeError> {
        let payload = body.split('?').next().unwrap_or_default();
        let decoded = decode_lenient(payload);
        if decoded.is_empty() {
            return Err(DecodeError::Base64DecodeFailure("link body".to_string()));
        }

        // Exactly one @ separates method:password from host:port
        let (userinfo, authority) = match decoded.split_once('@') {
            Some(parts) if decoded.matches('@').count() == 1 => parts,
            _ => {
                return Err(DecodeError::MalformedAuthority(
                    "decoded body must contain exactly one '@'".to_string(),
                ));
            }
        };

        let (cipher, password) = userinfo
            .split_once(':')
            .ok_or_else(|| DecodeError::MalformedAuthority("userinfo lacks ':'".to_string()))?;

        let (server, port) = parse_host_port(authority)?;

        if cipher.is_empty() {
            return Err(DecodeError::MissingField("cipher"));
        }
        if password.is_empty() {
            return Err(DecodeError::MissingField("password"));
        }

        let name = names.assign(link);

        Ok(ProxyNode::Ss(ShadowsocksNode {
            name,
            server,
            port,
            cipher: cipher.to_string(),
            password: password.to_string(),
            plugin: None,
        }))
    }
}

/// Pulls the `plugin` parameter out of the link's query string, verbatim.
fn plugin_param(link: &str) -> Option<String> {
    let query = strip_fragment(link).split_once('?').map(|(_, q)| q)?;

    for param in query.split('&') {
        if let Some(raw_value) = param.strip_prefix("plugin=") {
            let decoded = urlencoding::decode(raw_value)
                .unwrap_or_else(|_| raw_value.into())
                .into_owned();
            if decoded.is_empty() {
                return None;
            }
            return Some(decoded);
        }
    }
    None
}
