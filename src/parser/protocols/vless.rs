//! VLESS link decoder
//!
//! Decodes VLESS (vless://) share links.
//! Format: vless://uuid@host:port?params#tag

use std::collections::HashMap;

use tracing::trace;
use url::Url;

use crate::node::{ProxyNode, VlessNode};
use crate::parser::error::DecodeError;
use crate::parser::name::NameRegistry;

use super::{LinkDecoder, strip_fragment};

// ============================================================================
// VLESS Decoder
// ============================================================================

/// Decoder for VLESS (vless://) links
pub struct VlessDecoder;

impl LinkDecoder for VlessDecoder {
    fn scheme(&self) -> &'static str {
        "vless"
    }

    fn decode(&self, link: &str, names: &mut NameRegistry) -> Result<ProxyNode, DecodeError> {
        let link = link.trim();
        trace!("Decoding VLESS link");

        let body = strip_fragment(link.strip_prefix("vless://").unwrap_or(link));

        // Exactly one @ separates the uuid from the authority
        let (uuid, rest) = match body.split_once('@') {
            Some(parts) if body.matches('@').count() == 1 => parts,
            _ => {
                return Err(DecodeError::MalformedAuthority(
                    "expected uuid@host:port".to_string(),
                ));
            }
        };

        let url = Url::parse(&format!("vless://{}", rest))
            .map_err(|e| DecodeError::MalformedAuthority(e.to_string()))?;

        let server = match url.host_str() {
            Some(host) if !host.is_empty() => host.to_string(),
            _ => return Err(DecodeError::MissingField("server")),
        };
        let port = url.port().ok_or(DecodeError::MissingField("port"))?;
        if uuid.is_empty() {
            return Err(DecodeError::MissingField("uuid"));
        }

        let params: HashMap<String, String> = url.query_pairs().into_owned().collect();

        let encryption = params
            .get("encryption")
            .cloned()
            .unwrap_or_else(|| "none".to_string());

        // An empty flow value carries no information; treat it as absent
        let flow = params.get("flow").filter(|f| !f.is_empty()).cloned();

        let tls = params.get("security").map(String::as_str) == Some("tls");

        let name = names.assign(link);

        Ok(ProxyNode::Vless(VlessNode {
            name,
            server,
            port,
            uuid: uuid.to_string(),
            encryption,
            flow,
            tls,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(link: &str) -> Result<ProxyNode, DecodeError> {
        let mut names = NameRegistry::new();
        VlessDecoder.decode(link, &mut names)
    }

    #[test]
    fn test_vless_basic() {
        let link = "vless://uuid-1@example.com:443?security=tls&encryption=none#node";
        let node = decode(link).unwrap();

        if let ProxyNode::Vless(vless) = node {
            assert_eq!(vless.name, "node");
            assert_eq!(vless.server, "example.com");
            assert_eq!(vless.port, 443);
            assert_eq!(vless.uuid, "uuid-1");
            assert_eq!(vless.encryption, "none");
            assert_eq!(vless.flow, None);
            assert!(vless.tls);
        } else {
            panic!("Expected VLESS node");
        }
    }

    #[test]
    fn test_vless_defaults() {
        let link = "vless://uuid-1@example.com:8443";
        let node = decode(link).unwrap();

        if let ProxyNode::Vless(vless) = node {
            assert_eq!(vless.encryption, "none");
            assert_eq!(vless.flow, None);
            assert!(!vless.tls);
        } else {
            panic!("Expected VLESS node");
        }
    }

    #[test]
    fn test_vless_flow_preserved() {
        let link = "vless://u@h.com:443?flow=xtls-rprx-vision&security=tls";
        let node = decode(link).unwrap();

        if let ProxyNode::Vless(vless) = node {
            assert_eq!(vless.flow.as_deref(), Some("xtls-rprx-vision"));
        } else {
            panic!("Expected VLESS node");
        }
    }

    #[test]
    fn test_vless_empty_flow_normalized_to_absent() {
        let link = "vless://u@h.com:443?flow=";
        let node = decode(link).unwrap();

        if let ProxyNode::Vless(vless) = node {
            assert_eq!(vless.flow, None);
        } else {
            panic!("Expected VLESS node");
        }
    }

    #[test]
    fn test_vless_security_other_than_tls() {
        let link = "vless://u@h.com:443?security=reality";
        let node = decode(link).unwrap();

        if let ProxyNode::Vless(vless) = node {
            assert!(!vless.tls);
        } else {
            panic!("Expected VLESS node");
        }
    }

    #[test]
    fn test_vless_missing_at_separator() {
        let err = decode("vless://example.com:443").unwrap_err();
        assert!(matches!(err, DecodeError::MalformedAuthority(_)));
    }

    #[test]
    fn test_vless_two_at_separators() {
        let err = decode("vless://a@b@example.com:443").unwrap_err();
        assert!(matches!(err, DecodeError::MalformedAuthority(_)));
    }

    #[test]
    fn test_vless_empty_uuid() {
        let err = decode("vless://@example.com:443").unwrap_err();
        assert!(matches!(err, DecodeError::MissingField("uuid")));
    }

    #[test]
    fn test_vless_missing_port() {
        let err = decode("vless://u@example.com").unwrap_err();
        assert!(matches!(err, DecodeError::MissingField("port")));
    }

    #[test]
    fn test_scheme() {
        assert_eq!(VlessDecoder.scheme(), "vless");
        assert!(VlessDecoder.can_decode("vless://abc"));
        assert!(!VlessDecoder.can_decode("trojan://abc"));
    }
}
