//! VMess link decoder
//!
//! Decodes VMess (vmess://) share links. The body is base64-encoded JSON:
//! vmess://BASE64({ "add": "host", "port": 443, "id": "uuid", ... })

use serde::Deserialize;
use tracing::trace;

use crate::node::{ProxyNode, VmessNode, WsHeaders, WsOpts};
use crate::parser::base64::decode_lenient;
use crate::parser::error::DecodeError;
use crate::parser::name::NameRegistry;

use super::{LinkDecoder, strip_fragment};

// ============================================================================
// VMess Decoder
// ============================================================================

/// Decoder for VMess (vmess://) links
pub struct VmessDecoder;

/// VMess link JSON payload
///
/// Every field is optional at the serde layer; required-field checks happen
/// afterwards so their absence reports as a missing field rather than a
/// deserialization error.
#[derive(Deserialize, Debug, Default)]
struct VmessPayload {
    /// Server address
    #[serde(default)]
    add: Option<String>,
    /// Server port (number or numeric string)
    #[serde(default, deserialize_with = "deserialize_option_u16")]
    port: Option<u16>,
    /// UUID
    #[serde(default)]
    id: Option<String>,
    /// Alter ID (number or numeric string)
    #[serde(default, deserialize_with = "deserialize_option_u32")]
    aid: Option<u32>,
    /// Cipher name
    #[serde(default, rename = "type")]
    cipher: Option<String>,
    /// TLS marker; the literal string "tls" enables it
    #[serde(default)]
    tls: Option<String>,
    /// Transport name (tcp, ws, ...)
    #[serde(default)]
    net: Option<String>,
    /// WebSocket path
    #[serde(default)]
    path: Option<String>,
    /// WebSocket Host header
    #[serde(default)]
    host: Option<String>,
}

impl LinkDecoder for VmessDecoder {
    fn scheme(&self) -> &'static str {
        "vmess"
    }

    fn decode(&self, link: &str, names: &mut NameRegistry) -> Result<ProxyNode, DecodeError> {
        let link = link.trim();
        trace!("Decoding VMess link");

        let body = strip_fragment(link.strip_prefix("vmess://").unwrap_or(link));

        let decoded = decode_lenient(body);
        if decoded.is_empty() {
            return Err(DecodeError::Base64DecodeFailure("link body".to_string()));
        }
        trace!("Decoded VMess JSON: {}", decoded);

        let payload: VmessPayload = serde_json::from_str(&decoded)?;

        let server = match payload.add {
            Some(add) if !add.is_empty() => add,
            _ => return Err(DecodeError::MissingField("add")),
        };
        let port = match payload.port {
            Some(port) if port != 0 => port,
            _ => return Err(DecodeError::MissingField("port")),
        };
        let uuid = match payload.id {
            Some(id) if !id.is_empty() => id,
            _ => return Err(DecodeError::MissingField("id")),
        };

        let tls = payload
            .tls
            .as_deref()
            .is_some_and(|t| t.eq_ignore_ascii_case("tls"));

        // Websocket options only materialize for the ws transport
        let ws_opts = if payload.net.as_deref() == Some("ws") {
            Some(WsOpts {
                path: payload.path.unwrap_or_default(),
                headers: WsHeaders {
                    host: payload.host.unwrap_or_default(),
                },
            })
        } else {
            None
        };

        let name = names.assign(link);

        Ok(ProxyNode::Vmess(VmessNode {
            name,
            server,
            port,
            uuid,
            alter_id: payload.aid.unwrap_or(0),
            cipher: payload.cipher.unwrap_or_else(|| "auto".to_string()),
            tls,
            network: payload.net,
            ws_opts,
        }))
    }
}

// ============================================================================
// Deserialization Helpers
// ============================================================================

/// Custom deserializer for optional u16 (handles both string and number)
fn deserialize_option_u16<'de, D>(deserializer: D) -> Result<Option<u16>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum U16Value {
        Number(u16),
        String(String),
    }

    match Option::<U16Value>::deserialize(deserializer)? {
        Some(U16Value::Number(n)) => Ok(Some(n)),
        Some(U16Value::String(s)) if s.is_empty() => Ok(None),
        Some(U16Value::String(s)) => s.parse().map(Some).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Custom deserializer for optional u32 (handles both string and number)
fn deserialize_option_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum U32Value {
        Number(u32),
        String(String),
    }

    match Option::<U32Value>::deserialize(deserializer)? {
        Some(U32Value::Number(n)) => Ok(Some(n)),
        Some(U32Value::String(s)) if s.is_empty() => Ok(None),
        Some(U32Value::String(s)) => s.parse().map(Some).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}
