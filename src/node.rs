//! Proxy node model
//!
//! Decoded representation of one share link, shaped for the downstream Clash
//! configuration document. The `type` tag selects the protocol variant; every
//! variant carries the common `name`/`server`/`port` prefix.

use serde::{Deserialize, Serialize};

// ============================================================================
// ProxyNode Enum
// ============================================================================

/// A decoded proxy node
///
/// Created only by a successful decode of one link line; immutable afterwards.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProxyNode {
    /// Shadowsocks node
    Ss(ShadowsocksNode),
    /// VMess node
    Vmess(VmessNode),
    /// VLESS node
    Vless(VlessNode),
    /// Trojan node
    Trojan(TrojanNode),
}

impl ProxyNode {
    /// The batch-unique node name
    pub fn name(&self) -> &str {
        match self {
            ProxyNode::Ss(n) => &n.name,
            ProxyNode::Vmess(n) => &n.name,
            ProxyNode::Vless(n) => &n.name,
            ProxyNode::Trojan(n) => &n.name,
        }
    }

    /// Server hostname or address
    pub fn server(&self) -> &str {
        match self {
            ProxyNode::Ss(n) => &n.server,
            ProxyNode::Vmess(n) => &n.server,
            ProxyNode::Vless(n) => &n.server,
            ProxyNode::Trojan(n) => &n.server,
        }
    }

    /// Server port
    pub fn port(&self) -> u16 {
        match self {
            ProxyNode::Ss(n) => n.port,
            ProxyNode::Vmess(n) => n.port,
            ProxyNode::Vless(n) => n.port,
            ProxyNode::Trojan(n) => n.port,
        }
    }

    /// The link scheme this node was decoded from
    pub fn scheme(&self) -> &'static str {
        match self {
            ProxyNode::Ss(_) => "ss",
            ProxyNode::Vmess(_) => "vmess",
            ProxyNode::Vless(_) => "vless",
            ProxyNode::Trojan(_) => "trojan",
        }
    }
}

// ============================================================================
// Per-Protocol Payloads
// ============================================================================

/// Shadowsocks node fields
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ShadowsocksNode {
    pub name: String,
    pub server: String,
    pub port: u16,
    /// Encryption method
    pub cipher: String,
    pub password: String,
    /// SIP003 plugin value, verbatim from the link's query string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugin: Option<String>,
}

/// VMess node fields
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct VmessNode {
    pub name: String,
    pub server: String,
    pub port: u16,
    pub uuid: String,
    #[serde(rename = "alterId", default)]
    pub alter_id: u32,
    pub cipher: String,
    #[serde(default)]
    pub tls: bool,
    /// Transport name as carried by the link (`net` field)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
    /// Present only when the transport is websocket
    #[serde(rename = "ws-opts", default, skip_serializing_if = "Option::is_none")]
    pub ws_opts: Option<WsOpts>,
}

/// WebSocket transport options
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct WsOpts {
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub headers: WsHeaders,
}

/// WebSocket request headers
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct WsHeaders {
    #[serde(rename = "Host", default)]
    pub host: String,
}

/// VLESS node fields
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct VlessNode {
    pub name: String,
    pub server: String,
    pub port: u16,
    pub uuid: String,
    pub encryption: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow: Option<String>,
    #[serde(default)]
    pub tls: bool,
}

/// Trojan node fields
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TrojanNode {
    pub name: String,
    pub server: String,
    pub port: u16,
    pub password: String,
    #[serde(default)]
    pub sni: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alpn: Vec<String>,
    #[serde(rename = "skip-cert-verify", default)]
    pub skip_cert_verify: bool,
}

// ============================================================================
// Exchange Document
// ============================================================================

/// The `proxies:` document handed to the config-injection side
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct ProxyDocument {
    #[serde(default)]
    pub proxies: Vec<ProxyNode>,
}

impl ProxyDocument {
    /// Wraps a decoded batch into the exchange document
    pub fn new(proxies: Vec<ProxyNode>) -> Self {
        Self { proxies }
    }
}
