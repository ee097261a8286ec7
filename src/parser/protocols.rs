//! Scheme decoders module
//!
//! This module contains decoders for the four supported share-link schemes.
//! Each decoder implements the `LinkDecoder` trait to provide a consistent
//! interface for turning one link line into a proxy node.

mod shadowsocks;
mod trojan;
mod vless;
mod vmess;

pub use shadowsocks::ShadowsocksDecoder;
pub use trojan::TrojanDecoder;
pub use vless::VlessDecoder;
pub use vmess::VmessDecoder;

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::node::ProxyNode;
use crate::parser::error::DecodeError;
use crate::parser::name::NameRegistry;

// ============================================================================
// Link Decoder Trait
// ============================================================================

/// Trait for decoding individual share-link lines
pub trait LinkDecoder: Send + Sync {
    /// Returns the link scheme this decoder handles (e.g., "ss", "vmess")
    fn scheme(&self) -> &'static str;

    /// Decodes a link line into a proxy node.
    ///
    /// Implementations reserve the node name from `names` only after the
    /// payload has fully validated, so a failed line never consumes a
    /// dedup suffix.
    fn decode(&self, link: &str, names: &mut NameRegistry) -> Result<ProxyNode, DecodeError>;

    /// Checks if this decoder can handle the given link
    fn can_decode(&self, link: &str) -> bool {
        link.starts_with(&format!("{}://", self.scheme()))
    }
}

// ============================================================================
// Decoder Registry
// ============================================================================

/// Registry of scheme decoders with dynamic dispatch
#[derive(Default)]
pub struct DecoderRegistry {
    decoders: HashMap<String, Arc<dyn LinkDecoder>>,
}

impl DecoderRegistry {
    /// Creates a new empty registry
    pub fn new() -> Self {
        Self {
            decoders: HashMap::new(),
        }
    }

    /// Creates a registry with the four supported schemes registered
    pub fn with_builtin_decoders() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(ShadowsocksDecoder));
        registry.register(Arc::new(VmessDecoder));
        registry.register(Arc::new(VlessDecoder));
        registry.register(Arc::new(TrojanDecoder));
        registry
    }

    /// Registers a decoder
    pub fn register(&mut self, decoder: Arc<dyn LinkDecoder>) {
        self.decoders.insert(decoder.scheme().to_string(), decoder);
    }

    /// Gets the decoder for the given scheme
    pub fn get(&self, scheme: &str) -> Option<&Arc<dyn LinkDecoder>> {
        self.decoders.get(scheme)
    }

    /// Decodes one link line, dispatching on its scheme prefix
    pub fn decode_line(
        &self,
        link: &str,
        names: &mut NameRegistry,
    ) -> Result<ProxyNode, DecodeError> {
        let scheme = match link.split_once("://") {
            Some((scheme, _)) if !scheme.is_empty() => scheme,
            _ => {
                return Err(DecodeError::UnsupportedScheme(excerpt(link)));
            }
        };

        let decoder = self
            .decoders
            .get(scheme)
            .ok_or_else(|| DecodeError::UnsupportedScheme(scheme.to_string()))?;

        trace!("Decoding {} link", scheme);
        let result = decoder.decode(link, names);
        match &result {
            Ok(node) => debug!("Decoded {} link -> node '{}'", scheme, node.name()),
            Err(e) => debug!("Failed to decode {} link: {}", scheme, e),
        }
        result
    }
}

fn excerpt(link: &str) -> String {
    link.chars().take(30).collect()
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Parses the trailing `host:port` of an authority string.
///
/// Any `/`-, `?`-, or `#`-introduced suffix is stripped first, the remainder
/// must end in `:<digits>`, and bracketed IPv6 hosts (`[::1]:8388`) are
/// unwrapped. An empty host or a zero port counts as a missing field.
pub fn parse_host_port(authority: &str) -> Result<(String, u16), DecodeError> {
    let hostport = authority
        .trim()
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default();

    // Bracketed IPv6: [::1]:8388
    if let Some(rest) = hostport.strip_prefix('[') {
        let bracket_end = rest
            .find(']')
            .ok_or_else(|| DecodeError::MalformedHostPort(hostport.to_string()))?;
        let host = &rest[..bracket_end];
        let port_str = rest[bracket_end + 1..]
            .strip_prefix(':')
            .ok_or_else(|| DecodeError::MalformedHostPort(hostport.to_string()))?;
        let port = parse_port(port_str, hostport)?;
        if host.is_empty() {
            return Err(DecodeError::MissingField("server"));
        }
        return Ok((host.to_string(), port));
    }

    let colon_pos = hostport
        .rfind(':')
        .ok_or_else(|| DecodeError::MalformedHostPort(hostport.to_string()))?;

    let host = &hostport[..colon_pos];
    let port = parse_port(&hostport[colon_pos + 1..], hostport)?;

    if host.is_empty() {
        return Err(DecodeError::MissingField("server"));
    }
    Ok((host.to_string(), port))
}

fn parse_port(port_str: &str, context: &str) -> Result<u16, DecodeError> {
    if port_str.is_empty() || !port_str.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DecodeError::MalformedHostPort(context.to_string()));
    }
    let port: u16 = port_str
        .parse()
        .map_err(|_| DecodeError::MalformedHostPort(context.to_string()))?;
    if port == 0 {
        return Err(DecodeError::MissingField("port"));
    }
    Ok(port)
}

/// Strips the fragment (everything from the first `#`) off a link body
pub fn strip_fragment(body: &str) -> &str {
    match body.find('#') {
        Some(pos) => &body[..pos],
        None => body,
    }
}
