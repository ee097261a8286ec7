//! Link decoding module
//!
//! This module turns a newline-delimited list of proxy share links into an
//! ordered sequence of proxy nodes:
//! - Line intake (trimming, blank/comment filtering)
//! - Lenient base64 decoding for the encodings that need it
//! - Name extraction, sanitization, and per-batch deduplication
//! - Scheme decoders (ss://, vmess://, vless://, trojan://) behind a registry
//! - A batch aggregator that counts and reports per-line failures

pub mod base64;
pub mod error;
pub mod name;
pub mod protocols;

pub use error::DecodeError;
pub use name::NameRegistry;
pub use protocols::{
    DecoderRegistry, LinkDecoder, ShadowsocksDecoder, TrojanDecoder, VlessDecoder, VmessDecoder,
    parse_host_port,
};

use tracing::{debug, warn};

use crate::node::ProxyNode;
use crate::report::EventLog;

/// Failure reports echo at most this many characters of the offending line
const REPORT_EXCERPT_LEN: usize = 30;

// ============================================================================
// Line Intake
// ============================================================================

/// Filters raw text into the ordered sequence of candidate link lines.
///
/// Lines are trimmed; blank lines and `#` comment lines are dropped. Order is
/// preserved — it drives name-collision tie-breaks and report ordering.
pub fn intake_lines(content: &str) -> Vec<&str> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect()
}

// ============================================================================
// Batch Aggregation
// ============================================================================

impl DecoderRegistry {
    /// Decodes a whole link list, collecting the nodes that decode cleanly.
    ///
    /// Each line is decoded independently; a failure is reported to `log`,
    /// counted, and the line dropped. The batch always runs to completion and
    /// ends with a `"<succeeded> succeeded, <failed> failed"` summary. Node
    /// order matches the input order of the successful lines. Names are
    /// unique within one call; concurrent calls each get their own name set.
    pub fn decode_batch(&self, content: &str, log: &mut dyn EventLog) -> Vec<ProxyNode> {
        let lines = intake_lines(content);
        debug!("Decoding {} link lines", lines.len());

        let mut names = NameRegistry::new();
        let mut nodes = Vec::new();
        let mut succeeded: usize = 0;
        let mut failed: usize = 0;

        for line in lines {
            match self.decode_line(line, &mut names) {
                Ok(node) => {
                    nodes.push(node);
                    succeeded += 1;
                }
                Err(err) => {
                    warn!("Failed to decode link: {}", err);
                    log.append(&format!("{} → {}", line_excerpt(line), err));
                    failed += 1;
                }
            }
        }

        log.append(&format!("{} succeeded, {} failed", succeeded, failed));
        debug!(
            "Batch decode complete: {} succeeded, {} failed",
            succeeded, failed
        );

        nodes
    }
}

fn line_excerpt(line: &str) -> String {
    line.chars().take(REPORT_EXCERPT_LEN).collect()
}
