//! Per-frame refresh policies.
//!
//! On every frame each live proxy is either recloned from its source model or
//! only repositioned. The policy makes that call; the lifecycle manager does
//! the rest, so a cheaper strategy can be swapped in without touching the
//! frame loop.

use crate::config::RefreshMode;
use crate::proxy::ProxyRecord;

pub trait RefreshPolicy: std::fmt::Debug {
    /// Whether the proxy must be recloned this frame. `current_version` is
    /// the host's edit counter for the proxy's source model.
    fn needs_reclone(&self, record: &ProxyRecord, current_version: Option<u64>) -> bool;
}

/// Always reclone. Edits to the source model show up on the next frame with
/// no invalidation signal needed.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecloneEveryFrame;

impl RefreshPolicy for RecloneEveryFrame {
    fn needs_reclone(&self, _record: &ProxyRecord, _current_version: Option<u64>) -> bool {
        true
    }
}

/// Reclone only when the source model's version moved. Hosts that cannot
/// report versions fall back to recloning every frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct VersionedRefresh;

impl RefreshPolicy for VersionedRefresh {
    fn needs_reclone(&self, record: &ProxyRecord, current_version: Option<u64>) -> bool {
        match (record.version(), current_version) {
            (Some(cloned), Some(current)) => cloned != current,
            _ => true,
        }
    }
}

impl From<RefreshMode> for Box<dyn RefreshPolicy> {
    fn from(mode: RefreshMode) -> Self {
        match mode {
            RefreshMode::RecloneEveryFrame => Box::new(RecloneEveryFrame),
            RefreshMode::Versioned => Box::new(VersionedRefresh),
        }
    }
}
