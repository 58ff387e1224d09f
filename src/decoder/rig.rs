// src/decoder/rig.rs

use std::sync::Arc;

use crate::error::{MediaError, Result};

/// Rig payloads are opaque here; the external renderer validates structure.
pub fn read_rig(name: &str, bytes: Arc<[u8]>) -> Result<Arc<[u8]>> {
    if bytes.is_empty() {
        return Err(MediaError::EmptyRig(name.to_string()));
    }
    tracing::debug!(name, len = bytes.len(), "rig buffer read");
    Ok(bytes)
}
