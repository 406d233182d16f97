//! Parameter state persistence.
//!
//! State format: a versioned JSON object mapping stable `ParamId` to an f64
//! value.
//!
//! ```json
//! {"version": 1, "params": {"100": 20.0, "101": 1.0, "104": 1000.0}}
//! ```
//!
//! Using stable IDs (not indices) keeps state valid across parameter
//! reordering. Unknown IDs are ignored and missing IDs load as defaults.
//! Every f32 is exactly representable as f64, so values round-trip
//! bit-for-bit.

use std::collections::BTreeMap;

use serde::Serialize;
use vxt_core::{PARAM_COUNT, PARAMS};

use crate::error::StateError;
use crate::shared::VxtShared;

/// Current state format version.
pub const STATE_VERSION: u64 = 1;

#[derive(Serialize)]
struct StateBlob {
    version: u64,
    params: BTreeMap<String, f64>,
}

/// Serializes every parameter value.
pub fn save_state(shared: &VxtShared) -> Result<Vec<u8>, StateError> {
    let params = shared
        .descriptors()
        .iter()
        .zip(shared.values())
        .map(|(desc, value)| (desc.id.0.to_string(), f64::from(value)))
        .collect();

    let blob = StateBlob {
        version: STATE_VERSION,
        params,
    };
    Ok(serde_json::to_vec(&blob)?)
}

/// Parses a blob into a full set of values without touching any store.
fn parse_state(bytes: &[u8]) -> Result<[f32; PARAM_COUNT], StateError> {
    let value: serde_json::Value = serde_json::from_slice(bytes)?;
    let Some(obj) = value.as_object() else {
        return Err(StateError::NotAnObject);
    };

    let version = obj
        .get("version")
        .ok_or(StateError::MissingField("version"))?;
    match version.as_u64() {
        Some(STATE_VERSION) => {}
        Some(other) => return Err(StateError::UnsupportedVersion(other)),
        None => return Err(StateError::MissingField("version")),
    }

    let params = obj
        .get("params")
        .ok_or(StateError::MissingField("params"))?
        .as_object()
        .ok_or(StateError::NotAnObject)?;

    let mut values: [f32; PARAM_COUNT] = core::array::from_fn(|i| PARAMS[i].default);
    for (key, val) in params {
        let Ok(id) = key.parse::<u32>() else {
            continue;
        };
        let Some(index) = PARAMS.iter().position(|d| d.id.0 == id) else {
            continue;
        };
        let v = val
            .as_f64()
            .map(|v| v as f32)
            .filter(|v| v.is_finite())
            .ok_or_else(|| StateError::InvalidValue(key.clone()))?;
        values[index] = v;
    }
    Ok(values)
}

/// Loads a blob, failing on any malformation.
///
/// The store is only written once the whole blob has been validated, so a
/// rejected blob leaves every parameter as it was.
pub fn load_state(shared: &VxtShared, bytes: &[u8]) -> Result<(), StateError> {
    let values = parse_state(bytes)?;
    for (index, value) in values.into_iter().enumerate() {
        shared.set_value(index, value);
    }
    tracing::debug!(bytes = bytes.len(), "state loaded");
    Ok(())
}

/// Loads a blob, falling back to defaults if it is malformed.
///
/// Never fails. Returns `true` if the blob was applied and `false` if the
/// store was reset to defaults instead.
pub fn restore_state_or_default(shared: &VxtShared, bytes: &[u8]) -> bool {
    match load_state(shared, bytes) {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(error = %err, "malformed state, restoring defaults");
            shared.reset_to_defaults();
            false
        }
    }
}
