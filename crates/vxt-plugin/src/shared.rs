//! Thread-safe shared state for the VxT EQ.
//!
//! `VxtShared` lives for the lifetime of the plugin instance and is
//! accessible from the main thread (params, state), the audio thread
//! (processing) and the editor (response curve). Parameter values are stored
//! as atomic `u32` (f32 bit-cast) for lock-free access.
//!
//! # Thread Safety
//!
//! - **Values**: `AtomicU32` per parameter, lock-free.
//! - **Dirty flag**: one `AtomicBool`. Setters raise it with
//!   `compare_exchange(false, true)`; the renderer clears it with
//!   `compare_exchange(true, false)`.
//! - **Listeners**: `ArcSwap<Vec<Listener>>`. Notification loads the list
//!   wait-free; subscribe/unsubscribe replace it with `rcu`.
//! - **Committed chain**: [`SnapshotCell`] sequence lock, written by the
//!   audio thread only.

use core::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};

use arc_swap::ArcSwap;
use vxt_core::{
    ChainSettings, ChainSnapshot, EqParam, PARAM_COUNT, PARAMS, ParamDescriptor, ParamFlags,
    SnapshotCell,
};
use vxt_gui_core::ResponseSource;

/// Type-safe index into the parameter array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParamIndex(pub usize);

impl ParamIndex {
    /// The parameter at this index, if in range.
    pub fn param(self) -> Option<EqParam> {
        EqParam::from_index(self.0)
    }
}

impl fmt::Display for ParamIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<usize> for ParamIndex {
    fn from(v: usize) -> Self {
        Self(v)
    }
}

impl From<EqParam> for ParamIndex {
    fn from(param: EqParam) -> Self {
        Self(param.index())
    }
}

/// Handle returned by [`VxtShared::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type ListenerFn = dyn Fn(ParamIndex, f32) + Send + Sync;

#[derive(Clone)]
struct Listener {
    id: ListenerId,
    callback: Arc<ListenerFn>,
}

/// Inner storage behind `Arc` so `VxtShared` can be cheaply cloned.
struct VxtSharedData {
    /// Current parameter values as f32 bit-cast to u32.
    values: [AtomicU32; PARAM_COUNT],
    /// Raised by any value change, cleared by the response renderer.
    changed: AtomicBool,
    /// Change listeners.
    listeners: ArcSwap<Vec<Listener>>,
    next_listener: AtomicU64,
    /// Chain state last committed by the audio thread.
    snapshot: SnapshotCell,
}

/// Shared state accessible from all plugin threads.
///
/// Wraps an `Arc<VxtSharedData>` so it can be cloned into `'static + Send`
/// closures (editor callbacks, the audio processor) without lifetime issues.
#[derive(Clone)]
pub struct VxtShared {
    inner: Arc<VxtSharedData>,
}

impl VxtShared {
    /// Create shared state with every parameter at its default.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(VxtSharedData {
                values: core::array::from_fn(|i| AtomicU32::new(PARAMS[i].default.to_bits())),
                changed: AtomicBool::new(false),
                listeners: ArcSwap::from_pointee(Vec::new()),
                next_listener: AtomicU64::new(0),
                snapshot: SnapshotCell::new(),
            }),
        }
    }

    // ── Parameter metadata ───────────────────────────────────────────────────

    /// Number of parameters.
    pub fn param_count(&self) -> usize {
        PARAM_COUNT
    }

    /// Get parameter descriptor by index.
    pub fn descriptor(&self, index: usize) -> Option<&'static ParamDescriptor> {
        PARAMS.get(index)
    }

    /// All parameter descriptors.
    pub fn descriptors(&self) -> &'static [ParamDescriptor] {
        &PARAMS
    }

    /// Find parameter index by stable `ParamId`.
    pub fn index_by_id(&self, id: u32) -> Option<usize> {
        PARAMS.iter().position(|d| d.id.0 == id)
    }

    /// Find parameter index by name (`"PeakFreq"`) or string ID (`"peak_freq"`).
    pub fn index_by_name(&self, name: &str) -> Option<usize> {
        PARAMS
            .iter()
            .position(|d| d.name.eq_ignore_ascii_case(name) || d.string_id == name)
    }

    // ── Parameter values (lock-free) ─────────────────────────────────────────

    /// Read the current value of a parameter.
    pub fn get_value(&self, index: usize) -> Option<f32> {
        self.inner
            .values
            .get(index)
            .map(|v| f32::from_bits(v.load(Ordering::Acquire)))
    }

    /// Read a parameter by name.
    pub fn value(&self, param: EqParam) -> f32 {
        f32::from_bits(self.inner.values[param.index()].load(Ordering::Acquire))
    }

    /// Write a parameter value. Clamps to descriptor bounds; NaN and
    /// infinities are ignored.
    ///
    /// A value that differs from the stored one raises the dirty flag and
    /// notifies listeners on the calling thread.
    pub fn set_value(&self, index: usize, value: f32) {
        if !value.is_finite() {
            return;
        }
        let Some((atomic, desc)) = self.inner.values.get(index).zip(PARAMS.get(index)) else {
            return;
        };

        let clamped = desc.clamp(value);
        let previous = atomic.swap(clamped.to_bits(), Ordering::AcqRel);
        if previous != clamped.to_bits() {
            self.mark_changed();
            self.notify(ParamIndex(index), clamped);
        }
    }

    /// Read a parameter in the host's normalized `[0, 1]` range.
    pub fn get_normalized(&self, index: usize) -> Option<f32> {
        let desc = PARAMS.get(index)?;
        self.get_value(index).map(|v| desc.normalize(v))
    }

    /// Write a parameter from the host's normalized `[0, 1]` range.
    ///
    /// Stepped parameters snap to the nearest step.
    pub fn set_normalized(&self, index: usize, normalized: f32) {
        let Some(desc) = PARAMS.get(index) else {
            return;
        };
        let mut value = desc.denormalize(normalized.clamp(0.0, 1.0));
        if desc.flags.contains(ParamFlags::STEPPED) {
            value = desc.min + ((value - desc.min) / desc.step).round() * desc.step;
        }
        self.set_value(index, value);
    }

    /// Write a parameter by name. See [`set_value`](Self::set_value).
    pub fn set_param(&self, param: EqParam, value: f32) {
        self.set_value(param.index(), value);
    }

    /// All current values in index order.
    pub fn values(&self) -> [f32; PARAM_COUNT] {
        core::array::from_fn(|i| f32::from_bits(self.inner.values[i].load(Ordering::Acquire)))
    }

    /// Immutable snapshot of the current parameters.
    pub fn chain_settings(&self) -> ChainSettings {
        ChainSettings::from_values(&self.values())
    }

    /// Writes every field of `settings` through [`set_value`](Self::set_value).
    pub fn apply_settings(&self, settings: &ChainSettings) {
        for (index, value) in settings.to_values().into_iter().enumerate() {
            self.set_value(index, value);
        }
    }

    /// Restores every parameter to its default.
    pub fn reset_to_defaults(&self) {
        for (index, desc) in PARAMS.iter().enumerate() {
            self.set_value(index, desc.default);
        }
    }

    // ── Dirty flag ───────────────────────────────────────────────────────────

    /// Raises the dirty flag. A no-op if it is already raised.
    pub fn mark_changed(&self) {
        let _ = self.inner.changed.compare_exchange(
            false,
            true,
            Ordering::AcqRel,
            Ordering::Acquire,
        );
    }

    /// Clears the dirty flag, returning `true` if it was raised.
    pub fn take_changed(&self) -> bool {
        self.inner
            .changed
            .compare_exchange(true, false, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    // ── Listeners ────────────────────────────────────────────────────────────

    /// Registers a callback invoked with `(index, new_value)` after every
    /// value change. Callbacks run on the thread that made the change.
    pub fn subscribe<F>(&self, callback: F) -> ListenerId
    where
        F: Fn(ParamIndex, f32) + Send + Sync + 'static,
    {
        let id = ListenerId(self.inner.next_listener.fetch_add(1, Ordering::Relaxed));
        let listener = Listener {
            id,
            callback: Arc::new(callback),
        };
        self.inner.listeners.rcu(|current| {
            let mut next = Vec::clone(current);
            next.push(listener.clone());
            next
        });
        id
    }

    /// Removes a listener. Returns `false` if `id` was not registered.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let previous = self.inner.listeners.rcu(|current| {
            current
                .iter()
                .filter(|l| l.id != id)
                .cloned()
                .collect::<Vec<_>>()
        });
        previous.iter().any(|l| l.id == id)
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.load().len()
    }

    fn notify(&self, index: ParamIndex, value: f32) {
        let listeners = self.inner.listeners.load();
        for listener in listeners.iter() {
            (listener.callback)(index, value);
        }
    }

    // ── Committed chain state ────────────────────────────────────────────────

    /// Publishes the chain state the audio thread just committed.
    pub fn publish_snapshot(&self, snapshot: &ChainSnapshot) {
        self.inner.snapshot.publish(snapshot);
    }

    /// Latest committed chain state, if the processor has run.
    pub fn committed_snapshot(&self) -> Option<ChainSnapshot> {
        self.inner.snapshot.read()
    }
}

impl Default for VxtShared {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for VxtShared {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VxtShared")
            .field("values", &self.values())
            .field("listeners", &self.listener_count())
            .field("snapshot", &self.inner.snapshot)
            .finish()
    }
}

impl ResponseSource for VxtShared {
    fn take_changed(&self) -> bool {
        VxtShared::take_changed(self)
    }

    fn chain_settings(&self) -> ChainSettings {
        VxtShared::chain_settings(self)
    }

    fn committed_snapshot(&self) -> Option<ChainSnapshot> {
        VxtShared::committed_snapshot(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn defaults_match_descriptors() {
        let shared = VxtShared::new();
        for (i, desc) in shared.descriptors().iter().enumerate() {
            assert_eq!(shared.get_value(i), Some(desc.default), "{}", desc.name);
        }
        assert!(shared.chain_settings().bit_eq(&ChainSettings::default()));
    }

    #[test]
    fn set_value_clamps() {
        let shared = VxtShared::new();
        let desc = shared.descriptor(0).unwrap();

        shared.set_value(0, desc.max + 100.0);
        assert_eq!(shared.get_value(0), Some(desc.max));

        shared.set_value(0, desc.min - 100.0);
        assert_eq!(shared.get_value(0), Some(desc.min));
    }

    #[test]
    fn set_value_ignores_non_finite() {
        let shared = VxtShared::new();
        shared.set_param(EqParam::PeakGain, 6.0);
        shared.take_changed();

        shared.set_param(EqParam::PeakGain, f32::NAN);
        shared.set_param(EqParam::PeakGain, f32::INFINITY);
        assert_eq!(shared.value(EqParam::PeakGain), 6.0);
        assert!(!shared.take_changed());
    }

    #[test]
    fn normalized_access_follows_scale() {
        let shared = VxtShared::new();

        // Log scale: halfway between 200 Hz and 20 kHz is 2 kHz.
        shared.set_normalized(EqParam::PeakFreq.index(), 0.5);
        assert!((shared.value(EqParam::PeakFreq) - 2000.0).abs() < 1.0);
        let n = shared.get_normalized(EqParam::PeakFreq.index()).unwrap();
        assert!((n - 0.5).abs() < 1e-4);

        // Slopes snap to whole ordinals.
        shared.set_normalized(EqParam::LowCutSlope.index(), 0.6);
        assert_eq!(shared.value(EqParam::LowCutSlope), 2.0);

        shared.set_normalized(EqParam::PeakGain.index(), 7.0);
        assert_eq!(shared.value(EqParam::PeakGain), 12.0);
        assert_eq!(shared.get_normalized(99), None);
    }

    #[test]
    fn index_lookup() {
        let shared = VxtShared::new();
        assert_eq!(shared.index_by_id(100), Some(0));
        assert_eq!(shared.index_by_id(106), Some(6));
        assert_eq!(shared.index_by_id(999), None);
        assert_eq!(shared.index_by_name("PeakFreq"), Some(4));
        assert_eq!(shared.index_by_name("peakfreq"), Some(4));
        assert_eq!(shared.index_by_name("high_cut_slope"), Some(3));
        assert_eq!(shared.index_by_name("Mix"), None);
    }

    #[test]
    fn out_of_range_safe() {
        let shared = VxtShared::new();
        assert_eq!(shared.get_value(999), None);
        assert!(shared.descriptor(999).is_none());
        shared.set_value(999, 1.0);
        assert!(!shared.take_changed());
    }

    #[test]
    fn dirty_flag_coalesces_bursts() {
        let shared = VxtShared::new();
        assert!(!shared.take_changed());

        shared.set_param(EqParam::PeakFreq, 500.0);
        shared.set_param(EqParam::PeakGain, 3.0);
        shared.set_param(EqParam::PeakQ, 2.0);
        assert!(shared.take_changed());
        assert!(!shared.take_changed());

        // Writing the same value again is not a change.
        shared.set_param(EqParam::PeakQ, 2.0);
        assert!(!shared.take_changed());
    }

    #[test]
    fn listeners_receive_changes_until_unsubscribed() {
        let shared = VxtShared::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&seen);
        let id = shared.subscribe(move |index, value| {
            sink.lock().unwrap().push((index, value));
        });
        assert_eq!(shared.listener_count(), 1);

        shared.set_param(EqParam::HighCut, 8000.0);
        shared.set_param(EqParam::LowCutSlope, 3.0);
        assert!(shared.unsubscribe(id));
        assert!(!shared.unsubscribe(id));
        shared.set_param(EqParam::HighCut, 9000.0);

        let seen = seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![
                (ParamIndex(EqParam::HighCut.index()), 8000.0),
                (ParamIndex(EqParam::LowCutSlope.index()), 3.0),
            ]
        );
        assert_eq!(shared.listener_count(), 0);
    }

    #[test]
    fn clones_share_state() {
        let shared = VxtShared::new();
        let editor = shared.clone();
        editor.set_param(EqParam::PeakGain, -12.0);
        assert_eq!(shared.value(EqParam::PeakGain), -12.0);
        assert!(shared.take_changed());
        assert!(!editor.take_changed());
    }

    #[test]
    fn snapshot_handoff() {
        let shared = VxtShared::new();
        assert!(shared.committed_snapshot().is_none());

        let snapshot = ChainSnapshot::design(&shared.chain_settings(), 48000.0).unwrap();
        shared.publish_snapshot(&snapshot);
        assert_eq!(shared.committed_snapshot(), Some(snapshot));
    }
}
