//! Reconciler shared between execution contexts
//!
//! Each event is a read-modify-write on the attribute store. When the host
//! can deliver notifications from more than one context, the whole sequence
//! must run under a lock so two events cannot interleave between the read
//! of the paired attribute and the corrective write.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;

use super::attribute::AttributeChange;
use super::reconciler::{ModePercentReconciler, Outcome, ReconcileError};
use crate::traits::{AttributeStore, DutyActuator};

/// Reconciler guarded by a blocking mutex
///
/// `M` selects the locking strategy: `CriticalSectionRawMutex` when
/// notifications may arrive from interrupts or other cores,
/// `NoopRawMutex` when delivery is already serialized. The lock spans all
/// endpoints.
///
/// Collaborators must not call back into the same `SharedReconciler` while
/// an event is being handled.
pub struct SharedReconciler<M: RawMutex, S, A> {
    inner: Mutex<M, RefCell<ModePercentReconciler<S, A>>>,
}

impl<M: RawMutex, S: AttributeStore, A: DutyActuator> SharedReconciler<M, S, A> {
    pub const fn new(reconciler: ModePercentReconciler<S, A>) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(reconciler)),
        }
    }

    /// See [`ModePercentReconciler::on_attribute_changed`]
    pub fn on_attribute_changed(&self, change: AttributeChange) -> Result<Outcome, ReconcileError> {
        self.with(|r| r.on_attribute_changed(change))
    }

    /// See [`ModePercentReconciler::handle_update`]
    pub fn handle_update(&self, change: AttributeChange) -> Result<Outcome, ReconcileError> {
        self.with(|r| r.handle_update(change))
    }

    /// Run `f` with exclusive access to the reconciler
    pub fn with<R>(&self, f: impl FnOnce(&mut ModePercentReconciler<S, A>) -> R) -> R {
        self.inner.lock(|cell| f(&mut cell.borrow_mut()))
    }
}
