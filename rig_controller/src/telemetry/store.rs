//! Shared telemetry store.
//!
//! One `parking_lot::Mutex` guards the latest sample, the ready flag and the
//! shake queue; a `Condvar` wakes the dispatcher when a sample lands. Samples
//! coalesce: a dispatcher that wakes late sees only the newest one.

use crate::cue::clamp_angular_velocity;
use parking_lot::{Condvar, Mutex};
use rig_common::types::{wrap_degrees, ShakeOrder, ShakePosition, TelemetrySample};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Default)]
struct Shared {
    sample: TelemetrySample,
    ready: bool,
    shake_queue: VecDeque<ShakeOrder>,
    published: u64,
}

/// Latest sample, shake queue and ready signal behind one lock.
#[derive(Debug, Default)]
pub struct TelemetryStore {
    inner: Mutex<Shared>,
    ready: Condvar,
}

impl TelemetryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ─── Producer side ──────────────────────────────────────────────

    /// Replace the sample and signal the dispatcher.
    pub fn publish(&self, sample: TelemetrySample) {
        {
            let mut shared = self.inner.lock();
            shared.sample = sample;
            shared.ready = true;
            shared.published += 1;
        }
        self.ready.notify_one();
    }

    /// Set the three angles in degrees. Values are wrapped into `[0, 360)`.
    ///
    /// A non-finite angle leaves that field at its previous value.
    /// Does not signal; call [`Self::notify_ready`] once the sample is complete.
    pub fn set_angles(&self, pitch: f64, yaw: f64, roll: f64) {
        let mut shared = self.inner.lock();
        let sample = &mut shared.sample;
        for (name, field, value) in [
            ("pitch", &mut sample.pitch, pitch),
            ("yaw", &mut sample.yaw, yaw),
            ("roll", &mut sample.roll, roll),
        ] {
            if value.is_finite() {
                *field = wrap_degrees(value);
            } else {
                debug!("Ignoring non-finite {} angle: {}", name, value);
            }
        }
    }

    /// Set the angular velocity in rad/s. Non-finite input is ignored.
    pub fn set_angular_velocity(&self, angular_velocity_y: f64) {
        if !angular_velocity_y.is_finite() {
            debug!("Ignoring non-finite angular velocity: {}", angular_velocity_y);
            return;
        }
        self.inner.lock().sample.angular_velocity_y = angular_velocity_y;
    }

    /// Set the (already scaled) velocity magnitude. Non-finite input is ignored.
    pub fn set_velocity(&self, velocity: f64) {
        if !velocity.is_finite() {
            debug!("Ignoring non-finite velocity: {}", velocity);
            return;
        }
        self.inner.lock().sample.velocity = velocity.max(0.0);
    }

    /// Signal that the current sample is ready.
    pub fn notify_ready(&self) {
        {
            let mut shared = self.inner.lock();
            shared.ready = true;
            shared.published += 1;
        }
        self.ready.notify_one();
    }

    /// Enqueue a shake order. FIFO, unbounded, no deduplication.
    pub fn request_shake(&self, order: ShakeOrder) {
        let depth = {
            let mut shared = self.inner.lock();
            shared.shake_queue.push_back(order);
            shared.shake_queue.len()
        };
        debug!("Shake requested ({}), queue depth {}", order.position, depth);
    }

    /// Enqueue a shake order from its parts.
    pub fn request_shake_with(&self, position: ShakePosition, shake_left: bool, shake_right: bool) {
        self.request_shake(ShakeOrder {
            position,
            shake_left,
            shake_right,
        });
    }

    // ─── Consumer side ──────────────────────────────────────────────

    /// Block until a sample is ready or `running` goes false.
    ///
    /// Clears the ready flag, clamps the stored angular velocity and returns a
    /// copy. The lock is released on return. `slice` bounds each wait so the
    /// running flag is re-checked even without a wake-up.
    pub fn wait_ready(&self, running: &AtomicBool, slice: Duration) -> Option<TelemetrySample> {
        let mut shared = self.inner.lock();
        loop {
            if shared.ready {
                shared.ready = false;
                shared.sample.angular_velocity_y =
                    clamp_angular_velocity(shared.sample.angular_velocity_y);
                return Some(shared.sample);
            }
            if !running.load(Ordering::Acquire) {
                return None;
            }
            self.ready.wait_for(&mut shared, slice);
        }
    }

    /// Pop the oldest shake order when `eligible`, else leave the queue alone.
    pub fn take_shake_if(&self, eligible: bool) -> Option<ShakeOrder> {
        if !eligible {
            return None;
        }
        self.inner.lock().shake_queue.pop_front()
    }

    /// Wake every waiter so it can observe a cleared running flag.
    pub fn wake_all(&self) {
        let _guard = self.inner.lock();
        self.ready.notify_all();
    }

    // ─── Inspection ─────────────────────────────────────────────────

    /// Copy of the current sample.
    pub fn snapshot(&self) -> TelemetrySample {
        self.inner.lock().sample
    }

    /// Queued shake orders.
    pub fn pending_shakes(&self) -> usize {
        self.inner.lock().shake_queue.len()
    }

    /// Samples signalled since creation.
    pub fn published(&self) -> u64 {
        self.inner.lock().published
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    const SLICE: Duration = Duration::from_millis(5);

    #[test]
    fn publish_then_wait_returns_sample_once() {
        let store = TelemetryStore::new();
        let running = AtomicBool::new(true);
        store.publish(TelemetrySample::new(1.0, 2.0, 3.0, 0.5, 4.0));

        let sample = store.wait_ready(&running, SLICE).unwrap();
        assert_eq!(sample.roll, 3.0);

        running.store(false, Ordering::Release);
        assert!(store.wait_ready(&running, SLICE).is_none());
    }

    #[test]
    fn samples_coalesce() {
        let store = TelemetryStore::new();
        let running = AtomicBool::new(true);
        store.publish(TelemetrySample::new(1.0, 0.0, 0.0, 0.0, 0.0));
        store.publish(TelemetrySample::new(2.0, 0.0, 0.0, 0.0, 0.0));

        assert_eq!(store.wait_ready(&running, SLICE).unwrap().pitch, 2.0);
        assert_eq!(store.published(), 2);
        running.store(false, Ordering::Release);
        assert!(store.wait_ready(&running, SLICE).is_none());
    }

    #[test]
    fn wait_clamps_angular_velocity() {
        let store = TelemetryStore::new();
        let running = AtomicBool::new(true);
        store.set_angular_velocity(9.5);
        store.notify_ready();

        let sample = store.wait_ready(&running, SLICE).unwrap();
        assert_eq!(sample.angular_velocity_y, 6.0);
        assert_eq!(store.snapshot().angular_velocity_y, 6.0);
    }

    #[test]
    fn setters_wrap_angles_without_signalling() {
        let store = TelemetryStore::new();
        store.set_angles(-10.0, 370.0, 5.0);
        store.set_velocity(-3.0);

        let sample = store.snapshot();
        assert_eq!(sample.pitch, 350.0);
        assert!((sample.yaw - 10.0).abs() < 1e-9);
        assert_eq!(sample.velocity, 0.0);
        assert_eq!(store.published(), 0);
    }

    #[test]
    fn setters_keep_previous_value_on_non_finite_input() {
        let store = TelemetryStore::new();
        store.set_angles(10.0, 20.0, 30.0);
        store.set_angular_velocity(1.5);
        store.set_velocity(4.0);

        store.set_angles(f64::NAN, f64::INFINITY, f64::NAN);
        store.set_angular_velocity(f64::NAN);
        store.set_velocity(f64::INFINITY);

        let sample = store.snapshot();
        assert_eq!(sample.pitch, 10.0);
        assert_eq!(sample.yaw, 20.0);
        assert_eq!(sample.roll, 30.0);
        assert_eq!(sample.angular_velocity_y, 1.5);
        assert_eq!(sample.velocity, 4.0);

        // Finite channels still update alongside a rejected one.
        store.set_angles(-90.0, f64::NEG_INFINITY, 45.0);
        let sample = store.snapshot();
        assert_eq!(sample.pitch, 270.0);
        assert_eq!(sample.yaw, 20.0);
        assert_eq!(sample.roll, 45.0);
    }

    #[test]
    fn shake_queue_is_fifo_and_gated() {
        let store = TelemetryStore::new();
        store.request_shake(ShakeOrder::new(ShakePosition::Front));
        store.request_shake_with(ShakePosition::Rear, true, false);
        store.request_shake(ShakeOrder::new(ShakePosition::Front));
        assert_eq!(store.pending_shakes(), 3);

        assert!(store.take_shake_if(false).is_none());
        assert_eq!(store.pending_shakes(), 3);

        assert_eq!(store.take_shake_if(true).unwrap().position, ShakePosition::Front);
        let rear = store.take_shake_if(true).unwrap();
        assert_eq!(rear.position, ShakePosition::Rear);
        assert!(!rear.shake_right);
        assert_eq!(store.pending_shakes(), 1);
    }

    #[test]
    fn waiter_wakes_on_publish_from_other_thread() {
        let store = Arc::new(TelemetryStore::new());
        let running = Arc::new(AtomicBool::new(true));

        let waiter = {
            let store = Arc::clone(&store);
            let running = Arc::clone(&running);
            thread::spawn(move || store.wait_ready(&running, Duration::from_millis(50)))
        };
        thread::sleep(Duration::from_millis(10));
        store.publish(TelemetrySample::new(7.0, 0.0, 0.0, 0.0, 0.0));

        assert_eq!(waiter.join().unwrap().unwrap().pitch, 7.0);
    }

    #[test]
    fn waiter_exits_on_shutdown() {
        let store = Arc::new(TelemetryStore::new());
        let running = Arc::new(AtomicBool::new(true));

        let waiter = {
            let store = Arc::clone(&store);
            let running = Arc::clone(&running);
            thread::spawn(move || store.wait_ready(&running, Duration::from_secs(5)))
        };
        thread::sleep(Duration::from_millis(10));
        running.store(false, Ordering::Release);
        store.wake_all();

        assert!(waiter.join().unwrap().is_none());
    }
}
