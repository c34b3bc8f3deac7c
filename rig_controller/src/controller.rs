//! Controller orchestration.
//!
//! Connect → home → spawn sampler and dispatcher → wait for shutdown →
//! park → disconnect. The running flag and the store are shared with signal
//! handlers and external bridges through [`MotionController::running_flag`]
//! and [`MotionController::store`].

use crate::dispatch::{DispatchStats, Dispatcher};
use crate::error::ControllerError;
use crate::safety::AlarmRecoveryMonitor;
use crate::sampler::{Sampler, SamplerStats};
use crate::startup::{initialize_axes, park_axes};
use crate::telemetry::{TelemetrySource, TelemetryStore};
use rig_common::actuator::ActuatorDriver;
use rig_common::controller::config::ControllerConfig;
use rig_common::types::ShakePosition;
use rig_hal::connect_any;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use tracing::{error, info};

/// Totals from a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub sampler: SamplerStats,
    pub dispatch: DispatchStats,
    /// Every axis reached home during the shutdown park.
    pub parked: bool,
}

/// Top-level controller.
pub struct MotionController {
    config: ControllerConfig,
    store: Arc<TelemetryStore>,
    running: Arc<AtomicBool>,
}

impl MotionController {
    /// Create a controller. The running flag starts set.
    pub fn new(config: ControllerConfig) -> Self {
        Self {
            config,
            store: Arc::new(TelemetryStore::new()),
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Shared store, for bridges pushing samples or shake orders.
    pub fn store(&self) -> Arc<TelemetryStore> {
        Arc::clone(&self.store)
    }

    /// Running flag, for signal handlers.
    pub fn running_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.running)
    }

    /// Enqueue a shake effect.
    pub fn request_shake(&self, position: ShakePosition, shake_left: bool, shake_right: bool) {
        self.store.request_shake_with(position, shake_left, shake_right);
    }

    /// Request shutdown and wake the dispatcher.
    pub fn shutdown(&self) {
        info!("Shutdown requested");
        self.running.store(false, Ordering::Release);
        self.store.wake_all();
    }

    /// Run the controller until shutdown or a fatal error.
    ///
    /// The axes are parked and the driver disconnected on every exit path
    /// after a successful connect, except when the dispatcher thread panicked
    /// and took the driver with it.
    ///
    /// # Errors
    /// Connection failure, startup failure, a lost telemetry channel, or a
    /// panicked worker thread.
    pub fn run(
        &self,
        mut driver: Box<dyn ActuatorDriver>,
        source: Box<dyn TelemetrySource>,
    ) -> Result<RunSummary, ControllerError> {
        let port = connect_any(driver.as_mut(), &self.config.driver)?;
        info!("Connected '{}' on {}", driver.name(), port);

        let mut monitor = AlarmRecoveryMonitor::new(self.config.recovery);
        let previous =
            match initialize_axes(driver.as_mut(), &mut monitor, &self.config, &self.running) {
                Ok(previous) => previous,
                Err(e) => {
                    error!("Startup failed: {}", e);
                    park_axes(driver.as_mut(), &self.config);
                    driver.disconnect();
                    return Err(e);
                }
            };

        let dispatcher = Dispatcher::new(
            driver,
            Arc::clone(&self.store),
            Arc::clone(&self.running),
            &self.config,
            monitor,
            previous,
        );
        let dispatch_handle = thread::Builder::new()
            .name("rig-dispatch".to_string())
            .spawn(move || dispatcher.run())?;

        let sampler = Sampler::new(
            source,
            Arc::clone(&self.store),
            Arc::clone(&self.running),
            &self.config.telemetry,
        );
        let sampler_result = match thread::Builder::new()
            .name("rig-sampler".to_string())
            .spawn(move || sampler.run())
        {
            Ok(handle) => handle
                .join()
                .map_err(|_| ControllerError::ThreadPanicked("sampler")),
            Err(e) => Err(ControllerError::Io(e)),
        };

        self.shutdown();
        let (mut driver, dispatch) = dispatch_handle
            .join()
            .map_err(|_| ControllerError::ThreadPanicked("dispatcher"))?;

        let parked = park_axes(driver.as_mut(), &self.config);
        driver.disconnect();

        let sampler = sampler_result??;
        Ok(RunSummary {
            sampler,
            dispatch,
            parked,
        })
    }
}
