//! Shared state for one capture or replay run.
//!
//! Holds the cursor controller, the configuration with its regions already
//! mapped onto the actual display, and the stop flag the hotkey sets.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::config::{Config, Regions};
use crate::driver::InputDriver;
use crate::error::{Error, Result};
use crate::motion::ScreenController;

/// Stop flag shared between the hotkey thread and a running pipeline.
#[derive(Clone, Debug, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Everything a pipeline step needs.
pub struct AutomationContext {
    pub controller: Arc<ScreenController>,
    pub config: Config,
    /// `config.regions` mapped onto the actual display
    pub regions: Regions,
    pub stop: StopSignal,
}

impl AutomationContext {
    /// Builds a context, scaling the configured regions to the driver's
    /// screen.
    pub fn new(controller: ScreenController, config: Config, stop: StopSignal) -> Result<Self> {
        let screen = controller.driver().screen_size()?;
        let regions = config.regions_for(screen);
        crate::log(&format!(
            "Display {}x{}, design {}x{}, scaling {}, human movement {}",
            screen.width,
            screen.height,
            config.design_resolution.width,
            config.design_resolution.height,
            if config.scale_regions { "on" } else { "off" },
            if controller.is_human() { "on" } else { "off" }
        ));

        Ok(Self {
            controller: Arc::new(controller),
            config,
            regions,
            stop,
        })
    }

    pub fn driver(&self) -> &Arc<dyn InputDriver> {
        self.controller.driver()
    }

    /// Fails with `Error::Aborted` once a stop has been requested.
    pub fn check_stop(&self) -> Result<()> {
        if self.stop.is_requested() {
            crate::log("Stop requested, aborting run");
            return Err(Error::Aborted);
        }
        Ok(())
    }

    pub fn typing_interval(&self) -> Duration {
        Duration::from_millis(self.config.typing_interval_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.config.settle_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Point, ScreenSize};
    use crate::testing::FakeDriver;

    #[test]
    fn test_stop_signal_is_shared_between_clones() {
        let stop = StopSignal::new();
        let hotkey_side = stop.clone();
        assert!(!stop.is_requested());

        hotkey_side.request();
        assert!(stop.is_requested());
        assert!(!StopSignal::new().is_requested());
    }

    #[test]
    fn test_context_scales_regions_and_checks_stop() {
        let driver = Arc::new(FakeDriver::new(ScreenSize::new(1280, 720)));
        let stop = StopSignal::new();
        let ctx = AutomationContext::new(
            ScreenController::with_seed(driver, false, 0),
            Config::default(),
            stop.clone(),
        )
        .unwrap();

        assert_eq!(ctx.regions.safe_edge, Point::new(1175.0, 290.0));
        assert!(ctx.check_stop().is_ok());

        stop.request();
        assert!(matches!(ctx.check_stop(), Err(Error::Aborted)));
    }
}
