//! Dashboard command handler.

use crate::clock::SystemClock;
use crate::config::Config;
use crate::dashboard::run_dashboard;
use crate::driver::Driver;
use crate::error::Result;
use crate::fixtures::DataProvider;

use super::build_dashboard;

/// Open the interactive dashboard and block until the user quits.
pub fn dashboard_command(provider: &dyn DataProvider, config: &Config) -> Result<()> {
    let dashboard = build_dashboard(provider, config);
    tracing::debug!(
        projects = dashboard.catalog().len(),
        view_mode = dashboard.view_mode().name(),
        "Opening dashboard"
    );
    let driver = Driver::new(dashboard, SystemClock::new(), config.timing());
    run_dashboard(driver)
}
