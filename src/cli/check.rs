use std::time::Instant;

use crate::driver::{CheckOptions, Driver};

pub(super) fn action(driver: &mut Driver, options: CheckOptions) -> anyhow::Result<()> {
    let start_time = Instant::now();
    log::info!("Checking {}...", options.manifest.display());
    let report = match driver.check(&options) {
        Ok(report) => report,
        Err(errs) => {
            driver.emit_errors(errs);
            log::error!("{} errors emitted", driver.errors_emitted);
            return Ok(());
        }
    };

    driver.emit_report(&report);
    if report.has_errors() {
        log::error!("{} errors emitted", report.error_count());
    } else {
        log::info!("No errors found in {:?}", start_time.elapsed());
    }
    Ok(())
}
