//! Batch OLS regression reports: regional health-infrastructure indicators
//! against mortality rates, one summary per predictor/response pair, printed
//! to stdout in a fixed order.

use std::io;

use mortreg::{run, ReportConfig, ReportError};

fn main() -> Result<(), ReportError> {
    tracing_subscriber::fmt().with_writer(io::stderr).init();
    run(&ReportConfig::default(), &mut io::stdout().lock())
}
