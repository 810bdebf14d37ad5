#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Terminal plumbing shared by the wildfire binaries.
//!
//! [`IndicatifProgress`] renders loader and catalogue progress through
//! `indicatif`, and [`init_logger`] routes `log` output through
//! `indicatif-log-bridge` so log lines are printed above the bars instead
//! of tearing them.

use std::sync::Arc;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use wildfire_source::progress::ProgressCallback;

pub use indicatif::MultiProgress;

const TICK: Duration = Duration::from_millis(120);

/// An `indicatif` [`ProgressBar`] behind [`ProgressCallback`].
pub struct IndicatifProgress {
    bar: ProgressBar,
    /// Style to switch to when a total becomes known. `None` keeps the
    /// spinner for the whole run.
    sized_style: Option<ProgressStyle>,
}

fn ticking_spinner(multi: &MultiProgress, template: &str, message: &str) -> ProgressBar {
    let style =
        ProgressStyle::with_template(template).unwrap_or_else(|_| ProgressStyle::default_spinner());
    let spinner = multi.add(ProgressBar::new_spinner().with_style(style));
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(TICK);
    spinner
}

impl IndicatifProgress {
    /// Spinner for a CSV load. The row count is unknown until the file has
    /// been read, so this only counts rows.
    #[must_use]
    pub fn rows_spinner(multi: &MultiProgress, message: &str) -> Arc<dyn ProgressCallback> {
        let bar = ticking_spinner(
            multi,
            "{spinner:.cyan} {msg} {human_pos} rows [{elapsed}]",
            message,
        );
        Arc::new(Self {
            bar,
            sized_style: None,
        })
    }

    /// Bar for the table catalogue. Spins until the builder reports how many
    /// tables it will produce.
    #[must_use]
    pub fn tables_bar(multi: &MultiProgress, message: &str) -> Arc<dyn ProgressCallback> {
        let bar = ticking_spinner(multi, "{spinner:.green} {msg}", message);
        let sized = ProgressStyle::with_template(
            "{msg} {wide_bar:.green/dim} {pos}/{len} tables [{elapsed_precise}]",
        )
        .map(|style| style.progress_chars("=> "))
        .unwrap_or_else(|_| ProgressStyle::default_bar());

        Arc::new(Self {
            bar,
            sized_style: Some(sized),
        })
    }
}

impl ProgressCallback for IndicatifProgress {
    fn set_total(&self, total: u64) {
        if let Some(style) = &self.sized_style {
            self.bar.set_style(style.clone());
            self.bar.set_length(total);
            self.bar.reset();
        }
    }

    fn inc(&self, delta: u64) {
        self.bar.inc(delta);
    }

    fn set_message(&self, msg: String) {
        self.bar.set_message(msg);
    }

    fn finish(&self, msg: String) {
        self.bar.finish_with_message(msg);
    }
}

/// Installs `pretty_env_logger` behind `indicatif-log-bridge` and returns
/// the [`MultiProgress`] every bar must be added to.
///
/// Defaults to `info`; `RUST_LOG` refines or overrides that.
#[must_use]
pub fn init_logger() -> MultiProgress {
    let multi = MultiProgress::new();

    let logger = pretty_env_logger::formatted_builder()
        .filter_level(log::LevelFilter::Info)
        .parse_env("RUST_LOG")
        .build();
    let max_level = logger.filter();

    // Already installed when running under the test harness.
    if indicatif_log_bridge::LogWrapper::new(multi.clone(), logger)
        .try_init()
        .is_ok()
    {
        log::set_max_level(max_level);
    }

    multi
}
