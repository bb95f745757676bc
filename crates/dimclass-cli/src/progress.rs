use std::io::{self, IsTerminal};

use dimclass_cli::run::RunProgress;
use indicatif::{ProgressBar, ProgressStyle};

const TEMPLATE: &str = "{spinner} classifying [{bar:40}] {pos}/{len} options ({per_sec}, {eta})";

/// Progress bar over distinct options, drawn on stderr.
pub struct ProgressReporter {
    bar: ProgressBar,
}

impl ProgressReporter {
    /// A visible bar when stderr is a terminal, hidden otherwise.
    pub fn for_stderr(enabled: bool) -> Self {
        let bar = if enabled && io::stderr().is_terminal() {
            let bar = ProgressBar::new(0);
            if let Ok(style) = ProgressStyle::with_template(TEMPLATE) {
                bar.set_style(style.progress_chars("=> "));
            }
            bar
        } else {
            ProgressBar::hidden()
        };
        Self { bar }
    }
}

impl RunProgress for ProgressReporter {
    fn start(&self, distinct_options: u64) {
        self.bar.set_length(distinct_options);
        self.bar.set_position(0);
    }

    fn parsed(&self) {
        self.bar.inc(1);
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
