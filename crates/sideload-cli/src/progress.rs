//! Terminal progress: a spinner while names are resolved, a bar over folders
//! while uploading. Hidden when stderr is not a terminal or `--quiet` is set.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::ui;

const SPINNER_TEMPLATE: &str = "{spinner:.cyan} {msg}";
const FOLDER_TEMPLATE: &str = "{bar:30.cyan/blue} {pos}/{len} folders  {msg}";
const NARROW_FOLDER_TEMPLATE: &str = "{wide_bar:.cyan/blue} {pos}/{len}";

pub struct Progress {
    bar: Option<ProgressBar>,
}

fn folder_template() -> &'static str {
    let narrow = std::env::var("COLUMNS")
        .ok()
        .and_then(|columns| columns.parse::<usize>().ok())
        .is_some_and(|columns| columns < 80);
    if narrow {
        NARROW_FOLDER_TEMPLATE
    } else {
        FOLDER_TEMPLATE
    }
}

fn styled(bar: ProgressBar, template: &str) -> ProgressBar {
    match ProgressStyle::with_template(template) {
        Ok(style) => bar.with_style(style),
        Err(_) => bar,
    }
}

impl Progress {
    #[must_use]
    pub fn spinner(message: &str) -> Self {
        let bar = ui::prefs().progress.then(|| {
            let bar = styled(ProgressBar::new_spinner(), SPINNER_TEMPLATE);
            bar.enable_steady_tick(Duration::from_millis(100));
            bar.set_message(message.to_string());
            bar
        });
        Self { bar }
    }

    /// Bar over `total` folders.
    #[must_use]
    pub fn folders(total: usize) -> Self {
        let total = u64::try_from(total).unwrap_or(u64::MAX);
        let bar = ui::prefs()
            .progress
            .then(|| styled(ProgressBar::new(total), folder_template()));
        Self { bar }
    }

    pub fn start_folder(&self, dataset: &str, folder: &str) {
        if let Some(bar) = &self.bar {
            bar.set_message(format!("{dataset} {folder}"));
        }
    }

    /// Advance by one folder, printing `line` above the bar when given.
    pub fn finish_folder(&self, line: Option<&str>) {
        match (&self.bar, line) {
            (Some(bar), Some(line)) => {
                bar.println(line);
                bar.inc(1);
            }
            (Some(bar), None) => bar.inc(1),
            (None, Some(line)) => eprintln!("{line}"),
            (None, None) => {}
        }
    }

    pub fn clear(self) {
        if let Some(bar) = self.bar {
            bar.finish_and_clear();
        }
    }
}
