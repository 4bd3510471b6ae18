use indicatif::{ProgressBar, ProgressStyle};

const BAR_TEMPLATE: &str = "[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}";

/// Create a standard progress bar style
pub fn create_progress_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template(BAR_TEMPLATE)
        .map(|style| style.progress_chars("█▓▒░"))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
}

/// Progress bar for a fan-out of `len` tasks; hidden when `silent`
pub fn task_progress(len: usize, message: &str, silent: bool) -> ProgressBar {
    if silent {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(len as u64);
    pb.set_style(create_progress_style());
    pb.set_message(message.to_string());
    pb
}
