//! Progress feedback for oil test sessions.
//!
//! Bars are drawn on stderr and hidden when stderr is not a terminal or
//! when quiet mode is requested (`--quiet` or `FOODOILIQ_QUIET`).

use crate::session::{PhaseObserver, TestPhase};
use indicatif::{ProgressBar, ProgressStyle};

pub const TEMPLATE_TEST: &str = "{spinner} [{bar:30}] {pos:>3}% {msg}";

#[derive(Debug, Clone, Default)]
pub struct ProgressConfig {
    pub quiet_mode: bool,
}

impl ProgressConfig {
    pub fn from_env(quiet: bool) -> Self {
        let env_quiet = std::env::var("FOODOILIQ_QUIET").is_ok();
        Self {
            quiet_mode: quiet || env_quiet,
        }
    }

    pub fn should_show_progress(&self) -> bool {
        if self.quiet_mode {
            return false;
        }

        use std::io::IsTerminal;
        std::io::stderr().is_terminal()
    }
}

/// Mirrors test session phases onto a percentage bar.
pub struct TestProgress {
    bar: ProgressBar,
}

impl TestProgress {
    pub fn new(config: &ProgressConfig) -> Self {
        if !config.should_show_progress() {
            return Self {
                bar: ProgressBar::hidden(),
            };
        }

        let bar = ProgressBar::new(100);
        bar.set_style(
            ProgressStyle::default_bar()
                .template(TEMPLATE_TEST)
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▓▒░  "),
        );
        bar.set_message(TestPhase::Idle.message());
        Self { bar }
    }

    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    /// Clears the bar so that final output is not interleaved with it.
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl PhaseObserver for TestProgress {
    fn on_phase(&self, phase: TestPhase, progress: u8) {
        self.bar.set_position(u64::from(progress));
        self.bar.set_message(phase.message());
        if phase == TestPhase::Error {
            self.bar.abandon_with_message(phase.message());
        }
    }
}
