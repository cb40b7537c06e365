//! Progress reporting for comparisons
//!
//! The comparator announces every phase change and build step as a
//! [`ComparisonEvent`]. Collectors decide what to do with them: nothing, a
//! terminal spinner, or an in-memory log for tests.

use std::fmt;
use std::io::IsTerminal;
use std::sync::Arc;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use parking_lot::Mutex;

use super::error::BuildStep;
use crate::fmt::format_bytes;

/// Phase of a branch comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Not started
    Idle,
    /// Preparing the working directory (and cloning)
    Initializing,
    /// Building the branch under review
    BuildingCurrent,
    /// Measuring the branch under review
    MeasuringCurrent,
    /// Removing the first build's artifacts
    CleaningArtifacts,
    /// Building the branch compared against
    BuildingTarget,
    /// Measuring the branch compared against
    MeasuringTarget,
    /// Assembling the report
    Reporting,
    /// Scratch state removed
    Destroyed,
    /// Aborted by a fatal error
    Failed,
}

impl Phase {
    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Idle => "Idle",
            Phase::Initializing => "Initializing",
            Phase::BuildingCurrent => "Building current branch",
            Phase::MeasuringCurrent => "Measuring current branch",
            Phase::CleaningArtifacts => "Cleaning artifacts",
            Phase::BuildingTarget => "Building target branch",
            Phase::MeasuringTarget => "Measuring target branch",
            Phase::Reporting => "Reporting",
            Phase::Destroyed => "Cleaned up",
            Phase::Failed => "Failed",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Something worth reporting while a comparison runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComparisonEvent {
    /// The comparator moved to a new phase
    PhaseEntered(Phase),
    /// A build step started for a revision
    StepStarted {
        /// Step
        step: BuildStep,
        /// Revision
        revision: String,
    },
    /// A revision was measured
    BranchMeasured {
        /// Revision
        revision: String,
        /// Files counted
        files: usize,
        /// Sum of their sizes
        total_bytes: u64,
    },
    /// The comparison aborted
    Failed {
        /// Phase that was running
        phase: Phase,
        /// Error message
        message: String,
    },
    /// A cleanup action did not complete
    CleanupWarning(String),
}

impl fmt::Display for ComparisonEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComparisonEvent::PhaseEntered(phase) => write!(f, "{}", phase),
            ComparisonEvent::StepStarted { step, revision } => {
                write!(f, "{} ({})", step, revision)
            }
            ComparisonEvent::BranchMeasured {
                revision,
                files,
                total_bytes,
            } => write!(
                f,
                "{}: {} files, {}",
                revision,
                files,
                format_bytes(*total_bytes)
            ),
            ComparisonEvent::Failed { phase, message } => {
                write!(f, "{} failed: {}", phase, message)
            }
            ComparisonEvent::CleanupWarning(message) => write!(f, "cleanup: {}", message),
        }
    }
}

/// Trait for pluggable progress collection
pub trait ProgressCollector: Send + Sync {
    /// Collector name
    fn name(&self) -> &str;

    /// Record one event
    fn record_event(&self, event: ComparisonEvent);

    /// Flush or tear down any display
    fn finish(&self) {}
}

impl<T: ProgressCollector + ?Sized> ProgressCollector for Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn record_event(&self, event: ComparisonEvent) {
        (**self).record_event(event)
    }

    fn finish(&self) {
        (**self).finish()
    }
}

/// No-op collector (default)
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpCollector;

impl ProgressCollector for NoOpCollector {
    fn name(&self) -> &str {
        "noop"
    }

    fn record_event(&self, _event: ComparisonEvent) {}
}

/// Terminal spinner driven by comparison events.
///
/// Stays hidden when stdout is not a terminal or `NO_COLOR` is set, so CI
/// logs only get the final tables.
pub struct SpinnerCollector {
    bar: Option<ProgressBar>,
}

impl SpinnerCollector {
    /// Create a spinner, shown only when `enabled` and interactive
    pub fn new(enabled: bool) -> Self {
        let bar = (enabled && is_interactive()).then(|| {
            let bar = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
                bar.set_style(
                    style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", " "]),
                );
            }
            bar.enable_steady_tick(Duration::from_millis(80));
            bar
        });
        Self { bar }
    }

    /// Whether a spinner is actually drawn
    pub fn is_visible(&self) -> bool {
        self.bar.is_some()
    }
}

impl ProgressCollector for SpinnerCollector {
    fn name(&self) -> &str {
        "spinner"
    }

    fn record_event(&self, event: ComparisonEvent) {
        log::info!("{}", event);
        let Some(bar) = &self.bar else {
            return;
        };
        match &event {
            ComparisonEvent::BranchMeasured { .. } | ComparisonEvent::CleanupWarning(_) => {
                bar.println(format!("    {}", event));
            }
            ComparisonEvent::Failed { .. } => bar.println(format!("  {}", event)),
            _ => bar.set_message(event.to_string()),
        }
    }

    fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}

impl Drop for SpinnerCollector {
    fn drop(&mut self) {
        self.finish();
    }
}

fn is_interactive() -> bool {
    std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none()
}

/// In-memory collector for testing
#[derive(Debug, Clone, Default)]
pub struct MemoryCollector {
    events: Arc<Mutex<Vec<ComparisonEvent>>>,
}

impl MemoryCollector {
    /// Create a new memory collector
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded events
    pub fn events(&self) -> Vec<ComparisonEvent> {
        self.events.lock().clone()
    }

    /// Phases entered, in order
    pub fn phases(&self) -> Vec<Phase> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                ComparisonEvent::PhaseEntered(phase) => Some(*phase),
                _ => None,
            })
            .collect()
    }

    /// Clear all recorded data
    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl ProgressCollector for MemoryCollector {
    fn name(&self) -> &str {
        "memory"
    }

    fn record_event(&self, event: ComparisonEvent) {
        self.events.lock().push(event);
    }
}
