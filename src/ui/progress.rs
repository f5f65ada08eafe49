use crate::loader::LoadStats;
use crate::ui::progress_message::{ProgressMessage, ProgressPhase};
use crate::ui::{Icons, theme};
use indicatif::{HumanDuration, MultiProgress, ProgressBar};
use owo_colors::OwoColorize;
use std::thread;
use std::time::Duration;

/// Two progress bars (employers, vacancies) driven from a channel, so the
/// loader only needs a `Sender`.
pub struct ProgressManager {
    mp: MultiProgress,
    handle: Option<thread::JoinHandle<()>>,
}

impl ProgressManager {
    pub fn new() -> (Self, crossbeam::channel::Sender<ProgressMessage>) {
        let (tx, rx) = crossbeam::channel::unbounded::<ProgressMessage>();

        let mp = MultiProgress::new();
        let visible = console::Term::stdout().is_term();

        let employers = if visible {
            mp.add(ProgressBar::new(0).with_message("Employers"))
        } else {
            ProgressBar::hidden()
        };
        let vacancies = if visible {
            mp.add(ProgressBar::new(0).with_message("Vacancies"))
        } else {
            ProgressBar::hidden()
        };

        let handle = thread::spawn(move || {
            let bar_for = |phase: ProgressPhase| match phase {
                ProgressPhase::Employers => &employers,
                ProgressPhase::Vacancies => &vacancies,
            };

            for msg in rx {
                match msg {
                    ProgressMessage::Started { phase, total } => {
                        bar_for(phase).set_length(total as u64);
                    }
                    ProgressMessage::Progress {
                        phase,
                        current,
                        loaded: _,
                    } => {
                        bar_for(phase).set_position(current as u64);
                    }
                    ProgressMessage::Finished { phase } => {
                        bar_for(phase).finish_with_message("Done");
                    }
                }
            }
        });

        (
            Self {
                mp,
                handle: Some(handle),
            },
            tx,
        )
    }

    pub fn clear(&self) {
        self.mp.clear().ok();
    }

    /// Wait for the drawing thread; every sender must be dropped first
    pub fn join(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.join().ok();
        }
    }

    pub fn finish_with_summary(&mut self, duration: Duration, stats: &LoadStats) {
        self.join();
        self.clear();
        println!();
        println!(
            "{} {}",
            Icons::CHECK.style(theme().success),
            format!("Complete in {}", HumanDuration(duration)).style(theme().success)
        );
        println!(
            "  {} {}/{}  {} {}/{}",
            Icons::OFFICE.style(theme().info),
            stats.employers_loaded,
            stats.employers_total,
            Icons::BRIEFCASE.style(theme().info),
            stats.vacancies_loaded,
            stats.vacancies_total
        );
    }
}

pub struct Spinner {
    pb: ProgressBar,
}

impl Spinner {
    pub fn new(message: &str) -> Self {
        let pb = if console::Term::stdout().is_term() {
            let pb = ProgressBar::new_spinner();
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        } else {
            ProgressBar::hidden()
        };
        pb.set_message(message.to_string());
        Self { pb }
    }

    pub fn finish_and_clear(&self) {
        self.pb.finish_and_clear();
    }
}
