use rand::Rng;

use crate::catalog::AssetCatalog;
use crate::countdown::{Countdown, Tick, TimeDisplay};
use crate::notice::Notice;
use crate::round::{RoundError, RoundInstance, generate_round};
use crate::selection::SelectionState;
use crate::session::{SessionState, Transition};
use crate::verdict::{Verdict, evaluate};

/// Whether rounds run against a deadline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Variant {
    #[default]
    Timed,
    Untimed,
}

/// Text and numbers shown alongside a freshly loaded grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Briefing {
    pub round: u8,
    pub instructions: String,
    pub status: String,
    pub points: u32,
    pub time_limit: Option<u32>,
    pub cell_edge: u32,
}

/// Renderer and alert collaborator.
///
/// Every call is made synchronously from [`Verifier::handle`]; `alert` is expected to block
/// until the user dismisses it, since the next round is loaded right after it returns.
pub trait Presenter {
    fn show_round(&mut self, instance: &RoundInstance, briefing: &Briefing);
    fn show_selection(&mut self, selection: &SelectionState);
    fn show_verdict(&mut self, verdict: &Verdict);
    fn show_time(&mut self, display: &TimeDisplay);
    fn alert(&mut self, notice: &Notice);
}

/// Input the verifier reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Toggle(usize),
    Submit,
    /// One second of the round deadline has passed.
    Tick,
}

/// Drives a playthrough: owns the session and processes one event at a time.
pub struct Verifier<C, R> {
    catalog: C,
    rng: R,
    variant: Variant,
    session: SessionState,
    countdown: Option<Countdown>,
}

impl<C, R> Verifier<C, R>
where
    C: AssetCatalog,
    R: Rng,
{
    pub fn new(catalog: C, rng: R, variant: Variant) -> Self {
        Self {
            catalog,
            rng,
            variant,
            session: SessionState::new(),
            countdown: None,
        }
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn countdown(&self) -> Option<&Countdown> {
        self.countdown.as_ref()
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Starts a new playthrough at round 1.
    pub fn start<P: Presenter + ?Sized>(&mut self, presenter: &mut P) -> Result<(), RoundError> {
        self.session.reset();
        self.load_round(presenter)
    }

    /// Applies `event`.
    ///
    /// # Errors
    /// Propagates [`RoundError`] when the next round cannot be generated. The user has already
    /// been alerted for missing images; events are ignored until [`Verifier::start`] succeeds.
    pub fn handle<P: Presenter + ?Sized>(
        &mut self,
        event: Event,
        presenter: &mut P,
    ) -> Result<(), RoundError> {
        match event {
            Event::Toggle(position) => {
                self.toggle(position, presenter);
                Ok(())
            }
            Event::Submit => self.submit(presenter),
            Event::Tick => self.tick(presenter),
        }
    }

    fn toggle<P: Presenter + ?Sized>(&mut self, position: usize, presenter: &mut P) {
        let Some(active) = self.session.active_mut() else {
            tracing::debug!(position, "toggle with no active round");
            return;
        };

        match active.selection.toggle(position) {
            Ok(selected) => {
                tracing::trace!(position, selected, "toggled cell");
                presenter.show_selection(&active.selection);
            }
            Err(error) => tracing::warn!(%error, "ignoring toggle"),
        }
    }

    fn submit<P: Presenter + ?Sized>(&mut self, presenter: &mut P) -> Result<(), RoundError> {
        let verdict = match self.session.active() {
            Some(active) if active.selection.submit_enabled() => {
                evaluate(&active.instance, &active.selection)
            }
            Some(_) => {
                tracing::debug!("ignoring submit with empty selection");
                return Ok(());
            }
            None => {
                tracing::debug!("submit with no active round");
                return Ok(());
            }
        };

        self.cancel_countdown();

        tracing::info!(
            round = verdict.round,
            passed = verdict.passed,
            points = verdict.points_awarded,
            incorrect = verdict.incorrect_positions.len(),
            missed = verdict.missed_count(),
            "evaluated submission"
        );
        presenter.show_verdict(&verdict);

        let transition = self.session.record(&verdict);
        let notice = match transition {
            Transition::Advanced { from, to, total } => Notice::RoundPassed {
                round: from,
                awarded: verdict.points_awarded,
                total,
                next: to,
            },
            Transition::Completed { total } => Notice::Completed { total },
            Transition::Failed { round, total } => Notice::RoundFailed {
                round,
                total,
                incorrect: verdict.incorrect_positions.clone(),
            },
            Transition::Expired { .. } | Transition::Ignored => return Ok(()),
        };

        notify(presenter, &notice);
        self.continue_after(transition, presenter)
    }

    fn tick<P: Presenter + ?Sized>(&mut self, presenter: &mut P) -> Result<(), RoundError> {
        let Some(countdown) = self.countdown.as_mut() else {
            return Ok(());
        };

        match countdown.tick() {
            Tick::Running(display) => {
                presenter.show_time(&display);
                Ok(())
            }
            Tick::Expired => {
                presenter.show_time(&countdown.display());

                let transition = self.session.expire();
                let Transition::Expired { round, total } = transition else {
                    return Ok(());
                };

                tracing::info!(round, total, "round deadline passed");
                notify(presenter, &Notice::TimeExpired { round, total });
                self.continue_after(transition, presenter)
            }
            Tick::Idle => Ok(()),
        }
    }

    fn continue_after<P: Presenter + ?Sized>(
        &mut self,
        transition: Transition,
        presenter: &mut P,
    ) -> Result<(), RoundError> {
        if transition.ends_playthrough() {
            self.session.reset();
        }

        self.load_round(presenter)
    }

    fn load_round<P: Presenter + ?Sized>(&mut self, presenter: &mut P) -> Result<(), RoundError> {
        self.cancel_countdown();

        let Some(round) = self.session.current_round() else {
            return Ok(());
        };

        let instance = match generate_round(
            &mut self.rng,
            &self.catalog,
            round,
            self.session.used_identifiers(),
        ) {
            Ok(instance) => instance,
            Err(error @ RoundError::InsufficientAssets { .. }) => {
                tracing::error!(round, %error, "cannot build round");
                notify(
                    presenter,
                    &Notice::AssetsUnavailable {
                        message: error.to_string(),
                    },
                );
                return Err(error);
            }
            Err(error) => return Err(error),
        };

        let spec = *instance.spec();
        let timed = self.variant == Variant::Timed;
        let time_limit = spec.time_limit.filter(|_| timed);

        let briefing = Briefing {
            round,
            instructions: spec.instructions(timed),
            status: spec.status(),
            points: self.session.points(),
            time_limit,
            cell_edge: spec.cell_edge(),
        };

        self.session.begin_round(instance);

        if let Some(active) = self.session.active() {
            presenter.show_round(&active.instance, &briefing);
            presenter.show_selection(&active.selection);
        }

        if let Some(limit) = time_limit {
            let countdown = Countdown::new(limit);
            presenter.show_time(&countdown.display());
            self.countdown = Some(countdown);
        }

        tracing::info!(round, points = briefing.points, "loaded round");
        Ok(())
    }

    fn cancel_countdown(&mut self) {
        if let Some(mut countdown) = self.countdown.take() {
            countdown.cancel();
        }
    }
}

fn notify<P: Presenter + ?Sized>(presenter: &mut P, notice: &Notice) {
    tracing::debug!(title = notice.title(), total = ?notice.total(), "alerting");
    presenter.alert(notice);
}
