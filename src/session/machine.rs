//! The round state machine.
//!
//! Drives one match from the first question to the outcome:
//!
//! ```text
//! Idle → Thinking → Team1Turn → Team2Turn → Announcing → Judging → Resolved
//!            ↑                                                        │
//!            └──────────────── next question ─────────────────────────┤
//!                                                                     ↓
//!                                                                 GameOver
//! ```
//!
//! All waiting happens on the machine's own [`VirtualClock`]. The host moves
//! time forward with [`RoundMachine::advance`] and feeds player signals
//! through [`RoundMachine::handle`]. Every wake-up is checked against the
//! component that scheduled it, so a wake-up left over from a finished
//! phase has no effect.
//!
//! The game-over monitor polls on the same clock and is also consulted
//! before every phase advance. Once it fires, every timer is torn down and
//! no further transition happens.

use std::time::Duration;

use super::monitor::GameOverMonitor;
use super::outcome::GameOutcome;
use super::phase::{Input, Phase, Wakeup};
use super::state::Session;
use crate::clock::{fill_degrees, Fired, TimerId, TimerTick, VirtualClock, VisualTimer};
use crate::core::{GameRng, Result, SessionConfig, TeamId};
use crate::judging::{JudgingPanel, JudgingTick, Verdict};
use crate::questions::{Question, QuestionBank, QuestionSelector};
use crate::render::{Bars, Presenter, SoundCue, Surface};
use crate::turn::{TurnTick, TurnTimer};

/// One match, from role selection to outcome.
pub struct RoundMachine<P: Presenter> {
    config: SessionConfig,
    session: Session,
    clock: VirtualClock<Wakeup>,
    presenter: P,
    phase: Phase,
    monitor: GameOverMonitor,
    thinking: VisualTimer<Wakeup>,
    turn: Option<TurnTimer>,
    judging: Option<JudgingPanel<Wakeup>>,
    /// Pending interlude (skip grace or "judges will decide").
    transition: Option<TimerId>,
}

impl<P: Presenter> RoundMachine<P> {
    /// Build a match for `role`: validate the config, draw the questions and
    /// start the game-over monitor.
    ///
    /// On failure the presenter is shown the error once and no session is
    /// created.
    pub fn initialize(
        config: SessionConfig,
        bank: &QuestionBank,
        role: &str,
        rng: &GameRng,
        mut presenter: P,
    ) -> Result<Self> {
        let questions = match Self::prepare(&config, bank, role, rng) {
            Ok(questions) => questions,
            Err(err) => {
                tracing::warn!(role, error = %err, "session initialization failed");
                presenter.show_error(&err.to_string());
                return Err(err);
            }
        };

        tracing::info!(
            role,
            questions = questions.len(),
            seed = rng.seed(),
            "session initialized"
        );

        let mut clock = VirtualClock::new();
        let mut monitor = GameOverMonitor::new(config.max_rounds, config.monitor_interval);
        monitor.start(Wakeup::Monitor, &mut clock);

        let thinking = VisualTimer::new(config.think, config.sample_interval, Wakeup::Think);
        let session = Session::new(role.trim().to_lowercase(), questions, config.max_lives);

        let mut machine = Self {
            config,
            session,
            clock,
            presenter,
            phase: Phase::Idle,
            monitor,
            thinking,
            turn: None,
            judging: None,
            transition: None,
        };
        machine.presenter.show_phase(Phase::Idle);
        Ok(machine)
    }

    fn prepare(config: &SessionConfig, bank: &QuestionBank, role: &str, rng: &GameRng) -> Result<Vec<Question>> {
        config.validate()?;
        let (general, specific) = bank.pools_for(role)?;
        QuestionSelector::new(config.question_cap)
            .with_order(config.question_order)
            .select(general, specific, rng)
    }

    // === Accessors ===

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[must_use]
    pub fn clock(&self) -> &VirtualClock<Wakeup> {
        &self.clock
    }

    #[must_use]
    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    #[must_use]
    pub fn into_presenter(self) -> P {
        self.presenter
    }

    #[must_use]
    pub fn outcome(&self) -> Option<GameOutcome> {
        self.session.outcome()
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.session.is_over()
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.clock.is_paused()
    }

    /// The running (or just ended) turn.
    #[must_use]
    pub fn turn(&self) -> Option<&TurnTimer> {
        self.turn.as_ref()
    }

    /// Whether the vote controls are live.
    #[must_use]
    pub fn accepts_votes(&self) -> bool {
        self.phase == Phase::Judging && self.judging.as_ref().is_some_and(|p| p.accepts_votes())
    }

    // === Driving ===

    /// Show the first question and start its thinking time.
    ///
    /// Returns false unless the machine is idle.
    pub fn start_questions_display(&mut self) -> bool {
        if self.phase != Phase::Idle || self.session.is_over() {
            return false;
        }
        self.show_bars();
        self.begin_thinking();
        self.flush();
        true
    }

    /// Feed a player signal. Returns whether it had any effect.
    ///
    /// Signals that do not belong to the current phase are ignored, and
    /// while paused only `TogglePause` is honored.
    pub fn handle(&mut self, input: Input) -> bool {
        if matches!(self.phase, Phase::Idle | Phase::GameOver) {
            return false;
        }
        if self.clock.is_paused() && input != Input::TogglePause {
            tracing::debug!(?input, "input ignored while paused");
            return false;
        }

        let handled = match input {
            Input::TogglePause => {
                let paused = self.clock.toggle_pause();
                tracing::info!(paused, phase = ?self.phase, "pause toggled");
                self.presenter.show_pause(paused);
                true
            }
            Input::SkipThinking => self.skip_thinking(),
            Input::EndTurn => self.end_turn(),
            Input::Vote(loser) => self.vote(loser),
        };
        if handled {
            self.flush();
        }
        handled
    }

    /// Move virtual time forward by `dt`, reacting to every wake-up on the
    /// way at its exact instant.
    pub fn advance(&mut self, dt: Duration) {
        let horizon = self.clock.now() + dt;
        while let Some(fired) = self.clock.pop_due(horizon) {
            self.dispatch(fired);
        }
        self.clock.settle(horizon);
    }

    /// Run one game-over check right now, as a poll tick would.
    pub fn check_game_over(&mut self) -> Option<GameOutcome> {
        let outcome = self.monitor.check(&self.session, &mut self.clock)?;
        self.finish(outcome);
        Some(outcome)
    }

    /// Overwrite a team's lives. The monitor picks a life at zero up on its
    /// next poll.
    pub fn force_lives(&mut self, team: TeamId, lives: u32) {
        self.session.force_lives(team, lives);
        tracing::debug!(%team, lives, "lives overridden");
        self.show_bars();
    }

    fn flush(&mut self) {
        self.advance(Duration::ZERO);
    }

    fn dispatch(&mut self, fired: Fired<Wakeup>) {
        match fired.payload {
            Wakeup::Monitor => {
                if self.monitor.owns(fired.id) {
                    self.check_game_over();
                }
            }
            Wakeup::Think => self.on_think(fired.id),
            Wakeup::Turn => self.on_turn(fired.id),
            Wakeup::Judge => self.on_judge(fired.id),
            Wakeup::Transition => self.on_transition(fired.id),
        }
    }

    // === Thinking ===

    fn begin_thinking(&mut self) {
        if self.preempted() {
            return;
        }
        let index = self.session.current_index();
        let Some(question) = self.session.current_question().cloned() else {
            tracing::warn!(index, "no question at current index, ending session");
            let outcome = self.monitor.conclude(&self.session, &mut self.clock);
            self.finish(outcome);
            return;
        };

        self.set_phase(Phase::Thinking);
        self.presenter.show_question(index, self.session.question_count(), &question);
        self.cue(SoundCue::RoundStart);

        self.thinking.reset(&mut self.clock);
        self.thinking.start(&mut self.clock);
        self.presenter
            .show_countdown(Surface::Thinking, self.config.think, fill_degrees(self.config.think, self.config.think));
    }

    fn on_think(&mut self, id: TimerId) {
        match self.thinking.on_fired(id, &mut self.clock) {
            TimerTick::Expired => {
                tracing::debug!(round = self.session.current_index() + 1, "thinking time over");
                self.presenter.show_countdown(Surface::Thinking, Duration::ZERO, 0.0);
                self.begin_turn(TeamId::Team1);
            }
            TimerTick::Sample => {
                let remaining = self.thinking.remaining(&self.clock);
                let fill = self.thinking.fill_degrees(&self.clock);
                self.presenter.show_countdown(Surface::Thinking, remaining, fill);
            }
            TimerTick::Stale => {}
        }
    }

    fn skip_thinking(&mut self) -> bool {
        if self.phase != Phase::Thinking || !self.thinking.finish_now(&mut self.clock) {
            return false;
        }
        tracing::debug!(round = self.session.current_index() + 1, "thinking time skipped");
        self.presenter.show_countdown(Surface::Thinking, Duration::ZERO, 0.0);

        let grace = self.config.transitions.skip_grace;
        if grace.is_zero() {
            self.begin_turn(TeamId::Team1);
        } else {
            self.transition = Some(self.clock.after(grace, Wakeup::Transition));
        }
        true
    }

    // === Turns ===

    fn begin_turn(&mut self, team: TeamId) {
        if self.preempted() {
            return;
        }
        self.clock.reset_pause_time();
        self.set_phase(Phase::turn(team));
        self.presenter.show_active_team(Some(team));
        self.cue(SoundCue::TurnStart);

        let turn = TurnTimer::start(
            team,
            self.config.round,
            self.config.sample_interval,
            Wakeup::Turn,
            &mut self.clock,
        );
        let sample = turn.sample(&self.clock);
        self.turn = Some(turn);
        self.presenter
            .show_countdown(Surface::Turn(team), sample.remaining, sample.fill_degrees);
    }

    fn on_turn(&mut self, id: TimerId) {
        let Some(turn) = self.turn.as_mut() else {
            return;
        };
        let tick = turn.on_fired(id, &mut self.clock);
        let team = turn.team();
        match tick {
            TurnTick::Sample(sample) => {
                self.presenter
                    .show_countdown(Surface::Turn(sample.team), sample.remaining, sample.fill_degrees);
            }
            TurnTick::Ended(end) => {
                tracing::debug!(%team, ?end, "turn over");
                self.presenter.show_countdown(Surface::Turn(team), Duration::ZERO, 0.0);
                self.after_turn(team);
            }
            TurnTick::Stale => {}
        }
    }

    fn end_turn(&mut self) -> bool {
        let Some(team) = self.phase.active_team() else {
            return false;
        };
        let Some(turn) = self.turn.as_mut() else {
            return false;
        };
        if turn.end_early(&mut self.clock).is_none() {
            return false;
        }
        tracing::debug!(%team, "turn ended early");
        self.after_turn(team);
        true
    }

    fn after_turn(&mut self, team: TeamId) {
        match team {
            TeamId::Team1 => self.begin_turn(TeamId::Team2),
            TeamId::Team2 => {
                self.presenter.show_active_team(None);
                let interlude = self.config.transitions.judges_interlude;
                if interlude.is_zero() {
                    self.open_judging();
                } else if !self.preempted() {
                    self.set_phase(Phase::Announcing);
                    self.transition = Some(self.clock.after(interlude, Wakeup::Transition));
                }
            }
        }
    }

    fn on_transition(&mut self, id: TimerId) {
        if self.transition != Some(id) {
            return;
        }
        self.transition = None;
        match self.phase {
            Phase::Thinking => self.begin_turn(TeamId::Team1),
            Phase::Announcing => self.open_judging(),
            _ => {}
        }
    }

    // === Judging ===

    fn open_judging(&mut self) {
        if self.preempted() {
            return;
        }
        self.set_phase(Phase::Judging);
        self.presenter.show_judging(true);

        let panel = JudgingPanel::open(
            self.config.judge,
            self.config.judge_timeout,
            self.config.sample_interval,
            Wakeup::Judge,
            &mut self.clock,
        );
        self.presenter.show_countdown(
            Surface::Judging,
            panel.remaining(&self.clock),
            panel.fill_degrees(&self.clock),
        );
        self.judging = Some(panel);
    }

    fn on_judge(&mut self, id: TimerId) {
        let Some(panel) = self.judging.as_mut() else {
            return;
        };
        match panel.on_fired(id, &mut self.clock) {
            JudgingTick::Sample { remaining, fill_degrees } => {
                self.presenter.show_countdown(Surface::Judging, remaining, fill_degrees);
            }
            JudgingTick::Closed(verdict) => self.resolve(verdict),
            JudgingTick::Stale => {}
        }
    }

    fn vote(&mut self, loser: TeamId) -> bool {
        if self.phase != Phase::Judging {
            return false;
        }
        let Some(panel) = self.judging.as_mut() else {
            return false;
        };
        let Some(verdict) = panel.vote(loser, &mut self.clock) else {
            return false;
        };
        self.cue(SoundCue::Vote);
        self.resolve(verdict);
        true
    }

    fn resolve(&mut self, verdict: Verdict) {
        self.presenter.show_judging(false);
        self.presenter.show_countdown(Surface::Judging, Duration::ZERO, 0.0);
        self.judging = None;
        self.set_phase(Phase::Resolved);

        let round = self.session.current_index();
        if self.session.apply_verdict(verdict.loser()) {
            tracing::info!(
                round = round + 1,
                loser = ?verdict.loser(),
                lives1 = self.session.lives().team1,
                lives2 = self.session.lives().team2,
                "round resolved"
            );
            if verdict.loser().is_some() {
                self.cue(SoundCue::LifeLost);
            }
            self.show_bars();
        }

        self.session.advance_index();
        self.next_round();
    }

    fn next_round(&mut self) {
        if self.preempted() {
            return;
        }
        if self.session.current_index() < self.session.question_count() {
            self.begin_thinking();
        } else {
            let outcome = self.monitor.conclude(&self.session, &mut self.clock);
            self.finish(outcome);
        }
    }

    // === Game over ===

    /// Consult the monitor before a phase advance. True if the match is
    /// (now) over and the advance must not happen.
    fn preempted(&mut self) -> bool {
        if self.session.is_over() {
            return true;
        }
        self.check_game_over().is_some()
    }

    fn finish(&mut self, outcome: GameOutcome) {
        if !self.session.mark_over(outcome) {
            return;
        }

        self.monitor.stop(&mut self.clock);
        self.thinking.reset(&mut self.clock);
        if let Some(turn) = self.turn.as_mut() {
            turn.abandon(&mut self.clock);
        }
        if let Some(mut panel) = self.judging.take() {
            panel.close(&mut self.clock);
            self.presenter.show_judging(false);
        }
        if let Some(id) = self.transition.take() {
            self.clock.cancel(id);
        }

        self.presenter.show_active_team(None);
        self.set_phase(Phase::GameOver);
        self.presenter.show_outcome(&outcome);
        self.cue(SoundCue::GameOver);
        tracing::info!(
            %outcome,
            rounds = self.session.history().len(),
            lives1 = self.session.lives().team1,
            lives2 = self.session.lives().team2,
            "game over"
        );
    }

    // === Presentation helpers ===

    fn set_phase(&mut self, phase: Phase) {
        if self.phase == phase {
            return;
        }
        tracing::info!(from = ?self.phase, to = ?phase, round = self.session.current_index() + 1, "phase");
        self.phase = phase;
        self.presenter.show_phase(phase);
    }

    fn show_bars(&mut self) {
        let lives = Bars::new(*self.session.lives(), self.session.max_lives());
        let scores = Bars::new(*self.session.scores(), self.config.max_points);
        self.presenter.show_lives(&lives);
        self.presenter.show_scores(&scores);
    }

    fn cue(&mut self, cue: SoundCue) {
        if self.config.sound {
            self.presenter.play_cue(cue);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{JudgeTimeoutPolicy, TransitionTimings};
    use crate::render::RecordingPresenter;
    use crate::session::VictoryReason;

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    fn bank(questions: usize) -> QuestionBank {
        QuestionBank::from_pools([
            ("general", (0..questions).map(|i| Question::new(format!("g{i}"))).collect()),
            ("developer", (0..questions).map(|i| Question::new(format!("d{i}"))).collect()),
        ])
    }

    fn quick_config() -> SessionConfig {
        SessionConfig::standard()
            .with_think(secs(1))
            .with_round(secs(2))
            .with_judge(secs(3))
            .with_transitions(TransitionTimings::none())
    }

    fn machine(config: SessionConfig) -> RoundMachine<RecordingPresenter> {
        RoundMachine::initialize(config, &bank(10), "developer", &GameRng::new(7), RecordingPresenter::new())
            .unwrap()
    }

    #[test]
    fn test_phases_follow_round_order() {
        let mut m = machine(quick_config());
        assert_eq!(m.phase(), Phase::Idle);
        assert!(m.start_questions_display());
        assert!(!m.start_questions_display());
        assert_eq!(m.phase(), Phase::Thinking);

        m.advance(secs(1));
        assert_eq!(m.phase(), Phase::Team1Turn);
        m.advance(secs(2));
        assert_eq!(m.phase(), Phase::Team2Turn);
        m.advance(secs(2));
        assert_eq!(m.phase(), Phase::Judging);
        assert!(m.handle(Input::Vote(TeamId::Team1)));
        assert_eq!(m.phase(), Phase::Thinking);
        assert_eq!(m.session().current_index(), 1);

        assert_eq!(
            &m.presenter().phases()[..7],
            &[
                Phase::Idle,
                Phase::Thinking,
                Phase::Team1Turn,
                Phase::Team2Turn,
                Phase::Judging,
                Phase::Resolved,
                Phase::Thinking,
            ]
        );
    }

    #[test]
    fn test_inputs_outside_their_phase_are_ignored() {
        let mut m = machine(quick_config());
        assert!(!m.handle(Input::EndTurn));
        m.start_questions_display();

        assert!(!m.handle(Input::Vote(TeamId::Team2)));
        assert!(!m.handle(Input::EndTurn));
        assert!(m.handle(Input::SkipThinking));
        assert!(!m.handle(Input::SkipThinking));
        assert_eq!(m.phase(), Phase::Team1Turn);
        assert!(!m.handle(Input::Vote(TeamId::Team2)));
    }

    #[test]
    fn test_skip_grace_delays_first_turn() {
        let config = quick_config().with_transitions(TransitionTimings {
            skip_grace: Duration::from_millis(350),
            judges_interlude: secs(2),
        });
        let mut m = machine(config);
        m.start_questions_display();
        m.handle(Input::SkipThinking);
        assert_eq!(m.phase(), Phase::Thinking);

        m.advance(Duration::from_millis(349));
        assert_eq!(m.phase(), Phase::Thinking);
        m.advance(Duration::from_millis(1));
        assert_eq!(m.phase(), Phase::Team1Turn);

        m.handle(Input::EndTurn);
        m.handle(Input::EndTurn);
        assert_eq!(m.phase(), Phase::Announcing);
        m.advance(secs(2));
        assert_eq!(m.phase(), Phase::Judging);
    }

    #[test]
    fn test_pause_blocks_inputs_and_time() {
        let mut m = machine(quick_config());
        m.start_questions_display();
        m.advance(secs(1));
        assert_eq!(m.phase(), Phase::Team1Turn);

        assert!(m.handle(Input::TogglePause));
        assert!(!m.handle(Input::EndTurn));
        m.advance(secs(60));
        assert_eq!(m.phase(), Phase::Team1Turn);

        assert!(m.handle(Input::TogglePause));
        m.advance(secs(2));
        assert_eq!(m.phase(), Phase::Team2Turn);
    }

    #[test]
    fn test_judging_timeout_policy() {
        let config = quick_config()
            .with_max_rounds(1)
            .with_judge_timeout(JudgeTimeoutPolicy::Against(TeamId::Team2));
        let mut m = machine(config);
        m.start_questions_display();
        m.advance(secs(1 + 2 + 2 + 3));

        assert!(m.is_over());
        assert_eq!(m.session().lives()[TeamId::Team2], 4);
        assert_eq!(
            m.outcome(),
            Some(GameOutcome::Winner {
                team: TeamId::Team1,
                reason: VictoryReason::MoreLives
            })
        );
    }

    #[test]
    fn test_sound_off_emits_no_cues() {
        let mut m = machine(quick_config().with_sound(false));
        m.start_questions_display();
        m.advance(secs(10));
        assert!(m.presenter().cues().is_empty());
    }

    #[test]
    fn test_initialize_reports_error_once() {
        let mut presenter = RecordingPresenter::new();
        let result = RoundMachine::initialize(
            quick_config(),
            &bank(3),
            "astronaut",
            &GameRng::new(1),
            &mut presenter,
        );
        assert!(result.is_err());
        assert_eq!(presenter.errors(), vec!["invalid role selection: 'astronaut'"]);
        assert!(presenter.questions().is_empty());
    }
}
