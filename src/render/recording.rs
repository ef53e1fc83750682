//! Presenters that need no screen.

use std::time::Duration;

use serde::Serialize;

use super::presenter::{Bars, Presenter, SoundCue, Surface};
use crate::core::TeamId;
use crate::questions::Question;
use crate::session::{GameOutcome, Phase};

/// One recorded presenter call.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum PresenterEvent {
    Phase(Phase),
    Question { index: usize, total: usize, text: String },
    Countdown { surface: Surface, remaining: Duration, fill_degrees: f32 },
    ActiveTeam(Option<TeamId>),
    Lives(Bars),
    Scores(Bars),
    Judging(bool),
    Pause(bool),
    Outcome(GameOutcome),
    Error(String),
    Cue(SoundCue),
}

/// Records every call, in order.
#[derive(Clone, Debug, Default)]
pub struct RecordingPresenter {
    pub events: Vec<PresenterEvent>,
}

impl RecordingPresenter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Phases shown so far, in order.
    #[must_use]
    pub fn phases(&self) -> Vec<Phase> {
        self.events
            .iter()
            .filter_map(|e| match e {
                PresenterEvent::Phase(p) => Some(*p),
                _ => None,
            })
            .collect()
    }

    /// Question texts shown so far, in order.
    #[must_use]
    pub fn questions(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                PresenterEvent::Question { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    #[must_use]
    pub fn outcomes(&self) -> Vec<GameOutcome> {
        self.events
            .iter()
            .filter_map(|e| match e {
                PresenterEvent::Outcome(o) => Some(*o),
                _ => None,
            })
            .collect()
    }

    #[must_use]
    pub fn errors(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                PresenterEvent::Error(msg) => Some(msg.as_str()),
                _ => None,
            })
            .collect()
    }

    #[must_use]
    pub fn cues(&self) -> Vec<SoundCue> {
        self.events
            .iter()
            .filter_map(|e| match e {
                PresenterEvent::Cue(c) => Some(*c),
                _ => None,
            })
            .collect()
    }

    /// Countdown redraws for one surface.
    #[must_use]
    pub fn countdowns(&self, surface: Surface) -> Vec<(Duration, f32)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                PresenterEvent::Countdown {
                    surface: s,
                    remaining,
                    fill_degrees,
                } if *s == surface => Some((*remaining, *fill_degrees)),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl Presenter for RecordingPresenter {
    fn show_phase(&mut self, phase: Phase) {
        self.events.push(PresenterEvent::Phase(phase));
    }

    fn show_question(&mut self, index: usize, total: usize, question: &Question) {
        self.events.push(PresenterEvent::Question {
            index,
            total,
            text: question.text.clone(),
        });
    }

    fn show_countdown(&mut self, surface: Surface, remaining: Duration, fill_degrees: f32) {
        self.events.push(PresenterEvent::Countdown {
            surface,
            remaining,
            fill_degrees,
        });
    }

    fn show_active_team(&mut self, team: Option<TeamId>) {
        self.events.push(PresenterEvent::ActiveTeam(team));
    }

    fn show_lives(&mut self, lives: &Bars) {
        self.events.push(PresenterEvent::Lives(*lives));
    }

    fn show_scores(&mut self, scores: &Bars) {
        self.events.push(PresenterEvent::Scores(*scores));
    }

    fn show_judging(&mut self, open: bool) {
        self.events.push(PresenterEvent::Judging(open));
    }

    fn show_pause(&mut self, paused: bool) {
        self.events.push(PresenterEvent::Pause(paused));
    }

    fn show_outcome(&mut self, outcome: &GameOutcome) {
        self.events.push(PresenterEvent::Outcome(*outcome));
    }

    fn show_error(&mut self, message: &str) {
        self.events.push(PresenterEvent::Error(message.to_string()));
    }

    fn play_cue(&mut self, cue: SoundCue) {
        self.events.push(PresenterEvent::Cue(cue));
    }
}

/// Logs every call. Countdown redraws go to `trace`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingPresenter;

impl Presenter for TracingPresenter {
    fn show_phase(&mut self, phase: Phase) {
        tracing::info!(?phase, "phase");
    }

    fn show_question(&mut self, index: usize, total: usize, question: &Question) {
        tracing::info!(round = index + 1, total, question = %question, "question");
    }

    fn show_countdown(&mut self, surface: Surface, remaining: Duration, fill_degrees: f32) {
        tracing::trace!(?surface, remaining_ms = remaining.as_millis() as u64, fill_degrees, "countdown");
    }

    fn show_active_team(&mut self, team: Option<TeamId>) {
        tracing::debug!(?team, "active team");
    }

    fn show_lives(&mut self, lives: &Bars) {
        tracing::info!(team1 = lives.values.team1, team2 = lives.values.team2, max = lives.max, "lives");
    }

    fn show_scores(&mut self, scores: &Bars) {
        tracing::info!(team1 = scores.values.team1, team2 = scores.values.team2, "scores");
    }

    fn show_judging(&mut self, open: bool) {
        tracing::debug!(open, "judging controls");
    }

    fn show_pause(&mut self, paused: bool) {
        tracing::info!(paused, "pause");
    }

    fn show_outcome(&mut self, outcome: &GameOutcome) {
        tracing::info!(%outcome, "outcome");
    }

    fn show_error(&mut self, message: &str) {
        tracing::error!(message, "session error");
    }

    fn play_cue(&mut self, cue: SoundCue) {
        tracing::debug!(?cue, "sound cue");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drive<P: Presenter>(mut presenter: P) {
        presenter.show_phase(Phase::Thinking);
        presenter.show_error("boom");
    }

    #[test]
    fn test_records_through_mut_ref() {
        let mut recorder = RecordingPresenter::new();
        drive(&mut recorder);
        assert_eq!(recorder.phases(), vec![Phase::Thinking]);
        assert_eq!(recorder.errors(), vec!["boom"]);
        recorder.clear();
        assert!(recorder.events.is_empty());
    }
}
