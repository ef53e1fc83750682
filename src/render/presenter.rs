//! The `Presenter` trait and the values it is handed.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::{TeamId, TeamMap};
use crate::questions::Question;
use crate::session::{GameOutcome, Phase};

/// Which countdown ring a redraw targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Surface {
    Thinking,
    Turn(TeamId),
    Judging,
}

/// Fill levels for a pair of team bars (lives or scores).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bars {
    pub values: TeamMap<u32>,
    /// Value that fills a bar completely.
    pub max: u32,
}

impl Bars {
    #[must_use]
    pub fn new(values: TeamMap<u32>, max: u32) -> Self {
        Self { values, max }
    }

    /// Bar fill in percent, clamped to 0..=100.
    #[must_use]
    pub fn percent(&self, team: TeamId) -> f32 {
        if self.max == 0 {
            return 0.0;
        }
        (self.values[team] as f32 / self.max as f32 * 100.0).clamp(0.0, 100.0)
    }
}

/// Audio cues. Not emitted at all when sound is off.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundCue {
    RoundStart,
    TurnStart,
    Vote,
    LifeLost,
    GameOver,
}

/// Rendering callbacks used by the round machine.
///
/// All methods default to doing nothing, so a presenter only implements
/// the surfaces it has.
pub trait Presenter {
    fn show_phase(&mut self, _phase: Phase) {}

    /// Render the question for round `index` (0-based) out of `total`.
    fn show_question(&mut self, _index: usize, _total: usize, _question: &Question) {}

    /// Redraw a countdown ring.
    fn show_countdown(&mut self, _surface: Surface, _remaining: Duration, _fill_degrees: f32) {}

    /// Highlight the team whose turn it is (`None` clears the highlight).
    fn show_active_team(&mut self, _team: Option<TeamId>) {}

    fn show_lives(&mut self, _lives: &Bars) {}

    fn show_scores(&mut self, _scores: &Bars) {}

    /// Show (`true`) or hide the vote controls.
    fn show_judging(&mut self, _open: bool) {}

    fn show_pause(&mut self, _paused: bool) {}

    fn show_outcome(&mut self, _outcome: &GameOutcome) {}

    /// Replace the first question with a terminal error message.
    fn show_error(&mut self, _message: &str) {}

    fn play_cue(&mut self, _cue: SoundCue) {}
}

impl<P: Presenter + ?Sized> Presenter for &mut P {
    fn show_phase(&mut self, phase: Phase) {
        (**self).show_phase(phase);
    }

    fn show_question(&mut self, index: usize, total: usize, question: &Question) {
        (**self).show_question(index, total, question);
    }

    fn show_countdown(&mut self, surface: Surface, remaining: Duration, fill_degrees: f32) {
        (**self).show_countdown(surface, remaining, fill_degrees);
    }

    fn show_active_team(&mut self, team: Option<TeamId>) {
        (**self).show_active_team(team);
    }

    fn show_lives(&mut self, lives: &Bars) {
        (**self).show_lives(lives);
    }

    fn show_scores(&mut self, scores: &Bars) {
        (**self).show_scores(scores);
    }

    fn show_judging(&mut self, open: bool) {
        (**self).show_judging(open);
    }

    fn show_pause(&mut self, paused: bool) {
        (**self).show_pause(paused);
    }

    fn show_outcome(&mut self, outcome: &GameOutcome) {
        (**self).show_outcome(outcome);
    }

    fn show_error(&mut self, message: &str) {
        (**self).show_error(message);
    }

    fn play_cue(&mut self, cue: SoundCue) {
        (**self).play_cue(cue);
    }
}
