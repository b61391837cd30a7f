use crate::bet::BetController;
use crate::config::GameConfig;
use crate::error::Result;
use crate::ledger::SessionLedger;
use crate::outcome::{FairCoin, OutcomeSource};
use crate::round::Round;
use crate::timing::{ScheduledTimer, TimerKind, TimerToken, TimingCoordinator};
use crate::types::{
    GuessOutcome, Hand, LastEvent, Multiplier, Phase, Snapshot, StakePreset, VisualEffect,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// Session metadata for display and logs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionInfo {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub rounds_played: u64,
}

/// Round state machine for one player session.
///
/// Commands that do not fit the current phase are ignored and return
/// `false`. Delayed transitions are recorded in the [`TimingCoordinator`] and
/// applied through [`GameEngine::fire`] or [`GameEngine::advance`].
pub struct GameEngine {
    config: GameConfig,
    info: SessionInfo,
    ledger: SessionLedger,
    bets: BetController,
    phase: Phase,
    round: Option<Round>,
    timers: TimingCoordinator,
    source: Box<dyn OutcomeSource>,
    visual_effect: Option<VisualEffect>,
    cooling_down: bool,
    recovery_delay_enabled: bool,
    score_hidden: bool,
    last_event: Option<LastEvent>,
}

impl GameEngine {
    pub fn new(config: GameConfig) -> Result<Self> {
        Self::with_source(config, Box::new(FairCoin))
    }

    pub fn with_source(config: GameConfig, source: Box<dyn OutcomeSource>) -> Result<Self> {
        config.validate()?;

        let info = SessionInfo {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            rounds_played: 0,
        };

        tracing::info!(
            "Session {} started with balance {} (bets {}..={})",
            info.id,
            config.starting_balance,
            config.min_bet,
            config.max_bet
        );

        Ok(Self {
            ledger: SessionLedger::new(config.starting_balance),
            bets: BetController::new(config.min_bet, config.max_bet),
            config,
            info,
            phase: Phase::Betting,
            round: None,
            timers: TimingCoordinator::new(),
            source,
            visual_effect: None,
            cooling_down: false,
            recovery_delay_enabled: false,
            score_hidden: false,
            last_event: None,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn info(&self) -> &SessionInfo {
        &self.info
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn ledger(&self) -> &SessionLedger {
        &self.ledger
    }

    pub fn stake(&self) -> u64 {
        self.bets.stake()
    }

    pub fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    pub fn pending_timers(&self) -> Vec<ScheduledTimer> {
        self.timers.pending()
    }

    pub fn is_cooling_down(&self) -> bool {
        self.cooling_down
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == Phase::Betting && self.ledger.is_broke(self.bets.min_bet())
    }

    pub fn can_place_bet(&self) -> bool {
        self.phase == Phase::Betting
            && !self.cooling_down
            && self.bets.is_affordable(self.ledger.balance())
    }

    pub fn can_double_up(&self) -> bool {
        self.phase == Phase::BonusChoice && self.round.as_ref().is_some_and(Round::can_double_up)
    }

    pub fn place_bet(&mut self) -> bool {
        if !self.can_place_bet() {
            tracing::debug!("Session {}: bet rejected in {}", self.info.id, self.phase);
            return false;
        }

        let stake = self.bets.stake();
        if !self.ledger.debit(stake) {
            return false;
        }

        let epoch = self.timers.begin_epoch();
        self.visual_effect = None;
        self.round = Some(Round::open(stake, self.source.draw()));
        self.phase = Phase::Choosing;
        self.info.rounds_played += 1;

        tracing::info!(
            "Session {} round {}: staked {}, balance now {}",
            self.info.id,
            epoch,
            stake,
            self.ledger.balance()
        );
        true
    }

    pub fn choose_hand(&mut self, hand: Hand) -> bool {
        if self.phase != Phase::Choosing {
            return false;
        }
        let Some(round) = self.round.as_mut() else {
            return false;
        };
        if !round.choose(hand) {
            return false;
        }

        self.phase = Phase::Reveal;
        self.timers.schedule(TimerKind::Reveal, self.config.reveal_delay());
        tracing::debug!("Session {}: chose {} hand", self.info.id, hand);
        true
    }

    pub fn cash_out(&mut self) -> bool {
        if self.phase != Phase::BonusChoice {
            return false;
        }
        let Some(round) = self.round.as_ref() else {
            return false;
        };

        let winnings = round.pending_winnings();
        self.ledger.credit(winnings);
        self.ledger.record_win();
        self.last_event = Some(LastEvent::CashedOut { amount: winnings });

        tracing::info!(
            "Session {}: cashed out {} at {}",
            self.info.id,
            winnings,
            round.multiplier()
        );

        self.finish_round();
        true
    }

    pub fn double_up(&mut self) -> bool {
        if !self.can_double_up() {
            return false;
        }

        let correct_hand = self.source.draw();
        let Some(round) = self.round.as_mut() else {
            return false;
        };
        if !round.double_up(correct_hand) {
            return false;
        }

        self.timers.cancel(TimerKind::EffectClear);
        self.visual_effect = None;
        self.phase = Phase::Choosing;

        tracing::debug!(
            "Session {}: doubled up to {}",
            self.info.id,
            round.multiplier()
        );
        true
    }

    /// Stake changes are only accepted between rounds and while a bet is
    /// still possible.
    fn stake_editable(&self) -> bool {
        self.phase == Phase::Betting && !self.is_game_over()
    }

    pub fn adjust_stake(&mut self, preset: StakePreset) -> bool {
        if !self.stake_editable() {
            return false;
        }
        let stake = self.bets.apply_preset(preset, self.ledger.balance());
        tracing::debug!("Session {}: stake {:?} -> {}", self.info.id, preset, stake);
        true
    }

    pub fn set_stake(&mut self, value: u64) -> bool {
        if !self.stake_editable() {
            return false;
        }
        let stake = self.bets.set_stake(value, self.ledger.balance());
        if stake != value {
            tracing::debug!(
                "Session {}: stake {} clamped to {} (limits {}..={})",
                self.info.id,
                value,
                stake,
                self.bets.min_bet(),
                self.bets.max_bet()
            );
        }
        true
    }

    /// Restore the starting balance once the session is out of funds.
    pub fn refill(&mut self) -> bool {
        if !self.is_game_over() {
            return false;
        }

        self.ledger.refill();
        self.bets.reset();
        self.last_event = Some(LastEvent::Refilled);

        tracing::info!(
            "Session {} refilled to {}",
            self.info.id,
            self.ledger.balance()
        );
        true
    }

    /// Applies to rounds resolved from now on; a running cooldown is kept.
    pub fn set_recovery_delay(&mut self, enabled: bool) {
        self.recovery_delay_enabled = enabled;
    }

    pub fn set_score_hidden(&mut self, hidden: bool) {
        self.score_hidden = hidden;
    }

    /// Apply an elapsed timer. Stale or cancelled tokens are ignored.
    pub fn fire(&mut self, token: TimerToken) -> bool {
        if !self.timers.claim(token) {
            tracing::debug!(
                "Session {}: ignoring stale {:?} timer {} from round {} (now {})",
                self.info.id,
                token.kind(),
                token.id(),
                token.epoch(),
                self.timers.epoch()
            );
            return false;
        }

        match token.kind() {
            TimerKind::Reveal => self.evaluate_guess(),
            TimerKind::LossReset => {
                if self.phase != Phase::Reveal {
                    return false;
                }
                self.finish_round();
                true
            }
            TimerKind::EffectClear => {
                self.visual_effect = None;
                true
            }
            TimerKind::RecoveryEnd => {
                self.cooling_down = false;
                tracing::info!("Session {}: recovery pause over", self.info.id);
                true
            }
        }
    }

    /// Move the virtual clock forward, firing every timer that falls due in
    /// order, including timers scheduled by earlier firings in the window.
    pub fn advance(&mut self, elapsed: Duration) {
        let target = self.timers.now() + elapsed;
        while let Some(timer) = self.timers.next_due(target) {
            self.timers.set_clock(timer.due);
            self.fire(timer.token);
        }
        self.timers.set_clock(target);
    }

    fn evaluate_guess(&mut self) -> bool {
        if self.phase != Phase::Reveal {
            return false;
        }
        let Some(round) = self.round.as_mut() else {
            return false;
        };
        let Some(outcome) = round.evaluate() else {
            return false;
        };

        match outcome {
            GuessOutcome::Correct => {
                tracing::info!(
                    "Session {}: correct guess, {} pending at {}",
                    self.info.id,
                    round.pending_winnings(),
                    round.multiplier()
                );
                self.phase = Phase::BonusChoice;
                self.visual_effect = Some(VisualEffect::Win);
            }
            GuessOutcome::Wrong => {
                let stake = round.stake();
                self.ledger.record_loss();
                self.last_event = Some(LastEvent::Lost { stake });
                self.visual_effect = Some(VisualEffect::Lose);
                self.timers.schedule(TimerKind::LossReset, self.config.message_delay());
                tracing::info!("Session {}: wrong hand, lost {}", self.info.id, stake);
            }
        }

        self.timers.schedule(TimerKind::EffectClear, self.config.effect_duration());
        true
    }

    /// Back to Betting from either terminal path.
    fn finish_round(&mut self) {
        self.timers.cancel(TimerKind::Reveal);
        self.timers.cancel(TimerKind::LossReset);
        self.timers.cancel(TimerKind::EffectClear);
        self.visual_effect = None;
        self.round = None;
        self.phase = Phase::Betting;
        self.bets.reclamp(self.ledger.balance());

        if self.recovery_delay_enabled {
            self.cooling_down = true;
            self.timers.schedule(TimerKind::RecoveryEnd, self.config.recovery_delay());
            tracing::info!(
                "Session {}: recovery pause of {:?}",
                self.info.id,
                self.config.recovery_delay()
            );
        }

        if self.ledger.is_broke(self.config.min_bet) {
            tracing::warn!(
                "Session {} is out of funds with {} left",
                self.info.id,
                self.ledger.balance()
            );
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        let round = self.round.as_ref();
        Snapshot {
            phase: self.phase,
            balance: self.ledger.balance(),
            stake: self.bets.stake(),
            multiplier: round.map_or(Multiplier::INITIAL, Round::multiplier),
            pending_winnings: round.map_or(0, Round::pending_winnings),
            chosen_hand: round.and_then(Round::chosen_hand),
            correct_hand: round.and_then(Round::revealed_hand),
            outcome: round.and_then(Round::outcome),
            stats: self.ledger.stats(),
            visual_effect: self.visual_effect,
            cooling_down: self.cooling_down,
            game_over: self.is_game_over(),
            can_place_bet: self.can_place_bet(),
            can_double_up: self.can_double_up(),
            recovery_delay_enabled: self.recovery_delay_enabled,
            score_hidden: self.score_hidden,
            last_event: self.last_event,
        }
    }
}

impl std::fmt::Debug for GameEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameEngine")
            .field("session", &self.info.id)
            .field("phase", &self.phase)
            .field("balance", &self.ledger.balance())
            .field("stake", &self.bets.stake())
            .field("round", &self.round)
            .field("cooling_down", &self.cooling_down)
            .finish()
    }
}
