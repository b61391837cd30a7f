//! Async driver that runs the engine's timers on a tokio runtime.
//!
//! Every command and every timer firing takes the same engine lock, so the
//! two trigger kinds are serialized. After each mutation the spawned timer
//! tasks are reconciled with the engine's pending timers: new timers get a
//! task, timers that are no longer pending have their task aborted.

use crate::config::GameConfig;
use crate::engine::{GameEngine, SessionInfo};
use crate::error::{HandGuessError, Result};
use crate::outcome::{FairCoin, OutcomeSource};
use crate::timing::TimerToken;
use crate::types::{Hand, Snapshot, StakePreset};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;

struct Inner {
    engine: Mutex<GameEngine>,
    tasks: Mutex<HashMap<u64, JoinHandle<()>>>,
    snapshots: watch::Sender<Snapshot>,
    runtime: Handle,
}

impl Inner {
    fn fire(self: &Arc<Self>, token: TimerToken) {
        let mut engine = self.engine.lock();
        self.tasks.lock().remove(&token.id());
        engine.fire(token);
        self.sync(&*engine);
    }

    fn sync(self: &Arc<Self>, engine: &GameEngine) {
        let pending = engine.pending_timers();
        let mut tasks = self.tasks.lock();

        tasks.retain(|id, handle| {
            let live = pending.iter().any(|timer| timer.token.id() == *id);
            if !live {
                handle.abort();
            }
            live
        });

        for timer in pending {
            let id = timer.token.id();
            if tasks.contains_key(&id) {
                continue;
            }

            let weak: Weak<Inner> = Arc::downgrade(self);
            let handle = self.runtime.spawn(async move {
                tokio::time::sleep(timer.delay).await;
                if let Some(inner) = weak.upgrade() {
                    inner.fire(timer.token);
                }
            });
            tasks.insert(id, handle);
        }

        self.snapshots.send_replace(engine.snapshot());
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        for (_, handle) in self.tasks.get_mut().drain() {
            handle.abort();
        }
    }
}

/// Shareable handle to a running game session.
///
/// Must be created inside a tokio runtime; timers are spawned on that runtime.
#[derive(Clone)]
pub struct GameSession {
    inner: Arc<Inner>,
}

impl GameSession {
    pub fn new(config: GameConfig) -> Result<Self> {
        Self::with_source(config, Box::new(FairCoin))
    }

    pub fn with_source(config: GameConfig, source: Box<dyn OutcomeSource>) -> Result<Self> {
        let runtime = Handle::try_current()
            .map_err(|e| HandGuessError::internal(format!("No tokio runtime: {}", e)))?;

        let engine = GameEngine::with_source(config, source)?;
        let (snapshots, _) = watch::channel(engine.snapshot());

        Ok(Self {
            inner: Arc::new(Inner {
                engine: Mutex::new(engine),
                tasks: Mutex::new(HashMap::new()),
                snapshots,
                runtime,
            }),
        })
    }

    fn apply<R>(&self, command: impl FnOnce(&mut GameEngine) -> R) -> R {
        let mut engine = self.inner.engine.lock();
        let result = command(&mut *engine);
        self.inner.sync(&*engine);
        result
    }

    pub fn snapshot(&self) -> Snapshot {
        self.inner.engine.lock().snapshot()
    }

    /// Receiver updated after every command and every timer firing.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.inner.snapshots.subscribe()
    }

    /// Wait until a snapshot satisfies `predicate`, returning that snapshot.
    pub async fn wait_for(&self, predicate: impl FnMut(&Snapshot) -> bool) -> Result<Snapshot> {
        let mut rx = self.subscribe();
        let snapshot = rx
            .wait_for(predicate)
            .await
            .map_err(|e| HandGuessError::internal(format!("Snapshot channel closed: {}", e)))?;
        Ok(snapshot.clone())
    }

    pub fn info(&self) -> SessionInfo {
        self.inner.engine.lock().info().clone()
    }

    pub fn config(&self) -> GameConfig {
        self.inner.engine.lock().config().clone()
    }

    pub fn place_bet(&self) -> bool {
        self.apply(GameEngine::place_bet)
    }

    pub fn choose_hand(&self, hand: Hand) -> bool {
        self.apply(|engine| engine.choose_hand(hand))
    }

    pub fn cash_out(&self) -> bool {
        self.apply(GameEngine::cash_out)
    }

    pub fn double_up(&self) -> bool {
        self.apply(GameEngine::double_up)
    }

    pub fn adjust_stake(&self, preset: StakePreset) -> bool {
        self.apply(|engine| engine.adjust_stake(preset))
    }

    pub fn set_stake(&self, value: u64) -> bool {
        self.apply(|engine| engine.set_stake(value))
    }

    pub fn refill(&self) -> bool {
        self.apply(GameEngine::refill)
    }

    pub fn set_recovery_delay(&self, enabled: bool) {
        self.apply(|engine| engine.set_recovery_delay(enabled))
    }

    pub fn set_score_hidden(&self, hidden: bool) {
        self.apply(|engine| engine.set_score_hidden(hidden))
    }

    #[cfg(test)]
    fn active_timers(&self) -> usize {
        self.inner.tasks.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::{Scripted, SeededCoin};
    use crate::types::{Multiplier, Phase, VisualEffect};
    use std::time::Duration;
    use tokio::time::sleep;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn session(hands: impl IntoIterator<Item = Hand>) -> GameSession {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
        GameSession::with_source(GameConfig::default(), Box::new(Scripted::new(hands))).unwrap()
    }

    #[test]
    fn test_requires_runtime() {
        assert!(matches!(
            GameSession::new(GameConfig::default()),
            Err(HandGuessError::Internal(_))
        ));
    }

    #[tokio::test]
    async fn test_session_reports_its_config() {
        let config = GameConfig {
            min_bet: 25,
            ..GameConfig::default()
        };
        let session = GameSession::new(config.clone()).unwrap();
        assert_eq!(session.config(), config);
        assert_eq!(session.snapshot().stake, 25);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reveal_waits_for_delay() {
        let session = session([Hand::Left]);
        assert!(session.place_bet());
        assert!(session.choose_hand(Hand::Left));

        sleep(ms(1499)).await;
        assert_eq!(session.snapshot().phase, Phase::Reveal);
        assert_eq!(session.snapshot().outcome, None);

        sleep(ms(2)).await;
        let snapshot = session.snapshot();
        assert_eq!(snapshot.phase, Phase::BonusChoice);
        assert_eq!(snapshot.visual_effect, Some(VisualEffect::Win));
        assert_eq!(snapshot.pending_winnings, 20);

        sleep(ms(500)).await;
        assert_eq!(session.snapshot().visual_effect, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_loss_resets_after_message_delay() {
        let session = session([Hand::Right]);
        session.set_stake(300);
        session.place_bet();
        session.choose_hand(Hand::Left);

        sleep(ms(1501)).await;
        assert_eq!(session.snapshot().phase, Phase::Reveal);
        assert_eq!(session.snapshot().stats.losses, 1);

        sleep(ms(2500)).await;
        let snapshot = session.snapshot();
        assert_eq!(snapshot.phase, Phase::Betting);
        assert_eq!(snapshot.balance, 1700);
        assert_eq!(snapshot.multiplier, Multiplier::INITIAL);
        assert_eq!(session.active_timers(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscriber_sees_timer_transitions() {
        let session = session([Hand::Left]);
        let mut rx = session.subscribe();

        session.place_bet();
        session.choose_hand(Hand::Right);

        let snapshot = rx
            .wait_for(|s| s.phase == Phase::Betting && s.stats.losses == 1)
            .await
            .unwrap()
            .clone();
        assert_eq!(snapshot.balance, 1990);
    }

    #[tokio::test(start_paused = true)]
    async fn test_recovery_delay_blocks_bets_for_full_interval() {
        let session = session([Hand::Left]);
        session.set_recovery_delay(true);
        session.place_bet();
        session.choose_hand(Hand::Left);
        session
            .wait_for(|s| s.phase == Phase::BonusChoice)
            .await
            .unwrap();

        assert!(session.cash_out());
        assert!(session.snapshot().cooling_down);
        assert!(!session.place_bet());

        sleep(ms(4999)).await;
        assert!(!session.snapshot().can_place_bet);
        assert!(!session.place_bet());

        sleep(ms(2)).await;
        assert!(session.snapshot().can_place_bet);
        assert!(session.place_bet());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cash_out_aborts_effect_timer() {
        let session = session([Hand::Left]);
        session.place_bet();
        session.choose_hand(Hand::Left);
        session
            .wait_for(|s| s.phase == Phase::BonusChoice)
            .await
            .unwrap();
        assert_eq!(session.active_timers(), 1);

        session.cash_out();
        assert_eq!(session.active_timers(), 0);
        assert_eq!(session.snapshot().balance, 2010);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_commands_keep_invariants() {
        let config = GameConfig::default().instant();
        let session = GameSession::with_source(config, Box::new(SeededCoin::new(5))).unwrap();

        let mut workers = Vec::new();
        for worker in 0..4u64 {
            let session = session.clone();
            workers.push(tokio::spawn(async move {
                let mut coin = SeededCoin::new(worker);
                for _ in 0..200 {
                    session.place_bet();
                    session.choose_hand(coin.draw());
                    tokio::task::yield_now().await;
                    if coin.draw() == Hand::Left {
                        session.double_up();
                    } else {
                        session.cash_out();
                    }
                    session.refill();

                    let snapshot = session.snapshot();
                    assert!([2, 4, 8, 16, 32].contains(&snapshot.multiplier.value()));
                    if snapshot.phase == Phase::BonusChoice {
                        assert_eq!(
                            snapshot.pending_winnings,
                            snapshot.stake * snapshot.multiplier.value()
                        );
                    }
                }
            }));
        }

        for worker in workers {
            worker.await.unwrap();
        }

        let info = session.info();
        let stats = session.snapshot().stats;
        assert!(stats.rounds() <= info.rounds_played);
    }
}
