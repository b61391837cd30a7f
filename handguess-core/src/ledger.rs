use crate::types::Stats;

/// Balance and win/loss bookkeeping for one session.
///
/// Read access is public; every mutation goes through the engine.
#[derive(Debug, Clone)]
pub struct SessionLedger {
    balance: u64,
    starting_balance: u64,
    stats: Stats,
}

impl SessionLedger {
    pub fn new(starting_balance: u64) -> Self {
        Self {
            balance: starting_balance,
            starting_balance,
            stats: Stats::default(),
        }
    }

    pub fn balance(&self) -> u64 {
        self.balance
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn win_rate(&self) -> f64 {
        self.stats.win_rate()
    }

    pub fn is_broke(&self, min_bet: u64) -> bool {
        self.balance < min_bet
    }

    /// Take the stake out of the balance. Returns false, leaving the balance
    /// untouched, if it cannot cover the amount.
    pub(crate) fn debit(&mut self, amount: u64) -> bool {
        match self.balance.checked_sub(amount) {
            Some(balance) => {
                self.balance = balance;
                true
            }
            None => false,
        }
    }

    pub(crate) fn credit(&mut self, amount: u64) {
        self.balance = self.balance.saturating_add(amount);
    }

    pub(crate) fn record_win(&mut self) {
        self.stats.wins += 1;
    }

    pub(crate) fn record_loss(&mut self) {
        self.stats.losses += 1;
    }

    pub(crate) fn refill(&mut self) {
        self.balance = self.starting_balance;
    }
}
