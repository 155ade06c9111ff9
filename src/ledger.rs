//! Currency ledger boundary
//!
//! The world only emits `Pickup` events and asks how many collectibles a
//! finished task is worth. Whatever keeps the books implements
//! `CurrencyLedger`; `Wallet` is the in-memory one the browser host uses.

use serde::{Deserialize, Serialize};

use crate::sim::GameEvent;

/// Coins a fresh wallet starts with
pub const STARTING_BALANCE: u64 = 200;
/// Each pumpkin seed doubles the spawn count, up to this many doublings
pub const MAX_SEED_DOUBLINGS: u32 = 6;

pub trait CurrencyLedger {
    /// Add a pickup reward
    fn credit(&mut self, amount: u32);
    fn balance(&self) -> u64;
    /// Collectibles spawned per finished task (never 0)
    fn spawn_multiplier(&self) -> u32;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    pub balance: u64,
    pub pumpkin_seeds: u32,
}

impl Default for Wallet {
    fn default() -> Self {
        Self {
            balance: STARTING_BALANCE,
            pumpkin_seeds: 0,
        }
    }
}

impl Wallet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pay `amount`; refuses (and changes nothing) if the balance is short
    pub fn spend(&mut self, amount: u64) -> bool {
        match self.balance.checked_sub(amount) {
            Some(rest) => {
                self.balance = rest;
                true
            }
            None => false,
        }
    }

    pub fn add_pumpkin_seed(&mut self) {
        self.pumpkin_seeds = self.pumpkin_seeds.saturating_add(1);
    }
}

impl CurrencyLedger for Wallet {
    fn credit(&mut self, amount: u32) {
        self.balance = self.balance.saturating_add(u64::from(amount));
    }

    fn balance(&self) -> u64 {
        self.balance
    }

    fn spawn_multiplier(&self) -> u32 {
        1 << self.pumpkin_seeds.min(MAX_SEED_DOUBLINGS)
    }
}

/// Credit every pickup in `events`; returns the total credited
pub fn settle_pickups<L: CurrencyLedger + ?Sized>(events: &[GameEvent], ledger: &mut L) -> u64 {
    let mut total = 0;
    for event in events {
        if let GameEvent::Pickup { reward, .. } = event {
            ledger.credit(*reward);
            total += u64::from(*reward);
        }
    }
    total
}
