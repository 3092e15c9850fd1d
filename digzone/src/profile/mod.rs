//! Player profile and currency.
//!
//! The balance is only ever changed through [`ProfileStore::try_debit`] and
//! [`ProfileStore::credit`]. Debits are check-and-subtract in one critical
//! section, so two concurrent purchases can never overdraw the account.

mod steps;

pub use steps::StepAccrual;

use std::future::Future;
use std::sync::Arc;

use chrono::NaiveDate;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from profile stores.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProfileError {
    /// Backend refused the operation
    #[error("Profile store unavailable: {0}")]
    Unavailable(String),

    /// Credit would overflow the balance
    #[error("Balance overflow: {balance} + {amount}")]
    Overflow { balance: u64, amount: u64 },
}

/// Result of a debit attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebitOutcome {
    /// Amount was subtracted
    Debited { remaining: u64 },
    /// Balance was too low; nothing changed
    Insufficient { balance: u64 },
}

/// Persisted player state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub balance: u64,
    #[serde(default)]
    pub steps: StepAccrual,
}

/// Currency storage.
pub trait ProfileStore: Send + Sync + 'static {
    fn balance(&self) -> impl Future<Output = Result<u64, ProfileError>> + Send;

    /// Atomically subtracts `amount` if the balance covers it.
    fn try_debit(&self, amount: u64)
        -> impl Future<Output = Result<DebitOutcome, ProfileError>> + Send;

    /// Adds `amount` and returns the new balance.
    fn credit(&self, amount: u64) -> impl Future<Output = Result<u64, ProfileError>> + Send;
}

impl<T: ProfileStore> ProfileStore for Arc<T> {
    fn balance(&self) -> impl Future<Output = Result<u64, ProfileError>> + Send {
        (**self).balance()
    }

    fn try_debit(
        &self,
        amount: u64,
    ) -> impl Future<Output = Result<DebitOutcome, ProfileError>> + Send {
        (**self).try_debit(amount)
    }

    fn credit(&self, amount: u64) -> impl Future<Output = Result<u64, ProfileError>> + Send {
        (**self).credit(amount)
    }
}

/// In-process profile store.
#[derive(Debug, Default)]
pub struct MemoryProfileStore {
    profile: Mutex<PlayerProfile>,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_balance(balance: u64) -> Self {
        Self {
            profile: Mutex::new(PlayerProfile {
                balance,
                ..Default::default()
            }),
        }
    }

    /// Snapshot of the stored profile.
    pub fn profile(&self) -> PlayerProfile {
        self.profile.lock().clone()
    }

    /// Feeds a cumulative step-counter reading and credits any new steps.
    ///
    /// Returns the number of coins earned by this reading.
    pub fn record_steps(&self, day: NaiveDate, reading: u64) -> Result<u64, ProfileError> {
        let mut profile = self.profile.lock();
        let mut steps = profile.steps.clone();
        let earned = steps.record(day, reading);

        let balance = profile
            .balance
            .checked_add(earned)
            .ok_or(ProfileError::Overflow {
                balance: profile.balance,
                amount: earned,
            })?;

        // Baseline only moves once the coins are credited
        profile.steps = steps;
        profile.balance = balance;
        Ok(earned)
    }
}

impl ProfileStore for MemoryProfileStore {
    async fn balance(&self) -> Result<u64, ProfileError> {
        Ok(self.profile.lock().balance)
    }

    async fn try_debit(&self, amount: u64) -> Result<DebitOutcome, ProfileError> {
        let mut profile = self.profile.lock();
        if profile.balance < amount {
            return Ok(DebitOutcome::Insufficient {
                balance: profile.balance,
            });
        }
        profile.balance -= amount;
        Ok(DebitOutcome::Debited {
            remaining: profile.balance,
        })
    }

    async fn credit(&self, amount: u64) -> Result<u64, ProfileError> {
        let mut profile = self.profile.lock();
        profile.balance = profile
            .balance
            .checked_add(amount)
            .ok_or(ProfileError::Overflow {
                balance: profile.balance,
                amount,
            })?;
        Ok(profile.balance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_debit_within_balance() {
        let store = MemoryProfileStore::with_balance(1500);

        let outcome = store.try_debit(1000).await.unwrap();
        assert_eq!(outcome, DebitOutcome::Debited { remaining: 500 });
        assert_eq!(store.balance().await.unwrap(), 500);
    }

    #[tokio::test]
    async fn test_insufficient_debit_leaves_balance() {
        let store = MemoryProfileStore::with_balance(500);

        let outcome = store.try_debit(1000).await.unwrap();
        assert_eq!(outcome, DebitOutcome::Insufficient { balance: 500 });
        assert_eq!(store.balance().await.unwrap(), 500);
    }

    #[tokio::test]
    async fn test_exact_balance_debit() {
        let store = MemoryProfileStore::with_balance(500);
        assert_eq!(
            store.try_debit(500).await.unwrap(),
            DebitOutcome::Debited { remaining: 0 }
        );
    }

    #[tokio::test]
    async fn test_concurrent_debits_never_overdraw() {
        let store = Arc::new(MemoryProfileStore::with_balance(2500));

        let mut handles = Vec::new();
        for _ in 0..10 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move { store.try_debit(1000).await.unwrap() }));
        }

        let mut debited = 0;
        for handle in handles {
            if matches!(handle.await.unwrap(), DebitOutcome::Debited { .. }) {
                debited += 1;
            }
        }

        assert_eq!(debited, 2);
        assert_eq!(store.balance().await.unwrap(), 500);
    }

    #[tokio::test]
    async fn test_credit_overflow() {
        let store = MemoryProfileStore::with_balance(u64::MAX);
        let result = store.credit(1).await;
        assert!(matches!(result, Err(ProfileError::Overflow { .. })));
        assert_eq!(store.balance().await.unwrap(), u64::MAX);
    }

    #[tokio::test]
    async fn test_record_steps_credits_balance() {
        let store = MemoryProfileStore::with_balance(10);
        let day = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();

        assert_eq!(store.record_steps(day, 1000).unwrap(), 0);
        assert_eq!(store.record_steps(day, 1250).unwrap(), 250);
        assert_eq!(store.balance().await.unwrap(), 260);
        assert_eq!(store.profile().steps.last_steps(), Some(1250));
    }

    #[tokio::test]
    async fn test_record_steps_overflow_keeps_steps_unspent() {
        let store = MemoryProfileStore::with_balance(u64::MAX - 100);
        let day = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        store.record_steps(day, 1000).unwrap();

        let result = store.record_steps(day, 1500);
        assert!(matches!(result, Err(ProfileError::Overflow { amount: 500, .. })));
        assert_eq!(store.profile().steps.last_steps(), Some(1000));
        assert_eq!(store.balance().await.unwrap(), u64::MAX - 100);

        // Spending makes room and the same reading still pays out
        store.try_debit(1000).await.unwrap();
        assert_eq!(store.record_steps(day, 1500).unwrap(), 500);
    }
}
