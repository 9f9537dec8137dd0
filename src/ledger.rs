use std::{collections::HashMap, path::PathBuf};

use thiserror::Error;

use crate::{
    config::{PointsConfig, StorageConfig},
    store::{self, StoreError},
};

/// The persisted per-user state: a points balance and a count of watched
/// minutes, each keyed by username exactly as chat supplies it. Every
/// mutation writes the affected mapping back to disk before returning.
pub struct Ledger {
    points: HashMap<String, u64>,
    watchtime: HashMap<String, u64>,
    points_file: PathBuf,
    watchtime_file: PathBuf,
    config: PointsConfig,
}

impl Ledger {
    /// Loads both mappings from their files. Files that don't exist yet load
    /// as empty mappings.
    pub fn load(points_config: &PointsConfig, storage: &StorageConfig) -> Result<Self, StoreError> {
        Ok(Self {
            points: store::load_counts(&storage.points_file)?,
            watchtime: store::load_counts(&storage.watchtime_file)?,
            points_file: storage.points_file.clone(),
            watchtime_file: storage.watchtime_file.clone(),
            config: points_config.clone(),
        })
    }

    /// The user's balance, or the starting balance if they've never chatted.
    pub fn get_points(&self, user: &str) -> u64 {
        self.points
            .get(user)
            .copied()
            .unwrap_or(self.config.starting_balance)
    }

    /// Minutes of watch-time on record for the user.
    pub fn get_watchtime(&self, user: &str) -> u64 {
        self.watchtime.get(user).copied().unwrap_or(0)
    }

    /// Seeds default records for a user the first time they chat: the
    /// starting balance and zero watch-time. Returns whether the user was
    /// new. Idempotent, and only touches disk when something was inserted.
    pub fn ensure_seen(&mut self, user: &str) -> Result<bool, StoreError> {
        let mut inserted = false;

        if !self.watchtime.contains_key(user) {
            self.watchtime.insert(user.to_owned(), 0);
            inserted = true;
        }
        if !self.points.contains_key(user) {
            self.points
                .insert(user.to_owned(), self.config.starting_balance);
            inserted = true;
        }

        if inserted {
            self.save_watchtime()?;
            self.save_points()?;
        }

        Ok(inserted)
    }

    /// Adds to the user's balance and persists it. Returns the new balance.
    pub fn credit(&mut self, user: &str, amount: u64) -> Result<u64, LedgerError> {
        let new_balance = {
            let balance = self.points.entry(user.to_owned()).or_insert(0);
            *balance += amount;
            *balance
        };
        self.save_points()?;
        Ok(new_balance)
    }

    /// Subtracts from the user's balance and persists it. Returns the new
    /// balance. Call sites are expected to check the balance first; an
    /// overdraft is still refused here rather than wrapping.
    pub fn debit(&mut self, user: &str, amount: u64) -> Result<u64, LedgerError> {
        let current = self.points.get(user).copied().unwrap_or(0);
        let new_balance = current
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientFunds)?;

        self.points.insert(user.to_owned(), new_balance);
        self.save_points()?;
        Ok(new_balance)
    }

    /// One accrual tick: every known user gains a minute of watch-time, and
    /// anyone whose new total lands on a multiple of the bonus interval gets
    /// the watch bonus. Both mappings are persisted once, at the end.
    ///
    /// A user present in the watch-time mapping but absent from the points
    /// mapping (the two files can diverge after a crash) receives exactly
    /// the bonus, not the starting balance.
    pub fn tick_accrual(&mut self) -> Result<(), StoreError> {
        let mut bonus_users = Vec::new();

        for (user, minutes) in self.watchtime.iter_mut() {
            *minutes += 1;
            if *minutes % self.config.watch_bonus_minutes == 0 {
                bonus_users.push(user.clone());
            }
        }

        for user in bonus_users {
            *self.points.entry(user).or_insert(0) += self.config.watch_bonus;
        }

        self.save_watchtime()?;
        self.save_points()?;
        Ok(())
    }

    fn save_points(&self) -> Result<(), StoreError> {
        store::save_counts(&self.points_file, &self.points)
    }

    fn save_watchtime(&self) -> Result<(), StoreError> {
        store::save_counts(&self.watchtime_file, &self.watchtime)
    }
}

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("error with stored data :< {0}")]
    Store(#[from] StoreError),

    #[error("not enough points")]
    InsufficientFunds,
}

#[cfg(test)]
mod tests {
    use std::{env, fs};

    use super::*;

    fn temp_storage(name: &str) -> StorageConfig {
        let dir = env::temp_dir();
        let tag = format!("tally_bot_ledger_{}_{}", std::process::id(), name);
        let storage = StorageConfig {
            token_file: dir.join(format!("{tag}_token.txt")),
            points_file: dir.join(format!("{tag}_points.txt")),
            watchtime_file: dir.join(format!("{tag}_watchtime.txt")),
        };
        let _ = fs::remove_file(&storage.points_file);
        let _ = fs::remove_file(&storage.watchtime_file);
        storage
    }

    fn temp_ledger(name: &str) -> Ledger {
        Ledger::load(&PointsConfig::default(), &temp_storage(name)).unwrap()
    }

    #[test]
    fn first_message_seeds_defaults() {
        let mut ledger = temp_ledger("seed");

        assert!(ledger.ensure_seen("alice").unwrap());
        assert_eq!(ledger.get_points("alice"), 1000);
        assert_eq!(ledger.get_watchtime("alice"), 0);

        // second sighting changes nothing
        assert!(!ledger.ensure_seen("alice").unwrap());
        assert_eq!(ledger.get_points("alice"), 1000);
    }

    #[test]
    fn sixty_ticks_accrue_exactly_one_bonus() {
        let mut ledger = temp_ledger("accrual");
        ledger.ensure_seen("alice").unwrap();

        for _ in 0..60 {
            ledger.tick_accrual().unwrap();
        }

        assert_eq!(ledger.get_watchtime("alice"), 60);
        assert_eq!(ledger.get_points("alice"), 1500);
    }

    #[test]
    fn accrual_bonus_ignores_missing_points_entry() {
        // a watch-time record without a matching points record (the files
        // can diverge after a crash) earns the bare bonus, not the starting
        // balance plus the bonus
        let storage = temp_storage("diverged");
        let mut watchtime = HashMap::new();
        watchtime.insert("ghost".to_owned(), 59);
        store::save_counts(&storage.watchtime_file, &watchtime).unwrap();

        let mut ledger = Ledger::load(&PointsConfig::default(), &storage).unwrap();
        ledger.tick_accrual().unwrap();

        assert_eq!(ledger.get_watchtime("ghost"), 60);
        assert_eq!(ledger.points.get("ghost").copied(), Some(500));
    }

    #[test]
    fn credit_and_debit_move_balance_exactly() {
        let mut ledger = temp_ledger("wager");
        ledger.ensure_seen("alice").unwrap();

        assert_eq!(ledger.credit("alice", 200).unwrap(), 1200);
        assert_eq!(ledger.debit("alice", 200).unwrap(), 1000);
    }

    #[test]
    fn overdraft_is_refused_and_leaves_balance_alone() {
        let mut ledger = temp_ledger("overdraft");
        ledger.ensure_seen("alice").unwrap();

        assert!(matches!(
            ledger.debit("alice", 1001),
            Err(LedgerError::InsufficientFunds)
        ));
        assert_eq!(ledger.get_points("alice"), 1000);
    }

    #[test]
    fn win_then_hour_of_watching() {
        // alice chats, wins a 200 point wager, then watches for an hour
        let storage = temp_storage("scenario");
        let mut ledger = Ledger::load(&PointsConfig::default(), &storage).unwrap();

        ledger.ensure_seen("alice").unwrap();
        ledger.credit("alice", 200).unwrap();
        assert_eq!(ledger.get_points("alice"), 1200);

        for _ in 0..60 {
            ledger.tick_accrual().unwrap();
        }
        assert_eq!(ledger.get_watchtime("alice"), 60);
        assert_eq!(ledger.get_points("alice"), 1700);

        // everything above survived to disk
        let reloaded = Ledger::load(&PointsConfig::default(), &storage).unwrap();
        assert_eq!(reloaded.get_points("alice"), 1700);
        assert_eq!(reloaded.get_watchtime("alice"), 60);
    }
}
