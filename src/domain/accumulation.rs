//! Ordered wallet accumulation owned by the pipeline
//!
//! The ledger is the single mutable state of a run: the pipeline appends to
//! it once per pair iteration and reads it exactly once at the end to build
//! the flat output. Group order is first-insertion order and wallet order is
//! append order, so the site's ranking survives into the output file.
//!
//! Repeated wallets for the same pair are kept as-is. Dedup here would be a
//! one-line filter in [`WalletLedger::flatten`], but the observed pipeline
//! behavior appends without dedup and the output consumer counts rows.

use super::model::TraderRecord;

/// Append-only mapping from pair name to the wallets observed for it
#[derive(Debug, Clone, Default)]
pub struct WalletLedger {
    groups: Vec<Group>,
}

#[derive(Debug, Clone)]
struct Group {
    pair: String,
    wallets: Vec<String>,
}

impl WalletLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append wallets under a pair name, creating the group on first touch
    ///
    /// A repeated visit to the same pair appends to the existing group and
    /// does not change the group's position.
    pub fn append(&mut self, pair: &str, wallets: impl IntoIterator<Item = String>) {
        match self.groups.iter_mut().find(|g| g.pair == pair) {
            Some(group) => group.wallets.extend(wallets),
            None => self.groups.push(Group {
                pair: pair.to_string(),
                wallets: wallets.into_iter().collect(),
            }),
        }
    }

    /// Total wallets accumulated across all groups
    pub fn record_count(&self) -> usize {
        self.groups.iter().map(|g| g.wallets.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.record_count() == 0
    }

    /// Flatten into one record per (pair, wallet), groups in first-insertion
    /// order and wallets in append order
    ///
    /// Pure read: flattening twice yields identical sequences.
    pub fn flatten(&self) -> Vec<TraderRecord> {
        self.groups
            .iter()
            .flat_map(|group| {
                group.wallets.iter().map(|wallet| TraderRecord {
                    pair: group.pair.clone(),
                    wallet: wallet.clone(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wallets(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn flatten_preserves_group_and_append_order() {
        let mut ledger = WalletLedger::new();
        ledger.append("PEPE", wallets(&["a1", "a2"]));
        ledger.append("WIF", wallets(&["b1"]));
        ledger.append("BONK", wallets(&["c1", "c2", "c3"]));

        let records = ledger.flatten();
        let pairs: Vec<_> = records.iter().map(|r| r.pair.as_str()).collect();
        assert_eq!(
            pairs,
            ["PEPE", "PEPE", "WIF", "BONK", "BONK", "BONK"]
        );
        let wallets: Vec<_> = records.iter().map(|r| r.wallet.as_str()).collect();
        assert_eq!(wallets, ["a1", "a2", "b1", "c1", "c2", "c3"]);
    }

    #[test]
    fn repeated_visit_appends_without_dedup_or_reorder() {
        let mut ledger = WalletLedger::new();
        ledger.append("PEPE", wallets(&["a1"]));
        ledger.append("WIF", wallets(&["b1"]));
        ledger.append("PEPE", wallets(&["a1", "a2"]));

        let records = ledger.flatten();
        let flat: Vec<_> = records
            .iter()
            .map(|r| format!("{}:{}", r.pair, r.wallet))
            .collect();
        // duplicate a1 kept, PEPE still first
        assert_eq!(flat, ["PEPE:a1", "PEPE:a1", "PEPE:a2", "WIF:b1"]);
    }

    #[test]
    fn flatten_is_idempotent() {
        let mut ledger = WalletLedger::new();
        ledger.append("PEPE", wallets(&["a1", "a2"]));
        ledger.append("WIF", wallets(&["b1"]));

        assert_eq!(ledger.flatten(), ledger.flatten());
    }

    #[test]
    fn empty_group_contributes_no_records() {
        let mut ledger = WalletLedger::new();
        ledger.append("PEPE", wallets(&[]));
        assert!(ledger.is_empty());
        assert!(ledger.flatten().is_empty());
    }
}
