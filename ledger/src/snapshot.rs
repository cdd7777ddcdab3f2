//! Ledger snapshots: capture every balance and allowance at a point in time.
//!
//! Entries are sorted by address before hashing, so two ledgers holding the
//! same state always produce the same snapshot hash regardless of map order.

use serde::{Deserialize, Serialize};

use vestgate_types::{Address, Timestamp};

use crate::error::LedgerError;
use crate::ledger::Ledger;

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// A ledger snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// Blake2b-256 over the snapshot contents.
    pub hash: [u8; 32],
    /// When the snapshot was taken.
    pub created_at: Timestamp,
    pub total_supply: u128,
    /// Nonzero balances, sorted by address.
    pub balances: Vec<BalanceSnapshot>,
    /// Nonzero allowances, sorted by (owner, spender).
    pub allowances: Vec<AllowanceSnapshot>,
    /// Snapshot version for compatibility.
    pub version: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSnapshot {
    pub address: Address,
    pub balance: u128,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowanceSnapshot {
    pub owner: Address,
    pub spender: Address,
    pub amount: u128,
}

impl LedgerSnapshot {
    /// Capture the current state of `ledger`.
    pub fn create(ledger: &Ledger, created_at: Timestamp) -> Self {
        let mut balances: Vec<BalanceSnapshot> = ledger
            .holders()
            .map(|(address, balance)| BalanceSnapshot {
                address: *address,
                balance,
            })
            .collect();
        balances.sort_by(|a, b| a.address.cmp(&b.address));

        let mut allowances: Vec<AllowanceSnapshot> = ledger
            .allowances()
            .map(|(owner, spender, amount)| AllowanceSnapshot {
                owner: *owner,
                spender: *spender,
                amount,
            })
            .collect();
        allowances.sort_by(|a, b| (a.owner, a.spender).cmp(&(b.owner, b.spender)));

        let mut snap = Self {
            hash: [0u8; 32],
            created_at,
            total_supply: ledger.total_supply(),
            balances,
            allowances,
            version: SNAPSHOT_VERSION,
        };
        snap.hash = snap.compute_hash();
        snap
    }

    /// Compute the Blake2b-256 hash of this snapshot deterministically.
    fn compute_hash(&self) -> [u8; 32] {
        use blake2::digest::consts::U32;
        use blake2::{Blake2b, Digest};

        let mut hasher = Blake2b::<U32>::new();
        hasher.update(self.version.to_le_bytes());
        hasher.update(self.created_at.as_secs().to_le_bytes());
        hasher.update(self.total_supply.to_le_bytes());
        for entry in &self.balances {
            hasher.update(entry.address.as_bytes());
            hasher.update(entry.balance.to_le_bytes());
        }
        for entry in &self.allowances {
            hasher.update(entry.owner.as_bytes());
            hasher.update(entry.spender.as_bytes());
            hasher.update(entry.amount.to_le_bytes());
        }

        let result = hasher.finalize();
        let mut out = [0u8; 32];
        out.copy_from_slice(&result);
        out
    }

    /// Verify the snapshot hash matches its contents.
    pub fn verify(&self) -> bool {
        self.hash == self.compute_hash()
    }

    /// Serialize the snapshot to bytes (bincode).
    pub fn to_bytes(&self) -> Result<Vec<u8>, LedgerError> {
        bincode::serialize(self).map_err(|e| LedgerError::Encoding(e.to_string()))
    }

    /// Deserialize a snapshot from bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, LedgerError> {
        bincode::deserialize(bytes).map_err(|e| LedgerError::Encoding(e.to_string()))
    }

    /// Number of accounts holding a balance in this snapshot.
    pub fn holder_count(&self) -> usize {
        self.balances.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genesis::GenesisConfig;

    fn addr(n: u64) -> Address {
        Address::from_low_u64(n)
    }

    fn sample_ledger() -> Ledger {
        let mut ledger = Ledger::with_genesis(&GenesisConfig::new(addr(1), 1_000, 0)).unwrap();
        ledger.transfer(&addr(1), &addr(3), 300).unwrap();
        ledger.transfer(&addr(1), &addr(2), 200).unwrap();
        ledger.approve(addr(2), addr(3), 50);
        ledger
    }

    #[test]
    fn test_create_and_verify() {
        let snap = LedgerSnapshot::create(&sample_ledger(), Timestamp::new(42));
        assert!(snap.verify());
        assert_eq!(snap.version, SNAPSHOT_VERSION);
        assert_eq!(snap.holder_count(), 3);
        assert_eq!(snap.total_supply, 1_000);
        let order: Vec<Address> = snap.balances.iter().map(|b| b.address).collect();
        assert_eq!(order, vec![addr(1), addr(2), addr(3)]);
    }

    #[test]
    fn test_tampered_snapshot_fails_verification() {
        let mut snap = LedgerSnapshot::create(&sample_ledger(), Timestamp::new(42));
        snap.balances[0].balance += 1;
        assert!(!snap.verify());
        assert_eq!(Ledger::restore(&snap).unwrap_err(), LedgerError::CorruptSnapshot);
    }

    #[test]
    fn test_bytes_restore_same_state() {
        let ledger = sample_ledger();
        let snap = LedgerSnapshot::create(&ledger, Timestamp::new(7));
        let decoded = LedgerSnapshot::from_bytes(&snap.to_bytes().unwrap()).unwrap();
        assert_eq!(decoded, snap);

        let restored = Ledger::restore(&decoded).unwrap();
        assert_eq!(restored.balance_of(&addr(1)), 500);
        assert_eq!(restored.balance_of(&addr(2)), 200);
        assert_eq!(restored.allowance(&addr(2), &addr(3)), 50);
        assert_eq!(restored.total_supply(), ledger.total_supply());
    }

    #[test]
    fn test_restore_rejects_supply_mismatch() {
        let mut snap = LedgerSnapshot::create(&sample_ledger(), Timestamp::new(1));
        snap.total_supply = 999;
        snap.hash = snap.compute_hash();
        assert_eq!(
            Ledger::restore(&snap).unwrap_err(),
            LedgerError::SupplyMismatch {
                expected: 999,
                actual: 1_000
            }
        );
    }

    #[test]
    fn test_garbage_bytes_are_rejected() {
        assert!(matches!(
            LedgerSnapshot::from_bytes(&[1, 2, 3]),
            Err(LedgerError::Encoding(_))
        ));
    }
}
