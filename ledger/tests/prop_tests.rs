use proptest::prelude::*;

use vestgate_ledger::{GenesisConfig, Ledger};
use vestgate_types::Address;

fn addr(n: u8) -> Address {
    Address::from_low_u64(n as u64 + 1)
}

proptest! {
    /// Any sequence of transfers, approvals and delegated transfers keeps the
    /// sum of balances equal to the total supply.
    #[test]
    fn supply_is_conserved(
        ops in prop::collection::vec((0u8..4, 0u8..5, 0u8..5, 0u128..400), 1..60),
    ) {
        let mut ledger = Ledger::with_genesis(&GenesisConfig::new(addr(0), 1_000, 0)).unwrap();
        for (kind, a, b, amount) in ops {
            match kind {
                0 | 1 => {
                    let _ = ledger.transfer(&addr(a), &addr(b), amount);
                }
                2 => ledger.approve(addr(a), addr(b), amount),
                _ => {
                    let _ = ledger.transfer_from(&addr(b), &addr(a), &addr((a + b) % 5), amount);
                }
            }
            prop_assert!(ledger.check_supply_invariant().is_ok());
        }
        let sum: u128 = ledger.holders().map(|(_, b)| b).sum();
        prop_assert_eq!(sum, ledger.total_supply());
    }

    /// A rejected transfer never changes either balance.
    #[test]
    fn failed_transfer_is_atomic(balance in 0u128..1_000, extra in 1u128..1_000) {
        let mut ledger = Ledger::with_genesis(&GenesisConfig::new(addr(0), 1_000, 0)).unwrap();
        ledger.transfer(&addr(0), &addr(1), balance).unwrap();
        let before = (ledger.balance_of(&addr(1)), ledger.balance_of(&addr(2)));
        prop_assert!(ledger.transfer(&addr(1), &addr(2), balance + extra).is_err());
        prop_assert_eq!((ledger.balance_of(&addr(1)), ledger.balance_of(&addr(2))), before);
    }
}
