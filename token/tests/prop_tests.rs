use proptest::prelude::*;

use vestgate_nullables::NullClock;
use vestgate_token::{ErrorKind, Token, TokenConfig};
use vestgate_types::Address;

fn addr(n: u8) -> Address {
    Address::from_low_u64(n as u64 + 1)
}

fn new_token(clock: &NullClock) -> Token<&NullClock> {
    let mut config = TokenConfig::new(addr(0));
    config.total_supply_whole = 10_000;
    config.decimals = 0;
    Token::new(config, clock).unwrap()
}

proptest! {
    /// Whatever the mix of admin calls, transfers and elapsed time, balances
    /// keep summing to the supply and no holder ever drops below its lock.
    #[test]
    fn supply_and_locks_hold(
        ops in prop::collection::vec((0u8..7, 0u8..5, 0u8..5, 0u128..3_000), 1..80),
    ) {
        let clock = NullClock::new(0);
        let mut token = new_token(&clock);
        let owner = token.owner();
        for (kind, a, b, amount) in ops {
            let _ = match kind {
                0 | 1 => token.transfer(&addr(a), &addr(b), amount),
                2 => token.set_transfer_whitelist(&owner, addr(a), b % 2 == 0),
                3 => token.set_vesting_plan(&owner, addr(a), amount, b % 2 == 0).map(|_| ()),
                4 => token.grant_confirmer(&owner, addr(a)).map(|_| ()),
                5 => token.confirm_release(&addr(a)).map(|_| ()),
                _ => {
                    clock.advance_days(amount as u64 % 200);
                    Ok(())
                }
            };
            prop_assert!(token.check_supply_invariant().is_ok());
        }
        // Released or not, a locked holder can never move into its lock.
        for n in 0..5 {
            let holder = addr(n);
            let spendable = token.transferable_balance(&holder);
            if token.transfers_enabled() && spendable < token.balance_of(&holder) {
                let err = token.transfer(&holder, &addr((n + 1) % 5), spendable + 1).unwrap_err();
                prop_assert_eq!(err.kind(), ErrorKind::InsufficientUnlockedBalance);
            }
        }
    }

    /// Before release, a holder that was never whitelisted cannot move funds.
    #[test]
    fn closed_gate_blocks_unlisted(amount in 0u128..1_000) {
        let clock = NullClock::new(0);
        let mut token = new_token(&clock);
        let owner = token.owner();
        token.set_transfer_whitelist(&owner, owner, true).unwrap();
        token.transfer(&owner, &addr(1), 1_000).unwrap();
        let err = token.transfer(&addr(1), &addr(2), amount).unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::TransfersDisabled);
        prop_assert_eq!(token.balance_of(&addr(1)), 1_000);
    }
}
