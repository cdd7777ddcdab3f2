use proptest::prelude::*;

use vestgate_types::time::SECS_PER_DAY;
use vestgate_types::{Address, Timestamp};
use vestgate_vesting::{PlanClass, VestingPlan, VestingSchedule};

fn class() -> impl Strategy<Value = PlanClass> {
    prop_oneof![Just(PlanClass::Team), Just(PlanClass::External)]
}

proptest! {
    /// The lock never grows as time advances.
    #[test]
    fn lock_is_non_increasing_in_time(
        total in 0u128..u128::MAX / 2,
        class in class(),
        t0 in 0u64..2_000_000_000,
        a in 0u64..1_000 * SECS_PER_DAY,
        b in 0u64..1_000 * SECS_PER_DAY,
    ) {
        let plan = VestingPlan::new(total, class);
        let inc = Some(Timestamp::new(t0));
        let (early, late) = if a <= b { (a, b) } else { (b, a) };
        let l_early = plan.lock_at(Timestamp::new(t0 + early), inc);
        let l_late = plan.lock_at(Timestamp::new(t0 + late), inc);
        prop_assert!(l_late.locked <= l_early.locked);
        prop_assert!(l_late.stage <= l_early.stage);
        prop_assert!(l_early.locked <= total);
    }

    /// Nothing is locked at or after the final cliff; something is locked
    /// (for a nonzero plan) just before it.
    #[test]
    fn lock_reaches_zero_exactly_at_final_cliff(
        total in 1u128..1_000_000_000_000,
        class in class(),
        t0 in 0u64..2_000_000_000,
        extra in 0u64..10_000 * SECS_PER_DAY,
    ) {
        let plan = VestingPlan::new(total, class);
        let inc = Some(Timestamp::new(t0));
        let final_cliff = t0 + class.final_cliff_days() * SECS_PER_DAY;
        prop_assert_eq!(plan.lock_at(Timestamp::new(final_cliff + extra), inc).locked, 0);
        prop_assert!(plan.lock_at(Timestamp::new(final_cliff - 1), inc).locked > 0);
    }

    /// Refreshing twice at the same instant yields the same status.
    #[test]
    fn refresh_is_idempotent(
        total in 0u128..1_000_000_000_000,
        class in class(),
        offset in 0u64..1_000 * SECS_PER_DAY,
    ) {
        let holder = Address::from_low_u64(1);
        let t0 = Timestamp::new(1_000);
        let now = Timestamp::new(1_000 + offset);
        let mut schedule = VestingSchedule::new();
        schedule.set_plan(holder, total, class, false).unwrap();
        let first = schedule.refresh(&holder, now, Some(t0)).unwrap();
        let second = schedule.refresh(&holder, now, Some(t0)).unwrap();
        prop_assert_eq!(first, second);
        prop_assert_eq!(first.locked_remaining, schedule.currently_locked(&holder, now, Some(t0)).locked);
    }
}
