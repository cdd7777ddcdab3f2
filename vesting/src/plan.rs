//! Plan classes, cliff tables and the lock calculator.

use serde::{Deserialize, Serialize};
use vestgate_types::Timestamp;

/// Team cliffs, in days after incubation. Each cliff unlocks a quarter of the plan.
pub const TEAM_CLIFF_DAYS: [u64; 4] = [180, 360, 540, 720];

/// External / advisor cliff: the whole plan unlocks at once.
pub const EXTERNAL_CLIFF_DAYS: [u64; 1] = [180];

/// Holder class; selects the unlock curve.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanClass {
    Team,
    External,
}

impl PlanClass {
    pub fn from_is_team(is_team: bool) -> Self {
        if is_team {
            Self::Team
        } else {
            Self::External
        }
    }

    pub fn cliffs(self) -> &'static [u64] {
        match self {
            Self::Team => &TEAM_CLIFF_DAYS,
            Self::External => &EXTERNAL_CLIFF_DAYS,
        }
    }

    /// Stage before any cliff has passed (team 4, external 1).
    pub fn initial_stage(self) -> u8 {
        self.cliffs().len() as u8
    }

    /// Days after incubation at which the plan is fully unlocked.
    pub fn final_cliff_days(self) -> u64 {
        self.cliffs().last().copied().unwrap_or(0)
    }

    /// Stage after `elapsed_days`: the number of cliffs still ahead.
    pub fn stage_at(self, elapsed_days: u64) -> u8 {
        let passed = self.cliffs().iter().filter(|&&d| elapsed_days >= d).count();
        (self.cliffs().len() - passed) as u8
    }

    /// Amount of `total` still locked at `stage`.
    ///
    /// Unlocking is proportional to passed cliffs and rounds the unlocked
    /// share down, so a remainder stays locked until the final cliff.
    pub fn locked_at_stage(self, total: u128, stage: u8) -> u128 {
        let steps = self.cliffs().len() as u128;
        let stage = (stage as u128).min(steps);
        let passed = steps - stage;
        // floor(total * passed / steps) without overflowing on huge totals.
        let unlocked = (total / steps) * passed + (total % steps) * passed / steps;
        total - unlocked
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Team => "team",
            Self::External => "external",
        }
    }
}

/// Locked amount and stage at a given instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockState {
    pub locked: u128,
    pub stage: u8,
}

/// A single holder's plan.
///
/// `locked_remaining` and `stage` are the snapshot persisted by the last
/// refresh (or at creation). Transfer checks never read them; they recompute
/// from time through [`VestingPlan::lock_at`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VestingPlan {
    pub total_locked: u128,
    pub class: PlanClass,
    pub locked_remaining: u128,
    pub stage: u8,
}

impl VestingPlan {
    pub fn new(total_locked: u128, class: PlanClass) -> Self {
        Self {
            total_locked,
            class,
            locked_remaining: total_locked,
            stage: class.initial_stage(),
        }
    }

    /// Lock in force at `now`. Before release (`incubation == None`) the
    /// whole plan is locked.
    pub fn lock_at(&self, now: Timestamp, incubation: Option<Timestamp>) -> LockState {
        let stage = match incubation {
            Some(t0) => self.class.stage_at(t0.elapsed_days(now)),
            None => self.class.initial_stage(),
        };
        LockState {
            locked: self.class.locked_at_stage(self.total_locked, stage),
            stage,
        }
    }

    /// Whether every cliff has passed at `now`.
    pub fn is_exhausted_at(&self, now: Timestamp, incubation: Option<Timestamp>) -> bool {
        self.lock_at(now, incubation).stage == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vestgate_types::time::SECS_PER_DAY;

    fn day(t0: u64, days: u64) -> Timestamp {
        Timestamp::new(t0 + days * SECS_PER_DAY)
    }

    #[test]
    fn team_stages_follow_cliffs() {
        let c = PlanClass::Team;
        assert_eq!(c.stage_at(0), 4);
        assert_eq!(c.stage_at(179), 4);
        assert_eq!(c.stage_at(180), 3);
        assert_eq!(c.stage_at(359), 3);
        assert_eq!(c.stage_at(360), 2);
        assert_eq!(c.stage_at(540), 1);
        assert_eq!(c.stage_at(719), 1);
        assert_eq!(c.stage_at(720), 0);
        assert_eq!(c.stage_at(10_000), 0);
    }

    #[test]
    fn external_is_a_single_cliff() {
        let c = PlanClass::External;
        assert_eq!(c.initial_stage(), 1);
        assert_eq!(c.stage_at(179), 1);
        assert_eq!(c.stage_at(180), 0);
        assert_eq!(c.locked_at_stage(1000, 1), 1000);
        assert_eq!(c.locked_at_stage(1000, 0), 0);
    }

    #[test]
    fn team_800_scenario() {
        let plan = VestingPlan::new(800, PlanClass::Team);
        let t0 = 1_000_000;
        let inc = Some(Timestamp::new(t0));
        let locked = |d: u64| plan.lock_at(day(t0, d), inc).locked;
        assert_eq!(locked(0), 800);
        assert_eq!(locked(179), 800);
        assert_eq!(locked(180), 600);
        assert_eq!(locked(360), 400);
        assert_eq!(locked(540), 200);
        assert_eq!(locked(720), 0);
    }

    #[test]
    fn remainder_stays_locked_until_final_cliff() {
        let c = PlanClass::Team;
        // 7 = 4 * 1 + 3: quarters unlock 1, 3, 5, then everything.
        assert_eq!(c.locked_at_stage(7, 4), 7);
        assert_eq!(c.locked_at_stage(7, 3), 6);
        assert_eq!(c.locked_at_stage(7, 2), 4);
        assert_eq!(c.locked_at_stage(7, 1), 2);
        assert_eq!(c.locked_at_stage(7, 0), 0);
    }

    #[test]
    fn huge_totals_do_not_overflow() {
        let c = PlanClass::Team;
        assert_eq!(c.locked_at_stage(u128::MAX, 4), u128::MAX);
        assert_eq!(c.locked_at_stage(u128::MAX, 0), 0);
        assert!(c.locked_at_stage(u128::MAX, 2) < u128::MAX);
    }

    #[test]
    fn fully_locked_before_release() {
        let plan = VestingPlan::new(500, PlanClass::Team);
        let state = plan.lock_at(Timestamp::new(u64::MAX), None);
        assert_eq!(state, LockState { locked: 500, stage: 4 });
        assert!(!plan.is_exhausted_at(Timestamp::new(u64::MAX), None));
    }

    #[test]
    fn final_cliff_days() {
        assert_eq!(PlanClass::Team.final_cliff_days(), 720);
        assert_eq!(PlanClass::External.final_cliff_days(), 180);
    }
}
