//! Per-holder plan registry.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use vestgate_types::{Address, Timestamp};

use crate::error::VestingError;
use crate::plan::{LockState, PlanClass, VestingPlan};

/// Observable view of a plan's persisted snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanStatus {
    pub class: PlanClass,
    pub total_locked: u128,
    pub locked_remaining: u128,
    pub stage: u8,
}

impl From<&VestingPlan> for PlanStatus {
    fn from(plan: &VestingPlan) -> Self {
        Self {
            class: plan.class,
            total_locked: plan.total_locked,
            locked_remaining: plan.locked_remaining,
            stage: plan.stage,
        }
    }
}

/// All vesting plans, at most one per holder.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct VestingSchedule {
    plans: HashMap<Address, VestingPlan>,
}

impl VestingSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create or replace `target`'s plan. Only allowed while transfers are
    /// still frozen.
    pub fn set_plan(
        &mut self,
        target: Address,
        total_locked: u128,
        class: PlanClass,
        released: bool,
    ) -> Result<PlanStatus, VestingError> {
        if released {
            return Err(VestingError::AlreadyReleased);
        }
        let plan = VestingPlan::new(total_locked, class);
        let status = PlanStatus::from(&plan);
        if self.plans.insert(target, plan).is_some() {
            info!(%target, total_locked, class = class.as_str(), "vesting plan replaced");
        } else {
            info!(%target, total_locked, class = class.as_str(), "vesting plan created");
        }
        Ok(status)
    }

    /// Lock in force for `target` at `now`, recomputed from elapsed time.
    ///
    /// A holder without a plan has nothing locked (stage 0).
    pub fn currently_locked(
        &self,
        target: &Address,
        now: Timestamp,
        incubation: Option<Timestamp>,
    ) -> LockState {
        match self.plans.get(target) {
            Some(plan) => plan.lock_at(now, incubation),
            None => LockState {
                locked: 0,
                stage: 0,
            },
        }
    }

    /// Recompute and persist `target`'s snapshot at `now`.
    ///
    /// Idempotent for equal `now`, and the persisted lock never grows as
    /// `now` advances.
    pub fn refresh(
        &mut self,
        target: &Address,
        now: Timestamp,
        incubation: Option<Timestamp>,
    ) -> Result<PlanStatus, VestingError> {
        if incubation.is_none() {
            return Err(VestingError::NotYetReleased);
        }
        let plan = self
            .plans
            .get_mut(target)
            .ok_or(VestingError::NoPlan(*target))?;
        let LockState { locked, stage } = plan.lock_at(now, incubation);
        if stage != plan.stage {
            info!(%target, from = plan.stage, to = stage, locked, "vesting plan advanced");
        } else {
            debug!(%target, stage, locked, "vesting plan refreshed");
        }
        plan.locked_remaining = locked;
        plan.stage = stage;
        Ok(PlanStatus::from(&*plan))
    }

    pub fn plan(&self, target: &Address) -> Option<PlanStatus> {
        self.plans.get(target).map(PlanStatus::from)
    }

    pub fn has_plan(&self, target: &Address) -> bool {
        self.plans.contains_key(target)
    }

    /// Whether `target` has a plan whose every cliff has passed at `now`.
    pub fn is_exhausted(&self, target: &Address, now: Timestamp, incubation: Option<Timestamp>) -> bool {
        self.plans
            .get(target)
            .is_some_and(|plan| plan.is_exhausted_at(now, incubation))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Address, &VestingPlan)> + '_ {
        self.plans.iter()
    }

    pub fn len(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vestgate_types::time::SECS_PER_DAY;

    fn addr(n: u64) -> Address {
        Address::from_low_u64(n)
    }

    fn at_day(t0: Timestamp, days: u64) -> Timestamp {
        Timestamp::new(t0.as_secs() + days * SECS_PER_DAY + SECS_PER_DAY / 2)
    }

    #[test]
    fn new_plan_starts_at_initial_stage() {
        let mut schedule = VestingSchedule::new();
        let team = schedule.set_plan(addr(1), 500, PlanClass::Team, false).unwrap();
        assert_eq!(team.stage, 4);
        assert_eq!(team.locked_remaining, 500);
        let ext = schedule.set_plan(addr(2), 1000, PlanClass::External, false).unwrap();
        assert_eq!(ext.stage, 1);
        assert_eq!(ext.total_locked, 1000);
    }

    #[test]
    fn plans_are_frozen_after_release() {
        let mut schedule = VestingSchedule::new();
        schedule.set_plan(addr(1), 500, PlanClass::Team, false).unwrap();
        assert_eq!(
            schedule.set_plan(addr(1), 1, PlanClass::External, true).unwrap_err(),
            VestingError::AlreadyReleased
        );
        assert_eq!(
            schedule.set_plan(addr(2), 1, PlanClass::Team, true).unwrap_err(),
            VestingError::AlreadyReleased
        );
        assert_eq!(schedule.plan(&addr(1)).unwrap().total_locked, 500);
        assert!(!schedule.has_plan(&addr(2)));
    }

    #[test]
    fn pre_release_plans_can_be_replaced() {
        let mut schedule = VestingSchedule::new();
        schedule.set_plan(addr(1), 500, PlanClass::Team, false).unwrap();
        schedule.set_plan(addr(1), 70, PlanClass::External, false).unwrap();
        let status = schedule.plan(&addr(1)).unwrap();
        assert_eq!(status.total_locked, 70);
        assert_eq!(status.class, PlanClass::External);
        assert_eq!(schedule.len(), 1);
    }

    #[test]
    fn exhaustion_needs_a_plan_and_the_final_cliff() {
        let mut schedule = VestingSchedule::new();
        let t0 = Timestamp::new(1_000);
        schedule.set_plan(addr(1), 10, PlanClass::External, false).unwrap();
        assert!(!schedule.is_exhausted(&addr(1), at_day(t0, 400), None));
        assert!(!schedule.is_exhausted(&addr(1), at_day(t0, 179), Some(t0)));
        assert!(schedule.is_exhausted(&addr(1), at_day(t0, 180), Some(t0)));
        assert!(!schedule.is_exhausted(&addr(2), at_day(t0, 900), Some(t0)));
    }

    #[test]
    fn refresh_before_release_fails() {
        let mut schedule = VestingSchedule::new();
        schedule.set_plan(addr(1), 1000, PlanClass::Team, false).unwrap();
        assert_eq!(
            schedule.refresh(&addr(1), Timestamp::new(5), None).unwrap_err(),
            VestingError::NotYetReleased
        );
    }

    #[test]
    fn refresh_without_plan_fails() {
        let mut schedule = VestingSchedule::new();
        assert_eq!(
            schedule
                .refresh(&addr(1), Timestamp::new(5), Some(Timestamp::new(1)))
                .unwrap_err(),
            VestingError::NoPlan(addr(1))
        );
    }

    #[test]
    fn refresh_before_first_cliff_has_no_effect() {
        let mut schedule = VestingSchedule::new();
        schedule.set_plan(addr(1), 1000, PlanClass::Team, false).unwrap();
        let t0 = Timestamp::new(10_000);
        let status = schedule.refresh(&addr(1), t0, Some(t0)).unwrap();
        assert_eq!(status.locked_remaining, 1000);
        assert_eq!(status.total_locked, 1000);
        assert_eq!(status.stage, 4);
    }

    #[test]
    fn refresh_walks_the_team_curve() {
        let mut schedule = VestingSchedule::new();
        schedule.set_plan(addr(1), 800, PlanClass::Team, false).unwrap();
        let t0 = Timestamp::new(1_600_000_000);
        let expected = [(0, 800, 4), (180, 600, 3), (365, 400, 2), (545, 200, 1), (730, 0, 0)];
        for (days, locked, stage) in expected {
            let status = schedule.refresh(&addr(1), at_day(t0, days), Some(t0)).unwrap();
            assert_eq!((status.locked_remaining, status.stage), (locked, stage), "day {days}");
            assert_eq!(status.total_locked, 800);
        }
    }

    #[test]
    fn refresh_is_idempotent() {
        let mut schedule = VestingSchedule::new();
        schedule.set_plan(addr(1), 800, PlanClass::Team, false).unwrap();
        let t0 = Timestamp::new(0);
        let now = at_day(t0, 400);
        let first = schedule.refresh(&addr(1), now, Some(t0)).unwrap();
        let second = schedule.refresh(&addr(1), now, Some(t0)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn currently_locked_does_not_touch_snapshot() {
        let mut schedule = VestingSchedule::new();
        schedule.set_plan(addr(1), 1000, PlanClass::External, false).unwrap();
        let t0 = Timestamp::new(0);
        let live = schedule.currently_locked(&addr(1), at_day(t0, 180), Some(t0));
        assert_eq!(live, LockState { locked: 0, stage: 0 });
        assert_eq!(schedule.plan(&addr(1)).unwrap().locked_remaining, 1000);
    }

    #[test]
    fn holder_without_plan_has_nothing_locked() {
        let schedule = VestingSchedule::new();
        let state = schedule.currently_locked(&addr(9), Timestamp::new(0), None);
        assert_eq!(state, LockState { locked: 0, stage: 0 });
    }
}
