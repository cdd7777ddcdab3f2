//! The token aggregate: exclusive owner of the ledger, gate and vesting stores.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use vestgate_ledger::{GenesisConfig, Ledger, LedgerSnapshot};
use vestgate_release::{ReleaseGate, ReleaseOutcome};
use vestgate_types::{Address, Clock, Timestamp};
use vestgate_vesting::{PlanClass, PlanStatus, VestingSchedule};

use crate::authorizer::{Authorization, TransferAuthorizer, TransferRequest};
use crate::config::TokenConfig;
use crate::error::TokenError;
use crate::event::TokenEvent;

/// Point-in-time view of one account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolderSummary {
    pub address: Address,
    pub balance: u128,
    pub whitelisted: bool,
    pub confirmer_weight: u32,
    pub plan: Option<PlanStatus>,
    /// Raw units locked by vesting at the summary instant.
    pub locked_now: u128,
}

/// Point-in-time view of the whole token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSummary {
    pub owner: Address,
    pub decimals: u8,
    pub total_supply: u128,
    /// Accounts with a nonzero balance.
    pub holder_count: usize,
    /// Nonzero allowances outstanding.
    pub allowance_count: usize,
    pub transfers_enabled: bool,
    pub incubation_time: Option<Timestamp>,
    pub confirmations: usize,
    pub quorum: usize,
    pub taken_at: Timestamp,
    /// Every account with a balance, a plan, a whitelist entry or confirmer
    /// weight, sorted by address.
    pub accounts: Vec<HolderSummary>,
}

/// A gated, vesting-aware token.
///
/// Every operation reads the clock at most once and either applies in full
/// or returns an error with nothing changed.
pub struct Token<C: Clock> {
    config: TokenConfig,
    /// Raw units per whole token.
    unit: u128,
    clock: C,
    ledger: Ledger,
    gate: ReleaseGate,
    vesting: VestingSchedule,
    events: Vec<TokenEvent>,
}

impl<C: Clock> Token<C> {
    /// Create a token, crediting the whole supply to `config.owner`.
    pub fn new(config: TokenConfig, clock: C) -> Result<Self, TokenError> {
        config.validate()?;
        let unit = config.unit()?;
        let ledger = Ledger::with_genesis(&GenesisConfig::new(
            config.owner,
            config.total_supply_whole,
            config.decimals,
        ))?;
        let gate = ReleaseGate::new(config.release_quorum)?;
        let supply = ledger.total_supply();
        info!(owner = %config.owner, supply, quorum = config.release_quorum, "token created");
        Ok(Self {
            events: vec![TokenEvent::Transfer {
                from: Address::ZERO,
                to: config.owner,
                amount: supply,
            }],
            config,
            unit,
            clock,
            ledger,
            gate,
            vesting: VestingSchedule::new(),
        })
    }

    pub fn owner(&self) -> Address {
        self.config.owner
    }

    pub fn config(&self) -> &TokenConfig {
        &self.config
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    fn require_owner(&self, caller: &Address, action: &'static str) -> Result<(), TokenError> {
        if *caller != self.config.owner {
            warn!(%caller, action, "rejected non-owner call");
            return Err(TokenError::Unauthorized {
                caller: *caller,
                action,
            });
        }
        Ok(())
    }

    fn authorizer(&self) -> TransferAuthorizer<'_> {
        TransferAuthorizer::new(&self.ledger, &self.gate, &self.vesting, self.unit)
    }

    // ── Release gate ─────────────────────────────────────────────────────

    /// Owner only: add a signed `delta` to `target`'s confirmer weight (floored at zero).
    pub fn set_confirmer(
        &mut self,
        caller: &Address,
        target: Address,
        delta: i64,
    ) -> Result<u32, TokenError> {
        self.require_owner(caller, "change release confirmers")?;
        let weight = self.gate.set_confirmer(target, delta)?;
        self.events
            .push(TokenEvent::ConfirmerUpdated { target, weight });
        Ok(weight)
    }

    /// Owner only: make `target` a confirmer (one unit of weight).
    pub fn grant_confirmer(&mut self, caller: &Address, target: Address) -> Result<u32, TokenError> {
        self.set_confirmer(caller, target, 1)
    }

    /// Owner only: take one unit of weight from `target`; at zero its
    /// confirmation, if any, is retracted.
    pub fn revoke_confirmer(&mut self, caller: &Address, target: Address) -> Result<u32, TokenError> {
        self.set_confirmer(caller, target, -1)
    }

    /// Confirmers only: cast a release confirmation at the current time.
    pub fn confirm_release(&mut self, caller: &Address) -> Result<ReleaseOutcome, TokenError> {
        let now = self.clock.now();
        let outcome = self.gate.confirm_release(caller, now)?;
        let confirmations = match outcome {
            ReleaseOutcome::Pending { confirmations, .. } => confirmations,
            ReleaseOutcome::Released { .. } => self.gate.confirmation_count(),
        };
        self.events.push(TokenEvent::ReleaseConfirmed {
            confirmer: *caller,
            confirmations,
        });
        if let ReleaseOutcome::Released { incubation_time } = outcome {
            self.events
                .push(TokenEvent::TransfersReleased { incubation_time });
        }
        Ok(outcome)
    }

    /// Owner only: allow or disallow `target` to transfer before release.
    pub fn set_transfer_whitelist(
        &mut self,
        caller: &Address,
        target: Address,
        enabled: bool,
    ) -> Result<(), TokenError> {
        self.require_owner(caller, "change the transfer whitelist")?;
        self.gate.set_whitelisted(target, enabled);
        self.events
            .push(TokenEvent::WhitelistUpdated { target, enabled });
        Ok(())
    }

    // ── Vesting ──────────────────────────────────────────────────────────

    /// Owner only, before release: create or replace `target`'s plan.
    /// `total_locked` is in whole tokens.
    pub fn set_vesting_plan(
        &mut self,
        caller: &Address,
        target: Address,
        total_locked: u128,
        is_team: bool,
    ) -> Result<PlanStatus, TokenError> {
        self.require_owner(caller, "set vesting plans")?;
        let class = PlanClass::from_is_team(is_team);
        let status = self.vesting.set_plan(
            target,
            total_locked,
            class,
            self.gate.transfers_enabled(),
        )?;
        self.events.push(TokenEvent::VestingPlanSet {
            target,
            total_locked,
            class,
        });
        Ok(status)
    }

    /// Anyone, after release: recompute and persist `target`'s plan snapshot.
    pub fn refresh_vesting_plan(
        &mut self,
        caller: &Address,
        target: &Address,
    ) -> Result<PlanStatus, TokenError> {
        let now = self.clock.now();
        let status = self
            .vesting
            .refresh(target, now, self.gate.incubation_time())?;
        debug!(%caller, %target, stage = status.stage, "vesting plan refresh requested");
        self.events.push(TokenEvent::VestingPlanRefreshed {
            target: *target,
            locked_remaining: status.locked_remaining,
            stage: status.stage,
        });
        Ok(status)
    }

    // ── Ledger surface ───────────────────────────────────────────────────

    /// Move `amount` raw units from `caller` to `to`.
    pub fn transfer(&mut self, caller: &Address, to: &Address, amount: u128) -> Result<(), TokenError> {
        let now = self.clock.now();
        let request = TransferRequest::direct(*caller, *to, amount);
        let auth = self.authorizer().authorize(&request, now)?;
        self.ledger.transfer(caller, to, amount)?;
        self.record_transfer(&request, &auth);
        Ok(())
    }

    /// Set `spender`'s allowance over `caller`'s balance (not additive).
    ///
    /// Not gated: an allowance moves nothing by itself, and spending it goes
    /// through the same authorization as a direct transfer.
    pub fn approve(&mut self, caller: &Address, spender: &Address, amount: u128) -> Result<(), TokenError> {
        if spender.is_zero() {
            return Err(TokenError::InvalidRecipient);
        }
        self.ledger.approve(*caller, *spender, amount);
        debug!(owner = %caller, %spender, amount, "allowance set");
        self.events.push(TokenEvent::Approval {
            owner: *caller,
            spender: *spender,
            amount,
        });
        Ok(())
    }

    /// Move `amount` from `from` to `to` on behalf of `caller`, consuming allowance.
    ///
    /// Authorization is evaluated for `from`, the owner of the funds.
    pub fn transfer_from(
        &mut self,
        caller: &Address,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> Result<(), TokenError> {
        let now = self.clock.now();
        let request = TransferRequest::delegated(*caller, *from, *to, amount);
        let auth = self.authorizer().authorize(&request, now)?;
        self.ledger.transfer_from(caller, from, to, amount)?;
        self.record_transfer(&request, &auth);
        Ok(())
    }

    fn record_transfer(&mut self, request: &TransferRequest, auth: &Authorization) {
        debug!(
            from = %request.from,
            to = %request.to,
            amount = request.amount,
            locked = auth.locked,
            via_whitelist = auth.via_whitelist,
            "transfer applied"
        );
        self.events.push(TokenEvent::Transfer {
            from: request.from,
            to: request.to,
            amount: request.amount,
        });
    }

    // ── Queries ──────────────────────────────────────────────────────────

    pub fn balance_of(&self, address: &Address) -> u128 {
        self.ledger.balance_of(address)
    }

    pub fn allowance(&self, owner: &Address, spender: &Address) -> u128 {
        self.ledger.allowance(owner, spender)
    }

    pub fn total_supply(&self) -> u128 {
        self.ledger.total_supply()
    }

    pub fn decimals(&self) -> u8 {
        self.config.decimals
    }

    pub fn is_whitelisted(&self, address: &Address) -> bool {
        self.gate.is_whitelisted(address)
    }

    pub fn is_confirmer(&self, address: &Address) -> bool {
        self.gate.is_confirmer(address)
    }

    pub fn confirmer_weight(&self, address: &Address) -> u32 {
        self.gate.confirmer_weight(address)
    }

    pub fn has_confirmed(&self, address: &Address) -> bool {
        self.gate.has_confirmed(address)
    }

    pub fn transfers_enabled(&self) -> bool {
        self.gate.transfers_enabled()
    }

    pub fn incubation_time(&self) -> Option<Timestamp> {
        self.gate.incubation_time()
    }

    /// Persisted plan snapshot of `address`, as of its last refresh.
    pub fn vesting_plan(&self, address: &Address) -> Option<PlanStatus> {
        self.vesting.plan(address)
    }

    /// Whole tokens originally locked by `address`'s plan (0 without a plan).
    pub fn vesting_plan_total(&self, address: &Address) -> u128 {
        self.vesting_plan(address).map_or(0, |p| p.total_locked)
    }

    /// Whole tokens still locked as of the last refresh (0 without a plan).
    pub fn vesting_plan_locked_remaining(&self, address: &Address) -> u128 {
        self.vesting_plan(address).map_or(0, |p| p.locked_remaining)
    }

    /// Stage as of the last refresh (0 without a plan).
    pub fn vesting_plan_stage(&self, address: &Address) -> u8 {
        self.vesting_plan(address).map_or(0, |p| p.stage)
    }

    /// Raw units of `address`'s balance locked right now, recomputed from time.
    pub fn locked_amount_now(&self, address: &Address) -> u128 {
        self.authorizer().locked_raw(address, self.clock.now())
    }

    /// Whether `address`'s plan has passed its final cliff (false without a plan).
    pub fn is_vesting_exhausted(&self, address: &Address) -> bool {
        self.vesting
            .is_exhausted(address, self.clock.now(), self.gate.incubation_time())
    }

    /// Raw units `address` could transfer right now once the gate is open.
    pub fn transferable_balance(&self, address: &Address) -> u128 {
        self.balance_of(address)
            .saturating_sub(self.locked_amount_now(address))
    }

    /// Every recorded state change, oldest first.
    pub fn events(&self) -> &[TokenEvent] {
        &self.events
    }

    /// Take the recorded events, leaving the journal empty.
    pub fn drain_events(&mut self) -> Vec<TokenEvent> {
        std::mem::take(&mut self.events)
    }

    /// Snapshot of balances and allowances at the current time.
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot::create(&self.ledger, self.clock.now())
    }

    /// Recompute the balance sum against the total supply.
    pub fn check_supply_invariant(&self) -> Result<(), TokenError> {
        Ok(self.ledger.check_supply_invariant()?)
    }

    pub fn summary(&self) -> TokenSummary {
        let now = self.clock.now();
        let authorizer = self.authorizer();
        let mut addresses: BTreeSet<Address> =
            self.ledger.holders().map(|(a, _)| *a).collect();
        addresses.extend(self.vesting.iter().map(|(a, _)| *a));
        addresses.extend(self.gate.whitelisted().copied());
        addresses.extend(self.gate.confirmers().copied());

        let accounts = addresses
            .into_iter()
            .map(|address| HolderSummary {
                address,
                balance: self.ledger.balance_of(&address),
                whitelisted: self.gate.is_whitelisted(&address),
                confirmer_weight: self.gate.confirmer_weight(&address),
                plan: self.vesting.plan(&address),
                locked_now: authorizer.locked_raw(&address, now),
            })
            .collect();

        let ledger = self.ledger.summary();
        TokenSummary {
            owner: self.config.owner,
            decimals: self.config.decimals,
            total_supply: ledger.total_supply,
            holder_count: ledger.holders,
            allowance_count: ledger.allowances,
            transfers_enabled: self.gate.transfers_enabled(),
            incubation_time: self.gate.incubation_time(),
            confirmations: self.gate.confirmation_count(),
            quorum: self.gate.quorum(),
            taken_at: now,
            accounts,
        }
    }
}
