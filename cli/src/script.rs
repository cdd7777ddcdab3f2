//! Replay scripts: a TOML list of timed token operations.
//!
//! ```toml
//! start = 0
//!
//! [token]
//! owner = "0x0000000000000000000000000000000000000001"
//! decimals = 18
//!
//! [[step]]
//! at = 0
//! caller = "0x0000000000000000000000000000000000000001"
//! op = "whitelist"
//! target = "0x0000000000000000000000000000000000000001"
//!
//! [[step]]
//! at = 10
//! caller = "0x0000000000000000000000000000000000000001"
//! op = "transfer"
//! to = "0x0000000000000000000000000000000000000002"
//! amount = "12.5"
//! ```
//!
//! Amounts are decimal strings in whole tokens; vesting totals are whole
//! token counts.

use std::path::Path;

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use vestgate_nullables::NullClock;
use vestgate_token::{Token, TokenConfig, TokenError, TokenSummary};
use vestgate_types::{Address, TokenAmount};

#[derive(Clone, Debug, Deserialize)]
pub struct Script {
    /// Clock reading before the first step.
    #[serde(default)]
    pub start: u64,

    /// Token parameters; a `--config` file takes precedence.
    #[serde(default)]
    pub token: Option<TokenConfig>,

    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Step {
    /// Clock reading at which the step runs. Must not go backwards.
    pub at: u64,
    pub caller: Address,
    #[serde(flatten)]
    pub op: Operation,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    GrantConfirmer {
        target: Address,
    },
    RevokeConfirmer {
        target: Address,
    },
    SetConfirmer {
        target: Address,
        delta: i64,
    },
    ConfirmRelease,
    Whitelist {
        target: Address,
        #[serde(default = "enabled_by_default")]
        enabled: bool,
    },
    SetVestingPlan {
        target: Address,
        total: u64,
        #[serde(default)]
        team: bool,
    },
    RefreshVestingPlan {
        target: Address,
    },
    Transfer {
        to: Address,
        amount: String,
    },
    Approve {
        spender: Address,
        amount: String,
    },
    TransferFrom {
        from: Address,
        to: Address,
        amount: String,
    },
}

fn enabled_by_default() -> bool {
    true
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Self::GrantConfirmer { .. } => "grant_confirmer",
            Self::RevokeConfirmer { .. } => "revoke_confirmer",
            Self::SetConfirmer { .. } => "set_confirmer",
            Self::ConfirmRelease => "confirm_release",
            Self::Whitelist { .. } => "whitelist",
            Self::SetVestingPlan { .. } => "set_vesting_plan",
            Self::RefreshVestingPlan { .. } => "refresh_vesting_plan",
            Self::Transfer { .. } => "transfer",
            Self::Approve { .. } => "approve",
            Self::TransferFrom { .. } => "transfer_from",
        }
    }
}

/// What happened to one step.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StepReport {
    pub index: usize,
    pub at: u64,
    pub caller: Address,
    pub op: &'static str,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ReplayReport {
    pub steps: Vec<StepReport>,
    pub rejected: usize,
    pub summary: TokenSummary,
}

impl Script {
    pub fn from_toml_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading script {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("parsing script {}", path.display()))
    }

    pub fn from_toml_str(s: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Run every step against a fresh token. Rejected steps are reported and
    /// skipped; with `strict` the first rejection aborts the replay.
    pub fn replay(&self, config: TokenConfig, strict: bool) -> anyhow::Result<ReplayReport> {
        let clock = NullClock::new(self.start);
        let mut token = Token::new(config, &clock)?;
        let decimals = token.decimals();
        let mut steps = Vec::with_capacity(self.steps.len());

        for (index, step) in self.steps.iter().enumerate() {
            if !clock.set(step.at) {
                bail!(
                    "step {index} runs at {} but the clock is already at {}",
                    step.at,
                    clock.now()
                );
            }
            let result = apply(&mut token, step, decimals)?;
            let report = StepReport {
                index,
                at: step.at,
                caller: step.caller,
                op: step.op.name(),
                ok: result.is_ok(),
                kind: result.as_ref().err().map(|e| format!("{:?}", e.kind())),
                error: result.as_ref().err().map(ToString::to_string),
            };
            match result {
                Ok(()) => debug!(index, op = report.op, "step applied"),
                Err(e) if strict => {
                    return Err(anyhow::Error::new(e)
                        .context(format!("step {index} ({}) rejected", report.op)));
                }
                Err(e) => info!(index, op = report.op, error = %e, "step rejected"),
            }
            steps.push(report);
        }

        let rejected = steps.iter().filter(|s| !s.ok).count();
        Ok(ReplayReport {
            steps,
            rejected,
            summary: token.summary(),
        })
    }
}

/// Apply one step. The outer error is a malformed step (an amount that does
/// not parse); the inner one is the token's verdict.
fn apply(
    token: &mut Token<&NullClock>,
    step: &Step,
    decimals: u8,
) -> anyhow::Result<Result<(), TokenError>> {
    let caller = &step.caller;
    let raw = |amount: &str| -> anyhow::Result<u128> {
        let parsed = TokenAmount::parse_units(amount, decimals)
            .with_context(|| format!("amount {amount:?} at t={}", step.at))?;
        Ok(parsed.raw())
    };
    let result = match &step.op {
        Operation::GrantConfirmer { target } => token.grant_confirmer(caller, *target).map(drop),
        Operation::RevokeConfirmer { target } => token.revoke_confirmer(caller, *target).map(drop),
        Operation::SetConfirmer { target, delta } => {
            token.set_confirmer(caller, *target, *delta).map(drop)
        }
        Operation::ConfirmRelease => token.confirm_release(caller).map(drop),
        Operation::Whitelist { target, enabled } => {
            token.set_transfer_whitelist(caller, *target, *enabled)
        }
        Operation::SetVestingPlan {
            target,
            total,
            team,
        } => token
            .set_vesting_plan(caller, *target, u128::from(*total), *team)
            .map(drop),
        Operation::RefreshVestingPlan { target } => {
            token.refresh_vesting_plan(caller, target).map(drop)
        }
        Operation::Transfer { to, amount } => token.transfer(caller, to, raw(amount)?),
        Operation::Approve { spender, amount } => token.approve(caller, spender, raw(amount)?),
        Operation::TransferFrom { from, to, amount } => {
            token.transfer_from(caller, from, to, raw(amount)?)
        }
    };
    Ok(result)
}
