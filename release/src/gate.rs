//! Two-phase release state machine.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use vestgate_types::{Address, Timestamp};

use crate::error::ReleaseError;

/// Number of independent confirmations needed to open the gate by default.
pub const DEFAULT_QUORUM: usize = 2;

/// The smallest quorum accepted; a single key must never open the gate alone.
pub const MIN_QUORUM: usize = 2;

/// Result of a successful [`ReleaseGate::confirm_release`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReleaseOutcome {
    /// The confirmation was recorded; the gate is still closed.
    Pending { confirmations: usize, quorum: usize },
    /// This confirmation reached the quorum and opened the gate.
    Released { incubation_time: Timestamp },
}

/// Confirmer set, per-confirmer confirmation flags, the pre-release
/// whitelist and the one-way release flag.
///
/// Caller identity is not checked here: the owner-only guard lives in the
/// token facade. Confirmers are checked here because confirming is an act of
/// the confirmer itself.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReleaseGate {
    /// Confirmer → weight. Absent means weight zero.
    confirmers: HashMap<Address, u32>,
    /// Confirmers that have confirmed since their weight last became nonzero.
    confirmed: HashSet<Address>,
    /// Addresses allowed to transfer while the gate is closed.
    whitelist: HashSet<Address>,
    quorum: usize,
    transfers_enabled: bool,
    incubation_time: Option<Timestamp>,
}

impl Default for ReleaseGate {
    fn default() -> Self {
        Self {
            confirmers: HashMap::new(),
            confirmed: HashSet::new(),
            whitelist: HashSet::new(),
            quorum: DEFAULT_QUORUM,
            transfers_enabled: false,
            incubation_time: None,
        }
    }
}

impl ReleaseGate {
    pub fn new(quorum: usize) -> Result<Self, ReleaseError> {
        if quorum < MIN_QUORUM {
            return Err(ReleaseError::InvalidQuorum {
                min: MIN_QUORUM,
                got: quorum,
            });
        }
        Ok(Self {
            quorum,
            ..Self::default()
        })
    }

    // ── Confirmer set ────────────────────────────────────────────────────

    /// Add one unit of confirmer weight to `target`. Returns the new weight.
    pub fn grant_confirmer(&mut self, target: Address) -> Result<u32, ReleaseError> {
        self.set_confirmer(target, 1)
    }

    /// Remove one unit of confirmer weight from `target`. Returns the new weight.
    ///
    /// When the weight reaches zero any confirmation `target` cast is retracted.
    pub fn revoke_confirmer(&mut self, target: Address) -> Result<u32, ReleaseError> {
        self.set_confirmer(target, -1)
    }

    /// Add a signed `delta` to `target`'s weight, floored at zero.
    ///
    /// Allowed after release too; the open gate is unaffected.
    pub fn set_confirmer(&mut self, target: Address, delta: i64) -> Result<u32, ReleaseError> {
        let current = self.confirmer_weight(&target) as i64;
        let weight = current.saturating_add(delta).clamp(0, u32::MAX as i64) as u32;
        if weight == 0 {
            self.confirmers.remove(&target);
            if self.confirmed.remove(&target) {
                debug!(%target, "confirmation retracted with confirmer weight");
            }
        } else {
            self.confirmers.insert(target, weight);
        }
        info!(%target, delta, weight, "release confirmer updated");
        Ok(weight)
    }

    pub fn confirmer_weight(&self, address: &Address) -> u32 {
        self.confirmers.get(address).copied().unwrap_or(0)
    }

    pub fn is_confirmer(&self, address: &Address) -> bool {
        self.confirmer_weight(address) > 0
    }

    pub fn has_confirmed(&self, address: &Address) -> bool {
        self.confirmed.contains(address)
    }

    /// Confirmations that currently count toward the quorum.
    pub fn confirmation_count(&self) -> usize {
        self.confirmed
            .iter()
            .filter(|a| self.is_confirmer(a))
            .count()
    }

    pub fn quorum(&self) -> usize {
        self.quorum
    }

    /// Number of addresses with nonzero confirmer weight.
    pub fn confirmer_count(&self) -> usize {
        self.confirmers.len()
    }

    /// Addresses with nonzero confirmer weight, in no particular order.
    pub fn confirmers(&self) -> impl Iterator<Item = &Address> + '_ {
        self.confirmers.keys()
    }

    // ── Release ──────────────────────────────────────────────────────────

    /// Record `caller`'s confirmation; opens the gate at `now` once the quorum is met.
    pub fn confirm_release(
        &mut self,
        caller: &Address,
        now: Timestamp,
    ) -> Result<ReleaseOutcome, ReleaseError> {
        if self.transfers_enabled {
            return Err(ReleaseError::ReleaseClosed(*caller));
        }
        if !self.is_confirmer(caller) {
            return Err(ReleaseError::NotConfirmer(*caller));
        }
        if !self.confirmed.insert(*caller) {
            return Err(ReleaseError::AlreadyConfirmed(*caller));
        }

        let confirmations = self.confirmation_count();
        if confirmations >= self.quorum {
            self.transfers_enabled = true;
            self.incubation_time = Some(now);
            info!(%caller, confirmations, incubation_time = %now, "transfers released");
            return Ok(ReleaseOutcome::Released {
                incubation_time: now,
            });
        }
        info!(%caller, confirmations, quorum = self.quorum, "release confirmation recorded");
        Ok(ReleaseOutcome::Pending {
            confirmations,
            quorum: self.quorum,
        })
    }

    pub fn transfers_enabled(&self) -> bool {
        self.transfers_enabled
    }

    /// When the gate opened, if it has.
    pub fn incubation_time(&self) -> Option<Timestamp> {
        self.incubation_time
    }

    // ── Pre-release whitelist ────────────────────────────────────────────

    pub fn set_whitelisted(&mut self, target: Address, enabled: bool) {
        if enabled {
            self.whitelist.insert(target);
        } else {
            self.whitelist.remove(&target);
        }
        info!(%target, enabled, "transfer whitelist updated");
    }

    pub fn is_whitelisted(&self, address: &Address) -> bool {
        self.whitelist.contains(address)
    }

    pub fn whitelisted(&self) -> impl Iterator<Item = &Address> + '_ {
        self.whitelist.iter()
    }

    /// Whether `address` may transfer by virtue of the whitelist alone.
    ///
    /// Always false once the gate has opened: from then on the whitelist has
    /// no effect.
    pub fn is_transfer_permitted_pre_release(&self, address: &Address) -> bool {
        !self.transfers_enabled && self.is_whitelisted(address)
    }
}
