//! Building the transactions of a cross chain swap.
//!
//! The initiator offers funds on the first chain, locked to the hash of a secret preimage. The
//! counterparty offers funds on the second chain under the same hashlock. The initiator claims
//! the counter offer and so reveals the preimage, which the counterparty then uses to claim
//! the first offer. This only works if the counter offer expires well before the first offer,
//! otherwise the counterparty may lose both legs.

use crate::bns::{
    Address, Amount, BaseTx, Hashlock, Preimage, SwapClaimTx, SwapId, SwapOfferTx, SwapTimeoutTx,
    UnsignedTransaction,
};
use crate::swap::state::{AtomicSwap, SwapData, SwapState};
use crate::{Error, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default safety margin between the expiry of the two legs: one hour.
pub const DEFAULT_MARGIN_SECS: u64 = 3600;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegRole {
    /// The leg created first, by the holder of the preimage.
    Offer,
    /// The leg created in response, on the other chain.
    Counter,
}

impl fmt::Display for LegRole {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LegRole::Offer => f.write_str("offer"),
            LegRole::Counter => f.write_str("counter"),
        }
    }
}

/// The current height of a chain and its expected block interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainView {
    pub current_height: u64,
    pub block_time_secs: u64,
}

/// One leg of a swap: its timeout and the chain it lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapLeg {
    pub timeout_height: u64,
    pub chain: ChainView,
}

impl SwapLeg {
    pub fn blocks_to_expiry(&self) -> u64 {
        self.timeout_height.saturating_sub(self.chain.current_height)
    }

    /// Estimated wall clock time until the leg can be returned to its sender.
    pub fn secs_to_expiry(&self) -> u64 {
        self.blocks_to_expiry()
            .saturating_mul(self.chain.block_time_secs)
    }

    pub fn is_expired(&self) -> bool {
        self.chain.current_height >= self.timeout_height
    }
}

/// The two legs of a swap and the margin required between their expiries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapPlan {
    pub offer: SwapLeg,
    pub counter: SwapLeg,
    pub min_margin_secs: u64,
}

impl SwapPlan {
    pub fn leg(&self, role: LegRole) -> &SwapLeg {
        match role {
            LegRole::Offer => &self.offer,
            LegRole::Counter => &self.counter,
        }
    }

    /// Check that both legs are live and the counter leg expires, by wall clock, at least the
    /// margin before the offer leg.
    pub fn validate(&self) -> Result<()> {
        for role in [LegRole::Offer, LegRole::Counter] {
            let leg = self.leg(role);
            if leg.chain.block_time_secs == 0 {
                return Err(Error::BadArgument(format!(
                    "{} chain has no block time",
                    role
                )));
            }
            if leg.is_expired() {
                return Err(Error::BadArgument(format!(
                    "{} leg expired at height {}, chain is at {}",
                    role, leg.timeout_height, leg.chain.current_height
                )));
            }
        }
        let offer_secs = self.offer.secs_to_expiry();
        let counter_secs = self.counter.secs_to_expiry();
        if counter_secs.saturating_add(self.min_margin_secs) >= offer_secs {
            return Err(Error::TimeoutOrdering {
                offer_secs,
                counter_secs,
                margin_secs: self.min_margin_secs,
            });
        }
        Ok(())
    }

    /// The latest counter timeout height that still satisfies the margin, if there is one.
    pub fn max_counter_timeout(offer: &SwapLeg, counter: ChainView, min_margin_secs: u64) -> Option<u64> {
        if counter.block_time_secs == 0 || offer.is_expired() {
            return None;
        }
        let budget = offer
            .secs_to_expiry()
            .checked_sub(min_margin_secs)?
            .checked_sub(1)?;
        let blocks = budget / counter.block_time_secs;
        match blocks {
            0 => None,
            n => counter.current_height.checked_add(n),
        }
    }
}

/// Parameters of an offer that are chosen by its sender.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegTerms {
    pub base: BaseTx,
    pub recipient: Address,
    pub amounts: Vec<Amount>,
    pub timeout_height: u64,
    pub memo: Option<String>,
}

impl LegTerms {
    fn into_offer(self, hashlock: Hashlock) -> SwapOfferTx {
        SwapOfferTx {
            base: self.base,
            recipient: self.recipient,
            amounts: self.amounts,
            timeout_height: self.timeout_height,
            hashlock,
            memo: self.memo,
        }
    }
}

/// The first leg, locked to the hash of the initiator's preimage.
pub fn offer(terms: LegTerms, preimage: &Preimage) -> SwapOfferTx {
    let hashlock = preimage.hashlock();
    debug!(
        "offering {} amounts to {}, timeout at {}",
        terms.amounts.len(),
        terms.recipient,
        terms.timeout_height
    );
    terms.into_offer(hashlock)
}

/// The answering leg under the hashlock of the observed offer. Fails unless the counter leg
/// expires the margin before the offer.
pub fn counter_offer(
    offer: &SwapData,
    offer_chain: ChainView,
    terms: LegTerms,
    counter_chain: ChainView,
    min_margin_secs: u64,
) -> Result<SwapOfferTx> {
    let plan = SwapPlan {
        offer: SwapLeg {
            timeout_height: offer.timeout_height,
            chain: offer_chain,
        },
        counter: SwapLeg {
            timeout_height: terms.timeout_height,
            chain: counter_chain,
        },
        min_margin_secs,
    };
    plan.validate()?;
    info!(
        "counter offer for swap {}: expires in ~{}s, offer in ~{}s",
        offer.id,
        plan.counter.secs_to_expiry(),
        plan.offer.secs_to_expiry()
    );
    Ok(terms.into_offer(offer.hashlock))
}

fn require_open(swap: &AtomicSwap, to: SwapState) -> Result<&SwapData> {
    match swap {
        AtomicSwap::Open(data) => Ok(data),
        other => Err(Error::SwapTransition {
            from: other.state().to_string(),
            to: to.to_string(),
        }),
    }
}

/// Claim an open swap with the preimage of its hashlock.
pub fn claim_tx(base: BaseTx, swap: &AtomicSwap, preimage: &Preimage) -> Result<SwapClaimTx> {
    let data = require_open(swap, SwapState::Claimed)?;
    if !data.hashlock.matches(preimage) {
        return Err(Error::BadArgument(format!(
            "preimage does not open swap {}",
            data.id
        )));
    }
    Ok(SwapClaimTx {
        base,
        swap_id: data.id.clone(),
        preimage: preimage.clone(),
    })
}

/// Return an expired swap to its sender.
pub fn timeout_tx(base: BaseTx, swap: &AtomicSwap, current_height: u64) -> Result<SwapTimeoutTx> {
    let data = require_open(swap, SwapState::Expired)?;
    if !data.is_expired_at(current_height) {
        return Err(Error::BadArgument(format!(
            "swap {} times out at height {}, chain is at {}",
            data.id, data.timeout_height, current_height
        )));
    }
    Ok(SwapTimeoutTx {
        base,
        swap_id: data.id.clone(),
    })
}

/// The preimage revealed by a claim of the given swap, once it is seen on chain.
pub fn revealed_preimage(tx: &UnsignedTransaction, swap_id: &SwapId, hashlock: &Hashlock) -> Option<Preimage> {
    match tx {
        UnsignedTransaction::SwapClaim(claim)
            if &claim.swap_id == swap_id && hashlock.matches(&claim.preimage) =>
        {
            Some(claim.preimage.clone())
        }
        _ => None,
    }
}
