use crate::bns::{Address, Amount, Hashlock, Preimage, SwapId, UnsignedTransaction};
use crate::{Error, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One hash locked escrow as seen on its chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapData {
    pub id: SwapId,
    pub sender: Address,
    pub recipient: Address,
    pub hashlock: Hashlock,
    pub amounts: Vec<Amount>,
    /// The swap can be returned to the sender from this height on.
    pub timeout_height: u64,
    pub memo: Option<String>,
}

impl SwapData {
    pub fn is_expired_at(&self, height: u64) -> bool {
        height >= self.timeout_height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwapState {
    Open,
    Claimed,
    Expired,
}

impl fmt::Display for SwapState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SwapState::Open => f.write_str("open"),
            SwapState::Claimed => f.write_str("claimed"),
            SwapState::Expired => f.write_str("expired"),
        }
    }
}

/// A swap and its state. Claimed and Expired are final.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AtomicSwap {
    Open(SwapData),
    Claimed { data: SwapData, preimage: Preimage },
    Expired(SwapData),
}

impl AtomicSwap {
    pub fn state(&self) -> SwapState {
        match self {
            AtomicSwap::Open(_) => SwapState::Open,
            AtomicSwap::Claimed { .. } => SwapState::Claimed,
            AtomicSwap::Expired(_) => SwapState::Expired,
        }
    }

    pub fn data(&self) -> &SwapData {
        match self {
            AtomicSwap::Open(data) => data,
            AtomicSwap::Claimed { data, .. } => data,
            AtomicSwap::Expired(data) => data,
        }
    }

    pub fn id(&self) -> &SwapId {
        &self.data().id
    }

    /// The revealed secret of a claimed swap.
    pub fn preimage(&self) -> Option<&Preimage> {
        match self {
            AtomicSwap::Claimed { preimage, .. } => Some(preimage),
            _ => None,
        }
    }

    pub fn is_settled(&self) -> bool {
        self.state() != SwapState::Open
    }

    fn refuse(&self, to: SwapState) -> Error {
        Error::SwapTransition {
            from: self.state().to_string(),
            to: to.to_string(),
        }
    }

    /// Claim an open swap with the preimage of its hashlock.
    pub fn claim(self, preimage: Preimage) -> Result<AtomicSwap> {
        match self {
            AtomicSwap::Open(data) => {
                if !data.hashlock.matches(&preimage) {
                    return Err(Error::BadArgument(format!(
                        "preimage does not open swap {}",
                        data.id
                    )));
                }
                Ok(AtomicSwap::Claimed { data, preimage })
            }
            other => Err(other.refuse(SwapState::Claimed)),
        }
    }

    /// Expire an open swap once the chain reached its timeout height.
    pub fn expire(self, height: u64) -> Result<AtomicSwap> {
        match self {
            AtomicSwap::Open(data) => {
                if !data.is_expired_at(height) {
                    return Err(Error::BadArgument(format!(
                        "swap {} times out at height {}, chain is at {}",
                        data.id, data.timeout_height, height
                    )));
                }
                Ok(AtomicSwap::Expired(data))
            }
            other => Err(other.refuse(SwapState::Expired)),
        }
    }
}

/// An accepted transaction that settles a swap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settlement {
    Claim { swap_id: SwapId, preimage: Preimage },
    Timeout { swap_id: SwapId, height: u64 },
}

impl Settlement {
    /// The settlement carried by a transaction accepted at the given height, if any.
    pub fn from_transaction(tx: &UnsignedTransaction, height: u64) -> Option<Settlement> {
        match tx {
            UnsignedTransaction::SwapClaim(claim) => Some(Settlement::Claim {
                swap_id: claim.swap_id.clone(),
                preimage: claim.preimage.clone(),
            }),
            UnsignedTransaction::SwapTimeout(timeout) => Some(Settlement::Timeout {
                swap_id: timeout.swap_id.clone(),
                height,
            }),
            _ => None,
        }
    }

    pub fn swap_id(&self) -> &SwapId {
        match self {
            Settlement::Claim { swap_id, .. } => swap_id,
            Settlement::Timeout { swap_id, .. } => swap_id,
        }
    }
}

/// Apply a claim or timeout to the swap it refers to.
pub fn settle_atomic_swap(swap: AtomicSwap, settlement: &Settlement) -> Result<AtomicSwap> {
    if swap.id() != settlement.swap_id() {
        return Err(Error::BadArgument(format!(
            "settlement for swap {} applied to swap {}",
            settlement.swap_id(),
            swap.id()
        )));
    }
    match settlement {
        Settlement::Claim { preimage, .. } => swap.claim(preimage.clone()),
        Settlement::Timeout { height, .. } => swap.expire(*height),
    }
}

/// Something that happened to a swap on its chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwapEvent {
    Offered(SwapData),
    Settled(Settlement),
}

/// Folds observed offers, claims and timeouts into the current state of each swap.
///
/// Settled swaps are kept, so that late events for them are refused, until they are removed
/// with [`SwapTracker::take_settled`].
#[derive(Debug, Default)]
pub struct SwapTracker {
    open: BTreeMap<SwapId, SwapData>,
    settled: BTreeMap<SwapId, AtomicSwap>,
}

impl SwapTracker {
    pub fn new() -> SwapTracker {
        SwapTracker::default()
    }

    /// Apply an event and return the new state of the swap it concerns.
    pub fn process(&mut self, event: SwapEvent) -> Result<AtomicSwap> {
        match event {
            SwapEvent::Offered(data) => {
                if self.open.contains_key(&data.id) || self.settled.contains_key(&data.id) {
                    return Err(Error::BadData(format!("swap {} is already known", data.id)));
                }
                debug!("swap {} offered, times out at {}", data.id, data.timeout_height);
                self.open.insert(data.id.clone(), data.clone());
                Ok(AtomicSwap::Open(data))
            }
            SwapEvent::Settled(settlement) => {
                let id = settlement.swap_id().clone();
                if let Some(done) = self.settled.get(&id) {
                    let to = match settlement {
                        Settlement::Claim { .. } => SwapState::Claimed,
                        Settlement::Timeout { .. } => SwapState::Expired,
                    };
                    return Err(done.refuse(to));
                }
                let data = self
                    .open
                    .get(&id)
                    .cloned()
                    .ok_or_else(|| Error::BadData(format!("swap {} is not open", id)))?;
                let swap = settle_atomic_swap(AtomicSwap::Open(data), &settlement)?;
                debug!("swap {} is now {}", id, swap.state());
                self.open.remove(&id);
                self.settled.insert(id, swap.clone());
                Ok(swap)
            }
        }
    }

    pub fn get(&self, id: &SwapId) -> Option<AtomicSwap> {
        match self.open.get(id) {
            Some(data) => Some(AtomicSwap::Open(data.clone())),
            None => self.settled.get(id).cloned(),
        }
    }

    /// The swaps that are neither claimed nor expired.
    pub fn open_swaps(&self) -> Vec<AtomicSwap> {
        self.open.values().cloned().map(AtomicSwap::Open).collect()
    }

    /// Remove and return the claimed and expired swaps.
    pub fn take_settled(&mut self) -> Vec<AtomicSwap> {
        std::mem::take(&mut self.settled).into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(id: u8, preimage: &Preimage) -> SwapData {
        SwapData {
            id: SwapId(vec![id]),
            sender: Address { raw: [1; 20] },
            recipient: Address { raw: [2; 20] },
            hashlock: preimage.hashlock(),
            amounts: vec![Amount::from_atomics(1_000_000_000, "IOV")],
            timeout_height: 100,
            memo: None,
        }
    }

    #[test]
    fn claim_with_matching_preimage() {
        let secret = Preimage::new(b"secret").unwrap();
        let swap = AtomicSwap::Open(data(1, &secret));
        let claimed = swap.claim(secret.clone()).unwrap();
        assert_eq!(claimed.state(), SwapState::Claimed);
        assert_eq!(claimed.preimage(), Some(&secret));
    }

    #[test]
    fn claim_with_wrong_preimage() {
        let secret = Preimage::new(b"secret").unwrap();
        let swap = AtomicSwap::Open(data(1, &secret));
        assert!(swap.claim(Preimage::new(b"guess").unwrap()).is_err());
    }

    #[test]
    fn expire_only_after_timeout() {
        let secret = Preimage::new(b"secret").unwrap();
        let swap = AtomicSwap::Open(data(1, &secret));
        assert!(swap.clone().expire(99).is_err());
        assert_eq!(swap.expire(100).unwrap().state(), SwapState::Expired);
    }

    #[test]
    fn terminal_states_are_final() {
        let secret = Preimage::new(b"secret").unwrap();
        let claimed = AtomicSwap::Open(data(1, &secret)).claim(secret.clone()).unwrap();
        assert!(matches!(
            claimed.clone().expire(1000),
            Err(Error::SwapTransition { .. })
        ));
        assert!(claimed.claim(secret.clone()).is_err());

        let expired = AtomicSwap::Open(data(1, &secret)).expire(100).unwrap();
        assert_eq!(
            expired.clone().claim(secret),
            Err(Error::SwapTransition {
                from: "expired".to_string(),
                to: "claimed".to_string()
            })
        );
        assert!(expired.expire(200).is_err());
    }

    #[test]
    fn settlement_must_match_swap() {
        let secret = Preimage::new(b"secret").unwrap();
        let swap = AtomicSwap::Open(data(1, &secret));
        let other = Settlement::Timeout {
            swap_id: SwapId(vec![2]),
            height: 500,
        };
        assert!(settle_atomic_swap(swap, &other).is_err());
    }

    #[test]
    fn tracker_folds_events() {
        let secret = Preimage::new(b"secret").unwrap();
        let mut tracker = SwapTracker::new();
        tracker.process(SwapEvent::Offered(data(1, &secret))).unwrap();
        tracker.process(SwapEvent::Offered(data(2, &secret))).unwrap();
        assert_eq!(tracker.open_swaps().len(), 2);
        assert!(tracker
            .process(SwapEvent::Offered(data(1, &secret)))
            .is_err());

        let claimed = tracker
            .process(SwapEvent::Settled(Settlement::Claim {
                swap_id: SwapId(vec![1]),
                preimage: secret.clone(),
            }))
            .unwrap();
        assert_eq!(claimed.state(), SwapState::Claimed);
        assert_eq!(tracker.open_swaps().len(), 1);

        // a late timeout cannot undo the claim
        let late = tracker.process(SwapEvent::Settled(Settlement::Timeout {
            swap_id: SwapId(vec![1]),
            height: 1000,
        }));
        assert!(matches!(late, Err(Error::SwapTransition { .. })));
        assert_eq!(
            tracker.get(&SwapId(vec![1])).map(|s| s.state()),
            Some(SwapState::Claimed)
        );

        assert!(tracker
            .process(SwapEvent::Settled(Settlement::Timeout {
                swap_id: SwapId(vec![9]),
                height: 1000,
            }))
            .is_err());
    }

    #[test]
    fn tracker_releases_settled_swaps() {
        let secret = Preimage::new(b"secret").unwrap();
        let mut tracker = SwapTracker::new();
        tracker.process(SwapEvent::Offered(data(1, &secret))).unwrap();
        tracker.process(SwapEvent::Offered(data(2, &secret))).unwrap();
        tracker
            .process(SwapEvent::Settled(Settlement::Timeout {
                swap_id: SwapId(vec![2]),
                height: 100,
            }))
            .unwrap();

        let settled = tracker.take_settled();
        assert_eq!(settled.len(), 1);
        assert_eq!(settled[0].state(), SwapState::Expired);
        assert!(tracker.take_settled().is_empty());
        assert_eq!(tracker.get(&SwapId(vec![2])), None);
        assert_eq!(tracker.open_swaps().len(), 1);
    }
}
