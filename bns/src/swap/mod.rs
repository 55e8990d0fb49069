/// The swap module follows hash locked swaps across two chains: their states, the ordering of
/// the two timeouts and the chain records they are read from.

pub mod context;
pub mod protocol;
pub mod state;

pub use self::context::{
    decode_nonce, decode_result_set, decode_token, AccountNonce, ChainData, ConfirmedTransaction,
    Context, Keyed, NamedAmount, TickerInfo, WalletData, ESCROW_PREFIX, TOKEN_PREFIX,
    USER_PREFIX, WALLET_PREFIX,
};
pub use self::protocol::{
    claim_tx, counter_offer, offer, revealed_preimage, timeout_tx, ChainView, LegRole, LegTerms,
    SwapLeg, SwapPlan, DEFAULT_MARGIN_SECS,
};
pub use self::state::{
    settle_atomic_swap, AtomicSwap, Settlement, SwapData, SwapEvent, SwapState, SwapTracker,
};
