//! Mapping scheduled votes onto contract calls.

use std::cell::Cell;

use blake2::digest::consts::U8;
use blake2::{Blake2b, Digest};
use mgrant_types::{CallArg, CallError, ContractCall, ContractCaller, ProposalId, TxId, VoteType};

/// The deployed voting contract.
pub const VOTING_CONTRACT: &str = "SP2J6ZY48GV1EZ5V2V5RB9MP66SW86PYKKNRV9EJ7.micro-grants-dao";

const VOTE_FUNCTION: &str = "vote";

type Blake2b64 = Blake2b<U8>;

/// Build the `vote(proposal-id, support)` call for one vote.
///
/// Numeric proposal ids go on chain as `uint`; anything else as an ASCII string.
pub fn vote_call(contract: &str, proposal_id: &ProposalId, vote: VoteType) -> ContractCall {
    let proposal_arg = match proposal_id.as_str().parse::<u128>() {
        Ok(n) => CallArg::Uint(n),
        Err(_) => CallArg::Ascii(proposal_id.as_str().to_string()),
    };
    ContractCall {
        contract: contract.to_string(),
        function: VOTE_FUNCTION.to_string(),
        args: vec![proposal_arg, CallArg::Bool(vote.support())],
    }
}

/// A caller that never reaches the network.
///
/// Every call succeeds with a transaction id hashed from the call contents
/// and a per-instance sequence number. Used when no signing backend is
/// configured, so scheduled votes still move through their lifecycle.
pub struct SimulatedContractCaller {
    seq: Cell<u64>,
}

impl SimulatedContractCaller {
    pub fn new() -> Self {
        Self { seq: Cell::new(0) }
    }
}

impl Default for SimulatedContractCaller {
    fn default() -> Self {
        Self::new()
    }
}

impl ContractCaller for SimulatedContractCaller {
    fn call(&self, call: &ContractCall) -> Result<TxId, CallError> {
        let seq = self.seq.get() + 1;
        self.seq.set(seq);

        let encoded =
            serde_json::to_vec(call).map_err(|e| CallError::Rejected(e.to_string()))?;
        let mut hasher = Blake2b64::new();
        hasher.update(&encoded);
        hasher.update(seq.to_be_bytes());
        let tx_id = TxId::new(format!("sim-{:x}", hasher.finalize()));

        tracing::info!(
            contract = %call.contract,
            function = %call.function,
            tx_id = %tx_id,
            "simulated contract call"
        );
        Ok(tx_id)
    }
}
