//! Trade Normalizer - raw transactions to per-trade facts
//!
//! Every raw transaction becomes one `Trade` whose profit is the net native
//! SOL flow into the subject wallet. Output is ordered most recent first and
//! that ordering is relied on by every downstream stage.

use serde::Serialize;

use crate::analysis::classifier::{is_inbound, is_outbound, SubjectAddress};
use crate::analysis::types::{
    lamports_to_sol, NativeTransfer, RawTransaction, TokenTransfer, LAMPORTS_PER_SOL,
};
use crate::analysis::AnalysisConfig;

/// One normalized transaction, valued from the subject's point of view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trade {
    pub signature: String,
    /// Unix seconds
    pub timestamp: i64,
    /// Fee in SOL
    pub fee: f64,
    pub category: String,
    /// Net SOL received by the subject (negative when it paid out)
    pub profit: f64,
    pub native_transfers: Vec<NativeTransfer>,
    pub token_transfers: Vec<TokenTransfer>,
}

impl Trade {
    pub fn is_profitable(&self) -> bool {
        self.profit > 0.0
    }

    /// Build a trade from one raw transaction
    pub fn from_raw(tx: &RawTransaction, subject: &SubjectAddress) -> Self {
        Self {
            signature: tx.signature.clone(),
            timestamp: tx.timestamp,
            fee: lamports_to_sol(tx.fee),
            category: tx.category.clone(),
            profit: net_native_flow(&tx.native_transfers, subject),
            native_transfers: tx.native_transfers.clone(),
            token_transfers: tx.token_transfers.clone(),
        }
    }
}

/// Net SOL flow into `subject`: inbound minus outbound native lamports
pub fn net_native_flow(transfers: &[NativeTransfer], subject: &SubjectAddress) -> f64 {
    let mut inbound: i128 = 0;
    let mut outbound: i128 = 0;

    for transfer in transfers {
        // A self-transfer lands in both sums and nets to zero
        if is_inbound(transfer, subject) {
            inbound += transfer.amount as i128;
        }
        if is_outbound(transfer, subject) {
            outbound += transfer.amount as i128;
        }
    }

    (inbound - outbound) as f64 / LAMPORTS_PER_SOL
}

/// Normalize with default settings (every record is kept)
pub fn normalize(transactions: &[RawTransaction], subject: &SubjectAddress) -> Vec<Trade> {
    normalize_with(transactions, subject, &AnalysisConfig::default())
}

/// Normalize raw transactions into trades, most recent first
///
/// Ties on timestamp keep input order. An empty input yields an empty list.
pub fn normalize_with(
    transactions: &[RawTransaction],
    subject: &SubjectAddress,
    config: &AnalysisConfig,
) -> Vec<Trade> {
    let mut trades: Vec<Trade> = transactions
        .iter()
        .filter(|tx| !config.skip_failed || tx.status.is_success())
        .map(|tx| Trade::from_raw(tx, subject))
        .collect();

    // sort_by is stable
    trades.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    trades
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::classifier::AddressFormat;
    use crate::analysis::types::TxStatus;

    const WALLET: &str = "7xKXtg2CW87d97TXJSDpbD5jBkheTqA83TZRuJosgAsU";
    const OTHER: &str = "9WzDXwBbmkg8ZTbNMqUxvQRAyrZzDsGYdLVL9zYtAWWM";

    fn subject(addr: &str) -> SubjectAddress {
        SubjectAddress::parse(addr, AddressFormat::Opaque).unwrap()
    }

    fn tx(signature: &str, timestamp: i64, fee: u64, transfers: Vec<NativeTransfer>) -> RawTransaction {
        RawTransaction {
            signature: signature.to_string(),
            timestamp,
            fee,
            status: TxStatus::Success,
            category: "SWAP".to_string(),
            native_transfers: transfers,
            token_transfers: Vec::new(),
        }
    }

    fn transfer(from: &str, to: &str, amount: u64) -> NativeTransfer {
        NativeTransfer {
            from: from.to_string(),
            to: to.to_string(),
            amount,
        }
    }

    #[test]
    fn test_inbound_profit_and_fee_conversion() {
        let subject = subject("W1");
        let raw = vec![tx("sig1", 1_700_000_000, 5_000_000, vec![transfer("X", "W1", 2_000_000_000)])];

        let trades = normalize(&raw, &subject);
        assert_eq!(trades.len(), 1);
        assert!((trades[0].profit - 2.0).abs() < 1e-12);
        assert!((trades[0].fee - 0.005).abs() < 1e-12);
        assert!(trades[0].is_profitable());
    }

    #[test]
    fn test_net_flow_subtracts_outbound() {
        let subject = subject(WALLET);
        let transfers = vec![
            transfer(WALLET, OTHER, 1_500_000_000),
            transfer(OTHER, &WALLET.to_lowercase(), 500_000_000),
            transfer(OTHER, OTHER, 9_000_000_000),
        ];
        let profit = net_native_flow(&transfers, &subject);
        assert!((profit + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_self_transfer_nets_to_zero() {
        let subject = subject(WALLET);
        let profit = net_native_flow(&[transfer(WALLET, WALLET, 42)], &subject);
        assert_eq!(profit, 0.0);
    }

    #[test]
    fn test_sorted_descending_with_stable_ties() {
        let subject = subject(WALLET);
        let raw = vec![
            tx("old", 100, 0, vec![]),
            tx("tie-a", 200, 0, vec![]),
            tx("new", 300, 0, vec![]),
            tx("tie-b", 200, 0, vec![]),
        ];

        let order: Vec<_> = normalize(&raw, &subject)
            .into_iter()
            .map(|t| t.signature)
            .collect();
        assert_eq!(order, vec!["new", "tie-a", "tie-b", "old"]);
    }

    #[test]
    fn test_empty_input_yields_empty_list() {
        let subject = subject(WALLET);
        assert!(normalize(&[], &subject).is_empty());
    }

    #[test]
    fn test_skip_failed_transactions() {
        let subject = subject(WALLET);
        let mut failed = tx("failed", 50, 5000, vec![]);
        failed.status = TxStatus::Failed {
            reason: "slippage".to_string(),
        };
        let raw = vec![tx("ok", 10, 5000, vec![]), failed];

        assert_eq!(normalize(&raw, &subject).len(), 2);

        let config = AnalysisConfig {
            skip_failed: true,
            ..AnalysisConfig::default()
        };
        let trades = normalize_with(&raw, &subject, &config);
        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].signature, "ok");
    }

    #[test]
    fn test_input_not_mutated() {
        let subject = subject(WALLET);
        let raw = vec![tx("a", 1, 0, vec![]), tx("b", 2, 0, vec![])];
        let before = raw.clone();
        let _ = normalize(&raw, &subject);
        assert_eq!(raw, before);
    }
}
