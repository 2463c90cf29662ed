//! Cross-crate integration tests exercising the full pipeline:
//! unspents -> coin selection -> plan -> encode, and block txids -> Merkle
//! root -> verification.
//!
//! The collaborators here are in-memory stand-ins; the codec builds a real
//! legacy transaction with the `bitcoin` crate so the plan can be checked
//! after a decode.

use std::collections::HashMap;
use std::str::FromStr;

use bitcoin::absolute::LockTime;
use bitcoin::address::{Address, NetworkUnchecked};
use bitcoin::hashes::Hash;
use bitcoin::script::ScriptBuf;
use bitcoin::transaction::Version;
use bitcoin::{Amount, Network, OutPoint, Sequence, Transaction, TxIn, TxOut, Txid, Witness};
use tx_kit::*;

const SENDER: &str = "1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa";
const RECIPIENT: &str = "1BoatSLRHtKNngkdXEeobR76b53LETtpyT";

const BLOCK_100000: &str = "000000000003ba27aa200b1cecaad478d2b00432346c3f1f3986da1afd33e506";
const BLOCK_100000_ROOT: &str = "f3e94742aca4b5ef85488dc37c06c3282295ffec960994b2c0d5ac2a25a95766";
const BLOCK_100000_TXIDS: [&str; 4] = [
    "8c14f0db3df150123e6f3dbbf30f8b955a8249b62ac1d1ff16284aefa3d06d87",
    "fff2525b8931402dd09222c50775608f75787bd2b87e56995a7bdd30f79702c4",
    "6359f0868171b1d194cbee1af2f16ea598ae8fad666d9b012c8ed2b79a236ec4",
    "e9a66845e05d5abc0ad04ec80f774a7e585c6e8db975962d069a522137b80c1d",
];

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn utxo(tag: u8, vout: u32, amount_sat: u64) -> UnspentOutput {
    UnspentOutput::new(OutPoint::new(Txid::from_byte_array([tag; 32]), vout), amount_sat)
}

// ─── Collaborators ──────────────────────────────────────────────────

struct Wallet {
    by_address: HashMap<String, Vec<(UnspentOutput, u32)>>,
}

impl BalanceSource for Wallet {
    type Error = String;

    fn list_unspents(&self, address: &str, min_confirmations: u32) -> Result<Vec<UnspentOutput>, String> {
        let unspents = self
            .by_address
            .get(address)
            .ok_or_else(|| format!("unknown address {address}"))?;
        Ok(unspents
            .iter()
            .filter(|(_, confirmations)| *confirmations >= min_confirmations)
            .map(|(u, _)| *u)
            .collect())
    }
}

struct LegacyCodec;

impl TransactionCodec for LegacyCodec {
    type Error = String;

    fn build_unsigned(&self, plan: &TransactionPlan) -> Result<Vec<u8>, String> {
        let script_for = |destination: &str| -> Result<ScriptBuf, String> {
            let address = destination
                .parse::<Address<NetworkUnchecked>>()
                .map_err(|e| e.to_string())?
                .require_network(Network::Bitcoin)
                .map_err(|e| e.to_string())?;
            Ok(address.script_pubkey())
        };

        let input = plan
            .inputs
            .iter()
            .map(|u| TxIn {
                previous_output: u.outpoint,
                script_sig: ScriptBuf::new(),
                sequence: Sequence::MAX,
                witness: Witness::default(),
            })
            .collect();
        let output = plan
            .outputs
            .iter()
            .map(|o| match o {
                PlannedOutput::Payment { destination, amount_sat }
                | PlannedOutput::Change { destination, amount_sat } => Ok(TxOut {
                    value: Amount::from_sat(*amount_sat),
                    script_pubkey: script_for(destination)?,
                }),
                PlannedOutput::OpReturn { script } => Ok(TxOut {
                    value: Amount::ZERO,
                    script_pubkey: script.clone(),
                }),
            })
            .collect::<Result<Vec<_>, String>>()?;

        let tx = Transaction {
            version: Version::ONE,
            lock_time: LockTime::ZERO,
            input,
            output,
        };
        Ok(bitcoin::consensus::serialize(&tx))
    }
}

struct Explorer {
    blocks: HashMap<&'static str, (Vec<String>, String)>,
}

impl BlockDataSource for Explorer {
    type Error = String;

    fn block_txids(&self, block_hash: &str) -> Result<Vec<String>, String> {
        self.blocks
            .get(block_hash)
            .map(|(txids, _)| txids.clone())
            .ok_or_else(|| format!("block {block_hash} not found"))
    }

    fn declared_merkle_root(&self, block_hash: &str) -> Result<String, String> {
        self.blocks
            .get(block_hash)
            .map(|(_, root)| root.clone())
            .ok_or_else(|| format!("block {block_hash} not found"))
    }
}

fn wallet() -> Wallet {
    let mut by_address = HashMap::new();
    by_address.insert(
        SENDER.to_string(),
        vec![
            (utxo(1, 0, 5_000), 10),
            (utxo(2, 1, 3_000), 10),
            (utxo(3, 0, 8_000), 10),
            (utxo(4, 0, 500_000), 2),
        ],
    );
    Wallet { by_address }
}

fn explorer() -> Explorer {
    let txids = BLOCK_100000_TXIDS.iter().map(|t| t.to_string()).collect();
    let mut blocks = HashMap::new();
    blocks.insert(BLOCK_100000, (txids, BLOCK_100000_ROOT.to_string()));
    Explorer { blocks }
}

// ─── Payments ───────────────────────────────────────────────────────

#[test]
fn payment_is_planned_encoded_and_decodable() {
    init_logging();
    let service = Transactions::from_profile(wallet(), LegacyCodec, "blockr").unwrap();

    let tx = service
        .simple_transaction(
            SENDER,
            vec![PaymentTarget::new(RECIPIENT, 4_000)],
            Some(b"tx-kit".as_slice()),
            DEFAULT_MIN_CONFIRMATIONS,
        )
        .unwrap();

    // 4000 + 10000 fee: 8000, then 5000, then 3000 reaches 16000.
    let picked: Vec<u64> = tx.plan.inputs.iter().map(|u| u.amount_sat).collect();
    assert_eq!(picked, vec![8_000, 5_000, 3_000]);
    assert_eq!(tx.plan.fee_sat, 10_000);
    assert_eq!(tx.plan.change().map(PlannedOutput::amount_sat), Some(2_000));

    let decoded: Transaction = bitcoin::consensus::deserialize(&tx.raw_tx).unwrap();
    assert_eq!(decoded.input.len(), 3);
    assert_eq!(decoded.input[0].previous_output, tx.plan.inputs[0].outpoint);
    assert_eq!(decoded.output.len(), 3);
    assert_eq!(decoded.output[0].value, Amount::from_sat(4_000));
    assert_eq!(decoded.output[1].value, Amount::from_sat(2_000));
    assert!(decoded.output[2].script_pubkey.is_op_return());
    // Version 1 little-endian, then a three-input count.
    assert!(tx.raw_hex().starts_with("0100000003"));
    assert_eq!(tx.raw_hex(), hex::encode(&tx.raw_tx));
}

#[test]
fn unconfirmed_outputs_are_not_spent() {
    init_logging();
    let service = Transactions::from_profile(wallet(), LegacyCodec, "blockr").unwrap();
    let err = service
        .simple_transaction(SENDER, vec![PaymentTarget::new(RECIPIENT, 10_000)], None, 6)
        .unwrap_err();
    match err {
        TxKitError::Btc(BtcError::InsufficientFunds { available, required }) => {
            assert_eq!(available, 16_000);
            assert_eq!(required, 20_000);
        }
        other => panic!("unexpected error: {other}"),
    }

    // Relaxing the confirmation count brings the large output into reach.
    let tx = service
        .simple_transaction(SENDER, vec![PaymentTarget::new(RECIPIENT, 10_000)], None, 1)
        .unwrap();
    assert_eq!(tx.plan.inputs.len(), 1);
    assert_eq!(tx.plan.inputs[0].amount_sat, 500_000);
}

#[test]
fn daemon_policy_loaded_from_json() {
    init_logging();
    let json = serde_json::json!({
        "fee_per_kilobyte": 30_000,
        "dust_threshold": 3_000,
        "max_fee": 50_000,
    })
    .to_string();
    let policy = FeePolicy::from_json(&json).unwrap();
    assert_eq!(policy, FeeProfile::Daemon.policy());

    let service = Transactions::new(wallet(), LegacyCodec, policy);
    let tx = service
        .simple_transaction(SENDER, vec![PaymentTarget::new(RECIPIENT, 467_500)], None, 1)
        .unwrap();
    // 500000 - 467500 - 30000 = 2500 is dust under this policy.
    assert!(tx.plan.change().is_none());
    assert_eq!(tx.plan.fee_sat, 32_500);
}

#[test]
fn codec_failure_is_surfaced() {
    init_logging();
    let service = Transactions::from_profile(wallet(), LegacyCodec, "blockr").unwrap();
    let err = service
        .simple_transaction(SENDER, vec![PaymentTarget::new("not-an-address", 1_000)], None, 1)
        .unwrap_err();
    assert!(matches!(err, TxKitError::Collaborator(ref msg) if msg.starts_with("transaction codec")));
}

// ─── Merkle verification ────────────────────────────────────────────

#[test]
fn block_100000_root_verifies() {
    init_logging();
    assert!(verify_block(&explorer(), BLOCK_100000).unwrap());
}

#[test]
fn tampered_block_fails_verification() {
    init_logging();
    let mut source = explorer();
    if let Some((txids, _)) = source.blocks.get_mut(BLOCK_100000) {
        txids.swap(1, 2);
    }
    assert!(!verify_block(&source, BLOCK_100000).unwrap());
}

#[test]
fn unknown_block_is_a_collaborator_error() {
    init_logging();
    let err = verify_block(&explorer(), "00").unwrap_err();
    assert!(matches!(err, TxKitError::Collaborator(_)));
}

#[test]
fn merkle_root_matches_bitcoin_crate_for_real_txids() {
    let txids: Vec<Txid> = BLOCK_100000_TXIDS
        .iter()
        .map(|t| Txid::from_str(t).unwrap())
        .collect();
    let leaves: Vec<MerkleLeaf> = txids.iter().map(|t| t.to_byte_array()).collect();
    let root = merkle_root(&leaves).unwrap();
    assert_eq!(root.to_hex(), BLOCK_100000_ROOT);

    // Odd-sized prefix exercises duplication against the reference.
    let hashes = txids[..3].iter().map(|t| t.to_raw_hash());
    let reference = bitcoin::merkle_tree::calculate_root(hashes).unwrap();
    let mut expected = reference.to_byte_array();
    expected.reverse();
    assert_eq!(merkle_root(&leaves[..3]).unwrap().as_display_bytes(), &expected);
}
