use ccip_solana_txgen::constants::programs::ADDRESS_LOOKUP_TABLE_PROGRAM_ID;
use ccip_solana_txgen::errors::{ErrorKind, GeneratorError};
use ccip_solana_txgen::node::{
    ensure_reachable, fetch_lookup_table, probe, Node, RpcNode, LOOKUP_TABLE_META_SIZE,
};
use serde_json::json;
use solana_pubkey::Pubkey;
use wiremock::matchers::{body_partial_json, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount(server: &MockServer, rpc_method: &str, result: serde_json::Value) {
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "method": rpc_method })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": result
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_latest_blockhash() {
    let server = MockServer::start().await;
    mount(
        &server,
        "getLatestBlockhash",
        json!({
            "context": { "slot": 2792 },
            "value": {
                "blockhash": "EkSnNWid2cvwEVnVx9aBqawnmiCNiDgp3gUdkDPTKN1N",
                "lastValidBlockHeight": 3090
            }
        }),
    )
    .await;

    let node = RpcNode::new(&server.uri(), "confirmed");
    let anchor = node.latest_blockhash().await.unwrap();
    assert_eq!(
        anchor.blockhash.to_string(),
        "EkSnNWid2cvwEVnVx9aBqawnmiCNiDgp3gUdkDPTKN1N"
    );
    assert_eq!(anchor.last_valid_block_height, 3090);
}

#[tokio::test]
async fn test_simulate_success() {
    let server = MockServer::start().await;
    mount(
        &server,
        "simulateTransaction",
        json!({
            "context": { "slot": 218 },
            "value": {
                "err": null,
                "logs": ["Program log: Instruction: AcceptOwnership"],
                "accounts": null,
                "unitsConsumed": 4127
            }
        }),
    )
    .await;

    let node = RpcNode::new(&server.uri(), "confirmed");
    let outcome = node.simulate(&[1, 2, 3]).await.unwrap();
    assert!(outcome.success);
    assert_eq!(outcome.units_consumed, Some(4127));
    assert_eq!(outcome.logs.unwrap().len(), 1);

    // the dry-run is requested without signature verification, base64 encoded
    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["params"][0], "AQID");
    assert_eq!(body["params"][1]["sigVerify"], false);
    assert_eq!(body["params"][1]["encoding"], "base64");
}

#[tokio::test]
async fn test_simulate_rejection_is_not_an_error() {
    let server = MockServer::start().await;
    mount(
        &server,
        "simulateTransaction",
        json!({
            "context": { "slot": 218 },
            "value": {
                "err": { "InstructionError": [0, { "Custom": 2006 }] },
                "logs": [],
                "unitsConsumed": 1200
            }
        }),
    )
    .await;

    let node = RpcNode::new(&server.uri(), "confirmed");
    let outcome = node.simulate(&[0]).await.unwrap();
    assert!(!outcome.success);
    assert_eq!(outcome.custom_error_code, Some(2006));
    assert_eq!(outcome.error_name(), Some("ConstraintSeeds"));
}

#[tokio::test]
async fn test_rpc_error_object() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": { "code": -32602, "message": "invalid transaction" }
        })))
        .mount(&server)
        .await;

    let node = RpcNode::new(&server.uri(), "confirmed");
    let err = node.latest_blockhash().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Connectivity);
    assert!(err.to_string().contains("invalid transaction"));

    // a refused dry-run is an outcome, not a transport failure
    let outcome = node.simulate(&[0]).await.unwrap();
    assert!(!outcome.success);
    assert_eq!(outcome.error.as_deref(), Some("-32602: invalid transaction"));
    assert_eq!(outcome.custom_error_code, None);
    assert!(outcome.logs.is_none());
}

#[tokio::test]
async fn test_unreachable_node() {
    let node = RpcNode::new("http://127.0.0.1:1", "confirmed");
    let err = node.latest_blockhash().await.unwrap_err();
    assert!(matches!(err, GeneratorError::Rpc { .. }));
    assert!(!probe("http://127.0.0.1:1").await);
}

#[tokio::test]
async fn test_probe() {
    let server = MockServer::start().await;
    mount(&server, "getHealth", json!("ok")).await;
    assert!(probe(&server.uri()).await);
}

#[tokio::test]
async fn test_unhealthy_node_fails_fast() {
    let err = ensure_reachable("http://127.0.0.1:1").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Connectivity);
    assert!(err.to_string().contains("--skip-probe"));

    let server = MockServer::start().await;
    mount(&server, "getHealth", json!("behind")).await;
    assert!(ensure_reachable(&server.uri()).await.is_err());

    let healthy = MockServer::start().await;
    mount(&healthy, "getHealth", json!("ok")).await;
    assert!(ensure_reachable(&healthy.uri()).await.is_ok());
}

#[tokio::test]
async fn test_fetch_lookup_table() {
    let server = MockServer::start().await;
    let entries = [Pubkey::new_unique(), Pubkey::new_unique()];
    let mut data = vec![0u8; LOOKUP_TABLE_META_SIZE];
    data[0] = 1;
    for entry in &entries {
        data.extend_from_slice(entry.as_ref());
    }
    mount(
        &server,
        "getAccountInfo",
        json!({
            "context": { "slot": 1 },
            "value": {
                "data": [base64::encode(&data), "base64"],
                "executable": false,
                "lamports": 1_000_000,
                "owner": ADDRESS_LOOKUP_TABLE_PROGRAM_ID.to_string(),
                "rentEpoch": 18446744073709551615u64,
                "space": data.len()
            }
        }),
    )
    .await;

    let node = RpcNode::new(&server.uri(), "confirmed");
    let key = Pubkey::new_unique();
    let table = fetch_lookup_table(&node, &key).await.unwrap();
    assert_eq!(table.key, key);
    assert_eq!(table.addresses, entries.to_vec());
}

#[tokio::test]
async fn test_missing_lookup_table() {
    let server = MockServer::start().await;
    mount(
        &server,
        "getAccountInfo",
        json!({ "context": { "slot": 1 }, "value": null }),
    )
    .await;

    let node = RpcNode::new(&server.uri(), "confirmed");
    let err = fetch_lookup_table(&node, &Pubkey::new_unique()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
}
