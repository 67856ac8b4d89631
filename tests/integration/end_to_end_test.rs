use near_rpc_tables::normalize::get;
use near_rpc_tables::rpc::transport::unwrap_envelope;
use near_rpc_tables::table::RAW_RESPONSE;
use near_rpc_tables::*;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::cell::{Cell as CallCount, RefCell};
use std::fs;
use std::time::Duration;

fn fixture(name: &str) -> Value {
    let text = fs::read_to_string(format!("tests/fixtures/{}.json", name))
        .expect("Failed to read fixture");
    serde_json::from_str(&text).expect("Failed to parse fixture JSON")
}

/// Transport that answers every call with a full response body, unwrapped the
/// same way the HTTP transport does
fn replay(body: Value) -> impl Fn(&str, &Value, Duration) -> Result<Value, NearError> {
    move |method: &str, _params: &Value, _timeout: Duration| unwrap_envelope(method, body.clone())
}

#[test]
fn test_account_from_fixture() {
    let client = NearClient::with_transport(replay(fixture("view_account")));
    let table = client
        .view_account("miquel.testnet", None, None)
        .expect("view_account failed");

    assert_eq!(table.len(), 1);
    assert_eq!(table.get(0, "account_id").unwrap().as_text(), Some("miquel.testnet"));
    assert_eq!(
        table.get(0, "amount").unwrap().as_text(),
        Some("399992611103597728750000000")
    );
    assert_eq!(table.column_type("amount"), Some(ColumnType::Text));
}

#[test]
fn test_block_from_fixture() {
    let client = NearClient::with_transport(replay(fixture("block")));
    let table = client
        .block(Some("17821130".parse().unwrap()))
        .expect("block failed");

    assert_eq!(table.get(0, "height").unwrap().as_i64(), Some(17821130));
    let ts = table.get(0, "timestamp").unwrap().as_timestamp().unwrap();
    assert_eq!(ts.timestamp(), 1584467130);
    assert_eq!(ts.timestamp_subsec_nanos(), 386958000);
}

#[test]
fn test_access_keys_from_fixture() {
    let client = NearClient::with_transport(replay(fixture("access_keys")));
    let table = client
        .view_access_key_list("client.chainlink.testnet", Some(Finality::Final), None)
        .expect("view_access_key_list failed");

    assert_eq!(table.len(), 3);
    let permissions: Vec<Option<&str>> = table
        .column("permission")
        .unwrap()
        .into_iter()
        .map(|c| c.as_text())
        .collect();
    assert_eq!(
        permissions,
        vec![Some("FunctionCall"), Some("FunctionCall"), Some("FullAccess")]
    );
    // null allowance means unlimited; it stays missing rather than "null"
    assert!(table.get(1, "allowance").unwrap().is_missing());
    assert_eq!(
        table.get(1, "method_names").unwrap().as_json(),
        Some(&json!(["get_token_price"]))
    );
}

#[test]
fn test_validators_from_fixture() {
    let client = NearClient::with_transport(replay(fixture("validators")));
    let table = client
        .validators(EpochLocator::Latest)
        .expect("validators failed");

    let order: Vec<Option<&str>> = table
        .column("account_id")
        .unwrap()
        .into_iter()
        .map(|c| c.as_text())
        .collect();
    assert_eq!(
        order,
        vec![
            Some("figment.poolv1.near"),
            Some("mid.poolv1.near"),
            Some("tiny.poolv1.near")
        ]
    );
    assert_eq!(table.get(0, "stake_near").unwrap().as_f64(), Some(40000.0));

    // (98 + 390) / (100 + 400) = 97.6%
    let uptime = table.get(1, "uptime_pct").unwrap().as_f64().unwrap();
    assert!((uptime - 97.6).abs() < 1e-6);
}

#[test]
fn test_tx_status_from_fixture() {
    let client = NearClient::with_transport(replay(fixture("tx_outcome")));
    let table = client
        .tx_status(
            "9FtHUFBQsZ2MG77K3x3MJ9wjX3UT8zE1TczCrhZEcG8U",
            "miquel.testnet",
            "FINAL",
        )
        .expect("tx_status failed");

    assert_eq!(table.get(0, "signer_id").unwrap().as_text(), Some("miquel.testnet"));
    assert_eq!(
        table.get(0, "receipts").unwrap().as_json().and_then(Value::as_array).map(Vec::len),
        Some(1)
    );
}

#[test]
fn test_conflicting_block_selectors_never_reach_transport() {
    let calls = CallCount::new(0);
    let transport = |_method: &str, _params: &Value, _timeout: Duration| -> Result<Value, NearError> {
        calls.set(calls.get() + 1);
        Ok(json!({}))
    };
    let client = NearClient::with_transport(transport);

    let finality = || Some(Finality::Final);
    let block = || Some(BlockId::Height(1));

    let results = [
        client.view_account("alice.near", finality(), block()).map(|_| ()),
        client
            .call_function("alice.near", "get", None, finality(), block())
            .map(|_| ()),
        client
            .view_access_key_list("alice.near", finality(), block())
            .map(|_| ()),
        client.protocol_config(finality(), block()).map(|_| ()),
    ];

    for result in results {
        assert_eq!(result.unwrap_err().kind(), ErrorKind::Validation);
    }
    assert_eq!(calls.get(), 0);
}

#[test]
fn test_protocol_errors_propagate_with_method() {
    let client = NearClient::with_transport(replay(json!({
        "jsonrpc": "2.0",
        "id": "near-rpc-tables",
        "error": {
            "name": "HANDLER_ERROR",
            "cause": {"name": "UNKNOWN_BLOCK", "info": {}},
            "code": -32000,
            "message": "Server error",
            "data": "DB Not Found Error: BLOCK HEIGHT: 1"
        }
    })));

    let err = client.block(Some(BlockReference::BlockId(BlockId::Height(1)))).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Protocol);
    assert_eq!(err.method(), Some("block"));
    match err {
        NearError::Protocol { cause, .. } => assert_eq!(cause.as_deref(), Some("UNKNOWN_BLOCK")),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_raw_response_matches_promoted_columns() {
    let client = NearClient::with_transport(replay(fixture("block")));
    let table = client.block(None).unwrap();
    let raw = table.get(0, RAW_RESPONSE).unwrap().as_json().unwrap();

    let height: Option<i64> = get(raw, "header.height");
    let hash: Option<String> = get(raw, "header.hash");
    let author: Option<String> = get(raw, "author");

    assert_eq!(height, table.get(0, "height").unwrap().as_i64());
    assert_eq!(hash.as_deref(), table.get(0, "hash").unwrap().as_text());
    assert_eq!(author.as_deref(), table.get(0, "author").unwrap().as_text());
}

#[test]
fn test_params_sent_for_each_call() {
    let seen: RefCell<Vec<(String, Value)>> = RefCell::new(Vec::new());
    let transport = |method: &str, params: &Value, _timeout: Duration| -> Result<Value, NearError> {
        seen.borrow_mut().push((method.to_string(), params.clone()));
        Ok(json!({"current_validators": [], "keys": []}))
    };
    let client = NearClient::with_transport(transport)
        .with_timeout(Duration::from_secs(5))
        .unwrap();

    client.status().unwrap();
    client.protocol_config(Some(Finality::Optimistic), None).unwrap();
    client.validators(EpochLocator::Latest).unwrap();

    let methods: Vec<String> = seen.borrow().iter().map(|(m, _)| m.clone()).collect();
    assert_eq!(
        methods,
        vec!["status", "EXPERIMENTAL_protocol_config", "validators"]
    );
}

#[test]
fn test_table_serializes_to_records() {
    let client = NearClient::with_transport(replay(fixture("view_account")));
    let table = client.view_account("miquel.testnet", None, None).unwrap();

    let json = output::to_json(&table, false).unwrap();
    let records: Value = serde_json::from_str(&json).unwrap();
    assert_eq!(records[0]["storage_usage"], json!(642));
    assert_eq!(records[0]["amount"], json!("399992611103597728750000000"));
}
