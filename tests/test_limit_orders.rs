//! Integration tests for limit orders against a mocked Jupiter Trigger API.
//!
//! Run with: `cargo test --test test_limit_orders`

mod common;

use httpmock::prelude::*;
use jupiter_mcp::{
    mcp::{
        CancelLimitOrderInput, CancelLimitOrdersInput, CreateLimitOrderInput,
        ExecuteTransactionInput, GetLimitOrdersInput,
    },
    solana::{pda::referral_token_account, SolanaAddress},
    SubmissionMode, SOL_MINT, USDC_MINT,
};
use rmcp::handler::server::wrapper::Parameters;
use serde_json::{json, Value};

use common::{envelope, expected_signature, mock_server, test_wallet_address, unsigned_transaction};

const REFERRAL_ACCOUNT: &str = "8cK8hCyRQCp52nVuPLnLL71afkRvRcFibSwHMjGFT8bm";
const JUP_MINT: &str = "JUPyiwrYJFskUPiHa7hkeR8VUtAeFoSYbKedZNsDvCN";
const FAR_FUTURE: i64 = 4_102_444_800;
const ORDER_ACCOUNT: &str = "BQ72nSv9f3PRyRKCBnHLVrerrv37CYTHm5h3s9VSGQDV";

fn create_input(
    input_mint: &str,
    output_mint: &str,
    making_amount: &str,
    taking_amount: &str,
) -> Parameters<CreateLimitOrderInput> {
    Parameters(CreateLimitOrderInput {
        input_mint: input_mint.to_string(),
        output_mint: output_mint.to_string(),
        making_amount: making_amount.to_string(),
        taking_amount: taking_amount.to_string(),
        slippage_bps: None,
        expired_at: None,
    })
}

fn orders_json(count: usize, offset: usize) -> Value {
    let orders: Vec<Value> = (0..count)
        .map(|i| {
            json!({
                "orderKey": format!("order-{}", offset + i),
                "inputMint": SOL_MINT,
                "outputMint": USDC_MINT,
                "makingAmount": "0.1",
                "takingAmount": "20",
                "status": "Open",
                "expiredAt": null
            })
        })
        .collect();
    Value::Array(orders)
}

fn list_input(page: Option<u32>) -> Parameters<GetLimitOrdersInput> {
    Parameters(GetLimitOrdersInput {
        wallet_address: None,
        status: Some("active".to_string()),
        input_mint: None,
        output_mint: None,
        page,
    })
}

/// A $4.99 USDC order is rejected locally and never reaches createOrder.
#[tokio::test]
async fn test_below_minimum_rejected_without_upstream_call() {
    let server = MockServer::start_async().await;
    let create_mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/trigger/v1/createOrder");
            then.status(200).json_body(json!({}));
        })
        .await;
    let search_mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/ultra/v1/search");
            then.status(200).json_body(json!([]));
        })
        .await;

    let mcp = mock_server(&server.base_url(), SubmissionMode::Aggregator);
    let result =
        envelope(mcp.create_limit_order(create_input(USDC_MINT, SOL_MINT, "4990000", "1")).await);

    assert_eq!(result["success"], false);
    assert_eq!(result["code"], "invalid_parameter");
    assert!(result["error"].as_str().unwrap().contains("below the $5 minimum"));
    assert_eq!(create_mock.hits_async().await, 0);
    // Stablecoins are priced locally.
    assert_eq!(search_mock.hits_async().await, 0);
}

/// Non-stablecoin inputs are priced through token search.
#[tokio::test]
async fn test_below_minimum_priced_via_search() {
    let server = MockServer::start_async().await;
    let create_mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/trigger/v1/createOrder");
            then.status(200).json_body(json!({}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/ultra/v1/search").query_param("query", SOL_MINT);
            then.status(200).json_body(json!([
                {"id": SOL_MINT, "name": "Wrapped SOL", "symbol": "SOL", "decimals": 9, "usdPrice": 150.0}
            ]));
        })
        .await;

    let mcp = mock_server(&server.base_url(), SubmissionMode::Aggregator);
    // 0.02 SOL at $150 is $3.
    let result = envelope(
        mcp.create_limit_order(create_input(SOL_MINT, USDC_MINT, "20000000", "3000000")).await,
    );

    assert_eq!(result["code"], "invalid_parameter");
    assert!(result["error"].as_str().unwrap().contains("$3"));
    assert_eq!(create_mock.hits_async().await, 0);
}

/// A search hit without decimals cannot value base units; the other side is used.
#[tokio::test]
async fn test_search_hit_without_decimals_falls_back_to_taking_side() {
    let server = MockServer::start_async().await;
    let create_mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/trigger/v1/createOrder");
            then.status(200).json_body(json!({}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/ultra/v1/search").query_param("query", SOL_MINT);
            then.status(200).json_body(json!([{"id": SOL_MINT, "usdPrice": 150.0}]));
        })
        .await;

    let mcp = mock_server(&server.base_url(), SubmissionMode::Aggregator);
    let result = envelope(
        mcp.create_limit_order(create_input(SOL_MINT, USDC_MINT, "20000000", "3000000")).await,
    );

    assert_eq!(result["success"], false);
    assert_eq!(result["code"], "invalid_parameter");
    assert!(result["error"].as_str().unwrap().contains("$3"));
    assert_eq!(create_mock.hits_async().await, 0);
}

/// createOrder receives the referral fee account, fee bps and referral fields.
#[tokio::test]
async fn test_create_and_execute_limit_order() {
    let server = MockServer::start_async().await;
    let wallet = test_wallet_address().to_string();
    let transaction = unsigned_transaction(&test_wallet_address());
    let signature = expected_signature(&transaction);

    let referral: SolanaAddress = REFERRAL_ACCOUNT.parse().unwrap();
    let fee_account = referral_token_account(&referral, &SOL_MINT.parse().unwrap()).unwrap();

    let create_mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/trigger/v1/createOrder").json_body(json!({
                "inputMint": USDC_MINT,
                "outputMint": SOL_MINT,
                "maker": wallet,
                "payer": wallet,
                "params": {
                    "makingAmount": "10000000",
                    "takingAmount": "50000000",
                    "slippageBps": "50",
                    "expiredAt": FAR_FUTURE.to_string(),
                    "feeBps": "255"
                },
                "computeUnitPrice": "auto",
                "feeAccount": fee_account.to_string(),
                "referralAccount": REFERRAL_ACCOUNT,
                "referralFee": "255"
            }));
            then.status(200).json_body(json!({
                "order": ORDER_ACCOUNT,
                "transaction": transaction,
                "requestId": "order-req-1"
            }));
        })
        .await;

    let execute_mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/trigger/v1/execute")
                .body_includes("\"requestId\":\"order-req-1\"")
                .body_includes("\"referralFee\":\"255\"");
            then.status(200).json_body(json!({"status": "Success", "signature": signature}));
        })
        .await;

    let mcp = mock_server(&server.base_url(), SubmissionMode::Aggregator);

    let mut input = create_input(USDC_MINT, SOL_MINT, "10000000", "50000000");
    input.0.slippage_bps = Some(50);
    input.0.expired_at = Some(FAR_FUTURE);
    let created = envelope(mcp.create_limit_order(input).await);

    create_mock.assert_async().await;
    assert_eq!(created["success"], true, "{created}");
    assert_eq!(created["data"]["request_id"], "order-req-1");

    let executed = envelope(
        mcp.execute_limit_order(Parameters(ExecuteTransactionInput {
            transaction: created["data"]["transaction"].as_str().unwrap().to_string(),
            request_id: "order-req-1".to_string(),
        }))
        .await,
    );

    execute_mock.assert_async().await;
    assert_eq!(executed["success"], true, "{executed}");
    assert_eq!(executed["data"]["route"], "trigger_execute");
    assert_eq!(executed["data"]["signature"], signature);
}

/// Orders that cannot be valued are forwarded to the API.
#[tokio::test]
async fn test_unpriced_order_is_forwarded() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/ultra/v1/search");
            then.status(200).json_body(json!([]));
        })
        .await;
    let create_mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/trigger/v1/createOrder");
            then.status(200).json_body(json!({
                "order": "Order1",
                "transaction": "AQID",
                "requestId": "r1"
            }));
        })
        .await;

    let mcp = mock_server(&server.base_url(), SubmissionMode::Aggregator);
    let result = envelope(mcp.create_limit_order(create_input(SOL_MINT, JUP_MINT, "1", "1")).await);

    assert_eq!(result["success"], true, "{result}");
    create_mock.assert_async().await;
}

/// An absent or empty order list cancels ALL active orders: `orders` is omitted.
#[tokio::test]
async fn test_cancel_orders_empty_list_cancels_all() {
    let server = MockServer::start_async().await;
    let cancel_all_mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/trigger/v1/cancelOrders").json_body(json!({
                "maker": test_wallet_address().to_string(),
                "computeUnitPrice": "auto",
                "referralAccount": REFERRAL_ACCOUNT,
                "referralFee": "255"
            }));
            then.status(200).json_body(json!({"transactions": ["AQID", "BAUG"], "requestId": "c1"}));
        })
        .await;

    let mcp = mock_server(&server.base_url(), SubmissionMode::Aggregator);

    let omitted =
        envelope(mcp.cancel_limit_orders(Parameters(CancelLimitOrdersInput { orders: None })).await);
    let empty = envelope(
        mcp.cancel_limit_orders(Parameters(CancelLimitOrdersInput { orders: Some(vec![]) })).await,
    );

    assert_eq!(omitted["success"], true, "{omitted}");
    assert_eq!(empty["data"]["transactions"], json!(["AQID", "BAUG"]));
    assert_eq!(cancel_all_mock.hits_async().await, 2);
}

#[tokio::test]
async fn test_cancel_listed_orders() {
    let server = MockServer::start_async().await;
    let order = ORDER_ACCOUNT;
    let cancel_mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/trigger/v1/cancelOrders").json_body(json!({
                "maker": test_wallet_address().to_string(),
                "computeUnitPrice": "auto",
                "orders": [order],
                "referralAccount": REFERRAL_ACCOUNT,
                "referralFee": "255"
            }));
            then.status(200).json_body(json!({"transactions": ["AQID"], "requestId": "c2"}));
        })
        .await;

    let mcp = mock_server(&server.base_url(), SubmissionMode::Aggregator);
    let result = envelope(
        mcp.cancel_limit_orders(Parameters(CancelLimitOrdersInput {
            orders: Some(vec![order.to_string()]),
        }))
        .await,
    );

    cancel_mock.assert_async().await;
    assert_eq!(result["data"]["request_id"], "c2");
}

#[tokio::test]
async fn test_cancel_single_order() {
    let server = MockServer::start_async().await;
    let order = ORDER_ACCOUNT;
    let cancel_mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/trigger/v1/cancelOrder").json_body(json!({
                "maker": test_wallet_address().to_string(),
                "order": order,
                "computeUnitPrice": "auto",
                "referralAccount": REFERRAL_ACCOUNT,
                "referralFee": "255"
            }));
            then.status(200).json_body(json!({"transaction": "AQID", "requestId": "c3"}));
        })
        .await;

    let mcp = mock_server(&server.base_url(), SubmissionMode::Aggregator);
    let result = envelope(
        mcp.cancel_limit_order(Parameters(CancelLimitOrderInput { order: order.to_string() })).await,
    );

    cancel_mock.assert_async().await;
    assert_eq!(result["data"]["transaction"], "AQID");
}

/// 25 active orders: page 1 has 10 and more data, page 3 has the last 5.
#[tokio::test]
async fn test_get_limit_orders_pagination() {
    let server = MockServer::start_async().await;
    let wallet = test_wallet_address().to_string();

    let page1 = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/trigger/v1/getTriggerOrders")
                .query_param("user", wallet.as_str())
                .query_param("orderStatus", "active")
                .query_param("page", "1");
            then.status(200).json_body(json!({
                "orders": orders_json(10, 0),
                "totalPages": 3,
                "page": 1,
                "hasMoreData": true
            }));
        })
        .await;
    let page3 = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/trigger/v1/getTriggerOrders")
                .query_param("user", wallet.as_str())
                .query_param("orderStatus", "active")
                .query_param("page", "3");
            then.status(200).json_body(json!({
                "orders": orders_json(5, 20),
                "totalPages": 3,
                "page": 3,
                "hasMoreData": false
            }));
        })
        .await;

    let mcp = mock_server(&server.base_url(), SubmissionMode::Aggregator);

    let first = envelope(mcp.get_limit_orders(list_input(None)).await);
    assert_eq!(first["success"], true, "{first}");
    assert_eq!(first["data"]["orders"].as_array().unwrap().len(), 10);
    assert_eq!(first["data"]["has_more_data"], true);
    assert_eq!(first["data"]["page"], 1);
    assert_eq!(first["data"]["wallet_address"], wallet);

    let last = envelope(mcp.get_limit_orders(list_input(Some(3))).await);
    assert_eq!(last["data"]["orders"].as_array().unwrap().len(), 5);
    assert_eq!(last["data"]["has_more_data"], false);
    assert_eq!(last["data"]["orders"][4]["order_account"], "order-24");

    page1.assert_async().await;
    page3.assert_async().await;
}

#[tokio::test]
async fn test_get_limit_orders_rejects_bad_input() {
    let mcp = mock_server("http://127.0.0.1:9", SubmissionMode::Aggregator);

    let page_zero = envelope(mcp.get_limit_orders(list_input(Some(0))).await);
    assert_eq!(page_zero["code"], "invalid_parameter");

    let mut bad_status = list_input(None);
    bad_status.0.status = Some("pending".to_string());
    let status = envelope(mcp.get_limit_orders(bad_status).await);
    assert_eq!(status["code"], "invalid_parameter");
}
