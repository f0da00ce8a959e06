//! # Gateway Integration Tests
//!
//! Starts the RPC gateway on an ephemeral port and talks to it with
//! `reqwest`, the way an external client would.

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;

    use serde_json::{json, Value};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;
    use tokio::task::JoinHandle;

    use mc_01_matrix_core::MatrixRequestHandler;
    use mc_02_rpc_gateway::{GatewayConfig, GatewayError, RpcGatewayService};

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    struct TestServer {
        addr: SocketAddr,
        client: reqwest::Client,
        shutdown: Option<oneshot::Sender<()>>,
        handle: JoinHandle<Result<(), GatewayError>>,
    }

    impl TestServer {
        async fn start() -> Self {
            Self::start_with(GatewayConfig::default()).await
        }

        async fn start_with(config: GatewayConfig) -> Self {
            let service = RpcGatewayService::new(config, MatrixRequestHandler::new()).unwrap();
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            let (tx, rx) = oneshot::channel::<()>();

            let handle = tokio::spawn(async move {
                service
                    .serve(listener, async move {
                        let _ = rx.await;
                    })
                    .await
            });

            Self {
                addr,
                client: reqwest::Client::new(),
                shutdown: Some(tx),
                handle,
            }
        }

        fn url(&self, path: &str) -> String {
            format!("http://{}{}", self.addr, path)
        }

        async fn rpc(&self, id: u64, method: &str, params: Value) -> Value {
            let body = json!({ "jsonrpc": "2.0", "id": id, "method": method, "params": params });
            self.post(&body).await
        }

        async fn post(&self, body: &Value) -> Value {
            self.client
                .post(self.url("/"))
                .json(body)
                .send()
                .await
                .unwrap()
                .json()
                .await
                .unwrap()
        }

        async fn get(&self, path: &str) -> Value {
            self.client
                .get(self.url(path))
                .send()
                .await
                .unwrap()
                .json()
                .await
                .unwrap()
        }

        async fn stop(mut self) {
            if let Some(tx) = self.shutdown.take() {
                let _ = tx.send(());
            }
            self.handle.await.unwrap().unwrap();
        }
    }

    // =============================================================================
    // JSON-RPC FLOWS
    // =============================================================================

    #[tokio::test]
    async fn test_mismatch_scenario_over_http() {
        let server = TestServer::start().await;

        let r0 = server.rpc(1, "matrix_sendRow", json!([1, [1.0, 2.0]])).await;
        let r1 = server
            .rpc(2, "matrix_sendRow", json!({ "client_id": 1, "values": [3.0, 4.0] }))
            .await;
        assert_eq!(r0["result"]["message"], "Row 0 received from client 1");
        assert_eq!(r1["result"]["total_stored"], 2);

        let rejected = server.rpc(3, "matrix_sendRow", json!([2, [5.0, 6.0, 7.0]])).await;
        assert!(rejected.get("error").is_none());
        assert_eq!(rejected["result"]["success"], false);
        assert_eq!(rejected["result"]["total_stored"], 0);

        let count = server.rpc(4, "matrix_query", json!([2, 1])).await;
        assert_eq!(count["id"], 4);
        assert_eq!(count["result"]["row_count"], 2);

        let det = server.rpc(5, "matrix_query", json!([2, 3])).await;
        let value = det["result"]["determinant"].as_f64().unwrap();
        assert!((value + 2.0).abs() < 1e-9);

        server.stop().await;
    }

    #[tokio::test]
    async fn test_caller_row_index_ignored_over_http() {
        let server = TestServer::start().await;

        let response = server
            .rpc(
                1,
                "matrix_sendRow",
                json!({ "client_id": 4, "values": [1.0], "row_index": 17 }),
            )
            .await;

        assert_eq!(response["result"]["message"], "Row 0 received from client 4");
        server.stop().await;
    }

    #[tokio::test]
    async fn test_protocol_errors() {
        let server = TestServer::start().await;

        let unknown = server.rpc(1, "matrix_transpose", json!([])).await;
        assert_eq!(unknown["error"]["code"], -32601);

        let bad_params = server.rpc(2, "matrix_query", json!(["one", 1])).await;
        assert_eq!(bad_params["error"]["code"], -32602);

        let empty = server.rpc(3, "matrix_query", json!([1, 9])).await;
        assert_eq!(empty["result"]["success"], false);
        assert_eq!(
            empty["result"]["message"],
            "No matrix data available. Please send matrix data first."
        );

        server.rpc(4, "matrix_sendRow", json!([1, [1.0]])).await;
        let invalid_type = server.rpc(5, "matrix_query", json!([1, 9])).await;
        assert_eq!(invalid_type["result"]["success"], false);
        assert!(invalid_type["result"]["message"]
            .as_str()
            .unwrap()
            .starts_with("Invalid query type 9"));

        let malformed: Value = server
            .client
            .post(server.url("/"))
            .header("content-type", "application/json")
            .body("{\"jsonrpc\": \"2.0\",")
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(malformed["error"]["code"], -32700);

        server.stop().await;
    }

    #[tokio::test]
    async fn test_determinant_overflow_over_http() {
        let server = TestServer::start().await;

        server.rpc(1, "matrix_sendRow", json!([-5, [1e200, 0.0]])).await;
        server.rpc(2, "matrix_sendRow", json!([-5, [0.0, 1e200]])).await;
        let det = server.rpc(3, "matrix_query", json!([-5, 3])).await;

        assert_eq!(det["result"]["success"], false);
        assert!(det["result"].get("determinant").is_none());
        assert!(det["result"]["message"]
            .as_str()
            .unwrap()
            .contains("not finite"));

        server.stop().await;
    }

    #[tokio::test]
    async fn test_batch_over_http() {
        let mut config = GatewayConfig::default();
        config.limits.max_batch_size = 3;
        let server = TestServer::start_with(config).await;

        let batch = json!([
            { "jsonrpc": "2.0", "id": "a", "method": "matrix_sendRow", "params": [1, [1.0, 0.0]] },
            { "jsonrpc": "2.0", "id": "b", "method": "matrix_sendRow", "params": [2, [0.0, 1.0]] },
            { "jsonrpc": "2.0", "id": "c", "method": "matrix_query", "params": [3, 2] },
        ]);
        let responses = server.post(&batch).await;
        let responses = responses.as_array().unwrap();
        assert_eq!(responses.len(), 3);
        assert_eq!(responses[0]["id"], "a");
        assert_eq!(responses[2]["result"]["rank"], 2);

        let too_big = json!([
            { "jsonrpc": "2.0", "id": 1, "method": "matrix_query", "params": [1, 1] },
            { "jsonrpc": "2.0", "id": 2, "method": "matrix_query", "params": [1, 1] },
            { "jsonrpc": "2.0", "id": 3, "method": "matrix_query", "params": [1, 1] },
            { "jsonrpc": "2.0", "id": 4, "method": "matrix_query", "params": [1, 1] },
        ]);
        let rejected = server.post(&too_big).await;
        assert_eq!(rejected["error"]["code"], -32005);

        server.stop().await;
    }

    // =============================================================================
    // HEALTH / METRICS
    // =============================================================================

    #[tokio::test]
    async fn test_health_and_metrics() {
        let server = TestServer::start().await;

        let health = server.get("/health").await;
        assert_eq!(health["status"], "ok");
        assert_eq!(health["rows"], 0);

        server.rpc(1, "matrix_sendRow", json!([1, [1.0, 2.0]])).await;
        server.rpc(2, "matrix_sendRow", json!([1, [1.0]])).await;
        server.rpc(3, "matrix_query", json!([1, 2])).await;

        let health = server.get("/health").await;
        assert_eq!(health["rows"], 1);
        assert_eq!(health["columns"], 2);

        let metrics = server.get("/metrics").await;
        assert_eq!(metrics["requests"]["total"], 3);
        assert_eq!(metrics["rows"]["accepted"], 1);
        assert_eq!(metrics["rows"]["rejected"], 1);
        assert_eq!(metrics["queries"]["served"], 1);

        server.stop().await;
    }

    // =============================================================================
    // CONCURRENCY
    // =============================================================================

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_http_clients() {
        const CLIENTS: u64 = 12;
        const ROWS: usize = 15;

        let server = TestServer::start().await;
        let url = server.url("/");

        let tasks: Vec<_> = (0..CLIENTS)
            .map(|client_id| {
                let client = server.client.clone();
                let url = url.clone();
                tokio::spawn(async move {
                    for i in 0..ROWS {
                        let body = json!({
                            "jsonrpc": "2.0",
                            "id": i,
                            "method": "matrix_sendRow",
                            "params": [client_id, [client_id as f64, client_id as f64, client_id as f64]]
                        });
                        let response: Value = client
                            .post(&url)
                            .json(&body)
                            .send()
                            .await
                            .unwrap()
                            .json()
                            .await
                            .unwrap();
                        assert_eq!(response["result"]["success"], true);
                    }
                })
            })
            .collect();

        for task in tasks {
            task.await.unwrap();
        }

        let count = server.rpc(1, "matrix_query", json!([0, 1])).await;
        assert_eq!(count["result"]["row_count"], CLIENTS * ROWS as u64);
        let rank = server.rpc(2, "matrix_query", json!([0, 2])).await;
        assert_eq!(rank["result"]["rank"], 1);

        server.stop().await;
    }
}
