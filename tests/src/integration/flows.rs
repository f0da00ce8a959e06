//! # Integration Test Flows
//!
//! Drives the matrix core the way the transport does, through
//! `MatrixRequestHandler`, and checks the externally visible guarantees:
//!
//! 1. **Width fixing**: the first accepted row fixes the column count
//! 2. **Dense indices**: accepted rows get 0, 1, 2, ... in order
//! 3. **Atomic rows**: concurrent submissions never interleave within a row
//! 4. **Consistent queries**: a query sees one fixed state

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::thread;

    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use mc_01_matrix_core::{
        ClientId, MatrixCoordinationApi, MatrixCoordinationService, MatrixRequestHandler,
        QueryRequest, QueryResponse, SendRowRequest, SendRowResponse,
    };
    use node_runtime::{NodeConfig, SubsystemContainer};

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn send(handler: &MatrixRequestHandler, client: i64, values: &[f64]) -> SendRowResponse {
        handler.handle_send_row(SendRowRequest::new(client, values.to_vec()))
    }

    fn query(handler: &MatrixRequestHandler, client: i64, query_type: i64) -> QueryResponse {
        handler.handle_query(QueryRequest::new(client, query_type))
    }

    // =============================================================================
    // SCENARIOS
    // =============================================================================

    #[test]
    fn test_mismatch_scenario_end_to_end() {
        let handler = MatrixRequestHandler::new();

        let first = send(&handler, 1, &[1.0, 2.0]);
        let second = send(&handler, 1, &[3.0, 4.0]);
        assert_eq!(first.message, "Row 0 received from client 1");
        assert_eq!(second.message, "Row 1 received from client 1");
        assert_eq!(second.total_stored, 2);

        let rejected = send(&handler, 2, &[5.0, 6.0, 7.0]);
        assert!(!rejected.success);
        assert_eq!(
            rejected.message,
            "Row dimension mismatch. Expected 2 columns, got 3"
        );
        assert_eq!(rejected.rows_received, 0);

        let count = query(&handler, 2, 1);
        assert!(count.success);
        assert_eq!(count.row_count, Some(2));
        assert_eq!(count.message, "Matrix has 2 rows");
    }

    #[test]
    fn test_reference_values() {
        let singular = MatrixRequestHandler::new();
        send(&singular, 1, &[1.0, 2.0]);
        send(&singular, 2, &[2.0, 4.0]);
        assert_eq!(query(&singular, 3, 2).rank, Some(1));

        let identity = MatrixRequestHandler::new();
        send(&identity, 1, &[1.0, 0.0]);
        send(&identity, 2, &[0.0, 1.0]);
        assert_eq!(query(&identity, 3, 2).rank, Some(2));
        let det = query(&identity, 3, 3).determinant.unwrap();
        assert!((det - 1.0).abs() < 1e-12);

        let general = MatrixRequestHandler::new();
        send(&general, 1, &[1.0, 2.0]);
        send(&general, 1, &[3.0, 4.0]);
        let det = query(&general, 2, 3).determinant.unwrap();
        assert!((det + 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_non_square_determinant_message() {
        let handler = MatrixRequestHandler::new();
        send(&handler, 1, &[1.0, 2.0, 3.0]);
        send(&handler, 2, &[4.0, 5.0, 6.0]);

        let response = query(&handler, 1, 3);

        assert!(!response.success);
        assert_eq!(
            response.message,
            "Dimensions not matched. Matrix is 2x3, need square matrix for determinant."
        );
        // Rank still works on the same matrix.
        assert_eq!(query(&handler, 1, 2).rank, Some(2));
    }

    #[test]
    fn test_empty_matrix_queries() {
        let handler = MatrixRequestHandler::new();

        for query_type in 1..=3 {
            let response = query(&handler, 1, query_type);
            assert!(!response.success);
            assert_eq!(
                response.message,
                "No matrix data available. Please send matrix data first."
            );
        }
    }

    #[test]
    fn test_unknown_query_type_on_empty_matrix() {
        let handler = MatrixRequestHandler::new();

        let response = query(&handler, 1, 9);

        assert!(!response.success);
        assert_eq!(
            response.message,
            "No matrix data available. Please send matrix data first."
        );
    }

    #[test]
    fn test_completed_client_through_container() {
        let container = SubsystemContainer::new(NodeConfig::default()).unwrap();
        let service = Arc::clone(&container.matrix);
        let handler =
            MatrixRequestHandler::from_service(service.clone() as Arc<dyn MatrixCoordinationApi>);

        assert!(send(&handler, 5, &[1.0]).success);
        service.mark_completed(ClientId(5));

        let rejected = send(&handler, 5, &[2.0]);
        assert!(!rejected.success);
        assert!(rejected.message.contains("already completed"));
        assert_eq!(query(&handler, 6, 1).row_count, Some(1));

        let session = service.session(ClientId(5)).unwrap();
        assert!(session.completed);
        assert_eq!(session.contributed_rows, vec![0]);
    }

    #[test]
    fn test_random_diagonal_matrix() {
        let mut rng = StdRng::seed_from_u64(7);
        let n = 6;
        let diagonal: Vec<f64> = (0..n).map(|_| rng.gen_range(1.0..10.0)).collect();
        let handler = MatrixRequestHandler::new();

        for (i, d) in diagonal.iter().enumerate() {
            let mut row = vec![0.0; n];
            row[i] = *d;
            assert!(send(&handler, i as i64, &row).success);
        }

        let expected: f64 = diagonal.iter().product();
        let det = query(&handler, 0, 3).determinant.unwrap();
        assert!(((det - expected) / expected).abs() < 1e-12);
        assert_eq!(query(&handler, 0, 2).rank, Some(n as u64));
    }

    // =============================================================================
    // CONCURRENCY
    // =============================================================================

    /// Many clients submitting rows of matching and wrong width at once.
    #[test]
    fn test_concurrent_clients_keep_rows_intact() {
        const CLIENTS: i64 = 16;
        const ROWS_PER_CLIENT: usize = 40;
        const WIDTH: usize = 8;

        let handler = MatrixRequestHandler::new();
        // Fix the width before the race starts.
        assert!(send(&handler, 999, &[-1.0; WIDTH]).success);

        let workers: Vec<_> = (0..CLIENTS)
            .map(|client| {
                let handler = handler.clone();
                thread::spawn(move || {
                    let mut rng = StdRng::seed_from_u64(client as u64);
                    let mut accepted = 0u64;
                    for _ in 0..ROWS_PER_CLIENT {
                        let width = if rng.gen_bool(0.25) { WIDTH + 1 } else { WIDTH };
                        let row = vec![client as f64; width];
                        let response = send(&handler, client, &row);
                        assert_eq!(response.success, width == WIDTH);
                        if response.success {
                            accepted += 1;
                        }
                    }
                    accepted
                })
            })
            .collect();

        let accepted: u64 = workers.into_iter().map(|w| w.join().unwrap()).sum();
        let service = handler.service();
        let snapshot = service.snapshot();

        assert_eq!(snapshot.row_count() as u64, accepted + 1);
        for row in snapshot.rows() {
            assert_eq!(row.len(), WIDTH);
            assert!(row.iter().all(|v| *v == row[0]), "row mixes two submissions");
        }

        let mut seen = HashSet::new();
        for client in 0..CLIENTS {
            let session = service.session(ClientId(client)).unwrap();
            for &index in &session.contributed_rows {
                assert!(seen.insert(index), "row {index} attributed twice");
                assert_eq!(snapshot.rows()[index][0], client as f64);
            }
        }
        assert_eq!(seen.len() as u64, accepted);
    }

    /// Readers observe a row count that never goes backwards while writers run.
    #[test]
    fn test_queries_during_writes_are_monotonic() {
        let service = Arc::new(MatrixCoordinationService::new());
        let handler =
            MatrixRequestHandler::from_service(service.clone() as Arc<dyn MatrixCoordinationApi>);
        let done = Arc::new(AtomicBool::new(false));

        let reader = {
            let handler = handler.clone();
            let done = Arc::clone(&done);
            thread::spawn(move || {
                let mut last = 0u64;
                let mut observations = 0usize;
                while !done.load(Ordering::Acquire) {
                    let response = query(&handler, 100, 1);
                    if let Some(count) = response.row_count {
                        assert!(count >= last, "row count went from {last} to {count}");
                        last = count;
                        observations += 1;
                    }
                }
                observations
            })
        };

        let writers: Vec<_> = (0..4i64)
            .map(|client| {
                let handler = handler.clone();
                thread::spawn(move || {
                    for i in 0..200 {
                        let v = (client * 1000 + i) as f64;
                        assert!(send(&handler, client, &[v, v + 0.5]).success);
                    }
                })
            })
            .collect();

        for writer in writers {
            writer.join().unwrap();
        }
        done.store(true, Ordering::Release);
        let _ = reader.join().unwrap();

        assert_eq!(service.shape().rows, 800);
        assert_eq!(query(&handler, 100, 1).row_count, Some(800));
    }

    /// The same guarantees hold when requests come from async tasks.
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_async_submissions() {
        let handler = MatrixRequestHandler::new();

        let tasks: Vec<_> = (0..32i64)
            .map(|client| {
                let handler = handler.clone();
                tokio::task::spawn_blocking(move || {
                    (0..10)
                        .filter(|_| send(&handler, client, &[client as f64; 3]).success)
                        .count()
                })
            })
            .collect();

        let mut accepted = 0;
        for task in tasks {
            accepted += task.await.unwrap();
        }

        assert_eq!(accepted, 320);
        assert_eq!(query(&handler, 0, 1).row_count, Some(320));
        assert_eq!(query(&handler, 0, 2).rank, Some(1));
    }
}
