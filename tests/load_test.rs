//! Load and concurrency testing for the mock server.

use std::time::{Duration, Instant};

use reqwest::StatusCode;

mod common;

#[tokio::test]
async fn test_load_performance() {
    let server = common::spawn_default().await;

    let concurrency = 20;
    let requests_per_task = 50;
    let total_requests = concurrency * requests_per_task;

    let client = reqwest::Client::new();
    let start = Instant::now();

    let mut tasks = Vec::new();
    for task_id in 0..concurrency {
        let client = client.clone();
        let url = server.url(&format!("/get?task={task_id}"));
        tasks.push(tokio::spawn(async move {
            let mut latencies = Vec::new();
            for _ in 0..requests_per_task {
                let req_start = Instant::now();
                if let Ok(res) = client.get(&url).send().await {
                    if res.status().is_success() {
                        latencies.push(req_start.elapsed());
                    }
                }
            }
            latencies
        }));
    }

    let mut all_latencies = Vec::new();
    for task in tasks {
        all_latencies.extend(task.await.unwrap());
    }

    let duration = start.elapsed();
    let rps = total_requests as f64 / duration.as_secs_f64();

    assert_eq!(all_latencies.len(), total_requests, "every request should succeed");

    all_latencies.sort();
    let p50 = all_latencies[all_latencies.len() / 2];
    let p99 = all_latencies[(all_latencies.len() as f64 * 0.99) as usize];

    println!("\n--- Load Test Results ---");
    println!("Total Requests: {}", total_requests);
    println!("Concurrency:    {}", concurrency);
    println!("Total Duration: {:?}", duration);
    println!("Requests/sec:   {:.2}", rps);
    println!("P50 Latency:    {:?}", p50);
    println!("P99 Latency:    {:?}", p99);
    println!("-------------------------\n");

    server.stop().await;
}

#[tokio::test]
async fn test_delays_run_concurrently() {
    let server = common::spawn_default().await;
    let client = common::client();

    let start = Instant::now();
    let mut tasks = Vec::new();
    for _ in 0..5 {
        let client = client.clone();
        let url = server.url("/delay/1");
        tasks.push(tokio::spawn(async move {
            client.get(&url).send().await.unwrap().status()
        }));
    }
    for task in tasks {
        assert_eq!(task.await.unwrap(), StatusCode::OK);
    }

    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_secs(1));
    assert!(elapsed < Duration::from_secs(3), "delays were serialized: {elapsed:?}");
}

#[tokio::test]
async fn test_delay_does_not_block_other_requests() {
    let server = common::spawn_default().await;
    let client = common::client();

    let slow = {
        let client = client.clone();
        let url = server.url("/delay/2");
        tokio::spawn(async move { client.get(&url).send().await.unwrap().status() })
    };
    tokio::time::sleep(Duration::from_millis(100)).await;

    let start = Instant::now();
    let res = client.get(server.url("/json")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(start.elapsed() < Duration::from_secs(1));

    assert_eq!(slow.await.unwrap(), StatusCode::OK);
}
