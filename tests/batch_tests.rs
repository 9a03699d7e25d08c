/// Batch pipeline pacing and partial-failure tests
mod common;

use common::{found, StubGeocoder, StubReply};
use rust_geocode_api::core::batch::{BatchPipeline, BatchSummary};
use rust_geocode_api::models::AddressRecord;
use std::time::Duration;

fn record(street: &str) -> AddressRecord {
    AddressRecord {
        street: street.to_string(),
        district: "Petaling".to_string(),
        region: "Selangor".to_string(),
    }
}

fn pipeline(stub: &StubGeocoder, delay: Duration) -> BatchPipeline<'_> {
    BatchPipeline {
        geocoder: stub,
        api_key: "test_key",
        region: "my",
        delay,
    }
}

#[tokio::test(start_paused = true)]
async fn test_calls_are_sequential_and_spaced() {
    let stub = StubGeocoder::new(vec![
        found("A", 3.0, 101.0),
        StubReply::NoMatch,
        StubReply::Fail("OVER_QUERY_LIMIT".to_string()),
        found("D", 3.1, 101.1),
    ]);
    let records = vec![
        record("Jalan Satu"),
        record("Jalan Dua"),
        record("Jalan Tiga"),
        record("Jalan Empat"),
    ];

    let (enriched, summary) = pipeline(&stub, Duration::from_millis(5000))
        .geocode_records(records)
        .await;

    let calls = stub.calls();
    assert_eq!(calls.len(), 4);
    assert_eq!(stub.max_in_flight(), 1);

    // Delay applies after every outcome: success, no match and failure
    for pair in calls.windows(2) {
        let gap = pair[1].at.duration_since(pair[0].at);
        assert!(gap >= Duration::from_millis(5000), "gap was {:?}", gap);
    }

    let addresses: Vec<&str> = calls.iter().map(|c| c.address.as_str()).collect();
    assert_eq!(
        addresses,
        vec![
            "Jalan Satu, Petaling, Selangor",
            "Jalan Dua, Petaling, Selangor",
            "Jalan Tiga, Petaling, Selangor",
            "Jalan Empat, Petaling, Selangor",
        ]
    );

    assert_eq!(
        summary,
        BatchSummary {
            total: 4,
            geocoded: 2,
            unmatched: 1,
            failed: 1,
        }
    );
    assert_eq!(enriched.len(), 4);
    assert!(enriched[0].is_geocoded());
    assert!(!enriched[1].is_geocoded());
    assert!(!enriched[2].is_geocoded());
    assert!(enriched[3].is_geocoded());
}

#[tokio::test(start_paused = true)]
async fn test_single_row_does_not_wait() {
    let stub = StubGeocoder::new(vec![found("A", 3.0, 101.0)]);
    let started = tokio::time::Instant::now();

    let (enriched, _) = pipeline(&stub, Duration::from_millis(5000))
        .geocode_records(vec![record("Jalan Satu")])
        .await;

    assert_eq!(enriched.len(), 1);
    assert!(started.elapsed() < Duration::from_millis(5000));
}

#[tokio::test]
async fn test_failed_row_keeps_original_fields() {
    let stub = StubGeocoder::new(vec![
        StubReply::Fail("network down".to_string()),
        found("B", 2.5, 102.5),
    ]);

    let (enriched, summary) = pipeline(&stub, Duration::ZERO)
        .geocode_records(vec![record("Jalan Satu"), record("Jalan Dua")])
        .await;

    assert_eq!(summary.failed, 1);
    assert_eq!(enriched[0].street, "Jalan Satu");
    assert_eq!(enriched[0].district, "Petaling");
    assert_eq!(enriched[0].region, "Selangor");
    assert_eq!(enriched[0].latitude, None);
    assert_eq!(enriched[0].map_url, None);
    assert_eq!(enriched[1].latitude, Some(2.5));
    assert_eq!(enriched[1].formatted_address.as_deref(), Some("B"));
}

#[tokio::test]
async fn test_run_overwrites_previous_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.csv");
    let output = dir.path().join("out").join("geocoded.csv");
    tokio::fs::write(&input, "Alamat,Daerah,Negeri\nJalan Ampang,Gombak,Selangor\n")
        .await
        .unwrap();

    let stub = StubGeocoder::new(vec![found("A", 3.0, 101.0), StubReply::NoMatch]);
    let pipeline = pipeline(&stub, Duration::ZERO);

    pipeline.run(&input, &output).await.unwrap();
    let first = tokio::fs::read_to_string(&output).await.unwrap();
    assert!(first.contains("Jalan Ampang,Gombak,Selangor,3,101,"));

    pipeline.run(&input, &output).await.unwrap();
    let second = tokio::fs::read_to_string(&output).await.unwrap();
    assert_eq!(
        second,
        "Alamat,Daerah,Negeri,Latitud,Longitud,Rujukan\nJalan Ampang,Gombak,Selangor,,,\n"
    );
}
