// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of DCH Uplink.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

use std::num::NonZeroUsize;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use dch_integration_tests::PriceDb;
use dch_uplink::batch::{BatchSummary, run, run_backfill};
use dch_uplink::{DchClient, PayloadBuilder};
use mockito::{Matcher, Server};

const UPLOAD_PATH: &str = "/upload";

fn chunk_size() -> NonZeroUsize {
    NonZeroUsize::new(50).unwrap()
}

fn seeded_db(count: u32) -> PriceDb {
    let db = PriceDb::new().unwrap();
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    db.insert_series("NSW1", start, count).unwrap();
    db.insert_series("SA1", start, 10).unwrap();
    db
}

fn client(server: &Server) -> DchClient {
    DchClient::new(
        format!("{}{UPLOAD_PATH}", server.url()),
        "backfill-key",
        Duration::from_secs(5),
    )
    .unwrap()
}

fn builder() -> PayloadBuilder {
    PayloadBuilder::new("pool", "point")
}

#[test]
fn test_history_is_uploaded_in_chunks() {
    let db = seeded_db(120);

    let mut server = Server::new();
    let mock = server
        .mock("POST", UPLOAD_PATH)
        .match_header("x-api-key", "backfill-key")
        .with_status(200)
        .expect(3)
        .create();

    let summary =
        run_backfill(&db.source(), &client(&server), &builder(), "NSW1", chunk_size()).unwrap();
    mock.assert();

    assert_eq!(
        summary,
        BatchSummary {
            total_records: 120,
            successful_chunks: 3,
            failed_chunks: 0,
        }
    );
}

#[test]
fn test_failed_chunk_is_isolated() {
    let db = seeded_db(150);

    // First observation of each chunk: records 0, 50 and 100 at five-minute spacing
    let mut server = Server::new();
    let first = server
        .mock("POST", UPLOAD_PATH)
        .match_body(Matcher::Regex("2024-01-01T00:00:00Z".to_owned()))
        .with_status(200)
        .expect(1)
        .create();
    let second = server
        .mock("POST", UPLOAD_PATH)
        .match_body(Matcher::Regex("2024-01-01T04:10:00Z".to_owned()))
        .with_status(500)
        .with_body("internal error")
        .expect(1)
        .create();
    let third = server
        .mock("POST", UPLOAD_PATH)
        .match_body(Matcher::Regex("2024-01-01T08:20:00Z".to_owned()))
        .with_status(202)
        .expect(1)
        .create();

    let summary =
        run_backfill(&db.source(), &client(&server), &builder(), "NSW1", chunk_size()).unwrap();

    first.assert();
    second.assert();
    third.assert();
    assert_eq!(summary.successful_chunks, 2);
    assert_eq!(summary.failed_chunks, 1);
    assert_eq!(summary.exit_status(), 1);
}

#[test]
fn test_unreadable_row_fails_only_its_chunk() {
    let db = seeded_db(100);
    // Sorts ahead of every readable row, so it lands in the first chunk
    db.insert("NSW1", "garbage", 20.0).unwrap();

    let mut server = Server::new();
    let mock = server
        .mock("POST", UPLOAD_PATH)
        .with_status(200)
        .expect(2)
        .create();

    let summary =
        run_backfill(&db.source(), &client(&server), &builder(), "NSW1", chunk_size()).unwrap();
    mock.assert();

    assert_eq!(
        summary,
        BatchSummary {
            total_records: 101,
            successful_chunks: 2,
            failed_chunks: 1,
        }
    );
    assert_eq!(summary.exit_status(), 1);
}

#[test]
fn test_exit_status_reflects_outcome() {
    let db = seeded_db(30);

    let mut server = Server::new();
    let _ok = server.mock("POST", UPLOAD_PATH).with_status(200).create();
    assert_eq!(
        run(&db.source(), &client(&server), &builder(), "NSW1", chunk_size()),
        0
    );

    let empty = PriceDb::new().unwrap();
    assert_eq!(
        run(&empty.source(), &client(&server), &builder(), "NSW1", chunk_size()),
        0
    );
}

#[test]
fn test_unreachable_api_fails_every_chunk() {
    let db = seeded_db(75);
    let unreachable = DchClient::new(
        "http://127.0.0.1:1/upload",
        "backfill-key",
        Duration::from_secs(2),
    )
    .unwrap();

    let summary =
        run_backfill(&db.source(), &unreachable, &builder(), "NSW1", chunk_size()).unwrap();

    assert_eq!(summary.total_records, 75);
    assert_eq!(summary.successful_chunks, 0);
    assert_eq!(summary.failed_chunks, 2);
    assert_eq!(summary.exit_status(), 1);
}
