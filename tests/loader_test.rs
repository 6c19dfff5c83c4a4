//! Unit tests for loader.rs module

use chat_stats::aggregate::daily_frequency;
use chat_stats::error::ChatStatsError;
use chat_stats::loader::{load_messages, parse_timestamp, preprocess, read_chat_records_from};
use chat_stats::models::Sender;
use proptest::prelude::*;
use std::io::Write;

const HEADER: &str = "localId,TalkerId,Type,SubType,IsSender,CreateTime,Status,StrContent,StrTime";

fn csv(rows: &[&str]) -> String {
    let mut out = String::from(HEADER);
    for row in rows {
        out.push('\n');
        out.push_str(row);
    }
    out.push('\n');
    out
}

#[test]
fn test_read_records_by_header_name() {
    let data = csv(&["1,5,1,0,1,1683100000,2,你好,2023-05-03 08:00:00"]);
    let records = read_chat_records_from(data.as_bytes()).unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].record_type, 1);
    assert_eq!(records[0].is_sender, 1);
    assert_eq!(records[0].content, "你好");
    assert_eq!(records[0].time, "2023-05-03 08:00:00");
}

#[test]
fn test_preprocess_keeps_only_text_records() {
    let data = csv(&[
        "1,5,1,0,1,0,2,早上好,2023-05-03 08:00:00",
        "2,5,3,0,0,0,2,<img>,2023-05-03 08:01:00",
        "3,5,1,0,0,0,2,晚上好,2023-05-03 21:00:00",
        "4,5,10000,0,0,0,2,system,2023-05-03 21:05:00",
    ]);
    let records = read_chat_records_from(data.as_bytes()).unwrap();
    let table = preprocess(records, 1).unwrap();

    assert_eq!(table.len(), 2);
    assert_eq!(table.messages()[0].sender, Sender::SelfUser);
    assert_eq!(table.messages()[1].sender, Sender::Other);
    assert_eq!(table.messages()[1].hour(), 21);
}

#[test]
fn test_preprocess_ignores_bad_time_on_dropped_rows() {
    let data = csv(&[
        "1,5,1,0,1,0,2,你好,2023-05-03 08:00:00",
        "2,5,47,0,0,0,2,sticker,not a time",
    ]);
    let records = read_chat_records_from(data.as_bytes()).unwrap();
    assert_eq!(preprocess(records, 1).unwrap().len(), 1);
}

#[test]
fn test_preprocess_rejects_bad_time_on_text_rows() {
    let data = csv(&["1,5,1,0,1,0,2,你好,yesterday"]);
    let records = read_chat_records_from(data.as_bytes()).unwrap();
    let err = preprocess(records, 1).unwrap_err();
    assert!(matches!(err, ChatStatsError::InvalidTimestamp { ref value } if value == "yesterday"));
}

#[test]
fn test_empty_content_is_allowed() {
    let data = csv(&["1,5,1,0,1,0,2,,2023-05-03 08:00:00"]);
    let records = read_chat_records_from(data.as_bytes()).unwrap();
    let table = preprocess(records, 1).unwrap();
    assert_eq!(table.messages()[0].content, "");
}

#[test]
fn test_parse_timestamp_formats() {
    for value in [
        "2023-05-03 08:09:10",
        "2023-05-03 08:09:10.250",
        "2023-05-03T08:09:10",
        "2023/05/03 08:09:10",
        " 2023-05-03 08:09:10 ",
    ] {
        let ts = parse_timestamp(value).unwrap();
        assert_eq!(ts.format("%Y-%m-%d %H:%M:%S").to_string(), "2023-05-03 08:09:10");
    }
    assert!(parse_timestamp("2023-05-03 08:09").is_ok());
    assert!(parse_timestamp("03/05/2023").is_err());
}

#[test]
fn test_load_messages_end_to_end() {
    let mut file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    write!(
        file,
        "{}",
        csv(&[
            "1,5,1,0,1,0,2,你好,2023-05-03 08:00:00",
            "2,5,1,0,0,0,2,你好呀,2023-05-03 09:30:00",
            "3,5,1,0,1,0,2,晚安,2023-05-04 23:10:00",
        ])
    )
    .unwrap();

    let table = load_messages(file.path(), 1).unwrap();
    let daily = daily_frequency(&table);

    assert_eq!(daily.len(), 2);
    assert_eq!(daily.total(), 3);
    assert_eq!(daily.entries()[0].1, 2);
}

#[test]
fn test_load_messages_missing_file() {
    let missing = std::path::Path::new("/nonexistent/chat.csv");
    assert!(matches!(load_messages(missing, 1), Err(ChatStatsError::Io(_))));
}

proptest! {
    #[test]
    fn prop_every_kept_row_is_text(types in proptest::collection::vec(0i64..5, 0..40)) {
        let rows: Vec<String> = types
            .iter()
            .enumerate()
            .map(|(i, t)| format!("{i},5,{t},0,{},0,2,内容,2023-05-03 08:00:00", i % 2))
            .collect();
        let refs: Vec<&str> = rows.iter().map(String::as_str).collect();
        let data = csv(&refs);

        let records = read_chat_records_from(data.as_bytes()).unwrap();
        let expected = records.iter().filter(|r| r.record_type == 1).count();
        let table = preprocess(records, 1).unwrap();

        prop_assert_eq!(table.len(), expected);
    }
}
