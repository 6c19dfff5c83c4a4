use chat_stats::aggregate::peak_activity;
use chat_stats::models::{Message, MessageTable, Sender};
use chat_stats::report::{write_peak_activity, write_summary, Summary};
use chrono::NaiveDateTime;

fn table() -> MessageTable {
    let at = |s: &str| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap();
    MessageTable::new(vec![
        Message::new(Sender::SelfUser, "早", at("2023-04-30 08:00:00")),
        Message::new(Sender::Other, "早呀", at("2023-05-03 09:00:00")),
        Message::new(Sender::SelfUser, "吃饭了吗", at("2023-05-03 12:00:00")),
        Message::new(Sender::Other, "吃了", at("2023-05-03 12:05:00")),
        Message::new(Sender::Other, "晚安", at("2023-05-20 23:00:00")),
    ])
}

#[test]
fn test_peak_activity_report() {
    let peaks = peak_activity(&table()).unwrap();
    let mut out = Vec::new();
    write_peak_activity(&mut out, &peaks).unwrap();

    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "Most active day: 2023-05-03, with 3 messages.");
    assert_eq!(lines[1], "Most active month: 2023-05, with 4 messages.");
}

#[test]
fn test_summary_build() {
    let summary = Summary::build(&table(), vec![("晚安".to_string(), 1)]).unwrap();

    assert_eq!(summary.total_messages, 5);
    assert_eq!(summary.first_date.to_string(), "2023-04-30");
    assert_eq!(summary.last_date.to_string(), "2023-05-20");
    assert_eq!(summary.senders.self_user, 2);
    assert_eq!(summary.senders.other, 3);
    assert_eq!(summary.hourly.len(), 24);
    assert_eq!(summary.weekday.len(), 7);
    assert_eq!(summary.monthly.entries()[0], ("2023-04".to_string(), 1));
    assert_eq!(summary.daily.total(), 5);
}

#[test]
fn test_summary_empty_table() {
    assert!(Summary::build(&MessageTable::new(Vec::new()), Vec::new()).is_err());
}

#[test]
fn test_write_summary_json() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("summary.json");
    let summary = Summary::build(&table(), vec![("晚安".to_string(), 1)]).unwrap();

    write_summary(&path, &summary).unwrap();

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(value["total_messages"], 5);
    assert_eq!(value["first_date"], "2023-04-30");
    assert_eq!(value["peaks"]["day_count"], 3);
    assert_eq!(value["top_words"][0][0], "晚安");
}
