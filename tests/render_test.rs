//! Rendering tests. They draw real PNGs and need a CJK-capable font:
//! `CHAT_STATS_TEST_FONT=/path/to/font.ttf cargo test -- --ignored`

use chat_stats::config::AppConfig;
use chat_stats::pipeline::{Analyzer, Audience, Step};
use chat_stats::render::{register_font, render_frequency, ChartSpec};
use std::io::Write;
use std::path::PathBuf;

fn test_font() -> Option<PathBuf> {
    std::env::var_os("CHAT_STATS_TEST_FONT").map(PathBuf::from)
}

fn write_fixture(dir: &std::path::Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).expect("Failed to create fixture");
    file.write_all(content.as_bytes()).unwrap();
    path
}

#[test]
#[ignore = "needs CHAT_STATS_TEST_FONT"]
fn test_render_bar_and_pie() {
    let Some(font) = test_font() else { return };
    register_font(&font).unwrap();
    let dir = tempfile::tempdir().unwrap();

    let entries = vec![("周一".to_string(), 3), ("周二".to_string(), 5)];
    let bar = dir.path().join("bar.png");
    render_frequency(&entries, &ChartSpec::bar("测试").axes("Day", "Count"), &bar).unwrap();
    let pie = dir.path().join("pie.png");
    render_frequency(&entries, &ChartSpec::pie("测试").shadow(true).legend(true), &pie).unwrap();

    assert!(bar.metadata().unwrap().len() > 0);
    assert!(pie.metadata().unwrap().len() > 0);
}

#[test]
#[ignore = "needs CHAT_STATS_TEST_FONT"]
fn test_full_run_writes_every_chart() {
    let Some(font) = test_font() else { return };
    let dir = tempfile::tempdir().unwrap();

    let csv = "\
localId,Type,IsSender,StrContent,StrTime
1,1,1,我们今天去吃火锅吧,2023-05-01 12:00:00
2,1,0,好呀火锅很好吃,2023-05-01 12:05:00
3,3,0,<img>,2023-05-01 12:06:00
4,1,1,晚上看电影,2023-05-03 20:00:00
5,1,0,电影几点开始,2023-05-03 20:30:00
6,1,0,明天见,2023-05-07 23:10:00
";
    let mut config = AppConfig::default();
    config.input.chat_csv = write_fixture(dir.path(), "chat.csv", csv);
    config.input.stop_words = write_fixture(dir.path(), "stop.txt", "我们\n今天\n");
    config.input.font = font;
    config.output.directory = dir.path().join("out");
    config.output.write_summary = true;

    let mut analyzer = Analyzer::new(config).unwrap();
    assert_eq!(analyzer.table().len(), 5);

    analyzer.run(Step::All).unwrap();

    for name in [
        "daily_frequency.png",
        "calendar_heatmap.png",
        "sender_comparison.png",
        "hourly_frequency.png",
        "top_words_all.png",
        "top_words_self.png",
        "top_words_other.png",
        "word_cloud.png",
        "weekly_distribution.png",
        "summary.json",
    ] {
        assert!(dir.path().join("out").join(name).is_file(), "missing {name}");
    }
    assert_eq!(analyzer.metrics().errors_total, 0);

    let top = analyzer.top_words(Audience::All, 1).unwrap();
    assert_eq!(top.len(), 1);
    assert!(analyzer.metrics().tokens_produced > 0);
}

#[test]
fn test_analyzer_rejects_missing_inputs() {
    let mut config = AppConfig::default();
    config.input.chat_csv = PathBuf::from("/nonexistent/chat.csv");
    assert!(Analyzer::new(config).is_err());
}
