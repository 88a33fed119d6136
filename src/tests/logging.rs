use super::parse_level;
use tracing_subscriber::filter::LevelFilter;

#[test]
fn test_parse_level_any_case() {
    assert_eq!(parse_level("debug"), Some(LevelFilter::DEBUG));
    assert_eq!(parse_level("WARN"), Some(LevelFilter::WARN));
    assert_eq!(parse_level("Trace"), Some(LevelFilter::TRACE));
}

#[test]
fn test_parse_level_rejects_unknown() {
    assert_eq!(parse_level("verbose"), None);
    assert_eq!(parse_level(""), None);
}
