//! Unit tests for chat domain value objects.

use super::fixtures::{author, channel_id, guild_id, message, user_id};
use crate::chat::domain::{
    ActivityFilter, ActivityRecord, ActivitySource, AttachmentFilter, ChannelId, ChannelKind,
    ChatDomainError, SearchQuery, SortField, SortOrder, Timestamp, UserReference,
};
use rstest::rstest;

#[rstest]
#[case("")]
#[case("   ")]
fn identifiers_reject_blank_values(#[case] value: &str) {
    let result = ChannelId::new(value);
    assert!(matches!(result, Err(ChatDomainError::EmptyIdentifier(_))));
}

#[rstest]
fn identifiers_trim_surrounding_whitespace() {
    assert_eq!(channel_id(" 42 ").as_str(), "42");
}

#[rstest]
#[case("2024-01-15T10:30:00.000000+00:00", "2024-01-15T10:30:00+00:00")]
#[case("2024-01-15T12:30:00+02:00", "2024-01-15T10:30:00+00:00")]
#[case("2024-01-15T10:30:00Z", "2024-01-15T10:30:00+00:00")]
#[case("2024-01-15T10:30:00.250+00:00", "2024-01-15T10:30:00.250+00:00")]
#[case("2024-01-15T12:30:00.123456+02:00", "2024-01-15T10:30:00.123456+00:00")]
fn timestamps_render_in_canonical_utc(#[case] raw: &str, #[case] expected: &str) {
    let timestamp = Timestamp::parse(raw).expect("timestamp should parse");
    assert_eq!(timestamp.to_string(), expected);
}

#[rstest]
fn timestamps_keep_sub_second_precision_through_json() {
    let original = Timestamp::parse("2026-02-24T10:00:00.250+00:00").expect("valid");

    let encoded = serde_json::to_string(&original).expect("timestamp should serialise");
    let decoded: Timestamp = serde_json::from_str(&encoded).expect("timestamp should parse");

    assert_eq!(encoded, "\"2026-02-24T10:00:00.250+00:00\"");
    assert_eq!(decoded, original);
}

#[rstest]
fn timestamps_compare_by_instant_not_text() {
    let earlier = Timestamp::parse("2024-01-15T11:00:00+02:00").expect("valid");
    let later = Timestamp::parse("2024-01-15T10:00:00+00:00").expect("valid");
    assert!(earlier < later);
}

#[rstest]
#[case("yesterday")]
#[case("")]
fn timestamps_reject_non_rfc3339_text(#[case] raw: &str) {
    assert!(matches!(
        Timestamp::parse(raw),
        Err(ChatDomainError::InvalidTimestamp(_))
    ));
}

#[rstest]
fn all_digit_references_are_user_ids() {
    let reference: UserReference = "123456789".parse().expect("reference should parse");
    assert_eq!(reference, UserReference::Id(user_id("123456789")));
}

#[rstest]
#[case("alice")]
#[case("user123")]
#[case("12a")]
fn other_references_are_usernames(#[case] raw: &str) {
    let reference: UserReference = raw.parse().expect("reference should parse");
    assert_eq!(reference, UserReference::Username(raw.to_owned()));
}

#[rstest]
fn blank_references_are_rejected() {
    assert_eq!(
        "  ".parse::<UserReference>(),
        Err(ChatDomainError::EmptyUsername)
    );
}

#[rstest]
#[case("all", ActivityFilter::All)]
#[case("dm", ActivityFilter::Direct)]
#[case("DM", ActivityFilter::Direct)]
#[case("server", ActivityFilter::Group)]
#[case("guild", ActivityFilter::Group)]
fn activity_filters_parse(#[case] raw: &str, #[case] expected: ActivityFilter) {
    assert_eq!(raw.parse::<ActivityFilter>(), Ok(expected));
}

#[rstest]
fn unknown_activity_filter_is_rejected() {
    assert!(matches!(
        "everything".parse::<ActivityFilter>(),
        Err(ChatDomainError::UnknownActivityFilter(_))
    ));
}

#[rstest]
#[case(0, ChannelKind::Text, "text")]
#[case(1, ChannelKind::Direct, "dm")]
#[case(2, ChannelKind::Voice, "voice")]
#[case(5, ChannelKind::News, "news")]
#[case(15, ChannelKind::Forum, "forum")]
#[case(99, ChannelKind::Unknown(99), "unknown_99")]
fn channel_kinds_map_platform_codes(
    #[case] code: u8,
    #[case] expected: ChannelKind,
    #[case] label: &str,
) {
    let kind = ChannelKind::from_code(code);
    assert_eq!(kind, expected);
    assert_eq!(kind.to_string(), label);
}

#[rstest]
#[case(ChannelKind::Text, true)]
#[case(ChannelKind::News, false)]
#[case(ChannelKind::Voice, false)]
#[case(ChannelKind::Category, false)]
#[case(ChannelKind::Forum, false)]
fn only_plain_text_channels_are_text(#[case] kind: ChannelKind, #[case] expected: bool) {
    assert_eq!(kind.is_text(), expected);
}

#[rstest]
fn search_query_omits_unset_options_and_zero_offset() {
    let query = SearchQuery::new("headless").expect("query should build");
    assert_eq!(query.to_params(), vec![("content", "headless".to_owned())]);

    let zero = query.with_offset(0);
    assert!(zero.to_params().iter().all(|(key, _)| *key != "offset"));
}

#[rstest]
fn search_query_serialises_every_set_option_once() {
    let query = SearchQuery::new("headless mode")
        .expect("query should build")
        .with_author(user_id("42"))
        .with_channel(channel_id("7"))
        .with_attachment(AttachmentFilter::Image)
        .with_offset(25)
        .with_sort_by(SortField::Timestamp)
        .with_sort_order(SortOrder::Asc);

    assert_eq!(
        query.to_params(),
        vec![
            ("content", "headless mode".to_owned()),
            ("author_id", "42".to_owned()),
            ("channel_id", "7".to_owned()),
            ("has", "image".to_owned()),
            ("offset", "25".to_owned()),
            ("sort_by", "timestamp".to_owned()),
            ("sort_order", "asc".to_owned()),
        ]
    );
}

#[rstest]
fn search_query_requires_content() {
    assert_eq!(
        SearchQuery::new("  ").map(|query| query.to_params()),
        Err(ChatDomainError::EmptySearchContent)
    );
}

#[rstest]
#[case("link", AttachmentFilter::Link)]
#[case("sound", AttachmentFilter::Sound)]
fn attachment_filters_parse(#[case] raw: &str, #[case] expected: AttachmentFilter) {
    assert_eq!(raw.parse::<AttachmentFilter>(), Ok(expected));
}

#[rstest]
fn group_activity_serialises_with_guild_provenance() {
    let alice = author("1", "alice");
    let record = ActivityRecord::new(
        message("10", "20", &alice, "hello", "2024-01-15T10:30:00+00:00"),
        ActivitySource::Group {
            guild_id: guild_id("30"),
            guild_name: "Rustaceans".to_owned(),
            channel_name: "general".to_owned(),
        },
    );

    let value = serde_json::to_value(&record).expect("record should serialise");

    assert_eq!(value["type"], "server");
    assert_eq!(value["server_name"], "Rustaceans");
    assert_eq!(value["server_id"], "30");
    assert_eq!(value["channel_name"], "general");
    assert_eq!(value["id"], "10");
    assert_eq!(value["timestamp"], "2024-01-15T10:30:00+00:00");
    assert!(value.get("dm_user").is_none());
}

#[rstest]
fn direct_activity_serialises_with_peer() {
    let bob = author("2", "bob");
    let record = ActivityRecord::new(
        message("11", "21", &bob, "hi", "2024-01-15T10:30:00+00:00"),
        ActivitySource::Direct {
            peer: Some(bob.clone()),
        },
    );

    let value = serde_json::to_value(&record).expect("record should serialise");

    assert_eq!(value["type"], "dm");
    assert_eq!(value["dm_user"]["username"], "bob");
    assert!(value.get("server_name").is_none());
}
