use chrono::{TimeZone, Utc};
use division_bot::tumblr::{
    created_post_id, cursor_post_body, create_post_body, parse_cursor_post,
};
use division_bot_core::contract::Division;
use division_bot_core::cursor::CursorDocument;
use division_bot_core::report::build_report;
use division_bot_core::{BallotCaster, Chamber};
use serde_json::json;

fn division() -> Division {
    let member = |name: &str| BallotCaster {
        name: name.to_string(),
        sort_name: name.to_string(),
        party: "Conservative".to_string(),
        party_abbreviation: "Con".to_string(),
    };
    Division {
        id: 1825,
        title_prefix: "On: ".to_string(),
        title: "Criminal Justice Bill: Report Stage".to_string(),
        description: None,
        yes_voters: vec![member("Philip Davies")],
        yes_count: 1,
        no_voters: vec![],
        no_count: 0,
    }
}

#[test]
fn create_post_body_carries_npf_content_layout_and_joined_tags() {
    let report = build_report(
        Chamber::Commons,
        &division(),
        "https://votes.parliament.uk/votes/commons/division/1825",
        650,
        None,
    );
    let blocks = report.blocks.len();
    let post = report.into_post(vec!["uk politics".to_string(), "commons".to_string()]);

    let body = create_post_body(&post).expect("body builds");

    assert_eq!(body["tags"], "uk politics,commons");
    assert_eq!(body["content"].as_array().map(Vec::len), Some(blocks));
    assert_eq!(body["content"][0]["type"], "text");
    assert_eq!(body["content"][0]["subtype"], "heading1");
    assert_eq!(body["layout"][0]["type"], "rows");
    assert_eq!(body["layout"][0]["truncate_after"], 3);
    assert_eq!(
        body["layout"][0]["display"].as_array().map(Vec::len),
        Some(blocks)
    );
}

#[test]
fn created_post_id_prefers_id_string() {
    let response = json!({
        "meta": {"status": 201, "msg": "Created"},
        "response": {"id": 712345678901234567_i64, "id_string": "712345678901234567", "state": "published"}
    });
    assert_eq!(created_post_id(&response).unwrap(), "712345678901234567");

    let response = json!({"response": {"id": 42}});
    assert_eq!(created_post_id(&response).unwrap(), "42");

    let response = json!({"response": {"id": "43"}});
    assert_eq!(created_post_id(&response).unwrap(), "43");
}

#[test]
fn created_post_id_errors_without_id() {
    assert!(created_post_id(&json!({"response": {}})).is_err());
    assert!(created_post_id(&json!({"response": {"id": null}})).is_err());
}

#[test]
fn parse_cursor_post_reads_yaml_from_first_text_block() {
    let response = json!({
        "response": {
            "id_string": "1",
            "content": [
                {"type": "text", "text": "last_commons_vote: 1825\nlast_lords_vote: 3124\n"},
                {"type": "text", "text": "ignored"}
            ]
        }
    });
    let document = parse_cursor_post(&response).expect("cursor document");
    assert_eq!(document.get(Chamber::Commons), 1825);
    assert_eq!(document.get(Chamber::Lords), 3124);
}

#[test]
fn parse_cursor_post_errors_on_missing_block_or_bad_yaml() {
    assert!(parse_cursor_post(&json!({"response": {"content": []}})).is_err());

    let response = json!({
        "response": {"content": [{"type": "text", "text": "last_commons_vote: lots"}]}
    });
    assert!(parse_cursor_post(&response).is_err());
}

#[test]
fn cursor_post_body_rewrites_yaml_and_tags() {
    let document = CursorDocument {
        last_commons_vote: 1826,
        last_lords_vote: 3124,
    };
    let updated = Utc.with_ymd_and_hms(2024, 5, 14, 9, 30, 0).unwrap();

    let body = cursor_post_body(&document, updated).expect("body builds");

    let text = body["content"][0]["text"].as_str().expect("text block");
    assert_eq!(CursorDocument::from_yaml(text).unwrap(), document);
    assert_eq!(body["content"][0]["type"], "text");

    let tags: Vec<&str> = body["tags"].as_str().unwrap().split(',').collect();
    assert_eq!(
        tags,
        vec![
            "config",
            "this post exists to store config data because it's easier than some local method",
            "updated: 2024-05-14T09:30:00.000000",
            "non-wankerwatch",
        ]
    );
}

#[test]
fn cursor_post_round_trips_through_parse() {
    let document = CursorDocument {
        last_commons_vote: 7,
        last_lords_vote: 9,
    };
    let body = cursor_post_body(&document, Utc::now()).unwrap();
    let fetched = json!({"response": {"content": body["content"].clone()}});
    assert_eq!(parse_cursor_post(&fetched).unwrap(), document);
}
