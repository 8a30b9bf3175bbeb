mod common;

use common::{contested_division, division, member};
use division_bot_core::contract::{Bill, BillStage, BillSummary, MockBillSource, MockDivisionSource};
use division_bot_core::report::{
    build_report, compile_report, ContentBlock, FormattingSpan, SpanStyle, TextSubtype,
    BILL_PREFIX,
};
use division_bot_core::Chamber;
use mockall::predicate::eq;

const VOTE_URL: &str = "https://votes.parliament.uk/votes/commons/division/101";

fn climate_bill() -> Bill {
    Bill {
        bill_id: 3154,
        short_title: "Climate Change Bill".to_string(),
        long_title: Some("A Bill to set a target for the year 2050".to_string()),
        originating_house: Some("Lords".to_string()),
        current_house: Some("Commons".to_string()),
        current_stage: Some(BillStage {
            description: Some("Report stage".to_string()),
            house: Some("Commons".to_string()),
        }),
    }
}

fn substring(text: &str, span: &FormattingSpan) -> String {
    text.chars()
        .skip(span.start)
        .take(span.end - span.start)
        .collect()
}

fn assert_spans_within_blocks(blocks: &[ContentBlock]) {
    for block in blocks {
        for span in &block.formatting {
            assert!(
                span.start <= span.end && span.end <= block.char_len(),
                "span {span:?} outside block {:?}",
                block.text
            );
        }
    }
}

#[test]
fn report_blocks_follow_fixed_order() {
    let report = build_report(Chamber::Commons, &contested_division(101), VOTE_URL, 650, None);
    let texts: Vec<&str> = report.blocks.iter().map(|b| b.text.as_str()).collect();

    assert_eq!(
        texts,
        vec![
            "Commons Vote",
            "On: Climate Change Bill: Third Reading",
            "Ayes: 3 (66.7% Lab, 33.3% LD)\nNoes: 2 (100.0% Con)\nAbsent: ~645 ",
            "Individual Votes:",
            "Ayes",
            "Labour (2 votes)",
            "Alan Brown\nRuth Jones",
            "Liberal Democrat (1 vote)",
            "Wera Hobhouse",
            "Noes",
            "Conservative (2 votes)",
            "Anne Jenkin\nZac Smith",
        ]
    );
    assert_eq!(report.truncate_after, 3);
    assert_eq!(report.blocks[0].subtype, Some(TextSubtype::Heading1));
    assert_eq!(report.blocks[3].subtype, Some(TextSubtype::Heading2));
    assert_eq!(report.blocks[4].subtype, Some(TextSubtype::Heading1));
    assert_eq!(report.blocks[5].subtype, Some(TextSubtype::Heading2));
    assert_spans_within_blocks(&report.blocks);
}

#[test]
fn title_spans_cover_title_without_prefix() {
    let report = build_report(Chamber::Commons, &contested_division(101), VOTE_URL, 650, None);
    let title = &report.blocks[1];

    assert_eq!(title.formatting.len(), 2);
    for span in &title.formatting {
        assert_eq!(span.start, "On: ".len());
        assert_eq!(span.end, title.char_len());
        assert_eq!(substring(&title.text, span), "Climate Change Bill: Third Reading");
    }
    assert_eq!(title.formatting[0].style, SpanStyle::Italic);
    assert_eq!(
        title.formatting[1].style,
        SpanStyle::Link {
            url: VOTE_URL.to_string()
        }
    );
}

#[test]
fn spans_count_characters_not_bytes() {
    let mut div = contested_division(7);
    div.title_prefix = "Ôn: ".to_string();
    div.title = "Café Licensing Bill".to_string();
    let report = build_report(Chamber::Lords, &div, "https://example.test/7", 800, None);
    let title = &report.blocks[1];

    assert_eq!(title.formatting[0].start, 4);
    assert_eq!(title.formatting[0].end, 23);
    assert_eq!(substring(&title.text, &title.formatting[0]), "Café Licensing Bill");
}

#[test]
fn tally_block_small_spans_cover_parenthesised_breakdowns() {
    let report = build_report(Chamber::Commons, &contested_division(101), VOTE_URL, 650, None);
    let tally = &report.blocks[2];

    let small: Vec<String> = tally
        .formatting
        .iter()
        .map(|span| {
            assert_eq!(span.style, SpanStyle::Small);
            substring(&tally.text, span)
        })
        .collect();
    assert_eq!(small, vec!["(66.7% Lab, 33.3% LD)", "(100.0% Con)"]);
}

#[test]
fn empty_aye_side_renders_empty_breakdown() {
    let mut div = division(55);
    div.no_voters = vec![member("Zac Smith", "Conservative", "Con")];
    div.no_count = 1;
    let report = build_report(Chamber::Commons, &div, VOTE_URL, 650, None);
    let tally = &report.blocks[2];

    assert!(tally.text.starts_with("Ayes: 0 ()\nNoes: 1 (100.0% Con)"));
    assert_eq!(substring(&tally.text, &tally.formatting[0]), "()");

    // "Ayes" heading immediately followed by "Noes".
    let ayes = report.blocks.iter().position(|b| b.text == "Ayes").expect("ayes heading");
    assert_eq!(report.blocks[ayes + 1].text, "Noes");
    assert_spans_within_blocks(&report.blocks);
}

#[test]
fn counts_are_authoritative_even_with_partial_member_lists() {
    let mut div = contested_division(9);
    div.yes_count = 300;
    div.no_count = 250;
    let report = build_report(Chamber::Commons, &div, VOTE_URL, 650, None);
    assert!(report.blocks[2].text.starts_with("Ayes: 300 "));
    assert!(report.blocks[2].text.ends_with("\nAbsent: ~100 "));
}

#[test]
fn description_block_only_when_present_and_non_empty() {
    let mut div = contested_division(3);
    div.description = Some(String::new());
    let report = build_report(Chamber::Lords, &div, VOTE_URL, 800, None);
    assert!(report.blocks[2].text.starts_with("Ayes:"));

    div.description = Some("Moved by Lord Smith".to_string());
    let report = build_report(Chamber::Lords, &div, VOTE_URL, 800, None);
    assert_eq!(report.blocks[0].text, "Lords Vote");
    assert_eq!(report.blocks[2], ContentBlock::plain("Moved by Lord Smith"));
    assert_eq!(report.truncate_after, 4);
}

#[test]
fn bill_blocks_sit_above_the_fold() {
    let bill = climate_bill();
    let report = build_report(Chamber::Commons, &contested_division(101), VOTE_URL, 650, Some(&bill));

    let name = &report.blocks[3];
    assert_eq!(name.text, "Likely Referenced Bill: Climate Change Bill");
    for span in &name.formatting {
        assert_eq!(span.start, BILL_PREFIX.chars().count());
        assert_eq!(substring(&name.text, span), "Climate Change Bill");
    }
    assert_eq!(
        name.formatting[1].style,
        SpanStyle::Link {
            url: "https://bills.parliament.uk/bills/3154".to_string()
        }
    );

    assert_eq!(
        report.blocks[4].text,
        "Description: A Bill to set a target for the year 2050"
    );
    assert_eq!(
        report.blocks[5].text,
        "Originating house: Lords\nCurrent house: Commons\nBill Stage: Report stage"
    );
    assert_eq!(report.blocks[6].text, "Individual Votes:");
    assert_eq!(report.truncate_after, 6);
    assert_spans_within_blocks(&report.blocks);
}

#[test]
fn missing_bill_details_render_as_unknown() {
    let bill: Bill = serde_json::from_str(
        r#"{
            "billId": 3200,
            "shortTitle": "Energy Bill",
            "longTitle": null,
            "originatingHouse": "Lords",
            "currentHouse": null,
            "currentStage": null
        }"#,
    )
    .expect("bill with null details decodes");
    let report = build_report(Chamber::Lords, &contested_division(12), VOTE_URL, 800, Some(&bill));

    assert_eq!(report.blocks[3].text, "Likely Referenced Bill: Energy Bill");
    assert_eq!(report.blocks[4].text, "Description: Unknown");
    assert_eq!(
        report.blocks[5].text,
        "Originating house: Lords\nCurrent house: Unknown\nBill Stage: Unknown"
    );
    assert_eq!(report.truncate_after, 6);
}

#[test]
fn member_list_blocks_are_small_over_whole_text() {
    let report = build_report(Chamber::Commons, &contested_division(101), VOTE_URL, 650, None);
    let list = &report.blocks[6];
    assert_eq!(
        list.formatting,
        vec![FormattingSpan {
            start: 0,
            end: list.char_len(),
            style: SpanStyle::Small
        }]
    );
}

#[test]
fn layout_puts_each_block_in_its_own_row() {
    let report = build_report(Chamber::Commons, &contested_division(101), VOTE_URL, 650, None);
    let layout = report.layout();

    assert_eq!(layout.len(), 1);
    assert_eq!(layout[0].truncate_after, 3);
    assert_eq!(layout[0].display.len(), report.blocks.len());
    for (i, row) in layout[0].display.iter().enumerate() {
        assert_eq!(row.blocks, vec![i]);
    }
}

#[test]
fn blocks_serialise_as_npf_text() {
    let report = build_report(Chamber::Commons, &contested_division(101), VOTE_URL, 650, None);
    let post = report.into_post(vec!["commons".to_string()]);
    let json = serde_json::to_value(&post).expect("post serialises");

    assert_eq!(
        json["content"][0],
        serde_json::json!({"type": "text", "text": "Commons Vote", "subtype": "heading1"})
    );
    assert_eq!(
        json["content"][1]["formatting"],
        serde_json::json!([
            {"start": 4, "end": 38, "type": "italic"},
            {"start": 4, "end": 38, "type": "link", "url": VOTE_URL},
        ])
    );
    assert!(json["content"][2].get("subtype").is_none());
    assert_eq!(json["layout"][0]["type"], "rows");
    assert_eq!(json["layout"][0]["truncate_after"], 3);
    assert_eq!(json["layout"][0]["display"][0], serde_json::json!({"blocks": [0]}));
    assert_eq!(json["tags"], serde_json::json!(["commons"]));
}

#[tokio::test]
async fn compile_report_looks_up_bill_from_title() {
    let mut source = MockDivisionSource::new();
    source.expect_chamber().return_const(Chamber::Commons);
    source
        .expect_vote_url()
        .with(eq(101))
        .returning(|id| format!("https://votes.parliament.uk/votes/commons/division/{id}"));

    let mut bills = MockBillSource::new();
    bills
        .expect_search()
        .withf(|term, take| term.to_string() == "Climate Change" && *take == 1)
        .times(1)
        .returning(|_, _| {
            Ok(vec![BillSummary {
                bill_id: 3154,
                short_title: "Climate Change Bill".to_string(),
                current_house: None,
                originating_house: None,
            }])
        });
    bills
        .expect_get()
        .with(eq(3154))
        .times(1)
        .returning(|_| Ok(climate_bill()));

    let report = compile_report(&source, &bills, &contested_division(101), 650)
        .await
        .expect("report should compile");

    assert_eq!(report.blocks[1].formatting[1].style, SpanStyle::Link { url: VOTE_URL.to_string() });
    assert!(report
        .blocks
        .iter()
        .any(|b| b.text == "Likely Referenced Bill: Climate Change Bill"));
}

#[tokio::test]
async fn compile_report_without_bill_match_omits_bill_blocks() {
    let mut source = MockDivisionSource::new();
    source.expect_chamber().return_const(Chamber::Commons);
    source.expect_vote_url().returning(|id| format!("https://example.test/{id}"));

    let mut bills = MockBillSource::new();
    bills.expect_search().returning(|_, _| Ok(vec![]));
    bills.expect_get().never();

    let report = compile_report(&source, &bills, &contested_division(101), 650)
        .await
        .expect("report should compile");
    assert_eq!(report.truncate_after, 3);
    assert!(!report.blocks.iter().any(|b| b.text.starts_with(BILL_PREFIX)));
}
