//! # report: compiles one division into NPF content blocks
//!
//! A [`Report`] is an ordered list of [`ContentBlock`]s plus the index of the
//! block after which the post folds behind "read more". Blocks serialise
//! directly to Tumblr's Neue Post Format text blocks.
//!
//! Formatting span offsets count Unicode scalar values, not bytes, and are
//! always derived from the text actually written into the block.
//!
//! Block order:
//! 1. `"<Chamber> Vote"` heading
//! 2. title, with italic + link spans over the part after the prefix
//! 3. description (if any)
//! 4. aye/noe/absent tally, with small spans over the percentage breakdowns
//! 5. likely referenced bill (if one was found)
//! 6. `"Individual Votes:"` heading, the truncation point
//! 7. ayes and noes, one heading and one name list per party

use serde::Serialize;
use tracing::{debug, info};

use crate::bill::find_bill_for;
use crate::chamber::Chamber;
use crate::contract::{Bill, BillSource, ClientError, Division, DivisionSource, NewPost};
use crate::tally::{group_members, party_tally, tally_string, MemberGroup};

pub const BILL_PREFIX: &str = "Likely Referenced Bill: ";
pub const BILL_URL_BASE: &str = "https://bills.parliament.uk/bills/";
/// Shown in place of bill details the Bills API left empty.
pub const UNKNOWN: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TextSubtype {
    #[serde(rename = "heading1")]
    Heading1,
    #[serde(rename = "heading2")]
    Heading2,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SpanStyle {
    Italic,
    Small,
    Link { url: String },
}

/// Half-open `[start, end)` character range carrying a style.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattingSpan {
    pub start: usize,
    pub end: usize,
    #[serde(flatten)]
    pub style: SpanStyle,
}

/// One NPF text block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename = "text")]
pub struct ContentBlock {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtype: Option<TextSubtype>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub formatting: Vec<FormattingSpan>,
}

impl ContentBlock {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            subtype: None,
            formatting: Vec::new(),
        }
    }

    pub fn heading(subtype: TextSubtype, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            subtype: Some(subtype),
            formatting: Vec::new(),
        }
    }

    pub fn formatted(text: impl Into<String>, formatting: Vec<FormattingSpan>) -> Self {
        Self {
            text: text.into(),
            subtype: None,
            formatting,
        }
    }

    /// Text length in the units spans are measured in.
    pub fn char_len(&self) -> usize {
        char_len(&self.text)
    }
}

/// One display row per block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayRow {
    pub blocks: Vec<usize>,
}

/// NPF `rows` layout entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename = "rows")]
pub struct RowsLayout {
    pub display: Vec<DisplayRow>,
    pub truncate_after: usize,
}

/// A compiled division report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub blocks: Vec<ContentBlock>,
    /// Index of the last block shown above the fold.
    pub truncate_after: usize,
}

impl Report {
    pub fn layout(&self) -> Vec<RowsLayout> {
        vec![RowsLayout {
            display: (0..self.blocks.len())
                .map(|i| DisplayRow { blocks: vec![i] })
                .collect(),
            truncate_after: self.truncate_after,
        }]
    }

    pub fn into_post(self, tags: Vec<String>) -> NewPost {
        let layout = self.layout();
        NewPost {
            content: self.blocks,
            tags,
            layout,
        }
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

fn span(start: usize, end: usize, style: SpanStyle) -> FormattingSpan {
    FormattingSpan { start, end, style }
}

/// Appends the report sections for one division in order.
pub struct ReportBuilder<'a> {
    division: &'a Division,
    blocks: Vec<ContentBlock>,
    truncate_after: Option<usize>,
}

impl<'a> ReportBuilder<'a> {
    pub fn new(division: &'a Division) -> Self {
        Self {
            division,
            blocks: Vec::new(),
            truncate_after: None,
        }
    }

    /// Chamber heading, linked title and description.
    pub fn header(&mut self, chamber: Chamber, vote_url: &str) -> &mut Self {
        self.blocks.push(ContentBlock::heading(
            TextSubtype::Heading1,
            format!("{} Vote", chamber.name()),
        ));

        let prefix_len = char_len(&self.division.title_prefix);
        let title = format!("{}{}", self.division.title_prefix, self.division.title);
        let title_len = char_len(&title);
        self.blocks.push(ContentBlock::formatted(
            title,
            vec![
                span(prefix_len, title_len, SpanStyle::Italic),
                span(
                    prefix_len,
                    title_len,
                    SpanStyle::Link {
                        url: vote_url.to_string(),
                    },
                ),
            ],
        ));

        if let Some(description) = self.division.description.as_deref() {
            if !description.is_empty() {
                self.blocks.push(ContentBlock::plain(description));
            }
        }
        self
    }

    /// Aye/noe counts with party percentages, and the approximate absentees.
    pub fn tallies(&mut self, members_total: i64) -> &mut Self {
        let division = self.division;
        let mut text = format!("Ayes: {} ", division.yes_count);

        let aye_start = char_len(&text);
        text.push_str(&format!("({})", tally_string(&party_tally(&division.yes_voters))));
        let aye_end = char_len(&text);

        text.push_str(&format!("\nNoes: {} ", division.no_count));

        let noe_start = char_len(&text);
        text.push_str(&format!("({})", tally_string(&party_tally(&division.no_voters))));
        let noe_end = char_len(&text);

        // Approximate: member lists can be incomplete even when counts are not.
        let absent = members_total - (division.yes_count + division.no_count);
        text.push_str(&format!("\nAbsent: ~{} ", absent));

        self.blocks.push(ContentBlock::formatted(
            text,
            vec![
                span(aye_start, aye_end, SpanStyle::Small),
                span(noe_start, noe_end, SpanStyle::Small),
            ],
        ));
        self
    }

    /// Linked bill name, its long title, and where it is in Parliament.
    pub fn bill(&mut self, bill: &Bill) -> &mut Self {
        let bill_name = format!("{BILL_PREFIX}{}", bill.short_title);
        let start = char_len(BILL_PREFIX);
        let end = char_len(&bill_name);
        self.blocks.push(ContentBlock::formatted(
            bill_name,
            vec![
                span(start, end, SpanStyle::Italic),
                span(
                    start,
                    end,
                    SpanStyle::Link {
                        url: format!("{BILL_URL_BASE}{}", bill.bill_id),
                    },
                ),
            ],
        ));

        let or_unknown = |value: Option<&str>| value.unwrap_or(UNKNOWN).to_string();
        let stage = bill
            .current_stage
            .as_ref()
            .and_then(|stage| stage.description.as_deref());

        self.blocks.push(ContentBlock::plain(format!(
            "Description: {}",
            or_unknown(bill.long_title.as_deref())
        )));

        let bill_info = [
            format!("Originating house: {}", or_unknown(bill.originating_house.as_deref())),
            format!("Current house: {}", or_unknown(bill.current_house.as_deref())),
            format!("Bill Stage: {}", or_unknown(stage)),
        ];
        self.blocks.push(ContentBlock::plain(bill_info.join("\n")));
        self
    }

    /// Per-party name lists for both sides. Returns the truncation index.
    pub fn individual_votes(&mut self) -> usize {
        self.blocks.push(ContentBlock::heading(
            TextSubtype::Heading2,
            "Individual Votes:",
        ));
        let read_more_index = self.blocks.len() - 1;
        self.truncate_after = Some(read_more_index);

        let division = self.division;
        self.blocks
            .push(ContentBlock::heading(TextSubtype::Heading1, "Ayes"));
        self.append_vote_groups(group_members(&division.yes_voters));

        self.blocks
            .push(ContentBlock::heading(TextSubtype::Heading1, "Noes"));
        self.append_vote_groups(group_members(&division.no_voters));

        read_more_index
    }

    fn append_vote_groups(&mut self, groups: Vec<MemberGroup>) {
        for group in groups {
            let count = group.members.len();
            self.blocks.push(ContentBlock::heading(
                TextSubtype::Heading2,
                format!(
                    "{} ({} vote{})",
                    group.party,
                    count,
                    if count != 1 { "s" } else { "" }
                ),
            ));

            let names = group
                .members
                .iter()
                .map(|member| member.name.as_str())
                .collect::<Vec<_>>()
                .join("\n");
            let names_len = char_len(&names);
            self.blocks.push(ContentBlock::formatted(
                names,
                vec![span(0, names_len, SpanStyle::Small)],
            ));
        }
    }

    pub fn finish(self) -> Report {
        let truncate_after = self
            .truncate_after
            .unwrap_or_else(|| self.blocks.len().saturating_sub(1));
        Report {
            blocks: self.blocks,
            truncate_after,
        }
    }
}

/// Build the full report for a division from already-fetched inputs.
pub fn build_report(
    chamber: Chamber,
    division: &Division,
    vote_url: &str,
    members_total: i64,
    bill: Option<&Bill>,
) -> Report {
    let mut builder = ReportBuilder::new(division);
    builder.header(chamber, vote_url).tallies(members_total);
    if let Some(bill) = bill {
        builder.bill(bill);
    }
    builder.individual_votes();
    builder.finish()
}

/// Look up a likely referenced bill, then build the report.
pub async fn compile_report<S, B>(
    source: &S,
    bills: &B,
    division: &Division,
    members_total: i64,
) -> Result<Report, ClientError>
where
    S: DivisionSource + ?Sized,
    B: BillSource + ?Sized,
{
    debug!(division_id = division.id, "Preparing content for division");
    let bill = find_bill_for(bills, &division.title).await?;
    if let Some(bill) = &bill {
        info!(division_id = division.id, bill = %bill.short_title, "Found likely referenced bill");
    }

    let report = build_report(
        source.chamber(),
        division,
        &source.vote_url(division.id),
        members_total,
        bill.as_ref(),
    );
    debug!(
        division_id = division.id,
        blocks = report.blocks.len(),
        truncate_after = report.truncate_after,
        "Compiled division report"
    );
    Ok(report)
}
