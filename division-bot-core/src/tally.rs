//! Tally engine: percentage breakdowns and per-party member listings.

use std::collections::HashMap;

use crate::contract::BallotCaster;

/// One row of a percentage breakdown, e.g. `total: 3, label: "75.0% Lab"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteTally {
    pub total: usize,
    pub label: String,
}

/// Members of one party who voted the same way, sorted by sort name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberGroup {
    pub party: String,
    pub members: Vec<BallotCaster>,
}

/// Percentage of `count` in `total` to one decimal place, e.g. `"66.7"`.
///
/// Computed on the exact ratio; an exact half rounds to the even tenth, so
/// 20 of 320 gives `"6.2"`. `total` must be non-zero.
fn percentage(count: usize, total: usize) -> String {
    let scaled = count as u128 * 1000;
    let total = total as u128;
    let mut tenths = scaled / total;
    let twice_remainder = (scaled % total) * 2;
    if twice_remainder > total || (twice_remainder == total && tenths % 2 == 1) {
        tenths += 1;
    }
    format!("{}.{}", tenths / 10, tenths % 10)
}

/// Count ballots per key, largest share first.
///
/// Keys with equal counts keep the order they were first seen in. An empty
/// input gives an empty tally.
pub fn count_votes<'a, I>(keys: I) -> Vec<VoteTally>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut order: Vec<&'a str> = Vec::new();
    let mut counts: HashMap<&'a str, usize> = HashMap::new();
    let mut total = 0;

    for key in keys {
        let count = counts.entry(key).or_insert_with(|| {
            order.push(key);
            0
        });
        *count += 1;
        total += 1;
    }

    let mut tally: Vec<VoteTally> = order
        .into_iter()
        .map(|key| {
            let count = counts[key];
            VoteTally {
                total: count,
                label: format!("{}% {}", percentage(count, total), key),
            }
        })
        .collect();

    // sort_by is stable, so ties stay in first-seen order
    tally.sort_by(|a, b| b.total.cmp(&a.total));
    tally
}

/// Percentage breakdown of a side by party abbreviation.
pub fn party_tally(voters: &[BallotCaster]) -> Vec<VoteTally> {
    count_votes(voters.iter().map(|voter| voter.party_abbreviation.as_str()))
}

/// Labels joined for display, e.g. `"60.0% Con, 40.0% Lab"`.
pub fn tally_string(tally: &[VoteTally]) -> String {
    tally
        .iter()
        .map(|item| item.label.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Group voters by full party name, largest group first.
pub fn group_members(voters: &[BallotCaster]) -> Vec<MemberGroup> {
    let mut groups: Vec<MemberGroup> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for voter in voters {
        let slot = *index.entry(voter.party.as_str()).or_insert_with(|| {
            groups.push(MemberGroup {
                party: voter.party.clone(),
                members: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].members.push(voter.clone());
    }

    for group in &mut groups {
        group.members.sort_by(|a, b| a.sort_name.cmp(&b.sort_name));
    }
    groups.sort_by(|a, b| b.members.len().cmp(&a.members.len()));
    groups
}
