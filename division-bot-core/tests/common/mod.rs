#![allow(dead_code)]

use division_bot_core::{BallotCaster, Division};

pub fn member(name: &str, party: &str, abbr: &str) -> BallotCaster {
    BallotCaster {
        name: name.to_string(),
        sort_name: name.to_string(),
        party: party.to_string(),
        party_abbreviation: abbr.to_string(),
    }
}

pub fn division(id: i64) -> Division {
    Division {
        id,
        title_prefix: "On: ".to_string(),
        title: format!("Division {id}"),
        description: None,
        yes_voters: vec![],
        yes_count: 0,
        no_voters: vec![],
        no_count: 0,
    }
}

/// Newest-first feed of divisions with the given ids.
pub fn divisions(ids: &[i64]) -> Vec<Division> {
    ids.iter().copied().map(division).collect()
}

/// Yes: 3 members of 2 parties. No: 2 members of 1 party.
pub fn contested_division(id: i64) -> Division {
    Division {
        id,
        title_prefix: "On: ".to_string(),
        title: "Climate Change Bill: Third Reading".to_string(),
        description: None,
        yes_voters: vec![
            member("Ruth Jones", "Labour", "Lab"),
            member("Alan Brown", "Labour", "Lab"),
            member("Wera Hobhouse", "Liberal Democrat", "LD"),
        ],
        yes_count: 3,
        no_voters: vec![
            member("Zac Smith", "Conservative", "Con"),
            member("Anne Jenkin", "Conservative", "Con"),
        ],
        no_count: 2,
    }
}
