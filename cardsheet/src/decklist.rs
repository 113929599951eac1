use lazy_static::lazy_static;
use regex::{Match, Regex};

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct DecklistEntry {
    pub multiple: i32,
    pub name: String,
    pub set: Option<String>,
    pub collector_number: Option<String>,
    /// set codes longer than three characters starting with 'p' mark promo
    /// printings
    pub promo: bool,
}

impl DecklistEntry {
    pub fn new(
        multiple: i32,
        name: &str,
        set: Option<&str>,
        collector_number: Option<&str>,
    ) -> DecklistEntry {
        let set = set.map(str::to_lowercase);
        let promo = set.as_deref().is_some_and(|s| s.len() > 3 && s.starts_with('p'));
        DecklistEntry {
            multiple,
            name: name.to_string(),
            set,
            collector_number: collector_number.map(String::from),
            promo,
        }
    }

    pub fn from_name(n: &str) -> DecklistEntry {
        DecklistEntry::new(1, n, None, None)
    }

    pub fn from_multiple_name(m: i32, n: &str) -> DecklistEntry {
        DecklistEntry::new(m, n, None, None)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct ParsedDecklistLine<'a> {
    line: &'a str,
    entry: Option<DecklistEntry>,
}

impl ParsedDecklistLine<'_> {
    pub fn as_entry(&self) -> Option<DecklistEntry> {
        self.entry.clone()
    }
}

fn parse_multiple(group: Option<Match>) -> i32 {
    match group {
        Some(m) => m.as_str().parse().ok().unwrap_or(1),
        None => 1,
    }
}

/// Parse one `AMOUNT NAME (SET) COLLECTOR_NUMBER` line, where amount, set and
/// collector number are optional. `//` comment lines and section headers give
/// no entry, foil markers are ignored.
pub fn parse_line(line: &str) -> Option<DecklistEntry> {
    lazy_static! {
        static ref REMNS: Regex =
            Regex::new(r"^\s*(\d*)\s*([^(\t$]+?)\s*(?:\(([\dA-Za-z]{2,6})\)\s*([\w-]+)?)?\s*$")
                .unwrap();
    }

    if line.trim_start().starts_with("//") {
        return None;
    }
    let line = line.replace("*F*", "");

    let mns = REMNS.captures(line.trim())?;
    let multiple = parse_multiple(mns.get(1));
    let name = mns.get(2)?.as_str().trim();
    let name_lowercase = name.to_lowercase();
    let non_entries = ["deck", "decklist", "sideboard"];
    if non_entries.iter().any(|s| **s == name_lowercase) {
        return None;
    }
    Some(DecklistEntry::new(
        multiple,
        name,
        mns.get(3).map(|m| m.as_str()),
        mns.get(4).map(|m| m.as_str()),
    ))
}

pub fn parse_decklist(decklist: &str) -> Vec<ParsedDecklistLine<'_>> {
    decklist
        .lines()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| ParsedDecklistLine {
            line: s,
            entry: parse_line(s),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name() {
        assert_eq!(
            parse_line("plains").unwrap(),
            DecklistEntry::from_name("plains")
        );
    }

    #[test]
    fn number_name() {
        assert_eq!(
            parse_line("2\tplains").unwrap(),
            DecklistEntry::from_multiple_name(2, "plains")
        );
    }

    #[test]
    fn name_set() {
        assert_eq!(
            parse_line("long card's name (IPA)").unwrap(),
            DecklistEntry::new(1, "long card's name", Some("ipa"), None)
        );
    }

    #[test]
    fn number_name_set_collector() {
        assert_eq!(
            parse_line("1 Bedeck // Bedazzle (RNA) 221").unwrap(),
            DecklistEntry::new(1, "Bedeck // Bedazzle", Some("rna"), Some("221"))
        );
    }

    #[test]
    fn comment_line_is_skipped() {
        assert_eq!(parse_line("// lands below"), None);
    }

    #[test]
    fn foil_marker_is_ignored() {
        assert_eq!(
            parse_line("1 Lightning Bolt (2XM) 117 *F*").unwrap(),
            DecklistEntry::new(1, "Lightning Bolt", Some("2xm"), Some("117"))
        );
    }

    #[test]
    fn promo_set_code() {
        let entry = parse_line("1 Arcane Signet (PLST)").unwrap();
        assert_eq!(entry.set.as_deref(), Some("plst"));
        assert!(entry.promo);
        let regular = parse_line("1 Arcane Signet (CMR)").unwrap();
        assert!(!regular.promo);
    }

    #[test]
    fn alphanumeric_collector_number() {
        assert_eq!(
            parse_line("2 Plains (SLD) 85a").unwrap(),
            DecklistEntry::new(2, "Plains", Some("sld"), Some("85a"))
        );
    }

    #[test]
    fn arenaexport() {
        let decklist = "Deck
        1 Bedeck // Bedazzle (RNA) 221
        // a comment in between
        24 Plains (ANB) 115

        Sideboard
        2 Faerie Guidemother (ELD) 11";
        let expected = vec![
            ParsedDecklistLine {
                line: "Deck",
                entry: None,
            },
            ParsedDecklistLine {
                line: "1 Bedeck // Bedazzle (RNA) 221",
                entry: Some(DecklistEntry::new(
                    1,
                    "Bedeck // Bedazzle",
                    Some("rna"),
                    Some("221"),
                )),
            },
            ParsedDecklistLine {
                line: "// a comment in between",
                entry: None,
            },
            ParsedDecklistLine {
                line: "24 Plains (ANB) 115",
                entry: Some(DecklistEntry::new(24, "Plains", Some("anb"), Some("115"))),
            },
            ParsedDecklistLine {
                line: "Sideboard",
                entry: None,
            },
            ParsedDecklistLine {
                line: "2 Faerie Guidemother (ELD) 11",
                entry: Some(DecklistEntry::new(
                    2,
                    "Faerie Guidemother",
                    Some("eld"),
                    Some("11"),
                )),
            },
        ];
        let parsed = parse_decklist(decklist);
        assert_eq!(parsed.len(), expected.len());
        for (left, right) in parsed.iter().zip(expected.iter()) {
            assert_eq!(left, right);
        }
    }
}
