//! Reshaping a flat snapshot into display entries.
//!
//! Quotes whose commodity matches a group rule (case-insensitive substring) are
//! collected into one `Group` per rule, emitted first in rule order. All other
//! quotes follow as `Single` entries in source order. The transform is a
//! partition: every input quote lands in exactly one entry.
use serde::{Deserialize, Serialize};

use crate::contract::ContractLabel;
use crate::quote::Quote;

/// Default group name.
pub const COTTON_GROUP: &str = "Cotton";
/// Marker identifying the index price inside the cotton group.
pub const COTLOOK_MARKER: &str = "Cotlook A Index";

/// One rule that bundles matching quotes under a named group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupRule {
    /// Group header.
    pub name: String,
    /// Lowercase substrings; a quote matches if its commodity contains any.
    pub keywords: Vec<String>,
    /// Text identifying the distinguished index member, if the group has one.
    pub index_marker: Option<String>,
}

impl GroupRule {
    /// Build a rule; keywords are lowercased once here.
    pub fn new(
        name: impl Into<String>,
        keywords: impl IntoIterator<Item = impl AsRef<str>>,
        index_marker: Option<String>,
    ) -> Self {
        GroupRule {
            name: name.into(),
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
            index_marker,
        }
    }

    /// The cotton rule: `cotton` futures plus the Cotlook A Index.
    pub fn cotton() -> Self {
        GroupRule::new(
            COTTON_GROUP,
            ["cotton", "cotlook"],
            Some(COTLOOK_MARKER.to_string()),
        )
    }

    /// Whether `commodity` belongs to this group.
    pub fn matches(&self, commodity: &str) -> bool {
        let lower = commodity.to_lowercase();
        self.keywords.iter().any(|k| lower.contains(k.as_str()))
            || self
                .index_marker
                .as_deref()
                .is_some_and(|marker| commodity.contains(marker))
    }
}

/// Ordered set of group rules. A quote joins the first rule it matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupingRules {
    rules: Vec<GroupRule>,
}

impl Default for GroupingRules {
    fn default() -> Self {
        GroupingRules {
            rules: vec![GroupRule::cotton()],
        }
    }
}

impl GroupingRules {
    /// Rules in priority order.
    pub fn new(rules: Vec<GroupRule>) -> Self {
        GroupingRules { rules }
    }

    /// All rules.
    pub fn rules(&self) -> &[GroupRule] {
        &self.rules
    }

    /// Rule for a group name.
    pub fn rule(&self, name: &str) -> Option<&GroupRule> {
        self.rules.iter().find(|r| r.name == name)
    }

    /// Flat quote list to display entries.
    pub fn transform(&self, quotes: &[Quote]) -> Vec<DisplayEntry> {
        let mut groups: Vec<Vec<Quote>> = vec![Vec::new(); self.rules.len()];
        let mut singles = Vec::new();

        for quote in quotes {
            match self.rules.iter().position(|r| r.matches(&quote.commodity)) {
                Some(i) => groups[i].push(quote.clone()),
                None => singles.push(DisplayEntry::Single {
                    quote: quote.clone(),
                }),
            }
        }

        let mut entries: Vec<DisplayEntry> = self
            .rules
            .iter()
            .zip(groups)
            .filter(|(_, members)| !members.is_empty())
            .map(|(rule, members)| DisplayEntry::Group {
                name: rule.name.clone(),
                members,
            })
            .collect();
        entries.extend(singles);
        entries
    }
}

/// Group with the default cotton rule.
pub fn transform(quotes: &[Quote]) -> Vec<DisplayEntry> {
    GroupingRules::default().transform(quotes)
}

/// One row of the dashboard: a standalone quote or a named bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum DisplayEntry {
    /// A quote shown on its own card.
    Single {
        /// The quote.
        quote: Quote,
    },
    /// A collapsible bundle of related quotes.
    Group {
        /// Header text, also the selection key.
        name: String,
        /// Members in source order.
        members: Vec<Quote>,
    },
}

impl DisplayEntry {
    /// Key used by the selection accordion.
    pub fn key(&self) -> &str {
        match self {
            DisplayEntry::Single { quote } => &quote.commodity,
            DisplayEntry::Group { name, .. } => name,
        }
    }

    /// Quotes carried by this entry.
    pub fn quotes(&self) -> &[Quote] {
        match self {
            DisplayEntry::Single { quote } => std::slice::from_ref(quote),
            DisplayEntry::Group { members, .. } => members,
        }
    }
}

/// A group member prepared for display.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledContract<'a> {
    /// Derived label.
    pub label: ContractLabel,
    /// Underlying quote.
    pub quote: &'a Quote,
}

/// Group members split into the index price and the remaining contracts.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupBreakdown<'a> {
    /// First member carrying the index marker.
    pub index: Option<&'a Quote>,
    /// Every other member, in source order.
    pub contracts: Vec<LabeledContract<'a>>,
}

impl<'a> GroupBreakdown<'a> {
    /// Split `members` on `index_marker`. Without a marker every member is a contract.
    pub fn split(members: &'a [Quote], index_marker: Option<&str>) -> Self {
        let index_pos = index_marker
            .and_then(|marker| members.iter().position(|q| q.commodity.contains(marker)));

        let contracts = members
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != index_pos)
            .map(|(_, quote)| LabeledContract {
                label: ContractLabel::from_commodity(&quote.commodity),
                quote,
            })
            .collect();

        GroupBreakdown {
            index: index_pos.map(|i| &members[i]),
            contracts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quote::FlexValue;

    fn quote(commodity: &str) -> Quote {
        Quote::new(commodity, 1.0, None, "$/t", "2024-05-01T10:00:00Z")
    }

    fn names(quotes: &[Quote]) -> Vec<&str> {
        quotes.iter().map(|q| q.commodity.as_str()).collect()
    }

    #[test]
    fn empty_snapshot_yields_no_entries() {
        assert!(transform(&[]).is_empty());
    }

    #[test]
    fn cotton_quotes_are_grouped_first() {
        let input = vec![
            quote("Wheat (H2)"),
            quote("Cotton (Cotton H24)"),
            quote("Barley (feed)"),
            quote("Cotlook A Index"),
            quote("COTTON (Cotton Z24)"),
        ];
        let entries = transform(&input);

        assert_eq!(entries.len(), 3);
        match &entries[0] {
            DisplayEntry::Group { name, members } => {
                assert_eq!(name, COTTON_GROUP);
                assert_eq!(
                    names(members),
                    ["Cotton (Cotton H24)", "Cotlook A Index", "COTTON (Cotton Z24)"]
                );
            }
            other => panic!("expected group, got {:?}", other),
        }
        assert_eq!(entries[1].key(), "Wheat (H2)");
        assert_eq!(entries[2].key(), "Barley (feed)");
    }

    #[test]
    fn no_match_preserves_order_without_group() {
        let input = vec![quote("Wheat (H2)"), quote("Beef"), quote("Barley (feed)")];
        let entries = transform(&input);
        assert!(entries.iter().all(|e| matches!(e, DisplayEntry::Single { .. })));
        let keys: Vec<&str> = entries.iter().map(|e| e.key()).collect();
        assert_eq!(keys, ["Wheat (H2)", "Beef", "Barley (feed)"]);
    }

    #[test]
    fn first_matching_rule_wins() {
        let rules = GroupingRules::new(vec![
            GroupRule::new("Grains", ["wheat", "barley"], None),
            GroupRule::cotton(),
        ]);
        let input = vec![quote("Cotton Cash"), quote("Wheat (H2)"), quote("Beef")];
        let entries = rules.transform(&input);
        let keys: Vec<&str> = entries.iter().map(|e| e.key()).collect();
        assert_eq!(keys, ["Grains", "Cotton", "Beef"]);
    }

    #[test]
    fn breakdown_separates_index_and_labels_contracts() {
        let members = vec![
            quote("Cotton (Cotton H24)"),
            quote("Cotton (Cotlook A Index)"),
            quote("Cotton Cash"),
            quote("Cotton (CT Futures)"),
        ];
        let breakdown = GroupBreakdown::split(&members, Some(COTLOOK_MARKER));

        assert_eq!(
            breakdown.index.map(|q| q.commodity.as_str()),
            Some("Cotton (Cotlook A Index)")
        );
        let labels: Vec<String> = breakdown
            .contracts
            .iter()
            .map(|c| c.label.to_string())
            .collect();
        assert_eq!(labels, ["Mar 24", "Cash", "Cotton (CT Futures)"]);
    }

    #[test]
    fn breakdown_without_index_member() {
        let members = vec![quote("Cotton (Cotton N25)")];
        let breakdown = GroupBreakdown::split(&members, Some(COTLOOK_MARKER));
        assert!(breakdown.index.is_none());
        assert_eq!(breakdown.contracts.len(), 1);
    }

    #[test]
    fn end_to_end_snapshot() {
        let input = vec![
            Quote::new("Cotton (Cotton H24)", 90.0, Some(FlexValue::from("1.2%")), "c/lb", ""),
            Quote::new("Cotlook A Index", 95.0, Some(FlexValue::from("-0.5")), "c/lb", ""),
            Quote::new("Wheat H2", 300.0, Some(FlexValue::Number(0.0)), "$/t", ""),
        ];
        let entries = transform(&input);
        assert_eq!(
            entries,
            vec![
                DisplayEntry::Group {
                    name: "Cotton".into(),
                    members: input[..2].to_vec(),
                },
                DisplayEntry::Single {
                    quote: input[2].clone()
                },
            ]
        );
    }
}
