//! Keyword tagging of contract clauses.

use std::collections::BTreeMap;

use crate::models::contract::{ClauseGroup, ClauseHit};

use super::amounts::{find_money, find_percentage};

/// Built-in trigger strings per group.
const DEFAULT_TRIGGERS: [(ClauseGroup, &[&str]); 6] = [
    (ClauseGroup::Package, &["自選餐", "家庭特選餐", "家庭豪華餐", "影劇館", "自選20", "全選"]),
    (ClauseGroup::Mod, &["MOD", "影劇館", "未租滿", "退訂", "解約金"]),
    (ClauseGroup::Subsidy, &["補貼款", "每日優惠金額", "日優惠", "補貼"]),
    (ClauseGroup::Circuit, &["電路費", "光世代", "100M", "300M", "500M", "1G", "2G"]),
    (ClauseGroup::Internet, &["上網費", "HiNet", "上網費用"]),
    (ClauseGroup::Penalty, &["違約金", "違約費", "提前解約", "未滿約"]),
];

/// A keyword group and the literal substrings that trigger it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClauseRule {
    pub group: ClauseGroup,
    pub triggers: Vec<String>,
}

impl ClauseRule {
    pub fn matches(&self, clause: &str) -> bool {
        self.triggers.iter().any(|t| clause.contains(t.as_str()))
    }
}

/// Evaluates a table of clause rules against each clause.
#[derive(Debug, Clone)]
pub struct ClauseTagger {
    rules: Vec<ClauseRule>,
}

impl ClauseTagger {
    /// Tagger with the built-in rule table.
    pub fn new() -> Self {
        let rules = DEFAULT_TRIGGERS
            .iter()
            .map(|(group, triggers)| ClauseRule {
                group: *group,
                triggers: triggers.iter().map(|t| t.to_string()).collect(),
            })
            .collect();
        Self { rules }
    }

    /// Add trigger strings to a group.
    pub fn with_triggers<I, S>(mut self, group: ClauseGroup, triggers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let extra = triggers.into_iter().map(Into::into).filter(|t: &String| !t.is_empty());
        match self.rules.iter_mut().find(|r| r.group == group) {
            Some(rule) => rule.triggers.extend(extra),
            None => self.rules.push(ClauseRule {
                group,
                triggers: extra.collect(),
            }),
        }
        self
    }

    pub fn rules(&self) -> &[ClauseRule] {
        &self.rules
    }

    /// Groups whose triggers occur in the clause.
    pub fn matching_groups(&self, clause: &str) -> Vec<ClauseGroup> {
        self.rules
            .iter()
            .filter(|rule| rule.matches(clause))
            .map(|rule| rule.group)
            .collect()
    }

    /// Tag every clause. A clause adds at most one hit per group.
    pub fn tag<S: AsRef<str>>(&self, clauses: &[S]) -> BTreeMap<ClauseGroup, Vec<ClauseHit>> {
        let mut hits: BTreeMap<ClauseGroup, Vec<ClauseHit>> = BTreeMap::new();

        for clause in clauses {
            let clause = clause.as_ref();
            let groups = self.matching_groups(clause);
            if groups.is_empty() {
                continue;
            }

            let amount = find_money(clause);
            let pct = find_percentage(clause);
            for group in groups {
                hits.entry(group).or_default().push(ClauseHit {
                    text: clause.to_string(),
                    amount,
                    pct,
                });
            }
        }

        hits
    }
}

impl Default for ClauseTagger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    #[test]
    fn test_one_hit_per_group_per_clause() {
        let tagger = ClauseTagger::new();
        let hits = tagger.tag(&["違約金及提前解約違約費為15%"]);

        assert_eq!(hits.len(), 1);
        let penalty = &hits[&ClauseGroup::Penalty];
        assert_eq!(penalty.len(), 1);
        assert_eq!(penalty[0].pct, Some(Decimal::from(15)));
    }

    #[test]
    fn test_clause_in_several_groups() {
        let tagger = ClauseTagger::new();
        let hits = tagger.tag(&["影劇館未租滿12個月解約金398元"]);

        assert_eq!(hits.keys().copied().collect::<Vec<_>>(), vec![ClauseGroup::Package, ClauseGroup::Mod]);
        // first number in the clause
        assert_eq!(hits[&ClauseGroup::Mod][0].amount, Some(Decimal::from(12)));
    }

    #[test]
    fn test_untagged_clauses_are_skipped() {
        let tagger = ClauseTagger::new();
        let hits = tagger.tag(&["本合約一式兩份", "光世代100M/40M電路費"]);

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[&ClauseGroup::Circuit][0].text, "光世代100M/40M電路費");
        assert_eq!(hits[&ClauseGroup::Circuit][0].amount, Some(Decimal::from(100)));
    }

    #[test]
    fn test_hits_keep_document_order() {
        let tagger = ClauseTagger::new();
        let hits = tagger.tag(&["補貼款100元", "其他", "每日優惠金額3元"]);
        let texts: Vec<&str> = hits[&ClauseGroup::Subsidy].iter().map(|h| h.text.as_str()).collect();
        assert_eq!(texts, vec!["補貼款100元", "每日優惠金額3元"]);
    }

    #[test]
    fn test_extra_triggers() {
        let tagger = ClauseTagger::new().with_triggers(ClauseGroup::Penalty, ["賠償金", ""]);
        assert_eq!(tagger.matching_groups("賠償金500元"), vec![ClauseGroup::Penalty]);

        let penalty_rule = tagger.rules().iter().find(|r| r.group == ClauseGroup::Penalty).unwrap();
        assert!(!penalty_rule.triggers.iter().any(String::is_empty));
    }
}
