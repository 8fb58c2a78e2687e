//! Group-by mean of `charges` over the cleaned records.
//!
//! Grouping lists every category combination, not just the observed ones:
//! bracket columns contribute their whole fixed enumeration, the other
//! columns contribute their sorted distinct observed values, and the output
//! is the cartesian product of those levels with the first column outermost.
//! Combinations with no rows carry `mean_charges: None`.

use crate::brackets::{AgeBracket, BmiBracket};
use crate::records::{self, InsuranceRecord};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupColumn {
    AgeBracket,
    BmiBracket,
    Sex,
    Children,
    Smoker,
    Region,
}

impl GroupColumn {
    pub fn name(self) -> &'static str {
        match self {
            GroupColumn::AgeBracket => records::AGE_BRACKET,
            GroupColumn::BmiBracket => records::BMI_BRACKET,
            GroupColumn::Sex => records::SEX,
            GroupColumn::Children => records::CHILDREN,
            GroupColumn::Smoker => records::SMOKER,
            GroupColumn::Region => records::REGION,
        }
    }

    fn value_of(self, record: &InsuranceRecord) -> GroupValue {
        match self {
            GroupColumn::AgeBracket => GroupValue::Age(record.age_bracket),
            GroupColumn::BmiBracket => GroupValue::Bmi(record.bmi_bracket),
            GroupColumn::Sex => GroupValue::Text(record.sex.clone()),
            GroupColumn::Children => GroupValue::Count(record.children),
            GroupColumn::Smoker => GroupValue::Text(record.smoker.clone()),
            GroupColumn::Region => GroupValue::Text(record.region.clone()),
        }
    }

    /// Every level of this column in output order.
    pub fn levels(self, records: &[InsuranceRecord]) -> Vec<GroupValue> {
        match self {
            GroupColumn::AgeBracket => AgeBracket::ALL.into_iter().map(GroupValue::Age).collect(),
            GroupColumn::BmiBracket => BmiBracket::ALL.into_iter().map(GroupValue::Bmi).collect(),
            _ => records
                .iter()
                .map(|r| self.value_of(r))
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect(),
        }
    }
}

impl fmt::Display for GroupColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single key cell. Within one column every value has the same variant,
/// so the derived ordering is the column's natural order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(untagged)]
pub enum GroupValue {
    Age(AgeBracket),
    Bmi(BmiBracket),
    Count(i64),
    Text(String),
}

impl fmt::Display for GroupValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupValue::Age(b) => b.fmt(f),
            GroupValue::Bmi(b) => b.fmt(f),
            GroupValue::Count(n) => n.fmt(f),
            GroupValue::Text(s) => f.write_str(s),
        }
    }
}

/// One or two grouping columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Grouping {
    One(GroupColumn),
    Two(GroupColumn, GroupColumn),
}

impl Grouping {
    pub fn columns(&self) -> Vec<GroupColumn> {
        match *self {
            Grouping::One(a) => vec![a],
            Grouping::Two(a, b) => vec![a, b],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateRow {
    pub keys: Vec<GroupValue>,
    pub mean_charges: Option<f64>,
    pub count: usize,
}

/// Mean `charges` for every combination of the grouping's levels.
pub fn mean_charges_by(records: &[InsuranceRecord], grouping: Grouping) -> Vec<AggregateRow> {
    let columns = grouping.columns();

    let mut sums: HashMap<Vec<GroupValue>, (f64, usize)> = HashMap::new();
    for record in records {
        let key: Vec<GroupValue> = columns.iter().map(|c| c.value_of(record)).collect();
        let entry = sums.entry(key).or_insert((0.0, 0));
        entry.0 += record.charges;
        entry.1 += 1;
    }

    let mut combos: Vec<Vec<GroupValue>> = vec![Vec::new()];
    for column in &columns {
        let levels = column.levels(records);
        combos = combos
            .into_iter()
            .flat_map(|prefix| {
                levels.iter().map(move |level| {
                    let mut key = prefix.clone();
                    key.push(level.clone());
                    key
                })
            })
            .collect();
    }

    combos
        .into_iter()
        .map(|keys| {
            let (sum, count) = sums.get(&keys).copied().unwrap_or((0.0, 0));
            AggregateRow {
                mean_charges: (count > 0).then(|| sum / count as f64),
                keys,
                count,
            }
        })
        .collect()
}

/// Headline numbers for the overview page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Kpis {
    pub average_charge: f64,
    pub core_age_bracket: AgeBracket,
    pub core_bmi_bracket: BmiBracket,
    pub average_children: f64,
}

/// `None` for an empty record set.
pub fn kpis(records: &[InsuranceRecord]) -> Option<Kpis> {
    if records.is_empty() {
        return None;
    }
    let n = records.len() as f64;
    let average_charge = records.iter().map(|r| r.charges).sum::<f64>() / n;
    let average_children = records.iter().map(|r| r.children as f64).sum::<f64>() / n;

    Some(Kpis {
        average_charge,
        core_age_bracket: mode(records, &AgeBracket::ALL, |r| r.age_bracket)?,
        core_bmi_bracket: mode(records, &BmiBracket::ALL, |r| r.bmi_bracket)?,
        average_children,
    })
}

/// Most frequent category; ties go to the earliest in `categories`.
fn mode<T, F>(records: &[InsuranceRecord], categories: &[T], key: F) -> Option<T>
where
    T: Copy + PartialEq,
    F: Fn(&InsuranceRecord) -> T,
{
    let mut best: Option<(T, usize)> = None;
    for &category in categories {
        let count = records.iter().filter(|r| key(*r) == category).count();
        if count > 0 && best.map_or(true, |(_, c)| count > c) {
            best = Some((category, count));
        }
    }
    best.map(|(category, _)| category)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(age: AgeBracket, bmi: BmiBracket, sex: &str, smoker: &str, children: i64, charges: f64) -> InsuranceRecord {
        InsuranceRecord {
            age: None,
            bmi: None,
            age_bracket: age,
            bmi_bracket: bmi,
            sex: sex.to_string(),
            children,
            smoker: smoker.to_string(),
            region: "northeast".to_string(),
            charges,
        }
    }

    fn sample() -> Vec<InsuranceRecord> {
        vec![
            record(AgeBracket::UpTo18, BmiBracket::Normal, "Male", "Yes", 0, 100.0),
            record(AgeBracket::UpTo18, BmiBracket::Normal, "Female", "No", 2, 300.0),
            record(AgeBracket::From41To45, BmiBracket::ObeseI, "Male", "No", 1, 500.0),
        ]
    }

    #[test]
    fn single_bracket_grouping_lists_every_bracket() {
        let rows = mean_charges_by(&sample(), Grouping::One(GroupColumn::AgeBracket));
        assert_eq!(rows.len(), AgeBracket::ALL.len());
        assert_eq!(rows[0].keys, vec![GroupValue::Age(AgeBracket::UpTo18)]);
        assert_eq!(rows[0].mean_charges, Some(200.0));
        assert_eq!(rows[0].count, 2);
        assert_eq!(rows[1].mean_charges, None);
        assert_eq!(rows[1].count, 0);
        assert_eq!(rows[5].mean_charges, Some(500.0));
    }

    #[test]
    fn pair_grouping_is_the_full_cartesian_product() {
        let rows = mean_charges_by(
            &sample(),
            Grouping::Two(GroupColumn::BmiBracket, GroupColumn::Sex),
        );
        assert_eq!(rows.len(), BmiBracket::ALL.len() * 2);

        // Female sorts before Male within each bracket.
        assert_eq!(
            rows[0].keys,
            vec![GroupValue::Bmi(BmiBracket::Underweight), GroupValue::Text("Female".into())]
        );
        assert_eq!(rows[0].mean_charges, None);
        assert_eq!(rows[2].mean_charges, Some(300.0));
        assert_eq!(rows[3].mean_charges, Some(100.0));
        assert_eq!(rows[7].mean_charges, Some(500.0));
        assert_eq!(rows.iter().filter(|r| r.mean_charges.is_some()).count(), 3);
    }

    #[test]
    fn children_levels_sort_numerically() {
        let mut records = sample();
        records.push(record(AgeBracket::UpTo18, BmiBracket::Normal, "Male", "No", 10, 50.0));
        let levels = GroupColumn::Children.levels(&records);
        assert_eq!(
            levels,
            vec![
                GroupValue::Count(0),
                GroupValue::Count(1),
                GroupValue::Count(2),
                GroupValue::Count(10)
            ]
        );
    }

    #[test]
    fn non_bracket_single_grouping_uses_observed_values() {
        let rows = mean_charges_by(&sample(), Grouping::One(GroupColumn::Smoker));
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].keys, vec![GroupValue::Text("No".into())]);
        assert_eq!(rows[0].mean_charges, Some(400.0));
        assert_eq!(rows[1].mean_charges, Some(100.0));
    }

    #[test]
    fn empty_records_still_list_bracket_categories() {
        let rows = mean_charges_by(&[], Grouping::Two(GroupColumn::AgeBracket, GroupColumn::Region));
        assert!(rows.is_empty());
        let rows = mean_charges_by(&[], Grouping::One(GroupColumn::BmiBracket));
        assert_eq!(rows.len(), 6);
        assert!(rows.iter().all(|r| r.mean_charges.is_none()));
    }

    #[test]
    fn kpis_use_means_and_modes() {
        let kpis = kpis(&sample()).unwrap();
        assert_eq!(kpis.average_charge, 300.0);
        assert_eq!(kpis.core_age_bracket, AgeBracket::UpTo18);
        assert_eq!(kpis.core_bmi_bracket, BmiBracket::Normal);
        assert_eq!(kpis.average_children, 1.0);
    }

    #[test]
    fn mode_ties_go_to_the_earliest_bracket() {
        let records = vec![
            record(AgeBracket::From61To65, BmiBracket::ObeseIII, "Male", "No", 0, 1.0),
            record(AgeBracket::From19To25, BmiBracket::Overweight, "Male", "No", 0, 1.0),
        ];
        let kpis = kpis(&records).unwrap();
        assert_eq!(kpis.core_age_bracket, AgeBracket::From19To25);
        assert_eq!(kpis.core_bmi_bracket, BmiBracket::Overweight);
        assert!(super::kpis(&[]).is_none());
    }
}
