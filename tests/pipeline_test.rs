use insurance_insights::{
    dashboard, mean_charges_by, AgeBracket, Dataset, GroupColumn, GroupValue, Grouping,
};
use std::path::Path;

const SAMPLE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/insurance_sample.csv");

async fn sample() -> Dataset {
    Dataset::load(Path::new(SAMPLE)).await.expect("sample dataset loads")
}

#[tokio::test]
async fn dirty_rows_are_dropped_and_counted() {
    let dataset = sample().await;
    let report = dataset.report();
    assert_eq!(report.total_rows, 24);
    assert_eq!(report.kept, 21);
    assert_eq!(report.dropped(), 3);
    assert_eq!(report.rejected.len(), 3);
}

#[tokio::test]
async fn categorical_values_are_normalized() {
    let dataset = sample().await;
    assert!(dataset.records().iter().all(|r| r.smoker == "Yes" || r.smoker == "No"));
    assert!(dataset.records().iter().any(|r| r.sex == "M"));
    assert!(dataset.records().iter().all(|r| r.sex != "male"));

    let blank = dataset.records().iter().find(|r| r.sex.is_empty()).unwrap();
    assert_eq!(blank.region, "");
    assert_eq!(blank.smoker, "No");
    assert_eq!(blank.age_bracket, AgeBracket::From41To45);
}

#[tokio::test]
async fn smoker_means_match_hand_computation() {
    let dataset = sample().await;
    let rows = mean_charges_by(dataset.records(), Grouping::One(GroupColumn::Smoker));
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].keys, vec![GroupValue::Text("Yes".into())]);
    assert_eq!(rows[1].count, 4);
    let expected = (16884.924 + 27808.7251 + 39611.7577 + 36837.467) / 4.0;
    assert!((rows[1].mean_charges.unwrap() - expected).abs() < 1e-6);
}

#[tokio::test]
async fn age_by_sex_lists_every_pairing() {
    let dataset = sample().await;
    let rows = mean_charges_by(
        dataset.records(),
        Grouping::Two(GroupColumn::AgeBracket, GroupColumn::Sex),
    );
    // Blank, Female, M, Male for each of the ten age brackets.
    assert_eq!(rows.len(), 40);
    assert_eq!(
        rows[0].keys,
        vec![GroupValue::Age(AgeBracket::UpTo18), GroupValue::Text(String::new())]
    );
    assert_eq!(rows[0].mean_charges, None);
    assert_eq!(rows[3].mean_charges, Some(1725.5523));
    assert_eq!(rows[20].keys[1], GroupValue::Text(String::new()));
    assert_eq!(rows[20].mean_charges, Some(7000.0));
    assert!(rows.iter().any(|r| r.count == 0 && r.mean_charges.is_none()));
}

#[tokio::test]
async fn overview_kpis_from_file() {
    let dataset = sample().await;
    let page = dashboard::overview(&dataset);
    let kpis = page.kpis.expect("non-empty dataset has kpis");
    assert!(kpis.average_charge.starts_with('$'));
    assert_eq!(kpis.average_dependants, "1");
    assert_eq!(page.charts.len(), 3);
}
