use csv::ReaderBuilder;
use diagnosis::{
    error::{DataError, TrainingError},
    features::{records_to_samples, Sample, FEATURE_COUNT},
    network::UpdateRule,
    parse::{parse_reader, COLUMNS},
    training::{evaluate, train, BackwardPasses, TrainingConfig},
};

const TWO_FEATURE_TABLE: &str = "\
x1,x2,label
0.5,1.0,1
1.0,0.5,1
0.8,0.2,1
";

fn read_two_feature_table() -> Vec<Sample> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_reader(TWO_FEATURE_TABLE.as_bytes());

    reader
        .records()
        .map(|record| {
            let values: Vec<f64> = record
                .unwrap()
                .iter()
                .map(|value| value.parse().unwrap())
                .collect();
            Sample {
                features: values[..2].to_vec(),
                target: values[2],
            }
        })
        .collect()
}

fn patient_table(rows: &[String]) -> String {
    let mut table = COLUMNS.join(",");
    for row in rows {
        table.push('\n');
        table.push_str(row);
    }
    table
}

fn patient_row(id: u16, age: u8, mmse: f64, diagnosis: u8) -> String {
    format!(
        "{id},{age},1,0,1,27.5,0,4.1,6.2,5.5,7.0,1,0,0,0,0,1,130,80,\
         210.0,120.5,55.2,150.3,{mmse},5.5,1,0,6.1,0,1,0,0,1,{diagnosis},XXXConfid"
    )
}

#[test]
fn one_epoch_beats_untrained_network() {
    let samples = read_two_feature_table();
    assert_eq!(samples.len(), 3);

    for update_rule in [UpdateRule::Literal, UpdateRule::Corrected] {
        let config = TrainingConfig::new()
            .epochs(1)
            .seed(17)
            .update_rule(update_rule)
            .verbose(false);
        let mut network = config.build_network(2).unwrap();

        let untrained = evaluate(&mut network.clone(), &samples).unwrap();
        let report = train(&mut network, &samples, &config).unwrap();

        assert_eq!(report.epoch_losses.len(), 1);
        assert!(
            report.epoch_losses[0] < untrained,
            "{update_rule:?}: {} >= {untrained}",
            report.epoch_losses[0]
        );
    }
}

#[test]
fn trained_network_scores_better_than_fresh_one() {
    let samples = read_two_feature_table();
    let config = TrainingConfig::new().epochs(5).seed(23).verbose(false);

    let mut fresh = config.build_network(2).unwrap();
    let mut trained = fresh.clone();
    train(&mut trained, &samples, &config).unwrap();

    assert!(evaluate(&mut trained, &samples).unwrap() < evaluate(&mut fresh, &samples).unwrap());
}

#[test]
fn patient_table_trains_end_to_end() {
    let rows = vec![
        patient_row(4751, 73, 21.4, 0),
        patient_row(4752, 89, 20.1, 0),
        patient_row(4753, 73, 7.3, 1),
    ];
    let records = parse_reader(patient_table(&rows).as_bytes()).unwrap();
    let samples = records_to_samples(&records);

    assert_eq!(samples.len(), 3);
    assert!(samples.iter().all(|s| s.features.len() == FEATURE_COUNT));

    let config = TrainingConfig::new()
        .epochs(3)
        .seed(99)
        .update_rule(UpdateRule::Corrected)
        .passes(BackwardPasses::Single)
        .verbose(false);
    let mut network = config.build_network(FEATURE_COUNT).unwrap();

    let report = train(&mut network, &samples, &config).unwrap();

    assert_eq!(report.epoch_losses.len(), 3);
    assert!(report
        .epoch_losses
        .iter()
        .all(|loss| loss.is_finite() && (0.0..=1.0).contains(loss)));
}

#[test]
fn malformed_row_aborts_the_load() {
    let good = patient_row(4751, 73, 21.4, 0);
    let short = good.rsplit_once(',').unwrap().0.to_owned();
    let long = format!("{good},extra");

    for bad in [short, long] {
        let result = parse_reader(patient_table(&[good.clone(), bad]).as_bytes());
        assert!(matches!(result, Err(DataError::FieldCount { line: 3, .. })));
    }
}

#[test]
fn empty_table_cannot_be_trained() {
    let records = parse_reader(patient_table(&[]).as_bytes()).unwrap();
    let samples = records_to_samples(&records);
    let config = TrainingConfig::new().seed(1);
    let mut network = config.build_network(FEATURE_COUNT).unwrap();

    assert_eq!(
        train(&mut network, &samples, &config),
        Err(TrainingError::EmptyDataset)
    );
}
