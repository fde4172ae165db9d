use anyhow::Context;
use diagnosis::{
    features::{records_to_samples, FEATURE_COUNT},
    parse, report,
    training::{accuracy, evaluate, train, BackwardPasses, TrainingConfig},
};
use log::info;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    const DATA_FILEPATH: &str = "data/alzheimers_disease_data.csv";

    let data_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DATA_FILEPATH.to_owned());

    let records =
        parse::parse(&data_path).with_context(|| format!("failed to load {data_path}"))?;
    if let Some(first) = records.first() {
        log::debug!("first record:\n{first}");
    }

    const LEARNING_RATE: f64 = 0.1;
    const EPOCHS: usize = 10;
    const NORMALIZE: bool = false;

    let config = TrainingConfig::new()
        .epochs(EPOCHS)
        .learning_rate(LEARNING_RATE)
        .hidden_size(FEATURE_COUNT)
        .passes(BackwardPasses::Double)
        .normalize(NORMALIZE);

    let samples = config.prepare_samples(records_to_samples(&records));
    info!("loaded {} samples", samples.len());

    let mut network = config.build_network(FEATURE_COUNT)?;

    let baseline = evaluate(&mut network, &samples)?;
    info!("untrained mean loss: {baseline:.6}");

    let training_report = train(&mut network, &samples, &config)?;

    let train_accuracy = accuracy(&mut network, &samples)? * 100.0;
    info!("training accuracy: {train_accuracy:.3}%");

    const LOSS_CSV_FILEPATH: &str = "loss_history.csv";
    const LOSS_PLOT_FILEPATH: &str = "loss_history.svg";

    report::save_loss_csv(LOSS_CSV_FILEPATH, &training_report.epoch_losses)?;
    report::plot_loss_curve(LOSS_PLOT_FILEPATH, &training_report.epoch_losses)?;
    info!("wrote {LOSS_CSV_FILEPATH} and {LOSS_PLOT_FILEPATH}");

    Ok(())
}
