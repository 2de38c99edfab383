use log::info;

use tender_gen_core::io;
use tender_gen_core::model::sequence_model::SequenceModel;
use tender_gen_core::notice::ProcessedNotice;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Load the processed corpus produced by tender-gen-process
    let records: Vec<ProcessedNotice> = io::load_records(io::processed_data_path())?;
    let texts: Vec<String> = records
        .into_iter()
        .map(|record| record.cleaned_text)
        .collect();

    info!("Training sequence model on {} texts...", texts.len());
    let model = SequenceModel::from_corpus(texts)?;
    info!(
        "Model holds {} distinct tokens, {} distinct start tokens",
        model.token_count(),
        model.start_token_count()
    );

    println!("--- Generated Tender Descriptions ---");
    for i in 0..10 {
        println!("{}. {}", i + 1, model.generate(30));
    }

    Ok(())
}
