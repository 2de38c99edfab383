use std::collections::HashMap;

use log::{info, warn};

use tender_gen_core::io;
use tender_gen_core::notice::{NoticeStats, ProcessedNotice, RawNotice};

/// Lowercases the text and strips ASCII punctuation.
///
/// Polish diacritics are left untouched; they are part of the vocabulary.
fn clean_text(text: &str) -> String {
    text.to_lowercase()
        .chars()
        .filter(|c| !c.is_ascii_punctuation())
        .collect()
}

/// Turns a raw notice into a processed record.
///
/// Returns `None` when the notice carries no description text; such
/// records are dropped from the corpus.
fn process_notice(notice: &RawNotice) -> Option<ProcessedNotice> {
    let raw_text = notice.order_object.as_deref()?.trim();
    if raw_text.is_empty() {
        return None;
    }

    let cleaned_text = clean_text(raw_text);
    let tokens: Vec<String> = cleaned_text
        .split_whitespace()
        .map(str::to_owned)
        .collect();
    let word_count = tokens.len();

    Some(ProcessedNotice {
        original_text: raw_text.to_owned(),
        cleaned_text,
        tokens,
        label: notice
            .order_type
            .clone()
            .unwrap_or_else(|| "Unknown".to_owned()),
        stats: NoticeStats { word_count },
    })
}

/// Prints how many records each procurement-type label received.
fn print_label_distribution(records: &[ProcessedNotice]) {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for record in records {
        *counts.entry(record.label.as_str()).or_insert(0) += 1;
    }

    let mut counts: Vec<(&str, usize)> = counts.into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));

    println!("--- Label Distribution ---");
    for (label, count) in counts {
        println!("{label}: {count}");
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let raw: Vec<RawNotice> = io::load_records(io::raw_data_path())?;
    info!("Processing {} records...", raw.len());

    let processed: Vec<ProcessedNotice> = raw.iter().filter_map(process_notice).collect();
    if processed.len() < raw.len() {
        warn!(
            "Skipped {} records without description text",
            raw.len() - processed.len()
        );
    }

    io::save_records(io::processed_data_path(), &processed)?;
    info!(
        "Processed data saved to {}",
        io::processed_data_path().display()
    );

    print_label_distribution(&processed);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_notice(order_type: Option<&str>, order_object: Option<&str>) -> RawNotice {
        RawNotice {
            id: Some("n-1".to_owned()),
            order_type: order_type.map(str::to_owned),
            order_object: order_object.map(str::to_owned),
            title: None,
        }
    }

    #[test]
    fn clean_text_lowercases_and_strips_punctuation() {
        assert_eq!(
            clean_text("Dostawa sprzętu, nr 12/2024!"),
            "dostawa sprzętu nr 122024"
        );
    }

    #[test]
    fn clean_text_keeps_polish_diacritics() {
        assert_eq!(clean_text("Usługi prawne"), "usługi prawne");
    }

    #[test]
    fn process_notice_tokenizes_and_counts_words() {
        let notice = raw_notice(Some("Dostawy"), Some("Dostawa mebli biurowych."));
        let processed = process_notice(&notice).unwrap();

        assert_eq!(processed.cleaned_text, "dostawa mebli biurowych");
        assert_eq!(processed.tokens, ["dostawa", "mebli", "biurowych"]);
        assert_eq!(processed.stats.word_count, 3);
        assert_eq!(processed.label, "Dostawy");
    }

    #[test]
    fn process_notice_defaults_missing_label_to_unknown() {
        let notice = raw_notice(None, Some("Remont drogi gminnej"));
        assert_eq!(process_notice(&notice).unwrap().label, "Unknown");
    }

    #[test]
    fn process_notice_drops_records_without_description() {
        assert!(process_notice(&raw_notice(Some("Dostawy"), None)).is_none());
        assert!(process_notice(&raw_notice(Some("Dostawy"), Some("   "))).is_none());
    }
}
