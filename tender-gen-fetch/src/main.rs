use std::thread;
use std::time::Duration;

use chrono::Utc;
use log::{error, info, warn};
use rand::Rng;
use reqwest::blocking::Client;
use serde::Deserialize;

use tender_gen_core::io;
use tender_gen_core::notice::RawNotice;

const API_URL: &str = "https://ezamowienia.gov.pl/mo-board/api/v1/notice";
const PAGE_SIZE: usize = 100;
const FETCH_LIMIT: usize = 500;
const PUBLICATION_WINDOW_DAYS: i64 = 90;

/// Synthetic notice templates, one description pool per procurement type.
const CATEGORIES: &[(&str, &[&str])] = &[
    (
        "Dostawy",
        &[
            "Dostawa sprzętu komputerowego dla urzędu.",
            "Zakup i dostawa mebli biurowych.",
            "Dostawa paliw płynnych do samochodów służbowych.",
            "Dostawa artykułów biurowych i papierniczych.",
            "Zakup licencji oprogramowania antywirusowego.",
        ],
    ),
    (
        "Usługi",
        &[
            "Świadczenie usług sprzątania pomieszczeń biurowych.",
            "Usługa ochrony mienia i osób.",
            "Opracowanie dokumentacji projektowej.",
            "Przeprowadzenie szkoleń z zakresu BHP.",
            "Usługi prawne i doradcze.",
        ],
    ),
    (
        "Roboty budowlane",
        &[
            "Budowa hali sportowej przy szkole podstawowej.",
            "Remont drogi gminnej nr 12345.",
            "Modernizacja oświetlenia ulicznego.",
            "Przebudowa budynku użyteczności publicznej.",
            "Wykonanie termomodernizacji budynku przedszkola.",
        ],
    ),
];

/// One page of the notice listing.
///
/// The portal has returned both a bare array and an array wrapped in an
/// envelope under various keys; all shapes are accepted.
#[derive(Deserialize)]
#[serde(untagged)]
enum NoticePage {
    List(Vec<RawNotice>),
    Items { items: Vec<RawNotice> },
    Data { data: Vec<RawNotice> },
    Notices { notices: Vec<RawNotice> },
    Paged { list: Vec<RawNotice> },
}

impl NoticePage {
    fn into_notices(self) -> Vec<RawNotice> {
        match self {
            NoticePage::List(notices)
            | NoticePage::Items { items: notices }
            | NoticePage::Data { data: notices }
            | NoticePage::Notices { notices }
            | NoticePage::Paged { list: notices } => notices,
        }
    }
}

/// Notice API context holding a reusable blocking HTTP client.
struct NoticeClient {
    client: Client,
}

impl NoticeClient {
    /// Creates a new client with a timeout.
    fn new() -> reqwest::Result<Self> {
        let client = Client::builder().timeout(Duration::new(10, 0)).build()?;
        Ok(Self { client })
    }

    /// Fetches one page of contract notices published inside the date window.
    fn get_page(
        &self,
        date_from: &str,
        date_to: &str,
        page_no: usize,
    ) -> Result<Vec<RawNotice>, Box<dyn std::error::Error>> {
        let page_size = PAGE_SIZE.to_string();
        let page_no = page_no.to_string();

        let response = self
            .client
            .get(API_URL)
            .query(&[
                ("NoticeType", "ContractNotice"),
                ("PublicationDateFrom", date_from),
                ("PublicationDateTo", date_to),
                ("pageSize", page_size.as_str()),
                ("pageNo", page_no.as_str()),
            ])
            .send()?
            .error_for_status()?;

        let page: NoticePage = serde_json::from_str(&response.text()?)?;
        Ok(page.into_notices())
    }
}

/// Downloads up to `limit` contract notices from the last three months.
///
/// Pages through the listing until the limit is reached, a page comes up
/// short, or a request fails. Failures end the crawl with whatever was
/// collected so far; there is no retry.
fn fetch_notices(limit: usize) -> Vec<RawNotice> {
    info!("Attempting to fetch {limit} records from API...");

    let client = match NoticeClient::new() {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to build HTTP client: {e}");
            return Vec::new();
        }
    };

    let date_to = Utc::now();
    let date_from = (date_to - chrono::Duration::days(PUBLICATION_WINDOW_DAYS))
        .format("%Y-%m-%d")
        .to_string();
    let date_to = date_to.format("%Y-%m-%d").to_string();

    let mut notices = Vec::new();
    let mut page_no = 1;

    while notices.len() < limit {
        let page = match client.get_page(&date_from, &date_to, page_no) {
            Ok(page) => page,
            Err(e) => {
                warn!("Fetch failed on page {page_no}: {e}");
                break;
            }
        };

        if page.is_empty() {
            break;
        }

        let page_len = page.len();
        notices.extend(page);
        info!("Fetched {} records so far...", notices.len());

        if page_len < PAGE_SIZE {
            break; // End of data
        }

        page_no += 1;
        thread::sleep(Duration::from_millis(500)); // Be nice to the API
    }

    notices.truncate(limit);
    notices
}

/// Generates synthetic notice records from the built-in templates.
///
/// Used as a fallback corpus when the API yields nothing, so the rest of
/// the pipeline always has data to work with.
fn generate_synthetic_notices(count: usize) -> Vec<RawNotice> {
    info!("Generating {count} synthetic records...");

    let mut rng = rand::rng();
    let mut notices = Vec::with_capacity(count);

    for i in 0..count {
        let (category, descriptions) = CATEGORIES[rng.random_range(0..CATEGORIES.len())];
        let base = descriptions[rng.random_range(0..descriptions.len())];
        let description = format!(
            "{base} Numer referencyjny: {i}/{}. Termin realizacji: {} miesięcy.",
            rng.random_range(2023..=2025),
            rng.random_range(1..=12),
        );

        notices.push(RawNotice {
            id: Some(format!("syn-{i}")),
            order_type: Some(category.to_owned()),
            order_object: Some(description),
            title: Some(format!("Przetarg na {} - {i}", category.to_lowercase())),
        });
    }

    notices
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut notices = fetch_notices(FETCH_LIMIT);

    if notices.is_empty() {
        warn!("API fetch failed or returned no data. Switching to synthetic data.");
        notices = generate_synthetic_notices(FETCH_LIMIT);
    } else {
        info!("Successfully fetched {} records from API.", notices.len());
    }

    io::save_records(io::raw_data_path(), &notices)?;
    info!("Data saved to {}", io::raw_data_path().display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notice_page_decodes_a_bare_array() {
        let body = r#"[{"id": "1", "orderType": "Dostawy", "orderObject": "Dostawa mebli"}]"#;
        let page: NoticePage = serde_json::from_str(body).unwrap();

        let notices = page.into_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].order_type.as_deref(), Some("Dostawy"));
    }

    #[test]
    fn notice_page_decodes_wrapped_arrays() {
        for key in ["items", "data", "notices", "list"] {
            let body = format!(r#"{{"{key}": [{{"id": "1"}}, {{"id": "2"}}]}}"#);
            let page: NoticePage = serde_json::from_str(&body).unwrap();
            assert_eq!(page.into_notices().len(), 2, "key {key}");
        }
    }

    #[test]
    fn notice_page_ignores_unknown_record_fields() {
        let body = r#"[{"id": "1", "noticeNumber": "2024/BZP 1", "bzpNumber": 7}]"#;
        let page: NoticePage = serde_json::from_str(body).unwrap();
        assert_eq!(page.into_notices().len(), 1);
    }

    #[test]
    fn synthetic_notices_carry_description_and_label() {
        let notices = generate_synthetic_notices(50);
        assert_eq!(notices.len(), 50);

        let labels: Vec<&str> = CATEGORIES.iter().map(|(label, _)| *label).collect();
        for notice in &notices {
            assert!(labels.contains(&notice.order_type.as_deref().unwrap()));
            assert!(!notice.order_object.as_deref().unwrap().is_empty());
        }
    }
}
