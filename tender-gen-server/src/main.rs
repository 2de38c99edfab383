use std::sync::Mutex;

use actix_cors::Cors;
use actix_web::{get, put, web, App, HttpResponse, HttpServer, Responder};

use log::{info, warn};
use serde::Deserialize;
use tender_gen_core::io;
use tender_gen_core::model::sequence_model::SequenceModel;
use tender_gen_core::notice::ProcessedNotice;

/// Token bound applied when the query does not provide one.
const DEFAULT_MAX_LENGTH: usize = 30;

/// Struct representing query parameters for the `/v1/generate` endpoint
#[derive(Deserialize)]
struct GenerateParams {
	max_length: Option<usize>,
	count: Option<usize>,
}

struct SharedData {
	model: SequenceModel,
	corpus_size: usize,
}

/// Loads the processed corpus and trains a fresh model on it.
fn train_from_corpus() -> Result<SharedData, Box<dyn std::error::Error>> {
	let records: Vec<ProcessedNotice> = io::load_records(io::processed_data_path())?;
	let texts: Vec<String> = records
		.into_iter()
		.map(|record| record.cleaned_text)
		.collect();
	let corpus_size = texts.len();
	let model = SequenceModel::from_corpus(texts)?;
	Ok(SharedData { model, corpus_size })
}

/// HTTP GET endpoint `/v1/generate`
///
/// Generates one or more descriptions from the trained model, one per line.
#[get("/v1/generate")]
async fn get_generated(data: web::Data<Mutex<SharedData>>, query: web::Query<GenerateParams>) -> impl Responder {
	let max_length = query.max_length.unwrap_or(DEFAULT_MAX_LENGTH);
	let count = query.count.unwrap_or(1);

	if max_length == 0 || count == 0 {
		return HttpResponse::BadRequest().body("max_length and count must be positive");
	}

	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	if !shared_data.model.is_trained() {
		return HttpResponse::InternalServerError().body("Model is not trained");
	}

	let descriptions: Vec<String> = (0..count)
		.map(|_| shared_data.model.generate(max_length))
		.collect();

	HttpResponse::Ok().body(descriptions.join("\n"))
}

/// HTTP GET endpoint `/v1/stats`
///
/// Reports the size of the loaded corpus and model.
#[get("/v1/stats")]
async fn get_stats(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	HttpResponse::Ok().body(format!(
		"corpus: {} texts\ntokens: {}\nstart tokens: {}",
		shared_data.corpus_size,
		shared_data.model.token_count(),
		shared_data.model.start_token_count()
	))
}

/// HTTP PUT endpoint `/v1/reload`
///
/// Rereads the processed corpus file and retrains the model in place.
#[put("/v1/reload")]
async fn put_reload(data: web::Data<Mutex<SharedData>>) -> impl Responder {
	let retrained = match train_from_corpus() {
		Ok(d) => d,
		Err(e) => return HttpResponse::InternalServerError().body(format!("Failed to reload corpus: {e}")),
	};

	let mut shared_data = match data.lock() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	*shared_data = retrained;

	HttpResponse::Ok().body("Model retrained successfully")
}

/// Main entry point for the server.
///
/// Trains the sequence model from the processed corpus, wraps it in a
/// `Mutex` for thread safety, and starts an Actix-web HTTP server.
///
/// # Notes
/// - The server binds to 127.0.0.1:5000.
/// - A missing corpus file is not fatal; the server starts untrained and
///   can be fed later via `/v1/reload`.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::init();

	let shared_data = match train_from_corpus() {
		Ok(data) => data,
		Err(e) => {
			warn!("Starting with an untrained model: {e}");
			SharedData {
				model: SequenceModel::new(),
				corpus_size: 0,
			}
		}
	};
	info!("Serving model trained on {} texts", shared_data.corpus_size);

	let shared_model = web::Data::new(Mutex::new(shared_data));

	HttpServer::new(move || {
		App::new()
			.wrap(Cors::permissive())
			.app_data(shared_model.clone())
			.service(get_generated)
			.service(get_stats)
			.service(put_reload)
	})
		.bind(("127.0.0.1", 5000))?
		.run()
		.await
}
