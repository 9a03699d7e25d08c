//! Batch geocoding of the address CSV.
//!
//! Workflow:
//! 1. Read the whole input file, then parse it (header row gives field names)
//! 2. Validate every row, rejecting the batch with all row errors if any fail
//! 3. Geocode rows one at a time, pausing between provider calls
//! 4. Write the augmented CSV and return the records
//!
//! A failed or empty lookup never aborts the batch; that row is kept without coordinates.
use crate::errors::{AppError, ResultExt};
use crate::geocode_client::{GeocodeRequest, Geocoder};
use crate::models::{AddressInput, AddressRecord, EnrichedRecord};
use crate::validation::validate_rows;
use csv::StringRecord;
use std::path::Path;
use std::time::Duration;

pub const OUTPUT_HEADERS: [&str; 6] = [
    "Alamat", "Daerah", "Negeri", "Latitud", "Longitud", "Rujukan",
];

const UTF8_BOM: char = '\u{feff}';

/// Per-batch outcome counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub geocoded: usize,
    pub unmatched: usize,
    pub failed: usize,
}

/// Settings for one batch run.
pub struct BatchPipeline<'a> {
    pub geocoder: &'a dyn Geocoder,
    pub api_key: &'a str,
    pub region: &'a str,
    /// Wait between consecutive provider calls.
    pub delay: Duration,
}

impl<'a> BatchPipeline<'a> {
    /// Run the full pipeline from `input` to `output`.
    pub async fn run(&self, input: &Path, output: &Path) -> Result<Vec<EnrichedRecord>, AppError> {
        let bytes = tokio::fs::read(input)
            .await
            .with_context(|| format!("Failed to read {}", input.display()))?;

        // The file is fully read and released before any row is validated
        let rows = parse_address_rows(&bytes)
            .with_context(|| format!("Failed to parse {}", input.display()))?;
        tracing::info!("CSV file successfully processed: {} row(s)", rows.len());

        let records = validate_rows(&rows).map_err(AppError::InvalidRecords)?;

        tracing::info!("Getting geocodes for the addresses...");
        let (enriched, summary) = self.geocode_records(records).await;
        tracing::info!(
            "Batch geocoding complete: {} total, {} geocoded, {} unmatched, {} failed",
            summary.total,
            summary.geocoded,
            summary.unmatched,
            summary.failed
        );

        write_geocoded_csv(output, &enriched).await?;
        tracing::info!("Geocoded CSV file successfully written: {}", output.display());

        Ok(enriched)
    }

    /// Geocode records strictly in order, one provider call at a time.
    pub async fn geocode_records(
        &self,
        records: Vec<AddressRecord>,
    ) -> (Vec<EnrichedRecord>, BatchSummary) {
        let total = records.len();
        let mut summary = BatchSummary {
            total,
            ..Default::default()
        };
        let mut enriched = Vec::with_capacity(total);

        for (idx, record) in records.into_iter().enumerate() {
            if idx > 0 && !self.delay.is_zero() {
                // Rate limiting - respect the provider's quota
                tokio::time::sleep(self.delay).await;
            }

            let address = record.full_address();
            tracing::info!("Processing [{}/{}]: {}", idx + 1, total, address);

            let request = GeocodeRequest {
                address: &address,
                region: self.region,
                api_key: self.api_key,
            };

            let result = match self.geocoder.geocode(&request).await {
                Ok(Some(result)) => {
                    tracing::info!(
                        "Geocode: {}, {}, {}, {}",
                        result.formatted_address,
                        result.latitude,
                        result.longitude,
                        result.map_url
                    );
                    summary.geocoded += 1;
                    Some(result)
                }
                Ok(None) => {
                    tracing::warn!("No results for: {}", address);
                    summary.unmatched += 1;
                    None
                }
                Err(e) => {
                    tracing::error!("Geocoding failed for {}: {}", address, e);
                    summary.failed += 1;
                    None
                }
            };

            enriched.push(EnrichedRecord::new(record, result));
        }

        (enriched, summary)
    }
}

/// Parse the batch input. Header names have a leading byte-order mark stripped.
///
/// Empty lines are skipped; rows with a different field count than the header are an error.
pub fn parse_address_rows(bytes: &[u8]) -> Result<Vec<AddressInput>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(bytes);

    let headers: StringRecord = reader
        .headers()?
        .iter()
        .map(|name| name.trim_start_matches(UTF8_BOM))
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row: AddressInput = record.deserialize(Some(&headers))?;
        rows.push(row);
    }

    Ok(rows)
}

/// Encode records with the fixed output header. Fields containing delimiters,
/// quotes or newlines are quoted; missing coordinates are written as empty fields.
pub fn encode_geocoded_csv(records: &[EnrichedRecord]) -> Result<Vec<u8>, AppError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(OUTPUT_HEADERS)
        .context("Failed to encode CSV header")?;

    for record in records {
        let latitude = record.latitude.map(|v| v.to_string()).unwrap_or_default();
        let longitude = record.longitude.map(|v| v.to_string()).unwrap_or_default();
        let map_url = record.map_url.as_deref().unwrap_or_default();

        writer
            .write_record([
                record.street.as_str(),
                record.district.as_str(),
                record.region.as_str(),
                latitude.as_str(),
                longitude.as_str(),
                map_url,
            ])
            .context("Failed to encode CSV record")?;
    }

    writer
        .into_inner()
        .map_err(|e| AppError::FileError(format!("Failed to flush CSV output: {}", e)))
}

/// Write the geocoded CSV, replacing any previous output.
pub async fn write_geocoded_csv(path: &Path, records: &[EnrichedRecord]) -> Result<(), AppError> {
    let bytes = encode_geocoded_csv(records)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    tokio::fs::write(path, bytes)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(())
}
