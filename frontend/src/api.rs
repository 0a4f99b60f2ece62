use std::fmt;

use gloo_net::http::{Request, Response};
use serde::de::{DeserializeOwned, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use web_sys::{File, FormData};

use crate::config::AppConfig;
use crate::error::ApiError;

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct StatsSummary {
    #[serde(default)]
    pub total_transactions: u64,
    #[serde(default)]
    pub total_amount: f64,
    #[serde(default)]
    pub total_fees: f64,
    #[serde(default, deserialize_with = "ordered_categories")]
    pub categories: Vec<CategoryBreakdown>,
}

impl StatsSummary {
    pub fn average_amount(&self) -> f64 {
        if self.total_transactions > 0 {
            self.total_amount / self.total_transactions as f64
        } else {
            0.0
        }
    }
}

/// One entry of the `/api/stats` category map, kept in backend key order.
#[derive(Clone, Debug, PartialEq)]
pub struct CategoryBreakdown {
    pub key: String,
    pub count: u64,
    pub amount: f64,
}

#[derive(Deserialize)]
struct CategoryTotals {
    #[serde(default)]
    count: u64,
    #[serde(default)]
    amount: f64,
}

fn ordered_categories<'de, D>(deserializer: D) -> Result<Vec<CategoryBreakdown>, D::Error>
where
    D: Deserializer<'de>,
{
    struct InOrder;

    impl<'de> Visitor<'de> for InOrder {
        type Value = Vec<CategoryBreakdown>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a map of category totals")
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(Vec::new())
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut out = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((key, totals)) = map.next_entry::<String, CategoryTotals>()? {
                out.push(CategoryBreakdown {
                    key,
                    count: totals.count,
                    amount: totals.amount,
                });
            }
            Ok(out)
        }
    }

    deserializer.deserialize_any(InOrder)
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct CategoryCount {
    pub category: String,
    #[serde(default)]
    pub count: u64,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct MonthlyStat {
    pub year: i32,
    pub month: u32,
    #[serde(default)]
    pub total_amount: f64,
    #[serde(default)]
    pub count: u64,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Transaction {
    pub date: Option<String>,
    pub category: Option<String>,
    pub recipient_name: Option<String>,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub amount: f64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub fee: f64,
    pub balance: Option<f64>,
}

/// Nullable numeric columns come through as `null`; they render as zero.
fn null_as_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or_default())
}

fn first_page() -> u32 {
    1
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct TransactionPage {
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default = "first_page")]
    pub current_page: u32,
    #[serde(default)]
    pub pages: u32,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct DetectedFile {
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub modified: String,
}

#[derive(Deserialize)]
struct DetectedFiles {
    #[serde(default)]
    files: Vec<DetectedFile>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ProcessOutcome {
    #[serde(default)]
    pub processed: u64,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct UploadRecord {
    pub id: u64,
    pub filename: String,
    #[serde(default)]
    pub total_messages: u64,
    #[serde(default)]
    pub processed_messages: u64,
    #[serde(default)]
    pub upload_date: String,
    #[serde(default)]
    pub status: String,
}

#[derive(Serialize)]
struct ProcessDetectedRequest<'a> {
    file_path: &'a str,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Turns a finished response into either the decoded body or an
/// [`ApiError::Rejected`] carrying the backend's `error` field.
pub fn interpret<T: DeserializeOwned>(ok: bool, status: u16, body: &str) -> Result<T, ApiError> {
    if ok {
        serde_json::from_str(body).map_err(|err| ApiError::Decode(err.to_string()))
    } else {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|body| body.error);
        Err(ApiError::Rejected { status, message })
    }
}

async fn read<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let ok = response.ok();
    let status = response.status();
    let body = response.text().await?;
    interpret(ok, status, &body)
}

#[derive(Clone, Debug, PartialEq)]
pub struct ApiClient {
    base: String,
}

impl ApiClient {
    pub fn new(config: &AppConfig) -> Self {
        ApiClient {
            base: config.api_url(""),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = Request::get(&self.url(path)).send().await?;
        read(response).await
    }

    pub async fn stats(&self) -> Result<StatsSummary, ApiError> {
        self.get("/api/stats").await
    }

    pub async fn category_distribution(&self) -> Result<Vec<CategoryCount>, ApiError> {
        self.get("/api/category-distribution").await
    }

    pub async fn monthly_stats(&self) -> Result<Vec<MonthlyStat>, ApiError> {
        self.get("/api/monthly-stats").await
    }

    pub async fn transactions(&self, page: u32, per_page: u32) -> Result<TransactionPage, ApiError> {
        let page = page.to_string();
        let per_page = per_page.to_string();
        let response = Request::get(&self.url("/api/transactions"))
            .query([("page", page.as_str()), ("per_page", per_page.as_str())])
            .send()
            .await?;
        read(response).await
    }

    pub async fn detect_files(&self) -> Result<Vec<DetectedFile>, ApiError> {
        let listing: DetectedFiles = self.get("/api/detect-files").await?;
        Ok(listing.files)
    }

    pub async fn upload_history(&self) -> Result<Vec<UploadRecord>, ApiError> {
        self.get("/api/upload-history").await
    }

    pub async fn upload(&self, file: &File) -> Result<ProcessOutcome, ApiError> {
        let form = FormData::new().map_err(ApiError::browser)?;
        form.append_with_blob_and_filename("file", file, &file.name())
            .map_err(ApiError::browser)?;

        let response = Request::post(&self.url("/api/upload"))
            .body(form)?
            .send()
            .await?;
        read(response).await
    }

    pub async fn process_detected_file(&self, file_path: &str) -> Result<ProcessOutcome, ApiError> {
        let response = Request::post(&self.url("/api/process-detected-file"))
            .json(&ProcessDetectedRequest { file_path })?
            .send()
            .await?;
        read(response).await
    }

    pub async fn clear_data(&self) -> Result<(), ApiError> {
        let response = Request::post(&self.url("/api/clear-data")).send().await?;
        read::<serde_json::Value>(response).await.map(|_| ())
    }

    pub fn export_url(&self) -> String {
        self.url("/api/export-csv")
    }
}
