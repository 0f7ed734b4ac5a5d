//! OSV 조회 클라이언트
//!
//! 의존성 목록을 배치로 나누어 OSV `v1/query`에 조회합니다.
//! 배치 내 조회는 동시에 실행되고, 배치 사이에는 대기 시간을 두어
//! API 과부하를 피합니다. 조회 실패는 재시도 후에도 실패하면
//! 빈 결과로 강등되어 스캔 전체를 중단시키지 않습니다.

use std::time::Duration;

use tokio::task::JoinSet;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::config::DepScannerConfig;
use crate::error::DepScannerError;
use crate::osv::schema::{OsvAdvisory, OsvQuery, OsvQueryResponse};
use crate::types::Dependency;

/// 어드바이저리 조회 제공자 trait
///
/// 스캐너는 이 trait을 통해 취약점 데이터를 얻습니다.
/// 운영에서는 [`OsvClient`]를 사용하고, 테스트에서는 인메모리 구현을
/// 주입할 수 있습니다.
pub trait AdvisoryProvider: Send + Sync {
    /// 의존성 목록에 대한 어드바이저리를 조회합니다.
    ///
    /// 조회에 실패한 의존성은 빈 어드바이저리 목록으로 반환됩니다.
    fn fetch_advisories(
        &self,
        deps: Vec<Dependency>,
    ) -> impl Future<Output = Vec<(Dependency, Vec<OsvAdvisory>)>> + Send;
}

/// OSV API 클라이언트
///
/// `Clone`은 저렴합니다. 내부 `reqwest::Client`가 연결 풀을 공유합니다.
#[derive(Debug, Clone)]
pub struct OsvClient {
    http: reqwest::Client,
    url: String,
    batch_size: usize,
    max_retries: u32,
    batch_delay: Duration,
}

impl OsvClient {
    /// 설정으로부터 클라이언트를 생성합니다.
    pub fn new(config: &DepScannerConfig) -> Result<Self, DepScannerError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| DepScannerError::Query(format!("http client init failed: {e}")))?;

        Ok(Self {
            http,
            url: config.osv_url.clone(),
            batch_size: config.batch_size,
            max_retries: config.max_retries,
            batch_delay: Duration::from_millis(config.batch_delay_ms),
        })
    }

    /// 단일 의존성을 재시도와 함께 조회합니다.
    ///
    /// 모든 시도가 실패하면 경고를 남기고 빈 목록을 반환합니다.
    async fn query_with_retry(&self, dep: &Dependency) -> Vec<OsvAdvisory> {
        let version = dep.normalized_version();
        if version.is_empty() {
            debug!(package = %dep.name, "skipping query for unversioned dependency");
            return Vec::new();
        }

        let query = OsvQuery::new(&dep.name, dep.ecosystem.osv_name(), &version);
        let mut last_error = String::new();

        for attempt in 1..=self.max_retries {
            match self.query_once(&query).await {
                Ok(response) => {
                    debug!(
                        package = %dep.name,
                        version = %version,
                        vulns = response.vulns.len(),
                        "osv query succeeded"
                    );
                    return response.vulns;
                }
                Err(e) => {
                    last_error = e;
                    if attempt < self.max_retries {
                        let delay = backoff_delay(attempt);
                        debug!(
                            package = %dep.name,
                            attempt,
                            delay_secs = delay.as_secs(),
                            error = %last_error,
                            "osv query failed, retrying"
                        );
                        sleep(delay).await;
                    }
                }
            }
        }

        warn!(
            package = %dep.name,
            version = %version,
            retries = self.max_retries,
            error = %last_error,
            "osv query exhausted retries, treating as no data"
        );
        Vec::new()
    }

    /// 단일 HTTP 조회를 수행합니다.
    async fn query_once(&self, query: &OsvQuery) -> Result<OsvQueryResponse, String> {
        let response = self
            .http
            .post(&self.url)
            .json(query)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("http status {status}"));
        }

        response.json().await.map_err(|e| e.to_string())
    }
}

impl AdvisoryProvider for OsvClient {
    async fn fetch_advisories(
        &self,
        deps: Vec<Dependency>,
    ) -> Vec<(Dependency, Vec<OsvAdvisory>)> {
        let mut results = Vec::with_capacity(deps.len());
        let batch_count = deps.len().div_ceil(self.batch_size.max(1));

        for (batch_idx, batch) in deps.chunks(self.batch_size.max(1)).enumerate() {
            debug!(
                batch = batch_idx + 1,
                total_batches = batch_count,
                size = batch.len(),
                "querying osv batch"
            );

            let mut set = JoinSet::new();
            for dep in batch {
                let client = self.clone();
                let dep = dep.clone();
                set.spawn(async move {
                    let advisories = client.query_with_retry(&dep).await;
                    (dep, advisories)
                });
            }

            while let Some(joined) = set.join_next().await {
                match joined {
                    Ok(entry) => results.push(entry),
                    Err(e) => warn!(error = %e, "osv query task failed"),
                }
            }

            if batch_idx + 1 < batch_count {
                sleep(self.batch_delay).await;
            }
        }

        results
    }
}

/// 재시도 전 대기 시간을 계산합니다.
///
/// 시도 횟수에 비례해 증가합니다 (1초, 2초, ...).
fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_secs(u64::from(attempt))
}
