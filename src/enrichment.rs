//! Batch employee-count enrichment.
//!
//! An enrichment pass takes N leads and always returns N leads. Leads that
//! already carry a valid bucket are skipped. The rest get a bounded AI
//! lookup: one timeout per call, one deadline for the whole batch. Whatever
//! does not resolve in time falls back to the deterministic industry bucket.

use crate::catalog;
use crate::models::Lead;
use crate::openai::OpenAiService;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;
use tokio::task::JoinSet;
use tokio::time::Instant;

/// Marker of the last completed pass, forced strictly increasing so two
/// passes in the same millisecond stay distinguishable.
static LAST_PASS_MARKER: AtomicI64 = AtomicI64::new(0);

fn next_pass_marker() -> i64 {
    let now = chrono::Utc::now().timestamp_millis();
    LAST_PASS_MARKER
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |prev| {
            Some(now.max(prev + 1))
        })
        .map(|prev| now.max(prev + 1))
        .unwrap_or(now)
}

/// Whether a lead already carries a usable employee count: either a member
/// of the bucket vocabulary or a plain positive number from the raw record.
pub fn has_valid_count(lead: &Lead) -> bool {
    let value = lead.employee_count.trim();
    if catalog::is_valid_bucket(value) {
        return true;
    }
    value.parse::<u64>().map(|n| n > 0).unwrap_or(false)
}

/// Runs one enrichment pass. Always returns exactly the input leads, in the
/// input order, with employee counts and `last_updated` filled in.
pub async fn enrich_employee_counts(
    leads: Vec<Lead>,
    openai: &OpenAiService,
    call_timeout: Duration,
    batch_timeout: Duration,
) -> Vec<Lead> {
    let marker = next_pass_marker();
    let deadline = Instant::now() + batch_timeout;

    let mut resolved: Vec<Option<String>> = vec![None; leads.len()];
    let mut set: JoinSet<(usize, Option<String>)> = JoinSet::new();

    for (idx, lead) in leads.iter().enumerate() {
        if has_valid_count(lead) {
            resolved[idx] = Some(lead.employee_count.trim().to_string());
            continue;
        }
        let openai = openai.clone();
        let company = lead.company.clone();
        let industry = lead.industry.clone();
        set.spawn(async move {
            let outcome =
                tokio::time::timeout(call_timeout, openai.company_employee_count(&company, &industry))
                    .await;
            let bucket = match outcome {
                Ok(Ok(bucket)) => Some(bucket),
                Ok(Err(e)) => {
                    tracing::warn!(company = %company, error = %e, "employee count lookup failed");
                    None
                }
                Err(_) => {
                    tracing::warn!(company = %company, "employee count lookup timed out");
                    None
                }
            };
            (idx, bucket)
        });
    }

    while !set.is_empty() {
        match tokio::time::timeout_at(deadline, set.join_next()).await {
            Ok(Some(Ok((idx, bucket)))) => resolved[idx] = bucket,
            Ok(Some(Err(e))) => {
                tracing::warn!(error = %e, "enrichment task panicked");
            }
            Ok(None) => break,
            Err(_) => {
                tracing::warn!("enrichment batch deadline reached, applying fallbacks");
                set.abort_all();
                break;
            }
        }
    }

    leads
        .into_iter()
        .zip(resolved)
        .map(|(mut lead, bucket)| {
            lead.employee_count =
                bucket.unwrap_or_else(|| catalog::fallback_bucket(&lead.industry).to_string());
            lead.last_updated = Some(marker);
            lead
        })
        .collect()
}
