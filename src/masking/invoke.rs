use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::Configuration;
use crate::error::{MaskingApplyFailure, Result, RosterMaskError};
use crate::record::{field_names, Dataset, Record};
use crate::service::{MaskRequest, MaskingService, PreviewRequest};

/// Sends datasets and configurations to the masking service.
///
/// At most one apply call is outstanding per client; a second call while one
/// is pending fails with `MaskingInFlight` instead of racing the first.
pub struct MaskingClient {
    service: Arc<dyn MaskingService>,
    in_flight: AtomicBool,
}

impl MaskingClient {
    pub fn new(service: Arc<dyn MaskingService>) -> Self {
        Self {
            service,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn service(&self) -> &Arc<dyn MaskingService> {
        &self.service
    }

    /// True while an apply call is outstanding.
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Mask the full dataset and return the replacement for `dataset`.
    ///
    /// The request is built from `original`, never from a previously masked
    /// view, so repeated calls do not compound. The response must match the
    /// request record for record (count, order, field set) or the call fails
    /// with `MalformedResponseShape`. Nothing is mutated here; the caller
    /// swaps the result in.
    pub async fn apply_masking(
        &self,
        dataset: &Dataset,
        original: &Dataset,
        config: &Configuration,
    ) -> Result<Dataset> {
        config.validate()?;
        if dataset.len() != original.len() {
            return Err(MaskingApplyFailure::OutOfStep {
                working: dataset.len(),
                original: original.len(),
            }
            .into());
        }

        let _guard = InFlightGuard::acquire(&self.in_flight)?;

        let fingerprint = config.fingerprint();
        tracing::info!(records = original.len(), config = %fingerprint, "applying masking");
        if config.iter().any(|e| !e.masking_rule.is_deterministic()) {
            tracing::debug!(config = %fingerprint, "configuration uses faker; results vary per call");
        }

        let request = MaskRequest {
            data: original.clone(),
            original_data: original.clone(),
            config: config.clone(),
        };
        let masked = match self.service.mask(&request).await {
            Ok(masked) => masked,
            Err(e) => {
                tracing::warn!(config = %fingerprint, error = %e, "masking call failed");
                return Err(e);
            }
        };

        check_shape(original, &masked)?;
        tracing::info!(records = masked.len(), config = %fingerprint, "masking applied");
        Ok(masked)
    }

    /// Mask a bounded sample without touching any dataset.
    ///
    /// `sample_size` is a hint: the service may return fewer records, and any
    /// extras beyond the hint are dropped.
    pub async fn preview_masking(&self, config: &Configuration, sample_size: usize) -> Result<Dataset> {
        config.validate()?;
        let request = PreviewRequest::new(config, sample_size);
        let mut sample = self.service.preview(&request).await?;
        if sample.len() > sample_size {
            tracing::warn!(
                requested = sample_size,
                returned = sample.len(),
                "preview returned more records than requested; truncating"
            );
            sample.truncate(sample_size);
        }
        Ok(sample)
    }
}

/// Clears the in-flight flag when the call finishes or its future is dropped.
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| RosterMaskError::MaskingInFlight)?;
        Ok(Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Response records must pair up with request records one to one.
/// Field order is not compared: services may sort object keys.
fn check_shape(sent: &Dataset, received: &Dataset) -> Result<()> {
    if sent.len() != received.len() {
        return Err(MaskingApplyFailure::MalformedResponseShape {
            reason: format!("expected {} records, got {}", sent.len(), received.len()),
        }
        .into());
    }

    let field_set = |r: &Record| {
        field_names(r)
            .into_iter()
            .map(String::from)
            .collect::<BTreeSet<String>>()
    };
    for (idx, (a, b)) in sent.iter().zip(received).enumerate() {
        let (expected, actual) = (field_set(a), field_set(b));
        if expected != actual {
            let missing: Vec<_> = expected.difference(&actual).cloned().collect();
            let extra: Vec<_> = actual.difference(&expected).cloned().collect();
            return Err(MaskingApplyFailure::MalformedResponseShape {
                reason: format!(
                    "record {idx}: field set differs (missing {missing:?}, unexpected {extra:?})"
                ),
            }
            .into());
        }
    }
    Ok(())
}
