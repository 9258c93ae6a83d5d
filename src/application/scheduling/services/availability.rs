//! Availability read model
//!
//! Paginated view over slots intersecting a date-time range, with
//! free/reserved counters computed over the whole filtered set.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::{DomainError, DomainResult, RepositoryProvider, Slot};

/// Hard ceiling on page size, matching the API pagination bounds.
pub const MAX_PAGE_SIZE: u32 = 100;

/// One page of availability plus whole-set totals.
#[derive(Debug)]
pub struct AvailabilityPage {
    pub slots: Vec<Slot>,
    pub total: u64,
    pub free: u64,
    pub reserved: u64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
}

/// Read-only service over the slot store.
pub struct AvailabilityService {
    repos: Arc<dyn RepositoryProvider>,
}

impl AvailabilityService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    /// Unpaged listing, ordered by start time ascending.
    pub async fn list(
        &self,
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
        technician_id: Option<i64>,
    ) -> DomainResult<Vec<Slot>> {
        validate_range(range_start, range_end)?;
        self.repos
            .slots()
            .find_in_range(range_start, range_end, technician_id, 0, None)
            .await
    }

    /// One page of matching slots plus totals over the entire filtered
    /// set. An out-of-range page yields an empty list with correct
    /// totals, not an error.
    pub async fn query(
        &self,
        range_start: DateTime<Utc>,
        range_end: DateTime<Utc>,
        technician_id: Option<i64>,
        page: u32,
        page_size: u32,
    ) -> DomainResult<AvailabilityPage> {
        validate_range(range_start, range_end)?;
        if page == 0 || page_size == 0 {
            return Err(DomainError::Validation(
                "page and page_size must be positive".to_string(),
            ));
        }
        let page_size = page_size.min(MAX_PAGE_SIZE);

        let counts = self
            .repos
            .slots()
            .count_in_range(range_start, range_end, technician_id)
            .await?;

        let offset = u64::from(page - 1) * u64::from(page_size);
        let slots = if offset < counts.total {
            self.repos
                .slots()
                .find_in_range(
                    range_start,
                    range_end,
                    technician_id,
                    offset,
                    Some(u64::from(page_size)),
                )
                .await?
        } else {
            Vec::new()
        };

        let total_pages = ((counts.total as f64) / (f64::from(page_size))).ceil() as u32;

        Ok(AvailabilityPage {
            slots,
            total: counts.total,
            free: counts.free(),
            reserved: counts.reserved,
            page,
            page_size,
            total_pages,
        })
    }
}

fn validate_range(start: DateTime<Utc>, end: DateTime<Utc>) -> DomainResult<()> {
    if end < start {
        return Err(DomainError::Validation(
            "range end must not be before range start".to_string(),
        ));
    }
    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────
