//! The three fixed JSON response shapes every handler renders into.

use serde::Serialize;

use tokenop_types::{Operation, OperationStatus};

#[derive(Debug, Serialize)]
pub struct ResourceEnvelope<T: Serialize> {
    pub data: T,
}

impl<T: Serialize> ResourceEnvelope<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: u64,
    pub limit: u32,
    pub offset: u64,
    pub has_more: bool,
}

impl Pagination {
    /// `hasMore` iff `offset + len(data) < total`, per the spec's pagination
    /// invariant.
    pub fn new(total: u64, limit: u32, offset: u64, returned: usize) -> Self {
        let has_more = offset.saturating_add(returned as u64) < total;
        Self {
            total,
            limit,
            offset,
            has_more,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PaginatedEnvelope<T: Serialize> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}

impl<T: Serialize> PaginatedEnvelope<T> {
    pub fn new(data: Vec<T>, total: u64, limit: u32, offset: u64) -> Self {
        let pagination = Pagination::new(total, limit, offset, data.len());
        Self { data, pagination }
    }

    /// A single, non-paginated page carrying every item — used for the
    /// `?owner=` listing variant, which has no `limit`/`offset`.
    pub fn single_page(data: Vec<T>) -> Self {
        let total = data.len() as u64;
        Self {
            pagination: Pagination::new(total, total.max(1) as u32, 0, data.len()),
            data,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AsyncOperationEnvelope<T: Serialize> {
    pub id: String,
    pub status: OperationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
    pub data: T,
}

impl<T: Serialize> AsyncOperationEnvelope<T> {
    pub fn from_operation(operation: &Operation, data: T) -> Self {
        Self {
            id: operation.operation_id.clone(),
            status: operation.status,
            tx_hash: operation.tx_hash.clone(),
            data,
        }
    }
}
