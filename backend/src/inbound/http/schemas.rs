//! Response bodies and OpenAPI schema stand-ins shared by the handlers.
//!
//! The pagination crate stays free of utoipa, so its envelope is described
//! here by mirror types used only for documentation.

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::SubmissionSummary;

/// Plain acknowledgement body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Password updated successfully")]
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// OpenAPI schema for [`pagination::PageMeta`].
#[derive(ToSchema)]
#[schema(as = PageMeta, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct PageMetaSchema {
    #[schema(example = 1)]
    page: u32,
    #[schema(example = 20)]
    limit: u32,
    #[schema(example = 45)]
    total: u64,
    #[schema(example = 3)]
    total_pages: u64,
}

/// OpenAPI schema for a page of submission summaries.
#[derive(ToSchema)]
#[schema(as = SubmissionPage)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct SubmissionPageSchema {
    data: Vec<SubmissionSummary>,
    pagination: PageMetaSchema,
}
