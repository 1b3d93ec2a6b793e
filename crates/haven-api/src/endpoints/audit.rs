//! Administrative audit log (tag: `AuditLog`)

use haven_core::AuditLogEntry;

use super::ApiQuery;
use crate::tags::{Tag, TagKind};
use crate::transport::ApiRequest;

/// `GET /admin/audit-log`
#[derive(Debug, Clone, Default)]
pub struct ListAuditLog {
    /// Restrict to one action name
    pub action: Option<String>,
}

impl ApiQuery for ListAuditLog {
    type Output = Vec<AuditLogEntry>;

    fn request(&self) -> ApiRequest {
        let mut req = ApiRequest::get("/admin/audit-log");
        if let Some(action) = &self.action {
            req = req.with_query("action", action.clone());
        }
        req
    }

    fn provides(&self) -> Vec<Tag> {
        vec![Tag::of(TagKind::AuditLog)]
    }
}
