//! Per-role overview analytics reads (tag: `Overview`)

use haven_core::{OverviewSummary, Role};

use super::ApiQuery;
use crate::tags::{Tag, TagKind};
use crate::transport::ApiRequest;

/// `GET /{admin,ops,tech,owner}/overview`
///
/// Aggregate analytics, computed server-side and scoped to the caller's
/// role. Pure reads; nothing mutates through here.
#[derive(Debug, Clone)]
pub struct GetOverview {
    /// Role scope selecting the endpoint
    pub role: Role,
}

impl GetOverview {
    fn path(&self) -> &'static str {
        match self.role {
            Role::Admin => "/admin/overview",
            Role::Staff => "/ops/overview",
            Role::Technician => "/tech/overview",
            Role::Owner => "/owner/overview",
        }
    }
}

impl ApiQuery for GetOverview {
    type Output = OverviewSummary;

    fn request(&self) -> ApiRequest {
        ApiRequest::get(self.path())
    }

    fn provides(&self) -> Vec<Tag> {
        vec![Tag::of(TagKind::Overview)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_role_has_its_own_overview_path() {
        assert_eq!(GetOverview { role: Role::Admin }.request().path, "/admin/overview");
        assert_eq!(GetOverview { role: Role::Staff }.request().path, "/ops/overview");
        assert_eq!(
            GetOverview {
                role: Role::Technician
            }
            .request()
            .path,
            "/tech/overview"
        );
        assert_eq!(GetOverview { role: Role::Owner }.request().path, "/owner/overview");
    }
}
