//! Alert list and lifecycle actions (tag: `Alert`)

use haven_core::{Alert, AlertId, AlertStatus, HomeId};

use super::{ApiMutation, ApiQuery};
use crate::tags::{Tag, TagKind};
use crate::transport::ApiRequest;

/// `GET /alerts[?home_id&status]`
#[derive(Debug, Clone, Default)]
pub struct ListAlerts {
    /// Restrict to one home
    pub home_id: Option<HomeId>,
    /// Restrict to one lifecycle status
    pub status: Option<AlertStatus>,
}

impl ApiQuery for ListAlerts {
    type Output = Vec<Alert>;

    fn request(&self) -> ApiRequest {
        let mut req = ApiRequest::get("/alerts");
        if let Some(home_id) = self.home_id {
            req = req.with_query("home_id", home_id);
        }
        if let Some(status) = self.status {
            let label = match status {
                AlertStatus::Open => "open",
                AlertStatus::Acknowledged => "acknowledged",
                AlertStatus::Escalated => "escalated",
                AlertStatus::Closed => "closed",
            };
            req = req.with_query("status", label);
        }
        req
    }

    fn provides(&self) -> Vec<Tag> {
        vec![Tag::of(TagKind::Alert)]
    }
}

/// Lifecycle action on an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertAction {
    /// Acknowledge the alert
    Acknowledge,
    /// Escalate for urgent handling
    Escalate,
    /// Close the alert
    Close,
}

impl AlertAction {
    fn path_segment(&self) -> &'static str {
        match self {
            Self::Acknowledge => "ack",
            Self::Escalate => "escalate",
            Self::Close => "close",
        }
    }
}

/// `POST /alerts/:id/{ack,escalate,close}`
#[derive(Debug, Clone)]
pub struct TransitionAlert {
    /// Alert to act on
    pub id: AlertId,
    /// Action to take
    pub action: AlertAction,
}

impl ApiMutation for TransitionAlert {
    type Output = Alert;

    fn request(&self) -> ApiRequest {
        ApiRequest::post(format!(
            "/alerts/{}/{}",
            self.id,
            self.action.path_segment()
        ))
    }

    fn invalidates(&self) -> Vec<Tag> {
        vec![
            Tag::with_id(TagKind::Alert, self.id),
            Tag::of(TagKind::Alert),
            // Alert counts feed every overview panel.
            Tag::of(TagKind::Overview),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alert_action_paths() {
        let id = AlertId::new();
        let req = TransitionAlert {
            id,
            action: AlertAction::Acknowledge,
        }
        .request();
        assert_eq!(req.path, format!("/alerts/{id}/ack"));

        let req = TransitionAlert {
            id,
            action: AlertAction::Close,
        }
        .request();
        assert_eq!(req.path, format!("/alerts/{id}/close"));
    }

    #[test]
    fn test_list_filters_become_query_params() {
        let home_id = HomeId::new();
        let req = ListAlerts {
            home_id: Some(home_id),
            status: Some(AlertStatus::Open),
        }
        .request();
        assert!(req.query.contains(&("home_id".into(), home_id.to_string())));
        assert!(req.query.contains(&("status".into(), "open".into())));
    }
}
