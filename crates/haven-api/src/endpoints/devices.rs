//! Device CRUD and heartbeats (tag: `Device`)

use haven_core::{Device, DeviceId, HomeId, RoomId};
use serde::Serialize;
use serde_json::json;

use super::{ApiMutation, ApiQuery};
use crate::tags::{Tag, TagKind};
use crate::transport::ApiRequest;

/// `GET /devices[?home_id]`
#[derive(Debug, Clone, Default)]
pub struct ListDevices {
    /// Restrict to one home
    pub home_id: Option<HomeId>,
}

impl ApiQuery for ListDevices {
    type Output = Vec<Device>;

    fn request(&self) -> ApiRequest {
        let mut req = ApiRequest::get("/devices");
        if let Some(home_id) = self.home_id {
            req = req.with_query("home_id", home_id);
        }
        req
    }

    fn provides(&self) -> Vec<Tag> {
        vec![Tag::of(TagKind::Device)]
    }
}

/// `GET /devices/:id`
#[derive(Debug, Clone)]
pub struct GetDevice {
    /// Device to fetch
    pub id: DeviceId,
}

impl ApiQuery for GetDevice {
    type Output = Device;

    fn request(&self) -> ApiRequest {
        ApiRequest::get(format!("/devices/{}", self.id))
    }

    fn provides(&self) -> Vec<Tag> {
        vec![Tag::with_id(TagKind::Device, self.id)]
    }
}

/// `POST /devices`
#[derive(Debug, Clone, Serialize)]
pub struct CreateDevice {
    /// Home the device belongs to
    pub home_id: HomeId,
    /// Room placement
    pub room_id: Option<RoomId>,
    /// Device model name
    pub model: String,
}

impl ApiMutation for CreateDevice {
    type Output = Device;

    fn request(&self) -> ApiRequest {
        ApiRequest::post("/devices").with_body(json!(self))
    }

    fn invalidates(&self) -> Vec<Tag> {
        vec![Tag::of(TagKind::Device)]
    }
}

/// Partial update body for a device.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DevicePatch {
    /// New room placement
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_id: Option<RoomId>,
    /// New model name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// `PATCH /devices/:id`
#[derive(Debug, Clone)]
pub struct UpdateDevice {
    /// Device to update
    pub id: DeviceId,
    /// Fields to change
    pub patch: DevicePatch,
}

impl ApiMutation for UpdateDevice {
    type Output = Device;

    fn request(&self) -> ApiRequest {
        ApiRequest::patch(format!("/devices/{}", self.id)).with_body(json!(self.patch))
    }

    fn invalidates(&self) -> Vec<Tag> {
        vec![
            Tag::with_id(TagKind::Device, self.id),
            Tag::of(TagKind::Device),
        ]
    }
}

/// `DELETE /devices/:id`
#[derive(Debug, Clone)]
pub struct DeleteDevice {
    /// Device to delete
    pub id: DeviceId,
}

impl ApiMutation for DeleteDevice {
    type Output = serde_json::Value;

    fn request(&self) -> ApiRequest {
        ApiRequest::delete(format!("/devices/{}", self.id))
    }

    fn invalidates(&self) -> Vec<Tag> {
        vec![
            Tag::with_id(TagKind::Device, self.id),
            Tag::of(TagKind::Device),
        ]
    }
}

/// `POST /devices/:id/heartbeat`
///
/// Reports liveness; the server updates `last_heartbeat` and status.
#[derive(Debug, Clone)]
pub struct Heartbeat {
    /// Reporting device
    pub id: DeviceId,
}

impl ApiMutation for Heartbeat {
    type Output = Device;

    fn request(&self) -> ApiRequest {
        ApiRequest::post(format!("/devices/{}/heartbeat", self.id))
    }

    fn invalidates(&self) -> Vec<Tag> {
        vec![
            Tag::with_id(TagKind::Device, self.id),
            Tag::of(TagKind::Device),
        ]
    }
}
