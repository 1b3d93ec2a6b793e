//! Admin home CRUD and room reads (tags: `Home`)

use haven_core::{Home, HomeId, Room, UserId};
use serde::Serialize;
use serde_json::json;

use super::{ApiMutation, ApiQuery};
use crate::tags::{Tag, TagKind};
use crate::transport::ApiRequest;

/// `GET /admin/homes`
#[derive(Debug, Clone, Default)]
pub struct ListHomes;

impl ApiQuery for ListHomes {
    type Output = Vec<Home>;

    fn request(&self) -> ApiRequest {
        ApiRequest::get("/admin/homes")
    }

    fn provides(&self) -> Vec<Tag> {
        vec![Tag::of(TagKind::Home)]
    }
}

/// `GET /admin/homes/:id`
#[derive(Debug, Clone)]
pub struct GetHome {
    /// Home to fetch
    pub id: HomeId,
}

impl ApiQuery for GetHome {
    type Output = Home;

    fn request(&self) -> ApiRequest {
        ApiRequest::get(format!("/admin/homes/{}", self.id))
    }

    fn provides(&self) -> Vec<Tag> {
        vec![Tag::with_id(TagKind::Home, self.id)]
    }
}

/// `GET /homes/:id/rooms`
///
/// Rooms are read alongside the home when an owner drafts a coverage plan.
#[derive(Debug, Clone)]
pub struct ListRooms {
    /// Home whose rooms to list
    pub home_id: HomeId,
}

impl ApiQuery for ListRooms {
    type Output = Vec<Room>;

    fn request(&self) -> ApiRequest {
        ApiRequest::get(format!("/homes/{}/rooms", self.home_id))
    }

    fn provides(&self) -> Vec<Tag> {
        vec![Tag::with_id(TagKind::Home, self.home_id)]
    }
}

/// `POST /admin/homes`
#[derive(Debug, Clone, Serialize)]
pub struct CreateHome {
    /// Home name
    pub name: String,
    /// Street address
    pub address: Option<String>,
    /// Owning user
    pub owner_id: UserId,
}

impl ApiMutation for CreateHome {
    type Output = Home;

    fn request(&self) -> ApiRequest {
        ApiRequest::post("/admin/homes").with_body(json!(self))
    }

    fn invalidates(&self) -> Vec<Tag> {
        vec![Tag::of(TagKind::Home)]
    }
}

/// Partial update body for a home.
#[derive(Debug, Clone, Default, Serialize)]
pub struct HomePatch {
    /// New name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// `PATCH /admin/homes/:id`
#[derive(Debug, Clone)]
pub struct UpdateHome {
    /// Home to update
    pub id: HomeId,
    /// Fields to change
    pub patch: HomePatch,
}

impl ApiMutation for UpdateHome {
    type Output = Home;

    fn request(&self) -> ApiRequest {
        ApiRequest::patch(format!("/admin/homes/{}", self.id)).with_body(json!(self.patch))
    }

    fn invalidates(&self) -> Vec<Tag> {
        vec![Tag::with_id(TagKind::Home, self.id), Tag::of(TagKind::Home)]
    }
}

/// `DELETE /admin/homes/:id`
#[derive(Debug, Clone)]
pub struct DeleteHome {
    /// Home to delete
    pub id: HomeId,
}

impl ApiMutation for DeleteHome {
    type Output = serde_json::Value;

    fn request(&self) -> ApiRequest {
        ApiRequest::delete(format!("/admin/homes/{}", self.id))
    }

    fn invalidates(&self) -> Vec<Tag> {
        vec![Tag::with_id(TagKind::Home, self.id), Tag::of(TagKind::Home)]
    }
}
