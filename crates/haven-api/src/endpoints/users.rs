//! Admin user CRUD (tag: `User`)

use haven_core::{HomeId, Role, User, UserId};
use serde::Serialize;
use serde_json::json;

use super::{ApiMutation, ApiQuery};
use crate::tags::{Tag, TagKind};
use crate::transport::ApiRequest;

/// `GET /admin/users`
#[derive(Debug, Clone, Default)]
pub struct ListUsers;

impl ApiQuery for ListUsers {
    type Output = Vec<User>;

    fn request(&self) -> ApiRequest {
        ApiRequest::get("/admin/users")
    }

    fn provides(&self) -> Vec<Tag> {
        vec![Tag::of(TagKind::User)]
    }
}

/// `GET /admin/users/:id`
#[derive(Debug, Clone)]
pub struct GetUser {
    /// User to fetch
    pub id: UserId,
}

impl ApiQuery for GetUser {
    type Output = User;

    fn request(&self) -> ApiRequest {
        ApiRequest::get(format!("/admin/users/{}", self.id))
    }

    fn provides(&self) -> Vec<Tag> {
        vec![Tag::with_id(TagKind::User, self.id)]
    }
}

/// `POST /admin/users`
#[derive(Debug, Clone, Serialize)]
pub struct CreateUser {
    /// Login email
    pub email: String,
    /// Display name
    pub name: Option<String>,
    /// Access role
    pub role: Role,
    /// Home assignment (owners)
    pub home_id: Option<HomeId>,
}

impl ApiMutation for CreateUser {
    type Output = User;

    fn request(&self) -> ApiRequest {
        ApiRequest::post("/admin/users").with_body(json!(self))
    }

    fn invalidates(&self) -> Vec<Tag> {
        vec![Tag::of(TagKind::User)]
    }
}

/// Partial update body for a user.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserPatch {
    /// New email
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// New display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New role
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    /// New home assignment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home_id: Option<HomeId>,
}

/// `PATCH /admin/users/:id`
#[derive(Debug, Clone)]
pub struct UpdateUser {
    /// User to update
    pub id: UserId,
    /// Fields to change
    pub patch: UserPatch,
}

impl ApiMutation for UpdateUser {
    type Output = User;

    fn request(&self) -> ApiRequest {
        ApiRequest::patch(format!("/admin/users/{}", self.id)).with_body(json!(self.patch))
    }

    fn invalidates(&self) -> Vec<Tag> {
        // Parameterized alongside the bare tag: the entity page and every
        // list of users both refetch.
        vec![Tag::with_id(TagKind::User, self.id), Tag::of(TagKind::User)]
    }
}

/// `DELETE /admin/users/:id`
#[derive(Debug, Clone)]
pub struct DeleteUser {
    /// User to delete
    pub id: UserId,
}

impl ApiMutation for DeleteUser {
    type Output = serde_json::Value;

    fn request(&self) -> ApiRequest {
        ApiRequest::delete(format!("/admin/users/{}", self.id))
    }

    fn invalidates(&self) -> Vec<Tag> {
        vec![Tag::with_id(TagKind::User, self.id), Tag::of(TagKind::User)]
    }
}
