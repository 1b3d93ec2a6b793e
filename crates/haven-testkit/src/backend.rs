//! The in-memory backend
//!
//! Implements [`ApiTransport`] over a mutex-guarded world seeded from
//! [`Fixtures`]. Routing mirrors the real server's paths; workflow mutations
//! go through the shared state machines so the backend can never hand back a
//! state the server would refuse. Rejections use the server's error shape: a
//! non-2xx status with a `{"detail": ...}` body.
//!
//! Every request is appended to a log before routing, so tests can assert
//! both on traffic that happened and on traffic that must not have.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::{json, Value};

use haven_api::{ApiError, ApiRequest, ApiResponse, ApiResult, ApiTransport, Method};
use haven_core::{
    apply_item_action, apply_request_action, Alert, AlertStatus, AuditLogEntry, Device, DeviceId,
    DeviceStatus, Home, HomeId, InstallationItem, InstallationRequest, ItemAction, ItemId,
    ItemStatus, RequestAction, RequestId, RequestStatus, Role, Room, RoomId, TransitionError,
    User, UserId, WorkflowActor,
};

use crate::fixtures::{Fixtures, PASSWORD, SEED_CLOCK};

/// One raw PUT captured by [`InMemoryBackend::upload`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRecord {
    /// Presigned URL the bytes went to
    pub url: String,
    /// Declared content type
    pub content_type: String,
    /// Payload size in bytes
    pub size: usize,
}

struct State {
    users: Vec<User>,
    homes: Vec<Home>,
    rooms: Vec<Room>,
    devices: Vec<Device>,
    alerts: Vec<Alert>,
    requests: Vec<InstallationRequest>,
    audit: Vec<AuditLogEntry>,
    actor: Option<UserId>,
    pending_pictures: Vec<String>,
    pending_ingests: Vec<String>,
    clock: u64,
}

/// The fake server handed to [`ApiClient`](haven_api::ApiClient) in tests.
pub struct InMemoryBackend {
    fixtures: Fixtures,
    state: Mutex<State>,
    log: Mutex<Vec<ApiRequest>>,
    uploads: Mutex<Vec<UploadRecord>>,
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryBackend {
    /// A backend seeded with a fresh [`Fixtures::seed`].
    pub fn new() -> Self {
        Self::with_fixtures(Fixtures::seed())
    }

    /// A backend seeded with caller-supplied fixtures.
    pub fn with_fixtures(fixtures: Fixtures) -> Self {
        let state = State {
            users: fixtures.users(),
            homes: vec![fixtures.home.clone()],
            rooms: fixtures.rooms.clone(),
            devices: fixtures.devices.clone(),
            alerts: fixtures.alerts.clone(),
            requests: vec![fixtures.request.clone()],
            audit: Vec::new(),
            actor: None,
            pending_pictures: Vec::new(),
            pending_ingests: Vec::new(),
            clock: SEED_CLOCK,
        };
        Self {
            fixtures,
            state: Mutex::new(state),
            log: Mutex::new(Vec::new()),
            uploads: Mutex::new(Vec::new()),
        }
    }

    /// The fixtures this backend was seeded with.
    pub fn fixtures(&self) -> &Fixtures {
        &self.fixtures
    }

    /// Every request routed so far, in order.
    pub fn request_log(&self) -> Vec<ApiRequest> {
        self.log.lock().clone()
    }

    /// Total number of requests routed so far.
    pub fn request_count(&self) -> usize {
        self.log.lock().len()
    }

    /// Number of requests routed to an exact path.
    pub fn requests_to(&self, path: &str) -> usize {
        self.log.lock().iter().filter(|r| r.path == path).count()
    }

    /// Every presigned upload captured so far.
    pub fn uploads(&self) -> Vec<UploadRecord> {
        self.uploads.lock().clone()
    }

    /// Current server-side copy of an installation request.
    pub fn installation_request(&self, id: RequestId) -> Option<InstallationRequest> {
        self.state
            .lock()
            .requests
            .iter()
            .find(|r| r.id == id)
            .cloned()
    }

    /// Current server-side audit log.
    pub fn audit_log(&self) -> Vec<AuditLogEntry> {
        self.state.lock().audit.clone()
    }

    // ========================================================================
    // Routing
    // ========================================================================

    fn route(&self, request: &ApiRequest) -> ApiResponse {
        let path = request.path.trim_matches('/').to_owned();
        let segments: Vec<&str> = path.split('/').collect();
        let mut state = self.state.lock();

        use Method as M;
        match (request.method, segments.as_slice()) {
            (M::Post, ["auth", "login"]) => login(&mut state, request),

            (M::Get, ["owner", "installation-requests"]) => ok(body_of(&state.requests)),
            (M::Post, ["owner", "installation-requests"]) => submit_request(&mut state, request),
            (M::Patch, ["owner", "installation-requests", id]) => {
                transition_request(&mut state, id, request, WorkflowActor::Owner)
            }

            (M::Get, ["tech", "installation-requests"]) => {
                list_tech_requests(&state, request)
            }
            (M::Patch, ["tech", "installation-requests", id]) => {
                transition_request(&mut state, id, request, WorkflowActor::Technician)
            }
            (M::Patch, ["tech", "installation-requests", id, "items", item_id]) => {
                transition_item(&mut state, id, item_id, request)
            }
            (M::Post, ["tech", "installation-requests", id, "approve-all"]) => {
                approve_all(&mut state, id)
            }

            (M::Get, ["alerts"]) => list_alerts(&state, request),
            (M::Post, ["alerts", id, action]) => transition_alert(&mut state, id, action),

            (M::Get, ["devices"]) => list_devices(&state, request),
            (M::Post, ["devices"]) => create_device(&mut state, request),
            (M::Get, ["devices", id]) => find_device(&state, id),
            (M::Patch, ["devices", id]) => patch_device(&mut state, id, request),
            (M::Delete, ["devices", id]) => delete_device(&mut state, id),
            (M::Post, ["devices", id, "heartbeat"]) => heartbeat(&mut state, id),

            (M::Get, ["owner" | "tech" | "ops" | "admin", "overview"]) => {
                ok(body_of(&overview(&state)))
            }

            (M::Get, ["profile"]) => current_user(&state),
            (M::Patch, ["profile"]) => patch_profile(&mut state, request),
            (M::Post, ["profile", "picture"]) => presign_picture(&mut state),
            (M::Post, ["profile", "picture", "confirm"]) => confirm_picture(&mut state, request),

            (M::Post, ["ingest"]) => presign_ingest(&mut state),
            (M::Post, ["ingest", "confirm"]) => confirm_ingest(&mut state, request),

            (M::Get, ["admin", "users"]) => ok(body_of(&state.users)),
            (M::Post, ["admin", "users"]) => create_user(&mut state, request),
            (M::Get, ["admin", "users", id]) => find_user(&state, id),
            (M::Patch, ["admin", "users", id]) => patch_user(&mut state, id, request),
            (M::Delete, ["admin", "users", id]) => delete_user(&mut state, id),

            (M::Get, ["admin", "homes"]) => ok(body_of(&state.homes)),
            (M::Post, ["admin", "homes"]) => create_home(&mut state, request),
            (M::Get, ["admin", "homes", id]) => find_home(&state, id),
            (M::Patch, ["admin", "homes", id]) => patch_home(&mut state, id, request),
            (M::Delete, ["admin", "homes", id]) => delete_home(&mut state, id),
            (M::Get, ["homes", id, "rooms"]) => list_rooms(&state, id),

            (M::Get, ["admin", "audit-log"]) => list_audit(&state, request),

            _ => error(404, "not found"),
        }
    }
}

#[async_trait]
impl ApiTransport for InMemoryBackend {
    async fn send(&self, request: ApiRequest) -> ApiResult<ApiResponse> {
        self.log.lock().push(request.clone());
        Ok(self.route(&request))
    }

    async fn upload(&self, url: &str, content_type: &str, bytes: Vec<u8>) -> ApiResult<()> {
        if !url.starts_with("https://uploads.haven.test/") {
            return Err(ApiError::transport(format!("unknown upload host: {url}")));
        }
        self.uploads.lock().push(UploadRecord {
            url: url.to_owned(),
            content_type: content_type.to_owned(),
            size: bytes.len(),
        });
        Ok(())
    }
}

// ============================================================================
// Response helpers
// ============================================================================

fn ok(body: Value) -> ApiResponse {
    ApiResponse { status: 200, body }
}

fn created(body: Value) -> ApiResponse {
    ApiResponse { status: 201, body }
}

fn error(status: u16, detail: impl Into<String>) -> ApiResponse {
    ApiResponse {
        status,
        body: json!({ "detail": detail.into() }),
    }
}

fn body_of<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

fn transition_error(err: &TransitionError) -> ApiResponse {
    match err {
        TransitionError::WrongActor { .. } => error(403, err.to_string()),
        _ => error(409, err.to_string()),
    }
}

fn body_field<T: serde::de::DeserializeOwned>(request: &ApiRequest, field: &str) -> Option<T> {
    request
        .body
        .as_ref()
        .and_then(|b| b.get(field))
        .and_then(|v| serde_json::from_value(v.clone()).ok())
}

fn query_param<'a>(request: &'a ApiRequest, key: &str) -> Option<&'a str> {
    request
        .query
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

fn tick(state: &mut State) -> u64 {
    state.clock += 1_000;
    state.clock
}

fn audit(state: &mut State, actor_id: UserId, action: &str, target: Option<String>) {
    let timestamp = tick(state);
    state.audit.push(AuditLogEntry {
        id: uuid::Uuid::new_v4().to_string(),
        actor_id,
        action: action.to_owned(),
        target,
        timestamp,
    });
}

// ============================================================================
// Auth and profile
// ============================================================================

fn login(state: &mut State, request: &ApiRequest) -> ApiResponse {
    let email: Option<String> = body_field(request, "email");
    let password: Option<String> = body_field(request, "password");
    let (Some(email), Some(password)) = (email, password) else {
        return error(422, "email and password are required");
    };
    if password != PASSWORD {
        return error(401, "invalid credentials");
    }
    let Some(user) = state.users.iter().find(|u| u.email == email).cloned() else {
        return error(401, "invalid credentials");
    };
    state.actor = Some(user.id);
    ok(json!({
        "user": body_of(&user),
        "token": format!("test-token-{}", user.id),
    }))
}

fn current_user(state: &State) -> ApiResponse {
    match actor_user(state) {
        Some(user) => ok(body_of(&user)),
        None => error(401, "not authenticated"),
    }
}

fn actor_user(state: &State) -> Option<User> {
    let id = state.actor?;
    state.users.iter().find(|u| u.id == id).cloned()
}

fn patch_profile(state: &mut State, request: &ApiRequest) -> ApiResponse {
    let Some(actor) = state.actor else {
        return error(401, "not authenticated");
    };
    let name: Option<String> = body_field(request, "name");
    let email: Option<String> = body_field(request, "email");
    let Some(user) = state.users.iter_mut().find(|u| u.id == actor) else {
        return error(401, "not authenticated");
    };
    if let Some(name) = name {
        user.name = Some(name);
    }
    if let Some(email) = email {
        user.email = email;
    }
    let updated = user.clone();
    audit(state, actor, "profile.update", None);
    ok(body_of(&updated))
}

fn presign_picture(state: &mut State) -> ApiResponse {
    if state.actor.is_none() {
        return error(401, "not authenticated");
    }
    let key = format!("pictures/{}", uuid::Uuid::new_v4());
    state.pending_pictures.push(key.clone());
    ok(json!({
        "upload_url": format!("https://uploads.haven.test/{key}"),
        "picture_key": key,
    }))
}

fn confirm_picture(state: &mut State, request: &ApiRequest) -> ApiResponse {
    let Some(actor) = state.actor else {
        return error(401, "not authenticated");
    };
    let Some(key) = query_param(request, "picture_key").map(str::to_owned) else {
        return error(422, "picture_key is required");
    };
    let Some(position) = state.pending_pictures.iter().position(|k| *k == key) else {
        return error(404, "unknown picture_key");
    };
    state.pending_pictures.remove(position);
    let Some(user) = state.users.iter_mut().find(|u| u.id == actor) else {
        return error(401, "not authenticated");
    };
    user.picture_url = Some(format!("https://cdn.haven.test/{key}"));
    let updated = user.clone();
    audit(state, actor, "profile.picture", None);
    ok(body_of(&updated))
}

// ============================================================================
// Ingest
// ============================================================================

fn presign_ingest(state: &mut State) -> ApiResponse {
    let key = format!("ingest/{}", uuid::Uuid::new_v4());
    state.pending_ingests.push(key.clone());
    ok(json!({
        "upload_url": format!("https://uploads.haven.test/{key}"),
        "s3_key": key,
    }))
}

fn confirm_ingest(state: &mut State, request: &ApiRequest) -> ApiResponse {
    let Some(key): Option<String> = body_field(request, "s3_key") else {
        return error(422, "s3_key is required");
    };
    let Some(position) = state.pending_ingests.iter().position(|k| *k == key) else {
        return error(404, "unknown s3_key");
    };
    state.pending_ingests.remove(position);
    ok(json!({ "job_id": uuid::Uuid::new_v4() }))
}

// ============================================================================
// Installation workflow
// ============================================================================

fn submit_request(state: &mut State, request: &ApiRequest) -> ApiResponse {
    let home_id = match body_field(request, "home_id") {
        Some(id) => id,
        None => return error(422, "home_id is required"),
    };
    let items: Vec<Value> = body_field(request, "items").unwrap_or_default();
    if items.is_empty() {
        return error(422, "at least one item is required");
    }

    let mut built = Vec::with_capacity(items.len());
    for item in items {
        let coverage = item
            .get("coverage_type")
            .and_then(|v| serde_json::from_value(v.clone()).ok());
        let Some(coverage_type) = coverage else {
            return error(422, "coverage_type is required on every item");
        };
        built.push(InstallationItem {
            id: ItemId::new(),
            room_id: item
                .get("room_id")
                .and_then(|v| serde_json::from_value(v.clone()).ok()),
            coverage_type,
            desired_device_count: item
                .get("desired_device_count")
                .and_then(Value::as_u64)
                .unwrap_or(1) as u32,
            notes: item
                .get("notes")
                .and_then(Value::as_str)
                .map(str::to_owned),
            status: ItemStatus::Pending,
        });
    }

    let owner_id = state
        .homes
        .iter()
        .find(|h| h.id == home_id)
        .map(|h| h.owner_id);
    let Some(owner_id) = owner_id else {
        return error(404, "unknown home");
    };

    let created_request = InstallationRequest {
        id: RequestId::new(),
        home_id,
        owner_id,
        technician_id: None,
        status: RequestStatus::Submitted,
        notes: body_field(request, "notes"),
        items: built,
    };
    state.requests.push(created_request.clone());
    audit(
        state,
        owner_id,
        "request.submit",
        Some(created_request.id.to_string()),
    );
    created(body_of(&created_request))
}

fn list_tech_requests(state: &State, request: &ApiRequest) -> ApiResponse {
    let filter: Option<RequestStatus> = query_param(request, "status")
        .and_then(|label| serde_json::from_value(Value::String(label.to_owned())).ok());
    let matching: Vec<&InstallationRequest> = state
        .requests
        .iter()
        .filter(|r| filter.map_or(true, |s| r.status == s))
        .collect();
    ok(body_of(&matching))
}

fn transition_request(
    state: &mut State,
    id: &str,
    request: &ApiRequest,
    actor: WorkflowActor,
) -> ApiResponse {
    let Ok(id) = id.parse::<RequestId>() else {
        return error(404, "unknown request");
    };
    let Some(action): Option<RequestAction> = body_field(request, "action") else {
        return error(422, "action is required");
    };
    let Some(target) = state.requests.iter_mut().find(|r| r.id == id) else {
        return error(404, "unknown request");
    };
    let next = match apply_request_action(target.status, action, actor) {
        Ok(next) => next,
        Err(err) => return transition_error(&err),
    };
    target.status = next;
    let updated = target.clone();
    let actor_id = workflow_actor_id(state, actor, &updated);
    if action == RequestAction::StartReview {
        if let Some(target) = state.requests.iter_mut().find(|r| r.id == id) {
            target.technician_id = Some(actor_id);
        }
    }
    audit(
        state,
        actor_id,
        &format!("request.{}", action_label(action)),
        Some(id.to_string()),
    );
    let updated = state
        .requests
        .iter()
        .find(|r| r.id == id)
        .cloned()
        .unwrap_or(updated);
    ok(body_of(&updated))
}

fn transition_item(
    state: &mut State,
    id: &str,
    item_id: &str,
    request: &ApiRequest,
) -> ApiResponse {
    let Ok(id) = id.parse::<RequestId>() else {
        return error(404, "unknown request");
    };
    let Ok(item_id) = item_id.parse::<ItemId>() else {
        return error(404, "unknown item");
    };
    let Some(action): Option<ItemAction> = body_field(request, "action") else {
        return error(422, "action is required");
    };
    let Some(target) = state.requests.iter_mut().find(|r| r.id == id) else {
        return error(404, "unknown request");
    };
    if target.status.is_terminal() {
        return error(409, "request is already installed");
    }
    let Some(item) = target.items.iter_mut().find(|i| i.id == item_id) else {
        return error(404, "unknown item");
    };
    let next = match apply_item_action(item.status, action) {
        Ok(next) => next,
        Err(err) => return transition_error(&err),
    };
    item.status = next;
    let updated = target.clone();
    let technician = updated.technician_id.unwrap_or(updated.owner_id);
    audit(state, technician, "item.transition", Some(item_id.to_string()));
    ok(body_of(&updated))
}

fn approve_all(state: &mut State, id: &str) -> ApiResponse {
    let Ok(id) = id.parse::<RequestId>() else {
        return error(404, "unknown request");
    };
    let Some(target) = state.requests.iter_mut().find(|r| r.id == id) else {
        return error(404, "unknown request");
    };
    if target.status.is_terminal() {
        return error(409, "request is already installed");
    }
    haven_core::approve_all_pending(&mut target.items);
    let updated = target.clone();
    let technician = updated.technician_id.unwrap_or(updated.owner_id);
    audit(state, technician, "request.approve_all", Some(id.to_string()));
    ok(body_of(&updated))
}

fn workflow_actor_id(state: &State, actor: WorkflowActor, request: &InstallationRequest) -> UserId {
    match actor {
        WorkflowActor::Owner => request.owner_id,
        WorkflowActor::Technician => request.technician_id.unwrap_or_else(|| {
            state
                .users
                .iter()
                .find(|u| u.role == Some(Role::Technician))
                .map(|u| u.id)
                .unwrap_or(request.owner_id)
        }),
    }
}

fn action_label(action: RequestAction) -> &'static str {
    match action {
        RequestAction::StartReview => "start_review",
        RequestAction::PlanReady => "plan_ready",
        RequestAction::Approve => "approve",
        RequestAction::RequestChanges => "request_changes",
        RequestAction::MarkInstalled => "mark_installed",
    }
}

// ============================================================================
// Alerts
// ============================================================================

fn list_alerts(state: &State, request: &ApiRequest) -> ApiResponse {
    let home_filter = query_param(request, "home_id");
    let status_filter: Option<AlertStatus> = query_param(request, "status")
        .and_then(|label| serde_json::from_value(Value::String(label.to_owned())).ok());
    let matching: Vec<&Alert> = state
        .alerts
        .iter()
        .filter(|a| home_filter.map_or(true, |h| a.home_id.to_string() == h))
        .filter(|a| status_filter.map_or(true, |s| a.status == s))
        .collect();
    ok(body_of(&matching))
}

fn transition_alert(state: &mut State, id: &str, action: &str) -> ApiResponse {
    let Some(alert) = state
        .alerts
        .iter_mut()
        .find(|a| a.id.to_string() == id)
    else {
        return error(404, "unknown alert");
    };
    let next = match (alert.status, action) {
        (AlertStatus::Open, "ack") => AlertStatus::Acknowledged,
        (AlertStatus::Open | AlertStatus::Acknowledged, "escalate") => AlertStatus::Escalated,
        (AlertStatus::Open | AlertStatus::Acknowledged | AlertStatus::Escalated, "close") => {
            AlertStatus::Closed
        }
        (_, "ack" | "escalate" | "close") => {
            return error(409, format!("cannot {action} an alert in state {:?}", alert.status))
        }
        _ => return error(404, "not found"),
    };
    alert.status = next;
    ok(body_of(&alert.clone()))
}

// ============================================================================
// Devices, users, homes, audit, overview
// ============================================================================

fn list_devices(state: &State, request: &ApiRequest) -> ApiResponse {
    let home_filter = query_param(request, "home_id");
    let matching: Vec<&Device> = state
        .devices
        .iter()
        .filter(|d| home_filter.map_or(true, |h| d.home_id.to_string() == h))
        .collect();
    ok(body_of(&matching))
}

fn find_device(state: &State, id: &str) -> ApiResponse {
    match state.devices.iter().find(|d| d.id.to_string() == id) {
        Some(device) => ok(body_of(device)),
        None => error(404, "unknown device"),
    }
}

fn create_device(state: &mut State, request: &ApiRequest) -> ApiResponse {
    let Some(home_id): Option<HomeId> = body_field(request, "home_id") else {
        return error(422, "home_id is required");
    };
    let Some(model): Option<String> = body_field(request, "model") else {
        return error(422, "model is required");
    };
    if !state.homes.iter().any(|h| h.id == home_id) {
        return error(404, "unknown home");
    }
    let device = Device {
        id: DeviceId::new(),
        home_id,
        room_id: body_field(request, "room_id"),
        model,
        // Provisioned devices stay pending until their first heartbeat.
        status: DeviceStatus::Pending,
        last_heartbeat: None,
    };
    state.devices.push(device.clone());
    created(body_of(&device))
}

fn patch_device(state: &mut State, id: &str, request: &ApiRequest) -> ApiResponse {
    let room_id: Option<RoomId> = body_field(request, "room_id");
    let model: Option<String> = body_field(request, "model");
    let Some(device) = state.devices.iter_mut().find(|d| d.id.to_string() == id) else {
        return error(404, "unknown device");
    };
    if room_id.is_some() {
        device.room_id = room_id;
    }
    if let Some(model) = model {
        device.model = model;
    }
    ok(body_of(&device.clone()))
}

fn delete_device(state: &mut State, id: &str) -> ApiResponse {
    let Some(position) = state.devices.iter().position(|d| d.id.to_string() == id) else {
        return error(404, "unknown device");
    };
    state.devices.remove(position);
    ok(json!({ "deleted": true }))
}

fn heartbeat(state: &mut State, id: &str) -> ApiResponse {
    let now = tick(state);
    let Some(device) = state.devices.iter_mut().find(|d| d.id.to_string() == id) else {
        return error(404, "unknown device");
    };
    device.status = DeviceStatus::Online;
    device.last_heartbeat = Some(now);
    ok(body_of(&device.clone()))
}

fn create_user(state: &mut State, request: &ApiRequest) -> ApiResponse {
    let Some(email): Option<String> = body_field(request, "email") else {
        return error(422, "email is required");
    };
    let Some(role): Option<Role> = body_field(request, "role") else {
        return error(422, "role is required");
    };
    let user = User {
        id: UserId::new(),
        email,
        name: body_field(request, "name"),
        role: Some(role),
        home_id: body_field(request, "home_id"),
        picture_url: None,
    };
    state.users.push(user.clone());
    let actor = state.actor.unwrap_or(user.id);
    audit(state, actor, "user.create", Some(user.id.to_string()));
    created(body_of(&user))
}

fn find_user(state: &State, id: &str) -> ApiResponse {
    match state.users.iter().find(|u| u.id.to_string() == id) {
        Some(user) => ok(body_of(user)),
        None => error(404, "unknown user"),
    }
}

fn patch_user(state: &mut State, id: &str, request: &ApiRequest) -> ApiResponse {
    let email: Option<String> = body_field(request, "email");
    let name: Option<String> = body_field(request, "name");
    let role: Option<Role> = body_field(request, "role");
    let home_id = body_field(request, "home_id");
    let Some(user) = state.users.iter_mut().find(|u| u.id.to_string() == id) else {
        return error(404, "unknown user");
    };
    if let Some(email) = email {
        user.email = email;
    }
    if let Some(name) = name {
        user.name = Some(name);
    }
    if let Some(role) = role {
        user.role = Some(role);
    }
    if home_id.is_some() {
        user.home_id = home_id;
    }
    let updated = user.clone();
    let actor = state.actor.unwrap_or(updated.id);
    audit(state, actor, "user.update", Some(updated.id.to_string()));
    ok(body_of(&updated))
}

fn delete_user(state: &mut State, id: &str) -> ApiResponse {
    let Some(position) = state.users.iter().position(|u| u.id.to_string() == id) else {
        return error(404, "unknown user");
    };
    let removed = state.users.remove(position);
    let actor = state.actor.unwrap_or(removed.id);
    audit(state, actor, "user.delete", Some(removed.id.to_string()));
    ok(json!({ "deleted": true }))
}

fn find_home(state: &State, id: &str) -> ApiResponse {
    match state.homes.iter().find(|h| h.id.to_string() == id) {
        Some(home) => ok(body_of(home)),
        None => error(404, "unknown home"),
    }
}

fn create_home(state: &mut State, request: &ApiRequest) -> ApiResponse {
    let Some(name): Option<String> = body_field(request, "name") else {
        return error(422, "name is required");
    };
    let Some(owner_id): Option<UserId> = body_field(request, "owner_id") else {
        return error(422, "owner_id is required");
    };
    if !state.users.iter().any(|u| u.id == owner_id) {
        return error(404, "unknown owner");
    }
    let home = Home {
        id: HomeId::new(),
        name,
        address: body_field(request, "address"),
        owner_id,
    };
    state.homes.push(home.clone());
    let actor = state.actor.unwrap_or(owner_id);
    audit(state, actor, "home.create", Some(home.id.to_string()));
    created(body_of(&home))
}

fn patch_home(state: &mut State, id: &str, request: &ApiRequest) -> ApiResponse {
    let name: Option<String> = body_field(request, "name");
    let address: Option<String> = body_field(request, "address");
    let Some(home) = state.homes.iter_mut().find(|h| h.id.to_string() == id) else {
        return error(404, "unknown home");
    };
    if let Some(name) = name {
        home.name = name;
    }
    if address.is_some() {
        home.address = address;
    }
    let updated = home.clone();
    let actor = state.actor.unwrap_or(updated.owner_id);
    audit(state, actor, "home.update", Some(updated.id.to_string()));
    ok(body_of(&updated))
}

fn delete_home(state: &mut State, id: &str) -> ApiResponse {
    let Some(position) = state.homes.iter().position(|h| h.id.to_string() == id) else {
        return error(404, "unknown home");
    };
    let removed = state.homes.remove(position);
    let actor = state.actor.unwrap_or(removed.owner_id);
    audit(state, actor, "home.delete", Some(removed.id.to_string()));
    ok(json!({ "deleted": true }))
}

fn list_rooms(state: &State, home_id: &str) -> ApiResponse {
    if !state.homes.iter().any(|h| h.id.to_string() == home_id) {
        return error(404, "unknown home");
    }
    let rooms: Vec<&Room> = state
        .rooms
        .iter()
        .filter(|r| r.home_id.to_string() == home_id)
        .collect();
    ok(body_of(&rooms))
}

fn list_audit(state: &State, request: &ApiRequest) -> ApiResponse {
    let action_filter = query_param(request, "action");
    let matching: Vec<&AuditLogEntry> = state
        .audit
        .iter()
        .filter(|e| action_filter.map_or(true, |a| e.action == a))
        .collect();
    ok(body_of(&matching))
}

fn overview(state: &State) -> haven_core::OverviewSummary {
    haven_core::OverviewSummary {
        homes: state.homes.len() as u64,
        devices: state.devices.len() as u64,
        devices_online: state
            .devices
            .iter()
            .filter(|d| d.status == DeviceStatus::Online)
            .count() as u64,
        open_alerts: state
            .alerts
            .iter()
            .filter(|a| a.status == AlertStatus::Open)
            .count() as u64,
        pending_requests: state
            .requests
            .iter()
            .filter(|r| !r.status.is_terminal())
            .count() as u64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn send(backend: &InMemoryBackend, request: ApiRequest) -> ApiResponse {
        backend.log.lock().push(request.clone());
        backend.route(&request)
    }

    #[test]
    fn test_unknown_path_is_404_with_detail() {
        let backend = InMemoryBackend::new();
        let response = send(&backend, ApiRequest::get("/nope"));
        assert_eq!(response.status, 404);
        assert_eq!(response.body["detail"], json!("not found"));
    }

    #[test]
    fn test_login_round_trip() {
        let backend = InMemoryBackend::new();
        let response = send(
            &backend,
            ApiRequest::post("/auth/login").with_body(json!({
                "email": "owner@haven.test",
                "password": PASSWORD,
            })),
        );
        assert_eq!(response.status, 200);
        assert_eq!(
            response.body["user"]["id"],
            json!(backend.fixtures().owner.id.to_string())
        );

        let response = send(
            &backend,
            ApiRequest::post("/auth/login").with_body(json!({
                "email": "owner@haven.test",
                "password": "wrong",
            })),
        );
        assert_eq!(response.status, 401);
    }

    #[test]
    fn test_empty_submission_is_rejected() {
        let backend = InMemoryBackend::new();
        let home_id = backend.fixtures().home.id;
        let response = send(
            &backend,
            ApiRequest::post("/owner/installation-requests")
                .with_body(json!({ "home_id": home_id, "items": [] })),
        );
        assert_eq!(response.status, 422);
    }

    #[test]
    fn test_item_transitions_enforce_state_machine() {
        let backend = InMemoryBackend::new();
        let fixture = backend.fixtures().request.clone();
        let pending = fixture.items[0].id;
        let rejected = fixture.items[2].id;

        let path = format!(
            "/tech/installation-requests/{}/items/{}",
            fixture.id, pending
        );
        let response = send(
            &backend,
            ApiRequest::patch(path).with_body(json!({ "action": "approve" })),
        );
        assert_eq!(response.status, 200);

        // Re-rejecting an already rejected item is a conflict.
        let path = format!(
            "/tech/installation-requests/{}/items/{}",
            fixture.id, rejected
        );
        let response = send(
            &backend,
            ApiRequest::patch(path).with_body(json!({ "action": "reject" })),
        );
        assert_eq!(response.status, 409);
    }

    #[test]
    fn test_approve_all_only_touches_pending() {
        let backend = InMemoryBackend::new();
        let fixture = backend.fixtures().request.clone();
        let response = send(
            &backend,
            ApiRequest::post(format!(
                "/tech/installation-requests/{}/approve-all",
                fixture.id
            )),
        );
        assert_eq!(response.status, 200);
        let updated = backend.installation_request(fixture.id).unwrap();
        assert_eq!(updated.pending_items(), 0);
        // The seeded rejection stays rejected.
        assert_eq!(updated.items[2].status, ItemStatus::Rejected);
    }

    #[test]
    fn test_home_and_device_writes_round_trip() {
        let backend = InMemoryBackend::new();
        let owner_id = backend.fixtures().owner.id;

        let response = send(
            &backend,
            ApiRequest::post("/admin/homes").with_body(json!({
                "name": "Lake House",
                "owner_id": owner_id,
            })),
        );
        assert_eq!(response.status, 201);
        let home_id = response.body["id"].as_str().unwrap().to_owned();

        let response = send(
            &backend,
            ApiRequest::post("/devices").with_body(json!({
                "home_id": home_id,
                "model": "HV-Leak 1",
            })),
        );
        assert_eq!(response.status, 201);
        assert_eq!(response.body["status"], json!("pending"));
        let device_id = response.body["id"].as_str().unwrap().to_owned();

        let response = send(
            &backend,
            ApiRequest::patch(format!("/devices/{device_id}"))
                .with_body(json!({ "model": "HV-Leak 2" })),
        );
        assert_eq!(response.status, 200);
        assert_eq!(response.body["model"], json!("HV-Leak 2"));

        let response = send(&backend, ApiRequest::delete(format!("/admin/homes/{home_id}")));
        assert_eq!(response.status, 200);
        assert_eq!(response.body["deleted"], json!(true));
    }

    #[test]
    fn test_wrong_actor_route_is_forbidden() {
        let backend = InMemoryBackend::new();
        let id = backend.fixtures().request.id;
        // Owner route attempting a technician-side action.
        let response = send(
            &backend,
            ApiRequest::patch(format!("/owner/installation-requests/{id}"))
                .with_body(json!({ "action": "plan_ready" })),
        );
        assert_eq!(response.status, 403);
    }
}
