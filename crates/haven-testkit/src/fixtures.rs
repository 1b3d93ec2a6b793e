//! Seeded fixture data
//!
//! One home with three rooms, a user per role, a couple of devices and
//! alerts, and an installation request mid-review with items in every
//! non-terminal status. Ids are generated per seed; tests read them back
//! from the [`Fixtures`] struct instead of hard-coding.

use haven_core::{
    Alert, AlertId, AlertStatus, CoverageType, Device, DeviceId, DeviceStatus, Home, HomeId,
    InstallationItem, InstallationRequest, ItemId, ItemStatus, RequestId, RequestStatus, Role,
    Room, RoomId, User, UserId,
};

/// The one password every seeded account accepts.
pub const PASSWORD: &str = "haven-dev-password";

/// Base timestamp for seeded entities, in unix milliseconds.
pub(crate) const SEED_CLOCK: u64 = 1_700_000_000_000;

/// The seeded world an [`InMemoryBackend`](crate::InMemoryBackend) starts
/// from.
#[derive(Debug, Clone)]
pub struct Fixtures {
    /// Home owner, assigned to [`Fixtures::home`]
    pub owner: User,
    /// Installation technician
    pub technician: User,
    /// Operations staff
    pub staff: User,
    /// Platform admin
    pub admin: User,
    /// The seeded home
    pub home: Home,
    /// Three rooms in the seeded home
    pub rooms: Vec<Room>,
    /// Two devices, one online and one offline
    pub devices: Vec<Device>,
    /// Two alerts, one open and one acknowledged
    pub alerts: Vec<Alert>,
    /// A request in review with pending, approved, and rejected items
    pub request: InstallationRequest,
}

impl Fixtures {
    /// Build a fresh fixture set with new ids.
    pub fn seed() -> Self {
        let home_id = HomeId::new();

        let owner = User {
            id: UserId::new(),
            email: "owner@haven.test".into(),
            name: Some("Olive Owner".into()),
            role: Some(Role::Owner),
            home_id: Some(home_id),
            picture_url: None,
        };
        let technician = User {
            id: UserId::new(),
            email: "tech@haven.test".into(),
            name: Some("Terry Tech".into()),
            role: Some(Role::Technician),
            home_id: None,
            picture_url: None,
        };
        let staff = User {
            id: UserId::new(),
            email: "staff@haven.test".into(),
            name: Some("Sam Staff".into()),
            role: Some(Role::Staff),
            home_id: None,
            picture_url: None,
        };
        let admin = User {
            id: UserId::new(),
            email: "admin@haven.test".into(),
            name: Some("Ada Admin".into()),
            role: Some(Role::Admin),
            home_id: None,
            picture_url: None,
        };

        let home = Home {
            id: home_id,
            name: "Maple Street 12".into(),
            address: Some("12 Maple Street".into()),
            owner_id: owner.id,
        };

        let rooms: Vec<Room> = ["Living Room", "Kitchen", "Garage"]
            .into_iter()
            .map(|name| Room {
                id: RoomId::new(),
                home_id,
                name: name.into(),
            })
            .collect();

        let devices = vec![
            Device {
                id: DeviceId::new(),
                home_id,
                room_id: Some(rooms[0].id),
                model: "HV-Cam 2".into(),
                status: DeviceStatus::Online,
                last_heartbeat: Some(SEED_CLOCK),
            },
            Device {
                id: DeviceId::new(),
                home_id,
                room_id: Some(rooms[1].id),
                model: "HV-Smoke 1".into(),
                status: DeviceStatus::Offline,
                last_heartbeat: Some(SEED_CLOCK - 3_600_000),
            },
        ];

        let alerts = vec![
            Alert {
                id: AlertId::new(),
                home_id,
                device_id: Some(devices[0].id),
                kind: "intrusion".into(),
                status: AlertStatus::Open,
                message: "Motion detected while armed".into(),
                created_at: SEED_CLOCK,
            },
            Alert {
                id: AlertId::new(),
                home_id,
                device_id: Some(devices[1].id),
                kind: "smoke".into(),
                status: AlertStatus::Acknowledged,
                message: "Smoke sensor self-test failed".into(),
                created_at: SEED_CLOCK - 7_200_000,
            },
        ];

        // Mid-review request: one item per reviewable status plus a second
        // pending one, so approve-all has a mixed field to work on.
        let request = InstallationRequest {
            id: RequestId::new(),
            home_id,
            owner_id: owner.id,
            technician_id: Some(technician.id),
            status: RequestStatus::InReview,
            notes: Some("Prioritize the garage".into()),
            items: vec![
                item(rooms[0].id, CoverageType::Full, 2, ItemStatus::Pending),
                item(rooms[1].id, CoverageType::Safety, 1, ItemStatus::Approved),
                item(rooms[2].id, CoverageType::Intrusion, 1, ItemStatus::Rejected),
                item(rooms[2].id, CoverageType::Environmental, 1, ItemStatus::Pending),
            ],
        };

        Self {
            owner,
            technician,
            staff,
            admin,
            home,
            rooms,
            devices,
            alerts,
            request,
        }
    }

    /// Every seeded user, in a stable order.
    pub fn users(&self) -> Vec<User> {
        vec![
            self.owner.clone(),
            self.technician.clone(),
            self.staff.clone(),
            self.admin.clone(),
        ]
    }
}

fn item(
    room_id: RoomId,
    coverage_type: CoverageType,
    desired_device_count: u32,
    status: ItemStatus,
) -> InstallationItem {
    InstallationItem {
        id: ItemId::new(),
        room_id: Some(room_id),
        coverage_type,
        desired_device_count,
        notes: None,
        status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_is_internally_consistent() {
        let f = Fixtures::seed();
        assert_eq!(f.home.owner_id, f.owner.id);
        assert_eq!(f.owner.home_id, Some(f.home.id));
        assert!(f.rooms.iter().all(|r| r.home_id == f.home.id));
        assert_eq!(f.request.home_id, f.home.id);
        assert_eq!(f.request.pending_items(), 2);
    }
}
