use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::path::{self, FinishedPath, PathIssue};
use crate::space;

/// A position in normalized map space (see [`crate::space`]).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    /// Build a point coerced into map bounds.
    pub fn clamped(x: f64, y: f64) -> Self {
        Point {
            x: space::clamp_axis(x),
            y: space::clamp_axis(y),
        }
    }

    pub fn in_bounds(&self) -> bool {
        space::axis_in_bounds(self.x) && space::axis_in_bounds(self.y)
    }
}

pub type RoomId = String;
pub type ProjectId = String;

/// Backends disagree on numeric vs string ids; both are accepted and kept as text.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Num(i64),
    Str(String),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Num(n) => n.to_string(),
            RawId::Str(s) => s,
        }
    }
}

fn de_id<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    RawId::deserialize(d).map(String::from)
}

fn de_opt_id<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<RawId>::deserialize(d)?.map(String::from))
}

/// Room paths travel as `[[x, y], ...]`.
mod path_pairs {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::Point;

    pub fn serialize<S: Serializer>(path: &Option<Vec<Point>>, s: S) -> Result<S::Ok, S::Error> {
        match path {
            Some(points) => s.collect_seq(points.iter().map(|p| [p.x, p.y])),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Vec<Point>>, D::Error> {
        let raw: Option<Vec<[f64; 2]>> = Option::deserialize(d)?;
        Ok(raw.map(|pairs| pairs.into_iter().map(|[x, y]| Point { x, y }).collect()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomType {
    #[default]
    Classroom,
    Lab,
    Library,
    Auditorium,
    Restaurant,
    Office,
}

impl RoomType {
    pub const ALL: [RoomType; 6] = [
        RoomType::Classroom,
        RoomType::Lab,
        RoomType::Library,
        RoomType::Auditorium,
        RoomType::Restaurant,
        RoomType::Office,
    ];

    /// Wire identifier, also used as the `<option>` value in forms.
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomType::Classroom => "classroom",
            RoomType::Lab => "lab",
            RoomType::Library => "library",
            RoomType::Auditorium => "auditorium",
            RoomType::Restaurant => "restaurant",
            RoomType::Office => "office",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RoomType::Classroom => "Classroom",
            RoomType::Lab => "Lab",
            RoomType::Library => "Library",
            RoomType::Auditorium => "Auditorium",
            RoomType::Restaurant => "Restaurant",
            RoomType::Office => "Office",
        }
    }
}

impl fmt::Display for RoomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown room type: {0}")]
pub struct UnknownRoomType(pub String);

impl FromStr for RoomType {
    type Err = UnknownRoomType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RoomType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownRoomType(s.to_string()))
    }
}

/// Types outside the known set fall back to the default so one odd room
/// does not sink the whole list.
fn de_room_type<'de, D: Deserializer<'de>>(d: D) -> Result<RoomType, D::Error> {
    let Some(raw) = Option::<String>::deserialize(d)? else {
        return Ok(RoomType::default());
    };
    Ok(raw.parse().unwrap_or_else(|e: UnknownRoomType| {
        tracing::warn!(error = %e, "falling back to the default room type");
        RoomType::default()
    }))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    #[serde(alias = "_id", deserialize_with = "de_id")]
    pub id: RoomId,
    pub name: String,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub capacity: u32,
    #[serde(rename = "type", default, deserialize_with = "de_room_type")]
    pub room_type: RoomType,
    #[serde(default)]
    pub floor: String,
    #[serde(default)]
    pub building: String,
    #[serde(default)]
    pub amenities: BTreeSet<String>,
    #[serde(
        default,
        with = "path_pairs",
        skip_serializing_if = "Option::is_none"
    )]
    pub path: Option<Vec<Point>>,
}

impl Room {
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Stored navigation path, if it has at least one segment.
    pub fn route(&self) -> Option<&[Point]> {
        self.path.as_deref().filter(|p| p.len() >= 2)
    }

    /// Editable copy of this room, used to pre-fill the edit form.
    pub fn to_draft(&self) -> RoomDraft {
        RoomDraft {
            name: self.name.clone(),
            x: self.x,
            y: self.y,
            description: self.description.clone(),
            capacity: self.capacity,
            room_type: self.room_type,
            floor: self.floor.clone(),
            building: self.building.clone(),
            amenities: self.amenities.clone(),
            path: self.path.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RoomDraftError {
    #[error("Name is required")]
    MissingName,
    #[error("Building is required")]
    MissingBuilding,
    #[error("Capacity must be greater than zero")]
    ZeroCapacity,
    #[error("Position ({x:.1}, {y:.1}) is outside the map")]
    PositionOutOfBounds { x: f64, y: f64 },
    #[error("Path: {0}")]
    InvalidPath(PathIssue),
}

/// Body of `POST /api/room` and `PUT /api/room/:id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomDraft {
    pub name: String,
    pub x: f64,
    pub y: f64,
    pub description: String,
    pub capacity: u32,
    #[serde(rename = "type")]
    pub room_type: RoomType,
    pub floor: String,
    pub building: String,
    pub amenities: BTreeSet<String>,
    #[serde(
        default,
        with = "path_pairs",
        skip_serializing_if = "Option::is_none"
    )]
    pub path: Option<Vec<Point>>,
}

impl Default for RoomDraft {
    fn default() -> Self {
        RoomDraft {
            name: String::new(),
            x: space::MAP_CENTER.x,
            y: space::MAP_CENTER.y,
            description: String::new(),
            capacity: 1,
            room_type: RoomType::default(),
            floor: String::new(),
            building: String::new(),
            amenities: BTreeSet::new(),
            path: None,
        }
    }
}

impl RoomDraft {
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Attach a finished route; the room moves to the route's destination.
    pub fn apply_path(&mut self, path: FinishedPath) {
        let dest = path.destination();
        self.x = dest.x;
        self.y = dest.y;
        self.path = Some(path.into_points());
    }

    /// Move the room. A stored route that no longer ends at the room is dropped.
    pub fn set_position(&mut self, p: Point) {
        self.x = p.x;
        self.y = p.y;
        let ends_here = self
            .path
            .as_ref()
            .and_then(|pts| pts.last())
            .is_some_and(|end| space::distance(*end, p) < 1e-9);
        if self.path.is_some() && !ends_here {
            tracing::debug!("room moved off its route end, route dropped");
            self.path = None;
        }
    }

    /// Parse a comma-separated amenity list into the set, dropping blanks.
    pub fn set_amenities_from_text(&mut self, text: &str) {
        self.amenities = text
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
    }

    pub fn amenities_text(&self) -> String {
        self.amenities.iter().cloned().collect::<Vec<_>>().join(", ")
    }

    /// Check required fields and geometry. Every problem is reported, not just the first.
    pub fn validate(&self) -> Result<(), Vec<RoomDraftError>> {
        let mut errors = Vec::new();
        if self.name.trim().is_empty() {
            errors.push(RoomDraftError::MissingName);
        }
        if self.building.trim().is_empty() {
            errors.push(RoomDraftError::MissingBuilding);
        }
        if self.capacity == 0 {
            errors.push(RoomDraftError::ZeroCapacity);
        }
        if !self.position().in_bounds() {
            errors.push(RoomDraftError::PositionOutOfBounds {
                x: self.x,
                y: self.y,
            });
        }
        if let Some(points) = &self.path {
            let report = path::validate(points, &path::TracerConfig::default());
            errors.extend(report.errors.into_iter().map(RoomDraftError::InvalidPath));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(alias = "_id", deserialize_with = "de_id")]
    pub id: ProjectId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "de_opt_id")]
    pub room_id: Option<RoomId>,
}

/// Body of `POST /api/project` and `PUT /api/project/:id`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDraft {
    pub name: String,
    pub description: String,
    pub room_id: Option<RoomId>,
}

/// Projects attached to `room_id`, in server order.
pub fn projects_for_room<'a>(projects: &'a [Project], room_id: &str) -> Vec<&'a Project> {
    projects
        .iter()
        .filter(|p| p.room_id.as_deref() == Some(room_id))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    #[serde(other)]
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(deserialize_with = "de_id")]
    pub id: String,
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Bearer token plus the user it was issued to.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthSession {
    pub token: String,
    pub user: User,
}

impl AuthSession {
    pub fn is_admin(&self) -> bool {
        self.user.is_admin()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(alias = "accessToken")]
    pub token: String,
    pub user: User,
}

impl From<LoginResponse> for AuthSession {
    fn from(resp: LoginResponse) -> Self {
        AuthSession {
            token: resp.token,
            user: resp.user,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HealthStatus {
    #[serde(default)]
    pub status: String,
}

impl HealthStatus {
    pub fn is_ok(&self) -> bool {
        self.status.eq_ignore_ascii_case("ok") || self.status.eq_ignore_ascii_case("healthy")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_room_json() -> &'static str {
        r#"{"id":7,"name":"Lab 3","x":40.5,"y":22.0,"description":"Chemistry","capacity":30,
            "type":"lab","floor":"2","building":"B","amenities":["projector","sink"],
            "path":[[10.0,90.0],[40.5,22.0]]}"#
    }

    #[test]
    fn test_room_deserializes_numeric_id_and_path_pairs() {
        let room: Room = serde_json::from_str(sample_room_json()).unwrap();
        assert_eq!(room.id, "7");
        assert_eq!(room.room_type, RoomType::Lab);
        assert_eq!(room.amenities.len(), 2);
        let path = room.route().unwrap();
        assert_eq!(path.len(), 2);
        assert_eq!(path[1], Point::new(40.5, 22.0));
    }

    #[test]
    fn test_unknown_room_type_does_not_fail_the_list() {
        let json = r#"[
            {"id":1,"name":"Lab 1","x":10,"y":10,"type":"lab"},
            {"id":2,"name":"WC","x":20,"y":20,"type":"banheiro"},
            {"id":3,"name":"Hall","x":30,"y":30,"type":null}
        ]"#;
        let rooms: Vec<Room> = serde_json::from_str(json).unwrap();
        assert_eq!(rooms.len(), 3);
        assert_eq!(rooms[0].room_type, RoomType::Lab);
        assert_eq!(rooms[1].room_type, RoomType::default());
        assert_eq!(rooms[2].room_type, RoomType::default());
    }

    #[test]
    fn test_room_deserializes_minimal_payload() {
        let json = r#"{"_id":"abc","name":"Office","x":1,"y":2,"type":"office"}"#;
        let room: Room = serde_json::from_str(json).unwrap();
        assert_eq!(room.id, "abc");
        assert!(room.path.is_none());
        assert!(room.amenities.is_empty());
        assert_eq!(room.capacity, 0);
    }

    #[test]
    fn test_room_route_ignores_single_point_path() {
        let json = r#"{"id":1,"name":"A","x":1,"y":2,"type":"office","path":[[1,2]]}"#;
        let room: Room = serde_json::from_str(json).unwrap();
        assert!(room.route().is_none());
    }

    #[test]
    fn test_room_draft_serializes_wire_shape() {
        let mut draft = RoomDraft {
            name: "Library".into(),
            building: "Main".into(),
            room_type: RoomType::Library,
            ..RoomDraft::default()
        };
        draft.path = Some(vec![Point::new(1.0, 2.0), Point::new(3.0, 4.0)]);
        let json = serde_json::to_value(&draft).unwrap();
        assert_eq!(json["type"], "library");
        assert_eq!(json["path"][1][0], 3.0);
        assert_eq!(json["path"][1][1], 4.0);
        assert!(json.get("id").is_none());
    }

    #[test]
    fn test_room_draft_omits_missing_path() {
        let json = serde_json::to_value(RoomDraft::default()).unwrap();
        assert!(json.get("path").is_none());
    }

    #[test]
    fn test_room_type_from_str() {
        assert_eq!("Auditorium".parse::<RoomType>().unwrap(), RoomType::Auditorium);
        assert_eq!(" lab ".parse::<RoomType>().unwrap(), RoomType::Lab);
        assert!("gym".parse::<RoomType>().is_err());
    }

    #[test]
    fn test_draft_validate_reports_all_errors() {
        let draft = RoomDraft {
            capacity: 0,
            x: 120.0,
            ..RoomDraft::default()
        };
        let errors = draft.validate().unwrap_err();
        assert!(errors.contains(&RoomDraftError::MissingName));
        assert!(errors.contains(&RoomDraftError::MissingBuilding));
        assert!(errors.contains(&RoomDraftError::ZeroCapacity));
        assert!(errors
            .iter()
            .any(|e| matches!(e, RoomDraftError::PositionOutOfBounds { .. })));
    }

    #[test]
    fn test_draft_validate_rejects_short_path() {
        let draft = RoomDraft {
            name: "X".into(),
            building: "B".into(),
            path: Some(vec![Point::new(5.0, 5.0)]),
            ..RoomDraft::default()
        };
        let errors = draft.validate().unwrap_err();
        assert!(matches!(errors[0], RoomDraftError::InvalidPath(_)));
    }

    #[test]
    fn test_draft_validate_ok() {
        let draft = RoomDraft {
            name: "X".into(),
            building: "B".into(),
            ..RoomDraft::default()
        };
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn test_moving_a_routed_room_drops_the_route() {
        let mut draft = RoomDraft {
            x: 40.0,
            y: 20.0,
            path: Some(vec![Point::new(10.0, 90.0), Point::new(40.0, 20.0)]),
            ..RoomDraft::default()
        };
        draft.set_position(Point::new(40.0, 20.0));
        assert_eq!(draft.path.as_ref().map(Vec::len), Some(2));

        draft.set_position(Point::new(60.0, 60.0));
        assert_eq!(draft.position(), Point::new(60.0, 60.0));
        assert!(draft.path.is_none());
    }

    #[test]
    fn test_amenities_text_roundtrip_drops_blanks() {
        let mut draft = RoomDraft::default();
        draft.set_amenities_from_text(" wifi, ,projector,wifi ");
        assert_eq!(draft.amenities.len(), 2);
        assert_eq!(draft.amenities_text(), "projector, wifi");
    }

    #[test]
    fn test_user_deserializes_nome_and_role() {
        let json = r#"{"id":3,"nome":"Ana","email":"ana@campus.edu","role":"admin"}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.name, "Ana");
        assert!(user.is_admin());
    }

    #[test]
    fn test_unknown_role_is_user() {
        let json = r#"{"id":"u1","nome":"Bo","email":"b@c.d","role":"guest"}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.role, Role::User);
    }

    #[test]
    fn test_register_request_uses_nome() {
        let req = RegisterRequest {
            name: "Ana".into(),
            email: "a@b.c".into(),
            password: "x".into(),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["nome"], "Ana");
    }

    #[test]
    fn test_project_room_id_accepts_number() {
        let json = r#"{"id":1,"name":"Robotics","roomId":7}"#;
        let project: Project = serde_json::from_str(json).unwrap();
        assert_eq!(project.room_id.as_deref(), Some("7"));
    }

    #[test]
    fn test_projects_for_room() {
        let projects: Vec<Project> = serde_json::from_str(
            r#"[{"id":1,"name":"A","roomId":"7"},{"id":2,"name":"B"},{"id":3,"name":"C","roomId":"7"}]"#,
        )
        .unwrap();
        let names: Vec<&str> = projects_for_room(&projects, "7")
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, vec!["A", "C"]);
    }

    #[test]
    fn test_health_status() {
        let h: HealthStatus = serde_json::from_str(r#"{"status":"OK"}"#).unwrap();
        assert!(h.is_ok());
        let h: HealthStatus = serde_json::from_str("{}").unwrap();
        assert!(!h.is_ok());
    }
}
