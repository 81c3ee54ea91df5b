use crate::models::{Point, Room, RoomType};

/// Search box and filter dropdowns of the room list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoomFilter {
    pub query: String,
    pub room_type: Option<RoomType>,
    pub building: Option<String>,
    pub floor: Option<String>,
}

impl RoomFilter {
    pub fn is_active(&self) -> bool {
        !self.query.trim().is_empty()
            || self.room_type.is_some()
            || self.building.is_some()
            || self.floor.is_some()
    }

    pub fn matches(&self, room: &Room) -> bool {
        if let Some(t) = self.room_type {
            if room.room_type != t {
                return false;
            }
        }
        if let Some(b) = &self.building {
            if !room.building.trim().eq_ignore_ascii_case(b.trim()) {
                return false;
            }
        }
        if let Some(f) = &self.floor {
            if room.floor.trim() != f.trim() {
                return false;
            }
        }

        let query = self.query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        let contains = |s: &str| s.to_lowercase().contains(&query);
        contains(room.name.as_str())
            || contains(room.description.as_str())
            || contains(room.building.as_str())
            || room.amenities.iter().any(|a| contains(a.as_str()))
    }

    /// Matching rooms, sorted by name.
    pub fn apply<'a>(&self, rooms: &'a [Room]) -> Vec<&'a Room> {
        let mut out: Vec<&Room> = rooms.iter().filter(|r| self.matches(r)).collect();
        out.sort_by_key(|r| r.name.to_lowercase());
        out
    }
}

/// Distinct, sorted building names for the filter dropdown.
pub fn buildings(rooms: &[Room]) -> Vec<String> {
    let mut out: Vec<String> = rooms
        .iter()
        .map(|r| r.building.trim().to_string())
        .filter(|b| !b.is_empty())
        .collect();
    out.sort();
    out.dedup();
    out
}

/// Distinct, sorted floor labels for the filter dropdown.
pub fn floors(rooms: &[Room]) -> Vec<String> {
    let mut out: Vec<String> = rooms
        .iter()
        .map(|r| r.floor.trim().to_string())
        .filter(|f| !f.is_empty())
        .collect();
    out.sort();
    out.dedup();
    out
}

/// The stored route worth drawing: the selected room's, or, with nothing
/// selected, the only room left by an active filter.
pub fn relevant_route<'a>(
    selected: Option<&'a Room>,
    filtered: &[&'a Room],
    filter_active: bool,
) -> Option<&'a [Point]> {
    match selected {
        Some(room) => room.route(),
        None if filter_active && filtered.len() == 1 => filtered[0].route(),
        None => None,
    }
}
