//! Spawn room search over the world grid
//!
//! Candidates are visited in a square spiral around the target room. Each
//! eligible room is scored by route distance, plus a penalty for a low
//! controller level and one for a long spawn queue; the lowest score wins.

use crate::production::RoomParams;
use crate::world::{Room, RoomCoord, XyIterator};

/// Highest controller level
const MAX_RCL: u32 = 8;

/// What the locator needs to know about a candidate room
pub trait SpawnCandidates {
    fn candidate(&self, name: &str) -> Option<&Room>;

    fn has_spawn(&self, room: &str) -> bool;

    /// Every room able to produce
    fn spawn_rooms(&self) -> Vec<&Room>;
}

fn eligible(room: &Room, params: &RoomParams) -> bool {
    room.controller_level >= params.min_rcl
        && room.energy_available >= params.min_energy_available
        && room.energy_capacity >= params.min_energy_capacity
        && (params.allow_target_room || params.target_room.as_deref() != Some(room.name.as_str()))
}

fn score(room: &Room, distance: u32, params: &RoomParams) -> f64 {
    let rcl_penalty =
        MAX_RCL.saturating_sub(room.controller_level as u32) as f64 / params.range_rcl_ratio.max(1) as f64;
    let queue_penalty = room.queued_count() as f64 / params.range_queue_ratio.max(1) as f64;
    distance as f64 + rcl_penalty + queue_penalty
}

/// Nearest eligible production room for `params`
pub fn find_spawn_room<C: SpawnCandidates + ?Sized>(
    candidates: &C,
    params: &RoomParams,
) -> Option<String> {
    let target = params
        .target_room
        .as_deref()
        .and_then(|name| name.parse::<RoomCoord>().ok());

    let Some(target) = target else {
        // Nothing to measure against: rank on room quality alone
        return candidates
            .spawn_rooms()
            .into_iter()
            .filter(|room| eligible(room, params))
            .map(|room| (score(room, 0, params), room))
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, room)| room.name.clone());
    };

    let farthest = candidates
        .spawn_rooms()
        .iter()
        .filter_map(|room| room.name.parse::<RoomCoord>().ok())
        .map(|coord| coord.distance(&target))
        .max()?;
    let limit = farthest.min(params.max_range);

    let mut best: Option<(f64, &Room)> = None;
    for (x, y) in XyIterator::new(target.x, target.y) {
        let coord = RoomCoord::new(x, y);
        let distance = coord.distance(&target);
        if distance > limit {
            break;
        }
        // Penalties are never negative, so farther rings cannot win
        if best.is_some_and(|(score, _)| distance as f64 > score) {
            break;
        }

        let name = coord.name();
        let Some(room) = candidates.candidate(&name) else {
            continue;
        };
        if !candidates.has_spawn(&name) || !eligible(room, params) {
            continue;
        }

        let room_score = score(room, distance, params);
        if best.map_or(true, |(s, _)| room_score < s) {
            best = Some((room_score, room));
        }
    }

    best.map(|(_, room)| room.name.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    struct Rooms(BTreeMap<String, Room>);

    impl Rooms {
        fn new(rooms: Vec<Room>) -> Self {
            Rooms(rooms.into_iter().map(|r| (r.name.clone(), r)).collect())
        }
    }

    impl SpawnCandidates for Rooms {
        fn candidate(&self, name: &str) -> Option<&Room> {
            self.0.get(name)
        }

        fn has_spawn(&self, room: &str) -> bool {
            self.0.contains_key(room)
        }

        fn spawn_rooms(&self) -> Vec<&Room> {
            self.0.values().collect()
        }
    }

    #[test]
    fn test_nearest_room_wins() {
        let rooms = Rooms::new(vec![Room::new("W1N1", 5, 1800), Room::new("W5N1", 5, 1800)]);
        let params = RoomParams::targeting("W2N1");
        assert_eq!(find_spawn_room(&rooms, &params).as_deref(), Some("W1N1"));
    }

    #[test]
    fn test_target_room_excluded_unless_allowed() {
        let rooms = Rooms::new(vec![Room::new("W1N1", 5, 1800), Room::new("W3N1", 5, 1800)]);

        let params = RoomParams::targeting("W1N1");
        assert_eq!(find_spawn_room(&rooms, &params).as_deref(), Some("W3N1"));

        let params = RoomParams::targeting("W1N1").allowing_target_room();
        assert_eq!(find_spawn_room(&rooms, &params).as_deref(), Some("W1N1"));
    }

    #[test]
    fn test_max_range_and_rcl_filters() {
        let rooms = Rooms::new(vec![Room::new("W1N1", 2, 550), Room::new("W6N1", 7, 5600)]);

        let params = RoomParams::targeting("W2N1").with_min_rcl(4);
        assert_eq!(find_spawn_room(&rooms, &params).as_deref(), Some("W6N1"));

        let params = RoomParams::targeting("W2N1").with_min_rcl(4).with_max_range(3);
        assert_eq!(find_spawn_room(&rooms, &params), None);
    }

    #[test]
    fn test_controller_level_breaks_distance_ties() {
        // Equal distance; the level 8 room carries no penalty
        let rooms = Rooms::new(vec![Room::new("W1N1", 3, 800), Room::new("W3N1", 8, 12_900)]);
        let params = RoomParams::targeting("W2N1");
        assert_eq!(find_spawn_room(&rooms, &params).as_deref(), Some("W3N1"));
    }

    #[test]
    fn test_no_target_room_ranks_by_quality() {
        let rooms = Rooms::new(vec![Room::new("W1N1", 3, 800), Room::new("E9S9", 6, 2300)]);
        assert_eq!(
            find_spawn_room(&rooms, &RoomParams::default()).as_deref(),
            Some("E9S9")
        );
    }

    #[test]
    fn test_no_candidates() {
        let rooms = Rooms::new(Vec::new());
        assert_eq!(find_spawn_room(&rooms, &RoomParams::targeting("W1N1")), None);
    }
}
