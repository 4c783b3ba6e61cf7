//! Body compilation from fixed and repeated part lists

use crate::core::types::BodyPart;
use crate::production::CreepDefinition;
use crate::world::Room;

/// Compile a body for `definition` within the room's available energy
///
/// The fixed parts always come first and must be affordable on their own.
/// The multi parts are then repeated as often as energy, `max_parts` and the
/// definition's `max_multi` allow. Returns an empty body when the room cannot
/// afford anything useful.
pub fn compile_body(room: &Room, definition: &CreepDefinition, max_parts: usize) -> Vec<BodyPart> {
    let budget = room.energy_available;
    if budget < definition.min_abs_energy_available {
        return Vec::new();
    }

    let fixed_cost = BodyPart::body_cost(&definition.fixed_body);
    if fixed_cost > budget || definition.fixed_body.len() > max_parts {
        return Vec::new();
    }

    let mut body = definition.fixed_body.clone();
    let multi_cost = BodyPart::body_cost(&definition.multi_body);
    if definition.multi_body.is_empty() || multi_cost == 0 {
        return body;
    }

    let affordable = (budget - fixed_cost) / multi_cost;
    let room_for = (max_parts - body.len()) / definition.multi_body.len();
    let repeats = (affordable as usize)
        .min(room_for)
        .min(definition.max_multi.map_or(usize::MAX, |m| m as usize));

    for _ in 0..repeats {
        body.extend_from_slice(&definition.multi_body);
    }
    body
}
