//! Message fan-out with per-recipient failure isolation.

use tracing::{debug, warn};

use crate::state::{ConnectionId, RoomId, RoomRegistry};

/// Deliver `message` to every member of `room` except `sender`.
///
/// A recipient whose queue is gone is dead: it is evicted from the registry
/// on the spot and delivery continues with the remaining members. Nothing is
/// reported back to the sender. The whole operation is a non-blocking
/// enqueue; actual socket writes happen in each recipient's writer task.
pub fn broadcast(registry: &RoomRegistry, room: &RoomId, message: &str, sender: ConnectionId) {
    let mut delivered = 0usize;
    for member in registry.snapshot(room) {
        if member.id() == sender {
            continue;
        }
        if member.send(message.to_owned()).is_ok() {
            delivered += 1;
        } else {
            warn!(%room, connection = %member.id(), "evicting unreachable room member");
            registry.leave(room, member.id());
        }
    }
    debug!(%room, delivered, "broadcast complete");
}
