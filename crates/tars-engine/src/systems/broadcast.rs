//! IFF broadcast of surviving contacts to allied consumers.

use tars_assess::iff;
use tars_assess::weapon::Weapon;
use tars_core::types::IffTuple;

use super::scan::ContactSet;

/// Outbound mesh transport.
pub trait BroadcastSink {
    fn broadcast(&mut self, channel: &str, payload: IffTuple);
}

/// Collects broadcasts in memory.
impl BroadcastSink for Vec<(String, IffTuple)> {
    fn broadcast(&mut self, channel: &str, payload: IffTuple) {
        self.push((channel.to_string(), payload));
    }
}

/// Drops every broadcast.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl BroadcastSink for NullSink {
    fn broadcast(&mut self, _channel: &str, _payload: IffTuple) {}
}

/// Send one IFF tuple per contact. A contact is marked locked when any
/// registered weapon is currently targeting it. Returns the number sent.
pub fn run(
    contacts: &ContactSet,
    weapons: &[Box<dyn Weapon>],
    channel: &str,
    sink: &mut dyn BroadcastSink,
) -> usize {
    for threat in contacts.values() {
        let locked = weapons.iter().any(|w| w.is_targeting(threat.id()));
        sink.broadcast(channel, iff::encode(threat.snapshot(), locked));
    }
    contacts.len()
}
