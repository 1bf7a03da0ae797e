//! IFF broadcast encoding.

use tars_core::constants::*;
use tars_core::enums::{ContactKind, Relationship};
use tars_core::types::{ContactSnapshot, IffTuple};

/// Encode a contact into the compact friend-or-foe tuple.
///
/// Flag bits are additive. Unknown or neutral relationships and unknown kinds
/// contribute nothing. The squared radius is not computed here and is always 0.0.
pub fn encode(contact: &ContactSnapshot, locked: bool) -> IffTuple {
    IffTuple {
        flags: flags_for(contact.relationship, contact.kind, locked),
        id: contact.id,
        position: contact.position,
        radius_squared: 0.0,
    }
}

pub fn flags_for(relationship: Relationship, kind: ContactKind, locked: bool) -> u8 {
    let mut flags = IFF_FLAGS_NEUTRAL;
    flags |= match relationship {
        Relationship::Hostile => IFF_FLAG_ENEMY,
        Relationship::Friendly => IFF_FLAG_FRIENDLY,
        Relationship::Neutral | Relationship::Unknown => 0,
    };
    if locked {
        flags |= IFF_FLAG_LOCKED;
    }
    flags |= match kind {
        ContactKind::LargePlatform => IFF_FLAG_LARGE_PLATFORM,
        ContactKind::SmallPlatform => IFF_FLAG_SMALL_PLATFORM,
        ContactKind::GuidedMunition => IFF_FLAG_GUIDED_MUNITION,
        ContactKind::NaturalObject => IFF_FLAG_NATURAL_OBJECT,
        ContactKind::Unknown => 0,
    };
    flags
}
