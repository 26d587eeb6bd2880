use core::fmt;

use crumbs_wire::WireIter;

/// Size of a serialized [`Message`] in bytes.
pub const SIZE: usize = 28;

/// Number of payload slots carried by every message.
pub const DATA_LEN: usize = 6;

/// The unit of communication between controller and peripherals.
///
/// Serialized as `slice_id`, `type_id`, `command_type`, the six `data`
/// floats, then `error_flags`, with no padding. Floats are IEEE-754
/// single precision, little-endian.
///
/// Decoding never inspects field values: any 28 bytes form a message.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, crumbs_wire::WireIter, crumbs_wire::WireBuf,
)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Message {
    /// Logical sub-unit on the target node.
    pub slice_id: u8,
    /// Module or category of the target.
    pub type_id: u8,
    /// Action or request kind.
    pub command_type: u8,
    /// Payload. Unused slots are zero.
    pub data: [f32; DATA_LEN],
    /// Status bitfield, 0 means no error.
    pub error_flags: u8,
}

// the wire layout is fixed, catch any drift in the field list
const _: () = assert!(<Message as WireIter>::SIZE == SIZE);

impl Message {
    /// A message with every field zeroed.
    pub const fn zeroed() -> Self {
        Self {
            slice_id: 0,
            type_id: 0,
            command_type: 0,
            data: [0.0; DATA_LEN],
            error_flags: 0,
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "slice={} type={} command={} data={:?} flags={:#04x}",
            self.slice_id, self.type_id, self.command_type, self.data, self.error_flags
        )
    }
}

/// A message paired with the bus address it is bound for.
///
/// Lives only as long as the send or request that uses it.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Addressed {
    pub address: u8,
    pub message: Message,
}
