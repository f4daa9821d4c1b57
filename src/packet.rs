/*!

The wire-level packet type exchanged between a `NetworkNode` and its
callers. Grounded on `original_source/common/network/components/network_node.h`'s
`NetPacket` usage and `router/performance/network_msg.h` (the internal
message payload a `NetPacket` carries while inside the router engine).

*/

use crate::buffer_management_msg::BufferManagementMsg;
use crate::flit::Flit;

/// Selects which engine instance (traffic class) a packet belongs to.
/// Opaque to this crate beyond equality/ordering; callers assign meaning.
pub type PacketType = u32;

/// The payload a `NetPacket` carries while it is inside the router engine.
/// `original_source` represents this as a `NetworkMsg` base class with two
/// concrete subclasses (`Flit`, `BufferManagementMsg`); here it is a tagged
/// union instead, per `spec.md` §9's guidance on heterogeneous variants.
#[derive(Clone,Debug)]
pub enum Payload
{
	Flit(Flit),
	BufferManagement(BufferManagementMsg),
}

impl Payload
{
	pub fn as_flit(&self) -> Option<&Flit>
	{
		match self
		{
			Payload::Flit(flit) => Some(flit),
			Payload::BufferManagement(_) => None,
		}
	}
	pub fn as_flit_mut(&mut self) -> Option<&mut Flit>
	{
		match self
		{
			Payload::Flit(flit) => Some(flit),
			Payload::BufferManagement(_) => None,
		}
	}
	pub fn as_buffer_management(&self) -> Option<&BufferManagementMsg>
	{
		match self
		{
			Payload::BufferManagement(msg) => Some(msg),
			Payload::Flit(_) => None,
		}
	}
}

/// A packet crossing the engine boundary. Carries the fields `spec.md` §6
/// lists as read by, or written by, the engine.
#[derive(Clone,Debug)]
pub struct NetPacket
{
	/// Wall-clock injection/arrival time, monotone across a single channel.
	pub time: u64,
	/// Sending router's core id.
	pub sender: usize,
	/// Receiving router's core id.
	pub receiver: usize,
	/// Selects which engine instance should process this packet.
	pub packet_type: PacketType,
	pub data: Payload,
	/// False for every payload the engine itself produces or consumes;
	/// propagated unchanged, never interpreted by the engine.
	pub is_raw: bool,
	/// Propagated but not interpreted by the engine.
	pub sequence_num: u64,
	/// Routing hint propagated unchanged, opaque to the engine.
	pub specific: Option<u64>,
}

impl NetPacket
{
	pub fn new_flit(time: u64, sender: usize, receiver: usize, packet_type: PacketType, flit: Flit, sequence_num: u64, specific: Option<u64>) -> NetPacket
	{
		NetPacket{ time, sender, receiver, packet_type, data: Payload::Flit(flit), is_raw: false, sequence_num, specific }
	}
	pub fn new_buffer_management(time: u64, sender: usize, receiver: usize, packet_type: PacketType, msg: BufferManagementMsg, sequence_num: u64, specific: Option<u64>) -> NetPacket
	{
		NetPacket{ time, sender, receiver, packet_type, data: Payload::BufferManagement(msg), is_raw: false, sequence_num, specific }
	}
}
