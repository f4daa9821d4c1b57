/*!

Flow-control schemes: the state machines wiring incoming flits to downstream
allocation attempts. Grounded on
`original_source/common/network/components/router/performance/{flow_control_scheme,network_msg}.h`.

Four concrete variants share the `FlowControlScheme` trait contract; see
`wormhole`, `wormhole_vct_broadcast` and `packet_buffer` (shared by
store-and-forward and virtual cut-through).

*/

pub mod wormhole;
pub mod wormhole_vct_broadcast;
pub mod packet_buffer;

use crate::buffer_management_msg::BufferManagementMsg;
use crate::channel::{Endpoint,EndpointRoute};
use crate::flit::Flit;

/// One of the four schemes named in `spec.md` §6.
#[derive(Clone,Copy,Debug,PartialEq,Eq)]
pub enum FlowControlSchemeKind
{
	StoreAndForward,
	VirtualCutThrough,
	Wormhole,
	WormholeUnicastVctBroadcast,
}

impl FlowControlSchemeKind
{
	/// Mirrors `FlowControlScheme::parse` in `original_source`.
	pub fn parse(name: &str) -> Result<FlowControlSchemeKind,crate::error::Error>
	{
		match name
		{
			"store_and_forward" => Ok(FlowControlSchemeKind::StoreAndForward),
			"virtual_cut_through" => Ok(FlowControlSchemeKind::VirtualCutThrough),
			"wormhole" => Ok(FlowControlSchemeKind::Wormhole),
			"wormhole_unicast__virtual_cut_through_broadcast" => Ok(FlowControlSchemeKind::WormholeUnicastVctBroadcast),
			_ => Err(crate::error!(unknown_flow_control_scheme, name.to_string())),
		}
	}
}

/// One unit of work the owning `NetworkNode` must still turn into an
/// outbound wire packet: either a data flit bound for `output_endpoint`, or a
/// buffer-management message travelling back upstream to `input_endpoint`.
#[derive(Clone,Debug)]
pub enum EngineOutput
{
	Flit{ output_endpoint: Endpoint, flit: Flit },
	BufferManagement{ input_endpoint: Endpoint, msg: BufferManagementMsg },
}

/// Shared contract of all four concrete schemes (`spec.md` §4.2-§4.6). A
/// small trait object rather than an enum-of-methods, per the guidance in
/// `spec.md` §9 on heterogeneous variants.
pub trait FlowControlScheme
{
	/// A data flit has arrived on `input_endpoint`. Enqueues it and runs the
	/// draining fixed point, returning whatever it was able to emit.
	fn process_data_msg(&mut self, input_endpoint: Endpoint, flit: Flit) -> Vec<EngineOutput>;

	/// A buffer-management message has arrived concerning `output_endpoint`.
	/// Updates downstream state and re-runs the draining fixed point.
	fn process_buffer_management_msg(&mut self, output_endpoint: Endpoint, msg: BufferManagementMsg) -> Vec<EngineOutput>;
}

/// Packet division under the flit-buffer policy (`spec.md` §4.1, wormhole
/// family): `N` distinct flits, one HEAD, `N-2` BODY, one TAIL; a single-flit
/// packet sets both bits via `FlitKind::HeadTail`.
pub fn divide_packet_flit_buffer(serialization_length: usize, route: EndpointRoute, entry_time: u64, is_multicast: bool) -> Vec<Flit>
{
	assert!(serialization_length >= 1, "a packet must divide into at least one flit");
	let mut flits = Vec::with_capacity(serialization_length);
	flits.push(Flit::new_head(0, route, serialization_length, is_multicast, entry_time));
	for index in 1..serialization_length.saturating_sub(1)
	{
		flits.push(Flit::new_body(index, entry_time));
	}
	if serialization_length > 1
	{
		flits.push(Flit::new_tail(serialization_length - 1, entry_time));
	}
	flits
}

/// Packet division under the packet-buffer policy (`spec.md` §4.1,
/// store-and-forward / virtual cut-through): a single HEAD flit whose length
/// equals the packet's serialization latency. Store-and-forward adds
/// `serialization_length - 1` to the entry time, serializing the whole
/// packet at the upstream router before it can depart; virtual cut-through
/// lets it depart as soon as the first flit could.
pub fn divide_packet_packet_buffer(serialization_length: usize, route: EndpointRoute, entry_time: u64, is_multicast: bool, is_store_and_forward: bool) -> Flit
{
	assert!(serialization_length >= 1, "a packet must divide into at least one flit");
	let adjusted_entry_time = if is_store_and_forward { entry_time + (serialization_length as u64 - 1) } else { entry_time };
	Flit::new_head(0, route, 1, is_multicast, adjusted_entry_time).with_length(serialization_length as u64)
}
