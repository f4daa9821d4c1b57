/*!

Flits: the fixed-width pieces a packet is divided into for transport across
a channel. Grounded on
`original_source/common/network/components/router/performance/network_msg_types/{flit,flit_types/head_flit}.{h,cc}`.

*/

use crate::channel::{Endpoint,EndpointRoute};

/// Which position in its packet a flit occupies. A single-flit packet is
/// simultaneously head and tail; that case is represented as `HeadTail`
/// rather than forcing callers to special-case `is_head && is_tail`.
#[derive(Clone,Copy,Debug,PartialEq,Eq)]
pub enum FlitKind
{
	Head,
	HeadTail,
	Body,
	Tail,
}

impl FlitKind
{
	pub fn is_head(&self) -> bool
	{
		matches!(self, FlitKind::Head | FlitKind::HeadTail)
	}
	pub fn is_tail(&self) -> bool
	{
		matches!(self, FlitKind::Tail | FlitKind::HeadTail)
	}
}

/// Header information carried only by the head flit of a packet, per
/// `head_flit.h`. Body/tail flits reference this via `Flit::head_info`
/// rather than duplicating it, mirroring the original's class hierarchy
/// (`HeadFlit` derives from `Flit` and adds these fields).
#[derive(Clone,Debug)]
pub struct HeadFlitInfo
{
	/// The remaining endpoints this packet must still traverse, with a cursor
	/// at the current hop. Body/tail flits follow the same route once it has
	/// been fixed by the head flit's routing decision.
	pub route: EndpointRoute,
	/// Total number of flits in the packet this head flit introduces.
	pub packet_length_in_flits: usize,
	/// Whether this packet targets more than one output endpoint.
	pub is_multicast: bool,
}

/// A single flit in flight between two routers.
#[derive(Clone,Debug)]
pub struct Flit
{
	pub kind: FlitKind,
	/// Sequence number of this flit within its packet, starting at 0 at the head.
	pub index_in_packet: usize,
	/// Phit length of this flit. `1` for every flit under a flit-buffer
	/// policy; for a packet-buffer policy the single HEAD flit's length
	/// equals the packet's full serialization latency.
	pub length: u64,
	/// Present on head / head-tail flits; `None` on body/tail flits.
	pub head_info: Option<HeadFlitInfo>,
	/// Time (in the node's local clock) at which this flit entered its
	/// current buffer; used to compute queueing delay contributions.
	pub enqueue_time: u64,
	/// Running sum of router- and link-traversal delay this flit has
	/// accumulated so far, the supplemented `zero_load_delay` field from
	/// `flit.h`'s `_zero_load_delay` (see SPEC_FULL.md section B).
	pub zero_load_delay: u64,
	/// Filled in by the node on arrival, from the sender's router id via the
	/// input mapping.
	pub input_endpoint: Option<Endpoint>,
	/// Filled in by the flow-control scheme as the flit is routed toward an
	/// output channel.
	pub output_endpoint: Option<Endpoint>,
}

impl Flit
{
	pub fn new_head(index_in_packet: usize, route: EndpointRoute, packet_length_in_flits: usize, is_multicast: bool, enqueue_time: u64) -> Flit
	{
		let kind = if packet_length_in_flits == 1 { FlitKind::HeadTail } else { FlitKind::Head };
		Flit
		{
			kind,
			index_in_packet,
			length: 1,
			head_info: Some(HeadFlitInfo{ route, packet_length_in_flits, is_multicast }),
			enqueue_time,
			zero_load_delay: 0,
			input_endpoint: None,
			output_endpoint: None,
		}
	}
	pub fn new_body(index_in_packet: usize, enqueue_time: u64) -> Flit
	{
		Flit{ kind: FlitKind::Body, index_in_packet, length: 1, head_info: None, enqueue_time, zero_load_delay: 0, input_endpoint: None, output_endpoint: None }
	}
	pub fn new_tail(index_in_packet: usize, enqueue_time: u64) -> Flit
	{
		Flit{ kind: FlitKind::Tail, index_in_packet, length: 1, head_info: None, enqueue_time, zero_load_delay: 0, input_endpoint: None, output_endpoint: None }
	}
	/// Overrides the phit length; used by the packet-buffer policy to give a
	/// lone HEAD flit the whole packet's serialization latency as its length.
	pub fn with_length(mut self, length: u64) -> Flit
	{
		self.length = length;
		self
	}
	pub fn is_head(&self) -> bool
	{
		self.kind.is_head()
	}
	pub fn is_tail(&self) -> bool
	{
		self.kind.is_tail()
	}
	/// The output endpoint this flit is headed toward. Contract violation to
	/// call on a body/tail flit whose packet's head has not been consulted by
	/// the caller first; in this engine body/tail flits travel alongside a
	/// per-packet-buffer route kept by the flow-control scheme, so this
	/// accessor only applies to head flits.
	pub fn current_endpoint(&self) -> Endpoint
	{
		self.head_info.as_ref()
			.unwrap_or_else(|| panic!("current_endpoint called on a non-head flit (index_in_packet={})",self.index_in_packet))
			.route.current()
	}
	pub fn record_traversal_delay(&mut self, delay: u64)
	{
		self.zero_load_delay += delay;
	}
}

#[cfg(test)]
mod tests
{
	use super::*;

	#[test]
	fn single_flit_packet_is_head_and_tail()
	{
		let route = EndpointRoute::new(vec![Endpoint::specific(0,0)]);
		let flit = Flit::new_head(0,route,1,false,0);
		assert!(flit.is_head());
		assert!(flit.is_tail());
	}

	#[test]
	fn multi_flit_packet_head_is_not_tail()
	{
		let route = EndpointRoute::new(vec![Endpoint::specific(0,0)]);
		let head = Flit::new_head(0,route,3,false,0);
		assert!(head.is_head());
		assert!(!head.is_tail());
		let tail = Flit::new_tail(2,5);
		assert!(tail.is_tail());
		assert!(!tail.is_head());
	}
}
