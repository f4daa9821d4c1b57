/*!

Router identifiers and channel endpoints. Grounded on
`original_source/common/network/components/router/performance/channel.h`
(the `Channel::Endpoint` pair with its `ALL` sentinel) and
`original_source/common/network/components/network_node.h` (`Router::Id`).

Per `spec.md` §9 the `Channel::Endpoint::ALL` sentinel is expressed as a sum
type rather than a magic index, so the broadcast path in the buffer-status
and network-node logic is statically obvious instead of relying on a
reserved integer.

*/

use std::cmp::Ordering;

/// `(core_id, index)`: names the tile (`core_id`) and disambiguates multiple
/// routers per tile (`index`). Total order by `(core_id, index)`.
#[derive(Clone,Copy,Debug,PartialEq,Eq,Hash,PartialOrd,Ord)]
pub struct RouterId
{
	pub core_id: usize,
	pub index: usize,
}

impl RouterId
{
	pub fn new(core_id: usize, index: usize) -> RouterId
	{
		RouterId{ core_id, index }
	}
}

impl std::fmt::Display for RouterId
{
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result
	{
		write!(f,"({},{})",self.core_id,self.index)
	}
}

/// One side of a channel at a router: `(channel_id, sub_index)`.
/// `Broadcast(channel_id)` is the `ALL` sentinel of the original model,
/// meaning "every sub-endpoint of this channel".
#[derive(Clone,Copy,Debug,PartialEq,Eq,Hash)]
pub enum Endpoint
{
	Specific{ channel_id: usize, sub_index: usize },
	Broadcast{ channel_id: usize },
}

impl Endpoint
{
	pub fn specific(channel_id: usize, sub_index: usize) -> Endpoint
	{
		Endpoint::Specific{ channel_id, sub_index }
	}
	pub fn broadcast(channel_id: usize) -> Endpoint
	{
		Endpoint::Broadcast{ channel_id }
	}
	pub fn channel_id(&self) -> usize
	{
		match self
		{
			Endpoint::Specific{ channel_id, .. } => *channel_id,
			Endpoint::Broadcast{ channel_id } => *channel_id,
		}
	}
	pub fn is_broadcast(&self) -> bool
	{
		matches!(self, Endpoint::Broadcast{..})
	}
	/// The concrete sub-index if this is not a broadcast endpoint.
	pub fn sub_index(&self) -> Option<usize>
	{
		match self
		{
			Endpoint::Specific{ sub_index, .. } => Some(*sub_index),
			Endpoint::Broadcast{..} => None,
		}
	}
}

impl std::fmt::Display for Endpoint
{
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result
	{
		match self
		{
			Endpoint::Specific{channel_id,sub_index} => write!(f,"({},{})",channel_id,sub_index),
			Endpoint::Broadcast{channel_id} => write!(f,"({},ALL)",channel_id),
		}
	}
}

/// An ordered list of output endpoints that a head flit must traverse, with
/// a cursor. Grounded on `channel_endpoint_list.h`'s `ChannelEndpointList`.
#[derive(Clone,Debug)]
pub struct EndpointRoute
{
	endpoints: Vec<Endpoint>,
	cursor: usize,
}

impl EndpointRoute
{
	pub fn new(endpoints: Vec<Endpoint>) -> EndpointRoute
	{
		assert!(!endpoints.is_empty(),"an EndpointRoute requires at least one endpoint");
		EndpointRoute{ endpoints, cursor: 0 }
	}
	pub fn current(&self) -> Endpoint
	{
		self.endpoints[self.cursor]
	}
	pub fn advance(&mut self)
	{
		self.cursor += 1;
		if self.cursor == self.endpoints.len()
		{
			self.cursor = 0;
		}
	}
	pub fn first(&self) -> Endpoint
	{
		self.endpoints[0]
	}
	pub fn last(&self) -> Endpoint
	{
		*self.endpoints.last().expect("non-empty by construction")
	}
	pub fn is_at_first(&self) -> bool
	{
		self.cursor == 0
	}
	pub fn is_at_last(&self) -> bool
	{
		self.cursor + 1 == self.endpoints.len()
	}
	pub fn len(&self) -> usize
	{
		self.endpoints.len()
	}
	pub fn is_empty(&self) -> bool
	{
		self.endpoints.is_empty()
	}
	pub fn iter(&self) -> impl Iterator<Item=&Endpoint>
	{
		self.endpoints.iter()
	}
}

/// A sentinel recording which input channel currently owns a reserved output
/// channel in the wormhole family of schemes (`Channel::INVALID` in the
/// original).
#[derive(Clone,Copy,Debug,PartialEq,Eq)]
pub enum ChannelOwner
{
	Free,
	Owned(usize),
}

impl ChannelOwner
{
	pub fn is_free(&self) -> bool
	{
		matches!(self, ChannelOwner::Free)
	}
	pub fn owner(&self) -> Option<usize>
	{
		match self
		{
			ChannelOwner::Owned(input_channel) => Some(*input_channel),
			ChannelOwner::Free => None,
		}
	}
}

impl PartialOrd for Endpoint
{
	fn partial_cmp(&self, other: &Self) -> Option<Ordering>
	{
		// Only used for test-friendly sorting; order by channel then kind then sub_index.
		Some((self.channel_id(), self.is_broadcast(), self.sub_index())
			.cmp(&(other.channel_id(), other.is_broadcast(), other.sub_index())))
	}
}
