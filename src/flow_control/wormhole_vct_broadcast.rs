/*!

Wormhole-unicast / virtual-cut-through-broadcast flow control. Grounded on
`original_source/common/network/components/router/performance/flow_control_schemes/wormhole_unicast__virtual_cut_through_broadcast__flow_control_scheme.cc`,
per `spec.md` §4.6. Unicast packets (`is_multicast == false`) behave exactly
as plain wormhole over a single output endpoint; broadcast packets reserve
every output channel and the full packet's worth of downstream buffer space
atomically on the HEAD flit, then send every subsequent flit without
re-checking allocation.

*/

use crate::buffer_management_msg::BufferManagementMsg;
use crate::buffer_model::BufferModel;
use crate::buffer_status::{BufferStatusList,NEVER};
use crate::channel::{ChannelOwner,Endpoint,EndpointRoute};
use crate::flit::Flit;

use super::{EngineOutput,FlowControlScheme};

struct InputChannel
{
	buffer: BufferModel,
	route: Option<EndpointRoute>,
	is_broadcast: bool,
	output_channels_allocated: bool,
}

pub struct WormholeUnicastVctBroadcastScheme
{
	input_channels: Vec<InputChannel>,
	output_owner: Vec<ChannelOwner>,
	downstream: Vec<BufferStatusList>,
}

impl WormholeUnicastVctBroadcastScheme
{
	pub fn new(input_buffers: Vec<BufferModel>, downstream: Vec<BufferStatusList>) -> WormholeUnicastVctBroadcastScheme
	{
		let output_owner = vec![ChannelOwner::Free; downstream.len()];
		WormholeUnicastVctBroadcastScheme
		{
			input_channels: input_buffers.into_iter().map(|buffer| InputChannel{ buffer, route: None, is_broadcast: false, output_channels_allocated: false }).collect(),
			output_owner,
			downstream,
		}
	}

	fn iterate(&mut self) -> Vec<EngineOutput>
	{
		let mut produced = Vec::new();
		loop
		{
			let mut processing_finished = true;
			for input_channel in 0..self.input_channels.len()
			{
				loop
				{
					let (flit_sent,packet_sent) = self.send_flit(input_channel, &mut produced);
					if flit_sent && packet_sent
					{
						processing_finished = false;
						break;
					}
					else if flit_sent
					{
						continue;
					}
					else
					{
						break;
					}
				}
			}
			if processing_finished
			{
				break;
			}
		}
		produced
	}

	fn send_flit(&mut self, input_channel: usize, produced: &mut Vec<EngineOutput>) -> (bool,bool)
	{
		if self.input_channels[input_channel].buffer.is_empty()
		{
			return (false,false);
		}

		if self.input_channels[input_channel].route.is_none()
		{
			let front = self.input_channels[input_channel].buffer.front().expect("just checked non-empty");
			assert!(front.is_head(), "input channel {} received a non-HEAD flit with no active route", input_channel);
			let head_info = front.head_info.as_ref().expect("HEAD flit carries head_info");
			let route = head_info.route.clone();
			let is_broadcast = head_info.is_multicast;
			self.input_channels[input_channel].route = Some(route);
			self.input_channels[input_channel].is_broadcast = is_broadcast;
			self.input_channels[input_channel].output_channels_allocated = false;
		}

		self.input_channels[input_channel].buffer.update_flit_time();

		let is_broadcast = self.input_channels[input_channel].is_broadcast;
		let route = self.input_channels[input_channel].route.as_ref().unwrap().clone();

		if is_broadcast
		{
			if !self.input_channels[input_channel].output_channels_allocated
			{
				let front = self.input_channels[input_channel].buffer.front().unwrap();
				assert!(front.is_head(), "broadcast channel allocation attempted on a non-HEAD flit");
				let num_flits = front.head_info.as_ref().unwrap().packet_length_in_flits as u32;

				let mut max_allocated_time = 0u64;
				for endpoint in route.iter()
				{
					let channel_id = endpoint.channel_id();
					if let ChannelOwner::Owned(owner) = self.output_owner[channel_id]
					{
						if owner != input_channel
						{
							return (false,false);
						}
					}
					let front = self.input_channels[input_channel].buffer.front().unwrap();
					let allocated_time = self.downstream[channel_id].try_allocate(front, *endpoint, num_flits);
					if allocated_time == NEVER
					{
						return (false,false);
					}
					max_allocated_time = max_allocated_time.max(allocated_time);
				}

				if let Some(flit) = self.input_channels[input_channel].buffer.front_mut()
				{
					flit.enqueue_time = flit.enqueue_time.max(max_allocated_time);
				}
				for endpoint in route.iter()
				{
					let channel_id = endpoint.channel_id();
					self.output_owner[channel_id] = ChannelOwner::Owned(input_channel);
					let front = self.input_channels[input_channel].buffer.front().unwrap().clone();
					self.downstream[channel_id].allocate(&front, *endpoint, num_flits);
				}
				self.input_channels[input_channel].output_channels_allocated = true;
			}

			let endpoints: Vec<Endpoint> = route.iter().copied().collect();
			let last = endpoints.len() - 1;
			let base_flit = self.input_channels[input_channel].buffer.front().unwrap().clone();
			for (index,endpoint) in endpoints.iter().enumerate()
			{
				let mut copy = base_flit.clone();
				copy.output_endpoint = Some(*endpoint);
				produced.push(EngineOutput::Flit{ output_endpoint: *endpoint, flit: copy });
				if index == last
				{
					break;
				}
			}
		}
		else
		{
			assert_eq!(route.len(), 1, "unicast packet must route through exactly one output endpoint");
			let endpoint = route.first();
			let channel_id = endpoint.channel_id();

			if !self.input_channels[input_channel].output_channels_allocated
			{
				let front = self.input_channels[input_channel].buffer.front().unwrap();
				assert!(front.is_head(), "output channel allocation attempted on a non-HEAD flit");
				if let ChannelOwner::Owned(owner) = self.output_owner[channel_id]
				{
					if owner != input_channel
					{
						return (false,false);
					}
				}
				self.output_owner[channel_id] = ChannelOwner::Owned(input_channel);
				self.input_channels[input_channel].output_channels_allocated = true;
			}

			let front = self.input_channels[input_channel].buffer.front().unwrap();
			let allocated_time = self.downstream[channel_id].try_allocate(front, endpoint, 1);
			if allocated_time == NEVER
			{
				return (false,false);
			}
			if let Some(flit) = self.input_channels[input_channel].buffer.front_mut()
			{
				flit.enqueue_time = flit.enqueue_time.max(allocated_time);
			}
			let front = self.input_channels[input_channel].buffer.front().unwrap().clone();
			self.downstream[channel_id].allocate(&front, endpoint, 1);

			let mut copy = front;
			copy.output_endpoint = Some(endpoint);
			produced.push(EngineOutput::Flit{ output_endpoint: endpoint, flit: copy });
		}

		self.input_channels[input_channel].buffer.update_buffer_time();
		let (sent_flit,upstream_msg) = self.input_channels[input_channel].buffer.dequeue();
		if let Some(msg) = upstream_msg
		{
			let input_endpoint = sent_flit.input_endpoint.expect("flit missing input_endpoint when dequeued");
			produced.push(EngineOutput::BufferManagement{ input_endpoint, msg });
		}

		if sent_flit.is_tail()
		{
			for endpoint in route.iter()
			{
				self.output_owner[endpoint.channel_id()] = ChannelOwner::Free;
			}
			self.input_channels[input_channel].output_channels_allocated = false;
			self.input_channels[input_channel].route = None;
			return (true,true);
		}
		(true,false)
	}
}

impl FlowControlScheme for WormholeUnicastVctBroadcastScheme
{
	fn process_data_msg(&mut self, input_endpoint: Endpoint, mut flit: Flit) -> Vec<EngineOutput>
	{
		flit.input_endpoint = Some(input_endpoint);
		let channel_id = input_endpoint.channel_id();
		let upstream_msg = self.input_channels[channel_id].buffer.enqueue(flit);
		let mut out = Vec::new();
		if let Some(msg) = upstream_msg
		{
			out.push(EngineOutput::BufferManagement{ input_endpoint, msg });
		}
		out.extend(self.iterate());
		out
	}

	fn process_buffer_management_msg(&mut self, output_endpoint: Endpoint, msg: BufferManagementMsg) -> Vec<EngineOutput>
	{
		let channel_id = output_endpoint.channel_id();
		let sub_index = output_endpoint.sub_index().expect("buffer-management messages always target a specific sub-endpoint");
		self.downstream[channel_id].receive(sub_index, &msg);
		self.iterate()
	}
}

#[cfg(test)]
mod tests
{
	use super::*;
	use crate::buffer_status::BufferStatus;

	#[test]
	fn broadcast_head_reserves_every_endpoint_at_the_max_time()
	{
		let endpoints = [Endpoint::specific(0,0),Endpoint::specific(1,0),Endpoint::specific(2,0)];
		let input_endpoint = Endpoint::specific(0,0);
		let input = BufferModel::new_infinite(input_endpoint);
		let downstream = vec![
			BufferStatusList::new(0, vec![BufferStatus::new_credit(0)]),
			BufferStatusList::new(1, vec![BufferStatus::new_credit(1)]),
			BufferStatusList::new(2, vec![BufferStatus::new_credit(1)]),
		];
		let mut scheme = WormholeUnicastVctBroadcastScheme::new(vec![input], downstream);

		// channel 0 starts with 0 credit and must first receive one at t=100.
		scheme.process_buffer_management_msg(Endpoint::specific(0,0), BufferManagementMsg::new_credit(Endpoint::specific(0,0),1,100));

		let route = EndpointRoute::new(endpoints.to_vec());
		let head = Flit::new_head(0, route, 1, true, 50);
		let out = scheme.process_data_msg(input_endpoint, head);

		assert_eq!(out.len(), 3, "a single-flit broadcast packet must reach all three endpoints");
		for output in &out
		{
			if let EngineOutput::Flit{ flit, .. } = output
			{
				assert_eq!(flit.enqueue_time, 100, "broadcast max-time rule: every copy shares the deferred time");
			}
		}
	}

	#[test]
	fn unicast_packet_behaves_like_plain_wormhole()
	{
		let endpoint = Endpoint::specific(0,0);
		let input_endpoint = Endpoint::specific(0,0);
		let input = BufferModel::new_infinite(input_endpoint);
		let downstream = vec![BufferStatusList::new(0, vec![BufferStatus::new_credit(4)])];
		let mut scheme = WormholeUnicastVctBroadcastScheme::new(vec![input], downstream);

		let route = EndpointRoute::new(vec![endpoint]);
		let head = Flit::new_head(0, route, 1, false, 0);
		let out = scheme.process_data_msg(input_endpoint, head);
		assert_eq!(out.len(), 1);
	}
}
