/*!

Wormhole flow control. Grounded on
`original_source/common/network/components/router/performance/flow_control_schemes/wormhole_flow_control_scheme.cc`
(`sendFlit`/`iterate`/`allocateDownstreamBuffer`), per `spec.md` §4.4.

*/

use crate::buffer_management_msg::BufferManagementMsg;
use crate::buffer_model::BufferModel;
use crate::buffer_status::BufferStatusList;
use crate::channel::{ChannelOwner,Endpoint,EndpointRoute};
use crate::flit::Flit;

use super::{EngineOutput,FlowControlScheme};

struct InputChannel
{
	buffer: BufferModel,
	/// Set from the HEAD flit's route on arrival of a new packet; cleared
	/// when the TAIL departs on the last endpoint of the route. Persists
	/// across the BODY/TAIL flits of the same packet, exactly as
	/// `FlitBuffer::_output_endpoint_list` does in the original.
	route: Option<EndpointRoute>,
}

/// Per-router wormhole scheme state. Input channels and output channels are
/// both addressed by plain `channel_id`; the original model does not use
/// sub-indices on the input side.
pub struct WormholeScheme
{
	input_channels: Vec<InputChannel>,
	output_owner: Vec<ChannelOwner>,
	downstream: Vec<BufferStatusList>,
}

impl WormholeScheme
{
	pub fn new(input_buffers: Vec<BufferModel>, downstream: Vec<BufferStatusList>) -> WormholeScheme
	{
		let output_owner = vec![ChannelOwner::Free; downstream.len()];
		WormholeScheme
		{
			input_channels: input_buffers.into_iter().map(|buffer| InputChannel{ buffer, route: None }).collect(),
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

	/// Returns `(flit_sent, packet_sent)`, mirroring `sendFlit`'s pair.
	fn send_flit(&mut self, input_channel: usize, produced: &mut Vec<EngineOutput>) -> (bool,bool)
	{
		if self.input_channels[input_channel].buffer.is_empty()
		{
			return (false,false);
		}

		if self.input_channels[input_channel].route.is_none()
		{
			let front = self.input_channels[input_channel].buffer.front().expect("just checked non-empty");
			assert!(front.is_head(), "wormhole input channel {} received a non-HEAD flit with no active route", input_channel);
			let route = front.head_info.as_ref().expect("HEAD flit carries head_info").route.clone();
			self.input_channels[input_channel].route = Some(route);
		}

		let endpoint = self.input_channels[input_channel].route.as_ref().unwrap().current();
		let is_first_endpoint = self.input_channels[input_channel].route.as_ref().unwrap().is_at_first();
		let is_last_endpoint = self.input_channels[input_channel].route.as_ref().unwrap().is_at_last();

		if is_first_endpoint
		{
			self.input_channels[input_channel].buffer.update_flit_time();
		}

		let output_channel = endpoint.channel_id();
		match self.output_owner[output_channel]
		{
			ChannelOwner::Owned(owner) if owner != input_channel =>
			{
				let front = self.input_channels[input_channel].buffer.front().unwrap();
				assert!(front.is_head(), "wormhole contention on output channel {} observed a non-HEAD flit on input channel {}", output_channel, input_channel);
				return (false,false);
			}
			ChannelOwner::Free =>
			{
				let front = self.input_channels[input_channel].buffer.front().unwrap();
				assert!(front.is_head(), "wormhole HEAD expected when reserving output channel {} from input channel {}", output_channel, input_channel);
				self.output_owner[output_channel] = ChannelOwner::Owned(input_channel);
			}
			_ => {},
		}

		let front = self.input_channels[input_channel].buffer.front().unwrap();
		let earliest = self.downstream[output_channel].try_allocate(front, endpoint, 1);
		if earliest == crate::buffer_status::NEVER
		{
			return (false,false);
		}

		if let Some(flit) = self.input_channels[input_channel].buffer.front_mut()
		{
			flit.enqueue_time = flit.enqueue_time.max(earliest);
		}
		self.input_channels[input_channel].buffer.update_buffer_time();
		self.downstream[output_channel].allocate(self.input_channels[input_channel].buffer.front().unwrap(), endpoint, 1);

		let mut flit_to_send = self.input_channels[input_channel].buffer.front().unwrap().clone();
		flit_to_send.output_endpoint = Some(endpoint);

		let is_tail = flit_to_send.is_tail();

		if is_last_endpoint
		{
			let (mut sent_flit, upstream_msg) = self.input_channels[input_channel].buffer.dequeue();
			sent_flit.output_endpoint = Some(endpoint);
			if let Some(msg) = upstream_msg
			{
				let input_endpoint = sent_flit.input_endpoint.expect("flit missing input_endpoint when dequeued");
				produced.push(EngineOutput::BufferManagement{ input_endpoint, msg });
			}
			produced.push(EngineOutput::Flit{ output_endpoint: endpoint, flit: sent_flit });
		}
		else
		{
			produced.push(EngineOutput::Flit{ output_endpoint: endpoint, flit: flit_to_send });
		}

		self.input_channels[input_channel].route.as_mut().unwrap().advance();

		if is_tail
		{
			self.output_owner[output_channel] = ChannelOwner::Free;
			if is_last_endpoint
			{
				self.input_channels[input_channel].route = None;
				return (true,true);
			}
			return (true,false);
		}
		(true,false)
	}
}

impl FlowControlScheme for WormholeScheme
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

	fn single_flit_channel(endpoint: Endpoint) -> (BufferModel,BufferStatusList)
	{
		(BufferModel::new_infinite(endpoint), BufferStatusList::new(endpoint.channel_id(), vec![BufferStatus::new_credit(4)]))
	}

	#[test]
	fn single_flit_packet_reserves_and_releases_output_channel()
	{
		let in0 = Endpoint::specific(0,0);
		let out0 = Endpoint::specific(0,0);
		let (in_buf,down) = single_flit_channel(out0);
		let mut scheme = WormholeScheme::new(vec![in_buf], vec![down]);

		let route = EndpointRoute::new(vec![out0]);
		let flit = Flit::new_head(0, route, 1, false, 5);
		let out = scheme.process_data_msg(in0, flit);

		assert_eq!(out.len(), 1);
		match &out[0]
		{
			EngineOutput::Flit{ output_endpoint, .. } => assert_eq!(*output_endpoint, out0),
			_ => panic!("expected a flit output"),
		}
		assert!(matches!(scheme.output_owner[0], ChannelOwner::Free));
	}

	#[test]
	fn contention_defers_second_input_channel()
	{
		let out0 = Endpoint::specific(0,0);
		let (in_buf0,down) = single_flit_channel(out0);
		let in_buf1 = BufferModel::new_infinite(Endpoint::specific(1,0));
		let mut scheme = WormholeScheme::new(vec![in_buf0,in_buf1], vec![down]);

		// Packet of 2 flits (HEAD, TAIL) travelling through a single output endpoint.
		let route0 = EndpointRoute::new(vec![out0]);
		let head0 = Flit::new_head(0, route0, 2, false, 0);

		let head0_out = scheme.process_data_msg(Endpoint::specific(0,0), head0);
		assert_eq!(head0_out.len(), 1, "HEAD should depart immediately, reserving out0 for input channel 0");

		let route1 = EndpointRoute::new(vec![out0]);
		let head1 = Flit::new_head(0, route1, 2, false, 0);
		let blocked = scheme.process_data_msg(Endpoint::specific(1,0), head1);
		assert!(blocked.is_empty(), "second input channel should be blocked while first owns the output channel");
		assert!(matches!(scheme.output_owner[0], ChannelOwner::Owned(0)));

		let tail0 = Flit::new_tail(1, 0);
		let finishing = scheme.process_data_msg(Endpoint::specific(0,0), tail0);
		// TAIL's departure frees out0 and lets the deferred HEAD on input channel 1 proceed
		// within the same draining fixed point.
		assert!(finishing.len() >= 2);
		assert!(matches!(scheme.output_owner[0], ChannelOwner::Owned(1)));
	}
}
