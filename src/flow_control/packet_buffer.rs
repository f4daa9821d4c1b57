/*!

Shared store-and-forward / virtual-cut-through draining logic. Grounded on
`original_source/common/network/components/router/performance/flow_control_schemes/packet_buffer_flow_control_scheme.cc`,
per `spec.md` §4.5. The two schemes differ only in their upstream packet
divider (`divide_packet_packet_buffer` in the parent module); the draining
state machine below is identical for both, so one type serves both.

*/

use crate::buffer_management_msg::BufferManagementMsg;
use crate::buffer_model::BufferModel;
use crate::buffer_status::{BufferStatusList,NEVER};
use crate::channel::Endpoint;
use crate::flit::Flit;

use super::{EngineOutput,FlowControlScheme};

pub struct PacketBufferScheme
{
	input_channels: Vec<BufferModel>,
	downstream: Vec<BufferStatusList>,
}

impl PacketBufferScheme
{
	pub fn new(input_buffers: Vec<BufferModel>, downstream: Vec<BufferStatusList>) -> PacketBufferScheme
	{
		PacketBufferScheme{ input_channels: input_buffers, downstream }
	}

	fn iterate(&mut self) -> Vec<EngineOutput>
	{
		let mut produced = Vec::new();
		loop
		{
			let mut processing_finished = true;
			for input_channel in 0..self.input_channels.len()
			{
				if self.try_drain_one(input_channel, &mut produced)
				{
					processing_finished = false;
				}
			}
			if processing_finished
			{
				break;
			}
		}
		produced
	}

	/// Attempts to send the whole head-flit packet at the front of
	/// `input_channel`'s queue across every endpoint in its route. Returns
	/// whether progress was made.
	fn try_drain_one(&mut self, input_channel: usize, produced: &mut Vec<EngineOutput>) -> bool
	{
		if self.input_channels[input_channel].is_empty()
		{
			return false;
		}

		let route = self.input_channels[input_channel].front().unwrap()
			.head_info.as_ref().expect("packet-buffer scheme only ever queues HEAD flits")
			.route.clone();
		let n_buffers = self.input_channels[input_channel].front().unwrap().length as u32;

		let mut earliest = 0u64;
		for endpoint in route.iter()
		{
			let front = self.input_channels[input_channel].front().unwrap();
			let candidate = self.downstream[endpoint.channel_id()].try_allocate(front, *endpoint, n_buffers);
			if candidate == NEVER
			{
				return false;
			}
			earliest = earliest.max(candidate);
		}

		if let Some(flit) = self.input_channels[input_channel].front_mut()
		{
			flit.enqueue_time = flit.enqueue_time.max(earliest);
		}
		self.input_channels[input_channel].update_buffer_time();

		for endpoint in route.iter()
		{
			let flit = self.input_channels[input_channel].front().unwrap().clone();
			self.downstream[endpoint.channel_id()].allocate(&flit, *endpoint, n_buffers);
		}

		let endpoints: Vec<Endpoint> = route.iter().copied().collect();
		let (flit,upstream_msg) = self.input_channels[input_channel].dequeue();
		if let Some(msg) = upstream_msg
		{
			let input_endpoint = flit.input_endpoint.expect("flit missing input_endpoint when dequeued");
			produced.push(EngineOutput::BufferManagement{ input_endpoint, msg });
		}

		let last = endpoints.len() - 1;
		for (index,endpoint) in endpoints.into_iter().enumerate()
		{
			let mut copy = flit.clone();
			copy.output_endpoint = Some(endpoint);
			produced.push(EngineOutput::Flit{ output_endpoint: endpoint, flit: copy });
			if index == last
			{
				break;
			}
		}
		true
	}
}

impl FlowControlScheme for PacketBufferScheme
{
	fn process_data_msg(&mut self, input_endpoint: Endpoint, mut flit: Flit) -> Vec<EngineOutput>
	{
		flit.input_endpoint = Some(input_endpoint);
		let channel_id = input_endpoint.channel_id();
		let upstream_msg = self.input_channels[channel_id].enqueue(flit);
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
