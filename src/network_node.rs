/*!

Per-router glue: channel ↔ neighbor-router mapping, time normalization,
router/link traversal accounting, and outbound `NetPacket` construction.
Grounded on `original_source/common/network/components/network_node.{h,cc}`,
per `spec.md` §4.7.

*/

use std::collections::HashMap;

use crate::buffer_management_msg::BufferManagementMsg;
use crate::channel::{Endpoint,RouterId};
use crate::flow_control::EngineOutput;
use crate::link::{LinkPerformanceModel,LinkPowerModel};
use crate::packet::{NetPacket,PacketType,Payload};
use crate::router_performance::RouterPerformanceModel;

/// Mirrors `RouterPowerModel`'s usage at the one call site visible in
/// `network_node.cc` (`_router_power_model->updateDynamicEnergy(...)`); the
/// header itself was not part of the retrieved source, so its shape is
/// inferred from that call and from the sibling `LinkPowerModel` contract.
pub trait RouterPowerModel
{
	fn get_static_power(&self) -> f64;
	fn update_dynamic_energy(&mut self, num_bit_flips: u32, num_flits: u32);
	fn get_dynamic_energy(&self) -> f64;
	fn reset_counters(&mut self);
}

/// What the topology resolver (`spec.md` §6, an external collaborator) tells
/// this node about the neighbor reached through `input_endpoint` when a
/// buffer-management message must travel back upstream to it.
#[derive(Clone,Copy,Debug)]
pub struct RemoteRouterInfo
{
	pub credit_pipeline_delay: u64,
	pub link_delay: u64,
}

/// `getRemoteNetworkNode` plus its two delay getters, collapsed into one
/// pure query the engine consumes without owning any other node.
pub trait TopologyResolver
{
	fn resolve_remote(&self, packet_type: PacketType, input_endpoint: Endpoint) -> RemoteRouterInfo;
}

fn build_core_to_endpoint(channel_to_core: &[Vec<usize>]) -> HashMap<usize,Endpoint>
{
	let mut map = HashMap::new();
	for (channel_id,cores) in channel_to_core.iter().enumerate()
	{
		for (sub_index,core) in cores.iter().enumerate()
		{
			map.insert(*core, Endpoint::specific(channel_id, sub_index));
		}
	}
	map
}

/// The unit of physical simulation: one router's worth of performance model,
/// link models, and channel mapping.
pub struct NetworkNode
{
	router_id: RouterId,
	flit_width_bits: u32,
	router_performance: RouterPerformanceModel,
	router_power: Option<Box<dyn RouterPowerModel>>,
	links: Vec<Box<dyn LinkPerformanceModel>>,
	link_power: Vec<Option<Box<dyn LinkPowerModel>>>,
	input_channel_to_core: Vec<Vec<usize>>,
	output_channel_to_core: Vec<Vec<usize>>,
	core_to_input_endpoint: HashMap<usize,Endpoint>,
	core_to_output_endpoint: HashMap<usize,Endpoint>,
	flow_control_packet_type: PacketType,
	last_net_packet_time: u64,
	total_input_buffer_writes: u64,
	total_input_buffer_reads: u64,
	total_switch_allocator_requests: u64,
	total_crossbar_traversals: u64,
	total_link_traversals: Vec<u64>,
}

impl NetworkNode
{
	#[allow(clippy::too_many_arguments)]
	pub fn new(
		router_id: RouterId,
		flit_width_bits: u32,
		router_performance: RouterPerformanceModel,
		router_power: Option<Box<dyn RouterPowerModel>>,
		links: Vec<Box<dyn LinkPerformanceModel>>,
		link_power: Vec<Option<Box<dyn LinkPowerModel>>>,
		input_channel_to_core: Vec<Vec<usize>>,
		output_channel_to_core: Vec<Vec<usize>>,
		flow_control_packet_type: PacketType,
	) -> Result<NetworkNode,crate::error::Error>
	{
		if links.len() != output_channel_to_core.len()
		{
			return Err(crate::error!(inconsistent_endpoint_counts, output_channel_to_core.len(), links.len()));
		}
		if link_power.len() != links.len()
		{
			return Err(crate::error!(inconsistent_endpoint_counts, links.len(), link_power.len()));
		}

		let core_to_input_endpoint = build_core_to_endpoint(&input_channel_to_core);
		let core_to_output_endpoint = build_core_to_endpoint(&output_channel_to_core);
		let total_link_traversals = vec![0u64; output_channel_to_core.len()];

		Ok(NetworkNode
		{
			router_id,
			flit_width_bits,
			router_performance,
			router_power,
			links,
			link_power,
			input_channel_to_core,
			output_channel_to_core,
			core_to_input_endpoint,
			core_to_output_endpoint,
			flow_control_packet_type,
			last_net_packet_time: 0,
			total_input_buffer_writes: 0,
			total_input_buffer_reads: 0,
			total_switch_allocator_requests: 0,
			total_crossbar_traversals: 0,
			total_link_traversals,
		})
	}

	pub fn router_id(&self) -> RouterId
	{
		self.router_id
	}
	pub fn num_input_channels(&self) -> usize
	{
		self.input_channel_to_core.len()
	}
	pub fn num_output_channels(&self) -> usize
	{
		self.output_channel_to_core.len()
	}
	pub fn total_input_buffer_writes(&self) -> u64
	{
		self.total_input_buffer_writes
	}
	pub fn total_input_buffer_reads(&self) -> u64
	{
		self.total_input_buffer_reads
	}
	pub fn total_switch_allocator_requests(&self) -> u64
	{
		self.total_switch_allocator_requests
	}
	pub fn total_crossbar_traversals(&self) -> u64
	{
		self.total_crossbar_traversals
	}
	pub fn total_link_traversals(&self, output_channel: usize) -> u64
	{
		self.total_link_traversals[output_channel]
	}

	/// Processes one inbound packet to completion, returning the (possibly
	/// empty, possibly multicast-expanded) list of outbound packets.
	/// `spec.md` §4.7.
	pub fn process_packet(&mut self, input: NetPacket, topology: &dyn TopologyResolver) -> Vec<NetPacket>
	{
		assert!(input.time >= self.last_net_packet_time,
			"NetworkNode {}: packet time {} precedes last packet time {}", self.router_id, input.time, self.last_net_packet_time);
		self.last_net_packet_time = input.time;

		let engine_outputs = match input.data
		{
			Payload::Flit(mut flit) =>
			{
				let input_endpoint = *self.core_to_input_endpoint.get(&input.sender)
					.unwrap_or_else(|| panic!("NetworkNode {}: no input endpoint mapped for sender core {}", self.router_id, input.sender));
				// normalizeTime: the flit's normalized time becomes this node's local arrival clock.
				flit.enqueue_time = input.time;
				self.router_performance.process_data_msg(input_endpoint, flit)
			}
			Payload::BufferManagement(msg) =>
			{
				let output_endpoint = *self.core_to_output_endpoint.get(&input.sender)
					.unwrap_or_else(|| panic!("NetworkNode {}: no output endpoint mapped for sender core {}", self.router_id, input.sender));
				self.router_performance.process_buffer_management_msg(output_endpoint, msg)
			}
		};

		let mut outputs = Vec::new();
		for engine_output in engine_outputs
		{
			match engine_output
			{
				EngineOutput::Flit{ output_endpoint, mut flit } =>
				{
					self.traverse_flit(&mut flit, output_endpoint);
					self.update_event_counters(&flit, output_endpoint);
					outputs.extend(self.construct_flit_packets(flit, output_endpoint, input.packet_type, input.sequence_num, input.specific));
				}
				EngineOutput::BufferManagement{ input_endpoint, msg } =>
				{
					let remote = topology.resolve_remote(self.flow_control_packet_type, input_endpoint);
					let msg = msg.with_added_delay(remote.credit_pipeline_delay + remote.link_delay);
					outputs.push(self.construct_buffer_management_packet(msg, input_endpoint, input.packet_type, input.sequence_num, input.specific));
				}
			}
		}
		outputs
	}

	/// `performRouterAndLinkTraversal`'s DATA branch: adds the data pipeline
	/// delay and the chosen link's delay, and updates both power models.
	fn traverse_flit(&mut self, flit: &mut crate::flit::Flit, output_endpoint: Endpoint)
	{
		let output_channel = output_endpoint.channel_id();
		let data_delay = self.router_performance.data_pipeline_delay() as u64;
		flit.enqueue_time += data_delay;
		if let Some(power) = self.router_power.as_mut()
		{
			power.update_dynamic_energy(self.flit_width_bits/2, flit.length as u32);
		}

		let link_delay = self.links[output_channel].get_delay();
		flit.enqueue_time += link_delay;
		if let Some(power) = self.link_power[output_channel].as_mut()
		{
			power.update_dynamic_energy(self.flit_width_bits/2, flit.length as u32);
		}

		flit.record_traversal_delay(data_delay + link_delay);
	}

	fn update_event_counters(&mut self, flit: &crate::flit::Flit, output_endpoint: Endpoint)
	{
		self.total_input_buffer_writes += flit.length;
		self.total_input_buffer_reads += flit.length;
		if flit.is_head()
		{
			self.total_switch_allocator_requests += 1;
		}
		self.total_crossbar_traversals += flit.length;
		self.total_link_traversals[output_endpoint.channel_id()] += flit.length;
	}

	/// `constructNetPackets`'s DATA branch: the outgoing wall-clock `time`
	/// equals the flit's final normalized time, since normalized time is
	/// seeded from the node's own local arrival clock on every entry
	/// (`spec.md` §9's time-normalization note; the identity normalizer makes
	/// `normalized_time_at_entry == input.time` always, so the delta the
	/// original adds to the packet's carried `time` collapses to the final
	/// normalized time itself).
	fn construct_flit_packets(&self, flit: crate::flit::Flit, output_endpoint: Endpoint, packet_type: PacketType, sequence_num: u64, specific: Option<u64>) -> Vec<NetPacket>
	{
		let channel_id = output_endpoint.channel_id();
		let receivers: Vec<usize> = match output_endpoint
		{
			Endpoint::Broadcast{..} => self.output_channel_to_core[channel_id].clone(),
			Endpoint::Specific{ sub_index, .. } => vec![self.output_channel_to_core[channel_id][sub_index]],
		};
		let time = flit.enqueue_time;
		receivers.into_iter()
			.map(|receiver| NetPacket::new_flit(time, self.router_id.core_id, receiver, packet_type, flit.clone(), sequence_num, specific))
			.collect()
	}

	fn construct_buffer_management_packet(&self, msg: BufferManagementMsg, input_endpoint: Endpoint, packet_type: PacketType, sequence_num: u64, specific: Option<u64>) -> NetPacket
	{
		let channel_id = input_endpoint.channel_id();
		let sub_index = input_endpoint.sub_index().expect("a buffer-management reply always targets a specific input sub-endpoint");
		let receiver = self.input_channel_to_core[channel_id][sub_index];
		let time = msg.normalized_time();
		NetPacket::new_buffer_management(time, self.router_id.core_id, receiver, packet_type, msg, sequence_num, specific)
	}
}
