//! Shared helpers for building small `NetworkNode`s and their surrounding
//! `TopologyResolver` in the integration tests below. Mirrors the teacher's
//! own `tests/common/mod.rs` role (centralizing configuration-builder
//! boilerplate) but built against this engine's plain config structs rather
//! than the teacher's `ConfigurationValue` grammar.

use router_flow_engine::buffer_model::BufferManagementScheme;
use router_flow_engine::channel::{Endpoint,RouterId};
use router_flow_engine::config::{ChannelConfig,RouterPerformanceModelConfig};
use router_flow_engine::flow_control::FlowControlSchemeKind;
use router_flow_engine::link::{FixedDelayLink,LinkPerformanceModel};
use router_flow_engine::network_node::{NetworkNode,RemoteRouterInfo,TopologyResolver};
use router_flow_engine::packet::PacketType;
use router_flow_engine::router_performance::RouterPerformanceModel;

/// A `TopologyResolver` with the same remote delay for every input
/// endpoint, enough to exercise the engine without modeling a real mesh.
pub struct FixedTopology
{
	pub credit_pipeline_delay: u64,
	pub link_delay: u64,
}

impl TopologyResolver for FixedTopology
{
	fn resolve_remote(&self, _packet_type: PacketType, _input_endpoint: Endpoint) -> RemoteRouterInfo
	{
		RemoteRouterInfo{ credit_pipeline_delay: self.credit_pipeline_delay, link_delay: self.link_delay }
	}
}

/// Parameters for a small router: `num_inputs` input channels (one
/// sub-endpoint each) and `num_outputs` output channels (one sub-endpoint
/// each), all using the same flow-control scheme and buffer management
/// scheme.
pub struct SmallRouterBuilder
{
	pub flow_control_scheme: FlowControlSchemeKind,
	pub buffer_management_scheme: BufferManagementScheme,
	pub buffer_size: u32,
	pub num_inputs: usize,
	pub num_outputs: usize,
	pub data_pipeline_delay: u32,
	pub credit_pipeline_delay: u32,
	pub link_delay: u64,
}

/// Builds a `NetworkNode` whose core ids run `first_core_id..` across all
/// input channels then all output channels, in order — a convenient 1:1
/// mapping for tests.
pub fn build_small_node(arg: SmallRouterBuilder, router_id: RouterId, first_core_id: usize) -> NetworkNode
{
	let config = RouterPerformanceModelConfig
	{
		flow_control_scheme: arg.flow_control_scheme,
		data_pipeline_delay: arg.data_pipeline_delay,
		credit_pipeline_delay: arg.credit_pipeline_delay,
		input_channels: (0..arg.num_inputs).map(|_| ChannelConfig::new(1, arg.buffer_management_scheme, arg.buffer_size)).collect(),
		output_channels: (0..arg.num_outputs).map(|_| ChannelConfig::new(1, arg.buffer_management_scheme, arg.buffer_size)).collect(),
		on_off_threshold: 0,
		flit_width_bits: 128,
	};
	let router_performance = RouterPerformanceModel::new(&config).expect("valid config");
	let links: Vec<Box<dyn LinkPerformanceModel>> = (0..arg.num_outputs).map(|_| Box::new(FixedDelayLink::new(arg.link_delay)) as Box<dyn LinkPerformanceModel>).collect();
	let link_power = (0..arg.num_outputs).map(|_| None).collect();
	let input_channel_to_core: Vec<Vec<usize>> = (0..arg.num_inputs).map(|i| vec![first_core_id + i]).collect();
	let output_channel_to_core: Vec<Vec<usize>> = (0..arg.num_outputs).map(|i| vec![first_core_id + arg.num_inputs + i]).collect();
	NetworkNode::new(
		router_id,
		128,
		router_performance,
		None,
		links,
		link_power,
		input_channel_to_core,
		output_channel_to_core,
		0,
	).expect("valid node")
}
