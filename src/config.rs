/*!

Plain, strongly typed configuration structs, passed to constructors by
explicit injection rather than parsed from a textual grammar (`spec.md` §1,
§9; SPEC_FULL.md section A.3). Shaped after the teacher's own
`RouterBuilderArgument<'a>` (`router/mod.rs`).

*/

use crate::buffer_model::BufferManagementScheme;
use crate::flow_control::FlowControlSchemeKind;

/// Configuration for one input or output channel of a router.
#[derive(Clone,Debug)]
pub struct ChannelConfig
{
	pub num_endpoints: usize,
	pub buffer_management_scheme: BufferManagementScheme,
	pub buffer_size: u32,
}

impl ChannelConfig
{
	pub fn new(num_endpoints: usize, buffer_management_scheme: BufferManagementScheme, buffer_size: u32) -> ChannelConfig
	{
		ChannelConfig{ num_endpoints, buffer_management_scheme, buffer_size }
	}
}

/// Configuration for a `RouterPerformanceModel`: the flow-control scheme to
/// instantiate, its two pipeline delays, and the per-channel buffer
/// management configuration on both sides. Mirrors the enumerated options
/// listed in `spec.md` §6.
#[derive(Clone,Debug)]
pub struct RouterPerformanceModelConfig
{
	pub flow_control_scheme: FlowControlSchemeKind,
	pub data_pipeline_delay: u32,
	pub credit_pipeline_delay: u32,
	pub input_channels: Vec<ChannelConfig>,
	pub output_channels: Vec<ChannelConfig>,
	/// Free-slots-remaining threshold for the flow-control-embedded
	/// `BufferStatus`/`BufferModel` on/off variants (see SPEC_FULL.md D.1).
	pub on_off_threshold: u32,
	pub flit_width_bits: u32,
}

impl RouterPerformanceModelConfig
{
	pub fn validate(&self) -> Result<(),crate::error::Error>
	{
		if self.flit_width_bits == 0
		{
			return Err(crate::error!(non_positive_flit_width, self.flit_width_bits as i64));
		}
		if self.input_channels.is_empty()
		{
			return Err(crate::error!(inconsistent_endpoint_counts, 1, 0));
		}
		if self.output_channels.is_empty()
		{
			return Err(crate::error!(inconsistent_endpoint_counts, 1, 0));
		}
		Ok(())
	}
}

/// The full configuration of one `NetworkNode`: which router performance
/// model to build, and the per-output-channel link delay (`spec.md` §6's
/// `LinkPerformanceModel::get_delay()` contract, supplied here as a plain
/// constant for the common fixed-delay case).
#[derive(Clone,Debug)]
pub struct NodeConfig
{
	pub router_performance: RouterPerformanceModelConfig,
	pub output_link_delays: Vec<u64>,
}

impl NodeConfig
{
	pub fn validate(&self) -> Result<(),crate::error::Error>
	{
		self.router_performance.validate()?;
		if self.output_link_delays.len() != self.router_performance.output_channels.len()
		{
			return Err(crate::error!(inconsistent_endpoint_counts, self.router_performance.output_channels.len(), self.output_link_delays.len()));
		}
		Ok(())
	}
}
