/*!

Thin owner of one flow-control scheme plus the two fixed pipeline delays.
Grounded on
`original_source/common/network/components/router/performance/router_performance_model.{h,cc}`.

*/

use crate::buffer_management_msg::BufferManagementMsg;
use crate::buffer_model::BufferModel;
use crate::buffer_status::{BufferStatus,BufferStatusList};
use crate::channel::Endpoint;
use crate::config::RouterPerformanceModelConfig;
use crate::flit::Flit;
use crate::flow_control::{EngineOutput,FlowControlScheme,FlowControlSchemeKind};
use crate::flow_control::packet_buffer::PacketBufferScheme;
use crate::flow_control::wormhole::WormholeScheme;
use crate::flow_control::wormhole_vct_broadcast::WormholeUnicastVctBroadcastScheme;

/// Owns exactly one `FlowControlScheme` trait object plus the data/credit
/// pipeline delays `NetworkNode` adds to every outgoing message, mirroring
/// `RouterPerformanceModel::getDataPipelineDelay`/`getCreditPipelineDelay`.
pub struct RouterPerformanceModel
{
	flow_control: Box<dyn FlowControlScheme>,
	data_pipeline_delay: u32,
	credit_pipeline_delay: u32,
}

impl RouterPerformanceModel
{
	pub fn new(config: &RouterPerformanceModelConfig) -> Result<RouterPerformanceModel,crate::error::Error>
	{
		config.validate()?;

		let on_off_threshold = if config.on_off_threshold > 0 { config.on_off_threshold } else { crate::buffer_model::DEFAULT_ON_OFF_THRESHOLD };

		let input_buffers: Vec<BufferModel> = config.input_channels.iter().enumerate()
			.map(|(channel_id,channel)| BufferModel::from_scheme(channel.buffer_management_scheme, Endpoint::specific(channel_id,0), channel.buffer_size, on_off_threshold))
			.collect();

		let downstream: Vec<BufferStatusList> = config.output_channels.iter().enumerate()
			.map(|(channel_id,channel)|
			{
				let per_sub_endpoint: Vec<BufferStatus> = (0..channel.num_endpoints)
					.map(|_| match channel.buffer_management_scheme
					{
						crate::buffer_model::BufferManagementScheme::Infinite => BufferStatus::new_infinite(),
						crate::buffer_model::BufferManagementScheme::Credit => BufferStatus::new_credit(channel.buffer_size),
						crate::buffer_model::BufferManagementScheme::OnOff => BufferStatus::new_on_off(),
					})
					.collect();
				BufferStatusList::new(channel_id, per_sub_endpoint)
			})
			.collect();

		let flow_control: Box<dyn FlowControlScheme> = match config.flow_control_scheme
		{
			FlowControlSchemeKind::Wormhole => Box::new(WormholeScheme::new(input_buffers, downstream)),
			FlowControlSchemeKind::WormholeUnicastVctBroadcast => Box::new(WormholeUnicastVctBroadcastScheme::new(input_buffers, downstream)),
			FlowControlSchemeKind::StoreAndForward | FlowControlSchemeKind::VirtualCutThrough => Box::new(PacketBufferScheme::new(input_buffers, downstream)),
		};

		Ok(RouterPerformanceModel
		{
			flow_control,
			data_pipeline_delay: config.data_pipeline_delay,
			credit_pipeline_delay: config.credit_pipeline_delay,
		})
	}

	pub fn data_pipeline_delay(&self) -> u32
	{
		self.data_pipeline_delay
	}
	pub fn credit_pipeline_delay(&self) -> u32
	{
		self.credit_pipeline_delay
	}

	pub fn process_data_msg(&mut self, input_endpoint: Endpoint, flit: Flit) -> Vec<EngineOutput>
	{
		self.flow_control.process_data_msg(input_endpoint, flit)
	}

	pub fn process_buffer_management_msg(&mut self, output_endpoint: Endpoint, msg: BufferManagementMsg) -> Vec<EngineOutput>
	{
		self.flow_control.process_buffer_management_msg(output_endpoint, msg)
	}
}
