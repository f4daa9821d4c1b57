/*!

Upstream backpressure messages. Grounded on
`original_source/common/network/components/router/performance/network_msg_types/{buffer_management_msg,buffer_management_msg_types/{credit_msg,on_off_msg}}.{h,cc}`.

*/

use crate::channel::Endpoint;

/// Either a credit grant or an on/off toggle, addressed to the endpoint it
/// concerns.
#[derive(Clone,Copy,Debug,PartialEq)]
pub enum BufferManagementMsg
{
	Credit
	{
		endpoint: Endpoint,
		num_credits: u32,
		normalized_time: u64,
		/// Supplemented passthrough field, see SPEC_FULL.md section B. Always
		/// `0.0` in this engine; kept so a future rate-of-progress
		/// renormalizer can be attached without changing the wire shape.
		average_rate_of_progress: f64,
	},
	OnOff
	{
		endpoint: Endpoint,
		status: bool,
		normalized_time: u64,
		average_rate_of_progress: f64,
	},
}

impl BufferManagementMsg
{
	pub fn new_credit(endpoint: Endpoint, num_credits: u32, normalized_time: u64) -> BufferManagementMsg
	{
		BufferManagementMsg::Credit{ endpoint, num_credits, normalized_time, average_rate_of_progress: 0.0 }
	}
	pub fn new_on_off(endpoint: Endpoint, status: bool, normalized_time: u64) -> BufferManagementMsg
	{
		BufferManagementMsg::OnOff{ endpoint, status, normalized_time, average_rate_of_progress: 0.0 }
	}
	pub fn endpoint(&self) -> Endpoint
	{
		match self
		{
			BufferManagementMsg::Credit{endpoint,..} => *endpoint,
			BufferManagementMsg::OnOff{endpoint,..} => *endpoint,
		}
	}
	pub fn normalized_time(&self) -> u64
	{
		match self
		{
			BufferManagementMsg::Credit{normalized_time,..} => *normalized_time,
			BufferManagementMsg::OnOff{normalized_time,..} => *normalized_time,
		}
	}
	/// Advances `normalized_time` by `delta`; used by `NetworkNode` to add the
	/// remote router's credit pipeline delay plus the paired link's delay
	/// (`spec.md` §4.7 step 4).
	pub fn with_added_delay(mut self, delta: u64) -> BufferManagementMsg
	{
		match &mut self
		{
			BufferManagementMsg::Credit{normalized_time,..} => *normalized_time += delta,
			BufferManagementMsg::OnOff{normalized_time,..} => *normalized_time += delta,
		}
		self
	}
}
