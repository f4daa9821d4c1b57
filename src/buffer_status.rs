/*!

Per-output mirror of downstream free-space state. Grounded on
`original_source/common/network/components/router/performance/buffer_status/{buffer_status,credit_status,on_off_status,buffer_status_list,infinite_buffer_status,finite_buffer_status}.{h,cc}`.

*/

use std::mem::size_of;

use crate::buffer_management_msg::BufferManagementMsg;
use crate::channel::Endpoint;
use crate::flit::Flit;
use crate::quantify::Quantifiable;

/// Sentinel meaning "this allocation can never succeed at any time we've
/// heard about yet", mirroring `UINT64_MAX` in `original_source`.
pub const NEVER: u64 = u64::MAX;

/// Default on/off threshold for the flow-control-embedded `BufferStatus`,
/// which only ever allocates one flit at a time. See SPEC_FULL.md D.1.
pub const DEFAULT_ON_OFF_THRESHOLD: u32 = 1;

#[derive(Clone,Debug)]
pub enum BufferStatus
{
	Infinite,
	Credit
	{
		credit_count: u32,
		last_msg_time: u64,
		has_received: bool,
	},
	OnOff
	{
		status: bool,
		last_msg_time: u64,
		has_received: bool,
	},
}

impl BufferStatus
{
	pub fn new_infinite() -> BufferStatus
	{
		BufferStatus::Infinite
	}
	pub fn new_credit(initial_buffer_size: u32) -> BufferStatus
	{
		BufferStatus::Credit{ credit_count: initial_buffer_size, last_msg_time: 0, has_received: false }
	}
	pub fn new_on_off() -> BufferStatus
	{
		BufferStatus::OnOff{ status: true, last_msg_time: 0, has_received: false }
	}

	/// Returns the earliest time at which `n_buffers` may be allocated, or
	/// `NEVER` if impossible given current knowledge.
	pub fn try_allocate(&self, n_buffers: u32) -> u64
	{
		match self
		{
			BufferStatus::Infinite => 0,
			BufferStatus::Credit{ credit_count, last_msg_time, .. } =>
				if n_buffers <= *credit_count { *last_msg_time } else { NEVER },
			BufferStatus::OnOff{ status, last_msg_time, .. } =>
			{
				assert_eq!(n_buffers, 1, "on/off BufferStatus can only allocate one flit at a time");
				if *status { *last_msg_time } else { NEVER }
			}
		}
	}

	/// Mutates state to reflect `n_buffers` now in flight downstream.
	pub fn allocate(&mut self, n_buffers: u32)
	{
		match self
		{
			BufferStatus::Infinite => {},
			BufferStatus::Credit{ credit_count, .. } =>
			{
				assert!(*credit_count >= n_buffers, "credit count would go negative allocating {} with only {} available", n_buffers, credit_count);
				*credit_count -= n_buffers;
			}
			BufferStatus::OnOff{ status, .. } =>
			{
				assert_eq!(n_buffers, 1, "on/off BufferStatus can only allocate one flit at a time");
				assert!(*status, "allocate called on an on/off BufferStatus that is currently off");
			}
		}
	}

	/// Applies an incoming upstream buffer-management message.
	pub fn receive(&mut self, msg: &BufferManagementMsg)
	{
		match (self,msg)
		{
			(BufferStatus::Infinite, _) => {},
			(BufferStatus::Credit{ credit_count, last_msg_time, has_received }, BufferManagementMsg::Credit{ num_credits, normalized_time, .. }) =>
			{
				assert!(!*has_received || *normalized_time > *last_msg_time, "credit message arrived with non-increasing time: last={} new={}", last_msg_time, normalized_time);
				*credit_count += *num_credits;
				*last_msg_time = *normalized_time;
				*has_received = true;
			}
			(BufferStatus::OnOff{ status, last_msg_time, has_received }, BufferManagementMsg::OnOff{ status: new_status, normalized_time, .. }) =>
			{
				assert!(!*has_received || *normalized_time > *last_msg_time, "on/off message arrived with non-increasing time: last={} new={}", last_msg_time, normalized_time);
				assert_ne!(*status, *new_status, "on/off polarity message repeated the current status ({}) at time {}", status, normalized_time);
				*status = *new_status;
				*last_msg_time = *normalized_time;
				*has_received = true;
			}
			(status,msg) => panic!("BufferStatus/BufferManagementMsg kind mismatch: {:?} received {:?}", status, msg),
		}
	}
}

/// One `BufferStatus` per sub-endpoint of an output channel, plus a cursor
/// preventing out-of-order use of the channel itself.
#[derive(Clone,Debug)]
pub struct BufferStatusList
{
	channel_id: usize,
	per_sub_endpoint: Vec<BufferStatus>,
	channel_free_time: u64,
}

impl BufferStatusList
{
	pub fn new(channel_id: usize, per_sub_endpoint: Vec<BufferStatus>) -> BufferStatusList
	{
		assert!(!per_sub_endpoint.is_empty(), "a BufferStatusList needs at least one sub-endpoint");
		BufferStatusList{ channel_id, per_sub_endpoint, channel_free_time: 0 }
	}

	pub fn channel_free_time(&self) -> u64
	{
		self.channel_free_time
	}

	fn sub_endpoints(&self, endpoint: Endpoint) -> Vec<usize>
	{
		match endpoint
		{
			Endpoint::Specific{ sub_index, .. } => vec![sub_index],
			Endpoint::Broadcast{..} => (0..self.per_sub_endpoint.len()).collect(),
		}
	}

	/// Returns the max of `channel_free_time` and the per-endpoint
	/// `try_allocate`; for a broadcast endpoint, the max across every
	/// sub-endpoint.
	pub fn try_allocate(&self, _flit: &Flit, endpoint: Endpoint, n_buffers: u32) -> u64
	{
		let mut earliest = self.channel_free_time;
		for sub_index in self.sub_endpoints(endpoint)
		{
			let candidate = self.per_sub_endpoint[sub_index].try_allocate(n_buffers);
			if candidate == NEVER
			{
				return NEVER;
			}
			earliest = earliest.max(candidate);
		}
		earliest
	}

	/// Mutates every targeted sub-endpoint and advances `channel_free_time`
	/// to `flit.normalized_time + n_buffers`.
	pub fn allocate(&mut self, flit: &Flit, endpoint: Endpoint, n_buffers: u32)
	{
		for sub_index in self.sub_endpoints(endpoint)
		{
			self.per_sub_endpoint[sub_index].allocate(n_buffers);
		}
		let new_free_time = flit.enqueue_time + n_buffers as u64;
		assert!(new_free_time >= self.channel_free_time, "channel_free_time would regress on channel {}: current={} new={}", self.channel_id, self.channel_free_time, new_free_time);
		self.channel_free_time = new_free_time;
	}

	pub fn receive(&mut self, sub_index: usize, msg: &BufferManagementMsg)
	{
		self.per_sub_endpoint[sub_index].receive(msg);
	}
}

impl Quantifiable for BufferStatusList
{
	fn total_memory(&self) -> usize
	{
		size_of::<BufferStatusList>() + self.per_sub_endpoint.capacity()*size_of::<BufferStatus>()
	}
	fn print_memory_breakdown(&self)
	{
		unimplemented!();
	}
	fn forecast_total_memory(&self) -> usize
	{
		self.total_memory()
	}
}

#[cfg(test)]
mod tests
{
	use super::*;
	use crate::channel::EndpointRoute;

	fn flit_at(time: u64) -> Flit
	{
		Flit::new_head(0, EndpointRoute::new(vec![Endpoint::specific(0,0)]), 1, false, time)
	}

	#[test]
	fn credit_try_allocate_respects_count()
	{
		let status = BufferStatus::new_credit(2);
		assert_eq!(status.try_allocate(2), 0);
		assert_eq!(status.try_allocate(3), NEVER);
	}

	#[test]
	fn broadcast_allocation_takes_max_across_endpoints()
	{
		let mut list = BufferStatusList::new(0, vec![
			BufferStatus::new_credit(0),
			BufferStatus::new_credit(1),
			BufferStatus::new_credit(1),
		]);
		list.receive(0, &BufferManagementMsg::new_credit(Endpoint::specific(0,0),1,100));
		let flit = flit_at(50);
		let time = list.try_allocate(&flit, Endpoint::broadcast(0), 1);
		assert_eq!(time, 100);
	}

	#[test]
	#[should_panic]
	fn on_off_repeated_polarity_panics()
	{
		let mut status = BufferStatus::new_on_off();
		status.receive(&BufferManagementMsg::new_on_off(Endpoint::specific(0,0),true,5));
	}
}
