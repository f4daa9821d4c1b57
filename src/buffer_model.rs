/*!

Per-input FIFO of flits with upstream backpressure signaling. Grounded on
`original_source/common/network/components/router/performance/flow_control_schemes/buffer_models/{buffer_model,finite_buffer_model,finite_buffer_model_with_credit_signaling,finite_buffer_model_with_on_off_signaling}.{h,cc}`.

*/

use std::collections::VecDeque;
use std::mem::size_of;

use crate::channel::Endpoint;
use crate::buffer_management_msg::BufferManagementMsg;
use crate::flit::Flit;
use crate::quantify::Quantifiable;

/// Default on/off threshold for a freestanding `BufferModel`, per `spec.md`
/// §6 and the Open Question decision recorded in SPEC_FULL.md section D.1:
/// expressed as free slots remaining.
pub const DEFAULT_ON_OFF_THRESHOLD: u32 = 4;

#[derive(Clone,Copy,Debug,PartialEq,Eq)]
pub enum BufferManagementScheme
{
	Infinite,
	Credit,
	OnOff,
}

impl BufferManagementScheme
{
	/// Mirrors `BufferManagementScheme::parse` in `original_source`.
	pub fn parse(name: &str) -> Result<BufferManagementScheme,crate::error::Error>
	{
		match name
		{
			"infinite" => Ok(BufferManagementScheme::Infinite),
			"credit" => Ok(BufferManagementScheme::Credit),
			"on_off" => Ok(BufferManagementScheme::OnOff),
			_ => Err(crate::error!(unknown_buffer_management_scheme, name.to_string())),
		}
	}
}

/// The per-input FIFO plus its backpressure bookkeeping. One instance per
/// input endpoint.
#[derive(Clone,Debug)]
pub struct BufferModel
{
	endpoint: Endpoint,
	queue: VecDeque<Flit>,
	/// Monotone cursor: the normalized time at which the front of the queue
	/// may depart, once its own normalized time has caught up to it.
	queue_time: u64,
	kind: BufferModelKind,
}

#[derive(Clone,Debug)]
enum BufferModelKind
{
	Infinite,
	Credit
	{
		buffer_size: u32,
	},
	OnOff
	{
		threshold: u32,
		free_slots: u32,
	},
}

impl BufferModel
{
	pub fn new_infinite(endpoint: Endpoint) -> BufferModel
	{
		BufferModel{ endpoint, queue: VecDeque::new(), queue_time: 0, kind: BufferModelKind::Infinite }
	}
	pub fn new_credit(endpoint: Endpoint, buffer_size: u32) -> BufferModel
	{
		BufferModel{ endpoint, queue: VecDeque::new(), queue_time: 0, kind: BufferModelKind::Credit{ buffer_size } }
	}
	pub fn new_on_off(endpoint: Endpoint, buffer_size: u32, threshold: u32) -> BufferModel
	{
		BufferModel{ endpoint, queue: VecDeque::new(), queue_time: 0, kind: BufferModelKind::OnOff{ threshold, free_slots: buffer_size } }
	}
	pub fn from_scheme(scheme: BufferManagementScheme, endpoint: Endpoint, buffer_size: u32, on_off_threshold: u32) -> BufferModel
	{
		match scheme
		{
			BufferManagementScheme::Infinite => BufferModel::new_infinite(endpoint),
			BufferManagementScheme::Credit => BufferModel::new_credit(endpoint, buffer_size),
			BufferManagementScheme::OnOff => BufferModel::new_on_off(endpoint, buffer_size, on_off_threshold),
		}
	}

	pub fn is_empty(&self) -> bool
	{
		self.queue.is_empty()
	}
	pub fn front(&self) -> Option<&Flit>
	{
		self.queue.front()
	}
	pub fn front_mut(&mut self) -> Option<&mut Flit>
	{
		self.queue.front_mut()
	}
	pub fn queue_time(&self) -> u64
	{
		self.queue_time
	}

	/// Appends `flit`; may emit an upstream on/off `Off` when the free-space
	/// counter drops to the threshold.
	pub fn enqueue(&mut self, flit: Flit) -> Option<BufferManagementMsg>
	{
		let normalized_time = flit.enqueue_time;
		let message = match &mut self.kind
		{
			BufferModelKind::Infinite => None,
			BufferModelKind::Credit{..} => None,
			BufferModelKind::OnOff{ threshold, free_slots } =>
			{
				assert!(*free_slots > 0, "on/off BufferModel at endpoint {} enqueued beyond capacity", self.endpoint);
				*free_slots -= 1;
				if *free_slots == *threshold
				{
					Some(BufferManagementMsg::new_on_off(self.endpoint, false, normalized_time))
				}
				else
				{
					None
				}
			}
		};
		self.queue.push_back(flit);
		message
	}

	/// Pops the front flit; may emit a credit grant or an on/off `On` toggle.
	pub fn dequeue(&mut self) -> (Flit,Option<BufferManagementMsg>)
	{
		let flit = self.queue.pop_front().expect("dequeue called on an empty BufferModel");
		let normalized_time = flit.enqueue_time.max(self.queue_time);
		let message = match &mut self.kind
		{
			BufferModelKind::Infinite => None,
			BufferModelKind::Credit{..} =>
				Some(BufferManagementMsg::new_credit(self.endpoint, flit.length as u32, normalized_time)),
			BufferModelKind::OnOff{ threshold, free_slots } =>
			{
				let was_below = *free_slots <= *threshold;
				*free_slots += 1;
				if was_below && *free_slots > *threshold
				{
					Some(BufferManagementMsg::new_on_off(self.endpoint, true, normalized_time))
				}
				else
				{
					None
				}
			}
		};
		(flit,message)
	}

	/// `front.normalized_time = max(front.normalized_time, queue_time)`.
	pub fn update_flit_time(&mut self)
	{
		let queue_time = self.queue_time;
		if let Some(flit) = self.queue.front_mut()
		{
			flit.enqueue_time = flit.enqueue_time.max(queue_time);
		}
	}

	/// Requires `front.normalized_time >= queue_time`; advances `queue_time`
	/// to `front.normalized_time + front.length`.
	pub fn update_buffer_time(&mut self)
	{
		let front = self.queue.front().expect("update_buffer_time called on an empty BufferModel");
		let front_time = front.enqueue_time;
		let front_length = front.length;
		assert!(front_time >= self.queue_time, "BufferModel at endpoint {} violated queue_time monotonicity: front={} queue_time={}", self.endpoint, front_time, self.queue_time);
		self.queue_time = front_time + front_length;
	}
}

impl Quantifiable for BufferModel
{
	fn total_memory(&self) -> usize
	{
		//We add +1 because of one hole in the implementation of VecDeque
		size_of::<BufferModel>() + (self.queue.capacity()+1)*size_of::<Flit>()
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
