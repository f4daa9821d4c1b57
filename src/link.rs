/*!

Per-output-channel link delay and (optional) power accounting. Grounded on
`original_source/common/network/components/link/performance/link_performance_model.h`
and `original_source/common/network/components/link/power/link_power_model.h`.

*/

/// `get_delay()` is consulted once per outbound message on
/// `NetworkNode::perform_router_and_link_traversal`, mirroring
/// `LinkPerformanceModel::getDelay()`.
pub trait LinkPerformanceModel
{
	fn get_delay(&self) -> u64;
}

/// Optional per-output-channel power model, mirroring `LinkPowerModel`. A
/// node may have none (`link_power_model_list[channel]` is `None` in the
/// original, guarded with `if (...)` at every call site).
pub trait LinkPowerModel
{
	fn get_static_power(&self) -> f64;
	fn update_dynamic_energy(&mut self, num_bit_flips: u32, num_flits: u32);
	fn get_dynamic_energy(&self) -> f64;
	fn reset_counters(&mut self);
}

/// The common case: every message on this link incurs the same fixed delay,
/// independent of contention — the "no power modeling for the wire itself"
/// link a topology resolver hands the node when it has no finer model.
#[derive(Clone,Copy,Debug)]
pub struct FixedDelayLink
{
	delay: u64,
}

impl FixedDelayLink
{
	pub fn new(delay: u64) -> FixedDelayLink
	{
		FixedDelayLink{ delay }
	}
}

impl LinkPerformanceModel for FixedDelayLink
{
	fn get_delay(&self) -> u64
	{
		self.delay
	}
}

/// Accumulates dynamic energy as `num_bit_flips * num_flits * energy_per_bit_flip`,
/// the half-Hamming-weight approximation `spec.md` §4.7 step 3 names. Static
/// power is a constant the caller supplies.
#[derive(Clone,Copy,Debug)]
pub struct LinearLinkPowerModel
{
	energy_per_bit_flip: f64,
	static_power: f64,
	dynamic_energy: f64,
}

impl LinearLinkPowerModel
{
	pub fn new(energy_per_bit_flip: f64, static_power: f64) -> LinearLinkPowerModel
	{
		LinearLinkPowerModel{ energy_per_bit_flip, static_power, dynamic_energy: 0.0 }
	}
}

impl LinkPowerModel for LinearLinkPowerModel
{
	fn get_static_power(&self) -> f64
	{
		self.static_power
	}
	fn update_dynamic_energy(&mut self, num_bit_flips: u32, num_flits: u32)
	{
		self.dynamic_energy += self.energy_per_bit_flip * (num_bit_flips as f64) * (num_flits as f64);
	}
	fn get_dynamic_energy(&self) -> f64
	{
		self.dynamic_energy
	}
	fn reset_counters(&mut self)
	{
		self.dynamic_energy = 0.0;
	}
}

#[cfg(test)]
mod tests
{
	use super::*;

	#[test]
	fn fixed_delay_link_reports_constant_delay()
	{
		let link = FixedDelayLink::new(3);
		assert_eq!(link.get_delay(), 3);
		assert_eq!(link.get_delay(), 3);
	}

	#[test]
	fn linear_power_model_accumulates_and_resets()
	{
		let mut power = LinearLinkPowerModel::new(0.5, 1.0);
		power.update_dynamic_energy(64, 2);
		assert_eq!(power.get_dynamic_energy(), 64.0);
		power.reset_counters();
		assert_eq!(power.get_dynamic_energy(), 0.0);
	}
}
