/*!

A small memory-accounting trait, grounded on the `Quantifiable` trait used
throughout the teacher repo (`router/mod.rs`'s `impl Quantifiable for
Buffer`). Kept here so the per-input-channel queueing structures
(`BufferModel`, `BufferStatusList`) can report their footprint the way the
rest of the simulator's components do. Both implementations below are
hand-written, mirroring the teacher's own manual `impl Quantifiable for
Buffer`/`AugmentedBuffer` rather than a derive macro.

*/

/// Types that can report how much memory they occupy.
pub trait Quantifiable
{
	/// Approximate the number of bytes occupied by `self`, including owned heap data.
	fn total_memory(&self) -> usize;
	/// Print a breakdown of `total_memory` to help find where memory is going.
	fn print_memory_breakdown(&self);
	/// Estimate the memory this would occupy after further expected growth.
	fn forecast_total_memory(&self) -> usize;
}

impl<T> Quantifiable for Vec<T> where T: Quantifiable
{
	fn total_memory(&self) -> usize
	{
		std::mem::size_of::<Vec<T>>() + self.iter().map(|item| item.total_memory()).sum::<usize>()
	}
	fn print_memory_breakdown(&self)
	{
		for item in self
		{
			item.print_memory_breakdown();
		}
	}
	fn forecast_total_memory(&self) -> usize
	{
		self.total_memory()
	}
}
