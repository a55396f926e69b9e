use crate::ExitError;
use core::cmp::min;
use florin_bigint::U256;

/// A sequential memory. It uses Rust's `Vec` for internal representation.
///
/// Reads are logically zero-extended; writes grow the buffer in 32-byte
/// steps up to `limit`, and any access past the limit is an error rather
/// than a silent truncation.
#[derive(Clone, Debug)]
pub struct Memory {
	data: Vec<u8>,
	limit: usize,
}

impl Memory {
	/// Create a new memory with the given limit.
	pub fn new(limit: usize) -> Self {
		Self {
			data: Vec::new(),
			limit,
		}
	}

	/// Memory limit.
	pub fn limit(&self) -> usize {
		self.limit
	}

	/// Get the length of the current memory range.
	pub fn len(&self) -> usize {
		self.data.len()
	}

	/// Return true if current memory range is zero.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Return the full memory.
	pub fn data(&self) -> &Vec<u8> {
		&self.data
	}

	/// Check that `offset..offset + len` stays under the limit. A
	/// zero-length range is always fine.
	pub fn check_range(&self, offset: usize, len: usize) -> Result<(), ExitError> {
		if len == 0 {
			return Ok(());
		}
		match offset.checked_add(len) {
			Some(end) if end <= self.limit => Ok(()),
			_ => Err(ExitError::OutOfBounds),
		}
	}

	/// Get memory region at given offset, zero-extended past the written
	/// length. The caller bounds `size` through `check_range`.
	pub fn get(&self, offset: usize, size: usize) -> Vec<u8> {
		let mut ret = vec![0u8; size];

		if offset < self.data.len() {
			let copy = min(size, self.data.len() - offset);
			ret[..copy].copy_from_slice(&self.data[offset..offset + copy]);
		}

		ret
	}

	/// Set memory region at given offset. The offset and value are
	/// considered untrusted. When `target_size` exceeds the value length
	/// the tail is zero-filled.
	pub fn set(
		&mut self,
		offset: usize,
		value: &[u8],
		target_size: Option<usize>,
	) -> Result<(), ExitError> {
		let target_size = target_size.unwrap_or(value.len());
		if target_size == 0 {
			return Ok(());
		}

		let end = offset
			.checked_add(target_size)
			.ok_or(ExitError::OutOfBounds)?;
		if end > self.limit {
			return Err(ExitError::OutOfBounds);
		}

		if self.data.len() < end {
			let aligned = next_multiple_of_32(end).unwrap_or(end);
			self.data.resize(min(aligned, self.limit), 0);
		}

		if target_size > value.len() {
			self.data[offset..offset + value.len()].copy_from_slice(value);
			for b in &mut self.data[offset + value.len()..end] {
				*b = 0;
			}
		} else {
			self.data[offset..end].copy_from_slice(&value[..target_size]);
		}

		Ok(())
	}

	/// Copy `data` into the memory, of given `len`. Out-of-range source
	/// bytes read as zero.
	pub fn copy_large(
		&mut self,
		memory_offset: U256,
		data_offset: U256,
		len: U256,
		data: &[u8],
	) -> Result<(), ExitError> {
		// A zero-length copy is defined to be a no-op, regardless of the
		// other operands.
		if len.is_zero() {
			return Ok(());
		}

		let memory_offset = to_valid_usize(memory_offset)?;
		let ulen = to_valid_usize(len)?;

		let src = match to_valid_usize(data_offset) {
			Ok(data_offset) if data_offset < data.len() => {
				&data[data_offset..min(data_offset.saturating_add(ulen), data.len())]
			}
			_ => &[],
		};

		self.set(memory_offset, src, Some(ulen))
	}
}

fn to_valid_usize(value: U256) -> Result<usize, ExitError> {
	if value.bits() > 64 || value.low_u64() > usize::MAX as u64 {
		return Err(ExitError::OutOfBounds);
	}
	Ok(value.low_u64() as usize)
}

/// Rounds up `x` to the closest multiple of 32. If `x % 32 == 0` then `x`
/// is returned.
#[inline]
fn next_multiple_of_32(x: usize) -> Option<usize> {
	let r = x % 32;
	if r == 0 {
		Some(x)
	} else {
		x.checked_add(32 - r)
	}
}

#[cfg(test)]
mod tests {
	use super::{next_multiple_of_32, Memory};
	use crate::ExitError;

	#[test]
	fn test_next_multiple_of_32() {
		for i in 0..32 {
			assert_eq!(Some(i * 32), next_multiple_of_32(i * 32));
		}
		for x in 1..1024usize {
			if x % 32 == 0 {
				continue;
			}
			assert_eq!(Some(x + 32 - (x % 32)), next_multiple_of_32(x));
		}
	}

	#[test]
	fn writes_grow_in_aligned_steps() {
		let mut memory = Memory::new(1024);
		memory.set(3, &[1, 2, 3, 4], None).unwrap();
		assert_eq!(memory.len(), 32);
		assert_eq!(&memory.data()[3..7], &[1, 2, 3, 4]);
	}

	#[test]
	fn reads_zero_extend() {
		let mut memory = Memory::new(1024);
		memory.set(0, &[0xff], None).unwrap();
		let read = memory.get(0, 64);
		assert_eq!(read[0], 0xff);
		assert!(read[1..].iter().all(|b| *b == 0));
	}

	#[test]
	fn writes_past_limit_fail() {
		let mut memory = Memory::new(64);
		assert_eq!(
			memory.set(48, &[0u8; 32], None),
			Err(ExitError::OutOfBounds)
		);
		// and nothing was written
		assert_eq!(memory.len(), 0);
	}

	#[test]
	fn check_range_at_limit() {
		let memory = Memory::new(64);
		assert!(memory.check_range(32, 32).is_ok());
		assert_eq!(memory.check_range(33, 32), Err(ExitError::OutOfBounds));
		assert!(memory.check_range(usize::MAX, 0).is_ok());
	}

	#[test]
	fn zero_fill_on_short_value() {
		let mut memory = Memory::new(1024);
		memory.set(0, &[0xaa; 8], None).unwrap();
		memory.set(0, &[0xbb], Some(8)).unwrap();
		assert_eq!(memory.data()[0], 0xbb);
		assert!(memory.data()[1..8].iter().all(|b| *b == 0));
	}
}
