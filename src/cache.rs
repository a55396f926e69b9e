use florin_bigint::H256;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};

/// Default cache budget, bytes.
pub const DEFAULT_CACHE_BUDGET: usize = 8 * 1024 * 1024;

/// Bounded, size-weighted, get-or-compute cache of contract code keyed
/// by content hash. The only state shared across concurrent top-level
/// executions; everything else is per-call-tree.
///
/// An entry weighs its key plus its value bytes. Insertion over budget
/// evicts in insertion order.
pub struct CodeCache {
	inner: Mutex<Inner>,
	budget: usize,
}

struct Inner {
	map: HashMap<H256, Arc<Vec<u8>>>,
	order: VecDeque<H256>,
	weight: usize,
}

impl CodeCache {
	pub fn new(budget: usize) -> CodeCache {
		CodeCache {
			inner: Mutex::new(Inner {
				map: HashMap::new(),
				order: VecDeque::new(),
				weight: 0,
			}),
			budget,
		}
	}

	/// Fetch the code for `hash`, running `load` on a miss. The loader
	/// runs under the cache lock, so concurrent callers of the same hash
	/// load at most once.
	pub fn get_or_load<F, E>(&self, hash: H256, load: F) -> Result<Arc<Vec<u8>>, E>
	where
		F: FnOnce() -> Result<Vec<u8>, E>,
	{
		let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);

		if let Some(code) = inner.map.get(&hash) {
			return Ok(code.clone());
		}

		let code = Arc::new(load()?);
		inner.weight += 32 + code.len();
		inner.map.insert(hash, code.clone());
		inner.order.push_back(hash);

		while inner.weight > self.budget && inner.order.len() > 1 {
			if let Some(old) = inner.order.pop_front() {
				if let Some(dropped) = inner.map.remove(&old) {
					inner.weight -= 32 + dropped.len();
				}
			}
		}

		Ok(code)
	}

	pub fn len(&self) -> usize {
		self.inner
			.lock()
			.unwrap_or_else(PoisonError::into_inner)
			.map
			.len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub fn weight(&self) -> usize {
		self.inner
			.lock()
			.unwrap_or_else(PoisonError::into_inner)
			.weight
	}
}

impl Default for CodeCache {
	fn default() -> CodeCache {
		CodeCache::new(DEFAULT_CACHE_BUDGET)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use florin_bigint::U256;

	fn hash(n: u64) -> H256 {
		H256::from(U256::from(n))
	}

	#[test]
	fn loads_once_per_hash() {
		let cache = CodeCache::default();
		let mut loads = 0;
		for _ in 0..3 {
			let code = cache
				.get_or_load::<_, ()>(hash(1), || {
					loads += 1;
					Ok(vec![1, 2, 3])
				})
				.unwrap();
			assert_eq!(*code, vec![1, 2, 3]);
		}
		assert_eq!(loads, 1);
		assert_eq!(cache.len(), 1);
		assert_eq!(cache.weight(), 35);
	}

	#[test]
	fn loader_error_is_not_cached() {
		let cache = CodeCache::default();
		assert_eq!(cache.get_or_load(hash(1), || Err("boom")), Err("boom"));
		assert!(cache.is_empty());
		let code = cache
			.get_or_load::<_, ()>(hash(1), || Ok(vec![7]))
			.unwrap();
		assert_eq!(*code, vec![7]);
	}

	#[test]
	fn distinct_hashes_keep_distinct_bytes() {
		let cache = CodeCache::default();
		let a = cache
			.get_or_load::<_, ()>(hash(1), || Ok(vec![1]))
			.unwrap();
		let b = cache
			.get_or_load::<_, ()>(hash(2), || Ok(vec![2]))
			.unwrap();
		assert_ne!(*a, *b);
	}

	#[test]
	fn evicts_oldest_when_over_budget() {
		// budget fits two 100-byte entries but not three
		let cache = CodeCache::new(2 * 132 + 10);
		for n in 0..3u64 {
			cache
				.get_or_load::<_, ()>(hash(n), || Ok(vec![n as u8; 100]))
				.unwrap();
		}
		assert_eq!(cache.len(), 2);
		// oldest entry reloads
		let mut loaded = false;
		cache
			.get_or_load::<_, ()>(hash(0), || {
				loaded = true;
				Ok(vec![0; 100])
			})
			.unwrap();
		assert!(loaded);
	}

	#[test]
	fn oversized_entry_still_served() {
		let cache = CodeCache::new(16);
		let code = cache
			.get_or_load::<_, ()>(hash(1), || Ok(vec![9; 100]))
			.unwrap();
		assert_eq!(code.len(), 100);
	}
}
