use crate::{any, any::TypeInfo, utils::thread_safety::RcAnyThreadSafety};

/// Keyed instance store, one for singletons and one for the active scope
#[derive(Default)]
pub(crate) struct Cache {
    map: any::Map,
}

impl Cache {
    #[inline]
    #[must_use]
    pub(crate) fn new() -> Self {
        Self { map: any::Map::new() }
    }

    #[inline]
    #[must_use]
    pub(crate) fn get(&self, contract: &TypeInfo) -> Option<RcAnyThreadSafety> {
        self.map.get(contract).cloned()
    }

    /// Stores `instance` unless the contract already has one.
    /// Returns the stored instance, so the first stored instance wins.
    #[inline]
    #[must_use]
    pub(crate) fn get_or_insert(&mut self, contract: TypeInfo, instance: RcAnyThreadSafety) -> RcAnyThreadSafety {
        self.map.entry(contract).or_insert(instance).clone()
    }

    #[inline]
    #[must_use]
    pub(crate) fn len(&self) -> usize {
        self.map.len()
    }

    #[inline]
    #[must_use]
    pub(crate) fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::Cache;
    use crate::{any::TypeInfo, utils::thread_safety::RcThreadSafety};

    #[test]
    fn test_cache_first_insert_wins() {
        let mut cache = Cache::new();
        assert!(cache.is_empty());

        let stored = cache.get_or_insert(TypeInfo::of::<u8>(), RcThreadSafety::new(1_u8));
        let kept = cache.get_or_insert(TypeInfo::of::<u8>(), RcThreadSafety::new(2_u8));
        assert!(RcThreadSafety::ptr_eq(&stored, &kept));
        assert_eq!(cache.len(), 1);

        let cached = cache.get(&TypeInfo::of::<u8>()).unwrap();
        assert_eq!(cached.downcast_ref::<u8>(), Some(&1));
        assert!(cache.get(&TypeInfo::of::<u16>()).is_none());
    }
}
