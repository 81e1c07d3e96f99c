// Read-only key lookup over whatever holds the broker configuration
use std::borrow::Borrow;
use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};

/// A read-only view over broker properties.
///
/// Settings are only ever looked up by key, so any map-like holder of
/// string pairs can back them. `Option<T>` stands for a configuration that
/// was never supplied and answers every lookup with `None`.
pub trait ConfigSource {
    fn get_property(&self, key: &str) -> Option<&str>;

    fn contains_property(&self, key: &str) -> bool {
        self.get_property(key).is_some()
    }
}

impl<K, V, S> ConfigSource for HashMap<K, V, S>
where
    K: Borrow<str> + Eq + Hash,
    V: AsRef<str>,
    S: BuildHasher,
{
    fn get_property(&self, key: &str) -> Option<&str> {
        self.get(key).map(|value| value.as_ref())
    }
}

impl<K, V> ConfigSource for BTreeMap<K, V>
where
    K: Borrow<str> + Ord,
    V: AsRef<str>,
{
    fn get_property(&self, key: &str) -> Option<&str> {
        self.get(key).map(|value| value.as_ref())
    }
}

impl<T: ConfigSource + ?Sized> ConfigSource for &T {
    fn get_property(&self, key: &str) -> Option<&str> {
        (**self).get_property(key)
    }
}

impl<T: ConfigSource> ConfigSource for Option<T> {
    fn get_property(&self, key: &str) -> Option<&str> {
        self.as_ref().and_then(|config| config.get_property(key))
    }
}
