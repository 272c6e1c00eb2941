use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Loads a config struct by layering, lowest to highest precedence:
/// the struct's `Default`, an optional TOML file, and `ORION_`-prefixed
/// environment variables. Mirrors the `ConfigLoader` idiom used throughout
/// the Golem services, scaled down to Orion's single-file-per-binary needs.
pub struct ConfigLoader<T> {
    config_file_name: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: Default + Serialize + DeserializeOwned> ConfigLoader<T> {
    pub fn new(config_file_name: impl AsRef<Path>) -> Self {
        ConfigLoader {
            config_file_name: config_file_name.as_ref().to_path_buf(),
            _marker: PhantomData,
        }
    }

    pub fn load(&self) -> figment::Result<T> {
        Figment::new()
            .merge(Serialized::defaults(T::default()))
            .merge(Toml::file(&self.config_file_name))
            .merge(Env::prefixed("ORION_").split("__"))
            .extract()
    }
}
