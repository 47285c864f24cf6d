use chunk::ChunkConfig;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

use std::{
    env, fs,
    num::NonZeroU8,
    path::{Path, PathBuf},
    sync::LazyLock,
};

pub mod chunk;

const CONFIG_ROOT_FOLDER: &str = "config/";

/// Tallest column the flat generator may stack, the height of the world.
const MAX_FLAT_HEIGHT: u32 = 384;

pub static BASIC_CONFIG: LazyLock<BasicConfiguration> = LazyLock::new(|| {
    load_or_default(|dir| BasicConfiguration::load(dir))
});

#[cfg(not(feature = "test_helper"))]
static ADVANCED_CONFIG: LazyLock<AdvancedConfiguration> = LazyLock::new(|| {
    load_or_default(|dir| AdvancedConfiguration::load(dir))
});

#[cfg(not(feature = "test_helper"))]
pub fn advanced_config() -> &'static AdvancedConfiguration {
    &ADVANCED_CONFIG
}

#[cfg(feature = "test_helper")]
use std::cell::RefCell;

// Leaked, callers hold `&'static` references
#[cfg(feature = "test_helper")]
thread_local! {
    // Thread local so one test can override the config without affecting another
    static ADVANCED_CONFIG: RefCell<&'static AdvancedConfiguration> = RefCell::new(Box::leak(Box::new(AdvancedConfiguration::default())));
}

#[cfg(feature = "test_helper")]
pub fn override_config_for_testing(config: AdvancedConfiguration) {
    ADVANCED_CONFIG.with_borrow_mut(|ref_config| {
        *ref_config = Box::leak(Box::new(config));
    });
}

#[cfg(feature = "test_helper")]
pub fn advanced_config() -> &'static AdvancedConfiguration {
    ADVANCED_CONFIG.with_borrow(|config| *config)
}

fn load_or_default<C: Default>(load: impl FnOnce(&Path) -> Result<C, ConfigError>) -> C {
    let loaded = env::current_dir()
        .map_err(|err| ConfigError::Io(PathBuf::from("."), err))
        .and_then(|exec_dir| load(&exec_dir));
    match loaded {
        Ok(config) => config,
        Err(err) => {
            log::error!("{err}; falling back to the default configuration");
            C::default()
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Couldn't access {0:?}: {1}")]
    Io(PathBuf, std::io::Error),
    #[error("Couldn't parse config at {0:?}: {1}")]
    Parse(PathBuf, toml::de::Error),
    #[error("Couldn't serialize the default config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Chunk and world behavior. Defaults follow vanilla.
#[derive(Deserialize, Serialize, Default, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct AdvancedConfiguration {
    pub chunk: ChunkConfig,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct BasicConfiguration {
    /// The seed for world generation. Numbers are used as is, text is hashed.
    pub seed: String,
    /// The default level name
    pub default_level_name: String,
    /// Chunks within this many chunks of a player receive ticks.
    pub simulation_distance: NonZeroU8,
}

impl Default for BasicConfiguration {
    fn default() -> Self {
        Self {
            seed: String::new(),
            default_level_name: "world".to_string(),
            simulation_distance: NonZeroU8::new(10).unwrap_or(NonZeroU8::MIN),
        }
    }
}

impl BasicConfiguration {
    /// The numeric world seed.
    ///
    /// Text seeds are hashed like `String.hashCode`, an empty seed is `0`.
    pub fn world_seed(&self) -> i64 {
        let seed = self.seed.trim();
        if seed.is_empty() {
            return 0;
        }
        seed.parse::<i64>().unwrap_or_else(|_| {
            seed.encode_utf16()
                .fold(0i32, |hash, unit| hash.wrapping_mul(31).wrapping_add(unit as i32))
                as i64
        })
    }
}

pub trait LoadConfiguration {
    fn load(exec_dir: &Path) -> Result<Self, ConfigError>
    where
        Self: Sized + Default + Serialize + DeserializeOwned,
    {
        let config_dir = exec_dir.join(CONFIG_ROOT_FOLDER);
        if !config_dir.exists() {
            log::debug!("creating new config root folder");
            fs::create_dir(&config_dir).map_err(|err| ConfigError::Io(config_dir.clone(), err))?;
        }
        let path = config_dir.join(Self::get_path());

        let config = if path.exists() {
            let file_content =
                fs::read_to_string(&path).map_err(|err| ConfigError::Io(path.clone(), err))?;
            toml::from_str(&file_content).map_err(|err| ConfigError::Parse(path.clone(), err))?
        } else {
            let content = Self::default();

            if let Err(err) = fs::write(&path, toml::to_string(&content)?) {
                log::warn!("Couldn't write default config to {:?}. Reason: {}", &path, err);
            }

            content
        };

        config.validate()?;
        Ok(config)
    }

    fn get_path() -> &'static Path;

    fn validate(&self) -> Result<(), ConfigError>;
}

impl LoadConfiguration for AdvancedConfiguration {
    fn get_path() -> &'static Path {
        Path::new("features.toml")
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let total: u32 = self.chunk.flat_layers.iter().map(|layer| layer.height).sum();
        if total > MAX_FLAT_HEIGHT {
            return Err(ConfigError::Invalid(format!(
                "flat layers are {total} blocks high, the world only has {MAX_FLAT_HEIGHT}"
            )));
        }
        Ok(())
    }
}

impl LoadConfiguration for BasicConfiguration {
    fn get_path() -> &'static Path {
        Path::new("configuration.toml")
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(2..=32).contains(&self.simulation_distance.get()) {
            return Err(ConfigError::Invalid(
                "simulation distance must be between 2 and 32".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use temp_dir::TempDir;

    use super::{AdvancedConfiguration, BasicConfiguration, ConfigError, LoadConfiguration};
    use crate::chunk::{FlatLayer, GeneratorKind};

    #[test]
    fn writes_default_when_missing() {
        let dir = TempDir::new().unwrap();
        let config = AdvancedConfiguration::load(dir.path()).unwrap();

        assert_eq!(config, AdvancedConfiguration::default());
        assert!(dir.path().join("config/features.toml").exists());
    }

    #[test]
    fn reads_existing_file() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("config")).unwrap();
        fs::write(
            dir.path().join("config/features.toml"),
            "[chunk]\ngenerator = \"Void\"\nrandom_tick_speed = 10\n",
        )
        .unwrap();

        let config = AdvancedConfiguration::load(dir.path()).unwrap();
        assert_eq!(config.chunk.generator, GeneratorKind::Void);
        assert_eq!(config.chunk.random_tick_speed, 10);
        // Missing keys keep their defaults
        assert_eq!(config.chunk.flat_layers.len(), 3);
    }

    #[test]
    fn rejects_too_tall_flat_world() {
        let mut config = AdvancedConfiguration::default();
        config.chunk.flat_layers = vec![FlatLayer::new("stone", 400)];
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn rejects_unparsable_file() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("config")).unwrap();
        fs::write(dir.path().join("config/configuration.toml"), "seed = [").unwrap();

        assert!(matches!(
            BasicConfiguration::load(dir.path()),
            Err(ConfigError::Parse(..))
        ));
    }

    #[test]
    fn numeric_and_text_seeds() {
        let mut config = BasicConfiguration::default();
        assert_eq!(config.world_seed(), 0);

        config.seed = "-42".to_string();
        assert_eq!(config.world_seed(), -42);

        // "hello".hashCode() on the JVM
        config.seed = "hello".to_string();
        assert_eq!(config.world_seed(), 99162322);
    }
}
