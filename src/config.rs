use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::render::SamplerBuilder;

//
// Texture config
//

/// Settings shared by every texture a [`crate::TextureLoader`] builds
#[derive(Debug, Clone)]
pub struct TextureConfig {
    pub(crate) log_level: tracing::Level,
    pub(crate) sampler: SamplerBuilder,
    pub(crate) generate_mipmaps: bool,
    pub(crate) default_slot: u32,
}

impl Default for TextureConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl TextureConfig {
    pub fn new() -> Self {
        Self {
            log_level: tracing::Level::INFO,
            sampler: SamplerBuilder::new(),
            generate_mipmaps: true,
            default_slot: 0,
        }
    }

    pub fn log_level(mut self, log_level: tracing::Level) -> Self {
        self.log_level = log_level;
        self
    }

    pub fn sampler(mut self, sampler: SamplerBuilder) -> Self {
        self.sampler = sampler;
        self
    }

    /// Generate a full mip chain after upload, a single level otherwise
    pub fn generate_mipmaps(mut self, enabled: bool) -> Self {
        self.generate_mipmaps = enabled;
        self
    }

    /// Slot used by [`crate::render::Texture::bind`]
    pub fn default_slot(mut self, slot: u32) -> Self {
        self.default_slot = slot;
        self
    }
}

impl TextureConfig {
    /// Install a global tracing subscriber filtered at `log_level`.
    ///
    /// Only the first call installs anything, later calls log an error.
    pub fn init_logging(&self) {
        let filter_layer = tracing_subscriber::filter::LevelFilter::from(self.log_level);
        let format_layer = tracing_subscriber::fmt::layer();
        let subscriber = tracing_subscriber::registry()
            .with(filter_layer)
            .with(format_layer);

        match subscriber.try_init() {
            Ok(_) => tracing::info!("successfully initialized tracing subscriber"),
            Err(err) => {
                tracing::error!("could not initialize tracing subscriber: {}", err)
            }
        }
    }
}
