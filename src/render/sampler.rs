//
// Sampler
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterMode {
    Nearest,
    Linear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressMode {
    ClampToEdge,
    Repeat,
    MirrorRepeat,
}

/// Sampling parameters applied to a texture after upload.
///
/// Defaults to trilinear filtering (linear min, mag and mip filter) with
/// repeat wrapping on both axes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SamplerBuilder {
    pub(crate) label: Option<String>,
    pub(crate) address_mode_u: AddressMode,
    pub(crate) address_mode_v: AddressMode,
    pub(crate) mag_filter: FilterMode,
    pub(crate) min_filter: FilterMode,
    pub(crate) mip_map_filter: FilterMode,
}

impl Default for SamplerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SamplerBuilder {
    pub fn new() -> Self {
        Self {
            label: None,
            address_mode_u: AddressMode::Repeat,
            address_mode_v: AddressMode::Repeat,
            mag_filter: FilterMode::Linear,
            min_filter: FilterMode::Linear,
            mip_map_filter: FilterMode::Linear,
        }
    }

    pub fn label(mut self, value: impl Into<String>) -> Self {
        self.label = Some(value.into());
        self
    }
    pub fn min_mag_filter(mut self, min: FilterMode, mag: FilterMode) -> Self {
        self.min_filter = min;
        self.mag_filter = mag;
        self
    }
    pub fn mip_map_filter(mut self, filter: FilterMode) -> Self {
        self.mip_map_filter = filter;
        self
    }
    pub fn with_address_mode(mut self, mode: AddressMode) -> Self {
        self.address_mode_u = mode;
        self.address_mode_v = mode;
        self
    }
    pub fn address_mode_separate(mut self, u: AddressMode, v: AddressMode) -> Self {
        self.address_mode_u = u;
        self.address_mode_v = v;
        self
    }
}

impl SamplerBuilder {
    pub fn min_filter(&self) -> FilterMode {
        self.min_filter
    }
    pub fn mag_filter(&self) -> FilterMode {
        self.mag_filter
    }
    pub fn mip_filter(&self) -> FilterMode {
        self.mip_map_filter
    }
    pub fn address_modes(&self) -> (AddressMode, AddressMode) {
        (self.address_mode_u, self.address_mode_v)
    }
}

impl From<FilterMode> for wgpu::FilterMode {
    fn from(value: FilterMode) -> Self {
        match value {
            FilterMode::Nearest => wgpu::FilterMode::Nearest,
            FilterMode::Linear => wgpu::FilterMode::Linear,
        }
    }
}

impl From<AddressMode> for wgpu::AddressMode {
    fn from(value: AddressMode) -> Self {
        match value {
            AddressMode::ClampToEdge => wgpu::AddressMode::ClampToEdge,
            AddressMode::Repeat => wgpu::AddressMode::Repeat,
            AddressMode::MirrorRepeat => wgpu::AddressMode::MirrorRepeat,
        }
    }
}

impl SamplerBuilder {
    pub(crate) fn descriptor(&self) -> wgpu::SamplerDescriptor<'_> {
        wgpu::SamplerDescriptor {
            label: self.label.as_deref(),
            address_mode_u: self.address_mode_u.into(),
            address_mode_v: self.address_mode_v.into(),
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: self.mag_filter.into(),
            min_filter: self.min_filter.into(),
            mipmap_filter: self.mip_map_filter.into(),
            lod_min_clamp: 0.0,
            lod_max_clamp: 32.0,
            anisotropy_clamp: 1,
            compare: None,
            border_color: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_trilinear_repeat() {
        let sampler = SamplerBuilder::default();
        assert_eq!(sampler.min_filter(), FilterMode::Linear);
        assert_eq!(sampler.mag_filter(), FilterMode::Linear);
        assert_eq!(sampler.mip_filter(), FilterMode::Linear);
        assert_eq!(
            sampler.address_modes(),
            (AddressMode::Repeat, AddressMode::Repeat)
        );
    }

    #[test]
    fn wgpu_descriptor_keeps_mip_range_open() {
        let sampler = SamplerBuilder::new()
            .label("sprites")
            .min_mag_filter(FilterMode::Nearest, FilterMode::Linear)
            .with_address_mode(AddressMode::ClampToEdge);
        let desc = sampler.descriptor();

        assert_eq!(desc.label, Some("sprites"));
        assert_eq!(desc.min_filter, wgpu::FilterMode::Nearest);
        assert_eq!(desc.mag_filter, wgpu::FilterMode::Linear);
        assert_eq!(desc.address_mode_u, wgpu::AddressMode::ClampToEdge);
        assert!(desc.lod_max_clamp > 0.0);
    }
}
