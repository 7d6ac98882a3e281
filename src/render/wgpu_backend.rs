use std::{
    cell::{Cell, RefCell},
    rc::Rc,
    sync::Arc,
};

use rustc_hash::FxHashMap;

use crate::{
    codec::widen_rgb_into,
    render::{
        mipmap::{sampling_layout, MipmapGenerator},
        GraphicsBackend, PixelFormat, SamplerBuilder, TextureDescriptor,
    },
    BackendError,
};

/// Texture owned by a [`WgpuBackend`]
pub struct WgpuTexture {
    id: u64,
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    sampler: Option<wgpu::Sampler>,
}

impl WgpuTexture {
    pub fn texture(&self) -> &wgpu::Texture {
        &self.texture
    }
    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }
    pub fn sampler(&self) -> Option<&wgpu::Sampler> {
        self.sampler.as_ref()
    }
}

struct Shared {
    sampling_layout: wgpu::BindGroupLayout,
    default_sampler: wgpu::Sampler,
    mipmaps: MipmapGenerator,

    /// slot -> (texture id, bind group)
    slots: RefCell<FxHashMap<u32, (u64, Rc<wgpu::BindGroup>)>>,
    next_id: Cell<u64>,
}

/// [`GraphicsBackend`] on top of a wgpu device.
///
/// Slots are modelled as a table of bind groups (texture at binding 0, sampler
/// at binding 1, see [`WgpuBackend::sampling_layout`]) that render passes read
/// through [`WgpuBackend::bound`]. The backend is `!Send`, it stays on the
/// thread that created it.
#[derive(Clone)]
pub struct WgpuBackend {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    srgb: bool,

    shared: Rc<Shared>,
}

impl WgpuBackend {
    pub fn new(device: Arc<wgpu::Device>, queue: Arc<wgpu::Queue>) -> Self {
        let shared = Shared {
            sampling_layout: sampling_layout(&device, "texture sampling layout"),
            default_sampler: device.create_sampler(&SamplerBuilder::new().descriptor()),
            mipmaps: MipmapGenerator::new(&device),
            slots: RefCell::new(FxHashMap::default()),
            next_id: Cell::new(0),
        };

        Self {
            device,
            queue,
            srgb: false,
            shared: Rc::new(shared),
        }
    }

    /// Create a backend without a surface
    ///
    /// Blocking call
    pub fn headless() -> Result<Self, BackendError> {
        let instance = wgpu::Instance::default();

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: None,
            force_fallback_adapter: false,
        }))
        .ok_or_else(|| BackendError::Allocation("could not find adapter".to_string()))?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::downlevel_defaults(),
                label: Some("texture device"),
                memory_hints: wgpu::MemoryHints::Performance,
            },
            None,
        ))
        .map_err(|err| BackendError::Allocation(err.to_string()))?;

        tracing::info!("Created headless device on {:?}", adapter.get_info().name);

        Ok(Self::new(Arc::new(device), Arc::new(queue)))
    }

    /// Store textures in sRGB formats
    pub fn srgb(mut self, enabled: bool) -> Self {
        self.srgb = enabled;
        self
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }
    pub fn sampling_layout(&self) -> &wgpu::BindGroupLayout {
        &self.shared.sampling_layout
    }

    /// Bind group currently bound to `slot`
    pub fn bound(&self, slot: u32) -> Option<Rc<wgpu::BindGroup>> {
        self.shared
            .slots
            .borrow()
            .get(&slot)
            .map(|(_, group)| group.clone())
    }

    /// wgpu has no 3 channel 8 bit format, RGB is stored as RGBA
    pub fn texture_format(&self, _format: PixelFormat) -> wgpu::TextureFormat {
        if self.srgb {
            wgpu::TextureFormat::Rgba8UnormSrgb
        } else {
            wgpu::TextureFormat::Rgba8Unorm
        }
    }

    fn next_id(&self) -> u64 {
        let id = self.shared.next_id.get();
        self.shared.next_id.set(id + 1);
        id
    }
}

impl GraphicsBackend for WgpuBackend {
    type Texture = WgpuTexture;

    fn create_texture(&self, desc: &TextureDescriptor<'_>) -> Result<WgpuTexture, BackendError> {
        self.device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
        self.device.push_error_scope(wgpu::ErrorFilter::Validation);

        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(desc.label),
            size: wgpu::Extent3d {
                width: desc.width,
                height: desc.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: desc.mip_level_count,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: self.texture_format(desc.format),
            usage: wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_DST
                | wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });

        let validation = pollster::block_on(self.device.pop_error_scope());
        let out_of_memory = pollster::block_on(self.device.pop_error_scope());
        if let Some(err) = validation.or(out_of_memory) {
            texture.destroy();
            return Err(BackendError::Allocation(err.to_string()));
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Ok(WgpuTexture {
            id: self.next_id(),
            texture,
            view,
            sampler: None,
        })
    }

    fn write_base_level(
        &self,
        texture: &WgpuTexture,
        desc: &TextureDescriptor<'_>,
        bytes: &[u8],
    ) {
        let widened;
        let rgba = match desc.format {
            PixelFormat::Rgba8 => bytes,
            PixelFormat::Rgb8 => {
                let mut buffer = vec![0u8; desc.width as usize * desc.height as usize * 4];
                widen_rgb_into(bytes, &mut buffer);
                widened = buffer;
                widened.as_slice()
            }
        };

        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * desc.width),
                rows_per_image: Some(desc.height),
            },
            wgpu::Extent3d {
                width: desc.width,
                height: desc.height,
                depth_or_array_layers: 1,
            },
        );
    }

    fn generate_mipmaps(&self, texture: &WgpuTexture) {
        self.shared
            .mipmaps
            .generate(&self.device, &self.queue, &texture.texture);
    }

    fn set_sampler(&self, texture: &mut WgpuTexture, sampler: &SamplerBuilder) {
        texture.sampler = Some(self.device.create_sampler(&sampler.descriptor()));
    }

    fn bind(&self, texture: &WgpuTexture, slot: u32) {
        let sampler = texture
            .sampler
            .as_ref()
            .unwrap_or(&self.shared.default_sampler);
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("texture bind group"),
            layout: &self.shared.sampling_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });

        self.shared
            .slots
            .borrow_mut()
            .insert(slot, (texture.id, Rc::new(bind_group)));
    }

    fn destroy(&self, texture: WgpuTexture) {
        self.shared
            .slots
            .borrow_mut()
            .retain(|_, (id, _)| *id != texture.id);
        texture.texture.destroy();
    }
}
