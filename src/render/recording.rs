use std::{cell::RefCell, rc::Rc};

use crate::{
    render::{GraphicsBackend, PixelFormat, SamplerBuilder, TextureDescriptor},
    BackendError,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Create {
        id: u32,
        label: String,
        width: u32,
        height: u32,
        format: PixelFormat,
        mip_level_count: u32,
    },
    WriteBaseLevel {
        id: u32,
        bytes: Vec<u8>,
    },
    GenerateMipmaps {
        id: u32,
    },
    SetSampler {
        id: u32,
        sampler: SamplerBuilder,
    },
    Bind {
        id: u32,
        slot: u32,
    },
    Destroy {
        id: u32,
    },
}

#[derive(Debug, Default)]
struct State {
    calls: Vec<Call>,
    next_id: u32,
    live: u32,
}

/// Backend that records calls instead of touching a GPU
#[derive(Debug, Clone, Default)]
pub(crate) struct RecordingBackend {
    state: Rc<RefCell<State>>,
    fail_allocation: bool,
}

impl RecordingBackend {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn failing() -> Self {
        Self {
            fail_allocation: true,
            ..Self::default()
        }
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.state.borrow().calls.clone()
    }

    pub(crate) fn live_textures(&self) -> u32 {
        self.state.borrow().live
    }

    pub(crate) fn destroy_count(&self, id: u32) -> usize {
        self.state
            .borrow()
            .calls
            .iter()
            .filter(|call| **call == Call::Destroy { id })
            .count()
    }

    /// Bytes uploaded to texture `id`
    pub(crate) fn uploaded(&self, id: u32) -> Option<Vec<u8>> {
        self.state.borrow().calls.iter().find_map(|call| match call {
            Call::WriteBaseLevel { id: i, bytes } if *i == id => Some(bytes.clone()),
            _ => None,
        })
    }
}

impl GraphicsBackend for RecordingBackend {
    type Texture = u32;

    fn create_texture(&self, desc: &TextureDescriptor<'_>) -> Result<u32, BackendError> {
        if self.fail_allocation {
            return Err(BackendError::Allocation("out of memory".to_string()));
        }

        let mut state = self.state.borrow_mut();
        let id = state.next_id;
        state.next_id += 1;
        state.live += 1;
        state.calls.push(Call::Create {
            id,
            label: desc.label.to_string(),
            width: desc.width,
            height: desc.height,
            format: desc.format,
            mip_level_count: desc.mip_level_count,
        });
        Ok(id)
    }

    fn write_base_level(&self, texture: &u32, _desc: &TextureDescriptor<'_>, bytes: &[u8]) {
        self.state.borrow_mut().calls.push(Call::WriteBaseLevel {
            id: *texture,
            bytes: bytes.to_vec(),
        });
    }

    fn generate_mipmaps(&self, texture: &u32) {
        self.state
            .borrow_mut()
            .calls
            .push(Call::GenerateMipmaps { id: *texture });
    }

    fn set_sampler(&self, texture: &mut u32, sampler: &SamplerBuilder) {
        self.state.borrow_mut().calls.push(Call::SetSampler {
            id: *texture,
            sampler: sampler.clone(),
        });
    }

    fn bind(&self, texture: &u32, slot: u32) {
        self.state.borrow_mut().calls.push(Call::Bind {
            id: *texture,
            slot,
        });
    }

    fn destroy(&self, texture: u32) {
        let mut state = self.state.borrow_mut();
        state.live -= 1;
        state.calls.push(Call::Destroy { id: texture });
    }
}
