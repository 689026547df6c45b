use wgpu::util::DeviceExt;

use crate::error::ValueError;

use super::slot::Uniform;
use super::value::UniformValue;

/// A uniform together with the GPU buffer it exclusively owns.
///
/// The buffer is created once with the packed size of the uniform's kind and
/// is never resized.
#[derive(Debug)]
pub struct GpuUniform {
    uniform: Uniform,
    buffer: wgpu::Buffer,
}

impl GpuUniform {
    pub fn new(device: &wgpu::Device, name: &str, uniform: Uniform) -> Self {
        let label = format!("fragpass uniform `{name}`");
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&label),
            contents: uniform.packed(),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        Self { uniform, buffer }
    }

    #[inline]
    pub fn uniform(&self) -> &Uniform {
        &self.uniform
    }

    #[inline]
    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    pub fn set(&mut self, value: impl Into<UniformValue>) -> Result<(), ValueError> {
        self.uniform.set(value)
    }

    /// Queues a write of the current packed bytes into the buffer.
    pub fn upload(&self, queue: &wgpu::Queue) {
        queue.write_buffer(&self.buffer, 0, self.uniform.packed());
    }
}
