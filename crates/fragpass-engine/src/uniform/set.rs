use crate::error::{Error, Result};

use super::gpu::GpuUniform;
use super::slot::Scope;
use super::value::UniformValue;

/// Ordered, named uniforms of one scope.
///
/// Order is declaration order and matches binding indices.
#[derive(Debug)]
pub struct UniformSet {
    scope: Scope,
    entries: Vec<(String, GpuUniform)>,
}

impl UniformSet {
    pub(crate) fn new(scope: Scope, entries: Vec<(String, GpuUniform)>) -> Self {
        Self { scope, entries }
    }

    #[inline]
    pub fn scope(&self) -> Scope {
        self.scope
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&GpuUniform> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, u)| u)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &GpuUniform)> {
        self.entries.iter().map(|(n, u)| (n.as_str(), u))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    /// Validates, repacks and uploads a new value for `name`.
    ///
    /// On error nothing changes, neither on the CPU nor on the GPU.
    pub fn set(&mut self, queue: &wgpu::Queue, name: &str, value: UniformValue) -> Result<()> {
        let uniform = self
            .entries
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, u)| u)
            .ok_or_else(|| Error::UnknownUniform(name.to_string()))?;

        uniform.set(value)?;
        uniform.upload(queue);
        Ok(())
    }

    /// Uploads the current bytes of every uniform.
    pub fn upload_all(&self, queue: &wgpu::Queue) {
        for (_, uniform) in &self.entries {
            uniform.upload(queue);
        }
    }

    /// WGSL declarations for every uniform, one per line.
    pub fn shader_prelude(&self) -> String {
        crate::binding::shader_prelude(self.iter().map(|(n, u)| (n, u.uniform())))
    }
}
