//! Value mirrors.
//!
//! A mirror is the caller's handle on one scope's uniforms. Reading returns the
//! current logical value; writing validates, repacks, uploads to the uniform's
//! buffer and only then becomes visible to later reads. There is no separate
//! upload call.
//!
//! The context (for globals) or the pass (for locals) owns the uniforms; a
//! mirror only holds a weak handle. Once the owner is gone (re-init, teardown,
//! pass removal) the buffers and the queue are released, writes fail with
//! [`Error::Detached`] and reads return nothing.

use std::cell::{Ref, RefCell};
use std::ops::Deref;
use std::rc::{Rc, Weak};

use crate::error::{Error, Result};
use crate::pass::PassId;
use crate::uniform::{Scope, UniformSet, UniformValue};

/// One scope's uniforms together with the queue their writes are uploaded on.
pub(crate) struct SharedUniforms {
    uniforms: RefCell<UniformSet>,
    queue: wgpu::Queue,
}

impl SharedUniforms {
    pub(crate) fn new(set: UniformSet, queue: wgpu::Queue) -> Rc<Self> {
        Rc::new(Self {
            uniforms: RefCell::new(set),
            queue,
        })
    }

    pub(crate) fn borrow(&self) -> Ref<'_, UniformSet> {
        self.uniforms.borrow()
    }

    /// Uploads the current bytes of every uniform.
    pub(crate) fn upload_all(&self) {
        self.uniforms.borrow().upload_all(&self.queue);
    }

    fn assign(&self, name: &str, value: UniformValue) -> Result<()> {
        self.uniforms.borrow_mut().set(&self.queue, name, value)
    }

    pub(crate) fn mirror(self: &Rc<Self>) -> UniformMirror {
        UniformMirror {
            scope: self.borrow().scope(),
            shared: Rc::downgrade(self),
        }
    }
}

/// Mirror over one scope's uniforms.
#[derive(Clone)]
pub struct UniformMirror {
    scope: Scope,
    shared: Weak<SharedUniforms>,
}

impl UniformMirror {
    fn with<R>(&self, f: impl FnOnce(&UniformSet) -> R) -> Option<R> {
        self.shared.upgrade().map(|shared| {
            let set = shared.borrow();
            f(&set)
        })
    }

    /// Assigns `value` to the uniform named `name` and pushes it to the GPU.
    ///
    /// Fails with [`Error::UnknownUniform`], [`Error::Shape`],
    /// [`Error::Inexact`] or [`Error::Detached`]; on failure the previous value
    /// is kept.
    pub fn set(&self, name: &str, value: impl Into<UniformValue>) -> Result<()> {
        let shared = self.shared.upgrade().ok_or(Error::Detached)?;
        shared.assign(name, value.into())
    }

    /// Current logical value of `name`.
    pub fn get(&self, name: &str) -> Option<UniformValue> {
        self.with(|set| set.get(name).map(|u| u.uniform().value().clone()))
            .flatten()
    }

    pub fn get_f32(&self, name: &str) -> Option<f32> {
        self.get(name).and_then(|v| v.as_f32())
    }

    pub fn get_i32(&self, name: &str) -> Option<i32> {
        self.get(name).and_then(|v| v.as_i32())
    }

    /// Current packed bytes of `name`, as last uploaded.
    pub fn packed(&self, name: &str) -> Option<Vec<u8>> {
        self.with(|set| set.get(name).map(|u| u.uniform().packed().to_vec()))
            .flatten()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.with(|set| set.get(name).is_some()).unwrap_or(false)
    }

    /// Whether the owning context or pass still exists.
    pub fn is_attached(&self) -> bool {
        self.shared.strong_count() > 0
    }

    /// Uniform names in binding order; empty once detached.
    pub fn names(&self) -> Vec<String> {
        self.with(|set| set.names().map(str::to_string).collect())
            .unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.with(UniformSet::len).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// WGSL binding declarations for this mirror's uniforms.
    pub fn shader_prelude(&self) -> String {
        self.with(UniformSet::shader_prelude).unwrap_or_default()
    }
}

impl std::fmt::Debug for UniformMirror {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Some(shared) = self.shared.upgrade() else {
            return f.write_str("UniformMirror(detached)");
        };
        let set = shared.borrow();
        f.debug_map()
            .entries(set.iter().map(|(n, u)| (n, u.uniform().value())))
            .finish()
    }
}

/// Mirror over a pass's local uniforms, carrying the pass identity.
#[derive(Clone, Debug)]
pub struct PassMirror {
    id: PassId,
    uniforms: UniformMirror,
}

impl PassMirror {
    pub(crate) fn new(id: PassId, uniforms: UniformMirror) -> Self {
        Self { id, uniforms }
    }

    /// Identity used by [`Context::remove_pass`](crate::Context::remove_pass).
    #[inline]
    pub fn id(&self) -> PassId {
        self.id
    }

    #[inline]
    pub fn uniforms(&self) -> &UniformMirror {
        &self.uniforms
    }
}

impl Deref for PassMirror {
    type Target = UniformMirror;

    fn deref(&self) -> &UniformMirror {
        &self.uniforms
    }
}
