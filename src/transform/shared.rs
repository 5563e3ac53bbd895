use std::sync::Arc;

use parking_lot::RwLock;

use crate::foundation::error::MeshResult;
use crate::mesh::descriptor::MeshDescriptor;
use crate::transform::builder::{MeshTransformBuilder, MeshTransformOpts};
use crate::transform::mesh_transform::MeshTransform;
use crate::transform::policy::DepthNormalization;

struct Slot {
    current: Arc<MeshTransform>,
    generation: u64,
}

/// Swappable handle to the transform a renderer reads.
///
/// Readers [`load`](Self::load) an `Arc` snapshot and keep using it for as long as they like; a
/// writer replacing the transform never disturbs snapshots already handed out. The lock is only
/// held for the pointer swap.
pub struct SharedMeshTransform {
    slot: RwLock<Slot>,
}

impl SharedMeshTransform {
    /// Wrap an initial transform (generation 0).
    pub fn new(initial: MeshTransform) -> Self {
        Self::from_arc(Arc::new(initial))
    }

    /// Wrap an already shared transform (generation 0).
    pub fn from_arc(initial: Arc<MeshTransform>) -> Self {
        Self {
            slot: RwLock::new(Slot {
                current: initial,
                generation: 0,
            }),
        }
    }

    /// Snapshot of the current transform.
    pub fn load(&self) -> Arc<MeshTransform> {
        Arc::clone(&self.slot.read().current)
    }

    /// Number of swaps performed so far.
    pub fn generation(&self) -> u64 {
        self.slot.read().generation
    }

    /// Install `next` and return the transform it replaced.
    pub fn store(&self, next: impl Into<Arc<MeshTransform>>) -> Arc<MeshTransform> {
        let next = next.into();
        let mut slot = self.slot.write();
        slot.generation = slot.generation.wrapping_add(1);
        std::mem::replace(&mut slot.current, next)
    }

    /// Build a transform from `desc` and install it. On error nothing is swapped and the previous
    /// transform stays current.
    pub fn rebuild(
        &self,
        desc: &MeshDescriptor,
        policy: DepthNormalization,
        opts: MeshTransformOpts,
    ) -> MeshResult<Arc<MeshTransform>> {
        let next = Arc::new(MeshTransformBuilder::new(policy).opts(opts).build(desc)?);
        self.store(Arc::clone(&next));
        tracing::debug!(generation = self.generation(), "shared mesh transform swapped");
        Ok(next)
    }
}

impl std::fmt::Debug for SharedMeshTransform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let slot = self.slot.read();
        f.debug_struct("SharedMeshTransform")
            .field("generation", &slot.generation)
            .field("fingerprint", &slot.current.fingerprint())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transform/shared.rs"]
mod tests;
