//! Animation lock synchronization.
//!
//! Some host animations only make sense while something is attached: a
//! `.hold_item` pose while the `item` locator shows a proxy, a `.wear_hat`
//! pose while `item_hat` does. The coordinator keeps those animations locked
//! in the playing state exactly while their locator has a live proxy.

use crate::config::{AnimationLock, RigConfig};
use crate::host::AnimationHost;
use crate::proxy::ProxyLifecycleManager;
use crate::registry::AttachmentRegistry;

#[derive(Debug, Clone, Default)]
pub struct AnimationSyncCoordinator {
    locks: Vec<AnimationLock>,
}

impl AnimationSyncCoordinator {
    #[must_use]
    pub fn new(config: &RigConfig) -> Self {
        Self {
            locks: config.animation_locks.clone(),
        }
    }

    #[must_use]
    pub fn locks(&self) -> &[AnimationLock] {
        &self.locks
    }

    /// Locks or releases every configured animation according to the current
    /// proxies.
    ///
    /// Releasing only touches animations that are currently locked, so an
    /// animation the user started by hand keeps playing.
    pub fn sync<A>(&self, host: &mut A, registry: &AttachmentRegistry, proxies: &ProxyLifecycleManager)
    where
        A: AnimationHost + ?Sized,
    {
        if !host.animation_mode_active() {
            return;
        }

        for lock in &self.locks {
            let Some(animation) = host.find_animation(&lock.suffix) else {
                continue;
            };

            let attached = registry
                .points_named(&lock.attachment)
                .any(|point| proxies.has_proxy(point.id()));
            let locked = host.is_animation_locked(animation);

            if attached && !locked {
                log::debug!("Locking '*{}' for '{}'", lock.suffix, lock.attachment);
                host.set_animation_locked(animation, true);
            } else if !attached && locked {
                log::debug!("Releasing '*{}'", lock.suffix);
                host.set_animation_locked(animation, false);
            }
        }
    }

    /// Hands every configured animation back to the user.
    pub fn release_all<A>(&self, host: &mut A)
    where
        A: AnimationHost + ?Sized,
    {
        for lock in &self.locks {
            if let Some(animation) = host.find_animation(&lock.suffix)
                && host.is_animation_locked(animation)
            {
                host.set_animation_locked(animation, false);
            }
        }
    }
}
