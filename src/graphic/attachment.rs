//! Binding an entity's position and heading to another entity.

use glam::DVec2;

use super::{Behavior, Graphic};
use crate::object_manager::EntityKey;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attachment {
    pub target: EntityKey,
    /// Added to the target's top-left corner
    pub offset: DVec2,
}

/// Snapshot of the target values an attached entity copies. Taken by the
/// collection before the attached entity is borrowed mutably.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub x: f64,
    pub y: f64,
    pub angle: f64,
}

impl Anchor {
    pub fn of(target: &Graphic) -> Self {
        Anchor {
            x: target.x,
            y: target.y,
            angle: target.angle,
        }
    }
}

impl Graphic {
    /// Follows `target` from now on; its behavior becomes [`Behavior::Attached`].
    pub fn attach_to(&mut self, target: EntityKey, offset: DVec2) {
        self.attached_to = Some(Attachment { target, offset });
        self.behavior = Behavior::Attached;
    }

    /// Drops the relation. The behavior stays `Attached` and does nothing
    /// until replaced.
    pub fn detach(&mut self) {
        self.attached_to = None;
    }

    pub fn attached_to(&self) -> Option<&Attachment> {
        self.attached_to.as_ref()
    }

    pub(crate) fn update_attached(&mut self, anchor: Anchor) {
        let Some(attachment) = &self.attached_to else {
            return;
        };
        self.x = anchor.x + attachment.offset.x;
        self.y = anchor.y + attachment.offset.y;
        self.angle = anchor.angle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphic::test_support::shape_at;
    use slotmap::SlotMap;

    fn key() -> EntityKey {
        let mut keys: SlotMap<EntityKey, ()> = SlotMap::with_key();
        keys.insert(())
    }

    #[test]
    fn test_attached_copies_target_with_offset() {
        let target_key = key();
        let mut target = shape_at(100.0, 50.0);
        target.angle = 1.2;

        let mut rider = shape_at(0.0, 0.0);
        rider.attach_to(target_key, DVec2::new(5.0, -3.0));
        assert_eq!(rider.behavior(), Behavior::Attached);
        assert_eq!(rider.attached_to().unwrap().target, target_key);

        rider.update_attached(Anchor::of(&target));
        assert_eq!((rider.x, rider.y, rider.angle), (105.0, 47.0, 1.2));
    }

    #[test]
    fn test_detach_stops_following() {
        let mut rider = shape_at(1.0, 2.0);
        rider.attach_to(key(), DVec2::ZERO);
        rider.detach();
        assert!(rider.attached_to().is_none());
        assert_eq!(rider.behavior(), Behavior::Attached);

        rider.update_attached(Anchor {
            x: 50.0,
            y: 50.0,
            angle: 0.5,
        });
        assert_eq!((rider.x, rider.y, rider.angle), (1.0, 2.0, 0.0));
    }
}
