//! The entity collection
//!
//! [`EntityCollection`] is everything the frame loop needs from the set of
//! live entities. [`ObjectManager`] implements it over a [`SlotMap`] plus an
//! insertion-order list, which is also the draw order: later entities are
//! painted over earlier ones.

use slotmap::{SlotMap, new_key_type};

use crate::collision;
use crate::graphic::{Anchor, DrawContext, Graphic, UpdateContext};
use crate::timer::{FiredTimer, Scheduler};

new_key_type! {
    /// Stable handle to an entity inside a collection.
    pub struct EntityKey;
}

pub trait EntityCollection {
    /// Takes ownership of `graphic` and assigns its key.
    fn add(&mut self, graphic: Graphic) -> EntityKey;

    /// Removes an entity and cancels every timer it owns.
    fn remove(&mut self, key: EntityKey, scheduler: &mut Scheduler) -> Option<Graphic>;

    fn get(&self, key: EntityKey) -> Option<&Graphic>;

    fn get_mut(&mut self, key: EntityKey) -> Option<&mut Graphic>;

    /// Keys in insertion order.
    fn keys(&self) -> Vec<EntityKey>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshots each entity's position and runs its behavior.
    fn update_all(&mut self, ctx: &mut UpdateContext<'_>);

    /// Draws every entity in insertion order. A failing entity is logged and
    /// skipped; the rest still draw.
    fn draw_all(&mut self, ctx: &mut DrawContext<'_>);

    /// Notifies both sides of every colliding pair; returns the pairs.
    fn detect_collisions(&mut self) -> Vec<(EntityKey, EntityKey)>;

    /// Hands fired timers to their owners. Timers whose owner is gone are
    /// cancelled.
    fn dispatch_timers(&mut self, fired: &[FiredTimer], scheduler: &mut Scheduler) {
        for timer in fired {
            match self.get_mut(timer.owner) {
                Some(graphic) => graphic.on_timer(timer.task, scheduler.rng()),
                None => {
                    if scheduler.cancel(timer.handle) {
                        log::debug!("dropped timer of removed entity {:?}", timer.owner);
                    }
                }
            }
        }
    }
}

#[derive(Default)]
pub struct ObjectManager {
    objects: SlotMap<EntityKey, Graphic>,
    order: Vec<EntityKey>,
}

impl ObjectManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entities in draw order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityKey, &Graphic)> + '_ {
        self.order
            .iter()
            .filter_map(|&key| self.objects.get(key).map(|g| (key, g)))
    }

    /// First entity with the given caller id.
    pub fn find_by_id(&self, id: &str) -> Option<EntityKey> {
        self.iter()
            .find(|(_, g)| g.id.as_deref() == Some(id))
            .map(|(key, _)| key)
    }

    /// Removes every entity, cancelling their timers.
    pub fn clear(&mut self, scheduler: &mut Scheduler) {
        for key in std::mem::take(&mut self.order) {
            if let Some(mut graphic) = self.objects.remove(key) {
                graphic.cancel_timers(scheduler);
                scheduler.cancel_owner(key);
            }
        }
    }

    fn anchor_for(&self, graphic: &Graphic) -> Option<Anchor> {
        let attachment = graphic.attached_to()?;
        self.objects.get(attachment.target).map(Anchor::of)
    }
}

impl EntityCollection for ObjectManager {
    fn add(&mut self, mut graphic: Graphic) -> EntityKey {
        let key = self.objects.insert_with_key(|key| {
            graphic.set_key(key);
            graphic
        });
        self.order.push(key);
        key
    }

    fn remove(&mut self, key: EntityKey, scheduler: &mut Scheduler) -> Option<Graphic> {
        let mut graphic = self.objects.remove(key)?;
        self.order.retain(|&k| k != key);
        graphic.cancel_timers(scheduler);
        scheduler.cancel_owner(key);
        log::debug!("removed entity {:?} ({:?})", key, graphic.id);
        Some(graphic)
    }

    fn get(&self, key: EntityKey) -> Option<&Graphic> {
        self.objects.get(key)
    }

    fn get_mut(&mut self, key: EntityKey) -> Option<&mut Graphic> {
        self.objects.get_mut(key)
    }

    fn keys(&self) -> Vec<EntityKey> {
        self.order.clone()
    }

    fn len(&self) -> usize {
        self.objects.len()
    }

    fn update_all(&mut self, ctx: &mut UpdateContext<'_>) {
        for i in 0..self.order.len() {
            let key = self.order[i];
            let Some(graphic) = self.objects.get(key) else {
                continue;
            };
            let anchor = self.anchor_for(graphic);
            if let Some(graphic) = self.objects.get_mut(key) {
                graphic.set_last_position();
                graphic.update(ctx, anchor);
            }
        }
    }

    fn draw_all(&mut self, ctx: &mut DrawContext<'_>) {
        for key in &self.order {
            let Some(graphic) = self.objects.get_mut(*key) else {
                continue;
            };
            if let Err(e) = graphic.draw(ctx) {
                log::error!("failed to draw entity {:?} ({:?}): {}", key, graphic.id, e);
            }
        }
    }

    fn detect_collisions(&mut self) -> Vec<(EntityKey, EntityKey)> {
        let pairs = {
            let entities: Vec<(EntityKey, &Graphic)> = self.iter().collect();
            collision::collision_pairs(&entities)
        };

        for &(a, b) in &pairs {
            if let Some([first, second]) = self.objects.get_disjoint_mut([a, b]) {
                first.has_collided_with(second);
                second.has_collided_with(first);
            }
        }
        pairs
    }
}
