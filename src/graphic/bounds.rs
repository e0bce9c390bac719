//! World-edge predicates and the collision box.

use super::Graphic;
use crate::surface::Rect;
use crate::world::World;

impl Graphic {
    /// Entirely past the left border.
    pub fn left_world_on_left(&self, world: &World) -> bool {
        self.x + self.width < world.border_offset
    }

    /// Left edge past the right border.
    pub fn left_is_greater_than_world_width(&self, world: &World) -> bool {
        self.x > world.width - world.border_offset
    }

    pub fn collide_with_bottom(&self, world: &World) -> bool {
        self.y + self.height >= world.height - world.border_offset
    }

    pub fn collide_with_top(&self, world: &World) -> bool {
        self.y < world.border_offset
    }

    pub fn is_within_board(&self, world: &World) -> bool {
        world.position_is_within_world(self.x, self.y, self.width, self.height)
    }

    /// Whether the draw pass would cull this entity.
    pub fn is_drawable(&self, world: &World) -> bool {
        self.is_visible && !self.left_world_on_left(world) && !self.left_is_greater_than_world_width(world)
    }

    /// The entity rectangle shrunk by the bounding box offsets on each side.
    pub fn bounding_box_rect(&self) -> Rect {
        let offset_x = self.bounding_box.offset_x;
        let offset_y = self.bounding_box.offset_y;
        Rect::new(
            self.x + offset_x,
            self.y + offset_y,
            (self.width - offset_x * 2.0).max(0.0),
            (self.height - offset_y * 2.0).max(0.0),
        )
    }
}
