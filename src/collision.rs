/// Collision detection between entities
///
/// Axis-aligned bounding box tests over the entities' collision boxes. The
/// collection gathers the intersecting pairs first and only then hands each
/// side the other one through `Graphic::has_collided_with`, so no entity is
/// borrowed twice.
///
/// # Filtering
///
/// - Entities with `is_collidable == false` never collide.
/// - Two entities of the same `type` only collide when either side sets
///   `can_collide_with_same_type`.
/// - Untyped entities always count as different types.
use crate::graphic::Graphic;
use crate::surface::Rect;

/// Anything that takes part in collision detection.
pub trait Collidable {
    /// Box used for intersection tests, in world coordinates.
    fn bounds(&self) -> Rect;

    /// Category tag compared for same-type filtering.
    fn collision_kind(&self) -> Option<&str>;

    fn is_collidable(&self) -> bool;

    fn collides_with_same_kind(&self) -> bool;

    /// Whether the filters allow these two to collide at all.
    fn can_collide_with(&self, other: &dyn Collidable) -> bool {
        if !self.is_collidable() || !other.is_collidable() {
            return false;
        }
        match (self.collision_kind(), other.collision_kind()) {
            (Some(a), Some(b)) if a == b => self.collides_with_same_kind() || other.collides_with_same_kind(),
            _ => true,
        }
    }
}

impl Collidable for Graphic {
    fn bounds(&self) -> Rect {
        self.bounding_box_rect()
    }

    fn collision_kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    fn is_collidable(&self) -> bool {
        self.is_collidable
    }

    fn collides_with_same_kind(&self) -> bool {
        self.can_collide_with_same_type
    }
}

/// Checks if two axis-aligned boxes overlap. Touching edges do not count.
pub fn aabb_intersect(a: &Rect, b: &Rect) -> bool {
    let x_overlap = a.x < b.x + b.width && a.x + a.width > b.x;
    let y_overlap = a.y < b.y + b.height && a.y + a.height > b.y;

    x_overlap && y_overlap
}

/// Every unordered pair of `entities` that passes the filters and overlaps,
/// in input order.
pub fn collision_pairs<'a, K, T>(entities: &[(K, &'a T)]) -> Vec<(K, K)>
where
    K: Copy,
    T: Collidable + 'a,
{
    let mut pairs = Vec::new();
    for (i, (key_a, a)) in entities.iter().enumerate() {
        for (key_b, b) in &entities[i + 1..] {
            if a.can_collide_with(*b) && aabb_intersect(&a.bounds(), &b.bounds()) {
                pairs.push((*key_a, *key_b));
            }
        }
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphic::test_support::shape_at;

    fn collidable(x: f64, y: f64, kind: Option<&str>) -> Graphic {
        let mut g = shape_at(x, y);
        g.is_collidable = true;
        g.kind = kind.map(str::to_string);
        g
    }

    #[test]
    fn test_aabb_intersect() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(aabb_intersect(&a, &Rect::new(5.0, 5.0, 10.0, 10.0)));
        assert!(!aabb_intersect(&a, &Rect::new(10.0, 0.0, 10.0, 10.0)));
        assert!(!aabb_intersect(&a, &Rect::new(0.0, 20.0, 10.0, 10.0)));
    }

    #[test]
    fn test_same_kind_filtered_unless_allowed() {
        let a = collidable(0.0, 0.0, Some("enemy"));
        let mut b = collidable(5.0, 5.0, Some("enemy"));
        let c = collidable(5.0, 5.0, Some("player"));
        assert!(!a.can_collide_with(&b));
        assert!(a.can_collide_with(&c));

        b.can_collide_with_same_type = true;
        assert!(a.can_collide_with(&b));
    }

    #[test]
    fn test_non_collidable_never_collides() {
        let a = collidable(0.0, 0.0, None);
        let mut b = collidable(5.0, 5.0, None);
        assert!(a.can_collide_with(&b));
        b.is_collidable = false;
        assert!(!a.can_collide_with(&b));
    }

    #[test]
    fn test_collision_pairs_use_bounding_box() {
        let a = collidable(0.0, 0.0, None);
        let mut b = collidable(18.0, 0.0, None);
        let c = collidable(100.0, 100.0, None);
        let pairs = collision_pairs(&[(1, &a), (2, &b), (3, &c)]);
        assert_eq!(pairs, vec![(1, 2)]);

        // shrinking b's box by 3 on each side separates it from a
        b.bounding_box.offset_x = 3.0;
        b.bounding_box.offset_y = 3.0;
        assert!(collision_pairs(&[(1, &a), (2, &b)]).is_empty());
    }
}
