use crate::level::Level;
use glam::Vec3;
use levelforge_common::EntityUid;

/// Closest entity hit by a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastHit {
    pub entity: EntityUid,
    pub distance: f32,
    pub position: Vec3,
}

/// "What am I pointing at" query, supplied by the host.
///
/// Implementations must report the closest intersected entity that is not
/// `exclude`, within `max_distance`, or `None`.
pub trait EntityRaycaster {
    fn raycast_vs_entities(
        &self,
        level: &Level,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        exclude: Option<EntityUid>,
    ) -> Option<RaycastHit>;
}

/// Treats every entity as an axis-aligned unit cube centred on its position
/// and scaled by its uniform scale. Orientation is ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoundsRaycaster;

impl BoundsRaycaster {
    /// Half extent of an entity's box at `scale`.
    pub fn half_extent(scale: f32) -> f32 {
        0.5 * scale.abs()
    }
}

impl EntityRaycaster for BoundsRaycaster {
    fn raycast_vs_entities(
        &self,
        level: &Level,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        exclude: Option<EntityUid>,
    ) -> Option<RaycastHit> {
        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO {
            return None;
        }
        let mut best: Option<RaycastHit> = None;
        for entity in level.entities() {
            if Some(entity.uid) == exclude {
                continue;
            }
            let half = Vec3::splat(Self::half_extent(entity.transform.scale));
            let center = entity.transform.position;
            let Some(distance) = ray_vs_aabb(origin, direction, center - half, center + half)
            else {
                continue;
            };
            if distance > max_distance || best.is_some_and(|b| b.distance <= distance) {
                continue;
            }
            best = Some(RaycastHit {
                entity: entity.uid,
                distance,
                position: origin + direction * distance,
            });
        }
        best
    }
}

/// Slab test. Returns the entry distance, or zero when the origin is inside.
fn ray_vs_aabb(origin: Vec3, direction: Vec3, mins: Vec3, maxs: Vec3) -> Option<f32> {
    let mut t_min = 0.0_f32;
    let mut t_max = f32::INFINITY;
    for axis in 0..3 {
        let o = origin[axis];
        let d = direction[axis];
        if d.abs() < f32::EPSILON {
            if o < mins[axis] || o > maxs[axis] {
                return None;
            }
            continue;
        }
        let inv = 1.0 / d;
        let mut t0 = (mins[axis] - o) * inv;
        let mut t1 = (maxs[axis] - o) * inv;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        t_min = t_min.max(t0);
        t_max = t_max.min(t1);
        if t_min > t_max {
            return None;
        }
    }
    Some(t_min)
}

#[cfg(test)]
mod tests {
    use super::*;
    use levelforge_common::{EntityKind, Transform};

    fn level_with_crates(xs: &[f32]) -> (Level, Vec<EntityUid>) {
        let mut level = Level::with_player_start(Transform::at(Vec3::new(0.0, 0.0, -50.0)));
        let uids = xs
            .iter()
            .map(|x| {
                level
                    .spawn(EntityKind::Crate, Transform::at(Vec3::new(*x, 0.0, 0.0)))
                    .unwrap()
            })
            .collect();
        (level, uids)
    }

    #[test]
    fn reports_closest_hit() {
        let (level, uids) = level_with_crates(&[6.0, 3.0]);
        let hit = BoundsRaycaster
            .raycast_vs_entities(&level, Vec3::ZERO, Vec3::X, 10.0, None)
            .unwrap();
        assert_eq!(hit.entity, uids[1]);
        assert!((hit.distance - 2.5).abs() < 1e-5);
        assert!((hit.position - Vec3::new(2.5, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn respects_max_distance() {
        let (level, _) = level_with_crates(&[12.0]);
        assert!(
            BoundsRaycaster
                .raycast_vs_entities(&level, Vec3::ZERO, Vec3::X, 10.0, None)
                .is_none()
        );
    }

    #[test]
    fn skips_excluded_entity() {
        let (level, uids) = level_with_crates(&[3.0, 6.0]);
        let hit = BoundsRaycaster
            .raycast_vs_entities(&level, Vec3::ZERO, Vec3::X, 10.0, Some(uids[0]))
            .unwrap();
        assert_eq!(hit.entity, uids[1]);
    }

    #[test]
    fn misses_when_pointing_away() {
        let (level, _) = level_with_crates(&[3.0]);
        assert!(
            BoundsRaycaster
                .raycast_vs_entities(&level, Vec3::ZERO, Vec3::NEG_X, 10.0, None)
                .is_none()
        );
        assert!(
            BoundsRaycaster
                .raycast_vs_entities(&level, Vec3::ZERO, Vec3::ZERO, 10.0, None)
                .is_none()
        );
    }

    #[test]
    fn scale_grows_the_box() {
        let mut level = Level::new();
        let uid = level
            .spawn(
                EntityKind::Door,
                Transform {
                    position: Vec3::new(5.0, 0.0, 0.0),
                    scale: 4.0,
                    ..Transform::default()
                },
            )
            .unwrap();
        let hit = BoundsRaycaster
            .raycast_vs_entities(&level, Vec3::new(0.0, 1.5, 0.0), Vec3::X, 10.0, None)
            .unwrap();
        assert_eq!(hit.entity, uid);
        assert!((hit.distance - 3.0).abs() < 1e-5);
    }

    #[test]
    fn sees_player_start() {
        let level = Level::new();
        let hit = BoundsRaycaster
            .raycast_vs_entities(&level, Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z, 10.0, None)
            .unwrap();
        assert_eq!(hit.entity, EntityUid::PLAYER_START);
    }
}
