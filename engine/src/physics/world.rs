//! Physics world
//!
//! Registry of simulated bodies plus the static terrain spheres they stand on.
//! Bodies enter and leave only through [`PhysicsWorld::insert`] and
//! [`PhysicsWorld::remove`]; the coordinator calls those at mount/dismount.
//!
//! There is no world gravity. Every body is pulled by the gravity field, which
//! applies its force before the world steps.

use glam::Vec3;

use super::body::{BodyKind, RigidBody};
use super::collision::{HitTarget, RayHit, aabb_surface_normal, ray_aabb_intersect, ray_sphere_intersect};
use super::stepper::FixedStepper;
use super::types::Collider;

/// Stable handle to a body slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyHandle(usize);

impl BodyHandle {
    /// Slot index, mostly useful for logging.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Static sphere collider. Each attractor contributes one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerrainSphere {
    pub center: Vec3,
    pub radius: f32,
}

/// The simulated world.
#[derive(Debug, Default)]
pub struct PhysicsWorld {
    slots: Vec<Option<RigidBody>>,
    terrain: Vec<TerrainSphere>,
}

impl PhysicsWorld {
    /// Create an empty world.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a world whose terrain is the given spheres.
    pub fn with_terrain(terrain: Vec<TerrainSphere>) -> Self {
        Self {
            slots: Vec::new(),
            terrain,
        }
    }

    pub fn terrain(&self) -> &[TerrainSphere] {
        &self.terrain
    }

    /// Insert a body, reusing the first free slot.
    pub fn insert(&mut self, body: RigidBody) -> BodyHandle {
        if let Some(index) = self.slots.iter().position(Option::is_none) {
            self.slots[index] = Some(body);
            return BodyHandle(index);
        }
        self.slots.push(Some(body));
        BodyHandle(self.slots.len() - 1)
    }

    /// Remove a body and hand it back to the caller.
    pub fn remove(&mut self, handle: BodyHandle) -> Option<RigidBody> {
        self.slots.get_mut(handle.0).and_then(Option::take)
    }

    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.get(handle).is_some()
    }

    pub fn get(&self, handle: BodyHandle) -> Option<&RigidBody> {
        self.slots.get(handle.0).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, handle: BodyHandle) -> Option<&mut RigidBody> {
        self.slots.get_mut(handle.0).and_then(Option::as_mut)
    }

    /// Number of bodies currently simulated.
    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over live bodies.
    pub fn bodies(&self) -> impl Iterator<Item = (BodyHandle, &RigidBody)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|body| (BodyHandle(i), body)))
    }

    /// Number of live bodies of a given kind.
    pub fn count_kind(&self, kind: BodyKind) -> usize {
        self.bodies().filter(|(_, body)| body.kind == kind).count()
    }

    /// Closest hit along a ray, ignoring `exclude`.
    ///
    /// `direction` must be normalized. Hits beyond `max_distance` are ignored.
    pub fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        exclude: Option<BodyHandle>,
    ) -> Option<RayHit> {
        let mut closest: Option<RayHit> = None;
        let mut closest_dist = max_distance;

        for (index, sphere) in self.terrain.iter().enumerate() {
            if let Some(t) = ray_sphere_intersect(origin, direction, sphere.center, sphere.radius) {
                if t <= closest_dist {
                    let point = origin + direction * t;
                    let normal = (point - sphere.center).try_normalize().unwrap_or(-direction);
                    closest = Some(RayHit {
                        distance: t,
                        point,
                        normal,
                        target: HitTarget::Terrain(index),
                    });
                    closest_dist = t;
                }
            }
        }

        for (handle, body) in self.bodies() {
            if Some(handle) == exclude {
                continue;
            }
            if let Some((t, normal)) = ray_body_intersect(origin, direction, body) {
                if t <= closest_dist {
                    closest = Some(RayHit {
                        distance: t,
                        point: origin + direction * t,
                        normal,
                        target: HitTarget::Body(handle),
                    });
                    closest_dist = t;
                }
            }
        }

        closest
    }

    /// Integrate every body by `dt` and resolve terrain contacts.
    ///
    /// Accumulated forces are kept; see [`PhysicsWorld::clear_forces`].
    pub fn step(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        for body in self.slots.iter_mut().flatten() {
            body.integrate(dt);
            for sphere in &self.terrain {
                resolve_terrain_contact(body, sphere);
            }
        }
    }

    pub fn clear_forces(&mut self) {
        for body in self.slots.iter_mut().flatten() {
            body.clear_forces();
        }
    }

    /// Run as many fixed sub-steps as the stepper allows for `elapsed` seconds,
    /// then clear forces. Returns the number of sub-steps taken.
    pub fn advance(&mut self, elapsed: f32, stepper: &mut FixedStepper) -> u32 {
        let steps = stepper.consume(elapsed);
        for _ in 0..steps {
            self.step(stepper.fixed_dt());
        }
        self.clear_forces();
        steps
    }
}

/// Ray against a body's collider in its local frame.
fn ray_body_intersect(origin: Vec3, direction: Vec3, body: &RigidBody) -> Option<(f32, Vec3)> {
    if let Collider::Sphere { radius } = body.collider {
        let t = ray_sphere_intersect(origin, direction, body.position, radius)?;
        let point = origin + direction * t;
        let normal = (point - body.position).try_normalize().unwrap_or(-direction);
        return Some((t, normal));
    }

    let inverse = body.orientation.inverse();
    let local_origin = inverse * (origin - body.position);
    let local_dir = inverse * direction;
    let half = body.collider.local_half_extents();

    let t = ray_aabb_intersect(local_origin, local_dir, -half, half)?;
    let local_normal = aabb_surface_normal(local_origin + local_dir * t, -half, half);
    Some((t, body.orientation * local_normal))
}

/// Push a body out of a terrain sphere and kill inward velocity.
fn resolve_terrain_contact(body: &mut RigidBody, sphere: &TerrainSphere) {
    let offset = body.position - sphere.center;
    let distance = offset.length();
    let Some(normal) = offset.try_normalize() else {
        return;
    };

    let extent = body.collider.support_extent(body.orientation, normal);
    let penetration = sphere.radius + extent - distance;
    if penetration <= 0.0 {
        return;
    }

    body.position += normal * penetration;

    let normal_speed = body.linear_velocity.dot(normal);
    if normal_speed < 0.0 {
        body.linear_velocity -= normal * normal_speed;

        // Coulomb friction bounded by the normal impulse
        let tangential = body.linear_velocity - normal * body.linear_velocity.dot(normal);
        let tangential_speed = tangential.length();
        if tangential_speed > 1e-6 {
            let reduction = (body.friction * -normal_speed).min(tangential_speed);
            body.linear_velocity -= tangential / tangential_speed * reduction;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn planet_world() -> PhysicsWorld {
        PhysicsWorld::with_terrain(vec![TerrainSphere {
            center: Vec3::ZERO,
            radius: 500.0,
        }])
    }

    fn ball(position: Vec3) -> RigidBody {
        RigidBody::new(BodyKind::Prop, position, 1.0, Collider::Sphere { radius: 0.5 })
    }

    #[test]
    fn test_insert_remove_reuses_slot() {
        let mut world = PhysicsWorld::new();
        let a = world.insert(ball(Vec3::ZERO));
        let b = world.insert(ball(Vec3::X));
        assert_eq!(world.len(), 2);

        let removed = world.remove(a);
        assert!(removed.is_some());
        assert!(!world.contains(a));
        assert_eq!(world.len(), 1);

        let c = world.insert(ball(Vec3::Y));
        assert_eq!(c, a, "free slot should be reused");
        assert!(world.contains(b));
        assert!(world.remove(BodyHandle(42)).is_none());
    }

    #[test]
    fn test_raycast_hits_terrain() {
        let world = planet_world();
        let hit = world
            .raycast(Vec3::new(0.0, 502.0, 0.0), Vec3::NEG_Y, 5.0, None)
            .expect("terrain below");
        assert!((hit.distance - 2.0).abs() < 1e-3);
        assert_eq!(hit.target, HitTarget::Terrain(0));
        assert!((hit.normal - Vec3::Y).length() < 1e-4);
    }

    #[test]
    fn test_raycast_respects_max_distance() {
        let world = planet_world();
        assert!(world.raycast(Vec3::new(0.0, 510.0, 0.0), Vec3::NEG_Y, 5.0, None).is_none());
    }

    #[test]
    fn test_raycast_skips_excluded_body() {
        let mut world = planet_world();
        let handle = world.insert(ball(Vec3::new(0.0, 501.0, 0.0)));

        let hit = world
            .raycast(Vec3::new(0.0, 501.0, 0.0), Vec3::NEG_Y, 5.0, None)
            .expect("own collider");
        assert!(hit.is_body(handle));

        let hit = world
            .raycast(Vec3::new(0.0, 501.0, 0.0), Vec3::NEG_Y, 5.0, Some(handle))
            .expect("terrain");
        assert_eq!(hit.target, HitTarget::Terrain(0));
    }

    #[test]
    fn test_raycast_hits_rotated_box() {
        let mut world = PhysicsWorld::new();
        let body = RigidBody::new(
            BodyKind::Vehicle,
            Vec3::ZERO,
            100.0,
            Collider::Cuboid { half_extents: Vec3::new(1.0, 0.5, 2.0) },
        )
        .with_orientation(glam::Quat::from_rotation_y(std::f32::consts::FRAC_PI_2));
        let handle = world.insert(body);

        // Long axis now lies along world X
        let hit = world
            .raycast(Vec3::new(-10.0, 0.0, 0.0), Vec3::X, 20.0, None)
            .expect("box hit");
        assert!(hit.is_body(handle));
        assert!((hit.distance - 8.0).abs() < 1e-3, "distance was {}", hit.distance);
        assert!((hit.normal - Vec3::NEG_X).length() < 1e-4);
    }

    #[test]
    fn test_contact_stops_falling_body() {
        let mut world = planet_world();
        let handle = world.insert(ball(Vec3::new(0.0, 500.55, 0.0)));
        world.get_mut(handle).unwrap().linear_velocity = Vec3::new(0.0, -5.0, 0.0);

        world.step(1.0 / 60.0);

        let body = world.get(handle).unwrap();
        assert!(body.position.y >= 500.5 - 1e-4, "body sank to {}", body.position.y);
        assert!(body.linear_velocity.y.abs() < 1e-4);
    }

    #[test]
    fn test_advance_clears_forces() {
        let mut world = PhysicsWorld::new();
        let handle = world.insert(ball(Vec3::ZERO));
        world.get_mut(handle).unwrap().apply_force(Vec3::X);

        let mut stepper = FixedStepper::new(1.0 / 60.0, 3);
        let steps = world.advance(1.0 / 60.0, &mut stepper);

        assert_eq!(steps, 1);
        let body = world.get(handle).unwrap();
        assert_eq!(body.accumulated_force(), Vec3::ZERO);
        assert!(body.linear_velocity.x > 0.0);
    }
}
