use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use thiserror::Error;

pub const MAX_PARTICLES: usize = 20_000;
pub const MAX_SNAPSHOT_FRAMES: u32 = 10_000;

/// Distance a deflected particle is placed outside the vehicle bounds.
const DEFLECT_MARGIN: f32 = 0.01;

#[derive(Debug, Error, PartialEq)]
pub enum SceneError {
    #[error("particle count {0} exceeds the limit of {}", MAX_PARTICLES)]
    TooManyParticles(usize),
    #[error("frame count {0} exceeds the limit of {}", MAX_SNAPSHOT_FRAMES)]
    TooManyFrames(u32),
    #[error("tunnel dimensions must be positive")]
    InvalidVolume,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Axis-aligned box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Strict containment; points on a face are outside.
    pub fn contains(&self, p: Vec3) -> bool {
        p.x > self.min.x
            && p.x < self.max.x
            && p.y > self.min.y
            && p.y < self.max.y
            && p.z > self.min.z
            && p.z < self.max.z
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: Vec3::new(
                self.min.x.min(other.min.x),
                self.min.y.min(other.min.y),
                self.min.z.min(other.min.z),
            ),
            max: Vec3::new(
                self.max.x.max(other.max.x),
                self.max.y.max(other.max.y),
                self.max.z.max(other.max.z),
            ),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Camera {
    pub fov_degrees: f32,
    pub position: Vec3,
    pub look_at: Vec3,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Light {
    Ambient { color: u32, intensity: f32 },
    Directional { color: u32, intensity: f32, position: Vec3 },
}

#[derive(Debug, Clone, Serialize)]
pub struct CarPart {
    pub name: &'static str,
    pub bounds: Aabb,
    pub color: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Particle {
    pub position: Vec3,
    /// Distance travelled along +x per frame.
    pub speed: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldConfig {
    pub particles: usize,
    pub seed: u64,
    /// Push particles out of the vehicle volume each frame.
    pub deflect: bool,
    pub half_length: f32,
    pub height: f32,
    pub half_width: f32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            particles: 2_000,
            seed: 0,
            deflect: true,
            half_length: 10.0,
            height: 4.0,
            half_width: 3.0,
        }
    }
}

/// Simplified vehicle, nose towards -x so the airflow meets it head on.
const CAR: &[CarPart] = &[
    CarPart {
        name: "body",
        bounds: Aabb::new(Vec3::new(-2.0, 0.1, -0.5), Vec3::new(2.0, 0.6, 0.5)),
        color: 0xe10600,
    },
    CarPart {
        name: "cockpit",
        bounds: Aabb::new(Vec3::new(-0.3, 0.6, -0.25), Vec3::new(0.5, 0.9, 0.25)),
        color: 0x15151e,
    },
    CarPart {
        name: "front_wing",
        bounds: Aabb::new(Vec3::new(-2.6, 0.05, -0.9), Vec3::new(-2.2, 0.15, 0.9)),
        color: 0x15151e,
    },
    CarPart {
        name: "rear_wing",
        bounds: Aabb::new(Vec3::new(1.9, 0.7, -0.5), Vec3::new(2.3, 0.95, 0.5)),
        color: 0x15151e,
    },
    CarPart {
        name: "wheel_front_left",
        bounds: Aabb::new(Vec3::new(-1.93, 0.0, -0.9), Vec3::new(-1.27, 0.66, -0.6)),
        color: 0x222222,
    },
    CarPart {
        name: "wheel_front_right",
        bounds: Aabb::new(Vec3::new(-1.93, 0.0, 0.6), Vec3::new(-1.27, 0.66, 0.9)),
        color: 0x222222,
    },
    CarPart {
        name: "wheel_rear_left",
        bounds: Aabb::new(Vec3::new(1.27, 0.0, -0.9), Vec3::new(1.93, 0.66, -0.6)),
        color: 0x222222,
    },
    CarPart {
        name: "wheel_rear_right",
        bounds: Aabb::new(Vec3::new(1.27, 0.0, 0.6), Vec3::new(1.93, 0.66, 0.9)),
        color: 0x222222,
    },
];

#[derive(Debug, Clone)]
pub struct Scene {
    camera: Camera,
    lights: Vec<Light>,
    car_bounds: Aabb,
    particles: Vec<Particle>,
    config: FieldConfig,
    frame: u64,
}

impl Scene {
    pub fn build(config: FieldConfig) -> Result<Self, SceneError> {
        if config.particles > MAX_PARTICLES {
            return Err(SceneError::TooManyParticles(config.particles));
        }
        let dims = [config.half_length, config.height, config.half_width];
        if !dims.iter().all(|d| d.is_finite() && *d > 0.0) {
            return Err(SceneError::InvalidVolume);
        }

        let mut rng = StdRng::seed_from_u64(config.seed);
        let particles = (0..config.particles)
            .map(|_| Particle {
                position: Vec3::new(
                    rng.gen_range(-config.half_length..config.half_length),
                    rng.gen::<f32>() * config.height,
                    rng.gen_range(-config.half_width..config.half_width),
                ),
                speed: 0.05 + rng.gen::<f32>() * 0.1,
            })
            .collect();

        let car_bounds = CAR
            .iter()
            .skip(1)
            .fold(CAR[0].bounds, |acc, part| acc.union(&part.bounds));

        Ok(Self {
            camera: Camera {
                fov_degrees: 75.0,
                position: Vec3::new(5.0, 3.0, 5.0),
                look_at: Vec3::new(0.0, 0.0, 0.0),
            },
            lights: vec![
                Light::Ambient {
                    color: 0xffffff,
                    intensity: 0.6,
                },
                Light::Directional {
                    color: 0xffffff,
                    intensity: 1.0,
                    position: Vec3::new(5.0, 10.0, 7.5),
                },
            ],
            car_bounds,
            particles,
            config,
            frame: 0,
        })
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn car_bounds(&self) -> Aabb {
        self.car_bounds
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Advances every particle by one frame.
    pub fn step(&mut self) {
        let length = 2.0 * self.config.half_length;
        for particle in &mut self.particles {
            let p = &mut particle.position;
            p.x += particle.speed;
            if p.x > self.config.half_length {
                p.x -= length;
            }
            if self.config.deflect {
                deflect(p, &self.car_bounds);
            }
        }
        self.frame += 1;
    }

    pub fn advance(&mut self, frames: u32) {
        for _ in 0..frames {
            self.step();
        }
    }

    pub fn snapshot(&self) -> SceneSnapshot {
        SceneSnapshot {
            frame: self.frame,
            camera: self.camera.clone(),
            lights: self.lights.clone(),
            car: CAR.to_vec(),
            car_bounds: self.car_bounds,
            particles: self
                .particles
                .iter()
                .map(|p| [p.position.x, p.position.y, p.position.z])
                .collect(),
        }
    }
}

/// Moves a point inside `bounds` out through the nearest of the top and side faces.
fn deflect(p: &mut Vec3, bounds: &Aabb) {
    if !bounds.contains(*p) {
        return;
    }
    let up = bounds.max.y - p.y;
    let left = p.z - bounds.min.z;
    let right = bounds.max.z - p.z;

    if up <= left && up <= right {
        p.y = bounds.max.y + DEFLECT_MARGIN;
    } else if left < right {
        p.z = bounds.min.z - DEFLECT_MARGIN;
    } else {
        p.z = bounds.max.z + DEFLECT_MARGIN;
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SceneSnapshot {
    pub frame: u64,
    pub camera: Camera,
    pub lights: Vec<Light>,
    pub car: Vec<CarPart>,
    pub car_bounds: Aabb,
    pub particles: Vec<[f32; 3]>,
}

/// Builds a scene and advances it `frames` times without a frame loop.
pub fn render_offline(config: FieldConfig, frames: u32) -> Result<SceneSnapshot, SceneError> {
    if frames > MAX_SNAPSHOT_FRAMES {
        return Err(SceneError::TooManyFrames(frames));
    }
    let mut scene = Scene::build(config)?;
    scene.advance(frames);
    Ok(scene.snapshot())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(particles: usize, deflect: bool) -> FieldConfig {
        FieldConfig {
            particles,
            seed: 7,
            deflect,
            ..FieldConfig::default()
        }
    }

    fn in_tunnel(p: Vec3, cfg: &FieldConfig) -> bool {
        p.x >= -cfg.half_length && p.x <= cfg.half_length
    }

    #[test]
    fn same_seed_same_field() {
        let a = Scene::build(config(100, true)).unwrap();
        let b = Scene::build(config(100, true)).unwrap();
        assert_eq!(a.particles(), b.particles());

        let c = Scene::build(FieldConfig { seed: 8, ..config(100, true) }).unwrap();
        assert_ne!(a.particles(), c.particles());
    }

    #[test]
    fn particles_spawn_inside_the_tunnel() {
        let cfg = config(500, false);
        let scene = Scene::build(cfg).unwrap();
        for p in scene.particles() {
            assert!(in_tunnel(p.position, &cfg));
            assert!(p.position.y >= 0.0 && p.position.y < cfg.height);
            assert!(p.position.z.abs() <= cfg.half_width);
            assert!(p.speed >= 0.05 && p.speed < 0.15);
        }
    }

    #[test]
    fn step_moves_along_x_only_without_deflection() {
        let mut scene = Scene::build(config(50, false)).unwrap();
        let before = scene.particles().to_vec();
        scene.step();
        for (old, new) in before.iter().zip(scene.particles()) {
            assert_eq!(old.position.y, new.position.y);
            assert_eq!(old.position.z, new.position.z);
            assert_ne!(old.position.x, new.position.x);
        }
        assert_eq!(scene.frame(), 1);
    }

    #[test]
    fn particles_wrap_to_the_entrance() {
        let cfg = config(300, false);
        let mut scene = Scene::build(cfg).unwrap();
        scene.advance(400);
        assert!(scene.particles().iter().all(|p| in_tunnel(p.position, &cfg)));
    }

    #[test]
    fn deflection_keeps_particles_out_of_the_car() {
        let mut scene = Scene::build(config(2_000, true)).unwrap();
        let bounds = scene.car_bounds();
        for _ in 0..200 {
            scene.step();
            assert!(scene.particles().iter().all(|p| !bounds.contains(p.position)));
        }
    }

    #[test]
    fn deflect_uses_the_shallowest_exit() {
        let bounds = Aabb::new(Vec3::new(-1.0, 0.0, -1.0), Vec3::new(1.0, 1.0, 1.0));

        let mut near_top = Vec3::new(0.0, 0.9, 0.0);
        deflect(&mut near_top, &bounds);
        assert_eq!(near_top.z, 0.0);
        assert!(near_top.y > 1.0);

        let mut near_left = Vec3::new(0.0, 0.2, -0.95);
        deflect(&mut near_left, &bounds);
        assert!(near_left.z < -1.0);
        assert_eq!(near_left.y, 0.2);

        let mut outside = Vec3::new(3.0, 0.5, 0.0);
        deflect(&mut outside, &bounds);
        assert_eq!(outside, Vec3::new(3.0, 0.5, 0.0));
    }

    #[test]
    fn car_bounds_cover_every_part() {
        let scene = Scene::build(config(0, true)).unwrap();
        let bounds = scene.car_bounds();
        for part in CAR {
            assert_eq!(bounds.union(&part.bounds), bounds);
        }
    }

    #[test]
    fn offline_render_enforces_limits() {
        assert_eq!(
            Scene::build(config(MAX_PARTICLES + 1, true)).unwrap_err(),
            SceneError::TooManyParticles(MAX_PARTICLES + 1)
        );
        assert_eq!(
            render_offline(config(10, true), MAX_SNAPSHOT_FRAMES + 1).unwrap_err(),
            SceneError::TooManyFrames(MAX_SNAPSHOT_FRAMES + 1)
        );
        assert_eq!(
            Scene::build(FieldConfig { height: 0.0, ..config(10, true) }).unwrap_err(),
            SceneError::InvalidVolume
        );
        let snap = render_offline(config(10, true), 3).unwrap();
        assert_eq!(snap.frame, 3);
        assert_eq!(snap.particles.len(), 10);
        assert_eq!(snap.car.len(), CAR.len());
    }
}
