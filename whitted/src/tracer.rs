use crate::{
    material::Material,
    math::{refract, Color, Ray, Refraction, Vector3},
    media::MediaStack,
    object::Intersection,
    scene::{Scene, EPSILON},
};

/// Recursion limits for secondary rays. Defaults are provided.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceOptions {
    /// The maximum number of reflect/refract bounces from a primary ray.
    pub max_depth: u32,

    /// Rays whose intensity falls to this value or below are not continued.
    /// Zero disables the cutoff.
    pub intensity_threshold: f64,
}

impl Default for TraceOptions {
    fn default() -> Self {
        Self {
            max_depth: 5,
            intensity_threshold: 0.,
        }
    }
}

/// Recursive Whitted tracer over a borrowed, immutable scene.
#[derive(Debug, Clone, Copy)]
pub struct Tracer<'s> {
    scene: &'s Scene,
    options: TraceOptions,
}

impl<'s> Tracer<'s> {
    pub fn new(scene: &'s Scene, options: TraceOptions) -> Self {
        Self { scene, options }
    }

    pub fn options(&self) -> &TraceOptions {
        &self.options
    }

    /// Trace the primary ray through `(x, y)` on the image plane, both in 0-1
    /// with `y = 0` at the bottom. The result is clamped into 0-1.
    pub fn trace(&self, x: f64, y: f64) -> Color {
        let ray = self.scene.camera.ray_through(x, y);
        let mut media = MediaStack::new();
        self.trace_ray(&ray, Vector3::one(), 0, 1., &mut media)
            .clamp01()
    }

    /// Trace out a ray, getting its color. `threshold` is the product of every
    /// `kr`/`kt` weight above this call and `intensity` its scalar magnitude.
    /// The media stack is left as it was found.
    pub fn trace_ray(
        &self,
        ray: &Ray,
        threshold: Color,
        depth: u32,
        intensity: f64,
        media: &mut MediaStack<'s>,
    ) -> Color {
        let hit = match self.scene.intersect(ray) {
            Some(hit) => hit,
            None => return self.background(ray),
        };

        let material = hit.material;
        let mut color = material.shade(self.scene, ray, &hit) * threshold;

        if !self.should_recurse(depth, intensity) {
            return color;
        }

        if material.is_reflective() {
            color += self.reflection(ray, &hit, threshold, depth, intensity, media);
        }

        if material.is_transmissive() {
            color += self.transmission(ray, &hit, threshold, depth, intensity, media);
        }

        color
    }

    fn should_recurse(&self, depth: u32, intensity: f64) -> bool {
        let threshold = self.options.intensity_threshold;
        depth < self.options.max_depth && (threshold == 0. || intensity > threshold)
    }

    /// Project an escaped ray back onto the image plane and sample the background.
    fn background(&self, ray: &Ray) -> Color {
        let background = match &self.scene.background {
            Some(background) => background,
            None => return Vector3::zero(),
        };

        match self.scene.camera.project(ray.direction) {
            Some((u, v)) => background.sample(u, v),
            None => Vector3::zero(),
        }
    }

    fn reflection(
        &self,
        ray: &Ray,
        hit: &Intersection<'s>,
        threshold: Color,
        depth: u32,
        intensity: f64,
        media: &mut MediaStack<'s>,
    ) -> Color {
        let kr = hit.material.kr;

        // start just off the surface, on the side the ray came from
        let side = if ray.direction.dot(hit.normal) > 0. {
            -hit.normal
        } else {
            hit.normal
        };
        let reflected = ray.reflect(hit.point(ray) + side * EPSILON, hit.normal);

        kr * self.trace_ray(
            &reflected,
            threshold * kr,
            depth + 1,
            intensity * kr.magnitude(),
            media,
        )
    }

    fn transmission(
        &self,
        ray: &Ray,
        hit: &Intersection<'s>,
        threshold: Color,
        depth: u32,
        intensity: f64,
        media: &mut MediaStack<'s>,
    ) -> Color {
        let material: &'s Material = hit.material;
        let exiting = media.is_inside(material);

        let (normal, to) = if exiting {
            (-hit.normal, media.outside())
        } else {
            (hit.normal, material)
        };
        let nr = media.top().index / to.index;

        let dir = match refract(ray.direction, normal, nr) {
            Refraction::Transmitted(dir) => dir.normalize(),
            Refraction::TotalInternalReflection => return Vector3::zero(),
        };
        let transmitted = Ray::new(hit.point(ray) - normal * EPSILON, dir);

        let kt = material.kt;
        let next = |media: &mut MediaStack<'s>| {
            self.trace_ray(
                &transmitted,
                threshold * kt,
                depth + 1,
                intensity * kt.magnitude(),
                media,
            )
        };

        let color = if exiting {
            let left = media.pop();
            let color = next(media);
            if let Some(left) = left {
                media.push(left);
            }
            color
        } else {
            media.push(material);
            let color = next(media);
            media.pop();
            color
        };

        kt * color
    }
}
