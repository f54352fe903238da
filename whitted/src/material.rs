use crate::{
    lighting::LightSource,
    math::{Color, Ray, Vector3},
    object::Intersection,
    scene::{Scene, EPSILON},
};

/// The Phong exponent is `shininess` scaled by this factor.
pub const SHININESS_SCALE: f64 = 128.;

/// A surface material. Every coefficient is a per-channel weight in 0-1.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Emissive color.
    pub ke: Color,

    /// Ambient reflectance.
    pub ka: Color,

    /// Diffuse reflectance.
    pub kd: Color,

    /// Specular reflectance.
    pub ks: Color,

    /// Mirror reflectance, weighting the recursive reflected ray.
    pub kr: Color,

    /// Transmittance, weighting the recursive refracted ray. Also lets light
    /// through for shadow rays.
    pub kt: Color,

    /// Shininess in 0-1, scaled by `SHININESS_SCALE` into a Phong exponent.
    pub shininess: f64,

    /// Index of refraction. Air and opaque materials sit at 1.
    pub index: f64,
}

impl Material {
    /// The medium every primary ray starts in.
    pub const AIR: Material = Material {
        ke: Vector3::zero(),
        ka: Vector3::zero(),
        kd: Vector3::zero(),
        ks: Vector3::zero(),
        kr: Vector3::zero(),
        kt: Vector3::zero(),
        shininess: 0.,
        index: 1.,
    };

    /// Whether light passes through this material at all.
    pub fn is_transmissive(&self) -> bool {
        !self.kt.is_zero()
    }

    pub fn is_reflective(&self) -> bool {
        !self.kr.is_zero()
    }

    /// Apply the Phong model at a hit point: emission, ambient, then diffuse and
    /// specular for every light. The result is clamped into 0-1.
    pub fn shade(&self, scene: &Scene, ray: &Ray, hit: &Intersection) -> Color {
        let mut result = self.ke;

        // transparent surfaces are only partly lit
        let opacity = Vector3::one() - self.kt;
        result += self.ka * scene.ambient() * opacity;

        let normal = hit.normal;
        let point = hit.point(ray);
        let exponent = self.shininess * SHININESS_SCALE;

        for light in scene.direct_lights() {
            let atten = light.shadow_attenuation(scene, point + normal * EPSILON)
                * light.distance_attenuation(point);
            let l = light.direction(point);
            let n_dot_l = normal.dot(l);

            let diffuse = self.kd * n_dot_l.max(0.) * opacity;
            let reflected = (normal * (2. * n_dot_l) - l).normalize();
            let specular = self.ks * reflected.dot(-ray.direction).max(0.).powf(exponent);

            result += atten * (diffuse + specular);
        }

        result.clamp01()
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::AIR
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        camera::Camera,
        lighting::{Directional, Light},
        object::{Plane, SceneObject, Transform},
    };
    use approx::assert_abs_diff_eq;

    fn floor_scene(material: Material, lights: Vec<Light>, ambient: Color) -> Scene {
        Scene {
            objects: vec![SceneObject::new(Plane, Transform::default(), material)],
            lights,
            ambient,
            camera: Camera::default(),
            background: None,
        }
    }

    fn shade_floor(scene: &Scene) -> Color {
        let ray = Ray::new(Vector3::new(0., 1., 0.), Vector3::new(0., -1., 0.));
        let hit = scene.intersect(&ray).unwrap();
        hit.material.shade(scene, &ray, &hit)
    }

    #[test]
    fn test_emission_and_ambient() {
        let material = Material {
            ke: Vector3::new(0.1, 0., 0.),
            ka: Vector3::new(0.5, 0.5, 0.5),
            kt: Vector3::new(0.5, 0., 0.),
            ..Default::default()
        };
        let scene = floor_scene(material, vec![], Vector3::new(0.4, 0.4, 0.4));
        let c = shade_floor(&scene);
        assert_abs_diff_eq!(c.x, 0.1 + 0.5 * 0.4 * 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(c.y, 0.5 * 0.4, epsilon = 1e-12);
        assert_abs_diff_eq!(c.z, 0.5 * 0.4, epsilon = 1e-12);
    }

    #[test]
    fn test_diffuse_from_overhead_light() {
        let material = Material {
            kd: Vector3::new(0.8, 0.4, 0.2),
            ..Default::default()
        };
        let light = Directional::new(Vector3::new(1., 1., 1.), Vector3::new(0., -1., 0.));
        let scene = floor_scene(material, vec![light.into()], Vector3::zero());
        let c = shade_floor(&scene);
        assert_abs_diff_eq!(c.x, 0.8, epsilon = 1e-9);
        assert_abs_diff_eq!(c.y, 0.4, epsilon = 1e-9);
        assert_abs_diff_eq!(c.z, 0.2, epsilon = 1e-9);
    }

    #[test]
    fn test_specular_peak_and_clamp() {
        let material = Material {
            kd: Vector3::one(),
            ks: Vector3::one(),
            shininess: 0.5,
            ..Default::default()
        };
        let light = Directional::new(Vector3::one(), Vector3::new(0., -1., 0.));
        let scene = floor_scene(material, vec![light.into()], Vector3::zero());
        // mirror direction points back at the viewer: diffuse 1 + specular 1, clamped
        assert_eq!(shade_floor(&scene), Vector3::one());
    }

    #[test]
    fn test_light_below_surface_adds_nothing() {
        let material = Material {
            kd: Vector3::one(),
            ..Default::default()
        };
        let light = Directional::new(Vector3::one(), Vector3::new(0., 1., 0.));
        let scene = floor_scene(material, vec![light.into()], Vector3::zero());
        assert_eq!(shade_floor(&scene), Vector3::zero());
    }
}
