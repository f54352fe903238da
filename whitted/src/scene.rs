use crate::{
    background::Background,
    camera::Camera,
    lighting::{Light, LightSource},
    math::{Color, Ray},
    object::{Intersection, SceneObject},
};

/// A very small value, close to zero, to keep rays from re-hitting the surface
/// they leave.
pub const EPSILON: f64 = 0.00001;

/// A scene, which contains a list of objects, lights, and a camera to render from.
#[derive(Debug, Default)]
pub struct Scene {
    pub objects: Vec<SceneObject>,
    pub lights: Vec<Light>,
    pub camera: Camera,

    /// The scene's own ambient term, before ambient lights are added.
    pub ambient: Color,

    /// Sampled where rays escape. Black when unset.
    pub background: Option<Box<dyn Background>>,
}

impl Scene {
    /// Find the nearest object struck by a ray.
    pub fn intersect(&self, ray: &Ray) -> Option<Intersection<'_>> {
        // For now every object is tested; scenes are small.
        self.objects
            .iter()
            .filter_map(|object| object.intersect(ray))
            .min_by(|a, b| a.t.total_cmp(&b.t))
    }

    /// The ambient term plus the color of every ambient light.
    pub fn ambient(&self) -> Color {
        self.lights
            .iter()
            .filter(|light| light.is_ambient())
            .fold(self.ambient, |sum, light| sum + light.color())
    }

    /// Lights that take part in diffuse and specular shading.
    pub fn direct_lights(&self) -> impl Iterator<Item = &Light> {
        self.lights.iter().filter(|light| !light.is_ambient())
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        lighting::{Ambient, Point},
        material::Material,
        math::Vector3,
        object::{Cuboid, Sphere, Transform},
    };
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_nearest_object_wins() {
        let far = Material {
            kd: Vector3::one(),
            ..Default::default()
        };
        let scene = Scene {
            objects: vec![
                SceneObject::new(Cuboid, Transform::translation(Vector3::new(0., 0., -10.)), far),
                SceneObject::new(Sphere, Transform::translation(Vector3::new(0., 0., -3.)), Material::default()),
            ],
            ..Default::default()
        };

        let hit = scene
            .intersect(&Ray::new(Vector3::zero(), Vector3::new(0., 0., -1.)))
            .unwrap();
        assert_abs_diff_eq!(hit.t, 2.5, epsilon = 1e-9);
        assert!(std::ptr::eq(hit.object, &scene.objects[1]));
    }

    #[test]
    fn test_empty_scene_misses() {
        let scene = Scene::default();
        assert!(scene
            .intersect(&Ray::new(Vector3::zero(), Vector3::new(0., 0., -1.)))
            .is_none());
    }

    #[test]
    fn test_ambient_lights_fold_into_ambient() {
        let scene = Scene {
            lights: vec![
                Ambient::new(Vector3::new(0.1, 0.2, 0.3)).into(),
                Point::new(Vector3::one(), Vector3::zero()).into(),
            ],
            ambient: Vector3::new(0.1, 0.1, 0.1),
            ..Default::default()
        };

        let ambient = scene.ambient();
        assert_abs_diff_eq!(ambient.x, 0.2, epsilon = 1e-12);
        assert_abs_diff_eq!(ambient.z, 0.4, epsilon = 1e-12);
        assert_eq!(scene.direct_lights().count(), 1);
    }
}
