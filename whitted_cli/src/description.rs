use std::{
    collections::HashMap,
    fs::File,
    io::{BufReader, Read},
    path::{Path, PathBuf},
};

use log::debug;
use serde::Deserialize;
use thiserror::Error;
use whitted::{
    background::{Background, ImageBackground, SolidBackground},
    camera::Camera,
    lighting::{Ambient, Directional, Light, Point},
    material::Material,
    math::Vector3,
    object::{Cuboid, Plane, SceneObject, Sphere, Transform},
    RenderError, Scene, TraceOptions,
};

#[derive(Debug, Error)]
pub enum DescriptionError {
    #[error("could not read scene description: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed scene description: {0}")]
    Json(#[from] serde_json::Error),

    #[error("object {object} uses undefined material {name:?}")]
    UnknownMaterial { object: usize, name: String },

    #[error("object {0} has a zero or non-finite scale")]
    DegenerateTransform(usize),

    #[error("material {name:?} is invalid: {reason}")]
    InvalidMaterial { name: String, reason: &'static str },

    #[error("camera is invalid: {0}")]
    InvalidCamera(&'static str),

    #[error("could not load background: {0}")]
    Background(#[from] RenderError),
}

/// A scene as written in a JSON description file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Description {
    #[serde(default)]
    pub camera: CameraDescription,

    #[serde(default)]
    pub ambient: [f64; 3],

    pub background: Option<BackgroundDescription>,

    #[serde(default)]
    pub materials: HashMap<String, MaterialDescription>,

    #[serde(default)]
    pub lights: Vec<LightDescription>,

    #[serde(default)]
    pub objects: Vec<ObjectDescription>,

    #[serde(default)]
    pub trace: TraceDescription,
}

#[derive(Debug, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct CameraDescription {
    pub eye: [f64; 3],
    pub look_at: [f64; 3],
    pub up: [f64; 3],

    /// Vertical field of view in degrees.
    pub fov: f64,
    pub aspect_ratio: f64,
}

impl Default for CameraDescription {
    fn default() -> Self {
        Self {
            eye: [0., 0., 0.],
            look_at: [0., 0., -1.],
            up: [0., 1., 0.],
            fov: 53.13,
            aspect_ratio: 1.,
        }
    }
}

impl CameraDescription {
    fn to_camera(&self) -> Result<Camera, DescriptionError> {
        let invalid = DescriptionError::InvalidCamera;

        if !(self.aspect_ratio.is_finite() && self.aspect_ratio > 0.) {
            return Err(invalid("aspect ratio must be positive"));
        }
        if !(self.fov > 0. && self.fov < 180.) {
            return Err(invalid("field of view must lie strictly between 0 and 180 degrees"));
        }

        let eye = Vector3::from(self.eye);
        let view = Vector3::from(self.look_at) - eye;
        let view_length = view.magnitude();
        if !(view_length.is_finite() && view_length > 0.) {
            return Err(invalid("eye and lookAt must be distinct"));
        }

        let up = Vector3::from(self.up);
        let right = view.cross(up).magnitude();
        if !(right.is_finite() && right > 1e-9 * view_length * up.magnitude()) {
            return Err(invalid("up must not be parallel to the view direction"));
        }

        Ok(Camera::new(
            eye,
            self.look_at.into(),
            up,
            self.fov,
            self.aspect_ratio,
        ))
    }
}

/// Either a flat color or a path to an image, relative to the description file.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum BackgroundDescription {
    Color([f64; 3]),
    Image(PathBuf),
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MaterialDescription {
    pub ke: [f64; 3],
    pub ka: [f64; 3],
    pub kd: [f64; 3],
    pub ks: [f64; 3],
    pub kr: [f64; 3],
    pub kt: [f64; 3],
    pub shininess: f64,
    pub index: f64,
}

impl Default for MaterialDescription {
    fn default() -> Self {
        Self {
            ke: [0.; 3],
            ka: [0.; 3],
            kd: [0.; 3],
            ks: [0.; 3],
            kr: [0.; 3],
            kt: [0.; 3],
            shininess: 0.,
            index: 1.,
        }
    }
}

impl MaterialDescription {
    fn to_material(&self, name: &str) -> Result<Material, DescriptionError> {
        let invalid = |reason| DescriptionError::InvalidMaterial {
            name: name.to_owned(),
            reason,
        };

        let coefficients = [self.ke, self.ka, self.kd, self.ks, self.kr, self.kt];
        if coefficients
            .iter()
            .flatten()
            .any(|c| !(0. ..=1.).contains(c))
        {
            return Err(invalid("coefficients must lie in 0-1"));
        }
        if !(0. ..=1.).contains(&self.shininess) {
            return Err(invalid("shininess must lie in 0-1"));
        }
        if !(self.index.is_finite() && self.index > 0.) {
            return Err(invalid("index of refraction must be positive"));
        }

        Ok(Material {
            ke: self.ke.into(),
            ka: self.ka.into(),
            kd: self.kd.into(),
            ks: self.ks.into(),
            kr: self.kr.into(),
            kt: self.kt.into(),
            shininess: self.shininess,
            index: self.index,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum LightDescription {
    Ambient {
        color: [f64; 3],
    },
    Directional {
        color: [f64; 3],
        direction: [f64; 3],
    },
    Point {
        color: [f64; 3],
        position: [f64; 3],

        /// Constant, linear and quadratic falloff coefficients.
        #[serde(default = "default_attenuation")]
        attenuation: [f64; 3],
    },
}

fn default_attenuation() -> [f64; 3] {
    [1., 0., 0.]
}

impl From<&LightDescription> for Light {
    fn from(light: &LightDescription) -> Self {
        match *light {
            LightDescription::Ambient { color } => Ambient::new(color.into()).into(),
            LightDescription::Directional { color, direction } => {
                Directional::new(color.into(), direction.into()).into()
            }
            LightDescription::Point {
                color,
                position,
                attenuation: [c, l, q],
            } => Point::new(color.into(), position.into())
                .with_attenuation(c, l, q)
                .into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    Box,
    Sphere,
    Plane,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ObjectDescription {
    pub shape: Shape,

    #[serde(default)]
    pub translate: [f64; 3],

    /// XYZ Euler angles in degrees.
    #[serde(default)]
    pub rotate: [f64; 3],

    #[serde(default = "default_scale")]
    pub scale: [f64; 3],

    /// Name of an entry in `materials`; the default material when absent.
    pub material: Option<String>,
}

fn default_scale() -> [f64; 3] {
    [1., 1., 1.]
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct TraceDescription {
    pub max_depth: Option<u32>,
    pub intensity_threshold: Option<f64>,
}

impl Description {
    /// Read a description from a JSON file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DescriptionError> {
        Self::from_reader(BufReader::new(File::open(path)?))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DescriptionError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Recursion limits, falling back to the tracer defaults.
    pub fn trace_options(&self) -> TraceOptions {
        let defaults = TraceOptions::default();
        TraceOptions {
            max_depth: self.trace.max_depth.unwrap_or(defaults.max_depth),
            intensity_threshold: self
                .trace
                .intensity_threshold
                .unwrap_or(defaults.intensity_threshold),
        }
    }

    /// Build the scene. Relative background paths are resolved against `base`.
    pub fn into_scene(self, base: &Path) -> Result<Scene, DescriptionError> {
        let mut materials = HashMap::with_capacity(self.materials.len());
        for (name, material) in &self.materials {
            materials.insert(name.as_str(), material.to_material(name)?);
        }

        let mut objects = Vec::with_capacity(self.objects.len());
        for (i, object) in self.objects.iter().enumerate() {
            let material = match &object.material {
                Some(name) => materials
                    .get(name.as_str())
                    .cloned()
                    .ok_or_else(|| DescriptionError::UnknownMaterial {
                        object: i,
                        name: name.clone(),
                    })?,
                None => Material::default(),
            };

            let rotate = Vector3::from(object.rotate);
            let transform = Transform::new(
                object.translate.into(),
                Vector3::new(
                    rotate.x.to_radians(),
                    rotate.y.to_radians(),
                    rotate.z.to_radians(),
                ),
                object.scale.into(),
            )
            .ok_or(DescriptionError::DegenerateTransform(i))?;

            objects.push(match object.shape {
                Shape::Box => SceneObject::new(Cuboid, transform, material),
                Shape::Sphere => SceneObject::new(Sphere, transform, material),
                Shape::Plane => SceneObject::new(Plane, transform, material),
            });
        }

        let background: Option<Box<dyn Background>> = match self.background {
            Some(BackgroundDescription::Color(color)) => {
                Some(Box::new(SolidBackground(color.into())))
            }
            Some(BackgroundDescription::Image(path)) => {
                Some(Box::new(ImageBackground::open(base.join(path))?))
            }
            None => None,
        };

        let camera = self.camera.to_camera()?;

        debug!(
            "scene has {} objects, {} lights, {} materials",
            objects.len(),
            self.lights.len(),
            materials.len()
        );

        Ok(Scene {
            objects,
            lights: self.lights.iter().map(Light::from).collect(),
            camera,
            ambient: self.ambient.into(),
            background,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use whitted::math::Ray;

    fn parse(json: &str) -> Result<Scene, DescriptionError> {
        Description::from_reader(json.as_bytes())?.into_scene(Path::new("."))
    }

    #[test]
    fn test_full_description() {
        let json = r#"{
            "camera": { "eye": [0, 0, 5], "lookAt": [0, 0, 0], "fov": 45, "aspectRatio": 1.5 },
            "ambient": [0.1, 0.1, 0.1],
            "background": [0.2, 0.3, 0.4],
            "materials": {
                "glass": { "kt": [0.9, 0.9, 0.9], "ks": [1, 1, 1], "shininess": 0.9, "index": 1.5 }
            },
            "lights": [
                { "type": "ambient", "color": [0.2, 0.2, 0.2] },
                { "type": "directional", "color": [1, 1, 1], "direction": [0, -1, -1] },
                { "type": "point", "color": [1, 1, 1], "position": [0, 4, 0], "attenuation": [1, 0.1, 0] }
            ],
            "objects": [
                { "shape": "sphere", "material": "glass", "scale": [2, 2, 2] },
                { "shape": "box", "translate": [0, -2, 0], "rotate": [0, 45, 0] },
                { "shape": "plane", "translate": [0, -3, 0] }
            ],
            "trace": { "maxDepth": 3, "intensityThreshold": 0.01 }
        }"#;

        let description = Description::from_reader(json.as_bytes()).unwrap();
        let options = description.trace_options();
        assert_eq!(options.max_depth, 3);
        assert_abs_diff_eq!(options.intensity_threshold, 0.01);

        let scene = description.into_scene(Path::new(".")).unwrap();
        assert_eq!(scene.objects.len(), 3);
        assert_eq!(scene.lights.len(), 3);
        assert_eq!(scene.direct_lights().count(), 2);
        assert_abs_diff_eq!(scene.ambient().x, 0.3, epsilon = 1e-12);
        assert_abs_diff_eq!(scene.camera.aspect_ratio(), 1.5);
        assert!(scene.background.is_some());

        let glass = &scene.objects[0].material;
        assert_abs_diff_eq!(glass.index, 1.5);
        assert_eq!(scene.objects[1].material, Material::default());

        // the sphere has radius 1 after scaling
        let hit = scene
            .intersect(&Ray::new(Vector3::new(0., 0., 5.), Vector3::new(0., 0., -1.)))
            .unwrap();
        assert_abs_diff_eq!(hit.t, 4., epsilon = 1e-9);
    }

    #[test]
    fn test_defaults() {
        let description = Description::from_reader("{}".as_bytes()).unwrap();
        assert_eq!(description.trace_options(), TraceOptions::default());

        let scene = description.into_scene(Path::new(".")).unwrap();
        assert!(scene.objects.is_empty());
        assert!(scene.background.is_none());
        assert_eq!(scene.camera, Camera::default());
    }

    #[test]
    fn test_unknown_material() {
        let json = r#"{ "objects": [{ "shape": "box" }, { "shape": "box", "material": "gold" }] }"#;
        match parse(json) {
            Err(DescriptionError::UnknownMaterial { object, name }) => {
                assert_eq!(object, 1);
                assert_eq!(name, "gold");
            }
            other => panic!("expected unknown material, got {:?}", other),
        }
    }

    #[test]
    fn test_degenerate_scale() {
        let json = r#"{ "objects": [{ "shape": "sphere", "scale": [1, 0, 1] }] }"#;
        assert!(matches!(parse(json), Err(DescriptionError::DegenerateTransform(0))));
    }

    #[test]
    fn test_invalid_material() {
        let json = r#"{ "materials": { "hot": { "ke": [2, 0, 0] } } }"#;
        assert!(matches!(
            parse(json),
            Err(DescriptionError::InvalidMaterial { .. })
        ));

        let json = r#"{ "materials": { "void": { "index": 0 } } }"#;
        assert!(matches!(
            parse(json),
            Err(DescriptionError::InvalidMaterial { .. })
        ));
    }

    fn camera_error(camera: &str) -> Option<&'static str> {
        match parse(&format!(r#"{{ "camera": {} }}"#, camera)) {
            Err(DescriptionError::InvalidCamera(reason)) => Some(reason),
            _ => None,
        }
    }

    #[test]
    fn test_camera_aspect_ratio_must_be_positive() {
        assert!(camera_error(r#"{ "aspectRatio": 0 }"#).is_some());
        assert!(camera_error(r#"{ "aspectRatio": -1.5 }"#).is_some());
    }

    #[test]
    fn test_camera_fov_must_be_open_range() {
        assert!(camera_error(r#"{ "fov": 0 }"#).is_some());
        assert!(camera_error(r#"{ "fov": 180 }"#).is_some());
        assert!(camera_error(r#"{ "fov": 179.5 }"#).is_none());
    }

    #[test]
    fn test_camera_eye_must_differ_from_look_at() {
        assert!(camera_error(r#"{ "eye": [1, 2, 3], "lookAt": [1, 2, 3] }"#).is_some());
    }

    #[test]
    fn test_camera_up_must_not_follow_view() {
        assert!(camera_error(r#"{ "eye": [0, 0, 0], "lookAt": [0, 5, 0], "up": [0, 1, 0] }"#).is_some());
        assert!(camera_error(r#"{ "up": [0, 0, 0] }"#).is_some());
        assert!(camera_error(r#"{ "eye": [0, 0, 0], "lookAt": [0, 5, 0], "up": [0, 0, 1] }"#).is_none());
    }

    #[test]
    fn test_unknown_light_type_is_rejected() {
        let json = r#"{ "lights": [{ "type": "spot", "color": [1, 1, 1] }] }"#;
        assert!(matches!(parse(json), Err(DescriptionError::Json(_))));
    }

    #[test]
    fn test_missing_background_image() {
        let json = r#"{ "background": "does/not/exist.png" }"#;
        assert!(matches!(parse(json), Err(DescriptionError::Background(_))));
    }
}
