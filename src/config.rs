//! JSON scene description and its conversion into the runtime scene, camera and settings.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    camera::{Camera, Projection},
    geometry::{EPSILON, FloatType, ScreenSize, WorldPoint, WorldVector},
    renderer::RenderSettings,
    scene::{
        Scene, SceneError,
        light::PointLight,
        material::Material,
        mesh::MeshError,
        primitives::{Parallelogram, Sphere},
        triangle_bvh::TriangleBvh,
    },
    util::Rgba,
};

#[derive(Debug, Error)]
pub enum SceneDescriptionError {
    #[error("Failed to read {path:?}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid scene description: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Failed to load mesh: {0}")]
    MeshError(#[from] MeshError),

    #[error(transparent)]
    SceneError(#[from] SceneError),

    #[error("Invalid camera: {0}")]
    InvalidCamera(&'static str),

    #[error("Sphere {index} has non-positive radius {radius}")]
    InvalidSphereRadius { index: usize, radius: FloatType },
}

/// Complete description of a render job. Missing fields take the values of the built-in demo scene.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SceneDescription {
    /// Triangle mesh (.off or .obj). Relative paths are resolved against the description file.
    pub mesh: Option<PathBuf>,
    pub mesh_material: usize,
    pub materials: Vec<MaterialDescription>,
    pub spheres: Vec<SphereDescription>,
    pub parallelograms: Vec<ParallelogramDescription>,
    pub lights: Vec<LightDescription>,
    pub ambient_light: [FloatType; 4],
    pub camera: CameraDescription,
    pub max_bounce: u32,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct MaterialDescription {
    pub ambient: [FloatType; 4],
    pub diffuse: [FloatType; 4],
    pub specular: [FloatType; 4],
    pub specular_exponent: FloatType,
    pub reflection: [FloatType; 4],
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SphereDescription {
    pub center: [FloatType; 3],
    pub radius: FloatType,
    #[serde(default)]
    pub material: usize,
}

/// Parallelogram given by three of its corners, the fourth one is `corner_a + corner_b - origin`.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ParallelogramDescription {
    pub origin: [FloatType; 3],
    pub corner_a: [FloatType; 3],
    pub corner_b: [FloatType; 3],
    #[serde(default)]
    pub material: usize,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LightDescription {
    pub position: [FloatType; 3],
    pub color: [FloatType; 4],
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct CameraDescription {
    pub position: [FloatType; 3],
    pub forward: [FloatType; 3],
    pub up: [FloatType; 3],
    pub width: u32,
    pub height: u32,
    /// Vertical field of view in radians
    pub field_of_view: FloatType,
    pub focal_length: FloatType,
    pub projection: Projection,
}

impl Default for SceneDescription {
    fn default() -> Self {
        let spheres = [
            [10.0, 0.0, 1.0],
            [7.0, 0.05, -1.0],
            [4.0, 0.1, 1.0],
            [1.0, 0.2, -1.0],
            [-2.0, 0.4, 1.0],
            [-5.0, 0.8, -1.0],
            [-8.0, 1.6, 1.0],
        ]
        .into_iter()
        .map(|center| SphereDescription {
            center,
            radius: 1.0,
            material: 0,
        })
        .collect();

        let lights = [
            [8.0, 8.0, 0.0],
            [6.0, -8.0, 0.0],
            [4.0, 8.0, 0.0],
            [2.0, -8.0, 0.0],
            [0.0, 8.0, 0.0],
            [-2.0, -8.0, 0.0],
            [-4.0, 8.0, 0.0],
        ]
        .into_iter()
        .map(|position| LightDescription {
            position,
            color: [16.0, 16.0, 16.0, 0.0],
        })
        .collect();

        SceneDescription {
            mesh: None,
            mesh_material: 0,
            materials: vec![
                MaterialDescription::default(),
                MaterialDescription {
                    reflection: [0.5, 0.5, 0.5, 0.0],
                    ..MaterialDescription::default()
                },
            ],
            spheres,
            parallelograms: vec![ParallelogramDescription {
                origin: [-100.0, -1.25, -100.0],
                corner_a: [100.0, 0.0, -100.0],
                corner_b: [-100.0, -1.2, 100.0],
                material: 1,
            }],
            lights,
            ambient_light: [0.2, 0.2, 0.2, 0.0],
            camera: CameraDescription::default(),
            max_bounce: 5,
        }
    }
}

impl Default for MaterialDescription {
    fn default() -> Self {
        let m = Material::default();
        MaterialDescription {
            ambient: rgba_to_array(m.ambient),
            diffuse: rgba_to_array(m.diffuse),
            specular: rgba_to_array(m.specular),
            specular_exponent: m.specular_exponent,
            reflection: rgba_to_array(m.reflection),
        }
    }
}

impl Default for CameraDescription {
    fn default() -> Self {
        CameraDescription {
            position: [0.0, 0.0, 5.0],
            forward: [0.0, 0.0, -1.0],
            up: [0.0, 1.0, 0.0],
            width: 640,
            height: 480,
            field_of_view: 0.7854,
            focal_length: 10.0,
            projection: Projection::Perspective,
        }
    }
}

impl SceneDescription {
    pub fn from_json(content: &str) -> Result<Self, SceneDescriptionError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn to_json(&self) -> Result<String, SceneDescriptionError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reads a description file, resolving the mesh path relative to the file's directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SceneDescriptionError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| SceneDescriptionError::ReadError {
            path: path.to_owned(),
            source,
        })?;
        let mut description = Self::from_json(&content)?;

        if let Some(directory) = path.parent() {
            description.mesh = description.mesh.map(|mesh| directory.join(mesh));
        }

        log::debug!("Loaded scene description {}", path.display());
        Ok(description)
    }

    /// Loads the mesh (if any) and assembles the scene.
    pub fn build_scene(&self) -> Result<Scene, SceneDescriptionError> {
        if let Some((index, sphere)) = self
            .spheres
            .iter()
            .enumerate()
            .find(|(_, s)| !(s.radius > 0.0))
        {
            return Err(SceneDescriptionError::InvalidSphereRadius {
                index,
                radius: sphere.radius,
            });
        }

        let mesh = match &self.mesh {
            Some(path) => TriangleBvh::with_mesh_file(path)?,
            None => TriangleBvh::default(),
        };

        let scene = Scene::builder()
            .mesh(mesh)
            .mesh_material(self.mesh_material)
            .materials(self.materials.iter().map(MaterialDescription::to_material).collect())
            .spheres(
                self.spheres
                    .iter()
                    .map(|s| Sphere {
                        center: s.center.into(),
                        radius: s.radius,
                        material: s.material,
                    })
                    .collect(),
            )
            .parallelograms(
                self.parallelograms
                    .iter()
                    .map(|p| {
                        Parallelogram::from_corners(
                            p.origin.into(),
                            p.corner_a.into(),
                            p.corner_b.into(),
                            p.material,
                        )
                    })
                    .collect(),
            )
            .lights(
                self.lights
                    .iter()
                    .map(|l| PointLight {
                        position: l.position.into(),
                        color: array_to_rgba(l.color),
                    })
                    .collect(),
            )
            .ambient_light(array_to_rgba(self.ambient_light))
            .build()?;

        log::info!(
            "Scene: {} triangles, {} spheres, {} parallelograms, {} lights",
            scene.mesh().mesh().triangle_count(),
            scene.spheres().len(),
            scene.parallelograms().len(),
            scene.lights().len()
        );

        Ok(scene)
    }

    pub fn build_camera(&self) -> Result<Camera, SceneDescriptionError> {
        self.camera.to_camera()
    }

    pub fn render_settings(&self) -> RenderSettings {
        RenderSettings {
            max_bounce: self.max_bounce,
            ..RenderSettings::default()
        }
    }
}

impl MaterialDescription {
    fn to_material(&self) -> Material {
        Material {
            ambient: array_to_rgba(self.ambient),
            diffuse: array_to_rgba(self.diffuse),
            specular: array_to_rgba(self.specular),
            specular_exponent: self.specular_exponent,
            reflection: array_to_rgba(self.reflection),
        }
    }
}

impl CameraDescription {
    /// Checks everything the camera builder asserts, so that bad input is an error instead of a panic.
    fn to_camera(&self) -> Result<Camera, SceneDescriptionError> {
        let forward = WorldVector::from(self.forward);
        let up = WorldVector::from(self.up);

        if self.width == 0 || self.height == 0 {
            return Err(SceneDescriptionError::InvalidCamera("Image size must be non-zero"));
        }
        if forward.norm() <= EPSILON || up.norm() <= EPSILON {
            return Err(SceneDescriptionError::InvalidCamera("Direction vectors must be non-zero"));
        }
        if forward.normalize().cross(&up.normalize()).norm() <= EPSILON {
            return Err(SceneDescriptionError::InvalidCamera("`up` must not be parallel to `forward`"));
        }
        if !(self.field_of_view > 0.0 && self.field_of_view < std::f64::consts::PI) {
            return Err(SceneDescriptionError::InvalidCamera("Field of view must be between 0 and pi"));
        }
        if !(self.focal_length > 0.0) {
            return Err(SceneDescriptionError::InvalidCamera("Focal length must be positive"));
        }

        Ok(Camera::builder()
            .center(WorldPoint::from(self.position))
            .forward(forward)
            .up(up)
            .resolution(ScreenSize::new(self.width, self.height))
            .field_of_view(self.field_of_view)
            .focal_length(self.focal_length)
            .projection(self.projection)
            .build())
    }
}

fn array_to_rgba([r, g, b, a]: [FloatType; 4]) -> Rgba {
    Rgba::new(r, g, b, a)
}

fn rgba_to_array(color: Rgba) -> [FloatType; 4] {
    [color.r, color.g, color.b, color.a]
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::scene::Entity;

    use assert2::{assert, let_assert};

    #[test]
    fn default_is_demo_scene() {
        let d = SceneDescription::default();
        assert!(d.spheres.len() == 7);
        assert!(d.lights.len() == 7);
        assert!(d.parallelograms.len() == 1);
        assert!(d.max_bounce == 5);

        let_assert!(Ok(scene) = d.build_scene());
        assert!(scene.mesh().is_empty());
        assert!(scene.ambient_light() == Rgba::new(0.2, 0.2, 0.2, 0.0));
        assert!(scene.material(Entity::Sphere(3)).reflection == Rgba::new(0.7, 0.7, 0.7, 0.0));
        assert!(scene.material(Entity::Parallelogram(0)).reflection == Rgba::new(0.5, 0.5, 0.5, 0.0));

        let_assert!(Ok(camera) = d.build_camera());
        assert!(camera.get_resolution() == ScreenSize::new(640, 480));
    }

    #[test]
    fn partial_description_keeps_defaults() {
        let json = r#"{
            "max_bounce": 2,
            "spheres": [{"center": [0, 0, -3], "radius": 0.5}],
            "camera": {"width": 32, "height": 24, "projection": "orthographic"}
        }"#;
        let_assert!(Ok(d) = SceneDescription::from_json(json));

        assert!(d.max_bounce == 2);
        assert!(d.spheres.len() == 1);
        assert!(d.spheres[0].material == 0);
        assert!(d.lights.len() == 7);
        assert!(d.camera.projection == Projection::Orthographic);
        assert!(d.camera.focal_length == 10.0);
        assert!(d.render_settings().max_bounce == 2);
    }

    #[test]
    fn unknown_field_is_rejected() {
        let_assert!(
            Err(SceneDescriptionError::ParseError(_)) =
                SceneDescription::from_json(r#"{"spheres": [], "triangles": []}"#)
        );
    }

    #[test]
    fn json_round_trip_of_demo_scene() {
        let d = SceneDescription::default();
        let_assert!(Ok(json) = d.to_json());
        let_assert!(Ok(parsed) = SceneDescription::from_json(&json));
        assert!(parsed == d);
    }

    #[test]
    fn missing_material_is_an_error() {
        let d = SceneDescription {
            materials: vec![MaterialDescription::default()],
            ..SceneDescription::default()
        };
        let_assert!(Err(SceneDescriptionError::SceneError(_)) = d.build_scene());
    }

    #[test]
    fn non_positive_radius_is_an_error() {
        for radius in [0.0, -1.0] {
            let mut d = SceneDescription::default();
            d.spheres[2].radius = radius;
            let_assert!(
                Err(SceneDescriptionError::InvalidSphereRadius { index: 2, .. }) = d.build_scene()
            );
        }
    }

    #[test]
    fn invalid_camera_is_an_error() {
        let mut d = SceneDescription::default();
        d.camera.up = d.camera.forward;
        let_assert!(Err(SceneDescriptionError::InvalidCamera(_)) = d.build_camera());

        let mut d = SceneDescription::default();
        d.camera.width = 0;
        let_assert!(Err(SceneDescriptionError::InvalidCamera(_)) = d.build_camera());
    }

    #[test]
    fn mesh_path_is_relative_to_description() {
        let directory = std::env::temp_dir().join(format!("minitrace-config-{}", std::process::id()));
        fs::create_dir_all(&directory).unwrap();
        fs::write(
            directory.join("triangle.off"),
            "OFF\n3 1 0\n0 0 0\n1 0 0\n0 1 0\n3 0 1 2\n",
        )
        .unwrap();
        let description_path = directory.join("scene.json");
        fs::write(&description_path, r#"{"mesh": "triangle.off", "max_bounce": 1}"#).unwrap();

        let loaded = SceneDescription::load(&description_path);
        let scene = loaded.as_ref().ok().map(|d| d.build_scene());
        fs::remove_dir_all(&directory).unwrap();

        let_assert!(Ok(d) = loaded);
        assert!(d.mesh == Some(directory.join("triangle.off")));
        let_assert!(Some(Ok(scene)) = scene);
        assert!(scene.mesh().mesh().triangle_count() == 1);
    }

    #[test]
    fn bundled_pyramid_scene() {
        let_assert!(
            Ok(d) = SceneDescription::load(concat!(env!("CARGO_MANIFEST_DIR"), "/data/pyramid_scene.json"))
        );
        let_assert!(Ok(scene) = d.build_scene());
        assert!(scene.mesh().mesh().triangle_count() == 6);
        assert!(scene.spheres().len() == 2);
        assert!(scene.lights().len() == 7);
        assert!(d.max_bounce == 4);
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let_assert!(
            Err(SceneDescriptionError::ReadError { .. }) =
                SceneDescription::load("/nonexistent/minitrace/scene.json")
        );
    }
}
