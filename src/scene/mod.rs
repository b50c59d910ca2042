pub mod light;
pub mod material;
pub mod mesh;
pub mod primitives;
pub mod triangle_bvh;
mod visibility;

use bon::bon;
use thiserror::Error;

use crate::{
    geometry::{HitRecord, Ray, WorldBox},
    util::Rgba,
};

use light::PointLight;
use material::Material;
use mesh::TriangleIdx;
use primitives::{Parallelogram, Sphere};
use triangle_bvh::TriangleBvh;

/// Renderable object
pub trait Object {
    fn intersect(&self, ray: &Ray) -> Option<HitRecord>;
    fn get_bounding_box(&self) -> WorldBox;
}

/// Identifies what a ray hit.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Entity {
    Triangle(TriangleIdx),
    Sphere(usize),
    Parallelogram(usize),
}

#[derive(Clone, Debug)]
pub struct SceneHit {
    pub hit: HitRecord,
    pub entity: Entity,
}

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("{entity} refers to material {material}, but only {material_count} materials exist")]
    MissingMaterial {
        entity: String,
        material: usize,
        material_count: usize,
    },
}

/// Everything a ray can interact with. Immutable once built.
#[derive(Clone, Debug)]
pub struct Scene {
    mesh: TriangleBvh,
    mesh_material: usize,
    spheres: Vec<Sphere>,
    parallelograms: Vec<Parallelogram>,
    lights: Vec<PointLight>,
    ambient_light: Rgba,
    materials: Vec<Material>,
}

#[bon]
impl Scene {
    #[builder]
    pub fn new(
        #[builder(default)] mesh: TriangleBvh,
        #[builder(default)] mesh_material: usize,
        #[builder(default)] spheres: Vec<Sphere>,
        #[builder(default)] parallelograms: Vec<Parallelogram>,
        #[builder(default)] lights: Vec<PointLight>,
        #[builder(default = Rgba::new(0.0, 0.0, 0.0, 0.0))] ambient_light: Rgba,
        #[builder(default = vec![Material::default()])] materials: Vec<Material>,
    ) -> Result<Self, SceneError> {
        let material_count = materials.len();
        let check = |entity: String, material: usize| {
            if material < material_count {
                Ok(())
            } else {
                Err(SceneError::MissingMaterial {
                    entity,
                    material,
                    material_count,
                })
            }
        };

        if !mesh.is_empty() {
            check("Mesh".to_owned(), mesh_material)?;
        }
        for (i, sphere) in spheres.iter().enumerate() {
            check(format!("Sphere {i}"), sphere.material)?;
        }
        for (i, parallelogram) in parallelograms.iter().enumerate() {
            check(format!("Parallelogram {i}"), parallelogram.material)?;
        }

        Ok(Scene {
            mesh,
            mesh_material,
            spheres,
            parallelograms,
            lights,
            ambient_light,
            materials,
        })
    }
}

impl Scene {
    pub fn mesh(&self) -> &TriangleBvh {
        &self.mesh
    }

    pub fn spheres(&self) -> &[Sphere] {
        &self.spheres
    }

    pub fn parallelograms(&self) -> &[Parallelogram] {
        &self.parallelograms
    }

    pub fn lights(&self) -> &[PointLight] {
        &self.lights
    }

    pub fn ambient_light(&self) -> Rgba {
        self.ambient_light
    }

    /// Material of the hit entity.
    pub fn material(&self, entity: Entity) -> &Material {
        let index = match entity {
            Entity::Triangle(_) => self.mesh_material,
            Entity::Sphere(i) => self.spheres[i].material,
            Entity::Parallelogram(i) => self.parallelograms[i].material,
        };
        &self.materials[index]
    }

    /// Box around all scene geometry, None for a scene with no geometry.
    pub fn bounding_box(&self) -> Option<WorldBox> {
        self.spheres
            .iter()
            .map(|s| s.get_bounding_box())
            .chain(self.parallelograms.iter().map(|p| p.get_bounding_box()))
            .chain(self.mesh.bounding_box().cloned())
            .reduce(|a, b| a.union(&b))
    }
}
