use nalgebra::Unit;

use crate::{
    geometry::{EPSILON, FloatType, HitRecord, Ray},
    scene::{Scene, SceneHit, light::PointLight, material::Material},
    util::{Rgba, TRANSPARENT, component_mul, is_black},
};

use super::Worker;

/// Distance by which secondary rays are moved off the surface to avoid self intersection.
pub const SURFACE_OFFSET: FloatType = 1e-4;

impl Worker {
    /// Color seen along the ray. Misses are transparent black, hits are opaque.
    /// `bounce_budget` limits the number of mirror reflections followed.
    pub fn shade(&mut self, scene: &Scene, ray: &Ray, bounce_budget: u32) -> Rgba {
        let Some(SceneHit { hit, entity }) = scene.find_nearest(ray, &mut self.bvh_stack_cache)
        else {
            return TRANSPARENT;
        };
        let material = scene.material(entity);

        let mut color = component_mul(material.ambient, scene.ambient_light());
        for light in scene.lights() {
            color += self.direct_light(scene, ray, &hit, material, light);
        }
        color += self.reflected_light(scene, ray, &hit, material, bounce_budget);

        color.a = 1.0;
        color
    }

    /// Phong diffuse and specular contribution of a single light, zero if the light is occluded.
    fn direct_light(
        &mut self,
        scene: &Scene,
        ray: &Ray,
        hit: &HitRecord,
        material: &Material,
        light: &PointLight,
    ) -> Rgba {
        let to_light = light.position - hit.point;
        let Some(l) = Unit::try_new(to_light, EPSILON) else {
            return TRANSPARENT;
        };
        let n = hit.normal.as_ref();

        let diffuse = material.diffuse * n.dot(l.as_ref()).max(0.0);

        let shadow_origin = hit.point + l.as_ref() * SURFACE_OFFSET;
        let shadow_ray = Ray::new(shadow_origin, l.into_inner());
        let light_distance = (light.position - shadow_origin).norm();
        self.stats.shadow_rays += 1;
        if scene
            .find_nearest_within(&shadow_ray, light_distance, &mut self.bvh_stack_cache)
            .is_some()
        {
            self.stats.occluded_shadow_rays += 1;
            return TRANSPARENT;
        }

        let half_vector = Unit::try_new(l.as_ref() - ray.direction.as_ref(), EPSILON);
        let specular_factor = half_vector.map_or(0.0, |h| {
            n.dot(h.as_ref()).max(0.0).powf(material.specular_exponent)
        });
        let specular = material.specular * specular_factor;

        component_mul(diffuse + specular, light.color) * (1.0 / to_light.norm_squared())
    }

    /// Light arriving from the mirror direction, filtered by the material's reflection color.
    /// Once the budget runs out the reflection color itself is used.
    fn reflected_light(
        &mut self,
        scene: &Scene,
        ray: &Ray,
        hit: &HitRecord,
        material: &Material,
        bounce_budget: u32,
    ) -> Rgba {
        if bounce_budget == 0 || is_black(&material.reflection) {
            return material.reflection;
        }

        let d = ray.direction.as_ref();
        let n = hit.normal.as_ref();
        let reflected = d - n * (2.0 * n.dot(d));
        let reflection_ray = Ray::new(hit.point + reflected * SURFACE_OFFSET, reflected);

        self.stats.reflection_rays += 1;
        let incoming = self.shade(scene, &reflection_ray, bounce_budget - 1);
        component_mul(material.reflection, incoming)
    }
}
