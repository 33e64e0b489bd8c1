//! A minimal scene graph for drawing layered content.
use crate::render::{Render, RenderContext, Transform};

/// A node of a scene graph. Borrows the objects it draws.
#[derive(Default)]
pub struct SceneNode<'a> {
    local_transform: Transform,
    z_index: i8,
    objects: Vec<&'a dyn Render>,
    children: Vec<SceneNode<'a>>,
}

impl<'a> SceneNode<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the transform applied to this node's objects and children before
    /// the parent's transform.
    pub fn set_local_transform(&mut self, transform: Transform) {
        self.local_transform = transform;
    }

    pub fn with_local_transform(mut self, transform: Transform) -> Self {
        self.set_local_transform(transform);
        self
    }

    /// Set the z-index used for this node's objects and its children.
    pub fn set_z_index(&mut self, z_index: i8) {
        self.z_index = z_index;
    }

    pub fn with_z_index(mut self, z_index: i8) -> Self {
        self.set_z_index(z_index);
        self
    }

    pub fn add_object(&mut self, object: &'a dyn Render) {
        self.objects.push(object);
    }

    pub fn with_object(mut self, object: &'a dyn Render) -> Self {
        self.add_object(object);
        self
    }

    pub fn add_child(&mut self, child: SceneNode<'a>) {
        self.children.push(child);
    }

    pub fn with_child(mut self, child: SceneNode<'a>) -> Self {
        self.add_child(child);
        self
    }
}

impl std::fmt::Debug for SceneNode<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneNode")
            .field("local_transform", &self.local_transform)
            .field("z_index", &self.z_index)
            .field("objects", &self.objects.len())
            .field("children", &self.children)
            .finish()
    }
}

impl Render for SceneNode<'_> {
    /// Draws the objects in insertion order, then the children. A child's
    /// own z-index overrides this node's.
    fn render_to(&self, cx: &mut RenderContext<'_>, transform: Transform) {
        let transform = self.local_transform.then(transform);
        let outer_z_index = cx.z_index;
        cx.z_index = self.z_index;
        for object in self.objects.iter() {
            object.render_to(cx, transform);
        }
        for child in self.children.iter() {
            child.render_to(cx, transform);
        }
        cx.z_index = outer_z_index;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        color::{colors, Color, Palette},
        patch::Patch,
        render::{PixelSurface, SurfaceConfig},
    };
    use cgmath::vec2;
    use rgb::RGBA8;

    fn point2<T>(x: T, y: T) -> cgmath::Point2<T> {
        cgmath::Point2::new(x, y)
    }

    fn solid(index: usize) -> Patch {
        Patch::new(Color::Indexed(index), Color::Indexed(index))
    }

    #[test]
    fn transforms_nest() {
        let palette = Palette::standard();
        let patch = solid(1);
        let scene = SceneNode::new()
            .with_local_transform(Transform::translate_by(vec2(8, 0)))
            .with_child(
                SceneNode::new()
                    .with_local_transform(Transform::translate_by(vec2(0, 8)))
                    .with_object(&patch),
            );

        let mut surface = PixelSurface::new(vec2(16, 16), SurfaceConfig::default());
        surface.draw(&scene, &palette, Transform::IDENTITY, 0);
        let red = RGBA8::new(0xff, 0, 0, 0xff);
        assert_eq!(surface.pixel(point2(8, 8)), Some(red));
        assert_eq!(surface.pixel(point2(15, 15)), Some(red));
        assert_eq!(surface.pixel(point2(7, 8)), Some(RGBA8::new(0, 0, 0, 0)));
        assert_eq!(surface.pixel(point2(8, 7)), Some(RGBA8::new(0, 0, 0, 0)));
    }

    #[test]
    fn z_index_orders_layers() {
        let palette = Palette::standard();
        let (front, back) = (solid(2), solid(3));
        let scene = SceneNode::new()
            .with_child(SceneNode::new().with_z_index(1).with_object(&front))
            .with_child(SceneNode::new().with_z_index(0).with_object(&back));

        let config = SurfaceConfig {
            depth_test: true,
            ..Default::default()
        };
        let mut surface = PixelSurface::new(vec2(8, 8), config);
        surface.draw(&scene, &palette, Transform::IDENTITY, 0);
        let green = colors::GREEN;
        assert_eq!(
            surface.pixel(point2(3, 3)),
            Some(RGBA8::new(green.r, green.g, green.b, 0xff))
        );
    }
}
