use rayon::prelude::*;

use crate::scene::Scene;
use crate::canvas::Canvas;
use crate::camera::RenderOptions;
use crate::error::Result;

/// Renders a scene with rayon, one canvas row per task.
///
/// The scene is shared read-only between workers and every row of the canvas
/// is handed to exactly one of them, so no locking is needed. The result is
/// identical to `Camera::render`.
pub fn parallel_render(scene: &Scene, options: &RenderOptions) -> Canvas {
    let mut canvas = Canvas::new(options.width, options.height);
    let width = options.width.max(1);

    canvas.pixels_mut()
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, pixel) in row.iter_mut().enumerate() {
                *pixel = scene.camera.color_for_pixel(&scene.world, options,
                    x, y);
            }
        });

    canvas
}

/// Renders a scene on a dedicated pool of `threads` workers.
///
/// Without a thread count, rayon's global pool is used.
pub fn parallel_render_with(scene: &Scene, options: &RenderOptions,
    threads: Option<usize>) -> Result<Canvas> {
    match threads {
        None => Ok(parallel_render(scene, options)),
        Some(n) => {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()?;

            Ok(pool.install(|| parallel_render(scene, options)))
        }
    }
}

#[cfg(test)]
fn small_scene() -> Scene {
    Scene::from_rt_str("\
A 0.2 255,255,255
C 0,0,-5 0,0,1 70
L -10,10,-10 0.8
sp 0,0,0 2 255,0,0
pl 0,-1,0 0,1,0 0,0,255
cy 1.5,0,1 0,1,0 0.5 2 0,255,0
").unwrap()
}

#[test]
fn parallel_matches_sequential() {
    let scene = small_scene();
    let options = RenderOptions {
        width: 24,
        height: 16,
        samples: 2,
        ..Default::default()
    };

    let sequential = scene.camera.render(&scene.world, &options);
    let parallel = parallel_render(&scene, &options);

    assert_eq!(sequential, parallel);
}

#[test]
fn dedicated_pool_matches_global_pool() {
    let scene = small_scene();
    let options = RenderOptions { width: 8, height: 8, ..Default::default() };

    let global = parallel_render(&scene, &options);
    let pooled = parallel_render_with(&scene, &options, Some(2)).unwrap();

    assert_eq!(global, pooled);
}
