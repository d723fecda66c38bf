/// Application state shared by every front end.
///
/// [`AppState`] owns the scene, camera, controls and animation driver. Front
/// ends feed it input events and call [`AppState::frame`] once per display
/// frame with a [`FrameRenderer`] that knows how to draw.
use crate::animation::{Animator, FrameSource};
use crate::config::SceneConfig;
use crate::controls::OrbitControls;
use crate::display::DisplayMode;
use crate::error::Result;
use crate::label::{place_labels, LabelPlacement};
use crate::projection::Camera;
use crate::scene::Scene;
use crate::viewport::Viewport;

/// Platform drawing backend
pub trait FrameRenderer {
    type Error;

    /// Move the four vertex labels. Called before [`FrameRenderer::render`].
    fn place_labels(&mut self, labels: &[LabelPlacement; 4]) -> Result<(), Self::Error>;

    fn render(&mut self, scene: &Scene, camera: &Camera) -> Result<(), Self::Error>;
}

pub struct AppState {
    config: SceneConfig,
    scene: Scene,
    camera: Camera,
    controls: OrbitControls,
    animator: Animator,
    viewport: Viewport,
    mode: DisplayMode,
    labels: [LabelPlacement; 4],
}

impl AppState {
    /// Build the scene once. Fails only on an invalid configuration.
    pub fn new(config: SceneConfig, viewport: Viewport) -> Result<Self> {
        config.validate()?;

        let scene = Scene::new(&config, viewport);
        let camera = Camera::from_config(&config.camera, viewport.aspect());
        let controls = OrbitControls::new(config.controls.clone());
        let animator = Animator::new(&config.animation);
        let labels = place_labels(&camera, &viewport, &scene.marker_positions());

        log::info!(
            "scene ready: {}x{} @{}x, {} triangles, {} edges",
            viewport.width,
            viewport.height,
            viewport.pixel_ratio,
            scene.tetrahedron.mesh.triangles.len(),
            scene.wireframe.segments.len()
        );

        Ok(Self {
            config,
            scene,
            camera,
            controls,
            animator,
            viewport,
            mode: DisplayMode::default(),
            labels,
        })
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn controls_mut(&mut self) -> &mut OrbitControls {
        &mut self.controls
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.mode
    }

    /// Advance and draw one frame.
    ///
    /// Order: controls, rotation and markers, labels, then rendering.
    pub fn frame<R>(&mut self, renderer: &mut R) -> Result<(), R::Error>
    where
        R: FrameRenderer,
    {
        self.controls.update(&mut self.camera);

        let rotation = self.animator.tick();
        self.scene.apply_rotation(rotation);

        self.labels = place_labels(&self.camera, &self.viewport, &self.scene.marker_positions());
        renderer.place_labels(&self.labels)?;

        renderer.render(&self.scene, &self.camera)
    }

    /// Follow a new viewport size. A zero-sized viewport is rejected and the
    /// previous size kept.
    pub fn resize(&mut self, width: u32, height: u32, pixel_ratio: f32) -> Result<Viewport> {
        let viewport = Viewport::with_pixel_ratio(width, height, pixel_ratio)?;
        self.viewport = viewport;
        self.camera.set_aspect(viewport.aspect());
        self.scene.wireframe.material.resolution = viewport.resolution();
        log::debug!("resized to {width}x{height} @{pixel_ratio}x");
        Ok(viewport)
    }

    /// Flip light/dark mode and return the new mode
    pub fn toggle_display_mode(&mut self) -> DisplayMode {
        self.mode = self.mode.toggled();
        self.scene.background = self.mode.background(&self.config.background);
        log::info!("display mode: {:?}", self.mode);
        self.mode
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) {
        self.controls.pointer_down(x, y);
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        let height = self.viewport.height as f32;
        self.controls.pointer_move(x, y, height);
    }

    pub fn pointer_up(&mut self) {
        self.controls.pointer_up();
    }

    pub fn wheel(&mut self, delta_y: f32) {
        self.controls.wheel(delta_y);
    }
}

/// Run one frame per tick until the source is exhausted or rendering fails
pub fn run_frames<S, R>(
    app: &mut AppState,
    source: &mut S,
    renderer: &mut R,
) -> Result<u64, R::Error>
where
    S: FrameSource + ?Sized,
    R: FrameRenderer,
{
    let mut frames = 0;
    while source.next_frame().is_some() {
        app.frame(renderer)?;
        frames += 1;
    }
    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::FixedFrames;
    use crate::display::DisplayMode;
    use std::f32::consts::{PI, TAU};

    #[derive(Debug, PartialEq)]
    enum Call {
        Labels([LabelPlacement; 4]),
        Render { background: u32, rotation_y: f32 },
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<Call>,
    }

    impl FrameRenderer for Recorder {
        type Error = String;

        fn place_labels(&mut self, labels: &[LabelPlacement; 4]) -> Result<(), String> {
            self.calls.push(Call::Labels(*labels));
            Ok(())
        }

        fn render(&mut self, scene: &Scene, _camera: &Camera) -> Result<(), String> {
            self.calls.push(Call::Render {
                background: scene.background.to_hex(),
                rotation_y: scene.tetrahedron.rotation.y,
            });
            Ok(())
        }
    }

    struct Failing;

    impl FrameRenderer for Failing {
        type Error = &'static str;

        fn place_labels(&mut self, _labels: &[LabelPlacement; 4]) -> Result<(), Self::Error> {
            Ok(())
        }

        fn render(&mut self, _scene: &Scene, _camera: &Camera) -> Result<(), Self::Error> {
            Err("context lost")
        }
    }

    fn app() -> AppState {
        AppState::new(SceneConfig::default(), Viewport::new(800, 600).unwrap()).unwrap()
    }

    #[test]
    fn test_frame_places_labels_before_render() {
        let mut app = app();
        let mut recorder = Recorder::default();
        app.frame(&mut recorder).unwrap();

        assert_eq!(recorder.calls.len(), 2);
        assert!(matches!(recorder.calls[0], Call::Labels(_)));
        assert!(matches!(recorder.calls[1], Call::Render { .. }));
        assert_eq!(recorder.calls[0], Call::Labels(app.labels));
    }

    #[test]
    fn test_rotation_period() {
        let mut app = app();
        let frames =
            run_frames(&mut app, &mut FixedFrames::new(1800), &mut Recorder::default()).unwrap();
        assert_eq!(frames, 1800);

        // A full spin wraps y back to zero and leaves x half a turn round
        let rotation = app.scene().tetrahedron.rotation;
        let gap = |angle: f32, expected: f32| {
            let gap = (angle - expected).rem_euclid(TAU);
            gap.min(TAU - gap)
        };
        assert!(gap(rotation.y, 0.0) < 1e-3);
        assert!(gap(rotation.x, PI) < 1e-3);
        assert_eq!(app.scene().wireframe.rotation, rotation);
    }

    #[test]
    fn test_markers_match_direct_rotation() {
        let mut app = app();
        run_frames(&mut app, &mut FixedFrames::new(777), &mut Recorder::default()).unwrap();
        let rotation = app.animator.rotation();
        for marker in &app.scene().markers {
            assert_eq!(marker.position, rotation.apply(&marker.origin));
        }
    }

    #[test]
    fn test_labels_follow_markers() {
        let mut app = app();
        app.frame(&mut Recorder::default()).unwrap();
        let expected = place_labels(&app.camera, &app.viewport(), &app.scene().marker_positions());
        assert_eq!(app.labels, expected);
        // All four vertices sit well inside the default view
        assert!(app.labels.iter().all(|label| label.visible));
    }

    #[test]
    fn test_toggle_twice_restores_background() {
        let mut app = app();
        let original = app.scene().background;

        assert_eq!(app.toggle_display_mode(), DisplayMode::Dark);
        assert_eq!(app.scene().background, app.config.background.dark);

        assert_eq!(app.toggle_display_mode(), DisplayMode::Light);
        assert_eq!(app.scene().background, original);
    }

    #[test]
    fn test_toggle_only_touches_background() {
        let mut app = app();
        let materials = (
            app.scene().tetrahedron.material,
            app.scene().wireframe.material,
            app.scene().marker_material,
        );
        app.toggle_display_mode();
        assert_eq!(
            materials,
            (
                app.scene().tetrahedron.material,
                app.scene().wireframe.material,
                app.scene().marker_material,
            )
        );
    }

    #[test]
    fn test_background_reaches_renderer() {
        let mut app = app();
        let mut recorder = Recorder::default();
        app.toggle_display_mode();
        app.frame(&mut recorder).unwrap();
        assert!(matches!(recorder.calls[1], Call::Render { background: 0x1a1a1a, .. }));
    }

    #[test]
    fn test_resize_updates_aspect_and_line_resolution() {
        let mut app = app();
        app.resize(1280, 720, 2.0).unwrap();
        assert_eq!(app.camera.aspect, 1280.0 / 720.0);
        assert_eq!(app.scene().wireframe.material.resolution, (1280.0, 720.0));
        assert_eq!(app.viewport().physical_size(), (2560, 1440));
    }

    #[test]
    fn test_empty_resize_keeps_previous_state() {
        let mut app = app();
        assert!(app.resize(0, 720, 1.0).is_err());
        assert_eq!(app.viewport(), Viewport::new(800, 600).unwrap());
        assert_eq!(app.scene().wireframe.material.resolution, (800.0, 600.0));
    }

    #[test]
    fn test_drag_moves_camera_over_frames() {
        let mut app = app();
        let start = app.camera.position;
        app.pointer_down(100.0, 300.0);
        app.pointer_move(200.0, 300.0);
        app.pointer_up();
        app.frame(&mut Recorder::default()).unwrap();
        assert!((app.camera.position - start).norm() > 1e-3);
    }

    #[test]
    fn test_render_error_propagates() {
        let mut app = app();
        assert_eq!(app.frame(&mut Failing), Err("context lost"));
        assert_eq!(
            run_frames(&mut app, &mut FixedFrames::new(5), &mut Failing),
            Err("context lost")
        );
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = SceneConfig::default();
        config.animation.reference_fps = 0.0;
        assert!(AppState::new(config, Viewport::new(800, 600).unwrap()).is_err());
    }
}
