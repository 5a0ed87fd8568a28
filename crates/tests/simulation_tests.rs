//! End to end tests of the particle field, driven frame by frame.
#[cfg(test)]
mod simulation {
    use glam::Vec2;
    use particle_field::tests::helpers::{
        DrawCommand, ManualTicker, RecordingSurface, ScriptedViewport,
    };
    use particle_field::{
        Animation, Canvas, Config, FieldEvent, Particle, ParticleField, RenderSurface as _,
        State, Viewport,
    };

    fn setup_logging() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    fn started(seed: u64, width: u32, height: u32) -> (Animation, ScriptedViewport, RecordingSurface) {
        setup_logging();
        let mut animation = Animation::new(ParticleField::with_seed(Config::default(), seed));
        let viewport = ScriptedViewport::new(width, height);
        let mut surface = RecordingSurface::default();
        animation.start(&viewport, &mut surface).unwrap();
        (animation, viewport, surface)
    }

    fn in_bounds(field: &ParticleField) -> bool {
        let viewport = field.viewport();
        field
            .particles()
            .iter()
            .all(|particle| particle.is_within(viewport))
    }

    #[tokio::test]
    async fn particles_stay_in_bounds_over_many_frames() {
        let (mut animation, viewport, mut surface) = started(11, 800, 600);
        viewport.send(FieldEvent::PointerMove { x: 400.0, y: 300.0 });

        for _ in 0..20 {
            animation
                .run(&mut surface, &mut ManualTicker::new(25))
                .await
                .unwrap();
            assert!(in_bounds(&animation.field));
            animation.start(&viewport, &mut surface).unwrap();
        }
    }

    #[test]
    fn pointer_sweeping_over_the_field_never_escapes_bounds() {
        let (mut animation, _viewport, mut surface) = started(5, 320, 200);

        for step in 0u8..200 {
            let x = f32::from(step) * 1.6;
            animation.handle_event(FieldEvent::PointerMove { x, y: 100.0 }, &mut surface);
            animation.animate(&mut surface).unwrap();
            assert!(in_bounds(&animation.field), "escaped at step {step}");
        }
        assert_eq!(animation.frames(), 200);
    }

    #[tokio::test]
    async fn resize_mid_animation_keeps_particle_count_and_clamps() {
        let (mut animation, viewport, mut surface) = started(9, 1920, 1080);
        viewport.send(FieldEvent::Resize {
            width: 640,
            height: 480,
        });

        animation
            .run(&mut surface, &mut ManualTicker::new(3))
            .await
            .unwrap();

        assert_eq!(animation.field.particles().len(), 150);
        assert_eq!(animation.field.viewport(), Viewport::new(640, 480));
        assert!(in_bounds(&animation.field));
    }

    #[test]
    fn distant_pointer_is_free_motion_with_damping_and_reflection() {
        let config = Config::default();
        let mut with_pointer = ParticleField::with_seed(config.clone(), 1);
        let mut free = ParticleField::with_seed(config, 1);
        for field in [&mut with_pointer, &mut free] {
            field.resize(Viewport::new(800, 600));
            field.init();
            for particle in field.particles_mut() {
                particle.position = particle.position.clamp(Vec2::ZERO, Vec2::new(300.0, 200.0));
            }
        }
        // Further than 150px from anywhere that the particles can reach in 50 frames.
        with_pointer.set_pointer(800.0, 600.0);

        for _ in 0..50 {
            with_pointer.update_particles();
            free.update_particles();
        }

        assert_eq!(with_pointer.particles(), free.particles());
    }

    #[test]
    fn damping_slows_particles_towards_rest() {
        let mut field = ParticleField::with_seed(Config::default(), 1);
        field.resize(Viewport::new(800, 600));
        field.init();
        for particle in field.particles_mut() {
            *particle = Particle::new(
                Vec2::new(400.0, 300.0),
                Vec2::new(0.2, 0.2),
                particle.radius,
                particle.opacity,
            );
        }

        for _ in 0..100 {
            field.update_particles();
        }

        let expected = 0.2 * 0.99_f32.powi(100);
        for particle in field.particles() {
            assert!((particle.velocity.x - expected).abs() < 0.0001);
        }
    }

    #[tokio::test]
    async fn every_frame_draws_lines_before_particles() {
        let (mut animation, _viewport, mut surface) = started(2, 800, 600);
        animation
            .run(&mut surface, &mut ManualTicker::new(1))
            .await
            .unwrap();

        let frame: Vec<DrawCommand> = surface.last_frame().to_vec();
        assert!(matches!(frame.first(), Some(DrawCommand::Clear)));
        assert!(matches!(frame.last(), Some(DrawCommand::Present)));

        let first_circle = frame
            .iter()
            .position(|command| matches!(command, DrawCommand::Circle { .. }))
            .unwrap();
        let last_line = frame
            .iter()
            .rposition(|command| matches!(command, DrawCommand::Line { .. }));
        if let Some(last_line) = last_line {
            assert!(last_line < first_circle);
        }
        assert_eq!(surface.count("circle"), 150);
        assert_eq!(surface.count("gradient"), 150);
    }

    #[tokio::test]
    async fn stop_and_start_again() {
        let (mut animation, viewport, mut surface) = started(4, 800, 600);
        animation
            .run(&mut surface, &mut ManualTicker::new(2))
            .await
            .unwrap();
        assert_eq!(animation.state(), State::Stopped);

        animation.start(&viewport, &mut surface).unwrap();
        viewport.send(FieldEvent::Stop);
        let frames = animation
            .run(&mut surface, &mut ManualTicker::new(10))
            .await
            .unwrap();
        assert_eq!(frames, 0);
    }

    #[tokio::test]
    async fn canvas_shows_the_field() {
        setup_logging();
        let mut animation = Animation::new(ParticleField::with_seed(Config::default(), 8));
        let viewport = ScriptedViewport::new(400, 300);
        let mut canvas = Canvas::new(4.0);
        animation.start(&viewport, &mut canvas).unwrap();
        animation
            .run(&mut canvas, &mut ManualTicker::new(1))
            .await
            .unwrap();

        let (width, height) = canvas.dimensions();
        assert_eq!((width, height), (100, 75));
        let lit = (0..height)
            .flat_map(|y| (0..width).map(move |x| (x, y)))
            .filter(|&(x, y)| canvas.pixel(x, y).is_some_and(|pixel| pixel.alpha > 0.0))
            .count();
        assert!(lit >= 100, "Only {lit} pixels lit");

        canvas.clear();
        assert!(canvas.pixel(0, 0).is_some_and(|pixel| pixel.alpha == 0.0));
    }
}
