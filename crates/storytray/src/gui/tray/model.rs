use crate::config::Config;
use crate::gui::tray::{RING_PADDING, WINDOW_MARGIN};
use palette::Srgba;
use ringlayout::{RingError, TrayState};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrayGeometry {
    pub center: Point,
    pub avatar_radius: f64,
    pub ring_radius: f64,
    pub scale: f64,
}

impl TrayGeometry {
    fn outer_radius(avatar_radius: f64, stroke_width: f64) -> f64 {
        avatar_radius.max(0.0) + RING_PADDING + stroke_width
    }

    /// Square window edge that fits the tray at full size.
    pub fn window_size(avatar_radius: f64, stroke_width: f64) -> i32 {
        (2.0 * (Self::outer_radius(avatar_radius, stroke_width) + WINDOW_MARGIN)).ceil() as i32
    }

    /// Centers the tray in a `width` x `height` area, shrinking it when the
    /// area is too small. Never scales up.
    pub fn fit(width: f64, height: f64, avatar_radius: f64, stroke_width: f64) -> Self {
        let center = Point::new(width / 2.0, height / 2.0);
        let wanted = Self::outer_radius(avatar_radius, stroke_width);
        let available = (width.min(height) / 2.0 - WINDOW_MARGIN).max(0.0);
        let scale = if wanted > available {
            available / wanted
        } else {
            1.0
        };

        Self {
            center,
            avatar_radius: avatar_radius.max(0.0) * scale,
            ring_radius: (avatar_radius.max(0.0) + RING_PADDING + stroke_width / 2.0) * scale,
            scale,
        }
    }
}

/// The tray as the window sees it: ring state plus avatar size.
#[derive(Debug)]
pub struct Tray {
    pub state: TrayState,
    pub avatar_radius: f64,
    pub avatar_color: Srgba<f64>,
}

impl Tray {
    pub fn new(state: TrayState, avatar_radius: f64, avatar_color: Srgba<f64>) -> Self {
        Self {
            state,
            avatar_radius,
            avatar_color,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, RingError> {
        let state = TrayState::create(config.ring_spec(), config.rotation_period())?;
        Ok(Self::new(
            state,
            config.avatar_radius,
            config.avatar_color.to_srgba(),
        ))
    }

    pub fn geometry(&self, width: f64, height: f64) -> TrayGeometry {
        TrayGeometry::fit(
            width,
            height,
            self.avatar_radius,
            self.state.spec().stroke_width,
        )
    }

    pub fn apply_config(&mut self, config: &Config) -> Result<(), RingError> {
        let spec = config.ring_spec();
        spec.validate()?;
        self.state.set_rotation_period(config.rotation_period())?;
        self.state.on_config_change(spec)?;
        self.avatar_radius = config.avatar_radius;
        self.avatar_color = config.avatar_color.to_srgba();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigLoader, Overrides};
    use ringlayout::{RingShape, RingVariant};

    #[test]
    fn test_window_size() {
        // 2 * (40 + 4 + 3 + 8)
        assert_eq!(TrayGeometry::window_size(40.0, 3.0), 110);
    }

    #[test]
    fn test_fit_at_full_size() {
        let geometry = TrayGeometry::fit(110.0, 200.0, 40.0, 3.0);
        assert_eq!(geometry.center, Point::new(55.0, 100.0));
        assert_eq!(geometry.scale, 1.0);
        assert_eq!(geometry.avatar_radius, 40.0);
        assert_eq!(geometry.ring_radius, 45.5);
    }

    #[test]
    fn test_fit_shrinks() {
        // 47 wanted, 23.5 available
        let geometry = TrayGeometry::fit(63.0, 63.0, 40.0, 3.0);
        assert_eq!(geometry.scale, 0.5);
        assert_eq!(geometry.avatar_radius, 20.0);
    }

    #[test]
    fn test_fit_degenerate_area() {
        let geometry = TrayGeometry::fit(0.0, 0.0, 40.0, 3.0);
        assert_eq!(geometry.scale, 0.0);
        assert_eq!(geometry.ring_radius, 0.0);
    }

    #[test]
    fn test_apply_config() {
        let mut tray = Tray::from_config(&Config::default()).unwrap();
        let config = Config {
            segments: 5,
            variant: RingVariant::Gradient,
            avatar_radius: 60.0,
            ..Config::default()
        };
        tray.apply_config(&config).unwrap();
        assert_eq!(tray.state.spec().segment_count, 5);
        assert_eq!(tray.avatar_radius, 60.0);

        let broken = Config {
            segments: 0,
            avatar_radius: 10.0,
            ..Config::default()
        };
        assert!(tray.apply_config(&broken).is_err());
        assert_eq!(tray.state.spec().segment_count, 5);
        assert_eq!(tray.avatar_radius, 60.0);
    }

    #[test]
    fn test_reload_keeps_command_line_ring() {
        let loader = ConfigLoader::with_path(
            "/nonexistent/storytray/config.toml",
            Overrides {
                segments: Some(6),
                variant: Some(RingVariant::Gradient),
                ..Overrides::default()
            },
        );
        let edited = config::Config::builder()
            .add_source(config::File::from_str(
                "segments = 2\nvariant = \"segmented\"\nstroke_width = 5.0",
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap();

        let mut tray = Tray::from_config(&loader.load_or_default()).unwrap();
        tray.apply_config(&loader.resolve(edited).unwrap()).unwrap();

        let spec = tray.state.spec();
        assert_eq!(spec.segment_count, 6);
        assert_eq!(spec.variant, RingVariant::Gradient);
        assert_eq!(spec.stroke_width, 5.0);
        assert_eq!(tray.state.border().unwrap().shape, RingShape::Circle);
    }
}
